use std::path::Path;

use anyhow::Context as _;
use serde::Serialize;

use crate::buildlog::BuildLog;
use crate::config::{Build, MANUAL_COMMIT, Project, WorkerConfig};
use crate::credentials::{self, CredentialGuard};
use crate::runner::{Cmd, CommandRunner};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transport {
    Http,
    Ssh,
}

impl Transport {
    /// SSH iff the project carries usable (non-whitespace) key material.
    pub fn select(project: &Project) -> Self {
        if project.key_material().is_some() {
            Transport::Ssh
        } else {
            Transport::Http
        }
    }
}

/// Outcome of one working-copy checkout. `success` is the build-level
/// signal; `checkout_step_failed` and `resolved_commit` let callers tell a
/// failed revision pin apart from a failed HEAD resolution.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutReport {
    pub success: bool,
    pub transport: Transport,
    pub checkout_step_failed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_commit: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PinOutcome {
    pub checkout_ok: bool,
    pub resolved: Option<String>,
}

fn clone_cmd(
    url: &str,
    branch: &str,
    dest: &Path,
    depth: Option<u32>,
    wrapper: Option<&Path>,
) -> Cmd {
    let mut cmd = Cmd::git().arg("clone").arg("--recursive");
    if let Some(depth) = depth {
        cmd = cmd.arg("--depth").arg(depth.to_string());
    }
    cmd = cmd.arg("-b").arg(branch).arg(url).arg(dest);
    if let Some(wrapper) = wrapper {
        cmd = cmd.env("GIT_SSH", wrapper);
    }
    cmd
}

/// Check out the requested commit (unless empty or the `Manual` sentinel),
/// then resolve what HEAD actually is. The resolution step always runs: the
/// recorded hash comes from the working copy itself, even when the explicit
/// checkout was skipped or did not succeed.
pub fn pin_revision(
    runner: &mut dyn CommandRunner,
    dest: &Path,
    requested: &str,
) -> anyhow::Result<PinOutcome> {
    let mut checkout_ok = true;
    if !requested.is_empty() && requested != MANUAL_COMMIT {
        checkout_ok =
            runner.execute(&Cmd::git_in(dest).args(["checkout", requested, "--quiet"]))?;
    }

    let resolved = if runner.execute(&Cmd::git_in(dest).args(["rev-parse", "HEAD"]))? {
        Some(runner.last_output().trim().to_string())
    } else {
        None
    };

    Ok(PinOutcome {
        checkout_ok,
        resolved,
    })
}

/// Materialize a working copy of `project` at `dest` and pin it to the
/// build's requested revision. On success (and on a successful HEAD
/// resolution after a failed pin) `build.commit_id` is rewritten with the
/// actual HEAD hash. Ephemeral SSH credentials never outlive this call.
pub fn create_working_copy(
    runner: &mut dyn CommandRunner,
    log: &BuildLog,
    config: &WorkerConfig,
    project: &Project,
    build: &mut Build,
    dest: &Path,
) -> anyhow::Result<CheckoutReport> {
    let transport = Transport::select(project);

    let mut guard: Option<CredentialGuard> = None;
    if let Some(key_material) = project.key_material() {
        guard = Some(credentials::provision(dest, key_material)?);
    }

    prepare_destination(dest)?;

    let wrapper = guard.as_ref().map(|g| g.wrapper_path());
    let cmd = clone_cmd(
        project.clone_url(),
        &build.branch,
        dest,
        config.clone_depth,
        wrapper,
    );
    let cloned = runner.execute(&cmd)?;
    if !cloned {
        let mut message = format!("failed to clone remote repository {}", project.clone_url());
        let detail = runner.last_error_output().trim();
        if !detail.is_empty() {
            message.push_str(": ");
            message.push_str(detail);
        }
        log.append_failure("clone", &message)?;

        return Ok(CheckoutReport {
            success: false,
            transport,
            checkout_step_failed: false,
            resolved_commit: None,
        });
    }

    let requested = build.commit_id.clone();
    let pin = pin_revision(runner, dest, &requested)?;
    if let Some(hash) = &pin.resolved {
        build.commit_id = hash.clone();
    }

    Ok(CheckoutReport {
        success: pin.checkout_ok && pin.resolved.is_some(),
        transport,
        checkout_step_failed: !pin.checkout_ok,
        resolved_commit: pin.resolved,
    })
}

fn prepare_destination(dest: &Path) -> anyhow::Result<()> {
    if dest.exists() {
        std::fs::remove_dir_all(dest)
            .with_context(|| format!("remove stale working copy {}", dest.display()))?;
    }
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    Ok(())
}
