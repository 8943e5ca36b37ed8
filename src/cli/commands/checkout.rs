use std::path::Path;

use anyhow::Context as _;

use crate::buildlog::BuildLog;
use crate::checkout::create_working_copy;
use crate::config::{Build, Project, WorkerConfig, ref_fs_slug};
use crate::output::{JsonEnvelope, print_json};
use crate::repoconfig;
use crate::runner::ProcessRunner;
use crate::user_error::UserError;

use super::Ctx;

#[allow(clippy::too_many_arguments)]
pub(crate) fn run(
    ctx: &Ctx,
    reference: Option<&str>,
    project_file: Option<&Path>,
    branch: &str,
    commit: &str,
    dest: Option<&Path>,
    depth: Option<u32>,
    key_file: Option<&Path>,
) -> anyhow::Result<()> {
    let mut project = match project_file {
        Some(path) => Project::load(path)?,
        None => Project {
            reference: String::new(),
            ssh_private_key: None,
        },
    };
    if let Some(reference) = reference {
        project.reference = reference.to_string();
    }
    if project.reference.trim().is_empty() {
        anyhow::bail!("a repository reference is required (positional argument or --project)");
    }
    if branch.trim().is_empty() {
        anyhow::bail!("branch must not be empty");
    }
    if let Some(key_file) = key_file {
        let key = std::fs::read_to_string(key_file)
            .context(UserError::key_file_unreadable(key_file))?;
        project.ssh_private_key = Some(key);
    }

    let worker_config = WorkerConfig::load(&ctx.home.config_path)?;
    let config = WorkerConfig {
        clone_depth: depth.or(worker_config.clone_depth),
    };

    let dest = match dest {
        Some(dest) => dest.to_path_buf(),
        None => ctx
            .home
            .builds_dir
            .join(project.fs_key())
            .join(ref_fs_slug(branch)),
    };

    let mut build = Build {
        branch: branch.to_string(),
        commit_id: commit.to_string(),
    };
    let log = BuildLog::for_project(&ctx.home.logs_dir, &project.fs_key());
    let mut runner = ProcessRunner::new();

    let report = create_working_copy(&mut runner, &log, &config, &project, &mut build, &dest)?;

    if !report.success {
        return Err(UserError::checkout_failed(
            project.clone_url(),
            &build.branch,
            serde_json::json!({
                "transport": report.transport,
                "checkout_step_failed": report.checkout_step_failed,
                "commit_id": build.commit_id,
                "resolved_commit": report.resolved_commit,
                "working_copy": dest.display().to_string(),
                "log": log.path().display().to_string(),
                "hint": "inspect the build log for the failing git operation.",
            }),
        ));
    }

    let repo_config = repoconfig::load(&dest)?;
    log.append_success(
        "checkout",
        &format!("pinned {} at {}", project.clone_url(), build.commit_id),
    )?;

    if ctx.cli.json {
        let envelope = JsonEnvelope::ok(
            "checkout",
            serde_json::json!({
                "success": true,
                "transport": report.transport,
                "branch": build.branch,
                "commit_id": build.commit_id,
                "working_copy": dest.display().to_string(),
                "repo_config": repo_config,
            }),
        );
        print_json(&envelope)?;
    } else {
        println!(
            "checked out {} at {}",
            project.clone_url(),
            build.commit_id
        );
        println!("working copy: {}", dest.display());
        if let Some(config) = &repo_config {
            println!(
                "build config: {} setup step(s), {} test step(s)",
                config.setup.len(),
                config.test.len()
            );
        }
    }

    Ok(())
}
