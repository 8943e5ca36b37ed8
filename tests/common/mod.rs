#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

pub struct TestEnv {
    tmp: tempfile::TempDir,
    home: PathBuf,
    buildyard_home: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().expect("tempdir");

        let home = tmp.path().join("home");
        std::fs::create_dir_all(&home).expect("create home");

        let buildyard_home = tmp.path().join("buildyard_home");
        std::fs::create_dir_all(&buildyard_home).expect("create buildyard home");

        Self {
            tmp,
            home,
            buildyard_home,
        }
    }

    pub fn root(&self) -> &Path {
        self.tmp.path()
    }

    pub fn buildyard_home(&self) -> &Path {
        &self.buildyard_home
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.buildyard_home.join("state").join("logs")
    }

    pub fn buildyard(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_buildyard"));
        cmd.current_dir(self.root())
            .env("BUILDYARD_HOME", &self.buildyard_home)
            .env("HOME", &self.home)
            .env("USERPROFILE", &self.home);
        cmd
    }
}

pub struct OriginRepo {
    pub url: String,
    pub first_commit: String,
    pub tip_commit: String,
}

/// Two commits on `main`, pushed to a bare `file://` remote. The second
/// commit also carries an in-repo build config.
pub fn seed_origin(scope: &Path) -> OriginRepo {
    let work = scope.join("origin-work");
    let remote = scope.join("origin.git");
    std::fs::create_dir_all(&work).expect("create work dir");

    git_ok(&work, &["init", "-b", "main"]);
    git_ok(&work, &["config", "user.email", "test@example.com"]);
    git_ok(&work, &["config", "user.name", "Test"]);

    std::fs::write(work.join("file.txt"), "one\n").expect("write file");
    git_ok(&work, &["add", "."]);
    git_ok(&work, &["commit", "-m", "c1"]);
    let first_commit = git_stdout(&work, &["rev-parse", "HEAD"]);

    std::fs::write(work.join("file.txt"), "two\n").expect("write file");
    std::fs::write(
        work.join(".buildyard.yml"),
        "env:\n  CI: \"1\"\ntest:\n  - cargo test\n",
    )
    .expect("write build config");
    git_ok(&work, &["add", "."]);
    git_ok(&work, &["commit", "-m", "c2"]);
    let tip_commit = git_stdout(&work, &["rev-parse", "HEAD"]);

    git_ok(
        scope,
        &["init", "--bare", remote.to_string_lossy().as_ref()],
    );
    git_ok(
        &work,
        &["remote", "add", "origin", remote.to_string_lossy().as_ref()],
    );
    git_ok(&work, &["push", "-u", "origin", "main"]);

    OriginRepo {
        url: format!("file://{}", remote.to_string_lossy()),
        first_commit,
        tip_commit,
    }
}

pub fn git(dir: &Path, args: &[&str]) -> Output {
    Command::new("git")
        .current_dir(dir)
        .args(args)
        .output()
        .expect("run git")
}

pub fn git_ok(dir: &Path, args: &[&str]) {
    let out = git(dir, args);
    assert!(
        out.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&out.stderr)
    );
}

pub fn git_stdout(dir: &Path, args: &[&str]) -> String {
    let out = git(dir, args);
    assert!(
        out.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&out.stderr)
    );
    String::from_utf8_lossy(&out.stdout).trim().to_string()
}

pub fn parse_stdout_json(out: &Output) -> serde_json::Value {
    serde_json::from_slice(&out.stdout).unwrap_or_else(|err| {
        panic!(
            "stdout is not JSON ({err}): {}",
            String::from_utf8_lossy(&out.stdout)
        )
    })
}
