use crate::output::{JsonEnvelope, print_json};
use crate::runner::{Cmd, CommandRunner as _, ProcessRunner};

use super::Ctx;

pub(crate) fn run(ctx: &Ctx) -> anyhow::Result<()> {
    let mut runner = ProcessRunner::new();
    let git_ok = runner.execute(&Cmd::git().arg("--version"))?;
    let git_version = runner.last_output().trim().to_string();

    if ctx.cli.json {
        let envelope = JsonEnvelope::ok(
            "doctor",
            serde_json::json!({
                "git_ok": git_ok,
                "git_version": git_version,
                "home": ctx.home.root.display().to_string(),
                "builds_dir": ctx.home.builds_dir.display().to_string(),
                "logs_dir": ctx.home.logs_dir.display().to_string(),
                "config_present": ctx.home.config_path.exists(),
            }),
        );
        print_json(&envelope)?;
    } else {
        println!("git: {}", if git_ok { &git_version } else { "unusable" });
        println!("home: {}", ctx.home.root.display());
        println!(
            "worker config: {} ({})",
            ctx.home.config_path.display(),
            if ctx.home.config_path.exists() {
                "present"
            } else {
                "absent, using defaults"
            }
        );
    }

    Ok(())
}
