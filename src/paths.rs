use std::path::PathBuf;

use anyhow::Context as _;

#[derive(Debug, Clone)]
pub struct BuildyardHome {
    pub root: PathBuf,
    pub config_path: PathBuf,
    pub builds_dir: PathBuf,
    pub state_dir: PathBuf,
    pub logs_dir: PathBuf,
}

impl BuildyardHome {
    pub fn resolve() -> anyhow::Result<Self> {
        let root = if let Ok(val) = std::env::var("BUILDYARD_HOME") {
            expand_tilde(&val)?
        } else {
            dirs::home_dir()
                .context("failed to resolve home directory")?
                .join(".buildyard")
        };

        let state_dir = root.join("state");
        Ok(Self {
            config_path: root.join("config.yaml"),
            builds_dir: root.join("builds"),
            logs_dir: state_dir.join("logs"),
            state_dir,
            root,
        })
    }
}

fn expand_tilde(s: &str) -> anyhow::Result<PathBuf> {
    if let Some(rest) = s.strip_prefix("~/") {
        let home = dirs::home_dir().context("resolve home dir")?;
        return Ok(home.join(rest));
    }
    Ok(PathBuf::from(s))
}
