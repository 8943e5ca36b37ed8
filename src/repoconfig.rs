use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

pub const REPO_CONFIG_FILENAME: &str = ".buildyard.yml";

/// Build configuration committed to the project repository itself, read
/// from the working copy after a successful checkout. Running the stages is
/// the pipeline's job, not this worker's.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    #[serde(default)]
    pub setup: Vec<String>,
    #[serde(default)]
    pub test: Vec<String>,
}

fn default_version() -> u32 {
    1
}

pub fn load(working_copy: &Path) -> anyhow::Result<Option<RepoConfig>> {
    let path = working_copy.join(REPO_CONFIG_FILENAME);
    if !path.exists() {
        return Ok(None);
    }

    let raw = std::fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let config: RepoConfig =
        serde_yaml::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    if config.version != 1 {
        anyhow::bail!("unsupported build config version: {}", config.version);
    }
    Ok(Some(config))
}
