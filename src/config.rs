use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::hash::short_fs_key;

/// Sentinel commit id: the build record carries it when no specific commit
/// should be forced after clone.
pub const MANUAL_COMMIT: &str = "Manual";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// VCS location: an https URL or a `user@host:path` style reference.
    pub reference: String,
    /// Decrypted private key material. Empty or absent means anonymous
    /// transport.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_private_key: Option<String>,
}

impl Project {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw =
            std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let project: Project =
            serde_yaml::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
        validate_project(&project)?;
        Ok(project)
    }

    pub fn clone_url(&self) -> &str {
        &self.reference
    }

    /// Trimmed key material, or None when the project has no usable key.
    pub fn key_material(&self) -> Option<&str> {
        self.ssh_private_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// Stable per-project filesystem key derived from the normalized remote
    /// reference.
    pub fn fs_key(&self) -> String {
        short_fs_key(normalize_remote(&self.reference).as_bytes())
    }
}

fn validate_project(project: &Project) -> anyhow::Result<()> {
    if project.reference.trim().is_empty() {
        anyhow::bail!("project reference must not be empty");
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Build {
    pub branch: String,
    /// Requested commit: a concrete hash, empty for the branch tip, or the
    /// `Manual` sentinel. Rewritten with the resolved HEAD hash after a
    /// successful clone.
    #[serde(default)]
    pub commit_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkerConfig {
    #[serde(default)]
    pub clone_depth: Option<u32>,
}

impl WorkerConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw =
            std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let config: WorkerConfig =
            serde_yaml::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
        Ok(config)
    }
}

fn normalize_remote(reference: &str) -> String {
    let r = reference.trim().trim_end_matches(".git");
    // Basic normalization:
    // - strip protocol/userinfo
    // - map ssh form git@github.com:org/repo -> github.com/org/repo
    if let Some(rest) = r.strip_prefix("git@") {
        let rest = rest.replace(':', "/");
        return rest.to_lowercase();
    }
    if let Some(rest) = r.strip_prefix("https://") {
        return rest.to_lowercase();
    }
    if let Some(rest) = r.strip_prefix("http://") {
        return rest.to_lowercase();
    }
    r.to_lowercase()
}

/// Filesystem-safe slug for a ref name used in directory layouts.
pub fn ref_fs_slug(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            ':' | '/' | '\\' => '_',
            _ if c.is_ascii_alphanumeric() || c == '-' || c == '_' => c,
            _ => '_',
        })
        .collect()
}
