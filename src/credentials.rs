use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::user_error::UserError;

/// Ephemeral SSH credential files for one checkout: the private key and a
/// wrapper script that forces git's ssh transport onto that key. Both are
/// siblings of the working-copy destination, so concurrent builds with
/// distinct destinations never collide. Dropping the guard removes both
/// files; release is idempotent and tolerates already-deleted files.
#[derive(Debug)]
pub struct CredentialGuard {
    key_path: PathBuf,
    wrapper_path: PathBuf,
    released: bool,
}

impl CredentialGuard {
    pub fn key_path(&self) -> &Path {
        &self.key_path
    }

    pub fn wrapper_path(&self) -> &Path {
        &self.wrapper_path
    }

    pub fn release(&mut self) -> anyhow::Result<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        let key = remove_if_present(&self.key_path);
        let wrapper = remove_if_present(&self.wrapper_path);
        key.and(wrapper)
    }
}

impl Drop for CredentialGuard {
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            eprintln!("warning: failed to remove ephemeral ssh credentials: {err:#}");
        }
    }
}

pub fn provision(dest: &Path, key_material: &str) -> anyhow::Result<CredentialGuard> {
    provision_inner(dest, key_material).context(UserError::provision_failed(dest))
}

fn provision_inner(dest: &Path, key_material: &str) -> anyhow::Result<CredentialGuard> {
    let key_path = sibling_path(dest, "key")?;
    let wrapper_path = sibling_path(dest, "git_ssh.sh")?;

    if let Some(parent) = key_path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }

    // Leftovers from a crashed earlier attempt at the same destination.
    remove_if_present(&key_path)?;
    remove_if_present(&wrapper_path)?;

    write_restricted(&key_path, &format!("{}\n", key_material.trim()), 0o600)?;
    let guard = CredentialGuard {
        key_path: key_path.clone(),
        wrapper_path: wrapper_path.clone(),
        released: false,
    };

    // The guard is armed before the wrapper write: if it fails, the key file
    // is still removed on the error path.
    write_restricted(&wrapper_path, &wrapper_script(&key_path), 0o700)?;

    Ok(guard)
}

fn wrapper_script(key_path: &Path) -> String {
    let key = shell_quote_single(&key_path.to_string_lossy());
    format!(
        "#!/bin/sh\nexec ssh -i {key} -o StrictHostKeyChecking=no -o IdentitiesOnly=yes \"$@\"\n"
    )
}

fn shell_quote_single(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

fn sibling_path(dest: &Path, suffix: &str) -> anyhow::Result<PathBuf> {
    let name = dest
        .file_name()
        .with_context(|| format!("invalid destination path: {}", dest.display()))?;
    let mut file = name.to_os_string();
    file.push(".");
    file.push(suffix);
    Ok(dest.with_file_name(file))
}

fn remove_if_present(path: &Path) -> anyhow::Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => {
            Err(anyhow::Error::new(err).context(format!("remove {}", path.display())))
        }
    }
}

fn write_restricted(path: &Path, contents: &str, mode: u32) -> anyhow::Result<()> {
    #[cfg(unix)]
    {
        use std::io::Write as _;
        use std::os::unix::fs::OpenOptionsExt as _;

        let mut f = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .mode(mode)
            .open(path)
            .with_context(|| format!("create {}", path.display()))?;
        f.write_all(contents.as_bytes())
            .with_context(|| format!("write {}", path.display()))?;
    }
    #[cfg(not(unix))]
    {
        let _ = mode;
        std::fs::write(path, contents).with_context(|| format!("write {}", path.display()))?;
    }
    Ok(())
}
