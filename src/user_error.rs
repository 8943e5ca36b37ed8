#[derive(Debug)]
pub struct UserError {
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl std::fmt::Display for UserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for UserError {}

impl UserError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn git_not_found(command: impl Into<String>, cwd: Option<&std::path::Path>) -> anyhow::Error {
        let command = command.into();
        anyhow::Error::new(
            Self::new(
                "E_GIT_NOT_FOUND",
                format!("git executable not found (needed for '{command}')"),
            )
            .with_details(serde_json::json!({
                "command": command,
                "cwd": cwd.map(|p| p.display().to_string()),
                "hint": "Install git and ensure it is on PATH.",
            })),
        )
    }

    pub fn provision_failed(destination: &std::path::Path) -> Self {
        Self::new(
            "E_PROVISION_FAILED",
            format!(
                "failed to provision ephemeral ssh credentials for {}",
                destination.display()
            ),
        )
        .with_details(serde_json::json!({
            "destination": destination.display().to_string(),
            "hint": "Check that the destination's parent directory is writable.",
        }))
    }

    pub fn key_file_unreadable(path: &std::path::Path) -> Self {
        Self::new(
            "E_KEY_FILE_UNREADABLE",
            format!("cannot read ssh private key file: {}", path.display()),
        )
        .with_details(serde_json::json!({
            "path": path.display().to_string(),
            "hint": "Pass --key-file a readable file containing the decrypted private key.",
        }))
    }

    pub fn checkout_failed(
        reference: &str,
        branch: &str,
        details: serde_json::Value,
    ) -> anyhow::Error {
        anyhow::Error::new(
            Self::new(
                "E_CHECKOUT_FAILED",
                format!("checkout failed for {reference} (branch {branch})"),
            )
            .with_details(details),
        )
    }
}

pub(crate) fn find_user_error(err: &anyhow::Error) -> Option<&UserError> {
    err.chain().find_map(|e| e.downcast_ref::<UserError>())
}

pub(crate) fn anyhow_error_parts_for_envelope(
    err: &anyhow::Error,
) -> (
    &'_ str,
    std::borrow::Cow<'_, str>,
    Option<serde_json::Value>,
) {
    let user_err = find_user_error(err);
    match user_err {
        Some(user_err) => (
            user_err.code.as_str(),
            std::borrow::Cow::Borrowed(user_err.message.as_str()),
            user_err.details.clone(),
        ),
        None => (
            "E_UNEXPECTED",
            std::borrow::Cow::Owned(err.to_string()),
            None,
        ),
    }
}
