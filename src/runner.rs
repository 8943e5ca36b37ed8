use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::user_error::UserError;

/// A subprocess invocation: program, discrete arguments, optional working
/// directory and environment bindings. Arguments are passed to the process
/// as-is; values containing spaces or shell metacharacters cannot alter the
/// command structure.
#[derive(Debug, Clone)]
pub struct Cmd {
    program: String,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
    envs: Vec<(String, OsString)>,
}

impl Cmd {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            envs: Vec::new(),
        }
    }

    pub fn git() -> Self {
        Self::new("git")
    }

    pub fn git_in(dir: &Path) -> Self {
        Self::git().current_dir(dir)
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<OsString>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn argv(&self) -> &[OsString] {
        &self.args
    }

    pub fn cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    pub fn envs(&self) -> &[(String, OsString)] {
        &self.envs
    }

    pub fn env_value(&self, key: &str) -> Option<&OsString> {
        self.envs.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn display(&self) -> String {
        let mut out = self.program.clone();
        for arg in &self.args {
            out.push(' ');
            out.push_str(&arg.to_string_lossy());
        }
        out
    }
}

/// Executes a [`Cmd`], reporting exit-status success and captured output.
/// Spawn-level failures (missing executable) are errors; a subprocess that
/// ran and failed is `Ok(false)`.
pub trait CommandRunner {
    fn execute(&mut self, cmd: &Cmd) -> anyhow::Result<bool>;
    fn last_output(&self) -> &str;
    fn last_error_output(&self) -> &str;
}

#[derive(Debug, Default)]
pub struct ProcessRunner {
    last_output: String,
    last_error_output: String,
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CommandRunner for ProcessRunner {
    fn execute(&mut self, cmd: &Cmd) -> anyhow::Result<bool> {
        let mut command = std::process::Command::new(cmd.program());
        command.args(cmd.argv());
        if let Some(dir) = cmd.cwd() {
            command.current_dir(dir);
        }
        for (key, value) in cmd.envs() {
            command.env(key, value);
        }

        let out = match command.output() {
            Ok(out) => out,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(UserError::git_not_found(cmd.display(), cmd.cwd()));
            }
            Err(err) => {
                return Err(anyhow::Error::new(err).context(format!("run {}", cmd.display())));
            }
        };

        self.last_output = String::from_utf8_lossy(&out.stdout).into_owned();
        self.last_error_output = String::from_utf8_lossy(&out.stderr).into_owned();
        Ok(out.status.success())
    }

    fn last_output(&self) -> &str {
        &self.last_output
    }

    fn last_error_output(&self) -> &str {
        &self.last_error_output
    }
}
