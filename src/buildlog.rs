use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

const LOG_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    pub schema_version: u32,
    pub recorded_at: String,
    pub stage: String,
    pub message: String,
    pub success: bool,
}

pub struct ReadLogResult {
    pub records: Vec<LogRecord>,
    pub warnings: Vec<String>,
}

/// Append-only per-project build log.
#[derive(Debug, Clone)]
pub struct BuildLog {
    path: PathBuf,
}

impl BuildLog {
    pub fn for_project(logs_dir: &Path, project_fs_key: &str) -> Self {
        Self {
            path: logs_dir.join(format!("{project_fs_key}.jsonl")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append_failure(&self, stage: &str, message: &str) -> anyhow::Result<()> {
        eprintln!("[{stage}] {message}");
        self.append(stage, message, false)
    }

    pub fn append_success(&self, stage: &str, message: &str) -> anyhow::Result<()> {
        self.append(stage, message, true)
    }

    fn append(&self, stage: &str, message: &str, success: bool) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }

        let recorded_at = time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .context("format timestamp")?;
        let record = LogRecord {
            schema_version: LOG_SCHEMA_VERSION,
            recorded_at,
            stage: stage.to_string(),
            message: message.to_string(),
            success,
        };

        let mut line = serde_json::to_string(&record).context("serialize log record")?;
        line.push('\n');

        use std::io::Write as _;
        let mut f = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("open {}", self.path.display()))?;
        f.write_all(line.as_bytes()).context("append log record")?;

        Ok(())
    }

    pub fn read(&self) -> anyhow::Result<ReadLogResult> {
        if !self.path.exists() {
            return Ok(ReadLogResult {
                records: Vec::new(),
                warnings: Vec::new(),
            });
        }

        let f = std::fs::File::open(&self.path)
            .with_context(|| format!("open {}", self.path.display()))?;
        let mut records = Vec::new();
        let mut warnings = Vec::new();

        use std::io::BufRead as _;
        let reader = std::io::BufReader::new(f);
        for (i, line) in reader.lines().enumerate() {
            let line_no = i + 1;
            let line = match line {
                Ok(s) => s,
                Err(err) => {
                    warnings.push(format!("build log: failed to read line {line_no}: {err}"));
                    continue;
                }
            };

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let record: LogRecord = match serde_json::from_str(trimmed) {
                Ok(v) => v,
                Err(err) => {
                    warnings.push(format!(
                        "build log: skipped malformed JSON at line {line_no}: {err}"
                    ));
                    continue;
                }
            };

            if record.schema_version != LOG_SCHEMA_VERSION {
                warnings.push(format!(
                    "build log: skipped unsupported schema_version {} at line {line_no}",
                    record.schema_version
                ));
                continue;
            }

            records.push(record);
        }

        Ok(ReadLogResult { records, warnings })
    }
}
