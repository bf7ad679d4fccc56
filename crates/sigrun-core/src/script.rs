//! SLURM batch-script rendering. The header is data rather than an opaque
//! template so individual directives can be reconfigured per campaign.

use crate::grid::GridPoint;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const SCRIPT_FILE_PREFIX: &str = "run_monojet_";
pub const SCRIPT_FILE_EXTENSION: &str = ".batch";

/// Mail directives stay in the rendered header even while disabled; a
/// disabled directive is written with a doubled `#` so the scheduler skips
/// it but the address survives in the script.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MailNotification {
    pub user: String,
    #[serde(rename = "onBegin")]
    pub on_begin: bool,
    #[serde(rename = "onEnd")]
    pub on_end: bool,
}

impl Default for MailNotification {
    fn default() -> Self {
        Self {
            user: "smsharma@princeton.edu".to_string(),
            on_begin: false,
            on_end: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SlurmHeader {
    pub nodes: u32,
    #[serde(rename = "tasksPerNode")]
    pub tasks_per_node: u32,
    pub memory: String,
    #[serde(rename = "wallTime")]
    pub wall_time: String,
    pub partition: String,
    pub mail: Option<MailNotification>,
    #[serde(rename = "workingDir")]
    pub working_dir: String,
    pub environment: Vec<String>,
}

impl SlurmHeader {
    /// Directive block plus the working-directory and environment setup
    /// lines, without the shebang and without a trailing newline.
    pub fn render(&self) -> String {
        let mut lines = Vec::new();
        lines.push(format!("#SBATCH -N {}   # node count", self.nodes));
        lines.push(format!("#SBATCH --ntasks-per-node={}", self.tasks_per_node));
        lines.push(format!("#SBATCH --mem={}", self.memory));
        lines.push(format!("#SBATCH -t {}", self.wall_time));
        if let Some(mail) = &self.mail {
            lines.push(format!(
                "{}SBATCH --mail-type=begin",
                directive_prefix(mail.on_begin)
            ));
            lines.push(format!(
                "{}SBATCH --mail-type=end",
                directive_prefix(mail.on_end)
            ));
            lines.push(format!(
                "{}SBATCH --mail-user={}",
                directive_prefix(mail.on_begin || mail.on_end),
                mail.user
            ));
        }
        lines.push(format!("#SBATCH -p {}", self.partition));
        lines.push(String::new());
        lines.push(format!("cd {}", self.working_dir));
        lines.extend(self.environment.iter().cloned());
        lines.join("\n")
    }
}

impl Default for SlurmHeader {
    fn default() -> Self {
        Self {
            nodes: 1,
            tasks_per_node: 1,
            memory: "4gb".to_string(),
            wall_time: "20:00:00".to_string(),
            partition: "hepheno".to_string(),
            mail: Some(MailNotification::default()),
            working_dir: "/group/hepheno/smsharma/Dark-Showers".to_string(),
            environment: vec![
                "source env.sh".to_string(),
                "cd /group/hepheno/smsharma/Dark-Showers/gen".to_string(),
                "source activate venv_py27".to_string(),
            ],
        }
    }
}

fn directive_prefix(enabled: bool) -> &'static str {
    if enabled { "#" } else { "##" }
}

pub fn render_batch_script(header: &SlurmHeader, command_line: &str) -> String {
    normalize_script_text(&format!(
        "#!/bin/bash\n{}\n\n{}",
        header.render(),
        command_line
    ))
}

pub fn normalize_script_text(content: &str) -> String {
    let mut normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    if !normalized.is_empty() && !normalized.ends_with('\n') {
        normalized.push('\n');
    }
    normalized
}

pub fn script_file_name(point: GridPoint) -> String {
    format!(
        "{}{}_{}{}",
        SCRIPT_FILE_PREFIX, point.mass, point.rinv, SCRIPT_FILE_EXTENSION
    )
}

pub fn script_path(batch_dir: &Path, point: GridPoint) -> PathBuf {
    batch_dir.join(script_file_name(point))
}

/// Writes the script with normalized line endings. The parent directory is
/// expected to exist already; a missing directory surfaces as the write
/// error of the caller.
pub fn write_batch_script(path: &Path, content: &str) -> std::io::Result<()> {
    fs::write(path, normalize_script_text(content))
}
