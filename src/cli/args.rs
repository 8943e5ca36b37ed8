use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "buildyard")]
#[command(about = "CI build worker: materialize project working copies at pinned revisions", long_about = None)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Machine-readable JSON output
    #[arg(long, global = true)]
    pub(crate) json: bool,

    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Clone a project repository and pin it to the requested revision
    Checkout {
        /// Repository location: an https URL or user@host:path reference
        /// (optional when --project is given)
        reference: Option<String>,

        /// Project definition file (YAML: reference, ssh_private_key)
        #[arg(long)]
        project: Option<PathBuf>,

        /// Branch to clone
        #[arg(long, short = 'b')]
        branch: String,

        /// Commit to check out after clone. Empty means the branch tip;
        /// "Manual" leaves the clone as-is. The actual HEAD hash is always
        /// reported back.
        #[arg(long, default_value = "")]
        commit: String,

        /// Working copy destination (default: <home>/builds/<project>/<branch>)
        #[arg(long)]
        dest: Option<PathBuf>,

        /// Shallow clone depth (default: clone_depth from the worker config)
        #[arg(long)]
        depth: Option<u32>,

        /// File containing the decrypted SSH private key; presence switches
        /// the clone to credentialed SSH transport
        #[arg(long)]
        key_file: Option<PathBuf>,
    },

    /// Check the worker environment (git availability, home layout)
    Doctor,
}

impl Cli {
    pub(crate) fn command_name(&self) -> &'static str {
        match self.command {
            Commands::Checkout { .. } => "checkout",
            Commands::Doctor => "doctor",
        }
    }
}
