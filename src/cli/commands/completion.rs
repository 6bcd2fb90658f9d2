//! Completion command implementation
//!
//! Emits shell completion scripts via clap_complete.

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Cli;

/// Execute the completion command
pub fn execute(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "granite", &mut std::io::stdout());
}
