//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod analyze;
pub mod build;
pub mod commit;
pub mod completion;
pub mod dirty;
pub mod graph;
pub mod import;
pub mod init;
pub mod new;

use anyhow::Result;
use clap::Subcommand;

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a granite workspace in the current directory
    Init,

    /// Create a new package or package type
    New {
        #[command(subcommand)]
        command: NewCommands,
    },

    /// Build packages and their dependencies
    Build {
        /// Bypass the build cache
        #[arg(long)]
        no_cache: bool,

        /// Only build packages with changes (and their dependents)
        #[arg(long)]
        dirty: bool,

        /// Target to execute
        #[arg(short, long, default_value = "build")]
        target: String,
    },

    /// List packages with changes
    Dirty,

    /// Visualize package dependencies
    Graph {
        /// Output format (tree, dot)
        #[arg(short, long, default_value = "tree")]
        format: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,

        /// Show package types and versions in output
        #[arg(long)]
        types: bool,
    },

    /// Analyze workspace health and dependencies
    Analyze {
        /// Output analysis in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Import code from a GitHub repo or local path
    Import {
        /// GitHub URL or local directory
        source: String,

        /// Package type for the imported package
        package_type: String,

        /// Name of the new package
        name: String,
    },

    /// Commit changes in packages, one commit per package
    Commit,

    /// Generate completion script
    Completion {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

/// Scaffolding subcommands
#[derive(Subcommand, Debug)]
pub enum NewCommands {
    /// Create a new package type
    Type {
        /// Type name
        name: String,
    },

    /// Create a new package
    Package {
        /// Package type
        package_type: String,

        /// Package name
        name: String,
    },
}

impl Commands {
    /// Execute the command
    pub async fn run(self) -> Result<()> {
        match self {
            Self::Init => {
                let current_dir = std::env::current_dir()?;
                init::execute(&current_dir).await
            }
            Self::New { command } => {
                let current_dir = std::env::current_dir()?;
                match command {
                    NewCommands::Type { name } => new::execute_type(&current_dir, &name).await,
                    NewCommands::Package { package_type, name } => {
                        new::execute_package(&current_dir, &package_type, &name).await
                    }
                }
            }
            Self::Build {
                no_cache,
                dirty,
                target,
            } => {
                let current_dir = std::env::current_dir()?;
                let options = build::BuildOptions {
                    no_cache,
                    dirty,
                    target,
                };
                build::execute(&current_dir, options).await
            }
            Self::Dirty => {
                let current_dir = std::env::current_dir()?;
                dirty::execute(&current_dir).await
            }
            Self::Graph {
                format,
                output,
                types,
            } => {
                let current_dir = std::env::current_dir()?;
                graph::execute(&current_dir, &format, output.as_deref(), types).await
            }
            Self::Analyze { json } => {
                let current_dir = std::env::current_dir()?;
                analyze::execute(&current_dir, json).await
            }
            Self::Import {
                source,
                package_type,
                name,
            } => {
                let current_dir = std::env::current_dir()?;
                import::execute(&current_dir, &source, &package_type, &name).await
            }
            Self::Commit => {
                let current_dir = std::env::current_dir()?;
                commit::execute(&current_dir).await
            }
            Self::Completion { shell } => {
                completion::execute(shell);
                Ok(())
            }
        }
    }
}
