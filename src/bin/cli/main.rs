//! CLI tool for gdarc archive operations.

mod commands;
mod exit_codes;
mod output;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use std::path::PathBuf;

use exit_codes::ExitCode;

/// ARC game asset package tool
#[derive(Parser)]
#[command(name = "gdarc")]
#[command(author, version, about = "ARC game asset package tool", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "human", global = true)]
    format: OutputFormat,

    /// Suppress informational output
    #[arg(long, short = 'q', global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty archive
    New {
        /// Archive file to create
        archive: PathBuf,

        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },

    /// List archive contents (alias: l)
    #[command(alias = "l")]
    List {
        /// Archive file to list
        archive: PathBuf,

        /// Show storage details
        #[arg(long)]
        technical: bool,
    },

    /// Show archive information (alias: i)
    #[command(alias = "i")]
    Info {
        /// Archive file to inspect
        archive: PathBuf,
    },

    /// Extract all entries (alias: x)
    #[command(alias = "x")]
    Extract {
        /// Archive file to extract
        archive: PathBuf,

        /// Output directory
        #[arg(short = 'o', long, default_value = ".")]
        output: PathBuf,

        /// Overwrite mode
        #[arg(long, value_enum, default_value = "never")]
        overwrite: OverwriteMode,

        /// Skip Adler-32 verification
        #[arg(long)]
        no_verify: bool,
    },

    /// Test archive integrity (alias: t)
    #[command(alias = "t")]
    Test {
        /// Archive file to test
        archive: PathBuf,
    },

    /// Add files or directories (alias: a)
    #[command(alias = "a")]
    Add {
        /// Archive file to modify
        archive: PathBuf,

        /// Files and directories to add
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Folder inside the archive to add under
        #[arg(short = 'd', long, default_value = "/")]
        dest: String,

        /// Store without compression
        #[arg(long)]
        plain: bool,

        /// Split compressed entries into chunks of this many bytes
        #[arg(long)]
        chunk_size: Option<usize>,
    },

    /// Remove entries (alias: rm)
    #[command(alias = "rm")]
    Remove {
        /// Archive file to modify
        archive: PathBuf,

        /// Entry paths to remove
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Rename an entry or a folder (alias: mv)
    #[command(alias = "mv")]
    Move {
        /// Archive file to modify
        archive: PathBuf,

        /// Current entry or folder path
        from: String,

        /// New entry or folder path
        to: String,

        /// Move every entry under FROM
        #[arg(long)]
        folder: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OverwriteMode {
    Always,
    Never,
    Error,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::New { archive, force } => commands::new(&archive, force, cli.quiet),

        Commands::List { archive, technical } => {
            commands::list(&archive, technical, cli.format)
        }

        Commands::Info { archive } => commands::info(&archive, cli.format),

        Commands::Extract {
            archive,
            output,
            overwrite,
            no_verify,
        } => commands::extract(&commands::ExtractConfig {
            archive_path: &archive,
            output_dir: &output,
            overwrite,
            verify: !no_verify,
            format: cli.format,
        }),

        Commands::Test { archive } => commands::test(&archive, cli.format),

        Commands::Add {
            archive,
            files,
            dest,
            plain,
            chunk_size,
        } => commands::add(&commands::AddConfig {
            archive_path: &archive,
            files: &files,
            dest: &dest,
            plain,
            chunk_size,
            quiet: cli.quiet,
        }),

        Commands::Remove { archive, paths } => commands::remove(&archive, &paths, cli.quiet),

        Commands::Move {
            archive,
            from,
            to,
            folder,
        } => commands::rename(&archive, &from, &to, folder, cli.quiet),

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut std::io::stdout());
            ExitCode::Success
        }
    };

    std::process::exit(exit_code.code());
}
