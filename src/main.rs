/// The Big IDEA:
/// An ignore file grows one line at a time, and after a while nobody knows
/// which lines still matter. `*.log` shows up twice, `!keep.log` sits above
/// the rule that re-ignores it, `build/*` hides under `build/`.
/// This tool manages the file as an ordered list of rules: add them, delete
/// them, move them next to each other, and let the analyzer point out (and
/// optionally remove) the ones that can never take effect.
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod utils;

#[derive(Parser)]
#[command(name = "git-ignore-rules")]
#[command(about = "Manage your ignore files with ease")]
#[command(version)]
struct Cli {
    /// Settings file (defaults to .git-ignore-rules.toml in the current directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show debug logging from the rule engine
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Flags shared by every command that works on an ignore file.
#[derive(Args, Clone)]
pub struct PathArgs {
    /// The path to your ignore file (defaults to the configured ignore file, usually .gitignore)
    #[arg(long)]
    pub path: Option<PathBuf>,
}

/// Flags shared by every add/delete command.
#[derive(Args, Clone)]
pub struct RuleArgs {
    #[command(flatten)]
    pub target: PathArgs,

    /// Whether the rule ignores the path or re-includes it - either 'include' or 'exclude'
    #[arg(long, default_value = "include")]
    pub action: String,
}

#[derive(Subcommand)]
pub enum RuleCommand {
    /// A single file, e.g. 'build/out'
    File {
        #[command(flatten)]
        args: RuleArgs,
        /// The filepath to the file (repeat for several)
        #[arg(long, required = true)]
        filepath: Vec<String>,
    },
    /// A directory rule
    Directory {
        #[command(flatten)]
        args: RuleArgs,
        /// The name of the directory (repeat for several)
        #[arg(long, required = true)]
        name: Vec<String>,
        /// The mode of the directory - directory, recursive, children, anywhere, root
        #[arg(long)]
        mode: String,
    },
    /// An extension rule, e.g. 'txt'
    Extension {
        #[command(flatten)]
        args: RuleArgs,
        /// The extension (repeat for several)
        #[arg(long, required = true)]
        extension: Vec<String>,
    },
    /// A glob rule, e.g. '.coverage.*'
    Glob {
        #[command(flatten)]
        args: RuleArgs,
        /// The glob pattern (repeat for several)
        #[arg(long, required = true)]
        pattern: Vec<String>,
    },
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new, empty ignore file
    Create {
        #[command(flatten)]
        target: PathArgs,
    },
    /// Add a new rule
    Add {
        #[command(subcommand)]
        rule: RuleCommand,
    },
    /// Delete an existing rule
    Delete {
        #[command(subcommand)]
        rule: RuleCommand,
    },
    /// Manually move a rule before or after another rule
    Move {
        #[command(flatten)]
        target: PathArgs,
        /// The pattern of the rule you're moving
        #[arg(long)]
        source_pattern: String,
        /// The pattern of the rule you'd like to move a rule before or after
        #[arg(long)]
        destination_pattern: String,
        /// The direction of the move - before or after
        #[arg(long)]
        direction: String,
    },
    /// Check if your ignore file has any conflicts, optionally fix them
    Analyze {
        #[command(flatten)]
        target: PathArgs,
        /// Automatically remove rules that conflict
        #[arg(long)]
        fix: bool,
        /// The number of fixes the autofixer will attempt before exiting
        #[arg(long)]
        max: Option<usize>,
    },
    /// List the rules in file order
    List {
        #[command(flatten)]
        target: PathArgs,
    },
    /// Export the rules as structured data
    Export {
        #[command(flatten)]
        target: PathArgs,
        /// File to write the export to
        #[arg(long)]
        output: PathBuf,
        /// Export format - json, yaml or toml
        #[arg(long, default_value = "toml")]
        format: String,
    },
    /// Show the effective settings, or write the defaults
    Config {
        /// Write the default settings file if it does not exist
        #[arg(long)]
        write: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut app = utils::App::load(cli.config)?;

    match cli.command {
        Commands::Create { target } => app.create(target),
        Commands::Add { rule } => app.add(rule),
        Commands::Delete { rule } => app.delete(rule),
        Commands::Move {
            target,
            source_pattern,
            destination_pattern,
            direction,
        } => app.move_rule(target, &source_pattern, &destination_pattern, &direction),
        Commands::Analyze { target, fix, max } => app.analyze(target, fix, max),
        Commands::List { target } => app.list(target),
        Commands::Export {
            target,
            output,
            format,
        } => app.export(target, &output, &format),
        Commands::Config { write } => app.config(write),
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "git_ignore_rules=debug"
    } else {
        "git_ignore_rules=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
