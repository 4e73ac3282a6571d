//! Proxylint CLI
//!
//! Command-line interface for linting Dev Proxy configuration files

mod commands;
mod files;
mod output;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use proxylint_core::init_tracing;
use std::path::PathBuf;
use tracing::error;

#[derive(Parser)]
#[command(name = "proxylint")]
#[command(about = "Proxylint: diagnostics and quick fixes for Dev Proxy configuration files")]
#[command(version = proxylint_core::VERSION)]
#[command(
    long_about = "Proxylint checks Dev Proxy configuration files (devproxyrc.json and friends)\n\
for plugin, schema and config section problems, and fixes the common ones.\n\
\n\
Examples:\n  \
proxylint lint                          # Lint Dev Proxy files under the current directory\n  \
proxylint lint --fix devproxyrc.json    # Lint and apply safe fixes\n  \
proxylint fix devproxyrc.json --code missingLanguageModel --write\n  \
proxylint rules                         # List all rules\n  \
proxylint config init                   # Create .proxylintrc.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    global: GlobalArgs,
}

/// Options shared by every subcommand
#[derive(clap::Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        help = "Path to configuration file (.proxylintrc.json)"
    )]
    pub config: Option<PathBuf>,

    /// Installed Dev Proxy version
    #[arg(
        long,
        global = true,
        env = "PROXYLINT_PROXY_VERSION",
        help = "Dev Proxy version to lint against (overrides the config file)"
    )]
    pub proxy_version: Option<String>,

    /// Installed Dev Proxy is a beta build
    #[arg(long, global = true, help = "Treat the Dev Proxy install as a beta build")]
    pub beta: bool,

    /// Ask the installed `devproxy` for its version
    #[arg(
        long,
        global = true,
        conflicts_with = "proxy_version",
        help = "Detect the version by running 'devproxy --version'"
    )]
    pub detect_version: bool,

    /// Skip remote schema validation of config sections
    #[arg(long, global = true, help = "Do not fetch config section schemas")]
    pub no_remote_schemas: bool,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Lint Dev Proxy configuration and data files
    #[command(alias = "check")]
    Lint {
        /// Files or directories to lint
        #[arg(help = "Files or directories to process (default: current directory)")]
        paths: Vec<PathBuf>,

        /// Output format
        #[arg(
            short,
            long,
            default_value = "human",
            help = "Output format for diagnostics"
        )]
        format: OutputFormat,

        /// Apply safe fixes in place
        #[arg(long, help = "Apply safe fixes and write them to the files")]
        fix: bool,
    },

    /// Apply the quick fix for one diagnostic
    Fix {
        /// File to fix
        file: PathBuf,

        /// Diagnostic code to fix, e.g. missingLanguageModel
        #[arg(long)]
        code: String,

        /// 1-based line of the diagnostic
        #[arg(long, requires = "character")]
        line: Option<u32>,

        /// 1-based character of the diagnostic
        #[arg(long, requires = "line")]
        character: Option<u32>,

        /// Write the result back instead of printing it
        #[arg(long)]
        write: bool,
    },

    /// List the built-in rules
    Rules {
        /// Show the codes each rule emits
        #[arg(long, help = "Show detailed information for each rule")]
        detailed: bool,
    },

    /// Configuration file management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Run the language server over stdio
    Lsp,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Initialize a new configuration file
    Init {
        /// Directory to create the file in
        #[arg(help = "Target directory (default: current directory)")]
        dir: Option<PathBuf>,

        /// Overwrite existing configuration file
        #[arg(long, help = "Overwrite existing configuration file")]
        force: bool,
    },

    /// Print the JSON Schema of the configuration file
    Schema,

    /// Show the resolved configuration
    Show,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output with colors
    Human,
    /// JSON format for programmatic consumption
    Json,
}

fn main() {
    let cli = Cli::parse();

    // Initialize colored output
    if cli.global.no_color || std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    }

    // Logs go to stderr; the language server keeps stdout for the protocol
    let log_level = match cli.global.verbose {
        0 => "proxylint=warn",
        1 => "proxylint=info",
        2 => "proxylint=debug",
        _ => "proxylint=trace",
    };
    if std::env::var("RUST_LOG").is_err() {
        // SAFETY: the runtime is not started yet, so no other thread exists
        unsafe {
            std::env::set_var("RUST_LOG", log_level);
        }
    }
    init_tracing();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("error: failed to start the async runtime: {e}");
            std::process::exit(2);
        }
    };

    match runtime.block_on(run_command(cli)) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("proxylint failed: {:#}", e);
            eprintln!("error: {e:#}");
            std::process::exit(2);
        }
    }
}

async fn run_command(cli: Cli) -> anyhow::Result<i32> {
    let global = cli.global;
    match cli.command {
        Some(Commands::Lint { paths, format, fix }) => {
            let paths = if paths.is_empty() {
                vec![PathBuf::from(".")]
            } else {
                paths
            };
            commands::lint_command(paths, format, fix, &global).await
        }

        Some(Commands::Fix {
            file,
            code,
            line,
            character,
            write,
        }) => {
            let position = line.zip(character);
            commands::fix::fix_command(file, &code, position, write, &global).await
        }

        Some(Commands::Rules { detailed }) => commands::rules_command(detailed),

        Some(Commands::Config { action }) => match action {
            ConfigAction::Init { dir, force } => commands::config::init_command(dir, force),
            ConfigAction::Schema => commands::config::schema_command(),
            ConfigAction::Show => commands::config::show_command(&global),
        },

        Some(Commands::Lsp) => commands::lsp_command(&global).await,

        None => {
            // No subcommand provided, show help
            let mut cmd = Cli::command();
            cmd.print_help()?;
            Ok(0)
        }
    }
}
