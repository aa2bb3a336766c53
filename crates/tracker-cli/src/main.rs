mod cmd;
mod home;
mod output;
mod session;
mod tools;

use clap::{Parser, Subcommand};
use cmd::{auth::AuthSubcommand, config::ConfigSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "tracker",
    about = "Read tracker work items as markdown and serve them to AI assistants over MCP",
    version,
    propagate_version = true
)]
struct Cli {
    /// State directory holding config.yaml and credentials.yaml (default: ~/.tracker)
    #[arg(long, global = true, env = "TRACKER_HOME")]
    home: Option<PathBuf>,

    /// Tracker API base URL (overrides base_url in config.yaml)
    #[arg(long, global = true, env = "TRACKER_BASE_URL")]
    base_url: Option<String>,

    /// Session cookie (overrides the stored credentials)
    #[arg(long, global = true, env = "TRACKER_COOKIE", hide_env_values = true)]
    cookie: Option<String>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the MCP tool server on stdio
    Mcp,

    /// Show a work item as markdown, with workflow directives
    Show {
        /// Work item identifier, e.g. LFY-42
        id: String,
    },

    /// Search work items
    Search {
        /// Text to match against titles and identifiers
        keywords: Option<String>,
        /// Restrict to one project (default: default_project)
        #[arg(long)]
        project: Option<String>,
        /// Maximum number of results (default: page_size)
        #[arg(long)]
        limit: Option<u32>,
    },

    /// List projects
    Projects,

    /// List the releases of a project
    Releases {
        /// Project identifier (default: default_project)
        project: Option<String>,
    },

    /// Manage the stored session cookie
    Auth {
        #[command(subcommand)]
        subcommand: AuthSubcommand,
    },

    /// Inspect the configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Mcp => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    // stdout carries MCP frames and command output; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let home = home::resolve_home(cli.home.as_deref())?;
    let Cli {
        base_url,
        cookie,
        json,
        command,
        ..
    } = cli;
    let open = || session::open(&home, base_url.clone(), cookie.as_deref());

    match command {
        Commands::Mcp => cmd::mcp::run(&open()?),
        Commands::Show { id } => cmd::show::run(&open()?, &id, json),
        Commands::Search {
            keywords,
            project,
            limit,
        } => cmd::search::run(&open()?, keywords, project, limit, json),
        Commands::Projects => cmd::projects::run_projects(&open()?, json),
        Commands::Releases { project } => cmd::projects::run_releases(&open()?, project, json),
        Commands::Auth { subcommand } => cmd::auth::run(&home, subcommand, cookie.as_deref(), json),
        Commands::Config { subcommand } => {
            let config = session::load_config(&home, base_url.clone())?;
            cmd::config::run(&config, subcommand, json)
        }
    }
}
