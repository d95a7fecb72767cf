mod commands;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use legends_core::Planner;
use legends_core::config::LegendsConfig;
use legends_core::store::PlannerStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "legends")]
#[command(about = "Mark your free half-hours and find time that works for every legend")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List known legends
    Users,
    /// Start editing, optionally switching to another legend first
    Edit {
        /// Legend id to edit as
        user: Option<String>,
    },
    /// Toggle slots in the working selection (e.g. "2-28" for Wed 14:00)
    Toggle {
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Commit the working selection
    Save,
    /// Throw away edits since the last save
    Reset {
        /// Don't ask for confirmation
        #[arg(short, long)]
        force: bool,
    },
    /// Show the editing session and roster
    Status,
    /// Draw the week with your selection and the roster overlay
    Grid {
        /// First hour to show
        #[arg(long, default_value_t = 8)]
        from: u8,

        /// Last hour to show (exclusive)
        #[arg(long, default_value_t = 22)]
        to: u8,
    },
    /// Manage legends picked for comparison
    Roster {
        #[command(subcommand)]
        action: RosterAction,
    },
    /// Register a new legend
    NewLegend { name: String },
    /// Drop a legend's availability and roster membership
    Remove {
        user: String,

        /// Don't ask for confirmation
        #[arg(short, long)]
        force: bool,
    },
    /// Who on the roster is free in a slot
    Free { key: String },
    /// Match users from external apps (JSON file) against known legends
    MatchExternal {
        file: PathBuf,

        /// Put matched legends on the roster
        #[arg(long)]
        select: bool,
    },
    /// Apply a remote update (JSON file) received from another client
    Apply { file: PathBuf },
    /// Print and clear local writes waiting to be replicated
    Outbox {
        /// Print without clearing
        #[arg(long)]
        keep: bool,
    },
    /// Print the full planner state as JSON
    Dump,
}

#[derive(Subcommand)]
enum RosterAction {
    Add { users: Vec<String> },
    Remove { users: Vec<String> },
    Toggle { user: String },
    List,
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let config = LegendsConfig::load()?;
    let store = PlannerStore::new(config.data_path());
    let mut planner = store.load_or_init(&config)?;

    let changed = run(cli.command, &mut planner)?;

    if changed {
        store.save(&planner.snapshot())?;
    }

    Ok(())
}

/// Dispatch a command. Returns whether the planner state changed.
fn run(command: Commands, planner: &mut Planner) -> Result<bool> {
    match command {
        Commands::Users => commands::users::run(planner).map(|_| false),
        Commands::Edit { user } => commands::edit::run(planner, user.as_deref()).map(|_| true),
        Commands::Toggle { keys } => commands::edit::toggle(planner, &keys).map(|_| true),
        Commands::Save => commands::edit::save(planner),
        Commands::Reset { force } => commands::edit::reset(planner, force),
        Commands::Status => commands::status::run(planner).map(|_| false),
        Commands::Grid { from, to } => commands::grid::run(planner, from, to).map(|_| false),
        Commands::Roster { action } => match action {
            RosterAction::Add { users } => commands::roster::add(planner, &users).map(|_| true),
            RosterAction::Remove { users } => {
                commands::roster::remove(planner, &users).map(|_| true)
            }
            RosterAction::Toggle { user } => {
                commands::roster::toggle(planner, &user).map(|_| true)
            }
            RosterAction::List => commands::roster::list(planner).map(|_| false),
        },
        Commands::NewLegend { name } => commands::users::new_legend(planner, &name).map(|_| true),
        Commands::Remove { user, force } => commands::users::remove(planner, &user, force),
        Commands::Free { key } => commands::grid::free(planner, &key).map(|_| false),
        Commands::MatchExternal { file, select } => {
            commands::sync::match_external(planner, &file, select).map(|_| select)
        }
        Commands::Apply { file } => commands::sync::apply(planner, &file).map(|_| true),
        Commands::Outbox { keep } => commands::sync::outbox(planner, keep).map(|_| !keep),
        Commands::Dump => commands::sync::dump(planner).map(|_| false),
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "legends=warn,legends_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
