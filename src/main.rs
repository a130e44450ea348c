mod commands;
mod render;
mod utils;

use agenda_core::{AgendaError, CalendarDay, ErrorCategory, TimeOfDay};
use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::Context;
use commands::events::{EventArgs, Window};

#[derive(Parser)]
#[command(name = "agenda")]
#[command(about = "Manage your calendar events and to-do tasks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and remember the session
    Login {
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Create an account
    Signup {
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// List events
    Events {
        /// Only events starting today
        #[arg(long, conflicts_with = "week")]
        today: bool,

        /// Only events in the current week (Monday to Sunday)
        #[arg(long)]
        week: bool,

        #[arg(long)]
        json: bool,
    },
    /// Create an event on one day, or one per day across a range
    New {
        title: String,

        /// First day (YYYY-MM-DD)
        #[arg(long)]
        from: CalendarDay,

        /// Last day, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to: Option<CalendarDay>,

        /// Start time (HH:MM)
        #[arg(short, long)]
        start: Option<TimeOfDay>,

        /// End time (HH:MM)
        #[arg(short, long)]
        end: Option<TimeOfDay>,

        /// Display colour, e.g. "#3f51b5"
        #[arg(long)]
        color: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },
    /// Edit an event's title, times, colour or notes
    Edit {
        id: i64,

        #[arg(long)]
        title: Option<String>,

        #[arg(short, long)]
        start: Option<TimeOfDay>,

        #[arg(short, long)]
        end: Option<TimeOfDay>,

        #[arg(long)]
        color: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete an event
    Delete {
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// List tasks
    Tasks {
        /// Only tasks on this day (YYYY-MM-DD)
        #[arg(long)]
        date: Option<CalendarDay>,

        #[arg(long)]
        json: bool,
    },
    /// Create, edit, toggle or delete a task
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Show events and dated tasks per day, then undated tasks
    Calendar {
        /// First day (YYYY-MM-DD), defaults to this week's Monday
        #[arg(long)]
        from: Option<CalendarDay>,

        /// Last day, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to: Option<CalendarDay>,

        #[arg(long)]
        json: bool,
    },
    /// Show config and session paths, or change the backend
    Config {
        /// Save a new backend URL to the config file
        #[arg(long)]
        backend_url: Option<String>,
    },
}

#[derive(Subcommand)]
enum TaskCommands {
    New {
        title: String,

        /// Day (YYYY-MM-DD); omit for an undated task
        #[arg(long)]
        date: Option<CalendarDay>,
    },
    Edit {
        id: i64,

        #[arg(long)]
        title: Option<String>,

        #[arg(long, conflicts_with = "clear_date")]
        date: Option<CalendarDay>,

        /// Make the task undated
        #[arg(long)]
        clear_date: bool,
    },
    Toggle {
        id: i64,
    },
    Delete {
        id: i64,

        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = Context::load()?;

    let result = run(&ctx, cli.command).await;

    if let Err(e) = &result
        && let Some(err) = e.downcast_ref::<AgendaError>()
    {
        match err.category() {
            ErrorCategory::Auth => anyhow::bail!(
                "Your session has expired.\n\n\
                Log in again with:\n  \
                agenda login"
            ),
            ErrorCategory::Network => anyhow::bail!("{}", err.user_message()),
            ErrorCategory::Validation | ErrorCategory::Local => {}
        }
    }

    result
}

async fn run(ctx: &Context, command: Commands) -> Result<()> {
    match command {
        Commands::Login { email } => commands::auth::login(ctx, email).await,
        Commands::Signup { email } => commands::auth::signup(ctx, email).await,
        Commands::Logout => commands::auth::logout(ctx),
        Commands::Events { today, week, json } => {
            let window = if today {
                Window::Today
            } else if week {
                Window::Week
            } else {
                Window::All
            };
            commands::events::list(ctx, window, json).await
        }
        Commands::New {
            title,
            from,
            to,
            start,
            end,
            color,
            notes,
        } => {
            let args = EventArgs {
                title: Some(title),
                start,
                end,
                color,
                notes,
            };
            commands::events::new(ctx, from, to, args).await
        }
        Commands::Edit {
            id,
            title,
            start,
            end,
            color,
            notes,
        } => {
            let args = EventArgs {
                title,
                start,
                end,
                color,
                notes,
            };
            commands::events::edit(ctx, id, args).await
        }
        Commands::Delete { id, yes } => commands::events::delete(ctx, id, yes).await,
        Commands::Tasks { date, json } => commands::tasks::list(ctx, date, json).await,
        Commands::Task { command } => match command {
            TaskCommands::New { title, date } => commands::tasks::new(ctx, &title, date).await,
            TaskCommands::Edit {
                id,
                title,
                date,
                clear_date,
            } => commands::tasks::edit(ctx, id, title, date, clear_date).await,
            TaskCommands::Toggle { id } => commands::tasks::toggle(ctx, id).await,
            TaskCommands::Delete { id, yes } => commands::tasks::delete(ctx, id, yes).await,
        },
        Commands::Calendar { from, to, json } => commands::calendar::run(ctx, from, to, json).await,
        Commands::Config { backend_url } => commands::config::run(ctx, backend_url),
    }
}
