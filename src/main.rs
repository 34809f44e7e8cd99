use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use projects::db::Database;
use projects::shell::Shell;

#[derive(Parser)]
#[command(name = "projects")]
#[command(about = "Track DIY projects, their materials, steps and categories")]
struct Cli {
    /// Path to the SQLite database file
    #[arg(long, global = true, env = "PROJECTS_DB")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive menu
    Shell,
    /// Create the database tables if they do not exist
    Init,
    /// List all projects
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show one project with its materials, steps and categories
    Show {
        /// Project ID
        id: i64,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

/// Initialize tracing on stderr so stdout stays clean for the menu
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "projects=warn".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn default_db_path() -> anyhow::Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "projects")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(dirs.data_dir().join("projects.db"))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let path = match cli.db {
        Some(path) => path,
        None => default_db_path()?,
    };
    let db = Database::open(path.clone())
        .with_context(|| format!("Failed to open database {}", path.display()))?;

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => {
            db.migrate()?;
            let stdin = io::stdin();
            Shell::new(&db, stdin.lock(), io::stdout()).run()?;
        }
        Commands::Init => {
            db.migrate()?;
            println!("Database ready at {}", path.display());
        }
        Commands::List { json } => {
            let projects = db.get_all_projects()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&projects)?);
            } else {
                for project in projects {
                    println!("{:>5}  {}", project.project_id, project.project_name);
                }
            }
        }
        Commands::Show { id, json } => {
            let details = db
                .get_project(id)?
                .ok_or_else(|| anyhow::anyhow!("Project with ID={id} does not exist."))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&details)?);
            } else {
                println!("{details}");
            }
        }
    }

    Ok(())
}
