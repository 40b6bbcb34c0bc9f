//! Noted CLI - address-keyed notes over an embedded SQLite store

use clap::{Parser, Subcommand};
use noted::config::{self, NotedConfig};
use noted::registry;
use noted::storage::NotesProvider;
use noted::ui::{self, Icons};
use noted::uri::NoteUri;
use noted::NoteValues;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "noted")]
#[command(version = "0.1.0")]
#[command(about = "Address-keyed notes store over an embedded SQLite database")]
#[command(long_about = r#"
Noted keeps notes in an embedded SQLite database and addresses them
through a URI scheme:
  • noted://notes          the whole collection
  • noted://notes/<id>     one note by identifier

Example usage:
  noted init
  noted add --title "Groceries" --content "milk, eggs"
  noted list --where "title = ?" --args Groceries --sort "title ASC"
  noted type noted://notes/1
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the config file and database directory
    Init {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },

    /// Add a note at the collection address
    Add {
        /// Note title
        #[arg(short, long)]
        title: String,

        /// Note body
        #[arg(short, long)]
        content: String,

        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// List notes at the collection address
    List {
        /// Row filter with ? placeholders (e.g. "title = ?")
        #[arg(short = 'w', long = "where")]
        filter: Option<String>,

        /// Values bound to the filter placeholders
        #[arg(short, long)]
        args: Vec<String>,

        /// Sort order (e.g. "title ASC")
        #[arg(short, long)]
        sort: Option<String>,

        /// Columns to project (defaults to all)
        #[arg(short, long)]
        columns: Vec<String>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Show one note by identifier
    Show {
        /// Note identifier
        id: i64,

        /// Columns to project (defaults to all)
        #[arg(short, long)]
        columns: Vec<String>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Edit one note by identifier
    Edit {
        /// Note identifier
        id: i64,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        /// New body
        #[arg(short = 'c', long)]
        content: Option<String>,

        /// Extra row filter ANDed with the identifier (e.g. "title = ?")
        #[arg(short = 'w', long = "where")]
        filter: Option<String>,

        /// Values bound to the filter placeholders
        #[arg(short, long)]
        args: Vec<String>,

        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Remove one note by identifier, or filtered notes with --all
    Rm {
        /// Note identifier
        id: Option<i64>,

        /// Address the whole collection instead of one note
        #[arg(long)]
        all: bool,

        /// Row filter with ? placeholders (e.g. "title = ?")
        #[arg(short = 'w', long = "where")]
        filter: Option<String>,

        /// Values bound to the filter placeholders
        #[arg(short, long)]
        args: Vec<String>,

        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Print the content type advertised for an address
    Type {
        /// Address string (e.g. noted://notes/1)
        address: String,
    },
}

fn main() {
    if let Err(err) = run() {
        ui::error(&format!("{err:#}"));
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Init { database, force } => {
            ui::header("noted");

            let config_path = config::default_config_path();
            if force && config_path.exists() {
                ui::warn("overwriting existing config");
            }
            let db_path = database
                .unwrap_or_else(|| config::default_database_path_in(Path::new(".")));

            let cfg = NotedConfig {
                database: Some(db_path.display().to_string()),
            };
            config::write_config(&config_path, &cfg, force)?;
            config::ensure_db_dir(&db_path)?;
            config::ensure_gitignore(Path::new("."))?;
            NotesProvider::open(&db_path)?;

            ui::success("initialized notes store");
            ui::info("config", &config_path.display().to_string());
            ui::status(Icons::DATABASE, "database", &db_path.display().to_string());
        }

        Commands::Add {
            title,
            content,
            database,
        } => {
            let provider = open_provider(database)?;
            let rx = provider.subscribe();

            let values = NoteValues::new().with_title(title).with_content(content);
            let item = provider.insert(&registry::collection_uri(), &values)?;

            ui::success(&format!("added note {item}"));
            if let Ok(changed) = rx.try_recv() {
                ui::notified(&changed.to_uri_string());
            }
        }

        Commands::List {
            filter,
            args,
            sort,
            columns,
            format,
            database,
        } => {
            let provider = open_provider(database)?;
            let collection = registry::collection_uri();

            let projected: Vec<&str> = columns.iter().map(String::as_str).collect();
            let projection = if projected.is_empty() {
                None
            } else {
                Some(projected.as_slice())
            };
            let filter_args: Vec<&str> = args.iter().map(String::as_str).collect();

            let mut cursor = provider.query(
                &collection,
                projection,
                filter.as_deref(),
                &filter_args,
                sort.as_deref(),
            )?;
            let headers = cursor.columns().to_vec();
            let mut rows = Vec::new();
            for row in cursor.rows()? {
                rows.push(row?);
            }

            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if rows.is_empty() {
                println!("{}", ui::muted("no notes"));
            } else {
                println!("{}", ui::notes_table(&headers, &rows));
                ui::summary_row("total", &format!("{} note(s)", rows.len()));
            }
        }

        Commands::Show {
            id,
            columns,
            format,
            database,
        } => {
            let provider = open_provider(database)?;
            let item = registry::item_uri(id);

            let projected: Vec<&str> = columns.iter().map(String::as_str).collect();
            let projection = if projected.is_empty() {
                None
            } else {
                Some(projected.as_slice())
            };

            let mut cursor = provider.query(&item, projection, None, &[], None)?;
            let headers = cursor.columns().to_vec();
            let mut rows = Vec::new();
            for row in cursor.rows()? {
                rows.push(row?);
            }

            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if rows.is_empty() {
                println!("{}", ui::muted(&format!("note {id} not found")));
            } else {
                println!("{}", ui::notes_table(&headers, &rows));
            }
        }

        Commands::Edit {
            id,
            title,
            content,
            filter,
            args,
            database,
        } => {
            let provider = open_provider(database)?;
            let rx = provider.subscribe();

            let mut values = NoteValues::new();
            if let Some(title) = title {
                values = values.with_title(title);
            }
            if let Some(content) = content {
                values = values.with_content(content);
            }
            let filter_args: Vec<&str> = args.iter().map(String::as_str).collect();

            let item = registry::item_uri(id);
            let affected = provider.update(&item, &values, filter.as_deref(), &filter_args)?;

            ui::success(&format!("updated {affected} note(s)"));
            if let Ok(changed) = rx.try_recv() {
                ui::notified(&changed.to_uri_string());
            }
        }

        Commands::Rm {
            id,
            all,
            filter,
            args,
            database,
        } => {
            let uri = match (id, all) {
                (Some(id), false) => registry::item_uri(id),
                (None, true) => registry::collection_uri(),
                (Some(_), true) => anyhow::bail!("pass either a note id or --all, not both"),
                (None, false) => anyhow::bail!("pass a note id or --all"),
            };

            let provider = open_provider(database)?;
            let rx = provider.subscribe();
            let filter_args: Vec<&str> = args.iter().map(String::as_str).collect();

            let removed = provider.delete(&uri, filter.as_deref(), &filter_args)?;

            ui::status(Icons::TRASH, "removed", &format!("{removed} note(s)"));
            if let Ok(changed) = rx.try_recv() {
                ui::notified(&changed.to_uri_string());
            }
        }

        Commands::Type { address } => {
            let uri = NoteUri::parse(&address)?;
            let shape = registry::resolve(&uri)?;
            println!("{}", shape.content_type());
        }
    }

    Ok(())
}

/// Open the store at the explicit path, the configured path, or the
/// default location, creating the parent directory when missing.
fn open_provider(database: Option<PathBuf>) -> anyhow::Result<NotesProvider> {
    let config = config::load_config(None)?;
    let path = config::resolve_database_path(database.as_deref(), config.as_ref());
    config::ensure_db_dir(&path)?;
    Ok(NotesProvider::open(&path)?)
}
