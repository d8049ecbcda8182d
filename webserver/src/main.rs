//! Learning portal server entry point
//!
//! `serve` (the default) runs the HTTP API; `migrate` and `add-admin` are
//! one-shot administrative commands against the same database.

use clap::{Parser, Subcommand};
use shared::{ProcessId, logging, process_info};
use tokio::signal;

use learning_server::{
    AppServices, Database, ServerConfig, WebServer, WebServerResult, bootstrap,
};

/// Command line arguments, each with a `LEARNING_*` environment fallback
#[derive(Parser, Debug)]
#[command(name = "learning-server")]
#[command(about = "Course, assignment and progress tracking API")]
#[command(version)]
struct Args {
    /// Interface to bind
    #[arg(long, env = "LEARNING_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port for the HTTP API
    #[arg(long, env = "LEARNING_PORT", default_value_t = 8080)]
    port: u16,

    /// SQLite database file, or `:memory:`
    #[arg(long, env = "LEARNING_DB", default_value = "data/learning.db")]
    database: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LEARNING_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Existing account that receives the Admin role at startup
    #[arg(long, env = "LEARNING_SEED_ADMIN_EMAIL")]
    seed_admin_email: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Create or upgrade the database schema and exit
    Migrate,
    /// Create an Admin account, or grant Admin to an existing one
    AddAdmin {
        #[arg(long)]
        email: String,
        #[arg(long)]
        user_name: String,
        #[arg(long)]
        full_name: String,
    },
}

#[tokio::main]
async fn main() -> WebServerResult<()> {
    // .env is optional
    dotenv::dotenv().ok();
    let args = Args::parse();
    let command = args.command.unwrap_or(Command::Serve);

    match command {
        Command::Serve => ProcessId::init_webserver(),
        Command::Migrate | Command::AddAdmin { .. } => ProcessId::init_admin(),
    };
    logging::init_tracing_with_level(Some(&args.log_level));

    let config = ServerConfig::new(
        &args.host,
        args.port,
        &args.database,
        &args.log_level,
        args.seed_admin_email,
    )?;
    process_info!(ProcessId::current(), "🗄️ Opening database {}", config.database);
    let db = Database::open(&config.database)?;

    match command {
        Command::Migrate => {
            logging::log_success(ProcessId::current(), "Database schema is up to date");
            Ok(())
        }
        Command::AddAdmin { email, user_name, full_name } => {
            let services = AppServices::from_database(db);
            let admin =
                bootstrap::add_admin(services.users.as_ref(), &email, &user_name, &full_name).await?;
            logging::log_success(
                ProcessId::current(),
                &format!("{} ({}) is an Admin", admin.email, admin.id),
            );
            Ok(())
        }
        Command::Serve => serve(config, db).await,
    }
}

async fn serve(config: ServerConfig, db: Database) -> WebServerResult<()> {
    let services = AppServices::from_database(db);
    if let Some(email) = &config.seed_admin_email {
        bootstrap::seed_admin(services.users.as_ref(), email).await?;
    }

    let mut webserver = WebServer::new(config.bind_address, services);

    // Set up graceful shutdown
    let shutdown_sender = webserver.get_shutdown_sender();
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                logging::log_shutdown(ProcessId::current(), "Received Ctrl+C signal");
                let _ = shutdown_sender.send(()).await;
            }
            Err(err) => {
                logging::log_error(ProcessId::current(), "Signal handling", &err);
            }
        }
    });

    webserver.run().await?;

    logging::log_success(ProcessId::current(), "WebServer stopped gracefully");
    Ok(())
}
