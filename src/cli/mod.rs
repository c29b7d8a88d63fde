use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::info;

use crate::config;
use crate::database::{PgStore, Store};

#[derive(Parser)]
#[command(name = "course-api")]
#[command(about = "REST API for users and courses")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Port to listen on (overrides PORT / COURSE_API_PORT)")]
        port: Option<u16>,

        #[arg(long, help = "Use a throwaway in-memory store instead of Postgres")]
        memory: bool,
    },

    #[command(about = "Create the users and courses tables if they do not exist")]
    InitDb,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve { port: None, memory: false }) {
        Commands::Serve { port, memory } => serve(port, memory).await,
        Commands::InitDb => init_db().await,
    }
}

async fn init_db() -> anyhow::Result<()> {
    let pg = PgStore::connect(&config::config().database)
        .await
        .context("failed to connect to database")?;
    pg.ensure_schema().await.context("failed to create schema")?;
    pg.close().await;
    Ok(())
}

async fn serve(port: Option<u16>, memory: bool) -> anyhow::Result<()> {
    let config = config::config();
    info!("Starting course API in {:?} mode", config.environment);

    let (store, pg) = if memory {
        info!("Using in-memory store; data is lost on exit");
        (Store::memory(), None)
    } else {
        let pg = PgStore::connect(&config.database)
            .await
            .context("failed to connect to database")?;
        if config.database.create_schema {
            pg.ensure_schema().await.context("failed to create schema")?;
        }
        (Store::postgres(pg.clone()), Some(pg))
    };

    let bind_addr = format!("{}:{}", config.server.host, port.unwrap_or(config.server.port));
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Course API listening on http://{}", bind_addr);

    axum::serve(listener, crate::app(store))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(pg) = pg {
        pg.close().await;
    }
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["course-api"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn serve_flags_parse() {
        let cli = Cli::try_parse_from(["course-api", "serve", "--port", "8080", "--memory"]).unwrap();
        match cli.command {
            Some(Commands::Serve { port, memory }) => {
                assert_eq!(port, Some(8080));
                assert!(memory);
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn init_db_parses() {
        let cli = Cli::try_parse_from(["course-api", "init-db"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::InitDb)));
    }
}
