use migration::{Migrator, MigratorTrait};

use crate::{error::Result, settings::Database};

mod error;
mod settings;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = settings::Settings::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "tx_export={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let export = settings.export_config()?;
    let db = connect_database(&settings.server.database).await?;
    let engine = engine::Engine::builder().database(db).build().await?;

    if let Some(path) = &settings.import {
        let file = match std::fs::File::open(path) {
            Ok(file) => file,
            Err(err) => {
                tracing::error!("failed to open {}: {err}", path.display());
                return Err(err.into());
            }
        };
        let report = engine.import_csv(std::io::BufReader::new(file)).await?;
        tracing::info!(
            "loaded {} from {} ({} already stored)",
            report.inserted,
            path.display(),
            report.skipped
        );
    }

    let listener = match tokio::net::TcpListener::bind(settings.listen_addr()).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind {}: {err}", settings.listen_addr());
            return Err(err.into());
        }
    };
    server::run_with_listener(engine, export, listener).await?;

    Ok(())
}

async fn connect_database(config: &Database) -> Result<sea_orm::DatabaseConnection> {
    if *config == Database::Memory {
        tracing::warn!("using an in-memory database, transactions are lost on exit");
    }

    let database = sea_orm::Database::connect(config.url()).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
