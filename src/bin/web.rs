//! Ladder web server: REST API for promotion checks, promotions and position repair.
//! Run with: cargo run --bin web
//! Configured from the environment: HOST, PORT, LADDER_DATA, BACKUP_DIR, ROSTER_CSV.

use actix_web::{middleware::Logger, web::Data, App, HttpServer};
use pool_ladder::config::Settings;
use pool_ladder::{api, import, JsonFileStore, LadderService, MemoryStore, PlayerStore};
use std::fs::File;
use std::io;
use std::path::Path;

fn open_service(settings: &Settings) -> io::Result<LadderService> {
    let store: Box<dyn PlayerStore> = match &settings.data_path {
        Some(path) => Box::new(JsonFileStore::open(path).map_err(io::Error::other)?),
        None => {
            log::warn!("LADDER_DATA not set; players are kept in memory only");
            Box::new(MemoryStore::new())
        }
    };
    LadderService::open(store, settings.backup_dir.clone()).map_err(io::Error::other)
}

/// Seed an empty ladder from a CSV roster.
fn import_roster(service: &LadderService, path: &Path) -> io::Result<()> {
    if !service.players().map_err(io::Error::other)?.is_empty() {
        log::info!("Store already has players; skipping import of {}", path.display());
        return Ok(());
    }
    let roster = import::read_roster(File::open(path)?).map_err(io::Error::other)?;
    let written = service
        .import_players(roster.players)
        .map_err(io::Error::other)?;
    log::info!(
        "Imported {} players from {} ({} rows skipped)",
        written,
        path.display(),
        roster.skipped
    );
    Ok(())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let settings = Settings::from_env();
    let service = open_service(&settings)?;
    if let Some(csv) = &settings.roster_csv {
        import_roster(&service, csv)?;
    }

    let state = Data::new(service);
    let bind = (settings.host.clone(), settings.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(api::configure)
    })
    .bind(bind)?
    .run()
    .await
}
