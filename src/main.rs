use std::io;
use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use dutchpay::config::{Config, StoreConfig};
use dutchpay::routes;
use dutchpay::store::{GroupStore, MemoryGroupStore, MongoGroupStore};
use log::info;
use simplelog::{ColorChoice, TermLogger, TerminalMode};

#[actix_web::main]
async fn main() -> io::Result<()> {
    let config = Config::env().map_err(io::Error::other)?;
    TermLogger::init(
        config.log_level,
        simplelog::Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .map_err(io::Error::other)?;

    let store: Arc<dyn GroupStore> = match &config.store {
        StoreConfig::Mongo {
            uri,
            database,
            collection,
        } => {
            let store = MongoGroupStore::connect(uri, database, collection)
                .await
                .map_err(io::Error::other)?;
            info!("Connected to MongoDB");
            Arc::new(store)
        }
        StoreConfig::Memory => {
            info!("Using the in-memory store, data is lost on exit");
            Arc::new(MemoryGroupStore::new())
        }
    };
    let store = web::Data::from(store);

    info!("Listening on {}:{}", config.host, config.port);
    HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .wrap(routes::cors())
            .wrap(Logger::default())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
