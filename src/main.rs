use actix_files::Files;
use actix_web::{middleware, web, App, HttpServer};
use agent_workbench::config::Config;
use agent_workbench::cors::renderer_cors;
use agent_workbench::settings::JsonFileStore;
use agent_workbench::state::AppState;
use log::{info, warn};
use rustls::ServerConfig;
use rustls_pemfile::{certs, pkcs8_private_keys};
use std::fs::File as FsFile;
use std::io::{self, BufReader};
use std::path::Path;

fn load_tls_config(cert_path: &Path, key_path: &Path) -> io::Result<ServerConfig> {
    let cert_file = &mut BufReader::new(FsFile::open(cert_path)?);
    let key_file = &mut BufReader::new(FsFile::open(key_path)?);
    let cert_chain = certs(cert_file).collect::<Result<Vec<_>, _>>()?;
    let mut keys = pkcs8_private_keys(key_file).collect::<Result<Vec<_>, _>>()?;

    if keys.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::Other,
            "No private keys found in key file",
        ));
    }

    ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(cert_chain, keys.remove(0).into())
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    info!("Loading settings from {}", config.settings_path.display());
    let storage = JsonFileStore::open(&config.settings_path)?;
    let state = web::Data::new(AppState::new(Box::new(storage), config.event_capacity));

    let addr = config.bind_address();
    let static_dir = config.static_dir.clone();
    if let Some(dir) = &static_dir {
        info!("Serving renderer bundle from {}", dir.display());
    }

    let cors_config = config.clone();
    let mut http_server = HttpServer::new(move || {
        let mut app = App::new()
            .app_data(state.clone())
            .wrap(renderer_cors(&cors_config))
            .wrap(middleware::Logger::default())
            .configure(agent_workbench::configure);
        if let Some(dir) = &static_dir {
            app = app.service(Files::new("/", dir).index_file("index.html"));
        }
        app
    });

    match (&config.cert_path, &config.key_path) {
        (Some(cert_path), Some(key_path)) if cert_path.exists() && key_path.exists() => {
            info!("Attempting to start HTTPS server...");
            let tls = load_tls_config(cert_path, key_path)?;
            info!("Successfully configured TLS. Binding to https://{}", addr);
            http_server = http_server.bind_rustls_0_23(addr, tls)?;
        }
        (Some(_), Some(_)) => {
            warn!("CERT_PATH or KEY_PATH points to a non-existent file. Starting without HTTPS.");
            info!("Server running at http://{}", addr);
            http_server = http_server.bind(addr)?;
        }
        _ => {
            info!("No CERT_PATH or KEY_PATH configured. Server running at http://{}", addr);
            http_server = http_server.bind(addr)?;
        }
    }

    http_server.run().await
}
