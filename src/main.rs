// --- Planificador de semestre - Archivo principal ---

use quickplan::config::PlannerConfig;
use quickplan::excel::get_catalog_cached;
use quickplan::{logging, run_server};
use tracing::{error, info};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    logging::init();

    let config = PlannerConfig::from_env().map_err(|e| {
        error!("invalid configuration: {}", e);
        std::io::Error::other(e.to_string())
    })?;

    // La lectura del catálogo (Excel/JSON) es bloqueante
    let catalog_name = config.catalog.clone();
    let catalog = tokio::task::spawn_blocking(move || get_catalog_cached(&catalog_name))
        .await
        .map_err(std::io::Error::other)?
        .map_err(|e| {
            error!(catalog = %config.catalog, "failed to load catalog: {}", e);
            std::io::Error::other(e.to_string())
        })?;

    info!("=== Planificador de semestre (API) === http://{}", config.bind);
    run_server(config, catalog).await
}
