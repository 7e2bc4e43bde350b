use homestead_engine::{resolve_app_paths, LoopConfig, Scene, StartupError};
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::farm::persistence::save_file_path;
use super::gameplay;

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) scene: Box<dyn Scene>,
}

pub(crate) fn build_app() -> Result<AppWiring, StartupError> {
    init_tracing();
    info!("=== Homestead Startup ===");

    let paths = resolve_app_paths()?;
    let save_path = save_file_path(&paths.saves_dir);
    info!(
        root = %paths.root.display(),
        save_path = %save_path.display(),
        "app_paths_resolved"
    );

    Ok(AppWiring {
        config: LoopConfig::default(),
        scene: gameplay::build_farm_scene(save_path),
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
