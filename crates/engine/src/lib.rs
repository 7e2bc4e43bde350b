use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod app;
pub mod reconcile;
pub mod storage;

pub use app::{
    rgba_from_hex, run_app, screen_to_world_px, world_to_screen_px, AppError, Camera2D,
    CommandKey, InputAction, InputSnapshot, LoopConfig, LoopMetricsSnapshot, Primitive,
    Renderable, RenderableDesc, RenderableId, Renderer, Rgba, Scene, SceneWorld, Shape,
    Transform, Vec2, Vec3, Viewport, PIXELS_PER_WORLD, SLOW_FRAME_ENV_VAR,
};
pub use reconcile::{
    quantize_growth, reconcile, CacheEntry, CacheTable, CompositeKey, LiveEntity, PositionKey,
    SceneEffect, SceneOp, SyncEffects, GROWTH_BUCKET_RESOLUTION,
};
pub use storage::{remove_file_if_exists, write_bytes_atomic, write_text_atomic};

pub const ROOT_ENV_VAR: &str = "HOMESTEAD_ROOT";

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub root: PathBuf,
    pub cache_dir: PathBuf,
    pub saves_dir: PathBuf,
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to resolve current executable path: {0}")]
    CurrentExe(#[source] std::io::Error),
    #[error("current executable path has no parent directory: {0}")]
    ExeHasNoParent(PathBuf),
    #[error("failed to create directory at {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(
        "HOMESTEAD_ROOT is set but does not point to a valid project root: {path}\n\
A valid root must contain Cargo.toml and crates/."
    )]
    InvalidEnvRoot { path: PathBuf },
    #[error(
        "Could not detect project root by walking upward from executable directory: {start_dir}\n\
Expected a directory containing Cargo.toml and crates/.\n\
Set {env_var} explicitly, for example:\n\
Bash/zsh: export {env_var}=\"/path/to/homestead\""
    )]
    RootNotFound {
        start_dir: PathBuf,
        env_var: &'static str,
    },
}

/// Resolves the project root and makes sure the cache and save directories exist.
pub fn resolve_app_paths() -> Result<AppPaths, StartupError> {
    let root = resolve_root()?;
    let cache_dir = root.join("cache");
    let saves_dir = cache_dir.join("saves");

    fs::create_dir_all(&saves_dir).map_err(|source| StartupError::CreateDir {
        path: saves_dir.clone(),
        source,
    })?;

    Ok(AppPaths {
        root,
        cache_dir,
        saves_dir,
    })
}

fn resolve_root() -> Result<PathBuf, StartupError> {
    match env::var(ROOT_ENV_VAR) {
        Ok(value) => {
            let normalized = normalize_path(&PathBuf::from(value));
            if is_repo_marker(&normalized) {
                Ok(normalized)
            } else {
                Err(StartupError::InvalidEnvRoot { path: normalized })
            }
        }
        Err(env::VarError::NotPresent) => {
            let exe = env::current_exe().map_err(StartupError::CurrentExe)?;
            let exe_dir = exe
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| StartupError::ExeHasNoParent(exe.clone()))?;

            exe_dir
                .ancestors()
                .find(|candidate| is_repo_marker(candidate))
                .map(normalize_path)
                .ok_or_else(|| StartupError::RootNotFound {
                    start_dir: normalize_path(&exe_dir),
                    env_var: ROOT_ENV_VAR,
                })
        }
        Err(source) => Err(StartupError::EnvVar {
            var: ROOT_ENV_VAR,
            source,
        }),
    }
}

fn is_repo_marker(path: &Path) -> bool {
    path.join("Cargo.toml").is_file() && path.join("crates").is_dir()
}

fn normalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
