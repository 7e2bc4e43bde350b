use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use homestead_engine::storage::{remove_file_if_exists, write_text_atomic};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::growable::Growable;
use super::state::{GameState, PlaceableData};

pub(crate) const SAVE_VERSION: u32 = 1;
pub(crate) const STORAGE_KEY: &str = "homestead_farm_save";

type SaveLoadResult<T> = Result<T, String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SaveGame {
    save_version: u32,
    storage_key: String,
    saved_at_ms: u64,
    state: GameState,
}

pub(crate) fn save_file_path(saves_dir: &Path) -> PathBuf {
    saves_dir.join(format!("{STORAGE_KEY}.json"))
}

pub(crate) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

/// Writes `state` to `path`. Failures are logged and reported as `false`.
pub(crate) fn save_game(path: &Path, state: &GameState) -> bool {
    match write_save(path, state, now_ms()) {
        Ok(()) => {
            info!(path = %path.display(), "save_written");
            true
        }
        Err(error) => {
            warn!(path = %path.display(), error = %error, "save_failed");
            false
        }
    }
}

/// Reads and validates the save at `path`, with `last_update_ms` moved to
/// now so growth does not jump by the time spent away.
pub(crate) fn load_game(path: &Path) -> Option<GameState> {
    load_game_at(path, now_ms())
}

pub(crate) fn clear_saved_game(path: &Path) -> bool {
    match remove_file_if_exists(path) {
        Ok(removed) => {
            info!(path = %path.display(), removed, "save_cleared");
            true
        }
        Err(error) => {
            warn!(path = %path.display(), error = %error, "save_clear_failed");
            false
        }
    }
}

pub(crate) fn has_saved_game(path: &Path) -> bool {
    path.is_file()
}

fn load_game_at(path: &Path, now_ms: u64) -> Option<GameState> {
    match read_save(path) {
        Ok(save) => {
            let mut state = save.state;
            state.last_update_ms = now_ms;
            info!(
                path = %path.display(),
                saved_at_ms = save.saved_at_ms,
                "save_loaded"
            );
            Some(state)
        }
        Err(error) => {
            warn!(path = %path.display(), error = %error, "load_failed");
            None
        }
    }
}

fn write_save(path: &Path, state: &GameState, saved_at_ms: u64) -> SaveLoadResult<()> {
    let save = SaveGame {
        save_version: SAVE_VERSION,
        storage_key: STORAGE_KEY.to_string(),
        saved_at_ms,
        state: state.clone(),
    };
    let json = serde_json::to_string_pretty(&save)
        .map_err(|error| format!("encode save json: {error}"))?;
    write_text_atomic(path, &json)
        .map_err(|error| format!("write save '{}': {error}", path.display()))
}

fn read_save(path: &Path) -> SaveLoadResult<SaveGame> {
    let raw = fs::read_to_string(path)
        .map_err(|error| format!("read save '{}': {error}", path.display()))?;
    let save = parse_save_game_json(&raw)?;
    validate_save_game(&save)?;
    Ok(save)
}

fn parse_save_game_json(raw: &str) -> SaveLoadResult<SaveGame> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    match serde_path_to_error::deserialize::<_, SaveGame>(&mut deserializer) {
        Ok(save) => Ok(save),
        Err(error) => {
            let path = error.path().to_string();
            let source = error.into_inner();
            if path.is_empty() || path == "." {
                Err(format!("parse save json: {source}"))
            } else {
                Err(format!("parse save json at {path}: {source}"))
            }
        }
    }
}

fn validation_err(path: &str, message: impl Into<String>) -> String {
    format!("validation failed at {path}: {}", message.into())
}

fn expected_actual(path: &str, expected: impl Display, actual: impl Display) -> String {
    validation_err(path, format!("expected {expected}, got {actual}"))
}

fn validate_save_game(save: &SaveGame) -> SaveLoadResult<()> {
    if save.save_version != SAVE_VERSION {
        return Err(expected_actual(
            "save_version",
            SAVE_VERSION,
            save.save_version,
        ));
    }
    if save.storage_key != STORAGE_KEY {
        return Err(expected_actual(
            "storage_key",
            STORAGE_KEY,
            &save.storage_key,
        ));
    }

    let state = &save.state;
    if !state.chunks.iter().any(|chunk| chunk.is_owned) {
        return Err(validation_err("state.chunks", "no owned chunk"));
    }
    for (index, tile) in state.tiles.iter().enumerate() {
        if state.chunk(tile.chunk).is_none() {
            return Err(expected_actual(
                &format!("state.tiles[{index}].chunk"),
                "a known chunk",
                tile.chunk,
            ));
        }
        if let Some(crop) = &tile.crop {
            validate_growable(&format!("state.tiles[{index}].crop.growth"), &crop.growth)?;
        }
    }
    for (index, placeable) in state.placeables.iter().enumerate() {
        if let PlaceableData::Tree(tree) = &placeable.object {
            validate_growable(
                &format!("state.placeables[{index}].object.data.growth"),
                &tree.growth,
            )?;
        }
    }
    Ok(())
}

fn validate_growable(path: &str, growable: &Growable) -> SaveLoadResult<()> {
    if growable.max_stage() == 0 {
        return Err(expected_actual(
            &format!("{path}.max_stage"),
            "at least 1",
            growable.max_stage(),
        ));
    }
    if growable.stage() > growable.max_stage() {
        return Err(expected_actual(
            &format!("{path}.stage"),
            format!("at most {}", growable.max_stage()),
            growable.stage(),
        ));
    }
    if !growable.is_finite() {
        return Err(validation_err(path, "expected finite timings"));
    }
    Ok(())
}
