//! Authoritative farm state and the gameplay rules that mutate it.

pub(crate) mod actions;
pub(crate) mod definitions;
pub(crate) mod growable;
pub(crate) mod growth;
pub(crate) mod inventory;
pub(crate) mod persistence;
pub(crate) mod shop;
pub(crate) mod state;
pub(crate) mod tools;

pub(crate) use definitions::{BuildingKind, CropKind, TreeKind};
pub(crate) use state::{ChunkId, GameState, PlaceableData, CHUNK_SIZE};
pub(crate) use tools::{apply_tool, Tool};
