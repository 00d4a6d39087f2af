use crate::world::chunk_coord::ChunkCoord;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("Chunk not loaded: {0:?}")]
    ChunkNotLoaded(ChunkCoord),

    #[error("Unknown block id: {0}")]
    UnknownBlock(u16),

    #[error("Duplicate block id: {0}")]
    DuplicateId(u16),

    #[error("Duplicate block name: {0}")]
    DuplicateName(String),
}

/// Outcome of a mesh job that did not produce geometry.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MeshError {
    #[error("Mesh job for {coord:?} superseded (issued version {version})")]
    Cancelled { coord: ChunkCoord, version: u64 },
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
