use crate::config::chunksys::{ChunkSysConfig, VerticalRange};
use crate::config::gameplay::GameplayConfig;
use crate::config::worldgen::WorldGenConfig;
use crate::utils::error::ConfigError;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub chunks: ChunkSysConfig,
    pub worldgen: WorldGenConfig,
    pub gameplay: GameplayConfig,
}

impl EngineConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        info!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunks.render_distance < 0 {
            return Err(ConfigError::Invalid(format!(
                "render_distance must not be negative, got {}",
                self.chunks.render_distance
            )));
        }
        match self.chunks.vertical {
            VerticalRange::Band { min_y, max_y } if min_y > max_y => {
                return Err(ConfigError::Invalid(format!(
                    "vertical band is inverted: {min_y} > {max_y}"
                )));
            }
            VerticalRange::Radius(r) if r < 0 => {
                return Err(ConfigError::Invalid(format!(
                    "vertical radius must not be negative, got {r}"
                )));
            }
            _ => {}
        }
        if self.worldgen.lattice_resolution <= 0 {
            return Err(ConfigError::Invalid(
                "lattice_resolution must be positive".to_string(),
            ));
        }
        if self.gameplay.substeps == 0 {
            return Err(ConfigError::Invalid("substeps must be at least 1".to_string()));
        }
        Ok(())
    }
}
