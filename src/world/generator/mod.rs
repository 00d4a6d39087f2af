pub mod structures;
pub mod terrain;

pub use structures::{PendingStructure, StructureIndex, StructureKind};
pub use terrain::TerrainGenerator;
