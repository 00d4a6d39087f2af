use crate::utils::error::WorldError;
use crate::world::block_facing::BlockFace;
use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct BlockId(pub u16);

impl BlockId {
    pub const AIR: BlockId = BlockId(0);
    pub const GRASS: BlockId = BlockId(1);
    pub const DIRT: BlockId = BlockId(2);
    pub const STONE: BlockId = BlockId(3);
    pub const GRASS_PLANT: BlockId = BlockId(4);
    pub const LOG: BlockId = BlockId(5);
    pub const LEAVES: BlockId = BlockId(6);
    pub const TORCH: BlockId = BlockId(7);

    pub fn get_id(&self) -> u16 {
        self.0
    }

    pub fn is_air(&self) -> bool {
        *self == Self::AIR
    }
}

impl Display for BlockId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for BlockId {
    fn from(id: u16) -> Self {
        Self(id)
    }
}

/// Texture atlas slots. Slot 0 is unused so that air maps to nothing.
pub mod textures {
    pub const DIRT: u16 = 1;
    pub const GRASS_TOP: u16 = 2;
    pub const STONE: u16 = 3;
    pub const GRASS_SIDE: u16 = 4;
    pub const GRASS_PLANT: u16 = 5;
    pub const LOG_SIDE: u16 = 6;
    pub const LOG_TOP: u16 = 7;
    pub const LEAVES: u16 = 8;
    pub const TORCH: u16 = 9;

    pub const COUNT: u16 = 10;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceTextures {
    pub top: u16,
    pub bottom: u16,
    pub side: u16,
}

impl FaceTextures {
    pub const fn uniform(texture: u16) -> Self {
        Self {
            top: texture,
            bottom: texture,
            side: texture,
        }
    }

    pub fn for_face(&self, face: BlockFace) -> u16 {
        match face {
            BlockFace::Top => self.top,
            BlockFace::Bottom => self.bottom,
            _ => self.side,
        }
    }
}

/// How a block occupies its cell. Solidity follows from the variant:
/// only cubes occlude neighbours and collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Air,
    Cube { textures: FaceTextures },
    Cross { texture: u16 },
}

#[derive(Debug, Clone)]
pub struct BlockDefinition {
    pub id: BlockId,
    pub name: &'static str,
    pub kind: BlockKind,
    pub tint: [u8; 3],
    pub light_emission: u8,
}

impl BlockDefinition {
    pub const fn new(id: BlockId, name: &'static str, kind: BlockKind) -> Self {
        Self {
            id,
            name,
            kind,
            tint: [255, 255, 255],
            light_emission: 0,
        }
    }

    pub const fn with_tint(mut self, tint: [u8; 3]) -> Self {
        self.tint = tint;
        self
    }

    pub const fn with_light(mut self, emission: u8) -> Self {
        self.light_emission = emission;
        self
    }

    pub fn is_solid(&self) -> bool {
        matches!(self.kind, BlockKind::Cube { .. })
    }

    pub fn is_sparse(&self) -> bool {
        matches!(self.kind, BlockKind::Cross { .. })
    }

    pub fn texture(&self, face: BlockFace) -> Option<u16> {
        match self.kind {
            BlockKind::Air => None,
            BlockKind::Cube { textures } => Some(textures.for_face(face)),
            BlockKind::Cross { texture } => Some(texture),
        }
    }
}

static AIR_DEFINITION: BlockDefinition =
    BlockDefinition::new(BlockId::AIR, "air", BlockKind::Air);

/// Catalogue of block kinds, indexed by id. Built once and shared
/// read-only between the generator, the mesher and physics.
#[derive(Debug, Clone)]
pub struct BlockRegistry {
    blocks: Vec<Option<BlockDefinition>>,
    name_to_id: HashMap<&'static str, BlockId>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            blocks: Vec::new(),
            name_to_id: HashMap::new(),
        };
        registry.blocks.push(Some(AIR_DEFINITION.clone()));
        registry.name_to_id.insert(AIR_DEFINITION.name, BlockId::AIR);
        registry
    }

    /// Registry holding every built-in block.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for def in standard_blocks() {
            // Built-in table has unique ids and names.
            let _ = registry.register(def);
        }
        registry
    }

    pub fn register(&mut self, def: BlockDefinition) -> Result<(), WorldError> {
        let index = def.id.0 as usize;
        if self.blocks.get(index).map_or(false, Option::is_some) {
            return Err(WorldError::DuplicateId(def.id.0));
        }
        if self.name_to_id.contains_key(def.name) {
            return Err(WorldError::DuplicateName(def.name.to_string()));
        }
        if self.blocks.len() <= index {
            self.blocks.resize(index + 1, None);
        }
        self.name_to_id.insert(def.name, def.id);
        self.blocks[index] = Some(def);
        Ok(())
    }

    pub fn try_get(&self, id: BlockId) -> Result<&BlockDefinition, WorldError> {
        self.blocks
            .get(id.0 as usize)
            .and_then(Option::as_ref)
            .ok_or(WorldError::UnknownBlock(id.0))
    }

    /// Unknown ids resolve to air.
    pub fn get(&self, id: BlockId) -> &BlockDefinition {
        self.try_get(id).unwrap_or(&AIR_DEFINITION)
    }

    pub fn by_name(&self, name: &str) -> Option<BlockId> {
        self.name_to_id.get(name).copied()
    }

    pub fn is_solid(&self, id: BlockId) -> bool {
        self.get(id).is_solid()
    }

    pub fn is_sparse(&self, id: BlockId) -> bool {
        self.get(id).is_sparse()
    }

    pub fn light_emission(&self, id: BlockId) -> u8 {
        self.get(id).light_emission
    }

    pub fn len(&self) -> usize {
        self.name_to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.name_to_id.is_empty()
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

fn standard_blocks() -> Vec<BlockDefinition> {
    use textures as tex;

    vec![
        BlockDefinition::new(
            BlockId::GRASS,
            "grass",
            BlockKind::Cube {
                textures: FaceTextures {
                    top: tex::GRASS_TOP,
                    bottom: tex::DIRT,
                    side: tex::GRASS_SIDE,
                },
            },
        )
        .with_tint([124, 189, 107]),
        BlockDefinition::new(
            BlockId::DIRT,
            "dirt",
            BlockKind::Cube {
                textures: FaceTextures::uniform(tex::DIRT),
            },
        )
        .with_tint([134, 96, 67]),
        BlockDefinition::new(
            BlockId::STONE,
            "stone",
            BlockKind::Cube {
                textures: FaceTextures::uniform(tex::STONE),
            },
        )
        .with_tint([125, 125, 125]),
        BlockDefinition::new(
            BlockId::GRASS_PLANT,
            "grass_plant",
            BlockKind::Cross {
                texture: tex::GRASS_PLANT,
            },
        )
        .with_tint([96, 160, 64]),
        BlockDefinition::new(
            BlockId::LOG,
            "maple_log",
            BlockKind::Cube {
                textures: FaceTextures {
                    top: tex::LOG_TOP,
                    bottom: tex::LOG_TOP,
                    side: tex::LOG_SIDE,
                },
            },
        )
        .with_tint([102, 76, 51]),
        BlockDefinition::new(
            BlockId::LEAVES,
            "maple_leaves",
            BlockKind::Cube {
                textures: FaceTextures::uniform(tex::LEAVES),
            },
        )
        .with_tint([186, 72, 38]),
        BlockDefinition::new(
            BlockId::TORCH,
            "torch",
            BlockKind::Cross {
                texture: tex::TORCH,
            },
        )
        .with_tint([255, 214, 120])
        .with_light(14),
    ]
}
