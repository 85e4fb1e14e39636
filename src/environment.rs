use crate::block_position::BlockPosition;
use smol_str::SmolStr;

/// Default build limits used when the caller doesn't supply its own.
pub const DEFAULT_MIN_BUILD_Y: i32 = -64;
pub const DEFAULT_MAX_BUILD_Y: i32 = 319;

/// Answers whether a position lies inside a generated structure. Optional:
/// callers without structure data (dry runs, pure in-memory tests) simply
/// omit it and structure filters become pass-through.
pub trait StructureQuery {
    fn contains(&self, pos: BlockPosition, structure: &str) -> bool;
}

/// Everything the evaluator needs to know about one position: where it is
/// and what surrounds it. Built fresh per call or per cell, never retained.
#[derive(Clone, Copy)]
pub struct EnvironmentContext<'a> {
    pub dimension: &'a str,
    pub biome: &'a str,
    pub pos: BlockPosition,
    pub structures: Option<&'a dyn StructureQuery>,
    pub min_build_y: i32,
    pub max_build_y: i32,
}

impl<'a> EnvironmentContext<'a> {
    pub fn new(dimension: &'a str, biome: &'a str, pos: BlockPosition) -> Self {
        EnvironmentContext {
            dimension,
            biome,
            pos,
            structures: None,
            min_build_y: DEFAULT_MIN_BUILD_Y,
            max_build_y: DEFAULT_MAX_BUILD_Y,
        }
    }

    pub fn with_structures(mut self, structures: &'a dyn StructureQuery) -> Self {
        self.structures = Some(structures);
        self
    }

    pub fn with_build_height(mut self, min_build_y: i32, max_build_y: i32) -> Self {
        self.min_build_y = min_build_y;
        self.max_build_y = max_build_y;
        self
    }
}

/// Per-cell environment lookups for a bulk pass over one region. Biome
/// queries may be expensive; the batch applier caches them per pass.
pub trait CellEnvironment {
    fn dimension(&self) -> &str;
    fn biome_at(&self, pos: BlockPosition) -> SmolStr;
    fn structures(&self) -> Option<&dyn StructureQuery> {
        None
    }
    fn min_build_y(&self) -> i32 {
        DEFAULT_MIN_BUILD_Y
    }
    fn max_build_y(&self) -> i32 {
        DEFAULT_MAX_BUILD_Y
    }
}

/// A region-wide constant environment: one dimension, one biome, no
/// structures. Enough for hosts whose regions never straddle a biome
/// border, and for tests.
#[derive(Debug, Clone)]
pub struct UniformEnvironment {
    pub dimension: SmolStr,
    pub biome: SmolStr,
    pub min_build_y: i32,
    pub max_build_y: i32,
}

impl UniformEnvironment {
    pub fn new(dimension: impl Into<SmolStr>, biome: impl Into<SmolStr>) -> Self {
        UniformEnvironment {
            dimension: dimension.into(),
            biome: biome.into(),
            min_build_y: DEFAULT_MIN_BUILD_Y,
            max_build_y: DEFAULT_MAX_BUILD_Y,
        }
    }
}

impl CellEnvironment for UniformEnvironment {
    fn dimension(&self) -> &str {
        &self.dimension
    }

    fn biome_at(&self, _pos: BlockPosition) -> SmolStr {
        self.biome.clone()
    }

    fn min_build_y(&self) -> i32 {
        self.min_build_y
    }

    fn max_build_y(&self) -> i32 {
        self.max_build_y
    }
}
