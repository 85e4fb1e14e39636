//! Rule-driven block state swapping for voxel world generation.
//!
//! Hosts hand the engine an ordered set of [`SwapRule`]s; the engine decides
//! per block whether the first applicable rule fires and what state replaces
//! it, honoring variant matching, vertical fade bands, position-seeded
//! randomization, and dimension/biome/structure allow-deny filters.
//!
//! # Example
//!
//! ```
//! use blockswap::{
//!     BlockPosition, BlockState, EnvironmentContext, RuleSet, SwapEngine, SwapRule,
//! };
//!
//! let mut rule = SwapRule::new(
//!     BlockState::new("minecraft:stone"),
//!     BlockState::new("minecraft:deepslate"),
//! );
//! rule.max_y = Some(0);
//! let engine = SwapEngine::with_rules(RuleSet::new(vec![rule]).unwrap());
//!
//! let env = EnvironmentContext::new(
//!     "minecraft:overworld",
//!     "minecraft:plains",
//!     BlockPosition::new(12, -20, 4),
//! );
//! let swapped = engine.evaluate_generation(&BlockState::new("minecraft:stone"), &env);
//! assert_eq!(swapped, Some(BlockState::new("minecraft:deepslate")));
//! ```
//!
//! Bulk processing (retrofitting existing regions and the late deferred
//! pass) goes through [`SwapEngine::run_primary_pass`] and
//! [`SwapEngine::run_deferred_pass`]; see the [`batch`] module.

pub mod batch;
pub mod block_position;
pub mod block_state;
pub mod engine;
pub mod environment;
pub mod evaluate;
mod project;
pub mod region_state;
pub mod rule;

pub use batch::{MemoryRegion, PassOptions, PassReport, RegionCells};
pub use block_position::BlockPosition;
pub use block_state::{BlockState, ParseBlockStateError};
pub use engine::SwapEngine;
pub use environment::{
    CellEnvironment, EnvironmentContext, StructureQuery, UniformEnvironment,
    DEFAULT_MAX_BUILD_Y, DEFAULT_MIN_BUILD_Y,
};
pub use evaluate::SwapMode;
pub use region_state::{MemoryRegionStore, RegionId, RegionRecord, RegionStateStore};
pub use rule::{RuleIndex, RuleSet, RuleSetError, RuleViolation, SwapRule};
