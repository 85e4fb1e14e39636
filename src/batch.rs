//! Bulk application of the evaluator across whole regions.
//!
//! Two passes exist per region: the primary pass (`BulkRetro`) for
//! retrofits and full redo runs, and the deferred pass that fires only
//! `deferred` rules once the region's generation features have produced
//! their dependent content. Each pass is idempotent against the region's
//! [`RegionRecord`]: re-running under an unchanged rule set is a no-op
//! unless the caller forces it, and a changed rule-set hash marks the
//! record stale so both passes run again.

use crate::block_position::BlockPosition;
use crate::block_state::BlockState;
use crate::engine::SwapEngine;
use crate::environment::{CellEnvironment, EnvironmentContext};
use crate::evaluate::SwapMode;
use crate::region_state::{RegionId, RegionRecord, RegionStateStore};
use log::debug;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

/// Cell access for one region: enumerate positions, read a cell, commit a
/// replacement. The engine never touches cells a rule didn't change.
pub trait RegionCells {
    fn region_id(&self) -> RegionId;
    fn positions(&self) -> Vec<BlockPosition>;
    fn state_at(&self, pos: BlockPosition) -> Option<&BlockState>;
    fn commit(&mut self, pos: BlockPosition, state: BlockState);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PassOptions {
    /// Re-run even if the region is already marked done for this pass under
    /// the current rule set (redo semantics).
    pub force: bool,
}

/// What a pass did: every cell it changed, or `skipped` when the region's
/// record showed nothing to do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    pub changed: Vec<BlockPosition>,
    pub skipped: bool,
}

impl PassReport {
    fn skipped() -> Self {
        PassReport {
            changed: Vec::new(),
            skipped: true,
        }
    }

    pub fn changed_count(&self) -> usize {
        self.changed.len()
    }
}

impl SwapEngine {
    /// Runs the primary (`BulkRetro`) pass over a region and marks it
    /// processed. No-op when the record already shows a completed primary
    /// pass under the current rule-set hash, unless `options.force`.
    pub fn run_primary_pass<R, E, S>(
        &self,
        region: &mut R,
        env: &E,
        store: &mut S,
        options: PassOptions,
    ) -> PassReport
    where
        R: RegionCells,
        E: CellEnvironment,
        S: RegionStateStore,
    {
        let id = region.region_id();
        let hash = self.rules.content_hash();
        let mut record = fresh_if_stale(store.record(id), hash);
        if record.primary_done && !options.force {
            debug!("primary pass skipped for region {}: already processed", id);
            return PassReport::skipped();
        }

        let report = self.sweep(region, env, SwapMode::BulkRetro);
        record.primary_done = true;
        store.update(id, record);
        debug!(
            "primary pass over region {}: {} cells changed",
            id,
            report.changed_count()
        );
        report
    }

    /// Runs the deferred pass, firing only `deferred` rules. Completion is
    /// tracked independently of the primary pass.
    pub fn run_deferred_pass<R, E, S>(
        &self,
        region: &mut R,
        env: &E,
        store: &mut S,
        options: PassOptions,
    ) -> PassReport
    where
        R: RegionCells,
        E: CellEnvironment,
        S: RegionStateStore,
    {
        let id = region.region_id();
        let hash = self.rules.content_hash();
        let mut record = fresh_if_stale(store.record(id), hash);
        if record.deferred_done && !options.force {
            debug!("deferred pass skipped for region {}: already processed", id);
            return PassReport::skipped();
        }

        let report = self.sweep(region, env, SwapMode::Deferred);
        record.deferred_done = true;
        store.update(id, record);
        debug!(
            "deferred pass over region {}: {} cells changed",
            id,
            report.changed_count()
        );
        report
    }

    fn sweep<R, E>(&self, region: &mut R, env: &E, mode: SwapMode) -> PassReport
    where
        R: RegionCells,
        E: CellEnvironment,
    {
        let dimension = env.dimension().to_owned();
        // Biomes repeat across neighboring cells; cache per 4x4x4 biome
        // cell for the duration of this pass.
        let mut biomes: FxHashMap<(i32, i32, i32), SmolStr> = FxHashMap::default();
        let mut changed = Vec::new();

        for pos in region.positions() {
            let Some(state) = region.state_at(pos).cloned() else {
                continue;
            };
            if self.index.candidates(&state.name).is_empty() {
                continue;
            }

            let cell = (pos.x >> 2, pos.y >> 2, pos.z >> 2);
            let biome = biomes
                .entry(cell)
                .or_insert_with(|| env.biome_at(pos))
                .clone();
            let mut ctx = EnvironmentContext::new(&dimension, &biome, pos)
                .with_build_height(env.min_build_y(), env.max_build_y());
            if let Some(query) = env.structures() {
                ctx = ctx.with_structures(query);
            }

            if let Some(rule) = self.evaluate(&state, &ctx, mode) {
                let replacement = self.project(&state, rule);
                if replacement != state {
                    region.commit(pos, replacement);
                    changed.push(pos);
                }
            }
        }

        PassReport {
            changed,
            skipped: false,
        }
    }
}

/// A changed rule set invalidates previous completion; the record restarts
/// under the new hash.
fn fresh_if_stale(record: RegionRecord, hash: u64) -> RegionRecord {
    if record.rule_hash == hash {
        record
    } else {
        RegionRecord {
            rule_hash: hash,
            ..RegionRecord::default()
        }
    }
}

/// A dense in-memory region: a box of cells starting at `origin`. Useful
/// for hosts that stage a chunk copy before committing, and for tests.
#[derive(Debug, Clone)]
pub struct MemoryRegion {
    id: RegionId,
    origin: BlockPosition,
    size: (i32, i32, i32),
    cells: Vec<BlockState>,
}

impl MemoryRegion {
    pub fn filled(
        id: RegionId,
        origin: BlockPosition,
        size: (i32, i32, i32),
        fill: BlockState,
    ) -> Self {
        let volume = (size.0.max(0) as usize) * (size.1.max(0) as usize) * (size.2.max(0) as usize);
        MemoryRegion {
            id,
            origin,
            size,
            cells: vec![fill; volume],
        }
    }

    fn offset(&self, pos: BlockPosition) -> Option<usize> {
        let dx = pos.x - self.origin.x;
        let dy = pos.y - self.origin.y;
        let dz = pos.z - self.origin.z;
        if dx < 0 || dy < 0 || dz < 0 || dx >= self.size.0 || dy >= self.size.1 || dz >= self.size.2
        {
            return None;
        }
        Some(((dy * self.size.2 + dz) * self.size.0 + dx) as usize)
    }

    pub fn state(&self, pos: BlockPosition) -> Option<&BlockState> {
        self.offset(pos).map(|i| &self.cells[i])
    }

    pub fn set_state(&mut self, pos: BlockPosition, state: BlockState) {
        if let Some(i) = self.offset(pos) {
            self.cells[i] = state;
        }
    }
}

impl RegionCells for MemoryRegion {
    fn region_id(&self) -> RegionId {
        self.id
    }

    fn positions(&self) -> Vec<BlockPosition> {
        let mut out = Vec::with_capacity(self.cells.len());
        for y in 0..self.size.1 {
            for z in 0..self.size.2 {
                for x in 0..self.size.0 {
                    out.push(BlockPosition::new(
                        self.origin.x + x,
                        self.origin.y + y,
                        self.origin.z + z,
                    ));
                }
            }
        }
        out
    }

    fn state_at(&self, pos: BlockPosition) -> Option<&BlockState> {
        self.state(pos)
    }

    fn commit(&mut self, pos: BlockPosition, state: BlockState) {
        self.set_state(pos, state);
    }
}
