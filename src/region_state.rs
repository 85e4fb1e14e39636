//! Per-region bookkeeping for idempotent bulk passes.
//!
//! Each region records the rule-set hash it was last processed under and
//! which passes have completed. Persistence belongs to the host (chunk
//! saved-data, a sidecar file, whatever fits); this module only defines the
//! record, the store interface, and an in-memory store for hosts and tests.

use crate::block_position::BlockPosition;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one region (chunk-equivalent) by its region coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegionId {
    pub x: i32,
    pub z: i32,
}

impl RegionId {
    pub fn new(x: i32, z: i32) -> Self {
        RegionId { x, z }
    }

    /// The region containing a block position, for 16×16 column regions.
    pub fn containing(pos: BlockPosition) -> Self {
        RegionId {
            x: pos.x >> 4,
            z: pos.z >> 4,
        }
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.z)
    }
}

/// What has been done to a region, and under which rule-set revision.
/// Primary and deferred completion are tracked independently: a region can
/// have finished its primary pass while its deferred pass is still pending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRecord {
    pub rule_hash: u64,
    pub primary_done: bool,
    pub deferred_done: bool,
}

/// Load/update access to region records. The default record (nothing done)
/// stands in for regions never seen before.
pub trait RegionStateStore {
    fn record(&self, region: RegionId) -> RegionRecord;
    fn update(&mut self, region: RegionId, record: RegionRecord);
}

/// In-memory store. Serializable so a host can persist it wholesale between
/// sessions if it has no native saved-data mechanism.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryRegionStore {
    records: FxHashMap<RegionId, RegionRecord>,
}

impl MemoryRegionStore {
    pub fn new() -> Self {
        MemoryRegionStore::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RegionStateStore for MemoryRegionStore {
    fn record(&self, region: RegionId) -> RegionRecord {
        self.records.get(&region).copied().unwrap_or_default()
    }

    fn update(&mut self, region: RegionId, record: RegionRecord) {
        self.records.insert(region, record);
    }
}
