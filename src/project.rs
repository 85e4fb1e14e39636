//! State projection: building the replacement state for a matched rule.
//!
//! The result is the rule's target state with its own defaults, except that
//! any property the original block shares with the target (by name) keeps
//! the original's value. An axis-rotated log swapped to another rotatable
//! block keeps its rotation; properties only the original had are dropped.

use crate::block_state::BlockState;
use crate::rule::SwapRule;
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;
use std::sync::{Arc, RwLock};

/// Which property names a target state carries, cached per distinct target.
/// The table is invariant across calls, so it is built lazily on first use
/// and cleared wholesale when the rule set is swapped.
#[derive(Debug, Default)]
pub(crate) struct TargetPropertyCache {
    names: RwLock<FxHashMap<BlockState, Arc<FxHashSet<SmolStr>>>>,
}

impl TargetPropertyCache {
    pub(crate) fn new() -> Self {
        TargetPropertyCache::default()
    }

    pub(crate) fn clear(&self) {
        self.names.write().expect("property cache poisoned").clear();
    }

    fn names_for(&self, target: &BlockState) -> Arc<FxHashSet<SmolStr>> {
        if let Some(names) = self.names.read().expect("property cache poisoned").get(target) {
            return Arc::clone(names);
        }
        let built: Arc<FxHashSet<SmolStr>> = Arc::new(
            target
                .properties
                .iter()
                .map(|(k, _)| k.clone())
                .collect(),
        );
        self.names
            .write()
            .expect("property cache poisoned")
            .entry(target.clone())
            .or_insert(built)
            .clone()
    }
}

pub(crate) fn project(
    original: &BlockState,
    rule: &SwapRule,
    cache: &TargetPropertyCache,
) -> BlockState {
    let shared = cache.names_for(&rule.target);
    let mut result = rule.target.clone();
    for (key, value) in &original.properties {
        if shared.contains(key) {
            result.set_property(key.clone(), value.clone());
        }
    }
    result
}
