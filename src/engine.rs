//! The engine facade: owns the current rule set, its index, and the
//! projector cache, and exposes the single-block entry points. Bulk passes
//! live in [`crate::batch`].
//!
//! A rule-set swap rebuilds the index and clears the projector cache
//! wholesale. The swap takes `&mut self`, so hosts must serialize reloads
//! against in-flight reads (a read-mostly lock or an atomic pointer swap
//! around the engine both work).

use crate::block_state::BlockState;
use crate::environment::EnvironmentContext;
use crate::evaluate::{find_match, SwapMode};
use crate::project::{project, TargetPropertyCache};
use crate::rule::{RuleIndex, RuleSet, SwapRule};
use log::{debug, info};

#[derive(Debug, Default)]
pub struct SwapEngine {
    pub(crate) rules: RuleSet,
    pub(crate) index: RuleIndex,
    pub(crate) targets: TargetPropertyCache,
}

impl SwapEngine {
    /// An engine with no rules; every evaluation returns `None`.
    pub fn new() -> Self {
        SwapEngine::default()
    }

    pub fn with_rules(rules: RuleSet) -> Self {
        let mut engine = SwapEngine::new();
        engine.load_rule_set(rules);
        engine
    }

    /// Atomically replaces the rule set, rebuilding the index and dropping
    /// cached target property tables.
    pub fn load_rule_set(&mut self, rules: RuleSet) {
        info!(
            "loading rule set: {} rules (hash {:016x})",
            rules.len(),
            rules.content_hash()
        );
        self.index = RuleIndex::build(&rules);
        self.rules = rules;
        self.targets.clear();
    }

    pub fn rule_set(&self) -> &RuleSet {
        &self.rules
    }

    /// The first rule that matches `state` in `env` under `mode`, or `None`.
    pub fn evaluate(
        &self,
        state: &BlockState,
        env: &EnvironmentContext<'_>,
        mode: SwapMode,
    ) -> Option<&SwapRule> {
        find_match(&self.rules, &self.index, state, env, mode)
    }

    /// Builds the replacement state for an already matched rule: the
    /// target's defaults, with properties shared by name keeping the
    /// original's value.
    pub fn project(&self, original: &BlockState, rule: &SwapRule) -> BlockState {
        project(original, rule, &self.targets)
    }

    /// Evaluate and, on a match, build the replacement state.
    pub fn remap(
        &self,
        state: &BlockState,
        env: &EnvironmentContext<'_>,
        mode: SwapMode,
    ) -> Option<BlockState> {
        let rule = self.evaluate(state, env, mode)?;
        let replacement = self.project(state, rule);
        debug!("swapping {} to {} at {}", state, replacement, env.pos);
        Some(replacement)
    }

    /// Replacement for an interactively placed block, if any rule applies.
    pub fn evaluate_placement(
        &self,
        state: &BlockState,
        env: &EnvironmentContext<'_>,
    ) -> Option<BlockState> {
        self.remap(state, env, SwapMode::Placement)
    }

    /// Replacement for a block produced by world generation, if any rule
    /// applies.
    pub fn evaluate_generation(
        &self,
        state: &BlockState,
        env: &EnvironmentContext<'_>,
    ) -> Option<BlockState> {
        self.remap(state, env, SwapMode::Generation)
    }
}
