//! First-match-wins rule evaluation.
//!
//! Candidates come from the [`RuleIndex`](crate::rule::RuleIndex) lookup for
//! the block's type and are checked in configuration order, short-circuiting
//! on the first failure per rule. The checks, in order: mode gating, variant
//! match, vertical bounds with fade scaling, position-seeded randomization,
//! then dimension / biome / structure allow-deny filters.
//!
//! Randomization is keyed by the block position, never by call order, so a
//! bulk pass re-run under the same rule set reaches identical accept/reject
//! decisions.

use crate::block_state::BlockState;
use crate::environment::EnvironmentContext;
use crate::rule::{RuleIndex, RuleSet, SwapRule};
use log::trace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use smol_str::SmolStr;

/// The kind of event a rule is being evaluated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwapMode {
    /// World generation producing new blocks.
    Generation,
    /// A player or mechanism placing a single block.
    Placement,
    /// A bulk pass over an already generated region.
    BulkRetro,
    /// The late pass that runs deferred rules only.
    Deferred,
}

pub(crate) fn find_match<'r>(
    rules: &'r RuleSet,
    index: &RuleIndex,
    state: &BlockState,
    env: &EnvironmentContext<'_>,
    mode: SwapMode,
) -> Option<&'r SwapRule> {
    let candidates = index.candidates(&state.name);
    if candidates.is_empty() {
        return None;
    }

    let mut rng = StdRng::seed_from_u64(env.pos.seed());
    for &i in candidates {
        let rule = &rules.rules()[i];
        if !mode_admits(rule, mode) {
            continue;
        }
        if !rule.ignore_variant && !state.satisfies(&rule.source.properties) {
            trace!("rule {}: variant mismatch for {}", i, state);
            continue;
        }

        let probability = vertical_probability(rule, env.pos.y, env.min_build_y, env.max_build_y);
        if probability <= 0.0 {
            trace!("rule {}: outside vertical range at y={}", i, env.pos.y);
            continue;
        }
        // Drawn lazily: certain rules must not consume from the stream.
        if probability < 1.0 && rng.gen::<f32>() > probability {
            trace!("rule {}: probability {} roll failed", i, probability);
            continue;
        }

        if !list_admits(&rule.dimension_allow, &rule.dimension_deny, env.dimension) {
            trace!("rule {}: dimension {} filtered", i, env.dimension);
            continue;
        }
        if !list_admits(&rule.biome_allow, &rule.biome_deny, env.biome) {
            trace!("rule {}: biome {} filtered", i, env.biome);
            continue;
        }
        if !structure_admits(rule, env) {
            trace!("rule {}: structure filter failed at {}", i, env.pos);
            continue;
        }
        return Some(rule);
    }
    None
}

/// Mode gating. Placement fires rules that are placement-only or opted into
/// placement; generation and bulk passes exclude placement-only and deferred
/// rules; the deferred pass fires deferred rules alone.
fn mode_admits(rule: &SwapRule, mode: SwapMode) -> bool {
    match mode {
        SwapMode::Placement => {
            !rule.deferred && (rule.placement_only || rule.apply_on_placement)
        }
        SwapMode::Generation | SwapMode::BulkRetro => !rule.placement_only && !rule.deferred,
        SwapMode::Deferred => !rule.placement_only && rule.deferred,
    }
}

/// Effective firing probability after the vertical gate. Inside the bounds
/// the base probability is untouched; inside a fade band it ramps linearly
/// from 0 at the outer edge to the base value at the bound; everywhere else
/// the result is 0.
fn vertical_probability(rule: &SwapRule, y: i32, world_min_y: i32, world_max_y: i32) -> f32 {
    let min_y = rule.min_y.unwrap_or(world_min_y);
    let max_y = rule.max_y.unwrap_or(world_max_y);
    let mut probability = rule.probability;
    if y < min_y {
        if rule.min_y_fade <= 0 {
            return 0.0;
        }
        let band_start = min_y - rule.min_y_fade;
        if y < band_start {
            return 0.0;
        }
        probability *= (y - band_start) as f32 / rule.min_y_fade as f32;
    } else if y > max_y {
        if rule.max_y_fade <= 0 {
            return 0.0;
        }
        let band_end = max_y + rule.max_y_fade;
        if y > band_end {
            return 0.0;
        }
        probability *= (band_end - y) as f32 / rule.max_y_fade as f32;
    }
    probability
}

/// Empty allow list admits everything; a deny hit always loses, even for an
/// allow-listed value.
fn list_admits(allow: &[SmolStr], deny: &[SmolStr], value: &str) -> bool {
    if !allow.is_empty() && !allow.iter().any(|v| v == value) {
        return false;
    }
    !deny.iter().any(|v| v == value)
}

/// Pass-through when the environment has no structure data.
fn structure_admits(rule: &SwapRule, env: &EnvironmentContext<'_>) -> bool {
    let Some(query) = env.structures else {
        return true;
    };
    if !rule.structure_allow.is_empty()
        && !rule
            .structure_allow
            .iter()
            .any(|s| query.contains(env.pos, s))
    {
        return false;
    }
    !rule
        .structure_deny
        .iter()
        .any(|s| query.contains(env.pos, s))
}
