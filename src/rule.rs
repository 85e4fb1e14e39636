//! Swap rules, validated rule sets, and the per-block-type rule index.
//!
//! Rules arrive already parsed (config file handling belongs to the host);
//! this module is responsible for rejecting invalid rules atomically and for
//! answering "which rules could apply to this block type" in order.

use crate::block_state::BlockState;
use log::{debug, info};
use rustc_hash::{FxHashMap, FxHasher};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;
use std::hash::{Hash, Hasher};

fn default_true() -> bool {
    true
}

fn default_probability() -> f32 {
    1.0
}

/// One configured source→target swap with all of its constraints.
///
/// The serde field names (and aliases) match the rule-file vocabulary hosts
/// already use, so existing configs deserialize without a translation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapRule {
    #[serde(rename = "old")]
    pub source: BlockState,
    #[serde(rename = "new")]
    pub target: BlockState,
    /// Whether the rule also fires for interactively placed blocks.
    #[serde(default = "default_true", alias = "replace_placement")]
    pub apply_on_placement: bool,
    /// Inclusive vertical bounds; `None` means the world extreme.
    #[serde(default)]
    pub min_y: Option<i32>,
    #[serde(default)]
    pub max_y: Option<i32>,
    /// Width of the linear probability ramp below `min_y` / above `max_y`.
    #[serde(default, alias = "min_y_buffer_zone")]
    pub min_y_fade: i32,
    #[serde(default, alias = "max_y_buffer_zone")]
    pub max_y_fade: i32,
    /// Base chance the rule fires once every other constraint passes.
    #[serde(default = "default_probability", alias = "block_swap_rand")]
    pub probability: f32,
    /// Match by type alone, ignoring the source state's properties.
    #[serde(default, alias = "ignore_block_properties")]
    pub ignore_variant: bool,
    #[serde(default, alias = "dimensions_whitelist")]
    pub dimension_allow: Vec<SmolStr>,
    #[serde(default, alias = "dimensions_blacklist")]
    pub dimension_deny: Vec<SmolStr>,
    #[serde(default, alias = "biomes_whitelist")]
    pub biome_allow: Vec<SmolStr>,
    #[serde(default, alias = "biomes_blacklist")]
    pub biome_deny: Vec<SmolStr>,
    #[serde(default, alias = "structures_whitelist")]
    pub structure_allow: Vec<SmolStr>,
    #[serde(default, alias = "structures_blacklist")]
    pub structure_deny: Vec<SmolStr>,
    /// Fires only for placement events, never during bulk or generation.
    #[serde(default, alias = "only_replace_placements")]
    pub placement_only: bool,
    /// Excluded from immediate passes; runs in the deferred pass after the
    /// region's generation features have finished.
    #[serde(default, alias = "defer_swap")]
    pub deferred: bool,
}

impl SwapRule {
    /// A rule with defaults everywhere except source and target.
    pub fn new(source: BlockState, target: BlockState) -> Self {
        SwapRule {
            source,
            target,
            apply_on_placement: true,
            min_y: None,
            max_y: None,
            min_y_fade: 0,
            max_y_fade: 0,
            probability: 1.0,
            ignore_variant: false,
            dimension_allow: Vec::new(),
            dimension_deny: Vec::new(),
            biome_allow: Vec::new(),
            biome_deny: Vec::new(),
            structure_allow: Vec::new(),
            structure_deny: Vec::new(),
            placement_only: false,
            deferred: false,
        }
    }

    /// Construction-time validation. Returns the first violation found.
    pub fn validate(&self) -> Result<(), RuleViolation> {
        if self.target.is_air() {
            return Err(RuleViolation::AirTarget(self.target.to_string()));
        }
        if let (Some(min), Some(max)) = (self.min_y, self.max_y) {
            if min > max {
                return Err(RuleViolation::InvertedYRange { min, max });
            }
        }
        if self.min_y_fade < 0 {
            return Err(RuleViolation::NegativeFade(self.min_y_fade));
        }
        if self.max_y_fade < 0 {
            return Err(RuleViolation::NegativeFade(self.max_y_fade));
        }
        if !(0.0..=1.0).contains(&self.probability) {
            return Err(RuleViolation::ProbabilityOutOfRange(self.probability));
        }
        Ok(())
    }
}

impl Hash for SwapRule {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
        self.target.hash(state);
        self.apply_on_placement.hash(state);
        self.min_y.hash(state);
        self.max_y.hash(state);
        self.min_y_fade.hash(state);
        self.max_y_fade.hash(state);
        self.probability.to_bits().hash(state);
        self.ignore_variant.hash(state);
        self.dimension_allow.hash(state);
        self.dimension_deny.hash(state);
        self.biome_allow.hash(state);
        self.biome_deny.hash(state);
        self.structure_allow.hash(state);
        self.structure_deny.hash(state);
        self.placement_only.hash(state);
        self.deferred.hash(state);
    }
}

/// Why a single rule was rejected at load time.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuleViolation {
    #[error("target `{0}` is an air state; swapping a block to air is not supported")]
    AirTarget(String),
    #[error("min_y {min} is greater than max_y {max}")]
    InvertedYRange { min: i32, max: i32 },
    #[error("negative fade width {0}")]
    NegativeFade(i32),
    #[error("probability {0} is outside [0, 1]")]
    ProbabilityOutOfRange(f32),
}

/// Aggregate load-time report: every invalid rule in the offered set, by
/// index. The whole set is rejected; no partial application.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSetError {
    violations: Vec<(usize, RuleViolation)>,
}

impl RuleSetError {
    pub fn violations(&self) -> &[(usize, RuleViolation)] {
        &self.violations
    }
}

impl fmt::Display for RuleSetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rejected rule set ({} invalid)", self.violations.len())?;
        for (index, violation) in &self.violations {
            write!(f, "; rule {}: {}", index, violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for RuleSetError {}

/// An ordered, validated collection of rules. Order is significant: the
/// evaluator returns the first rule that passes all constraints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SwapRule>", into = "Vec<SwapRule>")]
pub struct RuleSet {
    rules: Vec<SwapRule>,
}

impl RuleSet {
    /// Validates every rule and accepts or rejects the set atomically.
    pub fn new(rules: Vec<SwapRule>) -> Result<Self, RuleSetError> {
        let violations: Vec<(usize, RuleViolation)> = rules
            .iter()
            .enumerate()
            .filter_map(|(i, rule)| rule.validate().err().map(|v| (i, v)))
            .collect();
        if !violations.is_empty() {
            return Err(RuleSetError { violations });
        }
        Ok(RuleSet { rules })
    }

    pub fn empty() -> Self {
        RuleSet::default()
    }

    pub fn rules(&self) -> &[SwapRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Content hash identifying this rule-set revision. Regions record the
    /// hash they were processed under so a config change can trigger
    /// re-processing.
    pub fn content_hash(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.rules.len().hash(&mut hasher);
        for rule in &self.rules {
            rule.hash(&mut hasher);
        }
        hasher.finish()
    }
}

impl TryFrom<Vec<SwapRule>> for RuleSet {
    type Error = RuleSetError;

    fn try_from(rules: Vec<SwapRule>) -> Result<Self, Self::Error> {
        RuleSet::new(rules)
    }
}

impl From<RuleSet> for Vec<SwapRule> {
    fn from(set: RuleSet) -> Self {
        set.rules
    }
}

/// Block-type key → ordered candidate rule indices, rebuilt wholesale
/// whenever the rule set is swapped. Lookup for an unknown type returns an
/// empty slice.
#[derive(Debug, Default)]
pub struct RuleIndex {
    by_type: FxHashMap<SmolStr, Vec<usize>>,
}

impl RuleIndex {
    pub fn build(rules: &RuleSet) -> Self {
        let mut by_type: FxHashMap<SmolStr, Vec<usize>> = FxHashMap::default();
        for (i, rule) in rules.rules().iter().enumerate() {
            by_type
                .entry(rule.source.name.clone())
                .or_default()
                .push(i);
            debug!(
                "indexed rule {}: {} -> {}",
                i, rule.source, rule.target
            );
        }
        info!(
            "rule index rebuilt: {} rules across {} block types",
            rules.len(),
            by_type.len()
        );
        RuleIndex { by_type }
    }

    pub fn candidates(&self, block_type: &str) -> &[usize] {
        self.by_type
            .get(block_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
