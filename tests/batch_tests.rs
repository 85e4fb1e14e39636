use blockswap::{
    BlockPosition, BlockState, MemoryRegion, MemoryRegionStore, PassOptions, RegionId, RuleSet,
    SwapEngine, SwapRule, UniformEnvironment,
};

fn stone() -> BlockState {
    BlockState::new("minecraft:stone")
}

fn stone_region() -> MemoryRegion {
    MemoryRegion::filled(
        RegionId::new(0, 0),
        BlockPosition::new(0, 48, 0),
        (16, 32, 16),
        stone(),
    )
}

fn plains() -> UniformEnvironment {
    UniformEnvironment::new("minecraft:overworld", "minecraft:plains")
}

#[test]
fn primary_pass_applies_band_rule_and_reports_changes() {
    let mut rule = SwapRule::new(stone(), BlockState::new("minecraft:dirt"));
    rule.min_y = Some(54);
    rule.max_y = Some(64);
    let engine = SwapEngine::with_rules(RuleSet::new(vec![rule]).unwrap());

    let mut region = stone_region();
    let mut store = MemoryRegionStore::new();
    let report =
        engine.run_primary_pass(&mut region, &plains(), &mut store, PassOptions::default());

    assert!(!report.skipped);
    // Band rows 54..=64 inclusive: 11 layers of 16x16 cells.
    assert_eq!(report.changed_count(), 11 * 16 * 16);
    assert_eq!(
        region.state(BlockPosition::new(8, 60, 8)).unwrap().name,
        "minecraft:dirt"
    );
    assert_eq!(
        region.state(BlockPosition::new(8, 50, 8)).unwrap().name,
        "minecraft:stone"
    );
}

#[test]
fn second_primary_pass_is_a_no_op() {
    let rule = SwapRule::new(stone(), BlockState::new("minecraft:dirt"));
    let engine = SwapEngine::with_rules(RuleSet::new(vec![rule]).unwrap());

    let mut region = stone_region();
    let mut store = MemoryRegionStore::new();
    let first =
        engine.run_primary_pass(&mut region, &plains(), &mut store, PassOptions::default());
    assert!(first.changed_count() > 0);

    let second =
        engine.run_primary_pass(&mut region, &plains(), &mut store, PassOptions::default());
    assert!(second.skipped);
    assert_eq!(second.changed_count(), 0);
}

#[test]
fn rerun_without_bookkeeping_changes_nothing_further() {
    // Idempotence of the sweep itself: even with forced re-evaluation the
    // second run finds every matching cell already swapped.
    let mut rule = SwapRule::new(stone(), BlockState::new("minecraft:dirt"));
    rule.probability = 0.35;
    let engine = SwapEngine::with_rules(RuleSet::new(vec![rule]).unwrap());

    let mut region = stone_region();
    let mut store = MemoryRegionStore::new();
    let first =
        engine.run_primary_pass(&mut region, &plains(), &mut store, PassOptions::default());
    let second = engine.run_primary_pass(
        &mut region,
        &plains(),
        &mut store,
        PassOptions { force: true },
    );

    assert!(first.changed_count() > 0);
    assert_eq!(second.changed_count(), 0);
}

#[test]
fn changed_rule_set_hash_marks_region_stale() {
    let rule = SwapRule::new(stone(), BlockState::new("minecraft:dirt"));
    let mut engine = SwapEngine::with_rules(RuleSet::new(vec![rule]).unwrap());

    let mut region = stone_region();
    let mut store = MemoryRegionStore::new();
    engine.run_primary_pass(&mut region, &plains(), &mut store, PassOptions::default());

    // Same rules: still a no-op.
    let repeat =
        engine.run_primary_pass(&mut region, &plains(), &mut store, PassOptions::default());
    assert!(repeat.skipped);

    // New rule set: region is stale and the pass runs again.
    let next = SwapRule::new(
        BlockState::new("minecraft:dirt"),
        BlockState::new("minecraft:coarse_dirt"),
    );
    engine.load_rule_set(RuleSet::new(vec![next]).unwrap());
    let rerun =
        engine.run_primary_pass(&mut region, &plains(), &mut store, PassOptions::default());
    assert!(!rerun.skipped);
    assert!(rerun.changed_count() > 0);
    assert_eq!(
        region.state(BlockPosition::new(0, 48, 0)).unwrap().name,
        "minecraft:coarse_dirt"
    );
}

#[test]
fn deferred_pass_runs_only_deferred_rules_and_tracks_independently() {
    let immediate = SwapRule::new(stone(), BlockState::new("minecraft:andesite"));
    let mut late = SwapRule::new(
        BlockState::new("minecraft:andesite"),
        BlockState::new("minecraft:diorite"),
    );
    late.deferred = true;
    let engine = SwapEngine::with_rules(RuleSet::new(vec![immediate, late]).unwrap());

    let mut region = stone_region();
    let mut store = MemoryRegionStore::new();

    // Primary pass: stone -> andesite, the deferred rule stays quiet.
    let primary =
        engine.run_primary_pass(&mut region, &plains(), &mut store, PassOptions::default());
    assert_eq!(primary.changed_count(), 16 * 32 * 16);
    assert_eq!(
        region.state(BlockPosition::new(0, 48, 0)).unwrap().name,
        "minecraft:andesite"
    );

    // Deferred pass runs even though the region is marked primary-done.
    let deferred =
        engine.run_deferred_pass(&mut region, &plains(), &mut store, PassOptions::default());
    assert!(!deferred.skipped);
    assert_eq!(deferred.changed_count(), 16 * 32 * 16);
    assert_eq!(
        region.state(BlockPosition::new(0, 48, 0)).unwrap().name,
        "minecraft:diorite"
    );

    // Each pass now considers itself done.
    assert!(engine
        .run_primary_pass(&mut region, &plains(), &mut store, PassOptions::default())
        .skipped);
    assert!(engine
        .run_deferred_pass(&mut region, &plains(), &mut store, PassOptions::default())
        .skipped);
}

#[test]
fn regions_keep_separate_records() {
    let rule = SwapRule::new(stone(), BlockState::new("minecraft:dirt"));
    let engine = SwapEngine::with_rules(RuleSet::new(vec![rule]).unwrap());

    let mut region_a = stone_region();
    let mut region_b = MemoryRegion::filled(
        RegionId::new(1, 0),
        BlockPosition::new(16, 48, 0),
        (16, 32, 16),
        stone(),
    );
    let mut store = MemoryRegionStore::new();

    engine.run_primary_pass(&mut region_a, &plains(), &mut store, PassOptions::default());
    let b = engine.run_primary_pass(&mut region_b, &plains(), &mut store, PassOptions::default());
    assert!(!b.skipped);
    assert!(b.changed_count() > 0);
    assert_eq!(store.len(), 2);
}

#[test]
fn probabilistic_pass_is_reproducible_per_position() {
    let mut rule = SwapRule::new(stone(), BlockState::new("minecraft:dirt"));
    rule.probability = 0.5;
    let engine = SwapEngine::with_rules(RuleSet::new(vec![rule]).unwrap());

    let mut region_a = stone_region();
    let mut region_b = stone_region();
    let mut store_a = MemoryRegionStore::new();
    let mut store_b = MemoryRegionStore::new();

    let a = engine.run_primary_pass(&mut region_a, &plains(), &mut store_a, PassOptions::default());
    let b = engine.run_primary_pass(&mut region_b, &plains(), &mut store_b, PassOptions::default());

    assert_eq!(a.changed, b.changed);
    assert!(a.changed_count() > 0);
    assert!(a.changed_count() < 16 * 32 * 16);
}
