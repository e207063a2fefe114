use super::*;
use crate::effect::config::{ConfigMap, ConfigValue};

fn primary_draft(name: &str) -> EffectDraft {
    EffectDraft::new(EffectKind::Primary, name, "fx.primary")
}

fn secondary_draft(name: &str) -> EffectDraft {
    EffectDraft::new(EffectKind::Secondary, name, "fx.secondary")
}

fn keyframe_draft(name: &str) -> EffectDraft {
    EffectDraft::new(EffectKind::Keyframe, name, "fx.keyframe")
}

fn config(entries: &[(&str, f64)]) -> ConfigMap {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), ConfigValue::Number(*v)))
        .collect()
}

#[test]
fn add_assigns_fresh_id_and_appends() {
    let mut store = EffectStore::new();
    let a = store.add(primary_draft("Glow")).unwrap();
    let b = store.add(primary_draft("Flare")).unwrap();

    assert_ne!(a.id, b.id);
    let names: Vec<&str> = store
        .collection()
        .top_level()
        .iter()
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(names, ["Glow", "Flare"]);

    let events = store.drain_events();
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], CollectionEvent::Added { parent: None, .. }));
}

#[test]
fn add_rejects_attached_kinds() {
    let mut store = EffectStore::new();
    let err = store.add(secondary_draft("Blur")).unwrap_err();
    assert!(matches!(err, MintframeError::Structural(_)));
}

#[test]
fn attach_places_effect_under_parent() {
    let mut store = EffectStore::new();
    let parent = store.add(primary_draft("Glow")).unwrap();
    let blur = store
        .attach_secondary(&parent.id, secondary_draft("Blur"))
        .unwrap();
    let pop = store
        .attach_keyframe(&parent.id, keyframe_draft("Pop"), FrameIndex(7))
        .unwrap();

    let stored = store.get(&parent.id).unwrap();
    assert_eq!(stored.secondary_effects[0].id, blur.id);
    assert_eq!(stored.keyframe_effects[0].id, pop.id);
    assert_eq!(stored.keyframe_effects[0].frame, Some(FrameIndex(7)));

    store.drain_events();
}

#[test]
fn attach_to_missing_parent_fails() {
    let mut store = EffectStore::new();
    let err = store
        .attach_secondary(&EffectId::from_raw("ghost"), secondary_draft("Blur"))
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn attach_to_final_effect_is_structural_error() {
    let mut store = EffectStore::new();
    let fin = store
        .add(EffectDraft::new(EffectKind::Final, "Grade", "fx.grade"))
        .unwrap();
    let err = store
        .attach_secondary(&fin.id, secondary_draft("Blur"))
        .unwrap_err();
    assert!(matches!(err, MintframeError::Structural(_)));
}

#[test]
fn update_merges_config_instead_of_replacing() {
    let mut store = EffectStore::new();
    let fx = store
        .add(primary_draft("Glow").with_config(config(&[("radius", 3.0), ("falloff", 0.2)])))
        .unwrap();

    store
        .update(&fx.id, &EffectPatch::config(config(&[("radius", 9.0)])))
        .unwrap();

    let stored = store.get(&fx.id).unwrap();
    assert_eq!(stored.config["radius"].as_number(), Some(9.0));
    assert_eq!(stored.config["falloff"].as_number(), Some(0.2));
}

#[test]
fn update_missing_id_is_not_found() {
    let mut store = EffectStore::new();
    let err = store
        .update(&EffectId::from_raw("gone"), &EffectPatch::new())
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn update_rejects_out_of_range_percent() {
    let mut store = EffectStore::new();
    let fx = store.add(primary_draft("Glow")).unwrap();
    let err = store
        .update(&fx.id, &EffectPatch::new().with_percent_chance(-1.0))
        .unwrap_err();
    assert!(matches!(err, MintframeError::Validation(_)));
}

#[test]
fn update_rejects_frame_on_non_keyframe() {
    let mut store = EffectStore::new();
    let fx = store.add(primary_draft("Glow")).unwrap();
    let err = store
        .update(&fx.id, &EffectPatch::new().with_frame(FrameIndex(4)))
        .unwrap_err();
    assert!(matches!(err, MintframeError::InvalidRecord(_)));
}

#[test]
fn toggle_flips_and_reports_state() {
    let mut store = EffectStore::new();
    let fx = store.add(primary_draft("Glow")).unwrap();
    assert!(!store.toggle_visibility(&fx.id).unwrap());
    assert!(store.toggle_visibility(&fx.id).unwrap());

    let events = store.drain_events();
    assert!(matches!(
        events.last(),
        Some(CollectionEvent::VisibilityChanged { visible: true, .. })
    ));
}

#[test]
fn delete_cascades_over_the_subtree() {
    let mut store = EffectStore::new();
    let parent = store.add(primary_draft("Glow")).unwrap();
    store
        .attach_secondary(&parent.id, secondary_draft("Blur"))
        .unwrap();
    store
        .attach_secondary(&parent.id, secondary_draft("Shift"))
        .unwrap();
    store
        .attach_keyframe(&parent.id, keyframe_draft("Pop"), FrameIndex(2))
        .unwrap();
    let other = store.add(primary_draft("Flare")).unwrap();
    store.drain_events();

    let removed = store.delete(&parent.id);
    assert_eq!(removed.len(), 4);
    assert_eq!(removed[0], parent.id);
    assert_eq!(store.collection().total_len(), 1);
    assert!(store.get(&other.id).is_some());

    let events = store.drain_events();
    assert!(matches!(&events[..], [CollectionEvent::Removed { ids }] if ids.len() == 4));
}

#[test]
fn delete_is_idempotent() {
    let mut store = EffectStore::new();
    let fx = store.add(primary_draft("Glow")).unwrap();
    assert_eq!(store.delete(&fx.id).len(), 1);
    assert!(store.delete(&fx.id).is_empty());
}

#[test]
fn reorder_top_level_moves_before_target() {
    let mut store = EffectStore::new();
    let a = store.add(primary_draft("A")).unwrap();
    let _b = store.add(primary_draft("B")).unwrap();
    let c = store.add(primary_draft("C")).unwrap();

    store.reorder_top_level(&c.id, &a.id).unwrap();
    let names: Vec<&str> = store
        .collection()
        .top_level()
        .iter()
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(names, ["C", "A", "B"]);
}

#[test]
fn reorder_preserves_ids() {
    let mut store = EffectStore::new();
    let a = store.add(primary_draft("A")).unwrap();
    let b = store.add(primary_draft("B")).unwrap();

    store.reorder_top_level(&b.id, &a.id).unwrap();
    assert_eq!(store.get(&a.id).unwrap().name, "A");
    assert_eq!(store.get(&b.id).unwrap().name, "B");
}

#[test]
fn reorder_with_missing_endpoint_fails() {
    let mut store = EffectStore::new();
    let a = store.add(primary_draft("A")).unwrap();
    let err = store
        .reorder_top_level(&a.id, &EffectId::from_raw("ghost"))
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn reorder_to_self_is_a_no_op() {
    let mut store = EffectStore::new();
    let a = store.add(primary_draft("A")).unwrap();
    store.drain_events();
    store.reorder_top_level(&a.id, &a.id).unwrap();
    assert!(store.drain_events().is_empty());
}

#[test]
fn reorder_attached_bounds_are_checked() {
    let mut store = EffectStore::new();
    let parent = store.add(primary_draft("Glow")).unwrap();
    store
        .attach_secondary(&parent.id, secondary_draft("Blur"))
        .unwrap();

    let err = store
        .reorder_attached(&parent.id, AttachedList::Secondary, 0, 5)
        .unwrap_err();
    assert!(matches!(err, MintframeError::Validation(_)));
}

#[test]
fn reorder_attached_moves_within_list() {
    let mut store = EffectStore::new();
    let parent = store.add(primary_draft("Glow")).unwrap();
    store
        .attach_secondary(&parent.id, secondary_draft("Blur"))
        .unwrap();
    store
        .attach_secondary(&parent.id, secondary_draft("Shift"))
        .unwrap();

    store
        .reorder_attached(&parent.id, AttachedList::Secondary, 1, 0)
        .unwrap();
    let names: Vec<&str> = store
        .get(&parent.id)
        .unwrap()
        .secondary_effects
        .iter()
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(names, ["Shift", "Blur"]);
}

#[test]
fn remove_then_restore_preserves_placement_and_ids() {
    let mut store = EffectStore::new();
    let _a = store.add(primary_draft("A")).unwrap();
    let b = store.add(primary_draft("B")).unwrap();
    let _c = store.add(primary_draft("C")).unwrap();

    let removed = store.remove_subtree(&b.id).unwrap();
    assert_eq!(store.collection().len(), 2);

    store.restore(removed).unwrap();
    let names: Vec<&str> = store
        .collection()
        .top_level()
        .iter()
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(names, ["A", "B", "C"]);
    assert_eq!(store.get(&b.id).unwrap().id, b.id);
}

#[test]
fn replace_requires_matching_id() {
    let mut store = EffectStore::new();
    let fx = store.add(primary_draft("Glow")).unwrap();
    let mut other = fx.clone();
    other.id = EffectId::from_raw("different");
    let err = store.replace(&fx.id, other).unwrap_err();
    assert!(matches!(err, MintframeError::Validation(_)));
}
