use super::*;
use crate::effect::model::{EffectDraft, EffectKind, FrameIndex};

fn primary(id: &str, name: &str) -> Effect {
    EffectDraft::new(EffectKind::Primary, name, "fx.primary").into_effect(EffectId::from_raw(id))
}

fn secondary(id: &str, name: &str) -> Effect {
    EffectDraft::new(EffectKind::Secondary, name, "fx.secondary")
        .into_effect(EffectId::from_raw(id))
}

fn keyframe(id: &str, name: &str, frame: u64) -> Effect {
    EffectDraft::new(EffectKind::Keyframe, name, "fx.keyframe")
        .at_frame(FrameIndex(frame))
        .into_effect(EffectId::from_raw(id))
}

fn sample() -> EffectCollection {
    let mut a = primary("a", "Glow");
    a.secondary_effects.push(secondary("a-s0", "Blur"));
    a.secondary_effects.push(secondary("a-s1", "Shift"));
    a.keyframe_effects.push(keyframe("a-k0", "Pop", 10));
    let b = primary("b", "Flare");
    EffectCollection::from_effects(vec![a, b]).unwrap()
}

#[test]
fn resolve_finds_top_level_and_attached_positions() {
    let c = sample();
    assert_eq!(
        c.resolve(&EffectId::from_raw("b")),
        Some(EffectSlot::Top { index: 1 })
    );
    assert_eq!(
        c.resolve(&EffectId::from_raw("a-s1")),
        Some(EffectSlot::Attached {
            parent_index: 0,
            list: AttachedList::Secondary,
            index: 1,
        })
    );
    assert_eq!(
        c.resolve(&EffectId::from_raw("a-k0")),
        Some(EffectSlot::Attached {
            parent_index: 0,
            list: AttachedList::Keyframe,
            index: 0,
        })
    );
    assert_eq!(c.resolve(&EffectId::from_raw("missing")), None);
}

#[test]
fn get_reaches_any_depth() {
    let c = sample();
    assert_eq!(c.get(&EffectId::from_raw("a")).unwrap().name, "Glow");
    assert_eq!(c.get(&EffectId::from_raw("a-s0")).unwrap().name, "Blur");
    assert!(c.get(&EffectId::from_raw("nope")).is_none());
}

#[test]
fn iter_all_walks_depth_first() {
    let c = sample();
    let names: Vec<&str> = c.iter_all().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["Glow", "Blur", "Shift", "Pop", "Flare"]);
    assert_eq!(c.total_len(), 5);
    assert_eq!(c.len(), 2);
}

#[test]
fn duplicate_ids_are_rejected() {
    let err =
        EffectCollection::from_effects(vec![primary("dup", "One"), primary("dup", "Two")])
            .unwrap_err();
    assert!(matches!(err, MintframeError::Validation(_)));
}

#[test]
fn duplicate_id_across_depths_is_rejected() {
    let mut a = primary("a", "Glow");
    a.secondary_effects.push(secondary("a", "Blur"));
    let err = EffectCollection::from_effects(vec![a]).unwrap_err();
    assert!(matches!(err, MintframeError::Validation(_)));
}

#[test]
fn attached_kinds_cannot_sit_at_top_level() {
    let err = EffectCollection::from_effects(vec![secondary("s", "Blur")]).unwrap_err();
    assert!(matches!(err, MintframeError::Structural(_)));
}

#[test]
fn transparent_serde_round_trip() {
    let c = sample();
    let json = serde_json::to_string(&c).unwrap();
    assert!(json.starts_with('['));
    let back: EffectCollection = serde_json::from_str(&json).unwrap();
    assert_eq!(back, c);
}
