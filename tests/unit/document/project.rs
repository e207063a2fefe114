use super::*;
use crate::collection::store::EffectStore;
use crate::effect::model::{EffectDraft, EffectKind, FrameIndex};

#[test]
fn empty_document_loads_an_empty_collection() {
    let doc = JsonDocument::new();
    let collection = doc.load_collection().unwrap();
    assert!(collection.is_empty());
}

#[test]
fn store_then_load_round_trips() {
    let mut store = EffectStore::new();
    let parent = store
        .add(EffectDraft::new(EffectKind::Primary, "Glow", "fx.glow"))
        .unwrap();
    store
        .attach_keyframe(
            &parent.id,
            EffectDraft::new(EffectKind::Keyframe, "Pop", "fx.pop"),
            FrameIndex(12),
        )
        .unwrap();

    let mut doc = JsonDocument::new();
    doc.store_collection(store.collection()).unwrap();
    let loaded = doc.load_collection().unwrap();
    assert_eq!(&loaded, store.collection());
}

#[test]
fn malformed_json_is_a_serde_error() {
    let doc = JsonDocument::from_value(serde_json::json!({"not": "a list"}));
    let err = doc.load_collection().unwrap_err();
    assert!(matches!(err, MintframeError::Serde(_)));
}

#[test]
fn duplicate_ids_in_document_are_rejected() {
    let doc = JsonDocument::from_value(serde_json::json!([
        {"id": "dup", "name": "A", "registry_key": "fx.a", "kind": "Primary"},
        {"id": "dup", "name": "B", "registry_key": "fx.b", "kind": "Primary"}
    ]));
    let err = doc.load_collection().unwrap_err();
    assert!(matches!(err, MintframeError::Validation(_)));
}

#[test]
fn attached_kind_at_top_level_is_rejected() {
    let doc = JsonDocument::from_value(serde_json::json!([
        {"id": "s", "name": "Blur", "registry_key": "fx.blur", "kind": "Secondary"}
    ]));
    let err = doc.load_collection().unwrap_err();
    assert!(matches!(err, MintframeError::Structural(_)));
}
