use super::*;
use crate::collection::store::EffectStore;
use crate::effect::model::{EffectDraft, FrameIndex};

fn store_with_tree() -> (EffectStore, EffectId, EffectId) {
    let mut store = EffectStore::new();
    let parent = store
        .add(EffectDraft::new(EffectKind::Primary, "Glow", "fx.glow"))
        .unwrap();
    store
        .attach_secondary(
            &parent.id,
            EffectDraft::new(EffectKind::Secondary, "Blur", "fx.blur"),
        )
        .unwrap();
    let other = store
        .add(EffectDraft::new(EffectKind::Primary, "Flare", "fx.flare"))
        .unwrap();
    store.drain_events();
    (store, parent.id, other.id)
}

#[test]
fn select_top_level_effect() {
    let (store, parent, _) = store_with_tree();
    let mut tracker = SelectionTracker::new();
    tracker
        .select(store.collection(), parent.clone(), EffectKind::Primary, None)
        .unwrap();
    assert!(tracker.is_selected(&parent));
    assert_eq!(
        tracker.resolved_slot(store.collection()),
        Some(EffectSlot::Top { index: 0 })
    );
}

#[test]
fn select_missing_effect_fails() {
    let (store, _, _) = store_with_tree();
    let mut tracker = SelectionTracker::new();
    let err = tracker
        .select(
            store.collection(),
            EffectId::from_raw("ghost"),
            EffectKind::Primary,
            None,
        )
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn attached_selection_requires_valid_sub() {
    let (store, parent, _) = store_with_tree();
    let mut tracker = SelectionTracker::new();

    // No sub position at all.
    assert!(tracker
        .select(store.collection(), parent.clone(), EffectKind::Secondary, None)
        .is_err());

    // Out-of-range index.
    assert!(tracker
        .select(
            store.collection(),
            parent.clone(),
            EffectKind::Secondary,
            Some(SubSelection {
                list: AttachedList::Secondary,
                index: 5,
            }),
        )
        .is_err());

    // List kind mismatch.
    assert!(tracker
        .select(
            store.collection(),
            parent.clone(),
            EffectKind::Secondary,
            Some(SubSelection {
                list: AttachedList::Keyframe,
                index: 0,
            }),
        )
        .is_err());

    // Valid.
    tracker
        .select(
            store.collection(),
            parent,
            EffectKind::Secondary,
            Some(SubSelection {
                list: AttachedList::Secondary,
                index: 0,
            }),
        )
        .unwrap();
    assert!(tracker.current().is_some());
}

#[test]
fn deleting_the_selected_effect_deselects() {
    let (mut store, parent, _) = store_with_tree();
    let mut tracker = SelectionTracker::new();
    tracker
        .select(store.collection(), parent.clone(), EffectKind::Primary, None)
        .unwrap();

    store.delete(&parent);
    let mut change = SelectionChange::Unchanged;
    for event in store.drain_events() {
        change = tracker.sync(&event, store.collection());
    }
    assert_eq!(change, SelectionChange::Deselected { id: parent });
    assert!(tracker.current().is_none());
}

#[test]
fn deleting_the_selected_sub_effect_deselects() {
    let (mut store, parent, _) = store_with_tree();
    let blur_id = store.get(&parent).unwrap().secondary_effects[0].id.clone();
    let mut tracker = SelectionTracker::new();
    tracker
        .select(
            store.collection(),
            parent.clone(),
            EffectKind::Secondary,
            Some(SubSelection {
                list: AttachedList::Secondary,
                index: 0,
            }),
        )
        .unwrap();

    store.delete(&blur_id);
    let mut change = SelectionChange::Unchanged;
    for event in store.drain_events() {
        change = tracker.sync(&event, store.collection());
    }
    assert_eq!(change, SelectionChange::Deselected { id: parent });
}

#[test]
fn stale_sub_hint_is_cleared_but_parent_stays_selected() {
    let (mut store, parent, _) = store_with_tree();
    let blur_id = store.get(&parent).unwrap().secondary_effects[0].id.clone();
    let mut tracker = SelectionTracker::new();
    // Primary selection with a highlight hint on its only sub-effect.
    tracker
        .select(
            store.collection(),
            parent.clone(),
            EffectKind::Primary,
            Some(SubSelection {
                list: AttachedList::Secondary,
                index: 0,
            }),
        )
        .unwrap();

    store.delete(&blur_id);
    let mut change = SelectionChange::Unchanged;
    for event in store.drain_events() {
        change = tracker.sync(&event, store.collection());
    }
    assert_eq!(change, SelectionChange::HintCleared);
    let ctx = tracker.current().unwrap();
    assert_eq!(ctx.effect_id, parent);
    assert!(ctx.sub.is_none());
}

#[test]
fn selection_survives_reorder() {
    let (mut store, parent, other) = store_with_tree();
    let mut tracker = SelectionTracker::new();
    tracker
        .select(store.collection(), parent.clone(), EffectKind::Primary, None)
        .unwrap();

    store.reorder_top_level(&other, &parent).unwrap();
    for event in store.drain_events() {
        assert_eq!(
            tracker.sync(&event, store.collection()),
            SelectionChange::Unchanged
        );
    }
    // Position changed, identity did not.
    assert_eq!(
        tracker.resolved_slot(store.collection()),
        Some(EffectSlot::Top { index: 1 })
    );
}

#[test]
fn reload_without_the_selected_id_deselects() {
    let (mut store, parent, _) = store_with_tree();
    let mut tracker = SelectionTracker::new();
    tracker
        .select(store.collection(), parent.clone(), EffectKind::Primary, None)
        .unwrap();

    store.replace_collection(EffectCollection::new());
    let mut change = SelectionChange::Unchanged;
    for event in store.drain_events() {
        change = tracker.sync(&event, store.collection());
    }
    assert_eq!(change, SelectionChange::Deselected { id: parent });
}

#[test]
fn keyframe_selection_resolves_to_attached_slot() {
    let (mut store, parent, _) = store_with_tree();
    store
        .attach_keyframe(
            &parent,
            EffectDraft::new(EffectKind::Keyframe, "Pop", "fx.pop"),
            FrameIndex(3),
        )
        .unwrap();
    store.drain_events();

    let mut tracker = SelectionTracker::new();
    tracker
        .select(
            store.collection(),
            parent,
            EffectKind::Keyframe,
            Some(SubSelection {
                list: AttachedList::Keyframe,
                index: 0,
            }),
        )
        .unwrap();
    assert_eq!(
        tracker.resolved_slot(store.collection()),
        Some(EffectSlot::Attached {
            parent_index: 0,
            list: AttachedList::Keyframe,
            index: 0,
        })
    );
}
