use super::*;

fn t(scale: f64, x: f64, y: f64) -> Transform {
    Transform::new(scale, x, y)
}

fn apply(state: SessionState, actions: impl IntoIterator<Item = Action>) -> SessionState {
    actions.into_iter().fold(state, SessionState::reduce)
}

#[test]
fn initial_state_has_default_mask_and_identity() {
    let s = SessionState::default();
    assert!(!s.has_image());
    assert_eq!(s.mask_id(), Some(DEFAULT_MASK_ID));
    assert_eq!(s.transform(), Transform::IDENTITY);
    assert!(!s.can_undo());
    assert!(!s.can_redo());
    assert!(!s.is_exporting());
    assert!(!s.is_dragging());
}

#[test]
fn set_transform_clamps_extreme_scales() {
    for s in [100.0, -5.0, 0.0, 3.5, 0.05] {
        let state = SessionState::default().reduce(Action::SetTransform(t(s, 1.0, 2.0)));
        let scale = state.transform().scale;
        assert!((0.1..=3.0).contains(&scale), "scale {scale} from input {s}");
    }
    let hi = SessionState::default().reduce(Action::SetTransform(t(100.0, 0.0, 0.0)));
    assert_eq!(hi.transform().scale, 3.0);
    let lo = SessionState::default().reduce(Action::SetTransform(t(-5.0, 0.0, 0.0)));
    assert_eq!(lo.transform().scale, 0.1);
}

#[test]
fn equal_transform_does_not_grow_history() {
    let s = SessionState::default().reduce(Action::SetTransform(t(1.2, 3.0, 4.0)));
    let len = s.history().len();
    let s = s.reduce(Action::SetTransform(t(1.2, 3.0, 4.0)));
    assert_eq!(s.history().len(), len);

    // Clamped to the current value, so still a no-op.
    let s = s.reduce(Action::SetTransform(t(3.0, 0.0, 0.0)));
    let len = s.history().len();
    let s = s.reduce(Action::SetTransform(t(9.0, 0.0, 0.0)));
    assert_eq!(s.history().len(), len);
}

#[test]
fn undo_redo_round_trip_is_exact() {
    let t1 = t(1.3, 10.5, -2.25);
    let t2 = t(0.7, -40.0, 12.125);
    let s = apply(SessionState::default(), [
        Action::SetTransform(t1),
        Action::SetTransform(t2),
        Action::Undo,
        Action::Undo,
    ]);
    assert_eq!(s.transform(), Transform::IDENTITY);
    assert!(!s.can_undo());
    assert!(s.can_redo());

    let s = apply(s, [Action::Redo, Action::Redo]);
    assert_eq!(s.transform(), t2);
    assert!(!s.can_redo());
}

#[test]
fn sixty_distinct_transforms_keep_last_fifty() {
    let mut s = SessionState::default();
    for i in 1..=60 {
        s = s.reduce(Action::SetTransform(t(1.0, f64::from(i), 0.0)));
    }
    assert!(s.history().len() <= 50);

    let mut seen = vec![s.transform().translate_x];
    while s.can_undo() {
        s = s.reduce(Action::Undo);
        seen.push(s.transform().translate_x);
    }
    let expected: Vec<f64> = (11..=60).rev().map(f64::from).collect();
    assert_eq!(seen, expected);
}

#[test]
fn new_transform_after_undo_discards_redo() {
    let s = apply(SessionState::default(), [
        Action::SetTransform(t(1.0, 1.0, 0.0)),
        Action::SetTransform(t(1.0, 2.0, 0.0)),
        Action::Undo,
        Action::SetTransform(t(1.0, 3.0, 0.0)),
    ]);
    assert!(!s.can_redo());
    let after = s.clone().reduce(Action::Redo);
    assert_eq!(after.transform(), s.transform());
    assert_eq!(after.history().index(), s.history().index());
}

#[test]
fn undo_and_redo_are_noops_when_unavailable() {
    let s = SessionState::default().reduce(Action::Undo).reduce(Action::Redo);
    assert_eq!(s.transform(), Transform::IDENTITY);
    assert_eq!(s.history().len(), 1);
}

#[test]
fn reset_transform_goes_through_history() {
    let s = apply(SessionState::default(), [
        Action::SetTransform(t(2.0, 5.0, 5.0)),
        Action::ResetTransform,
    ]);
    assert_eq!(s.transform(), Transform::IDENTITY);
    assert_eq!(s.history().len(), 3);
    let s = s.reduce(Action::Undo);
    assert_eq!(s.transform(), t(2.0, 5.0, 5.0));
}

#[test]
fn non_finite_candidates_are_ignored() {
    let s = apply(SessionState::default(), [
        Action::SetTransform(t(f64::NAN, 0.0, 0.0)),
        Action::SetTransform(t(1.0, f64::INFINITY, 0.0)),
    ]);
    assert_eq!(s.history().len(), 1);
    assert_eq!(s.transform(), Transform::IDENTITY);
}

#[test]
fn image_and_mask_do_not_touch_history() {
    let bmp = Arc::new(Bitmap::solid(2, 2, [255, 0, 0, 255]));
    let s = apply(SessionState::default(), [
        Action::SetTransform(t(2.0, 0.0, 0.0)),
        Action::SetImage(Some(bmp)),
        Action::SetMask(Some("heart".to_string())),
        Action::SetMask(None),
    ]);
    assert!(s.has_image());
    assert_eq!(s.mask_id(), None);
    assert_eq!(s.history().len(), 2);
    assert_eq!(s.transform().scale, 2.0);
}

#[test]
fn flags_flip_without_history() {
    let s = apply(SessionState::default(), [
        Action::SetExporting(true),
        Action::SetDragging(true),
    ]);
    assert!(s.is_exporting());
    assert!(s.is_dragging());
    assert_eq!(s.history().len(), 1);
    let s = s.reduce(Action::SetExporting(false));
    assert!(!s.is_exporting());
}

#[test]
fn reset_state_restores_initial_session() {
    let s = apply(SessionState::new(Some("star".to_string())), [
        Action::SetMask(Some("heart".to_string())),
        Action::SetTransform(t(2.0, 1.0, 1.0)),
        Action::SetExporting(true),
        Action::ResetState,
    ]);
    assert_eq!(s.mask_id(), Some("star"));
    assert_eq!(s.transform(), Transform::IDENTITY);
    assert_eq!(s.history().len(), 1);
    assert!(!s.is_exporting());
}

#[test]
fn store_dispatch_applies_reducer() {
    let mut store = Store::default();
    store.dispatch(Action::SetTransform(t(1.5, 0.0, 0.0)));
    assert_eq!(store.state().transform().scale, 1.5);
    store.dispatch(Action::Undo);
    assert_eq!(store.state().transform(), Transform::IDENTITY);
}

#[test]
fn store_dispatch_matches_pure_reduce() {
    let actions = [
        Action::SetMask(Some("heart".to_string())),
        Action::SetTransform(t(2.0, 4.0, -4.0)),
        Action::SetDragging(true),
        Action::ResetState,
        Action::SetTransform(t(0.5, 1.0, 1.0)),
    ];
    let initial = SessionState::new(Some("square".to_string()));
    let expected = apply(initial.clone(), actions.clone());

    let mut store = Store::new(initial);
    for action in actions {
        store.dispatch(action);
    }
    let got = store.state();
    assert_eq!(got.mask_id(), Some("square"));
    assert_eq!(got.mask_id(), expected.mask_id());
    assert_eq!(got.transform(), expected.transform());
    assert_eq!(got.history().len(), expected.history().len());
    assert!(!got.is_dragging());

    store.dispatch(Action::ResetState);
    assert_eq!(store.state().mask_id(), Some("square"));
}
