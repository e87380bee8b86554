use enricher_core::{BatchState, SiteOutcome, SiteResult};

fn no_contact() -> SiteOutcome {
    SiteOutcome::Scraped(SiteResult::default())
}

#[test]
fn batches_fill_slots_in_order() {
    let mut state = BatchState::new(3);
    assert_eq!(state.completed(), 0);
    assert!(state.outcome(0).is_none());

    assert_eq!(state.record_batch(vec![SiteOutcome::Invalid, no_contact()]), 2);
    assert_eq!(state.completed(), 2);
    assert_eq!(state.outcome(0), Some(&SiteOutcome::Invalid));
    assert!(state.outcome(2).is_none());
    assert!(!state.is_finished());

    state.record_batch(vec![no_contact()]);
    assert!(state.is_finished());
    assert_eq!(
        state.into_outcomes(),
        vec![SiteOutcome::Invalid, no_contact(), no_contact()]
    );
}

#[test]
fn overflowing_batch_is_truncated() {
    let mut state = BatchState::new(1);
    assert_eq!(state.record_batch(vec![no_contact(), SiteOutcome::Invalid]), 1);
    assert_eq!(state.into_outcomes(), vec![no_contact()]);
}

#[test]
fn pending_slots_are_reported_as_none() {
    let mut state = BatchState::new(2);
    state.record_batch(vec![SiteOutcome::Invalid]);
    let slots: Vec<_> = state.outcomes().map(|o| o.is_some()).collect();
    assert_eq!(slots, vec![true, false]);
}
