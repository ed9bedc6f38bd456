#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

use SessionState::*;

#[test_case(Idle)]
#[test_case(Sending)]
#[test_case(AwaitingResponse)]
#[test_case(Waiting)]
#[test_case(ReUploadRequested)]
#[test_case(Deployed)]
fn SessionState___non_terminal___can_fail(state: SessionState) {
    assert!(state.can_transition_to(Failed));
}

#[test_case(Terminal, Sending)]
#[test_case(Failed, Sending)]
#[test_case(Failed, Idle)]
#[test_case(Terminal, Idle)]
fn SessionState___terminal___has_no_way_out(state: SessionState, target: SessionState) {
    assert!(!state.can_transition_to(target));
}

#[test_case(Sending, Waiting)]
#[test_case(Sending, Deployed)]
#[test_case(Waiting, AwaitingResponse)]
#[test_case(ReUploadRequested, Deployed)]
#[test_case(Deployed, Sending)]
fn SessionState___skipping_a_step___is_rejected(state: SessionState, target: SessionState) {
    assert!(!state.can_transition_to(target));
}
