use super::*;

#[test]
fn fresh_token_passes_checkpoints() {
    let token = CancelToken::new();
    assert!(!token.is_cancelled());
    assert!(token.checkpoint("frame generation").is_ok());
}

#[test]
fn cancel_is_visible_through_clones() {
    let token = CancelToken::new();
    let clone = token.clone();
    token.cancel();
    assert!(clone.is_cancelled());

    let err = clone.checkpoint("encoding").unwrap_err();
    assert!(err.is_cancelled());
    assert_eq!(err.to_string(), "cancelled: job cancelled during encoding");
}

#[test]
fn cancel_is_idempotent() {
    let token = CancelToken::new();
    token.cancel();
    token.cancel();
    assert!(token.is_cancelled());
}

#[test]
fn same_job_tracks_clone_identity() {
    let a = CancelToken::new();
    let b = a.clone();
    let c = CancelToken::new();
    assert!(a.same_job(&b));
    assert!(!a.same_job(&c));
}

#[test]
fn cancel_crosses_threads() {
    let token = CancelToken::new();
    let clone = token.clone();
    let handle = std::thread::spawn(move || clone.cancel());
    handle.join().unwrap();
    assert!(token.is_cancelled());
}
