use std::collections::HashSet;
use std::sync::{Arc, Barrier};

use chrono::Duration;

use rollcall_attendance::domain::code_generator::CodeGenerator;

use crate::helpers::{TTL_SECS, generator, manual_clock, other_code};

#[test]
fn should_follow_twenty_second_window_scenario() {
    let clock = manual_clock();
    let generator = generator(&clock);

    // t=0
    let code = generator.current_code();
    assert!(generator.is_valid(i64::from(code)));

    // t=19
    clock.advance(Duration::seconds(19));
    assert!(generator.is_valid(i64::from(code)));
    assert_eq!(generator.current_code(), code);

    // t=21
    clock.advance(Duration::seconds(2));
    assert!(!generator.is_valid(i64::from(code)));
    let rotated = generator.snapshot();
    assert_eq!(rotated.epoch, 2);
    assert_eq!(rotated.time_remaining, TTL_SECS);
    assert!(generator.is_valid(i64::from(rotated.code)));
}

#[test]
fn should_only_accept_fresh_code() {
    let clock = manual_clock();
    let generator = generator(&clock);
    let code = generator.current_code();

    assert!(!generator.is_valid(i64::from(other_code(code))));
    assert!(!generator.is_valid(0));
    assert!(!generator.is_valid(-i64::from(code)));
    assert!(generator.is_valid(i64::from(code)));
}

#[test]
fn time_remaining_never_exceeds_validity() {
    for secs in [1, 5, 20, 300] {
        let clock = manual_clock();
        let generator =
            CodeGenerator::new(Duration::seconds(secs), clock.clone()).unwrap();
        assert!(generator.time_remaining() <= secs);
        clock.advance(Duration::seconds(secs));
        assert_eq!(generator.time_remaining(), 0);
    }
}

#[test]
fn concurrent_readers_observe_a_single_rotation() {
    const READERS: usize = 32;

    let clock = manual_clock();
    let generator = generator(&clock);
    let before = generator.snapshot();
    clock.advance(Duration::seconds(TTL_SECS + 1));

    let barrier = Arc::new(Barrier::new(READERS));
    let snapshots: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..READERS)
            .map(|_| {
                let barrier = Arc::clone(&barrier);
                let generator = Arc::clone(&generator);
                scope.spawn(move || {
                    barrier.wait();
                    generator.snapshot()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let epochs: HashSet<u64> = snapshots.iter().map(|s| s.epoch).collect();
    assert_eq!(epochs, HashSet::from([before.epoch + 1]));
    let codes: HashSet<u16> = snapshots.iter().map(|s| s.code).collect();
    assert_eq!(codes.len(), 1, "readers saw different codes: {codes:?}");
    let expiries: HashSet<_> = snapshots.iter().map(|s| s.expires_at).collect();
    assert_eq!(expiries.len(), 1, "torn expiry observed");
}
