use std::sync::Arc;

use chrono::Duration;
use futures::future::join_all;

use rollcall_attendance::domain::types::MarkOutcome;
use rollcall_attendance::error::AttendanceServiceError;
use rollcall_attendance::usecase::attendance::{
    MarkAttendanceInput, MarkAttendanceUseCase, MarkedTodayUseCase,
};

use crate::helpers::{
    MockAttendanceStore, MockStudentRepo, gate, generator, manual_clock, other_code,
    record_at, t0, test_student,
};

#[tokio::test]
async fn should_accept_valid_code_once_per_day() {
    let clock = manual_clock();
    let generator = generator(&clock);
    let store = MockAttendanceStore::empty();
    let records = store.records.clone();
    let gate = gate(store, &generator, &clock);
    let student = test_student(1, "Ivanov Ivan", "101");

    let code = generator.current_code().to_string();
    assert_eq!(
        gate.try_mark(student.id, &code).await.unwrap(),
        MarkOutcome::Accepted
    );

    // Same day, a later (still valid) code.
    clock.advance(Duration::seconds(21));
    let code = generator.current_code().to_string();
    assert_eq!(
        gate.try_mark(student.id, &code).await.unwrap(),
        MarkOutcome::RejectedAlreadyMarked
    );

    let records = records.lock().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].marked_at, t0());
}

#[tokio::test]
async fn should_reject_malformed_input_without_touching_store() {
    let clock = manual_clock();
    let generator = generator(&clock);
    let store = MockAttendanceStore::empty();
    let probe = store.clone();
    let gate = gate(store, &generator, &clock);
    let student = test_student(1, "Ivanov Ivan", "101");

    for raw in ["abcd", "", "12.5", "1 2 3 4"] {
        assert_eq!(
            gate.try_mark(student.id, raw).await.unwrap(),
            MarkOutcome::RejectedMalformedInput,
            "input {raw:?}"
        );
    }
    assert!(!probe.touched());
}

#[tokio::test]
async fn should_reject_wrong_code_without_touching_store() {
    let clock = manual_clock();
    let generator = generator(&clock);
    let store = MockAttendanceStore::empty();
    let probe = store.clone();
    let gate = gate(store, &generator, &clock);
    let student = test_student(1, "Ivanov Ivan", "101");

    let wrong = other_code(generator.current_code()).to_string();
    assert_eq!(
        gate.try_mark(student.id, &wrong).await.unwrap(),
        MarkOutcome::RejectedInvalidCode
    );
    assert_eq!(
        gate.try_mark(student.id, "123456").await.unwrap(),
        MarkOutcome::RejectedInvalidCode
    );
    assert!(!probe.touched());
}

#[tokio::test]
async fn should_trim_whitespace_around_code() {
    let clock = manual_clock();
    let generator = generator(&clock);
    let gate = gate(MockAttendanceStore::empty(), &generator, &clock);
    let student = test_student(1, "Ivanov Ivan", "101");

    let padded = format!("  {}\n", generator.current_code());
    assert_eq!(
        gate.try_mark(student.id, &padded).await.unwrap(),
        MarkOutcome::Accepted
    );
}

#[tokio::test]
async fn should_reject_expired_code_without_rotation() {
    let clock = manual_clock();
    let generator = generator(&clock);
    let gate = gate(MockAttendanceStore::empty(), &generator, &clock);
    let student = test_student(1, "Ivanov Ivan", "101");

    let code = generator.current_code();
    clock.advance(Duration::seconds(21));
    assert_eq!(
        gate.try_mark(student.id, &code.to_string()).await.unwrap(),
        MarkOutcome::RejectedInvalidCode
    );
    assert_eq!(generator.snapshot().epoch, 2);
}

#[tokio::test]
async fn should_allow_mark_on_next_local_day() {
    let clock = manual_clock();
    let generator = generator(&clock);
    let student = test_student(1, "Ivanov Ivan", "101");
    // Marked yesterday (local time).
    let store = MockAttendanceStore::empty()
        .with_records(vec![record_at(&student, t0() - Duration::days(1))]);
    let gate = gate(store, &generator, &clock);

    let code = generator.current_code().to_string();
    assert_eq!(
        gate.try_mark(student.id, &code).await.unwrap(),
        MarkOutcome::Accepted
    );
}

#[tokio::test]
async fn should_surface_store_outage_as_error() {
    let clock = manual_clock();
    let generator = generator(&clock);
    let gate = gate(MockAttendanceStore::unavailable(), &generator, &clock);
    let student = test_student(1, "Ivanov Ivan", "101");

    let code = generator.current_code().to_string();
    let result = gate.try_mark(student.id, &code).await;
    assert!(
        matches!(result, Err(AttendanceServiceError::StoreUnavailable(_))),
        "expected StoreUnavailable, got {result:?}"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_submissions_are_accepted_exactly_once() {
    const SUBMISSIONS: usize = 16;

    let clock = manual_clock();
    let generator = generator(&clock);
    let store = MockAttendanceStore::empty();
    let records = store.records.clone();
    let gate = Arc::new(gate(store, &generator, &clock));
    let student = test_student(1, "Ivanov Ivan", "101");
    let code = generator.current_code().to_string();

    let tasks = (0..SUBMISSIONS).map(|_| {
        let gate = Arc::clone(&gate);
        let code = code.clone();
        let student_id = student.id;
        tokio::spawn(async move { gate.try_mark(student_id, &code).await.unwrap() })
    });
    let outcomes: Vec<MarkOutcome> = join_all(tasks)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    let accepted = outcomes.iter().filter(|o| o.is_accepted()).count();
    let duplicates = outcomes
        .iter()
        .filter(|o| **o == MarkOutcome::RejectedAlreadyMarked)
        .count();
    assert_eq!(accepted, 1);
    assert_eq!(duplicates, SUBMISSIONS - 1);
    assert_eq!(records.lock().unwrap().len(), 1);
}

// ── MarkAttendanceUseCase ────────────────────────────────────────────────────

#[tokio::test]
async fn should_require_registration_before_marking() {
    let clock = manual_clock();
    let generator = generator(&clock);
    let uc = MarkAttendanceUseCase {
        students: MockStudentRepo::empty(),
        gate: gate(MockAttendanceStore::empty(), &generator, &clock),
    };

    let result = uc
        .execute(MarkAttendanceInput {
            chat_id: 42,
            code: generator.current_code().to_string(),
        })
        .await;
    assert!(
        matches!(result, Err(AttendanceServiceError::StudentNotFound)),
        "expected StudentNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_mark_registered_student_and_report_marked_today() {
    let clock = manual_clock();
    let generator = generator(&clock);
    let student = test_student(42, "Petrova Anna", "102");
    let store = MockAttendanceStore::new(vec![student.clone()]);

    let mark = MarkAttendanceUseCase {
        students: MockStudentRepo::new(vec![student.clone()]),
        gate: gate(store.clone(), &generator, &clock),
    };
    let today = MarkedTodayUseCase {
        students: MockStudentRepo::new(vec![student.clone()]),
        gate: gate(store, &generator, &clock),
    };

    assert!(!today.execute(42).await.unwrap());
    let outcome = mark
        .execute(MarkAttendanceInput {
            chat_id: 42,
            code: generator.current_code().to_string(),
        })
        .await
        .unwrap();
    assert_eq!(outcome, MarkOutcome::Accepted);
    assert!(today.execute(42).await.unwrap());
}
