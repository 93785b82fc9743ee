use chrono::Duration;

use rollcall_attendance::error::AttendanceServiceError;
use rollcall_attendance::usecase::stats::DailyStatsUseCase;

use crate::helpers::{MockAttendanceStore, manual_clock, msk, record_at, t0, test_student};

#[tokio::test]
async fn should_summarize_only_today() {
    let ivanov = test_student(1, "Ivanov Ivan", "101");
    let petrova = test_student(2, "Petrova Anna", "102");
    let sidorov = test_student(3, "Sidorov Petr", "101");
    let store = MockAttendanceStore::new(vec![ivanov.clone(), petrova.clone(), sidorov.clone()])
        .with_records(vec![
            record_at(&ivanov, t0() - Duration::minutes(30)),
            record_at(&petrova, t0() - Duration::minutes(45)),
            record_at(&sidorov, t0() - Duration::days(1)),
        ]);

    let clock = manual_clock();
    let uc = DailyStatsUseCase {
        store,
        clock: clock.clone(),
        offset: msk(),
    };
    let stats = uc.execute().await.unwrap();

    assert_eq!(stats.day, t0().with_timezone(&msk()).date_naive());
    assert_eq!(stats.total, 2);
    assert_eq!(stats.by_group.get("101"), Some(&1));
    assert_eq!(stats.by_group.get("102"), Some(&1));
    let earliest = stats.earliest.unwrap();
    assert_eq!(earliest.full_name, "Petrova Anna");
    // 08:15 UTC is 11:15 at UTC+3.
    assert_eq!(earliest.local_time, "11:15:00");
    assert_eq!(stats.message, "2 students marked attendance today");
}

#[tokio::test]
async fn should_report_empty_day() {
    let clock = manual_clock();
    let uc = DailyStatsUseCase {
        store: MockAttendanceStore::empty(),
        clock: clock.clone(),
        offset: msk(),
    };
    let stats = uc.execute().await.unwrap();

    assert_eq!(stats.total, 0);
    assert!(stats.earliest.is_none());
    assert_eq!(stats.message, "nobody has marked attendance today");
}

#[tokio::test]
async fn should_propagate_store_outage() {
    let clock = manual_clock();
    let uc = DailyStatsUseCase {
        store: MockAttendanceStore::unavailable(),
        clock: clock.clone(),
        offset: msk(),
    };
    assert!(matches!(
        uc.execute().await,
        Err(AttendanceServiceError::StoreUnavailable(_))
    ));
}
