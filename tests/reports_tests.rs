use chrono::{NaiveDate, NaiveTime};
use glamstudio::core::reports::ReportLogic;
use glamstudio::core::schedule::{AppointmentRequest, ScheduleLogic};
use glamstudio::db::live::LiveQuery;
use glamstudio::models::appointment_status::AppointmentStatus;

mod common;
use common::{add_client, add_service, memory_pool, test_config};

fn sept(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, day).unwrap()
}

fn slot(client_id: i64, date: NaiveDate, h: u32, minutes: i64, services: Vec<i64>) -> AppointmentRequest {
    let start = NaiveTime::from_hms_opt(h, 0, 0).unwrap();
    AppointmentRequest {
        client_id,
        date,
        start,
        end: if services.is_empty() {
            Some(start + chrono::Duration::minutes(minutes))
        } else {
            None
        },
        service_ids: services,
        notes: None,
    }
}

#[test]
fn expected_income_sums_booked_service_prices_of_the_day() {
    let mut pool = memory_pool();
    let cfg = test_config();
    let client = add_client(&mut pool, &cfg, "Ana", "3001234567");
    let cut = add_service(&mut pool, &cfg, "Haircut", 45, "35000");
    let dye = add_service(&mut pool, &cfg, "Dye", 60, "80000");

    ScheduleLogic::create(&mut pool, &cfg, &slot(client, sept(1), 10, 0, vec![cut, dye])).unwrap();
    ScheduleLogic::create(&mut pool, &cfg, &slot(client, sept(1), 14, 0, vec![cut])).unwrap();
    ScheduleLogic::create(&mut pool, &cfg, &slot(client, sept(2), 10, 0, vec![dye])).unwrap();

    assert_eq!(ReportLogic::expected_for_day(&pool.conn, sept(1)).unwrap(), 15_000_000);
    assert_eq!(ReportLogic::expected_for_day(&pool.conn, sept(3)).unwrap(), 0);

    let summary = ReportLogic::day_summary(&pool.conn, sept(1)).unwrap();
    assert_eq!(summary.appointments.len(), 2);
    assert_eq!(summary.appointments[0].client_name, "Ana");
    assert_eq!(summary.confirmed_income_cents, 0);
}

#[test]
fn month_counts_by_status() {
    let mut pool = memory_pool();
    let cfg = test_config();
    let client = add_client(&mut pool, &cfg, "Ana", "3001234567");

    let ids: Vec<i64> = [9, 11, 13]
        .iter()
        .map(|h| match ScheduleLogic::create(&mut pool, &cfg, &slot(client, sept(10), *h, 60, vec![])).unwrap() {
            glamstudio::core::schedule::SaveOutcome::Saved(id) => id,
            other => panic!("unexpected {other:?}"),
        })
        .collect();
    ScheduleLogic::set_status(&mut pool, ids[0], AppointmentStatus::Completed).unwrap();
    ScheduleLogic::set_status(&mut pool, ids[1], AppointmentStatus::Cancelled).unwrap();

    // next month is not counted
    ScheduleLogic::create(&mut pool, &cfg, &slot(client, NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(), 9, 60, vec![])).unwrap();

    let m = ReportLogic::month_metrics(&pool.conn, sept(15)).unwrap();
    assert_eq!((m.scheduled, m.completed, m.cancelled), (1, 1, 1));
}

#[test]
fn occupancy_is_booked_minutes_over_opening_hours() {
    let mut pool = memory_pool();
    let cfg = test_config(); // 10:00 - 18:00 = 480 minutes
    let client = add_client(&mut pool, &cfg, "Ana", "3001234567");

    ScheduleLogic::create(&mut pool, &cfg, &slot(client, sept(5), 10, 120, vec![])).unwrap();

    let days = ReportLogic::occupancy_by_day(&pool.conn, &cfg, sept(1)).unwrap();
    assert_eq!(days.len(), 30);

    let fifth = days.iter().find(|d| d.date == sept(5)).unwrap();
    assert_eq!(fifth.booked_minutes, 120);
    assert!((fifth.ratio - 0.25).abs() < f64::EPSILON);
    assert!(days.iter().filter(|d| d.date != sept(5)).all(|d| d.ratio == 0.0));
}

#[test]
fn live_query_emits_only_when_its_result_changes() {
    let mut pool = memory_pool();
    let cfg = test_config();
    let day = sept(20);

    let mut live = LiveQuery::new(move |conn| ScheduleLogic::agenda(conn, day, day));

    // first poll always emits, even an empty agenda
    assert_eq!(live.poll(&pool.conn).unwrap().map(Vec::len), Some(0));
    assert!(live.poll(&pool.conn).unwrap().is_none());

    // a write that leaves the agenda untouched
    let client = add_client(&mut pool, &cfg, "Ana", "3001234567");
    assert!(live.poll(&pool.conn).unwrap().is_none());

    ScheduleLogic::create(&mut pool, &cfg, &slot(client, day, 10, 30, vec![])).unwrap();
    let emitted = live.poll(&pool.conn).unwrap().expect("agenda changed");
    assert_eq!(emitted.len(), 1);
    assert_eq!(emitted[0].client_name, "Ana");

    assert!(live.poll(&pool.conn).unwrap().is_none());
    assert_eq!(live.current().map(Vec::len), Some(1));
}

#[test]
fn live_query_retries_after_a_failed_refresh() {
    use glamstudio::errors::AppError;
    use std::cell::Cell;
    use std::rc::Rc;

    let mut pool = memory_pool();
    let cfg = test_config();
    let calls = Rc::new(Cell::new(0u32));
    let counter = Rc::clone(&calls);

    let mut live = LiveQuery::new(move |_conn| {
        counter.set(counter.get() + 1);
        match counter.get() {
            1 => Ok(1),
            2 => Err(AppError::Other("busy".into())),
            _ => Ok(2),
        }
    });

    assert_eq!(live.poll(&pool.conn).unwrap().copied(), Some(1));

    add_client(&mut pool, &cfg, "Ana", "3001234567");
    assert!(live.poll(&pool.conn).is_err());

    // no write since the failure: the refresh is still attempted
    assert_eq!(live.poll(&pool.conn).unwrap().copied(), Some(2));
    assert_eq!(calls.get(), 3);
}
