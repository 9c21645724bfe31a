use chrono::{NaiveDate, NaiveTime};
use glamstudio::core::billing::{BillingLogic, EXTRA_ITEM_DESCRIPTION, InvoiceFilter};
use glamstudio::core::reports::{ReportLogic, average_ticket};
use glamstudio::core::schedule::{AppointmentRequest, SaveOutcome, ScheduleLogic};
use glamstudio::core::services::ServiceLogic;
use glamstudio::errors::AppError;
use glamstudio::models::invoice::NewInvoiceItem;
use glamstudio::models::invoice_status::InvoiceStatus;
use glamstudio::utils::date::today;

mod common;
use common::{add_client, add_service, memory_pool, test_config};

fn book(pool: &mut glamstudio::db::pool::DbPool, client: i64, services: Vec<i64>, date: NaiveDate) -> i64 {
    let cfg = test_config();
    let req = AppointmentRequest {
        client_id: client,
        date,
        start: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        end: None,
        service_ids: services,
        notes: None,
    };
    match ScheduleLogic::create(pool, &cfg, &req).unwrap() {
        SaveOutcome::Saved(id) => id,
        SaveOutcome::Conflict(n) => panic!("unexpected conflict with {n} appointment(s)"),
    }
}

#[test]
fn generated_invoice_totals_the_service_prices() {
    let mut pool = memory_pool();
    let cfg = test_config();
    let client = add_client(&mut pool, &cfg, "Ana", "3001234567");
    let cut = add_service(&mut pool, &cfg, "Haircut", 45, "35000");
    let dye = add_service(&mut pool, &cfg, "Dye", 60, "80000");
    let appt = book(&mut pool, client, vec![cut, dye], NaiveDate::from_ymd_opt(2025, 9, 1).unwrap());

    let id = BillingLogic::generate_for_appointment(&mut pool, appt, None).unwrap();
    let detail = BillingLogic::detail(&pool, id).unwrap();

    assert_eq!(detail.invoice.status, InvoiceStatus::Issued);
    assert_eq!(detail.invoice.client_id, client);
    assert_eq!(detail.invoice.total_cents, 11_500_000);
    assert_eq!(detail.items.len(), 2);
    assert!(detail.items.iter().all(|i| i.quantity == 1 && i.service_id.is_some()));
    assert_eq!(detail.items_total_cents(), detail.invoice.total_cents);
}

#[test]
fn extra_amount_is_added_in_minor_units() {
    let mut pool = memory_pool();
    let cfg = test_config();
    let client = add_client(&mut pool, &cfg, "Ana", "3001234567");
    let cut = add_service(&mut pool, &cfg, "Haircut", 45, "35000");
    let appt = book(&mut pool, client, vec![cut], NaiveDate::from_ymd_opt(2025, 9, 1).unwrap());

    let id = BillingLogic::generate_for_appointment(&mut pool, appt, Some(50)).unwrap();
    let detail = BillingLogic::detail(&pool, id).unwrap();

    assert_eq!(detail.invoice.total_cents, 3_500_000 + 50 * 100);
    let extra = detail.items.iter().find(|i| i.service_id.is_none()).expect("extra item");
    assert_eq!(extra.unit_price_cents, 5_000);
    assert_eq!(extra.description.as_deref(), Some(EXTRA_ITEM_DESCRIPTION));

    // zero extra adds nothing, negative extra is refused
    let plain = BillingLogic::generate_for_appointment(&mut pool, appt, Some(0)).unwrap();
    assert_eq!(BillingLogic::detail(&pool, plain).unwrap().items.len(), 1);
    assert!(matches!(
        BillingLogic::generate_for_appointment(&mut pool, appt, Some(-5)),
        Err(AppError::InvalidAmount(_))
    ));
}

#[test]
fn appointment_without_services_gives_zero_total() {
    let mut pool = memory_pool();
    let cfg = test_config();
    let client = add_client(&mut pool, &cfg, "Ana", "3001234567");
    let req = AppointmentRequest {
        client_id: client,
        date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
        start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        end: Some(NaiveTime::from_hms_opt(9, 30, 0).unwrap()),
        service_ids: vec![],
        notes: None,
    };
    let SaveOutcome::Saved(appt) = ScheduleLogic::create(&mut pool, &cfg, &req).unwrap() else {
        panic!("must be saved");
    };

    let id = BillingLogic::generate_for_appointment(&mut pool, appt, None).unwrap();
    assert_eq!(BillingLogic::get(&pool, id).unwrap().total_cents, 0);

    assert!(matches!(
        BillingLogic::generate_for_appointment(&mut pool, 404, None),
        Err(AppError::AppointmentNotFound(404))
    ));
}

#[test]
fn draft_items_keep_the_total_in_sync() {
    let mut pool = memory_pool();
    let cfg = test_config();
    let client = add_client(&mut pool, &cfg, "Ana", "3001234567");
    let cut = add_service(&mut pool, &cfg, "Haircut", 45, "35000");

    let id = BillingLogic::create_draft(&mut pool, client, Some("walk-in")).unwrap();
    assert_eq!(BillingLogic::get(&pool, id).unwrap().status, InvoiceStatus::Draft);

    let total = BillingLogic::add_item(
        &mut pool,
        id,
        NewInvoiceItem {
            service_id: Some(cut),
            quantity: 2,
            unit_price_cents: 3_500_000,
            description: None,
        },
    )
    .unwrap();
    assert_eq!(total, 7_000_000);

    let bad_qty = BillingLogic::add_item(
        &mut pool,
        id,
        NewInvoiceItem {
            service_id: None,
            quantity: 0,
            unit_price_cents: 100,
            description: None,
        },
    );
    assert!(matches!(bad_qty, Err(AppError::InvalidQuantity(0))));
    assert_eq!(BillingLogic::recompute(&mut pool, id).unwrap(), 7_000_000);
}

#[test]
fn service_used_by_an_invoice_item_cannot_be_deleted() {
    let mut pool = memory_pool();
    let cfg = test_config();
    let client = add_client(&mut pool, &cfg, "Ana", "3001234567");
    let cut = add_service(&mut pool, &cfg, "Haircut", 45, "35000");
    let appt = book(&mut pool, client, vec![cut], NaiveDate::from_ymd_opt(2025, 9, 1).unwrap());
    BillingLogic::generate_for_appointment(&mut pool, appt, None).unwrap();
    ScheduleLogic::delete(&mut pool, appt).unwrap();

    let err = ServiceLogic::delete(&mut pool, cut).unwrap_err();
    assert!(matches!(
        err,
        AppError::ServiceInUse {
            appointments: 0,
            invoice_items: 1,
            ..
        }
    ));
    assert!(ServiceLogic::get(&pool, cut).is_ok());
}

#[test]
fn status_changes_and_filters() {
    let mut pool = memory_pool();
    let cfg = test_config();
    let ana = add_client(&mut pool, &cfg, "Ana", "3001234567");
    let luz = add_client(&mut pool, &cfg, "Luz", "3119876543");

    let a = BillingLogic::create_draft(&mut pool, ana, None).unwrap();
    let b = BillingLogic::create_draft(&mut pool, luz, None).unwrap();

    BillingLogic::mark_paid(&mut pool, a).unwrap();
    BillingLogic::void(&mut pool, a).unwrap();
    BillingLogic::set_status(&mut pool, a, InvoiceStatus::Draft).unwrap();
    assert_eq!(BillingLogic::get(&pool, a).unwrap().status, InvoiceStatus::Draft);

    let only_luz = BillingLogic::list(
        &pool,
        &InvoiceFilter {
            client_id: Some(luz),
            range_ms: None,
        },
    )
    .unwrap();
    assert_eq!(only_luz.len(), 1);
    assert_eq!(only_luz[0].id, b);

    let nothing_then = BillingLogic::list(
        &pool,
        &InvoiceFilter {
            client_id: None,
            range_ms: Some((0, 1)),
        },
    )
    .unwrap();
    assert!(nothing_then.is_empty());
}

#[test]
fn average_ticket_is_zero_without_paid_invoices() {
    assert_eq!(average_ticket(0, 0), 0);
    assert_eq!(average_ticket(12_000_000, 3), 4_000_000);

    let mut pool = memory_pool();
    let cfg = test_config();
    let client = add_client(&mut pool, &cfg, "Ana", "3001234567");
    let cut = add_service(&mut pool, &cfg, "Haircut", 45, "35000");
    let appt = book(&mut pool, client, vec![cut], today());
    let invoice = BillingLogic::generate_for_appointment(&mut pool, appt, None).unwrap();

    let before = ReportLogic::month_metrics(&pool.conn, today()).unwrap();
    assert_eq!(before.paid_count, 0);
    assert_eq!(before.average_ticket_cents, 0);
    assert_eq!(before.scheduled, 1);

    BillingLogic::mark_paid(&mut pool, invoice).unwrap();
    let after = ReportLogic::month_metrics(&pool.conn, today()).unwrap();
    assert_eq!(after.paid_count, 1);
    assert_eq!(after.paid_total_cents, 3_500_000);
    assert_eq!(after.average_ticket_cents, 3_500_000);
}

#[test]
fn oversized_extra_is_rejected_and_leaves_no_invoice() {
    let mut pool = memory_pool();
    let cfg = test_config();
    let client = add_client(&mut pool, &cfg, "Ana", "3001234567");
    let cut = add_service(&mut pool, &cfg, "Haircut", 45, "35000");
    let appt = book(&mut pool, client, vec![cut], NaiveDate::from_ymd_opt(2025, 9, 1).unwrap());

    assert!(matches!(
        BillingLogic::generate_for_appointment(&mut pool, appt, Some(i64::MAX / 100)),
        Err(AppError::InvalidAmount(_))
    ));
    assert!(matches!(BillingLogic::get(&pool, 1), Err(AppError::InvoiceNotFound(1))));

    let id = BillingLogic::generate_for_appointment(&mut pool, appt, None).unwrap();
    assert_eq!(BillingLogic::get(&pool, id).unwrap().total_cents, 3_500_000);
    let all = BillingLogic::list(
        &pool,
        &InvoiceFilter {
            client_id: None,
            range_ms: None,
        },
    )
    .unwrap();
    assert_eq!(all.len(), 1);
}

#[test]
fn oversized_line_amount_is_rejected() {
    let mut pool = memory_pool();
    let cfg = test_config();
    let client = add_client(&mut pool, &cfg, "Ana", "3001234567");
    let id = BillingLogic::create_draft(&mut pool, client, None).unwrap();

    let huge = BillingLogic::add_item(
        &mut pool,
        id,
        NewInvoiceItem {
            service_id: None,
            quantity: 3,
            unit_price_cents: i64::MAX / 2,
            description: None,
        },
    );
    assert!(matches!(huge, Err(AppError::InvalidAmount(_))));
    assert_eq!(BillingLogic::get(&pool, id).unwrap().total_cents, 0);
}
