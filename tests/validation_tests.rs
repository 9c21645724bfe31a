use glamstudio::core::clients::{ClientLogic, normalize_phone};
use glamstudio::core::services::ServiceLogic;
use glamstudio::errors::AppError;
use glamstudio::models::client::ClientInput;
use glamstudio::models::service::ServiceInput;
use glamstudio::utils::date::parse_range;
use glamstudio::utils::money::{format_cents, parse_major_units};
use glamstudio::utils::time::mins2readable;

mod common;
use common::{add_client, add_service, memory_pool, test_config};

#[test]
fn phone_is_normalized_and_length_checked() {
    let cfg = test_config();

    assert_eq!(normalize_phone(" (300) 123-4567 ", &cfg).unwrap(), "3001234567");
    assert!(matches!(
        normalize_phone("12345", &cfg),
        Err(AppError::InvalidPhone { min: 7, max: 12, .. })
    ));
    assert!(normalize_phone("1234567890123", &cfg).is_err());
    assert!(normalize_phone("300-ABC-4567", &cfg).is_err());
}

#[test]
fn duplicate_phone_is_rejected_but_own_phone_may_be_kept() {
    let mut pool = memory_pool();
    let cfg = test_config();
    let ana = add_client(&mut pool, &cfg, "Ana", "3001234567");

    let dup = ClientLogic::create(
        &mut pool,
        &cfg,
        &ClientInput {
            full_name: "Other".into(),
            phone: "300 123 4567".into(),
            ..Default::default()
        },
    );
    assert!(matches!(dup, Err(AppError::DuplicatePhone(p)) if p == "3001234567"));

    let edited = ClientLogic::update(
        &mut pool,
        &cfg,
        ana,
        &ClientInput {
            full_name: "Ana María".into(),
            phone: "3001234567".into(),
            email: Some("   ".into()),
            is_vip: true,
            is_active: true,
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(edited.id, ana);
    assert_eq!(edited.full_name, "Ana María");
    assert_eq!(edited.email, None);
    assert!(edited.is_vip);
}

#[test]
fn client_with_history_cannot_be_deleted() {
    let mut pool = memory_pool();
    let cfg = test_config();
    let ana = add_client(&mut pool, &cfg, "Ana", "3001234567");
    glamstudio::core::billing::BillingLogic::create_draft(&mut pool, ana, None).unwrap();

    assert!(matches!(
        ClientLogic::delete(&mut pool, ana),
        Err(AppError::ClientInUse { invoices: 1, .. })
    ));

    let luz = add_client(&mut pool, &cfg, "Luz", "3119876543");
    ClientLogic::delete(&mut pool, luz).unwrap();
    assert_eq!(ClientLogic::list(&pool, None).unwrap().len(), 1);
}

#[test]
fn service_rules() {
    let mut pool = memory_pool();
    let cfg = test_config();
    add_service(&mut pool, &cfg, "Haircut", 45, "35000");

    let input = |name: &str, minutes: i64, price: &str| ServiceInput {
        name: name.to_string(),
        description: None,
        duration_minutes: minutes,
        price: price.to_string(),
        is_active: true,
    };

    assert!(matches!(
        ServiceLogic::create(&mut pool, &cfg, &input("Haircut", 30, "1000")),
        Err(AppError::DuplicateServiceName(_))
    ));
    assert!(matches!(
        ServiceLogic::create(&mut pool, &cfg, &input("Quick", 3, "1000")),
        Err(AppError::InvalidDuration { value: 3, .. })
    ));
    assert!(matches!(
        ServiceLogic::create(&mut pool, &cfg, &input("Spa", 60, "12.5k")),
        Err(AppError::InvalidAmount(_))
    ));
    assert!(matches!(
        ServiceLogic::create(&mut pool, &cfg, &input("  ", 60, "1000")),
        Err(AppError::BlankField(_))
    ));

    let spa = ServiceLogic::create(&mut pool, &cfg, &input("Spa", 90, "120.000")).unwrap();
    assert_eq!(spa.price_cents, 12_000_000);

    ServiceLogic::set_active(&mut pool, spa.id, false).unwrap();
    assert_eq!(ServiceLogic::list(&pool, None, false).unwrap().len(), 1);
    assert_eq!(ServiceLogic::list(&pool, None, true).unwrap().len(), 2);
}

#[test]
fn money_and_time_formatting() {
    assert_eq!(parse_major_units("35000").unwrap(), 3_500_000);
    assert_eq!(parse_major_units("1,250").unwrap(), 125_000);
    assert!(parse_major_units("").is_err());
    assert!(parse_major_units("-10").is_err());

    assert_eq!(format_cents(11_500_000, "$"), "$115,000.00");
    assert_eq!(format_cents(5, "$"), "$0.05");
    assert_eq!(format_cents(-123_456, "€"), "-€1,234.56");

    assert_eq!(mins2readable(95), "01h 35m");
    assert_eq!(mins2readable(0), "00h 00m");
}

#[test]
fn period_expressions() {
    let (from, to) = parse_range("2025-02").unwrap();
    assert_eq!(from.to_string(), "2025-02-01");
    assert_eq!(to.to_string(), "2025-02-28");

    let (from, to) = parse_range("2024:2025-03").unwrap();
    assert_eq!(from.to_string(), "2024-01-01");
    assert_eq!(to.to_string(), "2025-03-31");

    assert!(parse_range("2025-03:2025-01").is_err());
    assert!(parse_range("March").is_err());
}
