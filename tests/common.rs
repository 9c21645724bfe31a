#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use glamstudio::config::Config;
use glamstudio::core::clients::ClientLogic;
use glamstudio::core::services::ServiceLogic;
use glamstudio::db::migrate::run_pending_migrations;
use glamstudio::db::pool::DbPool;
use glamstudio::models::client::ClientInput;
use glamstudio::models::service::ServiceInput;
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn gs() -> Command {
    cargo_bin_cmd!("glamstudio")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_glamstudio.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// `--test init` on a fresh database file
pub fn init_db(db_path: &str) {
    gs().args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

/// Initialize DB and add one client (#1) and two services:
/// #1 "Haircut" 45 min at 35000, #2 "Dye" 60 min at 80000.
pub fn init_db_with_catalogue(db_path: &str) {
    init_db(db_path);

    gs().args([
        "--db",
        db_path,
        "client",
        "add",
        "--name",
        "Ana Pérez",
        "--phone",
        "3001234567",
    ])
    .assert()
    .success();

    gs().args([
        "--db",
        db_path,
        "service",
        "add",
        "--name",
        "Haircut",
        "--duration",
        "45",
        "--price",
        "35000",
    ])
    .assert()
    .success();

    gs().args([
        "--db",
        db_path,
        "service",
        "add",
        "--name",
        "Dye",
        "--duration",
        "60",
        "--price",
        "80000",
    ])
    .assert()
    .success();
}

// ---------------------------------------------------------------------------
// Library-level helpers (in-memory database)
// ---------------------------------------------------------------------------

pub fn memory_pool() -> DbPool {
    let pool = DbPool::in_memory().expect("open in-memory db");
    run_pending_migrations(&pool.conn).expect("migrate");
    pool
}

pub fn test_config() -> Config {
    Config::with_database(":memory:".to_string())
}

pub fn add_client(pool: &mut DbPool, cfg: &Config, name: &str, phone: &str) -> i64 {
    ClientLogic::create(
        pool,
        cfg,
        &ClientInput {
            full_name: name.to_string(),
            phone: phone.to_string(),
            is_active: true,
            ..Default::default()
        },
    )
    .expect("create client")
    .id
}

pub fn add_service(pool: &mut DbPool, cfg: &Config, name: &str, minutes: i64, price: &str) -> i64 {
    ServiceLogic::create(
        pool,
        cfg,
        &ServiceInput {
            name: name.to_string(),
            description: None,
            duration_minutes: minutes,
            price: price.to_string(),
            is_active: true,
        },
    )
    .expect("create service")
    .id
}
