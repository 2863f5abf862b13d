use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};
use rust_xlsxwriter::Workbook;
use serde_json::{json, Value};

use crate::config::AppConfig;
use crate::domain::entities::document::{NewFileDocument, OwnerId, Record};
use crate::infra::import::xlsx::ingest_workbook;
use crate::infra::sqlite::identity::SqliteIdentity;
use crate::infra::sqlite::schema::init_db;
use crate::infra::sqlite::store::SqliteStore;
use crate::ui::state::app_state::Notice;
use crate::usecase::error::ServiceError;
use crate::usecase::ports::identity::{AuthError, IdentityProvider};
use crate::usecase::ports::store::FileStore;
use crate::usecase::services::admin_service::{AdminService, UNKNOWN_EMAIL};
use crate::usecase::services::chart_service::{
    chart_file_name, classify_numeric_columns, export_chart, format_cell_value, parse_cell_number,
    project_chart_rows,
};
use crate::usecase::services::history_service::HistoryService;
use crate::usecase::services::session::{AuthEvent, Session};
use crate::usecase::services::upload_service::{validate_file_name, UploadService};
use crate::{default_db_path, ensure_webview_data_dir};

fn unique_test_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("excel-analytics-{prefix}-{nanos}"))
}

/// Builds a real single-sheet workbook in memory. String cells are written
/// as text, numbers as numbers, nulls are left blank.
fn workbook_bytes(rows: &[Vec<Value>]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            match cell {
                Value::String(text) => {
                    sheet
                        .write_string(row_idx as u32, col_idx as u16, text)
                        .expect("should write string cell");
                }
                Value::Number(number) => {
                    sheet
                        .write_number(
                            row_idx as u32,
                            col_idx as u16,
                            number.as_f64().expect("numeric cell should be f64"),
                        )
                        .expect("should write number cell");
                }
                Value::Null => {}
                other => panic!("unsupported cell fixture: {other:?}"),
            }
        }
    }
    workbook.save_to_buffer().expect("should save workbook")
}

fn record(pairs: &[(&str, Value)]) -> Record {
    let mut record = Record::new();
    for (key, value) in pairs {
        record.insert((*key).to_string(), value.clone());
    }
    record
}

fn sales_headers() -> Vec<String> {
    vec!["Region".to_string(), "Sales".to_string()]
}

// --- ingestion ---

#[test]
fn ingest_produces_one_record_per_data_row() {
    let bytes = workbook_bytes(&[
        vec![json!("Region"), json!("Sales")],
        vec![json!("East"), json!(100.0)],
        vec![json!("West"), json!(250.0)],
        vec![json!("North"), json!(50.0)],
    ]);

    let table = ingest_workbook(&bytes).expect("ingest should succeed");

    assert_eq!(table.headers, sales_headers());
    assert_eq!(table.records.len(), 3, "record count should be rows minus header");
    for row in &table.records {
        let keys: Vec<&String> = row.keys().collect();
        assert_eq!(keys, vec!["Region", "Sales"], "records should be keyed by the header row");
    }
    assert_eq!(table.records[0]["Region"], json!("East"));
    assert_eq!(table.records[0]["Sales"], json!(100.0));
}

#[test]
fn ingest_empty_sheet_yields_empty_table() {
    let mut workbook = Workbook::new();
    workbook.add_worksheet();
    let bytes = workbook.save_to_buffer().expect("should save workbook");

    let table = ingest_workbook(&bytes).expect("ingest should succeed");

    assert!(table.headers.is_empty());
    assert!(table.records.is_empty());
}

#[test]
fn ingest_zips_ragged_rows_against_headers() {
    let bytes = workbook_bytes(&[
        vec![json!("A"), json!("B")],
        vec![json!("a1"), json!("b1"), json!("extra")],
        vec![json!("a2")],
        vec![Value::Null, json!("b3")],
    ]);

    let table = ingest_workbook(&bytes).expect("ingest should succeed");

    assert_eq!(table.records.len(), 3);
    // Cells past the header row are dropped.
    assert_eq!(table.records[0], record(&[("A", json!("a1")), ("B", json!("b1"))]));
    // Missing cells leave the field unset.
    assert_eq!(table.records[1], record(&[("A", json!("a2"))]));
    // Blank cells do too.
    assert_eq!(table.records[2], record(&[("B", json!("b3"))]));
}

#[test]
fn ingest_reads_first_sheet_only() {
    let mut workbook = Workbook::new();
    let first = workbook.add_worksheet();
    first.write_string(0, 0, "First").expect("should write cell");
    first.write_string(1, 0, "yes").expect("should write cell");
    let second = workbook.add_worksheet();
    second.write_string(0, 0, "Second").expect("should write cell");
    second.write_string(1, 0, "no").expect("should write cell");
    let bytes = workbook.save_to_buffer().expect("should save workbook");

    let table = ingest_workbook(&bytes).expect("ingest should succeed");

    assert_eq!(table.headers, vec!["First".to_string()]);
    assert_eq!(table.records.len(), 1);
    assert_eq!(table.records[0]["First"], json!("yes"));
}

#[test]
fn ingest_rejects_undecodable_bytes_with_format_error() {
    let err = ingest_workbook(b"definitely not a spreadsheet")
        .expect_err("garbage bytes should not decode");
    assert!(matches!(err, ServiceError::Format(_)), "unexpected error: {err:?}");
}

// --- upload boundary ---

#[test]
fn upload_boundary_accepts_only_lowercase_xls_and_xlsx() {
    assert!(validate_file_name("report.xlsx").is_ok());
    assert!(validate_file_name("legacy.xls").is_ok());

    for name in ["data.csv", "report.XLSX", "report.Xls", "noextension", "report.xlsx.bak"] {
        let err = validate_file_name(name).expect_err("name should be rejected");
        assert!(
            matches!(err, ServiceError::Validation(_)),
            "unexpected error for {name}: {err:?}"
        );
    }
}

#[test]
fn upload_rejects_csv_before_any_store_call() {
    let temp_dir = unique_test_dir("upload-csv");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let db_path = temp_dir.join("app.sqlite");

    let store = Arc::new(SqliteStore::new(db_path));
    store.init().expect("store init should succeed");
    let upload = UploadService::new(store.clone());
    let owner = OwnerId("user-1".to_string());

    let err = upload
        .upload(&owner, "data.csv", b"Region,Sales\nEast,100\n")
        .expect_err("csv upload should be rejected");
    assert!(matches!(err, ServiceError::Validation(_)));

    let listed = store.list_by_owner(&owner).expect("list should succeed");
    assert!(listed.is_empty(), "nothing should be stored for a rejected upload");

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn upload_stores_nothing_when_decoding_fails() {
    let temp_dir = unique_test_dir("upload-bad-bytes");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let db_path = temp_dir.join("app.sqlite");

    let store = Arc::new(SqliteStore::new(db_path));
    store.init().expect("store init should succeed");
    let upload = UploadService::new(store.clone());
    let owner = OwnerId("user-1".to_string());

    let err = upload
        .upload(&owner, "broken.xlsx", b"garbage")
        .expect_err("undecodable upload should fail");
    assert!(matches!(err, ServiceError::Format(_)));

    let listed = store.list_by_owner(&owner).expect("list should succeed");
    assert!(listed.is_empty(), "no partial document should be visible");

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn upload_round_trips_headers_and_records() {
    let temp_dir = unique_test_dir("upload-round-trip");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let db_path = temp_dir.join("app.sqlite");

    let store = Arc::new(SqliteStore::new(db_path));
    store.init().expect("store init should succeed");
    let upload = UploadService::new(store.clone());
    let owner = OwnerId("user-1".to_string());

    let bytes = workbook_bytes(&[
        vec![json!("Region"), json!("Sales")],
        vec![json!("East"), json!("200")],
        vec![json!("West"), json!(150.0)],
    ]);
    let ingested = ingest_workbook(&bytes).expect("ingest should succeed");

    upload
        .upload(&owner, "sales.xlsx", &bytes)
        .expect("upload should succeed");

    let listed = store.list_by_owner(&owner).expect("list should succeed");
    assert_eq!(listed.len(), 1);
    let document = &listed[0];
    assert_eq!(document.name, "sales.xlsx");
    assert_eq!(document.size, bytes.len() as i64);
    assert_eq!(document.headers, ingested.headers);
    let stored_records = document.records().expect("stored data should parse");
    assert_eq!(stored_records, ingested.records);
    assert_eq!(stored_records[0]["Sales"], json!("200"), "string fields survive byte for byte");

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

// --- store contract ---

fn new_document(name: &str, uploaded_at_millis: i64) -> NewFileDocument {
    NewFileDocument {
        name: name.to_string(),
        uploaded_at: DateTime::<Utc>::from_timestamp_millis(uploaded_at_millis)
            .expect("fixture timestamp should be valid"),
        size: 1,
        headers: sales_headers(),
        data: "[]".to_string(),
    }
}

#[test]
fn list_orders_most_recent_first_with_insertion_order_ties() {
    let temp_dir = unique_test_dir("store-ordering");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let db_path = temp_dir.join("app.sqlite");

    let store = SqliteStore::new(db_path);
    store.init().expect("store init should succeed");
    let owner = OwnerId("user-1".to_string());

    store.store(&owner, new_document("old.xlsx", 1_000)).expect("store should succeed");
    store.store(&owner, new_document("tie-a.xlsx", 2_000)).expect("store should succeed");
    store.store(&owner, new_document("tie-b.xlsx", 2_000)).expect("store should succeed");

    let names: Vec<String> = store
        .list_by_owner(&owner)
        .expect("list should succeed")
        .into_iter()
        .map(|document| document.name)
        .collect();
    assert_eq!(names, vec!["tie-a.xlsx", "tie-b.xlsx", "old.xlsx"]);

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn store_scopes_documents_by_owner() {
    let temp_dir = unique_test_dir("store-scoping");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let db_path = temp_dir.join("app.sqlite");

    let store = SqliteStore::new(db_path);
    store.init().expect("store init should succeed");
    let alice = OwnerId("alice".to_string());
    let bob = OwnerId("bob".to_string());

    store.store(&alice, new_document("a.xlsx", 1_000)).expect("store should succeed");

    assert_eq!(store.list_by_owner(&alice).expect("list should succeed").len(), 1);
    assert!(store.list_by_owner(&bob).expect("list should succeed").is_empty());
    assert_eq!(store.count_by_owner(&alice).expect("count should succeed"), 1);
    assert_eq!(store.count_by_owner(&bob).expect("count should succeed"), 0);

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn watch_delivers_full_snapshots_until_cancelled() {
    let temp_dir = unique_test_dir("store-watch");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let db_path = temp_dir.join("app.sqlite");

    let store = Arc::new(SqliteStore::new(db_path));
    store.init().expect("store init should succeed");
    let history = HistoryService::new(store.clone());
    let owner = OwnerId("user-1".to_string());

    store.store(&owner, new_document("first.xlsx", 1_000)).expect("store should succeed");

    let snapshots: Arc<Mutex<Vec<Vec<String>>>> = Arc::new(Mutex::new(Vec::new()));
    let snapshots_for_watch = snapshots.clone();
    let subscription = history
        .watch(
            &owner,
            Box::new(move |snapshot| {
                let names = snapshot.iter().map(|document| document.name.clone()).collect();
                snapshots_for_watch
                    .lock()
                    .expect("snapshot log should lock")
                    .push(names);
            }),
        )
        .expect("watch should succeed");

    store.store(&owner, new_document("second.xlsx", 2_000)).expect("store should succeed");

    subscription.cancel();
    store.store(&owner, new_document("third.xlsx", 3_000)).expect("store should succeed");

    let log = snapshots.lock().expect("snapshot log should lock");
    assert_eq!(
        *log,
        vec![
            vec!["first.xlsx".to_string()],
            vec!["second.xlsx".to_string(), "first.xlsx".to_string()],
        ],
        "one immediate snapshot, one per store, nothing after cancel"
    );

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn delete_removes_document_and_notifies_watchers() {
    let temp_dir = unique_test_dir("store-delete");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let db_path = temp_dir.join("app.sqlite");

    let store = Arc::new(SqliteStore::new(db_path));
    store.init().expect("store init should succeed");
    let history = HistoryService::new(store.clone());
    let owner = OwnerId("user-1".to_string());

    let id = store.store(&owner, new_document("doomed.xlsx", 1_000)).expect("store should succeed");

    let snapshot_count = Arc::new(Mutex::new(0_usize));
    let count_for_watch = snapshot_count.clone();
    let _subscription = history
        .watch(
            &owner,
            Box::new(move |_| {
                *count_for_watch.lock().expect("counter should lock") += 1;
            }),
        )
        .expect("watch should succeed");

    history.delete(&owner, id).expect("delete should succeed");

    assert!(store.list_by_owner(&owner).expect("list should succeed").is_empty());
    assert_eq!(*snapshot_count.lock().expect("counter should lock"), 2);

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

// --- query/shape layer ---

#[test]
fn classifier_accepts_numbers_and_fully_numeric_strings() {
    let records = vec![
        record(&[("Region", json!("East")), ("Sales", json!(100.0))]),
        record(&[("Region", json!("West")), ("Sales", json!(" 42.5 "))]),
        record(&[("Region", json!("North")), ("Sales", json!("50"))]),
    ];

    let numeric = classify_numeric_columns(&sales_headers(), &records);

    assert_eq!(numeric, vec!["Sales".to_string()]);
}

#[test]
fn classifier_excludes_column_with_single_bad_cell() {
    let records = vec![
        record(&[("Region", json!("East")), ("Sales", json!(100.0))]),
        record(&[("Region", json!("West")), ("Sales", json!("bad"))]),
        record(&[("Region", json!("North")), ("Sales", json!(50.0))]),
    ];

    let numeric = classify_numeric_columns(&sales_headers(), &records);

    assert!(numeric.is_empty(), "one unparseable cell disqualifies the column");
}

#[test]
fn classifier_treats_unset_cell_as_disqualifying() {
    let records = vec![
        record(&[("Region", json!("East")), ("Sales", json!(100.0))]),
        record(&[("Region", json!("West"))]),
    ];

    let numeric = classify_numeric_columns(&sales_headers(), &records);

    assert!(numeric.is_empty());
}

#[test]
fn classifier_is_empty_for_empty_record_set() {
    assert!(classify_numeric_columns(&sales_headers(), &[]).is_empty());
}

#[test]
fn classifier_shrinks_when_a_blocking_row_is_added() {
    let mut records = vec![
        record(&[("Region", json!("East")), ("Sales", json!(100.0))]),
        record(&[("Region", json!("North")), ("Sales", json!(50.0))]),
    ];
    assert_eq!(
        classify_numeric_columns(&sales_headers(), &records),
        vec!["Sales".to_string()]
    );

    records.push(record(&[("Region", json!("West")), ("Sales", json!("bad"))]));
    assert!(classify_numeric_columns(&sales_headers(), &records).is_empty());
}

#[test]
fn full_parse_rejects_numeric_prefixes_and_non_finite_values() {
    assert_eq!(parse_cell_number(&json!("42")), Some(42.0));
    assert_eq!(parse_cell_number(&json!(" 42.5 ")), Some(42.5));
    assert_eq!(parse_cell_number(&json!(7)), Some(7.0));

    assert_eq!(parse_cell_number(&json!("100abc")), None);
    assert_eq!(parse_cell_number(&json!("")), None);
    assert_eq!(parse_cell_number(&json!("   ")), None);
    assert_eq!(parse_cell_number(&json!("NaN")), None);
    assert_eq!(parse_cell_number(&json!("inf")), None);
    assert_eq!(parse_cell_number(&json!(true)), None);
    assert_eq!(parse_cell_number(&Value::Null), None);
}

#[test]
fn projection_coerces_value_field_and_preserves_order() {
    let records = vec![
        record(&[("Region", json!("East")), ("Sales", json!("200"))]),
        record(&[("Region", json!("West")), ("Sales", json!(150.0))]),
    ];

    let rows = project_chart_rows(&sales_headers(), &records, "Region", "Sales");

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].fields["Region"], json!("East"));
    assert_eq!(rows[0].value, 200.0);
    assert_eq!(rows[1].fields["Region"], json!("West"));
    assert_eq!(rows[1].value, 150.0);
}

#[test]
fn projection_keeps_unparseable_rows_as_nan_gaps() {
    let records = vec![
        record(&[("Region", json!("East")), ("Sales", json!(100.0))]),
        record(&[("Region", json!("West")), ("Sales", json!("bad"))]),
        record(&[("Region", json!("North")), ("Sales", json!(50.0))]),
    ];

    let rows = project_chart_rows(&sales_headers(), &records, "Region", "Sales");

    assert_eq!(rows.len(), 3, "unparseable rows are kept, not dropped");
    assert!(rows[1].value.is_nan());
    assert_eq!(rows[2].value, 50.0);
}

#[test]
fn projection_returns_empty_for_unset_or_unknown_axes() {
    let records = vec![record(&[("Region", json!("East")), ("Sales", json!(100.0))])];
    let headers = sales_headers();

    assert!(project_chart_rows(&headers, &records, "", "Sales").is_empty());
    assert!(project_chart_rows(&headers, &records, "Region", "").is_empty());
    assert!(project_chart_rows(&headers, &records, "Profit", "Sales").is_empty());
    assert!(project_chart_rows(&headers, &records, "Region", "Profit").is_empty());
    assert!(project_chart_rows(&headers, &[], "Region", "Sales").is_empty());
}

#[test]
fn format_cell_value_renders_strings_verbatim() {
    assert_eq!(format_cell_value(&json!("East")), "East");
    assert_eq!(format_cell_value(&json!(150.0)), "150.0");
    assert_eq!(format_cell_value(&Value::Null), "");

    // The preview table renders unset cells through the null default.
    let row = record(&[("Region", json!("East"))]);
    assert_eq!(
        format_cell_value(row.get("Sales").unwrap_or(&Value::Null)),
        ""
    );
}

// --- chart export ---

#[test]
fn chart_export_writes_png_named_after_document() {
    let temp_dir = unique_test_dir("chart-export");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");

    let records = vec![
        record(&[("Region", json!("East")), ("Sales", json!(100.0))]),
        record(&[("Region", json!("West")), ("Sales", json!("bad"))]),
        record(&[("Region", json!("North")), ("Sales", json!(50.0))]),
    ];
    let rows = project_chart_rows(&sales_headers(), &records, "Region", "Sales");

    let exported = export_chart("sales.xlsx", &rows, &temp_dir)
        .expect("export should succeed")
        .expect("export should produce a file");

    assert_eq!(exported, temp_dir.join("sales.xlsx-chart.png"));
    let bytes = fs::read(&exported).expect("exported chart should be readable");
    assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']), "exported file should be a PNG");

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn chart_export_without_rows_is_a_silent_noop() {
    let temp_dir = unique_test_dir("chart-export-empty");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");

    let exported = export_chart("sales.xlsx", &[], &temp_dir).expect("export should succeed");

    assert!(exported.is_none());
    assert!(!temp_dir.join(chart_file_name("sales.xlsx")).exists());

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

// --- session & identity ---

#[test]
fn session_fans_out_sign_in_and_sign_out_events() {
    let temp_dir = unique_test_dir("session-events");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let db_path = temp_dir.join("app.sqlite");
    init_db(&db_path).expect("init_db should succeed");

    let identity: Arc<dyn IdentityProvider> = Arc::new(SqliteIdentity::new(db_path));
    let session = Session::new(identity);

    let events: Arc<Mutex<Vec<AuthEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let events_for_listener = events.clone();
    let subscription = session.subscribe(move |event| {
        events_for_listener
            .lock()
            .expect("event log should lock")
            .push(event.clone());
    });

    let account = session
        .sign_up("alice@example.com", "hunter2!")
        .expect("sign up should succeed");
    assert_eq!(session.current_user(), Some(account.clone()));

    session.sign_out();
    assert_eq!(session.current_user(), None);

    subscription.cancel();
    session
        .sign_in("alice@example.com", "hunter2!")
        .expect("sign in should succeed");

    let log = events.lock().expect("event log should lock");
    assert_eq!(
        *log,
        vec![AuthEvent::SignedIn(account), AuthEvent::SignedOut],
        "cancelled listeners receive no further events"
    );

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn identity_rejects_duplicate_emails_and_wrong_passwords() {
    let temp_dir = unique_test_dir("identity-errors");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let db_path = temp_dir.join("app.sqlite");
    init_db(&db_path).expect("init_db should succeed");

    let identity = SqliteIdentity::new(db_path);

    let account = identity
        .sign_up("alice@example.com", "hunter2!")
        .expect("sign up should succeed");

    let duplicate = identity
        .sign_up("alice@example.com", "other-password")
        .expect_err("duplicate email should be rejected");
    assert_eq!(duplicate, AuthError::EmailTaken);

    let wrong_password = identity
        .sign_in("alice@example.com", "wrong")
        .expect_err("wrong password should be rejected");
    assert_eq!(wrong_password, AuthError::InvalidCredentials);

    let unknown = identity
        .sign_in("nobody@example.com", "hunter2!")
        .expect_err("unknown email should be rejected");
    assert_eq!(unknown, AuthError::InvalidCredentials);

    let signed_in = identity
        .sign_in("alice@example.com", "hunter2!")
        .expect("correct credentials should sign in");
    assert_eq!(signed_in, account);

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

// --- admin ---

#[test]
fn admin_report_counts_per_owner_and_falls_back_to_na_email() {
    let temp_dir = unique_test_dir("admin-report");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let db_path = temp_dir.join("app.sqlite");

    let store = Arc::new(SqliteStore::new(db_path.clone()));
    store.init().expect("store init should succeed");
    let identity = Arc::new(SqliteIdentity::new(db_path));

    let alice = identity
        .sign_up("alice@example.com", "hunter2!")
        .expect("sign up should succeed");
    store.store(&alice.id, new_document("a1.xlsx", 1_000)).expect("store should succeed");
    store.store(&alice.id, new_document("a2.xlsx", 2_000)).expect("store should succeed");

    // Owner namespace with no matching account in the email index.
    let ghost = OwnerId("ghost-owner".to_string());
    store.store(&ghost, new_document("g1.xlsx", 3_000)).expect("store should succeed");

    let admin = AdminService::new(store, identity);
    let report = admin.report().expect("report should succeed");

    assert_eq!(report.total_users, 1);
    assert_eq!(report.total_files, 3);
    assert_eq!(report.rows.len(), 2);

    let alice_row = report
        .rows
        .iter()
        .find(|row| row.owner == alice.id)
        .expect("alice should appear in the report");
    assert_eq!(alice_row.email, "alice@example.com");
    assert_eq!(alice_row.file_count, 2);

    let ghost_row = report
        .rows
        .iter()
        .find(|row| row.owner == ghost)
        .expect("ghost owner should appear in the report");
    assert_eq!(ghost_row.email, UNKNOWN_EMAIL);
    assert_eq!(ghost_row.file_count, 1);

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

// --- config ---

#[test]
fn admin_policy_comes_from_config_file() {
    let temp_dir = unique_test_dir("config");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let config_path = temp_dir.join("config.json");

    let missing = AppConfig::load(&config_path).expect("missing config should default");
    assert!(!missing.is_admin("alice@example.com"));

    fs::write(&config_path, r#"{ "admin_emails": ["alice@example.com"] }"#)
        .expect("should write config fixture");
    let loaded = AppConfig::load(&config_path).expect("config should load");
    assert!(loaded.is_admin("alice@example.com"));
    assert!(!loaded.is_admin("bob@example.com"));

    fs::write(&config_path, "not json").expect("should write config fixture");
    assert!(AppConfig::load(&config_path).is_err(), "malformed config is an error");

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

// --- notices & paths ---

#[test]
fn fresh_notice_is_not_expired() {
    let notice = Notice::error("Failed to process the Excel file.");
    assert!(!notice.is_expired());
}

#[test]
fn default_db_path_uses_app_data_directory() {
    let db_path = default_db_path().expect("default db path should resolve");
    let app_dir = db_path
        .parent()
        .and_then(|path| path.file_name())
        .and_then(|name| name.to_str())
        .expect("db path should include app directory");

    assert_eq!(
        db_path.file_name().and_then(|name| name.to_str()),
        Some("documents.sqlite")
    );
    assert_eq!(app_dir, "excel-analytics");
}

#[test]
fn ensure_webview_data_dir_creates_webview2_subdir() {
    let temp_dir = unique_test_dir("webview-data-dir");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");

    let webview_dir =
        ensure_webview_data_dir(&temp_dir).expect("webview data dir should be created");

    assert_eq!(webview_dir, temp_dir.join("webview2"));
    assert!(webview_dir.is_dir(), "webview2 directory should exist");

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}
