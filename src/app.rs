use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use dioxus::prelude::*;
use rfd::FileDialog;

use crate::config::AppConfig;
use crate::domain::entities::document::{DocumentId, FileDocument, Record};
use crate::infra::sqlite::identity::SqliteIdentity;
use crate::infra::sqlite::store::SqliteStore;
use crate::platform::desktop::blocking::run_blocking;
use crate::ui::state::app_state::{AppState, Notice, NoticeLevel, NOTICE_TTL};
use crate::usecase::error::ServiceError;
use crate::usecase::ports::identity::IdentityProvider;
use crate::usecase::ports::store::{FileStore, HistorySubscription};
use crate::usecase::services::admin_service::AdminService;
use crate::usecase::services::chart_service::{
    classify_numeric_columns, export_chart, format_cell_value, project_chart_rows,
    render_bar_chart,
};
use crate::usecase::services::history_service::HistoryService;
use crate::usecase::services::session::{AuthEvent, Session};
use crate::usecase::services::upload_service::UploadService;
use crate::{default_chart_preview_path, default_config_path, default_db_path};

struct Services {
    session: Arc<Session>,
    store: Arc<dyn FileStore>,
    upload: Arc<UploadService>,
    history: Arc<HistoryService>,
    admin: Arc<AdminService>,
    config: AppConfig,
}

fn push_notice(mut notice: Signal<Option<Notice>>, next: Notice) {
    notice.set(Some(next));
    spawn(async move {
        tokio::time::sleep(NOTICE_TTL).await;
        let expired = notice().map(|current| current.is_expired()).unwrap_or(false);
        if expired {
            notice.set(None);
        }
    });
}

/// Recomputes the chart preview for the current axis selection. Returns a
/// data URI for the rendered PNG, or None when no chart can be drawn yet.
fn refresh_chart(
    preview_path: &Path,
    headers: &[String],
    records: &[Record],
    x_axis: &str,
    y_axis: &str,
) -> Option<String> {
    let rows = project_chart_rows(headers, records, x_axis, y_axis);
    if rows.is_empty() {
        return None;
    }
    if let Err(err) = render_bar_chart(&rows, 800, 480, preview_path) {
        tracing::warn!("failed to render chart preview: {err:#}");
        return None;
    }
    let bytes = std::fs::read(preview_path).ok()?;
    Some(format!("data:image/png;base64,{}", BASE64.encode(bytes)))
}

#[allow(clippy::too_many_arguments)]
fn open_document(
    document: &FileDocument,
    preview_path: &Path,
    mut selected_document: Signal<Option<FileDocument>>,
    mut records: Signal<Vec<Record>>,
    mut x_axis: Signal<String>,
    mut y_axis: Signal<String>,
    mut chart_uri: Signal<Option<String>>,
    notice: Signal<Option<Notice>>,
) {
    let parsed = match document.records() {
        Ok(parsed) => parsed,
        Err(err) => {
            push_notice(
                notice,
                Notice::error(format!("Failed to read stored file data: {err}")),
            );
            Vec::new()
        }
    };
    let x = document.headers.first().cloned().unwrap_or_default();
    let y = document.headers.get(1).cloned().unwrap_or_default();
    selected_document.set(Some(document.clone()));
    x_axis.set(x.clone());
    y_axis.set(y.clone());
    chart_uri.set(refresh_chart(preview_path, &document.headers, &parsed, &x, &y));
    records.set(parsed);
}

#[component]
fn NoticeBanner(notice: Signal<Option<Notice>>) -> Element {
    let Some(current) = notice() else {
        return rsx! {};
    };
    let style = match current.level {
        NoticeLevel::Success => {
            "padding: 8px 12px; margin: 8px 0; border-radius: 6px; \
             background: #dcfce7; color: #166534;"
        }
        NoticeLevel::Error => {
            "padding: 8px 12px; margin: 8px 0; border-radius: 6px; \
             background: #fee2e2; color: #991b1b;"
        }
    };
    rsx! {
        div { style: "{style}", "{current.message}" }
    }
}

#[component]
fn DocumentRow(
    document: FileDocument,
    on_select: EventHandler<FileDocument>,
    on_delete: EventHandler<DocumentId>,
) -> Element {
    let uploaded = document.uploaded_at.format("%Y-%m-%d %H:%M").to_string();
    let size_kb = (document.size as f64 / 1024.0).round() as i64;
    let document_id = document.id;
    let selected = document.clone();
    rsx! {
        div {
            style: "display: flex; justify-content: space-between; align-items: center; \
                    padding: 8px 12px; margin: 4px 0; border: 1px solid #e5e7eb; \
                    border-radius: 6px; cursor: pointer;",
            onclick: move |_| on_select.call(selected.clone()),
            div {
                p { style: "font-weight: 600; margin: 0;", "{document.name}" }
                p { style: "color: #6b7280; font-size: 12px; margin: 0;",
                    "Uploaded {uploaded} · {size_kb} KB"
                }
            }
            button {
                onclick: move |event| {
                    event.stop_propagation();
                    on_delete.call(document_id);
                },
                "Delete"
            }
        }
    }
}

#[component]
pub fn App() -> Element {
    let db_path = match default_db_path() {
        Ok(path) => path,
        Err(err) => {
            return rsx! {
                div { p { "Unable to resolve the data directory: {err}" } }
            };
        }
    };
    let preview_path = match default_chart_preview_path() {
        Ok(path) => Arc::new(path),
        Err(err) => {
            return rsx! {
                div { p { "Unable to resolve the data directory: {err}" } }
            };
        }
    };

    let services = use_hook(|| {
        let store = Arc::new(SqliteStore::new(db_path.clone()));
        let identity = Arc::new(SqliteIdentity::new(db_path.clone()));
        let config = match default_config_path().and_then(|path| AppConfig::load(&path)) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("failed to load config, running without admins: {err:#}");
                AppConfig::default()
            }
        };
        Rc::new(Services {
            session: Arc::new(Session::new(identity.clone() as Arc<dyn IdentityProvider>)),
            store: store.clone() as Arc<dyn FileStore>,
            upload: Arc::new(UploadService::new(store.clone() as Arc<dyn FileStore>)),
            history: Arc::new(HistoryService::new(store.clone() as Arc<dyn FileStore>)),
            admin: Arc::new(AdminService::new(
                store as Arc<dyn FileStore>,
                identity as Arc<dyn IdentityProvider>,
            )),
            config,
        })
    });

    let state = AppState::new();
    let mut current_user = state.current_user;
    let mut email_input = state.email_input;
    let mut password_input = state.password_input;
    let mut signup_mode = state.signup_mode;
    let mut selected_path = state.selected_path;
    let mut uploading = state.uploading;
    let mut files = state.files;
    let mut selected_document = state.selected_document;
    let mut records = state.records;
    let mut x_axis = state.x_axis;
    let mut y_axis = state.y_axis;
    let mut chart_uri = state.chart_uri;
    let mut admin_view = state.admin_view;
    let mut admin_report = state.admin_report;
    let notice = state.notice;

    let history_subscription =
        use_hook(|| Rc::new(RefCell::new(None::<HistorySubscription>)));

    let services_for_init = services.clone();
    use_effect(move || {
        if let Err(err) = services_for_init.store.init() {
            push_notice(
                notice,
                Notice::error(format!("Failed to initialize local storage: {err}")),
            );
        }
    });

    // Single subscription point for auth state changes; view state follows
    // the session rather than being set ad hoc by each handler.
    let session_for_events = services.session.clone();
    let _auth_subscription = use_hook(move || {
        let (event_tx, mut event_rx) = tokio::sync::mpsc::unbounded_channel::<AuthEvent>();
        let subscription = session_for_events.subscribe(move |event| {
            let _ = event_tx.send(event.clone());
        });
        spawn(async move {
            while let Some(event) = event_rx.recv().await {
                match event {
                    AuthEvent::SignedIn(account) => {
                        current_user.set(Some(account));
                    }
                    AuthEvent::SignedOut => {
                        current_user.set(None);
                        files.set(Vec::new());
                        selected_document.set(None);
                        records.set(Vec::new());
                        chart_uri.set(None);
                        admin_view.set(false);
                        admin_report.set(None);
                    }
                }
            }
        });
        Rc::new(subscription)
    });

    let session_for_submit = services.session.clone();
    let history_for_submit = services.history.clone();
    let subscription_for_submit = history_subscription.clone();
    let on_auth_submit = move |_| {
        let email = email_input();
        let password = password_input();
        let signup = signup_mode();
        let result = run_blocking(|| {
            if signup {
                session_for_submit.sign_up(&email, &password)
            } else {
                session_for_submit.sign_in(&email, &password)
            }
        });
        match result {
            Ok(account) => {
                password_input.set(String::new());
                let (snapshot_tx, mut snapshot_rx) =
                    tokio::sync::mpsc::unbounded_channel::<Vec<FileDocument>>();
                let watch_result = run_blocking(|| {
                    history_for_submit.watch(
                        &account.id,
                        Box::new(move |snapshot| {
                            let _ = snapshot_tx.send(snapshot.to_vec());
                        }),
                    )
                });
                match watch_result {
                    Ok(subscription) => {
                        *subscription_for_submit.borrow_mut() = Some(subscription);
                    }
                    Err(err) => push_notice(
                        notice,
                        Notice::error(format!("Could not fetch file history: {err}")),
                    ),
                }
                spawn(async move {
                    while let Some(snapshot) = snapshot_rx.recv().await {
                        files.set(snapshot);
                    }
                });
            }
            Err(err) => push_notice(notice, Notice::error(err.to_string())),
        }
    };

    let session_for_signout = services.session.clone();
    let subscription_for_signout = history_subscription.clone();
    let on_sign_out = move |_| {
        if let Some(subscription) = subscription_for_signout.borrow_mut().take() {
            subscription.cancel();
        }
        session_for_signout.sign_out();
    };

    let upload_for_submit = services.upload.clone();
    let on_upload = move |_| {
        let Some(user) = current_user() else {
            return;
        };
        let Some(path) = selected_path() else {
            push_notice(notice, Notice::error("Please select a file first."));
            return;
        };
        let Some(file_name) = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
        else {
            push_notice(notice, Notice::error("Please upload only .xls or .xlsx files."));
            return;
        };
        *uploading.write() = true;
        let result = run_blocking(|| {
            let bytes = std::fs::read(&path).map_err(|err| {
                ServiceError::Connectivity(format!("failed to read {}: {err}", path.display()))
            })?;
            upload_for_submit.upload(&user.id, &file_name, &bytes)
        });
        match result {
            Ok(_) => {
                selected_path.set(None);
                push_notice(
                    notice,
                    Notice::success("File uploaded and processed successfully!"),
                );
            }
            Err(err) => push_notice(notice, Notice::error(err.to_string())),
        }
        *uploading.write() = false;
    };

    let admin_for_open = services.admin.clone();
    let on_toggle_admin = move |_| {
        if admin_view() {
            admin_view.set(false);
            return;
        }
        match run_blocking(|| admin_for_open.report()) {
            Ok(report) => {
                admin_report.set(Some(report));
                admin_view.set(true);
            }
            Err(err) => push_notice(
                notice,
                Notice::error(format!("Failed to load admin dashboard data: {err}")),
            ),
        }
    };

    let preview_for_x = preview_path.clone();
    let preview_for_y = preview_path.clone();
    let history_for_delete = services.history.clone();

    let is_admin = current_user()
        .map(|user| services.config.is_admin(&user.email))
        .unwrap_or(false);
    let numeric_headers = selected_document()
        .map(|document| classify_numeric_columns(&document.headers, &records()))
        .unwrap_or_default();

    rsx! {
        div {
            style: "font-family: sans-serif; max-width: 960px; margin: 0 auto; padding: 16px;",
            header {
                style: "display: flex; justify-content: space-between; align-items: center; \
                        padding-bottom: 12px; border-bottom: 1px solid #e5e7eb;",
                h1 { style: "margin: 0; font-size: 22px;", "Excel Analytics" }
                if let Some(user) = current_user() {
                    div {
                        style: "display: flex; gap: 8px; align-items: center;",
                        span { style: "color: #6b7280;", "{user.email}" }
                        if is_admin {
                            button {
                                onclick: on_toggle_admin,
                                if admin_view() { "User View" } else { "Admin Panel" }
                            }
                        }
                        button { onclick: on_sign_out, "Logout" }
                    }
                }
            }

            NoticeBanner { notice: notice }

            if current_user().is_none() {
                div {
                    style: "max-width: 360px; margin: 48px auto; padding: 24px; \
                            border: 1px solid #e5e7eb; border-radius: 8px;",
                    h2 {
                        if signup_mode() { "Create an account" } else { "Login" }
                    }
                    input {
                        style: "display: block; width: 100%; margin: 8px 0; padding: 8px;",
                        placeholder: "Email",
                        value: "{email_input}",
                        oninput: move |event| email_input.set(event.value()),
                    }
                    input {
                        style: "display: block; width: 100%; margin: 8px 0; padding: 8px;",
                        r#type: "password",
                        placeholder: "Password",
                        value: "{password_input}",
                        oninput: move |event| password_input.set(event.value()),
                    }
                    button {
                        style: "width: 100%; margin-top: 8px; padding: 8px;",
                        onclick: on_auth_submit,
                        if signup_mode() { "Sign Up" } else { "Login" }
                    }
                    p {
                        style: "text-align: center; color: #6b7280;",
                        if signup_mode() { "Already have an account?" } else { "Need an account?" }
                        button {
                            style: "margin-left: 6px;",
                            onclick: move |_| {
                                let flipped = !signup_mode();
                                signup_mode.set(flipped);
                            },
                            if signup_mode() { "Login" } else { "Sign Up" }
                        }
                    }
                }
            } else if admin_view() {
                div {
                    h2 { "Admin Dashboard" }
                    if let Some(report) = admin_report() {
                        div {
                            style: "display: flex; gap: 16px; margin-bottom: 16px;",
                            div {
                                style: "padding: 16px; background: #eff6ff; border-radius: 8px;",
                                p { style: "margin: 0; color: #1e40af;", "Total Users" }
                                p { style: "margin: 0; font-size: 28px; font-weight: 700;",
                                    "{report.total_users}"
                                }
                            }
                            div {
                                style: "padding: 16px; background: #f0fdf4; border-radius: 8px;",
                                p { style: "margin: 0; color: #166534;", "Total Files Uploaded" }
                                p { style: "margin: 0; font-size: 28px; font-weight: 700;",
                                    "{report.total_files}"
                                }
                            }
                        }
                        table {
                            style: "width: 100%; border-collapse: collapse;",
                            thead {
                                tr {
                                    th { style: "text-align: left; padding: 8px; background: #f3f4f6;", "User Email" }
                                    th { style: "text-align: left; padding: 8px; background: #f3f4f6;", "User ID" }
                                    th { style: "text-align: right; padding: 8px; background: #f3f4f6;", "Files Uploaded" }
                                }
                            }
                            tbody {
                                for row in report.rows.iter() {
                                    tr {
                                        td { style: "padding: 8px; border-top: 1px solid #e5e7eb;", "{row.email}" }
                                        td { style: "padding: 8px; border-top: 1px solid #e5e7eb; color: #6b7280;", "{row.owner.0}" }
                                        td { style: "padding: 8px; border-top: 1px solid #e5e7eb; text-align: right;", "{row.file_count}" }
                                    }
                                }
                            }
                        }
                    }
                }
            } else if let Some(document) = selected_document() {
                div {
                    div {
                        style: "display: flex; justify-content: space-between; align-items: center;",
                        h2 { "{document.name}" }
                        button {
                            onclick: move |_| {
                                selected_document.set(None);
                                chart_uri.set(None);
                            },
                            "Back to Files"
                        }
                    }
                    div {
                        style: "display: flex; gap: 16px; margin: 12px 0; align-items: flex-end;",
                        div {
                            label { style: "display: block; font-size: 13px;", "X-Axis (Category)" }
                            select {
                                onchange: {
                                    let preview = preview_for_x.clone();
                                    move |event: Event<FormData>| {
                                        x_axis.set(event.value());
                                        if let Some(document) = selected_document() {
                                            chart_uri.set(refresh_chart(
                                                &preview,
                                                &document.headers,
                                                &records(),
                                                &x_axis(),
                                                &y_axis(),
                                            ));
                                        }
                                    }
                                },
                                option { value: "", selected: x_axis().is_empty(), "Select X-Axis" }
                                for header in document.headers.iter() {
                                    option {
                                        value: "{header}",
                                        selected: *header == x_axis(),
                                        "{header}"
                                    }
                                }
                            }
                        }
                        div {
                            label { style: "display: block; font-size: 13px;", "Y-Axis (Value)" }
                            select {
                                onchange: {
                                    let preview = preview_for_y.clone();
                                    move |event: Event<FormData>| {
                                        y_axis.set(event.value());
                                        if let Some(document) = selected_document() {
                                            chart_uri.set(refresh_chart(
                                                &preview,
                                                &document.headers,
                                                &records(),
                                                &x_axis(),
                                                &y_axis(),
                                            ));
                                        }
                                    }
                                },
                                option { value: "", selected: y_axis().is_empty(), "Select Y-Axis" }
                                for header in numeric_headers.iter() {
                                    option {
                                        value: "{header}",
                                        selected: *header == y_axis(),
                                        "{header}"
                                    }
                                }
                            }
                        }
                        button {
                            disabled: x_axis().is_empty() || y_axis().is_empty(),
                            onclick: move |_| {
                                    let Some(document) = selected_document() else {
                                        return;
                                    };
                                    let rows = project_chart_rows(
                                        &document.headers,
                                        &records(),
                                        &x_axis(),
                                        &y_axis(),
                                    );
                                    let Some(folder) = FileDialog::new().pick_folder() else {
                                        return;
                                    };
                                    match export_chart(&document.name, &rows, &folder) {
                                        Ok(Some(path)) => push_notice(
                                            notice,
                                            Notice::success(format!(
                                                "Chart saved to {}",
                                                path.display()
                                            )),
                                        ),
                                        Ok(None) => {}
                                        Err(err) => push_notice(
                                            notice,
                                            Notice::error(format!("Failed to export chart: {err}")),
                                        ),
                                    }
                            },
                            "Download Chart (PNG)"
                        }
                    }
                    div {
                        style: "background: #f9fafb; border-radius: 8px; padding: 12px; \
                                min-height: 320px; display: flex; align-items: center; \
                                justify-content: center;",
                        if let Some(uri) = chart_uri() {
                            img { src: "{uri}", style: "max-width: 100%;" }
                        } else {
                            p { style: "color: #6b7280;",
                                "Please select X and Y axes to generate a chart."
                            }
                        }
                    }
                    div {
                        style: "margin-top: 16px; overflow-x: auto;",
                        h3 { "Data Preview" }
                        table {
                            style: "width: 100%; border-collapse: collapse; font-size: 13px;",
                            thead {
                                tr {
                                    for header in document.headers.iter() {
                                        th {
                                            style: "text-align: left; padding: 6px 8px; background: #f3f4f6;",
                                            "{header}"
                                        }
                                    }
                                }
                            }
                            tbody {
                                for record in records() {
                                    tr {
                                        for header in document.headers.iter() {
                                            td {
                                                style: "padding: 6px 8px; border-top: 1px solid #e5e7eb;",
                                                {format_cell_value(
                                                    record
                                                        .get(header.as_str())
                                                        .unwrap_or(&serde_json::Value::Null),
                                                )}
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            } else {
                div {
                    div {
                        style: "padding: 16px; border: 1px solid #e5e7eb; border-radius: 8px; \
                                margin-bottom: 16px;",
                        h3 { "Upload New Excel File" }
                        div {
                            style: "display: flex; gap: 12px; align-items: center;",
                            button {
                                onclick: move |_| {
                                    let picked = FileDialog::new()
                                        .add_filter("Excel files", &["xls", "xlsx"])
                                        .pick_file();
                                    if let Some(path) = picked {
                                        selected_path.set(Some(path));
                                    }
                                },
                                "Select File"
                            }
                            span {
                                style: "color: #6b7280; flex-grow: 1;",
                                {selected_path()
                                    .map(|path| path.display().to_string())
                                    .unwrap_or_else(|| "Click to select .xls or .xlsx file".to_string())}
                            }
                            button {
                                disabled: uploading() || selected_path().is_none(),
                                onclick: on_upload,
                                if uploading() { "Uploading..." } else { "Upload & Analyze" }
                            }
                        }
                    }
                    div {
                        style: "padding: 16px; border: 1px solid #e5e7eb; border-radius: 8px;",
                        h3 { "Your Upload History" }
                        if files().is_empty() {
                            p { style: "color: #6b7280; text-align: center; padding: 24px 0;",
                                "You haven't uploaded any files yet."
                            }
                        } else {
                            for document in files() {
                                DocumentRow {
                                    key: "{document.id.0}",
                                    document: document.clone(),
                                    on_select: {
                                        let preview = preview_path.clone();
                                        move |selected: FileDocument| {
                                            open_document(
                                                &selected,
                                                &preview,
                                                selected_document,
                                                records,
                                                x_axis,
                                                y_axis,
                                                chart_uri,
                                                notice,
                                            );
                                        }
                                    },
                                    on_delete: {
                                        let history = history_for_delete.clone();
                                        move |id: DocumentId| {
                                            let Some(user) = current_user() else {
                                                return;
                                            };
                                            let result =
                                                run_blocking(|| history.delete(&user.id, id));
                                            if let Err(err) = result {
                                                push_notice(
                                                    notice,
                                                    Notice::error(format!(
                                                        "Failed to delete file: {err}"
                                                    )),
                                                );
                                            }
                                        }
                                    },
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
