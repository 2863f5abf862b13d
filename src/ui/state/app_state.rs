use std::path::PathBuf;
use std::time::{Duration, Instant};

use dioxus::prelude::{use_signal, Signal};

use crate::domain::entities::document::{FileDocument, Record};
use crate::domain::entities::user::UserAccount;
use crate::usecase::services::admin_service::AdminReport;

/// How long a transient notice stays on screen.
pub const NOTICE_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Transient, auto-dismissing notification. Errors degrade to these; none is
/// fatal to the app.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub posted_at: Instant,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
            posted_at: Instant::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
            posted_at: Instant::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.posted_at.elapsed() >= NOTICE_TTL
    }
}

pub struct AppState {
    pub current_user: Signal<Option<UserAccount>>,
    pub email_input: Signal<String>,
    pub password_input: Signal<String>,
    pub signup_mode: Signal<bool>,

    pub selected_path: Signal<Option<PathBuf>>,
    pub uploading: Signal<bool>,

    pub files: Signal<Vec<FileDocument>>,
    pub selected_document: Signal<Option<FileDocument>>,
    pub records: Signal<Vec<Record>>,
    pub x_axis: Signal<String>,
    pub y_axis: Signal<String>,
    pub chart_uri: Signal<Option<String>>,

    pub admin_view: Signal<bool>,
    pub admin_report: Signal<Option<AdminReport>>,

    pub notice: Signal<Option<Notice>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            current_user: use_signal(|| None::<UserAccount>),
            email_input: use_signal(String::new),
            password_input: use_signal(String::new),
            signup_mode: use_signal(|| false),

            selected_path: use_signal(|| None::<PathBuf>),
            uploading: use_signal(|| false),

            files: use_signal(Vec::<FileDocument>::new),
            selected_document: use_signal(|| None::<FileDocument>),
            records: use_signal(Vec::<Record>::new),
            x_axis: use_signal(String::new),
            y_axis: use_signal(String::new),
            chart_uri: use_signal(|| None::<String>),

            admin_view: use_signal(|| false),
            admin_report: use_signal(|| None::<AdminReport>),

            notice: use_signal(|| None::<Notice>),
        }
    }
}
