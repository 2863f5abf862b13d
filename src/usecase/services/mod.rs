pub mod admin_service;
pub mod chart_service;
pub mod history_service;
pub mod session;
pub mod upload_service;
