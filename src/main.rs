mod app;
mod config;
mod domain;
mod infra;
mod platform;
mod ui;
mod usecase;

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();

    let webview_data_dir =
        default_webview_data_dir().expect("should resolve and create WebView2 data directory");

    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new()
                .with_window(dioxus::desktop::WindowBuilder::new().with_title("Excel Analytics"))
                .with_data_directory(webview_data_dir),
        )
        .launch(app::App);
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "excelanalytics", "excel-analytics")
        .ok_or_else(|| anyhow!("unable to resolve data directory"))
}

fn default_db_path() -> Result<PathBuf> {
    Ok(project_dirs()?.data_local_dir().join("documents.sqlite"))
}

fn default_config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join("config.json"))
}

fn default_chart_preview_path() -> Result<PathBuf> {
    let data_dir = project_dirs()?.data_local_dir().to_path_buf();
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("failed to create data dir: {}", data_dir.display()))?;
    Ok(data_dir.join("chart-preview.png"))
}

fn ensure_webview_data_dir(base_data_dir: &Path) -> Result<PathBuf> {
    let webview_data_dir = base_data_dir.join("webview2");
    std::fs::create_dir_all(&webview_data_dir).with_context(|| {
        format!(
            "failed to create webview dir: {}",
            webview_data_dir.display()
        )
    })?;
    Ok(webview_data_dir)
}

fn default_webview_data_dir() -> Result<PathBuf> {
    let project_dirs = project_dirs()?;
    ensure_webview_data_dir(project_dirs.data_local_dir())
}
