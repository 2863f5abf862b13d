use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Externally configurable authorization policy. Admin access is granted to
/// the emails listed in the config file, never to an embedded literal list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub admin_emails: Vec<String>,
}

impl AppConfig {
    /// Missing file means default config (no admins); malformed content is
    /// an error so a typo never silently revokes or grants access.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    pub fn is_admin(&self, email: &str) -> bool {
        self.admin_emails.iter().any(|admin| admin == email)
    }
}
