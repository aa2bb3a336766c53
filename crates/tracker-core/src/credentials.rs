use crate::error::Result;
use crate::paths;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Session cookie harvested from a logged-in browser.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub cookie: String,
    pub saved_at: DateTime<Utc>,
}

// Never print the cookie itself.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("cookie", &"<redacted>")
            .field("saved_at", &self.saved_at)
            .finish()
    }
}

impl Credentials {
    pub fn new(cookie: impl Into<String>) -> Self {
        Self {
            cookie: cookie.into().trim().to_string(),
            saved_at: Utc::now(),
        }
    }

    pub fn load(home: &Path) -> Result<Option<Self>> {
        let path = paths::credentials_path(home);
        if !path.exists() {
            return Ok(None);
        }
        let data = std::fs::read_to_string(&path)?;
        let creds: Credentials = serde_yaml::from_str(&data)?;
        if creds.cookie.is_empty() {
            return Ok(None);
        }
        Ok(Some(creds))
    }

    pub fn save(&self, home: &Path) -> Result<()> {
        let path = paths::credentials_path(home);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    /// Delete stored credentials. Returns true if a file was removed.
    pub fn clear(home: &Path) -> Result<bool> {
        crate::io::remove_if_exists(&paths::credentials_path(home))
    }

    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.saved_at
    }
}

/// Pick the cookie to use: an explicit one (flag or env) wins over the file.
pub fn resolve_cookie(explicit: Option<&str>, home: &Path) -> Result<Option<String>> {
    if let Some(c) = explicit.map(str::trim).filter(|c| !c.is_empty()) {
        return Ok(Some(c.to_string()));
    }
    Ok(Credentials::load(home)?.map(|c| c.cookie))
}
