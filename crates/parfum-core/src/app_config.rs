use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Signed-in backend identity. Absent for guest shoppers.
#[derive(Clone, PartialEq, Eq)]
pub struct BackendSession {
    pub access_token: String,
    pub user_id: String,
}

impl std::fmt::Debug for BackendSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendSession")
            .field("access_token", &"[redacted]")
            .field("user_id", &self.user_id)
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub backend_url: String,
    pub backend_anon_key: String,
    pub session: Option<BackendSession>,
    pub env: Environment,
    pub log_level: String,
    pub data_dir: PathBuf,
    pub storefront_path: PathBuf,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub invoice_bucket: String,
    pub image_bucket: String,
}

impl AppConfig {
    /// Path of the file backing the local key/value store.
    #[must_use]
    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join("storage.json")
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("backend_url", &self.backend_url)
            .field("backend_anon_key", &"[redacted]")
            .field("session", &self.session)
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("data_dir", &self.data_dir)
            .field("storefront_path", &self.storefront_path)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("invoice_bucket", &self.invoice_bucket)
            .field("image_bucket", &self.image_bucket)
            .finish()
    }
}
