use log::{debug, info, warn};
use std::fs;
use std::path::Path;

pub const APP_TOKEN_VAR: &str = "CTHRU_APP_TOKEN";
pub const SECRET_VAR: &str = "CTHRU_SECRET";

/// Socrata app token and secret. Either half may be missing.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub app_token: Option<String>,
    pub secret: Option<String>,
}

// Keep secrets out of debug logs
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("app_token", &self.app_token.as_ref().map(|_| "<set>"))
            .field("secret", &self.secret.as_ref().map(|_| "<set>"))
            .finish()
    }
}

impl Credentials {
    pub fn new(app_token: Option<String>, secret: Option<String>) -> Self {
        Self {
            app_token: non_empty(app_token),
            secret: non_empty(secret),
        }
    }

    /// Parse the two-line credential file format:
    ///
    /// ```text
    /// ID: <app token>
    /// secret: <secret>
    /// ```
    pub fn parse(content: &str) -> Credentials {
        let mut app_token = None;
        let mut secret = None;

        for line in content.lines().map(str::trim) {
            if let Some(value) = line.strip_prefix("ID:") {
                app_token = Some(value.trim().to_string());
            } else if let Some(value) = line.strip_prefix("secret:") {
                secret = Some(value.trim().to_string());
            }
        }

        Credentials::new(app_token, secret)
    }

    /// Load from a credential file. A missing or unreadable file yields empty
    /// credentials; requests then go out unauthenticated.
    pub fn from_file(path: &Path) -> Credentials {
        if !path.exists() {
            debug!("No credential file at {}", path.display());
            return Credentials::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => {
                info!("Loaded credentials from {}", path.display());
                Credentials::parse(&content)
            }
            Err(e) => {
                warn!("Failed to read credential file {}: {}", path.display(), e);
                Credentials::default()
            }
        }
    }

    /// Read overrides from `CTHRU_APP_TOKEN` / `CTHRU_SECRET`, honouring a
    /// `.env` file in the working directory
    pub fn from_env() -> Credentials {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded environment from {}", path.display());
        }

        Credentials::new(
            std::env::var(APP_TOKEN_VAR).ok(),
            std::env::var(SECRET_VAR).ok(),
        )
    }

    /// `self` replaces `base` as a pair when it carries a token. A token and
    /// secret from different sources are never combined.
    pub fn or(self, base: Credentials) -> Credentials {
        if self.app_token.is_some() {
            self
        } else {
            if self.secret.is_some() {
                warn!("Ignoring secret without an app token");
            }
            base
        }
    }

    /// Credential file first, then environment overrides
    pub fn load(path: &Path) -> Credentials {
        let credentials = Credentials::from_env().or(Credentials::from_file(path));
        debug!("Resolved credentials: {:?}", credentials);
        credentials
    }

    pub fn is_empty(&self) -> bool {
        self.app_token.is_none() && self.secret.is_none()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
