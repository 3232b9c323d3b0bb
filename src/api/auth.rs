use reqwest::RequestBuilder;

use super::constants::headers;
use crate::auth::Credentials;

/// How a request authenticates against the portal
#[derive(Clone, PartialEq, Eq)]
pub enum AuthMode {
    /// HTTP Basic with `token:secret`
    Basic { app_token: String, secret: String },
    /// `X-App-Token` header only
    AppToken(String),
    Anonymous,
}

impl AuthMode {
    pub fn from_credentials(credentials: &Credentials) -> Self {
        match (&credentials.app_token, &credentials.secret) {
            (Some(app_token), Some(secret)) => AuthMode::Basic {
                app_token: app_token.clone(),
                secret: secret.clone(),
            },
            (Some(app_token), None) => AuthMode::AppToken(app_token.clone()),
            // A secret is useless without the token it belongs to
            (None, _) => AuthMode::Anonymous,
        }
    }

    pub fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            AuthMode::Basic { app_token, secret } => request.basic_auth(app_token, Some(secret)),
            AuthMode::AppToken(app_token) => request.header(headers::APP_TOKEN, app_token),
            AuthMode::Anonymous => request,
        }
    }

    /// Token-only variant, used for metadata requests
    pub fn token_only(&self) -> Self {
        match self {
            AuthMode::Basic { app_token, .. } | AuthMode::AppToken(app_token) => {
                AuthMode::AppToken(app_token.clone())
            }
            AuthMode::Anonymous => AuthMode::Anonymous,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            AuthMode::Basic { .. } => "basic",
            AuthMode::AppToken(_) => "app token",
            AuthMode::Anonymous => "anonymous",
        }
    }
}

impl std::fmt::Debug for AuthMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AuthMode({})", self.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials(token: Option<&str>, secret: Option<&str>) -> Credentials {
        Credentials::new(token.map(String::from), secret.map(String::from))
    }

    #[test]
    fn test_mode_selection() {
        assert_eq!(
            AuthMode::from_credentials(&credentials(Some("t"), Some("s"))),
            AuthMode::Basic {
                app_token: "t".to_string(),
                secret: "s".to_string()
            }
        );
        assert_eq!(
            AuthMode::from_credentials(&credentials(Some("t"), None)),
            AuthMode::AppToken("t".to_string())
        );
        assert_eq!(
            AuthMode::from_credentials(&credentials(None, Some("s"))),
            AuthMode::Anonymous
        );
        assert_eq!(
            AuthMode::from_credentials(&Credentials::default()),
            AuthMode::Anonymous
        );
    }

    #[test]
    fn test_basic_auth_header() {
        let client = reqwest::Client::new();
        let mode = AuthMode::from_credentials(&credentials(Some("token"), Some("secret")));
        let request = mode.apply(client.get("http://localhost/")).build().unwrap();

        // base64("token:secret")
        assert_eq!(
            request.headers().get("authorization").unwrap(),
            "Basic dG9rZW46c2VjcmV0"
        );
        assert!(request.headers().get(headers::APP_TOKEN).is_none());
    }

    #[test]
    fn test_app_token_header() {
        let client = reqwest::Client::new();
        let mode = AuthMode::AppToken("token".to_string());
        let request = mode.apply(client.get("http://localhost/")).build().unwrap();

        assert_eq!(request.headers().get(headers::APP_TOKEN).unwrap(), "token");
        assert!(request.headers().get("authorization").is_none());
    }

    #[test]
    fn test_token_only_drops_secret() {
        let mode = AuthMode::Basic {
            app_token: "t".to_string(),
            secret: "s".to_string(),
        };
        assert_eq!(mode.token_only(), AuthMode::AppToken("t".to_string()));
        assert_eq!(AuthMode::Anonymous.token_only(), AuthMode::Anonymous);
    }
}
