//! Client configuration from environment variables.

/// Where the client sends requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL that relative endpoints are joined onto.
    pub api_base_url: String,
    /// Origin serving the relay endpoints (`/api/auth/*`).
    pub app_origin: String,
    /// Page the user is sent to when the session cannot be refreshed.
    pub sign_in_path: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            app_origin: "http://localhost:3000".to_string(),
            sign_in_path: store::session::SIGN_IN_PATH.to_string(),
        }
    }
}

impl ClientConfig {
    /// Read `API_BASE_URL` and `APP_ORIGIN`, falling back to the defaults.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        Self {
            api_base_url: std::env::var("API_BASE_URL").unwrap_or(defaults.api_base_url),
            app_origin: std::env::var("APP_ORIGIN").unwrap_or(defaults.app_origin),
            sign_in_path: defaults.sign_in_path,
        }
    }

    /// Absolute URL for `endpoint`: anything starting with `http` is used as-is,
    /// everything else is joined onto the backend base URL.
    pub fn resolve(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http") {
            endpoint.to_string()
        } else {
            format!("{}{}", self.api_base_url.trim_end_matches('/'), endpoint)
        }
    }

    /// Absolute URL of a relay endpoint on the app origin.
    pub fn relay_url(&self, path: &str) -> String {
        format!("{}{}", self.app_origin.trim_end_matches('/'), path)
    }
}
