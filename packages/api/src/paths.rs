//! Endpoint paths on both sides of the relay.

/// Relay endpoints served to the browser.
pub const RELAY_LOGIN: &str = "/api/auth/login";
pub const RELAY_LOGOUT: &str = "/api/auth/logout";
pub const RELAY_REFRESH: &str = "/api/auth/refresh";

/// Backend auth endpoints.
pub const BACKEND_LOGIN: &str = "/auth/login";
pub const BACKEND_LOGOUT: &str = "/auth/logout";
pub const BACKEND_REFRESH: &str = "/auth/refresh";
pub const BACKEND_REGISTER: &str = "/auth/register";
