pub const AUTH_STATUS: &str = "/auth/status";
pub const LOGIN: &str = "/login";
pub const EMAILS: &str = "/emails";
pub const SYNC: &str = "/sync";
pub const LOGOUT: &str = "/logout";
