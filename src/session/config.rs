use cookie::{Cookie, SameSite};
use std::borrow::Cow;
use time::Duration;

/// Seven days.
pub const DEFAULT_MAX_AGE_SECONDS: i64 = 60 * 60 * 24 * 7;
pub const DEFAULT_COOKIE_NAME: &str = "__session";

/// How the cookie value is protected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CookieSecurity {
    /// HMAC signed; readable by the client, not modifiable.
    #[default]
    Signed,
    /// Encrypted and authenticated; opaque to the client.
    Private,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub(crate) name: Cow<'static, str>,
    pub(crate) secure: bool,
    pub(crate) max_age: Duration,
    pub(crate) max_cookie_bytes: usize,
    pub(crate) security: CookieSecurity,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_COOKIE_NAME.into(),
            secure: true,
            max_age: Duration::seconds(DEFAULT_MAX_AGE_SECONDS),
            max_cookie_bytes: 4096,
            security: CookieSecurity::Signed,
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub fn with_name<N: Into<Cow<'static, str>>>(mut self, name: N) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    #[must_use]
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    #[must_use]
    pub fn with_max_cookie_bytes(mut self, max_cookie_bytes: usize) -> Self {
        self.max_cookie_bytes = max_cookie_bytes;
        self
    }

    #[must_use]
    pub fn with_security(mut self, security: CookieSecurity) -> Self {
        self.security = security;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn secure(&self) -> bool {
        self.secure
    }

    #[must_use]
    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    #[must_use]
    pub fn security(&self) -> CookieSecurity {
        self.security
    }

    pub(crate) fn build_cookie(&self, value: String) -> Cookie<'static> {
        let mut cookie = self.base_cookie(value);
        cookie.set_max_age(self.max_age);
        cookie
    }

    /// Same name and path as the live cookie so the browser replaces it.
    pub(crate) fn removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = self.base_cookie(String::new());
        cookie.make_removal();
        cookie
    }

    /// Always `HttpOnly`, `SameSite=Lax` and `Path=/`; only `Secure` varies.
    fn base_cookie(&self, value: String) -> Cookie<'static> {
        Cookie::build((self.name.clone(), value))
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .path("/")
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_session_cookie_contract() {
        let config = SessionConfig::default();
        let cookie = config.build_cookie("value".to_string());

        assert_eq!(cookie.name(), "__session");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(
            cookie.max_age().map(Duration::whole_seconds),
            Some(604_800)
        );
        assert_eq!(config.security(), CookieSecurity::Signed);
    }

    #[test]
    fn insecure_cookie_omits_secure_attribute() {
        let cookie = SessionConfig::default()
            .with_secure(false)
            .build_cookie("value".to_string());

        assert_ne!(cookie.secure(), Some(true));
        assert!(!cookie.to_string().contains("Secure"));

        let secure = SessionConfig::default().build_cookie("value".to_string());
        assert_eq!(secure.secure(), Some(true));
        assert!(secure.to_string().contains("Secure"));
    }

    #[test]
    fn removal_cookie_expires_immediately() {
        let config = SessionConfig::default().with_name("sid");
        let cookie = config.removal_cookie();

        assert_eq!(cookie.name(), "sid");
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    }
}
