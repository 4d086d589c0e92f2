use super::{codec, codec::Envelope, CookieSecurity, Session, SessionConfig, SessionError};
use axum::http::{header::COOKIE, HeaderMap, HeaderValue};
use cookie::{Cookie, CookieJar, Key};
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use std::fmt;
use time::OffsetDateTime;
use tracing::debug;

/// Loads, commits and destroys cookie sessions.
///
/// New cookies are sealed with the first secret. Incoming cookies are checked
/// against every secret in order, so an old secret can stay listed after a new
/// one while existing sessions age out.
pub struct SessionStore {
    config: SessionConfig,
    primary: Key,
    fallbacks: Vec<Key>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("config", &self.config)
            .field("keys", &(1 + self.fallbacks.len()))
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// # Errors
    /// Returns an error if `secrets` is empty or contains an empty secret.
    pub fn new(config: SessionConfig, secrets: &[SecretString]) -> Result<Self, SessionError> {
        let mut keys = secrets
            .iter()
            .map(derive_key)
            .collect::<Result<Vec<_>, _>>()?
            .into_iter();
        let primary = keys.next().ok_or(SessionError::MissingSecret)?;

        Ok(Self {
            config,
            primary,
            fallbacks: keys.collect(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Read the session out of a `Cookie` header value.
    ///
    /// Never fails: a missing, tampered, expired or undecodable cookie yields an
    /// empty session.
    #[must_use]
    pub fn load(&self, cookie_header: Option<&str>) -> Session {
        let Some(header) = cookie_header else {
            return Session::new();
        };

        let name = self.config.name();
        Cookie::split_parse(header)
            .filter_map(Result::ok)
            .filter(|cookie| cookie.name() == name)
            .find_map(|cookie| self.open(cookie.into_owned()))
            .unwrap_or_default()
    }

    /// [`SessionStore::load`] over every `Cookie` header of a request.
    #[must_use]
    pub fn load_from_headers(&self, headers: &HeaderMap) -> Session {
        let joined = headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect::<Vec<_>>()
            .join("; ");

        if joined.is_empty() {
            Session::new()
        } else {
            self.load(Some(joined.as_str()))
        }
    }

    /// Serialize durable values and pending flash values into a `Set-Cookie` value.
    ///
    /// # Errors
    /// Returns an error if the session cannot be encoded or the cookie exceeds
    /// the configured size limit.
    pub fn commit(&self, session: &Session) -> Result<HeaderValue, SessionError> {
        let envelope = Envelope::new(
            now_unix(),
            session.data().clone(),
            session.pending_flash().clone(),
        );
        let cookie = self.seal(codec::encode(&envelope)?)?;
        let header = cookie.to_string();

        if header.len() > self.config.max_cookie_bytes {
            return Err(SessionError::TooLarge {
                size: header.len(),
                limit: self.config.max_cookie_bytes,
            });
        }

        Ok(HeaderValue::from_str(&header)?)
    }

    /// Expire the session cookie on the client.
    ///
    /// # Errors
    /// Returns an error if the removal cookie is not a valid header value.
    pub fn destroy(&self, session: Session) -> Result<HeaderValue, SessionError> {
        debug!(?session, "Destroying session");
        Ok(HeaderValue::from_str(
            &self.config.removal_cookie().to_string(),
        )?)
    }

    fn keys(&self) -> impl Iterator<Item = &Key> {
        std::iter::once(&self.primary).chain(self.fallbacks.iter())
    }

    fn seal(&self, value: String) -> Result<Cookie<'static>, SessionError> {
        let mut jar = CookieJar::new();
        let cookie = self.config.build_cookie(value);
        match self.config.security {
            CookieSecurity::Signed => jar.signed_mut(&self.primary).add(cookie),
            CookieSecurity::Private => jar.private_mut(&self.primary).add(cookie),
        }

        jar.get(self.config.name())
            .cloned()
            .ok_or_else(|| SessionError::Encode("sealed cookie missing from jar".to_string()))
    }

    fn open(&self, cookie: Cookie<'static>) -> Option<Session> {
        let mut jar = CookieJar::new();
        jar.add_original(cookie);

        let name = self.config.name();
        let value = self.keys().find_map(|key| match self.config.security {
            CookieSecurity::Signed => jar.signed(key).get(name),
            CookieSecurity::Private => jar.private(key).get(name),
        });
        let Some(value) = value else {
            debug!("Session cookie failed verification");
            return None;
        };

        let envelope = match codec::decode(value.value()) {
            Ok(envelope) => envelope,
            Err(err) => {
                debug!("Session cookie could not be decoded: {err}");
                return None;
            }
        };

        if now_unix() - envelope.iat > self.config.max_age.whole_seconds() {
            debug!("Session cookie expired");
            return None;
        }

        Some(Session::from_parts(envelope.data, envelope.flash))
    }
}

/// Hash a secret of any length to a 32-byte master key and expand it with
/// HKDF into the signing and encryption keys.
fn derive_key(secret: &SecretString) -> Result<Key, SessionError> {
    let secret = secret.expose_secret();
    if secret.is_empty() {
        return Err(SessionError::EmptySecret);
    }

    let master = Sha256::digest(secret.as_bytes());
    Ok(Key::derive_from(master.as_slice()))
}

fn now_unix() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{ERROR, TOKEN, USER_ID};
    use serde_json::json;
    use std::collections::BTreeMap;
    use time::Duration;

    fn secrets(values: &[&str]) -> Vec<SecretString> {
        values
            .iter()
            .map(|value| SecretString::from((*value).to_string()))
            .collect()
    }

    fn store(values: &[&str]) -> Result<SessionStore, SessionError> {
        SessionStore::new(SessionConfig::default().with_secure(false), &secrets(values))
    }

    /// `Set-Cookie` value to the `Cookie` request header a browser would send.
    fn request_cookie(set_cookie: &HeaderValue) -> String {
        set_cookie
            .to_str()
            .unwrap_or_default()
            .split(';')
            .next()
            .unwrap_or_default()
            .to_string()
    }

    fn authenticated() -> Session {
        let mut session = Session::new();
        session.set(USER_ID, 1);
        session.set(TOKEN, "t1");
        session
    }

    #[test]
    fn requires_at_least_one_non_empty_secret() {
        assert!(matches!(
            SessionStore::new(SessionConfig::default(), &[]),
            Err(SessionError::MissingSecret)
        ));
        assert!(matches!(
            SessionStore::new(SessionConfig::default(), &secrets(&["ok", ""])),
            Err(SessionError::EmptySecret)
        ));
    }

    #[test]
    fn short_secrets_are_accepted() -> Result<(), SessionError> {
        let store = store(&["super-secret"])?;
        let header = store.commit(&authenticated())?;
        let loaded = store.load(Some(request_cookie(&header).as_str()));

        assert!(loaded.is_authenticated());
        Ok(())
    }

    #[test]
    fn derived_keys_are_stable_per_secret() -> Result<(), SessionError> {
        let one = SecretString::from("one".to_string());
        let two = SecretString::from("two".to_string());

        assert_eq!(derive_key(&one)?.master(), derive_key(&one)?.master());
        assert_ne!(derive_key(&one)?.master(), derive_key(&two)?.master());
        Ok(())
    }

    #[test]
    fn missing_or_malformed_cookies_load_empty() -> Result<(), SessionError> {
        let store = store(&["secret"])?;
        let unsigned = codec::encode(&Envelope::new(
            now_unix(),
            authenticated().data().clone(),
            BTreeMap::new(),
        ))?;
        let forged = format!("__session={unsigned}");

        for header in [
            None,
            Some(""),
            Some("garbage"),
            Some("=;=;"),
            Some("__session="),
            Some("__session=bogus"),
            Some("other=1; theme=dark"),
            Some(forged.as_str()),
        ] {
            let session = store.load(header);
            assert!(session.is_empty(), "expected empty session for {header:?}");
        }
        Ok(())
    }

    #[test]
    fn commit_then_load_round_trips_durable_values() -> Result<(), SessionError> {
        let store = store(&["secret"])?;
        let mut session = authenticated();
        session.set("theme", json!({"mode": "dark"}));

        let header = store.commit(&session)?;
        let loaded = store.load(Some(request_cookie(&header).as_str()));

        assert_eq!(loaded.get(USER_ID), Some(&json!(1)));
        assert_eq!(loaded.get(TOKEN), Some(&json!("t1")));
        assert_eq!(loaded.get("theme"), Some(&json!({"mode": "dark"})));
        assert_eq!(loaded.data(), session.data());
        Ok(())
    }

    #[test]
    fn flash_survives_exactly_one_load() -> Result<(), SessionError> {
        let store = store(&["secret"])?;
        let mut session = Session::new();
        session.flash(ERROR, "Invalid credentials");

        let first = store.commit(&session)?;
        let next = store.load(Some(request_cookie(&first).as_str()));
        assert_eq!(
            next.get_as::<String>(ERROR),
            Some("Invalid credentials".to_string())
        );

        let second = store.commit(&next)?;
        let after = store.load(Some(request_cookie(&second).as_str()));
        assert!(!after.has(ERROR));
        assert!(after.is_empty());
        Ok(())
    }

    #[test]
    fn rotation_accepts_older_secrets_and_signs_with_the_newest() -> Result<(), SessionError> {
        let old = store(&["old-secret"])?;
        let rotated = store(&["new-secret", "old-secret"])?;
        let new_only = store(&["new-secret"])?;

        let legacy = request_cookie(&old.commit(&authenticated())?);
        assert!(rotated.load(Some(legacy.as_str())).is_authenticated());
        assert!(new_only.load(Some(legacy.as_str())).is_empty());

        let fresh = request_cookie(&rotated.commit(&authenticated())?);
        assert!(new_only.load(Some(fresh.as_str())).is_authenticated());
        assert!(old.load(Some(fresh.as_str())).is_empty());
        Ok(())
    }

    #[test]
    fn tampered_cookie_loads_empty() -> Result<(), SessionError> {
        let store = store(&["secret"])?;
        let cookie = request_cookie(&store.commit(&authenticated())?);
        let mut tampered = cookie.clone();
        tampered.pop();
        tampered.push(if cookie.ends_with('A') { 'B' } else { 'A' });

        assert!(store.load(Some(tampered.as_str())).is_empty());
        Ok(())
    }

    #[test]
    fn expired_cookie_loads_empty() -> Result<(), SessionError> {
        let store = SessionStore::new(
            SessionConfig::default().with_max_age(Duration::hours(1)),
            &secrets(&["secret"]),
        )?;
        let stale = Envelope::new(
            now_unix() - Duration::hours(2).whole_seconds(),
            authenticated().data().clone(),
            BTreeMap::new(),
        );
        let sealed = store.seal(codec::encode(&stale)?)?;
        let header = format!("{}={}", sealed.name(), sealed.value());

        assert!(store.load(Some(header.as_str())).is_empty());

        let fresh = Envelope::new(now_unix(), authenticated().data().clone(), BTreeMap::new());
        let sealed = store.seal(codec::encode(&fresh)?)?;
        let header = format!("{}={}", sealed.name(), sealed.value());
        assert!(store.load(Some(header.as_str())).is_authenticated());
        Ok(())
    }

    #[test]
    fn commit_sets_cookie_attributes() -> Result<(), SessionError> {
        let insecure = store(&["secret"])?;
        let header = insecure.commit(&authenticated())?;
        let header = header.to_str().unwrap_or_default();

        assert!(header.starts_with("__session="));
        assert!(header.contains("HttpOnly"));
        assert!(header.contains("SameSite=Lax"));
        assert!(header.contains("Path=/"));
        assert!(header.contains("Max-Age=604800"));
        assert!(!header.contains("Secure"));

        let secure = SessionStore::new(
            SessionConfig::default().with_secure(true),
            &secrets(&["secret"]),
        )?;
        let header = secure.commit(&authenticated())?;
        assert!(header.to_str().unwrap_or_default().contains("Secure"));
        Ok(())
    }

    #[test]
    fn destroy_expires_the_cookie() -> Result<(), SessionError> {
        let store = store(&["secret"])?;
        let header = store.destroy(authenticated())?;
        let header = header.to_str().unwrap_or_default();

        assert!(header.starts_with("__session=;"));
        assert!(header.contains("Max-Age=0"));
        assert!(header.contains("Path=/"));
        assert!(store.load(Some("__session=")).is_empty());
        Ok(())
    }

    #[test]
    fn private_cookies_round_trip_and_hide_values() -> Result<(), SessionError> {
        let private = SessionStore::new(
            SessionConfig::default()
                .with_secure(false)
                .with_security(CookieSecurity::Private),
            &secrets(&["secret"]),
        )?;
        let signed = store(&["secret"])?;

        let cookie = request_cookie(&private.commit(&authenticated())?);
        assert!(private.load(Some(cookie.as_str())).is_authenticated());
        assert!(signed.load(Some(cookie.as_str())).is_empty());

        let signed_cookie = request_cookie(&signed.commit(&authenticated())?);
        assert!(private.load(Some(signed_cookie.as_str())).is_empty());
        Ok(())
    }

    #[test]
    fn oversized_sessions_are_rejected() -> Result<(), SessionError> {
        let store = SessionStore::new(
            SessionConfig::default().with_max_cookie_bytes(128),
            &secrets(&["secret"]),
        )?;
        let mut session = authenticated();
        session.set("blob", "x".repeat(512));

        assert!(matches!(
            store.commit(&session),
            Err(SessionError::TooLarge { limit: 128, .. })
        ));
        Ok(())
    }

    #[test]
    fn load_from_headers_reads_any_cookie_header() -> Result<(), SessionError> {
        let store = store(&["secret"])?;
        let cookie = request_cookie(&store.commit(&authenticated())?);

        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(COOKIE, HeaderValue::from_str(&cookie)?);

        assert!(store.load_from_headers(&headers).is_authenticated());
        assert!(store.load_from_headers(&HeaderMap::new()).is_empty());
        Ok(())
    }
}
