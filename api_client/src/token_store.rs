//! Session cookies: access token, refresh token and the cached user.
//!
//! The store behaves like a browser cookie jar scoped to `/`. Each cookie
//! carries its own expiry, set when it is written and unrelated to the
//! lifetime the server declares for the tokens. Expired cookies read as absent.
//!
//! A store can be backed by a JSON file so separate CLI invocations share one
//! session. Every mutation rewrites the file before it becomes visible.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use domain::{Session, UserInfo};
use mockable::{Clock, DefaultClock};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::StoreError;

pub const ACCESS_TOKEN: &str = "accessToken";
pub const REFRESH_TOKEN: &str = "refreshToken";
pub const USER_INFO: &str = "userInfo";

const ACCESS_TOKEN_DAYS: i64 = 1;
const REFRESH_TOKEN_DAYS: i64 = 7;
const USER_INFO_DAYS: i64 = 1;

/// Characters a cookie value may not carry verbatim.
const COOKIE_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'%')
    .add(b',')
    .add(b';')
    .add(b'\\');

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SameSite {
    #[default]
    Strict,
    Lax,
    None,
}

/// Attributes applied to every cookie the store writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieAttributes {
    pub path: String,
    pub same_site: SameSite,
    pub secure: bool,
}

impl CookieAttributes {
    /// `secure` follows whether this is a production deployment.
    pub fn for_environment(production: bool) -> Self {
        Self {
            path: "/".to_string(),
            same_site: SameSite::Strict,
            secure: production,
        }
    }
}

impl Default for CookieAttributes {
    fn default() -> Self {
        Self::for_environment(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCookie {
    pub value: String,
    pub expires_at: DateTime<Utc>,
    #[serde(flatten)]
    pub attributes: CookieAttributes,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Jar {
    cookies: BTreeMap<String, StoredCookie>,
}

pub struct TokenStore {
    jar: Mutex<Jar>,
    attributes: CookieAttributes,
    clock: Arc<dyn Clock>,
    file: Option<PathBuf>,
}

impl TokenStore {
    /// A store that lives only as long as the process.
    pub fn in_memory(attributes: CookieAttributes) -> Self {
        Self::with_clock(attributes, Arc::new(DefaultClock))
    }

    pub fn with_clock(attributes: CookieAttributes, clock: Arc<dyn Clock>) -> Self {
        Self {
            jar: Mutex::new(Jar::default()),
            attributes,
            clock,
            file: None,
        }
    }

    /// Opens a file-backed store.
    ///
    /// A missing file is an empty session. So is an unreadable one: the next
    /// write replaces it, so a damaged file never blocks logging out.
    pub fn persistent(
        path: impl Into<PathBuf>,
        attributes: CookieAttributes,
    ) -> Result<Self, StoreError> {
        Self::persistent_with_clock(path, attributes, Arc::new(DefaultClock))
    }

    pub fn persistent_with_clock(
        path: impl Into<PathBuf>,
        attributes: CookieAttributes,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, StoreError> {
        let path = path.into();
        let jar = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "discarding unreadable session file");
                Jar::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Jar::default(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            jar: Mutex::new(jar),
            attributes,
            clock,
            file: Some(path),
        })
    }

    pub fn attributes(&self) -> &CookieAttributes {
        &self.attributes
    }

    fn lock(&self) -> MutexGuard<'_, Jar> {
        // a panic mid-write never leaves a half-applied jar, see `commit`
        self.jar.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn cookie(&self, value: String, days: i64) -> StoredCookie {
        StoredCookie {
            value,
            expires_at: self.clock.utc() + Duration::days(days),
            attributes: self.attributes.clone(),
        }
    }

    /// Writes `next` to disk (when file-backed) and then swaps it in.
    fn commit(&self, guard: &mut MutexGuard<'_, Jar>, next: Jar) -> Result<(), StoreError> {
        if let Some(path) = &self.file {
            write_jar(path, &next)?;
        }
        **guard = next;
        Ok(())
    }

    fn read(&self, name: &str) -> Option<String> {
        let jar = self.lock();
        let cookie = jar.cookies.get(name)?;
        if cookie.expires_at <= self.clock.utc() {
            return None;
        }
        Some(cookie.value.clone())
    }

    /// Stores both tokens, and the user snapshot when given.
    ///
    /// The tokens are written together or not at all. A user snapshot that
    /// cannot be encoded is skipped with a warning.
    pub fn save(
        &self,
        access: &str,
        refresh: &str,
        user: Option<&UserInfo>,
    ) -> Result<(), StoreError> {
        let mut guard = self.lock();
        let mut next = guard.clone();
        next.cookies
            .insert(ACCESS_TOKEN.to_string(), self.cookie(access.to_string(), ACCESS_TOKEN_DAYS));
        next.cookies.insert(
            REFRESH_TOKEN.to_string(),
            self.cookie(refresh.to_string(), REFRESH_TOKEN_DAYS),
        );
        if let Some(user) = user {
            match serde_json::to_string(user) {
                Ok(json) => {
                    let encoded = utf8_percent_encode(&json, COOKIE_VALUE).to_string();
                    next.cookies
                        .insert(USER_INFO.to_string(), self.cookie(encoded, USER_INFO_DAYS));
                }
                Err(e) => warn!(error = %e, "user info not cached"),
            }
        }
        self.commit(&mut guard, next)?;
        info!(user = user.map(|u| u.id), "session saved");
        Ok(())
    }

    pub fn save_session(&self, session: &Session) -> Result<(), StoreError> {
        self.save(&session.access_token, &session.refresh_token, Some(&session.user))
    }

    pub fn get_access_token(&self) -> Option<String> {
        self.read(ACCESS_TOKEN)
    }

    pub fn get_refresh_token(&self) -> Option<String> {
        self.read(REFRESH_TOKEN)
    }

    /// The cached user, or `None` when it is absent, expired or unreadable.
    pub fn get_user(&self) -> Option<UserInfo> {
        match self.try_get_user() {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "ignoring cached user");
                None
            }
        }
    }

    pub fn try_get_user(&self) -> Result<Option<UserInfo>, StoreError> {
        let Some(raw) = self.read(USER_INFO) else {
            return Ok(None);
        };
        let json = percent_decode_str(&raw)
            .decode_utf8()
            .map_err(|e| StoreError::Decode {
                name: USER_INFO,
                reason: e.to_string(),
            })?;
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| StoreError::Decode {
                name: USER_INFO,
                reason: e.to_string(),
            })
    }

    /// True while an unexpired access token is stored. The server is not consulted.
    pub fn is_authenticated(&self) -> bool {
        self.get_access_token().is_some()
    }

    /// Removes all three session cookies.
    pub fn clear(&self) -> Result<(), StoreError> {
        let mut guard = self.lock();
        let mut next = guard.clone();
        for name in [ACCESS_TOKEN, REFRESH_TOKEN, USER_INFO] {
            next.cookies.remove(name);
        }
        self.commit(&mut guard, next)?;
        info!("session cleared");
        Ok(())
    }

    /// Raw cookie as stored, expired or not.
    #[cfg(any(test, feature = "test-support"))]
    pub fn cookie_entry(&self, name: &str) -> Option<StoredCookie> {
        self.lock().cookies.get(name).cloned()
    }

    /// Writes a raw value, bypassing encoding.
    #[cfg(any(test, feature = "test-support"))]
    pub fn set_raw(&self, name: &str, value: &str, days: i64) -> Result<(), StoreError> {
        let mut guard = self.lock();
        let mut next = guard.clone();
        next.cookies
            .insert(name.to_string(), self.cookie(value.to_string(), days));
        self.commit(&mut guard, next)
    }
}

fn write_jar(path: &Path, jar: &Jar) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_string_pretty(jar).map_err(StoreError::Encode)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, data)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ManualClock;
    use chrono::TimeZone;
    use mockable::MockClock;
    use rstest::{fixture, rstest};

    fn user() -> UserInfo {
        UserInfo {
            id: 42,
            name: "Lee; Admin".into(),
            email: "lee@example.com".into(),
            phone: Some("010-0000-0000".into()),
            level: 10,
            is_admin: true,
            last_login: None,
            login_count: Some(7),
        }
    }

    #[fixture]
    fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::default())
    }

    fn store(clock: &Arc<ManualClock>) -> TokenStore {
        TokenStore::with_clock(CookieAttributes::default(), clock.clone())
    }

    #[rstest]
    fn authenticated_right_after_save(clock: Arc<ManualClock>) {
        let store = store(&clock);
        assert!(!store.is_authenticated());
        store.save("acc", "ref", None).unwrap();
        assert!(store.is_authenticated());
        assert_eq!(store.get_access_token().as_deref(), Some("acc"));
        assert_eq!(store.get_refresh_token().as_deref(), Some("ref"));
    }

    #[rstest]
    fn not_authenticated_after_clear(clock: Arc<ManualClock>) {
        let store = store(&clock);
        store.save("acc", "ref", Some(&user())).unwrap();
        store.clear().unwrap();
        assert!(!store.is_authenticated());
        assert!(store.get_refresh_token().is_none());
        assert!(store.get_user().is_none());
    }

    #[rstest]
    fn tokens_expire_on_their_own_schedule(clock: Arc<ManualClock>) {
        let store = store(&clock);
        store.save("acc", "ref", Some(&user())).unwrap();

        clock.advance(Duration::hours(23));
        assert!(store.is_authenticated());

        clock.advance(Duration::hours(1));
        assert!(!store.is_authenticated());
        assert!(store.get_user().is_none());
        assert!(store.get_refresh_token().is_some());

        clock.advance(Duration::days(6));
        assert!(store.get_refresh_token().is_none());
    }

    #[rstest]
    fn user_round_trips_through_the_cookie(clock: Arc<ManualClock>) {
        let store = store(&clock);
        store.save("acc", "ref", Some(&user())).unwrap();
        assert_eq!(store.get_user(), Some(user()));
        // the raw value is cookie-safe
        let raw = store.cookie_entry(USER_INFO).unwrap().value;
        assert!(!raw.contains(';'));
        assert!(!raw.contains(' '));
    }

    #[rstest]
    #[case::not_json("%7Bnot json")]
    #[case::wrong_shape("%7B%22id%22%3A%22x%22%7D")]
    #[case::bad_utf8("%FF%FE")]
    fn malformed_user_reads_as_none(clock: Arc<ManualClock>, #[case] raw: &str) {
        let store = store(&clock);
        store.set_raw(USER_INFO, raw, 1).unwrap();
        assert!(store.get_user().is_none());
        assert!(matches!(store.try_get_user(), Err(StoreError::Decode { .. })));
    }

    #[rstest]
    fn missing_user_is_none_without_error(clock: Arc<ManualClock>) {
        let store = store(&clock);
        store.save("acc", "ref", None).unwrap();
        assert!(matches!(store.try_get_user(), Ok(None)));
    }

    #[test]
    fn cookies_carry_scope_attributes() {
        let now = Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap();
        let mut clock = MockClock::new();
        clock.expect_utc().return_const(now);
        let store = TokenStore::with_clock(CookieAttributes::for_environment(true), Arc::new(clock));
        store.save("acc", "ref", None).unwrap();
        let cookie = store.cookie_entry(ACCESS_TOKEN).unwrap();
        assert_eq!(cookie.attributes.path, "/");
        assert_eq!(cookie.attributes.same_site, SameSite::Strict);
        assert!(cookie.attributes.secure);
        assert_eq!(cookie.expires_at, now + Duration::days(1));
        let refresh = store.cookie_entry(REFRESH_TOKEN).unwrap();
        assert_eq!(refresh.expires_at, now + Duration::days(7));
    }

    #[rstest]
    fn file_backed_store_survives_reopening(clock: Arc<ManualClock>) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");
        {
            let store = TokenStore::persistent_with_clock(&path, CookieAttributes::default(), clock.clone()).unwrap();
            store.save("acc", "ref", Some(&user())).unwrap();
        }
        let reopened = TokenStore::persistent_with_clock(&path, CookieAttributes::default(), clock.clone()).unwrap();
        assert!(reopened.is_authenticated());
        assert_eq!(reopened.get_user().map(|u| u.id), Some(42));

        reopened.clear().unwrap();
        let again = TokenStore::persistent_with_clock(&path, CookieAttributes::default(), clock).unwrap();
        assert!(!again.is_authenticated());
    }

    #[rstest]
    #[case::truncated("{")]
    #[case::wrong_shape(r#"{"cookies": {"userInfo": 5}}"#)]
    fn corrupt_session_file_opens_empty_and_is_replaced(
        clock: Arc<ManualClock>,
        #[case] content: &str,
    ) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, content).unwrap();

        let store = TokenStore::persistent_with_clock(&path, CookieAttributes::default(), clock.clone()).unwrap();
        assert!(!store.is_authenticated());
        store.clear().unwrap();

        let reopened = TokenStore::persistent_with_clock(&path, CookieAttributes::default(), clock).unwrap();
        assert!(!reopened.is_authenticated());
        let rewritten: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(rewritten["cookies"], serde_json::json!({}));
    }
}
