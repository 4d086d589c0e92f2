use serde::de::DeserializeOwned;
use serde_json::Value;
use std::{collections::BTreeMap, fmt};

/// Durable key holding the backend user id.
pub const USER_ID: &str = "userId";
/// Durable key holding the backend bearer token.
pub const TOKEN: &str = "token";
/// Flash key for the login error message.
pub const ERROR: &str = "error";

/// Per-request session state.
///
/// Durable values survive every commit until unset. Flash values come in two
/// sets: the ones loaded from the incoming cookie, readable during this request
/// only, and the ones flashed during this request, written by the next commit
/// and then gone.
#[derive(Clone, Default, PartialEq)]
pub struct Session {
    data: BTreeMap<String, Value>,
    flashed: BTreeMap<String, Value>,
    pending_flash: BTreeMap<String, Value>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(
        data: BTreeMap<String, Value>,
        flashed: BTreeMap<String, Value>,
    ) -> Self {
        Self {
            data,
            flashed,
            pending_flash: BTreeMap::new(),
        }
    }

    /// Durable value, or a flash value delivered with this request.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data
            .get(key)
            .or_else(|| self.flashed.get(key))
            .filter(|value| !value.is_null())
    }

    /// [`Session::get`] decoded into `T`; `None` when absent or of another shape.
    #[must_use]
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.data.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Store a value for the next request only.
    pub fn flash(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.pending_flash.insert(key.into(), value.into());
    }

    /// Remove `key` from durable, delivered and pending flash values.
    pub fn unset(&mut self, key: &str) -> Option<Value> {
        let pending = self.pending_flash.remove(key);
        let flashed = self.flashed.remove(key);
        self.data.remove(key).or(flashed).or(pending)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty() && self.flashed.is_empty() && self.pending_flash.is_empty()
    }

    /// Both the user id and the bearer token are present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.has(USER_ID) && self.has(TOKEN)
    }

    pub(crate) fn data(&self) -> &BTreeMap<String, Value> {
        &self.data
    }

    pub(crate) fn pending_flash(&self) -> &BTreeMap<String, Value> {
        &self.pending_flash
    }
}

// Values are never printed; the token lives here.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("data", &self.data.keys().collect::<Vec<_>>())
            .field("flashed", &self.flashed.keys().collect::<Vec<_>>())
            .field("pending_flash", &self.pending_flash.keys().collect::<Vec<_>>())
            .finish()
    }
}
