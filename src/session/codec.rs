//! Cookie payload encoding.
//!
//! The value inside the signature is unpadded base64url over a small JSON
//! envelope. `iat` is the commit time in unix seconds and is what the max-age
//! check runs against; the browser's own `Max-Age` is not trusted.

use super::SessionError;
use base64ct::{Base64UrlUnpadded, Encoding};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

const VERSION: u8 = 1;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub(crate) struct Envelope {
    pub(crate) v: u8,
    pub(crate) iat: i64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub(crate) data: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub(crate) flash: BTreeMap<String, Value>,
}

impl Envelope {
    pub(crate) fn new(
        iat: i64,
        data: BTreeMap<String, Value>,
        flash: BTreeMap<String, Value>,
    ) -> Self {
        Self {
            v: VERSION,
            iat,
            data,
            flash,
        }
    }
}

pub(crate) fn encode(envelope: &Envelope) -> Result<String, SessionError> {
    let bytes = serde_json::to_vec(envelope)?;
    Ok(Base64UrlUnpadded::encode_string(&bytes))
}

pub(crate) fn decode(value: &str) -> Result<Envelope, SessionError> {
    let bytes = Base64UrlUnpadded::decode_vec(value)
        .map_err(|err| SessionError::Decode(err.to_string()))?;

    let envelope: Envelope =
        serde_json::from_slice(&bytes).map_err(|err| SessionError::Decode(err.to_string()))?;

    if envelope.v != VERSION {
        return Err(SessionError::UnsupportedVersion(envelope.v));
    }

    Ok(envelope)
}
