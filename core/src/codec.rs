//! Wire codecs for the remote transport.
//!
//! `RemoteTransport` holds an `Arc<dyn Codec>` and never calls serde_json
//! directly, so an alternate wire format only needs a new `Codec`.

use serde_json::Value;

use crate::error::{ResourceError, Result};
use crate::item::Item;

/// Encodes request bodies and decodes response bodies.
pub trait Codec: Send + Sync {
    /// Media type sent in `Accept` and `Content-Type` headers.
    fn content_type(&self) -> &'static str;

    fn serialize(&self, item: &Item) -> Result<String>;

    fn deserialize(&self, body: &str) -> Result<Value>;
}

/// The default codec: `application/json` via serde_json.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn serialize(&self, item: &Item) -> Result<String> {
        serde_json::to_string(item).map_err(|e| ResourceError::Serialization(e.to_string()))
    }

    fn deserialize(&self, body: &str) -> Result<Value> {
        serde_json::from_str(body).map_err(|e| ResourceError::Deserialization(e.to_string()))
    }
}
