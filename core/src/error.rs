//! Error types shared by every transport.
//!
//! # Design
//! A single enum covers both kinds of failure a caller can see:
//! precondition faults, returned as `Err` from the operation call itself,
//! and delivery failures, handed to the `error` callback of the
//! operation's `OperationArgs`. `NotFound` gets a dedicated variant
//! because callers frequently distinguish "the item does not exist" from
//! "the server returned an unexpected status".

use std::time::Duration;

use thiserror::Error;

use crate::item::{Item, ItemId};

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ResourceError>;

/// Errors produced by transports, resources, and codecs.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// No item with the given id exists. `item` carries the rejected
    /// payload for a failed update.
    #[error("item not found{}", id_suffix(.id))]
    NotFound {
        id: Option<ItemId>,
        item: Option<Item>,
    },

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The request was aborted after the timeout elapsed.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The request could not be delivered.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The item could not be encoded for the wire.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body could not be decoded.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// `create` was called with an item that already carries an id.
    #[error("item already has an id: {0}")]
    AlreadyHasId(ItemId),

    /// `update` or `remove` needs an item id to address the item.
    #[error("item has no id")]
    MissingId,

    /// `list` and `get` on a local transport need a `load` callback.
    #[error("operation arguments must have a load handler")]
    MissingLoadHandler,

    /// The item is not a key-value record.
    #[error("invalid item: {0}")]
    InvalidItem(String),

    /// The transport does not implement the operation.
    #[error("operation not supported by this transport: {0}")]
    Unsupported(&'static str),

    /// No async runtime is available to drive a remote request.
    #[error("no async runtime available: {0}")]
    Runtime(String),
}

fn id_suffix(id: &Option<ItemId>) -> String {
    id.as_ref().map(|id| format!(": {id}")).unwrap_or_default()
}

impl ResourceError {
    /// Returns true for faults raised immediately by the call, as opposed
    /// to failures delivered through the `error` callback.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            ResourceError::AlreadyHasId(_)
                | ResourceError::MissingId
                | ResourceError::MissingLoadHandler
                | ResourceError::InvalidItem(_)
                | ResourceError::Unsupported(_)
                | ResourceError::Runtime(_)
                | ResourceError::Serialization(_)
        )
    }
}
