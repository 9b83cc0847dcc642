//! Named CRUD resources over pluggable transports.
//!
//! # Overview
//! A `ResourceKit` turns an endpoint descriptor (a base URL, a custom
//! factory, or in-memory datasets) into `Resource`s. Each resource owns one
//! `Transport` and forwards `list`, `get`, `query`, `create`, `update`, and
//! `remove` to it; results arrive through the `load` / `error` callbacks of
//! `OperationArgs`.
//!
//! # Design
//! - `RemoteTransport` speaks JSON over HTTP on a tokio task per call. It
//!   builds `HttpRequest` values as plain data and hands the round-trip to
//!   an `HttpExecutor` (ureq by default), so the wire contract is testable
//!   without a network.
//! - `LocalTransport` mutates an owned in-memory collection and runs every
//!   callback before returning.
//! - Both return a `Completion` future, so callers see one calling
//!   convention regardless of transport.

pub mod args;
pub mod codec;
pub mod config;
pub mod error;
pub mod http;
pub mod item;
pub mod kit;
pub mod resource;
pub mod transport;
pub mod url;

pub use args::OperationArgs;
pub use codec::{Codec, JsonCodec};
pub use config::{TransportConfig, DEFAULT_TIMEOUT};
pub use error::{ResourceError, Result};
pub use http::{HttpExecutor, HttpMethod, HttpRequest, HttpResponse, UreqExecutor};
pub use item::{item_id, Item, ItemId, Query};
pub use kit::{Endpoint, ResourceKit, TransportFactory};
pub use resource::Resource;
pub use transport::{Completion, LocalTransport, RemoteTransport, Transport};
