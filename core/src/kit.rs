//! Factory producing `Resource`s from an endpoint descriptor.
//!
//! # Design
//! The endpoint is decided once, at construction, and turned into a
//! factory; `resource` just calls it. Nothing is cached: every call builds a
//! fresh transport. A raw dataset endpoint must be a mapping from resource
//! name to that resource's items, and each transport gets its own copy, so
//! two resources never alias one collection.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::config::TransportConfig;
use crate::item::Item;
use crate::resource::Resource;
use crate::transport::{LocalTransport, RemoteTransport, Transport};
use crate::url::build_full_url;

/// Builds a transport for a resource name.
pub type TransportFactory = Arc<dyn Fn(&str, &TransportConfig) -> Box<dyn Transport> + Send + Sync>;

/// Where a `ResourceKit` finds its resources.
#[derive(Clone)]
pub enum Endpoint {
    /// Base URL; resource `name` lives at `<base>/<name>`.
    Url(String),
    /// Custom transport construction.
    Factory(TransportFactory),
    /// In-memory datasets keyed by resource name.
    Datasets(HashMap<String, Vec<Item>>),
}

impl Endpoint {
    pub fn factory<F>(f: F) -> Self
    where
        F: Fn(&str, &TransportConfig) -> Box<dyn Transport> + Send + Sync + 'static,
    {
        Endpoint::Factory(Arc::new(f))
    }
}

impl From<&str> for Endpoint {
    fn from(base: &str) -> Self {
        Endpoint::Url(base.to_string())
    }
}

impl From<String> for Endpoint {
    fn from(base: String) -> Self {
        Endpoint::Url(base)
    }
}

impl From<HashMap<String, Vec<Item>>> for Endpoint {
    fn from(datasets: HashMap<String, Vec<Item>>) -> Self {
        Endpoint::Datasets(datasets)
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Url(base) => f.debug_tuple("Url").field(base).finish(),
            Endpoint::Factory(_) => f.write_str("Factory(..)"),
            Endpoint::Datasets(datasets) => {
                let mut names: Vec<_> = datasets.keys().collect();
                names.sort();
                f.debug_tuple("Datasets").field(&names).finish()
            }
        }
    }
}

/// Hands out `Resource`s bound to transports for one endpoint.
///
/// ```
/// use std::collections::HashMap;
/// use resource_kit::{OperationArgs, ResourceKit};
/// use serde_json::json;
///
/// let mut data = HashMap::new();
/// data.insert("notes".to_string(), vec![json!({"id": 1, "text": "hi"})]);
///
/// let kit = ResourceKit::new(data);
/// let mut notes = kit.resource("notes");
/// notes.get(1u64, OperationArgs::new().on_load(|note| assert_eq!(note["text"], "hi"))).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ResourceKit {
    endpoint: Endpoint,
    config: TransportConfig,
}

impl ResourceKit {
    pub fn new(endpoint: impl Into<Endpoint>) -> Self {
        Self::with_config(endpoint, TransportConfig::default())
    }

    pub fn with_config(endpoint: impl Into<Endpoint>, config: TransportConfig) -> Self {
        Self {
            endpoint: endpoint.into(),
            config,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// A new resource named `name`, using the kit's configuration.
    pub fn resource(&self, name: &str) -> Resource {
        self.resource_with(name, &self.config)
    }

    /// A new resource named `name`, with a transport built from `config`.
    pub fn resource_with(&self, name: &str, config: &TransportConfig) -> Resource {
        Resource::new(self.transport(name, config))
    }

    fn transport(&self, name: &str, config: &TransportConfig) -> Box<dyn Transport> {
        match &self.endpoint {
            Endpoint::Url(base) => {
                let url = build_full_url(base, Some(name), None);
                tracing::debug!(name, %url, "binding remote resource");
                Box::new(RemoteTransport::with_config(url, config.clone()))
            }
            Endpoint::Factory(factory) => factory(name, config),
            Endpoint::Datasets(datasets) => {
                let items = datasets.get(name).cloned().unwrap_or_else(|| {
                    tracing::warn!(name, "no dataset for resource; starting empty");
                    Vec::new()
                });
                Box::new(LocalTransport::new(items))
            }
        }
    }
}
