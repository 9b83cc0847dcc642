//! Network transport speaking JSON over HTTP.
//!
//! # Design
//! `RemoteTransport` holds only its collection URL and a `TransportConfig`;
//! no item state survives between calls. Each operation is split into a
//! `build_*` method producing an `HttpRequest` and the shared
//! `parse_response`, with the round-trip in between handed to the
//! configured `HttpExecutor` on a spawned tokio task. Verbs map as
//! list/query/get to GET, create to POST, update to PUT, remove to DELETE.

use std::sync::Arc;

use super::{Completion, Transport};
use crate::args::OperationArgs;
use crate::codec::Codec;
use crate::config::TransportConfig;
use crate::error::{ResourceError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::item::{item_id, Item, ItemId, Query};
use crate::url::build_full_url;

/// A transport bound to the URL of one remote collection.
#[derive(Debug, Clone)]
pub struct RemoteTransport {
    url: String,
    config: TransportConfig,
}

impl RemoteTransport {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_config(url, TransportConfig::default())
    }

    pub fn with_config(url: impl Into<String>, config: TransportConfig) -> Self {
        Self {
            url: url.into(),
            config,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// GET on the collection, filtered by `query` and windowed by a `Range`
    /// header when `args` carries a count.
    pub fn build_query(&self, query: Option<&Query>, args: &OperationArgs) -> HttpRequest {
        let mut req = self.request(
            HttpMethod::Get,
            build_full_url(&self.url, None, query),
            None,
            args,
        );
        if let Some(range) = args.range_header() {
            req.headers.push(("range".to_string(), range));
        }
        req
    }

    pub fn build_get(&self, id: &ItemId, args: &OperationArgs) -> HttpRequest {
        let path = build_full_url(&self.url, Some(&id.to_string()), None);
        self.request(HttpMethod::Get, path, None, args)
    }

    pub fn build_create(&self, item: &Item, args: &OperationArgs) -> Result<HttpRequest> {
        let body = self.config.codec.serialize(item)?;
        Ok(self.request(HttpMethod::Post, self.url.clone(), Some(body), args))
    }

    pub fn build_update(&self, item: &Item, args: &OperationArgs) -> Result<HttpRequest> {
        let id = item_id(item).ok_or(ResourceError::MissingId)?;
        let body = self.config.codec.serialize(item)?;
        let path = build_full_url(&self.url, Some(&id.to_string()), None);
        Ok(self.request(HttpMethod::Put, path, Some(body), args))
    }

    pub fn build_remove(&self, item: &Item, args: &OperationArgs) -> Result<HttpRequest> {
        let id = item_id(item).ok_or(ResourceError::MissingId)?;
        let path = build_full_url(&self.url, Some(&id.to_string()), None);
        Ok(self.request(HttpMethod::Delete, path, None, args))
    }

    fn request(
        &self,
        method: HttpMethod,
        path: String,
        body: Option<String>,
        args: &OperationArgs,
    ) -> HttpRequest {
        let content_type = self.config.codec.content_type();
        let mut headers = vec![("accept".to_string(), content_type.to_string())];
        if body.is_some() {
            headers.push(("content-type".to_string(), content_type.to_string()));
        }
        headers.extend(self.config.default_headers.iter().cloned());

        HttpRequest {
            method,
            path,
            headers,
            body,
            timeout: args.timeout_override().unwrap_or(self.config.timeout),
        }
    }

    /// Spawns the round-trip for `request` and routes its outcome to the
    /// callbacks in `args`.
    fn issue(
        &self,
        request: HttpRequest,
        target: Option<ItemId>,
        args: OperationArgs,
    ) -> Result<Completion> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| ResourceError::Runtime(e.to_string()))?;
        let executor = Arc::clone(&self.config.executor);
        let codec = Arc::clone(&self.config.codec);
        let mut callbacks = args.into_callbacks();

        tracing::debug!(method = request.method.as_str(), path = %request.path, "issuing request");
        let task = runtime.spawn(async move {
            let timeout = request.timeout;
            let outcome = match tokio::time::timeout(timeout, executor.execute(request)).await {
                Ok(result) => result,
                Err(_) => Err(ResourceError::Timeout(timeout)),
            };
            match outcome.and_then(|response| parse_response(codec.as_ref(), response, target)) {
                Ok(items) => {
                    for item in items {
                        callbacks.load(item);
                    }
                }
                Err(error) => callbacks.fail(error),
            }
        });
        Ok(Completion::spawned(task))
    }
}

impl Transport for RemoteTransport {
    fn list(&mut self, args: OperationArgs) -> Result<Completion> {
        self.query(None, args)
    }

    fn get(&mut self, id: ItemId, args: OperationArgs) -> Result<Completion> {
        let req = self.build_get(&id, &args);
        self.issue(req, Some(id), args)
    }

    fn query(&mut self, query: Option<Query>, args: OperationArgs) -> Result<Completion> {
        let req = self.build_query(query.as_ref(), &args);
        self.issue(req, None, args)
    }

    fn create(&mut self, item: Item, args: OperationArgs) -> Result<Completion> {
        let req = self.build_create(&item, &args)?;
        self.issue(req, None, args)
    }

    fn update(&mut self, item: Item, args: OperationArgs) -> Result<Completion> {
        let req = self.build_update(&item, &args)?;
        self.issue(req, item_id(&item), args)
    }

    fn remove(&mut self, item: Item, args: OperationArgs) -> Result<Completion> {
        let req = self.build_remove(&item, &args)?;
        self.issue(req, item_id(&item), args)
    }
}

/// Interprets a response: the items to hand to `load`, in order, or the
/// failure to hand to `error`.
///
/// A JSON array yields one item per element, any other value a single
/// item, and an empty body no items at all.
pub fn parse_response(
    codec: &dyn Codec,
    response: HttpResponse,
    target: Option<ItemId>,
) -> Result<Vec<Item>> {
    if response.status == 404 {
        return Err(ResourceError::NotFound {
            id: target,
            item: None,
        });
    }
    if !response.is_success() {
        return Err(ResourceError::Status {
            status: response.status,
            body: response.body,
        });
    }
    if response.body.trim().is_empty() {
        return Ok(Vec::new());
    }

    match codec.deserialize(&response.body)? {
        Item::Array(items) => Ok(items),
        item => Ok(vec![item]),
    }
}
