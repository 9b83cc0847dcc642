//! In-memory JSON collection server for exercising remote transports.
//!
//! Any path segment names a collection, created on first use. Items get
//! integer ids from 1 in creation order. A `Range: <start>-<end>` header on
//! a collection GET returns `206 Partial Content` with a `Content-Range`
//! header; query-string pairs filter the collection by field equality.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::Value;
use tokio::{net::TcpListener, sync::RwLock};

/// One named collection.
#[derive(Debug)]
pub struct Collection {
    items: BTreeMap<u64, Value>,
    next_id: u64,
}

impl Default for Collection {
    fn default() -> Self {
        Self {
            items: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl Collection {
    /// Stores `item` under a fresh id, overwriting any `id` it carried.
    fn insert(&mut self, mut item: Value) -> Option<Value> {
        let fields = item.as_object_mut()?;
        let id = self.next_id;
        self.next_id += 1;
        fields.insert("id".to_string(), Value::from(id));
        self.items.insert(id, item.clone());
        Some(item)
    }
}

pub type Db = Arc<RwLock<HashMap<String, Collection>>>;

pub fn app() -> Router {
    app_with_data(HashMap::new())
}

/// Builds the app with collections pre-populated from `data`.
pub fn app_with_data(data: HashMap<String, Vec<Value>>) -> Router {
    let mut collections = HashMap::new();
    for (name, items) in data {
        let mut collection = Collection::default();
        for item in items {
            collection.insert(item);
        }
        collections.insert(name, collection);
    }

    let db: Db = Arc::new(RwLock::new(collections));
    Router::new()
        .route("/{collection}", get(list_items).post(create_item))
        .route(
            "/{collection}/{id}",
            get(get_item).put(update_item).delete(delete_item),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "mock server listening");
    }
    axum::serve(listener, app()).await
}

/// Parses `"<start>-<end>"`, optionally prefixed with `items=`.
pub fn parse_range(value: &str) -> Option<(usize, usize)> {
    let value = value.trim();
    let value = value.strip_prefix("items=").unwrap_or(value);
    let (start, end) = value.split_once('-')?;
    let start: usize = start.trim().parse().ok()?;
    let end: usize = end.trim().parse().ok()?;
    (start <= end).then_some((start, end))
}

fn field_matches(item: &Value, key: &str, expected: &str) -> bool {
    match item.get(key) {
        Some(Value::String(s)) => s == expected,
        Some(other) => other.to_string() == expected,
        None => false,
    }
}

async fn list_items(
    State(db): State<Db>,
    Path(collection): Path<String>,
    Query(filter): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let db = db.read().await;
    let items: Vec<Value> = db
        .get(&collection)
        .map(|c| {
            c.items
                .values()
                .filter(|item| filter.iter().all(|(k, v)| field_matches(item, k, v)))
                .cloned()
                .collect()
        })
        .unwrap_or_default();

    let range = headers
        .get(header::RANGE)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_range);
    let Some((start, end)) = range else {
        return Json(items).into_response();
    };

    let total = items.len();
    let from = start.min(total);
    let to = end.saturating_add(1).min(total);
    let page = items[from..to].to_vec();
    let content_range = if page.is_empty() {
        format!("items */{total}")
    } else {
        format!("items {from}-{}/{total}", to - 1)
    };
    tracing::debug!(%collection, %content_range, "serving range");
    (
        StatusCode::PARTIAL_CONTENT,
        [(header::CONTENT_RANGE, content_range)],
        Json(page),
    )
        .into_response()
}

async fn create_item(
    State(db): State<Db>,
    Path(collection): Path<String>,
    Json(input): Json<Value>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    let mut db = db.write().await;
    let item = db
        .entry(collection)
        .or_default()
        .insert(input)
        .ok_or(StatusCode::UNPROCESSABLE_ENTITY)?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn get_item(
    State(db): State<Db>,
    Path((collection, id)): Path<(String, u64)>,
) -> Result<Json<Value>, StatusCode> {
    let db = db.read().await;
    db.get(&collection)
        .and_then(|c| c.items.get(&id))
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn update_item(
    State(db): State<Db>,
    Path((collection, id)): Path<(String, u64)>,
    Json(mut input): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let fields = input.as_object_mut().ok_or(StatusCode::UNPROCESSABLE_ENTITY)?;
    fields.insert("id".to_string(), Value::from(id));

    let mut db = db.write().await;
    let stored = db
        .get_mut(&collection)
        .and_then(|c| c.items.get_mut(&id))
        .ok_or(StatusCode::NOT_FOUND)?;
    *stored = input.clone();
    Ok(Json(input))
}

async fn delete_item(
    State(db): State<Db>,
    Path((collection, id)): Path<(String, u64)>,
) -> Result<StatusCode, StatusCode> {
    let mut db = db.write().await;
    db.get_mut(&collection)
        .and_then(|c| c.items.remove(&id))
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(StatusCode::NOT_FOUND)
}
