//! In-memory transport over an ordered collection of items.
//!
//! # Design
//! The collection and its `id -> position` index are owned exclusively by
//! the transport and only change through `create` and `update`. Every
//! callback runs before the operation returns, so the `Completion` handed
//! back is always already resolved.

use std::collections::HashMap;

use super::{Completion, Transport};
use crate::args::OperationArgs;
use crate::error::{ResourceError, Result};
use crate::item::{item_id, Item, ItemId, Query};

/// A transport simulating the CRUD contract against a local collection.
#[derive(Debug, Clone)]
pub struct LocalTransport {
    items: Vec<Item>,
    index: HashMap<ItemId, usize>,
    /// `None` once every integer id has been handed out.
    next_id: Option<u64>,
}

impl LocalTransport {
    /// Seeds the transport with `items`, indexing every item with a
    /// defined id.
    ///
    /// The next assigned id is one greater than the largest integer id in
    /// the collection, or `1` when there is none. A seed holding `u64::MAX`
    /// leaves no id for `create` to assign.
    pub fn new(items: Vec<Item>) -> Self {
        let mut index = HashMap::with_capacity(items.len());
        let mut max_id = 0;
        for (position, item) in items.iter().enumerate() {
            let Some(id) = item_id(item) else { continue };
            if let Some(n) = id.as_int() {
                max_id = max_id.max(n);
            }
            if let Some(previous) = index.insert(id.clone(), position) {
                tracing::warn!(%id, previous, position, "duplicate id in dataset; later item wins");
            }
        }

        Self {
            items,
            index,
            next_id: max_id.checked_add(1),
        }
    }

    /// The id the next `create` will assign, if any remain.
    pub fn next_id(&self) -> Option<u64> {
        self.next_id
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn lookup(&self, id: &ItemId) -> Option<usize> {
        self.index.get(id).copied()
    }
}

impl Default for LocalTransport {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Transport for LocalTransport {
    fn list(&mut self, args: OperationArgs) -> Result<Completion> {
        if !args.has_load() {
            return Err(ResourceError::MissingLoadHandler);
        }

        let len = self.items.len();
        let start = args.start_or_default().min(len);
        let end = match args.count_limit() {
            Some(count) => start.saturating_add(count).min(len),
            None => len,
        };

        let mut callbacks = args.into_callbacks();
        for item in &self.items[start..end] {
            callbacks.load(item.clone());
        }
        Ok(Completion::ready())
    }

    fn get(&mut self, id: ItemId, args: OperationArgs) -> Result<Completion> {
        if !args.has_load() {
            return Err(ResourceError::MissingLoadHandler);
        }

        let mut callbacks = args.into_callbacks();
        match self.lookup(&id) {
            Some(position) => callbacks.load(self.items[position].clone()),
            None => callbacks.fail(ResourceError::NotFound {
                id: Some(id),
                item: None,
            }),
        }
        Ok(Completion::ready())
    }

    fn query(&mut self, _query: Option<Query>, _args: OperationArgs) -> Result<Completion> {
        Err(ResourceError::Unsupported("query"))
    }

    fn create(&mut self, mut item: Item, args: OperationArgs) -> Result<Completion> {
        if let Some(id) = item_id(&item) {
            return Err(ResourceError::AlreadyHasId(id));
        }
        let Some(fields) = item.as_object_mut() else {
            return Err(ResourceError::InvalidItem("expected a key-value object".to_string()));
        };
        let Some(next) = self.next_id else {
            return Err(ResourceError::InvalidItem("id space exhausted".to_string()));
        };

        let id = ItemId::Int(next);
        self.next_id = next.checked_add(1);
        fields.insert("id".to_string(), id.to_value());

        let position = self.items.len();
        self.items.push(item.clone());
        self.index.insert(id.clone(), position);
        tracing::debug!(%id, position, "created item");

        args.into_callbacks().load(item);
        Ok(Completion::ready())
    }

    fn update(&mut self, item: Item, args: OperationArgs) -> Result<Completion> {
        let Some(id) = item_id(&item) else {
            tracing::debug!("ignoring update of an item without an id");
            return Ok(Completion::ready());
        };

        let mut callbacks = args.into_callbacks();
        match self.lookup(&id) {
            Some(position) => {
                self.items[position] = item.clone();
                tracing::debug!(%id, position, "replaced item");
                callbacks.load(item);
            }
            None => callbacks.fail(ResourceError::NotFound {
                id: Some(id),
                item: Some(item),
            }),
        }
        Ok(Completion::ready())
    }

    fn remove(&mut self, _item: Item, _args: OperationArgs) -> Result<Completion> {
        Err(ResourceError::Unsupported("remove"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn sample() -> LocalTransport {
        LocalTransport::new(vec![
            json!({"id": 1, "name": "a"}),
            json!({"id": 3, "name": "b"}),
        ])
    }

    fn collector() -> (Arc<Mutex<Vec<Item>>>, OperationArgs) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let args = OperationArgs::new().on_load(move |item| sink.lock().unwrap().push(item));
        (seen, args)
    }

    fn numbered(n: u64) -> LocalTransport {
        LocalTransport::new((1..=n).map(|i| json!({"id": i})).collect())
    }

    #[test]
    fn next_id_follows_true_maximum() {
        assert_eq!(sample().next_id(), Some(4));
        // The maximum must carry across the whole scan, not just the last item.
        let t = LocalTransport::new(vec![json!({"id": 9}), json!({"id": 2}), json!({"name": "x"})]);
        assert_eq!(t.next_id(), Some(10));
    }

    #[test]
    fn next_id_is_one_for_empty_or_unnumbered_collections() {
        assert_eq!(LocalTransport::new(Vec::new()).next_id(), Some(1));
        assert_eq!(LocalTransport::new(vec![json!({"name": "x"})]).next_id(), Some(1));
        assert_eq!(LocalTransport::new(vec![json!({"id": "slug"})]).next_id(), Some(1));
    }

    #[test]
    fn create_assigns_increasing_unique_ids() {
        let mut t = sample();
        let mut assigned = Vec::new();
        for name in ["c", "d", "e"] {
            let (seen, args) = collector();
            t.create(json!({"name": name}), args).unwrap();
            let item = seen.lock().unwrap().pop().unwrap();
            assigned.push(item["id"].as_u64().unwrap());
        }
        assert_eq!(assigned, vec![4, 5, 6]);
        assert_eq!(t.next_id(), Some(7));
        assert_eq!(t.items()[2], json!({"id": 4, "name": "c"}));
    }

    #[test]
    fn seed_at_largest_id_leaves_no_id_to_assign() {
        let mut t = LocalTransport::new(vec![json!({"id": u64::MAX, "name": "last"})]);
        assert_eq!(t.next_id(), None);

        let err = t.create(json!({"name": "overflow"}), OperationArgs::new()).unwrap_err();
        assert!(matches!(err, ResourceError::InvalidItem(ref msg) if msg == "id space exhausted"));
        assert!(err.is_precondition());
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn last_id_is_assigned_before_exhaustion() {
        let mut t = LocalTransport::new(vec![json!({"id": u64::MAX - 1})]);
        let (seen, args) = collector();
        t.create(json!({"name": "edge"}), args).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![json!({"id": u64::MAX, "name": "edge"})]);
        assert_eq!(t.next_id(), None);
        assert!(t.create(json!({"name": "more"}), OperationArgs::new()).is_err());
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn create_without_args_still_stores() {
        let mut t = LocalTransport::default();
        t.create(json!({"name": "solo"}), OperationArgs::new()).unwrap();
        assert_eq!(t.items(), &[json!({"id": 1, "name": "solo"})]);
    }

    #[test]
    fn create_rejects_item_with_id() {
        let mut t = sample();
        let err = t.create(json!({"id": 8, "name": "z"}), OperationArgs::new()).unwrap_err();
        assert!(matches!(err, ResourceError::AlreadyHasId(ItemId::Int(8))));
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn create_rejects_non_objects() {
        let mut t = sample();
        let err = t.create(json!([1, 2]), OperationArgs::new()).unwrap_err();
        assert!(matches!(err, ResourceError::InvalidItem(_)));
    }

    #[test]
    fn get_finds_by_id() {
        let mut t = sample();
        let (seen, args) = collector();
        let completion = t.get(ItemId::Int(3), args).unwrap();
        assert!(completion.is_finished());
        assert_eq!(*seen.lock().unwrap(), vec![json!({"id": 3, "name": "b"})]);
    }

    #[test]
    fn get_missing_invokes_error() {
        let mut t = sample();
        let failed = Arc::new(Mutex::new(None));
        let f = failed.clone();
        let args = OperationArgs::new()
            .on_load(|_| panic!("unexpected load"))
            .on_error(move |e| *f.lock().unwrap() = Some(e));
        t.get(ItemId::Int(99), args).unwrap();
        let err = failed.lock().unwrap().take().unwrap();
        assert!(matches!(
            err,
            ResourceError::NotFound { id: Some(ItemId::Int(99)), item: None }
        ));
    }

    #[test]
    fn list_and_get_require_load() {
        let mut t = sample();
        assert!(matches!(
            t.list(OperationArgs::new()).unwrap_err(),
            ResourceError::MissingLoadHandler
        ));
        assert!(matches!(
            t.get(ItemId::Int(1), OperationArgs::new()).unwrap_err(),
            ResourceError::MissingLoadHandler
        ));
    }

    #[test]
    fn list_windows_follow_min_of_count_and_remaining() {
        for len in [0u64, 1, 5, 12] {
            for start in 0..=len as usize {
                for count in [0usize, 1, 3, 20] {
                    let mut t = numbered(len);
                    let (seen, args) = collector();
                    t.list(args.start(start).count(count)).unwrap();
                    let ids: Vec<u64> = seen
                        .lock()
                        .unwrap()
                        .iter()
                        .map(|i| i["id"].as_u64().unwrap())
                        .collect();
                    let expected_len = count.min(len as usize - start);
                    let expected: Vec<u64> =
                        (start as u64 + 1..=start as u64 + expected_len as u64).collect();
                    assert_eq!(ids, expected, "len={len} start={start} count={count}");
                }
            }
        }
    }

    #[test]
    fn list_without_count_runs_to_end() {
        let mut t = numbered(4);
        let (seen, args) = collector();
        t.list(args.start(1)).unwrap();
        assert_eq!(seen.lock().unwrap().len(), 3);
    }

    #[test]
    fn list_start_past_end_loads_nothing() {
        let mut t = numbered(2);
        let (seen, args) = collector();
        t.list(args.start(10)).unwrap();
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn update_replaces_without_merging() {
        // Position 0 is a valid slot.
        let mut t = LocalTransport::new(vec![json!({"id": 1, "name": "a", "extra": true})]);
        let (seen, args) = collector();
        t.update(json!({"id": 1, "name": "renamed"}), args).unwrap();
        assert_eq!(t.items(), &[json!({"id": 1, "name": "renamed"})]);
        assert_eq!(*seen.lock().unwrap(), vec![json!({"id": 1, "name": "renamed"})]);
    }

    #[test]
    fn update_unknown_id_reports_item_and_leaves_collection() {
        let mut t = sample();
        let before = t.items().to_vec();
        let failed = Arc::new(Mutex::new(None));
        let f = failed.clone();
        let args = OperationArgs::new().on_error(move |e| *f.lock().unwrap() = Some(e));
        t.update(json!({"id": 42, "name": "ghost"}), args).unwrap();

        match failed.lock().unwrap().take() {
            Some(ResourceError::NotFound { item: Some(item), .. }) => {
                assert_eq!(item, json!({"id": 42, "name": "ghost"}))
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(t.items(), before.as_slice());
    }

    #[test]
    fn update_without_id_is_a_no_op() {
        let mut t = sample();
        let args = OperationArgs::new()
            .on_load(|_| panic!("unexpected load"))
            .on_error(|_| panic!("unexpected error"));
        t.update(json!({"name": "anon"}), args).unwrap();
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn query_and_remove_are_unsupported() {
        let mut t = sample();
        assert!(matches!(
            t.query(None, OperationArgs::new()).unwrap_err(),
            ResourceError::Unsupported("query")
        ));
        assert!(matches!(
            t.remove(json!({"id": 1}), OperationArgs::new()).unwrap_err(),
            ResourceError::Unsupported("remove")
        ));
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn scenario_seed_create_get() {
        let mut t = sample();
        assert_eq!(t.next_id(), Some(4));

        let (created, args) = collector();
        t.create(json!({"name": "c"}), args).unwrap();
        assert_eq!(*created.lock().unwrap(), vec![json!({"id": 4, "name": "c"})]);

        let (got, args) = collector();
        t.get(ItemId::Int(3), args).unwrap();
        assert_eq!(*got.lock().unwrap(), vec![json!({"id": 3, "name": "b"})]);

        let missed = Arc::new(Mutex::new(false));
        let m = missed.clone();
        let args = OperationArgs::new()
            .on_load(|_| {})
            .on_error(move |_| *m.lock().unwrap() = true);
        t.get(ItemId::Int(99), args).unwrap();
        assert!(*missed.lock().unwrap());
    }
}
