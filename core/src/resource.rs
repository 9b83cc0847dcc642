//! A named handle forwarding CRUD verbs to its transport.

use crate::args::OperationArgs;
use crate::error::Result;
use crate::item::{Item, ItemId, Query};
use crate::transport::{Completion, Transport};

/// Exclusive owner of one transport. Every verb is forwarded unchanged;
/// results arrive through the callbacks in `OperationArgs`.
pub struct Resource {
    transport: Box<dyn Transport>,
}

impl Resource {
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self { transport }
    }

    pub fn list(&mut self, args: OperationArgs) -> Result<Completion> {
        self.transport.list(args)
    }

    pub fn get(&mut self, id: impl Into<ItemId>, args: OperationArgs) -> Result<Completion> {
        self.transport.get(id.into(), args)
    }

    pub fn query(&mut self, query: Option<Query>, args: OperationArgs) -> Result<Completion> {
        self.transport.query(query, args)
    }

    pub fn create(&mut self, item: Item, args: OperationArgs) -> Result<Completion> {
        self.transport.create(item, args)
    }

    pub fn update(&mut self, item: Item, args: OperationArgs) -> Result<Completion> {
        self.transport.update(item, args)
    }

    pub fn remove(&mut self, item: Item, args: OperationArgs) -> Result<Completion> {
        self.transport.remove(item, args)
    }
}

impl std::fmt::Debug for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resource").finish_non_exhaustive()
    }
}
