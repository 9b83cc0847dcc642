//! The transport contract and its two implementations.
//!
//! # Design
//! Every operation returns `Result<Completion>`. An `Err` is a precondition
//! fault raised before anything was attempted; everything else is reported
//! through the `load` / `error` callbacks in `OperationArgs`. The returned
//! `Completion` resolves once those callbacks have run, which lets callers
//! treat the synchronous `LocalTransport` and the asynchronous
//! `RemoteTransport` the same way.

mod local;
mod remote;

use std::future::Future;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use tokio::task::JoinHandle;

pub use local::LocalTransport;
pub use remote::{parse_response, RemoteTransport};

use crate::args::OperationArgs;
use crate::error::Result;
use crate::item::{Item, ItemId, Query};

/// CRUD operations over the items of one named resource.
pub trait Transport: Send {
    /// Fetches every item, subject to the pagination window in `args`.
    fn list(&mut self, args: OperationArgs) -> Result<Completion>;

    fn get(&mut self, id: ItemId, args: OperationArgs) -> Result<Completion>;

    /// Fetches the items matching `query`; `None` matches everything.
    fn query(&mut self, query: Option<Query>, args: OperationArgs) -> Result<Completion>;

    fn create(&mut self, item: Item, args: OperationArgs) -> Result<Completion>;

    fn update(&mut self, item: Item, args: OperationArgs) -> Result<Completion>;

    fn remove(&mut self, item: Item, args: OperationArgs) -> Result<Completion>;
}

/// Handle on an issued operation; resolves once its callbacks have run.
///
/// Dropping a `Completion` does not cancel the operation.
#[derive(Debug)]
pub struct Completion {
    task: Option<JoinHandle<()>>,
}

impl Completion {
    /// A completion whose callbacks already ran.
    pub fn ready() -> Self {
        Self { task: None }
    }

    pub(crate) fn spawned(task: JoinHandle<()>) -> Self {
        Self { task: Some(task) }
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }
}

impl Future for Completion {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let Some(task) = self.task.as_mut() else {
            return Poll::Ready(());
        };
        if let Err(e) = ready!(Pin::new(task).poll(cx)) {
            tracing::warn!(error = %e, "operation task did not complete");
        }
        self.task = None;
        Poll::Ready(())
    }
}
