//! The seams of this crate: where the remote service and the UI plug in

use async_trait::async_trait;

use crate::error::Result;
use crate::item::{Item, ItemId, UserId};
use crate::controller::ListSignal;

/// CRUD access to the remote collection, for a single entity type
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Returns every item of the collection, or only the ones owned by `owner` if it is `Some`.
    ///
    /// A failure must never be interpreted as an empty list.
    async fn list(&self, owner: Option<&UserId>) -> Result<Vec<Item>>;

    /// Create a new item. The returned item carries the ID the server has assigned to it.
    ///
    /// Implementors must reject empty titles before sending anything.
    async fn create(&self, owner: Option<&UserId>, title: &str, description: Option<&str>) -> Result<Item>;

    /// Replace the title and description of an existing item
    async fn update(&self, id: &ItemId, title: &str, description: Option<&str>) -> Result<Item>;

    /// Delete an item. Deleting an item that does not exist is an error.
    async fn delete(&self, id: &ItemId) -> Result<()>;
}

/// Signs users in and out
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// The user that is currently signed in, if any
    fn current_user_id(&self) -> Option<UserId>;

    async fn login(&self, username: &str, password: &str) -> Result<UserId>;
    async fn signup(&self, username: &str, password: &str) -> Result<UserId>;
    async fn logout(&self) -> Result<()>;
}

/// Whatever renders the list.
///
/// It is told what changed, and reads a snapshot from the controller to render it.
/// Signals are delivered while the controller holds its list, in the order changes were applied:
/// `present` must return quickly and must not call back into the controller (forward the signal to a channel instead).
pub trait Presenter: Send + Sync {
    fn present(&self, signal: ListSignal);
}
