//! This crate provides a to-do list whose items live in a hosted Parse collection.
//!
//! It provides a REST client for this collection in the [`client`] module, and for the user accounts in the [`account`] module.
//!
//! Because every change has to go through the server, a user-friendly app needs to keep a local copy of the list and patch it as replies come back.
//! A [`SyncController`](controller::SyncController) does exactly that: it turns user actions into remote calls,
//! applies their results to a [`ListState`](list_state::ListState), and tells a [`Presenter`](traits::Presenter) which rows changed.

pub mod traits;
pub mod error;
pub use error::Error;

mod item;
pub use item::{Item, ItemId, UserId};
pub mod list_state;
pub use list_state::ListState;
pub mod controller;
pub use controller::SyncController;

pub mod config;
pub mod resource;
pub mod client;
pub mod account;

pub mod mock;
pub mod mock_behaviour;
pub mod utils;

/// A [`SyncController`] talking to an actual Parse server
pub type ParseController<P> = SyncController<client::Client, account::Account, P>;

/// Build a [`ParseController`] whose item client and account share the same session
pub fn parse_controller<P: traits::Presenter>(settings: config::ParseSettings, presenter: P) -> ParseController<P> {
    let resource = resource::Resource::new(settings);
    let client = client::Client::with_resource(resource.clone());
    let account = account::Account::with_resource(resource);
    SyncController::new(client, account, presenter)
}
