//! This module turns user actions into remote calls, and remote replies into list changes
//!
//! A [`SyncController`] owns the [`ListState`] of a screen. Remote calls are awaited outside of any lock,
//! then their result is applied to the list (and announced to the [`Presenter`]) in a single short critical section.
//! Hence, two concurrent operations are applied in the order their replies arrive, which is not necessarily the order they were submitted in.
//! For instance, if an update and a delete of the same item are in flight, whichever reply comes last decides what is displayed.

use std::sync::{Mutex, MutexGuard};

use crate::client::check_title;
use crate::error::{Error, Result};
use crate::item::{Item, ItemId, UserId};
use crate::list_state::ListState;
use crate::traits::{AuthProvider, ItemRepository, Presenter};

pub mod signal;
pub use signal::ListSignal;

/// Where a screen session is in its lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// The screen is not displayed
    Idle,
    /// The screen is displayed, and its initial fetch is in progress
    Loading,
    /// The screen is displayed, and its initial fetch has completed (successfully or not)
    Ready,
}

struct State {
    phase: Phase,
    list: ListState,
    /// Bumped every time the screen goes away, so that late replies can be told apart
    generation: u64,
}


/// Keeps a [`ListState`] in line with a remote collection
pub struct SyncController<R, A, P>
where
    R: ItemRepository,
    A: AuthProvider,
    P: Presenter,
{
    repository: R,
    auth: A,
    presenter: P,

    state: Mutex<State>,
}

impl<R, A, P> SyncController<R, A, P>
where
    R: ItemRepository,
    A: AuthProvider,
    P: Presenter,
{
    pub fn new(repository: R, auth: A, presenter: P) -> Self {
        Self {
            repository, auth, presenter,
            state: Mutex::new(State { phase: Phase::Idle, list: ListState::new(), generation: 0 }),
        }
    }

    pub fn repository(&self) -> &R { &self.repository }
    pub fn auth(&self) -> &A { &self.auth }
    pub fn presenter(&self) -> &P { &self.presenter }

    pub fn phase(&self) -> Phase {
        self.lock().phase
    }

    /// A copy of the items currently displayed, in display order
    pub fn snapshot(&self) -> Vec<Item> {
        self.lock().list.items().to_vec()
    }

    /// The screen has become visible. This triggers a full fetch, unless the screen was visible already.
    pub async fn view_appeared(&self) -> Result<()> {
        {
            let mut state = self.lock();
            if state.phase != Phase::Idle {
                log::debug!("View is already displayed ({:?})", state.phase);
                return Ok(());
            }
            state.phase = Phase::Loading;
        }
        self.fetch_all().await
    }

    /// The screen has been left. Replies to the requests that are still in flight will be ignored.
    pub fn view_disappeared(&self) {
        let mut state = self.lock();
        state.phase = Phase::Idle;
        state.generation += 1;
    }

    /// Replace the whole list with the items of the current user.
    ///
    /// When nobody is signed in, there is nothing to display: the list is emptied without any request.
    pub async fn fetch_all(&self) -> Result<()> {
        let generation = self.generation();

        let owner = match self.auth.current_user_id() {
            None => {
                log::info!("Nobody is signed in, not fetching anything");
                self.apply_fetched(generation, |list| {
                    list.clear();
                    vec![ListSignal::FullReload]
                });
                return Ok(());
            },
            Some(owner) => owner,
        };

        match self.repository.list(Some(&owner)).await {
            Err(err) => Err(self.report(generation, "fetch items", err, true)),
            Ok(items) => {
                log::debug!("Replacing the list with {} items", items.len());
                self.apply_fetched(generation, |list| {
                    list.replace_all(items);
                    vec![ListSignal::FullReload]
                });
                Ok(())
            },
        }
    }

    /// Create an item, and append it to the list once the server has accepted it
    pub async fn submit_create(&self, title: &str, description: Option<&str>) -> Result<Item> {
        let generation = self.generation();
        if let Err(err) = check_title(title) {
            return Err(self.fail(generation, "create an item", err));
        }
        let owner = match self.auth.current_user_id() {
            None => return Err(self.fail(generation, "create an item", Error::NotAuthenticated)),
            Some(owner) => owner,
        };

        let item = match self.repository.create(Some(&owner), title, description).await {
            Err(err) => return Err(self.fail(generation, "create an item", err)),
            Ok(item) => item,
        };

        let applied = item.clone();
        self.apply(generation, move |list| {
            let id = applied.id().clone();
            match list.append(applied.clone()) {
                Ok(index) => vec![ListSignal::RowInserted(index)],
                // A full fetch that completed in the meantime may already contain it
                Err(_) => list.replace(&id, applied)
                    .map(ListSignal::RowUpdated)
                    .into_iter()
                    .collect(),
            }
        });
        Ok(item)
    }

    /// Replace the title and description of an item
    pub async fn submit_update(&self, id: &ItemId, title: &str, description: Option<&str>) -> Result<Item> {
        let generation = self.generation();
        if let Err(err) = check_title(title) {
            return Err(self.fail(generation, "update an item", err));
        }

        let item = match self.repository.update(id, title, description).await {
            Err(err) => return Err(self.fail(generation, "update an item", err)),
            Ok(item) => item,
        };

        let applied = item.clone();
        self.apply(generation, |list| {
            match list.replace(id, applied) {
                Some(index) => vec![ListSignal::RowUpdated(index)],
                None => {
                    log::debug!("Updated item {} is not displayed anymore", id);
                    Vec::new()
                },
            }
        });
        Ok(item)
    }

    /// Delete an item, and remove it from the list once the server has confirmed
    pub async fn submit_delete(&self, id: &ItemId) -> Result<()> {
        let generation = self.generation();

        if let Err(err) = self.repository.delete(id).await {
            return Err(self.fail(generation, "delete an item", err));
        }

        self.apply(generation, |list| {
            match list.remove_by_id(id) {
                Some(index) => vec![ListSignal::RowRemoved(index)],
                None => {
                    log::debug!("Deleted item {} was not displayed anyway", id);
                    Vec::new()
                },
            }
        });
        Ok(())
    }

    /// Sign in, then fetch the items of this user
    pub async fn request_login(&self, username: &str, password: &str) -> Result<UserId> {
        let generation = self.generation();
        match self.auth.login(username, password).await {
            Err(err) => Err(self.fail(generation, "log in", err)),
            Ok(user) => {
                self.on_signed_in(generation, &user).await;
                Ok(user)
            },
        }
    }

    /// Create an account and sign in, then fetch the items of this user (probably none)
    pub async fn request_signup(&self, username: &str, password: &str) -> Result<UserId> {
        let generation = self.generation();
        match self.auth.signup(username, password).await {
            Err(err) => Err(self.fail(generation, "sign up", err)),
            Ok(user) => {
                self.on_signed_in(generation, &user).await;
                Ok(user)
            },
        }
    }

    /// Sign out, and empty the list
    pub async fn request_logout(&self) -> Result<()> {
        let generation = self.generation();
        if let Err(err) = self.auth.logout().await {
            return Err(self.fail(generation, "log out", err));
        }

        self.apply(generation, |list| {
            list.clear();
            vec![ListSignal::SessionChanged(None), ListSignal::FullReload]
        });
        Ok(())
    }

    async fn on_signed_in(&self, generation: u64, user: &UserId) {
        let still_displayed = self.apply(generation, |_list| vec![ListSignal::SessionChanged(Some(user.clone()))]);
        if still_displayed {
            // Failures have already been reported to the presenter
            let _ = self.fetch_all().await;
        }
    }


    fn lock(&self) -> MutexGuard<'_, State> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// Patch the list and notify the presenter, unless the screen has been left since `generation`.
    ///
    /// Returns whether the change has been applied.
    fn apply<F>(&self, generation: u64, change: F) -> bool
    where
        F: FnOnce(&mut ListState) -> Vec<ListSignal>,
    {
        self.patch(generation, false, change)
    }

    /// Same as `apply`, for the outcome of a full fetch. This ends the loading phase.
    fn apply_fetched<F>(&self, generation: u64, change: F) -> bool
    where
        F: FnOnce(&mut ListState) -> Vec<ListSignal>,
    {
        self.patch(generation, true, change)
    }

    fn patch<F>(&self, generation: u64, fetch_completed: bool, change: F) -> bool
    where
        F: FnOnce(&mut ListState) -> Vec<ListSignal>,
    {
        let mut state = self.lock();
        if state.generation != generation {
            log::debug!("Discarding a reply that arrived after the view was left");
            return false;
        }

        let signals = change(&mut state.list);
        if fetch_completed && state.phase == Phase::Loading {
            state.phase = Phase::Ready;
        }
        for signal in signals {
            self.presenter.present(signal);
        }
        true
    }

    /// Report a failure to the presenter (if the screen is still there), and hand the error back
    fn fail(&self, generation: u64, action: &str, err: Error) -> Error {
        self.report(generation, action, err, false)
    }

    fn report(&self, generation: u64, action: &str, err: Error, fetch_completed: bool) -> Error {
        log::warn!("Unable to {}: {}", action, err);
        let message = format!("Unable to {}: {}", action, err);
        self.patch(generation, fetch_completed, |_list| vec![ListSignal::Error(message)]);
        err
    }
}
