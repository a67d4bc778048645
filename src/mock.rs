//! In-memory stand-ins for the remote collection and the account service
//!
//! They behave like the Parse server does (IDs are assigned on creation, unknown IDs are `NotFound`...),
//! and can be told to fail with a [`MockBehaviour`].
#![cfg(feature = "mocks")]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::account::check_credentials;
use crate::client::check_title;
use crate::error::{Error, Result};
use crate::item::{Item, ItemId, UserId};
use crate::mock_behaviour::MockBehaviour;
use crate::traits::{AuthProvider, ItemRepository};


fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[derive(Default)]
struct Records {
    /// Items in creation order, with their owner
    items: Vec<(Item, Option<UserId>)>,
    /// How many requests reached this "server"
    n_requests: usize,
}

/// An [`ItemRepository`] that keeps its items in memory
#[derive(Clone, Default)]
pub struct MockRepository {
    records: Arc<Mutex<Records>>,
    behaviour: Arc<Mutex<MockBehaviour>>,
}

impl MockRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_with_behaviour(behaviour: Arc<Mutex<MockBehaviour>>) -> Self {
        Self { records: Arc::default(), behaviour }
    }

    pub fn behaviour(&self) -> &Arc<Mutex<MockBehaviour>> {
        &self.behaviour
    }

    /// Put an item straight into the collection, as if another client had created it
    pub fn insert(&self, item: Item, owner: Option<UserId>) {
        lock(&self.records).items.push((item, owner));
    }

    /// Every item of the collection, whoever owns it
    pub fn contents(&self) -> Vec<Item> {
        lock(&self.records).items.iter().map(|(item, _)| item.clone()).collect()
    }

    pub fn owner_of(&self, id: &ItemId) -> Option<UserId> {
        lock(&self.records).items.iter()
            .find(|(item, _)| item.id() == id)
            .and_then(|(_, owner)| owner.clone())
    }

    /// How many requests have been received so far (rejected ones included)
    pub fn n_requests(&self) -> usize {
        lock(&self.records).n_requests
    }

    fn receive(&self) -> MutexGuard<'_, Records> {
        let mut records = lock(&self.records);
        records.n_requests += 1;
        records
    }
}

#[async_trait]
impl ItemRepository for MockRepository {
    async fn list(&self, owner: Option<&UserId>) -> Result<Vec<Item>> {
        let records = self.receive();
        lock(&self.behaviour).can_list()?;

        Ok(records.items.iter()
            .filter(|(_, item_owner)| owner.is_none() || item_owner.as_ref() == owner)
            .map(|(item, _)| item.clone())
            .collect())
    }

    async fn create(&self, owner: Option<&UserId>, title: &str, description: Option<&str>) -> Result<Item> {
        check_title(title)?;
        let mut records = self.receive();
        lock(&self.behaviour).can_create()?;

        let item = Item::new(ItemId::random(), title.to_string(), description.map(String::from));
        records.items.push((item.clone(), owner.cloned()));
        Ok(item)
    }

    async fn update(&self, id: &ItemId, title: &str, description: Option<&str>) -> Result<Item> {
        check_title(title)?;
        let mut records = self.receive();
        lock(&self.behaviour).can_update()?;

        match records.items.iter_mut().find(|(item, _)| item.id() == id) {
            None => Err(Error::NotFound(id.clone())),
            Some((item, _)) => {
                *item = item.with_contents(title.to_string(), description.map(String::from));
                Ok(item.clone())
            },
        }
    }

    async fn delete(&self, id: &ItemId) -> Result<()> {
        let mut records = self.receive();
        lock(&self.behaviour).can_delete()?;

        match records.items.iter().position(|(item, _)| item.id() == id) {
            None => Err(Error::NotFound(id.clone())),
            Some(index) => {
                records.items.remove(index);
                Ok(())
            },
        }
    }
}


#[derive(Default)]
struct Accounts {
    /// username => (password, user ID)
    users: HashMap<String, (String, UserId)>,
    current: Option<UserId>,
}

/// An [`AuthProvider`] that keeps its accounts in memory
#[derive(Clone, Default)]
pub struct MockAuth {
    accounts: Arc<Mutex<Accounts>>,
    behaviour: Arc<Mutex<MockBehaviour>>,
}

impl MockAuth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_with_behaviour(behaviour: Arc<Mutex<MockBehaviour>>) -> Self {
        Self { accounts: Arc::default(), behaviour }
    }

    /// Register an account, without signing in
    pub fn add_user(&self, username: &str, password: &str, id: UserId) {
        lock(&self.accounts).users.insert(username.to_string(), (password.to_string(), id));
    }

    /// Register an account and sign in with it
    pub fn signed_in_as(self, id: UserId) -> Self {
        {
            let mut accounts = lock(&self.accounts);
            accounts.users.insert(id.to_string(), (String::new(), id.clone()));
            accounts.current = Some(id);
        }
        self
    }
}

#[async_trait]
impl AuthProvider for MockAuth {
    fn current_user_id(&self) -> Option<UserId> {
        lock(&self.accounts).current.clone()
    }

    async fn login(&self, username: &str, password: &str) -> Result<UserId> {
        check_credentials(username, password)?;
        lock(&self.behaviour).can_login()?;
        let mut accounts = lock(&self.accounts);
        let user = match accounts.users.get(username) {
            Some((expected, id)) if expected == password => id.clone(),
            _ => return Err(Error::Service { code: Some(101), message: "Invalid username/password.".to_string() }),
        };
        accounts.current = Some(user.clone());
        Ok(user)
    }

    async fn signup(&self, username: &str, password: &str) -> Result<UserId> {
        check_credentials(username, password)?;
        lock(&self.behaviour).can_signup()?;
        let mut accounts = lock(&self.accounts);
        if accounts.users.contains_key(username) {
            return Err(Error::Service { code: Some(202), message: "Account already exists for this username.".to_string() });
        }
        let user = UserId::from(ItemId::random().to_string());
        accounts.users.insert(username.to_string(), (password.to_string(), user.clone()));
        accounts.current = Some(user.clone());
        Ok(user)
    }

    async fn logout(&self) -> Result<()> {
        lock(&self.behaviour).can_logout()?;
        lock(&self.accounts).current = None;
        Ok(())
    }
}
