//! The local, ordered mirror of the remote collection

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::item::{Item, ItemId};

/// An ordered list of items, where every ID appears at most once.
///
/// New items go at the end, and every operation except [`ListState::replace_all`] keeps the relative order of the remaining items.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListState {
    items: Vec<Item>,
}

impl ListState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard the current contents, and install a whole new list
    pub fn replace_all(&mut self, items: Vec<Item>) {
        let mut seen = HashSet::new();
        self.items = items.into_iter()
            .filter(|item| {
                let new = seen.insert(item.id().clone());
                if new == false {
                    log::warn!("Item {} is listed twice, only keeping its first occurrence", item.id());
                }
                new
            })
            .collect();
    }

    /// Add an item at the end of the list, and return its index
    pub fn append(&mut self, item: Item) -> Result<usize> {
        if self.position(item.id()).is_some() {
            return Err(Error::DuplicateId(item.id().clone()));
        }
        self.items.push(item);
        Ok(self.items.len() - 1)
    }

    /// Overwrite the item that has the given ID, keeping its position.
    /// Returns its index, or `None` (and changes nothing) if there is no such item
    pub fn replace(&mut self, id: &ItemId, item: Item) -> Option<usize> {
        let index = self.position(id)?;
        if item.id() != id && self.position(item.id()).is_some() {
            log::warn!("Cannot replace {} by {}, that is already in the list", id, item.id());
            return None;
        }
        self.items[index] = item;
        Some(index)
    }

    /// Remove the item that has the given ID, and return the index it had
    pub fn remove_by_id(&mut self, id: &ItemId) -> Option<usize> {
        let index = self.position(id)?;
        self.items.remove(index);
        Some(index)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn position(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
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
}
