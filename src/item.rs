//! To-do items, and the identifiers the remote service hands out

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};


/// A to-do item, as stored in the remote collection
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// The ID assigned by the server when this item was created
    id: ItemId,
    /// The display name of the item. Never empty.
    title: String,
    description: Option<String>,
}

impl Item {
    pub fn new(id: ItemId, title: String, description: Option<String>) -> Self {
        Self { id, title, description }
    }

    pub fn id(&self) -> &ItemId { &self.id }
    pub fn title(&self) -> &str { &self.title }
    pub fn description(&self) -> Option<&str> { self.description.as_deref() }

    /// Returns a copy of this item with both mutable fields replaced
    pub fn with_contents(&self, title: String, description: Option<String>) -> Self {
        Self { id: self.id.clone(), title, description }
    }
}

impl Display for Item {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.description {
            Some(descr) if descr.is_empty() == false => write!(f, "{} ({})", self.title, descr),
            _ => write!(f, "{}", self.title),
        }
    }
}


/// The `objectId` of a record in the remote collection
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId {
    content: String,
}

impl ItemId {
    pub fn as_str(&self) -> &str {
        &self.content
    }

    /// Generate a random ItemId. Only in-memory test doubles need this, real IDs come from the server.
    pub fn random() -> Self {
        let random = uuid::Uuid::new_v4().to_simple().to_string();
        Self { content: random }
    }
}

impl From<String> for ItemId {
    fn from(content: String) -> Self {
        Self { content }
    }
}
impl From<&str> for ItemId {
    fn from(content: &str) -> Self {
        Self { content: content.to_string() }
    }
}

impl Display for ItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}


/// The `objectId` of a signed-in user
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId {
    content: String,
}

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.content
    }
}

impl From<String> for UserId {
    fn from(content: String) -> Self {
        Self { content }
    }
}
impl From<&str> for UserId {
    fn from(content: &str) -> Self {
        Self { content: content.to_string() }
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}
