//! This module provides a client to the remote Parse collection
//!
//! This is the only place that knows how items look like on the wire.

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::config::ParseSettings;
use crate::error::{Error, Result};
use crate::item::{Item, ItemId, UserId};
use crate::resource::Resource;
use crate::traits::ItemRepository;

/// Parse error code for a missing object (also used for bad credentials on /login)
pub(crate) const OBJECT_NOT_FOUND: i64 = 101;
/// Parse error code for an expired or revoked session token
pub(crate) const INVALID_SESSION_TOKEN: i64 = 209;
/// How many records are requested at once. Parse servers return 100 records when no limit is given
pub const DEFAULT_PAGE_SIZE: usize = 1000;


/// An item repository backed by a Parse server, over its REST API
pub struct Client {
    resource: Resource,
    http: reqwest::Client,
    page_size: usize,
}

impl Client {
    /// Create a client. This does not start a connection
    pub fn new(settings: ParseSettings) -> Self {
        Self::with_resource(Resource::new(settings))
    }

    /// Create a client that shares its session with other users of `resource` (typically an [`Account`](crate::account::Account))
    pub fn with_resource(resource: Resource) -> Self {
        Self { resource, http: reqwest::Client::new(), page_size: DEFAULT_PAGE_SIZE }
    }

    /// Change how many records are fetched per request (at least one)
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    async fn fetch_page(&self, filter: Option<&str>, skip: usize) -> Result<Vec<RemoteRecord>> {
        let mut request = self.http.get(self.resource.class_url()?)
            .query(&[("order", "createdAt")])
            .query(&[("limit", self.page_size), ("skip", skip)]);
        if let Some(filter) = filter {
            request = request.query(&[("where", filter)]);
        }
        let response = self.resource.authorize(request).send().await?;
        let reply: QueryReply = parse_reply(response, None).await?;
        Ok(reply.results)
    }

    fn owner_filter(&self, owner: &UserId) -> String {
        let mut filter = Map::new();
        filter.insert(self.resource.settings().owner_field.clone(), Value::String(owner.to_string()));
        Value::Object(filter).to_string()
    }
}

#[async_trait]
impl ItemRepository for Client {
    /// Fetch every record, in creation order, one page after the other
    async fn list(&self, owner: Option<&UserId>) -> Result<Vec<Item>> {
        let filter = owner.map(|owner| self.owner_filter(owner));

        let mut items = Vec::new();
        let mut skip = 0;
        loop {
            let page = self.fetch_page(filter.as_deref(), skip).await?;
            let n_records = page.len();
            items.extend(page.into_iter().filter_map(RemoteRecord::into_item));
            if n_records < self.page_size {
                break;
            }
            skip += n_records;
        }
        log::debug!("Fetched {} items", items.len());
        Ok(items)
    }

    async fn create(&self, owner: Option<&UserId>, title: &str, description: Option<&str>) -> Result<Item> {
        check_title(title)?;

        let mut body = Map::new();
        body.insert("title".to_string(), Value::from(title));
        body.insert("description".to_string(), description.map(Value::from).unwrap_or(Value::Null));
        if let Some(owner) = owner {
            body.insert(self.resource.settings().owner_field.clone(), Value::from(owner.as_str()));
        }

        let request = self.http.post(self.resource.class_url()?).json(&body);
        let response = self.resource.authorize(request).send().await?;
        let reply: CreateReply = parse_reply(response, None).await?;

        log::info!("Created item {}", reply.object_id);
        Ok(Item::new(ItemId::from(reply.object_id), title.to_string(), description.map(String::from)))
    }

    async fn update(&self, id: &ItemId, title: &str, description: Option<&str>) -> Result<Item> {
        check_title(title)?;

        let body = UpdateBody { title, description };
        let request = self.http.put(self.resource.object_url(id.as_str())?).json(&body);
        let response = self.resource.authorize(request).send().await?;
        let _reply: Value = parse_reply(response, Some(id)).await?;

        log::info!("Updated item {}", id);
        Ok(Item::new(id.clone(), title.to_string(), description.map(String::from)))
    }

    async fn delete(&self, id: &ItemId) -> Result<()> {
        let request = self.http.delete(self.resource.object_url(id.as_str())?);
        let response = self.resource.authorize(request).send().await?;
        let _reply: Value = parse_reply(response, Some(id)).await?;

        log::info!("Deleted item {}", id);
        Ok(())
    }
}


pub(crate) fn check_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::Validation("an item must have a title".to_string()));
    }
    Ok(())
}

/// Turn a server response into either its decoded payload or the matching [`Error`].
///
/// `target` is the item the request was about, so that a "not found" reply can name it.
pub(crate) async fn parse_reply<T: DeserializeOwned>(response: Response, target: Option<&ItemId>) -> Result<T> {
    let status = response.status();
    let text = response.text().await?;

    if status.is_success() == false {
        return Err(error_from_reply(status, &text, target));
    }
    if text.trim().is_empty() {
        return Err(Error::service(format!("Empty reply (HTTP status {})", status)));
    }
    serde_json::from_str(&text)
        .map_err(|err| Error::service(format!("Unable to decode the server reply: {}", err)))
}

pub(crate) fn error_from_reply(status: StatusCode, text: &str, target: Option<&ItemId>) -> Error {
    let body: Option<ErrorReply> = serde_json::from_str(text).ok();
    let (code, message) = match body {
        Some(body) => (Some(body.code), body.error),
        None => (None, format!("Unexpected HTTP status code {:?}", status)),
    };
    log::debug!("Server replied {} ({:?}: {})", status, code, message);

    match (code, target) {
        (Some(OBJECT_NOT_FOUND), Some(id)) => Error::NotFound(id.clone()),
        (Some(INVALID_SESSION_TOKEN), _) => Error::NotAuthenticated,
        _ => Error::Service { code, message },
    }
}


#[derive(Debug, Deserialize)]
struct ErrorReply {
    code: i64,
    error: String,
}

#[derive(Debug, Deserialize)]
struct QueryReply {
    #[serde(default)]
    results: Vec<RemoteRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateReply {
    object_id: String,
}

#[derive(Debug, Serialize)]
struct UpdateBody<'a> {
    title: &'a str,
    description: Option<&'a str>,
}

/// A record of the remote collection, where every field may be missing or have the wrong type
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteRecord {
    object_id: Option<String>,
    title: Option<Value>,
    description: Option<Value>,
}

impl RemoteRecord {
    fn into_item(self) -> Option<Item> {
        let id = match self.object_id {
            None => {
                log::warn!("Remote record has no objectId. Ignoring it");
                return None;
            },
            Some(id) => ItemId::from(id),
        };

        let title = match self.title {
            Some(Value::String(title)) if title.is_empty() == false => title,
            other => {
                log::warn!("Remote record {} has an invalid title ({:?}). Ignoring it", id, other);
                return None;
            },
        };

        let description = match self.description {
            Some(Value::String(descr)) => Some(descr),
            None | Some(Value::Null) => None,
            Some(other) => {
                log::warn!("Remote record {} has a non-string description ({}). Dropping it", id, other);
                None
            },
        };

        Some(Item::new(id, title, description))
    }
}
