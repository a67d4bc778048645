//! Support for library configuration options

use std::sync::{Arc, Mutex};
use once_cell::sync::Lazy;
use url::Url;

use crate::error::{Error, Result};

/// Base URL of the Parse server, including its mount path.
/// Feel free to override it when initing this library.
pub static SERVER_URL: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("https://parseapi.back4app.com/".to_string())));

/// The Parse application ID (`X-Parse-Application-Id`).
/// Feel free to override it when initing this library.
pub static APPLICATION_ID: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("MY_PARSE_APPLICATION_ID".to_string())));

/// The Parse client key (`X-Parse-Client-Key`).
/// Feel free to override it when initing this library.
pub static CLIENT_KEY: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("MY_PARSE_CLIENT_KEY".to_string())));

/// The name of the Parse class that holds the to-do items
pub static CLASS_NAME: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("ToDoList".to_string())));

/// The record field that holds the ID of the owning user
pub static OWNER_FIELD: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("ownerId".to_string())));


/// Everything needed to reach the remote collection
#[derive(Clone, Debug, PartialEq)]
pub struct ParseSettings {
    pub server_url: Url,
    pub application_id: String,
    pub client_key: String,
    pub class_name: String,
    pub owner_field: String,
}

impl ParseSettings {
    pub fn new<S: AsRef<str>, T: ToString, U: ToString>(server_url: S, application_id: T, client_key: U) -> Result<Self> {
        let mut server_url = Url::parse(server_url.as_ref())
            .map_err(|err| Error::Validation(format!("Invalid server URL {:?}: {}", server_url.as_ref(), err)))?;
        // Url::join would otherwise drop the last path segment (e.g. a "/parse" mount point)
        if server_url.path().ends_with('/') == false {
            let path = format!("{}/", server_url.path());
            server_url.set_path(&path);
        }

        Ok(Self {
            server_url,
            application_id: application_id.to_string(),
            client_key: client_key.to_string(),
            class_name: read(&CLASS_NAME),
            owner_field: read(&OWNER_FIELD),
        })
    }

    /// Build settings from the current values of the process-wide statics of this module
    pub fn from_globals() -> Result<Self> {
        Self::new(read(&SERVER_URL), read(&APPLICATION_ID), read(&CLIENT_KEY))
    }

    pub fn with_class_name<S: ToString>(mut self, class_name: S) -> Self {
        self.class_name = class_name.to_string();
        self
    }

    pub fn with_owner_field<S: ToString>(mut self, owner_field: S) -> Self {
        self.owner_field = owner_field.to_string();
        self
    }
}

fn read(value: &Lazy<Arc<Mutex<String>>>) -> String {
    match value.lock() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}
