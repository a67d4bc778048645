use std::sync::{Arc, Mutex, MutexGuard};

use reqwest::RequestBuilder;
use url::Url;

use crate::config::ParseSettings;
use crate::error::{Error, Result};
use crate::item::UserId;

/// The currently signed-in user, as returned by the server
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub user_id: UserId,
    pub token: String,
}

/// Just a wrapper around the server settings and the current session.
///
/// Clones share the same session, so that an [`Account`](crate::account::Account) that signs in
/// is immediately seen by the [`Client`](crate::client::Client) it has been built with.
#[derive(Clone, Debug)]
pub struct Resource {
    settings: ParseSettings,
    session: Arc<Mutex<Option<Session>>>,
}

impl Resource {
    pub fn new(settings: ParseSettings) -> Self {
        Self { settings, session: Arc::new(Mutex::new(None)) }
    }

    pub fn settings(&self) -> &ParseSettings { &self.settings }

    /// Build the URL of an endpoint, relative to the server URL
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        self.settings.server_url.join(path)
            .map_err(|err| Error::Validation(format!("Invalid endpoint {:?}: {}", path, err)))
    }

    pub fn class_url(&self) -> Result<Url> {
        self.endpoint(&format!("classes/{}", self.settings.class_name))
    }

    /// The URL of a single object. The ID is percent-encoded, so that it always stays a single path segment
    pub fn object_url(&self, object_id: &str) -> Result<Url> {
        let mut url = self.class_url()?;
        url.path_segments_mut()
            .map_err(|_| Error::Validation(format!("{} cannot be a base URL", self.settings.server_url)))?
            .push(object_id);
        Ok(url)
    }

    /// Decorate a request with the application headers only
    pub fn identify(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("X-Parse-Application-Id", &self.settings.application_id)
            .header("X-Parse-Client-Key", &self.settings.client_key)
    }

    /// Decorate a request with the application headers, and the session token if there is one
    pub fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = self.identify(request);
        match self.session() {
            None => request,
            Some(session) => request.header("X-Parse-Session-Token", session.token),
        }
    }

    pub fn session(&self) -> Option<Session> {
        self.lock_session().clone()
    }

    pub fn set_session(&self, session: Option<Session>) {
        *self.lock_session() = session;
    }

    fn lock_session(&self) -> MutexGuard<'_, Option<Session>> {
        match self.session.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_session() {
        let settings = ParseSettings::new("https://example.com/parse/", "app", "key").unwrap();
        let a = Resource::new(settings);
        let b = a.clone();
        assert_eq!(b.session(), None);

        a.set_session(Some(Session { user_id: "u1".into(), token: "r:abc".to_string() }));
        assert_eq!(b.session().map(|s| s.user_id), Some(UserId::from("u1")));
    }

    #[test]
    fn urls() {
        let settings = ParseSettings::new("https://example.com/parse", "app", "key").unwrap();
        let res = Resource::new(settings);
        assert_eq!(res.class_url().unwrap().as_str(), "https://example.com/parse/classes/ToDoList");
        assert_eq!(res.object_url("abc").unwrap().as_str(), "https://example.com/parse/classes/ToDoList/abc");
        assert_eq!(res.endpoint("login").unwrap().as_str(), "https://example.com/parse/login");
    }

    #[test]
    fn object_ids_stay_in_their_segment() {
        let settings = ParseSettings::new("https://example.com/parse/", "app", "key").unwrap();
        let res = Resource::new(settings);
        assert_eq!(res.object_url("a/b?c#d").unwrap().as_str(), "https://example.com/parse/classes/ToDoList/a%2Fb%3Fc%23d");
        assert_eq!(res.object_url("../users").unwrap().path(), "/parse/classes/ToDoList/..%2Fusers");
    }
}
