//! Signing users in and out of the Parse server

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::parse_reply;
use crate::config::ParseSettings;
use crate::error::{Error, Result};
use crate::item::UserId;
use crate::resource::{Resource, Session};
use crate::traits::AuthProvider;


/// An [`AuthProvider`] backed by the `/login`, `/users` and `/logout` endpoints of a Parse server
pub struct Account {
    resource: Resource,
    http: reqwest::Client,
}

impl Account {
    pub fn new(settings: ParseSettings) -> Self {
        Self::with_resource(Resource::new(settings))
    }

    /// Create an account whose session will be used by every other user of `resource`
    pub fn with_resource(resource: Resource) -> Self {
        Self { resource, http: reqwest::Client::new() }
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    async fn open_session(&self, endpoint: &str, username: &str, password: &str) -> Result<UserId> {
        check_credentials(username, password)?;

        let body = Credentials { username, password };
        let request = self.http.post(self.resource.endpoint(endpoint)?)
            .header("X-Parse-Revocable-Session", "1")
            .json(&body);
        // A stale session token would make the server reject the request
        let response = self.resource.identify(request).send().await?;
        let reply: SessionReply = parse_reply(response, None).await?;
        let user_id = UserId::from(reply.object_id);
        self.resource.set_session(Some(Session { user_id: user_id.clone(), token: reply.session_token }));
        log::info!("Signed in as {} ({})", username, user_id);
        Ok(user_id)
    }
}

#[async_trait]
impl AuthProvider for Account {
    fn current_user_id(&self) -> Option<UserId> {
        self.resource.session().map(|session| session.user_id)
    }

    async fn login(&self, username: &str, password: &str) -> Result<UserId> {
        self.open_session("login", username, password).await
    }

    async fn signup(&self, username: &str, password: &str) -> Result<UserId> {
        self.open_session("users", username, password).await
    }

    async fn logout(&self) -> Result<()> {
        if self.resource.session().is_none() {
            log::debug!("Nobody is signed in, nothing to log out from");
            return Ok(());
        }

        let request = self.resource.authorize(self.http.post(self.resource.endpoint("logout")?));
        let response = request.send().await?;
        match parse_reply::<Value>(response, None).await {
            // The server does not know this session anymore: we are signed out anyway
            Ok(_) | Err(Error::NotAuthenticated) => (),
            Err(err) => return Err(err),
        }

        self.resource.set_session(None);
        log::info!("Signed out");
        Ok(())
    }
}


pub(crate) fn check_credentials(username: &str, password: &str) -> Result<()> {
    if username.trim().is_empty() {
        return Err(Error::Validation("username cannot be empty".to_string()));
    }
    if password.is_empty() {
        return Err(Error::Validation("password cannot be empty".to_string()));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionReply {
    object_id: String,
    session_token: String,
}
