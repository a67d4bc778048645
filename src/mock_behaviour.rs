//! This module provides ways to tweak mocked sources, so that they can return errors on some tests
#![cfg(feature = "mocks")]

use crate::error::{Error, Result};

/// The kind of error a mocked operation fails with
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MockFailure {
    /// The server cannot be reached
    Network,
    /// The server rejects the request with this Parse error code
    Service(i64),
    /// The session token has expired, as the client reports it
    SessionExpired,
}

impl Default for MockFailure {
    fn default() -> Self {
        MockFailure::Network
    }
}

impl MockFailure {
    fn to_error(self, descr: &str) -> Error {
        match self {
            MockFailure::Network => Error::Network(format!("Mocked behaviour requires this {} to fail this time", descr)),
            MockFailure::Service(code) => Error::Service { code: Some(code), message: format!("Mocked rejection of this {}", descr) },
            MockFailure::SessionExpired => Error::NotAuthenticated,
        }
    }
}

/// This stores some behaviour tweaks, that describe how a mocked instance will behave during a given test
///
/// So that a functions fails _n_ times after _m_ initial successes, set `(m, n)` for the suited parameter
#[derive(Default, Clone, Debug)]
pub struct MockBehaviour {
    /// If this is true, every action will be allowed
    pub is_suspended: bool,
    /// What failing actions return
    pub failure: MockFailure,

    // From the ItemRepository trait
    pub list_behaviour: (u32, u32),
    pub create_behaviour: (u32, u32),
    pub update_behaviour: (u32, u32),
    pub delete_behaviour: (u32, u32),

    // From the AuthProvider trait
    pub login_behaviour: (u32, u32),
    pub signup_behaviour: (u32, u32),
    pub logout_behaviour: (u32, u32),
}

impl MockBehaviour {
    pub fn new() -> Self {
        Self::default()
    }

    /// All items will fail at once, for `n_fails` times
    pub fn fail_now(n_fails: u32) -> Self {
        Self {
            is_suspended: false,
            failure: MockFailure::Network,
            list_behaviour: (0, n_fails),
            create_behaviour: (0, n_fails),
            update_behaviour: (0, n_fails),
            delete_behaviour: (0, n_fails),
            login_behaviour: (0, n_fails),
            signup_behaviour: (0, n_fails),
            logout_behaviour: (0, n_fails),
        }
    }

    /// Make failing actions return another kind of error
    pub fn failing_with(mut self, failure: MockFailure) -> Self {
        self.failure = failure;
        self
    }

    /// Suspend this mock behaviour until you call `resume`
    pub fn suspend(&mut self) {
        self.is_suspended = true;
    }
    /// Make this behaviour active again
    pub fn resume(&mut self) {
        self.is_suspended = false;
    }

    pub fn can_list(&mut self) -> Result<()> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.list_behaviour, "list", self.failure)
    }
    pub fn can_create(&mut self) -> Result<()> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.create_behaviour, "create", self.failure)
    }
    pub fn can_update(&mut self) -> Result<()> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.update_behaviour, "update", self.failure)
    }
    pub fn can_delete(&mut self) -> Result<()> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.delete_behaviour, "delete", self.failure)
    }
    pub fn can_login(&mut self) -> Result<()> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.login_behaviour, "login", self.failure)
    }
    pub fn can_signup(&mut self) -> Result<()> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.signup_behaviour, "signup", self.failure)
    }
    pub fn can_logout(&mut self) -> Result<()> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.logout_behaviour, "logout", self.failure)
    }
}


/// Return Ok(()) in case the value is `(1+, _)` or `(_, 0)`, or return Err and decrement otherwise
fn decrement(value: &mut (u32, u32), descr: &str, failure: MockFailure) -> Result<()> {
    let remaining_successes = value.0;
    let remaining_failures = value.1;

    if remaining_successes > 0 {
        value.0 -= 1;
        log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
        Ok(())
    } else if remaining_failures > 0 {
        value.1 -= 1;
        log::debug!("Mock behaviour: failing a {} ({:?})", descr, value);
        Err(failure.to_error(descr))
    } else {
        log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
        Ok(())
    }
}
