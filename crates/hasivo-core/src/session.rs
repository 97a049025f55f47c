//! Session lifecycle: login → operate → logout.
//!
//! The switch keeps a single login slot. A session that is never logged out
//! blocks every later login until it times out on the device, so logout is
//! part of every exit path once login has succeeded:
//!
//! ```text
//! Idle → LoggingIn → Authenticated → Operating → LoggingOut → Closed
//!            │                                        ▲
//!            └──────────── login failed ──────────────┴──→ Closed (no logout)
//! ```
//!
//! [`with_session`] closes the session explicitly after the body returns;
//! the `Drop` impl covers unwinding out of the body.

use crate::config::SwitchConfig;
use crate::error::{SwitchError, SwitchResult};
use crate::protocol::{self, Command, Endpoint};
use crate::transport::{Reply, Transport};

use log::{debug, info};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    LoggingIn,
    Authenticated,
    Operating,
    LoggingOut,
    Closed,
}

/// An authenticated session bound to one switch.
pub struct Session<T: Transport> {
    transport: T,
    base_url: String,
    state: SessionState,
    request_timeout: Duration,
    logout_timeout: Duration,
    settle_delay: Duration,
}

/// Run `body` inside a freshly authenticated session.
///
/// Logout is attempted exactly once after login succeeds, whatever `body`
/// returns. Logout and release failures are swallowed; the result of `body`
/// is returned unchanged.
pub fn with_session<T, R, F>(config: &SwitchConfig, transport: T, body: F) -> SwitchResult<R>
where
    T: Transport,
    F: FnOnce(&mut Session<T>) -> SwitchResult<R>,
{
    config.base_url()?;

    let mut session = Session::open(config, transport)?;
    let outcome = body(&mut session);
    session.close();
    outcome
}

impl<T: Transport> Session<T> {
    /// Log in. On failure the transport is released and no logout is sent.
    pub fn open(config: &SwitchConfig, transport: T) -> SwitchResult<Self> {
        let mut session = Self {
            base_url: transport.base_url(),
            transport,
            state: SessionState::Idle,
            request_timeout: config.request_timeout(),
            logout_timeout: config.logout_timeout(),
            settle_delay: config.settle_delay(),
        };

        session.transition(SessionState::LoggingIn);
        let payload = protocol::login_payload(&config.password);
        if let Err(e) = session
            .transport
            .post(Endpoint::Login.path(), &payload, session.request_timeout)
        {
            debug!("login to {} failed: {e}", session.base_url);
            session.release();
            return Err(e);
        }

        info!("logged in to {}", session.base_url);
        session.transition(SessionState::Authenticated);
        pause(session.settle_delay);
        Ok(session)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_open(&self) -> bool {
        matches!(
            self.state,
            SessionState::Authenticated | SessionState::Operating
        )
    }

    /// Send one command and return the device's reply.
    pub fn execute(&mut self, command: &Command) -> SwitchResult<Reply> {
        if !self.is_open() {
            return Err(SwitchError::unknown(format!(
                "session to {} is not open ({:?})",
                self.base_url, self.state
            )));
        }
        self.transition(SessionState::Operating);

        let endpoint = command.endpoint();
        info!(
            "sending callcmd {} to {}{}",
            endpoint.callcmd(),
            self.base_url,
            endpoint.path()
        );
        self.transport
            .post(endpoint.path(), &command.payload(), self.request_timeout)
    }

    /// Log out (if authenticated) and release the transport. Idempotent.
    pub fn close(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }
        if self.is_open() {
            self.transition(SessionState::LoggingOut);
            if let Err(e) = self.logout() {
                debug!("{e}; ignoring");
            } else {
                info!("logged out of {}", self.base_url);
            }
            pause(self.settle_delay);
        }
        self.release();
    }

    fn logout(&mut self) -> SwitchResult<()> {
        self.transport
            .post(
                Endpoint::Logout.path(),
                &protocol::logout_payload(),
                self.logout_timeout,
            )
            .map(|_| ())
            .map_err(|e| SwitchError::logout(e.to_string()))
    }

    fn release(&mut self) {
        if let Err(e) = self.transport.close() {
            debug!("releasing transport for {} failed: {e}", self.base_url);
        }
        self.transition(SessionState::Closed);
    }

    fn transition(&mut self, next: SessionState) {
        debug!("session {}: {:?} -> {:?}", self.base_url, self.state, next);
        self.state = next;
    }
}

impl<T: Transport> Drop for Session<T> {
    fn drop(&mut self) {
        self.close();
    }
}

fn pause(delay: Duration) {
    if !delay.is_zero() {
        std::thread::sleep(delay);
    }
}
