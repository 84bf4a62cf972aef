//! Remote Command Gateway
//!
//! Turns administrative intents into remote console round trips.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::Config;
use crate::error::{GateError, Result};
use crate::protocol::{validate_line, Command};

use super::session::{ResponseMode, Session};
use super::transport::{Connector, TcpConnector};

/// Shared, thread-safe handle to the remote console
///
/// ## Concurrency Model
///
/// - One [`Session`] at a time, created lazily by the first command
/// - `inner` is held across connect → authenticate → send → receive, so
///   commands from concurrent callers never interleave on the wire
/// - A session that failed mid-flight is dropped; the next call reconnects
///   and re-authenticates
/// - A rejected secret is remembered: later calls fail fast without
///   contacting the server, since the secret cannot change at runtime
pub struct Gateway {
    /// Shared secret for AUTH
    password: String,

    /// Opens transports to the remote console
    connector: Arc<dyn Connector>,

    /// Session slot and sticky auth failure
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    session: Option<Session>,
    auth_rejected: bool,
}

impl Gateway {
    /// Create a gateway talking TCP to the configured endpoint
    ///
    /// No connection is made until the first command.
    pub fn new(config: &Config) -> Self {
        Self::with_connector(config, Arc::new(TcpConnector::from_config(config)))
    }

    /// Create a gateway over a custom connector
    pub fn with_connector(config: &Config, connector: Arc<dyn Connector>) -> Self {
        Self {
            password: config.rcon_password.clone(),
            connector,
            inner: Mutex::new(Inner::default()),
        }
    }

    // =========================================================================
    // Core Primitive
    // =========================================================================

    /// Send one rendered command line and return the raw response text
    pub fn execute(&self, command_line: &str) -> Result<String> {
        validate_line(command_line)?;
        self.round_trip(command_line, ResponseMode::Reassemble, false)
    }

    /// Render and send a [`Command`]
    pub fn execute_command(&self, command: &Command) -> Result<String> {
        self.execute(&command.render())
    }

    // =========================================================================
    // Named Operations
    // =========================================================================

    /// Query the current difficulty
    pub fn get_difficulty(&self) -> Result<String> {
        self.execute_command(&Command::get_difficulty())
    }

    /// Change the difficulty; `level` is not interpreted here
    pub fn set_difficulty(&self, level: &str) -> Result<String> {
        self.execute_command(&Command::set_difficulty(level)?)
    }

    /// Set a gamerule
    pub fn set_gamerule(&self, rule: &str, value: &str) -> Result<String> {
        self.execute_command(&Command::set_gamerule(rule, value)?)
    }

    /// Ask the server to shut down
    ///
    /// Returns once the server acknowledges; does not wait for the process to
    /// exit. The session is discarded either way, under the same lock as the
    /// round trip, so no other caller can reach the stopping server through it.
    pub fn stop(&self) -> Result<String> {
        let line = Command::stop().render();
        self.round_trip(&line, ResponseMode::Single, true)
    }

    // =========================================================================
    // Session Management
    // =========================================================================

    /// True if an authenticated session is currently held
    pub fn is_connected(&self) -> bool {
        self.inner
            .lock()
            .session
            .as_ref()
            .is_some_and(Session::is_authenticated)
    }

    /// Drop the current session, if any
    pub fn close(&self) {
        if let Some(mut session) = self.inner.lock().session.take() {
            session.close();
            tracing::debug!("Closed session to {}", session.endpoint());
        }
    }

    /// One exchange under the session lock; `end_session` closes the session
    /// before the lock is released
    fn round_trip(&self, line: &str, mode: ResponseMode, end_session: bool) -> Result<String> {
        let mut inner = self.inner.lock();

        if inner.auth_rejected {
            return Err(GateError::AuthenticationRejected);
        }

        // Drop a session that lost its authentication
        if inner.session.as_ref().is_some_and(|s| !s.is_authenticated()) {
            inner.session = None;
        }

        if inner.session.is_none() {
            match self.open_session() {
                Ok(session) => inner.session = Some(session),
                Err(e) => {
                    if matches!(e, GateError::AuthenticationRejected) {
                        inner.auth_rejected = true;
                    }
                    return Err(e);
                }
            }
        }

        let session = inner
            .session
            .as_mut()
            .ok_or_else(|| GateError::ConnectionLost("no session available".to_string()))?;

        tracing::debug!("Executing {:?} on {}", line, session.endpoint());
        let result = session.execute(line, mode);

        if let Err(ref e) = result {
            if e.discards_session() {
                tracing::warn!("Discarding session after error: {}", e);
                inner.session = None;
            }
        }

        if end_session {
            if let Some(mut session) = inner.session.take() {
                session.close();
                tracing::debug!("Closed session to {}", session.endpoint());
            }
        }

        result
    }

    fn open_session(&self) -> Result<Session> {
        let mut session = Session::open(self.connector.as_ref())?;
        session.authenticate(&self.password)?;
        Ok(session)
    }
}
