//! Tests for Session
//!
//! Drives sessions over an in-memory transport to check exactly which packets
//! go out, in which order, and how server replies are interpreted.

#[path = "../common/mod.rs"]
mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use common::{written_packets, ScriptedConnector, ScriptedTransport, PASSWORD};
use craftgate::gateway::{ResponseMode, Session, SessionState};
use craftgate::protocol::{Packet, PacketType};
use craftgate::{Config, GateError, Gateway};

// =============================================================================
// Helper Functions
// =============================================================================

fn auth_ok(id: i32) -> Packet {
    Packet::new(id, PacketType::AUTH_RESPONSE, "")
}

fn auth_failed() -> Packet {
    Packet::new(-1, PacketType::AUTH_RESPONSE, "")
}

fn value(id: i32, body: &str) -> Packet {
    Packet::new(id, PacketType::ResponseValue, body)
}

fn session_with(packets: &[Packet]) -> (Session, Arc<std::sync::Mutex<Vec<u8>>>) {
    let (transport, output) = ScriptedTransport::new(packets);
    (Session::new(Box::new(transport), "scripted"), output)
}

// =============================================================================
// Authentication Tests
// =============================================================================

#[test]
fn test_new_session_is_unauthenticated() {
    let (session, output) = session_with(&[]);

    assert_eq!(session.state(), SessionState::Unauthenticated);
    assert!(!session.is_authenticated());
    assert!(written_packets(&output).is_empty());
}

#[test]
fn test_authenticate_sends_secret() {
    let (mut session, output) = session_with(&[auth_ok(1)]);

    session.authenticate(PASSWORD).unwrap();

    assert_eq!(session.state(), SessionState::Authenticated);
    assert_eq!(written_packets(&output), vec![Packet::auth(1, PASSWORD)]);
}

#[test]
fn test_authenticate_skips_leading_empty_response_value() {
    let (mut session, _output) = session_with(&[value(1, ""), auth_ok(1)]);

    session.authenticate(PASSWORD).unwrap();

    assert!(session.is_authenticated());
}

#[test]
fn test_authenticate_rejected() {
    let (mut session, _output) = session_with(&[auth_failed()]);

    let err = session.authenticate("wrong").unwrap_err();

    assert!(matches!(err, GateError::AuthenticationRejected));
    assert_eq!(session.state(), SessionState::Closed);
}

#[test]
fn test_authenticate_id_mismatch_is_protocol_error() {
    let (mut session, _output) = session_with(&[auth_ok(42)]);

    let err = session.authenticate(PASSWORD).unwrap_err();

    assert!(matches!(err, GateError::Protocol(_)));
    assert_eq!(session.state(), SessionState::Closed);
}

#[test]
fn test_authenticate_eof_is_connection_lost() {
    let (mut session, _output) = session_with(&[]);

    let err = session.authenticate(PASSWORD).unwrap_err();

    assert!(matches!(err, GateError::ConnectionLost(_)));
    assert_eq!(session.state(), SessionState::Closed);
}

#[test]
fn test_authenticate_twice_is_refused() {
    let (mut session, output) = session_with(&[auth_ok(1)]);
    session.authenticate(PASSWORD).unwrap();

    assert!(matches!(
        session.authenticate(PASSWORD),
        Err(GateError::Protocol(_))
    ));
    assert_eq!(written_packets(&output).len(), 1);
}

// =============================================================================
// Command Tests
// =============================================================================

#[test]
fn test_execute_before_auth_sends_nothing() {
    let (mut session, output) = session_with(&[value(1, "should not be read")]);

    let err = session.execute("stop", ResponseMode::Single).unwrap_err();

    assert!(matches!(err, GateError::Protocol(_)));
    assert!(written_packets(&output).is_empty());
}

#[test]
fn test_execute_on_closed_session_sends_nothing() {
    let (mut session, output) = session_with(&[auth_ok(1)]);
    session.authenticate(PASSWORD).unwrap();
    session.close();

    assert!(session.execute("list", ResponseMode::Single).is_err());
    assert_eq!(written_packets(&output).len(), 1);
}

#[test]
fn test_execute_reassembles_fragments() {
    let (mut session, output) = session_with(&[
        auth_ok(1),
        value(2, "There are 2 of a max of 20 players online: "),
        value(2, "alice, bob"),
        value(3, "Unknown request 0"),
    ]);
    session.authenticate(PASSWORD).unwrap();

    let answer = session.execute("list", ResponseMode::Reassemble).unwrap();

    assert_eq!(
        answer,
        "There are 2 of a max of 20 players online: alice, bob"
    );
    assert_eq!(
        written_packets(&output),
        vec![
            Packet::auth(1, PASSWORD),
            Packet::command(2, "list"),
            Packet::sentinel(3),
        ]
    );
}

#[test]
fn test_execute_discards_stale_packets() {
    let (mut session, _output) = session_with(&[
        auth_ok(1),
        value(99, "left over from an earlier command"),
        value(2, "fresh"),
        value(3, ""),
    ]);
    session.authenticate(PASSWORD).unwrap();

    let answer = session.execute("seed", ResponseMode::Reassemble).unwrap();

    assert_eq!(answer, "fresh");
}

#[test]
fn test_execute_single_mode_sends_no_sentinel() {
    let (mut session, output) = session_with(&[auth_ok(1), value(2, "Stopping the server")]);
    session.authenticate(PASSWORD).unwrap();

    let answer = session.execute("stop", ResponseMode::Single).unwrap();

    assert_eq!(answer, "Stopping the server");
    assert_eq!(
        written_packets(&output),
        vec![Packet::auth(1, PASSWORD), Packet::command(2, "stop")]
    );
}

#[test]
fn test_execute_eof_mid_response_closes_session() {
    let (mut session, _output) = session_with(&[auth_ok(1), value(2, "partial")]);
    session.authenticate(PASSWORD).unwrap();

    let err = session.execute("list", ResponseMode::Reassemble).unwrap_err();

    assert!(err.is_connectivity());
    assert_eq!(session.state(), SessionState::Closed);
}

#[test]
fn test_execute_rejects_multiline_without_closing() {
    let (mut session, output) = session_with(&[auth_ok(1)]);
    session.authenticate(PASSWORD).unwrap();

    let err = session.execute("say a\nstop", ResponseMode::Single).unwrap_err();

    assert!(matches!(err, GateError::InvalidCommand(_)));
    assert!(session.is_authenticated());
    assert_eq!(written_packets(&output).len(), 1);
}

// =============================================================================
// Gateway over a Fake Connector
// =============================================================================

#[test]
fn test_gateway_authenticates_before_first_command() {
    let (transport, output) = ScriptedTransport::new(&[
        auth_ok(1),
        value(2, "The difficulty has been set to Hard"),
        value(3, ""),
    ]);
    let connector = Arc::new(ScriptedConnector::new(vec![transport]));
    let config = Config::builder().rcon_password(PASSWORD).build();
    let gateway = Gateway::with_connector(&config, connector.clone());

    let answer = gateway.set_difficulty("hard").unwrap();

    assert_eq!(answer, "The difficulty has been set to Hard");
    let sent = written_packets(&output);
    assert_eq!(sent[0], Packet::auth(1, PASSWORD));
    assert_eq!(sent[1], Packet::command(2, "difficulty hard"));
    assert_eq!(connector.connects.load(Ordering::SeqCst), 1);
}

#[test]
fn test_gateway_reconnects_after_lost_session() {
    // First transport dies mid-response, second one works
    let (broken, _) = ScriptedTransport::new(&[auth_ok(1)]);
    let (healthy, output) = ScriptedTransport::new(&[auth_ok(1), value(2, "ok"), value(3, "")]);
    let connector = Arc::new(ScriptedConnector::new(vec![broken, healthy]));
    let config = Config::builder().rcon_password(PASSWORD).build();
    let gateway = Gateway::with_connector(&config, connector.clone());

    assert!(gateway.execute("save-all").unwrap_err().is_connectivity());
    assert!(!gateway.is_connected());

    assert_eq!(gateway.execute("save-all").unwrap(), "ok");
    assert_eq!(connector.connects.load(Ordering::SeqCst), 2);
    assert_eq!(written_packets(&output)[0], Packet::auth(1, PASSWORD));
}
