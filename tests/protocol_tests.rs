//! Protocol handler and TCP server tests.

use std::io::{self, BufRead, BufReader, Cursor, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use rust_gomoku::client::GameClient;
use rust_gomoku::config::AppConfig;
use rust_gomoku::notation::CoordScheme;
use rust_gomoku::protocol::ClientHandler;
use rust_gomoku::server::GameServer;
use rust_gomoku::session::{Notice, Participant, SessionRegistry, SessionState};

fn pair() -> (Arc<SessionRegistry>, ClientHandler, ClientHandler, mpsc::Receiver<Notice>) {
    let registry = Arc::new(SessionRegistry::with_pool(3, Some(11)));
    let (tx, rx) = mpsc::channel();
    let alice = ClientHandler::new(Arc::clone(&registry), Participant::new("alice"));
    let bob = ClientHandler::new(Arc::clone(&registry), Participant::with_mailbox("bob", tx));
    (registry, alice, bob, rx)
}

// =============================================================================
// Handler Tests
// =============================================================================

#[test]
fn test_two_handlers_play_a_game() {
    let (registry, mut alice, mut bob, bob_inbox) = pair();

    assert!(alice.handle_line("enter room 2").text.contains("as black"));
    assert!(bob.handle_line("enter room 2").text.contains("as white"));
    assert_eq!(alice.handle_line("start").text, "ready; waiting for your opponent");
    assert!(bob.handle_line("start").text.starts_with("game started, you play white"));

    assert!(bob.handle_line("put H 8").text.contains("not your turn"));
    assert!(alice.handle_line("put H 8").text.starts_with("black plays H8"));
    assert!(bob.handle_line("put 9 J").text.starts_with("white plays J9"));
    assert!(alice.handle_line("put H8").text.contains("already occupied"));

    for row in 9..=11 {
        alice.handle_line(&format!("put H {row}"));
        bob.handle_line(&format!("put A {row}"));
    }
    let win = alice.handle_line("put H 12").text;
    assert!(win.starts_with("black plays H12 and wins"), "{win}");
    assert_eq!(registry.get(2).unwrap().state(), SessionState::Over);

    let notices: Vec<_> = bob_inbox.try_iter().collect();
    assert!(notices
        .iter()
        .any(|n| matches!(n, Notice::MovePlayed { winner: Some(_), .. })));

    assert!(alice.handle_line("again").text.starts_with("rematch requested"));
    assert!(bob.handle_line("again").text.starts_with("rematch started"));
    assert_eq!(registry.get(2).unwrap().state(), SessionState::Playing);
}

#[test]
fn test_room_listing() {
    let (_registry, mut alice, _bob, _rx) = pair();
    alice.handle_line("enter room 3");
    let listing = alice.handle_line("ls rooms").text;
    let lines: Vec<_> = listing.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "room 1: 0/2 EMPTY");
    assert_eq!(lines[2], "room 3: 1/2 WAITING");
}

#[test]
fn test_enter_unknown_room() {
    let (_registry, mut alice, _bob, _rx) = pair();
    assert_eq!(alice.handle_line("enter room 99").text, "no room 99");
}

#[test]
fn test_ai_locks_room_while_alone() {
    let (registry, mut alice, mut bob, _rx) = pair();
    alice.handle_line("enter room 1");
    assert!(alice.handle_line("ai start").text.starts_with("playing the computer"));
    assert!(registry.get(1).unwrap().is_locked());
    assert_eq!(bob.handle_line("enter room 1").text, "room 1 is locked");

    alice.handle_line("ai stop");
    assert!(!registry.get(1).unwrap().is_locked());
    assert!(bob.handle_line("enter room 1").text.contains("as white"));
    assert!(alice.handle_line("ai start").text.starts_with("leave the room"));
}

#[test]
fn test_legacy_coordinates() {
    let registry = Arc::new(SessionRegistry::with_pool(1, Some(1)));
    let mut alice =
        ClientHandler::new(Arc::clone(&registry), Participant::new("alice")).with_scheme(CoordScheme::LegacyHex);
    let mut bob =
        ClientHandler::new(Arc::clone(&registry), Participant::new("bob")).with_scheme(CoordScheme::LegacyHex);
    alice.handle_line("enter room 1");
    bob.handle_line("enter room 1");
    alice.handle_line("start");
    bob.handle_line("start");

    assert!(alice.handle_line("put 7 7").text.starts_with("black plays H8"));
    assert!(bob.handle_line("put E 0").text.starts_with("white plays O1"));
    assert!(alice.handle_line("put G 0").text.contains("invalid coordinate"));
}

#[test]
fn test_disconnect_frees_seat() {
    let (registry, mut alice, mut bob, bob_inbox) = pair();
    alice.handle_line("enter room 1");
    bob.handle_line("enter room 1");
    alice.handle_line("start");
    bob.handle_line("start");

    alice.disconnect();
    let session = registry.get(1).unwrap();
    assert_eq!(session.state(), SessionState::Waiting);
    assert_eq!(session.occupants(), 1);
    assert!(bob_inbox
        .try_iter()
        .any(|n| matches!(n, Notice::OpponentLeft { game_aborted: true, .. })));
}

#[test]
fn test_nickname_reaches_opponent_after_joining() {
    let (_registry, mut alice, mut bob, bob_inbox) = pair();
    alice.handle_line("enter room 1");
    assert_eq!(alice.handle_line("nickname ada").text, "hello, ada");
    bob.handle_line("enter room 1");
    alice.handle_line("leave");

    let left: Vec<_> = bob_inbox
        .try_iter()
        .filter_map(|n| match n {
            Notice::OpponentLeft { name, .. } => Some(name),
            _ => None,
        })
        .collect();
    assert_eq!(left, vec!["ada".to_string()]);
}

// =============================================================================
// Server Tests
// =============================================================================

fn read_line(reader: &mut BufReader<TcpStream>) -> String {
    let mut line = String::new();
    reader.read_line(&mut line).unwrap();
    line.trim_end().to_string()
}

#[test]
fn test_server_round_trip() {
    let mut config = AppConfig::default();
    config.server.rooms = 2;
    config.server.color = false;
    let server = GameServer::new(config);
    let registry = server.registry();

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || server.serve(listener));

    let stream = TcpStream::connect(addr).unwrap();
    stream.set_read_timeout(Some(Duration::from_secs(10))).unwrap();
    let mut writer = stream.try_clone().unwrap();
    let mut reader = BufReader::new(stream);

    assert!(read_line(&mut reader).starts_with("welcome"));
    writeln!(writer, "ls rooms").unwrap();
    assert_eq!(read_line(&mut reader), "room 1: 0/2 EMPTY");
    assert_eq!(read_line(&mut reader), "room 2: 0/2 EMPTY");

    writeln!(writer, "enter room 2").unwrap();
    assert!(read_line(&mut reader).starts_with("entered room 2 as black"));
    assert_eq!(registry.get(2).unwrap().occupants(), 1);

    writeln!(writer, "exit").unwrap();
    assert_eq!(read_line(&mut reader), "bye");
    assert_eq!(read_line(&mut reader), "");
    assert_eq!(registry.get(2).unwrap().occupants(), 0);
}

// =============================================================================
// Terminal Client Tests
// =============================================================================

/// Output sink the reader thread can own while the test keeps a handle.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap();
        String::from_utf8_lossy(&bytes).lines().map(str::to_string).collect()
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn spawn_server(rooms: u32) -> (SocketAddr, Arc<SessionRegistry>) {
    let mut config = AppConfig::default();
    config.server.rooms = rooms;
    config.server.color = false;
    let server = GameServer::new(config);
    let registry = server.registry();
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || server.serve(listener));
    (addr, registry)
}

#[test]
fn test_client_relays_until_exit() {
    let (addr, registry) = spawn_server(2);
    let output = Captured::default();

    let client = GameClient::connect(addr, "ada").unwrap();
    client
        .run(Cursor::new("ls rooms\n\nenter room 1\nexit\nls rooms\n"), output.clone())
        .unwrap();

    let lines = output.lines();
    assert!(lines[0].starts_with("welcome"), "{lines:?}");
    assert_eq!(lines[1], "hello, ada");
    assert_eq!(lines[2], "room 1: 0/2 EMPTY");
    assert_eq!(lines[3], "room 2: 0/2 EMPTY");
    assert!(lines[4].starts_with("entered room 1 as black"));
    // Nothing after `exit` is sent.
    assert_eq!(lines[5..], ["bye".to_string()]);
    assert_eq!(registry.get(1).unwrap().occupants(), 0);
}

#[test]
fn test_client_end_of_input_leaves_room() {
    let (addr, registry) = spawn_server(1);
    let output = Captured::default();

    let client = GameClient::connect(addr, "ada").unwrap();
    client.run(Cursor::new("enter room 1\n"), output.clone()).unwrap();

    let lines = output.lines();
    assert!(lines.iter().any(|l| l.starts_with("entered room 1")), "{lines:?}");
    assert!(!lines.iter().any(|l| l == "bye"));
    assert_eq!(registry.get(1).unwrap().occupants(), 0);
}

#[test]
fn test_client_name_reaches_opponent() {
    let (addr, registry) = spawn_server(1);
    let (tx, rx) = mpsc::channel();
    let mut bob = ClientHandler::new(Arc::clone(&registry), Participant::with_mailbox("bob", tx));
    bob.handle_line("enter room 1");

    let client = GameClient::connect(addr, "ada").unwrap();
    client.run(Cursor::new("enter room 1\nexit\n"), io::sink()).unwrap();

    let notices: Vec<_> = rx.try_iter().collect();
    assert!(notices.contains(&Notice::OpponentJoined { name: "ada".into() }), "{notices:?}");
    assert!(notices.iter().any(|n| matches!(n, Notice::OpponentLeft { name, .. } if name == "ada")));
}
