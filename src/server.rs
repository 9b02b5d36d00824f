//! TCP front end: one thread per connection.
//!
//! Each connection gets a reader (this module's loop feeding a
//! [`ClientHandler`]) and a writer thread draining the participant's
//! mailbox, so notices caused by the opponent arrive while the reader is
//! blocked on input. Replies travel through the same mailbox and keep their
//! order relative to notices.

use std::io::{self, BufRead, BufReader, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread;

use tracing::{info, instrument, warn};

use crate::config::AppConfig;
use crate::notation::CoordScheme;
use crate::protocol::ClientHandler;
use crate::render::{notice_text, Style};
use crate::session::{Notice, Participant, SessionRegistry};

const GREETING: &str = "welcome to gomoku; type `help` for commands";

/// The game server.
#[derive(Debug)]
pub struct GameServer {
    config: AppConfig,
    registry: Arc<SessionRegistry>,
}

impl GameServer {
    /// A server with the configured pool of rooms.
    pub fn new(config: AppConfig) -> Self {
        let registry = Arc::new(SessionRegistry::with_pool(config.server.rooms, config.server.seed));
        Self { config, registry }
    }

    /// Shared session registry.
    #[must_use]
    pub fn registry(&self) -> Arc<SessionRegistry> {
        Arc::clone(&self.registry)
    }

    /// Bind the configured address and serve forever.
    pub fn run(&self) -> io::Result<()> {
        let listener = TcpListener::bind(self.config.server.bind_addr())?;
        self.serve(listener)
    }

    /// Accept connections on `listener` until it fails.
    pub fn serve(&self, listener: TcpListener) -> io::Result<()> {
        info!(addr = %listener.local_addr()?, rooms = self.registry.len(), "listening");
        for (n, stream) in listener.incoming().enumerate() {
            let stream = match stream {
                Ok(stream) => stream,
                Err(err) => {
                    warn!(%err, "accept failed");
                    continue;
                }
            };
            let registry = self.registry();
            let config = self.config.clone();
            let spawned = thread::Builder::new()
                .name(format!("gomoku-conn-{n}"))
                .spawn(move || {
                    if let Err(err) = serve_connection(stream, registry, &config) {
                        warn!(%err, "connection ended with error");
                    }
                });
            if let Err(err) = spawned {
                warn!(%err, "could not spawn connection thread");
            }
        }
        Ok(())
    }
}

#[instrument(skip_all, fields(peer = %stream.peer_addr().map_or_else(|_| "?".to_string(), |a| a.to_string())))]
fn serve_connection(stream: TcpStream, registry: Arc<SessionRegistry>, config: &AppConfig) -> io::Result<()> {
    let scheme = config.server.coord_scheme;
    let style = Style::from_color(config.server.color);

    let (tx, rx) = mpsc::channel();
    let writer_stream = stream.try_clone()?;
    let writer = thread::Builder::new()
        .name("gomoku-writer".to_string())
        .spawn(move || write_notices(writer_stream, rx, scheme, style))?;

    let participant = Participant::with_mailbox("anonymous", tx.clone());
    info!(participant = %participant.id, "connected");
    let mut handler = ClientHandler::new(registry, participant)
        .with_scheme(scheme)
        .with_style(style)
        .with_search(config.search.clone());
    let _ = tx.send(Notice::Info(GREETING.to_string()));

    let mut closed = false;
    for line in BufReader::new(stream).lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                warn!(%err, "read failed");
                break;
            }
        };
        let reply = handler.handle_line(&line);
        if !reply.text.is_empty() {
            let _ = tx.send(Notice::Info(reply.text));
        }
        if reply.close {
            closed = true;
            break;
        }
    }

    if !closed {
        warn!("client disconnected");
        handler.disconnect();
    }
    // Every sender is gone once the handler's participant is dropped, which
    // ends the writer.
    drop(handler);
    drop(tx);
    if writer.join().is_err() {
        warn!("writer thread panicked");
    }
    Ok(())
}

fn write_notices(mut stream: TcpStream, rx: Receiver<Notice>, scheme: CoordScheme, style: Style) {
    for notice in rx {
        let text = notice_text(&notice, scheme, style);
        if writeln!(stream, "{text}").and_then(|()| stream.flush()).is_err() {
            break;
        }
    }
    let _ = stream.shutdown(Shutdown::Both);
}
