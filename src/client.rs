//! Terminal client for a running server.
//!
//! The client is a relay: input lines go to the server unchanged and
//! everything the server pushes is copied to the output by a reader thread,
//! so notices show up while the user is still typing.
//!
//! ```no_run
//! use std::io;
//! use rust_gomoku::client::GameClient;
//!
//! let client = GameClient::connect("127.0.0.1:8888", "ada")?;
//! client.run(io::stdin().lock(), io::stdout())?;
//! # Ok::<(), io::Error>(())
//! ```

use std::io::{self, BufRead, BufReader, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::thread;

use tracing::{debug, info, warn};

/// A connection to a game server.
#[derive(Debug)]
pub struct GameClient {
    stream: TcpStream,
}

impl GameClient {
    /// Connect and introduce ourselves as `name`.
    pub fn connect(addr: impl ToSocketAddrs, name: &str) -> io::Result<Self> {
        let mut stream = TcpStream::connect(addr)?;
        writeln!(stream, "nickname {name}")?;
        info!(peer = %stream.peer_addr()?, %name, "connected");
        Ok(Self { stream })
    }

    /// Relay `input` to the server and the server to `output`.
    ///
    /// Returns once the user types `exit` or `input` ends and the server has
    /// closed its side.
    pub fn run<R, W>(self, input: R, output: W) -> io::Result<()>
    where
        R: BufRead,
        W: Write + Send + 'static,
    {
        let reader_stream = self.stream.try_clone()?;
        let reader = thread::Builder::new()
            .name("gomoku-client-reader".to_string())
            .spawn(move || copy_lines(reader_stream, output))?;

        let mut stream = self.stream;
        let mut result = Ok(());
        for line in input.lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    result = Err(err);
                    break;
                }
            };
            let command = line.trim();
            if command.is_empty() {
                continue;
            }
            if let Err(err) = writeln!(stream, "{command}") {
                warn!(%err, "server closed the connection");
                break;
            }
            if command.eq_ignore_ascii_case("exit") {
                break;
            }
        }

        // The server treats end of input as a leave and then closes.
        if let Err(err) = stream.shutdown(Shutdown::Write) {
            debug!(%err, "half-close failed");
        }
        match reader.join() {
            Ok(relayed) => result.and(relayed),
            Err(_) => Err(io::Error::other("reader thread panicked")),
        }
    }
}

fn copy_lines<W: Write>(stream: TcpStream, mut output: W) -> io::Result<()> {
    for line in BufReader::new(stream).lines() {
        writeln!(output, "{}", line?)?;
        output.flush()?;
    }
    debug!("server closed");
    Ok(())
}
