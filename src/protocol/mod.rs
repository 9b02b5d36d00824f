//! Line-oriented text protocol spoken by terminal clients.
//!
//! [`Command`] parses one input line; [`ClientHandler`] executes it against
//! the session registry for one connection.

pub mod command;
pub mod handler;

pub use command::{Command, CommandError, USAGE};
pub use handler::{ClientHandler, Reply};
