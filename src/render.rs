//! Text rendering of boards and notices for terminal clients.

use std::fmt::Write as _;

use crate::core::{Board, Coord, Stone, BOARD_SIZE};
use crate::notation::CoordScheme;
use crate::session::Notice;

const BLACK: char = '●';
const WHITE: char = '○';
const EMPTY: char = '┼';
const RULE: char = '─';

const LAST_MOVE: &str = "\x1b[41m";
const RESET: &str = "\x1b[0m";

/// Output style.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Style {
    /// No escape codes.
    #[default]
    Plain,
    /// ANSI colours; the last move is highlighted.
    Ansi,
}

impl Style {
    #[must_use]
    pub fn from_color(color: bool) -> Self {
        if color {
            Self::Ansi
        } else {
            Self::Plain
        }
    }
}

/// The board as text, row 15 at the top, columns `A`–`O` in the header.
///
/// ```
/// use rust_gomoku::core::{Board, Coord, Stone};
/// use rust_gomoku::render::{board_text, Style};
///
/// let mut board = Board::new();
/// board.apply_move(Coord::new(0, 0), Stone::Black);
/// let text = board_text(&board, Style::Plain);
/// assert!(text.lines().last().unwrap().starts_with(" 1 ●─┼"));
/// ```
#[must_use]
pub fn board_text(board: &Board, style: Style) -> String {
    let mut out = String::from("   ");
    for x in 0..BOARD_SIZE as u8 {
        out.push((b'A' + x) as char);
        out.push(' ');
    }
    out.truncate(out.trim_end().len());
    out.push('\n');

    for y in (0..BOARD_SIZE as u8).rev() {
        let _ = write!(out, "{:>2} ", y + 1);
        for x in 0..BOARD_SIZE as u8 {
            if x > 0 {
                out.push(RULE);
            }
            let coord = Coord::new(x, y);
            let glyph = match board.get(coord) {
                Some(Stone::Black) => BLACK,
                Some(Stone::White) => WHITE,
                None => EMPTY,
            };
            if style == Style::Ansi && board.last_move() == Some(coord) {
                let _ = write!(out, "{LAST_MOVE}{glyph}{RESET}");
            } else {
                out.push(glyph);
            }
        }
        if y > 0 {
            out.push('\n');
        }
    }
    out
}

/// One-line description of a notice, followed by the board when it carries
/// one.
#[must_use]
pub fn notice_text(notice: &Notice, scheme: CoordScheme, style: Style) -> String {
    match notice {
        Notice::OpponentJoined { name } => format!("{name} joined the room"),
        Notice::OpponentReady { name } => format!("{name} is ready"),
        Notice::GameStarted { your_stone } => format!("game started, you play {your_stone}"),
        Notice::MovePlayed {
            coord,
            stone,
            winner,
            board,
        } => {
            let head = match winner {
                Some(w) => format!("{stone} played {}; {w} wins", scheme.format(*coord)),
                None => format!("{stone} played {}; your turn", scheme.format(*coord)),
            };
            format!("{head}\n{}", board_text(board, style))
        }
        Notice::OpponentLeft { name, game_aborted: true } => {
            format!("{name} left; the game was aborted")
        }
        Notice::OpponentLeft { name, .. } => format!("{name} left the room"),
        Notice::RematchRequested { name } => format!("{name} wants a rematch; type `again`"),
        Notice::RematchStarted { your_stone } => format!("rematch started, you play {your_stone}"),
        Notice::Info(text) => text.clone(),
    }
}
