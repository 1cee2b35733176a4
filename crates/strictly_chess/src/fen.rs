//! FEN codec: converts between notation strings and positions.
//!
//! Only the placement, side-to-move, halfmove and fullmove fields carry
//! meaning. Castling and en-passant fields are accepted on input and always
//! written back as `-`.

use crate::types::{Board, Color, Piece, Rank, BOARD_SIZE};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use tracing::instrument;

/// Notation of the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1";

/// Maximum number of whitespace-separated fields.
const FIELD_COUNT: usize = 6;

/// Error decoding a notation string.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum FenError {
    /// Notation contains no fields at all.
    #[display("Notation is empty")]
    Empty,

    /// More than six fields.
    #[display("Notation has {} fields, expected at most 6", _0)]
    TooManyFields(usize),

    /// Placement does not have exactly eight ranks.
    #[display("Placement has {} ranks, expected 8", _0)]
    RankCount(usize),

    /// A rank covers more or fewer than eight files.
    #[display("Rank {} covers {} files, expected 8", rank, files)]
    RankWidth {
        /// Rank index, 0 = top.
        rank: usize,
        /// Files covered by the rank's symbols.
        files: usize,
    },

    /// Character is neither a piece letter nor a digit 1-8.
    #[display("Invalid placement symbol '{}'", _0)]
    InvalidSymbol(char),

    /// Side-to-move field is not `w` or `b`.
    #[display("Invalid side to move '{}'", _0)]
    InvalidSide(String),

    /// A move counter is not a valid number.
    #[display("Invalid {} '{}'", field, value)]
    InvalidCounter {
        /// Which counter.
        field: &'static str,
        /// The offending text.
        value: String,
    },
}

impl std::error::Error for FenError {}

/// A decoded position: board plus side to move and move counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PositionFields")]
pub struct Position {
    board: Board,
    side_to_move: Color,
    halfmove_clock: u32,
    fullmove_number: u32,
}

impl Position {
    /// Creates a position from its parts.
    ///
    /// A fullmove number of 0 is raised to 1.
    pub fn new(board: Board, side_to_move: Color, halfmove_clock: u32, fullmove_number: u32) -> Self {
        Self {
            board,
            side_to_move,
            halfmove_clock,
            fullmove_number: fullmove_number.max(1),
        }
    }

    /// The standard starting position.
    pub fn starting() -> Self {
        Self::new(Board::starting(), Color::White, 0, 1)
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the board for in-crate mutation.
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Returns the side to move.
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Returns the halfmove clock.
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    /// Returns the fullmove number (starts at 1).
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Fullmove number after the side to move has moved.
    ///
    /// `None` if counting black's move would overflow the counter.
    pub fn next_fullmove_number(&self) -> Option<u32> {
        match self.side_to_move {
            Color::White => Some(self.fullmove_number),
            Color::Black => self.fullmove_number.checked_add(1),
        }
    }

    /// Hands the move to the other side, counting a full move after black.
    ///
    /// Leaves the position untouched and returns `None` on counter overflow.
    pub(crate) fn pass_turn(&mut self) -> Option<()> {
        self.fullmove_number = self.next_fullmove_number()?;
        self.side_to_move = self.side_to_move.opponent();
        Some(())
    }

    /// Encodes this position.
    pub fn to_fen(&self) -> String {
        encode(
            &self.board,
            self.side_to_move,
            self.halfmove_clock,
            self.fullmove_number,
        )
    }
}

/// Wire shape of [`Position`], validated on the way in.
#[derive(Deserialize)]
struct PositionFields {
    board: Board,
    side_to_move: Color,
    halfmove_clock: u32,
    fullmove_number: u32,
}

impl TryFrom<PositionFields> for Position {
    type Error = FenError;

    fn try_from(fields: PositionFields) -> Result<Self, Self::Error> {
        if fields.fullmove_number == 0 {
            return Err(FenError::InvalidCounter {
                field: "fullmove number",
                value: "0".to_string(),
            });
        }
        Ok(Self::new(
            fields.board,
            fields.side_to_move,
            fields.halfmove_clock,
            fields.fullmove_number,
        ))
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::starting()
    }
}

impl std::str::FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_fen())
    }
}

/// Decodes a notation string.
///
/// Validation is strict: the placement must have exactly eight ranks of
/// exactly eight files each. Missing side, halfmove and fullmove fields
/// default to `w`, `0` and `1`.
///
/// # Errors
///
/// Returns a [`FenError`] describing the first malformed field.
#[instrument]
pub fn decode(notation: &str) -> Result<Position, FenError> {
    let fields: Vec<&str> = notation.split_whitespace().collect();
    let Some(placement) = fields.first() else {
        return Err(FenError::Empty);
    };
    if fields.len() > FIELD_COUNT {
        return Err(FenError::TooManyFields(fields.len()));
    }

    let board = decode_placement(placement)?;

    let side_to_move = match fields.get(1) {
        Some(field) => {
            Color::from_fen_field(field).ok_or_else(|| FenError::InvalidSide(field.to_string()))?
        }
        None => Color::White,
    };
    let halfmove_clock = parse_counter(fields.get(4), "halfmove clock", 0)?;
    let fullmove_number = parse_counter(fields.get(5), "fullmove number", 1)?;
    if fullmove_number == 0 {
        return Err(FenError::InvalidCounter {
            field: "fullmove number",
            value: "0".to_string(),
        });
    }

    Ok(Position {
        board,
        side_to_move,
        halfmove_clock,
        fullmove_number,
    })
}

/// Encodes a board, side to move and counters as notation.
pub fn encode(board: &Board, side_to_move: Color, halfmove_clock: u32, fullmove_number: u32) -> String {
    let placement = board
        .ranks()
        .iter()
        .map(encode_rank)
        .collect::<Vec<_>>()
        .join("/");

    format!(
        "{} {} - - {} {}",
        placement,
        side_to_move.to_fen_char(),
        halfmove_clock,
        fullmove_number
    )
}

fn decode_placement(placement: &str) -> Result<Board, FenError> {
    let rank_strs: Vec<&str> = placement.split('/').collect();
    if rank_strs.len() != BOARD_SIZE {
        return Err(FenError::RankCount(rank_strs.len()));
    }

    let mut ranks: [Rank; BOARD_SIZE] = [[None; BOARD_SIZE]; BOARD_SIZE];
    for (index, rank_str) in rank_strs.iter().enumerate() {
        ranks[index] = decode_rank(index, rank_str)?;
    }
    Ok(Board::from_ranks(ranks))
}

fn decode_rank(index: usize, rank_str: &str) -> Result<Rank, FenError> {
    let mut rank: Rank = [None; BOARD_SIZE];
    let mut files = 0;

    for symbol in rank_str.chars() {
        let width = match symbol.to_digit(10) {
            Some(run @ 1..=8) => run as usize,
            Some(_) => return Err(FenError::InvalidSymbol(symbol)),
            None => {
                let piece = Piece::from_fen_char(symbol).ok_or(FenError::InvalidSymbol(symbol))?;
                if let Some(cell) = rank.get_mut(files) {
                    *cell = Some(piece);
                }
                1
            }
        };
        files += width;
        if files > BOARD_SIZE {
            return Err(FenError::RankWidth { rank: index, files });
        }
    }

    if files != BOARD_SIZE {
        return Err(FenError::RankWidth { rank: index, files });
    }
    Ok(rank)
}

fn encode_rank(rank: &Rank) -> String {
    let mut out = String::with_capacity(BOARD_SIZE);
    let mut empty = 0;

    for cell in rank {
        match cell {
            Some(piece) => {
                if empty > 0 {
                    let _ = write!(out, "{}", empty);
                    empty = 0;
                }
                out.push(piece.to_fen_char());
            }
            None => empty += 1,
        }
    }
    if empty > 0 {
        let _ = write!(out, "{}", empty);
    }
    out
}

fn parse_counter(field: Option<&&str>, name: &'static str, default: u32) -> Result<u32, FenError> {
    match field {
        Some(text) => text.parse().map_err(|_| FenError::InvalidCounter {
            field: name,
            value: text.to_string(),
        }),
        None => Ok(default),
    }
}
