//! Core domain types for the chess board.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::instrument;

/// Number of ranks and files on the board.
pub const BOARD_SIZE: usize = 8;

/// Side in the game.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
pub enum Color {
    /// White (uppercase letters, moves first).
    White,
    /// Black (lowercase letters).
    Black,
}

impl Color {
    /// Returns the opposing side.
    pub fn opponent(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Side-to-move letter used in notation (`w` or `b`).
    pub fn to_fen_char(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    /// Parses the side-to-move field.
    pub fn from_fen_field(field: &str) -> Option<Self> {
        match field {
            "w" => Some(Color::White),
            "b" => Some(Color::Black),
            _ => None,
        }
    }
}

/// Kind of chess piece, independent of color.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
pub enum PieceKind {
    /// King (`K`).
    King,
    /// Queen (`Q`).
    Queen,
    /// Rook (`R`).
    Rook,
    /// Bishop (`B`).
    Bishop,
    /// Knight (`N`).
    Knight,
    /// Pawn (`P`).
    Pawn,
}

impl PieceKind {
    /// Uppercase notation letter.
    pub fn letter(self) -> char {
        match self {
            PieceKind::King => 'K',
            PieceKind::Queen => 'Q',
            PieceKind::Rook => 'R',
            PieceKind::Bishop => 'B',
            PieceKind::Knight => 'N',
            PieceKind::Pawn => 'P',
        }
    }

    /// Looks up a kind by letter, ignoring case.
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'K' => Some(PieceKind::King),
            'Q' => Some(PieceKind::Queen),
            'R' => Some(PieceKind::Rook),
            'B' => Some(PieceKind::Bishop),
            'N' => Some(PieceKind::Knight),
            'P' => Some(PieceKind::Pawn),
            _ => None,
        }
    }
}

/// A colored piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    /// Owner of the piece.
    pub color: Color,
    /// What the piece is.
    pub kind: PieceKind,
}

impl Piece {
    /// Creates a piece.
    pub fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    /// Parses a notation symbol; case selects the color.
    pub fn from_fen_char(symbol: char) -> Option<Self> {
        let kind = PieceKind::from_letter(symbol)?;
        let color = if symbol.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Self { color, kind })
    }

    /// Notation symbol for this piece.
    pub fn to_fen_char(self) -> char {
        match self.color {
            Color::White => self.kind.letter(),
            Color::Black => self.kind.letter().to_ascii_lowercase(),
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen_char())
    }
}

/// Error building a [`Square`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum SquareError {
    /// Rank or file index is outside 0..=7.
    #[display("Square ({}, {}) is off the board", rank, file)]
    OutOfRange {
        /// Requested rank index.
        rank: usize,
        /// Requested file index.
        file: usize,
    },

    /// Text is not a square name such as `e4`.
    #[display("'{}' is not a square name", _0)]
    BadName(String),
}

impl std::error::Error for SquareError {}

/// A board coordinate.
///
/// Rank 0 is the top row of the notation (the 8th rank), file 0 is the
/// a-file. Construction is range-checked, so every `Square` is on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "(usize, usize)", into = "(usize, usize)")]
pub struct Square {
    rank: u8,
    file: u8,
}

impl Square {
    /// Creates a square from (rank, file) indices.
    #[instrument]
    pub fn new(rank: usize, file: usize) -> Result<Self, SquareError> {
        if rank >= BOARD_SIZE || file >= BOARD_SIZE {
            return Err(SquareError::OutOfRange { rank, file });
        }
        Ok(Self {
            rank: rank as u8,
            file: file as u8,
        })
    }

    /// Parses an algebraic name (`a8` is rank 0, file 0).
    #[instrument]
    pub fn from_algebraic(name: &str) -> Result<Self, SquareError> {
        let bad = || SquareError::BadName(name.to_string());
        let mut chars = name.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(bad());
        };
        if !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
            return Err(bad());
        }
        let file = file as usize - 'a' as usize;
        let rank = BOARD_SIZE - (rank as usize - '0' as usize);
        Self::new(rank, file)
    }

    /// Rank index (0 = top row).
    pub fn rank(self) -> usize {
        self.rank as usize
    }

    /// File index (0 = a-file).
    pub fn file(self) -> usize {
        self.file as usize
    }

    /// All 64 squares, top row first.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..BOARD_SIZE).flat_map(|rank| {
            (0..BOARD_SIZE).map(move |file| Square {
                rank: rank as u8,
                file: file as u8,
            })
        })
    }
}

impl TryFrom<(usize, usize)> for Square {
    type Error = SquareError;

    fn try_from((rank, file): (usize, usize)) -> Result<Self, Self::Error> {
        Self::new(rank, file)
    }
}

impl From<Square> for (usize, usize) {
    fn from(square: Square) -> Self {
        (square.rank(), square.file())
    }
}

impl std::str::FromStr for Square {
    type Err = SquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_algebraic(s)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.file) as char;
        write!(f, "{}{}", file, BOARD_SIZE - self.rank())
    }
}

/// One row of the board, a-file first.
pub type Rank = [Option<Piece>; BOARD_SIZE];

/// 8x8 chess board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Rows top to bottom.
    ranks: [Rank; BOARD_SIZE],
}

impl Board {
    /// Creates a board with no pieces.
    pub fn empty() -> Self {
        Self {
            ranks: [[None; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// Creates the standard starting arrangement.
    pub fn starting() -> Self {
        const BACK_RANK: [PieceKind; BOARD_SIZE] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let mut board = Self::empty();
        for (file, kind) in BACK_RANK.into_iter().enumerate() {
            board.ranks[0][file] = Some(Piece::new(Color::Black, kind));
            board.ranks[1][file] = Some(Piece::new(Color::Black, PieceKind::Pawn));
            board.ranks[6][file] = Some(Piece::new(Color::White, PieceKind::Pawn));
            board.ranks[7][file] = Some(Piece::new(Color::White, kind));
        }
        board
    }

    /// Builds a board from rows, top to bottom.
    pub fn from_ranks(ranks: [Rank; BOARD_SIZE]) -> Self {
        Self { ranks }
    }

    /// Gets the piece on a square.
    pub fn get(&self, square: Square) -> Option<Piece> {
        self.ranks[square.rank()][square.file()]
    }

    /// Puts a piece on (or clears) a square, returning what was there.
    pub fn set(&mut self, square: Square, piece: Option<Piece>) -> Option<Piece> {
        std::mem::replace(&mut self.ranks[square.rank()][square.file()], piece)
    }

    /// Checks if a square is empty.
    pub fn is_empty(&self, square: Square) -> bool {
        self.get(square).is_none()
    }

    /// Rows top to bottom.
    pub fn ranks(&self) -> &[Rank; BOARD_SIZE] {
        &self.ranks
    }

    /// Number of occupied squares.
    pub fn piece_count(&self) -> usize {
        self.ranks.iter().flatten().filter(|cell| cell.is_some()).count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

/// Plain-text diagram: rank labels on the left, file letters underneath.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, rank) in self.ranks.iter().enumerate() {
            let row: String = rank
                .iter()
                .map(|cell| cell.map_or('.', Piece::to_fen_char))
                .collect();
            writeln!(f, "{} {}", BOARD_SIZE - index, row)?;
        }
        write!(f, "\n  a b c d e f g h")
    }
}
