#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Chess rules for the Quest Arcade chess mini-game.
//!
//! Boards are immutable values: applying a move yields a new board and leaves
//! the original untouched. Row 0 is black's home rank and row 7 is white's.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

mod game;
mod rules;

pub use game::{ChessMatch, ChessStatus};
pub use rules::{
    apply_move, is_king_in_check, legal_moves, legal_moves_from, validate_move, MoveOutcome,
};

/// Side of the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    /// Moves first, starts on rows 6 and 7.
    White,
    /// Starts on rows 0 and 1.
    Black,
}

impl Color {
    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row delta of a single pawn step.
    #[must_use]
    pub const fn pawn_direction(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// Row pawns start on and may double-step from.
    #[must_use]
    pub const fn pawn_row(self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    /// Row on which pawns promote.
    #[must_use]
    pub const fn promotion_row(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    const fn back_row(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }
}

/// Kind of chess piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PieceKind {
    /// Pawn.
    Pawn,
    /// Knight.
    Knight,
    /// Bishop.
    Bishop,
    /// Rook.
    Rook,
    /// Queen.
    Queen,
    /// King.
    King,
}

impl PieceKind {
    /// Relative material value used when ranking captures.
    #[must_use]
    pub const fn value(self) -> u32 {
        match self {
            PieceKind::Pawn => 1,
            PieceKind::Knight | PieceKind::Bishop => 3,
            PieceKind::Rook => 5,
            PieceKind::Queen => 9,
            PieceKind::King => 100,
        }
    }

    const fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }
}

/// A piece standing on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    /// What the piece is.
    pub kind: PieceKind,
    /// Who owns it.
    pub color: Color,
}

impl Piece {
    /// Creates a piece.
    #[must_use]
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Self { kind, color }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = self.kind.letter();
        match self.color {
            Color::White => write!(f, "{}", letter.to_ascii_uppercase()),
            Color::Black => write!(f, "{letter}"),
        }
    }
}

/// In-bounds board coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    /// Creates a square, returning `None` when either coordinate is off the board.
    #[must_use]
    pub const fn new(row: u8, col: u8) -> Option<Self> {
        if row < 8 && col < 8 {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// Row index, 0 at black's home rank.
    #[must_use]
    pub const fn row(self) -> u8 {
        self.row
    }

    /// Column index, 0 at the a-file.
    #[must_use]
    pub const fn col(self) -> u8 {
        self.col
    }

    /// Every square in row-major order.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64u8).map(|index| Square {
            row: index / 8,
            col: index % 8,
        })
    }

    /// Moves by the signed offset, returning `None` when leaving the board.
    #[must_use]
    pub fn offset(self, rows: i8, cols: i8) -> Option<Square> {
        let row = i16::from(self.row) + i16::from(rows);
        let col = i16::from(self.col) + i16::from(cols);
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Square::new(row as u8, col as u8)
        } else {
            None
        }
    }

    const fn index(self) -> usize {
        self.row as usize * 8 + self.col as usize
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = char::from(b'a' + self.col);
        let rank = char::from(b'8' - self.row);
        write!(f, "{file}{rank}")
    }
}

impl FromStr for Square {
    type Err = ChessError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let bytes = value.trim().as_bytes();
        let [file, rank] = bytes else {
            return Err(ChessError::InvalidNotation(value.to_owned()));
        };
        if !(b'a'..=b'h').contains(file) || !(b'1'..=b'8').contains(rank) {
            return Err(ChessError::InvalidNotation(value.to_owned()));
        }
        Square::new(b'8' - rank, file - b'a').ok_or_else(|| ChessError::InvalidNotation(value.to_owned()))
    }
}

/// Relocation of a piece from one square to another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChessMove {
    /// Square the piece leaves.
    pub from: Square,
    /// Square the piece lands on.
    pub to: Square,
}

impl ChessMove {
    /// Creates a move.
    #[must_use]
    pub const fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for ChessMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

impl FromStr for ChessMove {
    type Err = ChessError;

    /// Parses coordinate notation such as `e2e4`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.len() != 4 || !trimmed.is_ascii() {
            return Err(ChessError::InvalidNotation(value.to_owned()));
        }
        let (from, to) = trimmed.split_at(2);
        Ok(Self {
            from: from.parse()?,
            to: to.parse()?,
        })
    }
}

/// Errors raised by chess operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ChessError {
    /// The origin square holds no piece.
    #[error("no piece on {0}")]
    EmptySquare(Square),
    /// The move breaks the movement rules of the piece.
    #[error("{0} is not a valid move")]
    InvalidMove(ChessMove),
    /// The other side is to move.
    #[error("it is not your turn")]
    NotYourTurn,
    /// The piece on the origin square belongs to the opponent.
    #[error("the piece on {0} belongs to the opponent")]
    WrongColor(Square),
    /// The match has already been decided.
    #[error("the game is over")]
    GameOver,
    /// Text could not be parsed as a square or move.
    #[error("could not parse `{0}`")]
    InvalidNotation(String),
}

/// Immutable 8x8 chess board.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Option<Piece>; 64],
}

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

impl Board {
    /// Board with no pieces.
    #[must_use]
    pub const fn empty() -> Self {
        Self { cells: [None; 64] }
    }

    /// Standard starting position.
    #[must_use]
    pub fn initial() -> Self {
        let mut board = Self::empty();
        for color in [Color::White, Color::Black] {
            for (col, kind) in BACK_RANK.into_iter().enumerate() {
                let col = col as u8;
                board.cells[usize::from(color.back_row()) * 8 + usize::from(col)] =
                    Some(Piece::new(kind, color));
                board.cells[usize::from(color.pawn_row()) * 8 + usize::from(col)] =
                    Some(Piece::new(PieceKind::Pawn, color));
            }
        }
        board
    }

    /// Returns a copy of the board with `piece` placed on `square`.
    #[must_use]
    pub fn with_piece(mut self, square: Square, piece: Piece) -> Self {
        self.cells[square.index()] = Some(piece);
        self
    }

    /// Returns a copy of the board with `square` emptied.
    #[must_use]
    pub fn without_piece(mut self, square: Square) -> Self {
        self.cells[square.index()] = None;
        self
    }

    /// Piece standing on `square`, if any.
    #[must_use]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.cells[square.index()]
    }

    /// Square of the first king of `color` in row-major order.
    #[must_use]
    pub fn find_king(&self, color: Color) -> Option<Square> {
        self.pieces(color)
            .find(|(_, piece)| piece.kind == PieceKind::King)
            .map(|(square, _)| square)
    }

    /// Pieces of `color` in row-major order.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |square| {
            self.piece_at(square)
                .filter(|piece| piece.color == color)
                .map(|piece| (square, piece))
        })
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..8u8 {
            write!(f, "{} ", 8 - row)?;
            for col in 0..8u8 {
                let cell = Square::new(row, col).and_then(|square| self.piece_at(square));
                match cell {
                    Some(piece) => write!(f, "{piece}")?,
                    None => write!(f, ".")?,
                }
            }
            writeln!(f)?;
        }
        write!(f, "  abcdefgh")
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board")?;
        fmt::Display::fmt(self, f)
    }
}
