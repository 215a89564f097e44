//! # Core Value Types
//!
//! Plain `Copy` values shared by every engine component: colors, piece ranks,
//! pieces, squares, moves and game outcomes.
//!
//! ## Piece Identity
//!
//! A [`Piece`] is stored by value inside the board grid. Promotion mutates the
//! stored piece in place (`rank` goes from [`Rank::Man`] to [`Rank::King`]); a
//! piece is never re-created, and a king never reverts to a man.
//!
//! ## Squares
//!
//! [`Square`] holds raw `(row, col)` coordinates and may describe a square off
//! the board (for example one decoded from a network frame). Use
//! [`Square::is_on_board`] / [`Square::is_playable`] before trusting it;
//! [`Square::offset`] only ever yields on-board squares.

use std::fmt;

use crate::constants::BOARD_SIZE;

/// Side of a player.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// The other side.
    #[inline]
    pub const fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row delta of a forward step. White moves towards row 0, Black towards row 7.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// Row on which a man of this color is promoted.
    #[inline]
    pub const fn promotion_row(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => BOARD_SIZE - 1,
        }
    }

    /// Upper-case name, as used on the wire.
    pub const fn name(self) -> &'static str {
        match self {
            Color::White => "WHITE",
            Color::Black => "BLACK",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Rank of a piece.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rank {
    /// Moves one step forward, captures over an adjacent piece in any diagonal direction.
    Man,
    /// Slides and captures along open diagonals of any length.
    King,
}

/// A piece on the board.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub rank: Rank,
}

impl Piece {
    pub const fn man(color: Color) -> Self {
        Self {
            color,
            rank: Rank::Man,
        }
    }

    pub const fn king(color: Color) -> Self {
        Self {
            color,
            rank: Rank::King,
        }
    }

    #[inline]
    pub const fn is_king(&self) -> bool {
        matches!(self.rank, Rank::King)
    }

    /// Promote in place. Idempotent for kings.
    pub(crate) fn promote(&mut self) {
        self.rank = Rank::King;
    }
}

impl fmt::Display for Piece {
    /// Two-letter form: `WM`, `WK`, `BM`, `BK`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let color = match self.color {
            Color::White => 'W',
            Color::Black => 'B',
        };
        let rank = match self.rank {
            Rank::Man => 'M',
            Rank::King => 'K',
        };
        write!(f, "{}{}", color, rank)
    }
}

/// A board coordinate.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    pub row: u8,
    pub col: u8,
}

impl Square {
    #[inline]
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    #[inline]
    pub const fn is_on_board(self) -> bool {
        self.row < BOARD_SIZE && self.col < BOARD_SIZE
    }

    /// Dark squares, the only ones a piece may occupy.
    #[inline]
    pub const fn is_playable(self) -> bool {
        self.is_on_board() && (self.row + self.col) % 2 == 1
    }

    /// Square reached by moving `(row_delta, col_delta)`, if it is on the board.
    pub fn offset(self, row_delta: i8, col_delta: i8) -> Option<Square> {
        let row = i16::from(self.row) + i16::from(row_delta);
        let col = i16::from(self.col) + i16::from(col_delta);
        let size = i16::from(BOARD_SIZE);
        if (0..size).contains(&row) && (0..size).contains(&col) {
            Some(Square::new(row as u8, col as u8))
        } else {
            None
        }
    }

    /// Unit step and distance towards `to` when both lie on one diagonal.
    ///
    /// Returns `None` for non-diagonal targets and for `to == self`.
    pub fn diagonal_to(self, to: Square) -> Option<(i8, i8, u8)> {
        let row_diff = i16::from(to.row) - i16::from(self.row);
        let col_diff = i16::from(to.col) - i16::from(self.col);
        if row_diff == 0 || row_diff.abs() != col_diff.abs() {
            return None;
        }
        Some((
            row_diff.signum() as i8,
            col_diff.signum() as i8,
            row_diff.unsigned_abs() as u8,
        ))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// A candidate move produced by move generation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub is_jump: bool,
}

impl Move {
    pub const fn step(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            is_jump: false,
        }
    }

    pub const fn jump(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            is_jump: true,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = if self.is_jump { 'x' } else { '-' };
        write!(f, "{}{}{}", self.from, sep, self.to)
    }
}

/// Result of a finished game.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Winner(Color),
    /// Both sides lost their last piece in the same position.
    Draw,
}

impl Outcome {
    pub const fn winner(self) -> Option<Color> {
        match self {
            Outcome::Winner(color) => Some(color),
            Outcome::Draw => None,
        }
    }
}
