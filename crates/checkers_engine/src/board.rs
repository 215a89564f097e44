//! Board state
//!
//! Fixed 8×8 grid of optional pieces plus live piece counts per color.
//! Counts are only incremented when a piece is placed during setup and only
//! decremented when a piece is captured, so they always equal the number of
//! pieces of each color actually on the board.

use crate::constants::{BOARD_SIZE, STARTING_ROWS};
use crate::types::{Color, Piece, Square};

const SIZE: usize = BOARD_SIZE as usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    grid: [[Option<Piece>; SIZE]; SIZE],
    white_count: u8,
    black_count: u8,
}

impl Default for BoardState {
    fn default() -> Self {
        Self::empty()
    }
}

impl BoardState {
    /// Board with no pieces.
    pub const fn empty() -> Self {
        Self {
            grid: [[None; SIZE]; SIZE],
            white_count: 0,
            black_count: 0,
        }
    }

    /// Standard starting position: Black men on the dark squares of rows 0-2,
    /// White men on the dark squares of rows 5-7.
    pub fn initial() -> Self {
        let mut board = Self::empty();
        for row in 0..BOARD_SIZE {
            let color = if row < STARTING_ROWS {
                Color::Black
            } else if row >= BOARD_SIZE - STARTING_ROWS {
                Color::White
            } else {
                continue;
            };
            for col in 0..BOARD_SIZE {
                let square = Square::new(row, col);
                if square.is_playable() {
                    board.place(square, Piece::man(color));
                }
            }
        }
        board
    }

    /// Piece on `square`, `None` if empty or off the board.
    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        if !square.is_on_board() {
            return None;
        }
        self.grid[square.row as usize][square.col as usize]
    }

    /// On the board and unoccupied.
    #[inline]
    pub fn is_empty(&self, square: Square) -> bool {
        square.is_on_board() && self.piece_at(square).is_none()
    }

    /// Live piece count for `color`.
    pub fn count(&self, color: Color) -> u8 {
        match color {
            Color::White => self.white_count,
            Color::Black => self.black_count,
        }
    }

    /// Every occupied square holding a piece of `color`, row by row.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        (0..BOARD_SIZE)
            .flat_map(|row| (0..BOARD_SIZE).map(move |col| Square::new(row, col)))
            .filter_map(move |square| {
                self.piece_at(square)
                    .filter(|piece| piece.color == color)
                    .map(|piece| (square, piece))
            })
    }

    /// Setup-only placement. Caller guarantees `square` is playable and empty.
    pub(crate) fn place(&mut self, square: Square, piece: Piece) {
        debug_assert!(square.is_playable(), "placing on unplayable {square}");
        debug_assert!(self.piece_at(square).is_none(), "placing on occupied {square}");
        self.grid[square.row as usize][square.col as usize] = Some(piece);
        match piece.color {
            Color::White => self.white_count += 1,
            Color::Black => self.black_count += 1,
        }
    }

    /// Move the piece on `from` to `to`, returning it.
    pub(crate) fn relocate(&mut self, from: Square, to: Square) -> Option<Piece> {
        let piece = self.grid[from.row as usize][from.col as usize].take()?;
        self.grid[to.row as usize][to.col as usize] = Some(piece);
        Some(piece)
    }

    /// Remove a captured piece and decrement its color's counter.
    pub(crate) fn remove_captured(&mut self, square: Square) -> Option<Piece> {
        if !square.is_on_board() {
            return None;
        }
        let piece = self.grid[square.row as usize][square.col as usize].take()?;
        match piece.color {
            Color::White => self.white_count -= 1,
            Color::Black => self.black_count -= 1,
        }
        Some(piece)
    }

    pub(crate) fn piece_mut(&mut self, square: Square) -> Option<&mut Piece> {
        if !square.is_on_board() {
            return None;
        }
        self.grid[square.row as usize][square.col as usize].as_mut()
    }
}
