//! King move generation
//!
//! Kings slide along open diagonals of any length and capture at long range.
//!
//! ## Long-Capture Ray Scan
//!
//! For each diagonal direction:
//! 1. Scan outward to the first occupied square. None before the edge means
//!    no capture that way.
//! 2. A friendly piece there blocks the direction.
//! 3. An opponent piece there can be captured; every empty square further along
//!    the ray, up to the next piece or the edge, is a separate landing square.

use crate::board::BoardState;
use crate::constants::DIAGONALS;
use crate::types::{Move, Piece, Square};

use super::captured_square;

/// Empty squares from `from` (exclusive) along `(dr, dc)` up to the first
/// occupied square, plus that occupied square if any.
fn ray(board: &BoardState, from: Square, dr: i8, dc: i8) -> (Vec<Square>, Option<Square>) {
    let mut empty = Vec::new();
    let mut current = from;
    while let Some(next) = current.offset(dr, dc) {
        if board.piece_at(next).is_some() {
            return (empty, Some(next));
        }
        empty.push(next);
        current = next;
    }
    (empty, None)
}

/// Landing squares behind the first opponent piece in one direction.
fn landings(board: &BoardState, from: Square, piece: Piece, dr: i8, dc: i8) -> Vec<Square> {
    let (_, blocker) = ray(board, from, dr, dc);
    match blocker {
        Some(victim) if board.piece_at(victim).is_some_and(|p| p.color != piece.color) => {
            let (beyond, _) = ray(board, victim, dr, dc);
            debug_assert!(beyond
                .iter()
                .all(|&to| captured_square(board, piece, from, to) == Some(victim)));
            beyond
        }
        _ => Vec::new(),
    }
}

pub(super) fn push_captures(board: &BoardState, from: Square, piece: Piece, moves: &mut Vec<Move>) {
    for (dr, dc) in DIAGONALS {
        moves.extend(
            landings(board, from, piece, dr, dc)
                .into_iter()
                .map(|to| Move::jump(from, to)),
        );
    }
}

pub(super) fn has_capture(board: &BoardState, from: Square, piece: Piece) -> bool {
    DIAGONALS
        .into_iter()
        .any(|(dr, dc)| !landings(board, from, piece, dr, dc).is_empty())
}

pub(super) fn push_slides(board: &BoardState, from: Square, moves: &mut Vec<Move>) {
    for (dr, dc) in DIAGONALS {
        let (empty, _) = ray(board, from, dr, dc);
        moves.extend(empty.into_iter().map(|to| Move::step(from, to)));
    }
}

/// Diagonal move with every interior square empty.
pub(super) fn is_slide(board: &BoardState, from: Square, to: Square) -> bool {
    let Some((dr, dc, distance)) = from.diagonal_to(to) else {
        return false;
    };
    let mut current = from;
    for _ in 1..distance {
        match current.offset(dr, dc) {
            Some(next) if board.piece_at(next).is_none() => current = next,
            _ => return false,
        }
    }
    true
}
