//! Text board rendering
//!
//! Row 0 is printed at the top, so White (starting on rows 5-7) plays up the
//! screen. Columns are labelled along the top and rows down the left edge,
//! matching the `col,row` order moves are typed in.

use std::fmt::Write;

use checkers_engine::constants::BOARD_SIZE;
use checkers_engine::{Color, Game, Piece, Rank, Square};

/// Single-character glyph: `w`/`b` for men, `W`/`B` for kings.
pub fn piece_glyph(piece: Piece) -> char {
    match (piece.color, piece.rank) {
        (Color::White, Rank::Man) => 'w',
        (Color::White, Rank::King) => 'W',
        (Color::Black, Rank::Man) => 'b',
        (Color::Black, Rank::King) => 'B',
    }
}

/// `col,row`, the order used by the move syntax and the wire protocol.
pub fn square_label(square: Square) -> String {
    format!("{},{}", square.col, square.row)
}

pub fn render_board(game: &Game) -> String {
    let mut out = String::from("   ");
    for col in 0..BOARD_SIZE {
        let _ = write!(out, " {col}");
    }
    out.push('\n');

    for row in 0..BOARD_SIZE {
        let _ = write!(out, " {row} ");
        for col in 0..BOARD_SIZE {
            let square = Square::new(row, col);
            let glyph = match game.piece_at(square) {
                Some(piece) => piece_glyph(piece),
                None if square.is_playable() => '.',
                None => ' ',
            };
            out.push(' ');
            out.push(glyph);
        }
        out.push('\n');
    }

    let (white, black) = game.piece_counts();
    let _ = write!(
        out,
        "White: {white}  Black: {black}  To move: {}",
        game.current_player()
    );
    if let Some(square) = game.chain_square() {
        let _ = write!(out, " (continue capturing from {})", square_label(square));
    }
    out.push('\n');
    out
}
