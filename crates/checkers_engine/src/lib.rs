//! # Checkers Engine
//!
//! Rules engine for 8×8 diagonal-capture checkers (men and long-range kings).
//!
//! The engine owns all mutable game state privately inside [`Game`]. The
//! internal components are plain modules operating on borrowed state:
//!
//! - [`board`] - piece placement and live piece counts
//! - [`turn`] - whose turn it is and whether a capture chain is in progress
//! - [`move_gen`] - capture geometry, mandatory-capture policy, move validation
//! - [`executor`] - applies a validated move (capture removal, promotion, turn hand-over)
//! - [`status`] - winner derivation
//! - [`api`] - the [`Game`] facade used by both local play and the server
//!
//! ## Coordinates
//!
//! Squares are `(row, col)` with `row, col ∈ [0, 8)`. Only squares where
//! `row + col` is odd are playable. White starts on rows 5-7 and moves towards
//! row 0, Black starts on rows 0-2 and moves towards row 7. White moves first.
//!
//! ```rust
//! use checkers_engine::{Color, Game, Square};
//!
//! let mut game = Game::new();
//! assert_eq!(game.current_player(), Color::White);
//! assert_eq!(game.legal_moves(Color::White).len(), 7);
//!
//! let report = game.submit_move(Square::new(5, 0), Square::new(4, 1)).unwrap();
//! assert!(!report.chain_continues);
//! assert_eq!(game.current_player(), Color::Black);
//! ```

pub mod api;
pub mod board;
pub mod constants;
pub mod error;
pub mod executor;
pub mod move_gen;
pub mod status;
pub mod turn;
pub mod types;


pub use api::Game;
pub use error::{MoveError, PositionError};
pub use executor::MoveReport;
pub use types::{Color, Move, Outcome, Piece, Rank, Square};
