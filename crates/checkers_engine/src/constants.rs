//! Board geometry constants

/// Side length of the board.
pub const BOARD_SIZE: u8 = 8;

/// Pieces each side starts with.
pub const PIECES_PER_SIDE: u8 = 12;

/// Rows (from each side's back rank) filled with men at the start.
pub const STARTING_ROWS: u8 = 3;

/// The four diagonal unit steps as `(row_delta, col_delta)`.
pub const DIAGONALS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Column deltas of a man's forward step.
pub const MAN_STEP_COLS: [i8; 2] = [-1, 1];

/// Distance covered by a man's capture (over the adjacent piece).
pub const MAN_JUMP_DISTANCE: u8 = 2;
