//! Canonical rule constants.
//!
//! Starting snapshot, coral accounting and the draw/win thresholds checked by
//! the terminal-state detector.

/// Starting position in the compact snapshot format.
pub const STARTING_POSITION_SNAPSHOT: &str =
    "topdhpot/cccccccc/8/8/8/8/CCCCCCCC/TOPDHPOT w 0 1 - - 17/17 e1,e8 -";

/// Coral markers each color owns. Markers on the board plus markers remaining
/// always add up to this number.
pub const STARTING_CORAL: u8 = 17;

/// Markers on the board that win the game for their owner.
pub const CORAL_VICTORY_THRESHOLD: u32 = 12;

/// Reversible plies (no capture, crab move or coral change) before a draw.
pub const REVERSIBLE_MOVE_LIMIT: u16 = 100;

/// Occurrences of one position that draw the game.
pub const REPETITION_LIMIT: usize = 3;
