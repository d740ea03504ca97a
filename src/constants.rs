//! Configuration constants for the seating system
//!
//! This module contains the fixed limits and default policies used
//! throughout the crate, grouped by the component that consumes them.

/// Table shape constants
pub mod table {
    /// Number of seats at a small table
    pub const FOUR_SEATS: usize = 4;
    /// Number of seats at a large table
    pub const FIVE_SEATS: usize = 5;
    /// Smallest session that the general-case table formula handles
    pub const GENERAL_CASE_MIN_PLAYERS: usize = 8;
    /// Player count that the table formula leaves without table sizes
    pub const UNSEATED_PLAYER_COUNT: usize = 11;
}

/// Seating optimizer configuration constants
pub mod optimizer {
    /// Default exponent applied to the player count to derive the iteration budget
    pub const DEFAULT_ITERATION_EXPONENT: f64 = 2.5;
    /// Minimum accepted iteration exponent
    pub const MIN_ITERATION_EXPONENT: f64 = 0.0;
    /// Maximum accepted iteration exponent
    pub const MAX_ITERATION_EXPONENT: f64 = 4.0;
    /// Default number of independent search runs
    pub const DEFAULT_RESTARTS: usize = 1;
    /// Maximum number of independent search runs
    pub const MAX_RESTARTS: usize = 64;
}

/// Session configuration constants
pub mod session {
    /// Maximum number of players accepted in a single session
    pub const MAX_PLAYER_COUNT: usize = 1000;
}
