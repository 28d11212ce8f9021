//! Coordinate Descent Newton solver
//!
//! [`CdnSolver`] drives the epochs; [`LineSearch`] picks each coordinate's
//! step and [`EliminationTracker`] maintains the shrinking active set.

pub mod cdn;
pub mod elimination;
pub mod line_search;

pub use self::cdn::*;
pub use self::elimination::*;
pub use self::line_search::*;
