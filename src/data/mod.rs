//! Design matrix storage and loaders
//!
//! [`CscMatrix`] is the column-major matrix the solver consumes; the LibSVM
//! loader builds one from the common sparse text format.

pub mod csc;
pub mod libsvm;

pub use self::csc::*;
pub use self::libsvm::*;
