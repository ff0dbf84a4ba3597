//! Pure data structures shared by every store implementation.

pub mod product;
pub mod reservation;

pub use product::*;
pub use reservation::*;
