//! Nested fixpoint solvers for Streett(1) and Rabin(1) games.

pub mod rabin;
pub mod streett;

pub use rabin::{solve_rabin, RabinIterates};
pub use streett::{solve_streett, StreettIterates};
