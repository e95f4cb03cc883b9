//! Symbolic solver and strategy synthesizer for rank-1 GR(1) games.
//!
//! A [`game::CompiledGame`] pairs a BDD-encoded transition system with a list
//! of recurrence goals (`[]<>`) and persistence holds (`<>[]`). Solving finds
//! the winning region under a Streett(1) or Rabin(1) acceptance condition;
//! synthesis turns a realizable winning region into an implementation action
//! and initial predicates that can be read off as a transducer.

pub mod bdd;
pub mod diagnostics;
pub mod error;
mod fixpoint;
pub mod game;
pub mod pre;
pub mod realizability;
pub mod solver;
pub mod synthesis;
pub mod trivial;

pub use diagnostics::{Diagnostic, DiagnosticLog, Diagnostics, NullDiagnostics};
pub use error::{GameError, Result};
pub use game::{CompiledGame, CompiledGameBuilder, Domain, Owner, QInit};
pub use pre::{cact, cpre};
pub use realizability::is_realizable;
pub use solver::{solve_rabin, solve_streett, RabinIterates, StreettIterates};
pub use synthesis::{make_rabin_transducer, make_streett_transducer};
pub use trivial::trivial_winning_set;
