//! Strategy synthesis: turning a solved winning region into an implementation
//! action and initial predicates.

pub mod rabin;
pub mod streett;

pub use rabin::make_rabin_transducer;
pub use streett::make_streett_transducer;
