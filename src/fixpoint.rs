//! The `trap` greatest fixpoint shared by both nested solvers.

use biodivine_lib_bdd::Bdd;

use crate::game::CompiledGame;
use crate::pre::cpre;

/// Greatest fixpoint of `λx. (CPre(x) ∨ unless) ∧ safe`.
///
/// Computes the states from which the system can stay inside `safe` forever,
/// or else eventually escape into `unless`. Starts at `⊤` and shrinks
/// monotonically; termination follows from the underlying variable set being
/// finite.
pub(crate) fn trap(game: &CompiledGame, safe: &Bdd, unless: &Bdd) -> Bdd {
    let mut x = game.bdd().mk_true();
    loop {
        let next = cpre(game, &x).or(unless).and(safe);
        if next == x {
            return x;
        }
        x = next;
    }
}
