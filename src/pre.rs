//! The controllable predecessor and controllable action operators.

use biodivine_lib_bdd::Bdd;

use crate::game::{CompiledGame, Owner};

/// States from which the system can force entry into `target` in one step.
///
/// Used for progress in the fixpoints of [`crate::solver::streett`] and
/// [`crate::solver::rabin`]. A pure state predicate: unlike [`cact`], every
/// primed variable is eliminated, in an order that depends on `moore`. A
/// Moore system commits to its move before seeing the environment's, so the
/// existential over `sys'` must be the outermost quantifier
/// (`∃sys'.∀env'.u`); [`cact`] already applies the `∀env'` internally for
/// that case, so quantifying `sys'` here is enough. A Mealy system reacts to
/// the environment's simultaneous move, so the universal over `env'` must be
/// outermost instead (`∀env'.∃sys'.u`); since [`cact`] leaves both free when
/// `moore` is false, both quantifiers are applied here, in that order.
pub fn cpre(game: &CompiledGame, target: &Bdd) -> Bdd {
    let u = cact(game, target);
    let sys_next = game.bdd().owned_bits_next(Owner::Sys);
    let u = game.bdd().exist(&sys_next, &u);
    if game.moore() {
        u
    } else {
        let env_next = game.bdd().owned_bits_next(Owner::Env);
        game.bdd().forall(&env_next, &u)
    }
}

/// The controllable-action operator (`_controllable_action` in the source).
///
/// Same two formulations as [`cpre`], but primed system variables are left
/// free: the caller conjoins additional step-specific conjuncts (a counter
/// update, a hold assumption) before the result is disjoined into a
/// strategy, at which point it is meant to keep depending on the primed
/// system variables it prescribes. `CAct` is always used for strategy
/// extraction; [`cpre`] for progress in the fixpoints.
pub fn cact(game: &CompiledGame, target: &Bdd) -> Bdd {
    let t_next = game.bdd().prime(target);
    let env_action = game.env_action();
    let sys_action = game.sys_action();
    let mut u = if game.plus_one() {
        // sys_action /\ (env_action => target')
        sys_action.and(&env_action.imp(&t_next))
    } else {
        // env_action => (sys_action /\ target')
        env_action.imp(&sys_action.and(&t_next))
    };
    if game.moore() {
        // \A env'
        let env_next = game.bdd().owned_bits_next(Owner::Env);
        u = game.bdd().forall(&env_next, &u);
    }
    u
}
