//! Realizability checking under the four `qinit` quantifier regimes
//! and the initial-predicate construction shared by both synthesizers.

use biodivine_lib_bdd::Bdd;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::game::{CompiledGame, Owner, QInit};

/// Checks whether `win` (a solved winning region) makes the game realizable
/// under its declared [`QInit`] regime.
///
/// Returns `(true, _)` if realizable, or `(false, witness)` where `witness`
/// describes the quantified formula that failed, for use as the message of
/// [`crate::error::GameError::Unrealizable`].
///
/// For `qinit = \A \A`, also raises [`Diagnostic::VacuousInitNotImpliedBySys`]
/// and [`Diagnostic::VacuousInitNoSysMove`] through `diagnostics` when the
/// environment's initial predicate does not already imply the system has a
/// legal, winning response — realizability can hold vacuously in that case.
pub fn is_realizable(
    game: &CompiledGame,
    win: &Bdd,
    diagnostics: &mut impl Diagnostics,
) -> (bool, String) {
    let env_init = game.env_init();
    let sys_init = game.sys_init();
    let bdd = game.bdd();
    let t = bdd.mk_true();

    match game.qinit() {
        QInit::ForallForall => {
            let implies_sys_init = env_init.not().or(sys_init);
            if implies_sys_init != t {
                diagnostics.push(Diagnostic::VacuousInitNotImpliedBySys);
            }
            let sys_next = game.varlist_sys_next();
            let has_sys_move = bdd.exist(&sys_next, game.sys_action()).or(&env_init.not());
            if has_sys_move != t {
                diagnostics.push(Diagnostic::VacuousInitNoSysMove);
            }
            let u = sys_init.and(win).or(&env_init.not());
            let realizable = u == t;
            (
                realizable,
                "forall/forall: not (EnvInit => (SysInit /\\ Win))".to_string(),
            )
        }
        QInit::ExistsExists => {
            let evars = game.varlist_sys();
            let uvars = game.varlist_env();
            let mut u = sys_init.and(win).and(env_init);
            u = bdd.exist(&evars, &u);
            u = bdd.exist(&uvars, &u);
            let realizable = u == t;
            (
                realizable,
                "exists/exists: not exists x, y: EnvInit /\\ SysInit /\\ Win".to_string(),
            )
        }
        QInit::ForallExists => {
            let evars = game.varlist_sys();
            let uvars = game.varlist_env();
            let a = bdd.exist(&evars, env_init);
            let mut u = sys_init.and(win).and(env_init).or(&a.not());
            u = bdd.exist(&evars, &u);
            u = bdd.forall(&uvars, &u);
            let realizable = u == t;
            (
                realizable,
                "forall/exists: cannot for each x pick a winning y".to_string(),
            )
        }
        QInit::ExistsForall => {
            let evars = game.varlist_sys();
            let uvars = game.varlist_env();
            let a = bdd.exist(&evars, env_init);
            let mut u = sys_init.and(win).and(env_init).or(&a.not());
            u = bdd.forall(&uvars, &u);
            u = bdd.exist(&evars, &u);
            let realizable = u == t;
            (
                realizable,
                "exists/forall: no single y works for every x".to_string(),
            )
        }
    }
}

/// Raises [`Diagnostic::MooreDependsOnPrimedEnv`],
/// [`Diagnostic::MealyEnvDependsOnPrimedSys`] and
/// [`Diagnostic::EnvDependsOnPrimedSys`] when the declared actions depend on
/// the opponent's simultaneous move in a way that contradicts the declared
/// Moore/Mealy flag, or that makes a Mealy environment suspect regardless.
pub(crate) fn warn_moore_mealy(game: &CompiledGame, diagnostics: &mut impl Diagnostics) {
    let bdd = game.bdd();
    let sys_depends_on_primed_env = bdd
        .support_primed(game.sys_action())
        .into_iter()
        .any(|name| bdd.owner(&name) == Owner::Env);
    let env_depends_on_primed_sys = bdd
        .support_primed(game.env_action())
        .into_iter()
        .any(|name| bdd.owner(&name) == Owner::Sys);

    if game.moore() && sys_depends_on_primed_env {
        diagnostics.push(Diagnostic::MooreDependsOnPrimedEnv);
    }
    if !game.moore() && env_depends_on_primed_sys {
        diagnostics.push(Diagnostic::MealyEnvDependsOnPrimedSys);
    }
    if env_depends_on_primed_sys {
        diagnostics.push(Diagnostic::EnvDependsOnPrimedSys);
    }
}

/// Builds the synthesized initial predicates from an internal memory-counter
/// initial assignment (e.g. `_goal = 0`) and the solved winning region,
/// following the same `qinit` regime used by [`is_realizable`].
///
/// Used by both [`crate::synthesis::streett::make_streett_transducer`] and
/// [`crate::synthesis::rabin::make_rabin_transducer`].
pub(crate) fn make_init(game: &CompiledGame, internal_init: &Bdd, win: &Bdd) -> (Bdd, Bdd) {
    let bdd = game.bdd();
    let env_init = game.env_init();
    let sys_init = game.sys_init().and(internal_init);
    let impl_sys_init = sys_init.and(win);

    let impl_env_init = match game.qinit() {
        QInit::ForallForall | QInit::ForallExists | QInit::ExistsExists => {
            env_init.and(&impl_sys_init)
        }
        QInit::ExistsForall => {
            let evars = game.varlist_sys();
            let uvars = game.varlist_env();
            let env_bound = bdd.exist(&evars, env_init);
            let mut u = env_init.and(&impl_sys_init).or(&env_bound.not());
            u = bdd.forall(&uvars, &u);
            env_bound.and(&u)
        }
    };
    (impl_env_init, impl_sys_init)
}
