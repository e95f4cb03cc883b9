//! The ρ₁/ρ₂/ρ₃ Streett(1) transducer construction, after
//! Bloem, Jobstmann, Piterman, Pnueli and Sa'ar.

use biodivine_lib_bdd::Bdd;
use log::info;

use crate::diagnostics::Diagnostics;
use crate::error::{GameError, Result};
use crate::game::{CompiledGame, Owner, GOAL_VAR};
use crate::pre::cact;
use crate::realizability::{is_realizable, make_init, warn_moore_mealy};
use crate::solver::StreettIterates;

/// Synthesizes a winning transducer for a solved Streett(1) game.
///
/// Declares the `_goal` memory counter and mutates `game` in place via
/// [`CompiledGame::begin_synthesis`]/[`CompiledGame::finish_synthesis`]
/// (one-shot: a second call on the same game returns
/// [`GameError::Configuration`]). Returns the synthesized action, which is
/// also the one recorded on `game`.
///
/// # Errors
///
/// Returns [`GameError::Unrealizable`] if `z` does not make the game
/// realizable under its declared `qinit`, and [`GameError::Configuration`]
/// if synthesis has already run on `game`.
pub fn make_streett_transducer(
    game: &mut CompiledGame,
    z: &Bdd,
    iterates: &StreettIterates,
    diagnostics: &mut impl Diagnostics,
) -> Result<Bdd> {
    let (realizable, witness) = is_realizable(game, z, diagnostics);
    if !realizable {
        return Err(GameError::Unrealizable(witness));
    }
    info!("game is realizable, synthesizing Streett(1) transducer");
    warn_moore_mealy(game, diagnostics);
    game.begin_synthesis(false)?;

    let goals = game.goals().to_vec();
    let holds = game.holds().to_vec();
    let n_goals = goals.len() as i64;
    let c_max = n_goals - 1;
    let bdd = game.bdd().clone();

    // rho_1: advance the counter on a direct visit to the current goal.
    let mut rho_1 = bdd.mk_false();
    for i in 0..goals.len() {
        let ip = (i as i64 + 1) % n_goals;
        let step = bdd
            .eq_const(GOAL_VAR, i as i64)
            .and(&bdd.next_eq_const(GOAL_VAR, ip));
        rho_1 = rho_1.or(&step.and(&goals[i]));
    }
    let zstar = cact(game, z);
    rho_1 = rho_1.and(&zstar);

    // rho_2: inside the attractor to the current goal, move strictly closer.
    let mut rho_2 = bdd.mk_false();
    for (i, yj) in iterates.y.iter().enumerate() {
        let count = bdd
            .eq_const(GOAL_VAR, i as i64)
            .and(&bdd.next_eq_const(GOAL_VAR, i as i64));
        let mut rho_2j = bdd.mk_false();
        let mut basin = yj[0].clone();
        for y in &yj[1..] {
            let ystar = cact(game, &basin);
            let rim = y.and(&basin.not());
            rho_2j = rho_2j.or(&rim.and(&ystar));
            basin = basin.or(y);
        }
        rho_2 = rho_2.or(&rho_2j.and(&count));
    }

    // rho_3: on the rim of a hold's trap, stay inside it under the counter.
    let mut rho_3 = bdd.mk_false();
    for (i, xjk) in iterates.x.iter().enumerate() {
        let count = bdd
            .eq_const(GOAL_VAR, i as i64)
            .and(&bdd.next_eq_const(GOAL_VAR, i as i64));
        let mut rho_3j = bdd.mk_false();
        let mut used = bdd.mk_false();
        for xk in xjk {
            for (x, hold) in xk.iter().zip(holds.iter()) {
                let xstar = cact(game, x);
                let rim = x.and(&used.not());
                used = used.or(x);
                let step = rim.and(&xstar).and(hold);
                rho_3j = rho_3j.or(&step);
            }
        }
        rho_3 = rho_3.or(&rho_3j.and(&count));
    }

    let mut rho = rho_1.or(&rho_2).or(&rho_3);
    rho = rho.and(&bdd.in_range(GOAL_VAR, 0, c_max));
    if !game.plus_one() {
        rho = rho.or(&game.env_action().not());
        if game.moore() {
            let env_next = bdd.owned_bits_next(Owner::Env);
            rho = bdd.forall(&env_next, &rho);
        }
    }
    assert!(
        rho != bdd.mk_false(),
        "synthesized Streett action is unsatisfiable despite a realizable game"
    );

    let init_count = bdd.eq_const(GOAL_VAR, 0);
    let (init_env, init_sys) = make_init(game, &init_count, z);

    game.finish_synthesis(rho.clone(), init_env, init_sys);
    info!("Streett(1) transducer synthesized");
    Ok(rho)
}
