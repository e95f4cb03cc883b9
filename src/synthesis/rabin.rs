//! The ρ₁/ρ₂/ρ₃/ρ₄ Rabin(1) transducer construction, dual to
//! [`crate::synthesis::streett::make_streett_transducer`].

use biodivine_lib_bdd::Bdd;
use log::info;

use crate::diagnostics::Diagnostics;
use crate::error::{GameError, Result};
use crate::game::{CompiledGame, Owner, GOAL_VAR, HOLD_VAR};
use crate::pre::{cact, cpre};
use crate::realizability::{is_realizable, make_init, warn_moore_mealy};
use crate::solver::RabinIterates;

/// Synthesizes a winning transducer for a solved Rabin(1) game.
///
/// Declares both the `_goal` and `_hold` memory counters and mutates `game`
/// in place, same one-shot contract as
/// [`crate::synthesis::streett::make_streett_transducer`]. `_hold = n_holds`
/// is the sentinel meaning "no persistence set committed to yet".
///
/// # Errors
///
/// Returns [`GameError::Unrealizable`] if the winning region (the last
/// element of [`RabinIterates::zk`]) does not make the game realizable under
/// its declared `qinit`, and [`GameError::Configuration`] if synthesis has
/// already run on `game`.
pub fn make_rabin_transducer(
    game: &mut CompiledGame,
    iterates: &RabinIterates,
    diagnostics: &mut impl Diagnostics,
) -> Result<Bdd> {
    let winning = iterates
        .zk
        .last()
        .cloned()
        .ok_or_else(|| GameError::Configuration("rabin iterates are empty".into()))?;
    let (realizable, witness) = is_realizable(game, &winning, diagnostics);
    if !realizable {
        return Err(GameError::Unrealizable(witness));
    }
    info!("game is realizable, synthesizing Rabin(1) transducer");
    warn_moore_mealy(game, diagnostics);
    game.begin_synthesis(true)?;

    let goals = game.goals().to_vec();
    let n_holds = game.holds().len() as i64;
    let n_goals = goals.len() as i64;
    let c_max = n_goals - 1;
    let bdd = game.bdd().clone();

    // rho_1: descend the persistence basin before any hold is committed to.
    let unchanged_goal = bdd.unchanged(GOAL_VAR);
    let mut rho_1 = bdd.mk_false();
    let mut basin = iterates.zk[0].clone();
    for z in &iterates.zk[1..] {
        let zstar = cact(game, &basin);
        let rim = z.and(&basin.not());
        let count = unchanged_goal.and(&bdd.next_eq_const(HOLD_VAR, n_holds));
        let u = rim.and(&zstar).and(&count);
        rho_1 = rho_1.or(&u);
        basin = z.clone();
    }

    let mut rho_2 = bdd.mk_false();
    let mut rho_3 = bdd.mk_false();
    let mut rho_4 = bdd.mk_false();
    let mut basin = bdd.mk_false();
    for k in 0..iterates.zk.len() {
        let z = &iterates.zk[k];
        let yi = &iterates.yki[k];
        let xijr = &iterates.xkijr[k];

        let cox_basin = cpre(game, &basin);
        let rim = z.and(&basin.not()).and(&cox_basin.not());

        // rho_2: commit to a persistence set.
        let count = unchanged_goal.and(&bdd.eq_const(HOLD_VAR, n_holds));
        let mut u = rim.and(&count);
        let mut v = bdd.mk_false();
        for (i, y) in yi.iter().enumerate() {
            let count_i = bdd.next_eq_const(HOLD_VAR, i as i64);
            let ystar = cact(game, y);
            v = v.or(&count_i.and(&ystar));
        }
        u = u.and(&v);
        rho_2 = rho_2.or(&u);

        // rho_3: descend the recurrence basin for the committed hold.
        let count = unchanged_goal
            .and(&bdd.eq_const(HOLD_VAR, n_holds).not())
            .and(&bdd.unchanged(HOLD_VAR));
        let mut u = rim.and(&count);
        let mut v = bdd.mk_false();
        for (i, xjr) in xijr.iter().enumerate() {
            for (j, (xr, goal)) in xjr.iter().zip(goals.iter()).enumerate() {
                let count_ij = bdd
                    .eq_const(GOAL_VAR, j as i64)
                    .and(&bdd.eq_const(HOLD_VAR, i as i64));
                let mut x_basin = xr[0].clone();
                let mut p = bdd.mk_false();
                for x in &xr[1..] {
                    let xstar = cact(game, &x_basin);
                    let q = xstar.and(&x_basin.not()).and(x);
                    p = p.or(&q);
                    x_basin = x.clone();
                }
                p = p.and(&count_ij).and(&goal.not());
                v = v.or(&p);
            }
        }
        u = u.and(&v);
        rho_3 = rho_3.or(&u);

        // rho_4: advance to the next recurrence goal on a direct visit.
        let mut u = bdd.mk_false();
        for (j, goal) in goals.iter().enumerate() {
            let jp = (j as i64 + 1) % n_goals;
            let count = bdd
                .eq_const(GOAL_VAR, j as i64)
                .and(&bdd.next_eq_const(GOAL_VAR, jp));
            u = u.or(&count.and(goal));
        }
        let count = bdd
            .eq_const(HOLD_VAR, n_holds)
            .not()
            .and(&bdd.unchanged(HOLD_VAR));
        u = u.and(&count).and(&rim);
        let mut v = bdd.mk_false();
        for (i, y) in yi.iter().enumerate() {
            let count_i = bdd.eq_const(HOLD_VAR, i as i64);
            let ystar = cact(game, y);
            v = v.or(&count_i.and(&ystar));
        }
        u = u.and(&v);
        rho_4 = rho_4.or(&u);

        basin = z.clone();
    }

    let mut rho = rho_1.or(&rho_2).or(&rho_3).or(&rho_4);
    rho = rho
        .and(&bdd.in_range(HOLD_VAR, 0, n_holds))
        .and(&bdd.in_range(GOAL_VAR, 0, c_max));
    if !game.plus_one() {
        rho = rho.or(&game.env_action().not());
        if game.moore() {
            let env_next = bdd.owned_bits_next(Owner::Env);
            rho = bdd.forall(&env_next, &rho);
        }
    }
    assert!(
        rho != bdd.mk_false(),
        "synthesized Rabin action is unsatisfiable despite a realizable game"
    );

    let init_count = bdd.eq_const(GOAL_VAR, 0).and(&bdd.eq_const(HOLD_VAR, n_holds));
    let (init_env, init_sys) = make_init(game, &init_count, &winning);

    game.finish_synthesis(rho.clone(), init_env, init_sys);
    info!("Rabin(1) transducer synthesized");
    Ok(rho)
}
