//! Streett(1) winning-region computation.

use biodivine_lib_bdd::Bdd;
use log::{info, trace};

use crate::fixpoint::trap;
use crate::game::CompiledGame;
use crate::pre::cpre;

/// The intermediate fixpoint iterates of the final (converged) outer round of
/// [`solve_streett`], needed by
/// [`crate::synthesis::streett::make_streett_transducer`] to build the
/// strategy.
///
/// `y[j]` is the sequence of attractor approximants `Y_{j,0}, Y_{j,1}, ...`
/// computed while chasing recurrence goal `j`; `x[j][k]` is the per-hold trap
/// approximants computed during the `k`-th iteration of that attractor.
#[derive(Debug, Clone)]
pub struct StreettIterates {
    /// Per recurrence goal, the attractor's `Y` iterates.
    pub y: Vec<Vec<Bdd>>,
    /// Per recurrence goal, per `Y` iteration, the per-hold `trap` iterates.
    pub x: Vec<Vec<Vec<Bdd>>>,
}

/// Computes the Streett(1) winning region.
///
/// Outer greatest fixpoint over `Z`: a state survives only if, for every
/// recurrence goal, the system can force a visit to that goal (restricted to
/// states already known to survive, `CPre(Z)`) while trapped inside some
/// persistence hold until the goal is reached. Returns the winning region and
/// the iterates of its last (converged) round, for synthesis.
pub fn solve_streett(game: &CompiledGame) -> (Bdd, StreettIterates) {
    info!(
        "solving Streett(1) game: {} goal(s), {} hold(s)",
        game.goals().len(),
        game.holds().len()
    );
    let mut z = game.bdd().mk_true();
    let mut yij: Vec<Vec<Bdd>> = Vec::new();
    let mut xijk: Vec<Vec<Vec<Bdd>>> = Vec::new();
    let mut round = 0;
    loop {
        round += 1;
        let z_old = z.clone();
        let cox_z = cpre(game, &z_old);
        yij = Vec::with_capacity(game.goals().len());
        xijk = Vec::with_capacity(game.goals().len());
        let mut z_new = z_old.clone();
        for goal in game.goals() {
            let goal_round = goal.and(&cox_z);
            let (y, yj, xjk) = attractor_under_assumptions(game, &goal_round);
            z_new = z_new.and(&y);
            yij.push(yj);
            xijk.push(xjk);
        }
        trace!("Streett round {}: |Z| node count unchanged = {}", round, z_new == z_old);
        if z_new == z_old {
            z = z_new;
            break;
        }
        z = z_new;
    }
    info!("Streett(1) fixpoint converged after {} round(s)", round);
    (z, StreettIterates { y: yij, x: xijk })
}

/// Least fixpoint of the system's attractor to `goal`, moving through
/// persistence holds.
///
/// At each round, `unless` widens to `CPre(Y) ∨ goal`: the system may enter
/// any hold and stay there under [`trap`] until either it is forced to make
/// further progress toward `Y`, or `goal` is reached directly.
fn attractor_under_assumptions(game: &CompiledGame, goal: &Bdd) -> (Bdd, Vec<Bdd>, Vec<Vec<Bdd>>) {
    let mut y = game.bdd().mk_false();
    let mut yj: Vec<Bdd> = Vec::new();
    let mut xjk: Vec<Vec<Bdd>> = Vec::new();
    loop {
        let y_old = y.clone();
        let cox_y = cpre(game, &y_old);
        let unless = cox_y.or(goal);
        let mut xk = Vec::with_capacity(game.holds().len());
        let mut y_new = y_old.clone();
        for hold in game.holds() {
            let x = trap(game, hold, &unless);
            y_new = y_new.or(&x);
            xk.push(x);
        }
        yj.push(y_new.clone());
        xjk.push(xk);
        if y_new == y_old {
            y = y_new;
            break;
        }
        y = y_new;
    }
    (y, yj, xjk)
}
