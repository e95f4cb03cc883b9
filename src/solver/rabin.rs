//! Rabin(1) winning-region computation, dual to [`crate::solver::streett`].

use biodivine_lib_bdd::Bdd;
use log::info;

use crate::game::CompiledGame;
use crate::pre::cpre;

/// The intermediate fixpoint iterates of every outer round of
/// [`solve_rabin`], needed by
/// [`crate::synthesis::rabin::make_rabin_transducer`] to build the strategy.
///
/// Unlike [`crate::solver::streett::StreettIterates`], every round's iterates
/// are kept, not just the converged one: the Rabin transducer indexes its
/// memory counter by the round at which a state first entered the winning
/// region.
#[derive(Debug, Clone)]
pub struct RabinIterates {
    /// `zk[k]`: the winning region after `k+1` outer rounds.
    pub zk: Vec<Bdd>,
    /// `yki[k][i]`: the cycle found for hold `i` during round `k`.
    pub yki: Vec<Vec<Bdd>>,
    /// `xkijr[k][i][j]`: the attractor iterates for goal `j` inside the
    /// cycle for hold `i`, during round `k`.
    pub xkijr: Vec<Vec<Vec<Vec<Bdd>>>>,
}

/// Computes the Rabin(1) winning region.
///
/// Least fixpoint over `Z`: a state is won once the system can force entry,
/// for some persistence hold, into a cycle that lies inside `CPre(Z) ∨ hold`
/// and revisits every recurrence goal infinitely often. Unlike
/// [`crate::solver::streett::solve_streett`], every round's iterates are
/// retained in the returned [`RabinIterates`].
pub fn solve_rabin(game: &CompiledGame) -> RabinIterates {
    info!(
        "solving Rabin(1) game: {} goal(s), {} hold(s)",
        game.goals().len(),
        game.holds().len()
    );
    let mut z = game.bdd().mk_false();
    let mut zk = Vec::new();
    let mut yki = Vec::new();
    let mut xkijr = Vec::new();
    loop {
        let z_old = z.clone();
        let mut xijr: Vec<Vec<Vec<Bdd>>> = Vec::with_capacity(game.holds().len());
        let mut yi: Vec<Bdd> = Vec::with_capacity(game.holds().len());
        let mut z_new = z_old.clone();
        for hold in game.holds() {
            let (y, xjr) = cycle_inside(game, &z_old, hold);
            z_new = z_new.or(&y);
            yi.push(y);
            xijr.push(xjr);
        }
        zk.push(z_new.clone());
        yki.push(yi);
        xkijr.push(xijr);
        if z_new == z_old {
            break;
        }
        z = z_new;
    }
    info!("Rabin(1) fixpoint converged after {} round(s)", zk.len());
    RabinIterates { zk, yki, xkijr }
}

/// Greatest fixpoint of the largest cycle confined to `CPre(Z) ∨ hold`, that
/// still reaches every recurrence goal via [`attractor_inside`].
fn cycle_inside(game: &CompiledGame, z: &Bdd, hold: &Bdd) -> (Bdd, Vec<Vec<Bdd>>) {
    let cox_z = cpre(game, z);
    let g = cox_z.or(hold);
    let mut y = game.bdd().mk_true();
    let mut xjr: Vec<Vec<Bdd>> = Vec::new();
    loop {
        let y_old = y.clone();
        let cox_y = cpre(game, &y_old);
        let inside = cox_y.and(&g);
        xjr = Vec::with_capacity(game.goals().len());
        let mut y_new = y_old.clone();
        for goal in game.goals() {
            let (x, xr) = attractor_inside(game, &inside, goal);
            y_new = y_new.and(&x);
            xjr.push(xr);
        }
        if y_new == y_old {
            y = y_new;
            break;
        }
        y = y_new;
    }
    (y, xjr)
}

/// Least fixpoint of `λx. (CPre(x) ∨ goal) ∧ inside`, folded monotonically
/// (`x` is re-unioned with its previous value every round): the attractor to
/// `goal` while confined to `inside`.
fn attractor_inside(game: &CompiledGame, inside: &Bdd, goal: &Bdd) -> (Bdd, Vec<Bdd>) {
    let mut x = game.bdd().mk_false();
    let mut xr = Vec::new();
    loop {
        let x_old = x.clone();
        let cox_x = cpre(game, &x_old);
        let mut x_new = cox_x.or(goal);
        x_new = x_new.and(inside);
        x_new = x_new.or(&x_old);
        xr.push(x_new.clone());
        if x_new == x_old {
            x = x_new;
            break;
        }
        x = x_new;
    }
    (x, xr)
}
