//! The trivial winning set: states whose Streett(1) win does not depend on
//! which persistence hold the play ultimately settles in.

use biodivine_lib_bdd::Bdd;
use log::debug;

use crate::game::CompiledGame;
use crate::solver::{solve_rabin, solve_streett};

/// States that are won in `game`'s Streett(1) game regardless of the
/// persistence holds, found by solving the dual Rabin(1) game.
///
/// Dualizes `game` — environment and system actions swap, every declared
/// variable's owner flips, and each persistence hold becomes a negated
/// recurrence goal of a single-hold Rabin(1) game sharing the same variable
/// encoding — then returns the Streett winning region minus the dual's Rabin
/// winning region.
pub fn trivial_winning_set(game: &CompiledGame) -> Bdd {
    debug!("computing trivial winning set via dual Rabin(1) game");
    let (win_streett, _) = solve_streett(game);
    let dual = dualize(game);
    let iterates = solve_rabin(&dual);
    let win_rabin = iterates
        .zk
        .last()
        .expect("solve_rabin always records at least one round");
    win_streett.and(&win_rabin.not())
}

fn dualize(game: &CompiledGame) -> CompiledGame {
    let bdd = game.bdd().with_swapped_owners();
    let goals: Vec<Bdd> = game.holds().iter().map(|h| h.not()).collect();
    let holds = vec![bdd.mk_true()];
    CompiledGame::from_dual_parts(
        bdd,
        game.sys_action().clone(),
        game.env_action().clone(),
        goals,
        holds,
    )
}
