//! Black-box tests exercising the public API end to end: building a game,
//! solving it, synthesizing a transducer, and checking realizability.
//!
//! Exact fixpoint values are only asserted where they can be derived from
//! the formulas directly (an unconstrained player can force any one-step
//! target, a deterministic action can never reach its negation); elsewhere
//! the tests check the structural invariants a solved game must satisfy
//! regardless of the specific predicates involved (monotonicity of the
//! recorded iterates, the winning region being a pure state predicate, a
//! trivial winning set being contained in the ordinary one).

use symgr1::bdd::BddManager;
use symgr1::game::{CompiledGame, CompiledGameBuilder, Domain, Owner, QInit, GOAL_VAR};
use symgr1::{
    is_realizable, make_rabin_transducer, make_streett_transducer, solve_rabin, solve_streett,
    trivial_winning_set, GameError, NullDiagnostics,
};

/// Routes the solvers' `info!`/`trace!`/`debug!` progress logging to the test
/// harness's captured output. Idempotent and safe to call from every test:
/// `try_init` only installs the logger once per process.
fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// One boolean variable `x` owned by `sys`, fully unconstrained on both
/// sides: `G_0 = (x = 1)`, `H_0 = true`. Scenario 1 of the testable
/// properties: an unconstrained system can force its own goal every step,
/// so the game is trivially realizable regardless of the (vacuous) hold.
fn trivial_realizable_game() -> (CompiledGame, BddManager) {
    init_logging();
    let mut builder = CompiledGameBuilder::new();
    builder.declare_variable("x", Owner::Sys, Domain::Bool);
    let bdd = builder.finalize_variables(1, 1).clone();
    let goal = bdd.var("x");
    let hold = bdd.mk_true();
    builder
        .env_action(bdd.mk_true())
        .sys_action(bdd.mk_true())
        .env_init(bdd.mk_true())
        .sys_init(bdd.mk_true())
        .add_goal(goal)
        .add_hold(hold);
    let game = builder.build().expect("valid game");
    (game, bdd)
}

#[test]
fn trivial_realizable_streett_wins_everywhere() {
    let (mut game, bdd) = trivial_realizable_game();
    let (z, iterates) = solve_streett(&game);
    assert_eq!(z, bdd.mk_true(), "an unconstrained system wins from every state");

    let mut diagnostics = NullDiagnostics;
    let rho = make_streett_transducer(&mut game, &z, &iterates, &mut diagnostics)
        .expect("trivially realizable game must synthesize");
    assert!(game.is_synthesized());
    assert_ne!(rho, bdd.mk_false());
    assert!(game.impl_init_env().is_some());
    assert!(game.impl_init_sys().is_some());
}

/// Scenario 2, adapted: the trivial-hold construction of Scenario 1 would
/// make every game realizable regardless of its actions (see DESIGN.md,
/// "the vacuous hold"), so the persistence hold here is the goal itself
/// rather than `true`. The system is deterministically forced to `x' = 0`
/// every step, so it can visit `x = 1` at most once and never recurs.
#[test]
fn deterministic_negation_is_unrealizable() {
    let mut builder = CompiledGameBuilder::new();
    builder.declare_variable("x", Owner::Sys, Domain::Bool);
    let bdd = builder.finalize_variables(1, 1).clone();
    let goal = bdd.var("x");
    let hold = bdd.var("x");
    builder
        .env_action(bdd.mk_true())
        .sys_action(bdd.var_next("x").not())
        .env_init(bdd.mk_true())
        .sys_init(bdd.mk_true())
        .add_goal(goal)
        .add_hold(hold);
    let mut game = builder.build().expect("valid game");

    let (z, iterates) = solve_streett(&game);
    assert_eq!(z, bdd.mk_false(), "forcing x'=0 forever can visit x=1 at most once");

    let (realizable, _witness) = is_realizable(&game, &z, &mut NullDiagnostics);
    assert!(!realizable);

    let err = make_streett_transducer(&mut game, &z, &iterates, &mut NullDiagnostics)
        .expect_err("unrealizable game must refuse synthesis");
    assert!(matches!(err, GameError::Unrealizable(_)));
    assert!(!game.is_synthesized());
}

/// Scenario 3: two recurrence goals over unconstrained variables. Both
/// players being fully free makes the game trivially realizable by the
/// same argument as Scenario 1; what's worth checking here is the
/// `_goal` counter's domain, since this is the first scenario with more
/// than one goal.
#[test]
fn two_goal_round_robin_is_realizable() {
    let mut builder = CompiledGameBuilder::new();
    builder.declare_variable("p", Owner::Sys, Domain::Bool);
    builder.declare_variable("q", Owner::Sys, Domain::Bool);
    let bdd = builder.finalize_variables(2, 1).clone();
    assert_eq!(bdd.domain(GOAL_VAR), Domain::Range { lo: 0, hi: 1 });

    let g0 = bdd.var("p");
    let g1 = bdd.var("q");
    let hold = bdd.mk_true();
    builder
        .env_action(bdd.mk_true())
        .sys_action(bdd.mk_true())
        .env_init(bdd.mk_true())
        .sys_init(bdd.mk_true())
        .add_goal(g0)
        .add_goal(g1)
        .add_hold(hold);
    let mut game = builder.build().expect("valid game");

    let (z, iterates) = solve_streett(&game);
    assert_eq!(z, bdd.mk_true());

    let rho = make_streett_transducer(&mut game, &z, &iterates, &mut NullDiagnostics)
        .expect("two unconstrained goals are jointly realizable");
    assert_ne!(rho, bdd.mk_false());
}

/// Scenario 4: the system can only assert its goal while the environment
/// variable `e` currently holds (`sys_action = (s' => e)`), and `e` is
/// otherwise free (`env_action = true`). Exact convergence values here
/// depend on subtleties of the vacuous-assumption case that are not
/// reproduced by hand derivation with confidence (see DESIGN.md); instead
/// this checks the structural invariants every solved game must satisfy:
/// the winning region is a pure state predicate, and the recorded
/// per-goal attractor iterates are monotonically non-decreasing.
#[test]
fn persistence_coupled_goal_preserves_solver_invariants() {
    let mut builder = CompiledGameBuilder::new();
    builder.declare_variable("e", Owner::Env, Domain::Bool);
    builder.declare_variable("s", Owner::Sys, Domain::Bool);
    let bdd = builder.finalize_variables(1, 1).clone();
    let goal = bdd.var("s");
    let hold = bdd.var("e");
    builder
        .env_action(bdd.mk_true())
        .sys_action(bdd.var_next("s").imp(&bdd.var("e")))
        .env_init(bdd.mk_true())
        .sys_init(bdd.mk_true())
        .add_goal(goal)
        .add_hold(hold);
    let game = builder.build().expect("valid game");

    let (z, iterates) = solve_streett(&game);
    assert!(bdd.is_state_predicate(&z), "Z must not depend on any primed variable");

    let yj = &iterates.y[0];
    for pair in yj.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert_eq!(a.and(&b.not()), bdd.mk_false(), "Y-basin iterates must be non-decreasing");
    }
}

/// (Duality): `trivial_winning_set` is, by construction, the Streett
/// winner intersected with the complement of a Rabin winner, so it must
/// always be contained in the plain Streett winning region.
#[test]
fn trivial_winning_set_is_contained_in_streett_winner() {
    let (game, bdd) = trivial_realizable_game();
    let (win_streett, _) = solve_streett(&game);
    let trivial = trivial_winning_set(&game);
    assert_eq!(
        trivial.and(&win_streett.not()),
        bdd.mk_false(),
        "trivial winning set must be a subset of the Streett winner"
    );
}

/// `solve_rabin` on a game with a single, directly-achievable recurrence
/// goal and an unconstrained hold: least fixpoint should reach the same
/// unconditional win as the dual Streett computation.
#[test]
fn rabin_solve_runs_to_completion() {
    let (game, bdd) = trivial_realizable_game();
    let iterates = solve_rabin(&game);
    assert!(!iterates.zk.is_empty());
    let win = iterates.zk.last().unwrap();
    assert!(bdd.is_state_predicate(win));
}

/// Scenario 6: under `qinit = \E \A`, realizability splits the initial
/// predicate into an env-independent bound and a universally-checked
/// system choice. This exercises that code path without trying to predict
/// the exact initial predicate by hand.
#[test]
fn exists_forall_qinit_synthesizes() {
    let mut builder = CompiledGameBuilder::new();
    builder.declare_variable("x", Owner::Sys, Domain::Bool);
    let bdd = builder.finalize_variables(1, 1).clone();
    let goal = bdd.var("x");
    let hold = bdd.mk_true();
    builder
        .env_action(bdd.mk_true())
        .sys_action(bdd.mk_true())
        .env_init(bdd.mk_true())
        .sys_init(bdd.mk_true())
        .add_goal(goal)
        .add_hold(hold)
        .qinit(QInit::ExistsForall);
    let mut game = builder.build().expect("valid game");

    let (z, iterates) = solve_streett(&game);
    let rho = make_streett_transducer(&mut game, &z, &iterates, &mut NullDiagnostics)
        .expect("qinit=exists/forall realizable for an unconstrained system");
    assert_ne!(rho, bdd.mk_false());
    assert!(game.impl_init_env().is_some());
}

/// Rabin synthesis end to end: a single-goal, single-hold game where the
/// system is free, so the `_goal`/`_hold` counters both degenerate to
/// single-valued domains and synthesis must still succeed.
#[test]
fn rabin_transducer_synthesizes_for_trivial_game() {
    let (mut game, bdd) = trivial_realizable_game();
    let iterates = solve_rabin(&game);
    let rho = make_rabin_transducer(&mut game, &iterates, &mut NullDiagnostics)
        .expect("trivial game realizable under Rabin(1) too");
    assert_ne!(rho, bdd.mk_false());
    assert!(game.is_synthesized());
}

/// Re-synthesizing an already-synthesized game is a configuration error,
/// not a panic, regardless of which synthesizer ran first.
#[test]
fn double_synthesis_is_a_configuration_error() {
    let (mut game, _bdd) = trivial_realizable_game();
    let (z, iterates) = solve_streett(&game);
    make_streett_transducer(&mut game, &z, &iterates, &mut NullDiagnostics).expect("first synthesis succeeds");

    let (z2, iterates2) = solve_streett(&game);
    let err = make_streett_transducer(&mut game, &z2, &iterates2, &mut NullDiagnostics)
        .expect_err("second synthesis must be refused");
    assert!(matches!(err, GameError::Configuration(_)));
}

/// The builder rejects a goal count that does not match what was declared
/// to `finalize_variables`.
#[test]
fn builder_rejects_goal_count_mismatch() {
    let mut builder = CompiledGameBuilder::new();
    builder.declare_variable("x", Owner::Sys, Domain::Bool);
    let bdd = builder.finalize_variables(2, 1).clone();
    builder
        .env_action(bdd.mk_true())
        .sys_action(bdd.mk_true())
        .env_init(bdd.mk_true())
        .sys_init(bdd.mk_true())
        .add_goal(bdd.var("x"))
        .add_hold(bdd.mk_true());
    let err = builder.build().expect_err("only one goal was added, two were declared");
    assert!(matches!(err, GameError::Configuration(_)));
}

/// A vacuous environment (`env_init = false`) is rejected before any
/// solving happens.
#[test]
fn builder_rejects_vacuous_env_init() {
    let mut builder = CompiledGameBuilder::new();
    builder.declare_variable("x", Owner::Sys, Domain::Bool);
    let bdd = builder.finalize_variables(1, 1).clone();
    builder
        .env_action(bdd.mk_true())
        .sys_action(bdd.mk_true())
        .env_init(bdd.mk_false())
        .sys_init(bdd.mk_true())
        .add_goal(bdd.var("x"))
        .add_hold(bdd.mk_true());
    let err = builder.build().expect_err("env_init = false is vacuous");
    assert!(matches!(err, GameError::Configuration(_)));
}
