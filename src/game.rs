//! The compiled game object: declared variables, transition and initial
//! predicates, recurrence/persistence lists, and the flags that parametrize
//! the predecessor operators.

use biodivine_lib_bdd::Bdd;

use crate::bdd::{BddManager, BddManagerBuilder};
use crate::error::GameError;

/// Name of the auxiliary recurrence-goal counter declared by both
/// synthesizers.
pub const GOAL_VAR: &str = "_goal";
/// Name of the auxiliary persistence-hold counter declared only by
/// [`crate::synthesis::rabin::make_rabin_transducer`].
pub const HOLD_VAR: &str = "_hold";

/// The owner of a declared variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Owner {
    /// The environment player.
    Env,
    /// The system player.
    Sys,
}

/// The domain of a declared variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    /// A Boolean variable.
    Bool,
    /// A bounded-integer variable with inclusive bounds `lo..=hi`.
    Range {
        /// Inclusive lower bound.
        lo: i64,
        /// Inclusive upper bound.
        hi: i64,
    },
}

/// The initial-quantifier regime under which realizability is checked.
/// Replaces the source's parsed `"\A \A"`-style strings with a
/// closed enum, so an unrecognized `qinit` is a compile error rather than a
/// runtime configuration error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QInit {
    /// Every environment/system initial pair must be winning.
    ForallForall,
    /// Some initial pair is winning.
    ExistsExists,
    /// For every environment initial value, some system initial value wins.
    /// Requires a Mealy system (`moore = false`).
    ForallExists,
    /// Some system initial value wins against every environment initial
    /// value.
    ExistsForall,
}

impl Default for QInit {
    fn default() -> Self {
        Self::ForallForall
    }
}

impl std::fmt::Display for QInit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::ForallForall => "\\A \\A",
            Self::ExistsExists => "\\E \\E",
            Self::ForallExists => "\\A \\E",
            Self::ExistsForall => "\\E \\A",
        };
        write!(f, "{}", s)
    }
}

/// A two-player game compiled to BDDs over declared variables, ready to be
/// solved and, if realizable, synthesized into an implementation.
///
/// Constructed with [`CompiledGameBuilder`]. `_goal` (and, for Rabin games,
/// `_hold`) are reserved as BDD variables at construction time, since the
/// underlying engine fixes its variable ordering once built; they only
/// become part of `varlist[sys]` once a synthesizer claims them, which is
/// still a one-shot operation guarded by `synthesized`.
#[derive(Debug, Clone)]
pub struct CompiledGame {
    bdd: BddManager,
    env_action: Bdd,
    sys_action: Bdd,
    env_init: Bdd,
    sys_init: Bdd,
    goals: Vec<Bdd>,
    holds: Vec<Bdd>,
    moore: bool,
    plus_one: bool,
    qinit: QInit,
    extra_sys_vars: Vec<&'static str>,
    impl_action: Option<Bdd>,
    impl_init_env: Option<Bdd>,
    impl_init_sys: Option<Bdd>,
    synthesized: bool,
}

impl CompiledGame {
    pub(crate) fn bdd(&self) -> &BddManager {
        &self.bdd
    }

    /// The environment's transition relation, over unprimed ∪ primed vars.
    pub fn env_action(&self) -> &Bdd {
        &self.env_action
    }

    /// The system's transition relation, over unprimed ∪ primed vars.
    pub fn sys_action(&self) -> &Bdd {
        &self.sys_action
    }

    /// The environment's initial predicate, over unprimed vars.
    pub fn env_init(&self) -> &Bdd {
        &self.env_init
    }

    /// The system's initial predicate, over unprimed vars.
    pub fn sys_init(&self) -> &Bdd {
        &self.sys_init
    }

    /// The recurrence goals `G_0, ..., G_{m-1}` (□◇).
    pub fn goals(&self) -> &[Bdd] {
        &self.goals
    }

    /// The persistence holds `H_0, ..., H_{k-1}` (◇□).
    pub fn holds(&self) -> &[Bdd] {
        &self.holds
    }

    /// `true` if the system is Moore: it chooses its next move without
    /// observing the environment's simultaneous move.
    pub fn moore(&self) -> bool {
        self.moore
    }

    /// `true` if [`crate::pre::cpre`] and [`crate::pre::cact`] should use the
    /// `sys_action \land (env_action \Rightarrow target')` formulation rather
    /// than `env_action \Rightarrow (sys_action \land target')`.
    pub fn plus_one(&self) -> bool {
        self.plus_one
    }

    /// The initial-quantifier regime.
    pub fn qinit(&self) -> QInit {
        self.qinit
    }

    /// `true` once a synthesizer has populated [`Self::impl_action`].
    pub fn is_synthesized(&self) -> bool {
        self.synthesized
    }

    /// The synthesized implementation action, if synthesis has run.
    pub fn impl_action(&self) -> Option<&Bdd> {
        self.impl_action.as_ref()
    }

    /// The synthesized environment initial predicate, if synthesis has run.
    pub fn impl_init_env(&self) -> Option<&Bdd> {
        self.impl_init_env.as_ref()
    }

    /// The synthesized system initial predicate, if synthesis has run.
    pub fn impl_init_sys(&self) -> Option<&Bdd> {
        self.impl_init_sys.as_ref()
    }

    /// Reserve the `_goal` counter (and, if `with_hold`, the `_hold`
    /// counter) for a synthesizer about to run, enforcing the one-shot
    /// invariant.
    pub(crate) fn begin_synthesis(&mut self, with_hold: bool) -> Result<(), GameError> {
        if self.synthesized {
            return Err(GameError::Configuration(
                "synthesis has already been performed on this game".into(),
            ));
        }
        self.synthesized = true;
        self.extra_sys_vars.push(GOAL_VAR);
        if with_hold {
            self.extra_sys_vars.push(HOLD_VAR);
        }
        Ok(())
    }

    /// Record the synthesized implementation action and initial predicates.
    pub(crate) fn finish_synthesis(&mut self, action: Bdd, init_env: Bdd, init_sys: Bdd) {
        self.impl_action = Some(action);
        self.impl_init_env = Some(init_env);
        self.impl_init_sys = Some(init_sys);
    }

    /// `varlist[sys]`: the unprimed BDD variables owned by the system,
    /// including `_goal`/`_hold` once a synthesizer has claimed them via
    /// [`Self::begin_synthesis`], and excluding them otherwise even though
    /// they are already reserved at the BDD-engine level (see the struct
    /// documentation).
    pub(crate) fn varlist_sys(&self) -> Vec<biodivine_lib_bdd::BddVariable> {
        let reserved: Vec<_> = self
            .bdd
            .bits(GOAL_VAR)
            .iter()
            .chain(self.bdd.bits(HOLD_VAR))
            .copied()
            .collect();
        let claimed: Vec<_> = self
            .extra_sys_vars
            .iter()
            .flat_map(|&name| self.bdd.bits(name).iter().copied())
            .collect();
        self.bdd
            .owned_bits(Owner::Sys)
            .into_iter()
            .filter(|v| !reserved.contains(v) || claimed.contains(v))
            .collect()
    }

    /// `varlist[sys']`, filtered the same way as [`Self::varlist_sys`].
    pub(crate) fn varlist_sys_next(&self) -> Vec<biodivine_lib_bdd::BddVariable> {
        let reserved: Vec<_> = self
            .bdd
            .bits_next(GOAL_VAR)
            .iter()
            .chain(self.bdd.bits_next(HOLD_VAR))
            .copied()
            .collect();
        let claimed: Vec<_> = self
            .extra_sys_vars
            .iter()
            .flat_map(|&name| self.bdd.bits_next(name).iter().copied())
            .collect();
        self.bdd
            .owned_bits_next(Owner::Sys)
            .into_iter()
            .filter(|v| !reserved.contains(v) || claimed.contains(v))
            .collect()
    }

    /// `varlist[env]`.
    pub(crate) fn varlist_env(&self) -> Vec<biodivine_lib_bdd::BddVariable> {
        self.bdd.owned_bits(Owner::Env)
    }

    /// `varlist[env']`.
    pub(crate) fn varlist_env_next(&self) -> Vec<biodivine_lib_bdd::BddVariable> {
        self.bdd.owned_bits_next(Owner::Env)
    }

    /// Builds a [`CompiledGame`] directly from an already-built [`BddManager`],
    /// bypassing [`CompiledGameBuilder`]'s validation.
    ///
    /// Used only by [`crate::trivial::trivial_winning_set`] to construct the
    /// dual Rabin(1) game: [`crate::solver::rabin::solve_rabin`] never reads
    /// the initial predicates, so they are set to `true` rather than
    /// threading real ones through a second, unrelated quantifier regime.
    /// Moore and `plus_one` default to `false`, matching the fresh automaton
    /// the dual is built from in the source algorithm.
    pub(crate) fn from_dual_parts(
        bdd: BddManager,
        env_action: Bdd,
        sys_action: Bdd,
        goals: Vec<Bdd>,
        holds: Vec<Bdd>,
    ) -> CompiledGame {
        let env_init = bdd.mk_true();
        let sys_init = bdd.mk_true();
        CompiledGame {
            bdd,
            env_action,
            sys_action,
            env_init,
            sys_init,
            goals,
            holds,
            moore: false,
            plus_one: false,
            qinit: QInit::default(),
            extra_sys_vars: Vec::new(),
            impl_action: None,
            impl_init_env: None,
            impl_init_sys: None,
            synthesized: false,
        }
    }
}

/// Builds a [`CompiledGame`] in two phases, validating the invariants
/// at [`Self::build`].
///
/// Variable declaration must finish before any predicate can be built,
/// since `biodivine_lib_bdd::BddVariableSet` is immutable once constructed
/// (see the [`BddManager`] documentation): declare every game variable with
/// [`Self::declare_variable`], call [`Self::finalize_variables`] with the
/// number of recurrence goals and persistence holds the game will have, then
/// use the returned manager to build the action, initial, goal and hold
/// predicates passed to the remaining setters.
pub struct CompiledGameBuilder {
    bdd: BddManagerBuilder,
    manager: Option<BddManager>,
    n_goals: usize,
    n_holds: usize,
    env_action: Option<Bdd>,
    sys_action: Option<Bdd>,
    env_init: Option<Bdd>,
    sys_init: Option<Bdd>,
    goals: Vec<Bdd>,
    holds: Vec<Bdd>,
    moore: bool,
    plus_one: bool,
    qinit: QInit,
}

impl CompiledGameBuilder {
    /// Create an empty builder with `moore = false`, `plus_one = false` and
    /// `qinit = QInit::ForallForall`.
    pub fn new() -> Self {
        Self {
            bdd: BddManagerBuilder::new(),
            manager: None,
            n_goals: 0,
            n_holds: 0,
            env_action: None,
            sys_action: None,
            env_init: None,
            sys_init: None,
            goals: Vec::new(),
            holds: Vec::new(),
            moore: false,
            plus_one: false,
            qinit: QInit::default(),
        }
    }

    /// Declare a game variable with the given owner and domain.
    ///
    /// # Panics
    ///
    /// Panics if [`Self::finalize_variables`] has already been called.
    pub fn declare_variable(&mut self, name: impl Into<String>, owner: Owner, domain: Domain) -> &mut Self {
        assert!(
            self.manager.is_none(),
            "cannot declare a variable after finalize_variables"
        );
        self.bdd.declare(name, owner, domain);
        self
    }

    /// Declares the `_goal` (and, for Rabin games, `_hold`) memory counters
    /// alongside the caller's own variables and finalizes the variable set,
    /// returning a [`BddManager`] that can build the predicates passed to
    /// [`Self::env_action`] and the other setters below.
    ///
    /// `n_goals` and `n_holds` must match the number of [`Self::add_goal`]
    /// and [`Self::add_hold`] calls that follow; [`Self::build`] checks this.
    ///
    /// Idempotent: calling this more than once returns the same manager
    /// without re-declaring variables.
    pub fn finalize_variables(&mut self, n_goals: usize, n_holds: usize) -> &BddManager {
        if self.manager.is_none() {
            self.n_goals = n_goals;
            self.n_holds = n_holds;
            self.bdd.declare(
                GOAL_VAR,
                Owner::Sys,
                Domain::Range { lo: 0, hi: n_goals.saturating_sub(1) as i64 },
            );
            self.bdd
                .declare(HOLD_VAR, Owner::Sys, Domain::Range { lo: 0, hi: n_holds as i64 });
            let bdd = std::mem::take(&mut self.bdd).build();
            self.manager = Some(bdd);
        }
        self.manager.as_ref().expect("just set")
    }

    /// Set the environment's transition relation.
    pub fn env_action(&mut self, action: Bdd) -> &mut Self {
        self.env_action = Some(action);
        self
    }

    /// Set the system's transition relation.
    pub fn sys_action(&mut self, action: Bdd) -> &mut Self {
        self.sys_action = Some(action);
        self
    }

    /// Set the environment's initial predicate.
    pub fn env_init(&mut self, init: Bdd) -> &mut Self {
        self.env_init = Some(init);
        self
    }

    /// Set the system's initial predicate.
    pub fn sys_init(&mut self, init: Bdd) -> &mut Self {
        self.sys_init = Some(init);
        self
    }

    /// Append a recurrence goal `G_j` (□◇).
    pub fn add_goal(&mut self, goal: Bdd) -> &mut Self {
        self.goals.push(goal);
        self
    }

    /// Append a persistence hold `H_i` (◇□).
    pub fn add_hold(&mut self, hold: Bdd) -> &mut Self {
        self.holds.push(hold);
        self
    }

    /// Set the Moore/Mealy flag.
    pub fn moore(&mut self, moore: bool) -> &mut Self {
        self.moore = moore;
        self
    }

    /// Set the `plus_one` controllable-action formulation flag.
    pub fn plus_one(&mut self, plus_one: bool) -> &mut Self {
        self.plus_one = plus_one;
        self
    }

    /// Set the initial-quantifier regime.
    pub fn qinit(&mut self, qinit: QInit) -> &mut Self {
        self.qinit = qinit;
        self
    }

    /// Validate the invariants and build the [`CompiledGame`].
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Configuration`] if [`Self::finalize_variables`]
    /// was never called, if any action or initial predicate was not set, if
    /// the goal or hold count does not match what was declared to
    /// `finalize_variables`, or if `env_init` is `false` (a vacuous
    /// specification).
    pub fn build(mut self) -> Result<CompiledGame, GameError> {
        let bdd = self
            .manager
            .take()
            .ok_or_else(|| GameError::Configuration("finalize_variables was never called".into()))?;
        let env_action = self
            .env_action
            .take()
            .ok_or_else(|| GameError::Configuration("env_action not set".into()))?;
        let sys_action = self
            .sys_action
            .take()
            .ok_or_else(|| GameError::Configuration("sys_action not set".into()))?;
        let env_init = self
            .env_init
            .take()
            .ok_or_else(|| GameError::Configuration("env_init not set".into()))?;
        let sys_init = self
            .sys_init
            .take()
            .ok_or_else(|| GameError::Configuration("sys_init not set".into()))?;
        if self.goals.len() != self.n_goals || self.goals.is_empty() {
            return Err(GameError::Configuration(format!(
                "expected {} recurrence goal(s), got {}",
                self.n_goals,
                self.goals.len()
            )));
        }
        if self.holds.len() != self.n_holds || self.holds.is_empty() {
            return Err(GameError::Configuration(format!(
                "expected {} persistence hold(s), got {}",
                self.n_holds,
                self.holds.len()
            )));
        }
        if self.qinit == QInit::ForallExists && self.moore {
            return Err(GameError::Configuration(
                "qinit = \\A \\E requires a Mealy system (moore = false)".into(),
            ));
        }
        if env_init == bdd.mk_false() {
            return Err(GameError::Configuration(
                "vacuous specification: env_init is false".into(),
            ));
        }

        Ok(CompiledGame {
            bdd,
            env_action,
            sys_action,
            env_init,
            sys_init,
            goals: self.goals,
            holds: self.holds,
            moore: self.moore,
            plus_one: self.plus_one,
            qinit: self.qinit,
            extra_sys_vars: Vec::new(),
            impl_action: None,
            impl_init_env: None,
            impl_init_sys: None,
            synthesized: false,
        })
    }
}

impl Default for CompiledGameBuilder {
    fn default() -> Self {
        Self::new()
    }
}
