//! Injectable sink for advisory (non-fatal) warnings.
//!
//! The original algorithm reports a handful of advisory conditions — Moore/Mealy
//! suspicions, vacuity of the `qinit = "\A \A"` regime — with a bare `print`.
//! Routing those through a global logger would make them indistinguishable from
//! ordinary progress tracing and impossible for an embedding caller to collect,
//! so they are instead pushed to a [`Diagnostics`] sink supplied by the caller.

use std::fmt;

/// A single advisory condition raised during realizability checking or
/// strategy synthesis. Never fatal: the solver always continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// `qinit = "\A \A"` but `ι_env` does not imply `ι_sys`.
    VacuousInitNotImpliedBySys,
    /// `qinit = "\A \A"` but `ι_env` does not imply that the system has a move.
    VacuousInitNoSysMove,
    /// The system is declared Moore, but its action depends on primed
    /// environment variables.
    MooreDependsOnPrimedEnv,
    /// The system is declared Mealy, and the environment's action depends on
    /// primed system variables.
    MealyEnvDependsOnPrimedSys,
    /// The environment's action depends on primed system variables
    /// regardless of the Moore/Mealy flag.
    EnvDependsOnPrimedSys,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::VacuousInitNotImpliedBySys => {
                "qinit = forall/forall but not (EnvInit => SysInit)"
            }
            Self::VacuousInitNoSysMove => {
                "qinit = forall/forall but not (EnvInit => exists sys': SysNext)"
            }
            Self::MooreDependsOnPrimedEnv => {
                "Moore sys, but sys depends on primed env vars"
            }
            Self::MealyEnvDependsOnPrimedSys => {
                "Mealy sys, and assumption depends on primed sys vars; \
                 if env has to be Mealy too, this can cycle"
            }
            Self::EnvDependsOnPrimedSys => {
                "assumption depends on primed sys vars; \
                 is a Mealy env realistic for this problem?"
            }
        };
        write!(f, "{}", msg)
    }
}

/// A sink that collects [`Diagnostic`]s raised while solving or synthesizing.
///
/// The default implementation simply accumulates diagnostics in a `Vec`,
/// which is usually what a caller wants (inspect after the call returns).
/// Implement the trait directly to forward diagnostics elsewhere, e.g. into
/// an application's own warning channel.
pub trait Diagnostics {
    /// Record a diagnostic.
    fn push(&mut self, diagnostic: Diagnostic);
}

/// A [`Diagnostics`] sink that accumulates diagnostics into a `Vec`.
#[derive(Debug, Default, Clone)]
pub struct DiagnosticLog {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the diagnostics recorded so far, in the order they were raised.
    pub fn entries(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Returns `true` if no diagnostics were recorded.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl Diagnostics for DiagnosticLog {
    fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

/// A [`Diagnostics`] sink that discards everything. Useful for tests and
/// callers that do not care about advisory conditions.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDiagnostics;

impl Diagnostics for NullDiagnostics {
    fn push(&mut self, _diagnostic: Diagnostic) {}
}
