//! Thin contract over a shared Boolean-function engine.
//!
//! [`BddManager`] is the only place in this crate that talks to a concrete BDD
//! library. It is built once per game from a set of declared variables and
//! hands out constants, connectives, quantification, the unprimed-to-primed
//! substitution used throughout the solvers, and a small typed predicate
//! builder that replaces the source algorithm's string expression language
//! (`add_expr("(c = i) /\ (c' = ip)")`) with direct BDD construction.
//!
//! The underlying engine is [`biodivine_lib_bdd`]; see `DESIGN.md` for why a
//! vendored CUDD binding was not carried forward.

use std::collections::HashMap;

use biodivine_lib_bdd::{Bdd, BddVariable, BddVariableSet, BddVariableSetBuilder};

use crate::game::{Domain, Owner};

/// Bit-level declaration of one game variable: its owner, its domain, and the
/// ordered lists of unprimed and primed BDD variables that encode it.
///
/// Boolean variables use a single bit; bounded-integer variables use a
/// fixed-width binary encoding of `value - lo`, least-significant bit first.
#[derive(Debug, Clone)]
struct VarDecl {
    owner: Owner,
    domain: Domain,
    bits: Vec<BddVariable>,
    bits_next: Vec<BddVariable>,
}

/// Builds a [`BddManager`] by declaring variables one at a time, mirroring
/// the order in which a compiled game would declare them.
#[derive(Debug, Default)]
pub struct BddManagerBuilder {
    builder: BddVariableSetBuilder,
    decls: HashMap<String, VarDecl>,
    order: Vec<String>,
}

impl BddManagerBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            builder: BddVariableSetBuilder::new(),
            decls: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Declare a variable with the given owner and domain.
    ///
    /// Both an unprimed and a primed BDD encoding are allocated; for a
    /// bounded-integer domain `(lo, hi)` the number of bits is
    /// `ceil(log2(hi - lo + 1))`.
    ///
    /// # Panics
    ///
    /// Panics if `name` was already declared, or if a `Domain::Range` has
    /// `hi < lo`. Both are programming errors in the caller that constructs
    /// the game, not a condition arising from solving.
    pub fn declare(&mut self, name: impl Into<String>, owner: Owner, domain: Domain) -> &mut Self {
        let name = name.into();
        assert!(
            !self.decls.contains_key(&name),
            "variable `{}` already declared",
            name
        );
        let n_bits = bits_for_domain(&domain);
        let mut bits = Vec::with_capacity(n_bits.max(1));
        let mut bits_next = Vec::with_capacity(n_bits.max(1));
        if n_bits == 0 {
            // single-valued domain (e.g. a synthesized counter with one goal):
            // no bits are needed, the variable's value is always its lower bound.
        } else if n_bits == 1 && matches!(domain, Domain::Bool) {
            bits.push(self.builder.make_variable(&name));
            bits_next.push(self.builder.make_variable(&format!("{}'", name)));
        } else {
            for i in 0..n_bits {
                bits.push(self.builder.make_variable(&format!("{}#{}", name, i)));
                bits_next.push(self.builder.make_variable(&format!("{}'#{}", name, i)));
            }
        }
        self.decls.insert(
            name.clone(),
            VarDecl {
                owner,
                domain,
                bits,
                bits_next,
            },
        );
        self.order.push(name);
        self
    }

    /// Finalize the variable set and return a [`BddManager`].
    pub fn build(self) -> BddManager {
        BddManager {
            variables: self.builder.build(),
            decls: self.decls,
            order: self.order,
        }
    }
}

fn bits_for_domain(domain: &Domain) -> usize {
    match *domain {
        Domain::Bool => 1,
        Domain::Range { lo, hi } => {
            assert!(hi >= lo, "empty range domain ({}, {})", lo, hi);
            let n = (hi - lo + 1) as u64;
            if n <= 1 {
                0
            } else {
                64 - (n - 1).leading_zeros() as usize
            }
        }
    }
}

/// Owns the shared [`BddVariableSet`] for one game and provides the kernel
/// contract used by every predecessor operator, fixpoint solver and
/// synthesizer: constants, quantification, priming substitution, support,
/// and the typed predicate builder.
///
/// `BddManager` is cheap to clone: `biodivine_lib_bdd::BddVariableSet` is a
/// plain immutable description of the variable ordering, and every `Bdd`
/// value is a self-contained array, so no reference-counted arena needs to
/// be threaded between games that share a variable ordering (see
/// [`crate::trivial::trivial_winning_set`], which dualizes a game in place).
#[derive(Debug, Clone)]
pub struct BddManager {
    variables: BddVariableSet,
    decls: HashMap<String, VarDecl>,
    order: Vec<String>,
}

impl BddManager {
    /// The constant `true` predicate.
    pub fn mk_true(&self) -> Bdd {
        self.variables.mk_true()
    }

    /// The constant `false` predicate.
    pub fn mk_false(&self) -> Bdd {
        self.variables.mk_false()
    }

    /// The names of all declared variables, in declaration order.
    pub fn variable_names(&self) -> &[String] {
        &self.order
    }

    /// The owner of a declared variable.
    pub fn owner(&self, name: &str) -> Owner {
        self.decl(name).owner
    }

    /// The domain of a declared variable.
    pub fn domain(&self, name: &str) -> Domain {
        self.decl(name).domain
    }

    fn decl(&self, name: &str) -> &VarDecl {
        self.decls
            .get(name)
            .unwrap_or_else(|| panic!("undeclared variable `{}`", name))
    }

    /// The unprimed literal of a Boolean variable.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not a `Domain::Bool` variable.
    pub fn var(&self, name: &str) -> Bdd {
        let decl = self.decl(name);
        assert!(matches!(decl.domain, Domain::Bool), "`{}` is not boolean", name);
        self.variables.mk_var(decl.bits[0])
    }

    /// The primed literal of a Boolean variable.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not a `Domain::Bool` variable.
    pub fn var_next(&self, name: &str) -> Bdd {
        let decl = self.decl(name);
        assert!(matches!(decl.domain, Domain::Bool), "`{}` is not boolean", name);
        self.variables.mk_var(decl.bits_next[0])
    }

    /// The unprimed BDD variables encoding `name`, low bit first.
    pub fn bits(&self, name: &str) -> &[BddVariable] {
        &self.decl(name).bits
    }

    /// The primed BDD variables encoding `name`, low bit first.
    pub fn bits_next(&self, name: &str) -> &[BddVariable] {
        &self.decl(name).bits_next
    }

    /// All unprimed BDD variables owned by `owner`, across every declared
    /// game variable. Used to build `varlist[env]`/`varlist[sys]`.
    pub fn owned_bits(&self, owner: Owner) -> Vec<BddVariable> {
        self.order
            .iter()
            .filter(|name| self.decls[*name].owner == owner)
            .flat_map(|name| self.decls[name].bits.iter().copied())
            .collect()
    }

    /// All primed BDD variables owned by `owner`. Used to build
    /// `varlist[env']`/`varlist[sys']`, in particular for the Moore
    /// quantification in [`crate::pre::cpre`] and [`crate::pre::cact`].
    pub fn owned_bits_next(&self, owner: Owner) -> Vec<BddVariable> {
        self.order
            .iter()
            .filter(|name| self.decls[*name].owner == owner)
            .flat_map(|name| self.decls[name].bits_next.iter().copied())
            .collect()
    }

    /// A manager over the same variable ordering and bit encodings, but with
    /// every declared variable's owner flipped (env becomes sys and vice
    /// versa). Used by [`crate::trivial::trivial_winning_set`] to dualize a
    /// game without re-declaring its variables.
    pub(crate) fn with_swapped_owners(&self) -> BddManager {
        let decls = self
            .decls
            .iter()
            .map(|(name, decl)| {
                let owner = match decl.owner {
                    Owner::Env => Owner::Sys,
                    Owner::Sys => Owner::Env,
                };
                (
                    name.clone(),
                    VarDecl {
                        owner,
                        domain: decl.domain,
                        bits: decl.bits.clone(),
                        bits_next: decl.bits_next.clone(),
                    },
                )
            })
            .collect();
        BddManager {
            variables: self.variables.clone(),
            decls,
            order: self.order.clone(),
        }
    }

    /// Existentially quantify `u` over `vars`, one variable at a time.
    pub fn exist(&self, vars: &[BddVariable], u: &Bdd) -> Bdd {
        vars.iter().fold(u.clone(), |acc, &v| acc.var_exists(v))
    }

    /// Universally quantify `u` over `vars`, one variable at a time.
    pub fn forall(&self, vars: &[BddVariable], u: &Bdd) -> Bdd {
        vars.iter().fold(u.clone(), |acc, &v| acc.var_for_all(v))
    }

    /// Substitute every declared unprimed variable in `u` by its primed
    /// counterpart.
    ///
    /// `u` is expected to be a state predicate (support only over unprimed
    /// variables), as is always the case for the targets passed to
    /// [`crate::pre::cpre`] and [`crate::pre::cact`]. The substitution is
    /// implemented by the standard relational-product identity
    /// `u[x'/x] = \exists x. u(x) \land (x \iff x')`, since the underlying
    /// engine has no in-place rename primitive.
    pub fn prime(&self, u: &Bdd) -> Bdd {
        let mut acc = u.clone();
        let mut quantified = Vec::new();
        for name in &self.order {
            let decl = &self.decls[name];
            for (&x, &xp) in decl.bits.iter().zip(decl.bits_next.iter()) {
                let eq = self.variables.mk_var(x).iff(&self.variables.mk_var(xp));
                acc = acc.and(&eq);
                quantified.push(x);
            }
        }
        self.exist(&quantified, &acc)
    }

    /// The declared (unprimed) variable names that `u` actually depends on.
    pub fn support(&self, u: &Bdd) -> Vec<String> {
        let support_vars = u.support_set();
        self.order
            .iter()
            .filter(|name| {
                self.decls[*name]
                    .bits
                    .iter()
                    .any(|v| support_vars.contains(v))
            })
            .cloned()
            .collect()
    }

    /// The declared variable names whose *primed* encoding `u` depends on.
    /// Used by [`crate::realizability::warn_moore_mealy`] to detect actions
    /// that depend on the opponent's simultaneous move.
    pub fn support_primed(&self, u: &Bdd) -> Vec<String> {
        let support_vars = u.support_set();
        self.order
            .iter()
            .filter(|name| {
                self.decls[*name]
                    .bits_next
                    .iter()
                    .any(|v| support_vars.contains(v))
            })
            .cloned()
            .collect()
    }

    /// `true` iff `u`'s support contains no primed variable of any declared
    /// game variable, i.e. `u` is a state predicate.
    pub fn is_state_predicate(&self, u: &Bdd) -> bool {
        let support_vars = u.support_set();
        self.order
            .iter()
            .all(|name| !self.decls[name].bits_next.iter().any(|v| support_vars.contains(v)))
    }

    /// The predicate `name = value` over the unprimed encoding of `name`.
    ///
    /// # Panics
    ///
    /// Panics if `value` is outside the declared domain of `name`.
    pub fn eq_const(&self, name: &str, value: i64) -> Bdd {
        self.const_predicate(name, value, false)
    }

    /// The predicate `name' = value` over the primed encoding of `name`.
    ///
    /// # Panics
    ///
    /// Panics if `value` is outside the declared domain of `name`.
    pub fn next_eq_const(&self, name: &str, value: i64) -> Bdd {
        self.const_predicate(name, value, true)
    }

    fn const_predicate(&self, name: &str, value: i64, primed: bool) -> Bdd {
        let decl = self.decl(name);
        let lo = match decl.domain {
            Domain::Bool => 0,
            Domain::Range { lo, .. } => lo,
        };
        let hi = match decl.domain {
            Domain::Bool => 1,
            Domain::Range { hi, .. } => hi,
        };
        assert!(
            (lo..=hi).contains(&value),
            "value {} out of domain ({}, {}) for `{}`",
            value,
            lo,
            hi,
            name
        );
        let bits = if primed { &decl.bits_next } else { &decl.bits };
        if bits.is_empty() {
            // single-valued domain: the only possible value is `lo`.
            return self.mk_true();
        }
        let offset = (value - lo) as u64;
        let mut acc = self.mk_true();
        for (i, &bit) in bits.iter().enumerate() {
            let want = (offset >> i) & 1 == 1;
            let lit = self.variables.mk_literal(bit, want);
            acc = acc.and(&lit);
        }
        acc
    }

    /// The predicate `name' = name`: the variable's value is unchanged by the
    /// transition. Used by memory-counter strategies to express "this part of
    /// memory does not move this step" without pinning it to a literal value.
    pub fn unchanged(&self, name: &str) -> Bdd {
        let decl = self.decl(name);
        let mut acc = self.mk_true();
        for (&x, &xp) in decl.bits.iter().zip(decl.bits_next.iter()) {
            let eq = self.variables.mk_var(x).iff(&self.variables.mk_var(xp));
            acc = acc.and(&eq);
        }
        acc
    }

    /// The predicate `lo <= name <= hi`, over the unprimed encoding of
    /// `name`. Used to bound a synthesized memory counter to its declared
    /// range.
    pub fn in_range(&self, name: &str, lo: i64, hi: i64) -> Bdd {
        let decl = self.decl(name);
        let (dom_lo, dom_hi) = match decl.domain {
            Domain::Bool => (0, 1),
            Domain::Range { lo, hi } => (lo, hi),
        };
        let mut acc = self.mk_false();
        for value in lo.max(dom_lo)..=hi.min(dom_hi) {
            acc = acc.or(&self.eq_const(name, value));
        }
        acc
    }
}
