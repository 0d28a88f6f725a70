//! Linear topologies on modules and continuity certificates.
//!
//! Every carrier is topologised by a *smallest open subgroup* `N`, its set of
//! infinitesimals: open sets are exactly the unions of cosets of `N`, and `N`
//! is the closure of `{0}`. In this setting:
//!
//! - an additive map `f` is continuous iff `f(N₁) ⊆ N₂`;
//! - the closure of a set `S` is `S + N`;
//! - the space separates points iff `N = {0}`.
//!
//! Continuity of the module operations is tracked by capability markers
//! ([`ContinuousAdd`], [`ContinuousSmul`], [`T2Space`]) so that combinators
//! which need them are rejected at compile time when they are absent.
//! Every map also carries a [`Continuity`] certificate recording how its
//! continuity was obtained; combinators rebuild the certificate from the
//! certificates of their inputs.
//!
//! # Citations
//! - Linear topologies: Bourbaki, "Commutative Algebra", Chapter III §1 (1972)
//! - Topological modules: Warner, "Topological Rings", Chapter 1 (1993)

use crate::algebra::{cartesian_power, AddGroup, Enumerable, Gaussian, Module, Pi, Prod, ScalarRing};
use serde::{Deserialize, Serialize};

/// An additive group with a linear topology.
///
/// # Invariant
/// `infinitesimals()` is a finite subgroup containing `origin()`.
pub trait TopologicalAddGroup: AddGroup {
    /// The smallest open subgroup, listed without repetition.
    fn infinitesimals() -> Vec<Self>;

    /// Whether `x` lies in the closure of `{0}`.
    fn is_infinitesimal(x: &Self) -> bool {
        Self::infinitesimals().contains(x)
    }

    /// Whether `x` and `y` cannot be separated by open sets.
    fn inseparable(x: &Self, y: &Self) -> bool {
        Self::is_infinitesimal(&x.minus(y))
    }
}

/// Addition `M × M → M` is continuous.
pub trait ContinuousAdd: TopologicalAddGroup {}

/// Scalar action `R × M → M` is continuous.
pub trait ContinuousSmul<R: ScalarRing>: TopologicalAddGroup + Module<R> {}

/// The topology separates points (`N = {0}`).
pub trait T2Space: TopologicalAddGroup {}

/// An `R`-module with a linear topology; the carrier of a continuous map.
pub trait Carrier<R: ScalarRing>: Module<R> + TopologicalAddGroup {}

impl<R: ScalarRing, M> Carrier<R> for M where M: Module<R> + TopologicalAddGroup {}

/// A module whose addition and scalar action are both continuous.
pub trait TopologicalModule<R: ScalarRing>: Carrier<R> + ContinuousAdd + ContinuousSmul<R> {}

impl<R: ScalarRing, M> TopologicalModule<R> for M where M: Carrier<R> + ContinuousAdd + ContinuousSmul<R> {}

// Scalar rings carry the discrete topology.
impl<R: ScalarRing> TopologicalAddGroup for R {
    fn infinitesimals() -> Vec<Self> {
        vec![R::zero()]
    }

    fn is_infinitesimal(x: &Self) -> bool {
        x.is_zero()
    }
}

impl<R: ScalarRing> ContinuousAdd for R {}
impl<R: ScalarRing> ContinuousSmul<R> for R {}
impl<R: ScalarRing> T2Space for R {}
impl<R: ScalarRing> ContinuousSmul<R> for Gaussian<R> {}

impl<A: TopologicalAddGroup, B: TopologicalAddGroup> TopologicalAddGroup for Prod<A, B> {
    fn infinitesimals() -> Vec<Self> {
        let left = A::infinitesimals();
        let right = B::infinitesimals();
        let mut out = Vec::with_capacity(left.len() * right.len());
        for a in &left {
            for b in &right {
                out.push(Prod(a.clone(), b.clone()));
            }
        }
        out
    }

    fn is_infinitesimal(x: &Self) -> bool {
        A::is_infinitesimal(&x.0) && B::is_infinitesimal(&x.1)
    }
}

impl<A: ContinuousAdd, B: ContinuousAdd> ContinuousAdd for Prod<A, B> {}
impl<R: ScalarRing, A: ContinuousSmul<R>, B: ContinuousSmul<R>> ContinuousSmul<R> for Prod<A, B> {}
impl<A: T2Space, B: T2Space> T2Space for Prod<A, B> {}

impl<M: TopologicalAddGroup, const N: usize> TopologicalAddGroup for Pi<M, N> {
    fn infinitesimals() -> Vec<Self> {
        cartesian_power(&M::infinitesimals(), N)
            .into_iter()
            .filter_map(|row| <[M; N]>::try_from(row).ok())
            .map(Pi)
            .collect()
    }

    fn is_infinitesimal(x: &Self) -> bool {
        x.0.iter().all(M::is_infinitesimal)
    }
}

impl<M: ContinuousAdd, const N: usize> ContinuousAdd for Pi<M, N> {}
impl<R: ScalarRing, M: ContinuousSmul<R>, const N: usize> ContinuousSmul<R> for Pi<M, N> {}
impl<M: T2Space, const N: usize> T2Space for Pi<M, N> {}

/// `M` with the indiscrete topology: the only open sets are `∅` and `M`.
///
/// Every point is infinitesimal, so every additive map into an indiscrete
/// module is continuous and every nonempty submodule is dense.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Indiscrete<M>(pub M);

impl<M: AddGroup> AddGroup for Indiscrete<M> {
    fn origin() -> Self {
        Self(M::origin())
    }

    fn plus(&self, other: &Self) -> Self {
        Self(self.0.plus(&other.0))
    }

    fn negate(&self) -> Self {
        Self(self.0.negate())
    }
}

impl<R: ScalarRing, M: Module<R>> Module<R> for Indiscrete<M> {
    fn smul(&self, r: &R) -> Self {
        Self(self.0.smul(r))
    }

    fn generators() -> Vec<Self> {
        M::generators().into_iter().map(Self).collect()
    }
}

impl<M: AddGroup + Enumerable> Enumerable for Indiscrete<M> {
    fn elements() -> Vec<Self> {
        M::elements().into_iter().map(Self).collect()
    }

    fn cardinality() -> usize {
        M::cardinality()
    }
}

impl<M: AddGroup + Enumerable> TopologicalAddGroup for Indiscrete<M> {
    fn infinitesimals() -> Vec<Self> {
        Self::elements()
    }

    fn is_infinitesimal(_x: &Self) -> bool {
        true
    }
}

impl<M: AddGroup + Enumerable> ContinuousAdd for Indiscrete<M> {}
impl<R: ScalarRing, M: Module<R> + Enumerable> ContinuousSmul<R> for Indiscrete<M> {}

/// Decides continuity of an additive map: `f(N₁) ⊆ N₂`.
pub fn check_continuous<M1, M2, F>(f: F) -> bool
where
    M1: TopologicalAddGroup,
    M2: TopologicalAddGroup,
    F: Fn(&M1) -> M2,
{
    M1::infinitesimals()
        .iter()
        .all(|n| M2::is_infinitesimal(&f(n)))
}

/// Derivation certificate explaining why a map is continuous.
///
/// Leaves are either primitive maps (continuous by construction), a decided
/// [`check_continuous`] (`Verified`), or an external assumption (`Assumed`).
/// Inner nodes mirror the combinator that produced the map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Continuity {
    /// Decided by checking `f(N₁) ⊆ N₂`.
    Verified,
    /// Supplied by an external collaborator, named by a reason.
    Assumed(String),
    Identity,
    Zero,
    Fst,
    Snd,
    Inl,
    Inr,
    /// Projection onto a component of a power.
    Proj(usize),
    /// `g ∘ f`, stored as `(g, f)`.
    Comp(Box<Continuity>, Box<Continuity>),
    Add(Box<Continuity>, Box<Continuity>),
    Neg(Box<Continuity>),
    Smul(Box<Continuity>),
    Prod(Box<Continuity>, Box<Continuity>),
    Coprod(Box<Continuity>, Box<Continuity>),
    Pi(Vec<Continuity>),
    /// Subspace topology on the restricted codomain.
    CodRestrict(Box<Continuity>),
    /// `x ↦ c(x) • m`, continuous through the scalar action.
    SmulRight(Box<Continuity>),
    RestrictScalars(Box<Continuity>),
    /// `n`-fold composite of an endomorphism.
    Pow(Box<Continuity>, u32),
}

impl Continuity {
    /// Certificate of `g ∘ f`.
    #[inline]
    pub fn comp(g: &Continuity, f: &Continuity) -> Self {
        Continuity::Comp(Box::new(g.clone()), Box::new(f.clone()))
    }

    /// Depth of the derivation tree.
    pub fn depth(&self) -> usize {
        match self {
            Continuity::Comp(a, b)
            | Continuity::Add(a, b)
            | Continuity::Prod(a, b)
            | Continuity::Coprod(a, b) => 1 + a.depth().max(b.depth()),
            Continuity::Neg(a)
            | Continuity::Smul(a)
            | Continuity::CodRestrict(a)
            | Continuity::SmulRight(a)
            | Continuity::RestrictScalars(a)
            | Continuity::Pow(a, _) => 1 + a.depth(),
            Continuity::Pi(family) => 1 + family.iter().map(Continuity::depth).max().unwrap_or(0),
            _ => 0,
        }
    }

    /// Whether any leaf is an external assumption.
    pub fn is_assumed(&self) -> bool {
        !self.assumptions().is_empty()
    }

    /// Reasons of all `Assumed` leaves, left to right.
    pub fn assumptions(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_assumptions(&mut out);
        out
    }

    fn collect_assumptions<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Continuity::Assumed(reason) => out.push(reason.as_str()),
            Continuity::Comp(a, b)
            | Continuity::Add(a, b)
            | Continuity::Prod(a, b)
            | Continuity::Coprod(a, b) => {
                a.collect_assumptions(out);
                b.collect_assumptions(out);
            }
            Continuity::Neg(a)
            | Continuity::Smul(a)
            | Continuity::CodRestrict(a)
            | Continuity::SmulRight(a)
            | Continuity::RestrictScalars(a)
            | Continuity::Pow(a, _) => a.collect_assumptions(out),
            Continuity::Pi(family) => {
                for c in family {
                    c.collect_assumptions(out);
                }
            }
            _ => {}
        }
    }
}
