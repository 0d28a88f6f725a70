//! Submodules as labelled membership predicates.
//!
//! A [`Submodule`] is closed under addition and the scalar action. Over an
//! arbitrary carrier it is just a predicate, so constructions that build one
//! (kernels, closures, preimages, intersections) are exact. On enumerable
//! carriers the set-level operations (`span`, `sup`, inclusion, extensional
//! equality, axiom verification) become decidable.

use crate::algebra::{AddGroup, Enumerable, Module, ScalarRing};
use crate::map::ContinuousLinearMap;
use crate::topology::Carrier;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use thiserror::Error;
use tracing::trace;

/// Errors raised by submodule constructions and checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmoduleError {
    /// A candidate projection leaves the submodule.
    #[error("map does not project onto {0}")]
    NotProjection(String),
    /// A candidate projection moves an element of the submodule.
    #[error("projection is not the identity on {0}")]
    NotIdentityOnSubmodule(String),
    /// `f1 ∘ f2 ≠ id`.
    #[error("second map is not a right inverse of the first")]
    NotRightInverse,
    /// A bounded search ran out of budget.
    #[error("search budget of {budget} candidates exceeded ({required} required)")]
    SearchBudgetExceeded { budget: usize, required: usize },
    /// A predicate is not closed under the module operations.
    #[error("{label} violates the submodule axiom: {axiom}")]
    AxiomViolated { label: String, axiom: &'static str },
}

/// A submodule of the `R`-module `M`.
pub struct Submodule<R, M> {
    label: String,
    membership: Arc<dyn Fn(&M) -> bool + Send + Sync>,
    _scalars: PhantomData<fn() -> R>,
}

impl<R, M> Clone for Submodule<R, M> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            membership: Arc::clone(&self.membership),
            _scalars: PhantomData,
        }
    }
}

impl<R, M> fmt::Debug for Submodule<R, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Submodule").field(&self.label).finish()
    }
}

impl<R: ScalarRing, M: Module<R>> Submodule<R, M> {
    /// A submodule given by a membership predicate, trusted to satisfy the
    /// axioms (see [`Submodule::verify`] on enumerable carriers).
    pub fn from_predicate(
        label: impl Into<String>,
        membership: impl Fn(&M) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            membership: Arc::new(membership),
            _scalars: PhantomData,
        }
    }

    /// `{0}`.
    pub fn bot() -> Self {
        Self::from_predicate("⊥", |x: &M| x.is_origin())
    }

    /// `M`.
    pub fn top() -> Self {
        Self::from_predicate("⊤", |_: &M| true)
    }

    /// Membership test.
    #[inline]
    pub fn contains(&self, x: &M) -> bool {
        (self.membership)(x)
    }

    /// Human-readable description.
    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether both handles share one membership predicate.
    pub(crate) fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.membership, &other.membership)
    }

    /// Same submodule under another label.
    pub fn relabel(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// `self ∩ other`.
    pub fn inf(&self, other: &Self) -> Self {
        let (a, b) = (Arc::clone(&self.membership), Arc::clone(&other.membership));
        Self::from_predicate(format!("({} ⊓ {})", self.label, other.label), move |x: &M| {
            a(x) && b(x)
        })
    }

    /// Preimage `f⁻¹(self)` along a continuous semilinear map.
    pub fn comap<R0, M0>(&self, f: &ContinuousLinearMap<R0, R, M0, M>) -> Submodule<R0, M0>
    where
        R0: ScalarRing,
        M0: Carrier<R0>,
        M: Carrier<R>,
    {
        let membership = Arc::clone(&self.membership);
        let f = f.clone();
        Submodule::from_predicate(format!("comap({})", self.label), move |x: &M0| {
            membership(&f.apply(x))
        })
    }
}

impl<R: ScalarRing, M: Module<R> + Enumerable> Submodule<R, M> {
    /// All members, in the carrier's listing order.
    pub fn elements(&self) -> Vec<M> {
        M::elements().into_iter().filter(|x| self.contains(x)).collect()
    }

    /// Inclusion `self ⊆ other`.
    pub fn le(&self, other: &Self) -> bool {
        M::elements()
            .iter()
            .all(|x| !self.contains(x) || other.contains(x))
    }

    /// Extensional equality of member sets.
    pub fn set_eq(&self, other: &Self) -> bool {
        M::elements()
            .iter()
            .all(|x| self.contains(x) == other.contains(x))
    }

    /// The smallest submodule containing `generators`.
    ///
    /// Computed as the closure of `{0} ∪ generators` under addition and the
    /// action of `R::probes()`, which spans whenever the probes generate `R`
    /// as a ring.
    pub fn span(generators: &[M]) -> Self {
        let members = Self::saturate(generators.to_vec());
        trace!(generators = generators.len(), members = members.len(), "span");
        let members = Arc::new(members);
        Self::from_predicate(format!("span({} vectors)", generators.len()), move |x: &M| {
            members.contains(x)
        })
    }

    /// `self + other`, the smallest submodule containing both.
    pub fn sup(&self, other: &Self) -> Self {
        let mut seeds = self.elements();
        seeds.extend(other.elements());
        let label = format!("({} ⊔ {})", self.label, other.label);
        Self::span(&seeds).relabel(label)
    }

    fn saturate(seeds: Vec<M>) -> Vec<M> {
        let probes = R::probes();
        let mut members: Vec<M> = vec![M::origin()];
        let mut frontier: Vec<M> = Vec::new();
        for s in seeds {
            if !members.contains(&s) {
                members.push(s.clone());
                frontier.push(s);
            }
        }
        while let Some(x) = frontier.pop() {
            let mut found = Vec::new();
            for r in &probes {
                found.push(x.smul(r));
            }
            for y in &members {
                found.push(x.plus(y));
            }
            for z in found {
                if !members.contains(&z) {
                    members.push(z.clone());
                    frontier.push(z);
                }
            }
        }
        members
    }

    /// Checks the submodule axioms over every element.
    pub fn verify(&self) -> Result<(), SubmoduleError> {
        let violated = |axiom| SubmoduleError::AxiomViolated {
            label: self.label.clone(),
            axiom,
        };
        if !self.contains(&M::origin()) {
            return Err(violated("contains zero"));
        }
        let members = self.elements();
        let probes = R::probes();
        for x in &members {
            for y in &members {
                if !self.contains(&x.plus(y)) {
                    return Err(violated("closed under addition"));
                }
            }
            for r in &probes {
                if !self.contains(&x.smul(r)) {
                    return Err(violated("closed under scalar action"));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::{Pi, Vector, Zmod};

    type F3 = Zmod<3>;
    type V = Vector<F3, 2>;

    fn f3(v: u64) -> F3 {
        F3::new(v)
    }

    #[test]
    fn bot_and_top() {
        let bot = Submodule::<F3, V>::bot();
        let top = Submodule::<F3, V>::top();
        assert_eq!(bot.elements(), vec![V::origin()]);
        assert_eq!(top.elements().len(), 9);
        assert!(bot.le(&top));
        assert!(!top.le(&bot));
        assert!(bot.verify().is_ok());
        assert!(top.verify().is_ok());
    }

    #[test]
    fn span_of_a_line() {
        let line = Submodule::<F3, V>::span(&[Pi([f3(1), f3(2)])]);
        assert_eq!(line.elements().len(), 3);
        assert!(line.contains(&Pi([f3(2), f3(1)])));
        assert!(!line.contains(&Pi([f3(1), f3(0)])));
        assert!(line.verify().is_ok());
    }

    #[test]
    fn sup_and_inf_of_axes() {
        let x_axis = Submodule::<F3, V>::from_predicate("x", |v: &V| v.0[1] == F3::new(0));
        let y_axis = Submodule::<F3, V>::from_predicate("y", |v: &V| v.0[0] == F3::new(0));
        assert!(x_axis.inf(&y_axis).set_eq(&Submodule::bot()));
        assert!(x_axis.sup(&y_axis).set_eq(&Submodule::top()));
        assert!(x_axis.le(&x_axis.sup(&y_axis)));
    }

    #[test]
    fn verify_rejects_non_submodules() {
        let odd = Submodule::<F3, V>::from_predicate("not closed", |v: &V| {
            v.0[0] == F3::new(1) || v.is_origin()
        });
        assert!(matches!(
            odd.verify(),
            Err(SubmoduleError::AxiomViolated { .. })
        ));
        let missing_zero = Submodule::<F3, V>::from_predicate("empty", |_: &V| false);
        assert!(missing_zero.verify().is_err());
    }

    #[test]
    fn integer_submodules_by_predicate() {
        let evens = Submodule::<i64, i64>::from_predicate("2ℤ", |x: &i64| x % 2 == 0);
        let threes = Submodule::<i64, i64>::from_predicate("3ℤ", |x: &i64| x % 3 == 0);
        let six = evens.inf(&threes);
        assert!(six.contains(&12));
        assert!(!six.contains(&4));
        assert!(six.label().contains("2ℤ"));
    }
}
