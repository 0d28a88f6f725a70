//! Finite products of modules.
//!
//! `Prod<A, B>` is the binary product (and coproduct) used by
//! `prod`/`coprod`/`fst`/`snd`/`inl`/`inr`; `Pi<M, N>` is the `N`-fold power
//! used by `pi`/`proj`. Local structs are used instead of tuples and arrays so
//! that their module structure never competes with foreign blanket impls.

use super::{cartesian_power, AddGroup, Enumerable, FreeModule, Module, ScalarRing};
use serde::{Deserialize, Serialize};

/// Binary product `A × B` with componentwise operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Prod<A, B>(pub A, pub B);

impl<A, B> Prod<A, B> {
    /// Creates the pair `(a, b)`.
    #[inline]
    pub fn new(a: A, b: B) -> Self {
        Self(a, b)
    }
}

impl<A: AddGroup, B: AddGroup> AddGroup for Prod<A, B> {
    fn origin() -> Self {
        Self(A::origin(), B::origin())
    }

    fn plus(&self, other: &Self) -> Self {
        Self(self.0.plus(&other.0), self.1.plus(&other.1))
    }

    fn negate(&self) -> Self {
        Self(self.0.negate(), self.1.negate())
    }
}

impl<R, A, B> Module<R> for Prod<A, B>
where
    R: ScalarRing,
    A: Module<R>,
    B: Module<R>,
{
    fn smul(&self, r: &R) -> Self {
        Self(self.0.smul(r), self.1.smul(r))
    }

    /// `(a, 0)` for each generator `a` of `A`, then `(0, b)` for each `b`.
    fn generators() -> Vec<Self> {
        let left = A::generators().into_iter().map(|a| Self(a, B::origin()));
        let right = B::generators().into_iter().map(|b| Self(A::origin(), b));
        left.chain(right).collect()
    }
}

impl<R, A, B> FreeModule<R> for Prod<A, B>
where
    R: ScalarRing,
    A: FreeModule<R>,
    B: FreeModule<R>,
{
    fn coordinates(&self) -> Vec<R> {
        let mut coords = self.0.coordinates();
        coords.extend(self.1.coordinates());
        coords
    }
}

impl<A: Enumerable + Clone, B: Enumerable + Clone> Enumerable for Prod<A, B> {
    fn elements() -> Vec<Self> {
        let left = A::elements();
        let right = B::elements();
        let mut out = Vec::with_capacity(left.len() * right.len());
        for a in &left {
            for b in &right {
                out.push(Self(a.clone(), b.clone()));
            }
        }
        out
    }

    fn cardinality() -> usize {
        A::cardinality().saturating_mul(B::cardinality())
    }
}

/// `N`-fold power `M^N` with componentwise operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pi<M, const N: usize>(pub [M; N]);

/// Coordinate space `R^N`.
pub type Vector<R, const N: usize> = Pi<R, N>;

impl<M, const N: usize> Pi<M, N> {
    /// Wraps an array of components.
    #[inline]
    pub fn new(components: [M; N]) -> Self {
        Self(components)
    }

    /// Component `i`, if in range.
    #[inline]
    pub fn get(&self, i: usize) -> Option<&M> {
        self.0.get(i)
    }

    /// All components.
    #[inline]
    pub fn components(&self) -> &[M; N] {
        &self.0
    }
}

impl<M: AddGroup, const N: usize> Pi<M, N> {
    /// Element that is `m` in slot `i` and zero elsewhere.
    pub fn single(i: usize, m: M) -> Self {
        Self(std::array::from_fn(|j| if j == i { m.clone() } else { M::origin() }))
    }
}

impl<M: AddGroup, const N: usize> AddGroup for Pi<M, N> {
    fn origin() -> Self {
        Self(std::array::from_fn(|_| M::origin()))
    }

    fn plus(&self, other: &Self) -> Self {
        Self(std::array::from_fn(|i| self.0[i].plus(&other.0[i])))
    }

    fn negate(&self) -> Self {
        Self(std::array::from_fn(|i| self.0[i].negate()))
    }
}

impl<R, M, const N: usize> Module<R> for Pi<M, N>
where
    R: ScalarRing,
    M: Module<R>,
{
    fn smul(&self, r: &R) -> Self {
        Self(std::array::from_fn(|i| self.0[i].smul(r)))
    }

    /// Injections of the generators of `M`, slot by slot.
    fn generators() -> Vec<Self> {
        let base = M::generators();
        (0..N)
            .flat_map(|i| base.iter().map(move |g| Self::single(i, g.clone())))
            .collect()
    }
}

impl<R, M, const N: usize> FreeModule<R> for Pi<M, N>
where
    R: ScalarRing,
    M: FreeModule<R>,
{
    fn coordinates(&self) -> Vec<R> {
        self.0.iter().flat_map(|m| m.coordinates()).collect()
    }
}

impl<M: Enumerable + Clone, const N: usize> Enumerable for Pi<M, N> {
    fn elements() -> Vec<Self> {
        cartesian_power(&M::elements(), N)
            .into_iter()
            .filter_map(|row| <[M; N]>::try_from(row).ok())
            .map(Self)
            .collect()
    }

    fn cardinality() -> usize {
        let base = M::cardinality();
        (0..N).fold(1usize, |acc, _| acc.saturating_mul(base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::Zmod;

    #[test]
    fn vector_basis_and_coordinates() {
        let gens = <Vector<i64, 3> as Module<i64>>::generators();
        assert_eq!(gens.len(), 3);
        assert_eq!(gens[1], Pi([0, 1, 0]));

        let v = Pi([4i64, -2, 7]);
        let coords = <Vector<i64, 3> as FreeModule<i64>>::coordinates(&v);
        assert_eq!(coords, vec![4, -2, 7]);
        assert_eq!(<Vector<i64, 3> as FreeModule<i64>>::from_coordinates(&coords), v);
    }

    #[test]
    fn product_generators_are_injections() {
        let gens = <Prod<i64, Vector<i64, 2>> as Module<i64>>::generators();
        assert_eq!(
            gens,
            vec![
                Prod(1, Pi([0, 0])),
                Prod(0, Pi([1, 0])),
                Prod(0, Pi([0, 1])),
            ]
        );
    }

    #[test]
    fn componentwise_arithmetic() {
        let a = Prod(3i64, Pi([1i64, 2]));
        let b = Prod(-1i64, Pi([5i64, 5]));
        assert_eq!(a.plus(&b), Prod(2, Pi([6, 7])));
        assert_eq!(a.smul(&2i64), Prod(6, Pi([2, 4])));
        assert!(a.minus(&a).is_origin());
    }

    #[test]
    fn enumeration_of_powers() {
        assert_eq!(<Vector<Zmod<3>, 2>>::cardinality(), 9);
        assert_eq!(<Prod<Zmod<2>, Zmod<3>>>::cardinality(), 6);
        assert_eq!(<Vector<Zmod<2>, 0>>::elements(), vec![Pi([])]);
        assert_eq!(<Vector<Zmod<2>, 0>>::cardinality(), 1);
    }

    #[test]
    fn cardinality_of_large_powers_is_not_listed() {
        type Big = Zmod<1_000_003>;
        assert_eq!(<Vector<Big, 2>>::cardinality(), 1_000_003usize.saturating_mul(1_000_003));
        assert_eq!(<Prod<Big, Vector<Big, 2>>>::cardinality(), <Vector<Big, 3>>::cardinality());
        assert_eq!(<Vector<Vector<Big, 4>, 4>>::cardinality(), usize::MAX);
    }
}
