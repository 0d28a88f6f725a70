//! Continuous semilinear maps.
//!
//! A [`ContinuousLinearMap<R, S, M1, M2>`] bundles an additive function
//! `f : M1 → M2` with a transport `σ : R → S` such that `f(r • x) = σ(r) • f(x)`,
//! and a [`Continuity`] certificate. Every combinator derives the certificate
//! of its result from the certificates of its inputs; nothing is copied.
//!
//! Two maps are equal when they agree pointwise. For additive maps with the
//! same transport this is decided exactly on the generators of `M1`.
//!
//! # Composition
//!
//! Composition of `g : (σ23, M2 → M3)` after `f : (σ12, M1 → M2)` is a
//! `σ13`-map whenever `σ13 = σ23 ∘ σ12`. Three entry points:
//!
//! - [`ContinuousLinearMap::comp`]: `σ13` is the concatenated word, always legal;
//! - [`ContinuousLinearMap::comp_in`]: `σ13` is normalised by a registry;
//! - [`ContinuousLinearMap::comp_with`]: `σ13` is taken from a checked
//!   [`CompTriple`], whose `σ12`/`σ23` must be the maps' own transports.
//!
//! # Citations
//! - Semilinear maps: Bourbaki, "Algebra I", Chapter II §1.13 (1974)
//! - Continuous linear maps on topological modules: Warner, "Topological Rings", §6 (1993)

use crate::algebra::{AddGroup, Enumerable, FreeModule, Module, ScalarRing};
use crate::submodule::Submodule;
use crate::topology::{check_continuous, Carrier, Continuity, ContinuousAdd, ContinuousSmul};
use crate::transport::{CompTriple, Surjective, Transport, TransportError, TransportRegistry};
use std::fmt;
use std::ops::{Mul, Neg};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

pub mod product;
pub mod restrict;

pub use product::{fst, inl, inr, pi, proj, snd};
pub use restrict::{CodRestricted, ImageWitness, ScalarTower};

/// Errors raised while building maps.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// Some infinitesimal of the domain is sent outside the infinitesimals
    /// of the codomain.
    #[error("map is not continuous")]
    NotContinuous,
    #[error("map is not additive on generators {left} and {right}")]
    NotAdditive { left: usize, right: usize },
    #[error("map is not semilinear on generator {generator} at scalar {probe}")]
    NotSemilinear { generator: usize, probe: String },
    #[error("image of generator {generator} escapes {submodule}")]
    ImageEscapes { generator: usize, submodule: String },
    #[error("expected {expected} basis images, found {found}")]
    BasisLength { expected: usize, found: usize },
    #[error("scalar tower law fails on generator {generator} at scalar {probe}")]
    TowerLawFails { generator: usize, probe: String },
    #[error("witness was issued for a different map or submodule")]
    WitnessMismatch,
    #[error("index {index} out of range for a product of {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("empty family")]
    EmptyFamily,
}

/// A continuous `σ`-semilinear map `M1 → M2` with `σ : R → S`.
pub struct ContinuousLinearMap<R, S, M1, M2> {
    transport: Transport<R, S>,
    func: Arc<dyn Fn(&M1) -> M2 + Send + Sync>,
    continuity: Continuity,
}

/// Continuous linear map (identity transport).
pub type ClMap<R, M1, M2> = ContinuousLinearMap<R, R, M1, M2>;

/// Continuous linear endomorphism.
pub type End<R, M> = ClMap<R, M, M>;

impl<R, S, M1, M2> Clone for ContinuousLinearMap<R, S, M1, M2> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            func: Arc::clone(&self.func),
            continuity: self.continuity.clone(),
        }
    }
}

impl<R, S, M1, M2> fmt::Debug for ContinuousLinearMap<R, S, M1, M2> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContinuousLinearMap")
            .field("transport", &self.transport)
            .field("continuity", &self.continuity)
            .finish_non_exhaustive()
    }
}

impl<R, S, M1, M2> ContinuousLinearMap<R, S, M1, M2>
where
    R: ScalarRing,
    S: ScalarRing,
    M1: Carrier<R>,
    M2: Carrier<S>,
{
    pub(crate) fn from_parts(
        transport: Transport<R, S>,
        func: impl Fn(&M1) -> M2 + Send + Sync + 'static,
        continuity: Continuity,
    ) -> Self {
        Self {
            transport,
            func: Arc::new(func),
            continuity,
        }
    }

    /// Wraps a map whose linearity and continuity are established
    /// elsewhere. The certificate records `reason`.
    pub fn assume_continuous(
        transport: Transport<R, S>,
        func: impl Fn(&M1) -> M2 + Send + Sync + 'static,
        reason: impl Into<String>,
    ) -> Self {
        Self::from_parts(transport, func, Continuity::Assumed(reason.into()))
    }

    /// Wraps a function after probing additivity and semilinearity on the
    /// generators of `M1` and deciding continuity.
    pub fn from_fn(
        transport: Transport<R, S>,
        func: impl Fn(&M1) -> M2 + Send + Sync + 'static,
    ) -> Result<Self, MapError> {
        let gens = M1::generators();
        for (i, a) in gens.iter().enumerate() {
            for (j, b) in gens.iter().enumerate().skip(i) {
                if func(&a.plus(b)) != func(a).plus(&func(b)) {
                    return Err(MapError::NotAdditive { left: i, right: j });
                }
            }
            for r in R::probes() {
                if func(&a.smul(&r)) != func(a).smul(&transport.apply(&r)) {
                    return Err(MapError::NotSemilinear {
                        generator: i,
                        probe: format!("{:?}", r),
                    });
                }
            }
        }
        if !check_continuous::<M1, M2, _>(&func) {
            return Err(MapError::NotContinuous);
        }
        Ok(Self::from_parts(transport, func, Continuity::Verified))
    }

    /// The zero map with transport `σ`.
    pub fn zero_with(transport: Transport<R, S>) -> Self {
        Self::from_parts(transport, |_: &M1| M2::origin(), Continuity::Zero)
    }

    /// Evaluates `f(x)`.
    #[inline]
    pub fn apply(&self, x: &M1) -> M2 {
        (self.func)(x)
    }

    /// The transport `σ`.
    #[inline]
    pub fn transport(&self) -> &Transport<R, S> {
        &self.transport
    }

    /// How continuity was established.
    #[inline]
    pub fn continuity(&self) -> &Continuity {
        &self.continuity
    }

    /// Points on which extensional equality is decided: the generators of
    /// `M1` and their multiples by the probe scalars.
    fn test_points() -> Vec<M1> {
        let gens = M1::generators();
        let mut points = gens.clone();
        for r in R::probes() {
            points.extend(gens.iter().map(|g| g.smul(&r)));
        }
        points
    }

    /// Whether both handles share one underlying function.
    pub(crate) fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }

    /// Pointwise equality (exact for maps with the same transport).
    pub fn ext_eq(&self, other: &Self) -> bool {
        Self::test_points()
            .iter()
            .all(|x| self.apply(x) == other.apply(x))
    }

    /// Whether `f = 0`.
    pub fn is_zero(&self) -> bool {
        Self::test_points().iter().all(|x| self.apply(x).is_origin())
    }

    /// `self ∘ f` with the concatenated transport word.
    pub fn comp<R0, M0>(&self, f: &ContinuousLinearMap<R0, R, M0, M1>) -> ContinuousLinearMap<R0, S, M0, M2>
    where
        R0: ScalarRing,
        M0: Carrier<R0>,
    {
        let (g_fn, f_fn) = (Arc::clone(&self.func), Arc::clone(&f.func));
        ContinuousLinearMap::from_parts(
            f.transport.then(&self.transport),
            move |x: &M0| g_fn(&f_fn(x)),
            Continuity::comp(&self.continuity, &f.continuity),
        )
    }

    /// `self ∘ f` with the transport normalised by `registry`.
    pub fn comp_in<R0, M0>(
        &self,
        f: &ContinuousLinearMap<R0, R, M0, M1>,
        registry: &TransportRegistry,
    ) -> ContinuousLinearMap<R0, S, M0, M2>
    where
        R0: ScalarRing,
        M0: Carrier<R0>,
    {
        let triple = CompTriple::canonical(registry, &f.transport, &self.transport);
        let mut composite = self.comp(f);
        composite.transport = triple.composite().clone();
        composite
    }

    /// `self ∘ f` over a checked triple `(σ12, σ23, σ13)`.
    ///
    /// Rejected unless `σ12` is the transport of `f` and `σ23` that of `self`.
    pub fn comp_with<R0, M0>(
        &self,
        f: &ContinuousLinearMap<R0, R, M0, M1>,
        triple: &CompTriple<R0, R, S>,
    ) -> Result<ContinuousLinearMap<R0, S, M0, M2>, MapError>
    where
        R0: ScalarRing,
        M0: Carrier<R0>,
    {
        if triple.first().symbol() != f.transport.symbol() {
            return Err(TransportError::TransportMismatch {
                expected: triple.first().symbol().clone(),
                found: f.transport.symbol().clone(),
            }
            .into());
        }
        if triple.second().symbol() != self.transport.symbol() {
            return Err(TransportError::TransportMismatch {
                expected: triple.second().symbol().clone(),
                found: self.transport.symbol().clone(),
            }
            .into());
        }
        debug!(composite = %triple.composite().symbol(), "compose over checked triple");
        let mut composite = self.comp(f);
        composite.transport = triple.composite().clone();
        Ok(composite)
    }

    fn same_transport(&self, other: &Self) -> Result<(), MapError> {
        if self.transport.symbol() != other.transport.symbol() {
            return Err(TransportError::TransportMismatch {
                expected: self.transport.symbol().clone(),
                found: other.transport.symbol().clone(),
            }
            .into());
        }
        Ok(())
    }

    /// The kernel `f⁻¹(0)`.
    pub fn kernel(&self) -> Submodule<R, M1> {
        let f = Arc::clone(&self.func);
        Submodule::from_predicate(format!("ker[{}]", self.transport.symbol()), move |x: &M1| {
            f(x).is_origin()
        })
    }

    /// The image `f(M1)`, a submodule once `σ` is surjective.
    pub fn range(&self, surjective: &Surjective<R, S>) -> Result<Submodule<S, M2>, MapError>
    where
        M1: Enumerable,
    {
        if surjective.transport().symbol() != self.transport.symbol() {
            return Err(TransportError::TransportMismatch {
                expected: surjective.transport().symbol().clone(),
                found: self.transport.symbol().clone(),
            }
            .into());
        }
        let mut image: Vec<M2> = Vec::new();
        for x in M1::elements() {
            let y = self.apply(&x);
            if !image.contains(&y) {
                image.push(y);
            }
        }
        let image = Arc::new(image);
        Ok(Submodule::from_predicate(
            format!("range[{}]", self.transport.symbol()),
            move |y: &M2| image.contains(y),
        ))
    }
}

impl<R, S, M1, M2> ContinuousLinearMap<R, S, M1, M2>
where
    R: ScalarRing,
    S: ScalarRing,
    M1: Carrier<R>,
    M2: Carrier<S> + ContinuousAdd,
{
    /// `x ↦ f(x) + g(x)`.
    pub fn add(&self, other: &Self) -> Result<Self, MapError> {
        self.same_transport(other)?;
        let (f, g) = (Arc::clone(&self.func), Arc::clone(&other.func));
        Ok(Self::from_parts(
            self.transport.clone(),
            move |x: &M1| f(x).plus(&g(x)),
            Continuity::Add(Box::new(self.continuity.clone()), Box::new(other.continuity.clone())),
        ))
    }

    /// `x ↦ -f(x)`.
    pub fn neg(&self) -> Self {
        let f = Arc::clone(&self.func);
        Self::from_parts(
            self.transport.clone(),
            move |x: &M1| f(x).negate(),
            Continuity::Neg(Box::new(self.continuity.clone())),
        )
    }

    /// `x ↦ f(x) - g(x)`.
    pub fn sub(&self, other: &Self) -> Result<Self, MapError> {
        self.add(&other.neg())
    }
}

impl<R, S, M1, M2> ContinuousLinearMap<R, S, M1, M2>
where
    R: ScalarRing,
    S: ScalarRing,
    M1: Carrier<R>,
    M2: Carrier<S> + ContinuousSmul<S>,
{
    /// `x ↦ c • f(x)`.
    pub fn smul(&self, c: &S) -> Self {
        let f = Arc::clone(&self.func);
        let c = c.clone();
        Self::from_parts(
            self.transport.clone(),
            move |x: &M1| f(x).smul(&c),
            Continuity::Smul(Box::new(self.continuity.clone())),
        )
    }
}

impl<R, S, M1, M2> ContinuousLinearMap<R, S, M1, M2>
where
    R: ScalarRing,
    S: ScalarRing,
    M1: Carrier<R> + FreeModule<R>,
    M2: Carrier<S>,
{
    /// The unique `σ`-semilinear map sending the `i`-th basis vector of `M1`
    /// to `images[i]`: `x ↦ Σ σ(xᵢ) • images[i]`. Continuity is decided.
    pub fn of_basis_images(transport: Transport<R, S>, images: Vec<M2>) -> Result<Self, MapError> {
        let rank = M1::rank();
        if images.len() != rank {
            return Err(MapError::BasisLength {
                expected: rank,
                found: images.len(),
            });
        }
        let sigma = transport.clone();
        let images: Arc<[M2]> = images.into();
        let func = move |x: &M1| {
            x.coordinates()
                .iter()
                .zip(images.iter())
                .fold(M2::origin(), |acc, (c, m)| acc.plus(&m.smul(&sigma.apply(c))))
        };
        if !check_continuous::<M1, M2, _>(&func) {
            return Err(MapError::NotContinuous);
        }
        Ok(Self::from_parts(transport, func, Continuity::Verified))
    }
}

impl<R, M1, M2> ContinuousLinearMap<R, R, M1, M2>
where
    R: ScalarRing,
    M1: Carrier<R>,
    M2: Carrier<R>,
{
    /// The zero linear map.
    pub fn zero() -> Self {
        Self::zero_with(Transport::id())
    }
}

impl<R: ScalarRing, M: Carrier<R>> ContinuousLinearMap<R, R, M, M> {
    /// The identity map.
    pub fn id() -> Self {
        Self::from_parts(Transport::id(), |x: &M| x.clone(), Continuity::Identity)
    }

    /// Unit of the endomorphism ring.
    #[inline]
    pub fn one() -> Self {
        Self::id()
    }

    /// Multiplication in the endomorphism ring: composition.
    #[inline]
    pub fn mul(&self, other: &Self) -> Self {
        self.comp(other)
    }

    /// `n`-fold composite; `pow(0)` is the identity.
    ///
    /// Built by repeated squaring, so evaluation nests `O(log n)` calls.
    pub fn pow(&self, n: u32) -> Self {
        if n == 0 {
            return Self::id();
        }
        type Func<T> = Arc<dyn Fn(&T) -> T + Send + Sync>;
        let mut acc: Option<Func<M>> = None;
        let mut base: Func<M> = Arc::clone(&self.func);
        let mut k = n;
        loop {
            if k & 1 == 1 {
                let next: Func<M> = match acc.take() {
                    None => Arc::clone(&base),
                    Some(prev) => {
                        let step = Arc::clone(&base);
                        Arc::new(move |x: &M| step(&prev(x)))
                    }
                };
                acc = Some(next);
            }
            k >>= 1;
            if k == 0 {
                break;
            }
            let half = Arc::clone(&base);
            base = Arc::new(move |x: &M| half(&half(x)));
        }
        let func = acc.unwrap_or_else(|| Self::id().func);
        Self {
            transport: self.transport.clone(),
            func,
            continuity: Continuity::Pow(Box::new(self.continuity.clone()), n),
        }
    }
}

impl<R, S, T, M1, M2, M3> Mul<ContinuousLinearMap<R, S, M1, M2>> for ContinuousLinearMap<S, T, M2, M3>
where
    R: ScalarRing,
    S: ScalarRing,
    T: ScalarRing,
    M1: Carrier<R>,
    M2: Carrier<S>,
    M3: Carrier<T>,
{
    type Output = ContinuousLinearMap<R, T, M1, M3>;

    fn mul(self, rhs: ContinuousLinearMap<R, S, M1, M2>) -> Self::Output {
        self.comp(&rhs)
    }
}

impl<R, S, M1, M2> Neg for ContinuousLinearMap<R, S, M1, M2>
where
    R: ScalarRing,
    S: ScalarRing,
    M1: Carrier<R>,
    M2: Carrier<S> + ContinuousAdd,
{
    type Output = Self;

    fn neg(self) -> Self {
        ContinuousLinearMap::neg(&self)
    }
}

impl<R, S, M1, M2> PartialEq for ContinuousLinearMap<R, S, M1, M2>
where
    R: ScalarRing,
    S: ScalarRing,
    M1: Carrier<R>,
    M2: Carrier<S>,
{
    fn eq(&self, other: &Self) -> bool {
        self.ext_eq(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::{Gaussian, Pi, Prod, Vector, Zmod};
    use num_bigint::BigInt;
    use num_rational::BigRational;
    use proptest::prelude::*;

    type Q = BigRational;
    type V2 = Vector<i64, 2>;

    fn q(n: i64) -> Q {
        Q::from_integer(BigInt::from(n))
    }

    fn matrix(entries: [i64; 4]) -> End<i64, V2> {
        End::of_basis_images(
            Transport::id(),
            vec![Pi([entries[0], entries[2]]), Pi([entries[1], entries[3]])],
        )
        .unwrap()
    }

    #[test]
    fn scalar_multiples_of_identity() {
        let f = End::<Q, Q>::id().smul(&q(2));
        let g = End::<Q, Q>::id().smul(&q(3));
        assert_eq!(f.comp(&g), End::id().smul(&q(6)));
        assert_eq!(f.add(&g).unwrap(), End::id().smul(&q(5)));
        assert_eq!(g.sub(&f).unwrap(), End::id());
    }

    #[test]
    fn identity_laws() {
        let f = matrix([1, 2, 3, 4]);
        assert_eq!(f.comp(&End::id()), f);
        assert_eq!(End::id().comp(&f), f);
        assert_eq!(f.apply(&Pi([1, 1])), Pi([3, 7]));
    }

    #[test]
    fn endomorphism_ring() {
        let f = matrix([0, 1, 0, 0]);
        assert!(f.pow(2).is_zero());
        assert_eq!(f.pow(1), f);
        assert_eq!(f.pow(0), End::one());
        let g = matrix([2, 0, 0, 2]);
        assert_eq!(g.pow(5), matrix([32, 0, 0, 32]));
        assert_eq!(matrix([1, 1, 0, 1]).pow(13), matrix([1, 13, 0, 1]));
        assert_eq!(g.clone() * f.clone(), f.smul(&2));
        assert_eq!(-(-f.clone()), f);
        let minus_f = -f.clone();
        assert!(f.add(&minus_f).unwrap().is_zero());
        assert_eq!(End::mul(&g, &g), matrix([4, 0, 0, 4]));
    }

    #[test]
    fn large_powers_keep_evaluation_shallow() {
        let handle = std::thread::Builder::new()
            .stack_size(256 * 1024)
            .spawn(|| {
                let flip = End::<i64, i64>::id().smul(&-1);
                let p = flip.pow(300_001);
                assert!(p.continuity().depth() <= 2);
                (p.apply(&1), flip.pow(300_000).apply(&1))
            })
            .unwrap();
        assert_eq!(handle.join().unwrap(), (-1, 1));
    }

    #[test]
    fn equality_does_not_overflow_fixed_width_scalars() {
        let f = End::<i64, i64>::id().smul(&(i64::MAX / 2));
        assert!(f == f.clone());
        let g = End::<i64, V2>::id().smul(&i64::MAX);
        assert_eq!(g.comp(&g), End::<i64, V2>::id().smul(&1));
    }

    #[test]
    fn from_fn_rejects_bad_functions() {
        let affine = End::<i64, i64>::from_fn(Transport::id(), |x: &i64| x + 1);
        assert!(matches!(affine, Err(MapError::NotAdditive { .. })));

        let conj = Transport::named("conj", |z: &Gaussian<i64>| z.conj());
        let not_semilinear =
            End::<Gaussian<i64>, Gaussian<i64>>::from_fn(Transport::id(), |z: &Gaussian<i64>| z.conj());
        assert!(matches!(not_semilinear, Err(MapError::NotSemilinear { .. })));

        let conj_linear = ContinuousLinearMap::from_fn(conj, |z: &Gaussian<i64>| z.conj()).unwrap();
        assert_eq!(conj_linear.continuity(), &Continuity::Verified);
    }

    #[test]
    fn conjugate_linear_maps_compose_to_linear() {
        let mut registry = TransportRegistry::new();
        registry.declare_involution("conj");
        let conj = Transport::named("conj", |z: &Gaussian<i64>| z.conj());
        let c: ContinuousLinearMap<_, _, Gaussian<i64>, Gaussian<i64>> =
            ContinuousLinearMap::from_fn(conj.clone(), |z: &Gaussian<i64>| z.conj()).unwrap();

        let raw = c.comp(&c);
        assert_eq!(raw.transport().symbol().word().len(), 2);

        let normalised = c.comp_in(&c, &registry);
        assert!(normalised.transport().is_identity());
        assert_eq!(normalised, End::id());

        let triple = registry.triple(&conj, &conj, &Transport::id()).unwrap();
        let checked = c.comp_with(&c, &triple).unwrap();
        assert!(checked.transport().is_identity());
        assert!(checked.add(&End::id()).is_ok());
    }

    #[test]
    fn comp_with_rejects_foreign_triple() {
        let f = End::<i64, i64>::id();
        let conj = Transport::<i64, i64>::named("flip", |r: &i64| *r);
        let mut registry = TransportRegistry::new();
        registry.declare_involution("flip");
        let triple = registry.triple(&conj, &conj, &Transport::id()).unwrap();
        assert!(matches!(
            f.comp_with(&f, &triple),
            Err(MapError::Transport(TransportError::TransportMismatch { .. }))
        ));
    }

    #[test]
    fn sums_require_equal_transports() {
        let conj = Transport::named("conj", |z: &Gaussian<i64>| z.conj());
        let c = ContinuousLinearMap::from_fn(conj, |z: &Gaussian<i64>| z.conj()).unwrap();
        let id = End::<Gaussian<i64>, Gaussian<i64>>::id();
        assert!(c.add(&id).is_err());
    }

    #[test]
    fn basis_length_is_checked() {
        let err = End::<i64, V2>::of_basis_images(Transport::id(), vec![Pi([1, 0])]).unwrap_err();
        assert_eq!(err, MapError::BasisLength { expected: 2, found: 1 });
    }

    #[test]
    fn kernel_of_a_projection() {
        let f = matrix([1, 0, 0, 0]);
        let ker = f.kernel();
        assert!(ker.contains(&Pi([0, 5])));
        assert!(!ker.contains(&Pi([1, 5])));
    }

    #[test]
    fn range_of_a_projection() {
        type F3 = Zmod<3>;
        type V = Vector<F3, 2>;
        let onto_x = End::<F3, V>::of_basis_images(
            Transport::id(),
            vec![Pi([F3::new(1), F3::new(0)]), Pi([F3::new(0), F3::new(0)])],
        )
        .unwrap();
        let range = onto_x.range(&Surjective::identity()).unwrap();
        let x_axis = Submodule::<F3, V>::from_predicate("x", |v: &V| v.0[1] == F3::new(0));
        assert!(range.set_eq(&x_axis));
        assert!(range.contains(&Pi([F3::new(2), F3::new(0)])));
        assert!(!range.contains(&Pi([F3::new(0), F3::new(1)])));
    }

    #[test]
    fn range_requires_a_witness_for_the_map_transport() {
        type G = Gaussian<Zmod<3>>;
        let mut registry = TransportRegistry::new();
        registry.declare_involution("conj");
        let conj = Transport::checked("conj", |z: &G| z.conj()).unwrap();
        let conj_onto = registry.surjective(&conj).unwrap();
        assert!(matches!(
            End::<G, G>::id().range(&conj_onto),
            Err(MapError::Transport(TransportError::TransportMismatch { .. }))
        ));
        let c = ContinuousLinearMap::from_fn(conj, |z: &G| z.conj()).unwrap();
        assert!(c.range(&Surjective::identity()).is_err());
    }

    #[test]
    fn range_of_a_conjugate_linear_map() {
        type G = Gaussian<Zmod<3>>;
        type P = Prod<G, G>;
        let mut registry = TransportRegistry::new();
        registry.declare_involution("conj");
        let conj = Transport::checked("conj", |z: &G| z.conj()).unwrap();
        let pair = registry.inverse_pair(&conj, &conj).unwrap();

        let c = ContinuousLinearMap::from_fn(conj.clone(), |z: &G| z.conj()).unwrap();
        assert!(c.range(&pair.surjective()).unwrap().set_eq(&Submodule::top()));

        let diagonal = ContinuousLinearMap::from_fn(conj, |z: &G| Prod(z.conj(), z.conj())).unwrap();
        let range = diagonal.range(&pair.surjective()).unwrap();
        let expected = Submodule::<G, P>::from_predicate("Δ", |p: &P| p.0 == p.1);
        assert!(range.set_eq(&expected));
        assert_eq!(range.elements().len(), 9);
    }

    #[test]
    fn certificates_follow_the_combinators() {
        let f = End::<i64, i64>::id();
        let g = f.smul(&3).comp(&f);
        assert_eq!(
            g.continuity(),
            &Continuity::comp(&Continuity::Smul(Box::new(Continuity::Identity)), &Continuity::Identity)
        );
        let external = End::<i64, i64>::assume_continuous(Transport::id(), |x: &i64| 5 * x, "lemma");
        assert_eq!(external.comp(&g).continuity().assumptions(), vec!["lemma"]);
    }

    fn entries() -> impl Strategy<Value = [i64; 4]> {
        prop::array::uniform4(-6i64..6)
    }

    proptest! {
        #[test]
        fn composition_is_associative(a in entries(), b in entries(), c in entries()) {
            let (f, g, h) = (matrix(a), matrix(b), matrix(c));
            prop_assert!(h.comp(&g).comp(&f) == h.comp(&g.comp(&f)));
        }

        #[test]
        fn equality_is_pointwise(a in entries(), b in entries(), x in -20i64..20, y in -20i64..20) {
            let (f, g) = (matrix(a), matrix(b));
            let v = Pi([x, y]);
            if f == g {
                prop_assert_eq!(f.apply(&v), g.apply(&v));
            } else {
                prop_assert!(a != b);
            }
        }

        #[test]
        fn addition_is_pointwise(a in entries(), b in entries(), x in -20i64..20, y in -20i64..20) {
            let (f, g) = (matrix(a), matrix(b));
            let v = Pi([x, y]);
            let sum = f.add(&g).unwrap();
            prop_assert_eq!(sum.apply(&v), f.apply(&v).plus(&g.apply(&v)));
        }
    }
}
