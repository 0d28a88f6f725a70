//! Continuous linear equivalences.
//!
//! A [`ContinuousLinearEquiv<R, S, M1, M2>`] is a continuous `σ`-semilinear
//! map together with a continuous `σ'`-semilinear inverse, for an inverse
//! pair `(σ, σ')`. Equivalences form a groupoid under [`refl`], [`symm`] and
//! [`trans`]; the round trips `e⁻¹(e(x)) = x` and `e(e⁻¹(y)) = y` are
//! verified whenever an equivalence is assembled from two maps.
//!
//! [`refl`]: ContinuousLinearEquiv::refl
//! [`symm`]: ContinuousLinearEquiv::symm
//! [`trans`]: ContinuousLinearEquiv::trans

use crate::map::{fst, inr, ClMap, ContinuousLinearMap, End, MapError};
use crate::algebra::{Prod, ScalarRing};
use crate::topology::{Carrier, Continuity, ContinuousAdd};
use crate::transport::{CompTriple, InversePair, TransportError, TransportRegistry, TransportSymbol};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

pub mod automorphism;

pub use automorphism::{units_equiv, Aut, Unit, UnitsEquiv};

/// Errors raised while assembling equivalences.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EquivError {
    #[error(transparent)]
    Map(#[from] MapError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// `inverse ∘ forward ≠ id`.
    #[error("inverse is not a left inverse")]
    NotLeftInverse,
    /// `forward ∘ inverse ≠ id`.
    #[error("inverse is not a right inverse")]
    NotRightInverse,
    /// An automorphism or unit carries a transport other than the identity.
    #[error("expected a linear map, found transport {0}")]
    NotLinear(TransportSymbol),
}

/// A continuous semilinear bijection with continuous semilinear inverse.
pub struct ContinuousLinearEquiv<R, S, M1, M2> {
    to: ContinuousLinearMap<R, S, M1, M2>,
    inv: ContinuousLinearMap<S, R, M2, M1>,
    pair: InversePair<R, S>,
}

/// Continuous linear equivalence (identity transports).
pub type ClEquiv<R, M1, M2> = ContinuousLinearEquiv<R, R, M1, M2>;

impl<R, S, M1, M2> Clone for ContinuousLinearEquiv<R, S, M1, M2> {
    fn clone(&self) -> Self {
        Self {
            to: self.to.clone(),
            inv: self.inv.clone(),
            pair: self.pair.clone(),
        }
    }
}

impl<R, S, M1, M2> fmt::Debug for ContinuousLinearEquiv<R, S, M1, M2> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContinuousLinearEquiv")
            .field("to", &self.to)
            .field("inv", &self.inv)
            .finish()
    }
}

impl<R, S, M1, M2> ContinuousLinearEquiv<R, S, M1, M2>
where
    R: ScalarRing,
    S: ScalarRing,
    M1: Carrier<R>,
    M2: Carrier<S>,
{
    /// Assembles an equivalence from mutually inverse maps.
    ///
    /// The transports must be those of `pair`; both round trips are checked
    /// extensionally.
    pub fn equiv_of_inverse(
        to: ContinuousLinearMap<R, S, M1, M2>,
        inv: ContinuousLinearMap<S, R, M2, M1>,
        pair: &InversePair<R, S>,
    ) -> Result<Self, EquivError> {
        if to.transport().symbol() != pair.forward().symbol() {
            return Err(TransportError::TransportMismatch {
                expected: pair.forward().symbol().clone(),
                found: to.transport().symbol().clone(),
            }
            .into());
        }
        if inv.transport().symbol() != pair.backward().symbol() {
            return Err(TransportError::TransportMismatch {
                expected: pair.backward().symbol().clone(),
                found: inv.transport().symbol().clone(),
            }
            .into());
        }
        if !inv.comp(&to).ext_eq(&End::<R, M1>::id()) {
            return Err(EquivError::NotLeftInverse);
        }
        if !to.comp(&inv).ext_eq(&End::<S, M2>::id()) {
            return Err(EquivError::NotRightInverse);
        }
        Ok(Self {
            to,
            inv,
            pair: pair.clone(),
        })
    }

    /// Pairs maps that are mutually inverse by construction.
    pub(crate) fn from_raw(
        to: ContinuousLinearMap<R, S, M1, M2>,
        inv: ContinuousLinearMap<S, R, M2, M1>,
        pair: InversePair<R, S>,
    ) -> Self {
        Self { to, inv, pair }
    }

    /// The forward map.
    #[inline]
    pub fn to_map(&self) -> &ContinuousLinearMap<R, S, M1, M2> {
        &self.to
    }

    /// The inverse map.
    #[inline]
    pub fn inverse_map(&self) -> &ContinuousLinearMap<S, R, M2, M1> {
        &self.inv
    }

    /// The transport pair `(σ, σ')`.
    #[inline]
    pub fn pair(&self) -> &InversePair<R, S> {
        &self.pair
    }

    /// `e(x)`.
    #[inline]
    pub fn apply(&self, x: &M1) -> M2 {
        self.to.apply(x)
    }

    /// `e⁻¹(y)`.
    #[inline]
    pub fn apply_symm(&self, y: &M2) -> M1 {
        self.inv.apply(y)
    }

    /// The inverse equivalence.
    pub fn symm(&self) -> ContinuousLinearEquiv<S, R, M2, M1> {
        ContinuousLinearEquiv {
            to: self.inv.clone(),
            inv: self.to.clone(),
            pair: self.pair.symm(),
        }
    }

    /// `other ∘ self`, with transports normalised by `registry`.
    pub fn trans<T, M3>(
        &self,
        other: &ContinuousLinearEquiv<S, T, M2, M3>,
        registry: &TransportRegistry,
    ) -> Result<ContinuousLinearEquiv<R, T, M1, M3>, EquivError>
    where
        T: ScalarRing,
        M3: Carrier<T>,
    {
        let pair = self.pair.trans(&other.pair, registry)?;
        Ok(ContinuousLinearEquiv {
            to: other.to.comp_in(&self.to, registry),
            inv: self.inv.comp_in(&other.inv, registry),
            pair,
        })
    }

    /// `other ∘ self` over explicit triples for the forward chain
    /// `(σ12, σ23, σ13)` and the inverse chain `(σ32, σ21, σ31)`.
    pub fn trans_with<T, M3>(
        &self,
        other: &ContinuousLinearEquiv<S, T, M2, M3>,
        forward: &CompTriple<R, S, T>,
        backward: &CompTriple<T, S, R>,
        registry: &TransportRegistry,
    ) -> Result<ContinuousLinearEquiv<R, T, M1, M3>, EquivError>
    where
        T: ScalarRing,
        M3: Carrier<T>,
    {
        let to = other.to.comp_with(&self.to, forward)?;
        let inv = self.inv.comp_with(&other.inv, backward)?;
        let pair = registry.inverse_pair(forward.composite(), backward.composite())?;
        Ok(ContinuousLinearEquiv { to, inv, pair })
    }

    /// Equality of forward maps.
    pub fn ext_eq(&self, other: &Self) -> bool {
        self.to.ext_eq(&other.to)
    }

    /// The underlying homeomorphism.
    pub fn to_homeomorph(&self) -> Homeomorph<M1, M2> {
        let (to, inv) = (self.to.clone(), self.inv.clone());
        Homeomorph {
            to: Arc::new(move |x: &M1| to.apply(x)),
            inv: Arc::new(move |y: &M2| inv.apply(y)),
            continuity: (self.to.continuity().clone(), self.inv.continuity().clone()),
        }
    }

    /// Block-diagonal `(x, y) ↦ (e(x), e'(y))`.
    pub fn prod<M3, M4>(
        &self,
        other: &ContinuousLinearEquiv<R, S, M3, M4>,
    ) -> Result<ContinuousLinearEquiv<R, S, Prod<M1, M3>, Prod<M2, M4>>, EquivError>
    where
        M3: Carrier<R>,
        M4: Carrier<S>,
    {
        Ok(ContinuousLinearEquiv {
            to: self.to.prod_map(&other.to)?,
            inv: self.inv.prod_map(&other.inv)?,
            pair: self.pair.clone(),
        })
    }
}

impl<R, S, M1, M2> ContinuousLinearEquiv<R, S, M1, M2>
where
    R: ScalarRing,
    S: ScalarRing,
    M1: Carrier<R> + ContinuousAdd,
    M2: Carrier<S> + ContinuousAdd,
{
    /// Block lower-triangular `(x, y) ↦ (e(x), e'(y) + f(x))` with inverse
    /// `(x, y) ↦ (e⁻¹(x), e'⁻¹(y - f(e⁻¹(x))))`.
    ///
    /// The inverse word `σ'σσ'` is reduced through `registry`; the round
    /// trips are then checked as for [`Self::equiv_of_inverse`].
    pub fn skew_prod<M3, M4>(
        &self,
        other: &ContinuousLinearEquiv<R, S, M3, M4>,
        f: &ContinuousLinearMap<R, S, M1, M4>,
        registry: &TransportRegistry,
    ) -> Result<ContinuousLinearEquiv<R, S, Prod<M1, M3>, Prod<M2, M4>>, EquivError>
    where
        M3: Carrier<R> + ContinuousAdd,
        M4: Carrier<S> + ContinuousAdd,
    {
        let coupling = inr::<S, M2, M4>().comp(&f.comp(&fst::<R, M1, M3>()));
        let forward = self.to.prod_map(&other.to)?.add(&coupling)?;

        let back_then_couple = f.comp_in(&self.inv.comp(&fst::<S, M2, M4>()), registry);
        let shear = End::<S, Prod<M2, M4>>::id().sub(&inr::<S, M2, M4>().comp(&back_then_couple))?;
        let inverse = self.inv.prod_map(&other.inv)?.comp_in(&shear, registry);

        debug!(forward = %forward.transport().symbol(), "skew product");
        ContinuousLinearEquiv::equiv_of_inverse(forward, inverse, &self.pair)
    }
}

impl<R: ScalarRing, M: Carrier<R>> ContinuousLinearEquiv<R, R, M, M> {
    /// The identity equivalence.
    pub fn refl() -> Self {
        Self {
            to: End::id(),
            inv: End::id(),
            pair: InversePair::refl(),
        }
    }
}

impl<R, S, M1, M2> PartialEq for ContinuousLinearEquiv<R, S, M1, M2>
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

/// Transport of map spaces along two equivalences:
/// `f ↦ e43 ∘ f ∘ e12⁻¹` from `Map(M1, M4)` to `Map(M2, M3)`.
pub struct ArrowCongr<R, M1, M2, M3, M4> {
    e12: ClEquiv<R, M1, M2>,
    e43: ClEquiv<R, M4, M3>,
}

/// The bijection `Map(M1, M4) ≃ Map(M2, M3)` induced by `e12` and `e43`.
pub fn arrow_congr_equiv<R, M1, M2, M3, M4>(
    e12: &ClEquiv<R, M1, M2>,
    e43: &ClEquiv<R, M4, M3>,
) -> ArrowCongr<R, M1, M2, M3, M4>
where
    R: ScalarRing,
    M1: Carrier<R>,
    M2: Carrier<R>,
    M3: Carrier<R>,
    M4: Carrier<R>,
{
    ArrowCongr {
        e12: e12.clone(),
        e43: e43.clone(),
    }
}

impl<R, M1, M2, M3, M4> ArrowCongr<R, M1, M2, M3, M4>
where
    R: ScalarRing,
    M1: Carrier<R>,
    M2: Carrier<R>,
    M3: Carrier<R>,
    M4: Carrier<R>,
{
    /// `f ↦ e43 ∘ f ∘ e12⁻¹`.
    pub fn apply(&self, f: &ClMap<R, M1, M4>) -> ClMap<R, M2, M3> {
        self.e43.to.comp(&f.comp(&self.e12.inv))
    }

    /// `g ↦ e43⁻¹ ∘ g ∘ e12`.
    pub fn apply_symm(&self, g: &ClMap<R, M2, M3>) -> ClMap<R, M1, M4> {
        self.e43.inv.comp(&g.comp(&self.e12.to))
    }
}

/// A bicontinuous bijection, forgetting linearity.
pub struct Homeomorph<M1, M2> {
    to: Arc<dyn Fn(&M1) -> M2 + Send + Sync>,
    inv: Arc<dyn Fn(&M2) -> M1 + Send + Sync>,
    continuity: (Continuity, Continuity),
}

impl<M1, M2> Clone for Homeomorph<M1, M2> {
    fn clone(&self) -> Self {
        Self {
            to: Arc::clone(&self.to),
            inv: Arc::clone(&self.inv),
            continuity: self.continuity.clone(),
        }
    }
}

impl<M1, M2> Homeomorph<M1, M2> {
    #[inline]
    pub fn apply(&self, x: &M1) -> M2 {
        (self.to)(x)
    }

    #[inline]
    pub fn apply_symm(&self, y: &M2) -> M1 {
        (self.inv)(y)
    }

    pub fn symm(&self) -> Homeomorph<M2, M1> {
        Homeomorph {
            to: Arc::clone(&self.inv),
            inv: Arc::clone(&self.to),
            continuity: (self.continuity.1.clone(), self.continuity.0.clone()),
        }
    }

    /// Certificates of the forward and inverse directions.
    #[inline]
    pub fn continuity(&self) -> (&Continuity, &Continuity) {
        (&self.continuity.0, &self.continuity.1)
    }
}
