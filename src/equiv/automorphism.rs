//! The automorphism group and the units of the endomorphism ring.
//!
//! `Aut(M)` is the group of continuous linear self-equivalences of `M`. It is
//! isomorphic to the unit group of `End(M)`; [`UnitsEquiv`] is that
//! isomorphism in both directions.
//!
//! Both groups hold linear maps only: a self-equivalence with a non-identity
//! transport (a conjugate-linear one, say) is rejected on entry, so the group
//! operations can record the trivial inverse pair.

use super::{ClEquiv, EquivError};
use crate::algebra::ScalarRing;
use crate::map::{ContinuousLinearMap, End};
use crate::topology::Carrier;
use crate::transport::InversePair;
use std::ops::Mul;

/// A continuous linear automorphism.
pub struct Aut<R, M>(ClEquiv<R, M, M>);

impl<R, M> Clone for Aut<R, M> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<R, M> std::fmt::Debug for Aut<R, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Aut").field(&self.0).finish()
    }
}

impl<R: ScalarRing, M: Carrier<R>> Aut<R, M> {
    /// Wraps an equivalence whose maps are both linear.
    pub fn new(equiv: ClEquiv<R, M, M>) -> Result<Self, EquivError> {
        require_linear(equiv.to_map())?;
        require_linear(equiv.inverse_map())?;
        Ok(Self(equiv))
    }

    /// The identity automorphism.
    pub fn one() -> Self {
        Self(ClEquiv::refl())
    }

    /// `self ∘ other`.
    pub fn mul(&self, other: &Self) -> Self {
        let to = self.0.to_map().comp(other.0.to_map());
        let inv = other.0.inverse_map().comp(self.0.inverse_map());
        Self(ClEquiv::from_raw(to, inv, InversePair::refl()))
    }

    /// The inverse automorphism.
    pub fn inv(&self) -> Self {
        Self(self.0.symm())
    }

    /// Integer powers; negative exponents use the inverse.
    pub fn pow(&self, n: i32) -> Self {
        let base = if n < 0 { self.inv() } else { self.clone() };
        let k = n.unsigned_abs();
        let to = base.0.to_map().pow(k);
        let inv = base.0.inverse_map().pow(k);
        Self(ClEquiv::from_raw(to, inv, InversePair::refl()))
    }

    /// Evaluates the automorphism.
    #[inline]
    pub fn apply(&self, x: &M) -> M {
        self.0.apply(x)
    }

    /// The underlying equivalence.
    #[inline]
    pub fn equiv(&self) -> &ClEquiv<R, M, M> {
        &self.0
    }

    pub fn ext_eq(&self, other: &Self) -> bool {
        self.0.ext_eq(&other.0)
    }
}

fn require_linear<R, M>(f: &ContinuousLinearMap<R, R, M, M>) -> Result<(), EquivError>
where
    R: ScalarRing,
    M: Carrier<R>,
{
    if !f.transport().is_identity() {
        return Err(EquivError::NotLinear(f.transport().symbol().clone()));
    }
    Ok(())
}

impl<'a, R: ScalarRing, M: Carrier<R>> Mul<&'a Aut<R, M>> for &'a Aut<R, M> {
    type Output = Aut<R, M>;

    fn mul(self, rhs: &'a Aut<R, M>) -> Aut<R, M> {
        Aut::mul(self, rhs)
    }
}

impl<R: ScalarRing, M: Carrier<R>> PartialEq for Aut<R, M> {
    fn eq(&self, other: &Self) -> bool {
        self.ext_eq(other)
    }
}

/// An invertible element of `End(M)` with its two-sided inverse.
pub struct Unit<R, M> {
    val: End<R, M>,
    inv: End<R, M>,
}

impl<R, M> Clone for Unit<R, M> {
    fn clone(&self) -> Self {
        Self {
            val: self.val.clone(),
            inv: self.inv.clone(),
        }
    }
}

impl<R, M> std::fmt::Debug for Unit<R, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Unit")
            .field("val", &self.val)
            .field("inv", &self.inv)
            .finish()
    }
}

impl<R: ScalarRing, M: Carrier<R>> Unit<R, M> {
    /// Checks that both maps are linear, `val * inv = 1` and `inv * val = 1`.
    pub fn new(val: End<R, M>, inv: End<R, M>) -> Result<Self, EquivError> {
        require_linear(&val)?;
        require_linear(&inv)?;
        if !val.comp(&inv).ext_eq(&End::one()) {
            return Err(EquivError::NotRightInverse);
        }
        if !inv.comp(&val).ext_eq(&End::one()) {
            return Err(EquivError::NotLeftInverse);
        }
        Ok(Self { val, inv })
    }

    #[inline]
    pub fn val(&self) -> &End<R, M> {
        &self.val
    }

    #[inline]
    pub fn inv(&self) -> &End<R, M> {
        &self.inv
    }

    /// Product in the unit group.
    pub fn mul(&self, other: &Self) -> Self {
        Self {
            val: self.val.comp(&other.val),
            inv: other.inv.comp(&self.inv),
        }
    }

    /// The inverse unit.
    pub fn inverse(&self) -> Self {
        Self {
            val: self.inv.clone(),
            inv: self.val.clone(),
        }
    }
}

impl<R: ScalarRing, M: Carrier<R>> PartialEq for Unit<R, M> {
    fn eq(&self, other: &Self) -> bool {
        self.val.ext_eq(&other.val)
    }
}

/// The group isomorphism `Aut(M) ≃ End(M)ˣ`.
pub struct UnitsEquiv<R, M> {
    _carrier: std::marker::PhantomData<fn() -> (R, M)>,
}

/// `Aut(M) ≃ End(M)ˣ`.
pub fn units_equiv<R: ScalarRing, M: Carrier<R>>() -> UnitsEquiv<R, M> {
    UnitsEquiv {
        _carrier: std::marker::PhantomData,
    }
}

impl<R: ScalarRing, M: Carrier<R>> UnitsEquiv<R, M> {
    /// `e ↦ (e, e⁻¹)`.
    pub fn apply(&self, e: &Aut<R, M>) -> Unit<R, M> {
        Unit {
            val: e.0.to_map().clone(),
            inv: e.0.inverse_map().clone(),
        }
    }

    /// `(u, u⁻¹) ↦ u` as an automorphism.
    pub fn apply_symm(&self, u: &Unit<R, M>) -> Aut<R, M> {
        Aut(ClEquiv::from_raw(u.val.clone(), u.inv.clone(), InversePair::refl()))
    }
}

impl<R: ScalarRing, M: Carrier<R>> From<Aut<R, M>> for Unit<R, M> {
    fn from(e: Aut<R, M>) -> Self {
        units_equiv().apply(&e)
    }
}

impl<R: ScalarRing, M: Carrier<R>> From<Unit<R, M>> for Aut<R, M> {
    fn from(u: Unit<R, M>) -> Self {
        units_equiv().apply_symm(&u)
    }
}
