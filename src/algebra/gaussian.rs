//! Gaussian integers and their generalisation `R[i]` with `i² = -1`.
//!
//! Complex conjugation is a ring automorphism of `R[i]`, which makes it the
//! standard non-identity transport: conjugate-linear maps are the
//! `conj`-semilinear maps.

use super::{Enumerable, FreeModule, Module, ScalarRing};
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// `re + im·i` over a commutative ring `R`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Gaussian<R> {
    /// Real part.
    pub re: R,
    /// Imaginary part.
    pub im: R,
}

impl<R: ScalarRing> Gaussian<R> {
    /// Creates `re + im·i`.
    #[inline]
    pub fn new(re: R, im: R) -> Self {
        Self { re, im }
    }

    /// Embeds a scalar of `R` as a real element.
    #[inline]
    pub fn real(re: R) -> Self {
        Self { re, im: R::zero() }
    }

    /// The imaginary unit.
    #[inline]
    pub fn i() -> Self {
        Self {
            re: R::zero(),
            im: R::one(),
        }
    }

    /// Complex conjugate `re - im·i`.
    #[inline]
    pub fn conj(&self) -> Self {
        Self {
            re: self.re.clone(),
            im: self.im.ring_neg(),
        }
    }

    /// Field norm `re² + im²`.
    pub fn norm(&self) -> R {
        self.re.ring_mul(&self.re).ring_add(&self.im.ring_mul(&self.im))
    }
}

impl<R: ScalarRing> Add for Gaussian<R> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            re: self.re.ring_add(&rhs.re),
            im: self.im.ring_add(&rhs.im),
        }
    }
}

impl<R: ScalarRing> Sub for Gaussian<R> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self {
            re: self.re.ring_sub(&rhs.re),
            im: self.im.ring_sub(&rhs.im),
        }
    }
}

impl<R: ScalarRing> Neg for Gaussian<R> {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            re: self.re.ring_neg(),
            im: self.im.ring_neg(),
        }
    }
}

impl<R: ScalarRing> Mul for Gaussian<R> {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        let re = self.re.ring_mul(&rhs.re).ring_sub(&self.im.ring_mul(&rhs.im));
        let im = self.re.ring_mul(&rhs.im).ring_add(&self.im.ring_mul(&rhs.re));
        Self { re, im }
    }
}

impl<R: ScalarRing> Zero for Gaussian<R> {
    fn zero() -> Self {
        Self::real(R::zero())
    }

    fn is_zero(&self) -> bool {
        self.re.is_zero() && self.im.is_zero()
    }
}

impl<R: ScalarRing> One for Gaussian<R> {
    fn one() -> Self {
        Self::real(R::one())
    }
}

impl<R: ScalarRing> ScalarRing for Gaussian<R> {
    /// Real probes of `R` plus `i` and `1 + i`, so that probing tells
    /// conjugation apart from the identity.
    fn probes() -> Vec<Self> {
        let mut probes: Vec<Self> = R::probes().into_iter().map(Self::real).collect();
        probes.push(Self::i());
        probes.push(Self::new(R::one(), R::one()));
        probes
    }

    /// `z⁻¹ = z̄ / N(z)`; `z` is a unit iff its norm is.
    fn unit_inverse(&self) -> Option<Self> {
        let n = self.norm().unit_inverse()?;
        Some(<Self as Module<R>>::smul(&self.conj(), &n))
    }
}

/// `R[i]` as a free `R`-module with basis `1, i`; the real scalars act
/// through `R → R[i]`.
impl<R: ScalarRing> Module<R> for Gaussian<R> {
    fn smul(&self, r: &R) -> Self {
        Self {
            re: r.ring_mul(&self.re),
            im: r.ring_mul(&self.im),
        }
    }

    fn generators() -> Vec<Self> {
        vec![Self::one(), Self::i()]
    }
}

impl<R: ScalarRing> FreeModule<R> for Gaussian<R> {
    fn coordinates(&self) -> Vec<R> {
        vec![self.re.clone(), self.im.clone()]
    }
}

impl<R: ScalarRing + Enumerable> Enumerable for Gaussian<R> {
    fn elements() -> Vec<Self> {
        let parts = R::elements();
        let mut out = Vec::with_capacity(parts.len() * parts.len());
        for re in &parts {
            for im in &parts {
                out.push(Self::new(re.clone(), im.clone()));
            }
        }
        out
    }

    fn cardinality() -> usize {
        R::cardinality().saturating_mul(R::cardinality())
    }
}
