//! Integers modulo `P`.
//!
//! `Zmod<P>` is the finite ring ℤ/Pℤ. For prime `P` it is a field, which is
//! the usual setting for exhaustive tests: every submodule of a power of
//! `Zmod<P>` is a subspace and can be listed.

use super::{Enumerable, ScalarRing};
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// Residue class modulo `P` (requires `P >= 2`).
///
/// # Invariant
/// The inner value is always reduced: `0 <= value < P`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Zmod<const P: u64>(u64);

impl<const P: u64> Zmod<P> {
    /// Reduces `value` modulo `P`.
    #[inline]
    pub const fn new(value: u64) -> Self {
        Self(value % P)
    }

    /// Reduces a signed integer modulo `P`.
    pub fn from_i64(value: i64) -> Self {
        Self(value.rem_euclid(P as i64) as u64)
    }

    /// The representative in `0..P`.
    #[inline]
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Exponentiation by squaring.
    pub fn pow(&self, mut exp: u64) -> Self {
        let mut base = *self;
        let mut acc = Self::one();
        while exp > 0 {
            if exp & 1 == 1 {
                acc = acc * base;
            }
            base = base * base;
            exp >>= 1;
        }
        acc
    }

    /// Multiplicative inverse, if `self` is a unit.
    pub fn inverse(&self) -> Option<Self> {
        // Extended Euclid on (value, P).
        let (mut old_r, mut r) = (self.0 as i128, P as i128);
        let (mut old_s, mut s) = (1i128, 0i128);
        while r != 0 {
            let q = old_r / r;
            (old_r, r) = (r, old_r - q * r);
            (old_s, s) = (s, old_s - q * s);
        }
        if old_r != 1 {
            return None;
        }
        Some(Self(old_s.rem_euclid(P as i128) as u64))
    }
}

impl<const P: u64> fmt::Debug for Zmod<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}mod{}", self.0, P)
    }
}

impl<const P: u64> fmt::Display for Zmod<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<const P: u64> Add for Zmod<P> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(((self.0 as u128 + rhs.0 as u128) % P as u128) as u64)
    }
}

impl<const P: u64> Sub for Zmod<P> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self + (-rhs)
    }
}

impl<const P: u64> Neg for Zmod<P> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        if self.0 == 0 {
            self
        } else {
            Self(P - self.0)
        }
    }
}

impl<const P: u64> Mul for Zmod<P> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self(((self.0 as u128 * rhs.0 as u128) % P as u128) as u64)
    }
}

impl<const P: u64> Zero for Zmod<P> {
    #[inline]
    fn zero() -> Self {
        Self(0)
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl<const P: u64> One for Zmod<P> {
    #[inline]
    fn one() -> Self {
        Self(1 % P)
    }
}

impl<const P: u64> ScalarRing for Zmod<P> {
    #[inline]
    fn unit_inverse(&self) -> Option<Self> {
        self.inverse()
    }
}

impl<const P: u64> Enumerable for Zmod<P> {
    fn elements() -> Vec<Self> {
        (0..P).map(Self).collect()
    }

    fn cardinality() -> usize {
        usize::try_from(P).unwrap_or(usize::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type F7 = Zmod<7>;

    #[test]
    fn arithmetic_wraps() {
        let a = F7::new(5);
        let b = F7::new(4);
        assert_eq!(a + b, F7::new(2));
        assert_eq!(a - b, F7::new(1));
        assert_eq!(b - a, F7::new(6));
        assert_eq!(a * b, F7::new(6));
        assert_eq!(-a, F7::new(2));
        assert_eq!(F7::from_i64(-1), F7::new(6));
    }

    #[test]
    fn inverses_in_prime_field() {
        for x in F7::elements().into_iter().filter(|x| !x.is_zero()) {
            let inv = x.inverse().expect("nonzero element of a field is a unit");
            assert_eq!(x * inv, F7::one());
        }
        assert_eq!(F7::zero().inverse(), None);
        assert_eq!(Zmod::<6>::new(2).inverse(), None);
        assert_eq!(Zmod::<6>::new(5).inverse(), Some(Zmod::<6>::new(5)));
    }

    #[test]
    fn pow_matches_repeated_product() {
        let x = F7::new(3);
        assert_eq!(x.pow(0), F7::one());
        assert_eq!(x.pow(6), F7::one());
        assert_eq!(x.pow(2), x * x);
    }

    #[test]
    fn enumeration_is_complete() {
        assert_eq!(F7::elements().len(), 7);
        assert_eq!(F7::cardinality(), 7);
        assert_eq!(F7::elements()[3], F7::new(3));
    }
}
