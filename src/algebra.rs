//! Algebraic carriers: scalar rings, additive groups and modules.
//!
//! Scalars are commutative rings built on the `num_traits` identities and the
//! `std::ops` arithmetic. Module elements are plain values implementing
//! [`AddGroup`] and [`Module`]; every module names a finite generating set so
//! that additive semilinear maps can be compared exactly (two such maps with
//! the same transport agree everywhere once they agree on generators).
//!
//! # Citations
//! - Modules over rings: Lang, "Algebra", Chapter III (2002)
//! - Semilinear maps: Bourbaki, "Algebra I", Chapter II §1 (1974)

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Zero};
use std::fmt::Debug;
use std::ops::{Add, Mul, Neg, Sub};

pub mod gaussian;
pub mod product;
pub mod zmod;

pub use gaussian::Gaussian;
pub use product::{Pi, Prod, Vector};
pub use zmod::Zmod;

/// A commutative ring of scalars.
///
/// Commutativity is assumed throughout: `smul` of a semilinear map is only
/// semilinear again when scalars commute.
///
/// The crate performs scalar arithmetic through the `ring_*` methods. They
/// default to the `std::ops` operators; the fixed-width integers override
/// them with wrapping arithmetic, so `i64` is the ring ℤ/2⁶⁴ and no
/// evaluation can overflow.
pub trait ScalarRing:
    Clone
    + PartialEq
    + Debug
    + Send
    + Sync
    + 'static
    + Zero
    + One
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
{
    /// A small, deterministic list of scalars used to spot-check laws that
    /// cannot be decided from generators alone (transport agreement,
    /// semilinearity of user-supplied functions).
    fn probes() -> Vec<Self> {
        let two = Self::one().ring_add(&Self::one());
        let three = two.ring_add(&Self::one());
        vec![Self::zero(), Self::one(), Self::one().ring_neg(), two, three]
    }

    #[inline]
    fn ring_add(&self, other: &Self) -> Self {
        self.clone() + other.clone()
    }

    #[inline]
    fn ring_sub(&self, other: &Self) -> Self {
        self.clone() - other.clone()
    }

    #[inline]
    fn ring_mul(&self, other: &Self) -> Self {
        self.clone() * other.clone()
    }

    #[inline]
    fn ring_neg(&self) -> Self {
        -self.clone()
    }

    /// The multiplicative inverse, if `self` is a unit.
    fn unit_inverse(&self) -> Option<Self>;
}

macro_rules! impl_wrapping_ring {
    ($($ty:ty),*) => {
        $(impl ScalarRing for $ty {
            #[inline]
            fn ring_add(&self, other: &Self) -> Self {
                self.wrapping_add(*other)
            }

            #[inline]
            fn ring_sub(&self, other: &Self) -> Self {
                self.wrapping_sub(*other)
            }

            #[inline]
            fn ring_mul(&self, other: &Self) -> Self {
                self.wrapping_mul(*other)
            }

            #[inline]
            fn ring_neg(&self) -> Self {
                self.wrapping_neg()
            }

            /// Odd values are the units of ℤ/2ⁿ. Newton's iteration
            /// `x ↦ x(2 - ax)` doubles the number of correct low bits.
            fn unit_inverse(&self) -> Option<Self> {
                if self & 1 == 0 {
                    return None;
                }
                let mut x: $ty = *self;
                for _ in 0..7 {
                    x = x.wrapping_mul((2 as $ty).wrapping_sub(self.wrapping_mul(x)));
                }
                Some(x)
            }
        })*
    };
}

impl_wrapping_ring!(i32, i64, i128);

impl ScalarRing for BigInt {
    fn unit_inverse(&self) -> Option<Self> {
        (self.is_one() || (-self).is_one()).then(|| self.clone())
    }
}

impl ScalarRing for BigRational {
    fn unit_inverse(&self) -> Option<Self> {
        (!self.is_zero()).then(|| self.recip())
    }
}

/// An additive abelian group.
///
/// Method names avoid `zero`/`add`/`neg` so that they never collide with
/// `num_traits::Zero` or the `std::ops` traits on scalar types.
pub trait AddGroup: Clone + PartialEq + Debug + Send + Sync + 'static {
    /// The neutral element.
    fn origin() -> Self;

    /// Group addition.
    fn plus(&self, other: &Self) -> Self;

    /// Additive inverse.
    fn negate(&self) -> Self;

    /// Subtraction, `self - other`.
    fn minus(&self, other: &Self) -> Self {
        self.plus(&other.negate())
    }

    /// Whether this is the neutral element.
    fn is_origin(&self) -> bool {
        *self == Self::origin()
    }
}

impl<R: ScalarRing> AddGroup for R {
    #[inline]
    fn origin() -> Self {
        R::zero()
    }

    #[inline]
    fn plus(&self, other: &Self) -> Self {
        self.ring_add(other)
    }

    #[inline]
    fn negate(&self) -> Self {
        self.ring_neg()
    }

    #[inline]
    fn minus(&self, other: &Self) -> Self {
        self.ring_sub(other)
    }
}

/// A module over the scalar ring `R`.
///
/// # Invariants
/// - `smul` distributes over `plus` on both sides and `x.smul(&R::one()) == x`.
/// - `generators()` spans the module: every element is an `R`-linear
///   combination of generators.
pub trait Module<R: ScalarRing>: AddGroup {
    /// Scalar action `r • self`.
    fn smul(&self, r: &R) -> Self;

    /// A finite generating set.
    fn generators() -> Vec<Self>;
}

/// Every scalar ring is a module over itself, generated by `1`.
impl<R: ScalarRing> Module<R> for R {
    #[inline]
    fn smul(&self, r: &R) -> Self {
        r.ring_mul(self)
    }

    fn generators() -> Vec<Self> {
        vec![R::one()]
    }
}

/// A module whose generating set is a basis.
///
/// `coordinates` and `from_coordinates` are mutually inverse, and
/// coordinates are listed in the order of `Module::generators`.
pub trait FreeModule<R: ScalarRing>: Module<R> {
    /// Coordinates of `self` in the basis `Module::generators()`.
    fn coordinates(&self) -> Vec<R>;

    /// Rebuilds an element from its coordinates.
    ///
    /// Missing trailing coordinates are read as zero.
    fn from_coordinates(coords: &[R]) -> Self {
        Self::generators()
            .iter()
            .zip(coords)
            .fold(Self::origin(), |acc, (b, c)| acc.plus(&b.smul(c)))
    }

    /// Number of basis elements.
    fn rank() -> usize {
        Self::generators().len()
    }
}

impl<R: ScalarRing> FreeModule<R> for R {
    fn coordinates(&self) -> Vec<R> {
        vec![self.clone()]
    }
}

/// A carrier whose elements can be listed exhaustively.
///
/// Enables set-level decisions (inclusion of submodules, range membership,
/// exhaustive inverse search). The listing order is deterministic.
pub trait Enumerable: Sized {
    /// All elements, in a fixed order.
    fn elements() -> Vec<Self>;

    /// Number of elements, saturating at `usize::MAX`.
    ///
    /// Budgets are checked against this before anything is listed, so
    /// composite carriers compute it from their factors.
    fn cardinality() -> usize {
        Self::elements().len()
    }
}

/// Cartesian power of a finite listing, in lexicographic order.
pub(crate) fn cartesian_power<T: Clone>(values: &[T], n: usize) -> Vec<Vec<T>> {
    let mut out: Vec<Vec<T>> = vec![Vec::with_capacity(n)];
    for _ in 0..n {
        let mut next = Vec::with_capacity(out.len() * values.len());
        for prefix in &out {
            for v in values {
                let mut row = prefix.clone();
                row.push(v.clone());
                next.push(row);
            }
        }
        out = next;
    }
    out
}
