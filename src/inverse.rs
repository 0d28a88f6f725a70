//! Inverting continuous semilinear maps.
//!
//! [`invert`] reports whether `f` underlies some equivalence and, if so,
//! returns it. [`inverse`] is the total variant: the inverse map when one is
//! found, the zero map otherwise. The zero fallback is indistinguishable from
//! a genuine zero inverse, so callers that must tell the cases apart use
//! [`invert`].
//!
//! Finding the equivalence is delegated to an [`InverseSearch`] strategy:
//!
//! - [`EnumerativeSearch`] tabulates `f` over an enumerable domain and reads
//!   the inverse off the table, within the limits of a [`SearchConfig`];
//! - [`BasisSearch`] inverts the matrix of basis images of a map between free
//!   modules;
//! - [`Catalogue`] looks `f` up among registered equivalences.

use crate::algebra::{Enumerable, FreeModule, ScalarRing};
use crate::config::SearchConfig;
use crate::equiv::{ContinuousLinearEquiv, EquivError};
use crate::fingerprint::HashValue;
use crate::map::{ClMap, ContinuousLinearMap, MapError};
use crate::topology::Carrier;
use crate::transport::{InversePair, TransportSymbol};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Why no inverse was produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NonInvertibleReason {
    #[error("map is not injective")]
    NotInjective,
    #[error("map is not surjective")]
    NotSurjective,
    #[error("enumeration budget of {budget} exceeded ({required} required)")]
    BudgetExhausted { budget: usize, required: usize },
    #[error("set-theoretic inverse is not continuous")]
    InverseNotContinuous,
    /// Elimination found no unit in the remaining rows of `column`. Over a
    /// field this means the matrix is singular.
    #[error("no unit pivot in column {column} of the basis matrix")]
    NoUnitPivot { column: usize },
    #[error("map transport {found} does not match the pair ({expected})")]
    TransportMismatch {
        expected: TransportSymbol,
        found: TransportSymbol,
    },
    #[error("no registered equivalence has this map")]
    NotCatalogued,
    #[error("candidate inverse rejected: {0}")]
    Rejected(#[from] EquivError),
}

/// Outcome of [`invert`].
#[derive(Debug, Clone)]
pub enum Invertibility<R, S, M1, M2> {
    Invertible(ContinuousLinearEquiv<R, S, M1, M2>),
    NotInvertible(NonInvertibleReason),
}

impl<R, S, M1, M2> Invertibility<R, S, M1, M2> {
    #[inline]
    pub fn is_invertible(&self) -> bool {
        matches!(self, Self::Invertible(_))
    }

    pub fn equiv(&self) -> Option<&ContinuousLinearEquiv<R, S, M1, M2>> {
        match self {
            Self::Invertible(e) => Some(e),
            Self::NotInvertible(_) => None,
        }
    }

    pub fn into_equiv(self) -> Option<ContinuousLinearEquiv<R, S, M1, M2>> {
        match self {
            Self::Invertible(e) => Some(e),
            Self::NotInvertible(_) => None,
        }
    }

    pub fn reason(&self) -> Option<&NonInvertibleReason> {
        match self {
            Self::Invertible(_) => None,
            Self::NotInvertible(reason) => Some(reason),
        }
    }
}

/// A strategy for finding an equivalence whose forward map is `f`.
pub trait InverseSearch<R, S, M1, M2> {
    fn find(
        &self,
        f: &ContinuousLinearMap<R, S, M1, M2>,
        pair: &InversePair<R, S>,
    ) -> Invertibility<R, S, M1, M2>;
}

fn check_pair<R, S, M1, M2>(
    f: &ContinuousLinearMap<R, S, M1, M2>,
    pair: &InversePair<R, S>,
) -> Result<(), NonInvertibleReason>
where
    R: ScalarRing,
    S: ScalarRing,
    M1: Carrier<R>,
    M2: Carrier<S>,
{
    if f.transport().symbol() != pair.forward().symbol() {
        return Err(NonInvertibleReason::TransportMismatch {
            expected: pair.forward().symbol().clone(),
            found: f.transport().symbol().clone(),
        });
    }
    Ok(())
}

/// Exhaustive inversion over enumerable carriers.
#[derive(Debug, Clone, Default)]
pub struct EnumerativeSearch {
    config: SearchConfig,
}

impl EnumerativeSearch {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    fn tabulate<R, S, M1, M2>(
        &self,
        f: &ContinuousLinearMap<R, S, M1, M2>,
    ) -> Result<Vec<(M2, M1)>, NonInvertibleReason>
    where
        R: ScalarRing,
        S: ScalarRing,
        M1: Carrier<R> + Enumerable,
        M2: Carrier<S> + Enumerable,
    {
        let budget = self.config.max_enumeration;
        let required = M1::cardinality().max(M2::cardinality());
        if required > budget {
            warn!(budget, required, "inverse search budget exhausted");
            return Err(NonInvertibleReason::BudgetExhausted { budget, required });
        }
        let mut table: Vec<(M2, M1)> = Vec::with_capacity(required);
        for x in M1::elements() {
            let y = f.apply(&x);
            if table.iter().any(|(seen, _)| *seen == y) {
                trace!(?x, "collision");
                return Err(NonInvertibleReason::NotInjective);
            }
            table.push((y, x));
        }
        if table.len() < M2::cardinality() {
            return Err(NonInvertibleReason::NotSurjective);
        }
        Ok(table)
    }
}

impl<R, S, M1, M2> InverseSearch<R, S, M1, M2> for EnumerativeSearch
where
    R: ScalarRing,
    S: ScalarRing,
    M1: Carrier<R> + Enumerable,
    M2: Carrier<S> + Enumerable,
{
    fn find(
        &self,
        f: &ContinuousLinearMap<R, S, M1, M2>,
        pair: &InversePair<R, S>,
    ) -> Invertibility<R, S, M1, M2> {
        let table = match check_pair(f, pair).and_then(|()| self.tabulate(f)) {
            Ok(table) => Arc::new(table),
            Err(reason) => return Invertibility::NotInvertible(reason),
        };
        trace!(entries = table.len(), "tabulated");
        let lookup = move |y: &M2| {
            table
                .iter()
                .find(|(image, _)| image == y)
                .map_or_else(M1::origin, |(_, x)| x.clone())
        };
        let inv = match ContinuousLinearMap::from_fn(pair.backward().clone(), lookup) {
            Ok(inv) => inv,
            Err(err) => return Invertibility::NotInvertible(reject_candidate(err)),
        };
        match ContinuousLinearEquiv::equiv_of_inverse(f.clone(), inv, pair) {
            Ok(e) => Invertibility::Invertible(e),
            Err(err) => Invertibility::NotInvertible(err.into()),
        }
    }
}

fn reject_candidate(err: MapError) -> NonInvertibleReason {
    match err {
        MapError::NotContinuous => NonInvertibleReason::InverseNotContinuous,
        err => EquivError::from(err).into(),
    }
}

/// Gauss–Jordan elimination of `f`'s basis matrix over `S`.
///
/// Pivots must be units, so the search is exact over fields and local rings.
/// Over other rings an invertible matrix may still be reported as
/// [`NonInvertibleReason::NoUnitPivot`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BasisSearch;

impl BasisSearch {
    /// `A⁻¹` for a square matrix, row-major.
    fn invert_matrix<S: ScalarRing>(mut a: Vec<Vec<S>>) -> Result<Vec<Vec<S>>, NonInvertibleReason> {
        let n = a.len();
        let mut b: Vec<Vec<S>> = (0..n)
            .map(|i| (0..n).map(|j| if i == j { S::one() } else { S::zero() }).collect())
            .collect();
        for col in 0..n {
            let Some((row, pivot_inv)) = (col..n).find_map(|r| a[r][col].unit_inverse().map(|u| (r, u))) else {
                trace!(col, "no unit pivot");
                return Err(NonInvertibleReason::NoUnitPivot { column: col });
            };
            a.swap(col, row);
            b.swap(col, row);
            for j in 0..n {
                a[col][j] = a[col][j].ring_mul(&pivot_inv);
                b[col][j] = b[col][j].ring_mul(&pivot_inv);
            }
            for r in 0..n {
                if r == col || a[r][col].is_zero() {
                    continue;
                }
                let factor = a[r][col].clone();
                for j in 0..n {
                    let da = factor.ring_mul(&a[col][j]);
                    let db = factor.ring_mul(&b[col][j]);
                    a[r][j] = a[r][j].ring_sub(&da);
                    b[r][j] = b[r][j].ring_sub(&db);
                }
            }
        }
        Ok(b)
    }
}

impl<R, S, M1, M2> InverseSearch<R, S, M1, M2> for BasisSearch
where
    R: ScalarRing,
    S: ScalarRing,
    M1: Carrier<R> + FreeModule<R>,
    M2: Carrier<S> + FreeModule<S>,
{
    /// With `f(eⱼ) = Σₖ aₖⱼ e'ₖ` and `B = A⁻¹`, the inverse sends `e'ₖ` to
    /// `Σⱼ σ'(bⱼₖ) eⱼ`; the candidate is then checked as a two-sided inverse.
    fn find(
        &self,
        f: &ContinuousLinearMap<R, S, M1, M2>,
        pair: &InversePair<R, S>,
    ) -> Invertibility<R, S, M1, M2> {
        if let Err(reason) = check_pair(f, pair) {
            return Invertibility::NotInvertible(reason);
        }
        let (n, m) = (M1::rank(), M2::rank());
        if n < m {
            return Invertibility::NotInvertible(NonInvertibleReason::NotSurjective);
        }
        if n > m {
            return Invertibility::NotInvertible(NonInvertibleReason::NotInjective);
        }
        let columns: Vec<Vec<S>> = M1::generators().iter().map(|e| f.apply(e).coordinates()).collect();
        let a: Vec<Vec<S>> = (0..n)
            .map(|k| {
                columns
                    .iter()
                    .map(|col| col.get(k).cloned().unwrap_or_else(S::zero))
                    .collect()
            })
            .collect();
        let b = match Self::invert_matrix(a) {
            Ok(b) => b,
            Err(reason) => return Invertibility::NotInvertible(reason),
        };
        let sigma_inv = pair.backward();
        let images: Vec<M1> = (0..n)
            .map(|k| {
                let coords: Vec<R> = (0..n).map(|j| sigma_inv.apply(&b[j][k])).collect();
                M1::from_coordinates(&coords)
            })
            .collect();
        let inv = match ContinuousLinearMap::of_basis_images(sigma_inv.clone(), images) {
            Ok(inv) => inv,
            Err(err) => return Invertibility::NotInvertible(reject_candidate(err)),
        };
        debug!(rank = n, "basis matrix inverted");
        match ContinuousLinearEquiv::equiv_of_inverse(f.clone(), inv, pair) {
            Ok(e) => Invertibility::Invertible(e),
            Err(err) => Invertibility::NotInvertible(err.into()),
        }
    }
}

/// Registered equivalences, bucketed by the fingerprint of their inverse
/// pair and matched extensionally within a bucket.
pub struct Catalogue<R, S, M1, M2> {
    entries: HashMap<HashValue, Vec<ContinuousLinearEquiv<R, S, M1, M2>>>,
}

impl<R, S, M1, M2> Default for Catalogue<R, S, M1, M2> {
    fn default() -> Self {
        Self { entries: HashMap::new() }
    }
}

impl<R, S, M1, M2> Catalogue<R, S, M1, M2>
where
    R: ScalarRing,
    S: ScalarRing,
    M1: Carrier<R>,
    M2: Carrier<S>,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, e: ContinuousLinearEquiv<R, S, M1, M2>) -> &mut Self {
        self.entries.entry(e.pair().fingerprint()).or_default().push(e);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<R, S, M1, M2> InverseSearch<R, S, M1, M2> for Catalogue<R, S, M1, M2>
where
    R: ScalarRing,
    S: ScalarRing,
    M1: Carrier<R>,
    M2: Carrier<S>,
{
    fn find(
        &self,
        f: &ContinuousLinearMap<R, S, M1, M2>,
        pair: &InversePair<R, S>,
    ) -> Invertibility<R, S, M1, M2> {
        if let Err(reason) = check_pair(f, pair) {
            return Invertibility::NotInvertible(reason);
        }
        self.entries
            .get(&pair.fingerprint())
            .and_then(|bucket| bucket.iter().find(|e| e.to_map().ext_eq(f)))
            .map_or(
                Invertibility::NotInvertible(NonInvertibleReason::NotCatalogued),
                |e| Invertibility::Invertible(e.clone()),
            )
    }
}

/// The equivalence underlying `f`, if `search` finds one.
pub fn invert<R, S, M1, M2>(
    f: &ContinuousLinearMap<R, S, M1, M2>,
    pair: &InversePair<R, S>,
    search: &impl InverseSearch<R, S, M1, M2>,
) -> Invertibility<R, S, M1, M2>
where
    R: ScalarRing,
    S: ScalarRing,
    M1: Carrier<R>,
    M2: Carrier<S>,
{
    let outcome = search.find(f, pair);
    trace!(invertible = outcome.is_invertible(), "invert");
    outcome
}

/// The inverse of `f`, or the zero map with transport `σ'` when `search`
/// finds no equivalence.
pub fn inverse<R, S, M1, M2>(
    f: &ContinuousLinearMap<R, S, M1, M2>,
    pair: &InversePair<R, S>,
    search: &impl InverseSearch<R, S, M1, M2>,
) -> ContinuousLinearMap<S, R, M2, M1>
where
    R: ScalarRing,
    S: ScalarRing,
    M1: Carrier<R>,
    M2: Carrier<S>,
{
    match invert(f, pair, search) {
        Invertibility::Invertible(e) => e.inverse_map().clone(),
        Invertibility::NotInvertible(reason) => {
            warn!(%reason, "no inverse found, falling back to zero");
            ContinuousLinearMap::zero_with(pair.backward().clone())
        }
    }
}

/// [`inverse`] for linear maps.
pub fn inverse_linear<R, M1, M2>(
    f: &ClMap<R, M1, M2>,
    search: &impl InverseSearch<R, R, M1, M2>,
) -> ClMap<R, M2, M1>
where
    R: ScalarRing,
    M1: Carrier<R>,
    M2: Carrier<R>,
{
    inverse(f, &InversePair::refl(), search)
}
