//! Codomain restriction, rank-one maps and restriction of scalars.
//!
//! Restricting the codomain of `f` to a submodule `p` needs the fact that
//! every image lies in `p`. For an additive semilinear map that fact follows
//! from the generators alone, so [`ImageWitness::check`] decides it once and
//! the witness is then handed to [`ContinuousLinearMap::cod_restrict`]. A
//! witness is bound to the exact map and submodule it was issued for.

use super::{ClMap, ContinuousLinearMap, MapError};
use crate::algebra::{Module, ScalarRing};
use crate::submodule::Submodule;
use crate::topology::{Carrier, Continuity, ContinuousSmul};
use crate::transport::{Transport, TransportError};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// Checked fact `∀x, f(x) ∈ p`.
#[derive(Debug)]
pub struct ImageWitness<R, S, M1, M2> {
    map: ContinuousLinearMap<R, S, M1, M2>,
    target: Submodule<S, M2>,
}

impl<R, S, M1, M2> Clone for ImageWitness<R, S, M1, M2> {
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
            target: self.target.clone(),
        }
    }
}

impl<R, S, M1, M2> ImageWitness<R, S, M1, M2>
where
    R: ScalarRing,
    S: ScalarRing,
    M1: Carrier<R>,
    M2: Carrier<S>,
{
    /// Checks that every generator of `M1` lands in `p`.
    pub fn check(f: &ContinuousLinearMap<R, S, M1, M2>, p: &Submodule<S, M2>) -> Result<Self, MapError> {
        for (i, g) in M1::generators().iter().enumerate() {
            if !p.contains(&f.apply(g)) {
                return Err(MapError::ImageEscapes {
                    generator: i,
                    submodule: p.label().to_string(),
                });
            }
        }
        debug!(submodule = p.label(), "image witness");
        Ok(Self {
            map: f.clone(),
            target: p.clone(),
        })
    }
}

/// A map viewed with codomain `p ⊆ M2`.
#[derive(Debug)]
pub struct CodRestricted<R, S, M1, M2> {
    map: ContinuousLinearMap<R, S, M1, M2>,
    target: Submodule<S, M2>,
}

impl<R, S, M1, M2> Clone for CodRestricted<R, S, M1, M2> {
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
            target: self.target.clone(),
        }
    }
}

impl<R, S, M1, M2> CodRestricted<R, S, M1, M2>
where
    R: ScalarRing,
    S: ScalarRing,
    M1: Carrier<R>,
    M2: Carrier<S>,
{
    /// Evaluates `f(x)`, an element of the target submodule.
    #[inline]
    pub fn apply(&self, x: &M1) -> M2 {
        self.map.apply(x)
    }

    /// The submodule the images lie in.
    #[inline]
    pub fn target(&self) -> &Submodule<S, M2> {
        &self.target
    }

    /// `inclusion ∘ restricted`, as a map into `M2`.
    #[inline]
    pub fn as_map(&self) -> &ContinuousLinearMap<R, S, M1, M2> {
        &self.map
    }

    /// Consumes the view.
    pub fn into_map(self) -> ContinuousLinearMap<R, S, M1, M2> {
        self.map
    }

    /// Certificate of the restriction.
    #[inline]
    pub fn continuity(&self) -> &Continuity {
        self.map.continuity()
    }
}

impl<R, S, M1, M2> ContinuousLinearMap<R, S, M1, M2>
where
    R: ScalarRing,
    S: ScalarRing,
    M1: Carrier<R>,
    M2: Carrier<S>,
{
    /// Restricts the codomain to `p`, given a witness issued for this map
    /// and this submodule. Continuity passes to the subspace topology.
    pub fn cod_restrict(
        &self,
        p: &Submodule<S, M2>,
        witness: &ImageWitness<R, S, M1, M2>,
    ) -> Result<CodRestricted<R, S, M1, M2>, MapError> {
        if !witness.map.same_as(self) || !witness.target.same_as(p) {
            return Err(MapError::WitnessMismatch);
        }
        Ok(self.cod_restrict_unchecked(p))
    }

    /// Restriction for images that lie in `p` by construction.
    pub(crate) fn cod_restrict_unchecked(&self, p: &Submodule<S, M2>) -> CodRestricted<R, S, M1, M2> {
        let f = Arc::clone(&self.func);
        let map = ContinuousLinearMap::from_parts(
            self.transport.clone(),
            move |x: &M1| f(x),
            Continuity::CodRestrict(Box::new(self.continuity.clone())),
        );
        CodRestricted {
            map,
            target: p.clone(),
        }
    }
}

impl<R, S, M1> ContinuousLinearMap<R, S, M1, S>
where
    R: ScalarRing,
    S: ScalarRing,
    M1: Carrier<R>,
{
    /// `x ↦ c(x) • m` for a scalar-valued `c`.
    pub fn smul_right<M2>(&self, m: M2) -> ContinuousLinearMap<R, S, M1, M2>
    where
        M2: Carrier<S> + ContinuousSmul<S>,
    {
        let c = Arc::clone(&self.func);
        ContinuousLinearMap::from_parts(
            self.transport.clone(),
            move |x: &M1| m.smul(&c(x)),
            Continuity::SmulRight(Box::new(self.continuity.clone())),
        )
    }
}

/// `r ↦ r • m`, the map `R → M` spanning the line through `m`.
pub fn to_span_singleton<R, M>(m: M) -> ClMap<R, R, M>
where
    R: ScalarRing,
    M: Carrier<R> + ContinuousSmul<R>,
{
    ClMap::<R, R, R>::id().smul_right(m)
}

/// Checked tower law `r • m = ι(r) • m` for an embedding `ι : R → A` of
/// scalar rings acting on `M`.
pub struct ScalarTower<R, A, M> {
    embed: Transport<R, A>,
    _module: PhantomData<fn() -> M>,
}

impl<R, A, M> Clone for ScalarTower<R, A, M> {
    fn clone(&self) -> Self {
        Self {
            embed: self.embed.clone(),
            _module: PhantomData,
        }
    }
}

impl<R, A, M> std::fmt::Debug for ScalarTower<R, A, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ScalarTower").field(&self.embed).finish()
    }
}

impl<R, A, M> ScalarTower<R, A, M>
where
    R: ScalarRing,
    A: ScalarRing,
    M: Module<R> + Module<A>,
{
    /// Checks the tower law on probe scalars and both generating sets.
    pub fn check(embed: &Transport<R, A>) -> Result<Self, MapError> {
        let mut points = <M as Module<R>>::generators();
        points.extend(<M as Module<A>>::generators());
        for (i, g) in points.iter().enumerate() {
            for r in R::probes() {
                if <M as Module<R>>::smul(g, &r) != <M as Module<A>>::smul(g, &embed.apply(&r)) {
                    return Err(MapError::TowerLawFails {
                        generator: i,
                        probe: format!("{:?}", r),
                    });
                }
            }
        }
        Ok(Self {
            embed: embed.clone(),
            _module: PhantomData,
        })
    }

    /// The embedding `ι`.
    #[inline]
    pub fn embedding(&self) -> &Transport<R, A> {
        &self.embed
    }
}

impl<A, M1, M2> ContinuousLinearMap<A, A, M1, M2>
where
    A: ScalarRing,
    M1: Carrier<A>,
    M2: Carrier<A>,
{
    /// Views an `A`-linear map as `R`-linear along a tower `R → A`.
    /// The underlying function is shared.
    pub fn restrict_scalars<R>(
        &self,
        domain: &ScalarTower<R, A, M1>,
        codomain: &ScalarTower<R, A, M2>,
    ) -> Result<ClMap<R, M1, M2>, MapError>
    where
        R: ScalarRing,
        M1: Carrier<R>,
        M2: Carrier<R>,
    {
        if !self.transport.is_identity() {
            return Err(TransportError::TransportMismatch {
                expected: Transport::<A, A>::id().symbol().clone(),
                found: self.transport.symbol().clone(),
            }
            .into());
        }
        if domain.embed.symbol() != codomain.embed.symbol() {
            return Err(TransportError::TransportMismatch {
                expected: domain.embed.symbol().clone(),
                found: codomain.embed.symbol().clone(),
            }
            .into());
        }
        let f = Arc::clone(&self.func);
        Ok(ContinuousLinearMap::from_parts(
            Transport::id(),
            move |x: &M1| f(x),
            Continuity::RestrictScalars(Box::new(self.continuity.clone())),
        ))
    }
}
