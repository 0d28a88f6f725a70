//! Products, coproducts and indexed products of maps.
//!
//! Projections and injections are linear and continuous by construction;
//! `prod`, `coprod`, `prod_map` and `pi` require all members to share one
//! transport.

use super::{ClMap, ContinuousLinearMap, MapError};
use crate::algebra::{AddGroup, Pi, Prod, ScalarRing};
use crate::topology::{Carrier, Continuity, ContinuousAdd};
use crate::transport::{Transport, TransportError};
use std::sync::Arc;

impl<R, S, M1, M2> ContinuousLinearMap<R, S, M1, M2>
where
    R: ScalarRing,
    S: ScalarRing,
    M1: Carrier<R>,
    M2: Carrier<S>,
{
    /// `x ↦ (f(x), g(x))`.
    pub fn prod<M3: Carrier<S>>(
        &self,
        other: &ContinuousLinearMap<R, S, M1, M3>,
    ) -> Result<ContinuousLinearMap<R, S, M1, Prod<M2, M3>>, MapError> {
        check_symbols(&self.transport, &other.transport)?;
        let (f, g) = (Arc::clone(&self.func), Arc::clone(&other.func));
        Ok(ContinuousLinearMap::from_parts(
            self.transport.clone(),
            move |x: &M1| Prod(f(x), g(x)),
            Continuity::Prod(Box::new(self.continuity.clone()), Box::new(other.continuity.clone())),
        ))
    }

    /// `(x, y) ↦ (f(x), g(y))`.
    pub fn prod_map<M3: Carrier<R>, M4: Carrier<S>>(
        &self,
        other: &ContinuousLinearMap<R, S, M3, M4>,
    ) -> Result<ContinuousLinearMap<R, S, Prod<M1, M3>, Prod<M2, M4>>, MapError> {
        check_symbols(&self.transport, &other.transport)?;
        let (f, g) = (Arc::clone(&self.func), Arc::clone(&other.func));
        let continuity = Continuity::Prod(
            Box::new(Continuity::comp(&self.continuity, &Continuity::Fst)),
            Box::new(Continuity::comp(&other.continuity, &Continuity::Snd)),
        );
        Ok(ContinuousLinearMap::from_parts(
            self.transport.clone(),
            move |p: &Prod<M1, M3>| Prod(f(&p.0), g(&p.1)),
            continuity,
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
    /// `(x, y) ↦ f(x) + g(y)`.
    pub fn coprod<M0: Carrier<R>>(
        &self,
        other: &ContinuousLinearMap<R, S, M0, M2>,
    ) -> Result<ContinuousLinearMap<R, S, Prod<M1, M0>, M2>, MapError> {
        check_symbols(&self.transport, &other.transport)?;
        let (f, g) = (Arc::clone(&self.func), Arc::clone(&other.func));
        Ok(ContinuousLinearMap::from_parts(
            self.transport.clone(),
            move |p: &Prod<M1, M0>| f(&p.0).plus(&g(&p.1)),
            Continuity::Coprod(Box::new(self.continuity.clone()), Box::new(other.continuity.clone())),
        ))
    }
}

fn check_symbols<R, S>(a: &Transport<R, S>, b: &Transport<R, S>) -> Result<(), MapError>
where
    R: ScalarRing,
    S: ScalarRing,
{
    if a.symbol() != b.symbol() {
        return Err(TransportError::TransportMismatch {
            expected: a.symbol().clone(),
            found: b.symbol().clone(),
        }
        .into());
    }
    Ok(())
}

/// `(a, b) ↦ a`.
pub fn fst<R: ScalarRing, A: Carrier<R>, B: Carrier<R>>() -> ClMap<R, Prod<A, B>, A> {
    ClMap::from_parts(Transport::id(), |p: &Prod<A, B>| p.0.clone(), Continuity::Fst)
}

/// `(a, b) ↦ b`.
pub fn snd<R: ScalarRing, A: Carrier<R>, B: Carrier<R>>() -> ClMap<R, Prod<A, B>, B> {
    ClMap::from_parts(Transport::id(), |p: &Prod<A, B>| p.1.clone(), Continuity::Snd)
}

/// `a ↦ (a, 0)`.
pub fn inl<R: ScalarRing, A: Carrier<R>, B: Carrier<R>>() -> ClMap<R, A, Prod<A, B>> {
    ClMap::from_parts(Transport::id(), |a: &A| Prod(a.clone(), B::origin()), Continuity::Inl)
}

/// `b ↦ (0, b)`.
pub fn inr<R: ScalarRing, A: Carrier<R>, B: Carrier<R>>() -> ClMap<R, B, Prod<A, B>> {
    ClMap::from_parts(Transport::id(), |b: &B| Prod(A::origin(), b.clone()), Continuity::Inr)
}

/// Projection `Π M → M` onto component `i`.
pub fn proj<R: ScalarRing, M: Carrier<R>, const N: usize>(i: usize) -> Result<ClMap<R, Pi<M, N>, M>, MapError> {
    if i >= N {
        return Err(MapError::IndexOutOfRange { index: i, len: N });
    }
    Ok(ClMap::from_parts(
        Transport::id(),
        move |v: &Pi<M, N>| v.0[i].clone(),
        Continuity::Proj(i),
    ))
}

/// `x ↦ (fᵢ(x))ᵢ` for a family sharing one transport.
///
/// The transport of an empty family is undetermined, so `N = 0` is rejected.
pub fn pi<R, S, M, Phi, const N: usize>(
    family: [ContinuousLinearMap<R, S, M, Phi>; N],
) -> Result<ContinuousLinearMap<R, S, M, Pi<Phi, N>>, MapError>
where
    R: ScalarRing,
    S: ScalarRing,
    M: Carrier<R>,
    Phi: Carrier<S>,
{
    let first = family.first().ok_or(MapError::EmptyFamily)?;
    for member in &family[1..] {
        check_symbols(&first.transport, &member.transport)?;
    }
    let transport = first.transport.clone();
    let continuity = Continuity::Pi(family.iter().map(|f| f.continuity.clone()).collect());
    let funcs: Vec<_> = family.iter().map(|f| Arc::clone(&f.func)).collect();
    Ok(ContinuousLinearMap::from_parts(
        transport,
        move |x: &M| Pi(std::array::from_fn(|i| funcs[i](x))),
        continuity,
    ))
}
