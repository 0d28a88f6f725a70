//! Scalar transports and the compatibility registry.
//!
//! A transport `σ : R → S` is a ring homomorphism linking the scalars of a
//! map's domain to those of its codomain. Transports are represented
//! symbolically, as a word of generator names applied first to last (the
//! empty word is the identity), together with the function itself.
//!
//! The [`TransportRegistry`] decides the relations that make compositions and
//! inversions legal:
//!
//! - **composition triple** `(σ12, σ23, σ13)`: `σ13 = σ23 ∘ σ12`;
//! - **inverse pair** `(σ, σ')`: `σ' ∘ σ = id` and `σ ∘ σ' = id`;
//! - **surjectivity** of `σ`, needed for ranges to be submodules.
//!
//! Relations are decided on normalised words (adjacent declared inverses
//! cancel) and, unless disabled in [`SearchConfig`], confirmed pointwise on
//! the probe scalars of the source ring. A relation that holds is packaged
//! as a witness value ([`CompTriple`], [`InversePair`], [`Surjective`]);
//! constructions that need the relation take the witness as an argument.
//!
//! # Citations
//! - Semilinear maps and ring homomorphisms: Bourbaki, "Algebra I", Chapter II §1.13 (1974)
//! - Free groups and reduced words: Lyndon & Schupp, "Combinatorial Group Theory", Chapter I (1977)

use crate::algebra::ScalarRing;
use crate::config::SearchConfig;
use crate::fingerprint::{
    put_str, Canonicalizable, HashValue, DOMAIN_COMP_TRIPLE_V0, DOMAIN_INVERSE_PAIR_V0,
    DOMAIN_TRANSPORT_V0,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors raised while checking transport relations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// `σ13` differs from `σ23 ∘ σ12`.
    #[error("incompatible triple: expected composite {expected}, found {found}")]
    IncompatibleTriple {
        expected: TransportSymbol,
        found: TransportSymbol,
    },
    /// The two transports do not invert each other.
    #[error("{forward} and {backward} are not mutually inverse")]
    NotInversePair {
        forward: TransportSymbol,
        backward: TransportSymbol,
    },
    /// The transport is not known to be surjective.
    #[error("transport {0} is not declared surjective")]
    NotSurjective(TransportSymbol),
    /// A map's transport does not match the one recorded in a witness.
    #[error("transport mismatch: witness has {expected}, map has {found}")]
    TransportMismatch {
        expected: TransportSymbol,
        found: TransportSymbol,
    },
    /// The symbolic check passed but the functions disagree on a probe.
    #[error("transport {symbol} disagrees with its declaration at probe {probe}")]
    PointwiseMismatch { symbol: TransportSymbol, probe: String },
    /// A generator fails a ring homomorphism law on a probe.
    #[error("generator {name} violates {law}")]
    NotHomomorphism { name: String, law: &'static str },
}

/// A transport word: generator names applied first to last.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransportSymbol(Vec<String>);

impl TransportSymbol {
    /// The empty word.
    #[inline]
    pub fn identity() -> Self {
        Self(Vec::new())
    }

    /// A single generator.
    pub fn generator(name: impl Into<String>) -> Self {
        Self(vec![name.into()])
    }

    /// `self` followed by `next`.
    pub fn then(&self, next: &TransportSymbol) -> Self {
        let mut word = self.0.clone();
        word.extend(next.0.iter().cloned());
        Self(word)
    }

    /// Whether this is the empty word.
    #[inline]
    pub fn is_identity(&self) -> bool {
        self.0.is_empty()
    }

    /// The generator names, in application order.
    #[inline]
    pub fn word(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for TransportSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "id");
        }
        write!(f, "{}", self.0.join(";"))
    }
}

impl Canonicalizable for TransportSymbol {
    fn to_canonical_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(8 + 16 * self.0.len());
        out.extend_from_slice(&(self.0.len() as u64).to_le_bytes());
        for name in &self.0 {
            put_str(&mut out, name);
        }
        out
    }
}

/// A ring homomorphism `R → S` with its symbolic name.
pub struct Transport<R, S> {
    symbol: TransportSymbol,
    func: Arc<dyn Fn(&R) -> S + Send + Sync>,
}

impl<R, S> Clone for Transport<R, S> {
    fn clone(&self) -> Self {
        Self {
            symbol: self.symbol.clone(),
            func: Arc::clone(&self.func),
        }
    }
}

impl<R, S> fmt::Debug for Transport<R, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Transport").field(&self.symbol).finish()
    }
}

impl<R: ScalarRing> Transport<R, R> {
    /// The identity transport; maps with it are linear.
    pub fn id() -> Self {
        Self {
            symbol: TransportSymbol::identity(),
            func: Arc::new(|r: &R| r.clone()),
        }
    }
}

impl<R: ScalarRing, S: ScalarRing> Transport<R, S> {
    /// A generator transport, trusted to be a ring homomorphism.
    pub fn named(name: impl Into<String>, f: impl Fn(&R) -> S + Send + Sync + 'static) -> Self {
        Self {
            symbol: TransportSymbol::generator(name),
            func: Arc::new(f),
        }
    }

    /// A generator transport whose homomorphism laws are checked on
    /// `R::probes()`.
    pub fn checked(
        name: impl Into<String>,
        f: impl Fn(&R) -> S + Send + Sync + 'static,
    ) -> Result<Self, TransportError> {
        let name = name.into();
        let fail = |law| TransportError::NotHomomorphism {
            name: name.clone(),
            law,
        };
        if f(&R::one()) != S::one() {
            return Err(fail("σ(1) = 1"));
        }
        let probes = R::probes();
        for a in &probes {
            for b in &probes {
                if f(&a.ring_add(b)) != f(a).ring_add(&f(b)) {
                    return Err(fail("σ(a + b) = σ(a) + σ(b)"));
                }
                if f(&a.ring_mul(b)) != f(a).ring_mul(&f(b)) {
                    return Err(fail("σ(ab) = σ(a)σ(b)"));
                }
            }
        }
        Ok(Self::named(name, f))
    }

    /// Evaluates `σ(r)`.
    #[inline]
    pub fn apply(&self, r: &R) -> S {
        (self.func)(r)
    }

    /// The symbolic word.
    #[inline]
    pub fn symbol(&self) -> &TransportSymbol {
        &self.symbol
    }

    /// Whether the word is empty.
    #[inline]
    pub fn is_identity(&self) -> bool {
        self.symbol.is_identity()
    }

    /// `next ∘ self` with the concatenated, unnormalised word.
    pub fn then<T: ScalarRing>(&self, next: &Transport<S, T>) -> Transport<R, T> {
        let first = Arc::clone(&self.func);
        let second = Arc::clone(&next.func);
        Transport {
            symbol: self.symbol.then(&next.symbol),
            func: Arc::new(move |r: &R| second(&first(r))),
        }
    }

    /// Same function under a different word.
    pub(crate) fn with_symbol(&self, symbol: TransportSymbol) -> Self {
        Self {
            symbol,
            func: Arc::clone(&self.func),
        }
    }

    /// Fingerprint of the word.
    pub fn fingerprint(&self) -> HashValue {
        self.symbol.fingerprint(DOMAIN_TRANSPORT_V0)
    }
}

/// Declared relations among transport generators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportRegistry {
    inverses: BTreeMap<String, BTreeSet<String>>,
    surjective: BTreeSet<String>,
    config: SearchConfig,
}

impl TransportRegistry {
    /// Empty registry with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty registry with the given configuration.
    pub fn with_config(config: SearchConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// The active configuration.
    #[inline]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Declares `b ∘ a = id` and `a ∘ b = id`; both become surjective.
    pub fn declare_inverse(&mut self, a: impl Into<String>, b: impl Into<String>) -> &mut Self {
        let (a, b) = (a.into(), b.into());
        debug!(%a, %b, "declare inverse transports");
        self.inverses.entry(a.clone()).or_default().insert(b.clone());
        self.inverses.entry(b.clone()).or_default().insert(a.clone());
        self.surjective.insert(a);
        self.surjective.insert(b);
        self
    }

    /// Declares `a ∘ a = id`.
    pub fn declare_involution(&mut self, a: impl Into<String>) -> &mut Self {
        let a = a.into();
        self.declare_inverse(a.clone(), a)
    }

    /// Declares `a` surjective.
    pub fn declare_surjective(&mut self, a: impl Into<String>) -> &mut Self {
        self.surjective.insert(a.into());
        self
    }

    fn cancels(&self, a: &str, b: &str) -> bool {
        self.inverses.get(a).is_some_and(|inv| inv.contains(b))
    }

    /// Reduces a word by cancelling adjacent declared inverses.
    pub fn normalize(&self, symbol: &TransportSymbol) -> TransportSymbol {
        let mut stack: Vec<String> = Vec::with_capacity(symbol.0.len());
        for g in &symbol.0 {
            match stack.last() {
                Some(top) if self.cancels(top, g) => {
                    stack.pop();
                }
                _ => stack.push(g.clone()),
            }
        }
        TransportSymbol(stack)
    }

    /// Whether every generator of the normalised word is surjective.
    pub fn is_surjective(&self, symbol: &TransportSymbol) -> bool {
        self.normalize(symbol)
            .0
            .iter()
            .all(|g| self.surjective.contains(g))
    }

    /// `σ23 ∘ σ12`, with a normalised word. Always legal.
    pub fn compose_transport<R1, R2, R3>(
        &self,
        s12: &Transport<R1, R2>,
        s23: &Transport<R2, R3>,
    ) -> Transport<R1, R3>
    where
        R1: ScalarRing,
        R2: ScalarRing,
        R3: ScalarRing,
    {
        let raw = s12.then(s23);
        let symbol = self.normalize(raw.symbol());
        debug!(first = %s12.symbol, second = %s23.symbol, composite = %symbol, "compose transports");
        raw.with_symbol(symbol)
    }

    fn check_triple<R1, R2, R3>(
        &self,
        s12: &Transport<R1, R2>,
        s23: &Transport<R2, R3>,
        s13: &Transport<R1, R3>,
    ) -> Result<(), TransportError>
    where
        R1: ScalarRing,
        R2: ScalarRing,
        R3: ScalarRing,
    {
        let expected = self.normalize(&s12.symbol.then(&s23.symbol));
        let found = self.normalize(&s13.symbol);
        if expected != found {
            return Err(TransportError::IncompatibleTriple { expected, found });
        }
        if self.config.pointwise_transport_checks {
            for r in R1::probes() {
                if s13.apply(&r) != s23.apply(&s12.apply(&r)) {
                    return Err(TransportError::PointwiseMismatch {
                        symbol: s13.symbol.clone(),
                        probe: format!("{:?}", r),
                    });
                }
            }
        }
        Ok(())
    }

    /// Whether `σ13 = σ23 ∘ σ12`.
    pub fn triple_holds<R1, R2, R3>(
        &self,
        s12: &Transport<R1, R2>,
        s23: &Transport<R2, R3>,
        s13: &Transport<R1, R3>,
    ) -> bool
    where
        R1: ScalarRing,
        R2: ScalarRing,
        R3: ScalarRing,
    {
        self.check_triple(s12, s23, s13).is_ok()
    }

    /// Checks the triple relation and packages it as a witness.
    pub fn triple<R1, R2, R3>(
        &self,
        s12: &Transport<R1, R2>,
        s23: &Transport<R2, R3>,
        s13: &Transport<R1, R3>,
    ) -> Result<CompTriple<R1, R2, R3>, TransportError>
    where
        R1: ScalarRing,
        R2: ScalarRing,
        R3: ScalarRing,
    {
        self.check_triple(s12, s23, s13)?;
        let triple = CompTriple::assemble(s12.clone(), s23.clone(), s13.clone());
        debug!(composite = %s13.symbol, fingerprint = %triple.fingerprint, "composition triple");
        Ok(triple)
    }

    fn check_inverse_pair<R, S>(
        &self,
        forward: &Transport<R, S>,
        backward: &Transport<S, R>,
    ) -> Result<(), TransportError>
    where
        R: ScalarRing,
        S: ScalarRing,
    {
        let not_inverse = || TransportError::NotInversePair {
            forward: forward.symbol.clone(),
            backward: backward.symbol.clone(),
        };
        let there_and_back = self.normalize(&forward.symbol.then(&backward.symbol));
        let back_and_there = self.normalize(&backward.symbol.then(&forward.symbol));
        if !there_and_back.is_identity() || !back_and_there.is_identity() {
            return Err(not_inverse());
        }
        if self.config.pointwise_transport_checks {
            for r in R::probes() {
                if backward.apply(&forward.apply(&r)) != r {
                    return Err(TransportError::PointwiseMismatch {
                        symbol: there_and_back,
                        probe: format!("{:?}", r),
                    });
                }
            }
            for s in S::probes() {
                if forward.apply(&backward.apply(&s)) != s {
                    return Err(TransportError::PointwiseMismatch {
                        symbol: back_and_there,
                        probe: format!("{:?}", s),
                    });
                }
            }
        }
        Ok(())
    }

    /// Whether `σ' ∘ σ = id` and `σ ∘ σ' = id`.
    pub fn inverse_pair_holds<R, S>(&self, forward: &Transport<R, S>, backward: &Transport<S, R>) -> bool
    where
        R: ScalarRing,
        S: ScalarRing,
    {
        self.check_inverse_pair(forward, backward).is_ok()
    }

    /// Checks the inverse-pair relation and packages it as a witness.
    pub fn inverse_pair<R, S>(
        &self,
        forward: &Transport<R, S>,
        backward: &Transport<S, R>,
    ) -> Result<InversePair<R, S>, TransportError>
    where
        R: ScalarRing,
        S: ScalarRing,
    {
        self.check_inverse_pair(forward, backward)?;
        debug!(forward = %forward.symbol, backward = %backward.symbol, "inverse pair");
        Ok(InversePair::assemble(forward.clone(), backward.clone()))
    }

    /// Packages a surjectivity declaration as a witness.
    pub fn surjective<R, S>(&self, transport: &Transport<R, S>) -> Result<Surjective<R, S>, TransportError>
    where
        R: ScalarRing,
        S: ScalarRing,
    {
        if !self.is_surjective(&transport.symbol) {
            return Err(TransportError::NotSurjective(transport.symbol.clone()));
        }
        Ok(Surjective {
            transport: transport.clone(),
        })
    }
}

/// Witness that `composite = second ∘ first`.
#[derive(Debug)]
pub struct CompTriple<R1, R2, R3> {
    first: Transport<R1, R2>,
    second: Transport<R2, R3>,
    composite: Transport<R1, R3>,
    fingerprint: HashValue,
}

impl<R1, R2, R3> Clone for CompTriple<R1, R2, R3> {
    fn clone(&self) -> Self {
        Self {
            first: self.first.clone(),
            second: self.second.clone(),
            composite: self.composite.clone(),
            fingerprint: self.fingerprint,
        }
    }
}

impl<R1: ScalarRing, R2: ScalarRing, R3: ScalarRing> CompTriple<R1, R2, R3> {
    fn assemble(first: Transport<R1, R2>, second: Transport<R2, R3>, composite: Transport<R1, R3>) -> Self {
        let fingerprint = HashValue::combine(
            DOMAIN_COMP_TRIPLE_V0,
            &[first.fingerprint(), second.fingerprint(), composite.fingerprint()],
        );
        Self {
            first,
            second,
            composite,
            fingerprint,
        }
    }

    /// The triple whose composite is computed by the registry.
    pub fn canonical(registry: &TransportRegistry, first: &Transport<R1, R2>, second: &Transport<R2, R3>) -> Self {
        let composite = registry.compose_transport(first, second);
        Self::assemble(first.clone(), second.clone(), composite)
    }

    /// `σ12`.
    #[inline]
    pub fn first(&self) -> &Transport<R1, R2> {
        &self.first
    }

    /// `σ23`.
    #[inline]
    pub fn second(&self) -> &Transport<R2, R3> {
        &self.second
    }

    /// `σ13`.
    #[inline]
    pub fn composite(&self) -> &Transport<R1, R3> {
        &self.composite
    }

    /// Identifies the checked relation.
    #[inline]
    pub fn fingerprint(&self) -> HashValue {
        self.fingerprint
    }
}

impl<R: ScalarRing> CompTriple<R, R, R> {
    /// `(id, id, id)`, which always holds.
    pub fn identity() -> Self {
        Self::assemble(Transport::id(), Transport::id(), Transport::id())
    }
}

/// Witness that `backward` and `forward` are mutually inverse.
#[derive(Debug)]
pub struct InversePair<R, S> {
    forward: Transport<R, S>,
    backward: Transport<S, R>,
}

impl<R, S> Clone for InversePair<R, S> {
    fn clone(&self) -> Self {
        Self {
            forward: self.forward.clone(),
            backward: self.backward.clone(),
        }
    }
}

impl<R: ScalarRing> InversePair<R, R> {
    /// `(id, id)`.
    pub fn refl() -> Self {
        Self::assemble(Transport::id(), Transport::id())
    }
}

impl<R: ScalarRing, S: ScalarRing> InversePair<R, S> {
    fn assemble(forward: Transport<R, S>, backward: Transport<S, R>) -> Self {
        Self { forward, backward }
    }

    /// `σ`.
    #[inline]
    pub fn forward(&self) -> &Transport<R, S> {
        &self.forward
    }

    /// `σ'`.
    #[inline]
    pub fn backward(&self) -> &Transport<S, R> {
        &self.backward
    }

    /// `(σ', σ)`.
    pub fn symm(&self) -> InversePair<S, R> {
        InversePair::assemble(self.backward.clone(), self.forward.clone())
    }

    /// `(τ ∘ σ, σ' ∘ τ')`, rechecked by the registry.
    pub fn trans<T: ScalarRing>(
        &self,
        other: &InversePair<S, T>,
        registry: &TransportRegistry,
    ) -> Result<InversePair<R, T>, TransportError> {
        let forward = registry.compose_transport(&self.forward, &other.forward);
        let backward = registry.compose_transport(&other.backward, &self.backward);
        registry.inverse_pair(&forward, &backward)
    }

    /// An invertible transport is surjective.
    pub fn surjective(&self) -> Surjective<R, S> {
        Surjective {
            transport: self.forward.clone(),
        }
    }

    /// Identifies the checked relation.
    pub fn fingerprint(&self) -> HashValue {
        HashValue::combine(
            DOMAIN_INVERSE_PAIR_V0,
            &[self.forward.fingerprint(), self.backward.fingerprint()],
        )
    }
}

/// Witness that a transport is surjective.
#[derive(Debug)]
pub struct Surjective<R, S> {
    transport: Transport<R, S>,
}

impl<R, S> Clone for Surjective<R, S> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
        }
    }
}

impl<R: ScalarRing> Surjective<R, R> {
    /// The identity is surjective.
    pub fn identity() -> Self {
        Self {
            transport: Transport::id(),
        }
    }
}

impl<R: ScalarRing, S: ScalarRing> Surjective<R, S> {
    /// The surjective transport.
    #[inline]
    pub fn transport(&self) -> &Transport<R, S> {
        &self.transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::Gaussian;

    type G = Gaussian<i64>;

    fn conj() -> Transport<G, G> {
        Transport::checked("conj", |z: &G| z.conj()).unwrap()
    }

    fn registry() -> TransportRegistry {
        let mut registry = TransportRegistry::new();
        registry.declare_involution("conj");
        registry
    }

    #[test]
    fn normalization_cancels_declared_inverses() {
        let registry = registry();
        let word = TransportSymbol(vec!["conj".into(), "conj".into(), "conj".into()]);
        assert_eq!(registry.normalize(&word), TransportSymbol::generator("conj"));
        let word = TransportSymbol(vec!["conj".into(), "other".into(), "conj".into()]);
        assert_eq!(registry.normalize(&word).word().len(), 3);
    }

    #[test]
    fn conjugation_is_involutive_pair() {
        let registry = registry();
        let pair = registry.inverse_pair(&conj(), &conj()).unwrap();
        assert!(registry.compose_transport(pair.forward(), pair.backward()).is_identity());
        assert!(registry.inverse_pair(&conj(), &Transport::id()).is_err());
    }

    #[test]
    fn triples_accept_only_the_composite() {
        let registry = registry();
        let id = Transport::<G, G>::id();
        let triple = registry.triple(&conj(), &conj(), &id).unwrap();
        assert!(triple.composite().is_identity());
        assert!(registry.triple_holds(&conj(), &id, &conj()));
        let err = registry.triple(&conj(), &id, &id).unwrap_err();
        assert!(matches!(err, TransportError::IncompatibleTriple { .. }));
    }

    #[test]
    fn canonical_triple_matches_checked_triple() {
        let registry = registry();
        let canonical = CompTriple::canonical(&registry, &conj(), &conj());
        let checked = registry
            .triple(&conj(), &conj(), &Transport::id())
            .unwrap();
        assert_eq!(canonical.fingerprint(), checked.fingerprint());
        assert_eq!(
            CompTriple::<i64, i64, i64>::identity().fingerprint(),
            CompTriple::<i64, i64, i64>::canonical(
                &TransportRegistry::new(),
                &Transport::id(),
                &Transport::id()
            )
            .fingerprint()
        );
    }

    #[test]
    fn false_declaration_is_caught_pointwise() {
        let mut registry = TransportRegistry::new();
        registry.declare_inverse("conj", "fake");
        let fake = Transport::<G, G>::named("fake", |z: &G| z.clone());
        let err = registry.inverse_pair(&conj(), &fake).unwrap_err();
        assert!(matches!(err, TransportError::PointwiseMismatch { .. }));

        let mut symbolic = TransportRegistry::with_config(SearchConfig::symbolic());
        symbolic.declare_inverse("conj", "fake");
        assert!(symbolic.inverse_pair_holds(&conj(), &fake));
    }

    #[test]
    fn homomorphism_laws_are_checked() {
        let doubling = Transport::<i64, i64>::checked("double", |r: &i64| 2 * r);
        assert!(matches!(doubling, Err(TransportError::NotHomomorphism { .. })));
    }

    #[test]
    fn surjectivity_witnesses() {
        let registry = registry();
        assert!(registry.surjective(&conj()).is_ok());
        let frob = Transport::<i64, i64>::named("frob", |r: &i64| *r);
        assert!(matches!(
            registry.surjective(&frob),
            Err(TransportError::NotSurjective(_))
        ));
        assert!(registry.surjective(&Transport::<i64, i64>::id()).is_ok());
    }

    #[test]
    fn pair_trans_and_symm() {
        let registry = registry();
        let pair = registry.inverse_pair(&conj(), &conj()).unwrap();
        let both = pair.trans(&pair, &registry).unwrap();
        assert!(both.forward().is_identity());
        assert_eq!(pair.symm().fingerprint(), pair.fingerprint());
    }

    #[test]
    fn symbol_display() {
        assert_eq!(TransportSymbol::identity().to_string(), "id");
        let w = TransportSymbol::generator("a").then(&TransportSymbol::generator("b"));
        assert_eq!(w.to_string(), "a;b");
    }
}
