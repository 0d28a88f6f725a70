//! Semilinear: continuous semilinear maps between topological modules.
//!
//! This crate provides:
//! - ring-homomorphism transports `σ : R → S`, with an explicit registry of
//!   composition triples and inverse pairs;
//! - continuous `σ`-semilinear maps, with composition, pointwise group and
//!   module structure, products, codomain restriction and restriction of
//!   scalars, each carrying a derived continuity certificate;
//! - continuous linear equivalences, their groupoid operations, the
//!   automorphism group and its units correspondence;
//! - the topological closure of submodules and closed-complemented
//!   submodules;
//! - a tagged and a total inverse for maps.
//!
//! # Model
//!
//! Every carrier has a *linear* topology given by a finite subgroup `N` of
//! infinitesimals (the closure of `{0}`). A map is continuous iff it sends
//! `N₁` into `N₂`, the closure of `S` is `S + N`, and a carrier is separated
//! iff `N = {0}`. Discrete carriers (the scalar rings, `ℤ/p`, Gaussian
//! integers) have `N = {0}`; [`topology::Indiscrete`] is the other extreme.
//!
//! # Citations
//!
//! - Bourbaki, "Algebra I", Chapter II §1.13 (1974) – semilinear maps
//! - Warner, "Topological Rings", §§3–6 (1993) – linear topologies, continuous module maps
//! - Bourbaki, "General Topology", Chapter III §2 (1966) – closures in topological groups
//!
//! # Example
//!
//! ```
//! use semilinear::prelude::*;
//!
//! let two = End::<i64, i64>::id().smul(&2);
//! let three = End::<i64, i64>::id().smul(&3);
//! assert_eq!(two.comp(&three), End::id().smul(&6));
//! assert_eq!(two.add(&three).unwrap(), End::id().smul(&5));
//! ```

pub mod algebra;
pub mod closure;
pub mod config;
pub mod equiv;
pub mod fingerprint;
pub mod inverse;
pub mod map;
pub mod submodule;
pub mod topology;
pub mod transport;

pub use algebra::{AddGroup, Enumerable, FreeModule, Gaussian, Module, Pi, Prod, ScalarRing, Vector, Zmod};
pub use closure::{closed_complemented, topological_closure, ClosedComplemented, ClosureOperator, TopologicalClosure};
pub use config::SearchConfig;
pub use equiv::{Aut, ClEquiv, ContinuousLinearEquiv, EquivError, Homeomorph, Unit};
pub use inverse::{inverse, invert, BasisSearch, Catalogue, EnumerativeSearch, InverseSearch, Invertibility};
pub use map::{ClMap, ContinuousLinearMap, End, MapError};
pub use submodule::{Submodule, SubmoduleError};
pub use topology::{Carrier, Continuity, TopologicalModule};
pub use transport::{CompTriple, InversePair, Surjective, Transport, TransportError, TransportRegistry};

/// Prelude for convenient usage.
pub mod prelude {
    pub use crate::algebra::{AddGroup, Enumerable, FreeModule, Gaussian, Module, Pi, Prod, ScalarRing, Vector, Zmod};
    pub use crate::closure::{closed_complemented, is_closed, is_dense, topological_closure, ClosedComplemented};
    pub use crate::config::SearchConfig;
    pub use crate::equiv::{arrow_congr_equiv, units_equiv, Aut, ClEquiv, ContinuousLinearEquiv, EquivError, Unit};
    pub use crate::inverse::{inverse, inverse_linear, invert, BasisSearch, Catalogue, EnumerativeSearch, Invertibility};
    pub use crate::map::{fst, inl, inr, pi, proj, snd, ClMap, ContinuousLinearMap, End, ImageWitness, MapError};
    pub use crate::submodule::Submodule;
    pub use crate::topology::{
        Carrier, Continuity, ContinuousAdd, ContinuousSmul, Indiscrete, T2Space, TopologicalAddGroup,
    };
    pub use crate::transport::{CompTriple, InversePair, Transport, TransportRegistry};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use num_bigint::BigInt;
    use num_rational::BigRational;

    type F3 = Zmod<3>;

    fn q(n: i64) -> BigRational {
        BigRational::from_integer(BigInt::from(n))
    }

    #[test]
    fn multiples_of_identity_compose_and_add() {
        let two = End::<BigRational, BigRational>::id().smul(&q(2));
        let three = End::<BigRational, BigRational>::id().smul(&q(3));
        assert_eq!(two.comp(&three), End::id().smul(&q(6)));
        assert_eq!(two.add(&three).unwrap(), End::id().smul(&q(5)));
        assert_eq!(two.comp(&three).apply(&q(7)), q(42));
    }

    #[test]
    fn kernel_of_first_projection() {
        type P = Prod<F3, F3>;
        let ker = fst::<F3, F3, F3>().kernel();
        let vertical = Submodule::<F3, P>::from_predicate("0 × M", |p: &P| p.0.is_origin());
        assert!(ker.set_eq(&vertical));
        assert_eq!(ker.elements().len(), 3);
    }

    #[test]
    fn skew_product_shears_by_the_coupling() {
        let registry = TransportRegistry::new();
        let f = End::<i64, i64>::id().smul(&4);
        let e = ClEquiv::<i64, i64, i64>::refl()
            .skew_prod(&ClEquiv::refl(), &f, &registry)
            .unwrap();
        for (x, y) in [(0, 0), (1, 2), (-3, 5)] {
            assert_eq!(e.apply(&Prod(x, y)), Prod(x, y + 4 * x));
            assert_eq!(e.apply_symm(&Prod(x, y)), Prod(x, y - 4 * x));
        }
    }

    #[test]
    fn bot_and_top_are_closed_complemented() {
        type V = Vector<F3, 2>;
        let config = SearchConfig::default();
        let bot = closed_complemented(&Submodule::<F3, V>::bot(), &config).unwrap().unwrap();
        assert!(bot.projection().as_map().is_zero());
        let top = closed_complemented(&Submodule::<F3, V>::top(), &config).unwrap().unwrap();
        assert_eq!(top.projection().as_map(), &End::id());
        assert!(bot.is_closed() && top.is_closed());
    }

    #[test]
    fn inverse_of_an_equivalence_agrees_with_symm() {
        type V = Vector<F3, 2>;
        let swap = End::<F3, V>::of_basis_images(
            Transport::id(),
            vec![Pi([F3::new(0), F3::new(1)]), Pi([F3::new(1), F3::new(0)])],
        )
        .unwrap();
        let e = ClEquiv::equiv_of_inverse(swap.clone(), swap.clone(), &InversePair::refl()).unwrap();
        let search = EnumerativeSearch::default();
        assert_eq!(inverse_linear(e.to_map(), &search), *e.symm().to_map());

        let projection = End::<F3, V>::of_basis_images(
            Transport::id(),
            vec![Pi([F3::new(1), F3::new(0)]), V::origin()],
        )
        .unwrap();
        assert!(!invert(&projection, &InversePair::refl(), &search).is_invertible());
        assert!(inverse_linear(&projection, &search).is_zero());
    }

    #[test]
    fn rational_inverse_without_registration() {
        type V = Vector<BigRational, 2>;
        let f = End::<BigRational, V>::of_basis_images(
            Transport::id(),
            vec![Pi([q(2), q(0)]), Pi([q(1), q(1)])],
        )
        .unwrap();
        let e = invert(&f, &InversePair::refl(), &BasisSearch).into_equiv().unwrap();
        assert_eq!(inverse_linear(&f, &BasisSearch), *e.symm().to_map());
        assert_eq!(e.apply_symm(&Pi([q(3), q(1)])), Pi([q(1), q(1)]));
    }

    #[test]
    fn the_crate_surface_is_thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<End<i64, i64>>();
        assert_send_sync::<ClEquiv<F3, F3, F3>>();
        assert_send_sync::<Submodule<F3, F3>>();
        assert_send_sync::<TransportRegistry>();
    }
}
