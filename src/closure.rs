//! Topological closure of submodules and closed-complemented submodules.
//!
//! With a linear topology whose smallest open subgroup is `N`, the closure of
//! a set `S` is `S + N`: a point lies in the closure iff every open
//! neighbourhood meets `S`, and the smallest neighbourhood of `x` is `x + N`.
//! The closure of a submodule is again a submodule (addition and the scalar
//! action are continuous, and `N` is itself a submodule), and
//!
//! - `S ⊆ cl(S)` (take `n = 0`);
//! - `cl(S)` is closed, since `N + N = N`;
//! - `S ⊆ T ⇒ cl(S) ⊆ cl(T)`;
//! - `T` closed and `S ⊆ T` give `cl(S) ⊆ T`;
//! - `cl(cl(S)) = cl(S)`.
//!
//! A submodule `p` is closed complemented when some continuous projection
//! `M → p` is the identity on `p`. Then `q = ker(projection)` satisfies
//! `p ⊕ q = M`, and on a separated space `p` is closed as the kernel of
//! `id - projection`.
//!
//! # Citations
//! - Closure operators: Birkhoff, "Lattice Theory", Chapter V (1967)
//! - Complemented subspaces: Rudin, "Functional Analysis", §4.20 (1991)

use crate::algebra::{cartesian_power, AddGroup, Enumerable, FreeModule, ScalarRing};
use crate::config::SearchConfig;
use crate::map::{ClMap, CodRestricted, End, ImageWitness, MapError};
use crate::submodule::{Submodule, SubmoduleError};
use crate::topology::{Carrier, Continuity, ContinuousAdd, ContinuousSmul, T2Space, TopologicalAddGroup};
use crate::transport::Transport;
use tracing::{debug, trace, warn};

/// An extensive, monotone, idempotent operator on substructures.
pub trait ClosureOperator<T> {
    /// The closure of `s`.
    fn close(&self, s: &T) -> T;
}

/// The topological closure `S ↦ S + N`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TopologicalClosure;

impl<R, M> ClosureOperator<Submodule<R, M>> for TopologicalClosure
where
    R: ScalarRing,
    M: Carrier<R> + ContinuousAdd + ContinuousSmul<R>,
{
    fn close(&self, s: &Submodule<R, M>) -> Submodule<R, M> {
        topological_closure(s)
    }
}

/// The closure `S + N` of a submodule.
pub fn topological_closure<R, M>(s: &Submodule<R, M>) -> Submodule<R, M>
where
    R: ScalarRing,
    M: Carrier<R> + ContinuousAdd + ContinuousSmul<R>,
{
    let inner = s.clone();
    let infinitesimals = M::infinitesimals();
    Submodule::from_predicate(format!("cl({})", s.label()), move |x: &M| {
        infinitesimals.iter().any(|n| inner.contains(&x.minus(n)))
    })
}

/// A submodule is closed iff it contains every infinitesimal.
pub fn is_closed<R, M>(s: &Submodule<R, M>) -> bool
where
    R: ScalarRing,
    M: Carrier<R>,
{
    M::infinitesimals().iter().all(|n| s.contains(n))
}

/// Whether `cl(S) = M`.
pub fn is_dense<R, M>(s: &Submodule<R, M>) -> bool
where
    R: ScalarRing,
    M: Carrier<R> + ContinuousAdd + ContinuousSmul<R> + Enumerable,
{
    let closure = topological_closure(s);
    M::elements().iter().all(|x| closure.contains(x))
}

/// A submodule together with a continuous projection onto it.
#[derive(Debug)]
pub struct ClosedComplemented<R, M> {
    submodule: Submodule<R, M>,
    projection: CodRestricted<R, R, M, M>,
}

impl<R, M> Clone for ClosedComplemented<R, M> {
    fn clone(&self) -> Self {
        Self {
            submodule: self.submodule.clone(),
            projection: self.projection.clone(),
        }
    }
}

impl<R, M> ClosedComplemented<R, M>
where
    R: ScalarRing,
    M: Carrier<R> + ContinuousAdd + ContinuousSmul<R>,
{
    fn restricted(submodule: Submodule<R, M>, projection: &End<R, M>) -> Result<Self, SubmoduleError> {
        let witness = ImageWitness::check(projection, &submodule).map_err(|err| match err {
            MapError::ImageEscapes { submodule, .. } => SubmoduleError::NotProjection(submodule),
            _ => SubmoduleError::NotProjection(submodule.label().to_string()),
        })?;
        let projection = projection
            .cod_restrict(&submodule, &witness)
            .map_err(|_| SubmoduleError::NotProjection(submodule.label().to_string()))?;
        Ok(Self {
            submodule,
            projection,
        })
    }

    /// `⊥`, projected onto by the zero map.
    pub fn bot() -> Self {
        let submodule = Submodule::bot();
        let projection = End::<R, M>::zero().cod_restrict_unchecked(&submodule);
        Self {
            submodule,
            projection,
        }
    }

    /// `⊤`, projected onto by the identity.
    pub fn top() -> Self {
        let submodule = Submodule::top();
        let projection = End::<R, M>::id().cod_restrict_unchecked(&submodule);
        Self {
            submodule,
            projection,
        }
    }

    /// `ker f1` for `f1` with a continuous right inverse `f2`, projected
    /// onto by `x ↦ x - f2(f1(x))`.
    pub fn of_right_inverse<M2>(f1: &ClMap<R, M, M2>, f2: &ClMap<R, M2, M>) -> Result<Self, SubmoduleError>
    where
        M2: Carrier<R> + ContinuousAdd,
    {
        if f1.comp(f2) != End::<R, M2>::id() {
            return Err(SubmoduleError::NotRightInverse);
        }
        let projection = End::<R, M>::id()
            .sub(&f2.comp(f1))
            .map_err(|_| SubmoduleError::NotRightInverse)?;
        debug!("projection onto kernel from right inverse");
        Self::restricted(f1.kernel(), &projection)
    }

    /// The submodule `p`.
    #[inline]
    pub fn submodule(&self) -> &Submodule<R, M> {
        &self.submodule
    }

    /// The projection `M → p`.
    #[inline]
    pub fn projection(&self) -> &CodRestricted<R, R, M, M> {
        &self.projection
    }

    /// The complement `q = ker(projection)`, with `p ⊕ q = M`.
    pub fn complement(&self) -> Submodule<R, M> {
        let label = format!("compl({})", self.submodule.label());
        self.projection.as_map().kernel().relabel(label)
    }

    /// Splits `x` as `(p-part, q-part)`.
    pub fn decompose(&self, x: &M) -> (M, M) {
        let p = self.projection.apply(x);
        let q = x.minus(&p);
        (p, q)
    }

    /// The complement with its own projection `id - projection`.
    pub fn complement_complemented(&self) -> Result<Self, SubmoduleError> {
        Self::restricted(self.complement(), &self.defect())
    }

    /// `id - projection`, whose kernel is `p`.
    pub fn defect(&self) -> End<R, M> {
        let projection = self.projection.as_map().clone();
        let continuity = Continuity::Add(
            Box::new(Continuity::Identity),
            Box::new(Continuity::Neg(Box::new(projection.continuity().clone()))),
        );
        End::from_parts(
            Transport::id(),
            move |x: &M| x.minus(&projection.apply(x)),
            continuity,
        )
    }
}

impl<R, M> ClosedComplemented<R, M>
where
    R: ScalarRing,
    M: Carrier<R> + ContinuousAdd + ContinuousSmul<R> + T2Space,
{
    /// `p` is closed in a separated space.
    pub fn is_closed(&self) -> bool {
        is_closed(&self.submodule)
    }
}

impl<R, M> ClosedComplemented<R, M>
where
    R: ScalarRing,
    M: Carrier<R> + ContinuousAdd + ContinuousSmul<R> + Enumerable,
{
    /// Checks that `projection` lands in `p` and fixes every element of `p`.
    pub fn from_projection(p: &Submodule<R, M>, projection: &End<R, M>) -> Result<Self, SubmoduleError> {
        if let Some(moved) = p.elements().iter().find(|x| projection.apply(x) != **x) {
            trace!(?moved, "projection moves an element");
            return Err(SubmoduleError::NotIdentityOnSubmodule(p.label().to_string()));
        }
        Self::restricted(p.clone(), projection)
    }

    /// Whether `p ⊓ q = ⊥` and `p ⊔ q = ⊤`.
    pub fn complement_is_compl(&self) -> bool {
        let q = self.complement();
        self.submodule.inf(&q).set_eq(&Submodule::bot())
            && self.submodule.sup(&q).set_eq(&Submodule::top())
    }
}

/// Searches for a continuous projection onto `p`.
///
/// Candidates are the linear maps sending each basis vector of `M` into
/// `p`; there are `|p|^rank` of them. `Ok(None)` means no candidate is a
/// projection. The search is rejected with
/// [`SubmoduleError::SearchBudgetExceeded`] before anything is listed when
/// `|M|` exceeds `max_enumeration`, and before any candidate is built when
/// `|p|^rank` exceeds `max_candidates`.
pub fn closed_complemented<R, M>(
    p: &Submodule<R, M>,
    config: &SearchConfig,
) -> Result<Option<ClosedComplemented<R, M>>, SubmoduleError>
where
    R: ScalarRing,
    M: Carrier<R> + FreeModule<R> + ContinuousAdd + ContinuousSmul<R> + Enumerable,
{
    let size = M::cardinality();
    if size > config.max_enumeration {
        warn!(size, budget = config.max_enumeration, "carrier too large to list");
        return Err(SubmoduleError::SearchBudgetExceeded {
            budget: config.max_enumeration,
            required: size,
        });
    }
    let members = p.elements();
    if members.len() == 1 {
        return Ok(Some(ClosedComplemented::bot()));
    }
    if members.len() == size {
        return Ok(Some(ClosedComplemented::top()));
    }
    let rank = M::rank();
    let required = members
        .len()
        .checked_pow(rank as u32)
        .unwrap_or(usize::MAX);
    if required > config.max_candidates {
        warn!(required, budget = config.max_candidates, "closed-complemented search over budget");
        return Err(SubmoduleError::SearchBudgetExceeded {
            budget: config.max_candidates,
            required,
        });
    }
    for images in cartesian_power(&members, rank) {
        let Ok(candidate) = End::<R, M>::of_basis_images(Transport::id(), images) else {
            continue;
        };
        if members.iter().all(|x| candidate.apply(x) == *x) {
            debug!(submodule = p.label(), "found projection");
            return ClosedComplemented::restricted(p.clone(), &candidate).map(Some);
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::{Pi, Prod, Vector, Zmod};
    use crate::map::{fst, inl};
    use crate::topology::Indiscrete;

    type F3 = Zmod<3>;
    type V = Vector<F3, 2>;
    // A separated line times an indiscrete line.
    type W = Prod<F3, Indiscrete<F3>>;

    fn v(a: u64, b: u64) -> V {
        Pi([F3::new(a), F3::new(b)])
    }

    fn w(a: u64, b: u64) -> W {
        Prod(F3::new(a), Indiscrete(F3::new(b)))
    }

    #[test]
    fn closure_adds_infinitesimals() {
        let bot = Submodule::<F3, W>::bot();
        let cl = topological_closure(&bot);
        assert!(cl.contains(&w(0, 2)));
        assert!(!cl.contains(&w(1, 0)));
        assert!(!is_closed(&bot));
        assert!(is_closed(&cl));
    }

    #[test]
    fn closure_laws_on_a_non_separated_module() {
        let closure = TopologicalClosure;
        let s = Submodule::<F3, W>::bot();
        let t = Submodule::<F3, W>::span(&[w(0, 1)]);
        let u = Submodule::<F3, W>::span(&[w(1, 0)]);
        let cl_s = closure.close(&s);
        assert!(s.le(&cl_s));
        assert!(is_closed(&cl_s));
        assert!(s.le(&u));
        assert!(cl_s.le(&closure.close(&u)));
        assert!(closure.close(&cl_s).set_eq(&cl_s));
        // t is closed and contains s, so it contains cl(s)
        assert!(is_closed(&t));
        assert!(cl_s.le(&t));
        assert!(!is_closed(&u));
        assert!(closure.close(&u).set_eq(&Submodule::top()));
    }

    #[test]
    fn separated_submodules_are_their_own_closure() {
        let line = Submodule::<F3, V>::span(&[v(1, 2)]);
        assert!(is_closed(&line));
        assert!(topological_closure(&line).set_eq(&line));
        assert!(!is_dense(&line));
        assert!(is_dense(&Submodule::<F3, W>::span(&[w(1, 0)])));
    }

    #[test]
    fn bot_and_top_are_closed_complemented() {
        let bot = ClosedComplemented::<F3, V>::bot();
        let top = ClosedComplemented::<F3, V>::top();
        assert!(bot.is_closed() && top.is_closed());
        assert!(bot.complement().set_eq(&Submodule::top()));
        assert!(top.complement().set_eq(&Submodule::bot()));
        assert!(bot.complement_is_compl() && top.complement_is_compl());
    }

    #[test]
    fn kernel_of_a_map_with_right_inverse() {
        let f1 = fst::<F3, F3, F3>();
        let f2 = inl::<F3, F3, F3>();
        let cc = ClosedComplemented::of_right_inverse(&f1, &f2).unwrap();
        assert!(cc.submodule().contains(&Prod(F3::new(0), F3::new(2))));
        assert!(!cc.submodule().contains(&Prod(F3::new(1), F3::new(2))));
        let (p, q) = cc.decompose(&Prod(F3::new(1), F3::new(2)));
        assert_eq!(p, Prod(F3::new(0), F3::new(2)));
        assert_eq!(q, Prod(F3::new(1), F3::new(0)));
        assert!(cc.complement_is_compl());
        assert!(cc.defect().kernel().set_eq(cc.submodule()));
        assert!(cc.defect().comp(cc.projection().as_map()).is_zero());
        assert!(!cc.defect().continuity().is_assumed());
        let back = cc.complement_complemented().unwrap();
        assert!(back.complement().set_eq(cc.submodule()));

        let not_inverse = ClosedComplemented::of_right_inverse(&f1, &ClMap::zero());
        assert!(matches!(not_inverse, Err(SubmoduleError::NotRightInverse)));
    }

    #[test]
    fn from_projection_is_checked() {
        let x_axis = Submodule::<F3, V>::from_predicate("x", |x: &V| x.0[1] == F3::new(0));
        let onto_x = End::<F3, V>::of_basis_images(Transport::id(), vec![v(1, 0), v(0, 0)]).unwrap();
        assert!(ClosedComplemented::from_projection(&x_axis, &onto_x).is_ok());
        let moves = End::<F3, V>::zero();
        assert!(matches!(
            ClosedComplemented::from_projection(&x_axis, &moves),
            Err(SubmoduleError::NotIdentityOnSubmodule(_))
        ));
        let escapes = End::<F3, V>::id();
        assert!(matches!(
            ClosedComplemented::from_projection(&x_axis, &escapes),
            Err(SubmoduleError::NotProjection(_))
        ));
    }

    #[test]
    fn search_finds_projections_on_separated_lines() {
        let config = SearchConfig::default();
        let line = Submodule::<F3, V>::span(&[v(1, 1)]);
        let cc = closed_complemented(&line, &config).unwrap().unwrap();
        assert!(cc.complement_is_compl());
        assert!(closed_complemented(&Submodule::<F3, V>::bot(), &config).unwrap().is_some());
        assert!(closed_complemented(&Submodule::<F3, V>::top(), &config).unwrap().is_some());
    }

    #[test]
    fn search_budget_is_enforced() {
        let config = SearchConfig::default().with_max_candidates(2);
        let line = Submodule::<F3, V>::span(&[v(1, 1)]);
        assert!(matches!(
            closed_complemented(&line, &config),
            Err(SubmoduleError::SearchBudgetExceeded { budget: 2, required: 9 })
        ));
    }

    #[test]
    fn large_carriers_are_refused_before_listing() {
        type Big = Zmod<1_000_003>;
        type B2 = Vector<Big, 2>;
        let x_axis = Submodule::<Big, B2>::from_predicate("x", |x: &B2| x.0[1] == Big::new(0));
        let config = SearchConfig::default().with_max_candidates(1);
        match closed_complemented(&x_axis, &config) {
            Err(SubmoduleError::SearchBudgetExceeded { budget, required }) => {
                assert_eq!(budget, config.max_enumeration);
                assert_eq!(required, B2::cardinality());
            }
            other => panic!("expected a budget error, got {:?}", other.map(|cc| cc.is_some())),
        }
    }
}
