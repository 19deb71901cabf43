//! Distance comparison and combination strategies.
//!
//! The relaxer is the only place where "shortest" and "longest" differ. The
//! shortest-path machinery asks it whether a candidate distance should replace
//! the current one and how an edge weight extends a distance, and never branches
//! on direction itself.

/// Strategy deciding what a better distance is.
///
/// Implementations are pure and usually zero-sized.
///
/// # Preconditions
///
/// The relaxation loop settles each vertex once, so results are exact only
/// when extending a path never makes it better than the path it extends: no
/// negative weights under [`ShortestDistance`], no positive weights under
/// [`LongestDistance`] (or, for longest paths, an acyclic graph whose
/// discovery order happens to be topological). Violations are not detected.
pub trait DistanceRelaxer {
    /// Distance of a vertex that has not been reached.
    fn initial_distance(&self) -> f64;

    /// Distance assigned to every root.
    fn root_distance(&self) -> f64 {
        0.0
    }

    /// Returns `true` if `candidate` should replace `current`.
    fn is_better(&self, candidate: f64, current: f64) -> bool;

    /// Extends the distance `base` by an edge of weight `weight`.
    fn combine(&self, base: f64, weight: f64) -> f64;
}

/// Minimization with `+`, starting from +infinity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShortestDistance;

impl DistanceRelaxer for ShortestDistance {
    #[inline]
    fn initial_distance(&self) -> f64 {
        f64::INFINITY
    }

    #[inline]
    fn is_better(&self, candidate: f64, current: f64) -> bool {
        candidate < current
    }

    #[inline]
    fn combine(&self, base: f64, weight: f64) -> f64 {
        base + weight
    }
}

/// Maximization with `+`, starting from -infinity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LongestDistance;

impl DistanceRelaxer for LongestDistance {
    #[inline]
    fn initial_distance(&self) -> f64 {
        f64::NEG_INFINITY
    }

    #[inline]
    fn is_better(&self, candidate: f64, current: f64) -> bool {
        candidate > current
    }

    #[inline]
    fn combine(&self, base: f64, weight: f64) -> f64 {
        base + weight
    }
}

impl<R: DistanceRelaxer + ?Sized> DistanceRelaxer for &R {
    fn initial_distance(&self) -> f64 {
        (**self).initial_distance()
    }

    fn root_distance(&self) -> f64 {
        (**self).root_distance()
    }

    fn is_better(&self, candidate: f64, current: f64) -> bool {
        (**self).is_better(candidate, current)
    }

    fn combine(&self, base: f64, weight: f64) -> f64 {
        (**self).combine(base, weight)
    }
}
