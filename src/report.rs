//! Plot-ready data for presenting a finished run.
//!
//! Rendering itself is left to the caller (or an external charting crate);
//! this module only assembles the objective curve and the visited points in
//! a form a plotting collaborator can consume directly.

use std::cmp;

use num_traits::Float;

use crate::descent::Descent;
use crate::error::FitError;

/// The objective sampled over a span, plus the iterates the run visited.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve<T> {
    /// Evenly spaced sample abscissae covering the span.
    pub abscissae: Vec<T>,
    /// `f` evaluated at each abscissa.
    pub ordinates: Vec<T>,
    /// `(x, f(x))` for every recorded convergence point, in history order.
    pub visited: Vec<(T, T)>,
    /// Display name of the algorithm that produced the run.
    pub title: &'static str,
}

impl<T, F, D> Descent<T, F, D>
where
    T: Float,
    F: Fn(T) -> T,
    D: Fn(T) -> T,
{
    /// Assemble the data needed to chart the most recent run.
    ///
    /// Parameters
    /// ----------
    /// - __span:__      `(x1, x2)` interval to sample the objective over;
    ///                   inferred from the visited points when `None`
    /// - __n_points:__  number of curve samples (at least 2 are taken)
    ///
    /// Returns [`NotFitted`](FitError::NotFitted) if no run has been
    /// performed yet; callers presenting results should report that and
    /// carry on rather than treat it as fatal.
    pub fn optimization_curve(
        &self,
        span: Option<(T, T)>,
        n_points: usize,
    ) -> Result<Curve<T>, FitError> {
        let points = self.convergence_points()?;

        let (x1, x2) = span.unwrap_or_else(|| {
            points.iter().fold(
                (T::infinity(), T::neg_infinity()),
                |(lo, hi), &p| (lo.min(p), hi.max(p)),
            )
        });

        let n = cmp::max(n_points, 2);
        let spacing = (x2 - x1) / T::from(n - 1).unwrap();
        let abscissae: Vec<T> = (0..n)
            .map(|i| x1 + spacing * T::from(i).unwrap())
            .collect();
        let ordinates = abscissae.iter().map(|&x| (self.f)(x)).collect();
        let visited = points.iter().map(|&p| (p, (self.f)(p))).collect();

        Ok(Curve {
            abscissae,
            ordinates,
            visited,
            title: self.rule.name(),
        })
    }
}
