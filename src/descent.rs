//! The shared convergence loop driving every update rule.

use std::cmp;

use num_traits::Float;

use crate::error::FitError;
use crate::history::History;
use crate::rule::Rule;

/// Hyperparameters common to every update rule.
///
/// No validation is performed on these; a zero learning rate or a negative
/// tolerance is accepted and produces whatever the arithmetic produces,
/// typically a run to `max_iterations`. This keeps experimentation with
/// pathological settings possible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Options<T> {
    /// Step scale $`\lambda`$ (default: 1e-3).
    pub learning_rate: T,
    /// Stop once two consecutive iterates are closer than this (default: 1e-6).
    pub tolerance: T,
    /// Iteration budget if the tolerance is never met (default: 1000).
    pub max_iterations: usize,
    /// Capacity of the sampled-iterate history (default: 1000).
    pub n_history_points: usize,
}

impl<T: Float> Default for Options<T> {
    fn default() -> Self {
        Options {
            learning_rate: T::from(1e-3).unwrap(),
            tolerance: T::from(1e-6).unwrap(),
            max_iterations: 1000,
            n_history_points: 1000,
        }
    }
}

/// One scalar minimization: an objective, its derivative, an update rule,
/// and the state of the iteration.
///
/// Parameters
/// ----------
/// - __f:__     objective function to minimize
/// - __df:__    first derivative of `f`
/// - __x_t:__   starting point of the search
/// - __rule:__  the update [`Rule`] supplying each step
/// - __opts:__  shared hyperparameters
///
/// Each instance owns its accumulators and history exclusively; separate
/// runs need separate instances. Note that state is never reset between
/// calls: a second `fit()` on the same instance restarts from the original
/// starting point but with the accumulators (and sampled history) left by
/// the first run. Construct a fresh instance for an independent run.
pub struct Descent<T, F, D> {
    pub(crate) f: F,
    df: D,
    x_t: T,
    opts: Options<T>,
    pub(crate) rule: Rule<T>,
    history: History<T>,
    n_iterations: usize,
}

impl<T, F, D> Descent<T, F, D>
where
    T: Float,
    F: Fn(T) -> T,
    D: Fn(T) -> T,
{
    pub fn new(f: F, df: D, x_t: T, rule: Rule<T>, opts: Options<T>) -> Self {
        let history = History::with_capacity(opts.n_history_points);
        Descent {
            f,
            df,
            x_t,
            opts,
            rule,
            history,
            n_iterations: 0,
        }
    }

    /// Run the minimization to convergence or to the iteration budget.
    ///
    /// Algorithm
    /// ---------
    /// ```math
    /// x_{t+1} = x_t - \Delta_t(x_t)
    /// ```
    /// iterated while $`|x_{t+1} - x_t| > \mathrm{tol}`$ and the budget
    /// allows, where $`\Delta_t`$ is the rule's step. Every
    /// `max(1, max_iterations / 100)` iterations the current iterate is
    /// sampled into the history so long runs stay inspectable at a bounded
    /// cost.
    ///
    /// Returns the final iterate, or
    /// [`NumericOverflow`](FitError::NumericOverflow) if a step computation
    /// left the representable range; in that case
    /// [`n_iterations`](Descent::n_iterations) reports the iteration that
    /// overflowed.
    pub fn fit(&mut self) -> Result<T, FitError> {
        self.n_iterations = 1;
        let sample_every = cmp::max(1, self.opts.max_iterations / 100);

        let mut x_t = self.x_t;
        let mut x_next = x_t - self.try_step(x_t)?;
        self.history.restart(x_t);

        while (x_next - x_t).abs() > self.opts.tolerance
            && self.n_iterations <= self.opts.max_iterations
        {
            x_t = x_next;
            x_next = x_t - self.try_step(x_t)?;

            if self.n_iterations % sample_every == 0 {
                self.history.record(x_t);
            }
            self.n_iterations += 1;
        }
        Ok(x_next)
    }

    fn try_step(&mut self, x: T) -> Result<T, FitError> {
        let step = self
            .rule
            .compute_step(x, self.n_iterations, self.opts.learning_rate, &self.df);
        if step.is_finite() {
            Ok(step)
        } else {
            Err(FitError::NumericOverflow {
                iteration: self.n_iterations,
            })
        }
    }

    /// Number of iterations performed by the most recent [`fit`]
    /// (Descent::fit); 0 before any run.
    pub fn n_iterations(&self) -> usize {
        self.n_iterations
    }

    /// The sampled iterates of the most recent run, in slot order, starting
    /// with the initial point. Every entry is a finite written value; empty
    /// slots are dropped.
    pub fn convergence_points(&self) -> Result<Vec<T>, FitError> {
        if self.history.is_empty() {
            return Err(FitError::NotFitted);
        }
        Ok(self.history.written())
    }

    /// The update rule, with its current accumulator values.
    pub fn rule(&self) -> &Rule<T> {
        &self.rule
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quadratic(rule: Rule<f64>) -> Descent<f64, impl Fn(f64) -> f64, impl Fn(f64) -> f64> {
        let opts = Options {
            learning_rate: 0.1,
            ..Options::default()
        };
        Descent::new(|x| 4. * x * x, |x| 8. * x, 10., rule, opts)
    }

    #[test]
    fn fresh_instance_has_no_run_state() {
        let gd = quadratic(Rule::plain());
        assert_eq!(gd.n_iterations(), 0);
        assert_eq!(gd.convergence_points(), Err(FitError::NotFitted));
    }

    #[test]
    fn plain_converges_on_quadratic() {
        let mut gd = quadratic(Rule::plain());
        let result = gd.fit().unwrap();
        assert!(result.abs() <= 1e-6, "result = {}", result);
        // Contraction by 0.2 per iteration makes the count deterministic.
        assert_eq!(gd.n_iterations(), 11);
    }

    #[test]
    fn momentum_converges_on_quadratic() {
        let mut gd = quadratic(Rule::momentum(0.9));
        let result = gd.fit().unwrap();
        assert!(result.abs() <= 1e-4, "result = {}", result);
        assert!(gd.n_iterations() >= 1);
    }

    #[test]
    fn nag_converges_on_quadratic() {
        let mut gd = quadratic(Rule::nag(0.9));
        let result = gd.fit().unwrap();
        assert!(result.abs() <= 1e-5, "result = {}", result);
        assert!(gd.n_iterations() >= 1);
    }

    #[test]
    fn rmsprop_converges_on_quadratic() {
        let mut gd = quadratic(Rule::rmsprop(0.9));
        let result = gd.fit().unwrap();
        assert!(result.abs() <= 1e-5, "result = {}", result);
        assert!(gd.n_iterations() >= 1);
    }

    #[test]
    fn adam_converges_on_quadratic() {
        let mut gd = quadratic(Rule::adam(0.9, 0.999));
        let result = gd.fit().unwrap();
        assert!(result.abs() <= 1e-4, "result = {}", result);
        assert!(gd.n_iterations() >= 1);
    }

    #[test]
    fn zero_gradient_converges_after_one_iteration() {
        let mut gd = quadratic(Rule::plain());
        gd.x_t = 0.;
        assert_eq!(gd.fit().unwrap(), 0.);
        assert_eq!(gd.n_iterations(), 1);
    }

    #[test]
    fn history_entries_are_finite_and_bounded() {
        let mut gd = quadratic(Rule::momentum(0.9));
        gd.fit().unwrap();
        let points = gd.convergence_points().unwrap();
        assert!(!points.is_empty());
        assert!(points.len() <= 1000);
        assert_eq!(points[0], 10.);
        assert!(points.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn history_wraps_without_touching_the_initial_point() {
        // A learning rate small enough to exhaust the budget with a tiny
        // history forces the ring to wrap many times.
        let opts = Options {
            learning_rate: 1e-5,
            n_history_points: 4,
            ..Options::default()
        };
        let mut gd = Descent::new(|x| 4. * x * x, |x| 8. * x, 10., Rule::plain(), opts);
        gd.fit().unwrap();
        assert_eq!(gd.n_iterations(), 1001);

        let points = gd.convergence_points().unwrap();
        assert_eq!(points.len(), 4);
        assert_eq!(points[0], 10.);
        assert!(points.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn small_budgets_sample_every_iteration() {
        let opts = Options {
            learning_rate: 0.1,
            max_iterations: 50,
            ..Options::default()
        };
        let mut gd = Descent::new(|x| 4. * x * x, |x| 8. * x, 10., Rule::plain(), opts);
        gd.fit().unwrap();
        // Converges at iteration 11, so iterations 1..=10 were all sampled.
        assert_eq!(gd.convergence_points().unwrap().len(), 11);
    }

    #[test]
    fn diverging_step_reports_overflow() {
        let opts = Options {
            learning_rate: 0.1,
            ..Options::default()
        };
        let mut gd = Descent::new(|x: f64| x, |x| x.powi(1000), 10., Rule::plain(), opts);
        assert_eq!(
            gd.fit(),
            Err(FitError::NumericOverflow { iteration: 1 })
        );
        assert_eq!(gd.n_iterations(), 1);
    }

    #[test]
    fn refitting_resumes_accumulators() {
        let mut gd = quadratic(Rule::momentum(0.9));
        gd.fit().unwrap();
        let velocity_after_first = match gd.rule {
            Rule::Momentum { velocity, .. } => velocity,
            _ => unreachable!(),
        };
        assert_ne!(velocity_after_first, 0.);

        // Second run restarts from x_t = 10 but keeps the stale velocity,
        // so its first step differs from a fresh instance's.
        let result = gd.fit().unwrap();
        assert!(result.is_finite());
        assert!(gd.n_iterations() >= 1);
    }
}
