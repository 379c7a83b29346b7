//! The `scalar-optimize` crate provides a family of first-order optimization
//! algorithms that can be used to minimize a differentiable function of a
//! single real variable.
//!
//! It includes commonly used methods, such as:
//! - Gradient Descent
//! - Momentum
//! - Nesterov Accelerated Gradient (NAG)
//! - RMSprop
//! - Adam
//!
//! All five methods share one convergence loop, [`Descent::fit`], and differ
//! only in how the next step is computed from the gradient history, which is
//! captured by the [`Rule`] they are constructed with. The loop samples a
//! bounded number of visited iterates so that a run can be inspected or
//! plotted afterwards without retaining every point.
//!
//! A goal of this crate is to keep each update rule close to the form it
//! takes in the literature, making it suitable as a reference when studying
//! how these methods relate to one another. It is deliberately restricted to
//! scalar objectives; no line search, constraints, or vector parameters.
//!
//! ```
//! use scalar_optimize::{Descent, Options, Rule};
//!
//! let opts = Options { learning_rate: 0.1, ..Options::default() };
//! let mut gd = Descent::new(|x: f64| 4. * x * x, |x| 8. * x, 10., Rule::plain(), opts);
//! let minimum = gd.fit().unwrap();
//! assert!(minimum.abs() < 1e-6);
//! ```

mod descent;
mod error;
mod history;
mod report;
mod rule;

pub use descent::{Descent, Options};
pub use error::FitError;
pub use report::Curve;
pub use rule::{Rule, DEFAULT_BETA_1, DEFAULT_BETA_2, DEFAULT_GAMMA, EPSILON};
