use thiserror::Error;

/// Failures that can occur while running or inspecting an optimization.
///
/// [`NumericOverflow`](FitError::NumericOverflow) halts
/// [`fit`](crate::Descent::fit) immediately and reports the iteration that
/// produced the non-representable step. [`NotFitted`](FitError::NotFitted)
/// is returned by accessors that need a completed run and is expected to be
/// recovered from by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FitError {
    /// A step computation left the representable range of the scalar type.
    #[error("step computation overflowed at iteration {iteration}, try reducing the learning rate")]
    NumericOverflow { iteration: usize },

    /// History or plot data was requested before any run was performed.
    #[error("no convergence points recorded, run fit() first")]
    NotFitted,
}
