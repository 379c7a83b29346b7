//! Update rules plugged into the convergence loop.

use num_traits::Float;

/// Divide-by-zero guard added to the denominator of the adaptive rules.
pub const EPSILON: f64 = 1e-8;

/// Literature default for the first-moment coefficient $`\beta_1`$.
pub const DEFAULT_BETA_1: f64 = 0.9;
/// Literature default for the second-moment coefficient $`\beta_2`$.
pub const DEFAULT_BETA_2: f64 = 0.999;
/// Literature default for the NAG look-ahead coefficient $`\gamma`$.
pub const DEFAULT_GAMMA: f64 = 0.9;

/// How the next step is computed from the current iterate.
///
/// Each variant carries its own coefficients and accumulators; accumulators
/// start at zero and persist across calls within a run, so two calls at the
/// same point generally produce different steps. The loop subtracts the
/// returned step from the iterate.
///
/// Algorithms
/// ----------
/// With gradient $`g_t = f'(x_t)`$ and learning rate $`\lambda`$:
/// ```math
/// \begin{aligned}
/// \text{Plain:} \quad & \Delta_t = \lambda g_t \\
/// \text{Momentum:} \quad & v_t = \beta_1 v_{t-1} + (1-\beta_1) g_t,
///     \qquad \Delta_t = \lambda v_t \\
/// \text{NAG:} \quad & u_t = \gamma u_{t-1} + \lambda f'(x_t - \gamma u_{t-1}),
///     \qquad \Delta_t = u_t \\
/// \text{RMSprop:} \quad & s_t = \beta_2 s_{t-1} + (1-\beta_2) g_t^2,
///     \qquad \Delta_t = \lambda g_t / (\sqrt{s_t} + \epsilon) \\
/// \text{Adam:} \quad & m_t = \beta_1 m_{t-1} + (1-\beta_1) g_t, \quad
///     v_t = \beta_2 v_{t-1} + (1-\beta_2) g_t^2, \\
///     & \hat m_t = m_t / (1-\beta_1^t), \quad \hat v_t = v_t / (1-\beta_2^t),
///     \qquad \Delta_t = \lambda \hat m_t / (\sqrt{\hat v_t} + \epsilon)
/// \end{aligned}
/// ```
/// Note the asymmetry between Momentum and NAG: NAG bakes the learning rate
/// into its recurrence and returns the raw velocity, while Momentum scales
/// the velocity on the way out.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule<T> {
    Plain,
    Momentum { beta_1: T, velocity: T },
    Nag { gamma: T, velocity: T },
    RmsProp { beta_2: T, sq_grad: T },
    Adam { beta_1: T, beta_2: T, first_moment: T, second_moment: T },
}

impl<T: Float> Rule<T> {
    /// Vanilla gradient descent; holds no state.
    pub fn plain() -> Self {
        Rule::Plain
    }

    /// Momentum with decay coefficient `beta_1` (see [`DEFAULT_BETA_1`]).
    pub fn momentum(beta_1: T) -> Self {
        Rule::Momentum {
            beta_1,
            velocity: T::zero(),
        }
    }

    /// Nesterov Accelerated Gradient with look-ahead coefficient `gamma`
    /// (see [`DEFAULT_GAMMA`]).
    pub fn nag(gamma: T) -> Self {
        Rule::Nag {
            gamma,
            velocity: T::zero(),
        }
    }

    /// RMSprop with squared-gradient decay `beta_2`. The original proposal
    /// uses 0.9 here rather than [`DEFAULT_BETA_2`].
    pub fn rmsprop(beta_2: T) -> Self {
        Rule::RmsProp {
            beta_2,
            sq_grad: T::zero(),
        }
    }

    /// Adam with moment coefficients `beta_1` and `beta_2`
    /// (see [`DEFAULT_BETA_1`], [`DEFAULT_BETA_2`]).
    pub fn adam(beta_1: T, beta_2: T) -> Self {
        Rule::Adam {
            beta_1,
            beta_2,
            first_moment: T::zero(),
            second_moment: T::zero(),
        }
    }

    /// Display name of the algorithm, for chart titles and reports.
    pub fn name(&self) -> &'static str {
        match self {
            Rule::Plain => "Gradient Descent",
            Rule::Momentum { .. } => "Momentum",
            Rule::Nag { .. } => "NAG",
            Rule::RmsProp { .. } => "RMSprop",
            Rule::Adam { .. } => "Adam",
        }
    }

    /// Compute the step to subtract from the iterate `x`, advancing the
    /// rule's accumulators as a side effect.
    ///
    /// Parameters
    /// ----------
    /// - __x:__              current iterate
    /// - __t:__              iteration count of the enclosing loop, starting
    ///                        at 1; only Adam's bias correction reads it
    /// - __learning_rate:__  step scale $`\lambda`$
    /// - __df:__             derivative of the objective
    pub fn compute_step<D>(&mut self, x: T, t: usize, learning_rate: T, df: &D) -> T
    where
        D: Fn(T) -> T,
    {
        let eps = T::from(EPSILON).unwrap();
        match self {
            Rule::Plain => learning_rate * df(x),
            Rule::Momentum { beta_1, velocity } => {
                *velocity = *beta_1 * *velocity + (T::one() - *beta_1) * df(x);
                learning_rate * *velocity
            }
            Rule::Nag { gamma, velocity } => {
                *velocity = *gamma * *velocity + learning_rate * df(x - *gamma * *velocity);
                *velocity
            }
            Rule::RmsProp { beta_2, sq_grad } => {
                let g = df(x);
                *sq_grad = *beta_2 * *sq_grad + (T::one() - *beta_2) * g * g;
                learning_rate * g / (sq_grad.sqrt() + eps)
            }
            Rule::Adam {
                beta_1,
                beta_2,
                first_moment,
                second_moment,
            } => {
                let g = df(x);
                *first_moment = *beta_1 * *first_moment + (T::one() - *beta_1) * g;
                *second_moment = *beta_2 * *second_moment + (T::one() - *beta_2) * g * g;
                let m_hat = *first_moment / (T::one() - beta_1.powi(t as i32));
                let v_hat = *second_moment / (T::one() - beta_2.powi(t as i32));
                learning_rate * m_hat / (v_hat.sqrt() + eps)
            }
        }
    }
}
