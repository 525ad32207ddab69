//! Finite-difference differentiation of one-variable functions.
//!
//! A [`Derivative`] wraps a function and estimates f′(x) from function values at nearby points:
//!
//! - forward: `(f(x+h) − f(x)) / h`, error O(h)
//! - backward: `(f(x) − f(x−h)) / h`, error O(h)
//! - central: `(f(x+h) − f(x−h)) / (2h)`, error O(h²), the default
//!
//! Besides the truncation error above, every rule carries a rounding error of roughly
//! `ε_mach · |f| / h`, so shrinking `h` past about `1e-8` makes estimates worse, not better.
//!
//! Higher derivatives are obtained by composition. Either wrap a derivative again:
//!
//! ```
//! use calculus_kit::prelude::*;
//!
//! let second = Derivative::new(Derivative::new(|x: f64| x.powi(3)));
//! assert!((second.at(2.0).unwrap() - 12.0).abs() < 1e-3);
//! ```
//!
//! or apply the rule repeatedly with [`Derivative::nth_at`].

use strum_macros::{Display, EnumIter, EnumString};

use crate::errors::{ConfigError, EvaluationError};
use crate::function::Evaluate;
use crate::sampling::linspace;

/// Default step size for first derivatives.
pub const DEFAULT_STEP: f64 = 1e-5;

/// Probe function handed to a difference rule.
pub(crate) type Probe<'a> = &'a mut dyn FnMut(f64) -> Result<f64, EvaluationError>;

pub(crate) type DifferenceRule = fn(f64, f64, Probe<'_>) -> Result<f64, EvaluationError>;

/// Finite-difference rule used by a [`Derivative`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum DerivativeMethod {
    Forward,
    Backward,
    #[default]
    Central,
}

impl DerivativeMethod {
    /// Parses a method name such as `"forward"`.
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        name.parse().map_err(|_| ConfigError::UnknownMethod(name.to_string()))
    }

    /// Order of the truncation error in the step size.
    pub fn order_of_accuracy(self) -> u32 {
        match self {
            Self::Forward | Self::Backward => 1,
            Self::Central => 2,
        }
    }

    pub(crate) fn rule(self) -> DifferenceRule {
        match self {
            Self::Forward => forward_difference,
            Self::Backward => backward_difference,
            Self::Central => central_difference,
        }
    }
}

fn forward_difference(x: f64, h: f64, f: Probe<'_>) -> Result<f64, EvaluationError> {
    let here = f(x)?;
    let ahead = f(x + h)?;
    Ok((ahead - here) / h)
}

fn backward_difference(x: f64, h: f64, f: Probe<'_>) -> Result<f64, EvaluationError> {
    let here = f(x)?;
    let behind = f(x - h)?;
    Ok((here - behind) / h)
}

fn central_difference(x: f64, h: f64, f: Probe<'_>) -> Result<f64, EvaluationError> {
    let ahead = f(x + h)?;
    let behind = f(x - h)?;
    Ok((ahead - behind) / (2.0 * h))
}

/// Step size balancing truncation against rounding error for a central `order`-th derivative.
///
/// Returns `ε_mach^(1/(order+2))`, scaled by `max(1, |x|)` so that the probes stay
/// distinguishable from `x` far from the origin.
pub fn step_for_order(order: usize, x: f64) -> f64 {
    f64::EPSILON.powf(1.0 / (order as f64 + 2.0)) * x.abs().max(1.0)
}

/// Applies `rule` `order` times to `function` at `x`.
///
/// This is the k-fold composition of a first-derivative rule; a central rule touches `2^order`
/// points spread over `[x - order·h, x + order·h]`.
pub(crate) fn repeated_difference<G>(
    function: &G,
    rule: DifferenceRule,
    x: f64,
    step: f64,
    order: usize,
) -> Result<f64, EvaluationError>
where
    G: Evaluate + ?Sized,
{
    if order == 0 {
        return function.evaluate(x);
    }
    rule(x, step, &mut |t| {
        repeated_difference(function, rule, t, step, order - 1)
    })
}

/// Numerical derivative of a one-variable function.
#[derive(Clone)]
pub struct Derivative<F> {
    function: F,
    method: DerivativeMethod,
    step: f64,
    rule: DifferenceRule,
}

impl<F> std::fmt::Debug for Derivative<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Derivative")
            .field("method", &self.method)
            .field("step", &self.step)
            .finish()
    }
}

impl<F: Evaluate> Derivative<F> {
    /// Central-difference derivative with the default step.
    pub fn new(function: F) -> Self {
        Self::build(function, DerivativeMethod::Central, DEFAULT_STEP)
    }

    /// Derivative using `method` with the default step.
    pub fn with_method(function: F, method: DerivativeMethod) -> Self {
        Self::build(function, method, DEFAULT_STEP)
    }

    /// Derivative using `method` and step size `step`.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidStep` unless `step` is positive and finite.
    pub fn with_step(
        function: F,
        method: DerivativeMethod,
        step: f64,
    ) -> Result<Self, ConfigError> {
        if !(step.is_finite() && step > 0.0) {
            return Err(ConfigError::InvalidStep(step));
        }
        Ok(Self::build(function, method, step))
    }

    fn build(function: F, method: DerivativeMethod, step: f64) -> Self {
        Self {
            function,
            method,
            step,
            rule: method.rule(),
        }
    }

    /// Estimates f′(x).
    ///
    /// # Errors
    /// Propagates the first probe of the function that fails or is non-finite.
    ///
    /// # Example
    /// ```
    /// # use calculus_kit::prelude::*;
    /// let df = Derivative::new(|x: f64| x * x);
    /// assert!((df.at(3.0).unwrap() - 6.0).abs() < 1e-4);
    /// ```
    pub fn at(&self, x: f64) -> Result<f64, EvaluationError> {
        (self.rule)(x, self.step, &mut |t| self.function.evaluate(t))
    }

    /// Estimates the `order`-th derivative by applying the configured rule `order` times.
    ///
    /// Order zero returns the function value. Rounding error grows like `ε_mach / h^order`, so
    /// with the default step this is only usable for small orders; pick a larger step (see
    /// [`step_for_order`]) for anything beyond the second derivative.
    pub fn nth_at(&self, x: f64, order: usize) -> Result<f64, EvaluationError> {
        repeated_difference(&self.function, self.rule, x, self.step, order)
    }

    /// Samples the derivative at `n_points` evenly spaced points over `[x - dx/2, x + dx/2]`.
    ///
    /// Returns the sample points and the derivative estimates at them.
    ///
    /// # Example
    /// ```
    /// # use calculus_kit::prelude::*;
    /// let df = Derivative::new(|x: f64| x * x);
    /// let (xs, slopes) = df.gradient(1.0, 2.0, 5).unwrap();
    /// assert_eq!(xs, vec![0.0, 0.5, 1.0, 1.5, 2.0]);
    /// assert_eq!(slopes.len(), 5);
    /// ```
    pub fn gradient(
        &self,
        x: f64,
        dx: f64,
        n_points: usize,
    ) -> Result<(Vec<f64>, Vec<f64>), EvaluationError> {
        let xs = linspace(x - dx / 2.0, x + dx / 2.0, n_points);
        let slopes = xs
            .iter()
            .map(|&xi| self.at(xi))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((xs, slopes))
    }

    pub fn method(&self) -> DerivativeMethod {
        self.method
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Returns the wrapped function.
    pub fn function(&self) -> &F {
        &self.function
    }
}

impl<F: Evaluate> Evaluate for Derivative<F> {
    fn evaluate(&self, x: f64) -> Result<f64, EvaluationError> {
        self.at(x)
    }
}
