//! Definite integrals of one-variable functions.
//!
//! An [`Integral`] pairs a function with a [`Quadrature`]. The estimate converges at the rate of
//! the chosen rule (see [`crate::quadrature`]) as long as f is smooth on `[a, b]`; a jump or
//! integrable singularity inside the interval degrades it to first order, and a sample that
//! lands on a point where f is undefined aborts the integration with an [`EvaluationError`].

use crate::errors::{ConfigError, EvaluationError};
use crate::function::Evaluate;
use crate::quadrature::{IntegrationMethod, Quadrature};
use crate::sampling::linspace;

/// Default subdivision count for one-dimensional integrals.
pub const DEFAULT_SUBDIVISIONS: usize = 1000;

/// Numerical definite integral of a one-variable function.
#[derive(Debug, Clone)]
pub struct Integral<F> {
    function: F,
    quadrature: Quadrature,
}

impl<F: Evaluate> Integral<F> {
    /// Simpson's rule over 1000 subdivisions.
    pub fn new(function: F) -> Self {
        Self::with_method(function, IntegrationMethod::Simpson)
    }

    /// `method` over 1000 subdivisions.
    pub fn with_method(function: F, method: IntegrationMethod) -> Self {
        Self {
            function,
            quadrature: Quadrature::fixed(method, DEFAULT_SUBDIVISIONS),
        }
    }

    /// `method` over `subdivisions` subintervals.
    ///
    /// # Errors
    /// Returns `ConfigError::ZeroSubdivisions` if `subdivisions` is zero.
    pub fn with_subdivisions(
        function: F,
        method: IntegrationMethod,
        subdivisions: usize,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            function,
            quadrature: Quadrature::new(method, subdivisions)?,
        })
    }

    /// Builds an integral from an existing quadrature.
    pub fn with_quadrature(function: F, quadrature: Quadrature) -> Self {
        Self {
            function,
            quadrature,
        }
    }

    /// Estimates ∫ₐᵇ f(x) dx.
    ///
    /// `a == b` gives exactly zero and `a > b` gives the negated integral from `b` to `a`.
    ///
    /// # Example
    /// ```
    /// # use calculus_kit::prelude::*;
    /// let area = Integral::new(|x: f64| x * x).between(0.0, 1.0).unwrap();
    /// assert!((area - 1.0 / 3.0).abs() < 1e-3);
    /// ```
    pub fn between(&self, a: f64, b: f64) -> Result<f64, EvaluationError> {
        self.quadrature
            .integrate(a, b, &mut |x| self.function.evaluate(x))
    }

    /// Alias for [`Integral::between`].
    pub fn definite(&self, a: f64, b: f64) -> Result<f64, EvaluationError> {
        self.between(a, b)
    }

    /// Samples the running integral `∫ₐˣ f` at `num_points` evenly spaced x from `a` to `b`.
    ///
    /// The first value is always zero. Each point is integrated from `a` independently with the
    /// full subdivision count.
    pub fn cumulative(
        &self,
        a: f64,
        b: f64,
        num_points: usize,
    ) -> Result<(Vec<f64>, Vec<f64>), EvaluationError> {
        let xs = linspace(a, b, num_points);
        let values = xs
            .iter()
            .map(|&x| self.between(a, x))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((xs, values))
    }

    /// Mean value of f over `[a, b]`, that is `between(a, b) / (b - a)`.
    ///
    /// On a degenerate interval this is the limit of the mean, f(a).
    pub fn average_value(&self, a: f64, b: f64) -> Result<f64, EvaluationError> {
        if a == b {
            return self.function.evaluate(a);
        }
        Ok(self.between(a, b)? / (b - a))
    }

    pub fn method(&self) -> IntegrationMethod {
        self.quadrature.method()
    }

    pub fn subdivisions(&self) -> usize {
        self.quadrature.subdivisions()
    }

    pub fn quadrature(&self) -> &Quadrature {
        &self.quadrature
    }
}
