//! Partial derivatives of scalar fields.
//!
//! Every partial is a central difference along one axis with the other coordinates held fixed,
//! so the truncation error is O(h²) per component. Gradients, Jacobians and directional
//! derivatives are assembled from those partials. The Hessian composes two central differences
//! with a larger step (see [`step_for_order`]).
//!
//! Only scalar-valued functions are supported. [`PartialDerivative::jacobian`] therefore always
//! returns a single row, the gradient.

use itertools::Itertools;

use crate::backends::matrix::Matrix;
use crate::backends::vector::Vector;
use crate::derivative::{step_for_order, DerivativeMethod, DifferenceRule, DEFAULT_STEP};
use crate::errors::{ConfigError, EvaluationError};
use crate::function::{check_arity, ScalarField};

/// Numerical partial derivatives of a function ℝⁿ→ℝ.
#[derive(Debug, Clone)]
pub struct PartialDerivative<F> {
    function: F,
    step: f64,
}

impl<F: ScalarField> PartialDerivative<F> {
    /// Partial derivatives with the default step `1e-5`.
    pub fn new(function: F) -> Self {
        Self {
            function,
            step: DEFAULT_STEP,
        }
    }

    /// Partial derivatives with step size `step`.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidStep` unless `step` is positive and finite.
    pub fn with_step(function: F, step: f64) -> Result<Self, ConfigError> {
        if !(step.is_finite() && step > 0.0) {
            return Err(ConfigError::InvalidStep(step));
        }
        Ok(Self { function, step })
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Estimates ∂f/∂x_axis at `point`.
    ///
    /// # Errors
    /// - `DimensionMismatch` if f declares an arity different from `point.len()`
    /// - `AxisOutOfRange` if `axis >= point.len()`
    /// - the first failing probe of f otherwise
    ///
    /// # Example
    /// ```
    /// # use calculus_kit::prelude::*;
    /// let partial = PartialDerivative::new(Bivariate(|x: f64, y: f64| x * x * y));
    /// assert!((partial.at(&[3.0, 2.0], 0).unwrap() - 12.0).abs() < 1e-4);
    /// assert!((partial.at(&[3.0, 2.0], 1).unwrap() - 9.0).abs() < 1e-4);
    /// ```
    pub fn at(&self, point: &[f64], axis: usize) -> Result<f64, EvaluationError> {
        check_arity(&self.function, point)?;
        self.partial(point, axis)
    }

    fn partial(&self, point: &[f64], axis: usize) -> Result<f64, EvaluationError> {
        if axis >= point.len() {
            return Err(EvaluationError::AxisOutOfRange {
                axis,
                dimension: point.len(),
            });
        }

        let rule = DerivativeMethod::Central.rule();
        let mut shifted = point.to_vec();
        rule(point[axis], self.step, &mut |t| {
            shifted[axis] = t;
            self.function.evaluate_at(&shifted)
        })
    }

    /// Returns every partial derivative at `point`, in the order of its coordinates.
    pub fn gradient_vector(&self, point: &[f64]) -> Result<Vec<f64>, EvaluationError> {
        check_arity(&self.function, point)?;
        (0..point.len())
            .map(|axis| self.partial(point, axis))
            .collect()
    }

    /// Like [`gradient_vector`](Self::gradient_vector), returned in any [`Vector`] backend.
    pub fn gradient_into<V: Vector>(&self, point: &[f64]) -> Result<V, EvaluationError> {
        Ok(V::from_vec(self.gradient_vector(point)?))
    }

    /// Returns the 1×n Jacobian of the scalar field, which is its gradient as a single row.
    pub fn jacobian(&self, point: &[f64]) -> Result<Vec<Vec<f64>>, EvaluationError> {
        Ok(vec![self.gradient_vector(point)?])
    }

    /// Like [`jacobian`](Self::jacobian), returned in any [`Matrix`] backend.
    pub fn jacobian_into<M: Matrix>(&self, point: &[f64]) -> Result<M, EvaluationError> {
        Ok(M::from_rows(&self.jacobian(point)?))
    }

    /// Rate of change of f at `point` along `direction`.
    ///
    /// The direction is normalized first, so only its orientation matters.
    ///
    /// # Errors
    /// `DimensionMismatch` if `direction` and `point` differ in length, `ZeroDirection` if
    /// `direction` is the zero vector.
    pub fn directional(&self, point: &[f64], direction: &[f64]) -> Result<f64, EvaluationError> {
        if direction.len() != point.len() {
            return Err(EvaluationError::DimensionMismatch {
                expected: point.len(),
                got: direction.len(),
            });
        }
        let norm = direction.iter().map(|d| d * d).sum::<f64>().sqrt();
        if norm == 0.0 {
            return Err(EvaluationError::ZeroDirection);
        }

        let gradient = self.gradient_vector(point)?;
        Ok(gradient
            .iter()
            .zip_eq(direction)
            .map(|(g, d)| g * d / norm)
            .sum())
    }

    /// Returns the n×n matrix of second partial derivatives at `point`.
    ///
    /// Entry (i, j) is a central difference along axis i of a central difference along axis j,
    /// with per-axis step `ε_mach^(1/4) · max(1, |x|)`. The result is symmetric by construction.
    ///
    /// # Example
    /// ```
    /// # use calculus_kit::prelude::*;
    /// let partial = PartialDerivative::new(Bivariate(|x: f64, y: f64| x * x * y));
    /// let h = partial.hessian(&[1.0, 2.0]).unwrap();
    /// assert!((h[0][0] - 4.0).abs() < 1e-4);
    /// assert!((h[0][1] - 2.0).abs() < 1e-4);
    /// ```
    pub fn hessian(&self, point: &[f64]) -> Result<Vec<Vec<f64>>, EvaluationError> {
        check_arity(&self.function, point)?;
        let n = point.len();
        let rule = DerivativeMethod::Central.rule();
        let mut hessian = vec![vec![0.0; n]; n];

        for (i, j) in (0..n).tuple_combinations().chain((0..n).map(|i| (i, i))) {
            let value = self.second_partial(rule, point, i, j)?;
            hessian[i][j] = value;
            hessian[j][i] = value;
        }
        Ok(hessian)
    }

    /// Like [`hessian`](Self::hessian), returned in any [`Matrix`] backend.
    pub fn hessian_into<M: Matrix>(&self, point: &[f64]) -> Result<M, EvaluationError> {
        Ok(M::from_rows(&self.hessian(point)?))
    }

    fn second_partial(
        &self,
        rule: DifferenceRule,
        point: &[f64],
        i: usize,
        j: usize,
    ) -> Result<f64, EvaluationError> {
        let h_i = step_for_order(2, point[i]);
        let h_j = step_for_order(2, point[j]);

        rule(point[i], h_i, &mut |ti| {
            // Along the same axis the inner difference is centred on the outer probe.
            let center = if i == j { ti } else { point[j] };
            rule(center, h_j, &mut |tj| {
                let mut probe = point.to_vec();
                probe[i] = ti;
                probe[j] = tj;
                self.function.evaluate_at(&probe)
            })
        })
    }
}
