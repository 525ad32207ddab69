//! Numerical calculus on user-supplied functions.
//!
//! This crate approximates derivatives, integrals, limits and series of functions it can only
//! probe: there is no symbolic algebra anywhere. Every evaluator wraps a function (a closure, an
//! adapter, a parsed [`Expression`] or another evaluator) together with a little numeric
//! configuration fixed at construction, and can then be queried any number of times.
//!
//! # Features
//!
//! - Finite-difference derivatives (forward, backward, central), composable to any order
//! - Partial derivatives, gradients, directional derivatives and Hessians of scalar fields
//! - Trapezoidal, Simpson and midpoint quadrature, including iterated double integrals
//! - One-sided, two-sided and infinite limits that tolerate singular probe points
//! - Taylor, Maclaurin and Fourier series
//! - Functions given as strings, parsed by [evalexpr](https://github.com/ISibboI/evalexpr)
//! - Optional `nalgebra` and `ndarray` outputs for gradients and Jacobians
//!
//! # Example
//!
//! ```rust
//! use calculus_kit::prelude::*;
//!
//! // f'(3) for f(x) = x²
//! let slope = Derivative::new(|x: f64| x * x).at(3.0).unwrap();
//! assert!((slope - 6.0).abs() < 1e-4);
//!
//! // ∫₀¹ x² dx
//! let area = Integral::new(|x: f64| x * x).between(0.0, 1.0).unwrap();
//! assert!((area - 1.0 / 3.0).abs() < 1e-3);
//!
//! // lim_{x→2} (x² - 4)/(x - 2)
//! let limit = Limit::new(|x: f64| (x * x - 4.0) / (x - 2.0)).at(2.0);
//! assert!((limit.finite().unwrap() - 4.0).abs() < 1e-4);
//! ```
//!
//! Failures of the wrapped function are never papered over: a probe that fails or returns a
//! non-finite value surfaces as an [`EvaluationError`](errors::EvaluationError) carrying the
//! offending input. Limits are the one exception and report
//! [`LimitValue::DoesNotExist`](limit::LimitValue::DoesNotExist) instead.

pub use derivative::Derivative;
pub use double_integral::DoubleIntegral;
pub use expression::Expression;
pub use fourier::FourierSeries;
pub use integral::Integral;
pub use limit::Limit;
pub use partial::PartialDerivative;
pub use taylor::{MaclaurinSeries, TaylorSeries};

pub mod prelude {
    pub use crate::backends::matrix::Matrix;
    pub use crate::backends::vector::Vector;
    pub use crate::derivative::{Derivative, DerivativeMethod};
    pub use crate::double_integral::DoubleIntegral;
    pub use crate::errors::{ConfigError, EvaluationError, ExpressionError};
    pub use crate::expression::Expression;
    pub use crate::fourier::{FourierCoefficients, FourierSeries};
    pub use crate::function::{Bivariate, Evaluate, Fallible, ScalarField, Trivariate};
    pub use crate::integral::Integral;
    pub use crate::limit::{Direction, Limit, LimitConfig, LimitValue, Side};
    pub use crate::partial::PartialDerivative;
    pub use crate::quadrature::{IntegrationMethod, Quadrature};
    pub use crate::sampling::{linspace, Sampler};
    pub use crate::taylor::{MaclaurinSeries, TaylorSeries};
}

/// Finite-difference derivatives of one-variable functions
pub mod derivative;
/// Iterated double integrals over rectangles
pub mod double_integral;
/// Error types for the various failure modes
pub mod errors;
/// Functions parsed from expression strings
pub mod expression;
/// Fourier series with numerically integrated coefficients
pub mod fourier;
/// The traits every evaluator wraps
pub mod function;
/// Definite integrals of one-variable functions
pub mod integral;
/// Limit estimation by approach sequences
pub mod limit;
/// Partial derivatives, gradients and Hessians of scalar fields
pub mod partial;
/// Composite quadrature rules
pub mod quadrature;
/// Sample grids and cached function samples
pub mod sampling;
/// Taylor and Maclaurin series
pub mod taylor;
/// Output types for vectors and matrices
pub mod backends {
    pub mod matrix;
    pub mod vector;
}
