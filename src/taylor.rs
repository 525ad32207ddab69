//! Truncated Taylor and Maclaurin series built from finite differences.
//!
//! The k-th coefficient is `f⁽ᵏ⁾(c) / k!`, with `f⁽ᵏ⁾(c)` obtained by applying the central
//! difference k times. A k-fold central difference needs `2ᵏ` evaluations of f and its rounding
//! error grows like `ε_mach / hᵏ`, so each order gets its own step from
//! [`step_for_order`]. Even so, accuracy degrades with the order: expect a handful of correct
//! digits in the leading coefficients and little more than the right magnitude beyond ten terms.
//!
//! The coefficients for the most recent centre are kept, so evaluating a series at many points
//! around one centre differentiates only once.
//!
//! The [`MaclaurinSeries`] is the Taylor series centred at zero.

use std::cell::RefCell;

use log::debug;

use crate::derivative::{repeated_difference, step_for_order, DerivativeMethod};
use crate::errors::{ConfigError, EvaluationError};
use crate::function::Evaluate;

/// Coefficients whose magnitude is below this are left out of [`TaylorSeries::polynomial_string`].
pub const DISPLAY_EPSILON: f64 = 5e-7;

/// A Taylor series with a fixed number of terms; the centre is chosen per query.
#[derive(Debug, Clone)]
pub struct TaylorSeries<F> {
    function: F,
    terms: usize,
    expansion: RefCell<Option<Expansion>>,
}

/// Coefficients computed around one centre.
#[derive(Debug, Clone)]
struct Expansion {
    center: f64,
    coefficients: Vec<f64>,
}

impl<F: Evaluate> TaylorSeries<F> {
    /// Series with `terms` terms, i.e. powers `0..terms`.
    ///
    /// # Errors
    /// Returns `ConfigError::ZeroTerms` if `terms` is zero.
    pub fn new(function: F, terms: usize) -> Result<Self, ConfigError> {
        if terms == 0 {
            return Err(ConfigError::ZeroTerms);
        }
        Ok(Self {
            function,
            terms,
            expansion: RefCell::new(None),
        })
    }

    pub fn terms(&self) -> usize {
        self.terms
    }

    /// Returns `[c₀, c₁, …]` with `cₖ = f⁽ᵏ⁾(center) / k!`.
    ///
    /// # Example
    /// ```
    /// # use calculus_kit::prelude::*;
    /// let series = TaylorSeries::new(f64::exp, 4).unwrap();
    /// let coefficients = series.coefficients(0.0).unwrap();
    /// assert_eq!(coefficients[0], 1.0);
    /// assert!((coefficients[3] - 1.0 / 6.0).abs() < 1e-4);
    /// ```
    pub fn coefficients(&self, center: f64) -> Result<Vec<f64>, EvaluationError> {
        self.with_coefficients(center, <[f64]>::to_vec)
    }

    /// Runs `read` on the coefficients around `center`, differentiating only on a new centre.
    ///
    /// A failed differentiation leaves the previous expansion in place.
    fn with_coefficients<R>(
        &self,
        center: f64,
        read: impl FnOnce(&[f64]) -> R,
    ) -> Result<R, EvaluationError> {
        if let Some(expansion) = self.expansion.borrow().as_ref() {
            if expansion.center == center {
                return Ok(read(&expansion.coefficients));
            }
        }
        let coefficients = self.differentiate(center)?;
        let result = read(&coefficients);
        *self.expansion.borrow_mut() = Some(Expansion {
            center,
            coefficients,
        });
        Ok(result)
    }

    fn differentiate(&self, center: f64) -> Result<Vec<f64>, EvaluationError> {
        let rule = DerivativeMethod::Central.rule();
        let mut factorial = 1.0;
        let mut coefficients = Vec::with_capacity(self.terms);

        for order in 0..self.terms {
            if order > 0 {
                factorial *= order as f64;
            }
            let step = step_for_order(order, center);
            debug!("taylor order {order} at {center}: step {step:e}");
            let derivative = repeated_difference(&self.function, rule, center, step, order)?;
            coefficients.push(derivative / factorial);
        }
        Ok(coefficients)
    }

    /// Evaluates the truncated series `Σ cₖ (x - center)ᵏ`.
    pub fn at(&self, x: f64, center: f64) -> Result<f64, EvaluationError> {
        self.with_coefficients(center, |coefficients| horner(coefficients, x - center))
    }

    /// Successive approximations `S₀, S₁, …`, where `Sₖ` keeps the powers up to k.
    ///
    /// The last entry equals [`at`](Self::at).
    pub fn partial_sums(&self, x: f64, center: f64) -> Result<Vec<f64>, EvaluationError> {
        let dx = x - center;
        self.with_coefficients(center, |coefficients| {
            let mut power = 1.0;
            let mut sum = 0.0;
            coefficients
                .iter()
                .map(|c| {
                    sum += c * power;
                    power *= dx;
                    sum
                })
                .collect()
        })
    }

    /// Magnitude of the last included term, a rough gauge of the truncation error.
    ///
    /// This is not a rigorous remainder bound.
    pub fn error_estimate(&self, x: f64, center: f64) -> Result<f64, EvaluationError> {
        self.with_coefficients(center, |coefficients| {
            let last = coefficients.len() - 1;
            (coefficients[last] * (x - center).powi(last as i32)).abs()
        })
    }

    /// Renders the polynomial in ascending powers, e.g. `1.000000 + 0.500000*x^2`.
    ///
    /// Coefficients are printed with six decimals and those below [`DISPLAY_EPSILON`] in
    /// magnitude are omitted. Around a non-zero centre the variable reads `(x - c)`.
    pub fn polynomial_string(&self, center: f64) -> Result<String, EvaluationError> {
        self.with_coefficients(center, |coefficients| render_polynomial(coefficients, center))
    }
}

/// A Taylor series centred at zero.
///
/// ```
/// # use calculus_kit::prelude::*;
/// let series = MaclaurinSeries::new(f64::cos, 10).unwrap();
/// assert!((series.at(0.5).unwrap() - 0.5_f64.cos()).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct MaclaurinSeries<F> {
    series: TaylorSeries<F>,
}

impl<F: Evaluate> MaclaurinSeries<F> {
    /// Series with `terms` terms.
    ///
    /// # Errors
    /// Returns `ConfigError::ZeroTerms` if `terms` is zero.
    pub fn new(function: F, terms: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            series: TaylorSeries::new(function, terms)?,
        })
    }

    pub fn terms(&self) -> usize {
        self.series.terms()
    }

    pub fn coefficients(&self) -> Result<Vec<f64>, EvaluationError> {
        self.series.coefficients(0.0)
    }

    pub fn at(&self, x: f64) -> Result<f64, EvaluationError> {
        self.series.at(x, 0.0)
    }

    pub fn partial_sums(&self, x: f64) -> Result<Vec<f64>, EvaluationError> {
        self.series.partial_sums(x, 0.0)
    }

    pub fn error_estimate(&self, x: f64) -> Result<f64, EvaluationError> {
        self.series.error_estimate(x, 0.0)
    }

    pub fn polynomial_string(&self) -> Result<String, EvaluationError> {
        self.series.polynomial_string(0.0)
    }
}

impl<F: Evaluate> Evaluate for MaclaurinSeries<F> {
    fn evaluate(&self, x: f64) -> Result<f64, EvaluationError> {
        self.at(x)
    }
}

fn horner(coefficients: &[f64], dx: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, c| acc * dx + c)
}

fn render_polynomial(coefficients: &[f64], center: f64) -> String {
    let variable = if center == 0.0 {
        "x".to_string()
    } else if center > 0.0 {
        format!("(x - {center})")
    } else {
        format!("(x + {})", -center)
    };

    let mut rendered = String::new();
    for (power, &c) in coefficients.iter().enumerate() {
        if c.abs() < DISPLAY_EPSILON {
            continue;
        }

        let magnitude = match power {
            0 => format!("{:.6}", c.abs()),
            1 => format!("{:.6}*{variable}", c.abs()),
            _ => format!("{:.6}*{variable}^{power}", c.abs()),
        };
        match (rendered.is_empty(), c < 0.0) {
            (true, false) => {}
            (true, true) => rendered.push('-'),
            (false, false) => rendered.push_str(" + "),
            (false, true) => rendered.push_str(" - "),
        }
        rendered.push_str(&magnitude);
    }

    if rendered.is_empty() {
        rendered.push('0');
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;
    use std::error::Error;

    #[test]
    fn test_coefficients_reused_for_same_center() -> Result<(), Box<dyn Error>> {
        let calls = std::cell::Cell::new(0usize);
        let series = TaylorSeries::new(
            |x: f64| {
                calls.set(calls.get() + 1);
                x.exp()
            },
            4,
        )?;

        // Orders 0..4 take 1 + 2 + 4 + 8 evaluations.
        let first = series.at(0.5, 0.0)?;
        assert_eq!(calls.get(), 15);
        series.at(0.7, 0.0)?;
        series.partial_sums(0.2, 0.0)?;
        series.polynomial_string(0.0)?;
        assert_eq!(calls.get(), 15);
        assert_eq!(series.at(0.5, 0.0)?, first);

        series.coefficients(1.0)?;
        assert_eq!(calls.get(), 30);
        series.at(0.5, 0.0)?;
        assert_eq!(calls.get(), 45);
        Ok(())
    }

    #[test]
    fn test_exp_around_zero() -> Result<(), Box<dyn Error>> {
        let series = TaylorSeries::new(f64::exp, 10)?;
        assert_abs_diff_eq!(series.at(1.0, 0.0)?, 1.0_f64.exp(), epsilon = 1e-3);
        Ok(())
    }

    #[test]
    fn test_trigonometric() -> Result<(), Box<dyn Error>> {
        let series = TaylorSeries::new(f64::sin, 10)?;
        assert_abs_diff_eq!(series.at(0.5, 0.0)?, 0.5_f64.sin(), epsilon = 1e-4);

        let series = TaylorSeries::new(f64::cos, 10)?;
        assert_abs_diff_eq!(series.at(0.5, 0.0)?, 0.5_f64.cos(), epsilon = 1e-4);
        Ok(())
    }

    #[test]
    fn test_polynomial_is_reproduced() -> Result<(), Box<dyn Error>> {
        let series = TaylorSeries::new(|x: f64| x * x + 2.0 * x + 1.0, 5)?;
        assert_abs_diff_eq!(series.at(1.0, 0.0)?, 4.0, epsilon = 1e-3);

        let series = TaylorSeries::new(|x: f64| x * x, 5)?;
        assert_abs_diff_eq!(series.at(2.5, 2.0)?, 6.25, epsilon = 1e-3);
        Ok(())
    }

    #[test]
    fn test_log1p() -> Result<(), Box<dyn Error>> {
        let series = TaylorSeries::new(|x: f64| (1.0 + x).ln(), 8)?;
        assert_abs_diff_eq!(series.at(0.5, 0.0)?, 1.5_f64.ln(), epsilon = 1e-2);
        Ok(())
    }

    #[test]
    fn test_coefficients() -> Result<(), Box<dyn Error>> {
        let series = TaylorSeries::new(|x: f64| x * x, 5)?;
        let coefficients = series.coefficients(0.0)?;
        assert_eq!(coefficients.len(), 5);
        assert_abs_diff_eq!(coefficients[0], 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(coefficients[1], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(coefficients[2], 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(coefficients[3], 0.0, epsilon = 1e-4);

        // ln x around 1: (-1)^(k+1) / k
        let series = TaylorSeries::new(f64::ln, 4)?;
        let coefficients = series.coefficients(1.0)?;
        for (k, expected) in [(1, 1.0), (2, -0.5), (3, 1.0 / 3.0)] {
            assert_abs_diff_eq!(coefficients[k], expected, epsilon = 1e-3);
        }
        Ok(())
    }

    #[test]
    fn test_partial_sums() -> Result<(), Box<dyn Error>> {
        let series = TaylorSeries::new(f64::exp, 6)?;
        let sums = series.partial_sums(1.0, 0.0)?;
        assert_eq!(sums.len(), 6);
        assert_eq!(sums[0], 1.0);
        assert_abs_diff_eq!(sums[1], 2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(sums[2], 2.5, epsilon = 1e-5);
        assert_abs_diff_eq!(sums[5], series.at(1.0, 0.0)?, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_error_estimate() -> Result<(), Box<dyn Error>> {
        let series = TaylorSeries::new(f64::exp, 10)?;
        let error = series.error_estimate(1.0, 0.0)?;
        assert!(error >= 0.0);
        // Last term is x⁹/9!
        assert_abs_diff_eq!(error, 1.0 / 362_880.0, epsilon = 1e-6);
        assert_eq!(series.error_estimate(0.0, 0.0)?, 0.0);
        Ok(())
    }

    #[test]
    fn test_polynomial_string() -> Result<(), Box<dyn Error>> {
        let series = TaylorSeries::new(|x: f64| x * x, 3)?;
        assert_eq!(series.polynomial_string(0.0)?, "1.000000*x^2");

        let series = TaylorSeries::new(|x: f64| 1.0 - 2.0 * x, 2)?;
        assert_eq!(series.polynomial_string(0.0)?, "1.000000 - 2.000000*x");

        let series = TaylorSeries::new(|x: f64| x, 2)?;
        assert_eq!(series.polynomial_string(1.5)?, "1.500000 + 1.000000*(x - 1.5)");
        assert_eq!(series.polynomial_string(-2.0)?, "-2.000000 + 1.000000*(x + 2)");

        let series = TaylorSeries::new(|_: f64| 0.0, 3)?;
        assert_eq!(series.polynomial_string(0.0)?, "0");
        Ok(())
    }

    #[test]
    fn test_zero_terms() {
        assert!(matches!(
            TaylorSeries::new(f64::exp, 0),
            Err(ConfigError::ZeroTerms)
        ));
        assert!(MaclaurinSeries::new(f64::exp, 0).is_err());
    }

    #[test]
    fn test_failure_propagates() {
        let series = TaylorSeries::new(f64::ln, 3).unwrap();
        assert!(matches!(
            series.at(0.5, 0.0),
            Err(EvaluationError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_maclaurin() -> Result<(), Box<dyn Error>> {
        let series = MaclaurinSeries::new(f64::exp, 10)?;
        assert_abs_diff_eq!(series.at(1.0)?, 1.0_f64.exp(), epsilon = 1e-3);
        assert_abs_diff_eq!(series.evaluate(1.0)?, series.at(1.0)?);
        assert_eq!(series.coefficients()?.len(), 10);
        assert!(series.error_estimate(1.0)? < 0.2);
        assert_eq!(series.partial_sums(1.0)?.len(), 10);

        for (f, n) in [(f64::sin as fn(f64) -> f64, 15), (f64::sinh, 15), (f64::cosh, 10)] {
            let series = MaclaurinSeries::new(f, n)?;
            assert_abs_diff_eq!(series.at(0.5)?, f(0.5), epsilon = 1e-3);
        }

        let series = MaclaurinSeries::new(|x: f64| x * x + 1.0, 5)?;
        assert_abs_diff_eq!(series.at(0.0)?, 1.0, epsilon = 1e-12);
        assert!(!series.polynomial_string()?.is_empty());
        Ok(())
    }

    proptest! {
        #[test]
        fn prop_center_is_reproduced(center in -3.0..3.0f64, terms in 1usize..8) {
            let f = |x: f64| x.sin() + 0.25 * x * x;
            let series = TaylorSeries::new(f, terms).unwrap();
            prop_assert_eq!(series.at(center, center).unwrap(), f(center));
        }
    }
}
