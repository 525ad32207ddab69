//! Truncated Fourier series with numerically integrated coefficients.
//!
//! Over one period `T`, with `ω = 2π/T`:
//!
//! - `a₀ = (1/T) ∫₀ᵀ f(x) dx`
//! - `aₖ = (2/T) ∫₀ᵀ f(x) cos(kωx) dx`
//! - `bₖ = (2/T) ∫₀ᵀ f(x) sin(kωx) dx`
//!
//! and the series is `a₀ + Σₖ₌₁ⁿ aₖ cos(kωx) + bₖ sin(kωx)`. Coefficients come from the same
//! [`Quadrature`] as [`Integral`](crate::integral::Integral), Simpson's rule over 1000
//! subdivisions unless configured otherwise. For smooth periodic functions this is very accurate;
//! a jump inside the period costs O(Δx) in every coefficient.
//!
//! Near a jump the truncated series overshoots by roughly 9% of the jump height however many
//! harmonics are kept (the Gibbs phenomenon). That is the correct behaviour of a truncated
//! series and is left as is.

use std::cell::OnceCell;
use std::f64::consts::PI;

use log::debug;

use crate::errors::{ConfigError, EvaluationError};
use crate::function::Evaluate;
use crate::integral::DEFAULT_SUBDIVISIONS;
use crate::quadrature::{IntegrationMethod, Quadrature};

/// The coefficient table of a [`FourierSeries`].
///
/// `an[k - 1]` and `bn[k - 1]` hold the k-th harmonic.
#[derive(Debug, Clone, PartialEq)]
pub struct FourierCoefficients {
    pub a0: f64,
    pub an: Vec<f64>,
    pub bn: Vec<f64>,
}

impl FourierCoefficients {
    /// Number of harmonics in the table.
    pub fn harmonics(&self) -> usize {
        self.an.len()
    }
}

/// A Fourier series with `harmonics` harmonics over period `period`.
#[derive(Debug, Clone)]
pub struct FourierSeries<F> {
    function: F,
    period: f64,
    harmonics: usize,
    quadrature: Quadrature,
    coefficients: OnceCell<FourierCoefficients>,
}

impl<F: Evaluate> FourierSeries<F> {
    /// Series of `function` over `[0, period]` with `harmonics` harmonics.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidPeriod` unless `period` is positive and finite.
    pub fn new(function: F, period: f64, harmonics: usize) -> Result<Self, ConfigError> {
        Self::with_quadrature(
            function,
            period,
            harmonics,
            Quadrature::fixed(IntegrationMethod::Simpson, DEFAULT_SUBDIVISIONS),
        )
    }

    /// Like [`new`](Self::new), integrating the coefficients with `quadrature`.
    pub fn with_quadrature(
        function: F,
        period: f64,
        harmonics: usize,
        quadrature: Quadrature,
    ) -> Result<Self, ConfigError> {
        if !(period.is_finite() && period > 0.0) {
            return Err(ConfigError::InvalidPeriod(period));
        }
        Ok(Self {
            function,
            period,
            harmonics,
            quadrature,
            coefficients: OnceCell::new(),
        })
    }

    pub fn period(&self) -> f64 {
        self.period
    }

    pub fn harmonics(&self) -> usize {
        self.harmonics
    }

    /// `ω = 2π / T`.
    pub fn angular_frequency(&self) -> f64 {
        2.0 * PI / self.period
    }

    /// Mean value of f over one period.
    pub fn a0(&self) -> Result<f64, EvaluationError> {
        Ok(self.project(|_| 1.0)? / self.period)
    }

    /// Cosine coefficient of harmonic `k`.
    pub fn an(&self, k: usize) -> Result<f64, EvaluationError> {
        let w = k as f64 * self.angular_frequency();
        Ok(2.0 * self.project(|x| (w * x).cos())? / self.period)
    }

    /// Sine coefficient of harmonic `k`.
    pub fn bn(&self, k: usize) -> Result<f64, EvaluationError> {
        let w = k as f64 * self.angular_frequency();
        Ok(2.0 * self.project(|x| (w * x).sin())? / self.period)
    }

    /// Returns the table for harmonics `1..=harmonics`, computing it on first use.
    ///
    /// A failed computation is not cached.
    pub fn coefficients(&self) -> Result<&FourierCoefficients, EvaluationError> {
        if let Some(coefficients) = self.coefficients.get() {
            return Ok(coefficients);
        }

        debug!(
            "computing {} fourier harmonics over period {}",
            self.harmonics, self.period
        );
        let a0 = self.a0()?;
        let an = (1..=self.harmonics)
            .map(|k| self.an(k))
            .collect::<Result<Vec<_>, _>>()?;
        let bn = (1..=self.harmonics)
            .map(|k| self.bn(k))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self
            .coefficients
            .get_or_init(|| FourierCoefficients { a0, an, bn }))
    }

    /// Amplitude `√(aₖ² + bₖ²)` of harmonic `k`.
    pub fn amplitude(&self, k: usize) -> Result<f64, EvaluationError> {
        if (1..=self.harmonics).contains(&k) {
            let table = self.coefficients()?;
            return Ok(table.an[k - 1].hypot(table.bn[k - 1]));
        }
        Ok(self.an(k)?.hypot(self.bn(k)?))
    }

    /// Evaluates the truncated series at `x`.
    ///
    /// # Example
    /// ```
    /// # use calculus_kit::prelude::*;
    /// use std::f64::consts::PI;
    ///
    /// let series = FourierSeries::new(f64::sin, 2.0 * PI, 3).unwrap();
    /// assert!((series.at(1.0).unwrap() - 1.0_f64.sin()).abs() < 1e-6);
    /// ```
    pub fn at(&self, x: f64) -> Result<f64, EvaluationError> {
        let table = self.coefficients()?;
        let w = self.angular_frequency();
        Ok(table.a0
            + table
                .an
                .iter()
                .zip(&table.bn)
                .enumerate()
                .map(|(i, (a, b))| {
                    let kx = (i + 1) as f64 * w * x;
                    a * kx.cos() + b * kx.sin()
                })
                .sum::<f64>())
    }

    /// `∫₀ᵀ f(x) · basis(x) dx`.
    fn project(&self, basis: impl Fn(f64) -> f64) -> Result<f64, EvaluationError> {
        self.quadrature.integrate(0.0, self.period, &mut |x| {
            Ok(self.function.evaluate(x)? * basis(x))
        })
    }
}

impl<F: Evaluate> Evaluate for FourierSeries<F> {
    fn evaluate(&self, x: f64) -> Result<f64, EvaluationError> {
        self.at(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::Fallible;
    use crate::sampling::linspace;
    use approx::assert_abs_diff_eq;
    use std::cell::Cell;
    use std::error::Error;

    fn square_wave(x: f64) -> f64 {
        if x.rem_euclid(2.0 * PI) < PI {
            1.0
        } else {
            -1.0
        }
    }

    #[test]
    fn test_constant() -> Result<(), Box<dyn Error>> {
        let series = FourierSeries::new(|_: f64| 2.0, 2.0 * PI, 5)?;
        assert_abs_diff_eq!(series.a0()?, 2.0, epsilon = 1e-9);
        for k in 1..=5 {
            assert_abs_diff_eq!(series.an(k)?, 0.0, epsilon = 1e-9);
            assert_abs_diff_eq!(series.bn(k)?, 0.0, epsilon = 1e-9);
        }

        let series = FourierSeries::new(|_: f64| 1.0, 4.0 * PI, 5)?;
        assert_abs_diff_eq!(series.a0()?, 1.0, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn test_pure_sine() -> Result<(), Box<dyn Error>> {
        let series = FourierSeries::new(f64::sin, 2.0 * PI, 5)?;
        assert_abs_diff_eq!(series.a0()?, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(series.bn(1)?, 1.0, epsilon = 1e-9);
        for k in 1..=5 {
            assert_abs_diff_eq!(series.an(k)?, 0.0, epsilon = 1e-9);
            if k != 1 {
                assert_abs_diff_eq!(series.bn(k)?, 0.0, epsilon = 1e-9);
            }
        }
        assert_abs_diff_eq!(series.at(PI / 4.0)?, (PI / 4.0).sin(), epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn test_cosine_harmonics() -> Result<(), Box<dyn Error>> {
        let series = FourierSeries::new(|x: f64| (2.0 * x).cos(), 2.0 * PI, 5)?;
        assert_abs_diff_eq!(series.an(2)?, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(series.an(1)?, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(series.amplitude(2)?, 1.0, epsilon = 1e-9);
        // Outside the table the amplitude is integrated directly.
        assert_abs_diff_eq!(series.amplitude(7)?, 0.0, epsilon = 1e-9);

        let series = FourierSeries::new(f64::cos, 2.0 * PI, 10)?;
        assert_abs_diff_eq!(series.at(PI / 4.0)?, (PI / 4.0).cos(), epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn test_square_wave_and_gibbs_overshoot() -> Result<(), Box<dyn Error>> {
        let series = FourierSeries::new(square_wave, 2.0 * PI, 20)?;
        let mid = series.at(PI / 2.0)?;
        assert!(mid > 0.5);
        assert_abs_diff_eq!(mid, 1.0, epsilon = 0.1);

        // The odd sine coefficients approach 4/(kπ).
        let table = series.coefficients()?;
        assert_abs_diff_eq!(table.bn[0], 4.0 / PI, epsilon = 1e-2);
        assert_abs_diff_eq!(table.bn[1], 0.0, epsilon = 1e-2);

        let peak = linspace(0.01, 1.0, 200)
            .into_iter()
            .map(|x| series.at(x))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .fold(f64::MIN, f64::max);
        assert!(peak > 1.1, "overshoot {peak} should persist");
        assert!(peak < 1.25, "overshoot {peak} should stay bounded");
        Ok(())
    }

    #[test]
    fn test_sawtooth_evaluates() {
        let series = FourierSeries::new(|x: f64| x, 2.0 * PI, 10).unwrap();
        assert!(series.at(1.0).unwrap().is_finite());
        assert_abs_diff_eq!(series.a0().unwrap(), PI, epsilon = 1e-9);
    }

    #[test]
    fn test_coefficients_are_cached() {
        let calls = Cell::new(0usize);
        let series = FourierSeries::new(
            |x: f64| {
                calls.set(calls.get() + 1);
                x.sin()
            },
            2.0 * PI,
            3,
        )
        .unwrap();

        let first = series.coefficients().unwrap().clone();
        let after_first = calls.get();
        series.at(0.3).unwrap();
        series.at(0.7).unwrap();
        assert_eq!(calls.get(), after_first);
        assert_eq!(first.harmonics(), 3);
        assert_eq!(series.coefficients().unwrap(), &first);
    }

    #[test]
    fn test_zero_harmonics_is_the_mean() -> Result<(), Box<dyn Error>> {
        let series = FourierSeries::new(|x: f64| 3.0 + x.sin(), 2.0 * PI, 0)?;
        assert_abs_diff_eq!(series.at(1.0)?, 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(series.evaluate(2.0)?, 3.0, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn test_invalid_period() {
        for period in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                FourierSeries::new(f64::sin, period, 3),
                Err(ConfigError::InvalidPeriod(_))
            ));
        }
    }

    #[test]
    fn test_custom_quadrature_and_failure() {
        let quadrature = Quadrature::new(IntegrationMethod::Trapezoidal, 200).unwrap();
        let series = FourierSeries::with_quadrature(f64::cos, 2.0 * PI, 2, quadrature).unwrap();
        assert_abs_diff_eq!(series.an(1).unwrap(), 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(series.angular_frequency(), 1.0);

        let series = FourierSeries::new(
            Fallible(|x: f64| if x > 3.0 { Err("outside domain") } else { Ok(x) }),
            2.0 * PI,
            2,
        )
        .unwrap();
        assert!(matches!(
            series.coefficients(),
            Err(EvaluationError::Raised { .. })
        ));
    }
}
