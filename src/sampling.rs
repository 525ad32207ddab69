//! Evenly spaced sample grids and cached function samples.
//!
//! [`linspace`] is the grid used across the crate (derivative gradients, cumulative integrals,
//! benches). [`Sampler`] evaluates a function once over such a grid and keeps the result, which
//! is what plotting front ends ask for repeatedly.

use std::cell::OnceCell;

use log::debug;

use crate::errors::{ConfigError, EvaluationError};
use crate::function::Evaluate;

/// Default plotting range.
pub const DEFAULT_RANGE: (f64, f64) = (-10.0, 10.0);
/// Default number of sample points.
pub const DEFAULT_POINTS: usize = 1000;

/// Returns `count` evenly spaced points from `start` to `end`, both included.
///
/// A single point yields `[start]` and zero points yield an empty vector. The last point is
/// exactly `end`.
///
/// ```
/// use calculus_kit::sampling::linspace;
///
/// assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
/// assert_eq!(linspace(2.0, 3.0, 1), vec![2.0]);
/// assert!(linspace(0.0, 1.0, 0).is_empty());
/// ```
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            let mut points: Vec<f64> = (0..count).map(|i| start + i as f64 * step).collect();
            points[count - 1] = end;
            points
        }
    }
}

/// Function values on an evenly spaced grid, computed on first request.
pub struct Sampler<F> {
    function: F,
    range: (f64, f64),
    points: usize,
    samples: OnceCell<(Vec<f64>, Vec<f64>)>,
}

impl<F: Evaluate> Sampler<F> {
    /// Samples `function` at 1000 points over `[-10, 10]`.
    pub fn new(function: F) -> Self {
        Self {
            function,
            range: DEFAULT_RANGE,
            points: DEFAULT_POINTS,
            samples: OnceCell::new(),
        }
    }

    /// Samples `function` at `points` points over `[start, end]`.
    ///
    /// # Errors
    /// Returns `ConfigError::ZeroSamples` if `points` is zero.
    pub fn with_range(
        function: F,
        start: f64,
        end: f64,
        points: usize,
    ) -> Result<Self, ConfigError> {
        if points == 0 {
            return Err(ConfigError::ZeroSamples);
        }
        Ok(Self {
            function,
            range: (start, end),
            points,
            samples: OnceCell::new(),
        })
    }

    /// Returns the grid and the function values on it.
    ///
    /// The first call evaluates the function; later calls return the cached samples. A failed
    /// evaluation is not cached, so the next call tries again.
    pub fn values(&self) -> Result<(&[f64], &[f64]), EvaluationError> {
        if let Some((xs, ys)) = self.samples.get() {
            return Ok((xs, ys));
        }

        let (start, end) = self.range;
        debug!("sampling {} points over [{start}, {end}]", self.points);
        let xs = linspace(start, end, self.points);
        let ys = xs
            .iter()
            .map(|&x| self.function.evaluate(x))
            .collect::<Result<Vec<_>, _>>()?;

        let (xs, ys) = self.samples.get_or_init(|| (xs, ys));
        Ok((xs, ys))
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn points(&self) -> usize {
        self.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_linspace_endpoints() {
        let xs = linspace(-1.0, 0.3, 7);
        assert_eq!(xs.len(), 7);
        assert_eq!(xs[0], -1.0);
        assert_eq!(xs[6], 0.3);
        assert!(xs.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_linspace_reversed() {
        assert_eq!(linspace(1.0, 0.0, 3), vec![1.0, 0.5, 0.0]);
    }

    #[test]
    fn test_sampler_defaults() {
        let sampler = Sampler::new(|x: f64| x * x);
        let (xs, ys) = sampler.values().unwrap();
        assert_eq!(xs.len(), DEFAULT_POINTS);
        assert_eq!(ys.len(), DEFAULT_POINTS);
        assert_eq!(xs[0], -10.0);
        assert_eq!(ys[0], 100.0);
        assert_eq!(xs[DEFAULT_POINTS - 1], 10.0);
    }

    #[test]
    fn test_sampler_caches() {
        let calls = Cell::new(0);
        let sampler = Sampler::with_range(
            |x: f64| {
                calls.set(calls.get() + 1);
                x
            },
            0.0,
            1.0,
            11,
        )
        .unwrap();

        sampler.values().unwrap();
        sampler.values().unwrap();
        assert_eq!(calls.get(), 11);
    }

    #[test]
    fn test_sampler_failure_is_not_cached() {
        let sampler = Sampler::with_range(|x: f64| 1.0 / x, -1.0, 1.0, 3).unwrap();
        assert!(sampler.values().is_err());
        assert!(sampler.values().is_err());
    }

    #[test]
    fn test_zero_samples_rejected() {
        assert!(matches!(
            Sampler::with_range(f64::sin, 0.0, 1.0, 0),
            Err(ConfigError::ZeroSamples)
        ));
    }
}
