/// A vector type that gradients can be returned in.
///
/// Implemented for `Vec<f64>` and, behind the `ndarray` and `nalgebra` features, for
/// `ndarray::Array1<f64>` and `nalgebra::DVector<f64>`.
///
/// # Examples
///
/// ```rust
/// use calculus_kit::prelude::*;
///
/// let partial = PartialDerivative::new(Bivariate(|x: f64, y: f64| x * y));
/// let gradient: Vec<f64> = partial.gradient_into(&[2.0, 3.0]).unwrap();
/// assert_eq!(gradient.len(), 2);
/// ```
pub trait Vector: Sized {
    /// Builds the vector from its components.
    fn from_vec(components: Vec<f64>) -> Self;

    /// Copies the components out in order.
    fn to_vec(&self) -> Vec<f64>;

    /// Returns the number of components.
    fn len(&self) -> usize;

    /// Checks if the vector is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Vector for Vec<f64> {
    fn from_vec(components: Vec<f64>) -> Self {
        components
    }

    fn to_vec(&self) -> Vec<f64> {
        self.clone()
    }

    fn len(&self) -> usize {
        self.len()
    }
}

/// ```rust
/// use calculus_kit::prelude::Vector;
/// use ndarray::Array1;
///
/// let v = <Array1<f64> as Vector>::from_vec(vec![1.0, 2.0]);
/// assert_eq!(v[1], 2.0);
/// ```
#[cfg(feature = "ndarray")]
impl Vector for ndarray::Array1<f64> {
    fn from_vec(components: Vec<f64>) -> Self {
        ndarray::Array1::from_vec(components)
    }

    fn to_vec(&self) -> Vec<f64> {
        self.iter().copied().collect()
    }

    fn len(&self) -> usize {
        self.len()
    }
}

/// ```rust
/// use calculus_kit::prelude::Vector;
/// use nalgebra::DVector;
///
/// let v = <DVector<f64> as Vector>::from_vec(vec![1.0, 2.0]);
/// assert_eq!(v[1], 2.0);
/// ```
#[cfg(feature = "nalgebra")]
impl Vector for nalgebra::DVector<f64> {
    fn from_vec(components: Vec<f64>) -> Self {
        nalgebra::DVector::from_vec(components)
    }

    fn to_vec(&self) -> Vec<f64> {
        self.iter().copied().collect()
    }

    fn len(&self) -> usize {
        self.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_vector() {
        let v = <Vec<f64> as Vector>::from_vec(vec![1.0, 2.0, 3.0]);
        assert_eq!(Vector::len(&v), 3);
        assert!(!Vector::is_empty(&v));
        assert_eq!(Vector::to_vec(&v), vec![1.0, 2.0, 3.0]);
        assert!(Vector::is_empty(&<Vec<f64> as Vector>::from_vec(Vec::new())));
    }

    #[cfg(feature = "ndarray")]
    #[test]
    fn test_ndarray_vector() {
        let v = <ndarray::Array1<f64> as Vector>::from_vec(vec![4.0, 5.0]);
        assert_eq!(Vector::len(&v), 2);
        assert_eq!(Vector::to_vec(&v), vec![4.0, 5.0]);
    }

    #[cfg(feature = "nalgebra")]
    #[test]
    fn test_nalgebra_vector() {
        let v = <nalgebra::DVector<f64> as Vector>::from_vec(vec![4.0, 5.0]);
        assert_eq!(Vector::len(&v), 2);
        assert_eq!(Vector::to_vec(&v), vec![4.0, 5.0]);
    }
}
