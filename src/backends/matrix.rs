/// A matrix type that Jacobians and Hessians can be returned in.
///
/// Implemented for row-major `Vec<Vec<f64>>` and, behind the `ndarray` and `nalgebra` features,
/// for `ndarray::Array2<f64>` and `nalgebra::DMatrix<f64>`.
///
/// # Examples
///
/// ```rust
/// use calculus_kit::prelude::*;
///
/// let partial = PartialDerivative::new(Bivariate(|x: f64, y: f64| x * y));
/// let jacobian: Vec<Vec<f64>> = partial.jacobian_into(&[2.0, 3.0]).unwrap();
/// assert_eq!(jacobian.dims(), (1, 2));
/// ```
pub trait Matrix: Sized {
    /// Creates a new matrix of the specified dimensions filled with zeros.
    fn zeros(rows: usize, cols: usize) -> Self;

    /// Reads element (`row`, `col`).
    ///
    /// # Panics
    /// Panics if the index is out of bounds.
    fn get(&self, row: usize, col: usize) -> f64;

    /// Writes element (`row`, `col`).
    ///
    /// # Panics
    /// Panics if the index is out of bounds.
    fn set(&mut self, row: usize, col: usize, value: f64);

    /// Returns the dimensions of the matrix as (rows, columns).
    fn dims(&self) -> (usize, usize);

    /// Builds a matrix from row-major rows of equal length.
    fn from_rows(rows: &[Vec<f64>]) -> Self {
        let cols = rows.first().map_or(0, Vec::len);
        let mut matrix = Self::zeros(rows.len(), cols);
        for (i, row) in rows.iter().enumerate() {
            for (j, &value) in row.iter().enumerate() {
                matrix.set(i, j, value);
            }
        }
        matrix
    }
}

impl Matrix for Vec<Vec<f64>> {
    fn zeros(rows: usize, cols: usize) -> Self {
        vec![vec![0.0; cols]; rows]
    }

    fn get(&self, row: usize, col: usize) -> f64 {
        self[row][col]
    }

    fn set(&mut self, row: usize, col: usize, value: f64) {
        self[row][col] = value;
    }

    fn dims(&self) -> (usize, usize) {
        (self.len(), self.first().map_or(0, Vec::len))
    }

    fn from_rows(rows: &[Vec<f64>]) -> Self {
        rows.to_vec()
    }
}

/// ```rust
/// use calculus_kit::prelude::Matrix;
/// use ndarray::Array2;
///
/// let mut mat = <Array2<f64> as Matrix>::zeros(2, 2);
/// Matrix::set(&mut mat, 0, 1, 3.0);
/// assert_eq!(mat[[0, 1]], 3.0);
/// ```
#[cfg(feature = "ndarray")]
impl Matrix for ndarray::Array2<f64> {
    fn zeros(rows: usize, cols: usize) -> Self {
        ndarray::Array2::zeros((rows, cols))
    }

    fn get(&self, row: usize, col: usize) -> f64 {
        self[[row, col]]
    }

    fn set(&mut self, row: usize, col: usize, value: f64) {
        self[[row, col]] = value;
    }

    fn dims(&self) -> (usize, usize) {
        (self.nrows(), self.ncols())
    }
}

/// ```rust
/// use calculus_kit::prelude::Matrix;
/// use nalgebra::DMatrix;
///
/// let mut mat = <DMatrix<f64> as Matrix>::zeros(2, 2);
/// Matrix::set(&mut mat, 0, 1, 3.0);
/// assert_eq!(mat[(0, 1)], 3.0);
/// ```
#[cfg(feature = "nalgebra")]
impl Matrix for nalgebra::DMatrix<f64> {
    fn zeros(rows: usize, cols: usize) -> Self {
        nalgebra::DMatrix::zeros(rows, cols)
    }

    fn get(&self, row: usize, col: usize) -> f64 {
        self[(row, col)]
    }

    fn set(&mut self, row: usize, col: usize, value: f64) {
        self[(row, col)] = value;
    }

    fn dims(&self) -> (usize, usize) {
        (self.nrows(), self.ncols())
    }
}
