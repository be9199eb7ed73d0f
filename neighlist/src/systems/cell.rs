//! The `PeriodicCell` type represents the enclosing box of a simulated system,
//! together with the directions along which periodic boundary conditions
//! apply.
use crate::{Error, Matrix3, Vector3D};

/// Cells with a volume smaller than this fraction of the product of their
/// lattice vector lengths are considered singular
const DEGENERATE_TOLERANCE: f64 = 1e-10;

/// A `PeriodicCell` defines the system physical boundaries.
///
/// The three lattice vectors are stored as the rows of the cell matrix, and
/// each lattice direction can be independently periodic or not. The cell is
/// used to generate periodic images (padding particles) of the contributing
/// particles, through fractional coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodicCell {
    /// Unit cell matrix, with lattice vectors as rows
    matrix: Matrix3,
    /// Transpose of the unit cell matrix, cached from matrix
    transpose: Matrix3,
    /// Inverse of the transpose of the unit cell matrix, cached from matrix
    inverse: Matrix3,
    /// Periodic boundary conditions along each lattice vector
    pbc: [bool; 3],
}

impl PeriodicCell {
    /// Create a new cell from the given `matrix` (with lattice vectors as
    /// rows) and periodic boundary conditions flags.
    ///
    /// This fails with `Error::DegenerateGeometry` if the matrix is singular.
    pub fn new(matrix: Matrix3, pbc: [bool; 3]) -> Result<PeriodicCell, Error> {
        if !matrix.is_finite() {
            return Err(Error::InvalidArgument(format!(
                "cell matrix contains non-finite values: {:?}", matrix
            )));
        }

        let scale = matrix.row(0).norm() * matrix.row(1).norm() * matrix.row(2).norm();
        let determinant = matrix.determinant();
        if scale == 0.0 || f64::abs(determinant) <= DEGENERATE_TOLERANCE * scale {
            return Err(Error::DegenerateGeometry(format!(
                "the cell matrix is not invertible (determinant is {})", determinant
            )));
        }

        let transpose = matrix.transposed();
        return Ok(PeriodicCell {
            matrix: matrix,
            transpose: transpose,
            inverse: transpose.inverse(),
            pbc: pbc,
        });
    }

    /// Create an orthorhombic cell, with side lengths `a, b, c` and periodic
    /// boundary conditions in all directions.
    pub fn orthorhombic(a: f64, b: f64, c: f64) -> Result<PeriodicCell, Error> {
        check_lengths(a, b, c)?;
        let matrix = Matrix3::new([
            [a, 0.0, 0.0],
            [0.0, b, 0.0],
            [0.0, 0.0, c]
        ]);
        return PeriodicCell::new(matrix, [true; 3]);
    }

    /// Create a cubic cell, with side lengths `length, length, length` and
    /// periodic boundary conditions in all directions.
    pub fn cubic(length: f64) -> Result<PeriodicCell, Error> {
        PeriodicCell::orthorhombic(length, length, length)
    }

    /// Create a triclinic cell, with side lengths `a, b, c`, angles `alpha,
    /// beta, gamma` (in degrees) and periodic boundary conditions in all
    /// directions.
    pub fn triclinic(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> Result<PeriodicCell, Error> {
        check_lengths(a, b, c)?;
        let cos_alpha = alpha.to_radians().cos();
        let cos_beta = beta.to_radians().cos();
        let (sin_gamma, cos_gamma) = gamma.to_radians().sin_cos();

        let b_x = b * cos_gamma;
        let b_y = b * sin_gamma;

        let c_x = c * cos_beta;
        let c_y = c * (cos_alpha - cos_beta * cos_gamma) / sin_gamma;
        let c_z = f64::sqrt(c * c - c_y * c_y - c_x * c_x);

        return PeriodicCell::new(Matrix3::new([
            [a,   0.0, 0.0],
            [b_x, b_y, 0.0],
            [c_x, c_y, c_z],
        ]), [true; 3]);
    }

    /// Get a copy of this cell using different periodic boundary conditions
    #[must_use]
    pub fn with_pbc(mut self, pbc: [bool; 3]) -> PeriodicCell {
        self.pbc = pbc;
        return self;
    }

    /// Get the matricial representation of the cell, with lattice vectors as
    /// rows
    pub fn matrix(&self) -> Matrix3 {
        self.matrix
    }

    /// Get the periodic boundary conditions flags
    pub fn pbc(&self) -> [bool; 3] {
        self.pbc
    }

    /// Check if the cell is periodic along at least one direction
    pub fn is_periodic(&self) -> bool {
        self.pbc.iter().any(|&periodic| periodic)
    }

    /// Get the volume of the cell
    pub fn volume(&self) -> f64 {
        // The volume is the mixed product of the three cell vectors
        let (a, b, c) = (self.a_vector(), self.b_vector(), self.c_vector());
        f64::abs(a * (b ^ c))
    }

    /// Get the distances between opposite faces of the cell, i.e. the height
    /// of the parallelepiped along each lattice direction.
    pub fn distances_between_faces(&self) -> Vector3D {
        let (a, b, c) = (self.a_vector(), self.b_vector(), self.c_vector());
        let volume = self.volume();

        Vector3D::new(
            volume / (b ^ c).norm(),
            volume / (c ^ a).norm(),
            volume / (a ^ b).norm(),
        )
    }

    /// Get the fractional representation of the `vector` in this cell
    pub fn fractional(&self, vector: Vector3D) -> Vector3D {
        // this needs to use the inverse of the transpose of the matrix, since
        // we only have code to multiply a vector by a matrix on the left
        return self.inverse * vector;
    }

    /// Get the Cartesian representation of the `fractional` vector in this
    /// cell
    pub fn cartesian(&self, fractional: Vector3D) -> Vector3D {
        return self.transpose * fractional;
    }

    /// Get the first vector of the cell
    fn a_vector(&self) -> Vector3D {
        self.matrix.row(0)
    }

    /// Get the second vector of the cell
    fn b_vector(&self) -> Vector3D {
        self.matrix.row(1)
    }

    /// Get the third vector of the cell
    fn c_vector(&self) -> Vector3D {
        self.matrix.row(2)
    }
}

fn check_lengths(a: f64, b: f64, c: f64) -> Result<(), Error> {
    if a > 0.0 && b > 0.0 && c > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!(
            "cell lengths must be positive, got {}, {} and {}", a, b, c
        )))
    }
}
