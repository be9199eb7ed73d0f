use log::debug;

use crate::{Error, Vector3D};
use super::PeriodicCell;

/// Maximal number of candidate periodic images, we need to use this to prevent
/// allocating absurd amounts of memory with a thin cell and a large cutoff
const MAX_NUMBER_OF_PADDINGS: f64 = 1e7;

/// Maximal number of periodic images of a single particle. Larger values mean
/// that the cutoff is much larger than the cell.
const MAX_IMAGES_PER_PARTICLE: f64 = 1e4;

/// Extra room added around the fractional coordinates of the contributing
/// particles, to deal with particles sitting exactly on the boundary
const FRACTIONAL_EPSILON: f64 = 1e-10;

/// A single padding particle, as produced by [`create_paddings`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaddingRecord {
    /// Cartesian coordinates of the padding particle
    pub position: Vector3D,
    /// Species code of the padding particle, the same as its master
    pub species: i32,
    /// Index of the contributing particle this padding particle is an image of
    pub master: usize,
}

/// Periodic images of the contributing particles needed to compute all
/// interactions within a cutoff.
///
/// The data is stored as three parallel arrays, ready to be concatenated after
/// the contributing particles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paddings {
    /// positions of all padding particles
    pub positions: Vec<Vector3D>,
    /// species of all padding particles
    pub species: Vec<i32>,
    /// index of the contributing particle imaged by each padding particle
    pub masters: Vec<usize>,
}

impl Paddings {
    /// Get the number of padding particles
    pub fn len(&self) -> usize {
        self.masters.len()
    }

    /// Check if there are no padding particles
    pub fn is_empty(&self) -> bool {
        self.masters.is_empty()
    }

    /// Iterate over the padding particles
    pub fn iter(&self) -> impl Iterator<Item = PaddingRecord> + '_ {
        self.positions.iter()
            .zip(&self.species)
            .zip(&self.masters)
            .map(|((&position, &species), &master)| PaddingRecord { position, species, master })
    }

    fn push(&mut self, record: PaddingRecord) {
        self.positions.push(record.position);
        self.species.push(record.species);
        self.masters.push(record.master);
    }
}

/// Create the padding particles required to compute all pairs within `cutoff`
/// of the contributing particles at `positions` with the given `species`, when
/// using the periodic boundary conditions defined by `cell`.
///
/// Padding particles are images of the contributing particles shifted by
/// integer combinations of the lattice vectors, along periodic directions
/// only. The set of images is sufficient (every image within `cutoff` of a
/// contributing particle is included) but not minimal: particles on the
/// outermost shell of images are only trimmed with a simple test on their
/// fractional coordinates.
#[time_graph::instrument(name = "create_paddings")]
pub fn create_paddings(
    cell: &PeriodicCell,
    cutoff: f64,
    positions: &[Vector3D],
    species: &[i32],
) -> Result<Paddings, Error> {
    if positions.len() != species.len() {
        return Err(Error::InvalidArgument(format!(
            "positions and species sizes do not match ({} vs {})",
            positions.len(), species.len()
        )));
    }

    if !(cutoff.is_finite() && cutoff > 0.0) {
        return Err(Error::InvalidArgument(format!(
            "cutoff must be a positive finite number, got {}", cutoff
        )));
    }

    let mut paddings = Paddings::default();
    if !cell.is_periodic() || positions.is_empty() {
        return Ok(paddings);
    }

    let mut fractional = Vec::with_capacity(positions.len());
    let mut min = Vector3D::new(f64::INFINITY, f64::INFINITY, f64::INFINITY);
    let mut max = Vector3D::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
    for (index, &position) in positions.iter().enumerate() {
        if !position.is_finite() {
            return Err(Error::InvalidArgument(format!(
                "position of particle {} is not finite: {:?}", index, position
            )));
        }

        let frac = cell.fractional(position);
        min = min.min(&frac);
        max = max.max(&frac);
        fractional.push(frac);
    }

    for xyz in 0..3 {
        min[xyz] -= FRACTIONAL_EPSILON;
        max[xyz] += FRACTIONAL_EPSILON;
    }

    let pbc = cell.pbc();
    let distances_between_faces = cell.distances_between_faces();

    // fraction of the cell covered by the cutoff, and number of shells of
    // images needed along each direction
    let mut ratio = [0.0; 3];
    let mut shells = [0.0; 3];
    for xyz in 0..3 {
        if pbc[xyz] {
            ratio[xyz] = cutoff / distances_between_faces[xyz];
            shells[xyz] = f64::ceil(ratio[xyz]);
        }
    }

    let n_images = shells.iter().map(|&n| 2.0 * n + 1.0).product::<f64>();
    if n_images > MAX_IMAGES_PER_PARTICLE || n_images * positions.len() as f64 > MAX_NUMBER_OF_PADDINGS {
        return Err(Error::SizingOverflow(format!(
            "{} x {} x {} periodic images of {} particles is too much, check \
            the cell and the cutoff",
            2.0 * shells[0] + 1.0, 2.0 * shells[1] + 1.0, 2.0 * shells[2] + 1.0,
            positions.len()
        )));
    }

    let n_shells = [shells[0] as i32, shells[1] as i32, shells[2] as i32];
    for shift_x in -n_shells[0]..=n_shells[0] {
        for shift_y in -n_shells[1]..=n_shells[1] {
            for shift_z in -n_shells[2]..=n_shells[2] {
                if shift_x == 0 && shift_y == 0 && shift_z == 0 {
                    // this is the set of contributing particles
                    continue;
                }

                let shift = [shift_x, shift_y, shift_z];
                for (master, frac) in fractional.iter().enumerate() {
                    if is_trimmed(shift, n_shells, ratio, *frac, min, max) {
                        continue;
                    }

                    let image = Vector3D::new(
                        frac[0] + shift_x as f64,
                        frac[1] + shift_y as f64,
                        frac[2] + shift_z as f64,
                    );

                    paddings.push(PaddingRecord {
                        position: cell.cartesian(image),
                        species: species[master],
                        master: master,
                    });
                }
            }
        }
    }

    debug!(
        "created {} padding particles for {} contributing particles ({} x {} x {} shells)",
        paddings.len(), positions.len(), n_shells[0], n_shells[1], n_shells[2]
    );

    return Ok(paddings);
}

/// Check if a particle at `fractional` coordinates, shifted by `shift`, is too
/// far from all contributing particles to be needed as a padding particle.
///
/// Only images in the outermost shell along a direction can be trimmed: an
/// image in shell `+n` is at least `n - (max - x)` away (in fractional units)
/// from the contributing particles, and is not needed if this is larger than
/// the cutoff ratio. The same goes for shell `-n` with `x - min`.
fn is_trimmed(
    shift: [i32; 3],
    n_shells: [i32; 3],
    ratio: [f64; 3],
    fractional: Vector3D,
    min: Vector3D,
    max: Vector3D,
) -> bool {
    for xyz in 0..3 {
        if n_shells[xyz] == 0 {
            continue;
        }

        let margin = n_shells[xyz] as f64 - ratio[xyz];
        if shift[xyz] == -n_shells[xyz] && fractional[xyz] - min[xyz] < margin {
            return true;
        }

        if shift[xyz] == n_shells[xyz] && max[xyz] - fractional[xyz] < margin {
            return true;
        }
    }

    return false;
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::Matrix3;
    use super::*;

    #[test]
    fn no_periodicity() {
        let cell = PeriodicCell::cubic(3.0).unwrap().with_pbc([false; 3]);
        let positions = [
            Vector3D::new(0.0, 0.0, 0.0),
            Vector3D::new(1.5, 1.5, 1.5),
        ];
        let paddings = create_paddings(&cell, 2.5, &positions, &[1, 2]).unwrap();
        assert!(paddings.is_empty());
        assert_eq!(paddings.len(), 0);
    }

    #[test]
    fn simple_cubic() {
        let cell = PeriodicCell::cubic(3.0).unwrap();
        let positions = [Vector3D::new(1.5, 1.5, 1.5)];
        let paddings = create_paddings(&cell, 2.0, &positions, &[6]).unwrap();
        // all images are 3.0 away from the contributing atom
        assert!(paddings.is_empty());

        // a cutoff larger than the cell requires the 26 first neighboring
        // images, and trims the second shell
        let paddings = create_paddings(&cell, 3.5, &positions, &[6]).unwrap();
        assert_eq!(paddings.len(), 26);
        for record in paddings.iter() {
            assert_eq!(record.species, 6);
            assert_eq!(record.master, 0);

            let shift = record.position - positions[0];
            for xyz in 0..3 {
                let n = shift[xyz] / 3.0;
                assert_relative_eq!(n, f64::round(n), epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn partial_periodicity() {
        let cell = PeriodicCell::cubic(3.0).unwrap().with_pbc([true, false, false]);
        let positions = [Vector3D::new(1.5, 1.5, 1.5)];
        let paddings = create_paddings(&cell, 3.5, &positions, &[6]).unwrap();

        assert_eq!(paddings.len(), 2);
        assert_relative_eq!(paddings.positions[0], Vector3D::new(-1.5, 1.5, 1.5), epsilon = 1e-12);
        assert_relative_eq!(paddings.positions[1], Vector3D::new(4.5, 1.5, 1.5), epsilon = 1e-12);

        let cell = cell.with_pbc([true, true, false]);
        let paddings = create_paddings(&cell, 3.5, &positions, &[6]).unwrap();
        assert_eq!(paddings.len(), 8);
        for position in &paddings.positions {
            assert_relative_eq!(position[2], 1.5, epsilon = 1e-12);
        }
    }

    #[test]
    fn edge_trimming() {
        // two atoms close to the lower x face: only the +1 images in x are
        // close enough to the contributing atoms, the -1 images are trimmed
        let cell = PeriodicCell::cubic(10.0).unwrap().with_pbc([true, false, false]);
        let positions = [
            Vector3D::new(0.5, 5.0, 5.0),
            Vector3D::new(1.0, 5.0, 5.0),
        ];
        let paddings = create_paddings(&cell, 2.0, &positions, &[1, 1]).unwrap();

        // fractional extent is [0.05, 0.1], ratio = 0.2, margin = 0.8: all
        // atoms are within the margin of both extremes, so everything is
        // trimmed
        assert!(paddings.is_empty());

        let positions = [
            Vector3D::new(0.5, 5.0, 5.0),
            Vector3D::new(9.5, 5.0, 5.0),
        ];
        let paddings = create_paddings(&cell, 2.0, &positions, &[1, 1]).unwrap();
        // the atom at 0.5 is imaged at 10.5 (shift +1), and the atom at 9.5 at
        // -0.5 (shift -1)
        assert_eq!(paddings.len(), 2);
        assert_eq!(paddings.masters, [1, 0]);
        assert_relative_eq!(paddings.positions[0], Vector3D::new(-0.5, 5.0, 5.0), epsilon = 1e-12);
        assert_relative_eq!(paddings.positions[1], Vector3D::new(10.5, 5.0, 5.0), epsilon = 1e-12);
    }

    #[test]
    fn large_cutoff() {
        // the cutoff is larger than twice the cell, we need two full shells of
        // images, and the third one is trimmed
        let cell = PeriodicCell::cubic(1.0).unwrap().with_pbc([false, false, true]);
        let positions = [Vector3D::new(0.5, 0.5, 0.5)];
        let paddings = create_paddings(&cell, 2.2, &positions, &[1]).unwrap();

        let mut z = paddings.positions.iter().map(|p| p[2]).collect::<Vec<_>>();
        z.sort_by(f64::total_cmp);
        assert_eq!(z.len(), 4);
        assert_relative_eq!(z[0], -1.5, epsilon = 1e-12);
        assert_relative_eq!(z[1], -0.5, epsilon = 1e-12);
        assert_relative_eq!(z[2], 1.5, epsilon = 1e-12);
        assert_relative_eq!(z[3], 2.5, epsilon = 1e-12);
    }

    #[test]
    fn triclinic() {
        let matrix = Matrix3::new([
            [4.26, -2.45951215, 0.0],
            [2.13, 1.22975607, 0.0],
            [0.0, 0.0, 50.0],
        ]);
        let cell = PeriodicCell::new(matrix, [true, true, false]).unwrap();
        let positions = [
            Vector3D::new(1.42, 0.0, 0.0),
            Vector3D::new(2.84, 0.0, 0.0),
        ];
        let paddings = create_paddings(&cell, 3.0, &positions, &[6, 6]).unwrap();

        assert!(!paddings.is_empty());
        for record in paddings.iter() {
            // images are shifted by an integer number of lattice vectors
            let shift = cell.fractional(record.position - positions[record.master]);
            assert_relative_eq!(shift[0], f64::round(shift[0]), epsilon = 1e-10);
            assert_relative_eq!(shift[1], f64::round(shift[1]), epsilon = 1e-10);
            assert_relative_eq!(shift[2], 0.0, epsilon = 1e-10);
            assert_eq!(record.species, 6);
        }
    }

    #[test]
    fn invalid_arguments() {
        let cell = PeriodicCell::cubic(3.0).unwrap();
        let positions = [Vector3D::new(1.5, 1.5, 1.5)];

        let error = create_paddings(&cell, 2.0, &positions, &[1, 2]).unwrap_err();
        assert!(matches!(error, Error::InvalidArgument(_)));

        let error = create_paddings(&cell, -2.0, &positions, &[1]).unwrap_err();
        assert!(matches!(error, Error::InvalidArgument(_)));

        let error = create_paddings(&cell, f64::NAN, &positions, &[1]).unwrap_err();
        assert!(matches!(error, Error::InvalidArgument(_)));

        let positions = [Vector3D::new(f64::INFINITY, 1.5, 1.5)];
        let error = create_paddings(&cell, 2.0, &positions, &[1]).unwrap_err();
        assert!(matches!(error, Error::InvalidArgument(_)));
    }

    #[test]
    fn too_many_images() {
        let cell = PeriodicCell::cubic(1e-3).unwrap();
        let positions = [Vector3D::new(0.0, 0.0, 0.0)];
        let error = create_paddings(&cell, 10.0, &positions, &[1]).unwrap_err();
        assert!(matches!(error, Error::SizingOverflow(_)));

        // 25 x 25 x 25 images of a single particle
        let cell = PeriodicCell::cubic(1.0).unwrap();
        let error = create_paddings(&cell, 12.0, &positions, &[1]).unwrap_err();
        assert!(matches!(error, Error::SizingOverflow(_)));

        // 7 x 7 x 7 images are fine for a few particles, but not for a lot of
        // them
        let paddings = create_paddings(&cell, 3.0, &positions, &[1]).unwrap();
        assert!(!paddings.is_empty());

        let positions = vec![Vector3D::new(0.5, 0.5, 0.5); 40_000];
        let species = vec![1; 40_000];
        let error = create_paddings(&cell, 3.0, &positions, &species).unwrap_err();
        assert!(matches!(error, Error::SizingOverflow(_)));
    }
}
