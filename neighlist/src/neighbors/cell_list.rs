use log::debug;
use ndarray::Array3;

use crate::{Error, Vector3D};

/// Number of bins always allowed, regardless of the number of particles
const MIN_BINS_LIMIT: f64 = 1e5;

/// Maximal number of bins per particle above `MIN_BINS_LIMIT`. Bins are
/// allocated even when empty, so this prevents allocating a huge grid when
/// particles are spread over a very large region compared to the cutoff
/// (typically, when a few particles flew away)
const MAX_BINS_PER_PARTICLE: f64 = 8.0;

/// The bounding box of all particles is inflated by this amount on each side,
/// to make sure the particles on the boundary fall inside of it
const BOUNDING_BOX_EPSILON: f64 = 1e-10;

/// The cell list is used to sort particles inside bins of a uniform grid.
///
/// The grid spans the axis-aligned bounding box of all particles, and all bins
/// are at least as large as the bin size given on construction along each
/// axis. All particles within this bin size of a given particle are then in
/// the 3x3x3 block of bins around the bin of the particle. There is no
/// periodicity in the grid: periodic images are already materialized as
/// padding particles.
#[derive(Debug, Clone)]
pub(crate) struct CellList {
    /// lower corner of the bounding box
    origin: Vector3D,
    /// size of the bounding box along each axis
    extent: Vector3D,
    /// the bins themselves, containing indexes of particles
    bins: Array3<Vec<usize>>,
}

impl CellList {
    /// Create a new `CellList` with bins at least as large as `bin_size`,
    /// containing all the particles at `positions`.
    ///
    /// `positions` must not be empty, and `bin_size` must be positive.
    #[time_graph::instrument(name = "CellList::new")]
    pub fn new(positions: &[Vector3D], bin_size: f64) -> Result<CellList, Error> {
        debug_assert!(!positions.is_empty());
        debug_assert!(bin_size > 0.0);

        let mut min = Vector3D::new(f64::INFINITY, f64::INFINITY, f64::INFINITY);
        let mut max = Vector3D::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
        for position in positions {
            min = min.min(position);
            max = max.max(position);
        }

        let mut origin = min;
        let mut extent = max - min;
        for xyz in 0..3 {
            origin[xyz] -= BOUNDING_BOX_EPSILON;
            extent[xyz] += 2.0 * BOUNDING_BOX_EPSILON;
        }

        let n_bins = [
            f64::max(f64::floor(extent[0] / bin_size), 1.0),
            f64::max(f64::floor(extent[1] / bin_size), 1.0),
            f64::max(f64::floor(extent[2] / bin_size), 1.0),
        ];

        let n_bins_total = n_bins[0] * n_bins[1] * n_bins[2];
        let max_bins = f64::max(MIN_BINS_LIMIT, MAX_BINS_PER_PARTICLE * positions.len() as f64);
        if !n_bins_total.is_finite() || n_bins_total > max_bins {
            return Err(Error::SizingOverflow(format!(
                "a grid of {} x {} x {} bins is too large for {} particles, \
                check if some particles are very far away from the others",
                n_bins[0], n_bins[1], n_bins[2], positions.len()
            )));
        }

        let n_bins = [n_bins[0] as usize, n_bins[1] as usize, n_bins[2] as usize];
        debug!(
            "created cell list with {} x {} x {} bins for {} particles",
            n_bins[0], n_bins[1], n_bins[2], positions.len()
        );

        let mut cell_list = CellList {
            origin: origin,
            extent: extent,
            bins: Array3::from_elem(n_bins, Vec::new()),
        };

        for (index, &position) in positions.iter().enumerate() {
            let bin = cell_list.bin_index(position);
            cell_list.bins[bin].push(index);
        }

        return Ok(cell_list);
    }

    /// Get the number of bins along each axis
    pub fn shape(&self) -> [usize; 3] {
        let shape = self.bins.shape();
        [shape[0], shape[1], shape[2]]
    }

    /// Find the index of the bin in which a particle at `position` belongs
    pub fn bin_index(&self, position: Vector3D) -> [usize; 3] {
        let shape = self.shape();
        let mut index = [0; 3];
        for xyz in 0..3 {
            let scaled = (position[xyz] - self.origin[xyz]) / self.extent[xyz];
            let i = f64::floor(scaled * shape[xyz] as f64);
            // clamp particles on the boundary (or slightly outside because of
            // rounding) inside the grid
            index[xyz] = f64::clamp(i, 0.0, (shape[xyz] - 1) as f64) as usize;
        }
        return index;
    }

    /// Get the indexes of the particles in a given bin
    #[cfg(test)]
    pub fn bin(&self, index: [usize; 3]) -> &[usize] {
        &self.bins[index]
    }

    /// Call `function` with the index of all particles in the 3x3x3 block of
    /// bins centered on the bin at `index`, stopping at the first error.
    ///
    /// The block is clamped at the edges of the grid. Particles are visited in
    /// a deterministic order: bins in x, y, z order, and particles in a bin by
    /// increasing index.
    pub fn for_each_candidate<F>(&self, index: [usize; 3], mut function: F) -> Result<(), Error>
        where F: FnMut(usize) -> Result<(), Error>
    {
        let shape = self.shape();
        let start = [
            index[0].saturating_sub(1),
            index[1].saturating_sub(1),
            index[2].saturating_sub(1),
        ];
        let stop = [
            usize::min(index[0] + 1, shape[0] - 1),
            usize::min(index[1] + 1, shape[1] - 1),
            usize::min(index[2] + 1, shape[2] - 1),
        ];

        for bin_x in start[0]..=stop[0] {
            for bin_y in start[1]..=stop[1] {
                for bin_z in start[2]..=stop[2] {
                    for &particle in &self.bins[[bin_x, bin_y, bin_z]] {
                        function(particle)?;
                    }
                }
            }
        }

        return Ok(());
    }
}
