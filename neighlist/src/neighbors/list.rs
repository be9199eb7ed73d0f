use log::{debug, warn};

use crate::{Error, Vector3D};
use crate::options::NeighborListOptions;
use crate::systems::PaddedConfiguration;

use super::cell_list::CellList;

/// Particles closer than this (squared) distance are considered to be on top
/// of one another
const COLLISION_DISTANCE2: f64 = 1e-20;

/// Pairs closer than this (squared) distance are reported with a warning
const CLOSE_PAIR_DISTANCE2: f64 = 1e-3;

/// Neighbors of all particles for a single cutoff, stored in flat arrays.
///
/// The neighbors of particle `i` are
/// `neighbors[offsets[i]..offsets[i] + counts[i]]`. Particles which did not
/// request neighbors have a count of zero.
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborTable {
    cutoff: f64,
    counts: Vec<usize>,
    offsets: Vec<usize>,
    neighbors: Vec<usize>,
}

impl NeighborTable {
    fn new(cutoff: f64, size: usize) -> NeighborTable {
        NeighborTable {
            cutoff: cutoff,
            counts: Vec::with_capacity(size),
            offsets: Vec::with_capacity(size),
            neighbors: Vec::new(),
        }
    }

    /// Get the cutoff used to create this table
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    /// Get the number of neighbors of each particle
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Get the start of the neighbors of each particle in [`Self::neighbors`]
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Get the neighbors of all particles, concatenated
    pub fn neighbors(&self) -> &[usize] {
        &self.neighbors
    }

    /// Get the neighbors of a single `particle`, or `None` if `particle` is
    /// out of bounds for this table
    pub fn neighbors_of(&self, particle: usize) -> Option<&[usize]> {
        let start = *self.offsets.get(particle)?;
        let count = *self.counts.get(particle)?;
        return self.neighbors.get(start..start + count);
    }

    /// Start the list of neighbors for a new particle
    fn start_particle(&mut self) {
        self.offsets.push(self.neighbors.len());
    }

    /// Finish the list of neighbors of the last particle
    fn finish_particle(&mut self) {
        let offset = self.offsets.last().copied().unwrap_or(0);
        self.counts.push(self.neighbors.len() - offset);
    }
}

/// Everything created by a successful build
#[derive(Debug, Clone, PartialEq)]
struct NeighborListData {
    influence_distance: f64,
    cutoffs: Vec<f64>,
    need_neighbors: Vec<bool>,
    tables: Vec<NeighborTable>,
}

/// Full neighbor lists for a set of particles, for one or more cutoffs at
/// once.
///
/// The list starts empty, and is filled by [`NeighborList::build`] (or one of
/// its variants). Each new build replaces all the data of the previous one,
/// and the list can be emptied with [`NeighborList::clean`]. A failed build
/// leaves the list untouched.
///
/// Periodic boundary conditions are not handled here: periodic images of the
/// particles must be given explicitly as padding particles, see
/// [`crate::systems::create_paddings`].
///
/// ```
/// use neighlist::Vector3D;
/// use neighlist::neighbors::NeighborList;
///
/// let positions = [
///     Vector3D::new(0.0, 0.0, 0.0),
///     Vector3D::new(1.0, 0.0, 0.0),
///     Vector3D::new(3.0, 0.0, 0.0),
/// ];
///
/// let mut list = NeighborList::new();
/// list.build(&positions, &[1.5, 3.5], &[true, true, true])?;
///
/// assert_eq!(list.get_neighbors(0, 0)?, [1]);
/// assert_eq!(list.get_neighbors(1, 0)?, [1, 2]);
/// # Ok::<(), neighlist::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct NeighborList {
    data: Option<NeighborListData>,
}

impl NeighborList {
    /// Create a new, empty neighbor list
    pub fn new() -> NeighborList {
        NeighborList { data: None }
    }

    /// Check if this neighbor list contains data from a successful build
    pub fn is_built(&self) -> bool {
        self.data.is_some()
    }

    /// Remove all data from this neighbor list
    pub fn clean(&mut self) {
        self.data = None;
    }

    /// Build the neighbor lists of the particles at `positions`, for all the
    /// `cutoffs` at once. Only particles with `need_neighbors` set to `true`
    /// get a list of neighbors, but all particles can be neighbors of others.
    ///
    /// This is equivalent to [`NeighborList::build_with_influence_distance`],
    /// with the largest cutoff as influence distance.
    pub fn build(
        &mut self,
        positions: &[Vector3D],
        cutoffs: &[f64],
        need_neighbors: &[bool],
    ) -> Result<(), Error> {
        let influence_distance = cutoffs.iter().copied().fold(f64::NAN, f64::max);
        return self.build_with_influence_distance(positions, influence_distance, cutoffs, need_neighbors);
    }

    /// Build the neighbor lists of the particles at `positions`, for all the
    /// `cutoffs` at once, using bins of size `influence_distance`.
    ///
    /// The influence distance must be at least as large as all the cutoffs.
    /// Neighbors are given in a deterministic order, which depends on the
    /// binning of space but not on the influence distance when it does not
    /// change the number of bins.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidArgument` if `positions` and `need_neighbors` have
    ///   different sizes, if there are no cutoffs, if some cutoffs are not
    ///   positive, if the influence distance is smaller than a cutoff or if
    ///   some positions are not finite;
    /// - `Error::Collision` if two particles are on top of one another;
    /// - `Error::SizingOverflow` if the particles are spread over a very large
    ///   region compared to the influence distance.
    #[time_graph::instrument(name = "NeighborList::build")]
    pub fn build_with_influence_distance(
        &mut self,
        positions: &[Vector3D],
        influence_distance: f64,
        cutoffs: &[f64],
        need_neighbors: &[bool],
    ) -> Result<(), Error> {
        check_build_arguments(positions, influence_distance, cutoffs, need_neighbors)?;

        let mut tables = cutoffs.iter()
            .map(|&cutoff| NeighborTable::new(cutoff, positions.len()))
            .collect::<Vec<_>>();

        if !positions.is_empty() {
            let cell_list = CellList::new(positions, influence_distance)?;
            let cutoffs2 = cutoffs.iter().map(|cutoff| cutoff * cutoff).collect::<Vec<_>>();

            for (i, &position_i) in positions.iter().enumerate() {
                for table in &mut tables {
                    table.start_particle();
                }

                let bin = cell_list.bin_index(position_i);
                if need_neighbors[i] {
                    cell_list.for_each_candidate(bin, |j| {
                        if i == j {
                            return Ok(());
                        }

                        let distance2 = (positions[j] - position_i).norm2();
                        check_distance(i, j, distance2)?;

                        for (table, &cutoff2) in tables.iter_mut().zip(&cutoffs2) {
                            if distance2 < cutoff2 {
                                table.neighbors.push(j);
                            }
                        }

                        Ok(())
                    })?;
                } else {
                    // this particle does not get a list of neighbors, but it
                    // should still not collide with anyone else
                    cell_list.for_each_candidate(bin, |j| {
                        if j > i {
                            let distance2 = (positions[j] - position_i).norm2();
                            check_distance(i, j, distance2)?;
                        }
                        Ok(())
                    })?;
                }

                for table in &mut tables {
                    table.finish_particle();
                }
            }
        }

        debug!(
            "built neighbor list for {} particles ({} requesting neighbors) with {} cutoffs, {} pairs at the largest cutoff",
            positions.len(),
            need_neighbors.iter().filter(|&&need| need).count(),
            cutoffs.len(),
            tables.iter()
                .max_by(|a, b| a.cutoff.total_cmp(&b.cutoff))
                .map_or(0, |table| table.neighbors.len()),
        );

        self.data = Some(NeighborListData {
            influence_distance: influence_distance,
            cutoffs: cutoffs.to_vec(),
            need_neighbors: need_neighbors.to_vec(),
            tables: tables,
        });

        return Ok(());
    }

    /// Build the neighbor lists for all the particles in a padded
    /// `configuration`, using the given `options`.
    ///
    /// Contributing particles always get a list of neighbors, padding
    /// particles only when `options.padding_need_neighbors` is set.
    pub fn build_for(
        &mut self,
        configuration: &PaddedConfiguration,
        options: &NeighborListOptions,
    ) -> Result<(), Error> {
        options.validate()?;
        let need_neighbors = configuration.need_neighbors(options.padding_need_neighbors);
        return self.build_with_influence_distance(
            configuration.positions(),
            options.influence_distance(),
            &options.cutoffs,
            &need_neighbors,
        );
    }

    /// Get the neighbors of `particle` for the cutoff at `cutoff_index`.
    ///
    /// The returned slice borrows from this list, and stays valid until the
    /// next build or clean.
    pub fn get_neighbors(&self, cutoff_index: usize, particle: usize) -> Result<&[usize], Error> {
        let data = self.data()?;
        let table = get_table(data, cutoff_index)?;

        if particle >= data.need_neighbors.len() {
            return Err(Error::InvalidArgument(format!(
                "particle index {} is out of bounds, there are {} particles in the list",
                particle, data.need_neighbors.len()
            )));
        }

        if !data.need_neighbors[particle] {
            return Err(Error::InvalidArgument(format!(
                "particle {} did not request neighbors when building the list",
                particle
            )));
        }

        return table.neighbors_of(particle).ok_or_else(|| Error::InvalidArgument(format!(
            "particle index {} is out of bounds for the neighbor table", particle
        )));
    }

    /// Get the neighbors of `particle` for the cutoff at `cutoff_index`,
    /// checking that the list was built with a cutoff at least as large as
    /// `cutoff`.
    ///
    /// The neighbors are not filtered: all particles within the cutoff used
    /// when building the list are returned.
    pub fn get_neighbors_within(&self, cutoff: f64, cutoff_index: usize, particle: usize) -> Result<&[usize], Error> {
        let table = get_table(self.data()?, cutoff_index)?;
        if !(cutoff <= table.cutoff) {
            return Err(Error::InvalidArgument(format!(
                "requested cutoff ({}) is larger than the one used to build the list ({})",
                cutoff, table.cutoff
            )));
        }

        return self.get_neighbors(cutoff_index, particle);
    }

    /// Get the full table of neighbors for the cutoff at `cutoff_index`
    pub fn table(&self, cutoff_index: usize) -> Result<&NeighborTable, Error> {
        get_table(self.data()?, cutoff_index)
    }

    /// Get the cutoffs used to build this list, or an empty slice if the list
    /// was not built
    pub fn cutoffs(&self) -> &[f64] {
        self.data.as_ref().map_or(&[], |data| &data.cutoffs)
    }

    /// Get the influence distance used to build this list
    pub fn influence_distance(&self) -> Option<f64> {
        self.data.as_ref().map(|data| data.influence_distance)
    }

    /// Get the number of particles (contributing and padding) in this list
    pub fn size(&self) -> usize {
        self.data.as_ref().map_or(0, |data| data.need_neighbors.len())
    }

    fn data(&self) -> Result<&NeighborListData, Error> {
        self.data.as_ref().ok_or_else(|| Error::InvalidArgument(
            "the neighbor list has not been built".into()
        ))
    }
}

fn get_table(data: &NeighborListData, cutoff_index: usize) -> Result<&NeighborTable, Error> {
    data.tables.get(cutoff_index).ok_or_else(|| Error::InvalidArgument(format!(
        "cutoff index {} is out of bounds, the list was built with {} cutoffs",
        cutoff_index, data.tables.len()
    )))
}

fn check_build_arguments(
    positions: &[Vector3D],
    influence_distance: f64,
    cutoffs: &[f64],
    need_neighbors: &[bool],
) -> Result<(), Error> {
    if positions.len() != need_neighbors.len() {
        return Err(Error::InvalidArgument(format!(
            "positions and need_neighbors sizes do not match ({} vs {})",
            positions.len(), need_neighbors.len()
        )));
    }

    if cutoffs.is_empty() {
        return Err(Error::InvalidArgument(
            "at least one cutoff is required to build a neighbor list".into()
        ));
    }

    for &cutoff in cutoffs {
        if !(cutoff.is_finite() && cutoff > 0.0) {
            return Err(Error::InvalidArgument(format!(
                "cutoffs must be positive finite numbers, got {}", cutoff
            )));
        }

        if !(cutoff <= influence_distance) {
            return Err(Error::InvalidArgument(format!(
                "influence distance ({}) must be larger than all cutoffs, got {}",
                influence_distance, cutoff
            )));
        }
    }

    if !influence_distance.is_finite() {
        return Err(Error::InvalidArgument(format!(
            "influence distance must be finite, got {}", influence_distance
        )));
    }

    for (index, position) in positions.iter().enumerate() {
        if !position.is_finite() {
            return Err(Error::InvalidArgument(format!(
                "position of particle {} is not finite: {:?}", index, position
            )));
        }
    }

    return Ok(());
}

fn check_distance(i: usize, j: usize, distance2: f64) -> Result<(), Error> {
    if distance2 < COLLISION_DISTANCE2 {
        return Err(Error::Collision {
            first: usize::min(i, j),
            second: usize::max(i, j),
            distance: distance2.sqrt(),
        });
    }

    if distance2 < CLOSE_PAIR_DISTANCE2 && i < j {
        warn!(
            "particles {} and {} are very close to one another ({} A)",
            i, j, distance2.sqrt()
        );
    }

    return Ok(());
}
