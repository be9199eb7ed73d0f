use crate::{Error, Vector3D};

use super::{PeriodicCell, Paddings, create_paddings};

/// A set of contributing particles inside a periodic cell
#[derive(Clone, Debug)]
pub struct Configuration {
    cell: PeriodicCell,
    species: Vec<i32>,
    positions: Vec<Vector3D>,
}

impl Configuration {
    /// Create a new empty configuration with the given cell
    pub fn new(cell: PeriodicCell) -> Configuration {
        Configuration {
            cell: cell,
            species: Vec::new(),
            positions: Vec::new(),
        }
    }

    /// Add a particle with the given species and position to this
    /// configuration
    pub fn add_atom(&mut self, species: i32, position: Vector3D) {
        self.species.push(species);
        self.positions.push(position);
    }

    /// Get the number of contributing particles
    pub fn size(&self) -> usize {
        self.species.len()
    }

    pub fn positions(&self) -> &[Vector3D] {
        &self.positions
    }

    pub fn species(&self) -> &[i32] {
        &self.species
    }

    pub fn cell(&self) -> &PeriodicCell {
        &self.cell
    }

    /// Add the padding particles needed to find all neighbors within `cutoff`
    /// of the particles in this configuration
    pub fn pad(&self, cutoff: f64) -> Result<PaddedConfiguration, Error> {
        let paddings = create_paddings(&self.cell, cutoff, &self.positions, &self.species)?;
        return PaddedConfiguration::new(&self.positions, &self.species, paddings);
    }
}

/// Contributing particles followed by their padding particles, in a single
/// set of arrays which can be given to a [`crate::neighbors::NeighborList`].
///
/// Particles `0..n_contributing()` are the contributing particles, and all
/// particles after them are padding particles.
#[derive(Clone, Debug)]
pub struct PaddedConfiguration {
    n_contributing: usize,
    positions: Vec<Vector3D>,
    species: Vec<i32>,
    /// master of each padding particle
    masters: Vec<usize>,
}

impl PaddedConfiguration {
    /// Concatenate the contributing particles at `positions` with the given
    /// `species` and their `paddings`
    pub fn new(positions: &[Vector3D], species: &[i32], paddings: Paddings) -> Result<PaddedConfiguration, Error> {
        if positions.len() != species.len() {
            return Err(Error::InvalidArgument(format!(
                "positions and species sizes do not match ({} vs {})",
                positions.len(), species.len()
            )));
        }

        if paddings.positions.len() != paddings.masters.len() || paddings.species.len() != paddings.masters.len() {
            return Err(Error::InvalidArgument(format!(
                "padding positions, species and masters sizes do not match ({}, {} and {})",
                paddings.positions.len(), paddings.species.len(), paddings.masters.len()
            )));
        }

        if let Some(&master) = paddings.masters.iter().find(|&&master| master >= positions.len()) {
            return Err(Error::InvalidArgument(format!(
                "padding master index {} is out of bounds for {} contributing particles",
                master, positions.len()
            )));
        }

        let Paddings { positions: padding_positions, species: padding_species, masters } = paddings;

        let mut all_positions = Vec::with_capacity(positions.len() + padding_positions.len());
        all_positions.extend_from_slice(positions);
        all_positions.extend(padding_positions);

        let mut all_species = Vec::with_capacity(species.len() + padding_species.len());
        all_species.extend_from_slice(species);
        all_species.extend(padding_species);

        return Ok(PaddedConfiguration {
            n_contributing: positions.len(),
            positions: all_positions,
            species: all_species,
            masters: masters,
        });
    }

    /// Get the total number of particles, contributing and padding
    pub fn size(&self) -> usize {
        self.positions.len()
    }

    pub fn n_contributing(&self) -> usize {
        self.n_contributing
    }

    pub fn n_padding(&self) -> usize {
        self.masters.len()
    }

    pub fn positions(&self) -> &[Vector3D] {
        &self.positions
    }

    pub fn species(&self) -> &[i32] {
        &self.species
    }

    /// Check if the particle at index `particle` is a padding particle
    pub fn is_padding(&self, particle: usize) -> bool {
        particle >= self.n_contributing && particle < self.size()
    }

    /// Get the contributing particle corresponding to `particle`: the particle
    /// itself for contributing particles, and the particle it is an image of
    /// for padding particles. This returns `None` if `particle` is out of
    /// bounds.
    pub fn master(&self, particle: usize) -> Option<usize> {
        if particle < self.n_contributing {
            Some(particle)
        } else {
            self.masters.get(particle - self.n_contributing).copied()
        }
    }

    /// Get the flags telling which particles need a list of neighbors:
    /// contributing particles always do, and padding particles only if
    /// `padding_need_neighbors` is `true`.
    pub fn need_neighbors(&self, padding_need_neighbors: bool) -> Vec<bool> {
        let mut need_neighbors = vec![true; self.n_contributing];
        need_neighbors.resize(self.size(), padding_need_neighbors);
        return need_neighbors;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::test_utils::graphite;

    #[test]
    fn add_atoms() {
        let mut configuration = Configuration::new(PeriodicCell::cubic(10.0).unwrap());
        configuration.add_atom(3, Vector3D::new(2.0, 3.0, 4.0));
        configuration.add_atom(1, Vector3D::new(1.0, 3.0, 4.0));
        configuration.add_atom(3, Vector3D::new(5.0, 3.0, 4.0));

        assert_eq!(configuration.size(), 3);
        assert_eq!(configuration.species(), [3, 1, 3]);
        assert_eq!(configuration.positions(), [
            Vector3D::new(2.0, 3.0, 4.0),
            Vector3D::new(1.0, 3.0, 4.0),
            Vector3D::new(5.0, 3.0, 4.0),
        ]);
        assert_eq!(configuration.cell().pbc(), [true; 3]);
    }

    #[test]
    fn padded() {
        let configuration = graphite();
        let padded = configuration.pad(3.37).unwrap();

        assert_eq!(padded.n_contributing(), 4);
        assert_eq!(padded.n_padding(), 96);
        assert_eq!(padded.size(), 100);
        assert_eq!(padded.positions().len(), 100);
        assert_eq!(&padded.positions()[..4], configuration.positions());
        assert_eq!(&padded.species()[..4], configuration.species());

        assert!(!padded.is_padding(3));
        assert!(padded.is_padding(4));
        assert!(padded.is_padding(99));
        assert!(!padded.is_padding(100));

        assert_eq!(padded.master(2), Some(2));
        assert_eq!(padded.master(100), None);
        for particle in 4..100 {
            let master = padded.master(particle).unwrap();
            assert!(master < 4);
            assert_eq!(padded.species()[particle], padded.species()[master]);
        }

        let need_neighbors = padded.need_neighbors(false);
        assert_eq!(need_neighbors.len(), 100);
        assert!(need_neighbors[..4].iter().all(|&need| need));
        assert!(need_neighbors[4..].iter().all(|&need| !need));
        assert!(padded.need_neighbors(true).iter().all(|&need| need));
    }

    #[test]
    fn non_periodic() {
        let cell = PeriodicCell::cubic(3.0).unwrap().with_pbc([false; 3]);
        let mut configuration = Configuration::new(cell);
        configuration.add_atom(1, Vector3D::new(0.0, 0.0, 0.0));
        configuration.add_atom(1, Vector3D::new(1.0, 0.0, 0.0));

        let padded = configuration.pad(2.0).unwrap();
        assert_eq!(padded.n_padding(), 0);
        assert_eq!(padded.size(), 2);
    }

    #[test]
    fn invalid() {
        let positions = [Vector3D::new(0.0, 0.0, 0.0)];
        let error = PaddedConfiguration::new(&positions, &[1, 2], Paddings::default()).unwrap_err();
        assert!(matches!(error, Error::InvalidArgument(_)));

        let paddings = Paddings {
            positions: vec![Vector3D::new(1.0, 0.0, 0.0)],
            species: vec![1],
            masters: vec![3],
        };
        let error = PaddedConfiguration::new(&positions, &[1], paddings).unwrap_err();
        assert!(matches!(error, Error::InvalidArgument(_)));
    }
}
