#![allow(dead_code)]

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde_json::Value;

use neighlist::{Configuration, Matrix3, NeighborListOptions, PeriodicCell, Vector3D};

/// Load a configuration and neighbor list options from a JSON file in
/// `tests/data`
pub fn load_configuration(path: &str) -> (Configuration, NeighborListOptions) {
    let json = std::fs::read_to_string(format!("tests/data/{}", path))
        .expect("failed to read input file");
    let data: Value = serde_json::from_str(&json).expect("failed to parse JSON");

    let matrix = read_matrix(&data["cell"]);
    let pbc = data["pbc"].as_array().expect("pbc must be an array")
        .iter()
        .map(|value| value.as_bool().expect("pbc values must be booleans"))
        .collect::<Vec<_>>();
    let pbc = [pbc[0], pbc[1], pbc[2]];

    let cell = PeriodicCell::new(matrix, pbc).expect("invalid cell");
    let mut configuration = Configuration::new(cell);

    let species = data["species"].as_array().expect("species must be an array");
    let positions = data["positions"].as_array().expect("positions must be an array");
    for (species, position) in species.iter().zip(positions) {
        let species = species.as_i64().expect("species must be an integer") as i32;
        configuration.add_atom(species, read_vector(position));
    }

    let options = serde_json::from_value::<NeighborListOptions>(data["options"].clone())
        .expect("invalid neighbor list options");
    options.validate().expect("invalid neighbor list options");

    return (configuration, options);
}

fn read_vector(value: &Value) -> Vector3D {
    let array = value.as_array().expect("vectors must be arrays");
    assert_eq!(array.len(), 3);
    Vector3D::new(
        array[0].as_f64().expect("vector components must be numbers"),
        array[1].as_f64().expect("vector components must be numbers"),
        array[2].as_f64().expect("vector components must be numbers"),
    )
}

fn read_matrix(value: &Value) -> Matrix3 {
    let rows = value.as_array().expect("matrices must be arrays");
    assert_eq!(rows.len(), 3);
    let a = read_vector(&rows[0]);
    let b = read_vector(&rows[1]);
    let c = read_vector(&rows[2]);
    Matrix3::new([a.into(), b.into(), c.into()])
}

/// Create a configuration with `n_particles` particles at pseudo-random
/// positions inside the given `cell`
pub fn random_configuration(cell: PeriodicCell, n_particles: usize, seed: u64) -> Configuration {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut configuration = Configuration::new(cell);
    for i in 0..n_particles {
        let fractional = Vector3D::new(rng.gen(), rng.gen(), rng.gen());
        configuration.add_atom((i % 3) as i32, cell.cartesian(fractional));
    }
    return configuration;
}

/// Find the neighbors of `particle` within `cutoff` by looping over all
/// periodic images of all particles (up to `max_shift` cells away along
/// periodic directions). This returns the index of the contributing particle
/// for each neighbor, sorted.
pub fn brute_force_periodic(configuration: &Configuration, cutoff: f64, particle: usize, max_shift: i32) -> Vec<usize> {
    let cell = configuration.cell();
    let pbc = cell.pbc();
    let range = |xyz: usize| if pbc[xyz] { -max_shift..=max_shift } else { 0..=0 };

    let positions = configuration.positions();
    let center = positions[particle];

    let mut neighbors = Vec::new();
    for shift_x in range(0) {
        for shift_y in range(1) {
            for shift_z in range(2) {
                let shift = cell.cartesian(Vector3D::new(shift_x as f64, shift_y as f64, shift_z as f64));
                let is_zero = shift_x == 0 && shift_y == 0 && shift_z == 0;

                for (j, &position) in positions.iter().enumerate() {
                    if is_zero && j == particle {
                        continue;
                    }

                    let image = position + shift;
                    if (image - center).norm2() < cutoff * cutoff {
                        neighbors.push(j);
                    }
                }
            }
        }
    }

    neighbors.sort_unstable();
    return neighbors;
}
