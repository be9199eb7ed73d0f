use crate::{Vector3D, Matrix3};
use super::{Configuration, PeriodicCell};

/// Graphite bilayer, with an hexagonal cell and two layers of two atoms
pub fn graphite() -> Configuration {
    let alat = 2.46;
    let d = 3.35;
    let matrix = Matrix3::new([
        [alat, 0.0, 0.0],
        [0.5 * alat, f64::sqrt(3.0) * 0.5 * alat, 0.0],
        [0.0, 0.0, 2.0 * d],
    ]);
    let cell = PeriodicCell::new(matrix, [true; 3]).expect("invalid graphite cell");

    let a = matrix.row(0);
    let b = matrix.row(1);
    let c = matrix.row(2);

    let mut configuration = Configuration::new(cell);
    configuration.add_atom(1, Vector3D::zero());
    configuration.add_atom(1, (a + b) / 3.0);
    configuration.add_atom(2, (a + b) / 3.0 + c / 2.0);
    configuration.add_atom(2, 2.0 * (a + b) / 3.0 + c / 2.0);
    return configuration;
}

/// Points on a `n x n x n` grid with the given `spacing`, each slightly moved
/// away from the grid in a deterministic way
pub fn perturbed_grid(n: usize, spacing: f64) -> Vec<Vector3D> {
    let mut positions = Vec::new();
    for i in 0..n {
        for j in 0..n {
            for k in 0..n {
                let index = (positions.len() + 1) as f64;
                let noise = 0.2 * spacing * Vector3D::new(
                    f64::sin(1.3 * index),
                    f64::sin(2.7 * index + 0.5),
                    f64::cos(0.7 * index),
                );
                positions.push(spacing * Vector3D::new(i as f64, j as f64, k as f64) + noise);
            }
        }
    }
    return positions;
}

/// Find all neighbors of `particle` within `cutoff` by checking every other
/// particle, sorted by index
pub fn brute_force_neighbors(positions: &[Vector3D], cutoff: f64, particle: usize) -> Vec<usize> {
    let cutoff2 = cutoff * cutoff;
    return (0..positions.len())
        .filter(|&j| j != particle)
        .filter(|&j| (positions[j] - positions[particle]).norm2() < cutoff2)
        .collect();
}
