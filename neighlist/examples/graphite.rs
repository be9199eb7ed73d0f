//! Build the neighbor list of a graphite bilayer, and print the neighbors of
//! the first particles at all cutoffs.
//!
//! Pass a file name on the command line to also write the padded
//! configuration to this file in extended XYZ format.
use neighlist::{Configuration, Matrix3, NeighborList, NeighborListOptions, PeriodicCell, Vector3D};
use neighlist::systems::write_extended_xyz;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let alat = 2.46;
    let d = 3.35;
    let matrix = Matrix3::new([
        [alat, 0.0, 0.0],
        [0.5 * alat, f64::sqrt(3.0) * 0.5 * alat, 0.0],
        [0.0, 0.0, 2.0 * d],
    ]);
    let (a, b, c) = (matrix.row(0), matrix.row(1), matrix.row(2));

    let mut configuration = Configuration::new(PeriodicCell::new(matrix, [true, true, true])?);
    configuration.add_atom(1, Vector3D::zero());
    configuration.add_atom(1, (a + b) / 3.0);
    configuration.add_atom(2, (a + b) / 3.0 + c / 2.0);
    configuration.add_atom(2, 2.0 * (a + b) / 3.0 + c / 2.0);

    let options = NeighborListOptions::new(vec![d + 0.01, d + 0.02]);
    let padded = configuration.pad(options.influence_distance())?;
    println!(
        "{} contributing particles, {} padding particles",
        padded.n_contributing(), padded.n_padding()
    );

    if let Some(path) = std::env::args().nth(1) {
        let file = std::io::BufWriter::new(std::fs::File::create(&path)?);
        write_extended_xyz(file, configuration.cell(), padded.positions(), padded.species())?;
        println!("padded configuration written to {}", path);
    }

    let mut list = NeighborList::new();
    list.build_for(&padded, &options)?;

    for (cutoff_index, cutoff) in list.cutoffs().iter().enumerate() {
        println!("cutoff = {}", cutoff);
        for particle in 0..padded.n_contributing() {
            let neighbors = list.get_neighbors(cutoff_index, particle)?;
            let masters = neighbors.iter()
                .filter_map(|&neighbor| padded.master(neighbor))
                .collect::<Vec<_>>();
            println!("  particle {}: {} neighbors, images of {:?}", particle, neighbors.len(), masters);
        }
    }

    Ok(())
}
