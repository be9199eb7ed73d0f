use neighlist::{Configuration, NeighborList, NeighborListOptions, PeriodicCell, Vector3D};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let n_cells = std::env::args().nth(1)
        .map(|arg| arg.parse::<usize>())
        .transpose()?
        .unwrap_or(10);

    // enable collection of profiling data
    time_graph::enable_data_collection(true);
    // clear any existing collected data
    time_graph::clear_collected_data();

    let configuration = simple_cubic(n_cells)?;
    time_graph::spanned!("Full calculation", {
        let options = NeighborListOptions::new(vec![2.5, 4.0, 5.5]);
        let padded = configuration.pad(options.influence_distance())?;

        let mut list = NeighborList::new();
        list.build_for(&padded, &options)?;
    });

    // get the call graph and display it
    let graph = time_graph::get_full_graph();
    // (this requires the "table" feature for the time_graph crate)
    println!("{}", graph.as_short_table());

    // also available for saving profiling data to the disk & future analysis
    // (this requires the "json" feature for the time_graph crate)
    println!("{}", graph.as_json());

    Ok(())
}

/// Simple cubic crystal with `n x n x n` cells, and atoms slightly displaced
/// from their lattice sites
fn simple_cubic(n: usize) -> Result<Configuration, neighlist::Error> {
    let lattice = 2.1;
    let mut configuration = Configuration::new(PeriodicCell::cubic(n as f64 * lattice)?);
    for i in 0..n {
        for j in 0..n {
            for k in 0..n {
                let index = configuration.size() as f64;
                let displacement = 0.1 * Vector3D::new(f64::sin(index), f64::cos(index), f64::sin(2.0 * index));
                let site = Vector3D::new(i as f64, j as f64, k as f64);
                configuration.add_atom(1, lattice * site + displacement);
            }
        }
    }
    return Ok(configuration);
}
