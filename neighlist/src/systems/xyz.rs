use std::io::Write;

use crate::{Error, Vector3D};
use super::PeriodicCell;

/// Write the particles at `positions` with the given `species` to `writer`,
/// using the extended XYZ format.
///
/// The cell matrix and periodic boundary conditions are written in the
/// comment line, which makes the output readable by ASE, OVITO or chemfiles.
/// This is mostly useful to look at padding particles when debugging.
pub fn write_extended_xyz<W: Write>(
    mut writer: W,
    cell: &PeriodicCell,
    positions: &[Vector3D],
    species: &[i32],
) -> Result<(), Error> {
    if positions.len() != species.len() {
        return Err(Error::InvalidArgument(format!(
            "positions and species sizes do not match ({} vs {})",
            positions.len(), species.len()
        )));
    }

    let matrix = cell.matrix();
    let pbc = cell.pbc();
    let flag = |periodic: bool| if periodic { "T" } else { "F" };

    writeln!(writer, "{}", positions.len())?;
    writeln!(writer,
        "Lattice=\"{} {} {} {} {} {} {} {} {}\" PBC=\"{} {} {}\" Properties=species:I:1:pos:R:3",
        matrix[0][0], matrix[0][1], matrix[0][2],
        matrix[1][0], matrix[1][1], matrix[1][2],
        matrix[2][0], matrix[2][1], matrix[2][2],
        flag(pbc[0]), flag(pbc[1]), flag(pbc[2]),
    )?;

    for (position, species) in positions.iter().zip(species) {
        writeln!(writer, "{} {} {} {}", species, position[0], position[1], position[2])?;
    }

    writer.flush()?;
    return Ok(());
}
