//! Full neighbor lists built with a cell list, for one or more cutoffs at
//! once.

mod cell_list;

mod list;
pub use self::list::{NeighborList, NeighborTable};

mod source;
pub use self::source::{NeighborSource, FnSource};
