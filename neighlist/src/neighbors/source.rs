use std::marker::PhantomData;

use crate::Error;

use super::NeighborList;

/// Abstraction over the different ways a potential routine can access the
/// neighbors of particles.
///
/// A `NeighborSource` contains one or more lists of neighbors (one per
/// cutoff), and gives access to the neighbors of individual particles. The
/// returned slices borrow from the source, so they can not outlive it and the
/// source can not be modified while they are in use.
pub trait NeighborSource {
    /// Get the number of neighbor lists in this source
    fn number_of_lists(&self) -> usize;

    /// Get the neighbors of `particle` in the list at `list_index`
    fn neighbors(&self, list_index: usize, particle: usize) -> Result<&[usize], Error>;
}

impl NeighborSource for NeighborList {
    fn number_of_lists(&self) -> usize {
        self.cutoffs().len()
    }

    fn neighbors(&self, list_index: usize, particle: usize) -> Result<&[usize], Error> {
        self.get_neighbors(list_index, particle)
    }
}

impl<T: NeighborSource + ?Sized> NeighborSource for &T {
    fn number_of_lists(&self) -> usize {
        (**self).number_of_lists()
    }

    fn neighbors(&self, list_index: usize, particle: usize) -> Result<&[usize], Error> {
        (**self).neighbors(list_index, particle)
    }
}

/// Use a closure as a [`NeighborSource`].
///
/// This is useful to feed neighbors coming from another code into a potential
/// routine using this crate.
///
/// ```
/// use neighlist::neighbors::{FnSource, NeighborSource};
///
/// let neighbors = vec![vec![1], vec![0]];
/// let source = FnSource::new(1, |_, particle| Ok(&neighbors[particle][..]));
///
/// assert_eq!(source.number_of_lists(), 1);
/// assert_eq!(source.neighbors(0, 1)?, [0]);
/// # Ok::<(), neighlist::Error>(())
/// ```
pub struct FnSource<'data, F> where F: Fn(usize, usize) -> Result<&'data [usize], Error> {
    number_of_lists: usize,
    function: F,
    _data: PhantomData<&'data [usize]>,
}

impl<'data, F> FnSource<'data, F> where F: Fn(usize, usize) -> Result<&'data [usize], Error> {
    /// Create a new `FnSource` containing `number_of_lists` lists, where
    /// `function(list_index, particle)` gives the neighbors of `particle`
    pub fn new(number_of_lists: usize, function: F) -> FnSource<'data, F> {
        FnSource {
            number_of_lists: number_of_lists,
            function: function,
            _data: PhantomData,
        }
    }
}

impl<'data, F> NeighborSource for FnSource<'data, F> where F: Fn(usize, usize) -> Result<&'data [usize], Error> {
    fn number_of_lists(&self) -> usize {
        self.number_of_lists
    }

    fn neighbors(&self, list_index: usize, particle: usize) -> Result<&[usize], Error> {
        if list_index >= self.number_of_lists {
            return Err(Error::InvalidArgument(format!(
                "list index {} is out of bounds, there are {} lists",
                list_index, self.number_of_lists
            )));
        }
        (self.function)(list_index, particle)
    }
}
