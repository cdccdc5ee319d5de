//! Switches between rayon and plain iteration on the `parallel` feature.
//!
//! Per-pixel loops go through [`pixel_zip!`], which expands to ndarray's
//! `par_azip!` or `azip!`. Whole-image loops use the iterator traits in
//! [`prelude`]. Results are the same either way.

#[cfg(feature = "parallel")]
pub use rayon::prelude;

#[cfg(not(feature = "parallel"))]
pub mod prelude {
    pub use std::iter::Iterator as ParallelIterator;

    pub trait IntoParallelRefIterator<'data> {
        type Item: 'data;
        type Iter: ParallelIterator<Item = Self::Item>;

        fn par_iter(&'data self) -> Self::Iter;
    }

    impl<'data, I: 'data + ?Sized> IntoParallelRefIterator<'data> for I
    where
        &'data I: IntoIterator,
    {
        type Iter = <&'data I as IntoIterator>::IntoIter;
        type Item = <&'data I as IntoIterator>::Item;

        fn par_iter(&'data self) -> Self::Iter {
            self.into_iter()
        }
    }
}

#[cfg(feature = "parallel")]
macro_rules! pixel_zip {
    ($($t:tt)*) => { ::ndarray::par_azip!($($t)*) };
}

#[cfg(not(feature = "parallel"))]
macro_rules! pixel_zip {
    ($($t:tt)*) => { ::ndarray::azip!($($t)*) };
}

pub(crate) use pixel_zip;
