/// Grid indices come in several shapes: a fixed size array, a slice or vec whose
/// length is only known at runtime, a tuple of separate integers, or a bare integer
/// for one dimensional grids. `IntoGridIndex` folds all of them into `[usize; N]`,
/// which is the only representation the field and coordinate system index with.
///
/// Index representations | Unified repr
/// [usize; N], &[usize; N] -----> | [usize; N]
/// &[usize], Vec<usize>   -----> | [usize; N] (length checked)
/// (usize, .., usize)     -----> | [usize; N]
/// usize                  -----> | [usize; 1]
use ndarray::{Dim, Dimension, IntoDimension, Ix};

/// Rank-`N` ndarray shape used for field storage.
pub type Shape<const N: usize> = Dim<[Ix; N]>;

pub trait IntoGridIndex<const N: usize> {
    fn into_index(self) -> [usize; N];
}

impl<const N: usize> IntoGridIndex<N> for [usize; N] {
    #[inline]
    fn into_index(self) -> [usize; N] {
        self
    }
}

impl<const N: usize> IntoGridIndex<N> for &[usize; N] {
    #[inline]
    fn into_index(self) -> [usize; N] {
        *self
    }
}

impl<const N: usize> IntoGridIndex<N> for &[usize] {
    #[inline]
    fn into_index(self) -> [usize; N] {
        assert_eq!(
            self.len(),
            N,
            "index has {} components but the grid has {} dimensions",
            self.len(),
            N
        );
        std::array::from_fn(|i| self[i])
    }
}

impl<const N: usize> IntoGridIndex<N> for &Vec<usize> {
    #[inline]
    fn into_index(self) -> [usize; N] {
        self.as_slice().into_index()
    }
}

impl<const N: usize> IntoGridIndex<N> for Vec<usize> {
    #[inline]
    fn into_index(self) -> [usize; N] {
        self.as_slice().into_index()
    }
}

impl IntoGridIndex<1> for usize {
    #[inline]
    fn into_index(self) -> [usize; 1] {
        [self]
    }
}

macro_rules! impl_tuple_index {
    ($n:literal; $($t:ident $i:tt),+) => {
        impl IntoGridIndex<$n> for ($($t,)+) {
            #[inline]
            fn into_index(self) -> [usize; $n] {
                [$(self.$i),+]
            }
        }
    };
}

impl_tuple_index!(1; usize 0);
impl_tuple_index!(2; usize 0, usize 1);
impl_tuple_index!(3; usize 0, usize 1, usize 2);
impl_tuple_index!(4; usize 0, usize 1, usize 2, usize 3);
impl_tuple_index!(5; usize 0, usize 1, usize 2, usize 3, usize 4);
impl_tuple_index!(6; usize 0, usize 1, usize 2, usize 3, usize 4, usize 5);

/////////////////////////////////////////////////
/// Conversions to and from ndarray dimensions
/////////////////////////////////////////////////

/// Builds an ndarray dimension out of a plain index or size array.
#[inline]
pub(crate) fn to_dim<const N: usize>(index: [usize; N]) -> Shape<N>
where
    Shape<N>: Dimension,
{
    let mut dim = Shape::<N>::zeros(N);
    dim.slice_mut().copy_from_slice(&index);
    dim
}

/// The inverse of `to_dim`, starting from the tuple pattern ndarray hands out
/// from indexed iteration.
#[inline]
pub(crate) fn from_pattern<const N: usize>(pattern: <Shape<N> as Dimension>::Pattern) -> [usize; N]
where
    Shape<N>: Dimension,
{
    let dim = pattern.into_dimension();
    std::array::from_fn(|k| dim[k])
}
