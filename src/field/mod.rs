use std::ops::{Index, IndexMut};
use std::sync::Arc;

use ndarray::{
    self as nd, Array, ArrayBase, ArrayView, ArrayViewMut, Data, DataMut, Dimension, OwnedRepr,
    RawData, RemoveAxis, SliceArg, SliceInfoElem, ViewRepr,
};
use num::{Float, Zero};
use tracing::trace;

use crate::axis::Axis;
use crate::coordinate_system::CoordinateSystem;
use crate::discretize::Discretizer;
use crate::index::{to_dim, IntoGridIndex, Shape};

mod display;
mod fill;
mod ops;
mod record;

pub use self::record::FieldRecord;

/// A dense `N`-dimensional array of quantities paired with a shared coordinate system.
///
/// `S` is the ndarray storage: an owned buffer for [`Field`], borrowed ones for the
/// [`FieldView`] and [`FieldViewMut`] produced by slicing.
pub struct FieldBase<S, C, const N: usize>
where
    S: RawData,
{
    data: ArrayBase<S, Shape<N>>,
    cs: Arc<CoordinateSystem<C, N>>,
}

/// An owning field with quantities `Q` and coordinates `C`.
pub type Field<Q, const N: usize, C = Q> = FieldBase<OwnedRepr<Q>, C, N>;
/// A read only view into (part of) another field's storage.
pub type FieldView<'a, Q, const N: usize, C = Q> = FieldBase<ViewRepr<&'a Q>, C, N>;
/// A mutable view; writes land in the parent's storage.
pub type FieldViewMut<'a, Q, const N: usize, C = Q> = FieldBase<ViewRepr<&'a mut Q>, C, N>;

/////////////////////////////////////////////////
/// Construction
/////////////////////////////////////////////////

impl<Q, C, const N: usize> Field<Q, N, C>
where
    Shape<N>: Dimension,
{
    /// A field over fresh, zeroed axes of the given lengths, filled with `Q::default()`.
    pub fn new(sizes: [usize; N]) -> Self
    where
        Q: Clone + Default,
        C: Clone + Zero,
    {
        Self::with_coordinate_system(Arc::new(CoordinateSystem::new(sizes)))
    }

    /// A field with fresh data that shares `cs`.
    pub fn with_coordinate_system(cs: Arc<CoordinateSystem<C, N>>) -> Self
    where
        Q: Clone + Default,
    {
        let data = Array::from_elem(to_dim(cs.shape()), Q::default());
        FieldBase { data, cs }
    }

    /// Copies `data`; the new field shares the axes of `cs`.
    ///
    /// Panics if the shape of `data` differs from the axis lengths.
    pub fn from_parts<S2>(cs: &CoordinateSystem<C, N>, data: &ArrayBase<S2, Shape<N>>) -> Self
    where
        S2: Data<Elem = Q>,
        Q: Clone,
    {
        assert_eq!(
            data.shape(),
            &cs.shape()[..],
            "data shape does not match the coordinate system"
        );
        FieldBase {
            data: data.to_owned(),
            cs: Arc::new(cs.clone()),
        }
    }

    /// Rebuilds this field over fresh axes of the given lengths.
    pub fn reset(&mut self, sizes: [usize; N])
    where
        Q: Clone + Default,
        C: Clone + Zero,
    {
        trace!(?sizes, "resetting field");
        *self = Self::new(sizes);
    }

    /// Rebuilds this field with fresh data over a shared coordinate system.
    pub fn reset_with_coordinate_system(&mut self, cs: Arc<CoordinateSystem<C, N>>)
    where
        Q: Clone + Default,
    {
        *self = Self::with_coordinate_system(cs);
    }

    /// Moves the contents out, leaving an empty field behind.
    pub fn take(&mut self) -> Self
    where
        Q: Default,
    {
        std::mem::take(self)
    }

    pub fn into_data(self) -> Array<Q, Shape<N>> {
        self.data
    }
}

impl<Q: Default, C, const N: usize> Default for Field<Q, N, C>
where
    Shape<N>: Dimension,
{
    /// Zero length axes and no data.
    fn default() -> Self {
        FieldBase {
            data: Array::default(Shape::<N>::zeros(N)),
            cs: Arc::new(CoordinateSystem::default()),
        }
    }
}

impl<Q: Clone, C: Clone, const N: usize> Clone for Field<Q, N, C>
where
    Shape<N>: Dimension,
{
    /// Copies the data and the axes; the clone is not linked to `self`.
    fn clone(&self) -> Self {
        FieldBase {
            data: self.data.clone(),
            cs: Arc::new(self.cs.deep_clone()),
        }
    }
}

/////////////////////////////////////////////////
/// Shape and coordinate system access
/////////////////////////////////////////////////

impl<S, C, const N: usize> FieldBase<S, C, N>
where
    S: RawData,
    Shape<N>: Dimension,
{
    pub fn coordinate_system(&self) -> &CoordinateSystem<C, N> {
        &self.cs
    }

    /// A new handle onto the shared coordinate system.
    pub fn coordinate_system_ptr(&self) -> Arc<CoordinateSystem<C, N>> {
        Arc::clone(&self.cs)
    }

    pub fn axis(&self, i: usize) -> &Axis<C> {
        self.cs.axis(i)
    }

    /// Length of dimension `i`; negative gives the element count, past the
    /// last dimension gives 0.
    pub fn size(&self, i: isize) -> usize {
        if i < 0 {
            self.len()
        } else {
            self.data.shape().get(i as usize).copied().unwrap_or(0)
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn shape(&self) -> [usize; N] {
        std::array::from_fn(|k| self.data.shape()[k])
    }
}

impl<S, C: Copy, const N: usize> FieldBase<S, C, N>
where
    S: RawData,
    Shape<N>: Dimension,
{
    pub fn coord(&self, idx: impl IntoGridIndex<N>) -> [C; N] {
        self.cs.coord(idx)
    }
}

impl<S, C: PartialOrd + Copy, const N: usize> FieldBase<S, C, N>
where
    S: RawData,
    Shape<N>: Dimension,
{
    pub fn lower_bound(&self, c: [C; N]) -> [isize; N] {
        self.cs.lower_bound(c)
    }

    pub fn upper_bound(&self, c: [C; N]) -> [usize; N] {
        self.cs.upper_bound(c)
    }
}

impl<S, C: Float, const N: usize> FieldBase<S, C, N>
where
    S: RawData,
    Shape<N>: Dimension,
{
    /// Fills the axes from discretizers, see [`CoordinateSystem::set`].
    pub fn set_coordinate_system(&self, discretizers: [Option<&dyn Discretizer<C>>; N]) {
        self.cs.set(discretizers)
    }

    pub fn nearest(&self, c: [C; N]) -> [usize; N] {
        self.cs.nearest(c)
    }
}

/////////////////////////////////////////////////
/// Element access and views
/////////////////////////////////////////////////

impl<Q, S, C, const N: usize> FieldBase<S, C, N>
where
    S: Data<Elem = Q>,
    Shape<N>: Dimension,
{
    pub fn data(&self) -> ArrayView<'_, Q, Shape<N>> {
        self.data.view()
    }

    /// The elements in row major order, if they are laid out that way in memory.
    pub fn as_slice(&self) -> Option<&[Q]> {
        self.data.as_slice()
    }

    pub fn get(&self, idx: impl IntoGridIndex<N>) -> Option<&Q> {
        self.data.get(to_dim(idx.into_index()))
    }

    /// The sub array at index `i` of the first dimension; chains with further
    /// indexing, `f.outer(i)[[j, k]] == f[[i, j, k]]`.
    pub fn outer(&self, i: usize) -> ArrayView<'_, Q, <Shape<N> as Dimension>::Smaller>
    where
        Shape<N>: RemoveAxis,
    {
        self.data.index_axis(nd::Axis(0), i)
    }

    pub fn view(&self) -> FieldView<'_, Q, N, C> {
        FieldBase {
            data: self.data.view(),
            cs: Arc::clone(&self.cs),
        }
    }

    /// Copies the data; the axes stay shared.
    pub fn to_owned(&self) -> Field<Q, N, C>
    where
        Q: Clone,
    {
        FieldBase {
            data: self.data.to_owned(),
            cs: Arc::clone(&self.cs),
        }
    }

    /// A view of a sub grid. Ranges keep (a strided window of) a dimension,
    /// single indices remove it:
    ///
    /// ```
    /// use gridfield::{s, Field, FieldView};
    ///
    /// let f = Field::<f64, 3>::new([6, 6, 6]);
    /// let g: FieldView<f64, 2> = f.slice(s![.., 2, 1..6;2]);
    /// assert_eq!(g.shape(), [6, 3]);
    /// ```
    pub fn slice<I, const M: usize>(&self, info: I) -> FieldView<'_, Q, M, C>
    where
        I: SliceArg<Shape<N>, OutDim = Shape<M>>,
        Shape<M>: Dimension,
    {
        let cs = self.cs.slice(AsRef::<[SliceInfoElem]>::as_ref(&info));
        FieldBase {
            data: self.data.slice(info),
            cs: Arc::new(cs),
        }
    }
}

impl<Q, S, C, const N: usize> FieldBase<S, C, N>
where
    S: DataMut<Elem = Q>,
    Shape<N>: Dimension,
{
    pub fn data_mut(&mut self) -> ArrayViewMut<'_, Q, Shape<N>> {
        self.data.view_mut()
    }

    pub fn as_slice_mut(&mut self) -> Option<&mut [Q]> {
        self.data.as_slice_mut()
    }

    pub fn get_mut(&mut self, idx: impl IntoGridIndex<N>) -> Option<&mut Q> {
        self.data.get_mut(to_dim(idx.into_index()))
    }

    pub fn outer_mut(&mut self, i: usize) -> ArrayViewMut<'_, Q, <Shape<N> as Dimension>::Smaller>
    where
        Shape<N>: RemoveAxis,
    {
        self.data.index_axis_mut(nd::Axis(0), i)
    }

    pub fn view_mut(&mut self) -> FieldViewMut<'_, Q, N, C> {
        FieldBase {
            data: self.data.view_mut(),
            cs: Arc::clone(&self.cs),
        }
    }

    /// Like [`FieldBase::slice`], but writes through the view reach this field.
    pub fn slice_mut<I, const M: usize>(&mut self, info: I) -> FieldViewMut<'_, Q, M, C>
    where
        I: SliceArg<Shape<N>, OutDim = Shape<M>>,
        Shape<M>: Dimension,
    {
        let cs = self.cs.slice(AsRef::<[SliceInfoElem]>::as_ref(&info));
        FieldBase {
            data: self.data.slice_mut(info),
            cs: Arc::new(cs),
        }
    }
}

impl<S, C, I, const N: usize> Index<I> for FieldBase<S, C, N>
where
    S: Data,
    I: IntoGridIndex<N>,
    Shape<N>: Dimension,
{
    type Output = S::Elem;

    /// Panics if the index is out of bounds.
    #[inline]
    fn index(&self, idx: I) -> &S::Elem {
        &self.data[to_dim(idx.into_index())]
    }
}

impl<S, C, I, const N: usize> IndexMut<I> for FieldBase<S, C, N>
where
    S: DataMut,
    I: IntoGridIndex<N>,
    Shape<N>: Dimension,
{
    #[inline]
    fn index_mut(&mut self, idx: I) -> &mut S::Elem {
        &mut self.data[to_dim(idx.into_index())]
    }
}

impl<S, C, const N: usize> std::fmt::Debug for FieldBase<S, C, N>
where
    S: Data,
    S::Elem: std::fmt::Debug,
    C: std::fmt::Debug,
    Shape<N>: Dimension,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("axes", self.cs.axes())
            .field("data", &self.data)
            .finish()
    }
}
