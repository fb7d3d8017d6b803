//! Bulk initialization. Every element is written independently, so all of these
//! run on the rayon pool; the order in which elements are visited is unspecified.
use ndarray::{DataMut, Dimension, Zip};

use super::FieldBase;
use crate::coordinate_system::CoordinateSystem;
use crate::index::{from_pattern, Shape};

impl<Q, S, C, const N: usize> FieldBase<S, C, N>
where
    S: DataMut<Elem = Q>,
    Q: Send + Sync,
    Shape<N>: Dimension,
{
    /// Overwrites every element with `value`.
    pub fn set(&mut self, value: Q)
    where
        Q: Clone,
    {
        Zip::from(&mut self.data).par_for_each(|x| *x = value.clone());
    }

    /// Sets every element to `f(coordinates of the element)`.
    pub fn set_from_coord<F>(&mut self, f: F)
    where
        F: Fn([C; N]) -> Q + Sync + Send,
        C: Copy + Send + Sync,
        <Shape<N> as Dimension>::Pattern: Send,
    {
        self.set_from_coord_optional(|x| Some(f(x)))
    }

    /// Like [`FieldBase::set_from_coord`], but elements for which `f` returns
    /// `None` keep their current value.
    pub fn set_from_coord_optional<F>(&mut self, f: F)
    where
        F: Fn([C; N]) -> Option<Q> + Sync + Send,
        C: Copy + Send + Sync,
        <Shape<N> as Dimension>::Pattern: Send,
    {
        let axes = self.cs.snapshot();
        Zip::indexed(&mut self.data).par_for_each(|pattern, x| {
            let idx = from_pattern::<N>(pattern);
            if let Some(v) = f(std::array::from_fn(|k| axes[k][idx[k]])) {
                *x = v;
            }
        });
    }

    /// Sets every element to `f(index of the element, coordinate system)`.
    ///
    /// Every axis read through the coordinate system takes the axis lock, once per
    /// element. For fills that only need coordinates, [`FieldBase::set_from_coord`]
    /// reads the axes once up front; otherwise capture a
    /// [`CoordinateSystem::snapshot`] in `f`.
    pub fn set_from_index<F>(&mut self, f: F)
    where
        F: Fn([usize; N], &CoordinateSystem<C, N>) -> Q + Sync + Send,
        C: Send + Sync,
        <Shape<N> as Dimension>::Pattern: Send,
    {
        self.set_from_index_optional(|i, cs| Some(f(i, cs)))
    }

    /// Like [`FieldBase::set_from_index`], but elements for which `f` returns
    /// `None` keep their current value. The same advice on axis reads applies.
    pub fn set_from_index_optional<F>(&mut self, f: F)
    where
        F: Fn([usize; N], &CoordinateSystem<C, N>) -> Option<Q> + Sync + Send,
        C: Send + Sync,
        <Shape<N> as Dimension>::Pattern: Send,
    {
        let cs: &CoordinateSystem<C, N> = &self.cs;
        Zip::indexed(&mut self.data).par_for_each(|pattern, x| {
            if let Some(v) = f(from_pattern::<N>(pattern), cs) {
                *x = v;
            }
        });
    }
}
