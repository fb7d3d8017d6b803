use std::ops::Index;

use ndarray::{Slice, SliceInfoElem};
use num::{Float, Zero};
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::axis::Axis;
use crate::discretize::Discretizer;
use crate::index::IntoGridIndex;

/// One position of a mixed construction: either a fresh axis of the given length
/// or an existing axis handle to share.
#[derive(Debug, Clone)]
pub enum AxisSpec<C> {
    Size(usize),
    Shared(Axis<C>),
}

impl<C> From<usize> for AxisSpec<C> {
    fn from(n: usize) -> Self {
        AxisSpec::Size(n)
    }
}

impl<C> From<Axis<C>> for AxisSpec<C> {
    fn from(axis: Axis<C>) -> Self {
        AxisSpec::Shared(axis)
    }
}

/// `N` independently shared axes describing a rectilinear grid.
///
/// `Clone` shares the axes (the clone and the original see each other's writes),
/// [`CoordinateSystem::deep_clone`] copies them.
#[derive(Debug, PartialEq)]
pub struct CoordinateSystem<C, const N: usize> {
    axes: [Axis<C>; N],
}

impl<C, const N: usize> Clone for CoordinateSystem<C, N> {
    fn clone(&self) -> Self {
        CoordinateSystem {
            axes: self.axes.clone(),
        }
    }
}

impl<C, const N: usize> Default for CoordinateSystem<C, N> {
    fn default() -> Self {
        CoordinateSystem {
            axes: std::array::from_fn(|_| Axis::from_vec(Vec::new())),
        }
    }
}

impl<C, const N: usize> CoordinateSystem<C, N> {
    /// Adopts the given axes without copying them.
    pub fn from_axes(axes: [Axis<C>; N]) -> Self {
        CoordinateSystem { axes }
    }

    /// Length of axis `i`. A negative `i` gives the total number of grid points,
    /// an `i` past the last axis gives 0.
    pub fn size(&self, i: isize) -> usize {
        if i < 0 {
            self.len()
        } else {
            self.axes.get(i as usize).map_or(0, Axis::len)
        }
    }

    /// Total number of grid points.
    pub fn len(&self) -> usize {
        self.axes.iter().map(Axis::len).product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn shape(&self) -> [usize; N] {
        std::array::from_fn(|k| self.axes[k].len())
    }

    pub fn ndim(&self) -> usize {
        N
    }

    pub fn axis(&self, i: usize) -> &Axis<C> {
        &self.axes[i]
    }

    pub fn axes(&self) -> &[Axis<C>; N] {
        &self.axes
    }

    pub fn into_axes(self) -> [Axis<C>; N] {
        self.axes
    }

    /// A lower rank coordinate system of axis views.
    ///
    /// Range elements keep a (strided) window of the corresponding axis, index
    /// elements drop the axis entirely. Panics when an element inserts a new axis,
    /// when the number of elements is not `N`, or when the number of kept axes
    /// is not `M`.
    pub fn slice<I, const M: usize>(&self, info: I) -> CoordinateSystem<C, M>
    where
        I: AsRef<[SliceInfoElem]>,
    {
        let info = info.as_ref();
        assert_eq!(
            info.len(),
            N,
            "slice has {} elements for a {}-d coordinate system",
            info.len(),
            N
        );
        let mut kept = Vec::with_capacity(M);
        for (axis, elem) in self.axes.iter().zip(info) {
            match *elem {
                SliceInfoElem::Slice { start, end, step } => {
                    kept.push(axis.slice(Slice::new(start, end, step)))
                }
                SliceInfoElem::Index(_) => {}
                SliceInfoElem::NewAxis => {
                    panic!("new axes cannot be inserted into a coordinate system")
                }
            }
        }
        let n = kept.len();
        let axes: [Axis<C>; M] = kept
            .try_into()
            .unwrap_or_else(|_| panic!("slice keeps {} axes, expected {}", n, M));
        CoordinateSystem { axes }
    }
}

impl<C: Clone + Zero, const N: usize> CoordinateSystem<C, N> {
    /// Allocates `N` fresh, zero filled axes.
    pub fn new(sizes: [usize; N]) -> Self {
        CoordinateSystem {
            axes: sizes.map(Axis::new),
        }
    }

    /// Mixes fresh axes and shared handles positionally.
    pub fn from_specs(specs: [AxisSpec<C>; N]) -> Self {
        CoordinateSystem {
            axes: specs.map(|spec| match spec {
                AxisSpec::Size(n) => Axis::new(n),
                AxisSpec::Shared(axis) => axis,
            }),
        }
    }
}

impl<C: Clone, const N: usize> CoordinateSystem<C, N> {
    /// Copies every axis into new storage.
    pub fn deep_clone(&self) -> Self {
        CoordinateSystem {
            axes: std::array::from_fn(|k| self.axes[k].deep_clone()),
        }
    }

    /// A lock free copy of all axis values, for hot loops.
    pub fn snapshot(&self) -> [Vec<C>; N] {
        std::array::from_fn(|k| self.axes[k].to_vec())
    }
}

impl<C: Copy, const N: usize> CoordinateSystem<C, N> {
    /// The coordinates of grid point `idx`. Panics if any component is out of range.
    pub fn coord(&self, idx: impl IntoGridIndex<N>) -> [C; N] {
        let idx = idx.into_index();
        std::array::from_fn(|k| self.axes[k].get(idx[k]))
    }
}

impl<C: PartialOrd + Copy, const N: usize> CoordinateSystem<C, N> {
    /// Per axis [`Axis::lower_bound`].
    pub fn lower_bound(&self, c: [C; N]) -> [isize; N] {
        std::array::from_fn(|k| self.axes[k].lower_bound(c[k]))
    }

    /// Per axis [`Axis::upper_bound`].
    pub fn upper_bound(&self, c: [C; N]) -> [usize; N] {
        std::array::from_fn(|k| self.axes[k].upper_bound(c[k]))
    }
}

impl<C: Float, const N: usize> CoordinateSystem<C, N> {
    /// Fills each axis from its discretizer; `None` leaves that axis untouched.
    pub fn set(&self, discretizers: [Option<&dyn Discretizer<C>>; N]) {
        for (axis, d) in self.axes.iter().zip(discretizers) {
            if let Some(d) = d {
                axis.fill(d);
            }
        }
    }

    /// Per axis [`Axis::nearest`].
    pub fn nearest(&self, c: [C; N]) -> [usize; N] {
        std::array::from_fn(|k| self.axes[k].nearest(c[k]))
    }
}

impl<C, const N: usize> Index<usize> for CoordinateSystem<C, N> {
    type Output = Axis<C>;

    fn index(&self, i: usize) -> &Axis<C> {
        &self.axes[i]
    }
}

/// Serialized as the list of axis values, one sequence per axis.
impl<C: Serialize + Clone, const N: usize> Serialize for CoordinateSystem<C, N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let axes: Vec<Vec<C>> = self.snapshot().into();
        axes.serialize(serializer)
    }
}

impl<'de, C: Deserialize<'de>, const N: usize> Deserialize<'de> for CoordinateSystem<C, N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let axes: Vec<Axis<C>> = Vec::<Vec<C>>::deserialize(deserializer)?
            .into_iter()
            .map(Axis::from_vec)
            .collect();
        let axes: [Axis<C>; N] = axes.try_into().map_err(|axes: Vec<Axis<C>>| {
            de::Error::custom(format!("expected {} axes, found {}", N, axes.len()))
        })?;
        Ok(CoordinateSystem { axes })
    }
}
