use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use ndarray::{self as nd, Array1, ArrayView1, ArrayViewMut1, Slice};
use num::{Float, Zero};

use crate::discretize::Discretizer;

/// A one dimensional, shared sequence of coordinate values.
///
/// Cloning an `Axis` produces another handle onto the same storage, so a value written
/// through one handle is visible through every other. An axis obtained from [`Axis::slice`]
/// is a view: it owns nothing and reads and writes a strided window of its parent's
/// storage. Use [`Axis::deep_clone`] for an independent copy.
///
/// The storage sits behind a lock only so that aliasing is sound; callers are still
/// responsible for not racing conflicting writes against each other.
pub struct Axis<C> {
    storage: Arc<RwLock<Array1<C>>>,
    // successive windows applied on top of the storage, outermost first
    window: Vec<Slice>,
}

impl<C> Clone for Axis<C> {
    fn clone(&self) -> Self {
        Axis {
            storage: Arc::clone(&self.storage),
            window: self.window.clone(),
        }
    }
}

impl<C> Axis<C> {
    pub fn from_array(values: Array1<C>) -> Self {
        Axis {
            storage: Arc::new(RwLock::new(values)),
            window: Vec::new(),
        }
    }

    pub fn from_vec(values: Vec<C>) -> Self {
        Self::from_array(Array1::from_vec(values))
    }

    /// Runs `f` on the values visible through this handle.
    pub fn with_values<R>(&self, f: impl FnOnce(ArrayView1<'_, C>) -> R) -> R {
        let guard = self.storage.read().unwrap_or_else(PoisonError::into_inner);
        let mut view = guard.view();
        for s in &self.window {
            view.slice_axis_inplace(nd::Axis(0), *s);
        }
        f(view)
    }

    /// Runs `f` on a mutable view of the values visible through this handle.
    /// Writes land in the shared storage.
    pub fn with_values_mut<R>(&self, f: impl FnOnce(ArrayViewMut1<'_, C>) -> R) -> R {
        let mut guard = self.storage.write().unwrap_or_else(PoisonError::into_inner);
        let mut view = guard.view_mut();
        for s in &self.window {
            view.slice_axis_inplace(nd::Axis(0), *s);
        }
        f(view)
    }

    pub fn len(&self) -> usize {
        self.with_values(|v| v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when this handle is a strided window into another axis.
    pub fn is_view(&self) -> bool {
        !self.window.is_empty()
    }

    /// A view of a sub range of this axis. Panics if the slice is out of bounds.
    pub fn slice(&self, slice: Slice) -> Self {
        let mut window = self.window.clone();
        window.push(slice);
        let view = Axis {
            storage: Arc::clone(&self.storage),
            window,
        };
        // resolve once so a bad slice fails here instead of on first access
        view.len();
        view
    }

    /// Whether both handles read from the same underlying storage.
    pub fn shares_storage_with(&self, other: &Axis<C>) -> bool {
        Arc::ptr_eq(&self.storage, &other.storage)
    }
}

impl<C: Clone + Zero> Axis<C> {
    /// A fresh, zero filled axis of `len` values.
    pub fn new(len: usize) -> Self {
        Self::from_array(Array1::zeros(len))
    }
}

impl<C: Clone> Axis<C> {
    pub fn to_vec(&self) -> Vec<C> {
        self.with_values(|v| v.to_vec())
    }

    /// An owning copy of the visible values, detached from any other handle.
    pub fn deep_clone(&self) -> Self {
        Self::from_array(self.with_values(|v| v.to_owned()))
    }
}

impl<C: Copy> Axis<C> {
    /// Panics if `i` is out of bounds.
    #[inline]
    pub fn get(&self, i: usize) -> C {
        self.with_values(|v| v[i])
    }

    /// Panics if `i` is out of bounds.
    #[inline]
    pub fn set(&self, i: usize, value: C) {
        self.with_values_mut(|mut v| v[i] = value)
    }
}

/////////////////////////////////////////////////
/// Index searching on (assumed) sorted axes
/////////////////////////////////////////////////

/// Number of leading values satisfying `pred`, assuming they form a prefix.
fn partition_point<C: Copy>(values: &ArrayView1<'_, C>, pred: impl Fn(C) -> bool) -> usize {
    let (mut lo, mut hi) = (0, values.len());
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if pred(values[mid]) {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}

impl<C: PartialOrd + Copy> Axis<C> {
    /// Index of the greatest value `<= c`, or -1 if `c` lies below the first value.
    ///
    /// Note this is one less than the standard library meaning of a lower bound.
    pub fn lower_bound(&self, c: C) -> isize {
        self.upper_bound(c) as isize - 1
    }

    /// Index of the first value `> c`, or `len()` if there is none.
    pub fn upper_bound(&self, c: C) -> usize {
        self.with_values(|v| partition_point(&v, |x| x <= c))
    }
}

impl<C: Float> Axis<C> {
    /// Overwrites every value `k` with `discretizer.coordinate(k, len)`.
    pub fn fill(&self, discretizer: &dyn Discretizer<C>) {
        self.with_values_mut(|mut v| {
            let n = v.len();
            for (k, x) in v.iter_mut().enumerate() {
                *x = discretizer.coordinate(k, n);
            }
        })
    }

    /// Index of the value closest to `c`, clamped to the ends of the axis.
    /// A coordinate exactly halfway between two values goes to the upper one.
    pub fn nearest(&self, c: C) -> usize {
        self.with_values(|v| {
            let n = v.len();
            if n == 0 || c < v[0] {
                return 0;
            }
            if c > v[n - 1] {
                return n - 1;
            }
            let ind = partition_point(&v, |x| x <= c).saturating_sub(1);
            if ind + 1 >= n {
                return ind;
            }
            let two = C::one() + C::one();
            let frac = two * (c - v[ind]) / (v[ind + 1] - v[ind]);
            ind + frac.to_usize().unwrap_or(0)
        })
    }
}

impl<C: fmt::Debug> fmt::Debug for Axis<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with_values(|v| f.debug_list().entries(v.iter()).finish())
    }
}

impl<C: PartialEq> PartialEq for Axis<C> {
    /// Compares the visible values, not the storage identity.
    fn eq(&self, other: &Self) -> bool {
        if self.shares_storage_with(other) && self.window == other.window {
            return true;
        }
        self.with_values(|a| other.with_values(|b| a == b))
    }
}
