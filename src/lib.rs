//! Quantities sampled on rectilinear N-dimensional grids.
//!
//! A [`CoordinateSystem`] holds one shared, mutable 1-D [`Axis`] of coordinate values
//! per dimension. A [`Field`] pairs a dense `ndarray` buffer with a shared coordinate
//! system and provides element access, bulk initialization, elementwise arithmetic,
//! slicing into views and gnuplot-style text output.
//!
//! ```
//! use gridfield::{Field, Uniform};
//!
//! let mut temperature = Field::<f64, 2>::new([11, 6]);
//! temperature.set_coordinate_system([
//!     Some(&Uniform::new(0., 10.)),
//!     Some(&Uniform::new(0., 10.)),
//! ]);
//! temperature.set_from_coord(|[x, y]| x * y);
//! assert_eq!(temperature[[10, 5]], 100.);
//! ```

pub mod axis;
pub mod config;
pub mod coordinate_system;
pub mod discretize;
pub mod field;
pub mod index;
pub mod io;

pub use axis::Axis;
pub use config::{AxisConfig, Config, DiscretizerConfig, GridConfig};
pub use coordinate_system::{AxisSpec, CoordinateSystem};
pub use discretize::{Discretizer, Geometric, GeometricWithPeriod, Uniform};
pub use field::{Field, FieldBase, FieldRecord, FieldView, FieldViewMut};
pub use index::{IntoGridIndex, Shape};

pub use ndarray::s;
