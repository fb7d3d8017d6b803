use std::sync::Arc;

use anyhow::{Context, Error, Result};
use num::{Float, NumCast};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::coordinate_system::CoordinateSystem;
use crate::discretize::{Discretizer, Geometric, GeometricWithPeriod, Uniform};
use crate::field::Field;
use crate::index::Shape;

/// Anything serde can handle round trips through a ron document.
pub trait Config: Send + Sync {
    fn config(&self) -> Result<String>;
    fn load_config(&mut self, config: &str) -> Result<()>;
}

impl<T: Serialize + DeserializeOwned + Send + Sync> Config for T {
    fn config(&self) -> Result<String> {
        ron::to_string(self).context("Failed to serialize config")
    }
    fn load_config(&mut self, config: &str) -> Result<()> {
        *self = ron::from_str(config).context(format!("Failed to load config {}", config))?;
        Ok(())
    }
}

/// How one axis gets its coordinate values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum DiscretizerConfig {
    /// Leave the axis zero filled.
    #[default]
    Keep,
    Uniform { min: f64, max: f64 },
    Geometric { min: f64, dx: f64, stretch: f64 },
    GeometricWithPeriod { min: f64, dx: f64, stretch: f64, period: f64 },
}

fn coordinate<C: Float>(x: f64) -> Result<C> {
    <C as NumCast>::from(x).context(format!("{} is not representable as a coordinate", x))
}

impl DiscretizerConfig {
    pub fn build<C: Float + 'static>(&self) -> Result<Option<Box<dyn Discretizer<C>>>> {
        let d: Box<dyn Discretizer<C>> = match *self {
            DiscretizerConfig::Keep => return Ok(None),
            DiscretizerConfig::Uniform { min, max } => {
                Box::new(Uniform::new(coordinate::<C>(min)?, coordinate::<C>(max)?))
            }
            DiscretizerConfig::Geometric { min, dx, stretch } => Box::new(Geometric::new(
                coordinate::<C>(min)?,
                coordinate::<C>(dx)?,
                coordinate::<C>(stretch)?,
            )),
            DiscretizerConfig::GeometricWithPeriod {
                min,
                dx,
                stretch,
                period,
            } => Box::new(GeometricWithPeriod::new(
                coordinate::<C>(min)?,
                coordinate::<C>(dx)?,
                coordinate::<C>(stretch)?,
                coordinate::<C>(period)?,
            )),
        };
        Ok(Some(d))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisConfig {
    pub size: usize,
    #[serde(default)]
    pub discretizer: DiscretizerConfig,
}

/// A declarative description of a grid, one entry per axis.
///
/// ```
/// use gridfield::{Config, GridConfig};
///
/// let mut config = GridConfig::default();
/// config
///     .load_config("(axes: [(size: 3, discretizer: Uniform(min: 0.0, max: 1.0))])")
///     .unwrap();
/// let cs = config.coordinate_system::<f64, 1>().unwrap();
/// assert_eq!(cs[0].to_vec(), vec![0.0, 0.5, 1.0]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    pub axes: Vec<AxisConfig>,
}

impl GridConfig {
    pub fn coordinate_system<C, const N: usize>(&self) -> Result<CoordinateSystem<C, N>>
    where
        C: Float + 'static,
    {
        if self.axes.len() != N {
            return Err(Error::msg(format!(
                "config describes {} axes, expected {}",
                self.axes.len(),
                N
            )));
        }
        let cs = CoordinateSystem::new(std::array::from_fn(|k| self.axes[k].size));
        let discretizers = self
            .axes
            .iter()
            .enumerate()
            .map(|(i, a)| a.discretizer.build::<C>().context(format!("axis {}", i)))
            .collect::<Result<Vec<_>>>()?;
        cs.set(std::array::from_fn(|k| discretizers[k].as_deref()));
        Ok(cs)
    }

    pub fn field<Q, C, const N: usize>(&self) -> Result<Field<Q, N, C>>
    where
        Q: Clone + Default,
        C: Float + 'static,
        Shape<N>: ndarray::Dimension,
    {
        Ok(Field::with_coordinate_system(Arc::new(self.coordinate_system()?)))
    }
}
