use std::sync::Arc;

use ndarray::{Array, Data, Dimension};
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use super::{Field, FieldBase};
use crate::axis::Axis;
use crate::coordinate_system::CoordinateSystem;
use crate::index::{to_dim, Shape};

/// The serialized form of a field: the axis values, the shape and the elements in
/// row major order. Views serialize their visible window, so any field can be
/// written; only owning fields are read back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRecord<Q, C> {
    pub axes: Vec<Vec<C>>,
    pub shape: Vec<usize>,
    pub data: Vec<Q>,
}

impl<Q, S, C, const N: usize> From<&FieldBase<S, C, N>> for FieldRecord<Q, C>
where
    S: Data<Elem = Q>,
    Q: Clone,
    C: Clone,
    Shape<N>: Dimension,
{
    fn from(field: &FieldBase<S, C, N>) -> Self {
        FieldRecord {
            axes: field.cs.snapshot().into(),
            shape: field.shape().to_vec(),
            data: field.data.iter().cloned().collect(),
        }
    }
}

impl<Q, C, const N: usize> TryFrom<FieldRecord<Q, C>> for Field<Q, N, C>
where
    Shape<N>: Dimension,
{
    type Error = String;

    fn try_from(record: FieldRecord<Q, C>) -> Result<Self, String> {
        if record.shape.len() != N || record.axes.len() != N {
            return Err(format!(
                "expected a {}-d field, found {} axes and a {}-d shape",
                N,
                record.axes.len(),
                record.shape.len()
            ));
        }
        for (i, (axis, len)) in record.axes.iter().zip(&record.shape).enumerate() {
            if axis.len() != *len {
                return Err(format!(
                    "axis {} has {} values but the field has {} along it",
                    i,
                    axis.len(),
                    len
                ));
            }
        }
        let mut axes = record.axes.into_iter().map(Axis::from_vec);
        let axes: [Axis<C>; N] = std::array::from_fn(|_| {
            axes.next().unwrap_or_else(|| Axis::from_vec(Vec::new()))
        });
        let shape: [usize; N] = std::array::from_fn(|k| record.shape[k]);
        let data = Array::from_shape_vec(to_dim(shape), record.data).map_err(|e| e.to_string())?;
        Ok(FieldBase {
            data,
            cs: Arc::new(CoordinateSystem::from_axes(axes)),
        })
    }
}

impl<Q, S, C, const N: usize> Serialize for FieldBase<S, C, N>
where
    S: Data<Elem = Q>,
    Q: Serialize + Clone,
    C: Serialize + Clone,
    Shape<N>: Dimension,
{
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        FieldRecord::from(self).serialize(serializer)
    }
}

impl<'de, Q, C, const N: usize> Deserialize<'de> for Field<Q, N, C>
where
    Q: Deserialize<'de>,
    C: Deserialize<'de>,
    Shape<N>: Dimension,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = FieldRecord::<Q, C>::deserialize(deserializer)?;
        Field::try_from(record).map_err(de::Error::custom)
    }
}
