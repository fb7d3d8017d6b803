//! A small hierarchical container: named groups holding named, shaped datasets of
//! floating point values, persisted as a ron document.
//!
//! A field of rank `N` is stored as one dataset per axis, `"axis 0"` through
//! `"axis {N-1}"`, next to a `"field"` dataset holding the elements in row major
//! order with the field's shape.
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use ndarray::{Data, Dimension};
use num::{Float, NumCast};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::FieldIoError;
use crate::field::{Field, FieldBase};
use crate::index::Shape;

const FIELD: &str = "field";

fn axis_name(i: usize) -> String {
    format!("axis {}", i)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Dataset {
    F32 { shape: Vec<usize>, values: Vec<f32> },
    F64 { shape: Vec<usize>, values: Vec<f64> },
}

/// Element types a [`Dataset`] can hold natively.
pub trait Element: Float + Default + Send + Sync + 'static {
    fn dataset(shape: Vec<usize>, values: Vec<Self>) -> Dataset;
}

impl Element for f32 {
    fn dataset(shape: Vec<usize>, values: Vec<Self>) -> Dataset {
        Dataset::F32 { shape, values }
    }
}

impl Element for f64 {
    fn dataset(shape: Vec<usize>, values: Vec<Self>) -> Dataset {
        Dataset::F64 { shape, values }
    }
}

impl Dataset {
    pub fn new<T: Element>(shape: Vec<usize>, values: Vec<T>) -> Self {
        T::dataset(shape, values)
    }

    pub fn shape(&self) -> &[usize] {
        match self {
            Dataset::F32 { shape, .. } | Dataset::F64 { shape, .. } => shape,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Dataset::F32 { values, .. } => values.len(),
            Dataset::F64 { values, .. } => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The values converted to `T`, or `None` if one of them does not fit.
    pub fn read<T: Element>(&self) -> Option<Vec<T>> {
        match self {
            Dataset::F32 { values, .. } => values.iter().map(|&v| <T as NumCast>::from(v)).collect(),
            Dataset::F64 { values, .. } => values.iter().map(|&v| <T as NumCast>::from(v)).collect(),
        }
    }
}

/// A node of the container tree. Paths separate nested groups with `/`; the
/// empty path names the group itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(default)]
    datasets: BTreeMap<String, Dataset>,
    #[serde(default)]
    groups: BTreeMap<String, Group>,
}

fn components(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dataset(&self, name: &str) -> Option<&Dataset> {
        self.datasets.get(name)
    }

    /// Stores `dataset` under `name`, returning whatever was there before.
    pub fn insert_dataset(&mut self, name: impl Into<String>, dataset: Dataset) -> Option<Dataset> {
        self.datasets.insert(name.into(), dataset)
    }

    pub fn dataset_names(&self) -> impl Iterator<Item = &str> {
        self.datasets.keys().map(String::as_str)
    }

    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn group(&self, path: &str) -> Option<&Group> {
        components(path).try_fold(self, |g, name| g.groups.get(name))
    }

    /// Like [`Group::group`], creating missing groups along the way.
    pub fn group_mut(&mut self, path: &str) -> &mut Group {
        let mut g = self;
        for name in components(path) {
            g = g.groups.entry(name.to_string()).or_default();
        }
        g
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .context("Failed to serialize container")?;
        fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
        debug!(
            path = %path.display(),
            datasets = self.datasets.len(),
            groups = self.groups.len(),
            "container saved"
        );
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text =
            fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let group = ron::from_str(&text)
            .with_context(|| format!("{} is not a field container", path.display()))?;
        debug!(path = %path.display(), "container loaded");
        Ok(group)
    }
}

/// Writes the axes and elements of `field` into the group at `path` below `root`,
/// replacing datasets of the same name.
pub fn write_field<S, Q, C, const N: usize>(
    root: &mut Group,
    path: &str,
    field: &FieldBase<S, C, N>,
) where
    S: Data<Elem = Q>,
    Q: Element,
    C: Element,
    Shape<N>: Dimension,
{
    let group = root.group_mut(path);
    for i in 0..N {
        let values = field.axis(i).to_vec();
        group.insert_dataset(axis_name(i), Dataset::new(vec![values.len()], values));
    }
    let values: Vec<Q> = field.data().iter().copied().collect();
    group.insert_dataset(FIELD, Dataset::new(field.shape().to_vec(), values));
    debug!(path, shape = ?field.shape(), "field written");
}

/// Reads a rank `N` field from the group at `path` below `root`, converting the
/// stored values to `Q` and `C`.
pub fn read_field<Q, C, const N: usize>(
    root: &Group,
    path: &str,
) -> Result<Field<Q, N, C>, FieldIoError>
where
    Q: Element,
    C: Element,
    Shape<N>: Dimension,
{
    let group = root
        .group(path)
        .ok_or_else(|| FieldIoError::MissingGroup(path.to_string()))?;
    let stored = lookup(group, FIELD)?;
    if stored.shape().len() != N {
        return Err(FieldIoError::DimensionMismatch {
            stored: stored.shape().len(),
            expected: N,
        });
    }
    check_len(FIELD, stored)?;
    let shape: [usize; N] = std::array::from_fn(|k| stored.shape()[k]);

    let mut axes = Vec::with_capacity(N);
    for (i, &field_len) in shape.iter().enumerate() {
        let name = axis_name(i);
        let axis = lookup(group, &name)?;
        check_len(&name, axis)?;
        if axis.len() != field_len {
            return Err(FieldIoError::AxisLengthMismatch {
                axis: i,
                axis_len: axis.len(),
                field_len,
            });
        }
        axes.push(axis.read::<C>().ok_or(FieldIoError::Cast(name))?);
    }
    let values = stored
        .read::<Q>()
        .ok_or_else(|| FieldIoError::Cast(FIELD.to_string()))?;

    let mut field = Field::<Q, N, C>::default();
    field.reset(shape);
    for (i, values) in axes.into_iter().enumerate() {
        field
            .axis(i)
            .with_values_mut(|mut axis| axis.iter_mut().zip(values).for_each(|(a, v)| *a = v));
    }
    field
        .data_mut()
        .iter_mut()
        .zip(values)
        .for_each(|(x, v)| *x = v);
    debug!(path, ?shape, "field read");
    Ok(field)
}

fn lookup<'a>(group: &'a Group, name: &str) -> Result<&'a Dataset, FieldIoError> {
    group
        .dataset(name)
        .ok_or_else(|| FieldIoError::MissingDataset(name.to_string()))
}

fn check_len(name: &str, dataset: &Dataset) -> Result<(), FieldIoError> {
    let expected: usize = dataset.shape().iter().product();
    if dataset.len() != expected {
        return Err(FieldIoError::CorruptDataset {
            name: name.to_string(),
            shape: dataset.shape().to_vec(),
            len: dataset.len(),
            expected,
        });
    }
    Ok(())
}

/// Writes `field` into a new container file holding only that field under `path`.
pub fn write_field_file<S, Q, C, const N: usize>(
    file: impl AsRef<Path>,
    path: &str,
    field: &FieldBase<S, C, N>,
) -> Result<()>
where
    S: Data<Elem = Q>,
    Q: Element,
    C: Element,
    Shape<N>: Dimension,
{
    let mut root = Group::new();
    write_field(&mut root, path, field);
    root.save(file)
}

pub fn read_field_file<Q, C, const N: usize>(
    file: impl AsRef<Path>,
    path: &str,
) -> Result<Field<Q, N, C>>
where
    Q: Element,
    C: Element,
    Shape<N>: Dimension,
{
    let file = file.as_ref();
    let root = Group::load(file)?;
    let field = read_field(&root, path)
        .with_context(|| format!("There was an error reading field from '{}'", file.display()))?;
    Ok(field)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::discretize::{Geometric, Uniform};
    use approx::assert_relative_eq;

    fn sample() -> Field<f64, 2> {
        let mut f = Field::<f64, 2>::new([4, 3]);
        f.set_coordinate_system([Some(&Uniform::new(0., 3.)), Some(&Geometric::new(1., 0.1, 2.))]);
        f.set_from_coord(|[x, y]| x * 10. + y);
        f
    }

    fn temp_file(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("gridfield-{}-{}.ron", std::process::id(), name))
    }

    #[test]
    fn group_paths() {
        let mut root = Group::new();
        root.group_mut("a/b").insert_dataset("x", Dataset::new(vec![1], vec![1f32]));
        assert!(root.group("a").is_some());
        assert!(root.group("/a/b/").is_some());
        assert!(root.group("a/c").is_none());
        assert!(std::ptr::eq(root.group("").unwrap(), &root));
        assert_eq!(root.group("a/b").unwrap().dataset_names().collect::<Vec<_>>(), vec!["x"]);
        assert_eq!(root.group_names().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn layout() {
        let f = sample();
        let mut root = Group::new();
        write_field(&mut root, "", &f);
        let names: Vec<_> = root.dataset_names().collect();
        assert_eq!(names, vec!["axis 0", "axis 1", "field"]);
        assert_eq!(root.dataset("field").unwrap().shape(), &[4, 3]);
        assert_eq!(root.dataset("axis 1").unwrap().shape(), &[3]);
    }

    #[test]
    fn read_back() {
        let f = sample();
        let mut root = Group::new();
        write_field(&mut root, "run/temperature", &f);

        let g: Field<f64, 2> = read_field(&root, "run/temperature").unwrap();
        assert_eq!(g.coordinate_system(), f.coordinate_system());
        assert_eq!(g.data(), f.data());

        let h: Field<f32, 2> = read_field(&root, "run/temperature").unwrap();
        for (x, y) in h.data().iter().zip(f.data().iter()) {
            assert_relative_eq!(*x as f64, *y, epsilon = 1e-5);
        }
        assert_relative_eq!(h.axis(1).get(2), 1.3f32, epsilon = 1e-6);
    }

    #[test]
    fn rank_must_match() {
        let mut root = Group::new();
        write_field(&mut root, "", &sample());
        let err = read_field::<f64, f64, 3>(&root, "").unwrap_err();
        assert_eq!(err, FieldIoError::DimensionMismatch { stored: 2, expected: 3 });
        assert!(err.to_string().contains("2 dimensions"));
    }

    #[test]
    fn inconsistent_containers() {
        let mut root = Group::new();
        write_field(&mut root, "", &sample());
        root.insert_dataset("axis 1", Dataset::new(vec![2], vec![0f64, 1.]));
        assert_eq!(
            read_field::<f64, f64, 2>(&root, "").unwrap_err(),
            FieldIoError::AxisLengthMismatch {
                axis: 1,
                axis_len: 2,
                field_len: 3
            }
        );

        root.insert_dataset("field", Dataset::new(vec![4, 3], vec![0f64; 5]));
        assert!(matches!(
            read_field::<f64, f64, 2>(&root, "").unwrap_err(),
            FieldIoError::CorruptDataset { expected: 12, len: 5, .. }
        ));

        assert_eq!(
            read_field::<f64, f64, 2>(&root, "missing").unwrap_err(),
            FieldIoError::MissingGroup("missing".to_string())
        );
        assert_eq!(
            read_field::<f64, f64, 2>(&Group::new(), "").unwrap_err(),
            FieldIoError::MissingDataset("field".to_string())
        );
    }

    #[test]
    fn files() {
        let file = temp_file("container");
        let f = sample();
        write_field_file(&file, "t", &f).unwrap();
        let g: Field<f64, 2> = read_field_file(&file, "t").unwrap();
        assert_eq!(g.data(), f.data());

        let err = read_field_file::<f64, f64, 1>(&file, "t").unwrap_err();
        assert!(format!("{:#}", err).contains("There was an error reading field from"));
        fs::remove_file(&file).unwrap();

        assert!(read_field_file::<f64, f64, 1>(&file, "t").is_err());
    }
}
