//! Two column text files for one dimensional fields, as gnuplot reads and writes them.
use std::fmt::Display;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use ndarray::{Array1, Data};
use tracing::debug;

use super::error::FieldIoError;
use crate::axis::Axis;
use crate::coordinate_system::CoordinateSystem;
use crate::field::{Field, FieldBase};

/// Writes one `coordinate value` line per element.
pub fn write_ascii<S, Q, C>(path: impl AsRef<Path>, field: &FieldBase<S, C, 1>) -> Result<()>
where
    S: Data<Elem = Q>,
    Q: Display,
    C: Display + Clone,
{
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    let axis = field.axis(0).to_vec();
    for (x, v) in axis.iter().zip(field.data().iter()) {
        writeln!(out, "{} {}", x, v)?;
    }
    out.flush()?;
    debug!(path = %path.display(), len = field.len(), "ascii field written");
    Ok(())
}

/// Reads a field from the first two columns of a whitespace separated file. Blank
/// lines and lines starting with `#` are skipped, extra columns are ignored.
pub fn read_ascii<Q, C>(path: impl AsRef<Path>) -> Result<Field<Q, 1, C>>
where
    Q: FromStr + Clone,
    C: FromStr,
{
    let path = path.as_ref();
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let (coords, values) = parse_columns::<Q, C>(&text)
        .with_context(|| format!("There was an error reading field from '{}'", path.display()))?;
    debug!(path = %path.display(), len = values.len(), "ascii field read");
    let cs = CoordinateSystem::from_axes([Axis::from_vec(coords)]);
    Ok(Field::from_parts(&cs, &Array1::from_vec(values)))
}

fn parse_columns<Q: FromStr, C: FromStr>(text: &str) -> Result<(Vec<C>, Vec<Q>), FieldIoError> {
    let mut coords = Vec::new();
    let mut values = Vec::new();
    for (n, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 2 {
            return Err(FieldIoError::MissingColumn {
                line: n + 1,
                found: tokens.len(),
            });
        }
        let parse_error = |token: &str| FieldIoError::Parse {
            line: n + 1,
            token: token.to_string(),
        };
        coords.push(tokens[0].parse().map_err(|_| parse_error(tokens[0]))?);
        values.push(tokens[1].parse().map_err(|_| parse_error(tokens[1]))?);
    }
    Ok((coords, values))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::discretize::Uniform;

    #[test]
    fn parsing() {
        let text = "# x f\n0 1\n\n  0.5 2 extra\n1 4\n";
        let (x, f) = parse_columns::<f64, f64>(text).unwrap();
        assert_eq!(x, vec![0., 0.5, 1.]);
        assert_eq!(f, vec![1., 2., 4.]);

        assert_eq!(
            parse_columns::<f64, f64>("0 1\n2\n").unwrap_err(),
            FieldIoError::MissingColumn { line: 2, found: 1 }
        );
        assert_eq!(
            parse_columns::<f64, f64>("0 x\n").unwrap_err(),
            FieldIoError::Parse {
                line: 1,
                token: "x".to_string()
            }
        );
    }

    #[test]
    fn file_round_trip() {
        let path = std::env::temp_dir().join(format!("gridfield-{}-ascii.txt", std::process::id()));
        let mut f = Field::<f64, 1>::new([5]);
        f.set_coordinate_system([Some(&Uniform::new(0., 2.))]);
        f.set_from_coord(|[x]| x * x);
        write_ascii(&path, &f).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), f.to_string());

        let g: Field<f64, 1> = read_ascii(&path).unwrap();
        assert_eq!(g.coordinate_system(), f.coordinate_system());
        assert_eq!(g.data(), f.data());
        fs::remove_file(&path).unwrap();
    }
}
