use std::fmt;

use itertools::Itertools;
use ndarray::{Data, Dimension};

use super::FieldBase;
use crate::index::{from_pattern, Shape};

/// Gnuplot style text: one `coordinates.. value` row per element in row major order,
/// with a blank line for every index that wrapped around since the previous row.
/// A 2-d field therefore prints one block per outer index, a 3-d field separates
/// its outermost blocks with two blank lines.
impl<S, C, const N: usize> fmt::Display for FieldBase<S, C, N>
where
    S: Data,
    S::Elem: fmt::Display,
    C: fmt::Display + Clone,
    Shape<N>: Dimension,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let axes = self.cs.snapshot();
        let mut last: Option<[usize; N]> = None;
        for (pattern, value) in self.data.indexed_iter() {
            let idx = from_pattern::<N>(pattern);
            if let Some(last) = last {
                let wrapped = idx.iter().zip(last.iter()).filter(|(i, l)| i < l).count();
                for _ in 0..wrapped {
                    writeln!(f)?;
                }
            }
            let coords = idx.iter().enumerate().map(|(k, &i)| &axes[k][i]);
            writeln!(f, "{} {}", coords.format(" "), value)?;
            last = Some(idx);
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::discretize::Uniform;
    use crate::field::Field;

    #[test]
    fn one_dimensional() {
        let mut f = Field::<f64, 1>::new([3]);
        f.set_coordinate_system([Some(&Uniform::new(0., 10.))]);
        f.set_from_index(|[i], _| 2. * i as f64);
        assert_eq!(f.to_string(), "0 0\n5 2\n10 4\n");
    }

    #[test]
    fn two_dimensional() {
        let mut f = Field::<f64, 2>::new([3, 3]);
        f.set_coordinate_system([Some(&Uniform::new(0., 10.)), Some(&Uniform::new(-5., 5.))]);
        f.set_from_index(|[i, j], _| (2 * i * j) as f64);

        let expected = "\
0 -5 0
0 0 0
0 5 0

5 -5 0
5 0 2
5 5 4

10 -5 0
10 0 4
10 5 8
";
        assert_eq!(f.to_string(), expected);
    }

    #[test]
    fn three_dimensional() {
        let mut f = Field::<f64, 3>::new([3, 3, 3]);
        f.set_coordinate_system([
            Some(&Uniform::new(0., 10.)),
            Some(&Uniform::new(-5., 5.)),
            Some(&Uniform::new(10., 20.)),
        ]);
        f.set_from_index(|[i, j, k], _| (2 * i * j * k) as f64);

        let expected = "\
0 -5 10 0
0 -5 15 0
0 -5 20 0

0 0 10 0
0 0 15 0
0 0 20 0

0 5 10 0
0 5 15 0
0 5 20 0


5 -5 10 0
5 -5 15 0
5 -5 20 0

5 0 10 0
5 0 15 2
5 0 20 4

5 5 10 0
5 5 15 4
5 5 20 8


10 -5 10 0
10 -5 15 0
10 -5 20 0

10 0 10 0
10 0 15 4
10 0 20 8

10 5 10 0
10 5 15 8
10 5 20 16
";
        assert_eq!(f.to_string(), expected);
    }

    #[test]
    fn slices_print_their_own_axes() {
        let mut f = Field::<f64, 2>::new([3, 2]);
        f.set_coordinate_system([Some(&Uniform::new(0., 2.)), Some(&Uniform::new(0., 1.))]);
        f.set_from_coord(|[x, y]| x + 10. * y);
        let row = f.slice(ndarray::s![1, ..]);
        assert_eq!(row.to_string(), "0 1\n1 11\n");
    }
}
