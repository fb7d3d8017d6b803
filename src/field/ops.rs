use std::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

use ndarray::{Data, DataMut, Dimension, Zip};

use super::FieldBase;
use crate::index::Shape;

impl<Q, S, C, const N: usize> FieldBase<S, C, N>
where
    S: DataMut<Elem = Q>,
    Q: Copy + Send + Sync,
    Shape<N>: Dimension,
{
    /// Applies `op` to every element.
    fn apply_scalar(&mut self, op: impl Fn(&mut Q) + Sync + Send) {
        Zip::from(&mut self.data).par_for_each(op);
    }

    /// Combines two fields position by position in row major order. The ranks and
    /// axes may differ, the element counts may not.
    fn apply_field<S2, C2, const M: usize>(
        &mut self,
        rhs: &FieldBase<S2, C2, M>,
        op: impl Fn(&mut Q, Q) + Sync + Send,
    ) where
        S2: Data<Elem = Q>,
        Shape<M>: Dimension,
    {
        assert_eq!(
            self.len(),
            rhs.len(),
            "elementwise arithmetic needs fields of the same size"
        );
        if self.data.shape() == rhs.data.shape() {
            Zip::from(self.data.view_mut().into_dyn())
                .and(rhs.data.view().into_dyn())
                .par_for_each(|x, &y| op(x, y));
        } else {
            self.data
                .iter_mut()
                .zip(rhs.data.iter())
                .for_each(|(x, &y)| op(x, y));
        }
    }
}

macro_rules! impl_field_assign_op {
    ($trait:ident, $method:ident, $op:tt; $($scalar:ty),+) => {
        $(
            impl<S, C, const N: usize> $trait<$scalar> for FieldBase<S, C, N>
            where
                S: DataMut<Elem = $scalar>,
                Shape<N>: Dimension,
            {
                /// Broadcasts the scalar over every element.
                fn $method(&mut self, rhs: $scalar) {
                    self.apply_scalar(|x| *x $op rhs);
                }
            }
        )+

        impl<'a, Q, S, S2, C, C2, const N: usize, const M: usize> $trait<&'a FieldBase<S2, C2, M>>
            for FieldBase<S, C, N>
        where
            S: DataMut<Elem = Q>,
            S2: Data<Elem = Q>,
            Q: Copy + Send + Sync + $trait,
            Shape<N>: Dimension,
            Shape<M>: Dimension,
        {
            /// Panics unless both fields hold the same number of elements.
            fn $method(&mut self, rhs: &'a FieldBase<S2, C2, M>) {
                self.apply_field(rhs, |x, y| *x $op y);
            }
        }
    };
}

impl_field_assign_op!(AddAssign, add_assign, +=; f32, f64, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
impl_field_assign_op!(SubAssign, sub_assign, -=; f32, f64, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
impl_field_assign_op!(MulAssign, mul_assign, *=; f32, f64, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
impl_field_assign_op!(DivAssign, div_assign, /=; f32, f64, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

#[cfg(test)]
mod test {
    use crate::field::Field;
    use approx::assert_relative_eq;
    use ndarray::s;

    fn all_equal(f: &Field<f64, 2>, v: f64) {
        for i in 0..2 {
            for j in 0..3 {
                assert_relative_eq!(f[[i, j]], v);
            }
        }
    }

    #[test]
    fn scalar_and_field_operators() {
        let mut t = Field::<f64, 2>::new([2, 3]);

        t.set(1.);
        all_equal(&t, 1.);
        t += 2.;
        all_equal(&t, 3.);
        t -= 1.;
        all_equal(&t, 2.);
        t *= 3.;
        all_equal(&t, 6.);
        t /= 2.;
        all_equal(&t, 3.);

        let mut u = t.clone();
        all_equal(&u, 3.);
        u += &t;
        all_equal(&u, 6.);
        all_equal(&t, 3.);
        u *= &t;
        all_equal(&u, 18.);
        u -= &t;
        all_equal(&u, 15.);
        u /= &t;
        all_equal(&u, 5.);
        all_equal(&t, 3.);
    }

    #[test]
    fn inverse_operations_restore() {
        let mut a = Field::<f64, 2>::new([4, 5]);
        a.set_from_index(|[i, j], _| (i * 5 + j) as f64 + 0.5);
        let mut b = Field::<f64, 2>::new([4, 5]);
        b.set_from_index(|[i, j], _| 1. + (i + j) as f64);
        let before = a.clone();

        a += &b;
        a -= &b;
        a *= &b;
        a /= &b;
        for (x, y) in a.data().iter().zip(before.data().iter()) {
            assert_relative_eq!(x, y, epsilon = 1e-12);
        }
    }

    #[test]
    fn combines_by_flat_position() {
        let mut a = Field::<i32, 2, f64>::new([2, 3]);
        let mut b = Field::<i32, 1, f64>::new([6]);
        b.set_from_index(|[i], _| i as i32);
        a += &b;
        assert_eq!(a[[0, 2]], 2);
        assert_eq!(a[[1, 0]], 3);
        assert_eq!(a[[1, 2]], 5);
    }

    #[test]
    fn operators_on_views() {
        let mut a = Field::<f64, 2>::new([3, 3]);
        let mut b = Field::<f64, 1>::new([3]);
        b.set(2.);
        {
            let mut col = a.slice_mut(s![.., 1]);
            col += 1.;
            col *= &b;
        }
        assert_eq!(a[[0, 1]], 2.);
        assert_eq!(a[[2, 1]], 2.);
        assert_eq!(a[[2, 2]], 0.);
    }

    #[test]
    #[should_panic]
    fn mismatched_sizes() {
        let mut a = Field::<f64, 1>::new([3]);
        let b = Field::<f64, 1>::new([4]);
        a += &b;
    }
}
