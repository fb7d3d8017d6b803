//! Range discretizers compute the `i`-th of `n` coordinate values over some range.
//! They are used to populate axes, see [`crate::CoordinateSystem::set`].
//!
//! Any `Fn(usize, usize) -> C` is a discretizer as well.
use num::{Float, NumCast};

pub trait Discretizer<C> {
    fn coordinate(&self, i: usize, n: usize) -> C;
}

impl<C, F> Discretizer<C> for F
where
    F: Fn(usize, usize) -> C,
{
    #[inline]
    fn coordinate(&self, i: usize, n: usize) -> C {
        self(i, n)
    }
}

#[inline]
fn from_usize<C: Float>(i: usize) -> C {
    <C as NumCast>::from(i).unwrap_or_else(C::nan)
}

/// Sum of the geometric series `dx * (1 + s + .. + s^(i-1))`.
#[inline]
fn geometric_offset<C: Float>(dx: C, stretch: C, i: usize) -> C {
    if stretch == C::one() {
        return dx * from_usize(i);
    }
    dx * (C::one() - stretch.powf(from_usize(i))) / (C::one() - stretch)
}

/// `n` evenly spaced points covering `[min, max]`, both ends included.
///
/// A single point axis gets `min`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uniform<C> {
    pub min: C,
    pub max: C,
}

impl<C> Uniform<C> {
    pub fn new(min: C, max: C) -> Self {
        Uniform { min, max }
    }
}

impl<C: Float> Discretizer<C> for Uniform<C> {
    #[inline]
    fn coordinate(&self, i: usize, n: usize) -> C {
        if n <= 1 {
            return self.min;
        }
        self.min + from_usize::<C>(i) * (self.max - self.min) / from_usize(n - 1)
    }
}

/// Spacing starts at `dx` and is multiplied by `stretch` on every step:
///
/// x[0] = min
/// x[1] = min + dx
/// x[2] = min + dx + s*dx
/// x[i] = min + dx * (1 - s^i) / (1 - s)
///
/// Indices past the end are clamped to the last point. A stretch of exactly one
/// degenerates to uniform spacing `dx`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometric<C> {
    pub min: C,
    pub dx: C,
    pub stretch: C,
}

impl<C> Geometric<C> {
    pub fn new(min: C, dx: C, stretch: C) -> Self {
        Geometric { min, dx, stretch }
    }
}

impl<C: Float> Discretizer<C> for Geometric<C> {
    #[inline]
    fn coordinate(&self, i: usize, n: usize) -> C {
        let i = i.min(n.saturating_sub(1));
        self.min + geometric_offset(self.dx, self.stretch, i)
    }
}

/// A geometric spacing that starts over every `period`.
///
/// The number of geometric steps per period is the smallest count whose series
/// reaches `period`. Point `i` sits `i / steps` whole periods past `min`, plus
/// the geometric offset of `i % steps` steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometricWithPeriod<C> {
    pub min: C,
    pub dx: C,
    pub stretch: C,
    pub period: C,
    steps: usize,
}

impl<C: Float> GeometricWithPeriod<C> {
    pub fn new(min: C, dx: C, stretch: C, period: C) -> Self {
        let steps = if stretch == C::one() {
            (period / dx).ceil()
        } else {
            ((C::one() + period * (stretch - C::one()) / dx).ln() / stretch.ln()).ceil()
        };
        let steps = steps.to_usize().unwrap_or(1).max(1);
        GeometricWithPeriod {
            min,
            dx,
            stretch,
            period,
            steps,
        }
    }

    /// Points per period.
    pub fn steps(&self) -> usize {
        self.steps
    }
}

impl<C: Float> Discretizer<C> for GeometricWithPeriod<C> {
    #[inline]
    fn coordinate(&self, i: usize, n: usize) -> C {
        let i = i.min(n.saturating_sub(1));
        let periods = from_usize::<C>(i / self.steps);
        self.min + self.period * periods + geometric_offset(self.dx, self.stretch, i % self.steps)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn uniform() {
        let range = Uniform::new(1., 11.);
        assert_relative_eq!(range.coordinate(0, 11), 1.);
        assert_relative_eq!(range.coordinate(1, 11), 2.);
        assert_relative_eq!(range.coordinate(9, 11), 10.);
        assert_relative_eq!(range.coordinate(10, 11), 11.);

        // evenly spaced, ends included
        let range = Uniform::new(-2.5f32, 4.0);
        let n = 14;
        let step = range.coordinate(1, n) - range.coordinate(0, n);
        for i in 1..n {
            let d = range.coordinate(i, n) - range.coordinate(i - 1, n);
            assert_relative_eq!(d, step, epsilon = 1e-5);
        }
        assert_relative_eq!(range.coordinate(n - 1, n), 4.0);
    }

    #[test]
    fn uniform_single_point() {
        let range = Uniform::new(3., 8.);
        assert_eq!(range.coordinate(0, 1), 3.);
        assert_eq!(range.coordinate(0, 0), 3.);
    }

    #[test]
    fn geometric() {
        let range = Geometric::new(1., 0.1, 2.);
        assert_relative_eq!(range.coordinate(0, 5), 1.);
        assert_relative_eq!(range.coordinate(1, 5), 1.1);
        assert_relative_eq!(range.coordinate(2, 5), 1.3);
        assert_relative_eq!(range.coordinate(3, 5), 1.7);
        assert_relative_eq!(range.coordinate(4, 5), 2.5);
        // clamped past the end
        assert_relative_eq!(range.coordinate(7, 5), 2.5);

        let range = Geometric::new(-1., 0.5, 1.3);
        let x: Vec<f64> = (0..8).map(|i| range.coordinate(i, 8)).collect();
        for i in 1..7 {
            assert_relative_eq!(x[i + 1] - x[i], 1.3 * (x[i] - x[i - 1]), epsilon = 1e-12);
        }
    }

    #[test]
    fn geometric_unit_stretch() {
        let range = Geometric::new(2., 0.25, 1.);
        assert_relative_eq!(range.coordinate(4, 10), 3.);
    }

    #[test]
    fn geometric_with_period() {
        let range = GeometricWithPeriod::new(1., 0.1, 2., 1.);
        assert_eq!(range.steps(), 4);
        let expected = [1., 1.1, 1.3, 1.7, 2.0, 2.1, 2.3, 2.7, 3.0];
        for (i, x) in expected.iter().enumerate() {
            assert_relative_eq!(range.coordinate(i, 10), *x, epsilon = 1e-12);
        }
    }

    #[test]
    fn closures_are_discretizers() {
        let d = |i: usize, n: usize| (i * n) as f64;
        assert_eq!(Discretizer::coordinate(&d, 3, 4), 12.);
    }
}
