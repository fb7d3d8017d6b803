use std::sync::Arc;

use approx::assert_relative_eq;
use gridfield::io::{read_field, write_field, Group};
use gridfield::{
    s, Axis, AxisSpec, Config, CoordinateSystem, Field, FieldView, Geometric, GridConfig, Uniform,
};

#[test]
fn temperature_and_pressure_share_a_grid() {
    let cs = Arc::new(CoordinateSystem::<f64, 2>::new([21, 11]));
    cs.set([Some(&Uniform::new(0., 2.)), Some(&Uniform::new(-1., 1.))]);

    let mut temperature = Field::<f64, 2>::with_coordinate_system(Arc::clone(&cs));
    let mut pressure = Field::<f64, 2>::with_coordinate_system(Arc::clone(&cs));
    temperature.set_from_coord(|[x, y]| 300. + 10. * x * y);
    pressure.set_from_index(|[i, j], cs| cs.coord([i, j])[0] + 1.);

    let idx = temperature.nearest([1.02, 0.55]);
    assert_eq!(idx, [10, 8]);
    assert_relative_eq!(temperature[idx], 306., epsilon = 1e-9);
    assert_relative_eq!(pressure[idx], 2., epsilon = 1e-9);

    // rescaling the shared x axis moves both fields
    cs.set([Some(&Uniform::new(0., 4.)), None]);
    assert_relative_eq!(pressure.coord(idx)[0], 2., epsilon = 1e-9);
    assert_relative_eq!(temperature.coord(idx)[1], 0.6, epsilon = 1e-9);
}

#[test]
fn mixed_axis_sharing() {
    let x = Axis::<f64>::new(5);
    let a = CoordinateSystem::<f64, 2>::from_specs([AxisSpec::Shared(x.clone()), AxisSpec::Size(3)]);
    let b = CoordinateSystem::<f64, 1>::from_specs([AxisSpec::Shared(x)]);
    a.set([Some(&Geometric::new(1., 0.1, 2.)), None]);
    assert_relative_eq!(b[0].get(4), 2.5, epsilon = 1e-12);
    assert_eq!(a[1].to_vec(), vec![0.; 3]);
}

#[test]
fn slice_then_combine() {
    let mut f = Field::<f64, 3>::new([4, 5, 6]);
    f.set_coordinate_system([
        Some(&Uniform::new(0., 3.)),
        Some(&Uniform::new(0., 4.)),
        Some(&Uniform::new(0., 5.)),
    ]);
    f.set_from_coord(|[x, y, z]| x + 10. * y + 100. * z);

    let plane: FieldView<f64, 2> = f.slice(s![1, .., ..;2]);
    assert_eq!(plane.shape(), [5, 3]);
    assert_eq!(plane.axis(1).to_vec(), vec![0., 2., 4.]);

    let mut g = Field::<f64, 2>::new([5, 3]);
    g += &plane;
    g -= 1.;
    assert_relative_eq!(g[[2, 1]], 20. + 200., epsilon = 1e-9);
    assert_relative_eq!(g[[4, 2]], 40. + 400., epsilon = 1e-9);
}

#[test]
fn configured_grid_survives_storage() {
    let mut config = GridConfig::default();
    config
        .load_config(
            "(axes: [
                (size: 6, discretizer: Uniform(min: 0.0, max: 1.0)),
                (size: 4, discretizer: Geometric(min: 0.0, dx: 0.5, stretch: 1.5)),
            ])",
        )
        .unwrap();
    let mut f: Field<f64, 2> = config.field().unwrap();
    f.set_from_coord(|[x, y]| x * y);

    let mut root = Group::new();
    write_field(&mut root, "fields/product", &f);
    let g: Field<f64, 2> = read_field(&root, "fields/product").unwrap();
    assert_eq!(g.coordinate_system(), f.coordinate_system());
    assert_eq!(g.data(), f.data());
    assert_eq!(g.to_string(), f.to_string());
}
