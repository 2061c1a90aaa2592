//! Tests for time axes, coordinate system assembly and coordinate system subsetting.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use grid_common::attributes::names;
use grid_common::Attributes;
use grid_coords::{
    AxisType, DependenceType, GridAxis, GridAxis1D, GridAxis1DTime, GridCoordinateSystem,
    GridError, GridSubset, IndexRange, Spacing,
};
use ndarray::{arr1, Array2};
use test_utils::fixtures::time::{FORECAST_HOURS, HOURS_SINCE_REFERENCE};
use test_utils::{assert_approx_eq, create_eta_series, create_index_field, init_tracing};
use vertical_transform::{
    InMemoryDataset, TransformRegistry, VerticalTransform, VerticalTransformBuilder,
};

const NT: usize = 3;
const NZ: usize = 5;
const NY: usize = 4;
const NX: usize = 6;

fn regular(name: &str, axis_type: AxisType, n: usize, start: f64, res: f64) -> GridAxis1D {
    GridAxis1D::builder()
        .set_name(name)
        .set_axis_type(axis_type)
        .set_spacing(Spacing::RegularPoint)
        .set_regular(n, start, start + (n - 1) as f64 * res, res)
        .build()
        .unwrap()
}

fn time_axis(name: &str, axis_type: AxisType, hours: &[f64]) -> GridAxis1DTime {
    let axis = GridAxis1D::builder()
        .set_name(name)
        .set_axis_type(axis_type)
        .set_units(HOURS_SINCE_REFERENCE)
        .set_spacing(Spacing::IrregularPoint)
        .set_values(hours.to_vec())
        .build()
        .unwrap();
    GridAxis1DTime::from_axis(axis).unwrap()
}

fn sigma_axis() -> GridAxis1D {
    GridAxis1D::builder()
        .set_name("sigma")
        .set_axis_type(AxisType::GeoZ)
        .set_spacing(Spacing::IrregularPoint)
        .set_values(vec![-1.0, -0.75, -0.5, -0.25, 0.0])
        .build()
        .unwrap()
}

fn ocean_sigma_transform() -> Arc<dyn VerticalTransform> {
    let dataset = InMemoryDataset::builder()
        .add("sigma", &["sigma"], None, arr1(&[-1.0, -0.75, -0.5, -0.25, 0.0]).into_dyn())
        .unwrap()
        .add("depth", &["y", "x"], Some("m"), (create_index_field(NY, NX) + 10.0).into_dyn())
        .unwrap()
        .add("zeta", &["time", "y", "x"], Some("m"), create_eta_series(NT, NY, NX, 0.5).into_dyn())
        .unwrap()
        .build();
    let attributes = Attributes::new()
        .with(names::STANDARD_NAME, "ocean_sigma_coordinate")
        .with(names::FORMULA_TERMS, "sigma: sigma eta: zeta depth: depth");
    VerticalTransformBuilder::new()
        .set_name("sigma")
        .set_attributes(attributes)
        .build(Arc::new(dataset), &TransformRegistry::default())
        .unwrap()
}

fn ocean_cs() -> GridCoordinateSystem {
    GridCoordinateSystem::builder()
        .set_name("ocean")
        .add_axis(time_axis("time", AxisType::Time, &[0.0, 6.0, 12.0]))
        .add_axis(sigma_axis())
        .add_axis(regular("y", AxisType::GeoY, NY, 0.0, 1000.0))
        .add_axis(regular("x", AxisType::GeoX, NX, 0.0, 1000.0))
        .set_vertical_transform(ocean_sigma_transform())
        .build()
        .unwrap()
}

// ============================================================================
// Time axis
// ============================================================================

#[test]
fn test_time_axis_dates() {
    let time = time_axis("time", AxisType::Time, &FORECAST_HOURS);
    assert_eq!(
        time.midpoint_date(3).unwrap(),
        Utc.with_ymd_and_hms(2024, 1, 15, 18, 0, 0).unwrap()
    );
    let date = Utc.with_ymd_and_hms(2024, 1, 16, 12, 0, 0).unwrap();
    assert_approx_eq!(time.offset_of(&date), 24.0, 1e-9);
    assert_eq!(time.date_of(48.0), Utc.with_ymd_and_hms(2024, 1, 17, 12, 0, 0).unwrap());
    assert!(time.edge2_date(FORECAST_HOURS.len()).is_err());
}

#[test]
fn test_time_axis_subset_by_date() {
    let time = time_axis("time", AxisType::Time, &FORECAST_HOURS);
    let date = Utc.with_ymd_and_hms(2024, 1, 16, 1, 0, 0).unwrap();
    let sub = time.subset(&GridSubset::new().set_time(date)).unwrap();
    assert_eq!(sub.ncoords(), 1);
    assert_eq!(
        sub.midpoint_date(0).unwrap(),
        Utc.with_ymd_and_hms(2024, 1, 16, 0, 0, 0).unwrap()
    );
    assert_eq!(sub.date_unit(), time.date_unit());
}

#[test]
fn test_time_axis_subset_latest() {
    let time = time_axis("time", AxisType::Time, &FORECAST_HOURS);
    let sub = time.subset(&GridSubset::new().set_time_latest(true)).unwrap();
    assert_eq!(sub.axis().midpoint(0).unwrap(), 120.0);
    assert_eq!(sub.axis().range().first(), FORECAST_HOURS.len() - 1);

    // The run time parameters do not apply to a Time axis.
    let same = time.subset(&GridSubset::new().set_run_time_latest(true)).unwrap();
    assert_eq!(same, time);
}

#[test]
fn test_run_time_axis_subset() {
    let runtime = time_axis("reftime", AxisType::RunTime, &[-24.0, -12.0, 0.0]);
    let date = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
    let sub = runtime.subset(&GridSubset::new().set_run_time(date)).unwrap();
    assert_eq!(sub.axis().midpoint(0).unwrap(), -12.0);

    let latest = runtime
        .subset(&GridSubset::new().set_run_time_latest(true))
        .unwrap();
    assert_eq!(latest.axis().midpoint(0).unwrap(), 0.0);
}

#[test]
fn test_time_offset_axis_follows_offset_rules() {
    let offsets = time_axis("offset", AxisType::TimeOffset, &[0.0, 3.0, 6.0]);
    let sub = offsets.subset(&GridSubset::new().set_time_offset(4.0)).unwrap();
    assert_eq!(sub.axis().midpoint(0).unwrap(), 3.0);
}

// ============================================================================
// Building
// ============================================================================

#[test]
fn test_role_getters() {
    let cs = ocean_cs();
    assert_eq!(cs.name(), "ocean");
    assert_eq!(cs.grid_axes().len(), 4);
    assert_eq!(cs.time_axis().unwrap().name(), "time");
    assert_eq!(cs.vertical_axis().unwrap().name(), "sigma");
    assert_eq!(cs.x_horiz_axis().unwrap().name(), "x");
    assert_eq!(cs.y_horiz_axis().unwrap().name(), "y");
    assert_eq!(cs.horiz_coord_system().unwrap().shape(), [NY, NX]);
    assert!(cs.ensemble_axis().is_none());
    assert!(cs.run_time_axis().is_none());
    assert!(cs.time_offset_axis().is_none());
    assert_eq!(cs.vertical_transform().unwrap().name(), "sigma");
    assert!(cs.find_axis("sigma").is_some());
    assert!(cs.find_axis("lat").is_none());
}

#[test]
fn test_nominal_shape_and_summary() {
    let cs = ocean_cs();
    assert_eq!(cs.nominal_shape(), vec![NT, NZ, NY, NX]);
    assert_eq!(cs.show_fn_summary(), "GRID(T,Z,Y,X)");
    let shown = cs.show(false);
    assert!(shown.starts_with("ocean GRID(T,Z,Y,X)"), "{}", shown);
    assert!(shown.contains("vertical transform: sigma (OceanSigma)"), "{}", shown);
}

#[test]
fn test_scalar_and_dependent_axes_left_out_of_shape() {
    init_tracing();
    let height = GridAxis1D::builder()
        .set_name("height_2m")
        .set_axis_type(AxisType::Height)
        .set_dependence_type(DependenceType::Scalar)
        .set_spacing(Spacing::IrregularPoint)
        .set_values(vec![2.0])
        .build()
        .unwrap();
    let valid = GridAxis1D::builder()
        .set_name("valid")
        .set_dependence_type(DependenceType::Dependent)
        .set_depends_on(["time"])
        .set_spacing(Spacing::IrregularPoint)
        .set_values(vec![6.0, 12.0, 18.0])
        .build()
        .unwrap();
    let cs = GridCoordinateSystem::builder()
        .add_axis(time_axis("time", AxisType::Time, &[0.0, 6.0, 12.0]))
        .add_axis(valid)
        .add_axis(height)
        .add_axis(regular("lat", AxisType::Lat, 3, 10.0, 1.0))
        .add_axis(regular("lon", AxisType::Lon, 4, 20.0, 1.0))
        .build()
        .unwrap();

    assert_eq!(cs.nominal_shape(), vec![3, 3, 4]);
    assert_eq!(cs.show_fn_summary(), "GRID(T,Y,X)");
    assert_eq!(cs.vertical_axis().unwrap().name(), "height_2m");
    assert!(cs.horiz_coord_system().unwrap().is_lat_lon());
    assert_eq!(cs.name(), "time height_2m lat lon");
}

#[test]
fn test_build_requires_horizontal_axes() {
    let result = GridCoordinateSystem::builder()
        .add_axis(regular("x", AxisType::GeoX, 4, 0.0, 1.0))
        .add_axis(sigma_axis())
        .build();
    assert!(matches!(result, Err(GridError::InvalidArgument(_))));
}

#[test]
fn test_build_rejects_two_axes_with_one_role() {
    let result = GridCoordinateSystem::builder()
        .add_axis(regular("x", AxisType::GeoX, 4, 0.0, 1.0))
        .add_axis(regular("lon", AxisType::Lon, 4, 0.0, 1.0))
        .add_axis(regular("y", AxisType::GeoY, 4, 0.0, 1.0))
        .build();
    assert!(matches!(result, Err(GridError::InvalidArgument(ref msg)) if msg.contains("role")));
}

#[test]
fn test_build_rejects_duplicate_names_and_unknown_parents() {
    let result = GridCoordinateSystem::builder()
        .add_axis(regular("x", AxisType::GeoX, 4, 0.0, 1.0))
        .add_axis(regular("x", AxisType::GeoY, 4, 0.0, 1.0))
        .build();
    assert!(matches!(result, Err(GridError::InvalidArgument(_))));

    let orphan = GridAxis1D::builder()
        .set_name("valid")
        .set_dependence_type(DependenceType::Dependent)
        .set_depends_on(["time"])
        .set_spacing(Spacing::IrregularPoint)
        .set_values(vec![6.0])
        .build()
        .unwrap();
    let result = GridCoordinateSystem::builder()
        .add_axis(regular("x", AxisType::GeoX, 4, 0.0, 1.0))
        .add_axis(regular("y", AxisType::GeoY, 4, 0.0, 1.0))
        .add_axis(orphan)
        .build();
    assert!(matches!(result, Err(GridError::InvalidArgument(ref msg)) if msg.contains("unknown")));
}

#[test]
fn test_build_requires_dates_on_time_role() {
    let result = GridCoordinateSystem::builder()
        .add_axis(regular("time", AxisType::Time, 3, 0.0, 6.0))
        .add_axis(regular("x", AxisType::GeoX, 4, 0.0, 1.0))
        .add_axis(regular("y", AxisType::GeoY, 4, 0.0, 1.0))
        .build();
    assert!(matches!(result, Err(GridError::InvalidArgument(_))));
}

// ============================================================================
// Subsetting
// ============================================================================

#[test]
fn test_empty_subset_keeps_everything() {
    let cs = ocean_cs();
    let same = cs.subset(&GridSubset::new()).unwrap();
    assert_eq!(same.nominal_shape(), cs.nominal_shape());
    assert!(Arc::ptr_eq(
        same.vertical_transform().unwrap(),
        cs.vertical_transform().unwrap()
    ));
    assert!(!same.vertical_axis().unwrap().is_subset());
}

#[test]
fn test_subset_axes_and_transform() {
    init_tracing();
    let cs = ocean_cs();
    let full = cs.vertical_transform().unwrap().coordinate_array(1).unwrap();

    let params = GridSubset::new()
        .set_time(Utc.with_ymd_and_hms(2024, 1, 15, 17, 0, 0).unwrap())
        .set_horiz_ranges(IndexRange::new(1, 2).unwrap(), IndexRange::new(2, 4).unwrap());
    let sub = cs.subset(&params).unwrap();

    assert_eq!(sub.nominal_shape(), vec![1, NZ, 2, 3]);
    assert_eq!(sub.time_axis().unwrap().axis().midpoint(0).unwrap(), 6.0);
    assert_eq!(sub.x_horiz_axis().unwrap().start_value(), 2000.0);
    assert_eq!(sub.y_horiz_axis().unwrap().range().to_string(), "GeoY=1:2");

    let vt = sub.vertical_transform().unwrap();
    assert_eq!(vt.shape(), [NZ, 2, 3]);
    assert_eq!(vt.num_times(), Some(1));
    let arr = vt.coordinate_array(0).unwrap();
    for k in 0..NZ {
        for j in 0..2 {
            for i in 0..3 {
                assert_eq!(arr[[k, j, i]], full[[k, j + 1, i + 2]]);
            }
        }
    }
}

#[test]
fn test_subset_vertical_level_restricts_transform() {
    let cs = ocean_cs();
    let full = cs.vertical_transform().unwrap().coordinate_array(0).unwrap();
    let sub = cs.subset(&GridSubset::new().set_vert_point(-0.3)).unwrap();

    assert_eq!(sub.vertical_axis().unwrap().midpoint(0).unwrap(), -0.25);
    let vt = sub.vertical_transform().unwrap();
    assert_eq!(vt.shape(), [1, NY, NX]);
    let arr = vt.coordinate_array(0).unwrap();
    let expected: Array2<f64> = full.index_axis(ndarray::Axis(0), 3).to_owned();
    assert_eq!(arr.index_axis(ndarray::Axis(0), 0), expected);
}

#[test]
fn test_subset_dependent_axis_follows_time() {
    let valid = GridAxis1D::builder()
        .set_name("valid")
        .set_dependence_type(DependenceType::Dependent)
        .set_depends_on(["time"])
        .set_spacing(Spacing::IrregularPoint)
        .set_values(vec![106.0, 112.0, 118.0])
        .build()
        .unwrap();
    let cs = GridCoordinateSystem::builder()
        .add_axis(time_axis("time", AxisType::Time, &[0.0, 6.0, 12.0]))
        .add_axis(valid)
        .add_axis(regular("y", AxisType::GeoY, 2, 0.0, 1.0))
        .add_axis(regular("x", AxisType::GeoX, 2, 0.0, 1.0))
        .build()
        .unwrap();

    let sub = cs.subset(&GridSubset::new().set_time_latest(true)).unwrap();
    match sub.find_axis("valid").unwrap() {
        GridAxis::Axis1D(axis) => assert_eq!(axis.values().unwrap(), vec![118.0]),
        other => panic!("unexpected axis {:?}", other),
    }
}

#[test]
fn test_subset_horizontal_out_of_range() {
    let cs = ocean_cs();
    let params = GridSubset::new()
        .set_horiz_ranges(IndexRange::new(0, NY).unwrap(), IndexRange::new(0, 1).unwrap());
    assert!(matches!(cs.subset(&params), Err(GridError::InvalidRange(_))));
}
