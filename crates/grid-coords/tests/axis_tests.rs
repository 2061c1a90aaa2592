//! Tests for 1D axis coordinate algebra, the builder and axis subsetting.

use grid_coords::{
    AxisType, Coord, CoordInterval, DependenceType, GridAxis1D, GridError, GridSubset, IndexRange,
    MinMax, Spacing,
};
use test_utils::fixtures::axis::{
    CONTIGUOUS_EDGES, DISCONTIGUOUS_BOUNDS, IRREGULAR_POINTS, PRESSURE_LEVELS_HPA,
};
use test_utils::{assert_approx_eq, assert_slice_approx_eq};

fn regular_point(start: f64, res: f64, n: usize) -> GridAxis1D {
    GridAxis1D::builder()
        .set_name("x")
        .set_axis_type(AxisType::GeoX)
        .set_spacing(Spacing::RegularPoint)
        .set_regular(n, start, start + (n - 1) as f64 * res, res)
        .build()
        .unwrap()
}

fn regular_interval(start: f64, res: f64, n: usize) -> GridAxis1D {
    GridAxis1D::builder()
        .set_name("depth")
        .set_axis_type(AxisType::Height)
        .set_spacing(Spacing::RegularInterval)
        .set_regular(n, start, start + n as f64 * res, res)
        .build()
        .unwrap()
}

fn irregular(axis_type: AxisType, spacing: Spacing, values: &[f64]) -> GridAxis1D {
    GridAxis1D::builder()
        .set_name("z")
        .set_units("m")
        .set_axis_type(axis_type)
        .set_spacing(spacing)
        .set_values(values.to_vec())
        .build()
        .unwrap()
}

fn all_spacings() -> Vec<GridAxis1D> {
    vec![
        regular_point(10.0, -2.5, 6),
        regular_interval(0.0, 5.0, 6),
        irregular(AxisType::GeoZ, Spacing::IrregularPoint, &IRREGULAR_POINTS),
        irregular(AxisType::GeoZ, Spacing::ContiguousInterval, &CONTIGUOUS_EDGES),
        irregular(AxisType::GeoZ, Spacing::DiscontiguousInterval, &DISCONTIGUOUS_BOUNDS),
    ]
}

// ============================================================================
// Edges and midpoints
// ============================================================================

#[test]
fn test_regular_interval_cells_are_adjacent() {
    let axis = regular_interval(100.0, 12.5, 8);
    for i in 0..axis.ncoords() - 1 {
        assert_approx_eq!(axis.edge2(i).unwrap(), axis.edge1(i + 1).unwrap(), 1e-12);
    }
    for i in 0..axis.ncoords() {
        let mid = (axis.edge1(i).unwrap() + axis.edge2(i).unwrap()) / 2.0;
        assert_approx_eq!(axis.midpoint(i).unwrap(), mid, 1e-12);
    }
}

#[test]
fn test_midpoint_within_edges_for_all_spacings() {
    for axis in all_spacings() {
        for i in 0..axis.ncoords() {
            let cell = axis.coord_interval(i).unwrap().normalized();
            let mid = axis.midpoint(i).unwrap();
            assert!(
                cell.start <= mid && mid <= cell.end,
                "{} {}: {} outside {}",
                axis.spacing(),
                i,
                mid,
                cell
            );
        }
    }
}

#[test]
fn test_irregular_point_edges() {
    let axis = irregular(AxisType::GeoZ, Spacing::IrregularPoint, &IRREGULAR_POINTS);
    assert_eq!(axis.edge1(1).unwrap(), 1.5);
    assert_eq!(axis.edge2(1).unwrap(), 3.0);
    assert_eq!(axis.midpoint(1).unwrap(), 2.0);
    // End cells extend half a step outward.
    assert_eq!(axis.edge1(0).unwrap(), 0.5);
    assert_eq!(axis.edge2(3).unwrap(), 10.0);
}

#[test]
fn test_single_irregular_point_has_zero_width() {
    let axis = irregular(AxisType::Height, Spacing::IrregularPoint, &[2.0]);
    assert_eq!(axis.edge1(0).unwrap(), 2.0);
    assert_eq!(axis.edge2(0).unwrap(), 2.0);
    assert_eq!(axis.coord_interval(0).unwrap().width(), 0.0);
}

#[test]
fn test_contiguous_and_discontiguous_edges() {
    let contiguous = irregular(AxisType::GeoZ, Spacing::ContiguousInterval, &CONTIGUOUS_EDGES);
    assert_eq!(contiguous.ncoords(), 5);
    assert_eq!(contiguous.coord_interval(2).unwrap(), CoordInterval::new(3.0, 6.0));
    assert_eq!(contiguous.midpoint(4).unwrap(), 12.5);

    let discontiguous =
        irregular(AxisType::GeoZ, Spacing::DiscontiguousInterval, &DISCONTIGUOUS_BOUNDS);
    assert_eq!(discontiguous.ncoords(), 4);
    assert_eq!(discontiguous.coord_interval(1).unwrap(), CoordInterval::new(2.0, 4.0));
    assert_eq!(discontiguous.midpoint(3).unwrap(), 11.0);
}

#[test]
fn test_index_out_of_range() {
    for axis in all_spacings() {
        let n = axis.ncoords();
        assert!(matches!(
            axis.edge1(n),
            Err(GridError::IndexOutOfRange { index, len }) if index == n && len == n
        ));
        assert!(axis.edge2(n).is_err());
        assert!(axis.midpoint(n).is_err());
        assert!(axis.coord_interval(n + 5).is_err());
    }
}

// ============================================================================
// Direction, extent and exports
// ============================================================================

#[test]
fn test_regular_point_direction() {
    assert!(!regular_point(0.0, -1.0, 5).is_ascending());
    assert!(regular_point(0.0, 2.5, 5).is_ascending());
}

#[test]
fn test_irregular_direction() {
    let levels = irregular(AxisType::Pressure, Spacing::IrregularPoint, &PRESSURE_LEVELS_HPA);
    assert!(!levels.is_ascending());
    assert!(irregular(AxisType::GeoZ, Spacing::ContiguousInterval, &CONTIGUOUS_EDGES).is_ascending());
    assert!(
        irregular(AxisType::GeoZ, Spacing::DiscontiguousInterval, &DISCONTIGUOUS_BOUNDS)
            .is_ascending()
    );
}

#[test]
fn test_coord_edge_min_max() {
    let axis = regular_point(10.0, -2.5, 6);
    assert_eq!(axis.coord_edge_min_max(), MinMax::new(-3.75, 11.25));

    // Discontiguous bounds are scanned, not just the ends.
    let axis = irregular(
        AxisType::GeoZ,
        Spacing::DiscontiguousInterval,
        &[5.0, 6.0, -3.0, 0.0, 1.0, 2.0],
    );
    assert_eq!(axis.coord_edge_min_max(), MinMax::new(-3.0, 6.0));
}

#[test]
fn test_coords_and_bounds_arrays() {
    let axis = irregular(AxisType::GeoZ, Spacing::ContiguousInterval, &CONTIGUOUS_EDGES);
    let coords = axis.coords_as_array();
    assert_eq!(coords.shape(), &[5]);
    assert_slice_approx_eq!(coords.iter(), &[0.5, 2.0, 4.5, 8.0, 12.5], 1e-12);

    let bounds = axis.coord_bounds_as_array();
    assert_eq!(bounds.shape(), &[5, 2]);
    assert_eq!(bounds[[3, 0]], 6.0);
    assert_eq!(bounds[[3, 1]], 10.0);
}

#[test]
fn test_iter_yields_points_or_intervals() {
    let points = irregular(AxisType::GeoZ, Spacing::IrregularPoint, &IRREGULAR_POINTS);
    let coords: Vec<Coord> = points.iter().collect();
    assert_eq!(coords.len(), 4);
    assert_eq!(coords[2], Coord::Point(4.0));

    let cells = regular_interval(0.0, 5.0, 3);
    let coords: Vec<Coord> = (&cells).into_iter().collect();
    assert_eq!(coords[1], Coord::Interval(CoordInterval::new(5.0, 10.0)));
    assert_eq!(coords[1].midpoint(), 7.5);
    assert_eq!(cells.iter().len(), 3);
}

#[test]
fn test_values_are_copies() {
    let axis = irregular(AxisType::GeoZ, Spacing::IrregularPoint, &IRREGULAR_POINTS);
    let mut values = axis.values().unwrap();
    values[0] = -99.0;
    assert_eq!(axis.midpoint(0).unwrap(), 1.0);
    assert!(regular_point(0.0, 1.0, 3).values().is_none());
}

#[test]
fn test_summary_and_display() {
    let axis = irregular(AxisType::GeoZ, Spacing::IrregularPoint, &IRREGULAR_POINTS);
    let summary = axis.summary();
    assert!(summary.contains("npts=4"), "{}", summary);
    assert!(summary.contains("irregularPoint"), "{}", summary);
    assert!(summary.contains("GeoZ=0:3"), "{}", summary);
    let shown = axis.to_string();
    assert!(shown.contains("units: m"), "{}", shown);
    assert!(shown.contains("values: [1.0, 2.0, 4.0, 8.0]"), "{}", shown);
}

#[test]
fn test_axis_serialization() {
    let axis = irregular(AxisType::Pressure, Spacing::IrregularPoint, &[1000.0, 500.0]);
    let json = serde_json::to_value(&axis).unwrap();
    assert_eq!(json["spacing"], "irregularPoint");
    assert_eq!(json["axis_type"], "Pressure");
    assert_eq!(json["ncoords"], 2);
}

// ============================================================================
// Builder
// ============================================================================

#[test]
fn test_builder_validation() {
    let no_type = GridAxis1D::builder()
        .set_name("x")
        .set_spacing(Spacing::RegularPoint)
        .set_regular(3, 0.0, 2.0, 1.0)
        .build();
    assert!(matches!(no_type, Err(GridError::InvalidArgument(_))));

    let no_coords = GridAxis1D::builder()
        .set_name("x")
        .set_axis_type(AxisType::GeoX)
        .set_spacing(Spacing::RegularPoint)
        .build();
    assert!(matches!(no_coords, Err(GridError::InvalidArgument(_))));

    let wrong_len = GridAxis1D::builder()
        .set_name("z")
        .set_axis_type(AxisType::GeoZ)
        .set_spacing(Spacing::ContiguousInterval)
        .set_ncoords(3)
        .set_values(vec![0.0, 1.0, 2.0])
        .build();
    assert!(matches!(wrong_len, Err(GridError::ShapeMismatch { .. })));

    let dependent_without_parent = GridAxis1D::builder()
        .set_name("reftime")
        .set_dependence_type(DependenceType::Dependent)
        .set_spacing(Spacing::IrregularPoint)
        .set_values(vec![0.0])
        .build();
    assert!(matches!(dependent_without_parent, Err(GridError::InvalidArgument(_))));
}

#[test]
fn test_untyped_dependent_axis_allowed() {
    let axis = GridAxis1D::builder()
        .set_name("reftime")
        .set_dependence_type(DependenceType::Dependent)
        .set_depends_on(["time"])
        .set_spacing(Spacing::IrregularPoint)
        .set_values(vec![0.0, 6.0])
        .build()
        .unwrap();
    assert_eq!(axis.axis_type(), None);
    assert_eq!(axis.depends_on(), &["time".to_string()]);
}

#[test]
fn test_to_builder_leaves_original_untouched() {
    let first = irregular(AxisType::GeoZ, Spacing::IrregularPoint, &IRREGULAR_POINTS);
    let second = first
        .to_builder()
        .set_name("z2")
        .set_values(vec![3.0, 2.0, 1.0])
        .set_ncoords(3)
        .set_range(IndexRange::make(None, 3))
        .build()
        .unwrap();
    assert_eq!(second.name(), "z2");
    assert_eq!(second.ncoords(), 3);
    assert_eq!(first.name(), "z");
    assert_eq!(first.ncoords(), 4);
    assert_eq!(first.values().unwrap(), IRREGULAR_POINTS.to_vec());
    assert_eq!(first, first.to_builder().build().unwrap());
}

#[test]
fn test_range_must_match_ncoords() {
    let result = regular_point(0.0, 1.0, 4)
        .to_builder()
        .set_range(IndexRange::new(0, 9).unwrap())
        .build();
    assert!(matches!(result, Err(GridError::InvalidRange(_))));
}

// ============================================================================
// Subsetting by index
// ============================================================================

#[test]
fn test_contiguous_subset_keeps_boundary_edges() {
    let parent = irregular(AxisType::GeoZ, Spacing::ContiguousInterval, &CONTIGUOUS_EDGES);
    let range = IndexRange::new(1, 3).unwrap();
    let sub = parent.subset_by_index_range(&range).unwrap();

    assert_eq!(sub.ncoords(), 3);
    assert_eq!(sub.spacing(), Spacing::ContiguousInterval);
    assert_eq!(sub.values().unwrap().len(), 4);
    assert_eq!(sub.edge1(0).unwrap(), parent.edge1(1).unwrap());
    assert_eq!(sub.edge2(2).unwrap(), parent.edge2(3).unwrap());
    assert!(sub.is_subset());
    assert!(!parent.is_subset());
    assert_eq!(sub.range().to_string(), "GeoZ=1:3");
}

#[test]
fn test_regular_interval_subset() {
    let parent = regular_interval(0.0, 5.0, 10);
    let sub = parent
        .subset_by_index_range(&IndexRange::new(2, 4).unwrap())
        .unwrap();
    assert_eq!(sub.spacing(), Spacing::RegularInterval);
    assert_eq!(sub.start_value(), 10.0);
    assert_eq!(sub.end_value(), 25.0);
    assert_eq!(sub.coord_interval(2).unwrap(), parent.coord_interval(4).unwrap());
}

#[test]
fn test_strided_interval_subset_keeps_true_edges() {
    for parent in [
        regular_interval(0.0, 5.0, 10),
        irregular(AxisType::GeoZ, Spacing::ContiguousInterval, &CONTIGUOUS_EDGES),
    ] {
        let range = IndexRange::with_stride(0, 4, 2).unwrap();
        let sub = parent.subset_by_index_range(&range).unwrap();
        assert_eq!(sub.spacing(), Spacing::DiscontiguousInterval);
        assert_eq!(sub.ncoords(), 3);
        for (k, i) in range.iter().enumerate() {
            assert_eq!(sub.coord_interval(k).unwrap(), parent.coord_interval(i).unwrap());
        }
    }
}

#[test]
fn test_discontiguous_subset_copies_pairs() {
    let parent = irregular(AxisType::GeoZ, Spacing::DiscontiguousInterval, &DISCONTIGUOUS_BOUNDS);
    let sub = parent
        .subset_by_index_range(&IndexRange::new(2, 3).unwrap())
        .unwrap();
    assert_eq!(sub.values().unwrap(), vec![4.0, 5.0, 10.0, 12.0]);
}

#[test]
fn test_subset_of_subset_composes_ranges() {
    let parent = regular_point(0.0, 1.0, 20);
    let first = parent
        .subset_by_index_range(&IndexRange::with_stride(2, 18, 2).unwrap())
        .unwrap();
    let second = first
        .subset_by_index_range(&IndexRange::new(1, 3).unwrap())
        .unwrap();
    assert_eq!(second.ncoords(), 3);
    assert_eq!(second.range().first(), 4);
    assert_eq!(second.range().stride(), 2);
    assert_eq!(second.midpoint(0).unwrap(), 4.0);
    assert_eq!(second.midpoint(2).unwrap(), 8.0);
}

#[test]
fn test_subset_range_errors() {
    let axis = regular_point(0.0, 1.0, 5);
    assert!(matches!(
        axis.subset_by_index_range(&IndexRange::new(3, 7).unwrap()),
        Err(GridError::InvalidRange(_))
    ));
    assert!(matches!(
        axis.subset_by_index_range(&IndexRange::empty()),
        Err(GridError::InvalidRange(_))
    ));
}

// ============================================================================
// Subsetting by value and role
// ============================================================================

#[test]
fn test_subset_by_value_and_interval() {
    let levels = irregular(AxisType::Pressure, Spacing::IrregularPoint, &PRESSURE_LEVELS_HPA);
    let sub = levels.subset_by_value(820.0).unwrap();
    assert_eq!(sub.ncoords(), 1);
    assert_eq!(sub.midpoint(0).unwrap(), 850.0);
    assert_eq!(sub.range().first(), 2);

    let cells = irregular(AxisType::GeoZ, Spacing::ContiguousInterval, &CONTIGUOUS_EDGES);
    let sub = cells.subset_by_interval(CoordInterval::new(6.5, 9.0)).unwrap();
    assert_eq!(sub.coord_interval(0).unwrap(), CoordInterval::new(6.0, 10.0));
}

#[test]
fn test_subset_vertical_by_params() {
    let levels = irregular(AxisType::Pressure, Spacing::IrregularPoint, &PRESSURE_LEVELS_HPA);
    let sub = levels.subset(&GridSubset::new().set_vert_point(480.0)).unwrap();
    assert_eq!(sub.midpoint(0).unwrap(), 500.0);

    let sub = levels
        .subset(&GridSubset::new().set_vert_intv(CoordInterval::new(900.0, 940.0)))
        .unwrap();
    assert_eq!(sub.midpoint(0).unwrap(), 925.0);

    // No vertical parameter: unchanged copy.
    let same = levels.subset(&GridSubset::new().set_ens_coord(1.0)).unwrap();
    assert_eq!(same, levels);
    assert!(!same.is_subset());
}

#[test]
fn test_subset_ensemble_and_time_offset() {
    let ens = GridAxis1D::builder()
        .set_name("ens")
        .set_axis_type(AxisType::Ensemble)
        .set_spacing(Spacing::RegularPoint)
        .set_regular(5, 0.0, 4.0, 1.0)
        .build()
        .unwrap();
    let sub = ens.subset(&GridSubset::new().set_ens_coord(3.0)).unwrap();
    assert_eq!(sub.midpoint(0).unwrap(), 3.0);

    let offsets = irregular(AxisType::TimeOffset, Spacing::IrregularPoint, &[0.0, 3.0, 6.0, 12.0]);
    let first = offsets
        .subset(&GridSubset::new().set_time_offset_first(true))
        .unwrap();
    assert_eq!(first.midpoint(0).unwrap(), 0.0);
    let near = offsets.subset(&GridSubset::new().set_time_offset(7.0)).unwrap();
    assert_eq!(near.midpoint(0).unwrap(), 6.0);
    let intv = offsets
        .subset(&GridSubset::new().set_time_offset_intv(CoordInterval::new(10.0, 14.0)))
        .unwrap();
    assert_eq!(intv.midpoint(0).unwrap(), 12.0);
}

#[test]
fn test_subset_horizontal_axis_is_invalid_state() {
    let x = regular_point(0.0, 1.0, 10);
    let err = x.subset(&GridSubset::new().set_vert_point(1.0)).unwrap_err();
    assert!(matches!(err, GridError::InvalidState(_)));
}

#[test]
fn test_subset_other_role_unchanged() {
    let spectral = irregular(AxisType::Spectral, Spacing::IrregularPoint, &[0.4, 0.5, 0.6]);
    let same = spectral.subset(&GridSubset::new().set_vert_point(0.5)).unwrap();
    assert_eq!(same, spectral);
}

#[test]
fn test_subset_dependent_follows_independent() {
    let time = irregular(AxisType::TimeOffset, Spacing::IrregularPoint, &[0.0, 6.0, 12.0, 18.0]);
    let valid = GridAxis1D::builder()
        .set_name("valid")
        .set_dependence_type(DependenceType::Dependent)
        .set_depends_on([time.name()])
        .set_spacing(Spacing::IrregularPoint)
        .set_values(vec![100.0, 106.0, 112.0, 118.0])
        .build()
        .unwrap();

    let time_sub = time
        .subset_by_index_range(&IndexRange::new(1, 2).unwrap())
        .unwrap();
    let valid_sub = valid.subset_dependent(&time_sub).unwrap();
    assert_eq!(valid_sub.values().unwrap(), vec![106.0, 112.0]);

    // An unsubset independent axis leaves the dependent one alone.
    assert_eq!(valid.subset_dependent(&time).unwrap(), valid);

    let unrelated = regular_point(0.0, 1.0, 4);
    assert!(matches!(
        valid.subset_dependent(&unrelated),
        Err(GridError::InvalidArgument(_))
    ));
}
