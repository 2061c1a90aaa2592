//! Tests for transform dispatch, the builder, existing fields and subsetting.

use std::sync::Arc;

use grid_common::attributes::names;
use grid_common::{Attributes, GridError, GridResult, IndexRange};
use ndarray::{arr1, Array2, Array4, ArrayD, IxDyn};
use test_utils::{assert_slice_approx_eq, create_index_field};
use vertical_transform::transforms::OceanSigma;
use vertical_transform::{
    Dataset, InMemoryDataset, TransformContext, TransformRegistry, Variable, VerticalTransform,
    VerticalTransformBuilder, VerticalTransformConfig, VerticalTransformType,
};

fn ocean_sigma_dataset() -> InMemoryDataset {
    InMemoryDataset::builder()
        .add("sigma", &["sigma"], None, arr1(&[-1.0, -0.75, -0.5, -0.25, 0.0]).into_dyn())
        .unwrap()
        .add("depth", &["y", "x"], Some("m"), (create_index_field(4, 6) + 10.0).into_dyn())
        .unwrap()
        .add("zeta", &["y", "x"], Some("m"), Array2::from_elem((4, 6), 0.25).into_dyn())
        .unwrap()
        .build()
}

fn ocean_sigma_attributes() -> Attributes {
    Attributes::new()
        .with(names::STANDARD_NAME, "ocean_sigma_coordinate")
        .with(names::FORMULA_TERMS, "sigma: sigma eta: zeta depth: depth")
}

fn ocean_sigma() -> Arc<dyn VerticalTransform> {
    VerticalTransformBuilder::new()
        .set_name("sigma")
        .set_attributes(ocean_sigma_attributes())
        .build(Arc::new(ocean_sigma_dataset()), &TransformRegistry::default())
        .unwrap()
}

// ============================================================================
// Registry
// ============================================================================

#[test]
fn test_default_registry_knows_all_types() {
    let registry = TransformRegistry::default();
    for kind in VerticalTransformType::ALL {
        assert!(registry.contains(kind.standard_name()), "{}", kind);
        assert!(registry.contains(kind.type_name()), "{}", kind);
    }
    assert!(registry.contains("OCEAN_S_COORDINATE"));
    assert!(!registry.contains("atmosphere_ln_pressure_coordinate"));
}

#[test]
fn test_unknown_standard_name() {
    let attributes = Attributes::new()
        .with(names::STANDARD_NAME, "atmosphere_ln_pressure_coordinate")
        .with(names::FORMULA_TERMS, "p0: p0 lev: lev");
    let err = VerticalTransformBuilder::new()
        .set_attributes(attributes)
        .build(Arc::new(ocean_sigma_dataset()), &TransformRegistry::default())
        .unwrap_err();
    assert!(matches!(err, GridError::UnknownTransform(ref name) if name == "atmosphere_ln_pressure_coordinate"));
}

#[test]
fn test_no_selector_attribute() {
    let attributes = Attributes::new().with(names::FORMULA_TERMS, "sigma: sigma");
    let err = VerticalTransformBuilder::new()
        .set_attributes(attributes)
        .build(Arc::new(ocean_sigma_dataset()), &TransformRegistry::default())
        .unwrap_err();
    assert!(matches!(err, GridError::UnknownTransform(_)));
}

#[test]
fn test_transform_type_attribute_wins() {
    let attributes = ocean_sigma_attributes().with(names::TRANSFORM_TYPE, "OceanSigma");
    let transform = VerticalTransformBuilder::new()
        .set_attributes(attributes.with(names::STANDARD_NAME, "not_a_transform"))
        .build(Arc::new(ocean_sigma_dataset()), &TransformRegistry::default())
        .unwrap();
    assert_eq!(transform.transform_type(), VerticalTransformType::OceanSigma);
}

fn make_ocean_sigma(ctx: &TransformContext<'_>) -> GridResult<Arc<dyn VerticalTransform>> {
    Ok(Arc::new(OceanSigma::from_context(ctx)?))
}

#[test]
fn test_register_custom_name() {
    let mut registry = TransformRegistry::empty();
    assert!(registry.is_empty());
    registry.register("roms_sigma", make_ocean_sigma);

    let attributes = ocean_sigma_attributes().with(names::TRANSFORM_TYPE, "ROMS_Sigma");
    let transform = VerticalTransformBuilder::new()
        .set_attributes(attributes)
        .build(Arc::new(ocean_sigma_dataset()), &registry)
        .unwrap();
    assert_eq!(transform.transform_type(), VerticalTransformType::OceanSigma);
}

#[test]
fn test_malformed_formula_terms() {
    let attributes = Attributes::new()
        .with(names::STANDARD_NAME, "ocean_sigma_coordinate")
        .with(names::FORMULA_TERMS, "sigma: sigma eta:");
    let err = VerticalTransformBuilder::new()
        .set_attributes(attributes)
        .build(Arc::new(ocean_sigma_dataset()), &TransformRegistry::default())
        .unwrap_err();
    assert!(matches!(err, GridError::InvalidArgument(_)));
}

// ============================================================================
// Builder
// ============================================================================

#[test]
fn test_builder_prebuilt() {
    let transform = ocean_sigma();
    let builder = VerticalTransformBuilder::new().set_prebuilt(Arc::clone(&transform));
    assert_eq!(builder.name(), Some("sigma"));

    let built = builder
        .build(Arc::new(InMemoryDataset::default()), &TransformRegistry::empty())
        .unwrap();
    assert!(Arc::ptr_eq(&built, &transform));
}

#[test]
fn test_builder_rejects_invalid_config() {
    let config = VerticalTransformConfig {
        output_pressure_unit: Some("m".to_string()),
        ..Default::default()
    };
    let err = VerticalTransformBuilder::new()
        .set_attributes(ocean_sigma_attributes())
        .set_config(config)
        .build(Arc::new(ocean_sigma_dataset()), &TransformRegistry::default())
        .unwrap_err();
    assert!(matches!(err, GridError::InvalidArgument(_)));
}

// ============================================================================
// Existing 3D field
// ============================================================================

#[test]
fn test_existing_field_time_dependent() {
    let data = Array4::from_shape_fn((2, 3, 2, 2), |(t, k, j, i)| {
        (t * 1000 + k * 100 + j * 10 + i) as f64
    });
    let dataset = InMemoryDataset::builder()
        .add("geopotential_height", &["time", "lev", "y", "x"], Some("m"), data.into_dyn())
        .unwrap()
        .build();
    let attributes = Attributes::new()
        .with(names::TRANSFORM_TYPE, "existing3DField")
        .with(names::EXISTING_DATA_FIELD, "geopotential_height");

    let transform = VerticalTransformBuilder::new()
        .set_attributes(attributes)
        .build(Arc::new(dataset), &TransformRegistry::default())
        .unwrap();

    assert_eq!(transform.shape(), [3, 2, 2]);
    assert_eq!(transform.num_times(), Some(2));
    assert_eq!(transform.unit_string(), Some("m"));
    assert_eq!(transform.coordinate_array(1).unwrap()[[2, 1, 0]], 1210.0);
    assert_eq!(
        transform.coordinate_array_1d(0, 1, 1).unwrap().to_vec(),
        vec![11.0, 111.0, 211.0]
    );
}

/// A reader whose data disagrees with the shape it declares.
struct TruncatedDataset {
    variable: Variable,
}

impl Dataset for TruncatedDataset {
    fn find_variable(&self, name: &str) -> Option<&Variable> {
        (name == self.variable.name()).then_some(&self.variable)
    }

    fn read(&self, _name: &str) -> GridResult<ArrayD<f64>> {
        Ok(ArrayD::zeros(IxDyn(&vec![1; self.variable.rank()])))
    }
}

fn build_existing(variable: Variable) -> GridResult<Arc<dyn VerticalTransform>> {
    let attributes = Attributes::new()
        .with(names::TRANSFORM_TYPE, "existing3DField")
        .with(names::EXISTING_DATA_FIELD, "z");
    VerticalTransformBuilder::new()
        .set_attributes(attributes)
        .build(Arc::new(TruncatedDataset { variable }), &TransformRegistry::default())
}

#[test]
fn test_existing_field_static_wrong_shape() {
    let variable = Variable::new("z", &["lev", "y", "x"], &[3, 2, 2]).unwrap();
    let err = build_existing(variable).unwrap_err();
    match err {
        GridError::ShapeMismatch { name, expected, found } => {
            assert_eq!(name, "z");
            assert_eq!(expected, vec![3, 2, 2]);
            assert_eq!(found, vec![1, 1, 1]);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_existing_field_time_slice_wrong_shape() {
    let variable = Variable::new("z", &["time", "lev", "y", "x"], &[2, 3, 2, 2]).unwrap();
    let transform = build_existing(variable).unwrap();
    assert_eq!(transform.shape(), [3, 2, 2]);
    assert!(matches!(
        transform.coordinate_array(0),
        Err(GridError::ShapeMismatch { .. })
    ));

    let subset = Arc::clone(&transform)
        .subset(None, Some(IndexRange::new(2, 2).unwrap()), None, None)
        .unwrap();
    assert!(matches!(
        subset.coordinate_array(0),
        Err(GridError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_existing_field_missing_attribute() {
    let attributes = Attributes::new().with(names::TRANSFORM_TYPE, "existing3DField");
    let err = VerticalTransformBuilder::new()
        .set_attributes(attributes)
        .build(Arc::new(ocean_sigma_dataset()), &TransformRegistry::default())
        .unwrap_err();
    assert!(matches!(err, GridError::MissingFormulaTerm { .. }));
}

// ============================================================================
// Subsetting
// ============================================================================

#[test]
fn test_subset_matches_full_array() {
    let transform = ocean_sigma();
    let full = transform.coordinate_array(0).unwrap();

    let z_range = IndexRange::new(1, 3).unwrap();
    let y_range = IndexRange::with_stride(0, 3, 2).unwrap();
    let x_range = IndexRange::new(2, 5).unwrap();
    let subset = Arc::clone(&transform)
        .subset(None, Some(z_range.clone()), Some(y_range.clone()), Some(x_range.clone()))
        .unwrap();

    assert_eq!(subset.shape(), [3, 2, 4]);
    assert_eq!(subset.name(), "sigma");
    assert_eq!(subset.transform_type(), VerticalTransformType::OceanSigma);

    let sub = subset.coordinate_array(0).unwrap();
    for (k, kk) in z_range.iter().enumerate() {
        for (j, jj) in y_range.iter().enumerate() {
            for (i, ii) in x_range.iter().enumerate() {
                assert_eq!(sub[[k, j, i]], full[[kk, jj, ii]]);
            }
        }
    }

    let column = subset.coordinate_array_1d(0, 3, 1).unwrap();
    let expected: Vec<f64> = z_range.iter().map(|k| full[[k, 2, 5]]).collect();
    assert_slice_approx_eq!(&column, &expected, 0.0);
}

#[test]
fn test_subset_of_subset() {
    let transform = ocean_sigma();
    let full = transform.coordinate_array(0).unwrap();

    let once = Arc::clone(&transform)
        .subset(None, None, Some(IndexRange::new(1, 3).unwrap()), None)
        .unwrap();
    let twice = once
        .subset(None, Some(IndexRange::single(4)), Some(IndexRange::single(2)), None)
        .unwrap();

    assert_eq!(twice.shape(), [1, 1, 6]);
    let arr = twice.coordinate_array(0).unwrap();
    for i in 0..6 {
        assert_eq!(arr[[0, 0, i]], full[[4, 3, i]]);
    }
}

#[test]
fn test_subset_out_of_range() {
    let result = ocean_sigma().subset(None, None, None, Some(IndexRange::new(0, 6).unwrap()));
    assert!(matches!(result, Err(GridError::InvalidRange(_))));
}
