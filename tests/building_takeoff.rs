use quantity_takeoff::calc::beams::{beam_quantities, BeamInput};
use quantity_takeoff::calc::columns::{size_column, BuildingType, ColumnShape, ColumnSizingInput};
use quantity_takeoff::calc::concrete::{column_volume, footing_volume, Blinding, ColumnConcreteInput, FootingInput};
use quantity_takeoff::calc::{CalculationRequest, CalculationType};
use serde_json::json;

fn column_input(shape: ColumnShape) -> ColumnSizingInput {
    ColumnSizingInput {
        slab_area_m2: 16.0,
        floors: 4,
        building_type: BuildingType::Commercial,
        shape,
        concrete_grade_mpa: 30.0,
        steel_grade_mpa: 400.0,
        steel_ratio: 0.012,
        main_bar_diameter_mm: 18,
    }
}

#[test]
fn sized_column_feeds_column_concrete() {
    let sizing = size_column(&column_input(ColumnShape::Square)).expect("column sizes");
    assert!(sizing.dimensions.width_cm >= 35.0);
    assert_eq!(sizing.dimensions.width_cm % 5.0, 0.0);

    let mut input = ColumnConcreteInput {
        shape: Some(ColumnShape::Square),
        width_m: None,
        depth_m: None,
        height_m: 3.2,
        count: 12,
        waste_percent: Some(3.0),
    };
    assert!(input.fill_from(&sizing.dimensions));
    let concrete = column_volume(&input).expect("column concrete");

    let side = sizing.dimensions.width_cm / 100.0;
    let expected = side * side * 3.2 * 12.0;
    assert!((concrete.element_volume_m3 - expected).abs() < 1e-3);
    assert!(concrete.order_volume_m3 > concrete.total_volume_m3);
}

#[test]
fn every_shape_covers_the_required_area() {
    for shape in [ColumnShape::Square, ColumnShape::Rectangular, ColumnShape::Circular] {
        let result = size_column(&column_input(shape)).expect("column sizes");
        assert!(
            result.provided_area_cm2 >= result.required_area_cm2,
            "{shape:?} provides {} cm² for {} cm² required",
            result.provided_area_cm2,
            result.required_area_cm2
        );
    }
}

#[test]
fn footing_schedule_with_blinding_and_waste() {
    let footing = footing_volume(&FootingInput {
        length_m: 1.8,
        width_m: 1.8,
        thickness_m: 0.6,
        count: 12,
        blinding: Some(Blinding {
            thickness_m: 0.1,
            projection_m: Some(0.15),
        }),
        waste_percent: Some(5.0),
    })
    .expect("footing volume");

    // 1.8² × 0.6 × 12
    assert_eq!(footing.element_volume_m3, 23.328);
    // 2.1² × 0.1 × 12
    assert_eq!(footing.blinding_volume_m3, 5.292);
    assert_eq!(footing.total_volume_m3, 28.62);
    assert_eq!(footing.order_volume_m3, 30.051);
}

#[test]
fn deeper_beam_needs_no_fewer_bars() {
    let shallow = BeamInput {
        span_m: 6.0,
        width_m: 0.25,
        depth_m: 0.5,
        count: 2,
        cover_m: 0.025,
        bottom_bar_diameter_mm: 16,
        top_bar_diameter_mm: 12,
        stirrup_diameter_mm: 8,
        stirrup_spacing_m: 0.2,
        steel_ratio: 0.008,
        waste_percent: None,
    };
    let deep = BeamInput {
        depth_m: 0.8,
        ..shallow.clone()
    };

    let a = beam_quantities(&shallow).expect("shallow beam");
    let b = beam_quantities(&deep).expect("deep beam");
    assert!(b.bottom_bars >= a.bottom_bars);
    assert!(b.steel.total_weight_kg > a.steel.total_weight_kg);
    assert_eq!(a.stirrups_per_beam, 31);
}

#[test]
fn tagged_requests_cover_every_calculator() {
    let requests = vec![
        json!({"type": "column-sizing", "input": {"slab_area_m2": 12.0, "floors": 2, "building_type": "residential", "shape": "circular"}}),
        json!({"type": "footing-concrete", "input": {"length_m": 1.5, "width_m": 1.5, "thickness_m": 0.5}}),
        json!({"type": "column-concrete", "input": {"shape": "rectangular", "width_m": 0.25, "depth_m": 0.5, "height_m": 3.0}}),
        json!({"type": "foundation-concrete", "input": {"kind": "strip", "total_length_m": 30.0, "width_m": 0.6, "thickness_m": 0.3}}),
        json!({"type": "beam-quantities", "input": {"span_m": 4.0, "width_m": 0.2, "depth_m": 0.4}}),
        json!({"type": "slab-quantities", "input": {"length_m": 4.0, "width_m": 3.5, "thickness_m": 0.12, "double_mesh": true}}),
        json!({"type": "rib-slab-quantities", "input": {"length_m": 6.0, "width_m": 4.68}}),
    ];

    let mut seen = Vec::new();
    for raw in requests {
        let request: CalculationRequest = serde_json::from_value(raw).expect("valid request");
        let outcome = request.compute().expect("calculation succeeds");
        assert!(outcome.concrete_data.is_some() || outcome.steel_data.is_some());
        seen.push(outcome.calculation_type);
    }
    assert_eq!(seen, CalculationType::ALL.to_vec());
}
