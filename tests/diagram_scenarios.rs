//! End-to-end behavior of the host entry point
//!
//! Covers input validation, output shape and ordering, ring closure,
//! container sizing at the ratio boundary, and reproducibility.

use rust_voronoi_cells::generation::{jittered_lattice, random_points_in_box};
use rust_voronoi_cells::wkt::parse_rings;
use rust_voronoi_cells::*;

fn split(points: &[DVec3]) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    (
        points.iter().map(|p| p.x).collect(),
        points.iter().map(|p| p.y).collect(),
        points.iter().map(|p| p.z).collect(),
    )
}

fn cloud(count: usize, seed: u64) -> Vec<DVec3> {
    let bounds = BoundingBox::new(DVec3::new(-4.0, 0.0, 1.0), DVec3::new(6.0, 5.0, 4.0));
    random_points_in_box(count, &bounds, seed)
}

#[test]
fn two_points_produce_two_closed_surfaces() {
    let surfaces = compute_diagram(&[0.0, 2.0], &[0.0, 0.0], &[0.0, 0.0], 2.0).unwrap();
    assert_eq!(surfaces.len(), 2);

    for surface in &surfaces {
        let text = surface.as_deref().expect("both cells should succeed");
        assert!(text.starts_with("POLYHEDRALSURFACE("));
        let rings = parse_rings(text).unwrap();
        assert!(rings.len() >= 4, "only {} rings", rings.len());
        for ring in &rings {
            assert_eq!(ring.len(), 4);
            assert_eq!(ring.first(), ring.last());
        }
    }

    // container is [-1, 3] x [-2, 2] x [-2, 2], bisector at x = 1
    let left = parse_rings(surfaces[0].as_deref().unwrap()).unwrap();
    assert!(left.iter().flatten().all(|c| c[0] >= -1.0 && c[0] <= 1.0));
    assert!(left.iter().flatten().any(|c| c[0] == -1.0));
    assert!(left.iter().flatten().any(|c| c[1] == 2.0 && c[2] == -2.0));
}

#[test]
fn mismatched_lengths_are_rejected() {
    let err = compute_diagram(&[0.0, 0.0], &[0.0, 0.0, 0.0], &[0.0, 0.0], 1.0).unwrap_err();
    assert!(matches!(err, VoronoiError::InvalidInput(_)));
}

#[test]
fn single_point_is_rejected() {
    let err = compute_diagram(&[1.0], &[2.0], &[3.0], 1.0).unwrap_err();
    assert!(matches!(err, VoronoiError::InvalidInput(_)));

    let err = compute_diagram(&[], &[], &[], 1.0).unwrap_err();
    assert!(matches!(err, VoronoiError::InvalidInput(_)));
}

#[test]
fn ratio_below_one_is_rejected() {
    let err = compute_diagram(&[0.0, 1.0], &[0.0, 1.0], &[0.0, 1.0], 0.5).unwrap_err();
    assert!(matches!(err, VoronoiError::InvalidInput(_)));

    let err = compute_diagram(&[0.0, 1.0], &[0.0, 1.0], &[0.0, 1.0], f64::NAN).unwrap_err();
    assert!(matches!(err, VoronoiError::InvalidInput(_)));
}

#[test]
fn non_finite_coordinates_are_rejected() {
    let err = compute_diagram(&[0.0, f64::INFINITY], &[0.0, 1.0], &[0.0, 1.0], 1.0).unwrap_err();
    assert!(matches!(err, VoronoiError::InvalidInput(_)));
}

#[test]
fn output_follows_input_order() {
    let points = cloud(80, 3);
    let config = DiagramConfig::with_container_ratio(1.3).unwrap();
    let diagram = VoronoiDiagram::compute(&points, config).unwrap();

    assert_eq!(diagram.cell_count(), points.len());
    for (id, point) in points.iter().enumerate() {
        let cell = diagram.cell(id).unwrap();
        assert_eq!(cell.id(), id);
        assert_eq!(cell.generator(), *point);
    }

    let (xs, ys, zs) = split(&points);
    assert_eq!(compute_diagram(&xs, &ys, &zs, 1.3).unwrap(), diagram.to_wkt());
}

#[test]
fn ratio_one_hugs_the_points() {
    let points = cloud(40, 11);
    let tight_config = DiagramConfig::with_container_ratio(1.0).unwrap();
    let loose_config = DiagramConfig::with_container_ratio(2.0).unwrap();
    let tight = Container::new(&points, &tight_config).unwrap();
    let loose = Container::new(&points, &loose_config).unwrap();

    assert_eq!(tight.margin(), DVec3::ZERO);
    assert_eq!(tight.bounds(), tight.point_bounds());
    assert_eq!(loose.margin(), loose.point_bounds().extent() * 0.5);
    assert!(tight.bounds().volume() < loose.bounds().volume());
    assert!(loose.bounds().contains(tight.bounds().min));
    assert!(loose.bounds().contains(tight.bounds().max));

    let (xs, ys, zs) = split(&points);
    let surfaces = compute_diagram(&xs, &ys, &zs, 1.0).unwrap();
    assert!(surfaces.iter().all(Option::is_some));
}

#[test]
fn flat_input_gets_thickness_from_the_floor() {
    // all points in the plane z = 0
    let points: Vec<DVec3> = jittered_lattice([4, 4, 1], 1.0, 0.2, 5)
        .into_iter()
        .map(|p| DVec3::new(p.x, p.y, 0.0))
        .collect();
    let config = DiagramConfig::default();
    let diagram = VoronoiDiagram::compute(&points, config).unwrap();

    let bounds = diagram.container().bounds();
    assert!((bounds.extent().z - config.threshold_floor).abs() < 1e-12);
    assert!(diagram.failures().is_empty());
    let volume = diagram.total_volume();
    assert!((volume - bounds.volume()).abs() < 1e-9 * bounds.volume());
}

#[test]
fn repeated_runs_are_byte_identical() {
    let (xs, ys, zs) = split(&cloud(300, 99));
    let first = compute_diagram(&xs, &ys, &zs, 1.5).unwrap();
    let second = compute_diagram(&xs, &ys, &zs, 1.5).unwrap();
    assert_eq!(first, second);

    let sequential = DiagramConfigBuilder::new()
        .container_ratio(1.5)
        .unwrap()
        .parallel(false)
        .build()
        .unwrap();
    assert_eq!(compute_diagram_with_config(&xs, &ys, &zs, &sequential).unwrap(), first);
}

#[test]
fn duplicate_points_fail_locally() {
    let mut points = cloud(50, 21);
    points.push(points[10]);
    let (xs, ys, zs) = split(&points);

    let surfaces = compute_diagram(&xs, &ys, &zs, 1.2).unwrap();
    assert_eq!(surfaces.len(), 51);
    assert!(surfaces[10].is_none());
    assert!(surfaces[50].is_none());
    assert_eq!(surfaces.iter().filter(|s| s.is_some()).count(), 49);
}

#[test]
fn exact_lattice_tiles_the_container() {
    // every cell of an unperturbed lattice is a cube sharing degenerate vertices
    let points = jittered_lattice([4, 3, 3], 1.0, 0.0, 0);
    let diagram = VoronoiDiagram::compute(&points, DiagramConfig::default()).unwrap();

    assert!(diagram.failures().is_empty());
    for cell in diagram.computed_cells() {
        assert!(cell.check_topology().is_ok());
        assert!(cell.volume() > 0.0);
    }
    let bounds = diagram.container().bounds();
    assert!((diagram.total_volume() - bounds.volume()).abs() < 1e-9 * bounds.volume());
}

#[test]
fn lattice_jitter_inside_tolerance_band() {
    // perturbations near `clip_tolerance * diagonal` leave edges of the
    // lattice cubes classified as lying on later cutting planes
    for (jitter, seed) in [(1e-8, 1), (1e-9, 2), (3e-9, 3)] {
        let points = jittered_lattice([8, 8, 8], 1.0, jitter, seed);
        let diagram = VoronoiDiagram::compute(&points, DiagramConfig::default()).unwrap();

        assert!(
            diagram.failures().is_empty(),
            "jitter {}: {:?}",
            jitter,
            &diagram.failures()[..diagram.failures().len().min(3)]
        );
        let bounds = diagram.container().bounds();
        let error = (diagram.total_volume() - bounds.volume()).abs() / bounds.volume();
        assert!(error < 1e-7, "jitter {}: volume off by {}", jitter, error);
    }
}

#[test]
fn precision_controls_digits() {
    let config = DiagramConfigBuilder::new()
        .container_ratio(2.0)
        .unwrap()
        .coordinate_precision(2)
        .unwrap()
        .build()
        .unwrap();
    let surfaces =
        compute_diagram_with_config(&[0.0, 2.0], &[0.0, 0.0], &[0.0, 0.0], &config).unwrap();
    let text = surfaces[0].as_deref().unwrap();
    assert!(text.contains("-1.00 "));
    assert!(!text.contains("-1.000"));
}
