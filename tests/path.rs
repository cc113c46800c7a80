extern crate svgscene;
#[macro_use]
extern crate pretty_assertions;

use svgscene::{flatten_commands, parse_path_data, subpaths_to_path_data, Point};

fn flatten(data: &str) -> Vec<svgscene::Subpath> {
    flatten_commands(&parse_path_data(data).unwrap())
}

#[test]
fn closed_triangle() {
    let subpaths = flatten("M0,0 L10,0 L10,10 Z");
    assert_eq!(subpaths.len(), 1);
    assert_eq!(
        subpaths[0].points,
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ]
    );
    assert!(subpaths[0].closed);
}

#[test]
fn smooth_cubic_equals_explicit_cubic() {
    // the S segment's first control must be the reflection of (10,10)
    // through (10,0), i.e. (10,-10)
    let shorthand = flatten("M0,0 C0,10 10,10 10,0 S20,-10 20,0");
    let explicit = flatten("M0,0 C0,10 10,10 10,0 C10,-10 20,-10 20,0");
    assert_eq!(shorthand, explicit);
}

#[test]
fn smooth_quad_equals_explicit_quad() {
    let shorthand = flatten("M0,0 Q5,10 10,0 T20,0");
    let explicit = flatten("M0,0 Q5,10 10,0 Q15,-10 20,0");
    assert_eq!(shorthand, explicit);
}

#[test]
fn flattened_form_round_trips() {
    let sources = [
        "M0,0 L10,0 L10,10 Z",
        "M0,0 C0,10 10,10 10,0 S20,-10 20,0",
        "M5,5 Q10,20 15,5 T25,5 Z M30,0 h10 v10 z",
        "M0,0 A10 10 0 0 1 20,0 Z",
    ];

    for src in &sources {
        let first = flatten(src);
        let reparsed = flatten(&subpaths_to_path_data(&first));
        assert_eq!(first, reparsed, "round-trip failed for {:?}", src);
    }
}

#[test]
fn arc_endpoints_exact_for_all_flag_combinations() {
    for &(large, sweep) in &[(0, 0), (0, 1), (1, 0), (1, 1)] {
        let data = format!("M1,2 A10 6 30 {} {} 15,9", large, sweep);
        let subpaths = flatten(&data);
        assert_eq!(subpaths.len(), 1);

        let points = &subpaths[0].points;
        let first = points[0];
        let last = points[points.len() - 1];

        assert!((first.x - 1.0).abs() < 1e-3, "flags ({},{})", large, sweep);
        assert!((first.y - 2.0).abs() < 1e-3, "flags ({},{})", large, sweep);
        assert!((last.x - 15.0).abs() < 1e-3, "flags ({},{})", large, sweep);
        assert!((last.y - 9.0).abs() < 1e-3, "flags ({},{})", large, sweep);
    }
}

#[test]
fn arc_flag_combinations_are_distinct() {
    let arc = |large: u8, sweep: u8| {
        let data = format!("M0,0 A10 8 0 {} {} 12,4", large, sweep);
        flatten(&data).remove(0).points
    };

    let arcs = [arc(0, 0), arc(0, 1), arc(1, 0), arc(1, 1)];

    // no two of the four arcs may collapse onto the same polyline;
    // compare by midpoint since sample counts differ with the span
    let mid = |points: &Vec<Point>| points[points.len() / 2];
    for i in 0..4 {
        for j in i + 1..4 {
            let a = mid(&arcs[i]);
            let b = mid(&arcs[j]);
            let dist = ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();
            assert!(dist > 0.1, "arcs {} and {} collapsed", i, j);
        }
    }
}

#[test]
fn large_arc_spans_more_than_half() {
    let small = flatten("M0,0 A10 10 0 0 1 12,4").remove(0).points;
    let large = flatten("M0,0 A10 10 0 1 1 12,4").remove(0).points;
    assert!(large.len() > small.len());
}

#[test]
fn radii_too_small_are_scaled_up() {
    // radius 1 cannot span endpoints 20 apart; the arc must still reach
    let subpaths = flatten("M0,0 A1 1 0 0 1 20,0");
    let last = *subpaths[0].points.last().unwrap();
    assert!((last.x - 20.0).abs() < 1e-3);
    assert!(last.y.abs() < 1e-3);
}

#[test]
fn malformed_data_is_an_error() {
    assert!(parse_path_data("").is_err());
    assert!(parse_path_data("L10 10").is_err());
    // numbers with no command letter are not a path either
    assert!(parse_path_data("10 10 L20 20").is_err());
}

#[test]
fn truncated_data_keeps_valid_prefix() {
    let subpaths = flatten("M0,0 L10,0 C1,2 3");
    assert_eq!(subpaths.len(), 1);
    assert_eq!(
        subpaths[0].points,
        vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)]
    );
}
