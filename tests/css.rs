extern crate svgscene;
#[macro_use]
extern crate pretty_assertions;

use svgscene::{Color, Document, ElementId};

fn load(text: &str) -> Document {
    Document::from_data(text).unwrap()
}

fn only_child(doc: &Document) -> ElementId {
    assert_eq!(doc.children().len(), 1);
    doc.children()[0]
}

#[test]
fn style_attribute_overrides_class() {
    let doc = load(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <style>.a { fill: red; }</style>
            <rect class='a' style='fill:blue' width='10' height='10'/>
        </svg>",
    );

    let shape = doc.get(only_child(&doc)).shape().unwrap();
    assert_eq!(shape.fill, Some(Color::new(0, 0, 255)));
}

#[test]
fn presentation_attribute_overridden_by_style_attribute() {
    let doc = load(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <rect fill='red' style='fill:green' width='10' height='10'/>
        </svg>",
    );

    let shape = doc.get(only_child(&doc)).shape().unwrap();
    assert_eq!(shape.fill, Some(Color::new(0, 128, 0)));
}

#[test]
fn display_attribute_beats_style_attribute() {
    let doc = load(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <rect style='display:inline' display='none' width='10' height='10'/>
        </svg>",
    );

    assert!(!doc.get(only_child(&doc)).visible);
}

#[test]
fn absent_fill_defaults_to_black_and_stays_visible() {
    let doc = load(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <rect width='10' height='10'/>
        </svg>",
    );

    let el = doc.get(only_child(&doc));
    assert!(el.visible);
    assert_eq!(el.shape().unwrap().fill, Some(Color::new(0, 0, 0)));
}

#[test]
fn fill_and_stroke_none_makes_rect_invisible() {
    let doc = load(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <rect fill='none' stroke='none' width='10' height='10'/>
        </svg>",
    );

    let el = doc.get(only_child(&doc));
    assert!(!el.visible);
    assert_eq!(el.shape().unwrap().fill, None);
    assert_eq!(el.shape().unwrap().stroke, None);
}

#[test]
fn stroke_without_width_defaults_to_one() {
    let doc = load(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <rect stroke='black' width='10' height='10'/>
        </svg>",
    );

    let shape = doc.get(only_child(&doc)).shape().unwrap();
    assert_eq!(shape.stroke, Some(Color::new(0, 0, 0)));
    assert_eq!(shape.stroke_width, 1.0);
}

#[test]
fn explicit_stroke_width_with_px_unit() {
    let doc = load(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <rect stroke='black' stroke-width='2.5px' width='10' height='10'/>
        </svg>",
    );

    let shape = doc.get(only_child(&doc)).shape().unwrap();
    assert_eq!(shape.stroke_width, 2.5);
}

#[test]
fn no_stroke_means_zero_width() {
    let doc = load(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <rect width='10' height='10'/>
        </svg>",
    );

    assert_eq!(doc.get(only_child(&doc)).shape().unwrap().stroke_width, 0.0);
}

#[test]
fn class_list_applied_in_order() {
    let doc = load(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <style>.a { fill: red; stroke: black; } .b { fill: blue; }</style>
            <rect class='a, b' width='10' height='10'/>
        </svg>",
    );

    let shape = doc.get(only_child(&doc)).shape().unwrap();
    assert_eq!(shape.fill, Some(Color::new(0, 0, 255)));
    assert_eq!(shape.stroke, Some(Color::new(0, 0, 0)));
}

#[test]
fn group_style_is_ambient_for_children() {
    let doc = load(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <style>.warm { fill: red; }</style>
            <g id='layer' class='warm'>
                <rect id='a' width='10' height='10'/>
                <rect id='b' fill='blue' width='10' height='10'/>
            </g>
        </svg>",
    );

    let a = doc.find_by_path("layer:a", true).unwrap();
    let b = doc.find_by_path("layer:b", true).unwrap();
    assert_eq!(doc.get(a).shape().unwrap().fill, Some(Color::new(255, 0, 0)));
    assert_eq!(doc.get(b).shape().unwrap().fill, Some(Color::new(0, 0, 255)));
}

#[test]
fn ambient_resets_at_group_boundary() {
    // the inner group does not inherit the outer group's class styling
    let doc = load(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <style>.warm { fill: red; }</style>
            <g id='outer' class='warm'>
                <g id='inner'>
                    <rect id='a' width='10' height='10'/>
                </g>
            </g>
        </svg>",
    );

    let a = doc.find_by_path("outer:inner:a", true).unwrap();
    assert_eq!(doc.get(a).shape().unwrap().fill, Some(Color::new(0, 0, 0)));
}

#[test]
fn display_none_from_stylesheet_class() {
    let doc = load(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <style>.hidden { display: none; }</style>
            <rect class='hidden' width='10' height='10'/>
        </svg>",
    );

    assert!(!doc.get(only_child(&doc)).visible);
}
