extern crate svgscene;
#[macro_use]
extern crate pretty_assertions;

use svgscene::{Document, Element, ElementKind, ElementType, Shape};

fn scene() -> Document {
    Document::from_data(
        "<svg>
            <g id='hud'>
                <g id='panel'>
                    <rect id='backing' width='10' height='10'/>
                    <text id='score' x='1' y='1'>0000</text>
                </g>
                <path id='divider' d='M0,0 L10,0'/>
            </g>
            <circle id='cursor' r='2'/>
            <text x='0' y='0'>press start</text>
        </svg>",
    )
    .unwrap()
}

#[test]
fn find_by_full_path() {
    let doc = scene();
    let id = doc.find_by_path("hud:panel:score", true).unwrap();
    assert_eq!(doc.get(id).name, "score");

    assert_eq!(doc.find_by_path("hud:score", true), None);
    assert_eq!(doc.find_by_path("hud:panel:ghost", true), None);
}

#[test]
fn find_wildcard_matches_at_any_depth() {
    let doc = scene();

    let deep = doc.find_by_path("*:backing", true).unwrap();
    assert_eq!(doc.get(deep).name, "backing");

    let shallow = doc.find_by_path("*:cursor", true).unwrap();
    assert_eq!(doc.get(shallow).name, "cursor");

    assert_eq!(doc.find_by_path("*:ghost", true), None);
}

#[test]
fn find_wildcard_continues_after_match() {
    let doc = scene();
    let id = doc.find_by_path("*:panel:score", true).unwrap();
    assert_eq!(doc.get(id).name, "score");
}

#[test]
fn non_strict_matches_substrings() {
    let doc = scene();
    let id = doc.find_by_path("hud:pan:back", false).unwrap();
    assert_eq!(doc.get(id).name, "backing");

    assert_eq!(doc.find_by_path("hud:pan:back", true), None);
}

#[test]
fn unnamed_text_found_by_content() {
    let doc = scene();
    let id = doc.find_by_path("press", false).unwrap();
    assert_eq!(doc.get(id).element_type(), ElementType::Text);
    assert_eq!(doc.get(id).name, svgscene::NO_NAME);
}

#[test]
fn elements_by_type_in_group() {
    let doc = scene();

    let paths = doc.elements_by_type(ElementType::Path, "hud");
    assert_eq!(paths.len(), 1);
    assert_eq!(doc.get(paths[0]).name, "divider");

    // empty path means the document root
    let circles = doc.elements_by_type(ElementType::Circle, "");
    assert_eq!(circles.len(), 1);
    assert_eq!(doc.get(circles[0]).name, "cursor");

    // direct children only
    assert_eq!(doc.elements_by_type(ElementType::Rectangle, "hud").len(), 0);
}

#[test]
fn all_elements_by_type_searches_whole_tree() {
    let doc = scene();
    let texts = doc.all_elements_by_type(ElementType::Text);
    assert_eq!(texts.len(), 2);
    assert_eq!(doc.get(texts[0]).name, "score");
}

#[test]
fn flatten_all_lists_leaves_in_document_order() {
    let doc = scene();
    let names: Vec<&str> = doc
        .flatten_all()
        .iter()
        .map(|&id| doc.get(id).name.as_str())
        .collect();
    assert_eq!(
        names,
        vec!["backing", "score", "divider", "cursor", svgscene::NO_NAME]
    );
}

#[test]
fn replace_swaps_a_nested_child() {
    let mut doc = scene();
    let old = doc.find_by_path("hud:panel:backing", true).unwrap();
    let cursor = doc.find_by_path("cursor", true).unwrap();

    assert!(doc.replace(old, cursor));
    assert_eq!(doc.find_by_path("hud:panel:cursor", true), Some(cursor));
    assert_eq!(doc.find_by_path("hud:panel:backing", true), None);

    // the old handle is no longer referenced anywhere
    assert!(!doc.replace(old, cursor));
}

#[test]
fn replace_with_a_freshly_created_element() {
    let mut doc = scene();
    let old = doc.find_by_path("hud:divider", true).unwrap();

    let mut fresh = Element::new(ElementKind::Path(Shape::default()));
    fresh.name = "separator".to_string();
    let fresh = doc.create_element(fresh);

    assert!(doc.replace(old, fresh));
    assert_eq!(doc.find_by_path("hud:separator", true), Some(fresh));
    assert_eq!(doc.find_by_path("hud:divider", true), None);
    assert_eq!(doc.get(fresh).name, "separator");
}

#[test]
fn tree_dump() {
    let doc = scene();
    let expected = "\
group - hud
   group - panel
      rectangle - backing
      text - score
   path - divider
circle - cursor
text - No Name
";
    assert_eq!(doc.tree_to_string(0), expected);
}

#[test]
fn children_named_filters_direct_children() {
    let doc = scene();
    let hud = doc.find_by_path("hud", true).unwrap();

    let found = doc.children_named(hud, "panel", true);
    assert_eq!(found.len(), 1);
    assert!(doc.children_named(hud, "backing", true).is_empty());
}
