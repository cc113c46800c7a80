// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
*svgscene* is a library to load an SVG file into a typed, queryable
scene graph.

The loader resolves everything up front: the style cascade (stylesheet
classes, presentation attributes, inline styles), path data (flattened
to polyline subpaths, with arcs lowered), and element transforms.
The result is a [`Document`] of typed elements that can be queried by
hierarchical name paths, by type, or flattened to leaves.

## Example

```rust
use svgscene::{Document, ElementType};

let mut doc = Document::new();
doc.load("scene.svg").unwrap();

if let Some(id) = doc.find_by_path("hud:score", true) {
    println!("{} at layer {}", doc.get(id).name, doc.get(id).layer);
}

for id in doc.all_elements_by_type(ElementType::Path) {
    let shape = doc.get(id).shape().unwrap();
    println!("{} subpaths", shape.subpaths.len());
}
```

What this library is not: a renderer (geometry is produced, drawing is
the caller's job), a CSS selector engine (only class selectors are
supported) and not a general XML library.

[`Document`]: struct.Document.html
*/

#![forbid(unsafe_code)]
#![warn(missing_docs)]

extern crate roxmltree;
extern crate simplecss;
extern crate slab;
extern crate svgtypes;
#[macro_use]
extern crate log;

mod css;
mod dom;
mod error;
mod parser;
mod types;

pub use css::{resolve_node_style, CssClass, CssStyleSheet, Property};
pub use dom::{
    Circle, Document, Element, ElementId, ElementKind, ElementType, Ellipse, Group, Image,
    Rectangle, Shape, Text, TextSpan, NO_NAME,
};
pub use error::Error;
pub use parser::parse_document;
pub use types::path::{
    flatten_commands, parse_path_data, subpaths_to_path_data, write_commands, PathCommand, Subpath,
};
pub use types::transform::{Matrix, Transform};
pub use types::{Point, Rect};

pub use svgtypes::Color;
