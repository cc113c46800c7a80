// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The scene graph builder.
//!
//! Walks the XML tree, resolves each node's style and transform and
//! instantiates typed elements into a fresh [`Document`]. Node-level
//! problems degrade to warnings and defaults so one malformed shape never
//! aborts the whole document; only an unreadable source, malformed markup
//! or a missing root `svg` element fail the load.
//!
//! [`Document`]: ../struct.Document.html

use std::path::{Path, PathBuf};

use roxmltree;
use svgtypes::{Color, ViewBox};

use css::{resolve_node_style, CssClass, CssStyleSheet};
use dom::{
    Circle, Document, Element, ElementId, ElementKind, Ellipse, Group, Image, Rectangle, Shape,
    Text, TextSpan, NO_NAME,
};
use error::Error;
use types::path::{
    circle_subpath, ellipse_subpath, flatten_commands, parse_path_data, rect_subpath,
    rounded_rect_subpath, Subpath,
};
use types::transform::{Matrix, Transform};
use types::{Point, Rect};

/// Parses SVG text into a document.
///
/// `path` locates relative image references and the sibling `fonts/`
/// directory; `fonts_directory` overrides the latter when set.
pub fn parse_document(
    text: &str,
    path: Option<&Path>,
    fonts_directory: Option<String>,
) -> Result<Document, Error> {
    let xml = roxmltree::Document::parse(text)?;
    let svg = xml.root_element();
    if !svg.has_tag_name("svg") {
        return Err(Error::NoSvgElement);
    }

    let x = attr_f32(svg, "x", 0.0);
    let y = attr_f32(svg, "y", 0.0);
    let vb: Option<ViewBox> = svg.attribute("viewBox").and_then(|v| v.parse().ok());

    let width = opt_attr_f32(svg, "width")
        .or_else(|| vb.map(|vb| vb.w as f32))
        .unwrap_or(0.0);
    let height = opt_attr_f32(svg, "height")
        .or_else(|| vb.map(|vb| vb.h as f32))
        .unwrap_or(0.0);

    let bounds = Rect::new(x, y, width, height);
    let viewbox = vb
        .map(|vb| Rect::new(vb.x as f32, vb.y as f32, vb.w as f32, vb.h as f32))
        .unwrap_or(bounds);

    // all style blocks merge into one stylesheet
    let mut css_text = String::new();
    for style in xml.descendants().filter(|n| n.has_tag_name("style")) {
        if let Some(text) = style.text() {
            css_text.push_str(text);
            css_text.push('\n');
        }
    }
    let sheet = CssStyleSheet::parse(&css_text);

    let folder = path
        .and_then(|p| p.parent())
        .map(|p| p.to_path_buf())
        .unwrap_or_default();

    let mut font_directory = String::new();
    let fonts_path = folder.join("fonts");
    if fonts_path.is_dir() {
        font_directory = format!("{}/", fonts_path.display());
    }
    if let Some(dir) = fonts_directory.clone() {
        font_directory = dir;
    }

    let mut doc = Document::new();
    doc.bounds = bounds;
    doc.viewbox = viewbox;
    doc.source_path = path.map(|p| p.to_path_buf());
    doc.fonts_directory = fonts_directory;
    doc.name = path
        .and_then(|p| p.file_stem())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut builder = Builder { doc, sheet, folder, font_directory };
    let children = builder.build_children(svg, None);
    builder.doc.children = children;

    Ok(builder.doc)
}

struct Builder {
    doc: Document,
    sheet: CssStyleSheet,
    folder: PathBuf,
    font_directory: String,
}

impl Builder {
    fn build_children(
        &mut self,
        parent: roxmltree::Node,
        ambient: Option<&CssClass>,
    ) -> Vec<ElementId> {
        let mut out = Vec::new();

        for child in parent.children().filter(|c| c.is_element()) {
            if child.has_tag_name("defs") {
                // defs are reachable only through 'use'
                let def_ids = self.build_children(child, None);
                self.doc.defs.extend(def_ids);
                continue;
            }

            if child.has_tag_name("style") {
                continue;
            }

            if let Some(id) = self.build_element(child, ambient) {
                out.push(id);
            }
        }

        out
    }

    fn build_element(
        &mut self,
        node: roxmltree::Node,
        ambient: Option<&CssClass>,
    ) -> Option<ElementId> {
        match node.tag_name().name() {
            "g" => self.build_group(node),
            "use" => self.build_use(node),
            "rect" => self.build_rect(node, ambient),
            "circle" => self.build_circle(node, ambient),
            "ellipse" => self.build_ellipse(node, ambient),
            "line" => self.build_line(node, ambient),
            "polyline" => self.build_poly(node, ambient, false),
            "polygon" => self.build_poly(node, ambient, true),
            "path" => self.build_path(node, ambient),
            "image" => self.build_image(node),
            "text" => self.build_text(node, ambient),
            _ => None,
        }
    }

    /// A group resets the ambient style: its own resolved style becomes
    /// the base of the cascade for the whole subtree.
    fn build_group(&mut self, node: roxmltree::Node) -> Option<ElementId> {
        if !node.children().any(|c| c.is_element()) {
            return None;
        }

        let style = resolve_node_style(node, None, &self.sheet);
        let layer = self.next_layer();
        let children = self.build_children(node, Some(&style));

        let mut el = Element::new(ElementKind::Group(Group { children }));
        el.name = name_of(node);
        el.layer = layer;
        el.visible = !style.is_none("display");
        Some(self.doc.create_element(el))
    }

    fn build_use(&mut self, node: roxmltree::Node) -> Option<ElementId> {
        let href = node
            .attribute("href")
            .or_else(|| node.attribute(("http://www.w3.org/1999/xlink", "href")));

        let href = match href {
            Some(h) => h,
            None => {
                warn!("'use' element without a reference was skipped");
                return None;
            }
        };

        if !href.starts_with('#') {
            warn!("unsupported 'use' reference: '{}'", href);
            return None;
        }
        let target = &href[1..];

        let def_id = self
            .doc
            .defs
            .iter()
            .cloned()
            .find(|&d| self.doc.get(d).name == target);

        let def_id = match def_id {
            Some(d) => d,
            None => {
                warn!("'use' reference '#{}' was not found in defs", target);
                return None;
            }
        };

        if self.doc.get(def_id).is_group() {
            warn!("'use' of a group def '#{}' is not supported", target);
            return None;
        }

        // deep value copy, not a shared reference
        let mut el = self.doc.get(def_id).clone();

        if let Some(id) = node.attribute("id") {
            el.name = id.to_string();
        }

        if let Some(ts) = node.attribute("transform") {
            let t = Transform::resolve(ts, el.position);
            el.position = t.position;
            el.rotation = t.rotation;
            el.scale = t.scale;
        }

        if node.attribute("display") == Some("none") {
            el.visible = false;
        }

        el.layer = self.next_layer();
        Some(self.doc.create_element(el))
    }

    fn build_rect(
        &mut self,
        node: roxmltree::Node,
        ambient: Option<&CssClass>,
    ) -> Option<ElementId> {
        let style = resolve_node_style(node, ambient, &self.sheet);

        let x = attr_f32(node, "x", 0.0);
        let y = attr_f32(node, "y", 0.0);
        let width = attr_f32(node, "width", 0.0);
        let height = attr_f32(node, "height", 0.0);
        let radius = corner_radius(node);

        let mut shape = Shape::default();
        shape.subpaths.push(if radius > 0.0 {
            rounded_rect_subpath(0.0, 0.0, width, height, radius)
        } else {
            rect_subpath(0.0, 0.0, width, height)
        });
        resolve_paint(&style, &mut shape);

        let invisible = shape.fill.is_none() && shape.stroke.is_none();

        let t = self.resolve_transform(node, Point::new(x, y));
        bake(&mut shape, &t);

        let mut el = Element::new(ElementKind::Rectangle(Rectangle {
            rect: Rect::new(x, y, width, height),
            shape,
        }));
        el.position = t.position;
        el.rotation = t.rotation;
        el.scale = t.scale;
        self.finish(node, &style, &mut el);
        if invisible {
            el.visible = false;
        }
        Some(self.doc.create_element(el))
    }

    fn build_circle(
        &mut self,
        node: roxmltree::Node,
        ambient: Option<&CssClass>,
    ) -> Option<ElementId> {
        let style = resolve_node_style(node, ambient, &self.sheet);

        let cx = attr_f32(node, "cx", 0.0);
        let cy = attr_f32(node, "cy", 0.0);
        let radius = attr_f32(node, "r", 0.0);

        let mut shape = Shape::default();
        shape.subpaths.push(circle_subpath(Point::default(), radius));
        resolve_paint(&style, &mut shape);

        let t = self.resolve_transform(node, Point::new(cx, cy));
        bake(&mut shape, &t);

        let mut el = Element::new(ElementKind::Circle(Circle { radius, shape }));
        el.position = t.position;
        el.rotation = t.rotation;
        el.scale = t.scale;
        self.finish(node, &style, &mut el);
        Some(self.doc.create_element(el))
    }

    fn build_ellipse(
        &mut self,
        node: roxmltree::Node,
        ambient: Option<&CssClass>,
    ) -> Option<ElementId> {
        let style = resolve_node_style(node, ambient, &self.sheet);

        let cx = attr_f32(node, "cx", 0.0);
        let cy = attr_f32(node, "cy", 0.0);
        let rx = attr_f32(node, "rx", 0.0);
        let ry = attr_f32(node, "ry", 0.0);

        let mut shape = Shape::default();
        shape.subpaths.push(ellipse_subpath(Point::default(), rx, ry));
        resolve_paint(&style, &mut shape);

        let t = self.resolve_transform(node, Point::new(cx, cy));
        bake(&mut shape, &t);

        let mut el = Element::new(ElementKind::Ellipse(Ellipse {
            radius_x: rx,
            radius_y: ry,
            shape,
        }));
        el.position = t.position;
        el.rotation = t.rotation;
        el.scale = t.scale;
        self.finish(node, &style, &mut el);
        Some(self.doc.create_element(el))
    }

    fn build_line(
        &mut self,
        node: roxmltree::Node,
        ambient: Option<&CssClass>,
    ) -> Option<ElementId> {
        let style = resolve_node_style(node, ambient, &self.sheet);

        let p1 = Point::new(attr_f32(node, "x1", 0.0), attr_f32(node, "y1", 0.0));
        let p2 = Point::new(attr_f32(node, "x2", 0.0), attr_f32(node, "y2", 0.0));

        let mut shape = Shape::default();
        shape.subpaths.push(Subpath { points: vec![p1, p2], closed: false });
        resolve_paint(&style, &mut shape);

        let mut el = Element::new(ElementKind::Path(shape));
        self.finish(node, &style, &mut el);
        Some(self.doc.create_element(el))
    }

    fn build_poly(
        &mut self,
        node: roxmltree::Node,
        ambient: Option<&CssClass>,
        close: bool,
    ) -> Option<ElementId> {
        let style = resolve_node_style(node, ambient, &self.sheet);

        let nums = number_list(node.attribute("points").unwrap_or(""));
        let points: Vec<Point> = nums
            .chunks(2)
            .filter(|pair| pair.len() == 2)
            .map(|pair| Point::new(pair[0], pair[1]))
            .collect();

        let closed = close && points.len() > 2;
        let mut shape = Shape::default();
        shape.subpaths.push(Subpath { points, closed });
        resolve_paint(&style, &mut shape);

        let mut el = Element::new(ElementKind::Path(shape));
        self.finish(node, &style, &mut el);
        Some(self.doc.create_element(el))
    }

    fn build_path(
        &mut self,
        node: roxmltree::Node,
        ambient: Option<&CssClass>,
    ) -> Option<ElementId> {
        let style = resolve_node_style(node, ambient, &self.sheet);

        let data = node.attribute("d").unwrap_or("");
        let commands = match parse_path_data(data) {
            Ok(commands) => commands,
            Err(e) => {
                warn!("skipping path '{}' cause {}", name_of(node), e);
                return None;
            }
        };

        let mut shape = Shape::default();
        shape.subpaths = flatten_commands(&commands);
        resolve_paint(&style, &mut shape);

        let mut el = Element::new(ElementKind::Path(shape));
        self.finish(node, &style, &mut el);
        Some(self.doc.create_element(el))
    }

    fn build_image(&mut self, node: roxmltree::Node) -> Option<ElementId> {
        let style = resolve_node_style(node, None, &self.sheet);

        let x = attr_f32(node, "x", 0.0);
        let y = attr_f32(node, "y", 0.0);
        let width = attr_f32(node, "width", 0.0);
        let height = attr_f32(node, "height", 0.0);

        let href = node
            .attribute("href")
            .or_else(|| node.attribute(("http://www.w3.org/1999/xlink", "href")))
            .unwrap_or("");

        let t = self.resolve_transform(node, Point::new(x, y));

        let mut el = Element::new(ElementKind::Image(Image {
            width,
            height,
            file_path: self.folder.join(href),
        }));
        el.position = t.position;
        el.rotation = t.rotation;
        el.scale = t.scale;
        self.finish(node, &style, &mut el);
        Some(self.doc.create_element(el))
    }

    fn build_text(
        &mut self,
        node: roxmltree::Node,
        ambient: Option<&CssClass>,
    ) -> Option<ElementId> {
        let style = resolve_node_style(node, ambient, &self.sheet);

        let x = attr_f32(node, "x", 0.0);
        let y = attr_f32(node, "y", 0.0);

        let mut spans = Vec::new();
        let tspans: Vec<roxmltree::Node> = node
            .children()
            .filter(|c| c.has_tag_name("tspan"))
            .collect();

        if !tspans.is_empty() {
            for tspan in tspans {
                let span_style = resolve_node_style(tspan, Some(&style), &self.sheet);
                spans.push(make_span(tspan, &span_style, x, y));
            }
        } else if node.first_child().is_some() {
            spans.push(make_span(node, &style, x, y));
        }

        let t = self.resolve_transform(node, Point::default());

        let mut el = Element::new(ElementKind::Text(Text {
            spans,
            font_directory: self.font_directory.clone(),
        }));
        el.position = t.position;
        el.rotation = t.rotation;
        el.scale = t.scale;
        self.finish(node, &style, &mut el);
        Some(self.doc.create_element(el))
    }

    fn resolve_transform(&self, node: roxmltree::Node, position: Point) -> Transform {
        Transform::resolve(node.attribute("transform").unwrap_or(""), position)
    }

    /// Common element attributes: name, layer index, display override.
    fn finish(&mut self, node: roxmltree::Node, style: &CssClass, el: &mut Element) {
        el.name = name_of(node);
        el.layer = self.next_layer();
        if style.is_none("display") {
            el.visible = false;
        }
    }

    fn next_layer(&mut self) -> f32 {
        let layer = self.doc.total_layers;
        self.doc.total_layers += 1;
        layer as f32
    }
}

fn make_span(node: roxmltree::Node, style: &CssClass, default_x: f32, default_y: f32) -> TextSpan {
    TextSpan {
        text: node.text().unwrap_or("").trim().to_string(),
        position: Point::new(
            attr_f32(node, "x", default_x),
            attr_f32(node, "y", default_y),
        ),
        font_family: style.string("font-family").unwrap_or("Arial").to_string(),
        font_size: style.float("font-size", 18.0),
        color: style.color("fill").unwrap_or(Color::new(0, 0, 0)),
    }
}

/// Fills paint from the resolved style.
///
/// An entirely absent fill defaults to black; the stroke width defaults to
/// 1 only when a stroke color is set without an explicit width.
fn resolve_paint(style: &CssClass, shape: &mut Shape) {
    shape.fill = if !style.has("fill") {
        Some(Color::new(0, 0, 0))
    } else if style.is_none("fill") {
        None
    } else {
        Some(style.color("fill").unwrap_or(Color::new(0, 0, 0)))
    };

    shape.stroke = if style.has("stroke") && !style.is_none("stroke") {
        Some(style.color("stroke").unwrap_or(Color::new(0, 0, 0)))
    } else {
        None
    };

    shape.stroke_width = if style.has("stroke-width") {
        if style.is_none("stroke-width") {
            0.0
        } else {
            style.float("stroke-width", 1.0)
        }
    } else if shape.stroke.is_some() {
        1.0
    } else {
        0.0
    };
}

/// Applies the resolved transform to every outline vertex.
fn bake(shape: &mut Shape, t: &Transform) {
    let m = Matrix::compose(t.position, t.rotation, t.scale);
    for subpath in &mut shape.subpaths {
        for p in &mut subpath.points {
            *p = m.transform_point(*p);
        }
    }
}

fn name_of(node: roxmltree::Node) -> String {
    node.attribute("id").unwrap_or(NO_NAME).to_string()
}

fn corner_radius(node: roxmltree::Node) -> f32 {
    let parse = |value: Option<&str>| {
        value
            .map(str::trim)
            .filter(|v| !v.eq_ignore_ascii_case("none"))
            .and_then(|v| v.parse().ok())
            .unwrap_or(0.0)
    };
    let rx: f32 = parse(node.attribute("rx"));
    let ry: f32 = parse(node.attribute("ry"));
    rx.max(ry)
}

fn opt_attr_f32(node: roxmltree::Node, name: &str) -> Option<f32> {
    node.attribute(name)
        .and_then(|v| strip_px(v.trim()).parse().ok())
}

fn attr_f32(node: roxmltree::Node, name: &str, default: f32) -> f32 {
    opt_attr_f32(node, name).unwrap_or(default)
}

fn strip_px(s: &str) -> &str {
    if s.len() > 2 && s.ends_with("px") {
        &s[..s.len() - 2]
    } else {
        s
    }
}

fn number_list(s: &str) -> Vec<f32> {
    s.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .filter_map(|t| t.parse().ok())
        .collect()
}
