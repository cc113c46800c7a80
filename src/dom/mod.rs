// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The scene graph: arena-backed document, typed elements and queries.
//!
//! Elements live in a slab arena and reference each other through
//! [`ElementId`] handles, so identity comparison and in-place replacement
//! are index operations rather than pointer games. The [`Document`] owns
//! the arena, the visible root children, the defs collection and the
//! document-level attributes.
//!
//! [`Document`]: struct.Document.html
//! [`ElementId`]: struct.ElementId.html

use std::fmt::Write;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use slab::Slab;
use svgtypes::Color;

use error::Error;
use types::path::Subpath;
use types::{Point, Rect};

/// Name assigned to elements without an `id` attribute.
pub const NO_NAME: &str = "No Name";

/// A stable handle to an element in the document arena.
///
/// Handles stay valid for the lifetime of the document that produced them;
/// using a handle from another document is a logic error and may panic.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ElementId(pub(crate) usize);

/// The variant tag of an element.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ElementType {
    Document,
    Group,
    Path,
    Rectangle,
    Circle,
    Ellipse,
    Image,
    Text,
}

impl ElementType {
    pub fn name(&self) -> &'static str {
        match *self {
            ElementType::Document => "document",
            ElementType::Group => "group",
            ElementType::Path => "path",
            ElementType::Rectangle => "rectangle",
            ElementType::Circle => "circle",
            ElementType::Ellipse => "ellipse",
            ElementType::Image => "image",
            ElementType::Text => "text",
        }
    }
}

/// Drawable geometry with its resolved paint.
///
/// `fill`/`stroke` are `None` for the explicit `none` paint; `stroke_width`
/// is `0` when the stroke is `none`.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Shape {
    pub subpaths: Vec<Subpath>,
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f32,
}

/// A rectangle, keeping its authored bounds next to the baked outline.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Rectangle {
    pub rect: Rect,
    pub shape: Shape,
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct Circle {
    pub radius: f32,
    pub shape: Shape,
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct Ellipse {
    pub radius_x: f32,
    pub radius_y: f32,
    pub shape: Shape,
}

/// An image reference; decoding is the caller's job.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Image {
    pub width: f32,
    pub height: f32,
    pub file_path: PathBuf,
}

/// One positioned run of text.
#[derive(Clone, PartialEq, Debug)]
pub struct TextSpan {
    pub text: String,
    pub position: Point,
    pub font_family: String,
    pub font_size: f32,
    pub color: Color,
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct Text {
    pub spans: Vec<TextSpan>,
    pub font_directory: String,
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct Group {
    pub children: Vec<ElementId>,
}

/// Per-variant element payload.
#[derive(Clone, PartialEq, Debug)]
pub enum ElementKind {
    Group(Group),
    Path(Shape),
    Rectangle(Rectangle),
    Circle(Circle),
    Ellipse(Ellipse),
    Image(Image),
    Text(Text),
}

/// A scene element: shared attributes plus the variant payload.
///
/// Rectangle/Circle/Ellipse geometry is baked into parent coordinates at
/// build time; Path/Text/Image/Group keep `position`/`rotation`/`scale`
/// as live state to be applied by the consumer.
#[derive(Clone, PartialEq, Debug)]
pub struct Element {
    pub name: String,
    pub position: Point,
    pub rotation: f32,
    pub scale: Point,
    pub layer: f32,
    pub visible: bool,
    pub kind: ElementKind,
}

impl Element {
    /// Creates an element with default attributes around a payload.
    pub fn new(kind: ElementKind) -> Element {
        Element {
            name: NO_NAME.to_string(),
            position: Point::default(),
            rotation: 0.0,
            scale: Point::new(1.0, 1.0),
            layer: 0.0,
            visible: true,
            kind,
        }
    }

    pub fn element_type(&self) -> ElementType {
        match self.kind {
            ElementKind::Group(_) => ElementType::Group,
            ElementKind::Path(_) => ElementType::Path,
            ElementKind::Rectangle(_) => ElementType::Rectangle,
            ElementKind::Circle(_) => ElementType::Circle,
            ElementKind::Ellipse(_) => ElementType::Ellipse,
            ElementKind::Image(_) => ElementType::Image,
            ElementKind::Text(_) => ElementType::Text,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.element_type().name()
    }

    pub fn is_group(&self) -> bool {
        match self.kind {
            ElementKind::Group(_) => true,
            _ => false,
        }
    }

    /// The drawable shape of path-like variants.
    pub fn shape(&self) -> Option<&Shape> {
        match self.kind {
            ElementKind::Path(ref s) => Some(s),
            ElementKind::Rectangle(ref r) => Some(&r.shape),
            ElementKind::Circle(ref c) => Some(&c.shape),
            ElementKind::Ellipse(ref e) => Some(&e.shape),
            _ => None,
        }
    }

    fn first_span_text(&self) -> Option<&str> {
        match self.kind {
            ElementKind::Text(ref t) => t.spans.first().map(|s| s.text.as_str()),
            _ => None,
        }
    }
}

/// A loaded SVG scene.
///
/// Created empty; [`load`] parses a file into a fresh document and swaps
/// it in only on success, so a failed reload keeps the previous tree.
///
/// [`load`]: #method.load
#[derive(Clone, Debug, Default)]
pub struct Document {
    pub(crate) elements: Slab<Element>,
    pub(crate) children: Vec<ElementId>,
    pub(crate) defs: Vec<ElementId>,
    pub(crate) bounds: Rect,
    pub(crate) viewbox: Rect,
    pub(crate) total_layers: u32,
    pub(crate) name: String,
    pub(crate) source_path: Option<PathBuf>,
    pub(crate) fonts_directory: Option<String>,
}

impl Document {
    /// Creates an empty document.
    pub fn new() -> Document {
        Document::default()
    }

    /// Parses a document from an in-memory string.
    pub fn from_data(text: &str) -> Result<Document, Error> {
        ::parser::parse_document(text, None, None)
    }

    /// Loads and parses a file, replacing the current contents.
    ///
    /// On failure the document is left untouched.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let doc = ::parser::parse_document(&text, Some(path), self.fonts_directory.clone())?;
        *self = doc;
        Ok(())
    }

    /// Parses the previously loaded file again.
    pub fn reload(&mut self) -> Result<(), Error> {
        match self.source_path.clone() {
            Some(path) => self.load(path),
            None => Err(Error::SourceUnreadable(io::Error::new(
                io::ErrorKind::NotFound,
                "no file was loaded",
            ))),
        }
    }

    /// Overrides the directory text elements resolve fonts from.
    ///
    /// A trailing separator is appended when missing. Takes effect on the
    /// next `load`/`reload`.
    pub fn set_fonts_directory(&mut self, dir: &str) {
        let mut dir = dir.to_string();
        if !dir.is_empty() && !dir.ends_with('/') {
            dir.push('/');
        }
        self.fonts_directory = Some(dir);
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn viewbox(&self) -> Rect {
        self.viewbox
    }

    /// Number of layer indices assigned while building.
    pub fn total_layers(&self) -> u32 {
        self.total_layers
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The visible top-level elements, in document order.
    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    /// The defs collection; referenced by `<use>`, never drawn directly.
    pub fn defs(&self) -> &[ElementId] {
        &self.defs
    }

    pub fn get(&self, id: ElementId) -> &Element {
        &self.elements[id.0]
    }

    pub fn get_mut(&mut self, id: ElementId) -> &mut Element {
        &mut self.elements[id.0]
    }

    /// Adds an element to the arena and returns its handle.
    ///
    /// The element is not visible until a child slot references it, which
    /// is what makes it usable as a [`replace`] target.
    ///
    /// [`replace`]: #method.replace
    pub fn create_element(&mut self, element: Element) -> ElementId {
        ElementId(self.elements.insert(element))
    }

    /// Finds the first element matching a colon-separated name path.
    ///
    /// A `*` segment matches the next segment at any depth. Concrete
    /// segments compare by equality when `strict`, by substring otherwise;
    /// non-strict matching against an unnamed text element falls back to
    /// its first span's contents.
    pub fn find_by_path(&self, path: &str, strict: bool) -> Option<ElementId> {
        let segments: Vec<&str> = path.split(':').collect();
        self.search(&self.children, &segments, strict)
    }

    fn search(&self, ids: &[ElementId], segments: &[&str], strict: bool) -> Option<ElementId> {
        if segments.is_empty() {
            return None;
        }

        let wildcard = segments[0] == "*";
        let (segment, rest) = if wildcard {
            if segments.len() < 2 {
                return None;
            }
            (segments[1], &segments[2..])
        } else {
            (segments[0], &segments[1..])
        };

        for &id in ids {
            let el = self.get(id);
            if self.segment_matches(el, segment, strict) {
                if rest.is_empty() {
                    return Some(id);
                }
                if let ElementKind::Group(ref g) = el.kind {
                    if let Some(found) = self.search(&g.children, rest, strict) {
                        return Some(found);
                    }
                }
            } else if wildcard {
                // the wildcard stays active while descending
                if let ElementKind::Group(ref g) = el.kind {
                    if let Some(found) = self.search(&g.children, segments, strict) {
                        return Some(found);
                    }
                }
            }
        }

        None
    }

    fn segment_matches(&self, el: &Element, segment: &str, strict: bool) -> bool {
        if strict {
            return el.name == segment;
        }

        if el.name.contains(segment) {
            return true;
        }

        if el.name == NO_NAME {
            if let Some(text) = el.first_span_text() {
                return text.contains(segment);
            }
        }

        false
    }

    /// Direct children of the group at `group_path` (the root when empty)
    /// that have the given type.
    pub fn elements_by_type(&self, ty: ElementType, group_path: &str) -> Vec<ElementId> {
        let ids: &[ElementId] = if group_path.is_empty() {
            &self.children
        } else {
            match self.find_by_path(group_path, false) {
                Some(id) => match self.get(id).kind {
                    ElementKind::Group(ref g) => &g.children,
                    _ => return Vec::new(),
                },
                None => return Vec::new(),
            }
        };

        ids.iter()
            .cloned()
            .filter(|&id| self.get(id).element_type() == ty)
            .collect()
    }

    /// Every leaf of the given type, in depth-first document order.
    pub fn all_elements_by_type(&self, ty: ElementType) -> Vec<ElementId> {
        self.flatten_all()
            .into_iter()
            .filter(|&id| self.get(id).element_type() == ty)
            .collect()
    }

    /// Every leaf element, depth-first; groups themselves are excluded.
    pub fn flatten_all(&self) -> Vec<ElementId> {
        let mut out = Vec::new();
        self.flatten_into(&self.children, &mut out);
        out
    }

    fn flatten_into(&self, ids: &[ElementId], out: &mut Vec<ElementId>) {
        for &id in ids {
            match self.get(id).kind {
                ElementKind::Group(ref g) => self.flatten_into(&g.children, out),
                _ => out.push(id),
            }
        }
    }

    /// Direct children of a group with a matching name.
    pub fn children_named(&self, parent: ElementId, name: &str, strict: bool) -> Vec<ElementId> {
        match self.get(parent).kind {
            ElementKind::Group(ref g) => g
                .children
                .iter()
                .cloned()
                .filter(|&id| self.segment_matches(self.get(id), name, strict))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Swaps the child slot holding `old` for `new`, by identity.
    ///
    /// Searches the whole visible tree; returns whether a slot was found.
    pub fn replace(&mut self, old: ElementId, new: ElementId) -> bool {
        if let Some(pos) = self.children.iter().position(|&c| c == old) {
            self.children[pos] = new;
            return true;
        }

        let group_ids: Vec<usize> = self
            .elements
            .iter()
            .filter(|&(_, el)| el.is_group())
            .map(|(i, _)| i)
            .collect();

        for gi in group_ids {
            if let ElementKind::Group(ref mut g) = self.elements[gi].kind {
                if let Some(pos) = g.children.iter().position(|&c| c == old) {
                    g.children[pos] = new;
                    return true;
                }
            }
        }

        false
    }

    /// Dumps the tree as `<type> - <name>` lines, indented by depth
    /// starting from `indent` levels.
    pub fn tree_to_string(&self, indent: usize) -> String {
        let mut out = String::new();
        for &id in &self.children {
            self.append_node(id, indent, &mut out);
        }
        out
    }

    fn append_node(&self, id: ElementId, depth: usize, out: &mut String) {
        let el = self.get(id);
        for _ in 0..depth {
            out.push_str("   ");
        }
        let _ = writeln!(out, "{} - {}", el.type_name(), el.name);
        if let ElementKind::Group(ref g) = el.kind {
            for &child in &g.children {
                self.append_node(child, depth + 1, out);
            }
        }
    }
}
