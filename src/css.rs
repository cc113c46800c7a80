// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Style classes and the cascade resolver.
//!
//! A document's `<style>` blocks parse once into a [`CssStyleSheet`] of
//! named classes. [`resolve_node_style`] then folds the cascade for one
//! node: ambient class, `class` attribute lookups, presentation
//! attributes, the `style` attribute and finally `display`, later tiers
//! overriding earlier ones key by key.
//!
//! [`CssStyleSheet`]: struct.CssStyleSheet.html
//! [`resolve_node_style`]: fn.resolve_node_style.html

use std::collections::HashMap;

use roxmltree;
use simplecss;
use svgtypes::Color;

/// One declared property value with its typed interpretations.
///
/// The raw source string is kept; float/int/color views are resolved at
/// construction and return `None` when the source does not parse as that
/// type. The literal token `none` is a present-but-none value, distinct
/// from an absent property.
#[derive(Clone, PartialEq, Debug)]
pub struct Property {
    src: String,
    fvalue: Option<f32>,
    ivalue: Option<i32>,
    cvalue: Option<Color>,
}

impl Property {
    /// Creates a property from a raw declaration value.
    ///
    /// A trailing `px` unit is stripped before numeric interpretation.
    pub fn new(src: &str) -> Property {
        let src = src.trim();
        let numeric = strip_px(src);
        let fvalue = numeric.parse().ok();
        let ivalue = numeric.parse().ok().or_else(|| fvalue.map(|v: f32| v as i32));
        let cvalue = src.parse().ok();

        Property {
            src: src.to_string(),
            fvalue,
            ivalue,
            cvalue,
        }
    }

    /// The raw source string.
    pub fn source(&self) -> &str {
        &self.src
    }

    /// Checks whether the value is the literal `none` token.
    pub fn is_none(&self) -> bool {
        self.src.eq_ignore_ascii_case("none")
    }

    pub fn as_float(&self, default: f32) -> f32 {
        self.fvalue.unwrap_or(default)
    }

    pub fn as_int(&self, default: i32) -> i32 {
        self.ivalue.unwrap_or(default)
    }

    /// The value as a color, if it parses as one.
    pub fn as_color(&self) -> Option<Color> {
        self.cvalue
    }
}

fn strip_px(s: &str) -> &str {
    if s.len() > 2 && s.ends_with("px") {
        &s[..s.len() - 2]
    } else {
        s
    }
}

/// A named set of properties; also the shape of a resolved cascade.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct CssClass {
    pub name: String,
    properties: HashMap<String, Property>,
}

impl CssClass {
    pub fn set(&mut self, key: &str, value: &str) {
        self.properties.insert(key.to_string(), Property::new(value));
    }

    pub fn get(&self, key: &str) -> Option<&Property> {
        self.properties.get(key)
    }

    pub fn has(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Checks that the property is present and is the `none` token.
    pub fn is_none(&self, key: &str) -> bool {
        self.get(key).map_or(false, |p| p.is_none())
    }

    pub fn float(&self, key: &str, default: f32) -> f32 {
        self.get(key).map_or(default, |p| p.as_float(default))
    }

    /// The property's color value; `None` when absent, `none` or unparsable.
    pub fn color(&self, key: &str) -> Option<Color> {
        self.get(key).and_then(|p| p.as_color())
    }

    pub fn string(&self, key: &str) -> Option<&str> {
        self.get(key).map(|p| p.source())
    }

    /// Copies every property of `other` over this class.
    pub fn merge(&mut self, other: &CssClass) {
        for (key, value) in &other.properties {
            self.properties.insert(key.clone(), value.clone());
        }
    }
}

/// The document stylesheet: class name → class.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct CssStyleSheet {
    classes: HashMap<String, CssClass>,
}

impl CssStyleSheet {
    /// Parses a `<style>` block.
    ///
    /// Only class selectors are supported; other selector kinds are logged
    /// and their declaration blocks skipped. Tokenizer failures stop the
    /// parse, keeping the classes collected so far.
    pub fn parse(text: &str) -> CssStyleSheet {
        use simplecss::Token as CssToken;

        let mut sheet = CssStyleSheet::default();

        if text.trim().is_empty() {
            return sheet;
        }

        let mut tokenizer = simplecss::Tokenizer::new(text);
        let mut selectors: Vec<&str> = Vec::new();

        'root: loop {
            selectors.clear();

            // list of selectors
            loop {
                let token = match tokenizer.parse_next() {
                    Ok(t) => t,
                    Err(e) => {
                        warn!("stylesheet parsing stopped cause {:?}", e);
                        break 'root;
                    }
                };

                match token {
                    CssToken::EndOfStream => break 'root,
                    CssToken::BlockStart => break,
                    CssToken::Comma => continue,
                    CssToken::ClassSelector(name) => selectors.push(name),
                    _ => {
                        // only simple class selectors are supported
                        warn!("unsupported CSS selector: {:?}", token);
                    }
                }
            }

            // list of declarations
            loop {
                let token = match tokenizer.parse_next() {
                    Ok(t) => t,
                    Err(e) => {
                        warn!("stylesheet parsing stopped cause {:?}", e);
                        break 'root;
                    }
                };

                match token {
                    CssToken::Declaration(name, value) => {
                        for selector in &selectors {
                            let class = sheet
                                .classes
                                .entry(selector.to_string())
                                .or_insert_with(|| CssClass {
                                    name: selector.to_string(),
                                    ..CssClass::default()
                                });
                            class.set(name, value);
                        }
                    }
                    CssToken::BlockEnd => break,
                    CssToken::EndOfStream => break 'root,
                    _ => {}
                }
            }
        }

        sheet
    }

    pub fn class(&self, name: &str) -> Option<&CssClass> {
        self.classes.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Attributes that participate in the cascade directly.
const PRESENTATION_ATTRIBUTES: &[&str] =
    &["fill", "stroke", "stroke-width", "font-family", "font-size"];

/// Resolves the effective style of one node.
///
/// Precedence, later tiers overriding earlier ones per key:
/// ambient class, `class` attribute (comma-separated, in list order),
/// presentation attributes, the `style` attribute, then `display`.
pub fn resolve_node_style(
    node: roxmltree::Node,
    ambient: Option<&CssClass>,
    sheet: &CssStyleSheet,
) -> CssClass {
    let mut resolved = CssClass::default();

    if let Some(ambient) = ambient {
        resolved.merge(ambient);
    }

    if let Some(list) = node.attribute("class") {
        for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match sheet.class(name) {
                Some(class) => resolved.merge(class),
                None => warn!("class '{}' is not in the stylesheet", name),
            }
        }
    }

    for &key in PRESENTATION_ATTRIBUTES {
        if let Some(value) = node.attribute(key) {
            if key == "font-family" {
                let stripped = value.replace('"', "").replace('\'', "");
                resolved.set(key, &stripped);
            } else {
                resolved.set(key, value);
            }
        }
    }

    if let Some(style) = node.attribute("style") {
        for pair in style.split(';') {
            let mut parts = pair.splitn(2, ':');
            let key = parts.next().unwrap_or("").trim();
            let value = parts.next().unwrap_or("").trim();
            if !key.is_empty() && !value.is_empty() {
                resolved.set(key, value);
            }
        }
    }

    // 'display' always wins
    if let Some(display) = node.attribute("display") {
        resolved.set("display", display);
    }

    resolved
}
