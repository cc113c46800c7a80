// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Flattened path geometry.
//!
//! Path data is interpreted in two stages. The interpreter in
//! [`parse_path_data`] resolves the stateful mini-language (relative
//! coordinates, smooth-curve reflection, elliptical arcs) into a flat list
//! of absolute [`PathCommand`]s, with arcs already lowered to line runs.
//! [`flatten_commands`] then samples the remaining curves into polyline
//! [`Subpath`]s, which is the representation every scene element carries.
//!
//! [`PathCommand`]: enum.PathCommand.html
//! [`Subpath`]: struct.Subpath.html
//! [`parse_path_data`]: fn.parse_path_data.html
//! [`flatten_commands`]: fn.flatten_commands.html

use std::f32::consts::PI;
use std::fmt::Write;

use types::Point;

mod parser;

pub use self::parser::parse_path_data;

/// Curve sampling steps for one cubic/quadratic segment.
const CURVE_RESOLUTION: usize = 20;

/// Sampling steps for a full circle or ellipse outline.
const CIRCLE_RESOLUTION: usize = 32;

/// An absolute drawing command with any shorthand state already resolved.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum PathCommand {
    /// Starts a new subpath.
    MoveTo(Point),
    LineTo(Point),
    /// Cubic segment: control 1, control 2, end.
    CurveTo(Point, Point, Point),
    /// Quadratic segment: control, end.
    QuadTo(Point, Point),
    /// Closes the current subpath.
    Close,
}

/// One contiguous polyline within a path, independently closable.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Subpath {
    pub points: Vec<Point>,
    pub closed: bool,
}

impl Subpath {
    /// Serializes the subpath as absolute move/line/close path data.
    pub fn to_path_data(&self) -> String {
        let mut out = String::new();
        for (i, p) in self.points.iter().enumerate() {
            let op = if i == 0 { 'M' } else { 'L' };
            let _ = write!(out, "{}{},{} ", op, p.x, p.y);
        }
        if self.closed && !self.points.is_empty() {
            out.push('Z');
        }
        out.trim_end().to_string()
    }
}

/// Serializes a list of subpaths as one path-data string.
pub fn subpaths_to_path_data(subpaths: &[Subpath]) -> String {
    let parts: Vec<String> = subpaths.iter().map(|s| s.to_path_data()).collect();
    parts.join(" ")
}

/// Serializes resolved commands back to absolute path data.
pub fn write_commands(commands: &[PathCommand]) -> String {
    let mut out = String::new();
    for cmd in commands {
        match *cmd {
            PathCommand::MoveTo(p) => {
                let _ = write!(out, "M{},{} ", p.x, p.y);
            }
            PathCommand::LineTo(p) => {
                let _ = write!(out, "L{},{} ", p.x, p.y);
            }
            PathCommand::CurveTo(c1, c2, p) => {
                let _ = write!(out, "C{},{} {},{} {},{} ", c1.x, c1.y, c2.x, c2.y, p.x, p.y);
            }
            PathCommand::QuadTo(c, p) => {
                let _ = write!(out, "Q{},{} {},{} ", c.x, c.y, p.x, p.y);
            }
            PathCommand::Close => {
                out.push_str("Z ");
            }
        }
    }
    out.trim_end().to_string()
}

/// Samples curves and assembles commands into polyline subpaths.
pub fn flatten_commands(commands: &[PathCommand]) -> Vec<Subpath> {
    let mut subpaths = Vec::new();
    let mut current = Subpath::default();
    let mut pos = Point::default();

    for cmd in commands {
        match *cmd {
            PathCommand::MoveTo(p) => {
                if !current.points.is_empty() {
                    subpaths.push(current);
                    current = Subpath::default();
                }
                current.points.push(p);
                pos = p;
            }
            PathCommand::LineTo(p) => {
                current.points.push(p);
                pos = p;
            }
            PathCommand::CurveTo(c1, c2, p) => {
                for k in 1..CURVE_RESOLUTION + 1 {
                    let t = k as f32 / CURVE_RESOLUTION as f32;
                    current.points.push(cubic_point(pos, c1, c2, p, t));
                }
                pos = p;
            }
            PathCommand::QuadTo(c, p) => {
                for k in 1..CURVE_RESOLUTION + 1 {
                    let t = k as f32 / CURVE_RESOLUTION as f32;
                    current.points.push(quadratic_point(pos, c, p, t));
                }
                pos = p;
            }
            PathCommand::Close => {
                current.closed = true;
                if let Some(&start) = current.points.first() {
                    pos = start;
                }
                subpaths.push(current);
                current = Subpath::default();
            }
        }
    }

    if !current.points.is_empty() {
        subpaths.push(current);
    }

    subpaths
}

fn cubic_point(p0: Point, c1: Point, c2: Point, p1: Point, t: f32) -> Point {
    let u = 1.0 - t;
    p0 * (u * u * u) + c1 * (3.0 * u * u * t) + c2 * (3.0 * u * t * t) + p1 * (t * t * t)
}

fn quadratic_point(p0: Point, c: Point, p1: Point, t: f32) -> Point {
    let u = 1.0 - t;
    p0 * (u * u) + c * (2.0 * u * t) + p1 * (t * t)
}

/// A closed ellipse outline about `center`.
pub fn ellipse_subpath(center: Point, rx: f32, ry: f32) -> Subpath {
    let mut points = Vec::with_capacity(CIRCLE_RESOLUTION);
    for k in 0..CIRCLE_RESOLUTION {
        let a = k as f32 / CIRCLE_RESOLUTION as f32 * 2.0 * PI;
        points.push(Point::new(center.x + rx * a.cos(), center.y + ry * a.sin()));
    }
    Subpath { points, closed: true }
}

/// A closed circle outline about `center`.
pub fn circle_subpath(center: Point, radius: f32) -> Subpath {
    ellipse_subpath(center, radius, radius)
}

/// A closed axis-aligned rectangle outline.
pub fn rect_subpath(x: f32, y: f32, width: f32, height: f32) -> Subpath {
    Subpath {
        points: vec![
            Point::new(x, y),
            Point::new(x + width, y),
            Point::new(x + width, y + height),
            Point::new(x, y + height),
        ],
        closed: true,
    }
}

/// A closed rectangle outline with rounded corners of `radius`.
pub fn rounded_rect_subpath(x: f32, y: f32, width: f32, height: f32, radius: f32) -> Subpath {
    let r = radius.min(width / 2.0).min(height / 2.0);
    if r <= 0.0 {
        return rect_subpath(x, y, width, height);
    }

    // corner centers, clockwise from top-right, with the quarter-arc
    // start angle for each
    let corners = [
        (Point::new(x + width - r, y + r), -PI / 2.0),
        (Point::new(x + width - r, y + height - r), 0.0),
        (Point::new(x + r, y + height - r), PI / 2.0),
        (Point::new(x + r, y + r), PI),
    ];

    let steps = CIRCLE_RESOLUTION / 4;
    let mut points = Vec::new();
    for &(center, start) in corners.iter() {
        for k in 0..steps + 1 {
            let a = start + k as f32 / steps as f32 * PI / 2.0;
            points.push(Point::new(center.x + r * a.cos(), center.y + r * a.sin()));
        }
    }

    Subpath { points, closed: true }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatten_lines() {
        let cmds = [
            PathCommand::MoveTo(Point::new(0.0, 0.0)),
            PathCommand::LineTo(Point::new(10.0, 0.0)),
            PathCommand::LineTo(Point::new(10.0, 10.0)),
            PathCommand::Close,
        ];

        let subpaths = flatten_commands(&cmds);
        assert_eq!(subpaths.len(), 1);
        assert!(subpaths[0].closed);
        assert_eq!(
            subpaths[0].points,
            vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 10.0),
            ]
        );
    }

    #[test]
    fn flatten_curve_hits_endpoint() {
        let end = Point::new(30.0, 0.0);
        let cmds = [
            PathCommand::MoveTo(Point::new(0.0, 0.0)),
            PathCommand::CurveTo(Point::new(10.0, 20.0), Point::new(20.0, 20.0), end),
        ];

        let subpaths = flatten_commands(&cmds);
        assert_eq!(subpaths.len(), 1);
        assert_eq!(*subpaths[0].points.last().unwrap(), end);
    }

    #[test]
    fn second_move_starts_new_subpath() {
        let cmds = [
            PathCommand::MoveTo(Point::new(0.0, 0.0)),
            PathCommand::LineTo(Point::new(1.0, 0.0)),
            PathCommand::MoveTo(Point::new(5.0, 5.0)),
            PathCommand::LineTo(Point::new(6.0, 5.0)),
        ];

        let subpaths = flatten_commands(&cmds);
        assert_eq!(subpaths.len(), 2);
        assert!(!subpaths[0].closed);
        assert!(!subpaths[1].closed);
    }

    #[test]
    fn rect_outline_is_closed() {
        let sub = rect_subpath(1.0, 2.0, 10.0, 20.0);
        assert!(sub.closed);
        assert_eq!(sub.points.len(), 4);
        assert_eq!(sub.points[2], Point::new(11.0, 22.0));
    }

    #[test]
    fn serialized_subpath_round_trips() {
        let cmds = [
            PathCommand::MoveTo(Point::new(0.0, 0.0)),
            PathCommand::LineTo(Point::new(10.5, 0.0)),
            PathCommand::LineTo(Point::new(10.5, -3.25)),
            PathCommand::Close,
        ];

        let subpaths = flatten_commands(&cmds);
        let data = subpaths_to_path_data(&subpaths);
        let reparsed = flatten_commands(&parse_path_data(&data).unwrap());
        assert_eq!(subpaths, reparsed);
    }
}
