// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The `transform` attribute resolver.
//!
//! A transform string is resolved into a translation, a per-axis scale and
//! a rotation in degrees. The keyword form (`translate`/`rotate`/`scale`)
//! is composed as translate∘rotate∘scale and applied once to the input
//! position. A `matrix(a,b,c,d,e,f)` form takes precedence and is
//! decomposed into the same triple instead.

use types::Point;

/// A 2x3 affine matrix in SVG order: `[a b c d e f]`.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Matrix {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Matrix {
    /// The identity matrix.
    pub fn identity() -> Matrix {
        Matrix { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 }
    }

    /// A pure translation.
    pub fn translation(tx: f32, ty: f32) -> Matrix {
        Matrix { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: tx, f: ty }
    }

    /// A rotation about the origin, in degrees.
    pub fn rotation(degrees: f32) -> Matrix {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Matrix { a: cos, b: sin, c: -sin, d: cos, e: 0.0, f: 0.0 }
    }

    /// A per-axis scale.
    pub fn scaling(sx: f32, sy: f32) -> Matrix {
        Matrix { a: sx, b: 0.0, c: 0.0, d: sy, e: 0.0, f: 0.0 }
    }

    /// Matrix product `self * other`, i.e. `other` is applied first.
    pub fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    /// The matrix for an element's local transform: translate, then rotate,
    /// then scale.
    pub fn compose(position: Point, rotation: f32, scale: Point) -> Matrix {
        let mut m = Matrix::translation(position.x, position.y);
        if rotation != 0.0 {
            m = m.multiply(&Matrix::rotation(rotation));
        }
        m.multiply(&Matrix::scaling(scale.x, scale.y))
    }

    /// Applies the matrix to a point.
    pub fn transform_point(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }
}

/// A resolved transform: where the input position ended up, plus the
/// decomposed scale/rotation components.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Transform {
    /// The input position after the whole transform was applied to it,
    /// or `(e, f)` for the matrix form.
    pub position: Point,
    /// Per-axis scale. Defaults to `(1, 1)`.
    pub scale: Point,
    /// Rotation in degrees. Defaults to `0`.
    pub rotation: f32,
    /// `true` when the string carried an explicit `matrix(...)` form.
    pub explicit_matrix: bool,
}

impl Transform {
    /// Resolves a transform string against an input position.
    ///
    /// Keywords absent from the string leave their component at the
    /// identity default.
    pub fn resolve(input: &str, position: Point) -> Transform {
        let mut ts = Transform {
            position,
            scale: Point::new(1.0, 1.0),
            rotation: 0.0,
            explicit_matrix: false,
        };

        let mut m = Matrix::identity();

        if let Some(t) = keyword_args(input, "translate") {
            m = Matrix::translation(t.x, t.y);
        }

        if let Some(r) = keyword_args(input, "rotate") {
            ts.rotation = r.x;
            if ts.rotation != 0.0 {
                m = m.multiply(&Matrix::rotation(ts.rotation));
            }
        }

        if let Some(s) = keyword_args(input, "scale") {
            ts.scale = s;
            m = m.multiply(&Matrix::scaling(s.x, s.y));
        }

        ts.position = m.transform_point(position);

        if let Some(mat) = matrix_args(input) {
            ts.position = Point::new(mat[4], mat[5]);
            ts.scale.x = (mat[0] * mat[0] + mat[1] * mat[1]).sqrt() * mat[0].signum();
            ts.scale.y = (mat[2] * mat[2] + mat[3] * mat[3]).sqrt() * mat[3].signum();
            ts.rotation = mat[2].atan2(mat[3]).to_degrees();
            if !(ts.scale.x < 0.0 && ts.scale.y < 0.0) {
                ts.rotation = -ts.rotation;
            }
            ts.explicit_matrix = true;
        }

        ts
    }
}

/// Extracts the parenthesized argument list following `keyword`.
fn keyword_body<'a>(input: &'a str, keyword: &str) -> Option<&'a str> {
    let start = input.find(keyword)? + keyword.len();
    let rest = &input[start..];
    let open = rest.find('(')?;
    if !rest[..open].trim().is_empty() {
        return None;
    }
    let rest = &rest[open + 1..];
    let close = rest.find(')')?;
    Some(&rest[..close])
}

/// Parses `keyword(x[,y])`; a missing second argument defaults to the first.
fn keyword_args(input: &str, keyword: &str) -> Option<Point> {
    let body = keyword_body(input, keyword)?;
    let nums = number_list(body);
    match nums.len() {
        0 => None,
        1 => Some(Point::new(nums[0], nums[0])),
        _ => Some(Point::new(nums[0], nums[1])),
    }
}

fn matrix_args(input: &str) -> Option<[f32; 6]> {
    let body = keyword_body(input, "matrix")?;
    let nums = number_list(body);
    if nums.len() != 6 {
        return None;
    }
    Some([nums[0], nums[1], nums[2], nums[3], nums[4], nums[5]])
}

fn number_list(s: &str) -> Vec<f32> {
    s.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .filter_map(|t| t.parse::<f32>().ok())
        .collect()
}
