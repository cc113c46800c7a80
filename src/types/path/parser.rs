// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::f32::consts::PI;
use std::str;

use error::Error;
use types::Point;
use super::PathCommand;

/// Upper bound on interpreted coordinate groups. Guards against
/// pathological data spinning the interpreter loop.
const MAX_SEGMENTS: usize = 9999;

/// Interprets a `d` attribute into absolute, reflection-resolved commands.
///
/// Relative coordinates are made absolute as each point is emitted, the
/// `S`/`T` shorthand controls are reflected against the running state and
/// elliptical arcs are lowered to line runs. Empty data or data that does
/// not start with a moveto is rejected; an incomplete trailing coordinate
/// group is logged and the commands interpreted so far are returned.
pub fn parse_path_data(data: &str) -> Result<Vec<PathCommand>, Error> {
    let mut s = Scanner::new(data);
    if s.at_end() {
        return Err(Error::MalformedPathData);
    }

    let mut commands = Vec::new();
    let mut pos = Point::default();
    let mut subpath_start = Point::default();
    // Reflection state. Both collapse to `pos` after any command that is
    // not of their kind, which makes `2*pos - control` the identity there.
    let mut second_control = Point::default();
    let mut q_control = Point::default();
    let mut is_first = true;
    let mut segments = 0;

    'outer: while !s.at_end() {
        let cmd = match s.next_command() {
            Some(c) => c,
            None => {
                // data that never reaches a command letter is not a path
                if is_first {
                    return Err(Error::MalformedPathData);
                }
                warn!("unexpected token in path data, stopping");
                break;
            }
        };

        let relative = cmd.is_ascii_lowercase();
        let op = cmd.to_ascii_uppercase();

        if is_first && op != 'M' {
            return Err(Error::MalformedPathData);
        }
        is_first = false;

        let arity = match op {
            'M' | 'L' | 'T' => 2,
            'H' | 'V' => 1,
            'C' => 6,
            'S' | 'Q' => 4,
            'A' => 7,
            'Z' => 0,
            _ => {
                warn!("unsupported path command '{}', stopping", cmd);
                break;
            }
        };

        if op == 'Z' {
            commands.push(PathCommand::Close);
            pos = subpath_start;
            second_control = pos;
            q_control = pos;
            continue;
        }

        let mut group = [0.0f32; 7];
        let mut first_group = true;
        loop {
            if !first_group && !s.peek_number() {
                break;
            }

            segments += 1;
            if segments > MAX_SEGMENTS {
                warn!("path data exceeds {} segments, stopping", MAX_SEGMENTS);
                break 'outer;
            }

            if !s.take_numbers(&mut group[..arity]) {
                warn!("incomplete coordinate group for '{}', truncating path data", cmd);
                break 'outer;
            }

            match op {
                'M' => {
                    let end = abs(pos, group[0], group[1], relative);
                    if first_group {
                        commands.push(PathCommand::MoveTo(end));
                        subpath_start = end;
                    } else {
                        // extra moveto pairs are implicit linetos
                        commands.push(PathCommand::LineTo(end));
                    }
                    pos = end;
                    second_control = pos;
                    q_control = pos;
                }
                'L' => {
                    let end = abs(pos, group[0], group[1], relative);
                    commands.push(PathCommand::LineTo(end));
                    pos = end;
                    second_control = pos;
                    q_control = pos;
                }
                'H' => {
                    let x = if relative { pos.x + group[0] } else { group[0] };
                    pos = Point::new(x, pos.y);
                    commands.push(PathCommand::LineTo(pos));
                    second_control = pos;
                    q_control = pos;
                }
                'V' => {
                    let y = if relative { pos.y + group[0] } else { group[0] };
                    pos = Point::new(pos.x, y);
                    commands.push(PathCommand::LineTo(pos));
                    second_control = pos;
                    q_control = pos;
                }
                'C' => {
                    let c1 = abs(pos, group[0], group[1], relative);
                    let c2 = abs(pos, group[2], group[3], relative);
                    let end = abs(pos, group[4], group[5], relative);
                    commands.push(PathCommand::CurveTo(c1, c2, end));
                    second_control = c2;
                    pos = end;
                    q_control = pos;
                }
                'S' => {
                    let c1 = pos * 2.0 - second_control;
                    let c2 = abs(pos, group[0], group[1], relative);
                    let end = abs(pos, group[2], group[3], relative);
                    commands.push(PathCommand::CurveTo(c1, c2, end));
                    second_control = c2;
                    pos = end;
                    q_control = pos;
                }
                'Q' => {
                    let c = abs(pos, group[0], group[1], relative);
                    let end = abs(pos, group[2], group[3], relative);
                    commands.push(PathCommand::QuadTo(c, end));
                    q_control = c;
                    pos = end;
                    second_control = pos;
                }
                'T' => {
                    let c = pos * 2.0 - q_control;
                    let end = abs(pos, group[0], group[1], relative);
                    commands.push(PathCommand::QuadTo(c, end));
                    q_control = c;
                    pos = end;
                    second_control = pos;
                }
                'A' => {
                    let end = abs(pos, group[5], group[6], relative);
                    flatten_arc(
                        &mut commands,
                        pos,
                        end,
                        group[0],
                        group[1],
                        group[2],
                        group[3] != 0.0,
                        group[4] != 0.0,
                    );
                    pos = end;
                    second_control = pos;
                    q_control = pos;
                }
                _ => unreachable!(),
            }

            first_group = false;
        }
    }

    Ok(commands)
}

fn abs(pos: Point, x: f32, y: f32, relative: bool) -> Point {
    if relative {
        Point::new(pos.x + x, pos.y + y)
    } else {
        Point::new(x, y)
    }
}

/// Lowers one elliptical arc to a line run via the center parameterization.
///
/// Degenerate radii and coincident endpoints collapse to a single line.
/// Out-of-range radii are scaled up until the arc exists; the sweep flag
/// picks the angular direction and the final sample lands exactly on `to`.
fn flatten_arc(
    out: &mut Vec<PathCommand>,
    from: Point,
    to: Point,
    rx: f32,
    ry: f32,
    x_rotation: f32,
    large_arc: bool,
    sweep: bool,
) {
    let mut rx = rx.abs();
    let mut ry = ry.abs();
    if rx == 0.0 || ry == 0.0 || from == to {
        out.push(PathCommand::LineTo(to));
        return;
    }

    let phi = x_rotation.to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();

    // endpoints in the axis-aligned frame, relative to the midpoint
    let dx2 = (from.x - to.x) / 2.0;
    let dy2 = (from.y - to.y) / 2.0;
    let x1p = cos_phi * dx2 + sin_phi * dy2;
    let y1p = -sin_phi * dx2 + cos_phi * dy2;

    let lambda = x1p * x1p / (rx * rx) + y1p * y1p / (ry * ry);
    if lambda > 1.0 {
        let s = lambda.sqrt();
        rx *= s;
        ry *= s;
    }

    let rx2 = rx * rx;
    let ry2 = ry * ry;
    let num = rx2 * ry2 - rx2 * y1p * y1p - ry2 * x1p * x1p;
    let den = rx2 * y1p * y1p + ry2 * x1p * x1p;
    let mut coef = (num.max(0.0) / den).sqrt();
    if large_arc == sweep {
        coef = -coef;
    }

    let cxp = coef * rx * y1p / ry;
    let cyp = -coef * ry * x1p / rx;
    let cx = cos_phi * cxp - sin_phi * cyp + (from.x + to.x) / 2.0;
    let cy = sin_phi * cxp + cos_phi * cyp + (from.y + to.y) / 2.0;

    let theta1 = ((y1p - cyp) / ry).atan2((x1p - cxp) / rx);
    let theta2 = ((-y1p - cyp) / ry).atan2((-x1p - cxp) / rx);
    let mut delta = theta2 - theta1;
    if sweep && delta < 0.0 {
        delta += 2.0 * PI;
    } else if !sweep && delta > 0.0 {
        delta -= 2.0 * PI;
    }

    let steps = ((delta.abs() / (2.0 * PI)) * super::CIRCLE_RESOLUTION as f32)
        .ceil()
        .max(2.0) as usize;
    for k in 1..steps {
        let a = theta1 + delta * k as f32 / steps as f32;
        let x = rx * a.cos();
        let y = ry * a.sin();
        out.push(PathCommand::LineTo(Point::new(
            cos_phi * x - sin_phi * y + cx,
            sin_phi * x + cos_phi * y + cy,
        )));
    }
    out.push(PathCommand::LineTo(to));
}

/// A cursor over path data that lexes command letters and floats directly,
/// with commas and whitespace as interchangeable separators.
struct Scanner<'a> {
    text: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(text: &str) -> Scanner {
        Scanner { text: text.as_bytes(), pos: 0 }
    }

    fn skip_separators(&mut self) {
        while let Some(&b) = self.text.get(self.pos) {
            if b == b',' || (b as char).is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn at_end(&mut self) -> bool {
        self.skip_separators();
        self.pos >= self.text.len()
    }

    fn next_command(&mut self) -> Option<char> {
        self.skip_separators();
        let b = *self.text.get(self.pos)?;
        if b.is_ascii_alphabetic() {
            self.pos += 1;
            Some(b as char)
        } else {
            None
        }
    }

    fn peek_number(&mut self) -> bool {
        self.skip_separators();
        match self.text.get(self.pos) {
            Some(&b) => b.is_ascii_digit() || b == b'+' || b == b'-' || b == b'.',
            None => false,
        }
    }

    /// Lexes one float: sign, digits, at most one decimal point and an
    /// optional exponent. A second `-`, `+` or `.` starts the next number,
    /// so runs like `1-2` and `.5.5` split correctly.
    fn next_number(&mut self) -> Option<f32> {
        self.skip_separators();
        let t = self.text;
        let start = self.pos;
        let mut i = self.pos;

        if i < t.len() && (t[i] == b'+' || t[i] == b'-') {
            i += 1;
        }

        let mut has_digits = false;
        while i < t.len() && t[i].is_ascii_digit() {
            i += 1;
            has_digits = true;
        }

        if i < t.len() && t[i] == b'.' {
            i += 1;
            while i < t.len() && t[i].is_ascii_digit() {
                i += 1;
                has_digits = true;
            }
        }

        if !has_digits {
            return None;
        }

        if i < t.len() && (t[i] == b'e' || t[i] == b'E') {
            let mut j = i + 1;
            if j < t.len() && (t[j] == b'+' || t[j] == b'-') {
                j += 1;
            }
            let mut exp_digits = false;
            while j < t.len() && t[j].is_ascii_digit() {
                j += 1;
                exp_digits = true;
            }
            if exp_digits {
                i = j;
            }
        }

        let v = str::from_utf8(&t[start..i]).ok()?.parse().ok()?;
        self.pos = i;
        Some(v)
    }

    fn take_numbers(&mut self, buf: &mut [f32]) -> bool {
        for slot in buf.iter_mut() {
            match self.next_number() {
                Some(v) => *slot = v,
                None => return false,
            }
        }
        true
    }
}
