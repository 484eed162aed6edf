use crate::geom::Vec2;
use crate::path::Subpath;

const ARC_TOLERANCE: f32 = 0.1;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LineCap {
    Round,
    Butt,
    Square,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LineJoin {
    Round,
    Bevel,
}

/// Line attributes for stroking. There is deliberately no miter join, so
/// no join can spike unboundedly at acute angles.
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeStyle {
    pub width: f32,
    pub cap: LineCap,
    pub join: LineJoin,
    pub dash: Vec<f32>,
    pub dash_offset: f32,
}

impl Default for StrokeStyle {
    fn default() -> StrokeStyle {
        StrokeStyle {
            width: 1.0,
            cap: LineCap::Round,
            join: LineJoin::Round,
            dash: Vec::new(),
            dash_offset: 0.0,
        }
    }
}

/// Expands flattened subpaths into closed outline subpaths that fill to
/// the stroked shape under the nonzero rule. A non-positive width strokes
/// nothing.
pub fn stroke_outline(subpaths: &[Subpath], style: &StrokeStyle) -> Vec<Subpath> {
    let mut out = Vec::new();
    if !(style.width > 0.0) {
        return out;
    }
    let hw = 0.5 * style.width;
    for sub in subpaths {
        for (run, closed) in dash_split(&sub.points, sub.closed, &style.dash, style.dash_offset) {
            let mut pts = dedup(&run);
            if closed {
                if pts.len() > 1 && pts.first() == pts.last() {
                    pts.pop();
                }
                if pts.len() >= 3 {
                    out.push(ring(&pts, hw, style.join));
                    let rev: Vec<Vec2> = pts.iter().rev().cloned().collect();
                    out.push(ring(&rev, hw, style.join));
                    continue;
                }
            }
            if pts.len() >= 2 {
                stroke_open(&pts, hw, style, &mut out);
            }
        }
    }
    out
}

/// Left-offset ring around a closed polygon, one join per vertex. The
/// stroke body is the region between this ring traversed forward and the
/// same ring of the reversed polygon.
fn ring(pts: &[Vec2], hw: f32, join: LineJoin) -> Subpath {
    let n = pts.len();
    let mut dirs = Vec::with_capacity(n);
    for i in 0..n {
        dirs.push((pts[(i + 1) % n] - pts[i]).normalized());
    }
    let mut points = Vec::new();
    for i in 0..n {
        let d_in = dirs[(i + n - 1) % n];
        join_offsets(&mut points, pts[i], d_in, dirs[i], hw, join);
    }
    Subpath {
        points,
        closed: true,
    }
}

fn stroke_open(pts: &[Vec2], hw: f32, style: &StrokeStyle, out: &mut Vec<Subpath>) {
    let n = pts.len();
    let mut dirs = Vec::with_capacity(n - 1);
    for i in 0..n - 1 {
        dirs.push((pts[i + 1] - pts[i]).normalized());
    }

    let mut points = Vec::new();
    points.push(pts[0] + dirs[0].perp() * hw);
    for i in 1..n - 1 {
        join_offsets(&mut points, pts[i], dirs[i - 1], dirs[i], hw, style.join);
    }
    let d_end = dirs[n - 2];
    points.push(pts[n - 1] + d_end.perp() * hw);
    cap(&mut points, pts[n - 1], d_end, hw, style.cap);

    points.push(pts[n - 1] - d_end.perp() * hw);
    for i in (1..n - 1).rev() {
        join_offsets(&mut points, pts[i], -dirs[i], -dirs[i - 1], hw, style.join);
    }
    points.push(pts[0] - dirs[0].perp() * hw);
    cap(&mut points, pts[0], -dirs[0], hw, style.cap);

    out.push(Subpath {
        points,
        closed: true,
    });
}

/// Joins the incoming and outgoing offset points at a vertex. Round
/// joins arc the short way on both sides; the inner-side fold this
/// produces is swallowed by the nonzero fill.
fn join_offsets(out: &mut Vec<Vec2>, p: Vec2, d_in: Vec2, d_out: Vec2, hw: f32, join: LineJoin) {
    let from = d_in.perp() * hw;
    let to = d_out.perp() * hw;
    out.push(p + from);
    if let LineJoin::Round = join {
        arc(out, p, from, to);
    }
    out.push(p + to);
}

/// Cap shape at an endpoint. `d` points outward, away from the path; the
/// caller has already emitted `p + perp(d)*hw` and emits `p - perp(d)*hw`
/// next.
fn cap(out: &mut Vec<Vec2>, p: Vec2, d: Vec2, hw: f32, cap: LineCap) {
    let a = d.perp() * hw;
    match cap {
        LineCap::Butt => {}
        LineCap::Square => {
            out.push(p + a + d * hw);
            out.push(p - a + d * hw);
        }
        LineCap::Round => {
            let tip = d * hw;
            arc(out, p, a, tip);
            out.push(p + tip);
            arc(out, p, tip, -a);
        }
    }
}

/// Appends the interior points of a polygonal arc from radius vector
/// `from` to `to` around `center`, stepped at the chord tolerance
/// `cos(step) = 1 - 2*tol/r`.
fn arc(out: &mut Vec<Vec2>, center: Vec2, from: Vec2, to: Vec2) {
    let radius = from.length();
    if radius <= 0.0 {
        return;
    }
    let mut total = from.cross(to).atan2(from.dot(to));
    if total == 0.0 {
        if from.dot(to) >= 0.0 {
            return;
        }
        total = std::f32::consts::PI;
    }
    let step = (1.0 - 2.0 * (ARC_TOLERANCE / radius)).max(-1.0).acos();
    let steps = ((total.abs() / step).ceil() as usize).max(1);
    let delta = total / steps as f32;
    let (sin_d, cos_d) = (delta.sin(), delta.cos());
    let mut v = from;
    for _ in 1..steps {
        v = Vec2::new(cos_d * v.x - sin_d * v.y, sin_d * v.x + cos_d * v.y);
        out.push(center + v);
    }
}

fn dedup(points: &[Vec2]) -> Vec<Vec2> {
    let mut out: Vec<Vec2> = Vec::with_capacity(points.len());
    for &p in points {
        if out.last() != Some(&p) {
            out.push(p);
        }
    }
    out
}

/// Splits a polyline into "on" runs per the dash pattern, cycling
/// through the on/off lengths and carrying the phase across the whole
/// polyline. An empty or degenerate pattern leaves the polyline whole.
fn dash_split(
    points: &[Vec2],
    closed: bool,
    pattern: &[f32],
    offset: f32,
) -> Vec<(Vec<Vec2>, bool)> {
    let total: f32 = pattern.iter().sum();
    let valid = !pattern.is_empty()
        && total > 0.0
        && pattern.iter().all(|l| l.is_finite() && *l >= 0.0);
    if !valid || points.len() < 2 {
        return vec![(points.to_vec(), closed)];
    }

    let mut idx = 0;
    let mut rem = pattern[0];
    let mut phase = offset.rem_euclid(total);
    while phase > 0.0 {
        if phase >= rem {
            phase -= rem;
            idx = (idx + 1) % pattern.len();
            rem = pattern[idx];
        } else {
            rem -= phase;
            phase = 0.0;
        }
    }

    let mut walk: Vec<Vec2> = points.to_vec();
    if closed && walk.first() != walk.last() {
        walk.push(walk[0]);
    }

    let mut on = idx % 2 == 0;
    let mut runs = Vec::new();
    let mut run: Vec<Vec2> = Vec::new();
    if on {
        run.push(walk[0]);
    }
    for pair in walk.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let len = a.distance(b);
        if len == 0.0 {
            continue;
        }
        let dir = (b - a) * (1.0 / len);
        let mut pos = 0.0;
        while len - pos > rem {
            pos += rem;
            let p = a + dir * pos;
            if on {
                run.push(p);
                runs.push(std::mem::replace(&mut run, Vec::new()));
            } else {
                run.clear();
                run.push(p);
            }
            on = !on;
            idx = (idx + 1) % pattern.len();
            rem = pattern[idx];
        }
        rem -= len - pos;
        if on {
            run.push(b);
        }
    }
    if on && run.len() >= 2 {
        runs.push(run);
    }
    runs.into_iter().map(|r| (r, false)).collect()
}
