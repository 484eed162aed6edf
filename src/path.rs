use crate::geom::Vec2;

const TOLERANCE: f32 = 0.1;

/// Upper bound on segments produced for one curve, so pathological
/// control points cannot stall flattening.
const MAX_CURVE_SEGMENTS: usize = 256;

/// A single connected run of device-space points, started by a move and
/// optionally closed. A closed subpath's point list ends with a copy of
/// its start point.
#[derive(Clone, Debug, PartialEq)]
pub struct Subpath {
    pub points: Vec<Vec2>,
    pub closed: bool,
}

/// An ordered list of subpaths, append-only during construction. Curves
/// are flattened to line segments as they are added; every coordinate is
/// expected to be in device space already.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    pub subpaths: Vec<Subpath>,
    open: bool,
}

impl Path {
    pub fn new() -> Path {
        Path {
            subpaths: Vec::new(),
            open: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.subpaths.is_empty()
    }

    pub fn move_to(&mut self, point: Vec2) -> &mut Self {
        if self.open {
            let last = self.subpaths.last_mut().unwrap();
            if last.points.len() == 1 {
                // lone start point: restart in place
                last.points[0] = point;
                return self;
            }
        }
        self.subpaths.push(Subpath {
            points: vec![point],
            closed: false,
        });
        self.open = true;
        self
    }

    pub fn line_to(&mut self, point: Vec2) -> &mut Self {
        if !self.open {
            return self.move_to(point);
        }
        self.subpaths.last_mut().unwrap().points.push(point);
        self
    }

    pub fn quadratic_to(&mut self, control: Vec2, point: Vec2) -> &mut Self {
        if !self.open {
            self.move_to(control);
        }
        let current = *self.subpaths.last().unwrap().points.last().unwrap();
        let a_x = current.x - 2.0 * control.x + point.x;
        let a_y = current.y - 2.0 * control.y + point.y;
        let dt = curve_step(a_x * a_x + a_y * a_y);
        let points = &mut self.subpaths.last_mut().unwrap().points;
        let mut t = dt;
        while t < 1.0 {
            let p12 = Vec2::lerp(t, current, control);
            let p23 = Vec2::lerp(t, control, point);
            points.push(Vec2::lerp(t, p12, p23));
            t += dt;
        }
        points.push(point);
        self
    }

    pub fn cubic_to(&mut self, control1: Vec2, control2: Vec2, point: Vec2) -> &mut Self {
        if !self.open {
            self.move_to(control1);
        }
        let current = *self.subpaths.last().unwrap().points.last().unwrap();
        let a_x = -current.x + 3.0 * control1.x - 3.0 * control2.x + point.x;
        let b_x = 3.0 * (current.x - 2.0 * control1.x + control2.x);
        let a_y = -current.y + 3.0 * control1.y - 3.0 * control2.y + point.y;
        let b_y = 3.0 * (current.y - 2.0 * control1.y + control2.y);
        let conc = (b_x * b_x + b_y * b_y).max((a_x + b_x) * (a_x + b_x) + (a_y + b_y) * (a_y + b_y));
        let dt = curve_step(conc);
        let points = &mut self.subpaths.last_mut().unwrap().points;
        let mut t = dt;
        while t < 1.0 {
            let p12 = Vec2::lerp(t, current, control1);
            let p23 = Vec2::lerp(t, control1, control2);
            let p34 = Vec2::lerp(t, control2, point);
            let p123 = Vec2::lerp(t, p12, p23);
            let p234 = Vec2::lerp(t, p23, p34);
            points.push(Vec2::lerp(t, p123, p234));
            t += dt;
        }
        points.push(point);
        self
    }

    /// Appends the start point of the current subpath, forming a closed
    /// edge. No-op when there is no open subpath.
    pub fn close(&mut self) -> &mut Self {
        if self.open {
            let sub = self.subpaths.last_mut().unwrap();
            let start = sub.points[0];
            if *sub.points.last().unwrap() != start {
                sub.points.push(start);
            }
            sub.closed = true;
            self.open = false;
        }
        self
    }

    /// Ends the current subpath without closing it; the next `line_to`
    /// starts a fresh one.
    pub fn new_subpath(&mut self) -> &mut Self {
        self.open = false;
        self
    }

    pub fn clear(&mut self) {
        self.subpaths.clear();
        self.open = false;
    }
}

/// Parameter step for the flatness bound `dt = (8*tol^2/conc)^(1/4)`,
/// clamped so one curve never flattens to more than `MAX_CURVE_SEGMENTS`
/// segments. A degenerate curve (conc == 0) yields an infinite step and
/// flattens to its chord.
fn curve_step(conc: f32) -> f32 {
    let dt = ((8.0 * TOLERANCE * TOLERANCE) / conc).sqrt().sqrt();
    dt.max(1.0 / MAX_CURVE_SEGMENTS as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_to_starts_a_subpath() {
        let mut path = Path::new();
        path.line_to(Vec2::new(3.0, 4.0)).line_to(Vec2::new(5.0, 6.0));
        assert_eq!(path.subpaths.len(), 1);
        assert_eq!(path.subpaths[0].points[0], Vec2::new(3.0, 4.0));
        assert_eq!(path.subpaths[0].points.len(), 2);
    }

    #[test]
    fn close_on_empty_path_is_noop() {
        let mut path = Path::new();
        path.close();
        assert!(path.is_empty());
    }

    #[test]
    fn close_appends_start_point() {
        let mut path = Path::new();
        path.move_to(Vec2::new(1.0, 1.0))
            .line_to(Vec2::new(9.0, 1.0))
            .line_to(Vec2::new(9.0, 9.0))
            .close();
        let sub = &path.subpaths[0];
        assert!(sub.closed);
        assert_eq!(*sub.points.last().unwrap(), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn move_to_replaces_lone_start() {
        let mut path = Path::new();
        path.move_to(Vec2::new(1.0, 1.0)).move_to(Vec2::new(2.0, 2.0));
        assert_eq!(path.subpaths.len(), 1);
        assert_eq!(path.subpaths[0].points, vec![Vec2::new(2.0, 2.0)]);
    }

    #[test]
    fn degenerate_quadratic_is_a_chord() {
        let mut path = Path::new();
        let p = Vec2::new(10.0, 10.0);
        path.move_to(p).quadratic_to(p, Vec2::new(20.0, 10.0));
        // control on the start point: no curvature, just the endpoints
        assert_eq!(path.subpaths[0].points.len(), 2);
    }

    #[test]
    fn cubic_flattening_is_bounded() {
        let mut path = Path::new();
        path.move_to(Vec2::new(0.0, 0.0)).cubic_to(
            Vec2::new(1e7, -1e7),
            Vec2::new(-1e7, 1e7),
            Vec2::new(100.0, 0.0),
        );
        assert!(path.subpaths[0].points.len() <= MAX_CURVE_SEGMENTS + 1);
        assert_eq!(*path.subpaths[0].points.last().unwrap(), Vec2::new(100.0, 0.0));
    }

    #[test]
    fn flattened_quadratic_stays_near_curve() {
        let mut path = Path::new();
        path.move_to(Vec2::new(0.0, 0.0))
            .quadratic_to(Vec2::new(50.0, 100.0), Vec2::new(100.0, 0.0));
        let points = &path.subpaths[0].points;
        assert!(points.len() > 4);
        // all points must lie within the control hull's y range
        for p in points {
            assert!(p.y >= -TOLERANCE && p.y <= 50.0 + TOLERANCE);
        }
    }

    #[test]
    fn clear_resets_everything() {
        let mut path = Path::new();
        path.move_to(Vec2::new(1.0, 2.0)).line_to(Vec2::new(3.0, 4.0));
        path.clear();
        assert!(path.is_empty());
        path.line_to(Vec2::new(7.0, 8.0));
        assert_eq!(path.subpaths[0].points[0], Vec2::new(7.0, 8.0));
    }
}
