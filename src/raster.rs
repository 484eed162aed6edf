use crate::geom::Vec2;
use crate::path::Subpath;

/// Policy for deciding path interior from accumulated edge windings.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FillRule {
    NonZero,
    EvenOdd,
}

/// A horizontal run of pixels on one row with uniform coverage,
/// half-open in x. The rasterizer's unit of output.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Span {
    pub y: i32,
    pub x0: i32,
    pub x1: i32,
    pub coverage: u8,
}

#[derive(Copy, Clone)]
struct Increment {
    x: i32,
    y: i32,
    area: f32,
    height: f32,
}

/// Converts closed polygon sets to anti-aliased coverage spans. Holds no
/// state across calls beyond its reusable increment buffer.
pub struct Rasterizer {
    increments: Vec<Increment>,
    width: f32,
    height: f32,
}

impl Rasterizer {
    pub fn new() -> Rasterizer {
        Rasterizer {
            increments: Vec::new(),
            width: 0.0,
            height: 0.0,
        }
    }

    /// Rasterizes the subpaths as one filled region, closing each subpath
    /// implicitly, and emits coverage spans clipped to `width` x `height`
    /// in row-major order.
    pub fn fill<F: FnMut(Span)>(
        &mut self,
        subpaths: &[Subpath],
        rule: FillRule,
        width: u32,
        height: u32,
        mut emit: F,
    ) {
        if width == 0 || height == 0 {
            return;
        }
        self.increments.clear();
        self.width = width as f32;
        self.height = height as f32;

        for sub in subpaths {
            if sub.points.len() < 2 {
                continue;
            }
            for pair in sub.points.windows(2) {
                self.edge(pair[0], pair[1]);
            }
            let first = sub.points[0];
            let last = *sub.points.last().unwrap();
            if last != first {
                self.edge(last, first);
            }
        }

        self.sweep(rule, width as i32, height as i32, &mut emit);
    }

    /// Clips one edge to the target and feeds the visible parts to the
    /// cell walker. The y range is clipped parametrically; the part left
    /// of x = 0 collapses onto the x = 0 boundary (same winding, full
    /// area at column zero); the part right of the target winds nothing
    /// visible and is dropped.
    fn edge(&mut self, p1: Vec2, p2: Vec2) {
        if p1.y == p2.y {
            return;
        }
        let w = self.width;
        let h = self.height;
        let dy = p2.y - p1.y;
        let ta = (0.0 - p1.y) / dy;
        let tb = (h - p1.y) / dy;
        let (ta, tb) = if ta < tb { (ta, tb) } else { (tb, ta) };
        let t0 = ta.max(0.0);
        let t1 = tb.min(1.0);
        if t0 >= t1 {
            return;
        }
        let a = Vec2::lerp(t0, p1, p2);
        let b = Vec2::lerp(t1, p1, p2);
        let a = Vec2::new(a.x, a.y.max(0.0).min(h));
        let b = Vec2::new(b.x, b.y.max(0.0).min(h));

        let mut ts = [0.0f32, 1.0, 1.0, 1.0];
        let mut count = 1;
        let dx = b.x - a.x;
        if dx != 0.0 {
            let mut c0 = (0.0 - a.x) / dx;
            let mut c1 = (w - a.x) / dx;
            if c0 > c1 {
                std::mem::swap(&mut c0, &mut c1);
            }
            if c0 > 0.0 && c0 < 1.0 {
                ts[count] = c0;
                count += 1;
            }
            if c1 > 0.0 && c1 < 1.0 {
                ts[count] = c1;
                count += 1;
            }
        }
        ts[count] = 1.0;

        for i in 0..count {
            let (u0, u1) = (ts[i], ts[i + 1]);
            if u0 >= u1 {
                continue;
            }
            let pa = Vec2::lerp(u0, a, b);
            let pb = Vec2::lerp(u1, a, b);
            let mid = 0.5 * (pa.x + pb.x);
            if mid >= w {
                continue;
            }
            if mid < 0.0 {
                self.walk(Vec2::new(0.0, pa.y), Vec2::new(0.0, pb.y));
            } else {
                self.walk(pa, pb);
            }
        }
    }

    /// Walks a line segment across the pixel grid, accumulating the
    /// signed area and height it contributes to each cell it passes
    /// through.
    fn walk(&mut self, p1: Vec2, p2: Vec2) {
        if p1.y == p2.y {
            return;
        }
        let x_dir = (p2.x - p1.x).signum() as i32;
        let y_dir = (p2.y - p1.y).signum() as i32;
        let dtdx = 1.0 / (p2.x - p1.x);
        let dtdy = 1.0 / (p2.y - p1.y);
        let mut x = p1.x.floor() as i32;
        let mut y = p1.y.floor() as i32;
        let mut row_t0: f32 = 0.0;
        let mut col_t0: f32 = 0.0;
        let mut row_t1 = {
            let next_y = if p2.y > p1.y { (y + 1) as f32 } else { y as f32 };
            (dtdy * (next_y - p1.y)).min(1.0)
        };
        let mut col_t1 = if p1.x == p2.x {
            std::f32::INFINITY
        } else {
            let next_x = if p2.x > p1.x { (x + 1) as f32 } else { x as f32 };
            (dtdx * (next_x - p1.x)).min(1.0)
        };
        let x_step = dtdx.abs();
        let y_step = dtdy.abs();

        loop {
            let t0 = row_t0.max(col_t0);
            let t1 = row_t1.min(col_t1);
            let q0 = Vec2::lerp(t0, p1, p2);
            let q1 = Vec2::lerp(t1, p1, p2);
            let height = q1.y - q0.y;
            let right = (x + 1) as f32;
            let area = 0.5 * height * ((right - q0.x) + (right - q1.x));

            self.increments.push(Increment { x, y, area, height });

            if row_t1 < col_t1 {
                row_t0 = row_t1;
                row_t1 = (row_t1 + y_step).min(1.0);
                if row_t0 == 1.0 {
                    break;
                } else {
                    y += y_dir;
                }
            } else {
                col_t0 = col_t1;
                col_t1 = (col_t1 + x_step).min(1.0);
                if col_t0 == 1.0 {
                    break;
                } else {
                    x += x_dir;
                }
            }
        }
    }

    /// Left-to-right prefix sum per row: accumulated cell heights are the
    /// winding for everything to the cell's right, cell areas the partial
    /// coverage inside the cell itself.
    fn sweep<F: FnMut(Span)>(&mut self, rule: FillRule, w: i32, h: i32, emit: &mut F) {
        self.increments
            .sort_unstable_by(|a, b| (a.y, a.x).cmp(&(b.y, b.x)));

        let incs = &self.increments;
        let mut i = 0;
        while i < incs.len() {
            let y = incs[i].y;
            let row_start = i;
            while i < incs.len() && incs[i].y == y {
                i += 1;
            }
            if y < 0 || y >= h {
                continue;
            }

            let mut cover = 0.0f32;
            let mut x = i32::MIN;
            let mut j = row_start;
            while j < i {
                let cx = incs[j].x;
                if cx >= w {
                    break;
                }
                let mut area = 0.0f32;
                let mut height = 0.0f32;
                while j < i && incs[j].x == cx {
                    area += incs[j].area;
                    height += incs[j].height;
                    j += 1;
                }
                if x != i32::MIN && cx > x {
                    let c = coverage(cover, rule);
                    if c > 0 {
                        emit(Span { y, x0: x, x1: cx, coverage: c });
                    }
                }
                let c = coverage(cover + area, rule);
                if c > 0 && cx >= 0 {
                    emit(Span { y, x0: cx, x1: cx + 1, coverage: c });
                }
                cover += height;
                x = cx + 1;
            }
            // an edge clipped off at the right boundary leaves the
            // winding open; close the row at the target edge
            if x != i32::MIN && x < w {
                let c = coverage(cover, rule);
                if c > 0 {
                    emit(Span { y, x0: x, x1: w, coverage: c });
                }
            }
        }
    }
}

fn coverage(winding: f32, rule: FillRule) -> u8 {
    let c = match rule {
        FillRule::NonZero => winding.abs().min(1.0),
        FillRule::EvenOdd => {
            let t = winding.abs().rem_euclid(2.0);
            if t > 1.0 {
                2.0 - t
            } else {
                t
            }
        }
    };
    (c * 256.0).min(255.0) as u8
}
