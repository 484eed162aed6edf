use std::rc::Rc;

use crate::geom::{Transform, Vec2};
use crate::path::Path;
use crate::pixmap::{BufferMode, Pixmap};
use crate::raster::{FillRule, Rasterizer};
use crate::source::{Color, Source};
use crate::stroke::{stroke_outline, LineCap, LineJoin, StrokeStyle};

/// The saved/restored bundle of transform, styles and clip. The
/// in-progress path is deliberately not part of it.
#[derive(Clone)]
struct State<'a> {
    transform: Transform,
    source: Source<'a>,
    stroke: StrokeStyle,
    fill_rule: FillRule,
    clip: Option<Rc<Pixmap>>,
}

impl<'a> State<'a> {
    fn new() -> State<'a> {
        State {
            transform: Transform::id(),
            source: Source::Solid(Color::TRANSPARENT),
            stroke: StrokeStyle::default(),
            fill_rule: FillRule::NonZero,
            clip: None,
        }
    }
}

/// An imperative drawing context over an exclusively-owned pixel buffer.
/// Path coordinates pass through the current transform at the moment of
/// each call; changing the transform later never moves recorded points.
pub struct Context<'a> {
    pixmap: Pixmap,
    path: Path,
    state: State<'a>,
    stack: Vec<State<'a>>,
    raster: Rasterizer,
}

impl<'a> Context<'a> {
    /// A full-color RGBA context, initially transparent.
    pub fn new(width: u32, height: u32) -> Context<'a> {
        Context::with_mode(width, height, BufferMode::Rgba)
    }

    /// An alpha-only context, used when the target is a mask rather than
    /// a color image.
    pub fn new_alpha(width: u32, height: u32) -> Context<'a> {
        Context::with_mode(width, height, BufferMode::Alpha)
    }

    fn with_mode(width: u32, height: u32, mode: BufferMode) -> Context<'a> {
        Context {
            pixmap: Pixmap::new(width, height, mode),
            path: Path::new(),
            state: State::new(),
            stack: Vec::new(),
            raster: Rasterizer::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // State setters

    pub fn set_color(&mut self, color: Color) {
        self.state.source = Source::Solid(color);
    }

    pub fn set_rgb(&mut self, r: f32, g: f32, b: f32) {
        self.set_color(Color::rgb(r, g, b));
    }

    pub fn set_rgba(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.set_color(Color::rgba(r, g, b, a));
    }

    pub fn set_source(&mut self, source: Source<'a>) {
        self.state.source = source;
    }

    pub fn set_fill_rule(&mut self, rule: FillRule) {
        self.state.fill_rule = rule;
    }

    pub fn set_line_width(&mut self, width: f32) {
        self.state.stroke.width = width;
    }

    pub fn set_line_cap(&mut self, cap: LineCap) {
        self.state.stroke.cap = cap;
    }

    pub fn set_line_join(&mut self, join: LineJoin) {
        self.state.stroke.join = join;
    }

    /// Sets the dash pattern as alternating on/off lengths. An empty
    /// pattern turns dashing off.
    pub fn set_dash(&mut self, lengths: &[f32]) {
        self.state.stroke.dash = lengths.to_vec();
    }

    pub fn set_dash_offset(&mut self, offset: f32) {
        self.state.stroke.dash_offset = offset;
    }

    // Transform

    pub fn transform(&self) -> Transform {
        self.state.transform
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.state.transform = transform;
    }

    pub fn identity(&mut self) {
        self.state.transform = Transform::id();
    }

    pub fn translate(&mut self, x: f32, y: f32) {
        self.state.transform = self.state.transform * Transform::translate(x, y);
    }

    pub fn scale(&mut self, x: f32, y: f32) {
        self.state.transform = self.state.transform * Transform::scale(x, y);
    }

    pub fn rotate(&mut self, angle: f32) {
        self.state.transform = self.state.transform * Transform::rotate(angle);
    }

    pub fn shear(&mut self, x: f32, y: f32) {
        self.state.transform = self.state.transform * Transform::shear(x, y);
    }

    pub fn rotate_about(&mut self, angle: f32, x: f32, y: f32) {
        self.state.transform = self.state.transform
            * Transform::translate(x, y)
            * Transform::rotate(angle)
            * Transform::translate(-x, -y);
    }

    pub fn scale_about(&mut self, sx: f32, sy: f32, x: f32, y: f32) {
        self.state.transform = self.state.transform
            * Transform::translate(x, y)
            * Transform::scale(sx, sy)
            * Transform::translate(-x, -y);
    }

    // Path construction

    fn device(&self, x: f32, y: f32) -> Vec2 {
        self.state.transform.apply(Vec2::new(x, y))
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        let p = self.device(x, y);
        self.path.move_to(p);
    }

    pub fn line_to(&mut self, x: f32, y: f32) {
        let p = self.device(x, y);
        self.path.line_to(p);
    }

    pub fn quadratic_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
        let c = self.device(cx, cy);
        let p = self.device(x, y);
        self.path.quadratic_to(c, p);
    }

    pub fn cubic_to(&mut self, c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32) {
        let c1 = self.device(c1x, c1y);
        let c2 = self.device(c2x, c2y);
        let p = self.device(x, y);
        self.path.cubic_to(c1, c2, p);
    }

    pub fn close_path(&mut self) {
        self.path.close();
    }

    pub fn new_subpath(&mut self) {
        self.path.new_subpath();
    }

    pub fn clear_path(&mut self) {
        self.path.clear();
    }

    // Rendering

    /// Fills the current path, closing open subpaths implicitly, and
    /// keeps the path.
    pub fn fill_preserve(&mut self) {
        let pixmap = &mut self.pixmap;
        let state = &self.state;
        self.raster.fill(
            &self.path.subpaths,
            state.fill_rule,
            pixmap.width(),
            pixmap.height(),
            |span| pixmap.blend_span(span, &state.source, state.clip.as_deref()),
        );
    }

    pub fn fill(&mut self) {
        self.fill_preserve();
        self.path.clear();
    }

    /// Strokes the current path with the current line attributes and
    /// keeps the path. Strokes always rasterize under the nonzero rule.
    pub fn stroke_preserve(&mut self) {
        let outline = stroke_outline(&self.path.subpaths, &self.state.stroke);
        let pixmap = &mut self.pixmap;
        let state = &self.state;
        self.raster.fill(
            &outline,
            FillRule::NonZero,
            pixmap.width(),
            pixmap.height(),
            |span| pixmap.blend_span(span, &state.source, state.clip.as_deref()),
        );
    }

    pub fn stroke(&mut self) {
        self.stroke_preserve();
        self.path.clear();
    }

    /// Intersects the clip mask with the current path's coverage and
    /// keeps the path. The mask only ever narrows; `reset_clip` widens.
    pub fn clip_preserve(&mut self) {
        let width = self.pixmap.width();
        let height = self.pixmap.height();
        let mut mask = Pixmap::new(width, height, BufferMode::Alpha);
        {
            let data = mask.data_mut();
            self.raster.fill(
                &self.path.subpaths,
                self.state.fill_rule,
                width,
                height,
                |span| {
                    let row = span.y as usize * width as usize;
                    for x in span.x0..span.x1 {
                        data[row + x as usize] = span.coverage;
                    }
                },
            );
        }
        if let Some(old) = &self.state.clip {
            for (m, o) in mask.data_mut().iter_mut().zip(old.data().iter()) {
                *m = (*m as u32 * *o as u32 / 255) as u8;
            }
        }
        log::debug!("clip mask intersected");
        self.state.clip = Some(Rc::new(mask));
    }

    pub fn clip(&mut self) {
        self.clip_preserve();
        self.path.clear();
    }

    pub fn reset_clip(&mut self) {
        log::debug!("clip mask cleared");
        self.state.clip = None;
    }

    /// Floods the whole buffer with the current source, ignoring the
    /// path, the clip mask and alpha blending.
    pub fn clear(&mut self) {
        match &self.state.source {
            Source::Solid(color) => self.pixmap.fill(*color),
            source => {
                for y in 0..self.pixmap.height() as i32 {
                    for x in 0..self.pixmap.width() as i32 {
                        let c = source.color_at(x as f32, y as f32);
                        self.pixmap.set_pixel(x, y, c);
                    }
                }
            }
        }
    }

    // State stack

    /// Snapshots the graphics state. The in-progress path survives
    /// push/pop untouched.
    pub fn push(&mut self) {
        self.stack.push(self.state.clone());
    }

    /// Restores the most recent snapshot. Popping with nothing pushed is
    /// a usage error; it is reported and otherwise ignored.
    pub fn pop(&mut self) {
        match self.stack.pop() {
            Some(state) => self.state = state,
            None => log::warn!("pop without a matching push; state stack is empty"),
        }
    }

    // Convenience geometry

    pub fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.move_to(x1, y1);
        self.line_to(x2, y2);
    }

    pub fn draw_rectangle(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.new_subpath();
        self.move_to(x, y);
        self.line_to(x + w, y);
        self.line_to(x + w, y + h);
        self.line_to(x, y + h);
        self.close_path();
    }

    pub fn draw_rounded_rectangle(&mut self, x: f32, y: f32, w: f32, h: f32, r: f32) {
        let r = r.min(0.5 * w).min(0.5 * h);
        if !(r > 0.0) {
            return self.draw_rectangle(x, y, w, h);
        }
        use std::f32::consts::PI;
        let (x0, x1, x2, x3) = (x, x + r, x + w - r, x + w);
        let (y1, y2, y3) = (y + r, y + h - r, y + h);
        self.new_subpath();
        self.move_to(x1, y);
        self.line_to(x2, y);
        self.arc_path(x2, y1, r, r, -0.5 * PI, 0.0, false);
        self.line_to(x3, y2);
        self.arc_path(x2, y2, r, r, 0.0, 0.5 * PI, false);
        self.line_to(x1, y3);
        self.arc_path(x1, y2, r, r, 0.5 * PI, PI, false);
        self.line_to(x0, y1);
        self.arc_path(x1, y1, r, r, PI, 1.5 * PI, false);
        self.close_path();
    }

    /// Elliptical arc as a run of quadratic segments, starting a new
    /// subpath at the arc's first point.
    pub fn draw_ellipse_arc(&mut self, x: f32, y: f32, rx: f32, ry: f32, angle1: f32, angle2: f32) {
        self.new_subpath();
        self.arc_path(x, y, rx, ry, angle1, angle2, true);
    }

    fn arc_path(&mut self, x: f32, y: f32, rx: f32, ry: f32, angle1: f32, angle2: f32, start: bool) {
        const N: usize = 16;
        for i in 0..N {
            let p1 = i as f32 / N as f32;
            let p2 = (i + 1) as f32 / N as f32;
            let a1 = angle1 + (angle2 - angle1) * p1;
            let a2 = angle1 + (angle2 - angle1) * p2;
            let x0 = x + rx * a1.cos();
            let y0 = y + ry * a1.sin();
            let xm = x + rx * (0.5 * (a1 + a2)).cos();
            let ym = y + ry * (0.5 * (a1 + a2)).sin();
            let x2 = x + rx * a2.cos();
            let y2 = y + ry * a2.sin();
            if i == 0 {
                if start {
                    self.move_to(x0, y0);
                } else {
                    self.line_to(x0, y0);
                }
            }
            let cx = 2.0 * xm - 0.5 * x0 - 0.5 * x2;
            let cy = 2.0 * ym - 0.5 * y0 - 0.5 * y2;
            self.quadratic_to(cx, cy, x2, y2);
        }
    }

    pub fn draw_ellipse(&mut self, x: f32, y: f32, rx: f32, ry: f32) {
        self.draw_ellipse_arc(x, y, rx, ry, 0.0, 2.0 * std::f32::consts::PI);
        self.close_path();
    }

    pub fn draw_arc(&mut self, x: f32, y: f32, r: f32, angle1: f32, angle2: f32) {
        self.draw_ellipse_arc(x, y, r, r, angle1, angle2);
    }

    pub fn draw_circle(&mut self, x: f32, y: f32, r: f32) {
        self.draw_ellipse(x, y, r, r);
    }

    pub fn draw_point(&mut self, x: f32, y: f32, r: f32) {
        self.draw_circle(x, y, r);
    }

    /// Writes the current source color straight into one device pixel,
    /// bypassing the path machinery.
    pub fn set_pixel(&mut self, x: i32, y: i32) {
        let c = self.state.source.color_at(x as f32, y as f32);
        self.pixmap.set_pixel(x, y, c);
    }
}
