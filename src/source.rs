use crate::geom::Vec2;

/// 8-bit straight-alpha RGBA color.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };

    pub fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Color {
        Color { r, g, b, a }
    }

    /// Channels in 0..=1, rounded to the nearest representable byte.
    pub fn rgba(r: f32, g: f32, b: f32, a: f32) -> Color {
        fn byte(v: f32) -> u8 {
            (v.max(0.0).min(1.0) * 255.0 + 0.5) as u8
        }
        Color {
            r: byte(r),
            g: byte(g),
            b: byte(b),
            a: byte(a),
        }
    }

    pub fn rgb(r: f32, g: f32, b: f32) -> Color {
        Color::rgba(r, g, b, 1.0)
    }

    /// Parses `#RGB`, `#RRGGBB` or `#RRGGBBAA` (leading `#` optional).
    /// Anything unparsable is opaque black.
    pub fn hex(s: &str) -> Color {
        let s = s.strip_prefix('#').unwrap_or(s);
        let digit = |i: usize| -> Option<u8> {
            s.as_bytes()
                .get(i)
                .and_then(|b| (*b as char).to_digit(16))
                .map(|v| v as u8)
        };
        let pair = |i: usize| -> Option<u8> { Some(digit(i)? << 4 | digit(i + 1)?) };
        let parsed = match s.len() {
            3 => (|| Some(Color::rgba8(digit(0)? * 17, digit(1)? * 17, digit(2)? * 17, 255)))(),
            6 => (|| Some(Color::rgba8(pair(0)?, pair(2)?, pair(4)?, 255)))(),
            8 => (|| Some(Color::rgba8(pair(0)?, pair(2)?, pair(4)?, pair(6)?)))(),
            _ => None,
        };
        parsed.unwrap_or(Color::BLACK)
    }

    /// Straight-alpha componentwise lerp, rounded to nearest.
    pub(crate) fn lerp(self, other: Color, t: f32) -> Color {
        fn channel(a: u8, b: u8, t: f32) -> u8 {
            (a as f32 + (b as f32 - a as f32) * t + 0.5) as u8
        }
        Color {
            r: channel(self.r, other.r, t),
            g: channel(self.g, other.g, t),
            b: channel(self.b, other.b, t),
            a: channel(self.a, other.a, t),
        }
    }
}

/// One gradient stop. Offsets live in 0..=1.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Stop {
    pub offset: f32,
    pub color: Color,
}

/// How a surface pattern tiles beyond its image bounds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RepeatOp {
    Both,
    X,
    Y,
    None,
}

/// A read-only, non-owning view of caller-supplied RGBA8 pixels. The
/// caller guarantees the data outlives the draw calls sampling it.
#[derive(Copy, Clone, Debug)]
pub struct ImageRef<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
}

impl<'a> ImageRef<'a> {
    pub fn new(data: &'a [u8], width: u32, height: u32) -> ImageRef<'a> {
        assert_eq!(data.len(), width as usize * height as usize * 4);
        ImageRef {
            data,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn pixel(&self, x: u32, y: u32) -> Color {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Color {
            r: self.data[i],
            g: self.data[i + 1],
            b: self.data[i + 2],
            a: self.data[i + 3],
        }
    }
}

/// A sampler producing a color for any device pixel coordinate.
#[derive(Clone, Debug)]
pub enum Source<'a> {
    Solid(Color),
    LinearGradient {
        p0: Vec2,
        p1: Vec2,
        stops: Vec<Stop>,
    },
    RadialGradient {
        center: Vec2,
        radius: f32,
        stops: Vec<Stop>,
    },
    ConicGradient {
        center: Vec2,
        angle: f32,
        stops: Vec<Stop>,
    },
    SurfacePattern {
        image: ImageRef<'a>,
        op: RepeatOp,
    },
}

impl<'a> Source<'a> {
    pub fn linear_gradient(x0: f32, y0: f32, x1: f32, y1: f32) -> Source<'a> {
        Source::LinearGradient {
            p0: Vec2::new(x0, y0),
            p1: Vec2::new(x1, y1),
            stops: Vec::new(),
        }
    }

    pub fn radial_gradient(cx: f32, cy: f32, radius: f32) -> Source<'a> {
        Source::RadialGradient {
            center: Vec2::new(cx, cy),
            radius,
            stops: Vec::new(),
        }
    }

    pub fn conic_gradient(cx: f32, cy: f32, angle: f32) -> Source<'a> {
        Source::ConicGradient {
            center: Vec2::new(cx, cy),
            angle,
            stops: Vec::new(),
        }
    }

    pub fn surface_pattern(image: ImageRef<'a>, op: RepeatOp) -> Source<'a> {
        Source::SurfacePattern { image, op }
    }

    /// Adds a gradient stop, keeping the stop list sorted by offset.
    /// No-op on non-gradient sources.
    pub fn add_stop(&mut self, offset: f32, color: Color) -> &mut Self {
        let stops = match self {
            Source::LinearGradient { stops, .. } => stops,
            Source::RadialGradient { stops, .. } => stops,
            Source::ConicGradient { stops, .. } => stops,
            _ => return self,
        };
        stops.push(Stop { offset, color });
        stops.sort_by(|a, b| a.offset.partial_cmp(&b.offset).unwrap_or(std::cmp::Ordering::Equal));
        self
    }

    /// Samples the source at a device coordinate.
    pub fn color_at(&self, x: f32, y: f32) -> Color {
        match self {
            Source::Solid(color) => *color,
            Source::LinearGradient { p0, p1, stops } => {
                let d = *p1 - *p0;
                let denom = d.dot(d);
                let t = if denom == 0.0 {
                    0.0
                } else {
                    (Vec2::new(x, y) - *p0).dot(d) / denom
                };
                color_at_offset(t, stops)
            }
            Source::RadialGradient {
                center,
                radius,
                stops,
            } => {
                let dist = center.distance(Vec2::new(x, y));
                let t = if *radius > 0.0 { dist / radius } else { 1.0 };
                color_at_offset(t, stops)
            }
            Source::ConicGradient {
                center,
                angle,
                stops,
            } => {
                let v = Vec2::new(x, y) - *center;
                let t = if v == Vec2::new(0.0, 0.0) {
                    0.0
                } else {
                    ((v.y.atan2(v.x) - angle) / (2.0 * std::f32::consts::PI)).rem_euclid(1.0)
                };
                color_at_offset(t, stops)
            }
            Source::SurfacePattern { image, op } => {
                if image.width == 0 || image.height == 0 {
                    return Color::TRANSPARENT;
                }
                let xi = x.floor() as i64;
                let yi = y.floor() as i64;
                let w = image.width as i64;
                let h = image.height as i64;
                let wrap_x = matches!(op, RepeatOp::Both | RepeatOp::X);
                let wrap_y = matches!(op, RepeatOp::Both | RepeatOp::Y);
                if !wrap_x && (xi < 0 || xi >= w) {
                    return Color::TRANSPARENT;
                }
                if !wrap_y && (yi < 0 || yi >= h) {
                    return Color::TRANSPARENT;
                }
                image.pixel(xi.rem_euclid(w) as u32, yi.rem_euclid(h) as u32)
            }
        }
    }
}

/// Interpolates a sorted stop list at an offset; clamps outside the stop
/// range, exact at stop offsets, transparent with no stops at all.
fn color_at_offset(t: f32, stops: &[Stop]) -> Color {
    if stops.is_empty() {
        return Color::TRANSPARENT;
    }
    if t <= stops[0].offset || stops.len() == 1 {
        return stops[0].color;
    }
    let last = stops[stops.len() - 1];
    if t >= last.offset {
        return last.color;
    }
    for pair in stops.windows(2) {
        if t <= pair[1].offset {
            let den = pair[1].offset - pair[0].offset;
            if den <= 0.0 {
                return pair[1].color;
            }
            return pair[0].color.lerp(pair[1].color, (t - pair[0].offset) / den);
        }
    }
    last.color
}
