//! Draws an assortment of filled and stroked shapes and saves the result
//! as shapes.png.

use umber::{Color, Context, FillRule, LineCap, LineJoin};

fn main() {
    env_logger::init();

    let mut dc = Context::new(400, 300);
    dc.set_color(Color::hex("#fdf6e3"));
    dc.clear();

    // filled rounded rectangle
    dc.set_color(Color::hex("#268bd2"));
    dc.draw_rounded_rectangle(20.0, 20.0, 120.0, 80.0, 16.0);
    dc.fill();

    // stroked star, even-odd vs nonzero
    dc.set_line_width(3.0);
    dc.set_line_join(LineJoin::Round);
    for (cx, rule, color) in [
        (220.0f32, FillRule::NonZero, "#dc322f"),
        (340.0f32, FillRule::EvenOdd, "#859900"),
    ] {
        dc.set_fill_rule(rule);
        dc.set_color(Color::hex(color));
        let cy = 70.0;
        let r = 50.0;
        for i in 0..5 {
            let a = (i as f32 * 4.0 / 5.0) * std::f32::consts::PI - 0.5 * std::f32::consts::PI;
            let (x, y) = (cx + r * a.cos(), cy + r * a.sin());
            if i == 0 {
                dc.move_to(x, y);
            } else {
                dc.line_to(x, y);
            }
        }
        dc.close_path();
        dc.fill();
    }

    // dashed circle outline
    dc.set_color(Color::hex("#6c71c4"));
    dc.set_line_width(4.0);
    dc.set_line_cap(LineCap::Round);
    dc.set_dash(&[12.0, 8.0]);
    dc.draw_circle(80.0, 210.0, 55.0);
    dc.stroke();
    dc.set_dash(&[]);

    // rotated translucent squares around a pivot
    dc.set_rgba(0.7, 0.2, 0.4, 0.3);
    for i in 0..6 {
        dc.push();
        dc.rotate_about(i as f32 * 0.25, 270.0, 210.0);
        dc.draw_rectangle(230.0, 170.0, 80.0, 80.0);
        dc.fill();
        dc.pop();
    }

    save(&dc, "shapes.png");
}

fn save(dc: &Context, name: &str) {
    let image =
        image::RgbaImage::from_vec(dc.width(), dc.height(), dc.pixmap().data().to_vec()).unwrap();
    image.save(name).unwrap();
    println!("wrote {}", name);
}
