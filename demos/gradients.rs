//! Renders the gradient and pattern sources side by side and saves the
//! result as gradients.png.

use umber::{Color, Context, ImageRef, RepeatOp, Source};

fn main() {
    env_logger::init();

    let mut dc = Context::new(440, 120);
    dc.set_color(Color::WHITE);
    dc.clear();

    let mut linear = Source::linear_gradient(10.0, 0.0, 100.0, 0.0);
    linear
        .add_stop(0.0, Color::hex("#b58900"))
        .add_stop(0.5, Color::hex("#cb4b16"))
        .add_stop(1.0, Color::hex("#d33682"));
    dc.set_source(linear);
    dc.draw_rounded_rectangle(10.0, 10.0, 90.0, 100.0, 10.0);
    dc.fill();

    let mut radial = Source::radial_gradient(155.0, 60.0, 55.0);
    radial
        .add_stop(0.0, Color::hex("#fff"))
        .add_stop(1.0, Color::hex("#073642"));
    dc.set_source(radial);
    dc.draw_circle(155.0, 60.0, 50.0);
    dc.fill();

    let mut conic = Source::conic_gradient(265.0, 60.0, 0.0);
    conic
        .add_stop(0.0, Color::hex("#2aa198"))
        .add_stop(0.5, Color::hex("#268bd2"))
        .add_stop(1.0, Color::hex("#2aa198"));
    dc.set_source(conic);
    dc.draw_circle(265.0, 60.0, 50.0);
    dc.fill();

    // 8x8 checkerboard tile, repeated over the last panel
    let mut tile = vec![0u8; 8 * 8 * 4];
    for y in 0..8 {
        for x in 0..8 {
            let v = if (x < 4) != (y < 4) { 0x93 } else { 0xee };
            let i = (y * 8 + x) * 4;
            tile[i..i + 4].copy_from_slice(&[v, v, v, 0xff]);
        }
    }
    let pattern = Source::surface_pattern(ImageRef::new(&tile, 8, 8), RepeatOp::Both);
    dc.set_source(pattern);
    dc.draw_rounded_rectangle(330.0, 10.0, 100.0, 100.0, 10.0);
    dc.fill();

    let image =
        image::RgbaImage::from_vec(dc.width(), dc.height(), dc.pixmap().data().to_vec()).unwrap();
    image.save("gradients.png").unwrap();
    println!("wrote gradients.png");
}
