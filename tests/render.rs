//! End-to-end render tests: build a context, draw, assert on pixels.

use umber::{Color, Context, FillRule, ImageRef, LineCap, RepeatOp, Source, Transform, Vec2};

fn alpha_at(dc: &Context, x: i32, y: i32) -> u8 {
    dc.pixmap().pixel(x, y).a
}

#[test]
fn fill_clears_the_path_fill_preserve_keeps_it() {
    let mut dc = Context::new(20, 20);
    dc.set_rgb(1.0, 0.0, 0.0);
    dc.draw_rectangle(2.0, 2.0, 10.0, 10.0);
    dc.fill_preserve();
    let before = dc.path().clone();
    dc.fill_preserve();
    assert_eq!(*dc.path(), before);
    dc.fill();
    assert!(dc.path().is_empty());
}

#[test]
fn filled_rectangle_covers_its_interior_only() {
    let mut dc = Context::new(20, 20);
    dc.set_rgb(0.0, 0.0, 1.0);
    dc.draw_rectangle(5.0, 5.0, 8.0, 8.0);
    dc.fill();
    assert_eq!(dc.pixmap().pixel(9, 9), Color::rgba8(0, 0, 255, 255));
    assert_eq!(alpha_at(&dc, 4, 9), 0);
    assert_eq!(alpha_at(&dc, 9, 4), 0);
    assert_eq!(alpha_at(&dc, 13, 9), 0);
    assert_eq!(alpha_at(&dc, 9, 13), 0);
}

#[test]
fn winding_rules_differ_on_a_self_overlapping_path() {
    for (rule, expect_center) in [(FillRule::NonZero, true), (FillRule::EvenOdd, false)] {
        let mut dc = Context::new(40, 40);
        dc.set_rgb(0.0, 0.0, 0.0);
        dc.set_fill_rule(rule);
        dc.draw_rectangle(5.0, 5.0, 20.0, 20.0);
        dc.draw_rectangle(15.0, 15.0, 20.0, 20.0);
        dc.fill();
        // overlap region
        assert_eq!(alpha_at(&dc, 20, 20) == 255, expect_center, "{:?}", rule);
        // each rectangle alone
        assert_eq!(alpha_at(&dc, 7, 7), 255);
        assert_eq!(alpha_at(&dc, 32, 32), 255);
    }
}

#[test]
fn diagonal_hairline_on_white() {
    let mut dc = Context::new(100, 100);
    dc.set_rgb(1.0, 1.0, 1.0);
    dc.clear();
    dc.set_rgb(0.0, 0.0, 0.0);
    dc.set_line_width(1.0);
    dc.draw_line(0.0, 0.0, 99.0, 99.0);
    dc.stroke();
    // pixels on the diagonal darken
    assert!(dc.pixmap().pixel(50, 50).r < 255);
    assert!(dc.pixmap().pixel(20, 20).r < 255);
    // corners away from the diagonal stay pure white
    assert_eq!(dc.pixmap().pixel(99, 0), Color::WHITE);
    assert_eq!(dc.pixmap().pixel(0, 99), Color::WHITE);
    assert_eq!(dc.pixmap().pixel(70, 20), Color::WHITE);
    // and nothing more than a couple of pixels off the line is touched
    assert_eq!(dc.pixmap().pixel(50, 55), Color::WHITE);
}

#[test]
fn stroked_rectangle_area_tracks_perimeter_times_width() {
    let (w, h, lw) = (60.0f32, 40.0f32, 4.0f32);
    let mut dc = Context::new(100, 100);
    dc.set_rgb(0.0, 0.0, 0.0);
    dc.set_line_width(lw);
    dc.draw_rectangle(20.0, 20.0, w, h);
    dc.stroke();
    let area: f64 = dc
        .pixmap()
        .data()
        .chunks_exact(4)
        .map(|px| px[3] as f64 / 255.0)
        .sum();
    let expected = (2.0 * (w + h) * lw) as f64;
    // joins add a little; anti-aliased edges blur a little
    assert!(
        (area - expected).abs() < expected * 0.05,
        "area {} vs perimeter*width {}",
        area,
        expected
    );
}

#[test]
fn stroked_closed_path_has_no_gap_at_the_closing_vertex() {
    let mut dc = Context::new(40, 40);
    dc.set_rgb(0.0, 0.0, 0.0);
    dc.set_line_width(3.0);
    dc.move_to(10.0, 10.0);
    dc.line_to(30.0, 10.0);
    dc.line_to(30.0, 30.0);
    dc.line_to(10.0, 30.0);
    dc.close_path();
    dc.stroke();
    // the closing vertex is as solid as any other point of the outline
    assert_eq!(alpha_at(&dc, 10, 10), alpha_at(&dc, 30, 30));
    assert_eq!(alpha_at(&dc, 10, 20), 255);
    assert_eq!(alpha_at(&dc, 10, 10), 255);
}

#[test]
fn linear_gradient_hits_its_stops() {
    let mut dc = Context::new(101, 20);
    let green = Color::rgba8(0, 255, 0, 255);
    let blue = Color::rgba8(0, 0, 255, 255);
    let red = Color::rgba8(255, 0, 0, 255);
    let mut g = Source::linear_gradient(0.0, 0.0, 100.0, 0.0);
    g.add_stop(0.0, green).add_stop(0.5, blue).add_stop(1.0, red);
    dc.set_source(g);
    dc.draw_rectangle(0.0, 0.0, 101.0, 20.0);
    dc.fill();
    assert_eq!(dc.pixmap().pixel(0, 10), green);
    assert_eq!(dc.pixmap().pixel(50, 10), blue);
    assert_eq!(dc.pixmap().pixel(100, 10), red);
}

#[test]
fn radial_gradient_fades_from_the_center() {
    let mut dc = Context::new(60, 60);
    let mut g = Source::radial_gradient(30.0, 30.0, 25.0);
    g.add_stop(0.0, Color::WHITE).add_stop(1.0, Color::BLACK);
    dc.set_source(g);
    dc.draw_rectangle(0.0, 0.0, 60.0, 60.0);
    dc.fill();
    assert_eq!(dc.pixmap().pixel(30, 30), Color::WHITE);
    let mid = dc.pixmap().pixel(42, 30).r;
    assert!(mid > 0 && mid < 255);
    assert_eq!(dc.pixmap().pixel(30, 58), Color::rgba8(0, 0, 0, 255));
}

#[test]
fn pattern_fill_tiles_the_image() {
    // 2x1 image: red, green
    let px = [255, 0, 0, 255, 0, 255, 0, 255];
    let image = ImageRef::new(&px, 2, 1);
    let mut dc = Context::new(8, 4);
    dc.set_source(Source::surface_pattern(image, RepeatOp::Both));
    dc.draw_rectangle(0.0, 0.0, 8.0, 4.0);
    dc.fill();
    for y in 0..4 {
        for x in 0..8 {
            let want = if x % 2 == 0 {
                Color::rgba8(255, 0, 0, 255)
            } else {
                Color::rgba8(0, 255, 0, 255)
            };
            assert_eq!(dc.pixmap().pixel(x, y), want, "({}, {})", x, y);
        }
    }
}

#[test]
fn push_pop_restores_the_transform_exactly() {
    let mut dc = Context::new(50, 50);
    dc.translate(3.0, 4.0);
    dc.rotate(0.5);
    let saved = dc.transform();

    dc.set_rgb(0.0, 0.0, 0.0);
    dc.draw_rectangle(5.0, 5.0, 20.0, 20.0);
    dc.fill();
    let reference = dc.pixmap().data().to_vec();

    let mut dc2 = Context::new(50, 50);
    dc2.translate(3.0, 4.0);
    dc2.rotate(0.5);
    dc2.push();
    dc2.scale(2.0, 0.5);
    dc2.rotate(1.0);
    dc2.pop();
    assert_eq!(dc2.transform(), saved);

    dc2.set_rgb(0.0, 0.0, 0.0);
    dc2.draw_rectangle(5.0, 5.0, 20.0, 20.0);
    dc2.fill();
    assert_eq!(dc2.pixmap().data(), &reference[..]);
}

#[test]
fn rotated_drawing_between_push_pop_leaves_later_draws_unaffected() {
    let s = 100.0;
    let mut dc = Context::new(100, 100);
    dc.set_rgba(0.0, 0.0, 0.0, 0.1);
    let mut i = 0;
    while i < 360 {
        dc.push();
        dc.rotate_about((i as f32).to_radians(), 0.5 * s, 0.5 * s);
        dc.draw_ellipse(0.5 * s, 0.5 * s, s * 7.0 / 16.0, s / 8.0);
        dc.fill();
        dc.pop();
        i += 15;
    }
    assert_eq!(dc.transform(), Transform::id());
    // the overlapping translucent ellipses build up density at the center
    assert!(alpha_at(&dc, 50, 50) > alpha_at(&dc, 2, 50));
}

#[test]
fn clip_restricts_fills_and_never_widens() {
    let mut dc = Context::new(100, 100);
    dc.draw_circle(50.0, 50.0, 40.0);
    dc.clip();
    // a second, larger clip cannot widen the first
    dc.draw_rectangle(0.0, 0.0, 100.0, 100.0);
    dc.clip();
    dc.set_rgb(1.0, 0.0, 0.0);
    dc.draw_rectangle(0.0, 0.0, 100.0, 100.0);
    dc.fill();
    assert_eq!(alpha_at(&dc, 50, 50), 255);
    assert_eq!(alpha_at(&dc, 2, 2), 0);
    assert_eq!(alpha_at(&dc, 97, 97), 0);
    dc.reset_clip();
    dc.draw_rectangle(0.0, 0.0, 100.0, 100.0);
    dc.fill();
    assert_eq!(alpha_at(&dc, 2, 2), 255);
}

#[test]
fn clip_mask_survives_push_pop_isolation() {
    let mut dc = Context::new(60, 60);
    dc.push();
    dc.draw_rectangle(0.0, 0.0, 30.0, 60.0);
    dc.clip();
    dc.pop();
    // the clip installed inside the push/pop pair is gone
    dc.set_rgb(0.0, 1.0, 0.0);
    dc.draw_rectangle(0.0, 0.0, 60.0, 60.0);
    dc.fill();
    assert_eq!(alpha_at(&dc, 45, 30), 255);
}

#[test]
fn dashed_stroke_leaves_gaps() {
    let mut dc = Context::new(100, 20);
    dc.set_rgb(0.0, 0.0, 0.0);
    dc.set_line_width(4.0);
    dc.set_line_cap(LineCap::Butt);
    dc.set_dash(&[10.0, 10.0]);
    dc.draw_line(0.0, 10.0, 100.0, 10.0);
    dc.stroke();
    assert_eq!(alpha_at(&dc, 5, 10), 255);
    assert_eq!(alpha_at(&dc, 15, 10), 0);
    assert_eq!(alpha_at(&dc, 25, 10), 255);
    assert_eq!(alpha_at(&dc, 35, 10), 0);
}

#[test]
fn alpha_context_renders_coverage_only() {
    let mut dc = Context::new_alpha(20, 20);
    dc.set_rgba(0.3, 0.9, 0.1, 1.0);
    dc.draw_rectangle(5.0, 5.0, 10.0, 10.0);
    dc.fill();
    assert_eq!(dc.pixmap().data().len(), 20 * 20);
    assert_eq!(alpha_at(&dc, 10, 10), 255);
    assert_eq!(alpha_at(&dc, 2, 2), 0);
}

#[test]
fn set_pixel_and_draw_point() {
    let mut dc = Context::new(20, 20);
    dc.set_rgb(1.0, 0.0, 0.0);
    dc.set_pixel(3, 4);
    assert_eq!(dc.pixmap().pixel(3, 4), Color::rgba8(255, 0, 0, 255));
    assert_eq!(alpha_at(&dc, 4, 4), 0);

    dc.set_rgb(0.0, 0.0, 1.0);
    dc.draw_point(10.0, 10.0, 3.0);
    dc.fill();
    assert_eq!(dc.pixmap().pixel(10, 10), Color::rgba8(0, 0, 255, 255));
}

#[test]
fn quadratic_and_cubic_curves_render_within_their_hull() {
    let mut dc = Context::new(100, 60);
    dc.set_rgb(0.0, 0.0, 0.0);
    dc.move_to(10.0, 50.0);
    dc.quadratic_to(50.0, -30.0, 90.0, 50.0);
    dc.close_path();
    dc.fill();
    // the arch covers the region under its apex (the curve tops out at y = 10)
    assert_eq!(alpha_at(&dc, 50, 40), 255);
    assert_eq!(alpha_at(&dc, 50, 12), 255);
    // but not above it
    assert_eq!(alpha_at(&dc, 50, 7), 0);
    assert_eq!(alpha_at(&dc, 10, 5), 0);

    let mut dc = Context::new(100, 60);
    dc.set_rgb(0.0, 0.0, 0.0);
    dc.move_to(10.0, 30.0);
    dc.cubic_to(40.0, 0.0, 60.0, 60.0, 90.0, 30.0);
    dc.line_to(90.0, 55.0);
    dc.line_to(10.0, 55.0);
    dc.close_path();
    dc.fill();
    assert_eq!(alpha_at(&dc, 50, 50), 255);
    assert_eq!(alpha_at(&dc, 15, 5), 0);
}

#[test]
fn transform_scales_rendered_geometry() {
    let mut dc = Context::new(40, 40);
    dc.set_rgb(0.0, 0.0, 0.0);
    dc.scale(2.0, 2.0);
    dc.draw_rectangle(2.0, 2.0, 8.0, 8.0);
    dc.fill();
    // device-space rectangle is (4, 4)..(20, 20)
    assert_eq!(alpha_at(&dc, 10, 10), 255);
    assert_eq!(alpha_at(&dc, 19, 19), 255);
    assert_eq!(alpha_at(&dc, 21, 10), 0);
}

#[test]
fn transform_applies_at_call_time_not_at_fill_time() {
    let mut dc = Context::new(40, 40);
    dc.set_rgb(0.0, 0.0, 0.0);
    dc.draw_rectangle(2.0, 2.0, 8.0, 8.0);
    dc.translate(20.0, 20.0); // after the path was recorded
    dc.fill();
    assert_eq!(alpha_at(&dc, 5, 5), 255);
    assert_eq!(alpha_at(&dc, 25, 25), 0);
}

#[test]
fn apply_matches_composed_application() {
    let a = Transform::translate(5.0, -2.0) * Transform::rotate(0.3);
    let b = Transform::scale(2.0, 0.5);
    let p = Vec2::new(1.5, 4.0);
    let q = (a * b).apply(p);
    let r = a.apply(b.apply(p));
    assert!((q - r).length() < 1e-4);
    assert_eq!(Transform::id().apply(p), p);
}
