//! Throughput benchmark for the fill pipeline: flatten, rasterize and
//! composite random circles into a 1000x1000 buffer.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use umber::Context;

/// Tiny deterministic generator so runs are comparable.
struct Lcg(u64);

impl Lcg {
    fn next_f32(&mut self) -> f32 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.0 >> 40) as f32 / (1u64 << 24) as f32
    }
}

fn bench_circles(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill");
    const N: u64 = 100;
    group.throughput(Throughput::Elements(N));

    group.bench_function("random_circles_1000px", |b| {
        b.iter(|| {
            let mut dc = Context::new(1000, 1000);
            dc.set_rgb(1.0, 1.0, 1.0);
            dc.clear();
            let mut rnd = Lcg(99);
            for i in 0..N {
                let x = rnd.next_f32() * 1000.0;
                let y = rnd.next_f32() * 1000.0;
                dc.draw_circle(x, y, 10.0);
                if i % 2 == 0 {
                    dc.set_rgb(0.0, 0.0, 0.0);
                } else {
                    dc.set_rgb(1.0, 1.0, 1.0);
                }
                dc.fill();
            }
            black_box(dc.into_pixmap());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_circles);
criterion_main!(benches);
