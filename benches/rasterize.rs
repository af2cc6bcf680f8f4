use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nalgebra::Vector3;
use planetarium::body::{Body, Planet};
use planetarium::constants::J2000;
use planetarium::map::{Lighting, Map, Shading};
use planetarium::projection::{Projection, ProjectionKind};
use planetarium::render::{draw_ellipsoid, draw_sphere, BodyDrawing, Framebuffer, Viewport};
use planetarium::view::View;

fn make_planet(body: Body) -> Planet {
    Planet::with_default_orientation(body, Vector3::new(5.2, 0.3, 0.1), J2000)
}

fn make_map(planet: &Planet) -> Map {
    let lighting = Lighting::new(planet);
    Map::flat(512, 256, [200, 160, 120], &lighting, &Shading::default()).expect("flat map")
}

/// A view with the planet's radius spanning `pixel_radius` pixels
fn make_view(planet: &Planet, pixel_radius: f64) -> View {
    let observer = Vector3::new(4.0, 0.0, 0.0);
    View::new(
        observer,
        planet.position(),
        Vector3::z(),
        planet.radius() / pixel_radius,
        0.0,
    )
    .expect("view")
}

fn bench_draw_sphere(c: &mut Criterion) {
    let planet = make_planet(Body::Mars);
    let map = make_map(&planet);

    let mut group = c.benchmark_group("draw_sphere");
    for (name, size) in [("256x256", 256usize), ("1024x1024", 1024)] {
        let view = make_view(&planet, 0.45 * size as f64);
        let viewport = Viewport::new(&view, size as f64 / 2.0, size as f64 / 2.0);
        let body = BodyDrawing {
            planet: &planet,
            map: &map,
            magnify: 1.0,
            limb_darkening: Some(0.3),
        };
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut frame = Framebuffer::new(size, size).expect("frame");
                draw_sphere(black_box(&mut frame), black_box(&viewport), black_box(&body));
                frame
            })
        });
    }
    group.finish();
}

fn bench_draw_ellipsoid(c: &mut Criterion) {
    let planet = make_planet(Body::Jupiter);
    let map = make_map(&planet);
    let view = make_view(&planet, 230.0);
    let viewport = Viewport::new(&view, 256.0, 256.0);
    let body = BodyDrawing {
        planet: &planet,
        map: &map,
        magnify: 1.0,
        limb_darkening: Some(0.3),
    };
    c.bench_function("draw_ellipsoid_512x512", |b| {
        b.iter(|| {
            let mut frame = Framebuffer::new(512, 512).expect("frame");
            draw_ellipsoid(black_box(&mut frame), black_box(&viewport), black_box(&body));
            frame
        })
    });
}

fn bench_projection(c: &mut Criterion) {
    let mut group = c.benchmark_group("pixel_to_spherical_512x256");
    for kind in [
        ProjectionKind::Rectangular,
        ProjectionKind::Mollweide,
        ProjectionKind::Orthographic,
    ] {
        let projection = Projection::new(kind, 1.0, 512, 256, 0.3)
            .expect("projection")
            .with_center(0.3, 1.0, 0.2);
        group.bench_function(kind.name(), |b| {
            b.iter(|| {
                let mut hits = 0usize;
                for y in 0..256 {
                    for x in 0..512 {
                        if projection.pixel_to_spherical(x as f64, y as f64).is_some() {
                            hits += 1;
                        }
                    }
                }
                black_box(hits)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_draw_sphere, bench_draw_ellipsoid, bench_projection);
criterion_main!(benches);
