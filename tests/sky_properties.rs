use stardrift::{
    Backdrop, BackdropKind, Canvas, SceneConfig, SkyPalette, SkyRenderer, Surface, Vec2,
    backdrops::EXTRA_SPACE, fingerprint_frame, modulo, render_frame, star_count,
};

fn sky_scene(seed: u32, width: u32, height: u32) -> SceneConfig {
    SceneConfig {
        backdrop: BackdropKind::Sky,
        seed: Some(seed),
        canvas: Canvas::new(width, height),
        ..SceneConfig::default()
    }
}

#[test]
fn same_seed_size_and_time_render_identical_pixels() {
    let scene = sky_scene(123_456, 160, 90);
    let a = render_frame(&scene, 3.25).unwrap();
    let b = render_frame(&scene, 3.25).unwrap();
    assert_eq!(a, b);
    assert_eq!(fingerprint_frame(&a), fingerprint_frame(&b));
}

#[test]
fn different_seeds_render_different_starfields() {
    let a = render_frame(&sky_scene(1, 160, 90), 0.5).unwrap();
    let b = render_frame(&sky_scene(2, 160, 90), 0.5).unwrap();
    assert_ne!(a.data, b.data);
}

#[test]
fn star_count_boundary() {
    assert_eq!(star_count(Canvas::new(1500, 1)), 101);
    assert_eq!(star_count(Canvas::new(1499, 1)), 100);
    assert_eq!(star_count(Canvas::new(0, 0)), 100);
}

#[test]
fn wrapped_position_stays_non_negative() {
    // base_x = 5, speed = -3, t = 1000, wrap width 400.
    let x = modulo(5.0 + 1000.0 * -3.0, 400.0) - EXTRA_SPACE;
    assert_eq!(x, 155.0);
}

#[test]
fn stars_stay_inside_the_padded_surface_at_any_time() {
    // A one-pixel-high canvas wraps y every 102 px, so slow negative-speed
    // stars wrap many times over the sweep.
    for canvas in [Canvas::new(300, 1), Canvas::new(64, 480)] {
        let sky = SkyRenderer::new(8_675_309, SkyPalette::default()).unwrap();
        let max_x = f64::from(canvas.width) + EXTRA_SPACE;
        let max_y = f64::from(canvas.height) + EXTRA_SPACE;

        let mut t = 0.0;
        while t <= 5000.0 {
            for star in sky.stars(canvas, t, Vec2::ZERO) {
                assert!(
                    (-EXTRA_SPACE..max_x).contains(&star.x),
                    "star {} x {} at t {t}",
                    star.index,
                    star.x
                );
                assert!(
                    (-EXTRA_SPACE..max_y).contains(&star.y),
                    "star {} y {} at t {t}",
                    star.index,
                    star.y
                );
            }
            t += 13.37;
        }
    }
}

#[test]
fn roughly_one_star_in_twenty_is_fast() {
    // 100 + 15000 * 10000 / 1500 = 100_100 stars.
    let canvas = Canvas::new(15_000, 10_000);
    let sky = SkyRenderer::new(77, SkyPalette::default()).unwrap();
    let stars = sky.stars(canvas, 0.0, Vec2::ZERO);
    let total = stars.len();
    let fast = stars.filter(|s| s.speed.abs() > 3.0).count();

    // 5% of stars draw from [-99, 99), and 96/99 of those land outside [-3, 3].
    let ratio = fast as f64 / total as f64;
    assert!((0.043..0.054).contains(&ratio), "fast ratio {ratio}");
}

#[test]
fn rederiving_stars_is_idempotent() {
    let canvas = Canvas::new(320, 200);
    let mut sky = SkyRenderer::new(4242, SkyPalette::default()).unwrap();
    let before: Vec<_> = sky.stars(canvas, 8.0, Vec2::ZERO).collect();

    let mut surface = Surface::with_canvas(canvas);
    for i in 0..3 {
        sky.render(&mut surface, f64::from(i));
    }

    let after: Vec<_> = sky.stars(canvas, 8.0, Vec2::ZERO).collect();
    assert_eq!(before, after);
    assert_eq!(sky.redraws(), 3);
}

#[test]
fn star_identity_persists_across_time() {
    let canvas = Canvas::new(320, 200);
    let sky = SkyRenderer::new(9, SkyPalette::default()).unwrap();
    let early: Vec<_> = sky.stars(canvas, 0.0, Vec2::ZERO).collect();
    let late: Vec<_> = sky.stars(canvas, 30.0, Vec2::ZERO).collect();

    for (a, b) in early.iter().zip(&late) {
        assert_eq!(a.size, b.size);
        assert_eq!(a.speed, b.speed);
        assert_eq!(a.color, b.color);
    }
    assert!(early.iter().zip(&late).any(|(a, b)| a.x != b.x));
}

#[test]
fn frame_is_fully_opaque() {
    let frame = render_frame(&sky_scene(5, 64, 48), 2.0).unwrap();
    assert!(frame.data.chunks_exact(4).all(|px| px[3] == 255));
}
