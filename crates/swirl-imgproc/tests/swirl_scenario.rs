use swirl_image::{Image, ImageError, ImageSize};
use swirl_imgproc::warp::{generate_swirl_map, twist, SwirlParams};

const BACKGROUND: f32 = 20.0;
const BRIGHT: f32 = 250.0;

/// 300x400 image with a uniform background and bright discs at the given centers.
fn synthetic_discs(discs: &[((f32, f32), f32)]) -> Result<Image<f32, 3>, ImageError> {
    let size = ImageSize {
        width: 300,
        height: 400,
    };
    let mut data = Vec::with_capacity(size.width * size.height * 3);
    for y in 0..size.height {
        for x in 0..size.width {
            let inside = discs
                .iter()
                .any(|((cx, cy), r)| (x as f32 - cx).hypot(y as f32 - cy) <= *r);
            let v = if inside { BRIGHT } else { BACKGROUND };
            data.extend([v, v, v]);
        }
    }
    Image::new(size, data)
}

fn scenario_params() -> SwirlParams {
    SwirlParams::new(5.0, 140.0)
        .with_center(150.0, 200.0)
        .with_decay_scale(0.9)
}

#[test]
fn outside_radius_is_untouched() -> Result<(), ImageError> {
    let src = synthetic_discs(&[((150.0, 200.0), 30.0)])?;
    let dst = twist(&src, &scenario_params())?;

    assert_eq!(dst.size(), src.size());

    for y in 0..400 {
        for x in 0..300 {
            let r = (x as f32 - 150.0).hypot(y as f32 - 200.0);
            if r <= 140.0 {
                continue;
            }
            for c in 0..3 {
                let a = dst.get_pixel(x, y, c)?;
                let b = src.get_pixel(x, y, c)?;
                assert!((a - b).abs() < 1e-2, "({x}, {y}): {a} != {b}");
            }
        }
    }

    Ok(())
}

#[test]
fn centered_disc_stays_in_place() -> Result<(), ImageError> {
    // a disc centered on the swirl is rotationally symmetric
    let src = synthetic_discs(&[((150.0, 200.0), 30.0)])?;
    let dst = twist(&src, &scenario_params())?;

    assert!((dst.get_pixel(150, 200, 0)? - BRIGHT).abs() < 1.0);
    assert!((dst.get_pixel(165, 200, 0)? - BRIGHT).abs() < 1.0);
    assert!((dst.get_pixel(150, 250, 0)? - BACKGROUND).abs() < 1.0);

    Ok(())
}

#[test]
fn off_center_disc_is_displaced() -> Result<(), ImageError> {
    // the disc sits 40 px right of the center: r = 40, decay ~ 0.552, offset ~ 2.76 rad
    let src = synthetic_discs(&[((190.0, 200.0), 15.0)])?;
    let dst = twist(&src, &scenario_params())?;

    // the original disc location now samples background
    assert!((dst.get_pixel(190, 200, 0)? - BACKGROUND).abs() < 1.0);

    // the disc shows up rotated by -2.76 rad around the center
    assert!((dst.get_pixel(113, 185, 0)? - BRIGHT).abs() < 1.0);

    // the swirl only moves pixels around, the amount of bright area is similar
    let count = |img: &Image<f32, 3>| {
        img.as_slice()
            .chunks_exact(3)
            .filter(|px| px[0] > (BRIGHT + BACKGROUND) / 2.0)
            .count() as f32
    };
    let (before, after) = (count(&src), count(&dst));
    assert!((after - before).abs() / before < 0.25, "{before} vs {after}");

    Ok(())
}

#[test]
fn corner_center_maps_are_clamped() -> Result<(), ImageError> {
    let size = ImageSize {
        width: 300,
        height: 400,
    };
    let params = SwirlParams::new(4.0, 500.0).with_center(2.0, 3.0);
    let (map_x, map_y) = generate_swirl_map(&params, size)?;

    assert!(map_x.as_slice().iter().all(|v| (0.0..=299.0).contains(v)));
    assert!(map_y.as_slice().iter().all(|v| (0.0..=399.0).contains(v)));
    assert!(map_x.as_slice().iter().any(|v| *v == 0.0));
    assert!(map_y.as_slice().iter().any(|v| *v == 0.0));

    Ok(())
}
