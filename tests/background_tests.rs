// Host-side tests for the background cover fit.
// The main crate is wasm-only, so these exercise galaxy-core directly.

use galaxy_core::{fit, BackgroundFit, BackgroundFitter};

const SIZES: [(f32, f32); 6] = [
    (1920.0, 1080.0),
    (1080.0, 1920.0),
    (800.0, 800.0),
    (1366.0, 768.0),
    (375.0, 812.0),
    (2560.0, 1080.0),
];

#[test]
fn wide_images_crop_horizontally() {
    for &(iw, ih) in &SIZES {
        for &(vw, vh) in &SIZES {
            let factor = (iw / ih) / (vw / vh);
            if factor <= 1.0 {
                continue;
            }
            let f = fit(iw, ih, vw, vh);
            assert!((f.repeat.x * factor - 1.0).abs() < 1e-5, "{iw}x{ih} in {vw}x{vh}");
            assert!((f.offset.x - (1.0 - f.repeat.x) / 2.0).abs() < 1e-6);
            assert_eq!(f.repeat.y, 1.0);
            assert_eq!(f.offset.y, 0.0);
        }
    }
}

#[test]
fn tall_images_crop_vertically() {
    for &(iw, ih) in &SIZES {
        for &(vw, vh) in &SIZES {
            let factor = (iw / ih) / (vw / vh);
            if factor > 1.0 {
                continue;
            }
            let f = fit(iw, ih, vw, vh);
            assert!((f.repeat.y - factor).abs() < 1e-6, "{iw}x{ih} in {vw}x{vh}");
            assert!((f.offset.y - (1.0 - f.repeat.y) / 2.0).abs() < 1e-6);
            assert_eq!(f.repeat.x, 1.0);
            assert_eq!(f.offset.x, 0.0);
        }
    }
}

#[test]
fn visible_region_keeps_viewport_aspect() {
    for &(iw, ih) in &SIZES {
        for &(vw, vh) in &SIZES {
            let f = fit(iw, ih, vw, vh);
            let shown = (iw * f.repeat.x) / (ih * f.repeat.y);
            assert!((shown - vw / vh).abs() < 1e-3, "{iw}x{ih} in {vw}x{vh}");
        }
    }
}

#[test]
fn hd_image_in_square_viewport() {
    let f = fit(1920.0, 1080.0, 1000.0, 1000.0);
    assert!((f.repeat.x - 0.5625).abs() < 1e-6);
    assert!((f.offset.x - 0.21875).abs() < 1e-6);
}

#[test]
fn zero_sized_inputs_use_identity() {
    assert_eq!(fit(0.0, 1080.0, 800.0, 600.0), BackgroundFit::IDENTITY);
    assert_eq!(fit(1920.0, 1080.0, 800.0, 0.0), BackgroundFit::IDENTITY);
    assert_eq!(fit(f32::NAN, 1.0, 1.0, 1.0), BackgroundFit::IDENTITY);
}

#[test]
fn fitter_refits_on_resize() {
    let mut fitter = BackgroundFitter::new();
    assert!(fitter.set_viewport(1000.0, 1000.0).is_none());
    let first = fitter.set_image(1920, 1080).unwrap();
    let resized = fitter.set_viewport(1920.0, 540.0).unwrap();
    assert_ne!(first, resized);
    assert_eq!(fitter.current(), Some(resized));
    // 16:9 image under a 32:9 viewport crops vertically
    assert_eq!(resized.repeat.x, 1.0);
    assert!((resized.repeat.y - 0.5).abs() < 1e-6);
}
