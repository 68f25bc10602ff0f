//! Integration tests for the resonance generator and scheduler.

use resonance_cascade::signal::parity_mask;
use resonance_cascade::{
    derive_pixel, LayerScheduler, Pixel, ResonanceGenerator, ResonanceParameters,
};

fn generator_with_alpha(alpha: f64) -> ResonanceGenerator {
    ResonanceGenerator::new(&ResonanceParameters {
        alpha,
        ..Default::default()
    })
    .unwrap()
}

// ==================== Layer Energy ====================

#[test]
fn test_layer_energy_strictly_decreasing() {
    for alpha in [0.0302011, 0.001, 0.5, 2.0] {
        let generator = generator_with_alpha(alpha);
        for layer in 1..33 {
            let previous = generator.layer_energy(layer - 1);
            let current = generator.layer_energy(layer);
            assert!(
                current < previous,
                "alpha {}: layer {} energy {} not below {}",
                alpha,
                layer,
                current,
                previous
            );
            assert!((current - (-alpha * layer as f64).exp()).abs() < 1e-12);
        }
    }
}

#[test]
fn test_layer_energy_independent_of_call_order() {
    let generator = generator_with_alpha(0.0302011);
    let forward: Vec<f64> = (0..33).map(|l| generator.layer_energy(l)).collect();
    let mut backward: Vec<f64> = (0..33).rev().map(|l| generator.layer_energy(l)).collect();
    backward.reverse();
    assert_eq!(forward, backward);
}

// ==================== Pixel Resonance ====================

#[test]
fn test_origin_resonance_is_one() {
    let generator = generator_with_alpha(0.0302011);
    assert_eq!(generator.pixel_resonance(0, 0, 0), 1.0);
}

#[test]
fn test_pixel_resonance_is_bit_identical() {
    let generator = generator_with_alpha(0.0302011);
    let other = generator_with_alpha(0.0302011);
    for (layer, x, y) in [(0, 13, 7), (5, 640, 480), (32, 1, 999), (17, 33, 0)] {
        let a = generator.pixel_resonance(layer, x, y);
        let b = other.pixel_resonance(layer, x, y);
        assert_eq!(a.to_bits(), b.to_bits());
    }
}

#[test]
fn test_resonance_within_modulation_envelope() {
    let generator = generator_with_alpha(0.0302011);
    for layer in 0..33 {
        let base = generator.layer_energy(layer);
        let upper = base * 1.3 * 1.2 + 1e-12;
        let lower = base * 0.7 * 0.8 - 1e-12;
        for x in (0..200).step_by(7) {
            for y in (0..150).step_by(11) {
                let r = generator.pixel_resonance(layer, x, y);
                assert!(r <= upper && r >= lower, "layer {} ({}, {}) = {}", layer, x, y, r);
            }
        }
    }
}

#[test]
fn test_spatial_resonance_depends_only_on_diagonal() {
    let generator = generator_with_alpha(0.0302011);
    assert_eq!(
        generator.pixel_resonance(9, 10, 20).to_bits(),
        generator.pixel_resonance(9, 20, 10).to_bits()
    );
    assert_eq!(
        generator.pixel_resonance(9, 0, 30).to_bits(),
        generator.pixel_resonance(9, 30, 0).to_bits()
    );
}

// ==================== Byte Derivation ====================

#[test]
fn test_reference_pixels() {
    let generator = generator_with_alpha(0.0302011);
    let cases = [
        ((0, 0, 0), Pixel::new(85, 170, 171, 255)),
        ((1, 5, 7), Pixel::new(110, 6, 17, 255)),
        ((16, 3, 4), Pixel::new(100, 36, 134, 255)),
        ((32, 100, 50), Pixel::new(242, 75, 221, 255)),
        ((7, 8, 0), Pixel::new(21, 29, 26, 255)),
    ];
    for ((layer, x, y), expected) in cases {
        let pixel = derive_pixel(generator.pixel_resonance(layer, x, y), layer);
        assert_eq!(pixel, expected, "layer {} ({}, {})", layer, x, y);
    }
}

#[test]
fn test_derive_pixel_idempotent_per_parity() {
    for resonance in [-3.7, -0.01, 0.0, 0.25, 0.5, 1.0, 1.3153, 7.9] {
        for layer in [0, 1, 2, 31, 32] {
            let first = derive_pixel(resonance, layer);
            let second = derive_pixel(resonance, layer);
            assert_eq!(first, second);
            assert_eq!(first.a, 255);
        }
        // Same parity, same bytes
        assert_eq!(derive_pixel(resonance, 0), derive_pixel(resonance, 32));
        assert_eq!(derive_pixel(resonance, 1), derive_pixel(resonance, 31));
    }
}

#[test]
fn test_parity_masks_are_complementary() {
    for resonance in [0.1, 0.6, 1.2] {
        let even = derive_pixel(resonance, 0);
        let odd = derive_pixel(resonance, 1);
        // 0xAA ^ 0x55 == 0xFF
        assert_eq!(even.r ^ odd.r, 0xFF);
        assert_eq!(even.g ^ odd.g, 0xFF);
        assert_eq!(even.b ^ odd.b, 0xFF);
    }
    assert_eq!(parity_mask(10) ^ parity_mask(11), 0xFF);
}

// ==================== Frame Rendering ====================

#[test]
fn test_render_matches_per_pixel_formula() {
    let generator = generator_with_alpha(0.0302011);
    let (width, height) = (37, 23);
    let buffer = generator.render_layer_buffer(11, width, height);

    assert_eq!(buffer.width(), width);
    assert_eq!(buffer.height(), height);
    assert_eq!(buffer.as_bytes().len(), (width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let expected = derive_pixel(generator.pixel_resonance(11, x, y), 11);
            assert_eq!(buffer.get(x, y), Some(expected));
        }
    }
}

#[test]
fn test_parallel_and_sequential_render_agree() {
    let generator = generator_with_alpha(0.0302011);
    for layer in [0, 1, 16, 32] {
        assert_eq!(
            generator.render_layer_buffer(layer, 129, 65),
            generator.render_layer_buffer_sequential(layer, 129, 65)
        );
    }
}

#[test]
fn test_layer_buffers_are_independent() {
    let generator = generator_with_alpha(0.0302011);
    let direct = generator.render_layer_buffer(20, 24, 16);
    for layer in 0..20 {
        let _ = generator.render_layer_buffer(layer, 24, 16);
    }
    assert_eq!(generator.render_layer_buffer(20, 24, 16), direct);
    assert_ne!(generator.render_layer_buffer(21, 24, 16), direct);
}

// ==================== Scheduler ====================

#[test]
fn test_alignment_delay_bounds_for_all_layers() {
    let scheduler = LayerScheduler::new(&ResonanceParameters::default()).unwrap();
    for layer in 0..33u32 {
        let period = scheduler.period_for(layer);
        assert_eq!(period, [10007, 10009, 10037, 10039, 10061][layer as usize % 5]);
        for now in [0u64, 1, period - 1, period, period + 1, 1_700_000_000_123_456] {
            let delay = scheduler.next_alignment_delay(layer, now);
            assert!(delay >= 0.0 && delay < period as f64 / 1e6);
            if now % period == 0 {
                assert_eq!(delay, 0.0);
            }
        }
    }
}

#[test]
fn test_alignment_reaches_multiple() {
    let scheduler = LayerScheduler::new(&ResonanceParameters::default()).unwrap();
    let now = 1_700_000_000_123_456u64;
    for layer in 0..10 {
        let wait = scheduler.alignment_wait_micros(layer, now);
        assert_eq!((now + wait) % scheduler.period_for(layer), 0);
    }
}

#[test]
fn test_next_alignment_wait_uses_clock() {
    let scheduler = LayerScheduler::new(&ResonanceParameters::default()).unwrap();
    let wait = scheduler.next_alignment_wait(3);
    assert!(wait.as_micros() < 10039);
}
