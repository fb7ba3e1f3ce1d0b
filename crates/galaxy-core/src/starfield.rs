use crate::manifest::StarfieldConfig;
use crate::scene::MeshData;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const STAR_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Uniformly scattered star centers inside a cube of edge `spread`
/// centered on the origin. Same seed, same sky. A zero or non-finite
/// spread collapses every star onto the origin.
pub fn star_positions(count: usize, spread: f32, seed: u64) -> Vec<Vec3> {
    let mut rng = StdRng::seed_from_u64(seed);
    let half = (spread * 0.5).abs();
    if !(half.is_finite() && half > 0.0) {
        return vec![Vec3::ZERO; count];
    }
    (0..count)
        .map(|_| {
            Vec3::new(
                rng.gen_range(-half..half),
                rng.gen_range(-half..half),
                rng.gen_range(-half..half),
            )
        })
        .collect()
}

/// All stars baked into one mesh; `None` when the config asks for none.
pub fn build(config: &StarfieldConfig) -> Option<MeshData> {
    let mut stars = star_positions(config.count, config.spread, config.seed).into_iter();
    let first = stars.next()?;
    let mut mesh = MeshData::octahedron(first, config.radius, STAR_COLOR);
    for p in stars {
        mesh.merge(&MeshData::octahedron(p, config.radius, STAR_COLOR));
    }
    Some(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stars_stay_inside_the_cube() {
        let stars = star_positions(500, 100.0, 7);
        assert_eq!(stars.len(), 500);
        assert!(stars.iter().all(|s| s.abs().max_element() <= 50.0));
    }

    #[test]
    fn seed_is_reproducible() {
        assert_eq!(star_positions(20, 10.0, 1), star_positions(20, 10.0, 1));
        assert_ne!(star_positions(20, 10.0, 1), star_positions(20, 10.0, 2));
    }

    #[test]
    fn infinite_spread_does_not_panic() {
        let stars = star_positions(3, f32::INFINITY, 1);
        assert_eq!(stars, vec![Vec3::ZERO; 3]);
    }

    #[test]
    fn empty_config_builds_nothing() {
        let cfg = StarfieldConfig {
            count: 0,
            ..StarfieldConfig::default()
        };
        assert!(build(&cfg).is_none());
        assert_eq!(build(&StarfieldConfig::default()).unwrap().triangle_count(), 500 * 8);
    }
}
