//! Declarative scene description: per-asset authoring constants plus camera,
//! pointer, lighting and background settings.

use crate::constants::*;
use crate::error::ManifestError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneManifest {
    pub camera: CameraConfig,
    pub pointer: PointerConfig,
    pub lighting: LightingConfig,
    pub background: Option<BackgroundConfig>,
    pub stars: StarfieldConfig,
    pub assets: Vec<AssetSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,
    pub position: [f32; 3],
    /// Fraction of the orientation gap closed each frame.
    pub smoothing: f32,
    /// World units the camera descends per viewport height of scroll.
    pub height_per_viewport: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fovy: CAMERA_FOVY_DEGREES,
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
            position: CAMERA_BASE_POSITION,
            smoothing: CAMERA_SMOOTHING,
            height_per_viewport: CAMERA_HEIGHT_PER_VIEWPORT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PointerConfig {
    pub target_scale: f32,
    /// Upper bound for wheel-accumulated scroll; unbounded when absent.
    pub scroll_max: Option<f32>,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            target_scale: POINTER_TARGET_SCALE,
            scroll_max: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LightingConfig {
    pub point_position: [f32; 3],
    pub point_intensity: f32,
    pub ambient_intensity: f32,
    pub clear_color: [f32; 3],
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            point_position: POINT_LIGHT_POSITION,
            point_intensity: POINT_LIGHT_INTENSITY,
            ambient_intensity: AMBIENT_INTENSITY,
            clear_color: [0.0, 0.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackgroundConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StarfieldConfig {
    pub count: usize,
    pub spread: f32,
    pub radius: f32,
    pub seed: u64,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            count: STAR_COUNT,
            spread: STAR_SPREAD,
            radius: STAR_RADIUS,
            seed: STAR_SEED,
        }
    }
}

/// One loadable mesh and where it goes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetSpec {
    pub name: String,
    pub path: String,
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],
    #[serde(default)]
    pub position: [f32; 3],
    /// Euler angles in radians, XYZ order.
    #[serde(default)]
    pub rotation: [f32; 3],
    /// Radians added to the local yaw every frame.
    #[serde(default)]
    pub spin: f32,
    /// Profile opened when the mesh is clicked.
    #[serde(default)]
    pub link: Option<String>,
}

fn unit_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

impl AssetSpec {
    fn new(name: &str, path: &str, scale: [f32; 3], position: [f32; 3], rotation: [f32; 3]) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            scale,
            position,
            rotation,
            spin: 0.0,
            link: None,
        }
    }

    fn spinning(mut self, spin: f32, link: &str) -> Self {
        self.spin = spin;
        self.link = Some(link.to_string());
        self
    }
}

impl Default for SceneManifest {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            pointer: PointerConfig::default(),
            lighting: LightingConfig::default(),
            background: Some(BackgroundConfig {
                path: "./assets/background/render5_1080.png".to_string(),
            }),
            stars: StarfieldConfig::default(),
            assets: vec![
                AssetSpec::new(
                    "sleeping-figure",
                    "./assets/models/sleeping_taro2.gltf",
                    [10.0, 10.0, 10.0],
                    [0.0, 0.0, 0.0],
                    [0.0, 3.0, 0.0],
                ),
                AssetSpec::new(
                    "instagram",
                    "./assets/models/insta_galaxy_obj2.gltf",
                    [0.5, 0.5, 0.5],
                    [-0.4, 1.5, 0.0],
                    [0.0, -0.4, 0.4],
                )
                .spinning(0.02, "https://www.instagram.com/"),
                AssetSpec::new(
                    "facebook",
                    "./assets/models/fb_galaxy_obj1.gltf",
                    [-0.7, -0.7, 0.7],
                    [0.8, 0.9, 0.2],
                    [0.7, -0.8, 0.0],
                )
                .spinning(-0.01, "https://www.facebook.com/"),
                AssetSpec::new(
                    "linkedin",
                    "./assets/models/linkedin_galaxy_obj1.gltf",
                    [1.1, 1.1, 1.1],
                    [-0.3, 0.4, 0.1],
                    [0.3, 0.0, 0.3],
                )
                .spinning(0.006, "https://www.linkedin.com/"),
                AssetSpec::new(
                    "github",
                    "./assets/models/git_galaxy_obj1.gltf",
                    [-1.0, -1.0, 1.0],
                    [-0.7, 1.0, -1.1],
                    [-0.2, 0.0, -0.3],
                )
                .spinning(-0.008, "https://github.com/"),
            ],
        }
    }
}

impl SceneManifest {
    pub fn from_json(text: &str) -> Result<Self, ManifestError> {
        let manifest: Self = serde_json::from_str(text)?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn to_json(&self) -> Result<String, ManifestError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ManifestError> {
        let cam = &self.camera;
        if !(cam.fovy > 0.0 && cam.fovy < 180.0) {
            return Err(ManifestError::Invalid(format!(
                "camera fovy {} outside (0, 180)",
                cam.fovy
            )));
        }
        if !(cam.znear > 0.0 && cam.zfar > cam.znear) {
            return Err(ManifestError::Invalid(
                "camera clip planes must satisfy 0 < znear < zfar".to_string(),
            ));
        }
        if !(cam.smoothing > 0.0 && cam.smoothing <= 1.0) {
            return Err(ManifestError::Invalid(format!(
                "camera smoothing {} outside (0, 1]",
                cam.smoothing
            )));
        }

        let mut cam_values = cam.position.iter().chain([&cam.height_per_viewport]);
        if cam_values.any(|v| !v.is_finite()) {
            return Err(ManifestError::Invalid(
                "camera position and height_per_viewport must be finite".to_string(),
            ));
        }

        let ptr = &self.pointer;
        if !ptr.target_scale.is_finite() {
            return Err(ManifestError::Invalid(format!(
                "pointer target_scale {} is not finite",
                ptr.target_scale
            )));
        }
        if ptr.scroll_max.is_some_and(|m| !(m.is_finite() && m >= 0.0)) {
            return Err(ManifestError::Invalid(
                "pointer scroll_max must be a finite, non-negative number".to_string(),
            ));
        }

        let stars = &self.stars;
        if !(stars.spread.is_finite() && stars.spread >= 0.0) {
            return Err(ManifestError::Invalid(format!(
                "stars spread {} must be finite and non-negative",
                stars.spread
            )));
        }
        if !(stars.radius.is_finite() && stars.radius >= 0.0) {
            return Err(ManifestError::Invalid(format!(
                "stars radius {} must be finite and non-negative",
                stars.radius
            )));
        }
        if stars.count > MAX_STAR_COUNT {
            return Err(ManifestError::Invalid(format!(
                "{} stars configured, at most {} are supported",
                stars.count, MAX_STAR_COUNT
            )));
        }

        let mut seen = fnv::FnvHashSet::default();
        for asset in &self.assets {
            if !seen.insert(asset.name.as_str()) {
                return Err(ManifestError::DuplicateAsset(asset.name.clone()));
            }
            let invalid = |reason: &str| ManifestError::InvalidAsset {
                name: asset.name.clone(),
                reason: reason.to_string(),
            };
            if asset.path.trim().is_empty() {
                return Err(invalid("empty path"));
            }
            let mut values = asset
                .scale
                .iter()
                .chain(&asset.position)
                .chain(&asset.rotation)
                .chain(std::iter::once(&asset.spin));
            if values.any(|v| !v.is_finite()) {
                return Err(invalid("non-finite transform"));
            }
            if asset.scale.iter().any(|s| *s == 0.0) {
                return Err(invalid("zero scale component"));
            }
            if let Some(link) = &asset.link {
                if !(link.starts_with("https://") || link.starts_with("http://")) {
                    return Err(invalid("link must be an http(s) URL"));
                }
            }
        }

        let linked = self.linked_assets().count();
        if linked > MAX_LINKED_ASSETS {
            return Err(ManifestError::TooManyLinks {
                count: linked,
                max: MAX_LINKED_ASSETS,
            });
        }
        Ok(())
    }

    pub fn linked_assets(&self) -> impl Iterator<Item = &AssetSpec> {
        self.assets.iter().filter(|a| a.link.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_manifest_is_valid() {
        let m = SceneManifest::default();
        m.validate().unwrap();
        assert_eq!(m.assets.len(), 5);
        assert_eq!(m.linked_assets().count(), 4);
    }

    #[test]
    fn missing_sections_take_defaults() {
        let m = SceneManifest::from_json(
            r#"{ "assets": [ { "name": "a", "path": "a.glb", "link": "https://example.com" } ] }"#,
        )
        .unwrap();
        assert_eq!(m.camera, CameraConfig::default());
        assert_eq!(m.assets[0].scale, [1.0, 1.0, 1.0]);
        assert_eq!(m.assets[0].spin, 0.0);
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = SceneManifest::from_json(
            r#"{ "assets": [ { "name": "a", "path": "a.glb" }, { "name": "a", "path": "b.glb" } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ManifestError::DuplicateAsset(n) if n == "a"));
    }

    #[test]
    fn rejects_non_http_links() {
        let err = SceneManifest::from_json(
            r#"{ "assets": [ { "name": "a", "path": "a.glb", "link": "javascript:alert(1)" } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ManifestError::InvalidAsset { .. }));
    }

    #[test]
    fn rejects_more_than_four_links() {
        let mut m = SceneManifest::default();
        let mut extra = m.assets[1].clone();
        extra.name = "fifth".to_string();
        m.assets.push(extra);
        assert!(matches!(
            m.validate(),
            Err(ManifestError::TooManyLinks { count: 5, max: 4 })
        ));
    }

    #[test]
    fn rejects_non_finite_star_spread() {
        // 1e39 overflows f32 to infinity
        let err = SceneManifest::from_json(r#"{ "stars": { "spread": 1e39 } }"#).unwrap_err();
        assert!(matches!(err, ManifestError::Invalid(_)));
    }

    #[test]
    fn rejects_negative_star_radius_and_huge_counts() {
        let mut m = SceneManifest::default();
        m.stars.radius = -0.1;
        assert!(m.validate().is_err());

        let mut m = SceneManifest::default();
        m.stars.count = MAX_STAR_COUNT + 1;
        assert!(m.validate().is_err());
    }

    #[test]
    fn rejects_non_finite_camera_and_pointer_scalars() {
        for json in [
            r#"{ "camera": { "position": [0.0, 1e39, 4.8] } }"#,
            r#"{ "camera": { "height_per_viewport": -1e39 } }"#,
            r#"{ "pointer": { "target_scale": 1e39 } }"#,
            r#"{ "pointer": { "scroll_max": -5.0 } }"#,
        ] {
            assert!(
                matches!(SceneManifest::from_json(json), Err(ManifestError::Invalid(_))),
                "{json}"
            );
        }
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(
            SceneManifest::from_json("{ not json"),
            Err(ManifestError::Json(_))
        ));
    }
}
