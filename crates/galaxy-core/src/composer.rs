//! Turns manifest entries into load requests and places finished loads.

use crate::error::LoadError;
use crate::manifest::AssetSpec;
use crate::picking::{HitTester, NavTarget};
use crate::scene::{MeshData, ObjectId, Scene, SceneNode, Transform};
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadRequest {
    pub id: ObjectId,
    pub path: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadStatus {
    NotRequested,
    Pending,
    Loaded,
    Failed,
}

/// What happened to a completed load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Placed in the scene, not clickable.
    Placed,
    /// Placed and registered for hit testing.
    Registered,
    /// Reported and dropped.
    Failed,
    /// Unknown id or a load that already finished.
    Ignored,
}

struct Entry {
    spec: AssetSpec,
    status: LoadStatus,
}

pub struct SceneComposer {
    entries: Vec<Entry>,
}

impl SceneComposer {
    /// Ids are assigned in manifest order starting at zero.
    pub fn new(assets: &[AssetSpec]) -> Self {
        Self {
            entries: assets
                .iter()
                .cloned()
                .map(|spec| Entry {
                    spec,
                    status: LoadStatus::NotRequested,
                })
                .collect(),
        }
    }

    /// First id not used by a manifest asset.
    pub fn next_free_id(&self) -> ObjectId {
        ObjectId(self.entries.len() as u32)
    }

    /// Requests for every asset not yet requested; each is handed out once.
    pub fn take_requests(&mut self) -> Vec<LoadRequest> {
        self.entries
            .iter_mut()
            .enumerate()
            .filter(|(_, e)| e.status == LoadStatus::NotRequested)
            .map(|(i, e)| {
                e.status = LoadStatus::Pending;
                LoadRequest {
                    id: ObjectId(i as u32),
                    path: e.spec.path.clone(),
                }
            })
            .collect()
    }

    pub fn status(&self, id: ObjectId) -> Option<LoadStatus> {
        self.entries.get(id.0 as usize).map(|e| e.status)
    }

    pub fn spec(&self, id: ObjectId) -> Option<&AssetSpec> {
        self.entries.get(id.0 as usize).map(|e| &e.spec)
    }

    pub fn pending(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.status == LoadStatus::Pending)
            .count()
    }

    /// Applies a finished load. The mesh enters the scene first; only then is
    /// a linked asset registered for hit testing.
    pub fn complete(
        &mut self,
        id: ObjectId,
        result: Result<MeshData, LoadError>,
        scene: &mut Scene,
        hit_tester: &mut HitTester,
    ) -> LoadOutcome {
        let Some(entry) = self.entries.get_mut(id.0 as usize) else {
            log::warn!("[scene] completion for unknown asset {:?} ignored", id);
            return LoadOutcome::Ignored;
        };
        if matches!(entry.status, LoadStatus::Loaded | LoadStatus::Failed) {
            log::warn!(
                "[scene] duplicate completion for {:?} ignored",
                entry.spec.name
            );
            return LoadOutcome::Ignored;
        }

        let mesh = match result {
            Ok(mesh) => mesh,
            Err(e) => {
                entry.status = LoadStatus::Failed;
                log::error!("[assets] {} ({}): {}", entry.spec.name, entry.spec.path, e);
                return LoadOutcome::Failed;
            }
        };

        entry.status = LoadStatus::Loaded;
        scene.insert(SceneNode {
            id,
            name: entry.spec.name.clone(),
            mesh: Rc::new(mesh),
            transform: Transform::from_spec(&entry.spec),
            spin: entry.spec.spin,
        });
        log::info!("[assets] loaded {} as {:?}", entry.spec.name, id);

        match &entry.spec.link {
            Some(url) => {
                hit_tester.register(id, NavTarget { url: url.clone() });
                LoadOutcome::Registered
            }
            None => LoadOutcome::Placed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::SceneManifest;
    use glam::Vec3;

    fn mesh() -> MeshData {
        MeshData::octahedron(Vec3::ZERO, 1.0, [1.0; 4])
    }

    #[test]
    fn requests_are_handed_out_once() {
        let manifest = SceneManifest::default();
        let mut composer = SceneComposer::new(&manifest.assets);
        let reqs = composer.take_requests();
        assert_eq!(reqs.len(), 5);
        assert_eq!(reqs[1].path, manifest.assets[1].path);
        assert!(composer.take_requests().is_empty());
        assert_eq!(composer.pending(), 5);
    }

    #[test]
    fn linked_asset_registers_only_on_success() {
        let manifest = SceneManifest::default();
        let mut composer = SceneComposer::new(&manifest.assets);
        let mut scene = Scene::new();
        let mut hits = HitTester::new();
        composer.take_requests();

        let figure = composer.complete(ObjectId(0), Ok(mesh()), &mut scene, &mut hits);
        assert_eq!(figure, LoadOutcome::Placed);
        assert!(hits.is_empty());

        let failed = composer.complete(
            ObjectId(1),
            Err(LoadError::NoGeometry),
            &mut scene,
            &mut hits,
        );
        assert_eq!(failed, LoadOutcome::Failed);
        assert!(!scene.contains(ObjectId(1)));
        assert!(hits.is_empty());

        let fb = composer.complete(ObjectId(2), Ok(mesh()), &mut scene, &mut hits);
        assert_eq!(fb, LoadOutcome::Registered);
        assert!(scene.contains(ObjectId(2)));
        assert_eq!(
            hits.link(ObjectId(2)).map(|t| t.url.as_str()),
            manifest.assets[2].link.as_deref()
        );
    }

    #[test]
    fn failed_loads_are_not_retried_or_replaced() {
        let manifest = SceneManifest::default();
        let mut composer = SceneComposer::new(&manifest.assets);
        let mut scene = Scene::new();
        let mut hits = HitTester::new();
        composer.take_requests();
        composer.complete(ObjectId(3), Err(LoadError::NoGeometry), &mut scene, &mut hits);
        let late = composer.complete(ObjectId(3), Ok(mesh()), &mut scene, &mut hits);
        assert_eq!(late, LoadOutcome::Ignored);
        assert_eq!(composer.status(ObjectId(3)), Some(LoadStatus::Failed));
        assert!(composer.take_requests().is_empty());
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut composer = SceneComposer::new(&[]);
        let outcome = composer.complete(
            ObjectId(9),
            Ok(mesh()),
            &mut Scene::new(),
            &mut HitTester::new(),
        );
        assert_eq!(outcome, LoadOutcome::Ignored);
    }

    #[test]
    fn transform_comes_from_the_manifest() {
        let manifest = SceneManifest::default();
        let mut composer = SceneComposer::new(&manifest.assets);
        let mut scene = Scene::new();
        composer.take_requests();
        composer.complete(ObjectId(2), Ok(mesh()), &mut scene, &mut HitTester::new());
        let node = scene.get(ObjectId(2)).unwrap();
        assert_eq!(node.transform.scale, Vec3::new(-0.7, -0.7, 0.7));
        assert_eq!(node.transform.position, Vec3::new(0.8, 0.9, 0.2));
        assert_eq!(node.spin, -0.01);
    }
}
