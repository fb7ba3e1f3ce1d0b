use galaxy_core::assets::resolve_relative;
use galaxy_core::{DecodedImage, GltfAsset, LoadError, MeshData, SceneManifest};
use fnv::FnvHashMap;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

fn js_err(e: wasm_bindgen::JsValue) -> anyhow::Error {
    anyhow::anyhow!("{:?}", e)
}

pub async fn fetch_bytes(path: &str) -> anyhow::Result<Vec<u8>> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let resp_value = JsFuture::from(window.fetch_with_str(path))
        .await
        .map_err(js_err)?;
    let resp: web::Response = resp_value.dyn_into().map_err(js_err)?;
    if !resp.ok() {
        anyhow::bail!("HTTP {} for {}", resp.status(), path);
    }
    let buf = JsFuture::from(resp.array_buffer().map_err(js_err)?)
        .await
        .map_err(js_err)?;
    Ok(js_sys::Uint8Array::new(&buf).to_vec())
}

async fn fetch_for_load(path: &str) -> Result<Vec<u8>, LoadError> {
    fetch_bytes(path).await.map_err(|e| LoadError::Fetch {
        path: path.to_string(),
        reason: e.to_string(),
    })
}

/// Fetch a `.gltf`/`.glb` document plus any external buffers it names.
pub async fn load_mesh(path: &str) -> Result<MeshData, LoadError> {
    let bytes = fetch_for_load(path).await?;
    let asset = GltfAsset::parse(&bytes)?;
    let mut buffers = FnvHashMap::default();
    for uri in asset.external_buffers() {
        let url = resolve_relative(path, &uri);
        let data = fetch_for_load(&url).await?;
        buffers.insert(uri, data);
    }
    asset.to_mesh(&buffers)
}

pub async fn load_image(path: &str) -> Result<DecodedImage, LoadError> {
    let bytes = fetch_for_load(path).await?;
    DecodedImage::decode(&bytes)
}

/// Startup manifest; any fetch or parse failure falls back to the default.
pub async fn load_manifest(path: &str) -> SceneManifest {
    let bytes = match fetch_bytes(path).await {
        Ok(b) => b,
        Err(e) => {
            log::warn!("[manifest] {} unavailable ({}), using defaults", path, e);
            return SceneManifest::default();
        }
    };
    match std::str::from_utf8(&bytes)
        .map_err(|e| e.to_string())
        .and_then(|s| SceneManifest::from_json(s).map_err(|e| e.to_string()))
    {
        Ok(m) => {
            log::info!("[manifest] {} assets from {}", m.assets.len(), path);
            m
        }
        Err(e) => {
            log::error!("[manifest] {} rejected: {}, using defaults", path, e);
            SceneManifest::default()
        }
    }
}
