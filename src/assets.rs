// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Icon, thumbnail and map image textures.
//!
//! Asset strings from the archive are resolved to a file under the asset
//! root or a remote URL, loaded on the background runtime, decoded with the
//! `image` crate and uploaded as egui textures. Remote images are cached on
//! disk under SHA256-based filenames. Until an image is ready, or if it
//! cannot be loaded at all, callers get a generated placeholder texture.

use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Longest texture side; larger images are downscaled before upload
const MAX_TEXTURE_SIDE: u32 = 2048;

const PLACEHOLDER_SIZE: usize = 64;

type AssetError = Box<dyn std::error::Error + Send + Sync>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Where an asset's bytes live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetLocation {
    File(PathBuf),
    Remote(String),
}

/// Maps archive asset strings to concrete locations
#[derive(Debug, Clone)]
pub struct AssetResolver {
    root: PathBuf,
    base_url: Option<String>,
}

impl AssetResolver {
    pub fn new(root: impl Into<PathBuf>, base_url: Option<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.filter(|u| !u.trim().is_empty()),
        }
    }

    /// Absolute URLs stay remote. Other strings are relative to the asset
    /// base URL when one is set, otherwise to the asset root directory. A
    /// leading `/` means relative to that root.
    pub fn resolve(&self, raw: &str) -> AssetLocation {
        let raw = raw.trim();
        if raw.starts_with("http://") || raw.starts_with("https://") {
            return AssetLocation::Remote(raw.to_string());
        }

        let relative = raw.trim_start_matches("./").trim_start_matches('/');
        match &self.base_url {
            Some(base) => AssetLocation::Remote(format!("{}/{}", base.trim_end_matches('/'), relative)),
            None => AssetLocation::File(self.root.join(relative)),
        }
    }
}

/// Cache file name for a URL: SHA256 of the URL plus its extension
pub fn cache_file_name(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    let hash = format!("{:x}", hasher.finalize());

    let ext = url
        .rsplit('/')
        .next()
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or("img");

    format!("{hash}.{ext}")
}

/// On-disk cache for downloaded images
#[derive(Debug, Clone)]
pub struct DiskCache {
    cache_dir: Option<PathBuf>,
}

impl DiskCache {
    /// Create the cache under the user cache directory. A cache that cannot
    /// be created is disabled rather than treated as an error.
    pub fn new(enabled: bool) -> Self {
        if !enabled {
            return Self::disabled();
        }

        let Some(cache_dir) = dirs::cache_dir().map(|d| d.join("pve-atlas").join("assets")) else {
            log::warn!("Could not determine cache directory, image cache disabled");
            return Self::disabled();
        };

        if let Err(e) = fs::create_dir_all(&cache_dir) {
            log::warn!("Could not create {} ({e}), image cache disabled", cache_dir.display());
            return Self::disabled();
        }

        Self {
            cache_dir: Some(cache_dir),
        }
    }

    pub fn disabled() -> Self {
        Self { cache_dir: None }
    }

    fn cache_path(&self, url: &str) -> Option<PathBuf> {
        self.cache_dir.as_ref().map(|dir| dir.join(cache_file_name(url)))
    }

    /// Get cached image bytes
    pub fn get(&self, url: &str) -> Option<Vec<u8>> {
        fs::read(self.cache_path(url)?).ok()
    }

    /// Store downloaded bytes; failures only cost a re-download later
    pub fn put(&self, url: &str, bytes: &[u8]) {
        if let Some(path) = self.cache_path(url) {
            if let Err(e) = fs::write(&path, bytes) {
                log::debug!("Could not cache {url}: {e}");
            }
        }
    }
}

async fn fetch_asset(location: &AssetLocation, cache: &DiskCache) -> Result<Vec<u8>, AssetError> {
    match location {
        AssetLocation::File(path) => Ok(tokio::fs::read(path).await?),
        AssetLocation::Remote(url) => {
            if let Some(bytes) = cache.get(url) {
                return Ok(bytes);
            }

            let response = reqwest::get(url).await?;
            if !response.status().is_success() {
                return Err(format!("HTTP error: {}", response.status()).into());
            }

            let bytes = response.bytes().await?.to_vec();
            cache.put(url, &bytes);
            Ok(bytes)
        }
    }
}

/// Decode image bytes, downscaling anything larger than `max_side`
fn decode_image(bytes: &[u8], max_side: u32) -> Result<egui::ColorImage, image::ImageError> {
    let mut image = image::load_from_memory(bytes)?;
    if image.width() > max_side || image.height() > max_side {
        image = image.resize(max_side, max_side, image::imageops::FilterType::Triangle);
    }

    let rgba = image.to_rgba8();
    #[allow(clippy::cast_possible_truncation, reason = "sides are at most max_side, a u32")]
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

/// Soft radial disc used while an image loads or when it is missing
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "pixel coordinates below 64 and shades within 50..=90"
)]
fn placeholder_image() -> egui::ColorImage {
    let n = PLACEHOLDER_SIZE;
    let half = n as f32 / 2.0;
    let mut rgba = Vec::with_capacity(n * n * 4);

    for y in 0..n {
        for x in 0..n {
            let dx = x as f32 + 0.5 - half;
            let dy = y as f32 + 0.5 - half;
            let t = ((dx * dx + dy * dy).sqrt() / half).min(1.0);
            let shade = (90.0 - 40.0 * t) as u8;
            rgba.extend_from_slice(&[shade, shade.saturating_add(8), shade.saturating_add(24), 255]);
        }
    }

    egui::ColorImage::from_rgba_unmultiplied([n, n], &rgba)
}

/// Manages loading archive images into egui textures
pub struct AssetTextures {
    resolver: AssetResolver,
    cache: DiskCache,
    runtime: tokio::runtime::Handle,
    textures: Arc<Mutex<HashMap<String, egui::TextureHandle>>>,
    loading: Arc<Mutex<HashSet<String>>>,
    failed: Arc<Mutex<HashSet<String>>>,
    placeholder: Option<egui::TextureHandle>,
}

impl fmt::Debug for AssetTextures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetTextures")
            .field("resolver", &self.resolver)
            .field("loaded", &lock(&self.textures).len())
            .field("loading", &lock(&self.loading).len())
            .field("failed", &lock(&self.failed).len())
            .finish_non_exhaustive()
    }
}

impl AssetTextures {
    pub fn new(resolver: AssetResolver, cache: DiskCache, runtime: tokio::runtime::Handle) -> Self {
        Self {
            resolver,
            cache,
            runtime,
            textures: Arc::new(Mutex::new(HashMap::new())),
            loading: Arc::new(Mutex::new(HashSet::new())),
            failed: Arc::new(Mutex::new(HashSet::new())),
            placeholder: None,
        }
    }

    /// Initialize placeholder texture (call once during UI setup)
    pub fn init_placeholder(&mut self, ctx: &egui::Context) {
        self.placeholder = Some(ctx.load_texture(
            "asset_placeholder",
            placeholder_image(),
            egui::TextureOptions::LINEAR,
        ));
    }

    /// Texture for `raw`, or the placeholder while it loads or if it failed
    pub fn texture(&self, ctx: &egui::Context, raw: &str) -> Option<egui::TextureHandle> {
        self.loaded(ctx, raw).or_else(|| self.placeholder.clone())
    }

    /// Texture for `raw` only once it has actually loaded
    pub fn loaded(&self, ctx: &egui::Context, raw: &str) -> Option<egui::TextureHandle> {
        if raw.is_empty() {
            return None;
        }

        if let Some(texture) = lock(&self.textures).get(raw) {
            return Some(texture.clone());
        }

        if lock(&self.failed).contains(raw) {
            return None;
        }

        if !lock(&self.loading).insert(raw.to_string()) {
            return None; // Still loading
        }

        self.spawn_load(ctx, raw.to_string());
        None
    }

    fn spawn_load(&self, ctx: &egui::Context, raw: String) {
        let location = self.resolver.resolve(&raw);
        let cache = self.cache.clone();
        let textures = Arc::clone(&self.textures);
        let loading = Arc::clone(&self.loading);
        let failed = Arc::clone(&self.failed);
        let ctx = ctx.clone();

        self.runtime.spawn(async move {
            let result = match fetch_asset(&location, &cache).await {
                Ok(bytes) => tokio::task::spawn_blocking(move || decode_image(&bytes, MAX_TEXTURE_SIDE))
                    .await
                    .map_err(AssetError::from)
                    .and_then(|decoded| decoded.map_err(AssetError::from)),
                Err(e) => Err(e),
            };

            match result {
                Ok(image) => {
                    let texture = ctx.load_texture(raw.clone(), image, egui::TextureOptions::LINEAR);
                    lock(&textures).insert(raw.clone(), texture);
                }
                Err(e) => {
                    log::warn!("Could not load asset {raw} from {location:?}: {e}");
                    lock(&failed).insert(raw.clone());
                }
            }

            lock(&loading).remove(&raw);
            ctx.request_repaint();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_against_root() {
        let resolver = AssetResolver::new("/srv/archive", None);
        assert_eq!(
            resolver.resolve("assets/icons/nessus.png"),
            AssetLocation::File(PathBuf::from("/srv/archive/assets/icons/nessus.png"))
        );
        assert_eq!(
            resolver.resolve("/assets/maps/moon.jpg"),
            AssetLocation::File(PathBuf::from("/srv/archive/assets/maps/moon.jpg"))
        );
    }

    #[test]
    fn test_resolve_against_base_url() {
        let resolver = AssetResolver::new(".", Some("https://cdn.example.com/atlas/".to_string()));
        assert_eq!(
            resolver.resolve("./assets/icons/nessus.png"),
            AssetLocation::Remote("https://cdn.example.com/atlas/assets/icons/nessus.png".to_string())
        );
    }

    #[test]
    fn test_absolute_urls_stay_remote() {
        let resolver = AssetResolver::new(".", Some("https://cdn.example.com".to_string()));
        assert_eq!(
            resolver.resolve("https://images.example.org/europa.png"),
            AssetLocation::Remote("https://images.example.org/europa.png".to_string())
        );
    }

    #[test]
    fn test_blank_base_url_is_ignored() {
        let resolver = AssetResolver::new("root", Some("  ".to_string()));
        assert_eq!(
            resolver.resolve("a.png"),
            AssetLocation::File(PathBuf::from("root/a.png"))
        );
    }

    #[test]
    fn test_cache_file_name_is_stable() {
        let a = cache_file_name("https://example.com/icons/moon.png");
        assert_eq!(a, cache_file_name("https://example.com/icons/moon.png"));
        assert!(a.ends_with(".png"));
        assert_eq!(a.len(), 64 + 4);
        assert!(cache_file_name("https://example.com/image?id=3").ends_with(".img"));
    }

    #[test]
    fn test_decode_downscales_large_images() {
        let big = image::RgbaImage::from_pixel(300, 100, image::Rgba([200, 10, 10, 255]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(big)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let decoded = decode_image(&bytes, 150).unwrap();
        assert_eq!(decoded.size, [150, 50]);
        assert!(decode_image(b"not an image", 150).is_err());
    }

    #[test]
    fn test_placeholder_dimensions() {
        let image = placeholder_image();
        assert_eq!(image.size, [PLACEHOLDER_SIZE, PLACEHOLDER_SIZE]);
    }
}
