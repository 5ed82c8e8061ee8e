use foundation::math::{Location, Sector};
use globe::DrawContext;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cache::{MemoryBudget, TileCache};
use crate::error::{CacheError, TileError};
use crate::level::LevelSet;
use crate::selector::TileSelector;
use crate::tile::{Tile, TileKey};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageLayerConfig {
    pub sector: Sector,
    pub level_zero_delta: Location,
    pub num_levels: usize,
    pub image_format: String,
    pub tile_width: u32,
    pub tile_height: u32,
    pub detail_control: f64,
    pub cache_bytes: usize,
}

impl Default for ImageLayerConfig {
    fn default() -> Self {
        Self {
            sector: Sector::FULL_SPHERE,
            level_zero_delta: Location::new(45.0, 45.0),
            num_levels: 5,
            image_format: "image/jpeg".to_string(),
            tile_width: 256,
            tile_height: 256,
            detail_control: 1.75,
            cache_bytes: 128 * 1024 * 1024,
        }
    }
}

/// Path part of a URL with the scheme, any `host:port`, empty segments and
/// query strings removed.
pub fn url_path(url: &str) -> String {
    url.split('/')
        .filter(|part| {
            !part.is_empty() && !part.contains(':') && *part != "." && !part.starts_with('?')
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Builds `server/path/level/row/row_column.ext` tile addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelRowColumnUrlBuilder {
    pub server_address: String,
    pub path_to_data: String,
}

impl LevelRowColumnUrlBuilder {
    pub fn new(server_address: &str, path_to_data: &str) -> Self {
        Self {
            server_address: server_address.trim_end_matches('/').to_string(),
            path_to_data: path_to_data.trim_matches('/').to_string(),
        }
    }

    pub fn url_for_tile(&self, key: &TileKey, image_format: &str) -> String {
        let mut url = self.server_address.clone();
        if !self.path_to_data.is_empty() {
            url.push('/');
            url.push_str(&self.path_to_data);
        }
        url.push_str(&format!("/{}/{}/{}_{}", key.level, key.row, key.row, key.column));
        match image_format {
            "image/png" => url.push_str(".png"),
            "" | "image/jpeg" => url.push_str(".jpg"),
            _ => {}
        }
        url.replace(' ', "%20")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRequest {
    pub key: TileKey,
    pub url: String,
    /// Where the retrieved image is stored, `cache_path/level.row.column`.
    pub image_path: String,
}

/// What a layer needs for the current view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageryFrame {
    /// Tiles with resident imagery, nearest first.
    pub ready: Vec<TileKey>,
    /// Tiles still missing imagery, nearest first.
    pub requests: Vec<ImageRequest>,
}

/// Imagery layer served from a REST tile tree.
#[derive(Debug)]
pub struct RestTiledImageLayer {
    pub display_name: String,
    cache_path: String,
    image_format: String,
    url_builder: LevelRowColumnUrlBuilder,
    selector: TileSelector,
    images: TileCache<Vec<u8>>,
}

impl RestTiledImageLayer {
    pub fn new(
        server_address: &str,
        path_to_data: &str,
        display_name: &str,
        config: &ImageLayerConfig,
    ) -> Result<Self, TileError> {
        if server_address.trim().is_empty() {
            return Err(TileError::MissingServerAddress);
        }

        let cache_path = url_path(&format!("{server_address}/{path_to_data}"));
        let level_set = LevelSet::new(
            config.sector,
            config.level_zero_delta,
            config.num_levels,
            config.tile_width,
            config.tile_height,
        )?;

        Ok(Self {
            display_name: display_name.to_string(),
            cache_path,
            image_format: config.image_format.clone(),
            url_builder: LevelRowColumnUrlBuilder::new(server_address, path_to_data),
            selector: TileSelector::new(level_set, config.detail_control),
            images: TileCache::new(MemoryBudget::new(config.cache_bytes)),
        })
    }

    pub fn cache_path(&self) -> &str {
        &self.cache_path
    }

    pub fn level_set(&self) -> &LevelSet {
        &self.selector.level_set
    }

    pub fn resource_url(&self, tile: &Tile) -> String {
        self.url_builder.url_for_tile(&tile.key(), &self.image_format)
    }

    /// Selects the tiles for the view and sorts them into ready tiles and new
    /// requests. A tile already in flight is not requested again.
    pub fn assemble_tiles(&mut self, dc: &DrawContext<'_>) -> ImageryFrame {
        let tiles = self.selector.select(dc);
        let mut frame = ImageryFrame::default();
        for tile in &tiles {
            let key = tile.key();
            if self.images.get(&key).is_some() {
                frame.ready.push(key);
            } else if self.images.request(key) {
                frame.requests.push(ImageRequest {
                    key,
                    url: self.resource_url(tile),
                    image_path: format!("{}/{}", self.cache_path, key),
                });
            }
        }
        debug!(
            layer = %self.display_name,
            ready = frame.ready.len(),
            requested = frame.requests.len(),
            "assembled imagery tiles"
        );
        frame
    }

    /// Tiles asked for and not yet retrieved, oldest request first.
    pub fn pending_requests(&self) -> Vec<TileKey> {
        self.images.pending()
    }

    /// Stores retrieved image bytes, returning tiles evicted to make room.
    pub fn image_retrieved(&mut self, key: TileKey, image: Vec<u8>) -> Result<Vec<TileKey>, CacheError> {
        let bytes = image.len();
        self.images.insert(key, image, bytes)
    }

    /// Marks a failed retrieval so the tile is requested again next frame.
    pub fn image_failed(&mut self, key: TileKey) -> Result<(), CacheError> {
        self.images.evict(&key)
    }
}
