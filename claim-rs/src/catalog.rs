//! Artwork catalog and size availability
//!
//! Maps an artwork and size to the file that gets delivered. Sizes are
//! either downloadable now or listed as "coming soon".

use std::path::{Path, PathBuf};

use crate::config::ArtworkConfig;
use crate::error::{ClaimError, Result};

/// Sizes that can be downloaded for free
pub const AVAILABLE_SIZES: &[&str] = &["4x5", "8x10"];

/// Sizes shown to visitors but not downloadable yet
pub const COMING_SOON_SIZES: &[&str] = &["16x20", "40x50cm"];

/// Availability of a size id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeAvailability {
    Available,
    ComingSoon,
}

/// Availability of `size_id`, or `None` for an unknown size
pub fn availability(size_id: &str) -> Option<SizeAvailability> {
    if AVAILABLE_SIZES.contains(&size_id) {
        Some(SizeAvailability::Available)
    } else if COMING_SOON_SIZES.contains(&size_id) {
        Some(SizeAvailability::ComingSoon)
    } else {
        None
    }
}

/// Downloadable artworks backed by a directory of assets
pub struct Catalog {
    asset_dir: PathBuf,
    artworks: Vec<ArtworkConfig>,
}

impl Catalog {
    pub fn new(asset_dir: impl Into<PathBuf>, artworks: Vec<ArtworkConfig>) -> Self {
        Self {
            asset_dir: asset_dir.into(),
            artworks,
        }
    }

    pub fn asset_dir(&self) -> &Path {
        &self.asset_dir
    }

    /// Look up an artwork by id
    pub fn artwork(&self, artwork_id: &str) -> Result<&ArtworkConfig> {
        self.artworks
            .iter()
            .find(|a| a.id == artwork_id)
            .ok_or_else(|| ClaimError::UnknownArtwork(artwork_id.to_string()))
    }

    /// File delivered for one size of an artwork
    pub fn resolve_variant(&self, artwork_id: &str, size_id: &str) -> Result<PathBuf> {
        let artwork = self.artwork(artwork_id)?;

        match availability(size_id) {
            Some(SizeAvailability::Available) => Ok(self.asset_path(&artwork.id, size_id)),
            Some(SizeAvailability::ComingSoon) => {
                Err(ClaimError::VariantUnavailable(size_id.to_string()))
            }
            None => Err(ClaimError::UnknownVariant(size_id.to_string())),
        }
    }

    /// Every downloadable size of an artwork, as `(size_id, path)`
    pub fn bundle_assets(&self, artwork: &ArtworkConfig) -> Vec<(String, PathBuf)> {
        AVAILABLE_SIZES
            .iter()
            .map(|size| (size.to_string(), self.asset_path(&artwork.id, size)))
            .collect()
    }

    fn asset_path(&self, artwork_id: &str, size_id: &str) -> PathBuf {
        self.asset_dir.join(artwork_id).join(format!("{}.png", size_id))
    }
}

/// File-name friendly version of a title ("Neon Cityscape" -> "Neon-Cityscape")
pub fn file_stem(title: &str) -> String {
    title.split_whitespace().collect::<Vec<_>>().join("-")
}
