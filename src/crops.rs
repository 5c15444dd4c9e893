//! Locations of the cropped screenshot regions shown next to each label cell.

use std::path::{Path, PathBuf};

use crate::predictables::{FullModelType, PlayerId};

/// Resolves crop files laid out as `<root>/<fmt>/<match stem>_<player>_<item>.<ext>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CropResolver {
    root: PathBuf,
    image_ext: String,
}

impl CropResolver {
    pub fn new(root: impl Into<PathBuf>, image_ext: impl Into<String>) -> Self {
        let image_ext = image_ext.into();
        Self {
            root: root.into(),
            image_ext: image_ext.trim_start_matches('.').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the crop for one cell of a match screenshot.
    pub fn crop_path(
        &self,
        fmt: FullModelType,
        filename: &str,
        player_id: PlayerId,
        item_index: usize,
    ) -> PathBuf {
        let stem = Path::new(filename)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(filename);
        self.root.join(fmt.to_string()).join(format!(
            "{stem}_{player_id}_{item_index}.{}",
            self.image_ext
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_path_uses_match_stem_and_cell_position() {
        let resolver = CropResolver::new("/data/crops", ".jpg");
        let fmt = "perks__surv".parse().unwrap();
        assert_eq!(
            resolver.crop_path(fmt, "match_0012.png", 2, 3),
            PathBuf::from("/data/crops/perks__surv/match_0012_2_3.jpg")
        );
    }

    #[test]
    fn crop_path_keeps_filename_without_extension() {
        let resolver = CropResolver::new("crops", "png");
        let fmt = "item__killer".parse().unwrap();
        assert_eq!(
            resolver.crop_path(fmt, "raw", 4, 0),
            PathBuf::from("crops/item__killer/raw_4_0.png")
        );
    }
}
