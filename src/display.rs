use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use image::RgbImage;

/// Write `image` to `path`, creating parent directories.
pub fn save(image: &RgbImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    image
        .save(path)
        .with_context(|| format!("failed to save annotated image {}", path.display()))?;
    log::info!("saved annotated image to {}", path.display());
    Ok(())
}

/// Whether this build can open a viewer window.
pub fn can_show() -> bool {
    cfg!(feature = "gui")
}

/// Open a window showing `image`; blocks until it is closed.
#[cfg(feature = "gui")]
pub fn show(image: &RgbImage, title: &str) -> Result<()> {
    crate::gui::view_image(image, title)
}

#[cfg(not(feature = "gui"))]
pub fn show(_image: &RgbImage, _title: &str) -> Result<()> {
    anyhow::bail!("built without the `gui` feature; use --output to save the image instead")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_creates_missing_directories() -> Result<()> {
        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join("nested/out/annotated.png");

        save(&RgbImage::new(4, 3), &path)?;

        let reloaded = image::open(&path)?;
        assert_eq!((reloaded.width(), reloaded.height()), (4, 3));
        Ok(())
    }
}
