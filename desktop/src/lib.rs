pub mod png;
pub mod std_fs;

use pwnface_core::{FaceConfig, ThemeManager};

pub type StdThemeManager = ThemeManager<std_fs::StdFilesystem, png::ImageDecoder>;

/// Theme manager over the host filesystem. Relative base directories are
/// resolved against the working directory.
pub fn theme_manager(config: FaceConfig) -> StdThemeManager {
    ThemeManager::new(std_fs::StdFilesystem::default(), png::ImageDecoder, config)
}
