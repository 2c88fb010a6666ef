use alloc::string::String;

pub const THEME_BASE_DIR: &str = "/etc/pwnagotchi/custom-faces";
pub const THEME_DEFAULT: &str = "default";

/// Faces with a larger edge than this (at 100%) are scaled down.
pub const FACE_TARGET_EDGE: u32 = 64;

pub const SCALE_MIN: u8 = 20;
pub const SCALE_MAX: u8 = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceConfig {
    pub base_dir: String,
    pub default_theme: String,
    scale_percent: u8,
    /// Theme bitmaps instead of text faces.
    pub enabled: bool,
    pub position: (i32, i32),
    /// Panel reports inverted polarity.
    pub invert: bool,
}

impl Default for FaceConfig {
    fn default() -> Self {
        Self {
            base_dir: String::from(THEME_BASE_DIR),
            default_theme: String::from(THEME_DEFAULT),
            scale_percent: 100,
            enabled: false,
            position: (0, 40),
            invert: false,
        }
    }
}

impl FaceConfig {
    pub fn with_base_dir(base_dir: &str) -> Self {
        Self {
            base_dir: String::from(base_dir),
            ..Self::default()
        }
    }

    pub fn scale_percent(&self) -> u8 {
        self.scale_percent
    }

    pub fn set_scale_percent(&mut self, percent: u32) {
        self.scale_percent = percent.clamp(SCALE_MIN as u32, SCALE_MAX as u32) as u8;
    }

    /// Largest edge a face may be drawn at.
    pub fn target_edge(&self) -> u32 {
        (FACE_TARGET_EDGE * self.scale_percent as u32 / 100).max(1)
    }
}
