//! Theme discovery, loading and the active-theme context.
//!
//! A theme is a directory below the configured base directory that holds one
//! PNG per [`FaceState`], either directly or in a single subdirectory. The
//! directory is found by probing for `HAPPY.png` / `happy.png`, and whichever
//! casing is found first fixes the file name convention for the whole theme.

use alloc::{string::String, vec::Vec};

use log::{debug, info, warn};
use strum::IntoEnumIterator;

use crate::{
    bitmap::{DecodeError, FaceBitmap, PngDecoder},
    config::FaceConfig,
    face::{FACE_STATE_COUNT, FaceState},
    fs::{self, DirEntry, Directory, Filesystem},
};

const PROBE_UPPER: &str = "HAPPY.png";
const PROBE_LOWER: &str = "happy.png";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeError {
    /// `<base>/<name>` is not a directory.
    ThemeNotFound,
    /// No directory inside the theme holds a probe file.
    NoFacesFound,
    /// Faces directory found, but not a single face decoded.
    ThemeLoadFailed,
    Io(embedded_io::ErrorKind),
}

impl core::fmt::Display for ThemeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ThemeError::ThemeNotFound => f.write_str("theme directory not found"),
            ThemeError::NoFacesFound => f.write_str("no faces directory in theme"),
            ThemeError::ThemeLoadFailed => f.write_str("no face of the theme could be decoded"),
            ThemeError::Io(kind) => write!(f, "i/o error: {:?}", kind),
        }
    }
}

impl core::error::Error for ThemeError {}

type Result<T> = core::result::Result<T, ThemeError>;

#[derive(Debug)]
pub struct Theme {
    name: String,
    path: String,
    faces_dir: String,
    faces: Vec<FaceBitmap>,
    face_width: u32,
    face_height: u32,
    loaded: bool,
    use_lowercase: bool,
}

impl Theme {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Directory the face images were read from.
    pub fn faces_dir(&self) -> &str {
        &self.faces_dir
    }

    /// Size of the first face that decoded. Other faces may differ.
    pub fn face_size(&self) -> (u32, u32) {
        (self.face_width, self.face_height)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn use_lowercase(&self) -> bool {
        self.use_lowercase
    }

    /// Bitmap for exactly `state`, if that face loaded.
    pub fn face(&self, state: FaceState) -> Option<&FaceBitmap> {
        self.faces.get(state.index()).filter(|face| face.is_loaded())
    }

    /// Bitmap for `state`, falling back to the happy face.
    pub fn face_or_default(&self, state: FaceState) -> Option<&FaceBitmap> {
        self.face(state).or_else(|| self.face(FaceState::Happy))
    }

    pub fn loaded_states(&self) -> impl Iterator<Item = FaceState> + '_ {
        FaceState::iter().filter(|state| self.face(*state).is_some())
    }

    fn unload(&mut self) {
        for face in &mut self.faces {
            face.release();
        }
        self.loaded = false;
    }
}

/// Owns every loaded theme and tracks the active one.
///
/// This is the context object handed to every face entry point; there is no
/// global state. It is not synchronized, callers sharing it across threads
/// must serialize access themselves.
pub struct ThemeManager<Fs: Filesystem, Decoder: PngDecoder> {
    fs: Fs,
    decoder: Decoder,
    config: FaceConfig,
    themes: Vec<Theme>,
    active: Option<usize>,
}

impl<Fs: Filesystem, Decoder: PngDecoder> ThemeManager<Fs, Decoder> {
    pub fn new(fs: Fs, decoder: Decoder, config: FaceConfig) -> Self {
        info!("Theme manager using base directory {}", config.base_dir);
        Self {
            fs,
            decoder,
            config,
            themes: Vec::new(),
            active: None,
        }
    }

    pub fn config(&self) -> &FaceConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut FaceConfig {
        &mut self.config
    }

    pub fn themes(&self) -> &[Theme] {
        &self.themes
    }

    pub fn get(&self, name: &str) -> Option<&Theme> {
        self.themes.iter().find(|theme| theme.name == name)
    }

    pub fn loaded_names(&self) -> Vec<&str> {
        self.themes
            .iter()
            .filter(|theme| theme.loaded)
            .map(|theme| theme.name.as_str())
            .collect()
    }

    /// Theme directory names present on disk, sorted.
    pub fn available(&self) -> Vec<String> {
        let dir = match self.fs.open_directory(&self.config.base_dir) {
            Ok(dir) => dir,
            Err(err) => {
                warn!("Cannot open themes directory {}: {:?}", self.config.base_dir, err);
                return Vec::new();
            }
        };
        let entries = match dir.list() {
            Ok(entries) => entries,
            Err(err) => {
                warn!("Cannot list themes directory {}: {:?}", self.config.base_dir, err);
                return Vec::new();
            }
        };
        let mut names: Vec<String> = entries
            .iter()
            .filter(|entry| entry.is_directory() && !entry.name().starts_with('.'))
            .map(|entry| String::from(entry.name()))
            .collect();
        names.sort();
        names
    }

    /// Loads every theme found on disk. Returns how many loaded.
    pub fn discover(&mut self) -> usize {
        let mut count = 0;
        for name in self.available() {
            match self.load(&name) {
                Ok(theme) => {
                    let (w, h) = theme.face_size();
                    info!(
                        "Discovered theme: {} ({} faces, {}x{})",
                        name,
                        theme.loaded_states().count(),
                        w,
                        h
                    );
                    count += 1;
                }
                Err(err) => warn!("Skipping theme {}: {}", name, err),
            }
        }
        info!("Theme discovery finished: {} themes loaded", count);
        count
    }

    /// Returns the cached theme, loading it from disk on first use.
    pub fn load(&mut self, name: &str) -> Result<&Theme> {
        let index = self.load_index(name)?;
        Ok(&self.themes[index])
    }

    fn load_index(&mut self, name: &str) -> Result<usize> {
        let cached = self.themes.iter().position(|theme| theme.name == name);
        if let Some(index) = cached {
            if self.themes[index].loaded {
                return Ok(index);
            }
        }

        let theme = self.read_theme(name)?;
        match cached {
            Some(index) => {
                self.themes[index] = theme;
                Ok(index)
            }
            None => {
                self.themes.push(theme);
                Ok(self.themes.len() - 1)
            }
        }
    }

    /// Releases the bitmaps of `name`; the slot stays and can be reloaded.
    pub fn unload(&mut self, name: &str) -> bool {
        let Some(index) = self.themes.iter().position(|theme| theme.name == name) else {
            return false;
        };
        self.themes[index].unload();
        if self.active == Some(index) {
            self.active = None;
        }
        info!("Unloaded theme '{}'", name);
        true
    }

    /// Releases every theme.
    pub fn clear(&mut self) {
        for theme in &mut self.themes {
            theme.unload();
        }
        self.themes.clear();
        self.active = None;
    }

    /// Activates `name` (loading it if needed) and enables theme rendering.
    /// `None` clears the active theme and falls back to text. On error the
    /// previously active theme is kept.
    pub fn set_active(&mut self, name: Option<&str>) -> Result<()> {
        let Some(name) = name else {
            self.active = None;
            self.config.enabled = false;
            return Ok(());
        };
        let index = self.load_index(name)?;
        self.active = Some(index);
        self.config.enabled = true;
        info!("Active theme set to '{}'", name);
        Ok(())
    }

    pub fn active(&self) -> Option<&Theme> {
        self.active
            .and_then(|index| self.themes.get(index))
            .filter(|theme| theme.loaded)
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active().map(Theme::name)
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
    }

    /// Theme bitmaps are drawn only when enabled and a theme is active.
    pub fn themes_enabled(&self) -> bool {
        self.config.enabled && self.active().is_some()
    }

    /// Active theme's bitmap for `state`, with the happy fallback.
    pub fn face(&self, state: FaceState) -> Option<&FaceBitmap> {
        self.active()?.face_or_default(state)
    }

    fn read_theme(&self, name: &str) -> Result<Theme> {
        if name.is_empty() || name == "." || name == ".." || name.contains('/') {
            return Err(ThemeError::ThemeNotFound);
        }
        let path = fs::join(&self.config.base_dir, name);
        if !self.fs.is_directory(&path).map_err(ThemeError::Io)? {
            warn!("Theme directory not found: {}", path);
            return Err(ThemeError::ThemeNotFound);
        }

        let Some((faces_dir, use_lowercase)) = self.find_faces_dir(&path) else {
            warn!("No faces found in theme '{}'", name);
            return Err(ThemeError::NoFacesFound);
        };
        info!(
            "Loading theme '{}' from {} (lowercase={})",
            name, faces_dir, use_lowercase
        );

        let mut faces = Vec::with_capacity(FACE_STATE_COUNT);
        let mut size = None;
        for state in FaceState::iter() {
            let file_path = fs::join(&faces_dir, &state.file_name(use_lowercase));
            let face = match self.read_face(&file_path) {
                Ok(face) => {
                    debug!("Loaded {}: {}x{}", file_path, face.width(), face.height());
                    if size.is_none() {
                        size = Some((face.width(), face.height()));
                    }
                    face
                }
                Err(DecodeError::Missing) => {
                    debug!("No face for {} in theme '{}'", state.name(), name);
                    FaceBitmap::default()
                }
                Err(err) => {
                    warn!("Failed to decode {}: {}", file_path, err);
                    FaceBitmap::default()
                }
            };
            faces.push(face);
        }

        let Some((face_width, face_height)) = size else {
            warn!("Failed to load any faces for theme '{}'", name);
            return Err(ThemeError::ThemeLoadFailed);
        };
        let theme = Theme {
            name: String::from(name),
            path,
            faces_dir,
            faces,
            face_width,
            face_height,
            loaded: true,
            use_lowercase,
        };
        info!(
            "Loaded theme '{}' with {} faces ({}x{})",
            name,
            theme.loaded_states().count(),
            face_width,
            face_height
        );
        Ok(theme)
    }

    fn read_face(&self, path: &str) -> core::result::Result<FaceBitmap, DecodeError> {
        let mut file = self.fs.open_file(path).map_err(|kind| match kind {
            embedded_io::ErrorKind::NotFound => DecodeError::Missing,
            kind => DecodeError::Io(kind),
        })?;
        FaceBitmap::decode(&self.decoder, &mut file)
    }

    /// Probes the theme root, then each visible subdirectory in name order.
    fn find_faces_dir(&self, theme_path: &str) -> Option<(String, bool)> {
        if let Some(lowercase) = self.probe(theme_path) {
            return Some((String::from(theme_path), lowercase));
        }

        let entries = self
            .fs
            .open_directory(theme_path)
            .and_then(|dir| dir.list())
            .map_err(|err| warn!("Cannot open theme directory {}: {:?}", theme_path, err))
            .ok()?;
        let mut subdirs: Vec<&str> = entries
            .iter()
            .filter(|entry| entry.is_directory())
            .map(|entry| entry.name())
            .filter(|name| !name.starts_with('.') && !name.starts_with("__"))
            .collect();
        subdirs.sort_unstable();

        subdirs.into_iter().find_map(|subdir| {
            let path = fs::join(theme_path, subdir);
            self.probe(&path).map(|lowercase| (path, lowercase))
        })
    }

    /// `Some(lowercase)` if `dir` holds a probe file.
    fn probe(&self, dir: &str) -> Option<bool> {
        let is_file = |name: &str| {
            let path = fs::join(dir, name);
            matches!(self.fs.exists(&path), Ok(true))
                && matches!(self.fs.is_directory(&path), Ok(false))
        };
        if is_file(PROBE_UPPER) {
            Some(false)
        } else if is_file(PROBE_LOWER) {
            Some(true)
        } else {
            None
        }
    }
}
