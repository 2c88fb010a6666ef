use std::path::Path;

use image::{GrayImage, Luma, Rgba, RgbaImage};
use pwnface_core::{
    FaceConfig, FaceState, ThemeError,
    framebuffer::{Framebuffer, buffer_size},
    renderer,
};
use tempfile::TempDir;

const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const PAPER: Rgba<u8> = Rgba([255, 255, 255, 255]);
const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

fn write_file(path: &Path, data: &[u8]) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, data).unwrap();
}

fn write_png(path: &Path, image: &RgbaImage) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    image.save(path).unwrap();
}

/// Ink square in the top-left quadrant, `background` elsewhere.
fn quadrant(size: u32, background: Rgba<u8>) -> RgbaImage {
    RgbaImage::from_fn(size, size, |x, y| {
        if x < size / 2 && y < size / 2 { INK } else { background }
    })
}

fn manager(dir: &TempDir) -> pwnface_desktop::StdThemeManager {
    pwnface_desktop::theme_manager(FaceConfig::with_base_dir(dir.path().to_str().unwrap()))
}

#[test]
fn decodes_png_faces_to_ink_bits() {
    let dir = TempDir::new().unwrap();
    write_png(&dir.path().join("plain/HAPPY.png"), &quadrant(16, PAPER));
    write_png(&dir.path().join("plain/SAD.png"), &quadrant(16, CLEAR));
    let gray = GrayImage::from_fn(8, 8, |x, _| Luma([if x < 4 { 20 } else { 240 }]));
    gray.save(dir.path().join("plain/ANGRY.png")).unwrap();

    let mut themes = manager(&dir);
    let theme = themes.load("plain").unwrap();
    assert_eq!(theme.face_size(), (16, 16));

    for state in [FaceState::Happy, FaceState::Sad] {
        let face = theme.face(state).unwrap();
        assert_eq!(face.stride(), 2);
        assert!(face.get(0, 0));
        assert!(face.get(7, 7));
        assert!(!face.get(8, 0));
        assert!(!face.get(0, 8));
    }
    let angry = theme.face(FaceState::Angry).unwrap();
    assert_eq!(angry.data(), &[0xF0; 8]);
}

#[test]
fn lowercase_faces_in_subdirectory() {
    let dir = TempDir::new().unwrap();
    write_file(&dir.path().join("pack/README.md"), b"");
    write_png(&dir.path().join("pack/faces/happy.png"), &quadrant(8, PAPER));
    write_png(&dir.path().join("pack/faces/look_l.png"), &quadrant(8, PAPER));
    write_png(&dir.path().join("pack/faces/SAD.png"), &quadrant(8, PAPER));

    let mut themes = manager(&dir);
    let theme = themes.load("pack").unwrap();
    assert!(theme.use_lowercase());
    assert!(theme.faces_dir().ends_with("pack/faces"));
    assert_eq!(
        theme.loaded_states().collect::<Vec<_>>(),
        [FaceState::Happy, FaceState::LookL]
    );
}

#[test]
fn corrupt_png_skips_only_that_face() {
    let dir = TempDir::new().unwrap();
    write_png(&dir.path().join("t/HAPPY.png"), &quadrant(8, PAPER));
    write_file(&dir.path().join("t/SAD.png"), b"\x89PNG\r\n\x1a\nnot really");
    write_file(&dir.path().join("broken/HAPPY.png"), b"");

    let mut themes = manager(&dir);
    assert_eq!(themes.discover(), 1);
    assert_eq!(themes.loaded_names(), ["t"]);
    assert_eq!(themes.load("broken").err(), Some(ThemeError::ThemeLoadFailed));
    assert_eq!(themes.load("absent").err(), Some(ThemeError::ThemeNotFound));

    themes.set_active(Some("t")).unwrap();
    let happy = themes.face(FaceState::Happy).unwrap() as *const _;
    assert!(std::ptr::eq(themes.face(FaceState::Sad).unwrap(), happy));
}

#[test]
fn renders_scaled_theme_face() {
    let dir = TempDir::new().unwrap();
    write_png(&dir.path().join("big/HAPPY.png"), &quadrant(128, CLEAR));
    let mut themes = manager(&dir);
    themes.set_active(Some("big")).unwrap();

    let (width, height) = (250, 122);
    let mut buffer = vec![0u8; buffer_size(width, height)];
    let mut fb = Framebuffer::new(&mut buffer, width, height);
    assert!(renderer::render_by_string(&themes, &mut fb, 10, 40, "(◕‿‿◕)", true));

    let set: u32 = buffer.iter().map(|b| b.count_ones()).sum();
    assert_eq!(set, 32 * 32);
    let fb = Framebuffer::new(&mut buffer, width, height);
    assert_eq!(fb.get_pixel(10, 40), Some(true));
    assert_eq!(fb.get_pixel(41, 71), Some(true));
    assert_eq!(fb.get_pixel(42, 40), Some(false));
    assert_eq!(fb.get_pixel(9, 40), Some(false));
}

#[test]
fn directory_in_face_slot_is_skipped() {
    let dir = TempDir::new().unwrap();
    write_png(&dir.path().join("t/HAPPY.png"), &quadrant(8, PAPER));
    std::fs::create_dir_all(dir.path().join("t/SAD.png")).unwrap();
    write_png(&dir.path().join("t/ANGRY.png"), &quadrant(8, PAPER));

    let mut themes = manager(&dir);
    let theme = themes.load("t").unwrap();
    assert_eq!(
        theme.loaded_states().collect::<Vec<_>>(),
        [FaceState::Happy, FaceState::Angry]
    );
}

#[test]
fn opening_a_directory_as_file_fails_cleanly() {
    use pwnface_core::fs::Filesystem;

    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("t/SAD.png")).unwrap();
    let fs = pwnface_desktop::std_fs::StdFilesystem::new_with_base_path(dir.path().into());
    assert_eq!(
        fs.open_file("t/SAD.png").err(),
        Some(embedded_io::ErrorKind::Unsupported)
    );
    assert_eq!(
        fs.open_file("t/HAPPY.png").err(),
        Some(embedded_io::ErrorKind::NotFound)
    );
}

#[test]
fn stray_files_at_base_level_are_not_themes() {
    let dir = TempDir::new().unwrap();
    write_png(&dir.path().join("a/HAPPY.png"), &quadrant(8, PAPER));
    write_png(&dir.path().join("HAPPY.png"), &quadrant(8, PAPER));
    write_file(&dir.path().join("notes.txt"), b"not a theme");

    let mut themes = manager(&dir);
    assert_eq!(themes.available(), ["a"]);
    assert_eq!(themes.discover(), 1);
    assert_eq!(themes.load("notes.txt").err(), Some(ThemeError::ThemeNotFound));
}

#[cfg(unix)]
#[test]
fn dangling_symlinks_do_not_hide_themes() {
    use std::os::unix::fs::symlink;

    let dir = TempDir::new().unwrap();
    write_png(&dir.path().join("a/HAPPY.png"), &quadrant(8, PAPER));
    write_png(&dir.path().join("b/HAPPY.png"), &quadrant(8, PAPER));
    symlink(dir.path().join("gone"), dir.path().join("old-theme")).unwrap();

    write_png(&dir.path().join("c/faces/HAPPY.png"), &quadrant(8, PAPER));
    symlink(dir.path().join("c/missing"), dir.path().join("c/link")).unwrap();

    let mut themes = manager(&dir);
    assert_eq!(themes.available(), ["a", "b", "c"]);
    assert_eq!(themes.discover(), 3);
    assert!(themes.get("c").unwrap().faces_dir().ends_with("c/faces"));
}

#[cfg(unix)]
#[test]
fn symlinked_theme_directory_is_followed() {
    use std::os::unix::fs::symlink;

    let dir = TempDir::new().unwrap();
    write_png(&dir.path().join("real/HAPPY.png"), &quadrant(8, PAPER));
    symlink(dir.path().join("real"), dir.path().join("alias")).unwrap();

    let mut themes = manager(&dir);
    assert_eq!(themes.available(), ["alias", "real"]);
    assert!(themes.load("alias").is_ok());
}
