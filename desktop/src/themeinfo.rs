use argh::FromArgs;
use pwnface_core::{
    FaceBitmap, FaceConfig, FaceState, face,
    config::{THEME_BASE_DIR, THEME_DEFAULT},
    framebuffer::{Framebuffer, buffer_size},
    renderer,
};
use strum::IntoEnumIterator;

#[derive(FromArgs)]
/// Inspect installed face themes
struct Args {
    /// directory holding one subdirectory per theme
    #[argh(option, short = 'd', default = "String::from(THEME_BASE_DIR)")]
    themes_dir: String,

    /// theme to inspect with --face
    #[argh(option, short = 't', default = "String::from(THEME_DEFAULT)")]
    theme: String,

    /// print this face (state name, file name or emoticon) as ASCII art
    #[argh(option, short = 'f')]
    face: Option<String>,

    /// scale in percent applied when printing a face
    #[argh(option, short = 's', default = "100")]
    scale: u32,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Args = argh::from_env();
    let mut config = FaceConfig::with_base_dir(&args.themes_dir);
    config.set_scale_percent(args.scale);
    let mut themes = pwnface_desktop::theme_manager(config);

    let Some(token) = args.face else {
        if themes.discover() == 0 {
            println!("No themes found in {}", args.themes_dir);
            return;
        }
        for theme in themes.themes() {
            let (w, h) = theme.face_size();
            let missing: Vec<&str> = FaceState::iter()
                .filter(|state| theme.face(*state).is_none())
                .map(FaceState::name)
                .collect();
            println!(
                "{}: {} faces, {}x{}, {} ({})",
                theme.name(),
                theme.loaded_states().count(),
                w,
                h,
                theme.faces_dir(),
                if theme.use_lowercase() { "lowercase" } else { "uppercase" }
            );
            if !missing.is_empty() {
                println!("  missing: {}", missing.join(" "));
            }
        }
        return;
    };

    if let Err(err) = themes.set_active(Some(args.theme.as_str())) {
        eprintln!("Cannot load theme '{}': {}", args.theme, err);
        std::process::exit(1);
    }
    let state = face::resolve(&token);
    let Some(bitmap) = themes.face(state) else {
        eprintln!("Theme '{}' has no face for {}", args.theme, state.name());
        std::process::exit(1);
    };
    print!("{}", ascii_art(bitmap, themes.config().target_edge()));
}

/// The face as drawn on a panel, `#` for ink.
fn ascii_art(bitmap: &FaceBitmap, target_edge: u32) -> String {
    let (width, height) = renderer::scaled_size(bitmap.width(), bitmap.height(), target_edge);
    let mut buffer = vec![0u8; buffer_size(width, height)];
    let mut fb = Framebuffer::new(&mut buffer, width, height);
    renderer::blit(&mut fb, bitmap, 0, 0, target_edge, true);

    let mut out = String::with_capacity(((width + 1) * height) as usize);
    for y in 0..height as i32 {
        for x in 0..width as i32 {
            out.push(if fb.get_pixel(x, y) == Some(true) { '#' } else { '.' });
        }
        out.push('\n');
    }
    out
}
