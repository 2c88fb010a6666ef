use std::time::Instant;

use argh::FromArgs;
use log::{info, warn};
use pwnface_core::{
    Animation, AnimationKind, FaceConfig, FaceState,
    config::{THEME_BASE_DIR, THEME_DEFAULT},
    display::{Panel, refresh},
};
use strum::{EnumCount, IntoEnumIterator};

use crate::minifb_display::{Key, MinifbDisplay};

mod minifb_display;

#[derive(FromArgs)]
/// Preview custom face themes in a simulated e-paper window
struct Args {
    /// directory holding one subdirectory per theme
    #[argh(option, short = 'd', default = "String::from(THEME_BASE_DIR)")]
    themes_dir: String,

    /// theme to activate at startup
    #[argh(option, short = 't', default = "String::from(THEME_DEFAULT)")]
    theme: String,

    /// face scale in percent (20-200)
    #[argh(option, short = 's', default = "100")]
    scale: u32,

    /// face position as x,y
    #[argh(option, default = "(0, 40)", from_str_fn(parse_position))]
    position: (i32, i32),

    /// invert the output
    #[argh(switch, short = 'i')]
    invert: bool,

    /// start with text faces instead of theme bitmaps
    #[argh(switch)]
    text: bool,

    /// animation to start with (look, look-happy, sleep, upload, download)
    #[argh(option, short = 'a', default = "AnimationKind::None", from_str_fn(parse_animation))]
    animation: AnimationKind,

    /// animation frame interval in milliseconds
    #[argh(option, default = "0")]
    interval: i32,
}

fn parse_position(value: &str) -> Result<(i32, i32), String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| String::from("expected x,y"))?;
    let parse = |v: &str| v.trim().parse::<i32>().map_err(|err| err.to_string());
    Ok((parse(x)?, parse(y)?))
}

fn parse_animation(value: &str) -> Result<AnimationKind, String> {
    value
        .parse()
        .map_err(|_| format!("unknown animation '{}'", value))
}

impl Args {
    fn config(&self) -> FaceConfig {
        let mut config = FaceConfig::with_base_dir(&self.themes_dir);
        config.default_theme = self.theme.clone();
        config.set_scale_percent(self.scale);
        config.position = self.position;
        config.invert = self.invert;
        config
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();
    let mut themes = pwnface_desktop::theme_manager(args.config());
    themes.discover();
    let default_theme = themes.config().default_theme.clone();
    if let Err(err) = themes.set_active(Some(default_theme.as_str())) {
        warn!("Theme '{}' unavailable ({}), using text faces", default_theme, err);
    }
    if args.text {
        themes.set_enabled(false);
    }

    let mut display = match MinifbDisplay::new(false) {
        Ok(display) => display,
        Err(err) => {
            log::error!("Unable to open window: {}", err);
            std::process::exit(1);
        }
    };
    let mut buffer = vec![0u8; display.buffer_size()];

    let start = Instant::now();
    let now_ms = || start.elapsed().as_millis() as u32;

    let mut animation = Animation::new();
    if args.animation != AnimationKind::None {
        animation.start(args.animation, args.interval, now_ms());
    }
    let mut face = 0usize;
    let mut dirty = true;

    info!("Arrows: face, A: animation, T: theme, I: invert, Esc: quit");
    while display.is_open() {
        for key in display.update() {
            match key {
                Key::NextFace => face = (face + 1) % FaceState::COUNT,
                Key::PreviousFace => face = (face + FaceState::COUNT - 1) % FaceState::COUNT,
                Key::NextAnimation => {
                    let next = AnimationKind::iter()
                        .cycle()
                        .skip_while(|kind| *kind != animation.kind())
                        .nth(1)
                        .unwrap_or_default();
                    if next == AnimationKind::None {
                        animation.stop();
                    } else {
                        animation.start(next, args.interval, now_ms());
                    }
                    info!("Animation: {}", next.label());
                }
                Key::NextTheme => {
                    let names = themes.available();
                    let next = themes
                        .active_name()
                        .and_then(|name| names.iter().position(|n| n == name))
                        .map_or(0, |i| i + 1);
                    match names.get(next) {
                        Some(name) => {
                            if let Err(err) = themes.set_active(Some(name.as_str())) {
                                warn!("Cannot activate '{}': {}", name, err);
                            }
                        }
                        None => {
                            themes.set_active(None).ok();
                            info!("Text faces");
                        }
                    }
                }
                Key::Invert => {
                    let inverted = !display.inverted();
                    display.set_inverted(inverted);
                }
            }
            dirty = true;
        }
        dirty |= animation.tick(now_ms());

        if dirty {
            let state = FaceState::from_index(face).unwrap_or_default();
            let shown = refresh(&mut display, &mut buffer, &themes, &animation, state.name());
            log::debug!(
                "Showing {} ({})",
                shown.name(),
                themes.active_name().unwrap_or("text")
            );
            dirty = false;
        }
    }
}
