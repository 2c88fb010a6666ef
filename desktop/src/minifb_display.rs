use log::info;
use pwnface_core::display::Panel;

/// Waveshare 2.13" panel used by most builds.
pub const WIDTH: usize = 250;
pub const HEIGHT: usize = 122;

const BLACK: u32 = 0xFF000000;
const WHITE: u32 = 0xFFFFFFFF;

/// Keys the preview reacts to, reported once per press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    NextFace,
    PreviousFace,
    NextAnimation,
    NextTheme,
    Invert,
}

pub struct MinifbDisplay {
    display_buffer: Box<[u32; WIDTH * HEIGHT]>,
    window: minifb::Window,
    inverted: bool,
}

impl MinifbDisplay {
    pub fn new(inverted: bool) -> Result<Self, minifb::Error> {
        let options = minifb::WindowOptions {
            borderless: false,
            title: true,
            resize: false,
            scale: minifb::Scale::X4,
            ..minifb::WindowOptions::default()
        };
        let mut window = minifb::Window::new("pwnface", WIDTH, HEIGHT, options)?;
        window.set_target_fps(30);
        Ok(Self {
            display_buffer: Box::new([WHITE; WIDTH * HEIGHT]),
            window,
            inverted,
        })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(minifb::Key::Escape)
    }

    pub fn set_inverted(&mut self, inverted: bool) {
        info!("Panel polarity inverted: {}", inverted);
        self.inverted = inverted;
    }

    /// Pumps window events and returns the keys pressed since the last call.
    pub fn update(&mut self) -> Vec<Key> {
        self.window.update();
        self.window
            .get_keys_pressed(minifb::KeyRepeat::No)
            .into_iter()
            .filter_map(|key| match key {
                minifb::Key::Right | minifb::Key::Down => Some(Key::NextFace),
                minifb::Key::Left | minifb::Key::Up => Some(Key::PreviousFace),
                minifb::Key::A => Some(Key::NextAnimation),
                minifb::Key::T => Some(Key::NextTheme),
                minifb::Key::I => Some(Key::Invert),
                _ => None,
            })
            .collect()
    }
}

impl Panel for MinifbDisplay {
    fn width(&self) -> u32 {
        WIDTH as u32
    }

    fn height(&self) -> u32 {
        HEIGHT as u32
    }

    fn inverted(&self) -> bool {
        self.inverted
    }

    fn show(&mut self, buffer: &[u8]) {
        let (on, off) = if self.inverted {
            (BLACK, WHITE)
        } else {
            (WHITE, BLACK)
        };
        for (i, pixel) in self.display_buffer.iter_mut().enumerate() {
            let set = buffer
                .get(i / 8)
                .is_some_and(|byte| byte & (0x80 >> (i % 8)) != 0);
            *pixel = if set { on } else { off };
        }
        if let Err(err) = self
            .window
            .update_with_buffer(&*self.display_buffer, WIDTH, HEIGHT)
        {
            log::error!("Failed to update window: {}", err);
        }
    }
}
