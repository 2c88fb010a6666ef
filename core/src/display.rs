use crate::{
    animation::Animation,
    bitmap::PngDecoder,
    face::FaceState,
    framebuffer::{Framebuffer, buffer_size},
    fs::Filesystem,
    renderer,
    theme::ThemeManager,
};

/// A 1-bit panel that is refreshed from a packed framebuffer.
pub trait Panel {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Panel draws set bits as black instead of white.
    fn inverted(&self) -> bool {
        false
    }
    fn show(&mut self, buffer: &[u8]);

    fn buffer_size(&self) -> usize {
        buffer_size(self.width(), self.height())
    }
}

/// One display refresh: clears `buffer` to paper, draws the current face at
/// the configured position and pushes the result to `panel`.
pub fn refresh<P, Fs, Decoder>(
    panel: &mut P,
    buffer: &mut [u8],
    themes: &ThemeManager<Fs, Decoder>,
    animation: &Animation,
    token: &str,
) -> FaceState
where
    P: Panel,
    Fs: Filesystem,
    Decoder: PngDecoder,
{
    let invert = themes.config().invert ^ panel.inverted();
    let (x, y) = themes.config().position;
    let mut fb = Framebuffer::new(buffer, panel.width(), panel.height());
    fb.clear_screen(if invert { 0x00 } else { 0xFF });
    let state = renderer::render_face(themes, animation, &mut fb, x, y, token, invert);
    panel.show(fb.buffer());
    state
}

#[cfg(test)]
mod tests {
    use alloc::{vec, vec::Vec};

    use super::*;
    use crate::{
        bitmap::raw::{self, RawDecoder},
        config::FaceConfig,
        fs::memory::MemoryFilesystem,
    };

    struct Recorder {
        inverted: bool,
        frames: Vec<Vec<u8>>,
    }

    impl Panel for Recorder {
        fn width(&self) -> u32 {
            16
        }

        fn height(&self) -> u32 {
            4
        }

        fn inverted(&self) -> bool {
            self.inverted
        }

        fn show(&mut self, buffer: &[u8]) {
            self.frames.push(buffer.to_vec());
        }
    }

    fn themes() -> ThemeManager<MemoryFilesystem, RawDecoder> {
        let fs = MemoryFilesystem::new();
        fs.add_file("themes/t/HAPPY.png", &raw::solid(8, 4, [0, 0, 0, 255]));
        let mut config = FaceConfig::with_base_dir("themes");
        config.position = (8, 0);
        let mut mgr = ThemeManager::new(fs, RawDecoder, config);
        mgr.set_active(Some("t")).unwrap();
        mgr
    }

    #[test]
    fn refresh_draws_at_configured_position() {
        let mgr = themes();
        let mut panel = Recorder {
            inverted: false,
            frames: Vec::new(),
        };
        let mut buffer = vec![0u8; panel.buffer_size()];
        let state = refresh(&mut panel, &mut buffer, &mgr, &Animation::new(), "HAPPY");
        assert_eq!(state, FaceState::Happy);
        assert_eq!(panel.frames, [vec![0xFF, 0x00, 0xFF, 0x00, 0xFF, 0x00, 0xFF, 0x00]]);
    }

    #[test]
    fn inverted_panel_flips_polarity() {
        let mut mgr = themes();
        let mut panel = Recorder {
            inverted: true,
            frames: Vec::new(),
        };
        let mut buffer = vec![0u8; panel.buffer_size()];
        refresh(&mut panel, &mut buffer, &mgr, &Animation::new(), "HAPPY");
        assert_eq!(panel.frames[0], [0x00, 0xFF, 0x00, 0xFF, 0x00, 0xFF, 0x00, 0xFF]);

        // Configured inversion cancels the panel's.
        mgr.config_mut().invert = true;
        refresh(&mut panel, &mut buffer, &mgr, &Animation::new(), "HAPPY");
        assert_eq!(panel.frames[1], [0xFF, 0x00, 0xFF, 0x00, 0xFF, 0x00, 0xFF, 0x00]);
    }
}
