//! Scaled, clipped blitting of theme faces into a [`Framebuffer`].

use embedded_graphics::{
    Drawable,
    mono_font::{MonoTextStyle, ascii::FONT_6X10},
    pixelcolor::BinaryColor,
    prelude::Point,
    text::{Baseline, Text},
};
use log::debug;

use crate::{
    animation::Animation,
    bitmap::{FaceBitmap, PngDecoder},
    face::{self, FaceState},
    framebuffer::Framebuffer,
    fs::Filesystem,
    theme::ThemeManager,
};

/// Drawn size of a `width` x `height` face. Faces larger than `target_edge`
/// on either axis shrink uniformly by the larger axis; nothing is enlarged.
pub fn scaled_size(width: u32, height: u32, target_edge: u32) -> (u32, u32) {
    if width <= target_edge && height <= target_edge {
        return (width, height);
    }
    let longest = width.max(height) as u64;
    let scale = |len: u32| ((len as u64 * target_edge as u64 / longest) as u32).max(1);
    (scale(width), scale(height))
}

/// Nearest-neighbour blit of `face` with its top-left corner at (`x`, `y`).
///
/// Each destination bit is `!ink ^ invert`. Pixels outside the framebuffer
/// are skipped.
pub fn blit(
    fb: &mut Framebuffer<'_>,
    face: &FaceBitmap,
    x: i32,
    y: i32,
    target_edge: u32,
    invert: bool,
) {
    let (src_w, src_h) = (face.width(), face.height());
    let (dst_w, dst_h) = scaled_size(src_w, src_h, target_edge);
    debug!(
        "Blit {}x{} -> {}x{} at ({}, {}) into {}x{}",
        src_w,
        src_h,
        dst_w,
        dst_h,
        x,
        y,
        fb.width(),
        fb.height()
    );

    // Only walk the part of the destination that lands on the panel.
    let visible = |origin: i32, len: u32, limit: u32| {
        let start = (-(origin as i64)).clamp(0, len as i64) as u32;
        let end = (limit as i64 - origin as i64).clamp(0, len as i64) as u32;
        start..end.max(start)
    };
    let rows = visible(y, dst_h, fb.height());
    let cols = visible(x, dst_w, fb.width());

    for dy in rows {
        let sy = (dy as u64 * src_h as u64 / dst_h as u64) as u32;
        let screen_y = (y as i64 + dy as i64) as i32;
        for dx in cols.clone() {
            let sx = (dx as u64 * src_w as u64 / dst_w as u64) as u32;
            let screen_x = (x as i64 + dx as i64) as i32;
            fb.set_pixel(screen_x, screen_y, !face.get(sx, sy) ^ invert);
        }
    }
}

/// Draws the active theme's face for `state`, falling back to its happy
/// face. Returns `false` without touching the framebuffer when neither is
/// available.
pub fn render<Fs: Filesystem, Decoder: PngDecoder>(
    themes: &ThemeManager<Fs, Decoder>,
    fb: &mut Framebuffer<'_>,
    x: i32,
    y: i32,
    state: FaceState,
    invert: bool,
) -> bool {
    let Some(face) = themes.face(state) else {
        return false;
    };
    blit(fb, face, x, y, themes.config().target_edge(), invert);
    true
}

pub fn render_by_string<Fs: Filesystem, Decoder: PngDecoder>(
    themes: &ThemeManager<Fs, Decoder>,
    fb: &mut Framebuffer<'_>,
    x: i32,
    y: i32,
    token: &str,
    invert: bool,
) -> bool {
    render(themes, fb, x, y, face::resolve(token), invert)
}

/// The state to show: a running animation always wins over `token`.
pub fn effective_state(animation: &Animation, token: &str) -> FaceState {
    animation
        .current_frame()
        .unwrap_or_else(|| face::resolve(token))
}

pub fn render_animated<Fs: Filesystem, Decoder: PngDecoder>(
    themes: &ThemeManager<Fs, Decoder>,
    animation: &Animation,
    fb: &mut Framebuffer<'_>,
    x: i32,
    y: i32,
    token: &str,
    invert: bool,
) -> bool {
    render(themes, fb, x, y, effective_state(animation, token), invert)
}

/// Draws the ASCII emoticon for `state` in the same polarity as face ink.
pub fn render_text(fb: &mut Framebuffer<'_>, x: i32, y: i32, state: FaceState, invert: bool) {
    let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::from(invert));
    Text::with_baseline(state.fallback_text(), Point::new(x, y), style, Baseline::Top)
        .draw(fb)
        .ok();
}

/// Draws whatever face the display loop should show right now: the theme
/// bitmap when theme rendering is enabled and one is available, the text
/// emoticon otherwise. Returns the state that was drawn.
pub fn render_face<Fs: Filesystem, Decoder: PngDecoder>(
    themes: &ThemeManager<Fs, Decoder>,
    animation: &Animation,
    fb: &mut Framebuffer<'_>,
    x: i32,
    y: i32,
    token: &str,
    invert: bool,
) -> FaceState {
    let state = effective_state(animation, token);
    if !(themes.themes_enabled() && render(themes, fb, x, y, state, invert)) {
        render_text(fb, x, y, state, invert);
    }
    state
}
