#![no_std]

pub mod animation;
pub mod bitmap;
pub mod config;
pub mod display;
pub mod face;
pub mod framebuffer;
pub mod fs;
pub mod renderer;
pub mod theme;

pub use animation::{Animation, AnimationKind};
pub use bitmap::{DecodeError, FaceBitmap, PngDecoder, RgbaImage};
pub use config::FaceConfig;
pub use face::FaceState;
pub use framebuffer::Framebuffer;
pub use theme::{Theme, ThemeError, ThemeManager};

extern crate alloc;
