//! # Verlyx ViewHost
//!
//! Native top-level window hosting for the Verlyx Hub runner.
//! Creates the OS window, sizes it under per-monitor DPI scaling, embeds the
//! engine's child surface, and forwards resize, activation, DPI, theme, and
//! destroy notifications to it.
//!
//! ## Layout
//!
//! 1. [`PlatformWindow`]: the window state machine, generic over the OS seam
//! 2. [`WindowBackend`]: every OS call the window makes
//! 3. `win32`: the Win32 backend and window procedure (Windows only)
//! 4. `linux`: the GTK one-shot constructor (Linux, `gtk` feature)
//! 5. [`testing`]: a recording backend for driving windows without an OS

use thiserror::Error;

mod backend;
mod class;
mod message;
mod window;

pub mod testing;

#[cfg(windows)]
pub mod win32;

#[cfg(all(target_os = "linux", feature = "gtk"))]
pub mod linux;

pub use backend::{CreateRequest, WindowBackend};
pub use class::{active_count, is_registered, WindowClass, DEFAULT_CLASS_NAME};
pub use message::{MessageOutcome, WindowMessage};
pub use window::{Lifecycle, NoopDelegate, PlatformWindow, WindowDelegate};

/// DPI at which logical units equal device pixels.
pub const BASE_DPI: u32 = 96;

/// Scale factor for `dpi` relative to [`BASE_DPI`]. A zero DPI (query failed)
/// is treated as unscaled.
pub fn scale_factor(dpi: u32) -> f64 {
    if dpi == 0 {
        1.0
    } else {
        f64::from(dpi) / f64::from(BASE_DPI)
    }
}

/// Multiply a logical coordinate by `scale` and truncate toward zero.
pub fn scale(logical: f64, scale: f64) -> i32 {
    (logical * scale) as i32
}

/// A position in logical (96 DPI) units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A size in logical (96 DPI) units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Rectangle in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn zero() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Build from edge coordinates; inverted edges collapse to zero extent.
    pub fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            x: left,
            y: top,
            width: right.saturating_sub(left).max(0) as u32,
            height: bottom.saturating_sub(top).max(0) as u32,
        }
    }

    /// Device-pixel rectangle for a logical origin and size under `scale_factor`.
    pub fn scaled(origin: Point, size: Size, scale_factor: f64) -> Self {
        Self {
            x: scale(origin.x, scale_factor),
            y: scale(origin.y, scale_factor),
            width: scale(size.width, scale_factor).max(0) as u32,
            height: scale(size.height, scale_factor).max(0) as u32,
        }
    }
}

/// Raw OS window identifier. Carries no ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeHandle(isize);

impl NativeHandle {
    pub const fn from_raw(raw: isize) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> isize {
        self.0
    }
}

/// A top-level window this process created and must destroy.
///
/// Not `Copy`: the only way to release it is to hand it back to
/// [`WindowBackend::destroy_window`].
#[derive(Debug, PartialEq, Eq)]
pub struct OwnedWindow(NativeHandle);

impl OwnedWindow {
    /// Tag a freshly created top-level handle as owned. Backends only.
    pub fn new(handle: NativeHandle) -> Self {
        Self(handle)
    }

    pub fn handle(&self) -> NativeHandle {
        self.0
    }
}

/// An externally created child surface. Positioned and focused, never
/// destroyed, by the window that hosts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildContent(NativeHandle);

impl ChildContent {
    pub const fn new(handle: NativeHandle) -> Self {
        Self(handle)
    }

    pub fn handle(&self) -> NativeHandle {
        self.0
    }
}

/// Title bar decoration requested from the compositor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeDecoration {
    /// Request dark window chrome.
    pub dark_mode: bool,
    /// Caption COLORREF; [`ThemeDecoration::DEFAULT_CAPTION_COLOR`] keeps the system color.
    pub caption_color: u32,
}

impl ThemeDecoration {
    /// `DWMWA_COLOR_DEFAULT`.
    pub const DEFAULT_CAPTION_COLOR: u32 = 0xFFFF_FFFF;
}

impl Default for ThemeDecoration {
    fn default() -> Self {
        Self {
            dark_mode: true,
            caption_color: Self::DEFAULT_CAPTION_COLOR,
        }
    }
}

/// Errors that can occur in the ViewHost.
#[derive(Error, Debug)]
pub enum ViewHostError {
    #[error("Failed to register window class {class}: {reason}")]
    ClassRegistration { class: &'static str, reason: String },

    #[error("Failed to create window: {0}")]
    WindowCreation(String),

    #[error("Window has not been created")]
    NotCreated,

    #[error("Embedded content error: {0}")]
    Content(String),

    #[error("Windows API error: {0}")]
    WindowsApi(String),

    #[error("Message loop failed: {0}")]
    MessageLoop(String),
}
