//! The OS seam: every call a [`PlatformWindow`](crate::PlatformWindow) makes
//! into the window system goes through [`WindowBackend`].

use crate::{
    Bounds, ChildContent, NativeHandle, OwnedWindow, Point, ThemeDecoration, ViewHostError,
    WindowClass,
};
use std::ffi::c_void;

/// Parameters for creating a top-level window.
#[derive(Debug)]
pub struct CreateRequest<'a> {
    pub class: &'a WindowClass,
    pub title: &'a str,
    /// Already scaled to device pixels.
    pub bounds: Bounds,
    /// Per-window user data handed to the OS on creation. The Win32 window
    /// procedure reads it back to find the owning instance.
    pub user_data: *const c_void,
}

/// Window-system operations used by the window state machine.
///
/// Implementations are only ever called from the UI thread.
pub trait WindowBackend: 'static {
    /// Register the shared window class. Registering an already registered
    /// class succeeds.
    fn register_class(&self, class: &WindowClass) -> Result<(), ViewHostError>;

    fn unregister_class(&self, class: &WindowClass);

    /// DPI of the monitor nearest `point` (logical coordinates).
    fn dpi_for_point(&self, point: Point) -> u32;

    fn create_window(&self, request: &CreateRequest<'_>) -> Result<OwnedWindow, ViewHostError>;

    fn destroy_window(&self, window: OwnedWindow);

    /// Stop routing notifications for `window` to the instance that created it.
    fn detach_window(&self, window: NativeHandle);

    /// Show in the normal (restored, activated) state; true if now visible.
    fn show_window(&self, window: NativeHandle) -> bool;

    /// Client area of `window`, origin at (0, 0).
    fn client_rect(&self, window: NativeHandle) -> Bounds;

    fn set_parent(&self, child: ChildContent, parent: NativeHandle);

    fn move_window(&self, child: ChildContent, bounds: Bounds);

    fn set_focus(&self, child: ChildContent);

    /// Move and resize a top-level window without touching z-order or activation.
    fn set_window_pos(&self, window: NativeHandle, bounds: Bounds);

    fn apply_theme(&self, window: NativeHandle, theme: &ThemeDecoration)
        -> Result<(), ViewHostError>;

    /// Ask the thread's event loop to exit with `exit_code`.
    fn post_quit(&self, exit_code: i32);
}
