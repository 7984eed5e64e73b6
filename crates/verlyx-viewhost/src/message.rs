//! Window-manager notifications a [`PlatformWindow`](crate::PlatformWindow) reacts to.

use crate::Bounds;

/// Raw Win32 message ids for the notifications decoded here.
pub(crate) mod wm {
    pub const DESTROY: u32 = 0x0002;
    pub const SIZE: u32 = 0x0005;
    pub const ACTIVATE: u32 = 0x0006;
    pub const NCDESTROY: u32 = 0x0082;
    pub const DPICHANGED: u32 = 0x02E0;
    pub const DWMCOLORIZATIONCOLORCHANGED: u32 = 0x0320;
}

/// `WA_INACTIVE` in the low word of the `WM_ACTIVATE` wparam.
const WA_INACTIVE: usize = 0;

/// A decoded window message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowMessage {
    /// The OS is destroying the window.
    Destroy,
    /// Last message the window will ever receive.
    NcDestroy,
    /// The window moved to a monitor with a different DPI; `suggested` is the
    /// rectangle the OS wants the window to occupy.
    DpiChanged { dpi: u32, suggested: Bounds },
    /// Client area resized.
    Size { width: u32, height: u32 },
    /// Window activated or deactivated.
    Activate { active: bool },
    /// System colorization / theme changed.
    ThemeChanged,
    /// Anything else, passed to the default handler untouched.
    Other {
        message: u32,
        wparam: usize,
        lparam: isize,
    },
}

/// What the caller of [`PlatformWindow::handle_message`](crate::PlatformWindow::handle_message)
/// must do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOutcome {
    /// Fully handled; return this value to the OS.
    Handled(isize),
    /// Run the OS default handler.
    Default,
}

impl WindowMessage {
    /// Decode a raw message. `suggested_rect` reads the rectangle a
    /// `WM_DPICHANGED` lparam points at; it is only called for that message.
    pub fn decode(
        message: u32,
        wparam: usize,
        lparam: isize,
        suggested_rect: impl FnOnce() -> Option<Bounds>,
    ) -> Self {
        match message {
            wm::DESTROY => Self::Destroy,
            wm::NCDESTROY => Self::NcDestroy,
            wm::DPICHANGED => match suggested_rect() {
                Some(suggested) => Self::DpiChanged {
                    dpi: loword(wparam as isize),
                    suggested,
                },
                None => Self::Other {
                    message,
                    wparam,
                    lparam,
                },
            },
            wm::SIZE => Self::Size {
                width: loword(lparam),
                height: hiword(lparam),
            },
            wm::ACTIVATE => Self::Activate {
                active: (wparam & 0xFFFF) != WA_INACTIVE,
            },
            wm::DWMCOLORIZATIONCOLORCHANGED => Self::ThemeChanged,
            _ => Self::Other {
                message,
                wparam,
                lparam,
            },
        }
    }
}

fn loword(value: isize) -> u32 {
    (value & 0xFFFF) as u32
}

fn hiword(value: isize) -> u32 {
    ((value >> 16) & 0xFFFF) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(message: u32, wparam: usize, lparam: isize) -> WindowMessage {
        WindowMessage::decode(message, wparam, lparam, || None)
    }

    #[test]
    fn test_decode_size() {
        let lparam = (600 << 16) | 800;
        assert_eq!(
            decode(wm::SIZE, 0, lparam),
            WindowMessage::Size {
                width: 800,
                height: 600
            }
        );
    }

    #[test]
    fn test_decode_activate() {
        assert_eq!(
            decode(wm::ACTIVATE, 1, 0),
            WindowMessage::Activate { active: true }
        );
        assert_eq!(
            decode(wm::ACTIVATE, 0, 0),
            WindowMessage::Activate { active: false }
        );
    }

    #[test]
    fn test_decode_dpi_changed() {
        let suggested = Bounds::new(100, 100, 1920, 1080);
        let wparam = (144 << 16) | 144;
        let message = WindowMessage::decode(wm::DPICHANGED, wparam, 0x1000, || Some(suggested));
        assert_eq!(
            message,
            WindowMessage::DpiChanged {
                dpi: 144,
                suggested
            }
        );
    }

    #[test]
    fn test_dpi_changed_without_rect_passes_through() {
        assert!(matches!(
            decode(wm::DPICHANGED, 144, 0),
            WindowMessage::Other { message: wm::DPICHANGED, .. }
        ));
    }

    #[test]
    fn test_decode_lifecycle_and_theme() {
        assert_eq!(decode(wm::DESTROY, 0, 0), WindowMessage::Destroy);
        assert_eq!(decode(wm::NCDESTROY, 0, 0), WindowMessage::NcDestroy);
        assert_eq!(
            decode(wm::DWMCOLORIZATIONCOLORCHANGED, 0, 0),
            WindowMessage::ThemeChanged
        );
    }

    #[test]
    fn test_rect_reader_only_used_for_dpi_change() {
        let message = WindowMessage::decode(wm::SIZE, 0, 0, || {
            panic!("rect reader called for WM_SIZE")
        });
        assert!(matches!(message, WindowMessage::Size { .. }));
    }

    #[test]
    fn test_unknown_message_passes_through() {
        assert_eq!(
            decode(0x000F, 7, -3),
            WindowMessage::Other {
                message: 0x000F,
                wparam: 7,
                lparam: -3
            }
        );
    }
}
