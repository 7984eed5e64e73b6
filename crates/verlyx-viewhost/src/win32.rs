//! Win32 backend and window procedure.

use crate::{
    backend::{CreateRequest, WindowBackend},
    Bounds, ChildContent, MessageOutcome, NativeHandle, OwnedWindow, PlatformWindow, Point,
    ThemeDecoration, ViewHostError, WindowClass, WindowMessage, BASE_DPI,
};
use std::ffi::c_void;
use tracing::{debug, error, trace, warn};
use windows::{
    core::PCWSTR,
    Win32::{
        Foundation::{
            GetLastError, BOOL, ERROR_CLASS_ALREADY_EXISTS, HINSTANCE, HWND, LPARAM, LRESULT,
            POINT, RECT, WPARAM,
        },
        Graphics::{
            Dwm::{DwmSetWindowAttribute, DWMWA_CAPTION_COLOR, DWMWA_USE_IMMERSIVE_DARK_MODE},
            Gdi::{MonitorFromPoint, HBRUSH, MONITOR_DEFAULTTONEAREST},
        },
        System::LibraryLoader::GetModuleHandleW,
        UI::{
            HiDpi::{
                EnableNonClientDpiScaling, GetDpiForMonitor, SetProcessDpiAwarenessContext,
                DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2, MDT_EFFECTIVE_DPI,
            },
            Input::KeyboardAndMouse::SetFocus,
            WindowsAndMessaging::*,
        },
    },
};

/// The window type the window procedure dispatches to.
type Win32Window = PlatformWindow<Win32Backend>;

/// [`WindowBackend`] over the Win32 API.
#[derive(Debug, Clone, Copy)]
pub struct Win32Backend {
    instance: HINSTANCE,
}

impl Win32Backend {
    /// Backend for the current module. Enables per-monitor DPI awareness for
    /// the process.
    pub fn new() -> Self {
        enable_dpi_awareness();
        let instance = unsafe { GetModuleHandleW(None) }
            .map(HINSTANCE::from)
            .unwrap_or_default();
        Self { instance }
    }
}

impl Default for Win32Backend {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowBackend for Win32Backend {
    fn register_class(&self, class: &WindowClass) -> Result<(), ViewHostError> {
        let name = wide(class.name());
        let icon = class
            .icon_resource()
            .and_then(|id| unsafe { LoadIconW(self.instance, make_int_resource(id)) }.ok())
            .or_else(|| unsafe { LoadIconW(None, IDI_APPLICATION) }.ok())
            .unwrap_or_default();

        let wc = WNDCLASSEXW {
            cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
            style: CS_HREDRAW | CS_VREDRAW,
            lpfnWndProc: Some(wnd_proc),
            cbClsExtra: 0,
            cbWndExtra: 0,
            hInstance: self.instance,
            hIcon: icon,
            hCursor: unsafe { LoadCursorW(None, IDC_ARROW) }.unwrap_or_default(),
            hbrBackground: HBRUSH::default(),
            lpszMenuName: PCWSTR::null(),
            lpszClassName: PCWSTR::from_raw(name.as_ptr()),
            hIconSm: HICON::default(),
        };

        let atom = unsafe { RegisterClassExW(&wc) };
        if atom == 0 {
            let err = unsafe { GetLastError() };
            if err == ERROR_CLASS_ALREADY_EXISTS {
                debug!(class = class.name(), "Window class already registered");
                return Ok(());
            }
            return Err(ViewHostError::ClassRegistration {
                class: class.name(),
                reason: windows::core::Error::from(err).to_string(),
            });
        }
        Ok(())
    }

    fn unregister_class(&self, class: &WindowClass) {
        let name = wide(class.name());
        if let Err(e) = unsafe { UnregisterClassW(PCWSTR::from_raw(name.as_ptr()), self.instance) } {
            warn!(class = class.name(), error = %e, "Failed to unregister window class");
        }
    }

    fn dpi_for_point(&self, point: Point) -> u32 {
        let point = POINT {
            x: point.x as i32,
            y: point.y as i32,
        };
        let (mut dpi_x, mut dpi_y) = (0u32, 0u32);
        let result = unsafe {
            let monitor = MonitorFromPoint(point, MONITOR_DEFAULTTONEAREST);
            GetDpiForMonitor(monitor, MDT_EFFECTIVE_DPI, &mut dpi_x, &mut dpi_y)
        };
        match result {
            Ok(()) if dpi_x != 0 => dpi_x,
            _ => {
                trace!(?point, "Monitor DPI unavailable, assuming {BASE_DPI}");
                BASE_DPI
            }
        }
    }

    fn create_window(&self, request: &CreateRequest<'_>) -> Result<OwnedWindow, ViewHostError> {
        let class = wide(request.class.name());
        let title = wide(request.title);
        let bounds = request.bounds;

        let hwnd = unsafe {
            CreateWindowExW(
                WINDOW_EX_STYLE(0),
                PCWSTR::from_raw(class.as_ptr()),
                PCWSTR::from_raw(title.as_ptr()),
                WS_OVERLAPPEDWINDOW,
                bounds.x,
                bounds.y,
                bounds.width as i32,
                bounds.height as i32,
                None,
                None,
                self.instance,
                Some(request.user_data),
            )
        }
        .map_err(|e| ViewHostError::WindowCreation(e.to_string()))?;

        if hwnd.0.is_null() {
            let err = std::io::Error::last_os_error();
            error!(?err, "CreateWindowExW returned a null window");
            return Err(ViewHostError::WindowCreation(err.to_string()));
        }

        Ok(OwnedWindow::new(to_native(hwnd)))
    }

    fn destroy_window(&self, window: OwnedWindow) {
        if let Err(e) = unsafe { DestroyWindow(to_hwnd(window.handle())) } {
            warn!(handle = ?window.handle(), error = %e, "DestroyWindow failed");
        }
    }

    fn detach_window(&self, window: NativeHandle) {
        unsafe { SetWindowLongPtrW(to_hwnd(window), GWLP_USERDATA, 0) };
    }

    fn show_window(&self, window: NativeHandle) -> bool {
        unsafe { ShowWindow(to_hwnd(window), SW_SHOWNORMAL) }.as_bool()
    }

    fn client_rect(&self, window: NativeHandle) -> Bounds {
        let mut rect = RECT::default();
        match unsafe { GetClientRect(to_hwnd(window), &mut rect) } {
            Ok(()) => Bounds::from_edges(rect.left, rect.top, rect.right, rect.bottom),
            Err(e) => {
                warn!(handle = ?window, error = %e, "GetClientRect failed");
                Bounds::zero()
            }
        }
    }

    fn set_parent(&self, child: ChildContent, parent: NativeHandle) {
        if let Err(e) = unsafe { SetParent(to_hwnd(child.handle()), to_hwnd(parent)) } {
            warn!(?child, error = %e, "SetParent failed");
        }
    }

    fn move_window(&self, child: ChildContent, bounds: Bounds) {
        let result = unsafe {
            MoveWindow(
                to_hwnd(child.handle()),
                bounds.x,
                bounds.y,
                bounds.width as i32,
                bounds.height as i32,
                true,
            )
        };
        if let Err(e) = result {
            warn!(?child, error = %e, "MoveWindow failed");
        }
    }

    fn set_focus(&self, child: ChildContent) {
        let _ = unsafe { SetFocus(to_hwnd(child.handle())) };
    }

    fn set_window_pos(&self, window: NativeHandle, bounds: Bounds) {
        let result = unsafe {
            SetWindowPos(
                to_hwnd(window),
                None,
                bounds.x,
                bounds.y,
                bounds.width as i32,
                bounds.height as i32,
                SWP_NOZORDER | SWP_NOACTIVATE,
            )
        };
        if let Err(e) = result {
            warn!(handle = ?window, error = %e, "SetWindowPos failed");
        }
    }

    fn apply_theme(
        &self,
        window: NativeHandle,
        theme: &ThemeDecoration,
    ) -> Result<(), ViewHostError> {
        let hwnd = to_hwnd(window);
        let dark = BOOL::from(theme.dark_mode);
        unsafe {
            DwmSetWindowAttribute(
                hwnd,
                DWMWA_CAPTION_COLOR,
                &theme.caption_color as *const u32 as *const c_void,
                std::mem::size_of::<u32>() as u32,
            )
            .map_err(|e| ViewHostError::WindowsApi(e.to_string()))?;

            DwmSetWindowAttribute(
                hwnd,
                DWMWA_USE_IMMERSIVE_DARK_MODE,
                &dark as *const BOOL as *const c_void,
                std::mem::size_of::<BOOL>() as u32,
            )
            .map_err(|e| ViewHostError::WindowsApi(e.to_string()))
        }
    }

    fn post_quit(&self, exit_code: i32) {
        unsafe { PostQuitMessage(exit_code) };
    }
}

/// Window procedure for every [`PlatformWindow`] class.
unsafe extern "system" fn wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    if msg == WM_NCCREATE {
        if let Some(create) = (lparam.0 as *const CREATESTRUCTW).as_ref() {
            SetWindowLongPtrW(hwnd, GWLP_USERDATA, create.lpCreateParams as isize);
            let _ = EnableNonClientDpiScaling(hwnd);
            if let Some(window) = (create.lpCreateParams as *const Win32Window).as_ref() {
                window.attach(to_native(hwnd));
            }
        }
        return DefWindowProcW(hwnd, msg, wparam, lparam);
    }

    let window = GetWindowLongPtrW(hwnd, GWLP_USERDATA) as *const Win32Window;
    let Some(window) = window.as_ref() else {
        return DefWindowProcW(hwnd, msg, wparam, lparam);
    };

    if msg == WM_NCDESTROY {
        SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0);
    }

    let message = WindowMessage::decode(msg, wparam.0, lparam.0, || {
        (lparam.0 as *const RECT)
            .as_ref()
            .map(|rect| Bounds::from_edges(rect.left, rect.top, rect.right, rect.bottom))
    });

    match window.handle_message(to_native(hwnd), message) {
        MessageOutcome::Handled(result) => LRESULT(result),
        MessageOutcome::Default => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

/// Opt the process into per-monitor DPI awareness, falling back to system
/// awareness on older Windows.
pub fn enable_dpi_awareness() {
    unsafe {
        if SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2).is_err() {
            let _ = SetProcessDPIAware();
        }
    }
}

/// Pump messages until `WM_QUIT`. Returns the exit code it carried.
pub fn run_message_loop() -> Result<i32, ViewHostError> {
    let mut msg = MSG::default();
    loop {
        let status = unsafe { GetMessageW(&mut msg, None, 0, 0) };
        match status.0 {
            0 => break,
            -1 => {
                let err = std::io::Error::last_os_error();
                error!(?err, "GetMessageW failed");
                return Err(ViewHostError::MessageLoop(err.to_string()));
            }
            _ => unsafe {
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
            },
        }
    }

    let exit_code = msg.wParam.0 as i32;
    debug!(exit_code, "Message loop finished");
    Ok(exit_code)
}

/// Create a centered static text control as stand-in content for `parent`.
///
/// The returned child belongs to the caller, who must release it with
/// [`destroy_placeholder_content`].
pub fn create_placeholder_content(
    parent: NativeHandle,
    text: &str,
) -> Result<ChildContent, ViewHostError> {
    let class = wide("STATIC");
    let text = wide(text);
    let instance = unsafe { GetModuleHandleW(None) }
        .map(HINSTANCE::from)
        .unwrap_or_default();

    let hwnd = unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE(0),
            PCWSTR::from_raw(class.as_ptr()),
            PCWSTR::from_raw(text.as_ptr()),
            WS_CHILD | WS_VISIBLE | WINDOW_STYLE(SS_CENTER.0),
            0,
            0,
            0,
            0,
            to_hwnd(parent),
            None,
            instance,
            None,
        )
    }
    .map_err(|e| ViewHostError::Content(e.to_string()))?;

    Ok(ChildContent::new(to_native(hwnd)))
}

pub fn destroy_placeholder_content(child: ChildContent) {
    if let Err(e) = unsafe { DestroyWindow(to_hwnd(child.handle())) } {
        debug!(?child, error = %e, "Placeholder content already gone");
    }
}

fn to_hwnd(handle: NativeHandle) -> HWND {
    HWND(handle.raw() as *mut c_void)
}

fn to_native(hwnd: HWND) -> NativeHandle {
    NativeHandle::from_raw(hwnd.0 as isize)
}

/// `MAKEINTRESOURCEW`.
fn make_int_resource(id: u16) -> PCWSTR {
    PCWSTR(id as usize as *const u16)
}

fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_is_nul_terminated() {
        assert_eq!(wide("ab"), vec![b'a' as u16, b'b' as u16, 0]);
    }

    #[test]
    fn test_handle_conversion() {
        let handle = NativeHandle::from_raw(0x1234);
        assert_eq!(to_native(to_hwnd(handle)), handle);
    }

    #[test]
    fn test_make_int_resource() {
        assert_eq!(make_int_resource(101).0 as usize, 101);
    }
}
