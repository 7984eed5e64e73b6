//! A [`WindowBackend`] that records calls instead of talking to an OS.
//!
//! Used by this crate's tests and by downstream crates that want to drive a
//! [`PlatformWindow`](crate::PlatformWindow) headlessly.

use crate::{
    backend::{CreateRequest, WindowBackend},
    Bounds, ChildContent, NativeHandle, OwnedWindow, Point, ThemeDecoration, ViewHostError,
    WindowClass,
};
use std::cell::RefCell;
use std::rc::Rc;

/// First handle value handed out by [`RecordingBackend::create_window`].
const FIRST_HANDLE: isize = 0x1000;

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    RegisterClass(&'static str),
    UnregisterClass(&'static str),
    CreateWindow { title: String, bounds: Bounds },
    DestroyWindow(NativeHandle),
    DetachWindow(NativeHandle),
    ShowWindow(NativeHandle),
    SetParent { child: NativeHandle, parent: NativeHandle },
    MoveWindow { child: NativeHandle, bounds: Bounds },
    SetFocus(NativeHandle),
    SetWindowPos { window: NativeHandle, bounds: Bounds },
    ApplyTheme { window: NativeHandle, theme: ThemeDecoration },
    PostQuit(i32),
}

#[derive(Debug)]
struct State {
    calls: Vec<BackendCall>,
    dpi: u32,
    client_rect: Bounds,
    show_result: bool,
    fail_registration: bool,
    fail_create: bool,
    fail_theme: bool,
    next_handle: isize,
}

impl Default for State {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            dpi: crate::BASE_DPI,
            client_rect: Bounds::new(0, 0, 1280, 720),
            show_result: true,
            fail_registration: false,
            fail_create: false,
            fail_theme: false,
            next_handle: FIRST_HANDLE,
        }
    }
}

/// Recording backend. Clones share the same call log, so a test can keep one
/// clone while the window owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    state: Rc<RefCell<State>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `dpi` for every monitor.
    pub fn with_dpi(self, dpi: u32) -> Self {
        self.state.borrow_mut().dpi = dpi;
        self
    }

    pub fn with_client_rect(self, rect: Bounds) -> Self {
        self.set_client_rect(rect);
        self
    }

    /// What `show_window` reports.
    pub fn with_show_result(self, visible: bool) -> Self {
        self.state.borrow_mut().show_result = visible;
        self
    }

    pub fn failing_registration(self) -> Self {
        self.state.borrow_mut().fail_registration = true;
        self
    }

    pub fn failing_create(self) -> Self {
        self.state.borrow_mut().fail_create = true;
        self
    }

    pub fn failing_theme(self) -> Self {
        self.state.borrow_mut().fail_theme = true;
        self
    }

    /// Change the client area reported from now on, e.g. after a simulated resize.
    pub fn set_client_rect(&self, rect: Bounds) {
        self.state.borrow_mut().client_rect = rect;
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.state.borrow().calls.clone()
    }

    pub fn count(&self, predicate: impl Fn(&BackendCall) -> bool) -> usize {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|call| predicate(call))
            .count()
    }

    /// Device-pixel bounds of every window creation attempt, in order.
    pub fn created_bounds(&self) -> Vec<Bounds> {
        self.state
            .borrow()
            .calls
            .iter()
            .filter_map(|call| match call {
                BackendCall::CreateWindow { bounds, .. } => Some(*bounds),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.state.borrow_mut().calls.clear();
    }

    fn record(&self, call: BackendCall) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl WindowBackend for RecordingBackend {
    fn register_class(&self, class: &WindowClass) -> Result<(), ViewHostError> {
        self.record(BackendCall::RegisterClass(class.name()));
        if self.state.borrow().fail_registration {
            return Err(ViewHostError::ClassRegistration {
                class: class.name(),
                reason: "registration refused".into(),
            });
        }
        Ok(())
    }

    fn unregister_class(&self, class: &WindowClass) {
        self.record(BackendCall::UnregisterClass(class.name()));
    }

    fn dpi_for_point(&self, _point: Point) -> u32 {
        self.state.borrow().dpi
    }

    fn create_window(&self, request: &CreateRequest<'_>) -> Result<OwnedWindow, ViewHostError> {
        self.record(BackendCall::CreateWindow {
            title: request.title.to_string(),
            bounds: request.bounds,
        });

        let mut state = self.state.borrow_mut();
        if state.fail_create {
            return Err(ViewHostError::WindowCreation("creation refused".into()));
        }
        let handle = NativeHandle::from_raw(state.next_handle);
        state.next_handle += 1;
        Ok(OwnedWindow::new(handle))
    }

    fn destroy_window(&self, window: OwnedWindow) {
        self.record(BackendCall::DestroyWindow(window.handle()));
    }

    fn detach_window(&self, window: NativeHandle) {
        self.record(BackendCall::DetachWindow(window));
    }

    fn show_window(&self, window: NativeHandle) -> bool {
        self.record(BackendCall::ShowWindow(window));
        self.state.borrow().show_result
    }

    fn client_rect(&self, _window: NativeHandle) -> Bounds {
        self.state.borrow().client_rect
    }

    fn set_parent(&self, child: ChildContent, parent: NativeHandle) {
        self.record(BackendCall::SetParent {
            child: child.handle(),
            parent,
        });
    }

    fn move_window(&self, child: ChildContent, bounds: Bounds) {
        self.record(BackendCall::MoveWindow {
            child: child.handle(),
            bounds,
        });
    }

    fn set_focus(&self, child: ChildContent) {
        self.record(BackendCall::SetFocus(child.handle()));
    }

    fn set_window_pos(&self, window: NativeHandle, bounds: Bounds) {
        self.record(BackendCall::SetWindowPos { window, bounds });
    }

    fn apply_theme(
        &self,
        window: NativeHandle,
        theme: &ThemeDecoration,
    ) -> Result<(), ViewHostError> {
        self.record(BackendCall::ApplyTheme {
            window,
            theme: *theme,
        });
        if self.state.borrow().fail_theme {
            return Err(ViewHostError::WindowsApi("DwmSetWindowAttribute failed".into()));
        }
        Ok(())
    }

    fn post_quit(&self, exit_code: i32) {
        self.record(BackendCall::PostQuit(exit_code));
    }
}
