//! The top-level window that hosts the embedded engine view.

use crate::{
    backend::{CreateRequest, WindowBackend},
    class, scale_factor, Bounds, ChildContent, MessageOutcome, NativeHandle, OwnedWindow, Point,
    Size, ThemeDecoration, ViewHostError, WindowClass, WindowMessage,
};
use std::cell::{Cell, RefCell};
use std::ffi::c_void;
use std::marker::PhantomPinned;
use std::pin::Pin;
use tracing::{debug, error, info, trace, warn};

/// Hooks for the layer that owns the embedded view.
pub trait WindowDelegate<B: WindowBackend> {
    /// Called once the OS window exists, before `create` returns. This is where
    /// the embedded view is created and attached with
    /// [`PlatformWindow::set_child_content`]. An error fails `create`.
    fn on_created(&self, window: &PlatformWindow<B>) -> Result<(), ViewHostError> {
        let _ = window;
        Ok(())
    }

    /// Called at the start of teardown while the OS window may still be alive.
    fn on_destroy(&self, window: &PlatformWindow<B>) {
        let _ = window;
    }
}

/// Delegate with no embedded view.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDelegate;

impl<B: WindowBackend> WindowDelegate<B> for NoopDelegate {}

/// Where a window is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Constructed, never created.
    Idle,
    /// OS window exists.
    Live,
    /// Teardown in progress; re-entrant teardown requests are ignored.
    TearingDown,
    /// Torn down; `create` may be called again.
    Destroyed,
}

/// A native top-level window with one embedded child surface.
///
/// All state uses interior mutability: the OS re-enters the window procedure
/// while `create` and teardown are running, so every method takes `&self`.
/// Instances are pinned because their address is stored as per-window user
/// data. Not `Send`; lives and dies on the UI thread.
pub struct PlatformWindow<B: WindowBackend> {
    backend: B,
    class: WindowClass,
    delegate: Box<dyn WindowDelegate<B>>,
    window: RefCell<Option<OwnedWindow>>,
    child: Cell<Option<ChildContent>>,
    quit_on_close: Cell<bool>,
    visible: Cell<bool>,
    theme: Cell<ThemeDecoration>,
    lifecycle: Cell<Lifecycle>,
    _pin: PhantomPinned,
}

impl<B: WindowBackend> PlatformWindow<B> {
    /// Count a new instance against `class`. No OS resources are created.
    pub fn new(
        backend: B,
        class: WindowClass,
        delegate: impl WindowDelegate<B> + 'static,
    ) -> Pin<Box<Self>> {
        let active = class::acquire(&class);
        trace!(class = class.name(), active, "PlatformWindow constructed");

        Box::pin(Self {
            backend,
            class,
            delegate: Box::new(delegate),
            window: RefCell::new(None),
            child: Cell::new(None),
            quit_on_close: Cell::new(false),
            visible: Cell::new(false),
            theme: Cell::new(ThemeDecoration::default()),
            lifecycle: Cell::new(Lifecycle::Idle),
            _pin: PhantomPinned,
        })
    }

    /// Create the OS window with `origin` and `size` given in logical units.
    ///
    /// Any window this instance already owns is torn down first. Origin and
    /// size are scaled by the DPI of the monitor nearest `origin`; later DPI
    /// changes are handled by `WindowMessage::DpiChanged`.
    pub fn create(&self, title: &str, origin: Point, size: Size) -> Result<(), ViewHostError> {
        self.destroy();

        class::ensure_registered(&self.backend, &self.class)?;

        let dpi = self.backend.dpi_for_point(origin);
        let scale = scale_factor(dpi);
        let bounds = Bounds::scaled(origin, size, scale);
        debug!(title, dpi, scale, ?bounds, "Creating window");

        let request = CreateRequest {
            class: &self.class,
            title,
            bounds,
            user_data: self as *const Self as *const c_void,
        };
        let window = self.backend.create_window(&request).map_err(|e| {
            error!(error = %e, title, "Window creation failed");
            e
        })?;

        let handle = window.handle();
        // The Win32 procedure may already have attached this handle during
        // WM_NCCREATE; either way this is now the owned window.
        self.window.replace(Some(window));
        self.lifecycle.set(Lifecycle::Live);

        self.update_theme(handle);

        if let Some(child) = self.child.get() {
            self.embed_child(child, handle);
        }

        if let Err(e) = self.delegate.on_created(self) {
            error!(error = %e, "Window delegate rejected creation");
            self.destroy();
            return Err(e);
        }

        info!(?handle, ?bounds, dpi, "Window created");
        Ok(())
    }

    /// Show the window restored and activated. Returns what the OS reports.
    pub fn show(&self) -> bool {
        let Some(handle) = self.handle() else {
            warn!("show() called without a window");
            return false;
        };

        let shown = self.backend.show_window(handle);
        self.visible.set(shown);
        debug!(?handle, shown, "Window shown");
        shown
    }

    pub fn set_quit_on_close(&self, quit_on_close: bool) {
        self.quit_on_close.set(quit_on_close);
    }

    pub fn quit_on_close(&self) -> bool {
        self.quit_on_close.get()
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    /// The top-level handle, if the window exists.
    pub fn handle(&self) -> Option<NativeHandle> {
        self.window.borrow().as_ref().map(OwnedWindow::handle)
    }

    pub fn child_content(&self) -> Option<ChildContent> {
        self.child.get()
    }

    pub fn class(&self) -> &WindowClass {
        &self.class
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle.get()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Live instances sharing this window's class.
    pub fn active_count(&self) -> usize {
        class::active_count(&self.class)
    }

    pub fn theme(&self) -> ThemeDecoration {
        self.theme.get()
    }

    /// Replace the title bar decoration, reapplying it if the window exists.
    pub fn set_theme(&self, theme: ThemeDecoration) {
        self.theme.set(theme);
        if let Some(handle) = self.handle() {
            self.update_theme(handle);
        }
    }

    /// Embed `child` (owned by the caller) into this window: reparent it,
    /// size it to the client area, and focus it. Before `create` the child is
    /// only recorded and gets embedded once the window exists.
    pub fn set_child_content(&self, child: ChildContent) {
        self.child.set(Some(child));

        let Some(parent) = self.handle() else {
            debug!(?child, "Child content recorded before window creation");
            return;
        };

        self.embed_child(child, parent);
    }

    /// React to a window-manager notification for `window`.
    pub fn handle_message(&self, window: NativeHandle, message: WindowMessage) -> MessageOutcome {
        match message {
            WindowMessage::Destroy => match self.lifecycle.get() {
                Lifecycle::Idle | Lifecycle::Destroyed => {
                    trace!("Destroy notification for a window that is not alive");
                    MessageOutcome::Default
                }
                Lifecycle::Live | Lifecycle::TearingDown => {
                    // The OS is already destroying the window; only forget it.
                    self.window.replace(None);
                    self.destroy();
                    self.post_quit_if_requested();
                    MessageOutcome::Handled(0)
                }
            },
            WindowMessage::NcDestroy | WindowMessage::Other { .. } => MessageOutcome::Default,
            _ if self.lifecycle.get() != Lifecycle::Live => {
                trace!(?message, "Message for a window that is not live");
                MessageOutcome::Default
            }
            WindowMessage::DpiChanged { dpi, suggested } => {
                debug!(dpi, ?suggested, "DPI changed");
                self.backend.set_window_pos(window, suggested);
                MessageOutcome::Handled(0)
            }
            WindowMessage::Size { width, height } => {
                if let Some(child) = self.child.get() {
                    let frame = self.backend.client_rect(window);
                    trace!(width, height, ?frame, "Resizing child content");
                    self.backend.move_window(child, frame);
                }
                MessageOutcome::Handled(0)
            }
            WindowMessage::Activate { active } => {
                if let Some(child) = self.child.get() {
                    trace!(active, "Focusing child content");
                    self.backend.set_focus(child);
                }
                MessageOutcome::Handled(0)
            }
            WindowMessage::ThemeChanged => {
                self.update_theme(window);
                MessageOutcome::Handled(0)
            }
        }
    }

    /// Tear down the OS window: delegate hook first, then OS destruction.
    /// A no-op unless the window is live.
    pub fn destroy(&self) {
        let state = self.lifecycle.get();
        if state != Lifecycle::Live {
            trace!(?state, "Teardown skipped");
            return;
        }
        self.lifecycle.set(Lifecycle::TearingDown);

        self.delegate.on_destroy(self);

        let window = self.window.borrow_mut().take();
        if let Some(window) = window {
            debug!(handle = ?window.handle(), "Destroying window");
            self.backend.destroy_window(window);
        }

        self.child.set(None);
        self.visible.set(false);
        self.lifecycle.set(Lifecycle::Destroyed);
    }

    /// Record the handle the OS assigned during creation, before `create`
    /// returns, so messages sent while the window is being built can use it.
    #[cfg_attr(not(windows), allow(dead_code))]
    pub(crate) fn attach(&self, handle: NativeHandle) {
        self.window.replace(Some(OwnedWindow::new(handle)));
        self.lifecycle.set(Lifecycle::Live);
        trace!(?handle, "Window handle attached");
    }

    fn embed_child(&self, child: ChildContent, parent: NativeHandle) {
        self.backend.set_parent(child, parent);
        let frame = self.backend.client_rect(parent);
        self.backend.move_window(child, frame);
        self.backend.set_focus(child);
        debug!(?child, ?frame, "Child content attached");
    }

    fn post_quit_if_requested(&self) {
        if self.quit_on_close.get() {
            debug!("Main window closed, posting quit");
            self.backend.post_quit(0);
        }
    }

    fn update_theme(&self, window: NativeHandle) {
        let theme = self.theme.get();
        if let Err(e) = self.backend.apply_theme(window, &theme) {
            debug!(error = %e, ?theme, "Theme decoration not applied");
        }
    }
}

impl<B: WindowBackend> Drop for PlatformWindow<B> {
    fn drop(&mut self) {
        // No notification may reach this instance once it is exclusively
        // borrowed, so the close that WM_DESTROY would report is handled here.
        let was_live = self.lifecycle.get() == Lifecycle::Live;
        if let Some(handle) = self.handle() {
            self.backend.detach_window(handle);
        }
        self.destroy();
        if was_live {
            self.post_quit_if_requested();
        }

        let remaining = class::release(&self.backend, &self.class);
        trace!(class = self.class.name(), remaining, "PlatformWindow dropped");
    }
}
