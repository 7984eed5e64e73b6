//! Native Win32 entry point for Verlyx Hub.

use anyhow::Context;
use std::cell::Cell;
use tracing::{debug, info};
use verlyx_core::{EntrypointArgs, RunnerConfig};
use verlyx_viewhost::win32::{self, Win32Backend};
use verlyx_viewhost::{ChildContent, PlatformWindow, ViewHostError, WindowClass, WindowDelegate};

/// Hosts a static stand-in for the engine view.
struct PlaceholderContent {
    text: String,
    child: Cell<Option<ChildContent>>,
}

impl WindowDelegate<Win32Backend> for PlaceholderContent {
    fn on_created(&self, window: &PlatformWindow<Win32Backend>) -> Result<(), ViewHostError> {
        let parent = window.handle().ok_or(ViewHostError::NotCreated)?;
        let child = win32::create_placeholder_content(parent, &self.text)?;
        self.child.set(Some(child));
        window.set_child_content(child);
        debug!(?child, "Placeholder content attached");
        Ok(())
    }

    fn on_destroy(&self, _window: &PlatformWindow<Win32Backend>) {
        if let Some(child) = self.child.take() {
            win32::destroy_placeholder_content(child);
        }
    }
}

/// Entry point for the Win32 runner. Returns the message loop's exit code.
pub fn run_native(config: &RunnerConfig, args: EntrypointArgs) -> anyhow::Result<i32> {
    let content = PlaceholderContent {
        text: super::placeholder_text(&config.window.title, args.as_slice()),
        child: Cell::new(None),
    };

    let window = PlatformWindow::new(Win32Backend::new(), WindowClass::default(), content);
    window.set_theme(config.theme.into());
    window
        .create(
            &config.window.title,
            config.window.origin(),
            config.window.size(),
        )
        .context("failed to create the main window")?;
    window.set_quit_on_close(config.window.quit_on_close);

    let was_visible = window.show();
    debug!(was_visible, "Main window shown");
    info!(title = %config.window.title, "Main window ready");

    let code = win32::run_message_loop().context("message loop failed")?;
    Ok(code)
}
