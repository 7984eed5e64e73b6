//! GTK one-shot window constructor.
//!
//! On Linux the toolkit owns the window lifecycle; this module only builds the
//! application window once and hands the embedded view to it.

use gtk::prelude::*;
use gtk::{gio, Application, ApplicationWindow, Widget};
use tracing::{debug, info};

/// Settings for the GTK application window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GtkWindowOptions {
    pub application_id: String,
    pub title: String,
    pub width: i32,
    pub height: i32,
}

impl Default for GtkWindowOptions {
    fn default() -> Self {
        Self {
            application_id: "com.verlyx.verlyx_hub".to_string(),
            title: "Verlyx Hub".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// A non-unique GTK application with a single top-level window.
pub struct GtkHost {
    options: GtkWindowOptions,
}

impl GtkHost {
    pub fn new(options: GtkWindowOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GtkWindowOptions {
        &self.options
    }

    /// Run the application until its last window closes.
    ///
    /// `view_factory` is called on activation with the entrypoint arguments
    /// and returns the engine's view widget. Returns the application's exit
    /// status.
    pub fn run<F>(self, args: Vec<String>, view_factory: F) -> i32
    where
        F: Fn(&[String]) -> Widget + 'static,
    {
        let app = Application::builder()
            .application_id(self.options.application_id.as_str())
            .flags(gio::ApplicationFlags::NON_UNIQUE)
            .build();

        let options = self.options;
        app.connect_activate(move |app| {
            let view = view_factory(&args);
            build_window(app, &options, &view);
        });

        info!("Starting GTK application");
        // Entrypoint arguments go to the view, not to GApplication.
        let no_args: &[&str] = &[];
        let status = app.run_with_args(no_args).value();
        debug!(status, "GTK application finished");
        status
    }
}

/// Create and show the application window with `view` as its only child,
/// focused.
pub fn build_window(
    app: &Application,
    options: &GtkWindowOptions,
    view: &Widget,
) -> ApplicationWindow {
    let window = ApplicationWindow::new(app);
    window.set_title(&options.title);
    window.set_default_size(options.width, options.height);
    window.show();

    view.show();
    window.add(view);
    view.grab_focus();

    debug!(
        title = %options.title,
        width = options.width,
        height = options.height,
        "GTK window built"
    );
    window
}
