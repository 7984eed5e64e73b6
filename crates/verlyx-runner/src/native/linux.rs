//! Native Linux entry point for Verlyx Hub.
//!
//! The window comes from GTK; without the `gtk` feature there is no Linux
//! window layer to run.

use verlyx_core::{EntrypointArgs, RunnerConfig};

#[cfg(feature = "gtk")]
pub fn run_native(config: &RunnerConfig, args: EntrypointArgs) -> anyhow::Result<i32> {
    use gtk::prelude::*;
    use tracing::info;
    use verlyx_viewhost::linux::{GtkHost, GtkWindowOptions};

    let options = GtkWindowOptions {
        application_id: config.application_id.clone(),
        title: config.window.title.clone(),
        width: config.window.width as i32,
        height: config.window.height as i32,
    };

    let title = config.window.title.clone();
    info!(application_id = %options.application_id, "Starting GTK runner");

    let status = GtkHost::new(options).run(args.into_vec(), move |args| {
        let label = gtk::Label::new(Some(&super::placeholder_text(&title, args)));
        label.set_can_focus(true);
        label.upcast()
    });
    Ok(status)
}

#[cfg(not(feature = "gtk"))]
pub fn run_native(_config: &RunnerConfig, _args: EntrypointArgs) -> anyhow::Result<i32> {
    tracing::error!("Linux runner built without GTK support");
    anyhow::bail!("GTK support was not compiled in; rebuild with `--features gtk`")
}
