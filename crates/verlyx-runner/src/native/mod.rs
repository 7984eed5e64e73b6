//! Native platform entry points for Verlyx Hub.
//!
//! - **Windows**: Win32 `PlatformWindow` + message loop (via `win32.rs`)
//! - **Linux**: GTK application window (via `linux.rs`, `gtk` feature)

#[cfg(target_os = "windows")]
mod win32;

#[cfg(target_os = "windows")]
pub use win32::run_native;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "linux")]
pub use linux::run_native;

#[cfg(not(any(target_os = "windows", target_os = "linux")))]
pub fn run_native(
    _config: &verlyx_core::RunnerConfig,
    _args: verlyx_core::EntrypointArgs,
) -> anyhow::Result<i32> {
    anyhow::bail!("no native window layer for {}", std::env::consts::OS)
}

/// Text shown by the stand-in view until an engine view is attached.
#[cfg_attr(
    not(any(target_os = "windows", all(target_os = "linux", feature = "gtk"))),
    allow(dead_code)
)]
pub(crate) fn placeholder_text(title: &str, args: &[String]) -> String {
    if args.is_empty() {
        title.to_string()
    } else {
        format!("{title}\n{}", args.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_text_without_args() {
        assert_eq!(placeholder_text("Verlyx Hub", &[]), "Verlyx Hub");
    }

    #[test]
    fn test_placeholder_text_lists_args() {
        let args = vec!["--route".to_string(), "/projects".to_string()];
        assert_eq!(
            placeholder_text("Verlyx Hub", &args),
            "Verlyx Hub\n--route /projects"
        );
    }
}
