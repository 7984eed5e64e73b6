//! Entrypoint arguments forwarded verbatim to the embedded engine.

use std::ffi::OsString;

/// Command-line arguments after the program name. Nothing is parsed here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntrypointArgs(Vec<String>);

impl EntrypointArgs {
    /// Collect `argv[1..]` from the current process.
    pub fn from_env() -> Self {
        Self::from_os_args(std::env::args_os().skip(1))
    }

    /// Collect from an explicit argument list (program name excluded).
    pub fn from_os_args<I>(args: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<OsString>,
    {
        Self(
            args.into_iter()
                .map(|arg| arg.into().to_string_lossy().into_owned())
                .collect(),
        )
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}
