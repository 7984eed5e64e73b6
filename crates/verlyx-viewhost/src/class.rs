//! Process-wide window-class bookkeeping.
//!
//! Every live [`PlatformWindow`](crate::PlatformWindow) counts against its
//! class. The class is registered lazily by the first `create` and
//! unregistered when the last instance goes away. Windows and their messages
//! live on the UI thread, so the registry is thread-local and lock-free.

use crate::{backend::WindowBackend, ViewHostError};
use std::cell::RefCell;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Class name shared by every runner window.
pub const DEFAULT_CLASS_NAME: &str = "VERLYX_RUNNER_WIN32_WINDOW";

/// Resource id of the application icon in the runner's resource script.
const APP_ICON_RESOURCE: u16 = 101;

/// Descriptor of a registered window class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowClass {
    name: &'static str,
    icon_resource: Option<u16>,
}

impl WindowClass {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            icon_resource: None,
        }
    }

    /// Use the icon with this resource id from the executable.
    pub const fn with_icon_resource(mut self, id: u16) -> Self {
        self.icon_resource = Some(id);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn icon_resource(&self) -> Option<u16> {
        self.icon_resource
    }
}

impl Default for WindowClass {
    fn default() -> Self {
        Self::new(DEFAULT_CLASS_NAME).with_icon_resource(APP_ICON_RESOURCE)
    }
}

#[derive(Debug, Default)]
struct ClassSlot {
    active: usize,
    registered: bool,
}

thread_local! {
    static REGISTRY: RefCell<HashMap<&'static str, ClassSlot>> = RefCell::new(HashMap::new());
}

/// Count a new instance of `class`. Returns the new active count.
pub(crate) fn acquire(class: &WindowClass) -> usize {
    REGISTRY.with(|registry| {
        let mut registry = registry.borrow_mut();
        let slot = registry.entry(class.name()).or_default();
        slot.active += 1;
        slot.active
    })
}

/// Register `class` with the OS unless this thread already did.
pub(crate) fn ensure_registered<B: WindowBackend + ?Sized>(
    backend: &B,
    class: &WindowClass,
) -> Result<(), ViewHostError> {
    if is_registered(class) {
        return Ok(());
    }

    // The registry is not borrowed across the OS call.
    backend.register_class(class)?;

    REGISTRY.with(|registry| {
        registry.borrow_mut().entry(class.name()).or_default().registered = true;
    });
    debug!(class = class.name(), "Window class registered");
    Ok(())
}

/// Drop one instance of `class`; unregisters the class when the last one goes.
/// Returns the remaining active count.
pub(crate) fn release<B: WindowBackend + ?Sized>(backend: &B, class: &WindowClass) -> usize {
    let (remaining, unregister) = REGISTRY.with(|registry| {
        let mut registry = registry.borrow_mut();
        let Some(slot) = registry.get_mut(class.name()) else {
            warn!(class = class.name(), "Release of an untracked window class");
            return (0, false);
        };

        if slot.active == 0 {
            warn!(class = class.name(), "Active window count already zero");
            return (0, false);
        }

        slot.active -= 1;
        if slot.active > 0 {
            return (slot.active, false);
        }

        let registered = slot.registered;
        registry.remove(class.name());
        (0, registered)
    });

    if unregister {
        backend.unregister_class(class);
        debug!(class = class.name(), "Window class unregistered");
    }
    remaining
}

/// Number of live instances of `class` on this thread.
pub fn active_count(class: &WindowClass) -> usize {
    REGISTRY.with(|registry| {
        registry
            .borrow()
            .get(class.name())
            .map_or(0, |slot| slot.active)
    })
}

/// Whether `class` is currently registered with the OS from this thread.
pub fn is_registered(class: &WindowClass) -> bool {
    REGISTRY.with(|registry| {
        registry
            .borrow()
            .get(class.name())
            .is_some_and(|slot| slot.registered)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{BackendCall, RecordingBackend};

    const CLASS: WindowClass = WindowClass::new("CLASS_REGISTRY_TEST");

    #[test]
    fn test_default_class() {
        let class = WindowClass::default();
        assert_eq!(class.name(), DEFAULT_CLASS_NAME);
        assert_eq!(class.icon_resource(), Some(APP_ICON_RESOURCE));
    }

    #[test]
    fn test_registers_once() {
        let backend = RecordingBackend::new();
        acquire(&CLASS);

        ensure_registered(&backend, &CLASS).unwrap();
        ensure_registered(&backend, &CLASS).unwrap();

        assert!(is_registered(&CLASS));
        assert_eq!(
            backend.count(|call| matches!(call, BackendCall::RegisterClass(_))),
            1
        );
    }

    #[test]
    fn test_unregisters_on_last_release() {
        let backend = RecordingBackend::new();
        acquire(&CLASS);
        acquire(&CLASS);
        ensure_registered(&backend, &CLASS).unwrap();

        assert_eq!(release(&backend, &CLASS), 1);
        assert!(is_registered(&CLASS));
        assert!(!backend.calls().contains(&BackendCall::UnregisterClass(CLASS.name())));

        assert_eq!(release(&backend, &CLASS), 0);
        assert!(!is_registered(&CLASS));
        assert_eq!(
            backend.count(|call| matches!(call, BackendCall::UnregisterClass(_))),
            1
        );
    }

    #[test]
    fn test_release_never_goes_negative() {
        let backend = RecordingBackend::new();
        assert_eq!(release(&backend, &CLASS), 0);
        assert_eq!(active_count(&CLASS), 0);
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn test_unregistered_class_is_not_unregistered() {
        let backend = RecordingBackend::new();
        acquire(&CLASS);
        assert_eq!(release(&backend, &CLASS), 0);
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn test_failed_registration_is_retried() {
        let backend = RecordingBackend::new().failing_registration();
        acquire(&CLASS);

        assert!(ensure_registered(&backend, &CLASS).is_err());
        assert!(!is_registered(&CLASS));
        assert!(ensure_registered(&backend, &CLASS).is_err());
        assert_eq!(
            backend.count(|call| matches!(call, BackendCall::RegisterClass(_))),
            2
        );
    }
}
