//! Lifecycle controller: the on/off switch of the sticky subsystem.
//!
//! Enabling installs the two deletion guards and subscribes the size
//! reconciler to layout changes; disabling removes all three. Hook
//! installation is set membership on the host side, so repeated transitions
//! never double-install and never fail.

use super::host::{Hook, LayoutHost};

/// State of the sticky subsystem.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LifecycleState {
    /// No hooks are installed.
    #[default]
    Disabled,
    /// Guards and reconciler are installed.
    Enabled,
}

/// Owns the enabled/disabled state and applies transitions to the host.
#[derive(Debug, Default)]
pub struct Lifecycle {
    state: LifecycleState,
}

impl Lifecycle {
    /// Creates a disabled controller.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: LifecycleState::Disabled,
        }
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> LifecycleState { self.state }

    /// Returns whether the subsystem is enabled.
    #[must_use]
    pub const fn is_enabled(&self) -> bool { matches!(self.state, LifecycleState::Enabled) }

    /// Installs every hook on the host.
    ///
    /// Returns `true` if the state changed.
    pub fn enable<H: LayoutHost + ?Sized>(&mut self, host: &mut H) -> bool {
        let installed = Hook::ALL.iter().filter(|&&hook| host.install_hook(hook)).count();
        let changed = self.state != LifecycleState::Enabled;
        self.state = LifecycleState::Enabled;

        if changed {
            tracing::info!(hooks = installed, "sticky: enabled");
        }
        changed
    }

    /// Removes every hook from the host.
    ///
    /// Returns `true` if the state changed.
    pub fn disable<H: LayoutHost + ?Sized>(&mut self, host: &mut H) -> bool {
        let removed = Hook::ALL.iter().filter(|&&hook| host.remove_hook(hook)).count();
        let changed = self.state != LifecycleState::Disabled;
        self.state = LifecycleState::Disabled;

        if changed {
            tracing::info!(hooks = removed, "sticky: disabled");
        }
        changed
    }

    /// Moves to the requested state.
    ///
    /// Returns `true` if the state changed.
    pub fn set_enabled<H: LayoutHost + ?Sized>(&mut self, host: &mut H, enabled: bool) -> bool {
        if enabled { self.enable(host) } else { self.disable(host) }
    }

    /// Flips the state and returns the new one.
    pub fn toggle<H: LayoutHost + ?Sized>(&mut self, host: &mut H) -> LifecycleState {
        let enable = !self.is_enabled();
        self.set_enabled(host, enable);
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::MemoryLayout;

    fn installed(layout: &MemoryLayout) -> Vec<Hook> {
        Hook::ALL.into_iter().filter(|&hook| layout.hook_installed(hook)).collect()
    }

    #[test]
    fn test_starts_disabled() {
        let lifecycle = Lifecycle::new();
        assert_eq!(lifecycle.state(), LifecycleState::Disabled);
        assert!(!lifecycle.is_enabled());
    }

    #[test]
    fn test_enable_installs_all_hooks() {
        let mut layout = MemoryLayout::new(80, 24);
        let mut lifecycle = Lifecycle::new();

        assert!(lifecycle.enable(&mut layout));
        assert!(lifecycle.is_enabled());
        assert_eq!(installed(&layout), Hook::ALL.to_vec());
    }

    #[test]
    fn test_enable_twice_is_idempotent() {
        let mut layout = MemoryLayout::new(80, 24);
        let mut lifecycle = Lifecycle::new();

        assert!(lifecycle.enable(&mut layout));
        assert!(!lifecycle.enable(&mut layout));
        assert_eq!(layout.hook_count(), Hook::ALL.len());
    }

    #[test]
    fn test_disable_removes_all_hooks() {
        let mut layout = MemoryLayout::new(80, 24);
        let mut lifecycle = Lifecycle::new();
        lifecycle.enable(&mut layout);

        assert!(lifecycle.disable(&mut layout));
        assert!(installed(&layout).is_empty());
    }

    #[test]
    fn test_disable_while_disabled_is_noop() {
        let mut layout = MemoryLayout::new(80, 24);
        let mut lifecycle = Lifecycle::new();
        assert!(!lifecycle.disable(&mut layout));
        assert_eq!(layout.hook_count(), 0);
    }

    #[test]
    fn test_toggle() {
        let mut layout = MemoryLayout::new(80, 24);
        let mut lifecycle = Lifecycle::new();
        assert_eq!(lifecycle.toggle(&mut layout), LifecycleState::Enabled);
        assert_eq!(lifecycle.toggle(&mut layout), LifecycleState::Disabled);
        assert_eq!(layout.hook_count(), 0);
    }

    #[test]
    fn test_set_enabled() {
        let mut layout = MemoryLayout::new(80, 24);
        let mut lifecycle = Lifecycle::new();
        assert!(lifecycle.set_enabled(&mut layout, true));
        assert!(!lifecycle.set_enabled(&mut layout, true));
        assert!(lifecycle.set_enabled(&mut layout, false));
    }
}
