use std::collections::HashSet;

use crate::action::{Action, Control};
use crate::bindings::KeyBindings;

/// The controls in effect for one tick.
///
/// Taken once at the start of a tick so that key events arriving mid-tick
/// cannot change what the tick sees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    /// A start request is pending.
    pub start: bool,
}

impl InputSnapshot {
    pub const IDLE: InputSnapshot = InputSnapshot {
        forward: false,
        backward: false,
        left: false,
        right: false,
        start: false,
    };

    pub fn forward() -> Self {
        Self {
            forward: true,
            ..Self::IDLE
        }
    }

    pub fn start() -> Self {
        Self {
            start: true,
            ..Self::IDLE
        }
    }

    pub fn with(mut self, control: Control) -> Self {
        match control {
            Control::Forward => self.forward = true,
            Control::Backward => self.backward = true,
            Control::Left => self.left = true,
            Control::Right => self.right = true,
            Control::Start => self.start = true,
        }
        self
    }

    /// Net throttle: +1 forward, -1 backward, 0 for neither or both.
    pub fn throttle(&self) -> i8 {
        match (self.forward, self.backward) {
            (true, false) => 1,
            (false, true) => -1,
            _ => 0,
        }
    }

    /// Net steering: +1 left, -1 right, 0 for neither or both.
    pub fn steering(&self) -> i8 {
        self.left as i8 - self.right as i8
    }
}

/// Live key state between ticks.
///
/// Directional controls are level-triggered (held keys). Start is
/// edge-triggered: a press is latched until the next snapshot consumes it.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    bindings: KeyBindings,
    held: HashSet<Control>,
    start_pending: bool,
}

impl InputState {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            held: HashSet::new(),
            start_pending: false,
        }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Press(Control::Start) => self.start_pending = true,
            Action::Release(Control::Start) => {}
            Action::Press(control) => {
                self.held.insert(control);
            }
            Action::Release(control) => {
                self.held.remove(&control);
            }
        }
    }

    /// Translate a named key event. Returns false for unbound keys.
    pub fn key(&mut self, name: &str, pressed: bool) -> bool {
        let Some(control) = self.bindings.lookup(name) else {
            tracing::trace!(key = name, "unbound key");
            return false;
        };
        self.apply(if pressed {
            Action::Press(control)
        } else {
            Action::Release(control)
        });
        true
    }

    pub fn key_down(&mut self, name: &str) -> bool {
        self.key(name, true)
    }

    pub fn key_up(&mut self, name: &str) -> bool {
        self.key(name, false)
    }

    pub fn is_held(&self, control: Control) -> bool {
        self.held.contains(&control)
    }

    /// Release every held key, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.held.clear();
        self.start_pending = false;
    }

    /// Copy the current state for one tick and consume a pending start.
    pub fn snapshot(&mut self) -> InputSnapshot {
        let snapshot = InputSnapshot {
            forward: self.is_held(Control::Forward),
            backward: self.is_held(Control::Backward),
            left: self.is_held(Control::Left),
            right: self.is_held(Control::Right),
            start: self.start_pending,
        };
        self.start_pending = false;
        snapshot
    }
}
