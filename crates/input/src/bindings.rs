use std::collections::HashMap;

use crate::action::Control;

/// Maps key names to controls.
///
/// Names follow the browser/winit convention (`ArrowUp`, `KeyW`, `Enter`).
/// Lookups are case-sensitive.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: HashMap<String, Control>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = Self::empty();
        for (name, control) in [
            ("ArrowUp", Control::Forward),
            ("ArrowDown", Control::Backward),
            ("ArrowLeft", Control::Left),
            ("ArrowRight", Control::Right),
            ("KeyW", Control::Forward),
            ("KeyS", Control::Backward),
            ("KeyA", Control::Left),
            ("KeyD", Control::Right),
            ("Enter", Control::Start),
            ("NumpadEnter", Control::Start),
            ("Space", Control::Start),
        ] {
            bindings.bind(name, control);
        }
        bindings
    }
}

impl KeyBindings {
    pub fn empty() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Bind `name` to `control`, replacing any previous binding of that key.
    pub fn bind(&mut self, name: impl Into<String>, control: Control) {
        self.map.insert(name.into(), control);
    }

    pub fn unbind(&mut self, name: &str) -> Option<Control> {
        self.map.remove(name)
    }

    pub fn lookup(&self, name: &str) -> Option<Control> {
        self.map.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
