/// One of the five controls a driver can operate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Forward,
    Backward,
    Left,
    Right,
    /// Leaves the start screen. Only meaningful while the session is idle.
    Start,
}

/// A high-level input action.
///
/// Window backends translate raw key events into actions; the simulation only
/// ever sees the [`InputSnapshot`](crate::InputSnapshot) built from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Press(Control),
    Release(Control),
}

impl Action {
    pub fn control(self) -> Control {
        match self {
            Action::Press(c) | Action::Release(c) => c,
        }
    }
}
