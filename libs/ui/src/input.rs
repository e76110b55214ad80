/// The two physical buttons below the display
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhysicalButton {
    Left,
    Right,
}

/// Debounced input as delivered by the button driver
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Press(PhysicalButton),
    Release(PhysicalButton),
    /// Redraw request without user interaction
    Repaint,
}

impl InputEvent {
    /// Press followed by release on the same button
    #[must_use]
    pub fn click(button: PhysicalButton) -> [Self; 2] {
        [Self::Press(button), Self::Release(button)]
    }
}
