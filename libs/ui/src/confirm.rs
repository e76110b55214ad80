//! Two-button confirm dialog
//!
//! A dialog wraps a content page and up to two buttons. The left physical
//! button cancels, the right one confirms. A button only fires on release
//! after a press on the same button, so a release left over from a previous
//! screen never resolves a new one.

use std::time::{Duration, Instant};

use crate::constants::{HEIGHT, WIDTH};
use crate::error::UiError;
use crate::input::{InputEvent, PhysicalButton};
use crate::pages::Page;
use crate::widgets::{Button, ButtonLabel, ButtonRole, ButtonStyle};
use embedded_graphics::{
    Drawable,
    pixelcolor::BinaryColor,
    prelude::{DrawTarget, Point, Size},
    primitives::Rectangle,
};

pub const DEFAULT_CONFIRM: &str = "CONFIRM";
pub const DEFAULT_CANCEL: &str = "CANCEL";

/// Label and look of one dialog button
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ButtonSpec {
    pub label: ButtonLabel,
    pub style: ButtonStyle,
}

impl ButtonSpec {
    #[must_use]
    pub fn confirm(label: impl Into<ButtonLabel>) -> Self {
        Self {
            label: label.into(),
            style: ButtonStyle::Filled,
        }
    }

    #[must_use]
    pub fn cancel(label: impl Into<ButtonLabel>) -> Self {
        Self {
            label: label.into(),
            style: ButtonStyle::Outline,
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: ButtonStyle) -> Self {
        self.style = style;
        self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConfirmMode {
    /// Confirm on release
    #[default]
    Instant,
    /// Confirm only after the button was held for the given time
    Hold(Duration),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialogState {
    Active,
    Holding { since: Instant },
    Confirmed,
    Cancelled,
}

impl DialogState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Confirmed | Self::Cancelled)
    }

    pub fn result(self) -> Option<DialogResult> {
        match self {
            Self::Confirmed => Some(DialogResult::Confirmed),
            Self::Cancelled => Some(DialogResult::Cancelled),
            Self::Active | Self::Holding { .. } => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialogResult {
    Confirmed,
    Cancelled,
}

pub struct ConfirmDialog<C: Page> {
    content: C,
    confirm: Option<Button>,
    cancel: Option<Button>,
    mode: ConfirmMode,
    state: DialogState,
}

impl<C: Page> ConfirmDialog<C> {
    /// Build a dialog. At least one button is required, otherwise the user
    /// could never leave the screen.
    pub fn new(
        content: C,
        confirm: Option<ButtonSpec>,
        cancel: Option<ButtonSpec>,
    ) -> Result<Self, UiError> {
        if confirm.is_none() && cancel.is_none() {
            return Err(UiError::NoEscape);
        }

        let area = Rectangle::new(Point::zero(), Size::new(WIDTH, HEIGHT));
        let make = |role, spec: ButtonSpec| {
            let mut button = Button::new(role, spec.label, spec.style);
            button.place(&area);
            button
        };

        Ok(Self {
            content,
            confirm: confirm.map(|spec| make(ButtonRole::Confirm, spec)),
            cancel: cancel.map(|spec| make(ButtonRole::Cancel, spec)),
            mode: ConfirmMode::Instant,
            state: DialogState::Active,
        })
    }

    #[must_use]
    pub fn with_mode(mut self, mode: ConfirmMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> ConfirmMode {
        self.mode
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn result(&self) -> Option<DialogResult> {
        self.state.result()
    }

    pub fn content(&self) -> &C {
        &self.content
    }

    /// (cancel, confirm) labels as shown to the user
    pub fn labels(&self) -> (Option<String>, Option<String>) {
        (
            self.cancel.as_ref().map(|b| b.label.describe()),
            self.confirm.as_ref().map(|b| b.label.describe()),
        )
    }

    /// Feed one input event. Returns the result exactly once, on the event
    /// that ends the dialog.
    pub fn dispatch(&mut self, event: InputEvent, now: Instant) -> Option<DialogResult> {
        if self.state.is_terminal() {
            log::debug!("dialog already finished, ignoring {event:?}");
            return None;
        }

        self.content.handle_event(event);

        match event {
            InputEvent::Press(physical) => self.press(physical, now),
            InputEvent::Release(physical) => self.release(physical, now),
            InputEvent::Repaint => {}
        }

        self.state.result()
    }

    fn button_mut(&mut self, physical: PhysicalButton) -> Option<&mut Button> {
        [self.cancel.as_mut(), self.confirm.as_mut()]
            .into_iter()
            .flatten()
            .find(|button| button.physical() == physical)
    }

    fn press(&mut self, physical: PhysicalButton, now: Instant) {
        let Some(button) = self.button_mut(physical) else {
            log::debug!("no button bound to {physical:?}");
            return;
        };
        button.armed = true;
        let role = button.role;

        if role == ButtonRole::Confirm && matches!(self.mode, ConfirmMode::Hold(_)) {
            self.state = DialogState::Holding { since: now };
        }
    }

    fn release(&mut self, physical: PhysicalButton, now: Instant) {
        let Some(button) = self.button_mut(physical) else {
            return;
        };
        if !button.armed {
            log::debug!("release of {physical:?} without a press");
            return;
        }
        button.armed = false;
        let role = button.role;

        self.state = match (role, self.mode, self.state) {
            (ButtonRole::Cancel, _, _) => DialogState::Cancelled,
            (ButtonRole::Confirm, ConfirmMode::Instant, _) => DialogState::Confirmed,
            (ButtonRole::Confirm, ConfirmMode::Hold(duration), DialogState::Holding { since })
                if now.saturating_duration_since(since) >= duration =>
            {
                DialogState::Confirmed
            }
            (ButtonRole::Confirm, ConfirmMode::Hold(_), _) => {
                log::info!("confirm released before the hold time");
                DialogState::Active
            }
        };
    }
}

impl<C: Page> Page for ConfirmDialog<C> {
    fn draw<D: DrawTarget<Color = BinaryColor>>(&mut self, display: &mut D) -> Result<(), D::Error> {
        self.content.draw(display)?;
        for button in [&self.cancel, &self.confirm].into_iter().flatten() {
            button.draw(display)?;
        }
        Ok(())
    }

    fn handle_event(&mut self, event: InputEvent) -> bool {
        let before = self.state;
        self.dispatch(event, Instant::now());
        before != self.state
    }

    fn read_content(&self) -> Vec<String> {
        let (cancel, confirm) = self.labels();
        let mut content = self.content.read_content();
        content.extend(cancel.into_iter().chain(confirm).filter(|label| !label.is_empty()));
        content
    }
}
