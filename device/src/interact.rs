//! One dialog, one handshake
//!
//! `interact` announces a screen to the host, waits for the host to allow it,
//! then shows the dialog until the user or the host decides.

use crate::config::FlowConfig;
use crate::error::{Error, Result};
use crate::host::HostLink;
use crate::wire::{ButtonRequestType, HostMessage};
use crossbeam_channel::{Receiver, Sender, select};
use embedded_graphics::{pixelcolor::BinaryColor, prelude::DrawTarget};
use std::time::Instant;
use twobutton_ui::{ConfirmDialog, DialogResult, InputEvent, Page};

/// A display that needs an explicit refresh after drawing
pub trait Screen: DrawTarget<Color = BinaryColor> {
    fn update(&mut self) -> std::result::Result<(), Self::Error>;
}

/// Everything a flow needs to run dialogs
pub struct Context<S: Screen> {
    host: HostLink,
    input: Receiver<InputEvent>,
    screen: S,
    config: FlowConfig,
    layout_tap: Option<Sender<Vec<String>>>,
}

impl<S: Screen> Context<S> {
    pub fn new(host: HostLink, input: Receiver<InputEvent>, screen: S, config: FlowConfig) -> Self {
        Self {
            host,
            input,
            screen,
            config,
            layout_tap: None,
        }
    }

    /// Report the text of every shown dialog to `tap`
    #[must_use]
    pub fn with_layout_tap(mut self, tap: Sender<Vec<String>>) -> Self {
        self.layout_tap = Some(tap);
        self
    }

    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    pub fn screen(&self) -> &S {
        &self.screen
    }

    fn render<C: Page>(&mut self, dialog: &mut ConfirmDialog<C>) -> Result<()> {
        dialog.show(&mut self.screen).map_err(|_| {
            log::error!("Drawing the dialog failed");
            Error::Display
        })?;
        self.screen.update().map_err(|_| {
            log::error!("Display update failed");
            Error::Display
        })
    }

    fn drain_stale_input(&self) {
        for event in self.input.try_iter() {
            log::debug!("Dropping stale input {event:?}");
        }
    }
}

/// Run `dialog` to completion.
///
/// Exactly one `ButtonRequest` is sent. A host `Cancel` in place of the
/// acknowledgement resolves the dialog as cancelled without drawing it.
/// Only input that arrives after the dialog is drawn can resolve it.
pub fn interact<S: Screen, C: Page>(
    ctx: &mut Context<S>,
    mut dialog: ConfirmDialog<C>,
    br_type: &str,
    br_code: ButtonRequestType,
) -> Result<DialogResult> {
    ctx.drain_stale_input();
    ctx.host.drain_stale();

    ctx.host.send_request(br_type, br_code)?;
    if ctx.host.await_ack_or_cancel()? == HostMessage::Cancel {
        log::info!("Host cancelled {br_type} before it was shown");
        return Ok(DialogResult::Cancelled);
    }
    // Presses made while waiting for the host belong to no visible screen
    ctx.drain_stale_input();

    ctx.render(&mut dialog)?;
    if let Some(tap) = &ctx.layout_tap
        && tap.send(dialog.read_content()).is_err()
    {
        log::debug!("Layout tap closed");
    }

    let input = ctx.input.clone();
    let host = ctx.host.inbound().clone();
    loop {
        select! {
            recv(input) -> event => {
                let event = event.map_err(|_| Error::Disconnected)?;
                log::debug!("{br_type}: {event:?}");
                let result = dialog.dispatch(event, Instant::now());
                ctx.render(&mut dialog)?;
                if let Some(result) = result {
                    log::info!("{br_type}: {result:?}");
                    return Ok(result);
                }
            }
            recv(host) -> message => match message.map_err(|_| Error::Disconnected)? {
                HostMessage::Cancel => {
                    log::info!("{br_type}: cancelled by host");
                    return Ok(DialogResult::Cancelled);
                }
                HostMessage::ButtonAck => log::warn!("{br_type}: unexpected ButtonAck ignored"),
            },
        }
    }
}

/// Turn a cancelled dialog into `exc`
pub fn raise_if_cancelled(result: DialogResult, exc: Error) -> Result<()> {
    match result {
        DialogResult::Confirmed => Ok(()),
        DialogResult::Cancelled => Err(exc),
    }
}

pub fn is_confirmed(result: DialogResult) -> bool {
    result == DialogResult::Confirmed
}
