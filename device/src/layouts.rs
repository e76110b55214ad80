//! Confirm flows used by the device applications
//!
//! Each flow builds its screens, runs them through `interact` and turns a
//! cancel into an error. Inputs are checked before anything is sent to the
//! host.

use crate::error::{Error, Result};
use crate::interact::{Context, Screen, interact, is_confirmed, raise_if_cancelled};
use crate::wire::ButtonRequestType;
use embedded_graphics::{
    prelude::{Point, Size},
    primitives::Rectangle,
};
use twobutton_ui::confirm::{DEFAULT_CANCEL, DEFAULT_CONFIRM};
use twobutton_ui::constants::{
    CONTENT_HEIGHT, MONO_CHARS_PER_LINE, MONO_HEX_PER_LINE, TEXT_MAX_LINES, WIDTH,
};
use twobutton_ui::text::{Truncation, break_path_to_lines, chunks, truncate_hex};
use twobutton_ui::{
    ButtonLabel, ButtonSpec, ButtonStyle, ConfirmDialog, ConfirmMode, Header, Icon, LayoutMetrics,
    QrPage, ScreenStyle, SpanKind, TextLayout, TextPage, select_magnification,
};

const HOLD_TO_CONFIRM: &str = "HOLD TO CONFIRM";
const HOLD_CANCEL: &str = "X";

fn text_dialog(
    header: Option<Header>,
    text: &TextLayout,
    confirm: Option<ButtonSpec>,
    cancel: Option<ButtonSpec>,
) -> Result<ConfirmDialog<TextPage>> {
    Ok(ConfirmDialog::new(TextPage::new(header, text), confirm, cancel)?)
}

fn default_dialog(header: Option<Header>, text: &TextLayout) -> Result<ConfirmDialog<TextPage>> {
    text_dialog(
        header,
        text,
        Some(ButtonSpec::confirm(DEFAULT_CONFIRM)),
        Some(ButtonSpec::cancel(DEFAULT_CANCEL)),
    )
}

fn require(value: &str, what: &'static str) -> Result<()> {
    if value.is_empty() {
        log::warn!("Rejecting flow: {what}");
        return Err(Error::MalformedInput(what));
    }
    Ok(())
}

/// Generic yes/no question
#[derive(Clone, Debug)]
pub struct ConfirmAction<'a> {
    pub br_type: &'a str,
    pub title: &'a str,
    pub action: Option<&'a str>,
    pub description: Option<&'a str>,
    /// Substituted for `{}` in `description`
    pub description_param: Option<&'a str>,
    pub description_param_font: SpanKind,
    /// `None` hides the button
    pub verb: Option<ButtonLabel>,
    pub verb_cancel: Option<ButtonLabel>,
    pub hold: bool,
    pub hold_danger: bool,
    pub style: ScreenStyle,
    /// Description above the action
    pub reverse: bool,
    pub larger_vspace: bool,
    pub exc: Error,
    pub br_code: ButtonRequestType,
}

impl<'a> ConfirmAction<'a> {
    pub fn new(br_type: &'a str, title: &'a str) -> Self {
        Self {
            br_type,
            title,
            action: None,
            description: None,
            description_param: None,
            description_param_font: SpanKind::Bold,
            verb: Some(DEFAULT_CONFIRM.into()),
            verb_cancel: Some(DEFAULT_CANCEL.into()),
            hold: false,
            hold_danger: false,
            style: ScreenStyle::default(),
            reverse: false,
            larger_vspace: false,
            exc: Error::ActionCancelled,
            br_code: ButtonRequestType::Other,
        }
    }

    fn append_action(&self, text: &mut TextLayout) {
        if let Some(action) = self.action {
            text.bold(action);
        }
    }

    fn append_description(&self, text: &mut TextLayout) {
        if let Some(description) = self.description {
            text.append_parametrized(
                description,
                self.description_param.unwrap_or(""),
                self.description_param_font,
            );
        }
    }
}

pub fn confirm_action<S: Screen>(ctx: &mut Context<S>, action: ConfirmAction<'_>) -> Result<()> {
    require(action.title, "confirm_action needs a title")?;

    let mut text = TextLayout::new().inline();
    if action.reverse {
        action.append_description(&mut text);
    } else {
        action.append_action(&mut text);
    }

    if action.action.is_some() && action.description.is_some() {
        text.line_break();
        if action.larger_vspace {
            text.half_line_break();
        }
    }

    if action.reverse {
        action.append_action(&mut text);
    } else {
        action.append_description(&mut text);
    }

    let mut verb = action.verb.clone();
    let mut verb_cancel = action.verb_cancel.clone();
    let mut mode = ConfirmMode::Instant;
    if action.hold {
        if verb == Some(ButtonLabel::from(DEFAULT_CONFIRM))
            && verb_cancel == Some(ButtonLabel::from(DEFAULT_CANCEL))
        {
            verb = Some(ButtonLabel::from(HOLD_TO_CONFIRM));
            verb_cancel = Some(ButtonLabel::from(HOLD_CANCEL));
        }
        mode = ConfirmMode::Hold(ctx.config().hold_duration());
    }
    let confirm_style = if action.hold_danger {
        ButtonStyle::Danger
    } else {
        ButtonStyle::Filled
    };

    let dialog = text_dialog(
        Some(Header::new(&action.title.to_uppercase(), action.style)),
        &text,
        verb.map(|label| ButtonSpec::confirm(label).with_style(confirm_style)),
        verb_cancel.map(ButtonSpec::cancel),
    )?
    .with_mode(mode);

    raise_if_cancelled(
        interact(ctx, dialog, action.br_type, action.br_code)?,
        action.exc,
    )
}

pub fn confirm_reset_device<S: Screen>(ctx: &mut Context<S>, prompt: &str) -> Result<()> {
    let mut text = TextLayout::new().inline();
    if !prompt.is_empty() {
        text.bold(&prompt.replace('\n', " "));
        text.line_break();
    }
    text.half_line_break();
    text.normal("By continuing you agree");
    text.line_break();
    text.normal("to ");
    text.bold("trezor.io/tos");

    let dialog = text_dialog(
        None,
        &text,
        Some(ButtonSpec::confirm("CREATE")),
        Some(ButtonSpec::cancel(DEFAULT_CANCEL)),
    )?;
    raise_if_cancelled(
        interact(ctx, dialog, "setup_device", ButtonRequestType::ResetDevice)?,
        Error::ActionCancelled,
    )
}

/// Offer a backup twice. Returns whether the user agreed.
pub fn confirm_backup<S: Screen>(ctx: &mut Context<S>) -> Result<bool> {
    let mut first = TextLayout::new();
    first
        .bold("New wallet created")
        .bold("successfully!")
        .normal("You should back up your new wallet right now.");

    let mut second = TextLayout::new();
    second.normal("You can back up your Trezor once, at any time.");

    let buttons = || {
        (
            Some(ButtonSpec::confirm("BACKUP")),
            Some(ButtonSpec::cancel("NO")),
        )
    };

    let (confirm, cancel) = buttons();
    let dialog = text_dialog(None, &first, confirm, cancel)?;
    if is_confirmed(interact(ctx, dialog, "backup_device", ButtonRequestType::ResetDevice)?) {
        return Ok(true);
    }

    let (confirm, cancel) = buttons();
    let header = Header::new("Skip the backup?", ScreenStyle::default());
    let dialog = text_dialog(Some(header), &second, confirm, cancel)?;
    Ok(is_confirmed(interact(
        ctx,
        dialog,
        "backup_device",
        ButtonRequestType::ResetDevice,
    )?))
}

pub fn confirm_path_warning<S: Screen>(ctx: &mut Context<S>, path: &str) -> Result<()> {
    let mut text = TextLayout::new();
    text.append_raw_lines(&break_path_to_lines(path, MONO_CHARS_PER_LINE))
        .half_line_break()
        .normal("Are you sure?");

    let header = Header::new("WRONG ADDRESS PATH", ScreenStyle::with_icon(Icon::Warning));
    let dialog = default_dialog(Some(header), &text)?;
    raise_if_cancelled(
        interact(ctx, dialog, "path_warning", ButtonRequestType::UnknownDerivationPath)?,
        Error::ActionCancelled,
    )
}

/// Receive address with QR and optional multisig cosigners
#[derive(Clone, Debug)]
pub struct ShowAddress<'a> {
    pub address: &'a str,
    /// Encoded in the QR code instead of `address`
    pub address_qr: Option<&'a str>,
    pub desc: &'a str,
    pub network: Option<&'a str>,
    /// Which of `xpubs` belongs to this device
    pub multisig_index: Option<usize>,
    pub xpubs: &'a [&'a str],
}

impl<'a> ShowAddress<'a> {
    pub fn new(address: &'a str) -> Self {
        Self {
            address,
            address_qr: None,
            desc: "Confirm address",
            network: None,
            multisig_index: None,
            xpubs: &[],
        }
    }
}

fn address_dialog(address: &ShowAddress<'_>) -> Result<ConfirmDialog<TextPage>> {
    let mut text = TextLayout::new();
    if let Some(network) = address.network {
        text.normal(&format!("{network} network"));
    }
    text.append_raw_lines(&chunks(address.address, MONO_CHARS_PER_LINE));

    text_dialog(
        Some(Header::new(address.desc, ScreenStyle::with_icon(Icon::Receive))),
        &text,
        Some(ButtonSpec::confirm("CONTINUE")),
        Some(ButtonSpec::cancel("QR CODE")),
    )
}

fn qr_dialog(data: &str, threshold: usize) -> Result<ConfirmDialog<QrPage>> {
    let magnification = select_magnification(data, threshold);
    let area = Rectangle::new(Point::zero(), Size::new(WIDTH, CONTENT_HEIGHT));
    let qr = QrPage::new(data, area, magnification)?;
    Ok(ConfirmDialog::new(
        qr,
        Some(ButtonSpec::confirm("CONTINUE")),
        Some(ButtonSpec::cancel("")),
    )?)
}

fn xpub_dialog(xpub: &str, desc: &str, cancel: &str) -> Result<ConfirmDialog<TextPage>> {
    let mut text = TextLayout::new();
    text.append_raw_lines(&truncate_hex(
        xpub,
        TEXT_MAX_LINES,
        MONO_CHARS_PER_LINE,
        Truncation::Middle,
    ));
    text_dialog(
        Some(Header::new(desc, ScreenStyle::default())),
        &text,
        Some(ButtonSpec::confirm(DEFAULT_CONFIRM)),
        Some(ButtonSpec::cancel(cancel.to_uppercase())),
    )
}

/// Cycle address, QR code and cosigner keys until one is confirmed.
///
/// Gives up with `ActionCancelled` after `address_max_rounds` full cycles.
pub fn show_address<S: Screen>(ctx: &mut Context<S>, address: ShowAddress<'_>) -> Result<()> {
    require(address.address, "show_address needs an address")?;

    let rounds = ctx.config().address_max_rounds;
    let threshold = ctx.config().qr_size_threshold;
    let qr_data = address.address_qr.unwrap_or(address.address);

    for round in 1..=rounds {
        log::debug!("show_address round {round}/{rounds}");

        let dialog = address_dialog(&address)?;
        if is_confirmed(interact(ctx, dialog, "show_address", ButtonRequestType::Address)?) {
            return Ok(());
        }

        let dialog = qr_dialog(qr_data, threshold)?;
        if is_confirmed(interact(ctx, dialog, "show_qr", ButtonRequestType::Address)?) {
            return Ok(());
        }

        for (i, xpub) in address.xpubs.iter().enumerate() {
            let cancel = if i + 1 < address.xpubs.len() { "NEXT" } else { "ADDRESS" };
            let owner = if address.multisig_index == Some(i) { "yours" } else { "cosigner" };
            let desc = format!("XPUB #{} ({owner})", i + 1);
            let dialog = xpub_dialog(xpub, &desc, cancel)?;
            if is_confirmed(interact(ctx, dialog, "show_xpub", ButtonRequestType::PublicKey)?) {
                return Ok(());
            }
        }
    }

    log::info!("show_address not confirmed after {rounds} rounds");
    Err(Error::ActionCancelled)
}

pub fn show_xpub<S: Screen>(ctx: &mut Context<S>, xpub: &str, desc: &str, cancel: &str) -> Result<()> {
    require(xpub, "show_xpub needs a key")?;
    let dialog = xpub_dialog(xpub, desc, cancel)?;
    raise_if_cancelled(
        interact(ctx, dialog, "show_xpub", ButtonRequestType::PublicKey)?,
        Error::ActionCancelled,
    )
}

struct Modal<'a> {
    br_type: &'a str,
    br_code: ButtonRequestType,
    header: &'a str,
    subheader: Option<&'a str>,
    content: &'a str,
    button_confirm: Option<&'a str>,
    button_cancel: Option<&'a str>,
    style: ScreenStyle,
    exc: Error,
}

fn show_modal<S: Screen>(ctx: &mut Context<S>, modal: Modal<'_>) -> Result<()> {
    require(modal.content, "modal screens need content")?;

    let mut text = TextLayout::new().inline();
    if let Some(subheader) = modal.subheader.filter(|s| !s.is_empty()) {
        text.bold(subheader).line_break().half_line_break();
    }
    text.normal(modal.content);

    let dialog = text_dialog(
        Some(Header::new(&modal.header.to_uppercase(), modal.style)),
        &text,
        modal.button_confirm.map(ButtonSpec::confirm),
        modal.button_cancel.map(ButtonSpec::cancel),
    )?;
    raise_if_cancelled(interact(ctx, dialog, modal.br_type, modal.br_code)?, modal.exc)
}

/// Warning or success notice with a single button
#[derive(Clone, Debug)]
pub struct ShowModal<'a> {
    pub br_type: &'a str,
    pub content: &'a str,
    pub subheader: Option<&'a str>,
    /// Replaces the flow's default header
    pub header: Option<&'a str>,
    /// Replaces the flow's default button label
    pub button: Option<&'a str>,
    /// Replaces the flow's default request code
    pub br_code: Option<ButtonRequestType>,
}

impl<'a> ShowModal<'a> {
    pub fn new(br_type: &'a str, content: &'a str) -> Self {
        Self {
            br_type,
            content,
            subheader: None,
            header: None,
            button: None,
            br_code: None,
        }
    }
}

pub fn show_warning<S: Screen>(ctx: &mut Context<S>, modal: ShowModal<'_>) -> Result<()> {
    show_modal(
        ctx,
        Modal {
            br_type: modal.br_type,
            br_code: modal.br_code.unwrap_or(ButtonRequestType::Warning),
            header: modal.header.unwrap_or("WARNING!"),
            subheader: modal.subheader,
            content: modal.content,
            button_confirm: Some(modal.button.unwrap_or("TRY AGAIN")),
            button_cancel: None,
            style: ScreenStyle::with_icon(Icon::Warning),
            exc: Error::ActionCancelled,
        },
    )
}

pub fn show_success<S: Screen>(ctx: &mut Context<S>, modal: ShowModal<'_>) -> Result<()> {
    show_modal(
        ctx,
        Modal {
            br_type: modal.br_type,
            br_code: ButtonRequestType::Success,
            header: "SUCCESS!",
            subheader: modal.subheader,
            content: modal.content,
            button_confirm: Some(modal.button.unwrap_or("CLOSE")),
            button_cancel: None,
            style: ScreenStyle::with_icon(Icon::Success),
            exc: Error::ActionCancelled,
        },
    )
}

/// Error notice that always ends the calling operation
#[derive(Clone, Debug)]
pub struct ShowError<'a> {
    pub br_type: &'a str,
    pub content: &'a str,
    pub header: &'a str,
    pub subheader: Option<&'a str>,
    pub button: &'a str,
    pub exc: Error,
}

impl<'a> ShowError<'a> {
    pub fn new(br_type: &'a str, content: &'a str) -> Self {
        Self {
            br_type,
            content,
            header: "FAIL!",
            subheader: None,
            button: "CLOSE",
            exc: Error::ActionCancelled,
        }
    }
}

/// Show the error and return the error to raise.
///
/// The screen has only a cancel button, so it always ends with `exc` unless
/// the interaction itself fails.
pub fn show_error_and_raise<S: Screen>(ctx: &mut Context<S>, error: ShowError<'_>) -> Error {
    let exc = error.exc.clone();
    let shown = show_modal(
        ctx,
        Modal {
            br_type: error.br_type,
            br_code: ButtonRequestType::Other,
            header: error.header,
            subheader: error.subheader,
            content: error.content,
            button_confirm: None,
            button_cancel: Some(error.button),
            style: ScreenStyle::with_icon(Icon::Fail),
            exc: error.exc,
        },
    );
    match shown {
        Ok(()) => exc,
        Err(e) => e,
    }
}

pub fn confirm_output<S: Screen>(ctx: &mut Context<S>, address: &str, amount: &str) -> Result<()> {
    require(address, "confirm_output needs an address")?;

    let mut text = TextLayout::new();
    text.normal(&format!("Send {amount} to"))
        .append_raw_lines(&chunks(address, MONO_CHARS_PER_LINE));

    let header = Header::new("TRANSACTION", ScreenStyle::with_icon(Icon::Send));
    let dialog = default_dialog(Some(header), &text)?;
    raise_if_cancelled(
        interact(ctx, dialog, "confirm_output", ButtonRequestType::ConfirmOutput)?,
        Error::ActionCancelled,
    )
}

/// Hex blob confirmation
#[derive(Clone, Debug)]
pub struct ConfirmHex<'a> {
    pub br_type: &'a str,
    pub title: &'a str,
    pub data: &'a str,
    pub description: Option<&'a str>,
    pub br_code: ButtonRequestType,
    pub style: ScreenStyle,
    pub width: usize,
    pub truncate_middle: bool,
}

impl<'a> ConfirmHex<'a> {
    pub fn new(br_type: &'a str, title: &'a str, data: &'a str) -> Self {
        Self {
            br_type,
            title,
            data,
            description: None,
            br_code: ButtonRequestType::Other,
            style: ScreenStyle::with_icon(Icon::Send),
            width: MONO_HEX_PER_LINE,
            truncate_middle: false,
        }
    }
}

/// Description rows above the hex data, capped so one data row always shows
fn description_rows(description: Option<&str>) -> Vec<String> {
    let Some(description) = description else {
        return Vec::new();
    };
    let metrics = LayoutMetrics::T1.with_max_lines(TEXT_MAX_LINES - 1);
    let mut text = TextLayout::new().with_metrics(metrics);
    text.normal(description);
    text.finalize().read_content()
}

pub fn confirm_hex<S: Screen>(ctx: &mut Context<S>, hex: ConfirmHex<'_>) -> Result<()> {
    require(hex.title, "confirm_hex needs a title")?;

    let rows = description_rows(hex.description);
    let mut text = TextLayout::new();
    for row in &rows {
        text.normal(row);
    }
    let lines = TEXT_MAX_LINES - rows.len();
    let mode = if hex.truncate_middle {
        Truncation::Middle
    } else {
        Truncation::Tail
    };
    text.append_raw_lines(&truncate_hex(hex.data, lines, hex.width, mode));

    let dialog = default_dialog(Some(Header::new(hex.title, hex.style)), &text)?;
    raise_if_cancelled(
        interact(ctx, dialog, hex.br_type, hex.br_code)?,
        Error::ActionCancelled,
    )
}

fn hold_dialog<S: Screen>(ctx: &Context<S>, title: &str, text: &TextLayout) -> Result<ConfirmDialog<TextPage>> {
    Ok(text_dialog(
        Some(Header::new(title, ScreenStyle::default())),
        text,
        Some(ButtonSpec::confirm(HOLD_TO_CONFIRM)),
        Some(ButtonSpec::cancel(HOLD_CANCEL)),
    )?
    .with_mode(ConfirmMode::Hold(ctx.config().hold_duration())))
}

pub fn confirm_total<S: Screen>(ctx: &mut Context<S>, total_amount: &str, fee_amount: &str) -> Result<()> {
    let mut text = TextLayout::new();
    text.bold("Total amount:")
        .mono(total_amount)
        .bold("Fee included:")
        .mono(fee_amount);

    let dialog = hold_dialog(ctx, "TRANSACTION", &text)?;
    raise_if_cancelled(
        interact(ctx, dialog, "confirm_total", ButtonRequestType::SignTx)?,
        Error::ActionCancelled,
    )
}

pub fn confirm_joint_total<S: Screen>(
    ctx: &mut Context<S>,
    spending_amount: &str,
    total_amount: &str,
) -> Result<()> {
    let mut text = TextLayout::new();
    text.bold("You are contributing:")
        .mono(spending_amount)
        .bold("to the total amount:")
        .mono(total_amount);

    let dialog = hold_dialog(ctx, "JOINT TRANSACTION", &text)?;
    raise_if_cancelled(
        interact(ctx, dialog, "confirm_joint_total", ButtonRequestType::SignTx)?,
        Error::ActionCancelled,
    )
}

pub fn confirm_metadata<S: Screen>(
    ctx: &mut Context<S>,
    br_type: &str,
    title: &str,
    content: &str,
    param: Option<&str>,
    br_code: ButtonRequestType,
) -> Result<()> {
    require(title, "confirm_metadata needs a title")?;

    let mut text = TextLayout::new().inline();
    text.append_parametrized(content, param.unwrap_or(""), SpanKind::Bold)
        .line_break()
        .normal("Continue?");

    let dialog = default_dialog(
        Some(Header::new(&title.to_uppercase(), ScreenStyle::default())),
        &text,
    )?;
    raise_if_cancelled(interact(ctx, dialog, br_type, br_code)?, Error::ActionCancelled)
}
