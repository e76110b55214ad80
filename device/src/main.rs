use anyhow::Result;
use clap::{Parser, Subcommand};
use crossbeam_channel::Sender;
use std::io::BufRead;
use std::path::PathBuf;
use twobutton_device::layouts::{
    self, ConfirmAction, ConfirmHex, ShowAddress, ShowError, ShowModal,
};
use twobutton_device::{
    ButtonRequestType, Context, FlowConfig, Framebuffer, HostEnd, HostLink, HostMessage, Screen,
};
use twobutton_ui::{InputEvent, PhysicalButton};

/// Run one confirm flow against a terminal framebuffer
///
/// Button and host commands are read from stdin, one per line:
/// left, right, press-left, release-left, press-right, release-right,
/// repaint, ack, cancel.
#[derive(Parser, Debug)]
#[command(name = "twobutton-device")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    flow: Flow,

    /// Acknowledge every button request automatically
    #[arg(long)]
    auto_ack: bool,

    /// JSON file with flow settings (defaults when missing)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Do not print the screen after each update
    #[arg(long, short)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Flow {
    /// Generic confirmation
    Action {
        title: String,
        #[arg(long)]
        action: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        param: Option<String>,
        /// Require holding the confirm button
        #[arg(long)]
        hold: bool,
    },
    /// Wallet creation terms
    ResetDevice {
        #[arg(default_value = "Create a new wallet?")]
        prompt: String,
    },
    /// Backup offer
    Backup,
    /// Non-standard derivation path
    PathWarning { path: String },
    /// Receive address with QR code
    Address {
        address: String,
        #[arg(long)]
        network: Option<String>,
        /// Cosigner key, repeat for each
        #[arg(long = "xpub")]
        xpubs: Vec<String>,
        /// Index of this device's key among the cosigners
        #[arg(long)]
        multisig_index: Option<usize>,
    },
    /// Extended public key
    Xpub {
        xpub: String,
        #[arg(long, default_value = "XPUB")]
        desc: String,
        #[arg(long, default_value = "cancel")]
        cancel: String,
    },
    /// Transaction output
    Output { address: String, amount: String },
    /// Hex data
    Hex {
        title: String,
        data: String,
        #[arg(long)]
        description: Option<String>,
        /// Keep both ends of long data
        #[arg(long)]
        middle: bool,
    },
    /// Transaction total with fee
    Total { total: String, fee: String },
    /// Coinjoin contribution
    JointTotal { spending: String, total: String },
    /// Parametrized metadata
    Metadata {
        title: String,
        content: String,
        #[arg(long)]
        param: Option<String>,
    },
    Warning { content: String },
    Success { content: String },
    Error { content: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Command {
    Input(InputEvent),
    Click(PhysicalButton),
    Host(HostMessage),
}

fn parse_command(line: &str) -> Option<Command> {
    let command = match line.trim() {
        "left" => Command::Click(PhysicalButton::Left),
        "right" => Command::Click(PhysicalButton::Right),
        "press-left" => Command::Input(InputEvent::Press(PhysicalButton::Left)),
        "release-left" => Command::Input(InputEvent::Release(PhysicalButton::Left)),
        "press-right" => Command::Input(InputEvent::Press(PhysicalButton::Right)),
        "release-right" => Command::Input(InputEvent::Release(PhysicalButton::Right)),
        "repaint" => Command::Input(InputEvent::Repaint),
        "ack" => Command::Host(HostMessage::ButtonAck),
        "cancel" => Command::Host(HostMessage::Cancel),
        _ => return None,
    };
    Some(command)
}

fn read_commands(input: &Sender<InputEvent>, replies: &Sender<HostMessage>) {
    for line in std::io::stdin().lock().lines() {
        let Ok(line) = line else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }
        let sent = match parse_command(&line) {
            Some(Command::Input(event)) => input.send(event).is_ok(),
            Some(Command::Click(button)) => InputEvent::click(button)
                .into_iter()
                .all(|event| input.send(event).is_ok()),
            Some(Command::Host(message)) => replies.send(message).is_ok(),
            None => {
                eprintln!("unknown command {line:?}");
                true
            }
        };
        if !sent {
            break;
        }
    }
    log::debug!("stdin closed");
}

fn run<S: Screen>(ctx: &mut Context<S>, flow: &Flow) -> twobutton_device::Result<String> {
    match flow {
        Flow::Action {
            title,
            action,
            description,
            param,
            hold,
        } => layouts::confirm_action(
            ctx,
            ConfirmAction {
                action: action.as_deref(),
                description: description.as_deref(),
                description_param: param.as_deref(),
                hold: *hold,
                ..ConfirmAction::new("confirm_action", title)
            },
        )?,
        Flow::ResetDevice { prompt } => layouts::confirm_reset_device(ctx, prompt)?,
        Flow::Backup => {
            let backup = layouts::confirm_backup(ctx)?;
            return Ok(format!("backup: {backup}"));
        }
        Flow::PathWarning { path } => layouts::confirm_path_warning(ctx, path)?,
        Flow::Address {
            address,
            network,
            xpubs,
            multisig_index,
        } => {
            let xpubs: Vec<&str> = xpubs.iter().map(String::as_str).collect();
            layouts::show_address(
                ctx,
                ShowAddress {
                    network: network.as_deref(),
                    multisig_index: *multisig_index,
                    xpubs: &xpubs,
                    ..ShowAddress::new(address)
                },
            )?;
        }
        Flow::Xpub { xpub, desc, cancel } => layouts::show_xpub(ctx, xpub, desc, cancel)?,
        Flow::Output { address, amount } => layouts::confirm_output(ctx, address, amount)?,
        Flow::Hex {
            title,
            data,
            description,
            middle,
        } => layouts::confirm_hex(
            ctx,
            ConfirmHex {
                description: description.as_deref(),
                truncate_middle: *middle,
                ..ConfirmHex::new("confirm_hex", title, data)
            },
        )?,
        Flow::Total { total, fee } => layouts::confirm_total(ctx, total, fee)?,
        Flow::JointTotal { spending, total } => layouts::confirm_joint_total(ctx, spending, total)?,
        Flow::Metadata {
            title,
            content,
            param,
        } => layouts::confirm_metadata(
            ctx,
            "confirm_metadata",
            title,
            content,
            param.as_deref(),
            ButtonRequestType::SignTx,
        )?,
        Flow::Warning { content } => {
            layouts::show_warning(ctx, ShowModal::new("warning", content))?;
        }
        Flow::Success { content } => {
            layouts::show_success(ctx, ShowModal::new("success", content))?;
        }
        Flow::Error { content } => {
            return Err(layouts::show_error_and_raise(ctx, ShowError::new("error", content)));
        }
    }
    Ok("confirmed".to_string())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => FlowConfig::load_or_default(path)?,
        None => FlowConfig::default(),
    };

    let (link, HostEnd { requests, replies }) = HostLink::pair();
    let (input_tx, input_rx) = crossbeam_channel::unbounded();

    // Ctrl-C acts as a host cancel for the current screen
    let tx_for_signal = replies.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        log::info!("Received Ctrl+C, cancelling current screen");
        let _ = tx_for_signal.send(HostMessage::Cancel);
    }) {
        log::error!("Failed to set Ctrl-C handler: {e}");
    }

    let auto_ack = cli.auto_ack;
    let tx_for_ack = replies.clone();
    std::thread::spawn(move || {
        for request in &requests {
            match serde_json::to_string(&request) {
                Ok(json) => println!("{json}"),
                Err(e) => log::error!("Failed to encode request: {e}"),
            }
            if auto_ack && tx_for_ack.send(HostMessage::ButtonAck).is_err() {
                break;
            }
        }
    });

    std::thread::spawn(move || read_commands(&input_tx, &replies));

    let screen = if cli.quiet {
        Framebuffer::new()
    } else {
        Framebuffer::new().with_echo()
    };
    let mut ctx = Context::new(link, input_rx, screen, config);

    match run(&mut ctx, &cli.flow) {
        Ok(outcome) => println!("result: {outcome}"),
        Err(e) => println!("result: {e}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_parse() {
        assert_eq!(parse_command("left"), Some(Command::Click(PhysicalButton::Left)));
        assert_eq!(
            parse_command(" release-right \n"),
            Some(Command::Input(InputEvent::Release(PhysicalButton::Right)))
        );
        assert_eq!(parse_command("repaint"), Some(Command::Input(InputEvent::Repaint)));
        assert_eq!(parse_command("ack"), Some(Command::Host(HostMessage::ButtonAck)));
        assert_eq!(parse_command("cancel"), Some(Command::Host(HostMessage::Cancel)));
        assert_eq!(parse_command("middle"), None);
    }

    #[test]
    fn cli_parses_address_flow() {
        let cli = Cli::try_parse_from([
            "twobutton-device",
            "--auto-ack",
            "address",
            "bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq",
            "--xpub",
            "xpubA",
            "--xpub",
            "xpubB",
            "--multisig-index",
            "1",
        ])
        .unwrap();
        assert!(cli.auto_ack);
        match cli.flow {
            Flow::Address {
                xpubs,
                multisig_index,
                ..
            } => {
                assert_eq!(xpubs, vec!["xpubA", "xpubB"]);
                assert_eq!(multisig_index, Some(1));
            }
            other => panic!("unexpected flow {other:?}"),
        }
    }
}
