//! Scripted host for flow tests
//!
//! The flow runs on the test thread. A host thread answers each expected
//! `ButtonRequest`, waits until the screen is drawn and then plays the button
//! presses for that screen. Any request beyond the script is recorded and
//! cancelled so the flow cannot block.

#![allow(dead_code)]

use crossbeam_channel::{Receiver, Sender, select, unbounded};
use std::thread;
use std::time::Duration;
use twobutton_device::{Context, DeviceMessage, FlowConfig, Framebuffer, HostLink};
use twobutton_ui::{InputEvent, PhysicalButton};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

pub enum Input {
    Click(PhysicalButton),
    Event(InputEvent),
    Wait(Duration),
}

pub use Input::{Click, Wait};
pub use PhysicalButton::{Left, Right};

pub enum Reply {
    /// Acknowledge, then play the inputs
    Ack(Vec<Input>),
    /// Cancel instead of acknowledging
    Refuse,
    /// Acknowledge, then cancel from the host side
    HostCancel,
    /// Play `early` before acknowledging, then `after` once the screen is up
    Late { early: Vec<Input>, after: Vec<Input> },
}

pub struct Step {
    pub br_type: &'static str,
    pub reply: Reply,
}

pub fn ack(br_type: &'static str, inputs: Vec<Input>) -> Step {
    Step {
        br_type,
        reply: Reply::Ack(inputs),
    }
}

pub fn click(br_type: &'static str, button: PhysicalButton) -> Step {
    ack(br_type, vec![Click(button)])
}

pub fn refuse(br_type: &'static str) -> Step {
    Step {
        br_type,
        reply: Reply::Refuse,
    }
}

pub fn late_ack(br_type: &'static str, early: Vec<Input>, after: Vec<Input>) -> Step {
    Step {
        br_type,
        reply: Reply::Late { early, after },
    }
}

pub fn host_cancel(br_type: &'static str) -> Step {
    Step {
        br_type,
        reply: Reply::HostCancel,
    }
}

pub struct Outcome<T> {
    pub result: T,
    /// `br_type` of every request the flow sent, in order
    pub requests: Vec<String>,
    /// Read-out of every screen that was drawn
    pub screens: Vec<Vec<String>>,
    pub ctx: Context<Framebuffer>,
}

fn send_inputs(input: &Sender<InputEvent>, inputs: Vec<Input>) {
    for item in inputs {
        match item {
            Input::Click(button) => {
                for event in InputEvent::click(button) {
                    input.send(event).unwrap();
                }
            }
            Input::Event(event) => input.send(event).unwrap(),
            Input::Wait(duration) => thread::sleep(duration),
        }
    }
}

fn br_type(message: &DeviceMessage) -> String {
    let DeviceMessage::ButtonRequest(request) = message;
    request.br_type.clone()
}

pub fn run_flow<T>(
    config: FlowConfig,
    steps: Vec<Step>,
    flow: impl FnOnce(&mut Context<Framebuffer>) -> T,
) -> Outcome<T> {
    let (link, host) = HostLink::pair();
    let (input_tx, input_rx) = unbounded();
    let (tap_tx, tap_rx) = unbounded::<Vec<String>>();
    let (done_tx, done_rx): (Sender<()>, Receiver<()>) = unbounded();

    let script = thread::spawn(move || {
        let mut seen = Vec::new();
        let mut screens = Vec::new();
        let wait_for_screen = |screens: &mut Vec<Vec<String>>, br_type: &str| {
            let screen = tap_rx
                .recv_timeout(REQUEST_TIMEOUT)
                .unwrap_or_else(|_| panic!("{br_type} was never drawn"));
            screens.push(screen);
        };

        for step in steps {
            let request = host
                .requests
                .recv_timeout(REQUEST_TIMEOUT)
                .unwrap_or_else(|_| panic!("no request for {}", step.br_type));
            seen.push(br_type(&request));
            match step.reply {
                Reply::Ack(inputs) => {
                    host.ack().unwrap();
                    wait_for_screen(&mut screens, step.br_type);
                    send_inputs(&input_tx, inputs);
                }
                Reply::Late { early, after } => {
                    send_inputs(&input_tx, early);
                    host.ack().unwrap();
                    wait_for_screen(&mut screens, step.br_type);
                    send_inputs(&input_tx, after);
                }
                Reply::Refuse => host.cancel().unwrap(),
                Reply::HostCancel => {
                    host.ack().unwrap();
                    wait_for_screen(&mut screens, step.br_type);
                    host.cancel().unwrap();
                }
            }
        }

        loop {
            select! {
                recv(host.requests) -> request => match request {
                    Ok(request) => {
                        seen.push(br_type(&request));
                        host.cancel().unwrap();
                    }
                    Err(_) => break,
                },
                recv(done_rx) -> _ => break,
            }
        }
        drop(input_tx);
        (seen, screens)
    });

    let mut ctx = Context::new(link, input_rx, Framebuffer::new(), config).with_layout_tap(tap_tx);
    let result = flow(&mut ctx);
    done_tx.send(()).unwrap();
    let (requests, screens) = script.join().expect("host script panicked");

    Outcome {
        result,
        requests,
        screens,
        ctx,
    }
}

pub fn run_default<T>(
    steps: Vec<Step>,
    flow: impl FnOnce(&mut Context<Framebuffer>) -> T,
) -> Outcome<T> {
    run_flow(FlowConfig::default(), steps, flow)
}
