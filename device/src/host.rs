//! Device side of the button handshake

use crate::error::{Error, Result};
use crate::wire::{ButtonRequest, ButtonRequestType, DeviceMessage, HostMessage};
use crossbeam_channel::{Receiver, Sender};

/// Channels to the host transport
pub struct HostLink {
    outbound: Sender<DeviceMessage>,
    inbound: Receiver<HostMessage>,
}

/// Host side of an in-process link
pub struct HostEnd {
    pub requests: Receiver<DeviceMessage>,
    pub replies: Sender<HostMessage>,
}

impl HostLink {
    pub fn new(outbound: Sender<DeviceMessage>, inbound: Receiver<HostMessage>) -> Self {
        Self { outbound, inbound }
    }

    /// Link whose other end stays in this process
    pub fn pair() -> (Self, HostEnd) {
        let (request_tx, request_rx) = crossbeam_channel::unbounded();
        let (reply_tx, reply_rx) = crossbeam_channel::unbounded();
        (
            Self::new(request_tx, reply_rx),
            HostEnd {
                requests: request_rx,
                replies: reply_tx,
            },
        )
    }

    pub fn send_request(&self, br_type: &str, code: ButtonRequestType) -> Result<()> {
        log::info!("ButtonRequest {br_type} ({code:?})");
        self.outbound
            .send(DeviceMessage::ButtonRequest(ButtonRequest {
                code,
                br_type: br_type.to_string(),
            }))
            .map_err(|_| Error::Disconnected)
    }

    /// Block until the host acknowledges or cancels
    pub fn await_ack_or_cancel(&self) -> Result<HostMessage> {
        let reply = self.inbound.recv().map_err(|_| Error::Disconnected)?;
        log::info!("Host replied {reply:?}");
        Ok(reply)
    }

    /// Drop host messages that arrived while no request was pending
    pub fn drain_stale(&self) -> usize {
        self.inbound
            .try_iter()
            .inspect(|message| log::debug!("Dropping stale host message {message:?}"))
            .count()
    }

    pub(crate) fn inbound(&self) -> &Receiver<HostMessage> {
        &self.inbound
    }
}

impl HostEnd {
    pub fn ack(&self) -> Result<()> {
        self.reply(HostMessage::ButtonAck)
    }

    pub fn cancel(&self) -> Result<()> {
        self.reply(HostMessage::Cancel)
    }

    fn reply(&self, message: HostMessage) -> Result<()> {
        self.replies.send(message).map_err(|_| Error::Disconnected)
    }

    /// Wait for the next request, `None` once the device side is gone
    pub fn next_request(&self) -> Option<DeviceMessage> {
        self.requests.recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_reaches_host() {
        let (link, host) = HostLink::pair();
        link.send_request("show_qr", ButtonRequestType::Address).unwrap();
        assert_eq!(
            host.next_request(),
            Some(DeviceMessage::ButtonRequest(ButtonRequest {
                code: ButtonRequestType::Address,
                br_type: "show_qr".to_string(),
            }))
        );
    }

    #[test]
    fn stale_messages_are_drained() {
        let (link, host) = HostLink::pair();
        host.ack().unwrap();
        host.cancel().unwrap();
        assert_eq!(link.drain_stale(), 2);
        assert_eq!(link.drain_stale(), 0);
    }

    #[test]
    fn dropped_host_disconnects() {
        let (link, host) = HostLink::pair();
        drop(host);
        assert_eq!(link.await_ack_or_cancel(), Err(Error::Disconnected));
        assert_eq!(
            link.send_request("x", ButtonRequestType::Other),
            Err(Error::Disconnected)
        );
    }
}
