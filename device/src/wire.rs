//! Messages exchanged with the host during a button handshake
//!
//! Framing is left to the transport. The types serialize to JSON for the
//! demo binary and for logging.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Category of a screen, as announced to the host. Carried as its numeric
/// code.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(into = "u32", try_from = "u32")]
#[repr(u32)]
pub enum ButtonRequestType {
    Other = 1,
    FeeOverThreshold = 2,
    ConfirmOutput = 3,
    ResetDevice = 4,
    ConfirmWord = 5,
    WipeDevice = 6,
    ProtectCall = 7,
    SignTx = 8,
    FirmwareCheck = 9,
    Address = 10,
    PublicKey = 11,
    MnemonicWordCount = 12,
    MnemonicInput = 13,
    UnknownDerivationPath = 15,
    RecoveryHomepage = 16,
    Success = 17,
    Warning = 18,
    PassphraseEntry = 19,
    PinEntry = 20,
}

impl ButtonRequestType {
    const ALL: [Self; 19] = [
        Self::Other,
        Self::FeeOverThreshold,
        Self::ConfirmOutput,
        Self::ResetDevice,
        Self::ConfirmWord,
        Self::WipeDevice,
        Self::ProtectCall,
        Self::SignTx,
        Self::FirmwareCheck,
        Self::Address,
        Self::PublicKey,
        Self::MnemonicWordCount,
        Self::MnemonicInput,
        Self::UnknownDerivationPath,
        Self::RecoveryHomepage,
        Self::Success,
        Self::Warning,
        Self::PassphraseEntry,
        Self::PinEntry,
    ];

    /// Numeric code on the wire
    pub fn code(self) -> u32 {
        self as u32
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("unknown button request code {0}")]
pub struct UnknownCode(pub u32);

impl From<ButtonRequestType> for u32 {
    fn from(value: ButtonRequestType) -> Self {
        value.code()
    }
}

impl TryFrom<u32> for ButtonRequestType {
    type Error = UnknownCode;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.code() == code)
            .ok_or(UnknownCode(code))
    }
}

/// Sent once before a screen is shown
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ButtonRequest {
    pub code: ButtonRequestType,
    /// Flow-specific screen name, e.g. `show_address`
    pub br_type: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum DeviceMessage {
    ButtonRequest(ButtonRequest),
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum HostMessage {
    ButtonAck,
    Cancel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_wire_values() {
        assert_eq!(ButtonRequestType::Other.code(), 1);
        assert_eq!(ButtonRequestType::ConfirmOutput.code(), 3);
        assert_eq!(ButtonRequestType::Address.code(), 10);
        assert_eq!(ButtonRequestType::UnknownDerivationPath.code(), 15);
        assert_eq!(ButtonRequestType::PinEntry.code(), 20);
    }

    #[test]
    fn request_serializes_as_tagged_json() {
        let request = DeviceMessage::ButtonRequest(ButtonRequest {
            code: ButtonRequestType::Address,
            br_type: "show_address".to_string(),
        });
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(
            json,
            r#"{"type":"ButtonRequest","code":10,"br_type":"show_address"}"#
        );
    }

    #[test]
    fn request_round_trips_through_json() {
        let json = r#"{"type":"ButtonRequest","code":8,"br_type":"confirm_total"}"#;
        let DeviceMessage::ButtonRequest(request) = serde_json::from_str(json).unwrap();
        assert_eq!(request.code, ButtonRequestType::SignTx);
        assert_eq!(request.br_type, "confirm_total");
    }

    #[test]
    fn unknown_codes_are_rejected() {
        assert_eq!(ButtonRequestType::try_from(14), Err(UnknownCode(14)));
        assert_eq!(ButtonRequestType::try_from(0), Err(UnknownCode(0)));
        assert_eq!(ButtonRequestType::try_from(21), Err(UnknownCode(21)));

        let json = r#"{"type":"ButtonRequest","code":14,"br_type":"x"}"#;
        let err = serde_json::from_str::<DeviceMessage>(json).unwrap_err();
        assert!(err.to_string().contains("unknown button request code 14"));
    }

    #[test]
    fn every_code_maps_back() {
        for kind in ButtonRequestType::ALL {
            assert_eq!(ButtonRequestType::try_from(u32::from(kind)), Ok(kind));
        }
    }

    #[test]
    fn host_messages_parse() {
        let ack: HostMessage = serde_json::from_str(r#"{"type":"ButtonAck"}"#).unwrap();
        let cancel: HostMessage = serde_json::from_str(r#"{"type":"Cancel"}"#).unwrap();
        assert_eq!(ack, HostMessage::ButtonAck);
        assert_eq!(cancel, HostMessage::Cancel);
    }
}
