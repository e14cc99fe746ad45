//! Typed inbound and outbound messages.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    ContentPayload, Envelope, InitDataPayload, MessageKind, ProtocolError, ReadyPayload,
    ResizePayload, Result,
};

/// A message received from the notebook frame.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// Frame content height changed
    ResizeRequest(ResizePayload),
    /// Frame finished booting
    ReadySignal(ReadyPayload),
    /// Notebook content changed
    ContentUpdate(ContentPayload),
    /// Notebook asked the host to save
    SaveRequest(ContentPayload),
    /// Any kind without protocol-defined semantics, kept verbatim
    Custom(Envelope),
}

impl InboundMessage {
    /// Decode raw message data.
    ///
    /// # Errors
    ///
    /// - `Empty` / `Malformed` if the data is not an envelope
    /// - `InvalidPayload` if a well-known kind carries a payload of the wrong
    ///   shape
    pub fn decode(data: &Value) -> Result<Self> {
        Self::from_envelope(Envelope::from_data(data)?)
    }

    /// Interpret an envelope as a typed message.
    ///
    /// Outbound-only kinds echoed back by a frame are not dispatched; they
    /// surface as custom messages.
    pub fn from_envelope(envelope: Envelope) -> Result<Self> {
        let Some(kind) = MessageKind::from_wire(&envelope.kind) else {
            return Ok(Self::Custom(envelope));
        };

        match kind {
            MessageKind::ResizeRequest => Ok(Self::ResizeRequest(parse(kind, envelope.payload)?)),
            MessageKind::ReadySignal => Ok(Self::ReadySignal(parse(kind, envelope.payload)?)),
            MessageKind::ContentUpdate => Ok(Self::ContentUpdate(parse(kind, envelope.payload)?)),
            MessageKind::SaveRequest => Ok(Self::SaveRequest(parse(kind, envelope.payload)?)),
            MessageKind::SetInitData => Ok(Self::Custom(envelope)),
        }
    }

    /// Wire name of this message's kind.
    pub fn kind(&self) -> &str {
        match self {
            Self::ResizeRequest(_) => MessageKind::ResizeRequest.as_str(),
            Self::ReadySignal(_) => MessageKind::ReadySignal.as_str(),
            Self::ContentUpdate(_) => MessageKind::ContentUpdate.as_str(),
            Self::SaveRequest(_) => MessageKind::SaveRequest.as_str(),
            Self::Custom(envelope) => &envelope.kind,
        }
    }

    /// Notebook content carried by this message, if any.
    pub fn content(&self) -> Option<&str> {
        match self {
            Self::ReadySignal(payload) => Some(&payload.content),
            Self::ContentUpdate(payload) | Self::SaveRequest(payload) => Some(&payload.content),
            Self::ResizeRequest(_) | Self::Custom(_) => None,
        }
    }
}

/// A message sent to the notebook frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundMessage {
    /// Initial content for the notebook
    SetInitData(InitDataPayload),
    /// Application-defined message, passed through verbatim
    Custom(Envelope),
}

impl OutboundMessage {
    /// Build an init-data message.
    pub fn init_data(content: impl Into<String>, base_url: Option<String>) -> Self {
        Self::SetInitData(InitDataPayload { content: content.into(), base_url })
    }

    /// Build a custom message of an arbitrary kind.
    pub fn custom(kind: impl Into<String>, payload: Value) -> Self {
        Self::Custom(Envelope::new(kind, payload))
    }

    /// Wire name of this message's kind.
    pub fn kind(&self) -> &str {
        match self {
            Self::SetInitData(_) => MessageKind::SetInitData.as_str(),
            Self::Custom(envelope) => &envelope.kind,
        }
    }

    /// Encode into raw message data ready to post across the window boundary.
    pub fn to_data(&self) -> Result<Value> {
        match self {
            Self::SetInitData(payload) => {
                let payload = serde_json::to_value(payload).map_err(|source| {
                    ProtocolError::Encode { kind: self.kind().to_string(), source }
                })?;
                Ok(Envelope::new(MessageKind::SetInitData.as_str(), payload).into_data())
            },
            Self::Custom(envelope) => Ok(envelope.clone().into_data()),
        }
    }
}

fn parse<T: DeserializeOwned>(kind: MessageKind, payload: Value) -> Result<T> {
    serde_json::from_value(payload).map_err(|source| ProtocolError::InvalidPayload { kind, source })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;

    #[test]
    fn decode_content_update() {
        let data = json!({ "type": "NOTEBOOK_CONTENT_UPDATE", "payload": { "content": "abc" } });
        assert_eq!(
            InboundMessage::decode(&data).unwrap(),
            InboundMessage::ContentUpdate(ContentPayload::new("abc"))
        );
    }

    #[test]
    fn decode_save_request() {
        let data = json!({ "type": "NOTEBOOK_SAVE_REQUEST", "payload": { "content": "abc" } });
        let msg = InboundMessage::decode(&data).unwrap();
        assert_eq!(msg, InboundMessage::SaveRequest(ContentPayload::new("abc")));
        assert_eq!(msg.content(), Some("abc"));
    }

    #[test]
    fn decode_resize_request() {
        let data = json!({ "type": "NOTEBOOK_RESIZE_REQUEST", "payload": { "height": 480 } });
        let InboundMessage::ResizeRequest(payload) = InboundMessage::decode(&data).unwrap() else {
            panic!("expected resize request");
        };
        assert!((payload.height - 480.0).abs() < f64::EPSILON);
        assert_eq!(payload.width, None);
    }

    #[test]
    fn decode_ready_signal() {
        let data = json!({
            "type": "NOTEBOOK_READY_SIGNAL",
            "payload": { "content": "# nb", "communicationFormatVersion": 1 }
        });
        let msg = InboundMessage::decode(&data).unwrap();
        assert_eq!(msg.kind(), "NOTEBOOK_READY_SIGNAL");
        assert_eq!(msg.content(), Some("# nb"));
    }

    #[test]
    fn unknown_kind_is_custom() {
        let data = json!({ "type": "MY_APP_EVENT", "payload": { "x": 1 } });
        let msg = InboundMessage::decode(&data).unwrap();
        assert_eq!(msg, InboundMessage::Custom(Envelope::new("MY_APP_EVENT", json!({ "x": 1 }))));
        assert_eq!(msg.kind(), "MY_APP_EVENT");
        assert_eq!(msg.content(), None);
    }

    #[test]
    fn echoed_init_data_is_not_dispatched() {
        let data = json!({ "type": "NOTEBOOK_SET_INIT_DATA", "payload": { "content": "x" } });
        assert!(matches!(InboundMessage::decode(&data).unwrap(), InboundMessage::Custom(_)));
    }

    #[test]
    fn malformed_known_payload_is_rejected() {
        let data = json!({ "type": "NOTEBOOK_CONTENT_UPDATE", "payload": { "text": "abc" } });
        assert!(matches!(
            InboundMessage::decode(&data),
            Err(ProtocolError::InvalidPayload { kind: MessageKind::ContentUpdate, .. })
        ));

        let data = json!({ "type": "NOTEBOOK_READY_SIGNAL" });
        assert!(matches!(
            InboundMessage::decode(&data),
            Err(ProtocolError::InvalidPayload { kind: MessageKind::ReadySignal, .. })
        ));
    }

    #[test]
    fn init_data_wire_shape() {
        let msg = OutboundMessage::init_data("# hello", Some("https://example.com/".into()));
        let data = msg.to_data().unwrap();
        assert_eq!(
            data,
            json!({
                "type": "NOTEBOOK_SET_INIT_DATA",
                "payload": { "content": "# hello", "baseUrl": "https://example.com/" }
            })
        );

        let OutboundMessage::SetInitData(payload) = msg else {
            panic!("expected init data");
        };
        insta::assert_snapshot!(
            serde_json::to_string(&payload).unwrap(),
            @r##"{"content":"# hello","baseUrl":"https://example.com/"}"##
        );
    }

    #[test]
    fn custom_outbound_passes_through_verbatim() {
        let payload = json!({ "nested": [1, 2, { "deep": true }] });
        let msg = OutboundMessage::custom("RUN_ALL_CELLS", payload.clone());
        assert_eq!(msg.kind(), "RUN_ALL_CELLS");
        assert_eq!(msg.to_data().unwrap(), json!({ "type": "RUN_ALL_CELLS", "payload": payload }));
    }

    proptest! {
        #[test]
        fn decode_never_panics_on_arbitrary_kind(kind in ".{0,32}", content in ".{0,64}") {
            let data = json!({ "type": kind, "payload": { "content": content } });
            let _ = InboundMessage::decode(&data);
        }

        #[test]
        fn content_update_keeps_content_verbatim(content in any::<String>()) {
            let data = json!({ "type": "NOTEBOOK_CONTENT_UPDATE", "payload": { "content": content.clone() } });
            let msg = InboundMessage::decode(&data).unwrap();
            prop_assert_eq!(msg.content(), Some(content.as_str()));
        }
    }
}
