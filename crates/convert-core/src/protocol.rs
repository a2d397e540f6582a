//! JSON shapes exchanged with the conversion service.

use nepfont_model::FontKey;
use serde::{Deserialize, Serialize};

pub const ACTION_FONT_CONVERSION: &str = "fontconversion";
pub const DEFAULT_LANGUAGE: &str = "ne";
pub const STATUS_SUCCESS: &str = "success";

/// Preeti-encoded "नेपाली", used by the availability check.
pub const DEMO_TEXT: &str = "g]kfnL";
pub const DEMO_SOURCE_KEY: &str = "PREETI";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordConversion {
    pub source_font: FontKey,
    pub destination_font: FontKey,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageParams {
    pub language: String,
    pub words: Vec<WordConversion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRequest {
    pub request_method: String,
    pub language_params: LanguageParams,
    pub token: String,
    pub word_plugin_id: String,
}

impl ConversionRequest {
    /// A request carrying exactly one word triple.
    pub fn single(
        client_id: &str,
        source: &FontKey,
        destination: &FontKey,
        text: impl Into<String>,
    ) -> Self {
        Self {
            request_method: ACTION_FONT_CONVERSION.to_owned(),
            language_params: LanguageParams {
                language: DEFAULT_LANGUAGE.to_owned(),
                words: vec![WordConversion {
                    source_font: source.clone(),
                    destination_font: destination.clone(),
                    text: text.into(),
                }],
            },
            token: String::new(),
            word_plugin_id: client_id.to_owned(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Server reply. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub message_id: Option<String>,
}

impl ConversionResponse {
    pub fn parse(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some(STATUS_SUCCESS)
    }

    pub fn message_id(&self) -> MessageId {
        MessageId::parse(self.message_id.as_deref())
    }
}

/// The two message identifiers the service uses to redirect the user. Anything
/// else is treated as unrecognised rather than guessed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageId {
    RedirectToServiceRenew,
    RedirectToServicePayment,
    Unrecognised,
}

impl MessageId {
    pub const RENEW: &'static str = "REDIRECT_TO_SERVICE_RENEW";
    pub const PAYMENT: &'static str = "REDIRECT_TO_SERVICE_PAYMENT";

    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(Self::RENEW) => Self::RedirectToServiceRenew,
            Some(Self::PAYMENT) => Self::RedirectToServicePayment,
            _ => Self::Unrecognised,
        }
    }
}
