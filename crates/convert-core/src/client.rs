use crate::protocol::{ConversionRequest, ConversionResponse, MessageId, DEMO_SOURCE_KEY, DEMO_TEXT};
use crate::transport::{HttpTransport, Transport};
use nepfont_model::{FontKey, ServiceSettings};
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureReason {
    /// Unreachable service, timeout, or a reply we could not make sense of.
    Transient,
    LicenseExpired,
    TrialExpired,
    /// No known source font; the run is left alone and not reported.
    UnsupportedSource,
}

impl FailureReason {
    /// Whether the failure should be surfaced to the user.
    pub fn is_reportable(self) -> bool {
        !matches!(self, Self::UnsupportedSource)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum ConversionOutcome {
    Success { result_text: String },
    Fail { reason: FailureReason },
}

impl ConversionOutcome {
    pub fn fail(reason: FailureReason) -> Self {
        Self::Fail { reason }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn failure_reason(&self) -> Option<FailureReason> {
        match self {
            Self::Success { .. } => None,
            Self::Fail { reason } => Some(*reason),
        }
    }
}

/// Sends one conversion request per call and classifies the reply.
#[derive(Debug, Clone)]
pub struct ConversionClient<T> {
    transport: T,
    endpoint: String,
    client_id: String,
}

impl ConversionClient<HttpTransport> {
    pub fn from_settings(settings: &ServiceSettings) -> Self {
        Self::new(HttpTransport::new(settings.timeout()), settings)
    }
}

impl<T: Transport> ConversionClient<T> {
    pub fn new(transport: T, settings: &ServiceSettings) -> Self {
        Self {
            transport,
            endpoint: settings.conversion_url.clone(),
            client_id: settings.client_id.clone(),
        }
    }

    pub fn convert(&self, source: &FontKey, destination: &FontKey, text: &str) -> ConversionOutcome {
        let request = ConversionRequest::single(&self.client_id, source, destination, text);
        let payload = match request.to_json() {
            Ok(payload) => payload,
            Err(err) => {
                debug!(%err, "failed to serialize conversion request");
                return ConversionOutcome::fail(FailureReason::Transient);
            }
        };

        let response = match self.transport.post(&self.endpoint, &payload) {
            Ok(response) => response,
            Err(err) => {
                debug!(%err, endpoint = %self.endpoint, "conversion request failed");
                return ConversionOutcome::fail(FailureReason::Transient);
            }
        };

        if !response.is_success() {
            debug!(status = response.status, "conversion service returned non-success status");
            return ConversionOutcome::fail(FailureReason::Transient);
        }

        classify_body(&response.body)
    }

    /// Converts a fixed demo word; true iff the service answered with a 2xx.
    pub fn check_availability(&self) -> bool {
        let request = ConversionRequest::single(
            &self.client_id,
            &FontKey::new(DEMO_SOURCE_KEY),
            &FontKey::unicode(),
            DEMO_TEXT,
        );

        let available = request
            .to_json()
            .ok()
            .and_then(|payload| self.transport.post(&self.endpoint, &payload).ok())
            .is_some_and(|response| response.is_success());

        info!(endpoint = %self.endpoint, available, "checked conversion service");
        available
    }
}

fn classify_body(body: &str) -> ConversionOutcome {
    let response = match ConversionResponse::parse(body) {
        Ok(response) => response,
        Err(err) => {
            debug!(%err, "conversion response is not valid json");
            return ConversionOutcome::fail(FailureReason::Transient);
        }
    };

    if response.is_success() {
        return match response.result {
            Some(result_text) => ConversionOutcome::Success { result_text },
            None => ConversionOutcome::fail(FailureReason::Transient),
        };
    }

    let reason = match response.message_id() {
        MessageId::RedirectToServiceRenew => FailureReason::LicenseExpired,
        MessageId::RedirectToServicePayment => FailureReason::TrialExpired,
        MessageId::Unrecognised => FailureReason::Transient,
    };
    ConversionOutcome::fail(reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{TransportError, TransportResponse};
    use std::cell::RefCell;

    struct Canned {
        reply: Result<TransportResponse, TransportError>,
        payloads: RefCell<Vec<String>>,
    }

    impl Canned {
        fn ok(status: u16, body: &str) -> Self {
            Self {
                reply: Ok(TransportResponse { status, body: body.to_owned() }),
                payloads: RefCell::new(Vec::new()),
            }
        }

        fn unreachable() -> Self {
            Self {
                reply: Err(TransportError::Unreachable("connection refused".to_owned())),
                payloads: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport for Canned {
        fn post(&self, _address: &str, payload: &str) -> Result<TransportResponse, TransportError> {
            self.payloads.borrow_mut().push(payload.to_owned());
            self.reply.clone()
        }
    }

    fn convert_with(transport: &Canned) -> ConversionOutcome {
        let client = ConversionClient::new(transport, &ServiceSettings::default());
        client.convert(&FontKey::new("PREETI"), &FontKey::unicode(), "g]kfnL")
    }

    #[test]
    fn success_status_yields_result_text() {
        let transport = Canned::ok(200, r#"{"status":"success","result":"नेपाली"}"#);

        assert_eq!(
            convert_with(&transport),
            ConversionOutcome::Success { result_text: "नेपाली".to_owned() }
        );
        assert_eq!(transport.payloads.borrow().len(), 1);
    }

    #[test]
    fn redirect_codes_map_to_subscription_failures() {
        let renew = Canned::ok(200, r#"{"status":"fail","messageId":"REDIRECT_TO_SERVICE_RENEW"}"#);
        let payment =
            Canned::ok(200, r#"{"status":"fail","messageId":"REDIRECT_TO_SERVICE_PAYMENT"}"#);

        assert_eq!(convert_with(&renew), ConversionOutcome::fail(FailureReason::LicenseExpired));
        assert_eq!(convert_with(&payment), ConversionOutcome::fail(FailureReason::TrialExpired));
    }

    #[test]
    fn missing_status_is_checked_for_message_id() {
        let renew = Canned::ok(200, r#"{"messageId":"REDIRECT_TO_SERVICE_RENEW"}"#);
        assert_eq!(convert_with(&renew), ConversionOutcome::fail(FailureReason::LicenseExpired));
    }

    #[test]
    fn everything_else_is_transient() {
        let cases = [
            Canned::ok(500, r#"{"status":"success","result":"x"}"#),
            Canned::ok(200, "not json"),
            Canned::ok(200, r#"{"status":"fail","messageId":"SERVICE_NOT_AVAILABLE"}"#),
            Canned::ok(200, r#"{"status":"success"}"#),
            Canned::unreachable(),
        ];

        for transport in &cases {
            assert_eq!(convert_with(transport), ConversionOutcome::fail(FailureReason::Transient));
        }
    }

    #[test]
    fn availability_check_sends_demo_word_and_checks_status_only() {
        let up = Canned::ok(200, r#"{"status":"fail"}"#);
        let client = ConversionClient::new(&up, &ServiceSettings::default());
        assert!(client.check_availability());

        let payload = up.payloads.borrow()[0].clone();
        assert!(payload.contains(r#""sourceFont":"PREETI""#));
        assert!(payload.contains(r#""text":"g]kfnL""#));

        let down = Canned::ok(503, "");
        assert!(!ConversionClient::new(&down, &ServiceSettings::default()).check_availability());
        let gone = Canned::unreachable();
        assert!(!ConversionClient::new(&gone, &ServiceSettings::default()).check_availability());
    }
}
