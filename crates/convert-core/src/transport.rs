use std::time::Duration;

/// Form field that carries the JSON payload.
pub const FORM_FIELD: &str = "data";
const FORM_BOUNDARY: &str = "----nepfont-form-boundary-7d41c9e2";
const USER_AGENT: &str = concat!("nepfont/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("service unreachable: {0}")]
    Unreachable(String),
    #[error("unable to read response body: {0}")]
    Body(String),
}

/// Posts a serialized payload to an address. Implementations must bound each
/// call with a timeout and report it as an error, never hang.
pub trait Transport {
    fn post(&self, address: &str, payload: &str) -> Result<TransportResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn post(&self, address: &str, payload: &str) -> Result<TransportResponse, TransportError> {
        (**self).post(address, payload)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn post(&self, address: &str, payload: &str) -> Result<TransportResponse, TransportError> {
        (**self).post(address, payload)
    }
}

/// Blocking HTTP transport sending the payload as a one-field multipart form.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    agent: ureq::Agent,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self { agent }
    }
}

impl Transport for HttpTransport {
    fn post(&self, address: &str, payload: &str) -> Result<TransportResponse, TransportError> {
        let result = self
            .agent
            .post(address)
            .set("Content-Type", &format!("multipart/form-data; boundary={FORM_BOUNDARY}"))
            .set("User-Agent", USER_AGENT)
            .send_string(&multipart_body(payload));

        match result {
            Ok(resp) => {
                let status = resp.status();
                let body = resp.into_string().map_err(|e| TransportError::Body(e.to_string()))?;
                Ok(TransportResponse { status, body })
            }
            Err(ureq::Error::Status(status, resp)) => {
                Ok(TransportResponse { status, body: resp.into_string().unwrap_or_default() })
            }
            Err(ureq::Error::Transport(err)) => Err(TransportError::Unreachable(err.to_string())),
        }
    }
}

pub fn multipart_body(payload: &str) -> String {
    format!(
        "--{FORM_BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{FORM_FIELD}\"\r\n\
         Content-Type: application/json; charset=utf-8\r\n\
         \r\n\
         {payload}\r\n\
         --{FORM_BOUNDARY}--\r\n"
    )
}
