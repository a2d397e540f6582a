use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Identifier sent as `wordPluginId`. A fixed literal, not derived from the machine.
pub const DEFAULT_CLIENT_ID: &str = "fontconversion-9998";
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Service addresses and identity, read once per process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    pub conversion_url: String,
    pub renew_url: String,
    pub payment_url: String,
    pub contact_url: String,
    pub client_id: String,
    pub timeout_ms: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            conversion_url: "https://hijje.com/api/fontconversion".to_owned(),
            renew_url: "https://hijje.com/#/user/service-renew".to_owned(),
            payment_url: "https://hijje.com/#/user/service-payment".to_owned(),
            contact_url: "https://hijje.com/#/user/contact".to_owned(),
            client_id: DEFAULT_CLIENT_ID.to_owned(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ServiceSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.max(1))
    }

    pub fn renew_address(&self) -> String {
        format!("{}?appId={}", self.renew_url, self.client_id)
    }

    pub fn payment_address(&self) -> String {
        format!("{}?appId={}", self.payment_url, self.client_id)
    }

    pub fn contact_address(&self) -> String {
        self.contact_url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addresses_carry_client_id() {
        let settings = ServiceSettings::default();

        assert_eq!(
            settings.renew_address(),
            "https://hijje.com/#/user/service-renew?appId=fontconversion-9998"
        );
        assert!(settings.payment_address().ends_with("?appId=fontconversion-9998"));
        assert_eq!(settings.contact_address(), "https://hijje.com/#/user/contact");
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings: ServiceSettings =
            serde_json::from_str(r#"{ "conversion_url": "http://localhost:1/convert" }"#)
                .expect("partial settings should parse");

        assert_eq!(settings.conversion_url, "http://localhost:1/convert");
        assert_eq!(settings.client_id, DEFAULT_CLIENT_ID);
        assert_eq!(settings.timeout(), Duration::from_millis(DEFAULT_TIMEOUT_MS));
    }
}
