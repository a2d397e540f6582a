use crate::client::ConversionClient;
use crate::transport::Transport;

pub const FONT_ACTION_ON: &str = "Font Action: ON";
pub const FONT_ACTION_OFF: &str = "Font Action: OFF";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Sorry, the remote font service is currently unavailable, please try again later.")]
pub struct ServiceUnavailable;

/// On/off switch for the conversion menu. Turning it on checks the service
/// once, so individual conversions never pay for an availability check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionToggle {
    enabled: bool,
}

impl ConversionToggle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable<T: Transport>(
        &mut self,
        client: &ConversionClient<T>,
    ) -> Result<(), ServiceUnavailable> {
        self.enabled = client.check_availability();
        if self.enabled {
            Ok(())
        } else {
            Err(ServiceUnavailable)
        }
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn status_label(&self) -> &'static str {
        if self.enabled {
            FONT_ACTION_ON
        } else {
            FONT_ACTION_OFF
        }
    }
}
