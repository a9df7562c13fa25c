use std::sync::Arc;

use tracing::{info, warn};

use dm_core::errors::SessionError;
use dm_core::ports::MessageLauncherPort;
use dm_core::wizard::booking::BookingWizard;

/// Terminal action of the booking wizard.
///
/// Builds the pre-filled deep link and hands it to the external messaging
/// app. Fire-and-forget: a launcher failure is logged, not propagated, and
/// the wizard still reaches its submitted state; the handoff is not a
/// confirmed transaction.
pub struct SubmitBooking {
    launcher: Arc<dyn MessageLauncherPort>,
    whatsapp_number: String,
}

impl SubmitBooking {
    pub fn new(launcher: Arc<dyn MessageLauncherPort>, whatsapp_number: impl Into<String>) -> Self {
        Self {
            launcher,
            whatsapp_number: whatsapp_number.into(),
        }
    }

    /// Validate the terminal step, build the deep link and open it.
    /// Returns the link for display ("chat with us" followups).
    pub fn execute(&self, wizard: &mut BookingWizard) -> Result<String, SessionError> {
        let message = wizard.submit()?;
        let url = format!(
            "https://wa.me/{}?text={}",
            self.whatsapp_number,
            urlencoding::encode(&message)
        );
        info!(number = %self.whatsapp_number, "booking submitted");

        if let Err(err) = self.launcher.open(&url) {
            warn!(error = %err, "message app handoff failed");
        }
        Ok(url)
    }
}
