use anyhow::Context;

use dm_core::ports::MessageLauncherPort;

/// Hands deep links (e.g. a pre-filled wa.me URL) to the platform's
/// registered handler.
pub struct SystemMessageLauncher;

impl MessageLauncherPort for SystemMessageLauncher {
    fn open(&self, url: &str) -> anyhow::Result<()> {
        open::that(url).with_context(|| format!("open external handler for {url}"))
    }
}
