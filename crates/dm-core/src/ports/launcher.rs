/// Hand a deep link to the platform's external handler.
///
/// Fire-and-forget: the handoff is not a confirmed transaction.
pub trait MessageLauncherPort: Send + Sync {
    fn open(&self, url: &str) -> anyhow::Result<()>;
}
