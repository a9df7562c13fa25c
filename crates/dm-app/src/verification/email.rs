use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tokio::task::AbortHandle;
use tokio::time::{interval_at, Duration, Instant};
use tracing::{debug, warn};

use dm_core::errors::SessionError;
use dm_core::identity::IdentityPatch;
use dm_core::input::OTP_LEN;
use dm_core::ports::AuthGatewayPort;
use dm_core::verification::{Cooldown, SEND_ERR_COOLDOWN_SECS, SEND_OK_COOLDOWN_SECS};

use crate::session::SessionContainer;

/// Orchestrates the one-time-code request/verify cycle.
///
/// Owns the cooldown state and the ticker task that counts it down once
/// per second. Arming a cooldown while one is running aborts the previous
/// ticker before spawning a new one; two countdowns never run at once.
/// The in-flight flag is set before the gateway call and cleared on every
/// completion path, so a duplicate send is rejected locally while one is
/// pending and a failed call never leaves the flow stuck.
pub struct EmailVerification {
    gateway: Arc<dyn AuthGatewayPort>,
    session: Arc<SessionContainer>,
    cooldown: Arc<Mutex<Cooldown>>,
    remaining_tx: watch::Sender<u32>,
    ticker: std::sync::Mutex<Option<AbortHandle>>,
}

impl EmailVerification {
    pub fn new(gateway: Arc<dyn AuthGatewayPort>, session: Arc<SessionContainer>) -> Self {
        let (remaining_tx, _) = watch::channel(0);
        Self {
            gateway,
            session,
            cooldown: Arc::new(Mutex::new(Cooldown::new())),
            remaining_tx,
            ticker: std::sync::Mutex::new(None),
        }
    }

    /// Seconds until the next send is allowed, for countdown display.
    pub async fn remaining_secs(&self) -> u32 {
        self.cooldown.lock().await.remaining_secs()
    }

    pub async fn can_send(&self) -> bool {
        self.cooldown.lock().await.can_send()
    }

    /// Observe the countdown without polling.
    pub fn subscribe_remaining(&self) -> watch::Receiver<u32> {
        self.remaining_tx.subscribe()
    }

    /// Request a code for `email`.
    ///
    /// Rejected locally, without a network call, while the cooldown is
    /// running or a send is already pending. A successful send arms the
    /// full cooldown; a failed send arms the short one so the user can
    /// retry sooner after a transient error.
    pub async fn send_code(&self, email: &str) -> Result<(), SessionError> {
        if email.is_empty() {
            return Err(SessionError::Validation(
                "add an email to send a verification code".to_string(),
            ));
        }

        {
            let mut cooldown = self.cooldown.lock().await;
            if !cooldown.can_send() {
                let remaining = cooldown.remaining_secs();
                return Err(SessionError::Validation(if remaining > 0 {
                    format!("resend available in {remaining}s")
                } else {
                    "a code is already being sent".to_string()
                }));
            }
            cooldown.begin_send();
        }

        let result = self.gateway.send_verification_code(email).await;

        let duration = match &result {
            Ok(()) => SEND_OK_COOLDOWN_SECS,
            Err(err) => {
                warn!(error = %err, "verification code send failed");
                SEND_ERR_COOLDOWN_SECS
            }
        };
        {
            let mut cooldown = self.cooldown.lock().await;
            cooldown.finish_send();
            cooldown.start(duration);
        }
        self.restart_ticker(duration);

        result.map_err(SessionError::from)
    }

    /// Check the entered code and, on success, mark the session identity
    /// verified.
    pub async fn verify(&self, email: &str, code: &str) -> Result<(), SessionError> {
        if email.is_empty() {
            return Err(SessionError::Validation(
                "add an email to verify".to_string(),
            ));
        }
        if code.len() < OTP_LEN {
            return Err(SessionError::Validation(
                "enter the 6-digit code".to_string(),
            ));
        }

        self.gateway.verify_code(email, code).await?;
        self.session.update_identity(IdentityPatch::verified(true))?;
        debug!("email verified");
        Ok(())
    }

    /// Abort any running ticker and spawn a fresh one (cancel-then-restart).
    fn restart_ticker(&self, duration_secs: u32) {
        let cooldown = Arc::clone(&self.cooldown);
        let remaining_tx = self.remaining_tx.clone();
        let _ = remaining_tx.send(duration_secs);

        let handle = tokio::spawn(async move {
            let period = Duration::from_secs(1);
            let mut ticks = interval_at(Instant::now() + period, period);
            loop {
                ticks.tick().await;
                let remaining = cooldown.lock().await.tick();
                let _ = remaining_tx.send(remaining);
                if remaining == 0 {
                    break;
                }
            }
        })
        .abort_handle();

        let mut slot = self.ticker.lock().expect("ticker lock poisoned");
        if let Some(previous) = slot.replace(handle) {
            previous.abort();
        }
    }
}

impl Drop for EmailVerification {
    /// Tear down the ticker with its owner, so no orphaned task mutates
    /// state after disposal.
    fn drop(&mut self) {
        if let Some(handle) = self.ticker.lock().expect("ticker lock poisoned").take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use dm_core::errors::GatewayError;
    use dm_core::identity::{Identity, Role};
    use dm_core::ids::UserId;
    use dm_core::ports::SignUpRequest;

    struct ScriptedGateway {
        send_calls: AtomicUsize,
        fail_sends: bool,
    }

    impl ScriptedGateway {
        fn new(fail_sends: bool) -> Arc<Self> {
            Arc::new(Self {
                send_calls: AtomicUsize::new(0),
                fail_sends,
            })
        }
    }

    #[async_trait]
    impl AuthGatewayPort for ScriptedGateway {
        async fn sign_up(&self, _request: &SignUpRequest) -> Result<Identity, GatewayError> {
            unimplemented!("not used in these tests")
        }

        async fn sign_in(&self, email: &str, _password: &str) -> Result<Identity, GatewayError> {
            Ok(Identity {
                id: UserId::from("u-1"),
                name: "Asha".to_string(),
                email: Some(email.to_string()),
                phone: "9876543210".to_string(),
                role: Role::Customer,
                verified: false,
                profile_completion: 50,
            })
        }

        async fn send_verification_code(&self, _email: &str) -> Result<(), GatewayError> {
            self.send_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_sends {
                Err(GatewayError::Transport("connection reset".to_string()))
            } else {
                Ok(())
            }
        }

        async fn verify_code(&self, _email: &str, code: &str) -> Result<(), GatewayError> {
            if code == "123456" {
                Ok(())
            } else {
                Err(GatewayError::Rejected("invalid code".to_string()))
            }
        }

        async fn request_password_reset(&self, _email: &str) -> Result<(), GatewayError> {
            Ok(())
        }

        async fn reset_password(
            &self,
            _email: &str,
            _code: &str,
            _new_password: &str,
        ) -> Result<(), GatewayError> {
            Ok(())
        }
    }

    fn flow(fail_sends: bool) -> (EmailVerification, Arc<ScriptedGateway>, Arc<SessionContainer>) {
        let gateway = ScriptedGateway::new(fail_sends);
        let session = Arc::new(SessionContainer::new(gateway.clone()));
        let verification = EmailVerification::new(gateway.clone(), session.clone());
        (verification, gateway, session)
    }

    /// Give the ticker task a chance to process due ticks.
    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_send_arms_full_cooldown() {
        let (verification, gateway, _session) = flow(false);

        verification.send_code("asha@example.com").await.unwrap();
        assert_eq!(verification.remaining_secs().await, SEND_OK_COOLDOWN_SECS);
        assert_eq!(gateway.send_calls.load(Ordering::SeqCst), 1);

        // A second request during the cooldown is rejected locally.
        let err = verification
            .send_code("asha@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Validation(_)));
        assert_eq!(gateway.send_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_send_arms_short_cooldown() {
        let (verification, _gateway, _session) = flow(true);

        let err = verification
            .send_code("asha@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Transport(_)));
        assert_eq!(verification.remaining_secs().await, SEND_ERR_COOLDOWN_SECS);
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_reaches_zero_and_reenables_sending() {
        let (verification, gateway, _session) = flow(false);

        verification.send_code("asha@example.com").await.unwrap();
        assert!(!verification.can_send().await);

        tokio::time::advance(Duration::from_secs(u64::from(SEND_OK_COOLDOWN_SECS))).await;
        settle().await;

        assert_eq!(verification.remaining_secs().await, 0);
        assert!(verification.can_send().await);

        verification.send_code("asha@example.com").await.unwrap();
        assert_eq!(gateway.send_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_decrements_one_per_second() {
        let (verification, _gateway, _session) = flow(true);

        let _ = verification.send_code("asha@example.com").await;
        assert_eq!(verification.remaining_secs().await, 10);

        tokio::time::advance(Duration::from_secs(3)).await;
        settle().await;
        assert_eq!(verification.remaining_secs().await, 7);

        tokio::time::advance(Duration::from_secs(7)).await;
        settle().await;
        assert_eq!(verification.remaining_secs().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_cancels_previous_ticker() {
        let (verification, _gateway, _session) = flow(true);

        // First (failed) send arms the short cooldown.
        let _ = verification.send_code("asha@example.com").await;
        tokio::time::advance(Duration::from_secs(10)).await;
        settle().await;
        assert!(verification.can_send().await);

        // Second send restarts the countdown from scratch.
        let _ = verification.send_code("asha@example.com").await;
        assert_eq!(verification.remaining_secs().await, 10);

        // With a single live ticker each second costs exactly one unit;
        // a leaked first ticker would double-decrement.
        tokio::time::advance(Duration::from_secs(4)).await;
        settle().await;
        assert_eq!(verification.remaining_secs().await, 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_verify_marks_session_identity() {
        let (verification, _gateway, session) = flow(false);
        session.sign_in("asha@example.com", "secret").await.unwrap();

        verification
            .verify("asha@example.com", "123456")
            .await
            .unwrap();
        assert!(session.current().unwrap().verified);
    }

    #[tokio::test(start_paused = true)]
    async fn test_verify_rejects_short_code_locally() {
        let (verification, _gateway, session) = flow(false);
        session.sign_in("asha@example.com", "secret").await.unwrap();

        let err = verification
            .verify("asha@example.com", "123")
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Validation(_)));
        assert!(!session.current().unwrap().verified);
    }
}
