/// Anomaly alert delivery
///
/// A refresh request arriving from an address that differs from the one
/// recorded at issuance triggers a notification to the security team.
/// Delivery is best-effort: failures are logged and never affect the
/// rotation outcome.
use crate::config::AlertSettings;
use crate::error::{Result, TokenError};
use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Sink for IP-change anomaly notifications.
///
/// Implementations own their failure handling; the rotation path only
/// dispatches and moves on.
#[async_trait]
pub trait AnomalyNotifier: Send + Sync {
    async fn notify(&self, user_id: Uuid, old_ip: &str, new_ip: &str);
}

/// SMTP-backed notifier (or no-op when SMTP is not configured)
#[derive(Clone)]
pub struct EmailAlertService {
    transport: Option<Arc<AsyncSmtpTransport<Tokio1Executor>>>,
    from: Mailbox,
    security_team: Mailbox,
}

impl EmailAlertService {
    /// Build the alert service from configuration.
    ///
    /// If SMTP host is empty, operates in no-op mode (logs only). Useful
    /// for development and testing without email infrastructure.
    pub fn new(config: &AlertSettings) -> Result<Self> {
        let from = config
            .smtp_from
            .parse::<Mailbox>()
            .map_err(|e| TokenError::Internal(format!("Invalid SMTP_FROM address: {}", e)))?;

        let security_team = config.security_team_address.parse::<Mailbox>().map_err(|e| {
            TokenError::Internal(format!("Invalid ALERT_SECURITY_ADDRESS: {}", e))
        })?;

        let transport = if config.smtp_host.trim().is_empty() {
            warn!("SMTP host not configured; anomaly alerts will operate in no-op mode");
            None
        } else {
            let builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
                .map_err(|e| {
                    TokenError::Internal(format!("Failed to configure SMTP transport: {}", e))
                })?
                .port(config.smtp_port);

            let builder = if let (Some(username), Some(password)) =
                (&config.smtp_username, &config.smtp_password)
            {
                builder.credentials(Credentials::new(username.to_string(), password.to_string()))
            } else {
                builder
            };

            Some(Arc::new(builder.build()))
        };

        Ok(Self {
            transport,
            from,
            security_team,
        })
    }

    /// Check if SMTP transport is enabled
    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }
}

#[async_trait]
impl AnomalyNotifier for EmailAlertService {
    async fn notify(&self, user_id: Uuid, old_ip: &str, new_ip: &str) {
        let Some(transport) = &self.transport else {
            info!(
                %user_id,
                old_ip,
                new_ip,
                "IP change detected during token refresh (alert delivery disabled)"
            );
            return;
        };

        let body = format!(
            "Token refresh for user {} came from a new network address.\n\n\
            Recorded address: {}\n\
            Current address:  {}\n\n\
            The rotation was allowed; this alert is observational.",
            user_id, old_ip, new_ip
        );

        let message = match Message::builder()
            .from(self.from.clone())
            .to(self.security_team.clone())
            .subject(format!("IP change on token refresh for user {}", user_id))
            .body(body)
        {
            Ok(message) => message,
            Err(e) => {
                warn!(%user_id, "Failed to build anomaly alert email: {}", e);
                return;
            }
        };

        if let Err(e) = transport.send(message).await {
            warn!(%user_id, "Failed to deliver anomaly alert: {}", e);
        }
    }
}
