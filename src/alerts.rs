use reqwest::Client;
use tracing::{debug, warn};

use crate::config::Config;

const PUSHOVER_MESSAGES_URL: &str = "https://api.pushover.net/1/messages.json";

#[derive(Debug, Clone)]
struct PushoverCredentials {
    token: String,
    user: String,
}

/// Best-effort operator notifications through Pushover.
///
/// Failures are logged and otherwise ignored.
#[derive(Debug, Clone)]
pub struct Alerter {
    http_client: Client,
    credentials: Option<PushoverCredentials>,
}

impl Alerter {
    pub fn from_config(config: &Config) -> Self {
        let credentials = match (&config.pushover_token, &config.pushover_user) {
            (Some(token), Some(user)) => Some(PushoverCredentials {
                token: token.clone(),
                user: user.clone(),
            }),
            _ => None,
        };

        let http_client = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .unwrap_or_default();

        Self {
            http_client,
            credentials,
        }
    }

    pub fn disabled() -> Self {
        Self {
            http_client: Client::new(),
            credentials: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.credentials.is_some()
    }

    pub async fn notify(&self, message: &str) {
        let Some(credentials) = &self.credentials else {
            debug!("Alerting disabled, dropping notification: {}", message);
            return;
        };

        let result = self
            .http_client
            .post(PUSHOVER_MESSAGES_URL)
            .form(&[
                ("token", credentials.token.as_str()),
                ("user", credentials.user.as_str()),
                ("message", message),
            ])
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                debug!("Sent notification: {}", message);
            }
            Ok(response) => {
                warn!("Pushover rejected notification ({})", response.status());
            }
            Err(e) => {
                warn!("Failed to send notification: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ProviderKind;

    #[test]
    fn test_alerter_disabled_without_credentials() {
        let config = Config::mock(ProviderKind::Deezer);
        assert!(!Alerter::from_config(&config).is_enabled());
    }

    #[test]
    fn test_alerter_enabled_with_credentials() {
        let mut config = Config::mock(ProviderKind::Deezer);
        config.pushover_token = Some("token".to_string());
        config.pushover_user = Some("user".to_string());
        assert!(Alerter::from_config(&config).is_enabled());
    }

    #[tokio::test]
    async fn test_disabled_notify_is_noop() {
        Alerter::disabled().notify("nothing happens").await;
    }
}
