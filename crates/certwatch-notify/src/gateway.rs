use async_trait::async_trait;
use certwatch_common::types::UserId;
use serde::Deserialize;

use crate::error::{NotifyError, Result};
use crate::Notifier;

/// HTTP client for the internal message gateway.
///
/// Messages are posted form-encoded to `<base_url>/api/v1/wechat` with the
/// recipient accounts joined by `|`; the gateway answers with a JSON envelope
/// whose `code` must be 200 even on HTTP success.
pub struct MessageGateway {
    client: reqwest::Client,
    base_url: String,
    app_key: String,
}

#[derive(Debug, Deserialize)]
struct GatewayResponse {
    code: i64,
    #[serde(default)]
    msg: String,
}

impl MessageGateway {
    pub fn new(base_url: impl Into<String>, app_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            app_key: app_key.into(),
        }
    }
}

#[async_trait]
impl Notifier for MessageGateway {
    async fn notify(
        &self,
        recipients: &[UserId],
        title: &str,
        body: &str,
        link: &str,
    ) -> Result<()> {
        let account = recipients.join("|");
        let params = [
            ("account", account.as_str()),
            ("title", title),
            ("content", body),
            ("url", link),
        ];

        let response = self
            .client
            .post(format!("{}/api/v1/wechat", self.base_url))
            .header("AppJWTKey", &self.app_key)
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: GatewayResponse = response.json().await?;
        if envelope.code != 200 {
            return Err(NotifyError::Gateway {
                code: envelope.code,
                msg: envelope.msg,
            });
        }

        tracing::debug!(account = %account, title = %title, "gateway accepted message");
        Ok(())
    }
}
