//! Discord REST implementation of the external gateway
//!
//! Delete and revoke calls treat `404` as success, so replays are harmless.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, instrument};

use roster_common::DiscordConfig;
use roster_core::{
    ExternalGateway, GatewayError, GatewayResult, PermissionOverwrite, Permissions, Snowflake,
};

/// Text channel type
const GUILD_TEXT: u8 = 0;

const USER_AGENT: &str = concat!("DiscordBot (roster-sync, ", env!("CARGO_PKG_VERSION"), ")");

/// Chat platform client over the v10 REST API
#[derive(Clone)]
pub struct DiscordGateway {
    client: Client,
    base_url: String,
    authorization: String,
}

#[derive(Debug, Deserialize)]
struct Created {
    id: Snowflake,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    retry_after: Option<f64>,
}

impl DiscordGateway {
    /// Create a new DiscordGateway
    pub fn new(config: &DiscordConfig) -> GatewayResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            authorization: format!("Bot {}", config.bot_token),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{path}", self.base_url))
            .header(reqwest::header::AUTHORIZATION, &self.authorization)
    }

    /// Send and turn non-success statuses into gateway errors
    async fn send(&self, request: RequestBuilder, missing_ok: bool) -> GatewayResult<Option<Response>> {
        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(Some(response));
        }
        if missing_ok && status == StatusCode::NOT_FOUND {
            debug!("Resource already gone");
            return Ok(None);
        }

        let header_wait = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<f64>().ok());
        let body = response.text().await.unwrap_or_default();

        Err(error_from_response(status, &body, header_wait))
    }

    async fn create(&self, path: &str, body: serde_json::Value) -> GatewayResult<Snowflake> {
        let response = self
            .send(self.request(Method::POST, path).json(&body), false)
            .await?
            .ok_or_else(|| GatewayError::Decode("empty response".to_string()))?;

        let created: Created = response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))?;
        Ok(created.id)
    }

    async fn put(&self, path: &str, body: Option<serde_json::Value>) -> GatewayResult<()> {
        let mut request = self.request(Method::PUT, path);
        if let Some(body) = body {
            request = request.json(&body);
        }
        self.send(request, false).await?;
        Ok(())
    }

    async fn delete(&self, path: &str) -> GatewayResult<()> {
        self.send(self.request(Method::DELETE, path), true).await?;
        Ok(())
    }
}

/// Map a failed response to a gateway error
fn error_from_response(status: StatusCode, body: &str, header_wait: Option<f64>) -> GatewayError {
    let parsed: Option<ApiErrorBody> = serde_json::from_str(body).ok();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let wait = parsed
            .as_ref()
            .and_then(|b| b.retry_after)
            .or(header_wait)
            .unwrap_or(1.0);
        return GatewayError::RateLimited {
            retry_after_ms: seconds_to_ms(wait),
        };
    }

    let message = parsed
        .and_then(|b| b.message)
        .unwrap_or_else(|| body.chars().take(200).collect());

    GatewayError::Http {
        status: status.as_u16(),
        message,
    }
}

fn seconds_to_ms(seconds: f64) -> u64 {
    Duration::try_from_secs_f64(seconds)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

#[async_trait]
impl ExternalGateway for DiscordGateway {
    #[instrument(skip(self))]
    async fn create_role(&self, guild_id: Snowflake, name: &str) -> GatewayResult<Snowflake> {
        self.create(
            &format!("/guilds/{guild_id}/roles"),
            json!({ "name": name, "mentionable": false }),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn delete_role(&self, guild_id: Snowflake, role_id: Snowflake) -> GatewayResult<()> {
        self.delete(&format!("/guilds/{guild_id}/roles/{role_id}")).await
    }

    #[instrument(skip(self))]
    async fn grant_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> GatewayResult<()> {
        self.put(&format!("/guilds/{guild_id}/members/{user_id}/roles/{role_id}"), None)
            .await
    }

    #[instrument(skip(self))]
    async fn revoke_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> GatewayResult<()> {
        self.delete(&format!("/guilds/{guild_id}/members/{user_id}/roles/{role_id}"))
            .await
    }

    #[instrument(skip(self, overwrites))]
    async fn create_channel(
        &self,
        guild_id: Snowflake,
        name: &str,
        overwrites: &[PermissionOverwrite],
    ) -> GatewayResult<Snowflake> {
        self.create(
            &format!("/guilds/{guild_id}/channels"),
            json!({
                "name": name,
                "type": GUILD_TEXT,
                "permission_overwrites": overwrites,
            }),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn delete_channel(&self, channel_id: Snowflake) -> GatewayResult<()> {
        self.delete(&format!("/channels/{channel_id}")).await
    }

    #[instrument(skip(self))]
    async fn grant_channel_access(
        &self,
        channel_id: Snowflake,
        user_id: Snowflake,
        allow: Permissions,
    ) -> GatewayResult<()> {
        let overwrite = PermissionOverwrite {
            allow,
            ..PermissionOverwrite::member_access(user_id)
        };
        let body = serde_json::to_value(overwrite).map_err(|e| GatewayError::Decode(e.to_string()))?;
        self.put(&format!("/channels/{channel_id}/permissions/{user_id}"), Some(body))
            .await
    }

    #[instrument(skip(self))]
    async fn revoke_channel_access(&self, channel_id: Snowflake, user_id: Snowflake) -> GatewayResult<()> {
        self.delete(&format!("/channels/{channel_id}/permissions/{user_id}"))
            .await
    }
}
