use async_trait::async_trait;

use crate::backend::error::ProfileError;
use crate::backend::profile::{UpdatePayload, UpdateResponse};

/// The portal's user endpoints, as far as the profile screen needs them.
#[async_trait(?Send)]
pub trait ProfileApi {
    async fn update_user(
        &self,
        token: Option<&str>,
        payload: &UpdatePayload,
    ) -> Result<UpdateResponse, ProfileError>;
}

pub struct HttpApi {
    client: reqwest::Client,
    base: String,
}

impl HttpApi {
    pub fn new(base: impl Into<String>) -> Self {
        Self { client: reqwest::Client::new(), base: base.into() }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base.trim_end_matches('/'), path.trim_start_matches('/'))
    }
}

#[async_trait(?Send)]
impl ProfileApi for HttpApi {
    async fn update_user(
        &self,
        token: Option<&str>,
        payload: &UpdatePayload,
    ) -> Result<UpdateResponse, ProfileError> {
        let url = self.url("/user/update-user");
        tracing::debug!("PUT {}", url);

        let mut req = self.client.put(&url).json(payload);
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        // The server reports rejections as {status: "failed"} bodies on 4xx codes.
        match serde_json::from_str::<UpdateResponse>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(e) if status.is_success() => Err(ProfileError::Decode(e)),
            Err(_) => Err(ProfileError::Status(status.as_u16())),
        }
    }
}
