// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use log::{debug, error};
use serde::{Deserialize, Serialize};

use tokex_core::time::parse_rfc3339;
use tokex_core::{Context, Error, Result};

use crate::constants::DEFAULT_EXPIRY_SECONDS;
use crate::credential::Token;

/// Impersonation request.
#[derive(Serialize)]
struct ImpersonationRequest {
    lifetime: String,
    scope: Vec<String>,
}

/// Impersonated token response.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImpersonatedTokenResponse {
    access_token: String,
    expire_time: String,
}

/// ImpersonationClient mints short-lived service account tokens through the
/// IAM Credentials generateAccessToken endpoint.
#[derive(Debug, Clone)]
pub struct ImpersonationClient {
    url: String,
    scopes: Vec<String>,
}

impl ImpersonationClient {
    /// Create a new client for the given generateAccessToken URL.
    pub fn new(url: impl Into<String>, scopes: Vec<String>) -> Self {
        Self {
            url: url.into(),
            scopes,
        }
    }

    /// Trade an STS access token for a service account token.
    pub async fn impersonate(&self, ctx: &Context, sts_access_token: &str) -> Result<Token> {
        debug!("impersonating service account");

        let request = ImpersonationRequest {
            lifetime: format!("{DEFAULT_EXPIRY_SECONDS}s"),
            scope: self.scopes.clone(),
        };

        let body = serde_json::to_vec(&request)
            .map_err(|e| Error::unexpected("failed to serialize request").with_source(e))?;

        let req = http::Request::builder()
            .method(http::Method::POST)
            .uri(&self.url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {sts_access_token}"))
            .body(body.into())
            .map_err(|e| Error::unexpected("failed to build HTTP request").with_source(e))?;

        let resp = ctx.http_send(req).await?;

        if resp.status() != http::StatusCode::OK {
            error!("impersonated token got unexpected response: {resp:?}");
            let body = String::from_utf8_lossy(resp.body());
            return Err(Error::impersonation_failed(format!(
                "exchange impersonated token failed: {body}"
            )));
        }

        let token_resp: ImpersonatedTokenResponse = serde_json::from_slice(resp.body())
            .map_err(|e| {
                Error::impersonation_failed("failed to parse impersonation response")
                    .with_source(e)
            })?;

        let expires_at = parse_rfc3339(&token_resp.expire_time);

        Ok(Token {
            access_token: Some(token_resp.access_token),
            id_token: None,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use pretty_assertions::assert_eq;
    use tokex_core::{Context, ErrorKind, HttpSend};

    const URL: &str = "https://iamcredentials.googleapis.com/v1/projects/-/serviceAccounts/sa@p.iam.gserviceaccount.com:generateAccessToken";

    /// Answers every request with one canned status and body.
    #[derive(Debug)]
    struct FixedResponse {
        status: http::StatusCode,
        body: &'static str,
    }

    #[async_trait::async_trait]
    impl HttpSend for FixedResponse {
        async fn http_send(&self, _: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
            Ok(http::Response::builder()
                .status(self.status)
                .body(Bytes::from_static(self.body.as_bytes()))
                .unwrap())
        }
    }

    #[tokio::test]
    async fn test_error_status_carries_upstream_body() {
        let ctx = Context::new().with_http_send(FixedResponse {
            status: http::StatusCode::FORBIDDEN,
            body: r#"{"error":{"code":403,"message":"Permission 'iam.serviceAccounts.getAccessToken' denied"}}"#,
        });

        let client = ImpersonationClient::new(
            URL,
            vec!["https://www.googleapis.com/auth/cloud-platform".to_string()],
        );
        let err = client.impersonate(&ctx, "ya29.sts").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ImpersonationFailed);
        assert!(
            err.to_string().contains("iam.serviceAccounts.getAccessToken"),
            "err was: {err}"
        );
    }

    #[tokio::test]
    async fn test_malformed_response_body() {
        let ctx = Context::new().with_http_send(FixedResponse {
            status: http::StatusCode::OK,
            body: "<html>not json</html>",
        });

        let client = ImpersonationClient::new(
            URL,
            vec!["https://www.googleapis.com/auth/cloud-platform".to_string()],
        );
        let err = client.impersonate(&ctx, "ya29.sts").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ImpersonationFailed);
    }

    #[test]
    fn test_request_serialization() {
        let request = ImpersonationRequest {
            lifetime: format!("{DEFAULT_EXPIRY_SECONDS}s"),
            scope: vec!["https://www.googleapis.com/auth/devstorage.read_only".to_string()],
        };
        let value: serde_json::Value =
            serde_json::from_slice(&serde_json::to_vec(&request).unwrap()).unwrap();
        assert_eq!(value["lifetime"], "3600s");
        assert_eq!(
            value["scope"][0],
            "https://www.googleapis.com/auth/devstorage.read_only"
        );
    }

    #[test]
    fn test_response_parsing() {
        let body = r#"{"accessToken":"ya29.impersonated","expireTime":"2026-08-30T01:00:00Z"}"#;
        let resp: ImpersonatedTokenResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.access_token, "ya29.impersonated");
        assert!(parse_rfc3339(&resp.expire_time).is_some());
    }
}
