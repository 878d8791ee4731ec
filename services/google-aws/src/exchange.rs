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

use http::header::{ACCEPT, CONTENT_TYPE};
use log::{debug, error};
use serde::{Deserialize, Serialize};

use tokex_core::time::now;
use tokex_core::{Context, Error, Result};

use crate::constants::{
    ACCESS_TOKEN_REQUEST_TYPE, DEFAULT_SCOPE, TOKEN_EXCHANGE_GRANT_TYPE,
};
use crate::credential::Token;
use crate::subject_token::AwsSubjectTokenProvider;

/// STS token exchange request.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StsTokenRequest {
    grant_type: &'static str,
    requested_token_type: &'static str,
    audience: String,
    scope: String,
    subject_token: String,
    subject_token_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<String>,
}

/// STS token response.
#[derive(Deserialize)]
struct StsTokenResponse {
    access_token: Option<String>,
    id_token: Option<String>,
    expires_in: Option<u64>,
}

/// TokenExchangeClient trades an AWS-signed subject token for a Google STS
/// token.
#[derive(Debug, Clone)]
pub struct TokenExchangeClient {
    token_url: String,
    audience: String,
    subject_token_type: String,
    scope: String,
    workforce_pool_user_project: Option<String>,
}

impl TokenExchangeClient {
    /// Create a new client for the given STS endpoint.
    pub fn new(
        token_url: impl Into<String>,
        audience: impl Into<String>,
        subject_token_type: impl Into<String>,
    ) -> Self {
        Self {
            token_url: token_url.into(),
            audience: audience.into(),
            subject_token_type: subject_token_type.into(),
            scope: DEFAULT_SCOPE.to_string(),
            workforce_pool_user_project: None,
        }
    }

    /// Override the OAuth2 scope requested from STS.
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Attach a workforce pool user project, billed for workforce requests.
    pub fn with_workforce_pool_user_project(mut self, project: impl Into<String>) -> Self {
        self.workforce_pool_user_project = Some(project.into());
        self
    }

    /// Perform the exchange with a freshly minted subject token.
    pub async fn exchange(
        &self,
        ctx: &Context,
        subject_token_provider: &AwsSubjectTokenProvider,
    ) -> Result<Token> {
        let subject_token = subject_token_provider.fetch_subject_token(ctx).await?;
        self.exchange_subject_token(ctx, subject_token).await
    }

    async fn exchange_subject_token(&self, ctx: &Context, subject_token: String) -> Result<Token> {
        debug!("exchanging subject token for STS access token");

        let options = match &self.workforce_pool_user_project {
            Some(project) => Some(
                serde_json::to_string(&serde_json::json!({ "userProject": project })).map_err(
                    |e| Error::unexpected("failed to serialize request options").with_source(e),
                )?,
            ),
            None => None,
        };

        let request = StsTokenRequest {
            grant_type: TOKEN_EXCHANGE_GRANT_TYPE,
            requested_token_type: ACCESS_TOKEN_REQUEST_TYPE,
            audience: self.audience.clone(),
            scope: self.scope.clone(),
            subject_token,
            subject_token_type: self.subject_token_type.clone(),
            options,
        };

        let body = serde_json::to_vec(&request)
            .map_err(|e| Error::unexpected("failed to serialize request").with_source(e))?;

        let req = http::Request::builder()
            .method(http::Method::POST)
            .uri(&self.token_url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .body(body.into())
            .map_err(|e| Error::unexpected("failed to build HTTP request").with_source(e))?;

        let resp = ctx.http_send(req).await?;

        if resp.status() != http::StatusCode::OK {
            error!("exchange token got unexpected response: {resp:?}");
            let body = String::from_utf8_lossy(resp.body());
            return Err(Error::exchange_failed(format!(
                "exchange token failed: {body}"
            )));
        }

        let token_resp: StsTokenResponse = serde_json::from_slice(resp.body())
            .map_err(|e| Error::exchange_failed("failed to parse STS response").with_source(e))?;

        if token_resp.access_token.is_none() && token_resp.id_token.is_none() {
            return Err(Error::exchange_failed(
                "STS response carried neither an access token nor an id token",
            ));
        }

        let expires_at = token_resp.expires_in.map(|expires_in| {
            now() + chrono::TimeDelta::try_seconds(expires_in as i64).expect("in bounds")
        });

        Ok(Token {
            access_token: token_resp.access_token,
            id_token: token_resp.id_token,
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

    fn test_client() -> TokenExchangeClient {
        TokenExchangeClient::new(
            "https://sts.googleapis.com/v1/token",
            "//iam.googleapis.com/projects/1/locations/global/workloadIdentityPools/p/providers/aws",
            "urn:ietf:params:aws:token-type:aws4_request",
        )
    }

    #[tokio::test]
    async fn test_error_status_carries_upstream_body() {
        let ctx = Context::new().with_http_send(FixedResponse {
            status: http::StatusCode::BAD_REQUEST,
            body: r#"{"error":"invalid_grant","error_description":"Subject token is invalid"}"#,
        });

        let err = test_client()
            .exchange_subject_token(&ctx, "tok".to_string())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExchangeFailed);
        assert!(err.to_string().contains("invalid_grant"), "err was: {err}");
    }

    #[tokio::test]
    async fn test_response_without_any_token() {
        let ctx = Context::new().with_http_send(FixedResponse {
            status: http::StatusCode::OK,
            body: r#"{"token_type":"Bearer","expires_in":3600}"#,
        });

        let err = test_client()
            .exchange_subject_token(&ctx, "tok".to_string())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExchangeFailed);
        assert!(
            err.to_string().contains("neither an access token nor an id token"),
            "err was: {err}"
        );
    }

    #[tokio::test]
    async fn test_malformed_response_body() {
        let ctx = Context::new().with_http_send(FixedResponse {
            status: http::StatusCode::OK,
            body: "<html>not json</html>",
        });

        let err = test_client()
            .exchange_subject_token(&ctx, "tok".to_string())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExchangeFailed);
    }

    #[test]
    fn test_request_serialization() {
        let request = StsTokenRequest {
            grant_type: TOKEN_EXCHANGE_GRANT_TYPE,
            requested_token_type: ACCESS_TOKEN_REQUEST_TYPE,
            audience: "//iam.googleapis.com/projects/1/locations/global/workloadIdentityPools/p/providers/aws".to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            subject_token: "tok".to_string(),
            subject_token_type: "urn:ietf:params:aws:token-type:aws4_request".to_string(),
            options: None,
        };

        let value: serde_json::Value =
            serde_json::from_slice(&serde_json::to_vec(&request).unwrap()).unwrap();
        assert_eq!(
            value["grantType"],
            "urn:ietf:params:oauth:grant-type:token-exchange"
        );
        assert_eq!(
            value["requestedTokenType"],
            "urn:ietf:params:oauth:token-type:access_token"
        );
        assert_eq!(value["scope"], DEFAULT_SCOPE);
        assert_eq!(value["subjectToken"], "tok");
        assert!(value.get("options").is_none());
    }

    #[test]
    fn test_workforce_options_serialization() {
        let client = TokenExchangeClient::new("https://sts.googleapis.com/v1/token", "aud", "typ")
            .with_workforce_pool_user_project("billing-project");

        let options = serde_json::to_string(
            &serde_json::json!({ "userProject": client.workforce_pool_user_project }),
        )
        .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&options).unwrap();
        assert_eq!(parsed["userProject"], "billing-project");
    }
}
