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

use async_trait::async_trait;

use tokex_core::{Context, ProvideCredential, Result};

use crate::credential::AwsCredential;

/// StaticCredentialProvider returns a fixed credential triple.
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    credential: AwsCredential,
}

impl StaticCredentialProvider {
    /// Create a provider around a fixed access key pair.
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            credential: AwsCredential {
                access_key_id: access_key_id.into(),
                secret_access_key: secret_access_key.into(),
                session_token: None,
                expires_at: None,
            },
        }
    }

    /// Attach a session token for temporary credentials.
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.credential.session_token = Some(token.into());
        self
    }
}

#[async_trait]
impl ProvideCredential for StaticCredentialProvider {
    type Credential = AwsCredential;

    async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
        Ok(Some(self.credential.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_credential_provider() {
        let ctx = Context::new();
        let provider = StaticCredentialProvider::new("ak", "sk").with_session_token("st");

        let cred = provider
            .provide_credential(&ctx)
            .await
            .unwrap()
            .expect("credential must be resolved");
        assert_eq!(cred.access_key_id, "ak");
        assert_eq!(cred.secret_access_key, "sk");
        assert_eq!(cred.session_token.as_deref(), Some("st"));
    }
}
