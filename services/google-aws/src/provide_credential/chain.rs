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

use std::fmt::{self, Debug};

use async_trait::async_trait;

use tokex_core::{Context, ProvideCredential, Result};

use crate::credential::AwsCredential;

/// A chain of credential providers that will be tried in order.
pub struct ProvideCredentialChain {
    providers: Vec<Box<dyn ProvideCredential<Credential = AwsCredential>>>,
}

impl ProvideCredentialChain {
    /// Create a new empty credential provider chain.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Add a credential provider to the chain.
    pub fn push(
        mut self,
        provider: impl ProvideCredential<Credential = AwsCredential> + 'static,
    ) -> Self {
        self.providers.push(Box::new(provider));
        self
    }
}

impl Default for ProvideCredentialChain {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for ProvideCredentialChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProvideCredentialChain")
            .field("providers_count", &self.providers.len())
            .finish()
    }
}

#[async_trait]
impl ProvideCredential for ProvideCredentialChain {
    type Credential = AwsCredential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        for provider in &self.providers {
            log::debug!("trying credential provider: {provider:?}");

            match provider.provide_credential(ctx).await {
                Ok(Some(cred)) => {
                    log::debug!("loaded credential from provider: {provider:?}");
                    return Ok(Some(cred));
                }
                Ok(None) => continue,
                Err(e) => {
                    log::warn!("credential provider {provider:?} failed: {e:?}");
                    // Continue to next provider on error
                    continue;
                }
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokex_core::Error;

    #[derive(Debug)]
    struct MockSuccessProvider;

    #[async_trait]
    impl ProvideCredential for MockSuccessProvider {
        type Credential = AwsCredential;

        async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
            Ok(Some(AwsCredential {
                access_key_id: "chain_ak".to_string(),
                secret_access_key: "chain_sk".to_string(),
                session_token: None,
                expires_at: None,
            }))
        }
    }

    #[derive(Debug)]
    struct MockEmptyProvider;

    #[async_trait]
    impl ProvideCredential for MockEmptyProvider {
        type Credential = AwsCredential;

        async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
            Ok(None)
        }
    }

    #[derive(Debug)]
    struct MockFailProvider;

    #[async_trait]
    impl ProvideCredential for MockFailProvider {
        type Credential = AwsCredential;

        async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
            Err(Error::unexpected("mock provider failure"))
        }
    }

    #[tokio::test]
    async fn test_chain_returns_first_success() {
        let ctx = Context::new();
        let chain = ProvideCredentialChain::new()
            .push(MockEmptyProvider)
            .push(MockSuccessProvider);

        let cred = chain
            .provide_credential(&ctx)
            .await
            .unwrap()
            .expect("credential must be resolved");
        assert_eq!(cred.access_key_id, "chain_ak");
    }

    #[tokio::test]
    async fn test_chain_continues_past_errors() {
        let ctx = Context::new();
        let chain = ProvideCredentialChain::new()
            .push(MockFailProvider)
            .push(MockSuccessProvider);

        let cred = chain.provide_credential(&ctx).await.unwrap();
        assert!(cred.is_some());
    }

    #[tokio::test]
    async fn test_empty_chain_yields_none() {
        let ctx = Context::new();
        let chain = ProvideCredentialChain::new();

        let cred = chain.provide_credential(&ctx).await.unwrap();
        assert!(cred.is_none());
    }
}
