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

use super::{EnvCredentialProvider, ProvideCredentialChain};
use crate::credential::AwsCredential;

/// DefaultCredentialProvider is the provider used when callers don't inject
/// their own.
///
/// It resolves from environment variables only. Richer resolution such as
/// shared config files, SSO or instance metadata belongs to the AWS SDK;
/// callers already using one can wire it in through
/// [`with_credential_provider`](crate::ExternalAccountCredential::with_credential_provider).
#[derive(Debug)]
pub struct DefaultCredentialProvider {
    chain: ProvideCredentialChain,
}

impl DefaultCredentialProvider {
    /// Create a new DefaultCredentialProvider.
    pub fn new() -> Self {
        Self {
            chain: ProvideCredentialChain::new().push(EnvCredentialProvider::new()),
        }
    }
}

impl Default for DefaultCredentialProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProvideCredential for DefaultCredentialProvider {
    type Credential = AwsCredential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        self.chain.provide_credential(ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tokex_core::StaticEnv;

    use crate::constants::{AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY};

    #[tokio::test]
    async fn test_default_provider_reads_env() {
        let envs = HashMap::from([
            (AWS_ACCESS_KEY_ID.to_string(), "default_ak".to_string()),
            (AWS_SECRET_ACCESS_KEY.to_string(), "default_sk".to_string()),
        ]);
        let ctx = Context::new().with_env(StaticEnv { envs });

        let cred = DefaultCredentialProvider::new()
            .provide_credential(&ctx)
            .await
            .unwrap()
            .expect("credential must be resolved");
        assert_eq!(cred.access_key_id, "default_ak");
    }

    #[tokio::test]
    async fn test_default_provider_empty_env() {
        let ctx = Context::new().with_env(StaticEnv::default());

        let cred = DefaultCredentialProvider::new()
            .provide_credential(&ctx)
            .await
            .unwrap();
        assert!(cred.is_none());
    }
}
