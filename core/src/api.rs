use crate::{Context, Result};
use std::fmt::Debug;

/// SigningCredential is the trait for credentials that can back a request
/// signature or a bearer header.
pub trait SigningCredential: Clone + Debug + Send + Sync + Unpin + 'static {
    /// Check if the credential is still valid.
    fn is_valid(&self) -> bool;
}

impl<T: SigningCredential> SigningCredential for Option<T> {
    fn is_valid(&self) -> bool {
        let Some(cred) = self else {
            return false;
        };

        cred.is_valid()
    }
}

/// ProvideCredential is the trait used to load a credential from the
/// environment.
///
/// Services require different credentials: AWS requires an access key pair
/// with an optional session token, while Google requires an OAuth2 token.
#[async_trait::async_trait]
pub trait ProvideCredential: Debug + Send + Sync + 'static {
    /// Credential returned by this provider.
    type Credential: Send + Sync + Unpin + 'static;

    /// Load credential from current env.
    ///
    /// - Returns `Ok(Some(cred))` if a credential was found.
    /// - Returns `Ok(None)` if this source has nothing to offer, so callers
    ///   may fall through to the next source.
    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>>;
}
