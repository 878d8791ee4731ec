//! Google Cloud workload identity federation backed by AWS credentials.
//!
//! This crate exchanges an AWS IAM identity for a Google Cloud access token
//! without a long-lived service account key. It builds a SigV4-signed AWS STS
//! `GetCallerIdentity` request descriptor, wraps it into the subject token
//! envelope Google STS expects, performs the OAuth2 token exchange, and
//! optionally impersonates a service account.
//!
//! The signed `GetCallerIdentity` request is never sent to AWS by this crate:
//! it is only described, and Google STS performs the actual call to verify
//! the caller's identity.
//!
//! ## Example
//!
//! ```no_run
//! use tokex_core::{Context, OsEnv};
//! use tokex_google_aws::{ExternalAccountConfig, ExternalAccountCredential};
//! use tokex_http_send_reqwest::ReqwestHttpSend;
//!
//! # async fn example() -> tokex_core::Result<()> {
//! let ctx = Context::new()
//!     .with_http_send(ReqwestHttpSend::default())
//!     .with_env(OsEnv);
//!
//! let config = ExternalAccountConfig::from_slice(
//!     &std::fs::read("federation.json").expect("config must be readable"),
//! )?;
//! let credential = ExternalAccountCredential::new(
//!     "https://www.googleapis.com/auth/cloud-platform",
//!     config,
//! )?;
//!
//! let token = credential.fetch_auth_token(&ctx).await?;
//! # Ok(())
//! # }
//! ```

mod constants;

mod config;
pub use config::{AwsSource, CredentialSource, ExternalAccountConfig};

mod credential;
pub use credential::{AwsCredential, Token};

mod region;
pub use region::resolve_region;

mod sign;
pub use sign::{RequestSigner, SignedRequest};

mod subject_token;
pub use subject_token::AwsSubjectTokenProvider;

mod exchange;
pub use exchange::TokenExchangeClient;

mod impersonate;
pub use impersonate::ImpersonationClient;

mod external_account;
pub use external_account::ExternalAccountCredential;

mod provide_credential;
pub use provide_credential::{
    DefaultCredentialProvider, EnvCredentialProvider, ProvideCredentialChain,
    StaticCredentialProvider,
};
