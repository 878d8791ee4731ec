use serde::Deserialize;

use tokex_core::{Error, Result};

use crate::constants::EXTERNAL_ACCOUNT_TYPE;

/// Parsed external account credential configuration.
///
/// This is the JSON shape emitted by `gcloud iam workload-identity-pools
/// create-cred-config` for AWS providers. Construction via [`from_slice`] or
/// [`validate`] fails fast with a config error before any network access.
///
/// [`from_slice`]: ExternalAccountConfig::from_slice
/// [`validate`]: ExternalAccountConfig::validate
#[derive(Clone, Debug, Deserialize)]
pub struct ExternalAccountConfig {
    /// The credential type, must be `external_account`.
    #[serde(rename = "type")]
    pub credential_type: String,
    /// The audience identifying the workload identity pool provider.
    pub audience: String,
    /// The subject token type handed to Google STS.
    pub subject_token_type: String,
    /// The Google STS token exchange endpoint.
    pub token_url: String,
    /// Where the subject token comes from.
    pub credential_source: CredentialSource,
    /// Optional service account impersonation endpoint.
    pub service_account_impersonation_url: Option<String>,
    /// Optional project used for quota and billing.
    pub quota_project_id: Option<String>,
    /// Optional billing project, only valid for workforce pool audiences.
    pub workforce_pool_user_project: Option<String>,
    /// Optional universe domain, defaults to `googleapis.com`.
    pub universe_domain: Option<String>,
}

/// The credential source section of an external account config.
///
/// Current configs nest the AWS source under an `aws` key; older ones put
/// the fields directly on `credential_source`. Both are accepted.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum CredentialSource {
    /// `credential_source: {"aws": {...}}`
    Nested {
        /// The AWS source.
        aws: AwsSource,
    },
    /// `credential_source: {...}` with the AWS fields inline.
    Flat(AwsSource),
}

impl CredentialSource {
    /// The AWS source regardless of nesting.
    pub fn aws(&self) -> &AwsSource {
        match self {
            CredentialSource::Nested { aws } => aws,
            CredentialSource::Flat(aws) => aws,
        }
    }
}

/// AWS-specific credential source settings.
#[derive(Clone, Debug, Deserialize)]
pub struct AwsSource {
    /// Explicit AWS region. Resolved from the verification URL or the
    /// environment when absent.
    pub region: Option<String>,
    /// The STS GetCallerIdentity URL template, with a literal `{region}`
    /// placeholder.
    pub regional_cred_verification_url: String,
}

impl ExternalAccountConfig {
    /// Parse and validate a config from raw JSON bytes.
    pub fn from_slice(v: &[u8]) -> Result<Self> {
        let config: Self = serde_json::from_slice(v)
            .map_err(|e| Error::config_invalid("failed to parse credential config").with_source(e))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the config shape.
    ///
    /// Performs no I/O: everything checked here is knowable from the config
    /// alone.
    pub fn validate(&self) -> Result<()> {
        if self.credential_type != EXTERNAL_ACCOUNT_TYPE {
            return Err(Error::config_invalid(format!(
                "expected \"{EXTERNAL_ACCOUNT_TYPE}\" type but received \"{}\"",
                self.credential_type
            )));
        }

        for (field, value) in [
            ("token_url", &self.token_url),
            ("audience", &self.audience),
            ("subject_token_type", &self.subject_token_type),
        ] {
            if value.is_empty() {
                return Err(Error::config_invalid(format!(
                    "credential config is missing the {field} field"
                )));
            }
        }

        if self.credential_source.aws().regional_cred_verification_url.is_empty() {
            return Err(Error::config_invalid(
                "credential_source.aws.regional_cred_verification_url is required",
            ));
        }

        if self.workforce_pool_user_project.is_some() && !self.is_workforce_pool() {
            return Err(Error::config_invalid(
                "workforce_pool_user_project should not be set for non-workforce pool credentials",
            ));
        }

        Ok(())
    }

    /// Whether the audience names a workforce pool rather than a workload
    /// identity pool.
    pub(crate) fn is_workforce_pool(&self) -> bool {
        const MARKER: &str = "//iam.googleapis.com/locations/";

        let Some(idx) = self.audience.find(MARKER) else {
            return false;
        };
        let rest = &self.audience[idx + MARKER.len()..];
        let Some((location, rest)) = rest.split_once('/') else {
            return false;
        };
        !location.is_empty() && rest.starts_with("workforcePools/")
    }
}
