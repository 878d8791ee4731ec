use tokex_core::Context;

use crate::constants::{AWS_DEFAULT_REGION, AWS_REGION, DEFAULT_AWS_REGION};

/// Resolve the AWS region used for signing and for the verification URL.
///
/// Priority: explicit config, then inference from the verification URL's
/// host, then `AWS_REGION`/`AWS_DEFAULT_REGION`, then `us-east-1`. The
/// verification URL is preferred over the ambient environment because it is
/// authoritative about which regional endpoint will validate the signature.
///
/// Never fails: some region is always produced.
pub fn resolve_region(ctx: &Context, explicit: Option<&str>, verification_url: &str) -> String {
    if let Some(region) = explicit.filter(|r| !r.is_empty()) {
        return region.to_string();
    }

    if let Some(region) = infer_region_from_url(verification_url) {
        return region;
    }

    for key in [AWS_REGION, AWS_DEFAULT_REGION] {
        if let Some(region) = ctx.env_var(key).filter(|r| !r.is_empty()) {
            return region;
        }
    }

    DEFAULT_AWS_REGION.to_string()
}

/// Extract the region from hosts like `sts.us-east-1.amazonaws.com`.
///
/// Returns `None` when the host doesn't match, including when the URL still
/// carries the `{region}` placeholder.
fn infer_region_from_url(url: &str) -> Option<String> {
    let host = host_of(url)?;
    let region = host.strip_prefix("sts.")?.strip_suffix(".amazonaws.com")?;

    if region.is_empty()
        || !region
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
    {
        return None;
    }

    Some(region.to_string())
}

// http::Uri rejects the `{region}` placeholder outright, so take the host out
// by hand.
fn host_of(url: &str) -> Option<&str> {
    let rest = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
    let authority = rest.split(['/', '?', '#']).next()?;
    let host = authority.rsplit_once('@').map(|(_, h)| h).unwrap_or(authority);
    let host = host.split(':').next()?;
    (!host.is_empty()).then_some(host)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tokex_core::{Context, StaticEnv};

    const VERIFY_URL: &str =
        "https://sts.{region}.amazonaws.com/?Action=GetCallerIdentity&Version=2011-06-15";
    const VERIFY_URL_REGIONAL: &str =
        "https://sts.eu-west-2.amazonaws.com/?Action=GetCallerIdentity&Version=2011-06-15";

    fn ctx_with_envs(envs: &[(&str, &str)]) -> Context {
        Context::new().with_env(StaticEnv {
            envs: envs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        })
    }

    #[test]
    fn test_explicit_region_wins() {
        let ctx = ctx_with_envs(&[(AWS_REGION, "ap-south-1")]);
        assert_eq!(
            resolve_region(&ctx, Some("us-west-2"), VERIFY_URL_REGIONAL),
            "us-west-2"
        );
    }

    #[test]
    fn test_empty_explicit_region_falls_through() {
        let ctx = ctx_with_envs(&[]);
        assert_eq!(
            resolve_region(&ctx, Some(""), VERIFY_URL_REGIONAL),
            "eu-west-2"
        );
    }

    #[test]
    fn test_url_inference_beats_env() {
        let ctx = ctx_with_envs(&[(AWS_REGION, "ap-south-1")]);
        assert_eq!(resolve_region(&ctx, None, VERIFY_URL_REGIONAL), "eu-west-2");
    }

    #[test]
    fn test_env_fallback_order() {
        let ctx = ctx_with_envs(&[
            (AWS_REGION, "ap-south-1"),
            (AWS_DEFAULT_REGION, "ca-central-1"),
        ]);
        assert_eq!(resolve_region(&ctx, None, VERIFY_URL), "ap-south-1");

        let ctx = ctx_with_envs(&[(AWS_DEFAULT_REGION, "ca-central-1")]);
        assert_eq!(resolve_region(&ctx, None, VERIFY_URL), "ca-central-1");
    }

    #[test]
    fn test_literal_fallback() {
        let ctx = ctx_with_envs(&[]);
        assert_eq!(resolve_region(&ctx, None, VERIFY_URL), "us-east-1");
    }

    #[test]
    fn test_infer_region_from_url() {
        let cases = vec![
            ("https://sts.us-east-1.amazonaws.com/", Some("us-east-1")),
            (
                "https://sts.eu-west-2.amazonaws.com/?Action=GetCallerIdentity",
                Some("eu-west-2"),
            ),
            // Placeholder not yet substituted.
            ("https://sts.{region}.amazonaws.com/", None),
            // Not an STS host.
            ("https://iam.us-east-1.amazonaws.com/", None),
            ("https://sts.amazonaws.com/", None),
            ("https://sts..amazonaws.com/", None),
            ("https://sts.US-EAST-1.amazonaws.com/", None),
        ];

        for (url, expected) in cases {
            assert_eq!(
                infer_region_from_url(url).as_deref(),
                expected,
                "url: {url}"
            );
        }
    }
}
