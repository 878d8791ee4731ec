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

use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

// Headers used in the signed GetCallerIdentity descriptor.
pub const X_AMZ_DATE: &str = "x-amz-date";
pub const X_AMZ_SECURITY_TOKEN: &str = "x-amz-security-token";

// Header that binds the signed request to the federation audience.
pub const X_GOOG_CLOUD_TARGET_RESOURCE: &str = "x-goog-cloud-target-resource";

// Env values used to resolve AWS credentials and region.
pub const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
pub const AWS_SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";
pub const AWS_REGION: &str = "AWS_REGION";
pub const AWS_DEFAULT_REGION: &str = "AWS_DEFAULT_REGION";

// Region used when nothing else resolves one.
pub const DEFAULT_AWS_REGION: &str = "us-east-1";

// The credential file type this crate understands.
pub const EXTERNAL_ACCOUNT_TYPE: &str = "external_account";

// OAuth2 token exchange constants per RFC 8693.
pub const TOKEN_EXCHANGE_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:token-exchange";
pub const ACCESS_TOKEN_REQUEST_TYPE: &str = "urn:ietf:params:oauth:token-type:access_token";

// Default OAuth2 scope for Google Cloud services.
pub const DEFAULT_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

// Universe domain used when the config doesn't carry one.
pub const DEFAULT_UNIVERSE_DOMAIN: &str = "googleapis.com";

// Lifetime requested for impersonated tokens, 1 hour.
pub const DEFAULT_EXPIRY_SECONDS: u64 = 3600;

// Project lookup endpoint, templated with the universe domain and the
// project number.
pub const CLOUD_RESOURCE_MANAGER_URL: &str =
    "https://cloudresourcemanager.{universe_domain}/v1/projects/{project_number}";

/// AsciiSet for [AWS UriEncode](https://docs.aws.amazon.com/AmazonS3/latest/API/sig-v4-header-based-auth.html)
///
/// - URI encode every byte except the unreserved characters: 'A'-'Z', 'a'-'z', '0'-'9', '-', '.', '_', and '~'.
pub static AWS_URI_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// AsciiSet for [AWS UriEncode](https://docs.aws.amazon.com/AmazonS3/latest/API/sig-v4-header-based-auth.html)
///
/// But used in query.
pub static AWS_QUERY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// AsciiSet used to URL-encode the serialized subject token envelope.
pub static SUBJECT_TOKEN_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
