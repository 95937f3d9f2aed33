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

// Token format.
/// Prefix of every EKS bearer token.
pub const TOKEN_PREFIX: &str = "k8s-aws-v1.";
/// Lifetime of a presigned url when none is configured.
pub const DEFAULT_TOKEN_EXPIRY_SECS: u64 = 60;
/// Longest lifetime SigV4 accepts for a presigned URL (7 days).
pub const MAX_TOKEN_EXPIRY_SECS: u64 = 604_800;

// STS request shape.
pub const STS_SERVICE: &str = "sts";
pub const STS_METHOD: &str = "GET";
pub const STS_PATH: &str = "/";
pub const STS_HOST_SUFFIX: &str = "amazonaws.com";
pub const STS_ACTION: &str = "GetCallerIdentity";
pub const STS_VERSION: &str = "2011-06-15";

// SigV4.
pub const SIGV4_ALGORITHM: &str = "AWS4-HMAC-SHA256";
pub const AWS4_REQUEST: &str = "aws4_request";

// Headers bound into the signature.
pub const HOST: &str = "host";
pub const X_K8S_AWS_ID: &str = "x-k8s-aws-id";

// Query parameters used in presigned urls.
pub const ACTION: &str = "Action";
pub const VERSION: &str = "Version";
pub const X_AMZ_ALGORITHM: &str = "X-Amz-Algorithm";
pub const X_AMZ_CREDENTIAL: &str = "X-Amz-Credential";
pub const X_AMZ_DATE: &str = "X-Amz-Date";
pub const X_AMZ_EXPIRES: &str = "X-Amz-Expires";
pub const X_AMZ_SIGNED_HEADERS: &str = "X-Amz-SignedHeaders";
pub const X_AMZ_SECURITY_TOKEN: &str = "X-Amz-Security-Token";
pub const X_AMZ_SIGNATURE: &str = "X-Amz-Signature";

// Kubernetes client authentication.
pub const EXEC_CREDENTIAL_KIND: &str = "ExecCredential";
pub const EXEC_CREDENTIAL_API_VERSION: &str = "client.authentication.k8s.io/v1beta1";

/// AsciiSet for [AWS UriEncode](https://docs.aws.amazon.com/AmazonS3/latest/API/sig-v4-header-based-auth.html)
///
/// URI encode every byte except the unreserved characters: 'A'-'Z', 'a'-'z', '0'-'9', '-', '.', '_', and '~'.
/// `/` is encoded too, as required for query keys and values.
pub static AWS_QUERY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
