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

use crate::canonical::CanonicalRequest;
use crate::constants::{AWS4_REQUEST, SIGV4_ALGORITHM};
use log::debug;
use tokeks_core::hash::{hex_hmac_sha256, hex_sha256, hmac_sha256};
use tokeks_core::time::{format_date, format_iso8601, DateTime};

/// RequestSigner that implement AWS SigV4.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
///
/// Every method takes the signing time explicitly. Callers capture the
/// clock once and pass the same instant to the scope, the string to sign
/// and the signing key.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    service: String,
    region: String,
}

impl RequestSigner {
    /// Create a new signer for the given service and region.
    pub fn new(service: &str, region: &str) -> Self {
        Self {
            service: service.into(),
            region: region.into(),
        }
    }

    /// Scope: "20220313/<region>/<service>/aws4_request"
    pub fn scope(&self, now: DateTime) -> String {
        format!(
            "{}/{}/{}/{AWS4_REQUEST}",
            format_date(now),
            self.region,
            self.service
        )
    }

    /// Build the string to sign of a canonical request.
    ///
    /// ```text
    /// AWS4-HMAC-SHA256
    /// 20220313T072004Z
    /// 20220313/<region>/<service>/aws4_request
    /// <hashed_canonical_request>
    /// ```
    pub fn string_to_sign(&self, now: DateTime, creq: &CanonicalRequest<'_>) -> String {
        // Canonical request may carry a session token.
        let encoded_req = hex_sha256(creq.to_string().as_bytes());
        debug!("calculated canonical request hash: {encoded_req}");

        let scope = self.scope(now);
        debug!("calculated scope: {scope}");

        format!(
            "{SIGV4_ALGORITHM}\n{}\n{scope}\n{encoded_req}",
            format_iso8601(now)
        )
    }

    /// Calculate the lowercase hex signature of a canonical request.
    pub fn sign(&self, secret: &str, now: DateTime, creq: &CanonicalRequest<'_>) -> String {
        let string_to_sign = self.string_to_sign(now, creq);
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key = generate_signing_key(secret, now, &self.region, &self.service);
        hex_hmac_sha256(&signing_key, string_to_sign.as_bytes())
    }
}

/// Derive the SigV4 signing key.
///
/// Every step keys the next HMAC with the raw bytes of the previous one.
pub fn generate_signing_key(secret: &str, time: DateTime, region: &str, service: &str) -> Vec<u8> {
    // Sign secret
    let secret = format!("AWS4{secret}");
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), format_date(time).as_bytes());
    // Sign region
    let sign_region = hmac_sha256(sign_date.as_slice(), region.as_bytes());
    // Sign service
    let sign_service = hmac_sha256(sign_region.as_slice(), service.as_bytes());
    // Sign request
    hmac_sha256(sign_service.as_slice(), AWS4_REQUEST.as_bytes())
}
