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

use crate::constants::TOKEN_PREFIX;
use tokeks_core::hash::{base64_url_decode, base64_url_encode};
use tokeks_core::{Error, Result};

/// Encode a presigned url into a bearer token: `k8s-aws-v1.<base64url>`.
///
/// Every `=` is removed from the encoded text, not only trailing ones.
pub fn encode_token(presigned_url: &str) -> String {
    let encoded = base64_url_encode(presigned_url.as_bytes()).replace('=', "");
    format!("{TOKEN_PREFIX}{encoded}")
}

/// Decode a bearer token back into the presigned url it carries.
pub fn decode_token(token: &str) -> Result<String> {
    let payload = token
        .strip_prefix(TOKEN_PREFIX)
        .ok_or_else(|| Error::request_invalid(format!("token must start with {TOKEN_PREFIX}")))?;
    if payload.is_empty() {
        return Err(Error::request_invalid("token without payload"));
    }
    if !payload
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    {
        return Err(Error::request_invalid(
            "token payload must be unpadded base64url",
        ));
    }

    let mut padded = payload.to_string();
    while padded.len() % 4 != 0 {
        padded.push('=');
    }

    Ok(String::from_utf8(base64_url_decode(&padded)?)?)
}
