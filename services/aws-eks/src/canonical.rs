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

//! Canonical forms of a request as defined by
//! [Create a canonical request](https://docs.aws.amazon.com/IAM/latest/UserGuide/create-signed-request.html#create-canonical-request).

use crate::constants::AWS_QUERY_ENCODE_SET;
use percent_encoding::utf8_percent_encode;
use std::fmt::{Display, Formatter};
use tokeks_core::hash::hex_sha256;

/// Build the canonical query string of an already rendered url.
///
/// Keys and values are taken verbatim: they were escaped when the url was
/// rendered and must not be escaped twice. Pairs are sorted by key, then by
/// value.
pub fn canonical_query_from_url(url: &str) -> String {
    let Some((_, query)) = url.split_once('?') else {
        return String::new();
    };
    let query = query.split_once('#').map_or(query, |(q, _)| q);

    let mut pairs: Vec<(&str, &str)> = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .collect();
    pairs.sort_unstable();

    join_pairs(&pairs)
}

/// Build the canonical query string of raw parameters.
///
/// Keys and values are percent encoded with [`AWS_QUERY_ENCODE_SET`] first,
/// then sorted by encoded key, then by encoded value.
pub fn canonical_query_from_params<K, V>(params: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut pairs: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| {
            (
                utf8_percent_encode(k.as_ref(), &AWS_QUERY_ENCODE_SET).to_string(),
                utf8_percent_encode(v.as_ref(), &AWS_QUERY_ENCODE_SET).to_string(),
            )
        })
        .collect();
    pairs.sort_unstable();

    join_pairs(&pairs)
}

fn join_pairs<K: AsRef<str>, V: AsRef<str>>(pairs: &[(K, V)]) -> String {
    let mut s = String::new();
    for (i, (k, v)) in pairs.iter().enumerate() {
        if i > 0 {
            s.push('&');
        }
        s.push_str(k.as_ref());
        s.push('=');
        s.push_str(v.as_ref());
    }
    s
}

/// Hex encoded SHA256 of the empty payload every presigned `GET` carries.
pub fn empty_payload_hash() -> String {
    hex_sha256(b"")
}

/// Headers in canonical form: lowercase names, trimmed values, sorted by name.
///
/// Repeated names are merged into one entry with values joined by `,` in
/// the order they were given.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CanonicalHeaders(Vec<(String, String)>);

impl CanonicalHeaders {
    /// Canonicalize the given header pairs.
    pub fn new<I, K, V>(headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut pairs: Vec<(String, String)> = headers
            .into_iter()
            .map(|(k, v)| {
                (
                    k.as_ref().trim().to_ascii_lowercase(),
                    v.as_ref().trim().to_string(),
                )
            })
            .collect();
        // Stable, so repeated names keep their original value order.
        pairs.sort_by(|l, r| l.0.cmp(&r.0));

        let mut merged: Vec<(String, String)> = Vec::with_capacity(pairs.len());
        for (name, value) in pairs {
            if let Some((last, values)) = merged.last_mut() {
                if *last == name {
                    values.push(',');
                    values.push_str(&value);
                    continue;
                }
            }
            merged.push((name, value));
        }

        CanonicalHeaders(merged)
    }

    /// Signed header list: `host;x-k8s-aws-id`
    pub fn signed_headers(&self) -> String {
        self.0
            .iter()
            .map(|(k, _)| k.as_str())
            .collect::<Vec<_>>()
            .join(";")
    }

    /// Value of the given lowercase header name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

impl Display for CanonicalHeaders {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (name, value) in &self.0 {
            writeln!(f, "{name}:{value}")?;
        }
        Ok(())
    }
}

/// CanonicalRequest is the normalized text of a request that gets hashed
/// into the string to sign.
///
/// ```text
/// GET
/// /
/// Action=GetCallerIdentity&Version=2011-06-15&X-Amz-Algorithm=...
/// host:sts.us-west-2.amazonaws.com
/// x-k8s-aws-id:my-cluster
///
/// host;x-k8s-aws-id
/// e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855
/// ```
#[derive(Clone, Debug)]
pub struct CanonicalRequest<'a> {
    method: &'a str,
    path: &'a str,
    query: String,
    headers: &'a CanonicalHeaders,
    payload_hash: String,
}

impl<'a> CanonicalRequest<'a> {
    /// Build the canonical request of a body-less request against `url`.
    ///
    /// The query is read from `url` as is, see [`canonical_query_from_url`].
    pub fn from_url(
        method: &'a str,
        path: &'a str,
        url: &str,
        headers: &'a CanonicalHeaders,
    ) -> Self {
        Self {
            method,
            path,
            query: canonical_query_from_url(url),
            headers,
            payload_hash: empty_payload_hash(),
        }
    }
}

impl Display for CanonicalRequest<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.method)?;
        writeln!(f, "{}", self.path)?;
        writeln!(f, "{}", self.query)?;
        // The header block ends with its own newline, followed by the separator.
        writeln!(f, "{}", self.headers)?;
        writeln!(f, "{}", self.headers.signed_headers())?;
        write!(f, "{}", self.payload_hash)
    }
}
