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

use crate::canonical::{CanonicalHeaders, CanonicalRequest};
use crate::config::SigningContext;
use crate::constants::*;
use crate::sign_request::RequestSigner;
use crate::Credential;
use http::Uri;
use percent_encoding::utf8_percent_encode;
use std::time::Duration;
use tokeks_core::time::{format_iso8601, parse_iso8601, DateTime};
use tokeks_core::{Error, Result};

/// Build the presigned `sts:GetCallerIdentity` url.
///
/// The SigV4 parameters are rendered into the url first, the url is signed
/// as rendered, and only then `X-Amz-Signature` is appended.
pub fn presign_url(cred: &Credential, ctx: &SigningContext, now: DateTime) -> String {
    let signer = RequestSigner::new(STS_SERVICE, ctx.region());
    let headers = CanonicalHeaders::new([(HOST, ctx.host()), (X_K8S_AWS_ID, ctx.cluster_id())]);

    let mut query: Vec<(&str, String)> = vec![
        (X_AMZ_ALGORITHM, SIGV4_ALGORITHM.to_string()),
        (
            X_AMZ_CREDENTIAL,
            format!("{}/{}", cred.access_key_id, signer.scope(now)),
        ),
        (X_AMZ_DATE, format_iso8601(now)),
        (X_AMZ_EXPIRES, ctx.expires_in().as_secs().to_string()),
        (X_AMZ_SIGNED_HEADERS, headers.signed_headers()),
    ];
    if let Some(token) = &cred.session_token {
        query.push((X_AMZ_SECURITY_TOKEN, token.clone()));
    }

    let unsigned = render_url(ctx.base_url(), &query);
    let creq = CanonicalRequest::from_url(STS_METHOD, STS_PATH, &unsigned, &headers);
    let signature = signer.sign(&cred.secret_access_key, now, &creq);

    query.push((X_AMZ_SIGNATURE, signature));
    render_url(ctx.base_url(), &query)
}

/// Append query pairs to a base url that already has a query.
///
/// Pairs are encoded with [`AWS_QUERY_ENCODE_SET`], so the rendered query is
/// already in canonical form and is signed verbatim.
fn render_url(base_url: &str, query: &[(&str, String)]) -> String {
    let mut url = base_url.to_string();
    for (k, v) in query {
        url.push('&');
        url.extend(utf8_percent_encode(k, &AWS_QUERY_ENCODE_SET));
        url.push('=');
        url.extend(utf8_percent_encode(v, &AWS_QUERY_ENCODE_SET));
    }
    url
}

/// The parts of `X-Amz-Credential`: `<access_key_id>/<date>/<region>/<service>/aws4_request`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CredentialScope {
    /// Access key id that signed the url.
    pub access_key_id: String,
    /// Signing date: `20220313`
    pub date: String,
    /// Signing region.
    pub region: String,
    /// Signing service.
    pub service: String,
}

/// PresignedUrl is a parsed presigned STS url, as carried by a token.
#[derive(Clone, Debug)]
pub struct PresignedUrl {
    url: String,
    host: String,
    /// Raw, still escaped, query pairs in url order.
    raw_query: Vec<(String, String)>,
    /// Decoded query pairs in url order.
    query: Vec<(String, String)>,
}

impl PresignedUrl {
    /// Parse a presigned url.
    ///
    /// Only the shape is checked here: an https url with a host, path `/`
    /// and a query. The signature is checked by `TokenSigner::verify`.
    pub fn parse(url: &str) -> Result<Self> {
        let uri: Uri = url.parse()?;

        if uri.scheme_str() != Some("https") {
            return Err(Error::request_invalid("presigned url must use https"));
        }
        let host = uri
            .host()
            .ok_or_else(|| Error::request_invalid("presigned url without host"))?
            .to_string();
        if uri.path() != STS_PATH {
            return Err(Error::request_invalid(format!(
                "presigned url must have path {STS_PATH}, got {}",
                uri.path()
            )));
        }
        let query = uri
            .query()
            .ok_or_else(|| Error::request_invalid("presigned url without query"))?;

        let raw_query = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
                (k.to_string(), v.to_string())
            })
            .collect();
        let query = form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        Ok(Self {
            url: url.to_string(),
            host,
            raw_query,
            query,
        })
    }

    /// The url as text.
    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// Host of the url.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Decoded query parameter names in the order they appear.
    pub fn param_names(&self) -> Vec<&str> {
        self.query.iter().map(|(k, _)| k.as_str()).collect()
    }

    /// Decoded value of the first query parameter named `key`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn required_param(&self, key: &str) -> Result<&str> {
        self.param(key)
            .ok_or_else(|| Error::request_invalid(format!("presigned url without {key}")))
    }

    /// `X-Amz-Signature`
    pub fn signature(&self) -> Result<&str> {
        self.required_param(X_AMZ_SIGNATURE)
    }

    /// `X-Amz-Date`, parsed.
    pub fn date(&self) -> Result<DateTime> {
        parse_iso8601(self.required_param(X_AMZ_DATE)?)
    }

    /// `X-Amz-Expires`, parsed.
    pub fn expires_in(&self) -> Result<Duration> {
        let v = self.required_param(X_AMZ_EXPIRES)?;
        let secs: u64 = v.parse().map_err(|e| {
            Error::request_invalid(format!("{X_AMZ_EXPIRES} {v} is not an integer")).with_source(e)
        })?;
        Ok(Duration::from_secs(secs))
    }

    /// `X-Amz-SignedHeaders`
    pub fn signed_headers(&self) -> Result<&str> {
        self.required_param(X_AMZ_SIGNED_HEADERS)
    }

    /// `X-Amz-Credential`, split into its parts.
    pub fn credential_scope(&self) -> Result<CredentialScope> {
        let v = self.required_param(X_AMZ_CREDENTIAL)?;
        let parts: Vec<&str> = v.split('/').collect();
        match parts.as_slice() {
            [access_key_id, date, region, service, terminator]
                if *terminator == AWS4_REQUEST && !access_key_id.is_empty() =>
            {
                Ok(CredentialScope {
                    access_key_id: access_key_id.to_string(),
                    date: date.to_string(),
                    region: region.to_string(),
                    service: service.to_string(),
                })
            }
            _ => Err(Error::request_invalid(format!(
                "{X_AMZ_CREDENTIAL} is malformed"
            ))),
        }
    }

    /// The url exactly as it was before `X-Amz-Signature` was appended.
    pub fn unsigned_url(&self) -> String {
        let base = self
            .url
            .split_once('?')
            .map_or(self.url.as_str(), |(base, _)| base);
        let query = self
            .raw_query
            .iter()
            .filter(|(k, _)| k != X_AMZ_SIGNATURE)
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");

        format!("{base}?{query}")
    }
}
