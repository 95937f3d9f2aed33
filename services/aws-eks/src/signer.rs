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
use crate::config::{Config, SigningContext};
use crate::constants::*;
use crate::exec_credential::ExecCredential;
use crate::presign::{presign_url, PresignedUrl};
use crate::sign_request::RequestSigner;
use crate::token::{decode_token, encode_token};
use crate::Credential;
use chrono::TimeDelta;
use log::debug;
use std::time::Duration;
use tokeks_core::time::{format_date, now, DateTime};
use tokeks_core::{Error, Result, SigningCredential};

/// Issue a token for `cluster_id` in `region`.
///
/// Shortcut for [`TokenSigner::new`] followed by [`TokenSigner::get_token`].
/// `token_expiry_seconds` defaults to 60.
///
/// ```
/// use tokeks_aws_eks::{get_token, Credential};
///
/// let cred = Credential::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY");
/// let token = get_token(cred, "us-west-2", "my-cluster", None)?;
/// assert!(token.starts_with("k8s-aws-v1."));
/// # Ok::<(), tokeks_core::Error>(())
/// ```
pub fn get_token(
    credential: Credential,
    region: &str,
    cluster_id: &str,
    token_expiry_seconds: Option<u64>,
) -> Result<String> {
    let cfg = Config::new(region, cluster_id)
        .with_token_expiry_seconds(token_expiry_seconds.unwrap_or(DEFAULT_TOKEN_EXPIRY_SECS));
    Ok(TokenSigner::new(credential, &cfg)?.get_token())
}

/// TokenSigner issues EKS bearer tokens for one credential and cluster.
///
/// Everything is validated in [`TokenSigner::new`], so issuing a token can
/// not fail. The signer is immutable and can be shared between threads.
#[derive(Debug, Clone)]
pub struct TokenSigner {
    credential: Credential,
    ctx: SigningContext,
}

impl TokenSigner {
    /// Create a new signer.
    ///
    /// Fails with `CredentialInvalid` for an empty access key, secret key or
    /// session token, and with `ConfigInvalid` for an unusable config.
    pub fn new(credential: Credential, cfg: &Config) -> Result<Self> {
        if !credential.is_valid() {
            return Err(Error::credential_invalid(
                "access_key_id and secret_access_key must not be empty",
            ));
        }
        let ctx = SigningContext::from_config(cfg)?;

        Ok(Self { credential, ctx })
    }

    /// The validated signing context.
    pub fn context(&self) -> &SigningContext {
        &self.ctx
    }

    /// Issue a token signed at the current time.
    pub fn get_token(&self) -> String {
        self.get_token_at(now())
    }

    /// Issue a token signed at `now`.
    ///
    /// Output is fully determined by the signer and `now`.
    pub fn get_token_at(&self, now: DateTime) -> String {
        encode_token(&self.presigned_url_at(now))
    }

    /// Build the presigned url signed at `now`, before token encoding.
    pub fn presigned_url_at(&self, now: DateTime) -> String {
        debug!(
            "presigning {STS_ACTION} for cluster {} in {}",
            self.ctx.cluster_id(),
            self.ctx.region()
        );
        presign_url(&self.credential, &self.ctx, now)
    }

    /// Issue a token signed at the current time, wrapped as an `ExecCredential`.
    pub fn exec_credential(&self) -> Result<ExecCredential> {
        self.exec_credential_at(now())
    }

    /// Issue a token signed at `now`, wrapped as an `ExecCredential` that
    /// expires together with the presigned url.
    ///
    /// Fails with `Unexpected` if the expiration is not representable.
    pub fn exec_credential_at(&self, now: DateTime) -> Result<ExecCredential> {
        let expiration = expires_at(now, self.ctx.expires_in()).ok_or_else(|| {
            Error::unexpected(format!("token expiration after {now} is out of range"))
        })?;

        Ok(ExecCredential::new(self.get_token_at(now), expiration))
    }

    /// Verify a token against this signer at the current time.
    pub fn verify(&self, token: &str) -> Result<PresignedUrl> {
        self.verify_at(token, now())
    }

    /// Verify a token against this signer at `now`.
    ///
    /// The signature is recomputed from the decoded url, this signer's secret
    /// and cluster id, and the `X-Amz-Date` embedded in the url.
    pub fn verify_at(&self, token: &str, now: DateTime) -> Result<PresignedUrl> {
        let url = PresignedUrl::parse(&decode_token(token)?)?;

        if url.host() != self.ctx.host() {
            return Err(Error::request_invalid(format!(
                "token is for host {}, expected {}",
                url.host(),
                self.ctx.host()
            )));
        }
        if url.param(ACTION) != Some(STS_ACTION) || url.param(VERSION) != Some(STS_VERSION) {
            return Err(Error::request_invalid(format!(
                "token does not carry {STS_ACTION} {STS_VERSION}"
            )));
        }
        if url.param(X_AMZ_ALGORITHM) != Some(SIGV4_ALGORITHM) {
            return Err(Error::request_invalid(format!(
                "token is not signed with {SIGV4_ALGORITHM}"
            )));
        }

        let signed_at = url.date()?;
        let scope = url.credential_scope()?;
        if scope.access_key_id != self.credential.access_key_id {
            return Err(Error::request_invalid(
                "token is signed by a different access key",
            ));
        }
        if scope.date != format_date(signed_at)
            || scope.region != self.ctx.region()
            || scope.service != STS_SERVICE
        {
            return Err(Error::request_invalid(
                "token credential scope does not match its signing date, region or service",
            ));
        }

        if url.param(X_AMZ_SECURITY_TOKEN) != self.credential.session_token.as_deref() {
            return Err(Error::request_invalid(
                "token session token does not match this credential",
            ));
        }

        let headers =
            CanonicalHeaders::new([(HOST, url.host()), (X_K8S_AWS_ID, self.ctx.cluster_id())]);
        if url.signed_headers()? != headers.signed_headers() {
            return Err(Error::request_invalid(format!(
                "token must sign exactly {}",
                headers.signed_headers()
            )));
        }

        let unsigned = url.unsigned_url();
        let creq = CanonicalRequest::from_url(STS_METHOD, STS_PATH, &unsigned, &headers);
        let expected = RequestSigner::new(STS_SERVICE, self.ctx.region()).sign(
            &self.credential.secret_access_key,
            signed_at,
            &creq,
        );
        if url.signature()? != expected {
            return Err(Error::request_invalid("token signature mismatch"));
        }

        let expires_in = url.expires_in()?;
        let expiration = expires_at(signed_at, expires_in).ok_or_else(|| {
            Error::request_invalid(format!("{X_AMZ_EXPIRES} is out of range"))
        })?;
        if now > expiration {
            return Err(Error::credential_expired(format!(
                "token signed at {signed_at} has expired"
            )));
        }

        Ok(url)
    }
}

fn expires_at(signed_at: DateTime, expires_in: Duration) -> Option<DateTime> {
    let secs = i64::try_from(expires_in.as_secs()).ok()?;
    signed_at.checked_add_signed(TimeDelta::try_seconds(secs)?)
}
