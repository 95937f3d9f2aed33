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

use crate::constants::*;
use serde::Deserialize;
use std::time::Duration;
use tokeks_core::{Error, Result};

/// Config for EKS token signing.
///
/// `Config` is plain data: callers fill it from flags, a kubeconfig exec
/// block or any serde format. Nothing is read from the environment here.
///
/// ```
/// use tokeks_aws_eks::Config;
///
/// let cfg = Config::new("us-west-2", "my-cluster").with_token_expiry_seconds(900);
/// assert_eq!(cfg.token_expiry_seconds, 900);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Region of the STS endpoint, for example `us-west-2`.
    pub region: String,
    /// Name or id of the EKS cluster, bound into the signature via `x-k8s-aws-id`.
    pub cluster_id: String,
    /// Lifetime of the presigned url in seconds, within `1..=604800`.
    ///
    /// `0` is rejected rather than treated as the default of 60.
    pub token_expiry_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region: String::new(),
            cluster_id: String::new(),
            token_expiry_seconds: DEFAULT_TOKEN_EXPIRY_SECS,
        }
    }
}

impl Config {
    /// Create a config with the default token expiry.
    pub fn new(region: impl Into<String>, cluster_id: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            cluster_id: cluster_id.into(),
            ..Default::default()
        }
    }

    /// Set the lifetime of the presigned url.
    pub fn with_token_expiry_seconds(mut self, secs: u64) -> Self {
        self.token_expiry_seconds = secs;
        self
    }
}

/// SigningContext is the validated, immutable form of [`Config`].
///
/// Host and base url are derived exactly once, here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SigningContext {
    region: String,
    cluster_id: String,
    expires_in: Duration,
    host: String,
    base_url: String,
}

impl SigningContext {
    /// Validate the config and derive the STS host and base url.
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let region = cfg.region.trim();
        if region.is_empty() {
            return Err(Error::config_invalid("region must not be empty"));
        }
        if !region
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-')
        {
            return Err(Error::config_invalid(format!(
                "region {region} is not a valid hostname label"
            )));
        }

        let cluster_id = cfg.cluster_id.trim();
        if cluster_id.is_empty() {
            return Err(Error::config_invalid("cluster_id must not be empty"));
        }
        if cluster_id.chars().any(|c| c.is_ascii_control()) {
            return Err(Error::config_invalid(
                "cluster_id must not contain control characters",
            ));
        }

        if cfg.token_expiry_seconds == 0 || cfg.token_expiry_seconds > MAX_TOKEN_EXPIRY_SECS {
            return Err(Error::config_invalid(format!(
                "token_expiry_seconds must be within 1..={MAX_TOKEN_EXPIRY_SECS}, got {}",
                cfg.token_expiry_seconds
            )));
        }

        let host = format!("{STS_SERVICE}.{region}.{STS_HOST_SUFFIX}");
        let base_url =
            format!("https://{host}{STS_PATH}?{ACTION}={STS_ACTION}&{VERSION}={STS_VERSION}");

        Ok(Self {
            region: region.to_string(),
            cluster_id: cluster_id.to_string(),
            expires_in: Duration::from_secs(cfg.token_expiry_seconds),
            host,
            base_url,
        })
    }

    /// Region of the STS endpoint.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Cluster id bound into every signature.
    pub fn cluster_id(&self) -> &str {
        &self.cluster_id
    }

    /// Lifetime of every presigned url.
    pub fn expires_in(&self) -> Duration {
        self.expires_in
    }

    /// `sts.{region}.amazonaws.com`
    pub fn host(&self) -> &str {
        &self.host
    }

    /// `https://{host}/?Action=GetCallerIdentity&Version=2011-06-15`
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
