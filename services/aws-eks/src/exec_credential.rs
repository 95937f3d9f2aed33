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

//! `ExecCredential` document printed by kubeconfig exec plugins.
//!
//! See [client-go credential plugins](https://kubernetes.io/docs/reference/access-authn-authz/authentication/#client-go-credential-plugins).

use crate::constants::{EXEC_CREDENTIAL_API_VERSION, EXEC_CREDENTIAL_KIND};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};
use tokeks_core::time::{format_rfc3339, DateTime};
use tokeks_core::utils::Redact;
use tokeks_core::{Error, Result};

/// ExecCredential carries a token to the Kubernetes client.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecCredential {
    /// Always `ExecCredential`.
    pub kind: String,
    /// Always `client.authentication.k8s.io/v1beta1`.
    pub api_version: String,
    /// Empty for token credentials.
    pub spec: ExecCredentialSpec,
    /// The token and when it stops being accepted.
    pub status: ExecCredentialStatus,
}

/// Spec of an [`ExecCredential`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecCredentialSpec {}

/// Status of an [`ExecCredential`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecCredentialStatus {
    /// RFC 3339 instant after which the token is no longer accepted.
    pub expiration_timestamp: String,
    /// Bearer token.
    pub token: String,
}

impl ExecCredential {
    /// Wrap a token that expires at `expiration`.
    pub fn new(token: String, expiration: DateTime) -> Self {
        Self {
            kind: EXEC_CREDENTIAL_KIND.to_string(),
            api_version: EXEC_CREDENTIAL_API_VERSION.to_string(),
            spec: ExecCredentialSpec::default(),
            status: ExecCredentialStatus {
                expiration_timestamp: format_rfc3339(expiration),
                token,
            },
        }
    }

    /// Render as the JSON document kubectl reads from the plugin's stdout.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| Error::unexpected("serialize exec credential failed").with_source(e))
    }
}

impl Debug for ExecCredential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecCredential")
            .field("kind", &self.kind)
            .field("api_version", &self.api_version)
            .field("spec", &self.spec)
            .field("status", &self.status)
            .finish()
    }
}

impl Debug for ExecCredentialStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecCredentialStatus")
            .field("expiration_timestamp", &self.expiration_timestamp)
            .field("token", &Redact::from(&self.token))
            .finish()
    }
}
