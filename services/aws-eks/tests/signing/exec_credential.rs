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

use super::*;
use anyhow::Result;
use pretty_assertions::assert_eq;
use chrono::TimeDelta;
use tokeks_aws_eks::ExecCredential;
use tokeks_core::time::parse_rfc3339;

#[test]
fn test_exec_credential_carries_token() -> Result<()> {
    let signer = init_signer(CLUSTER_ID, None);
    let cred = signer.exec_credential_at(signing_time())?;

    assert_eq!(cred.kind, "ExecCredential");
    assert_eq!(cred.api_version, "client.authentication.k8s.io/v1beta1");
    assert_eq!(cred.status.expiration_timestamp, "2021-01-01T00:01:00Z");
    assert_eq!(
        parse_rfc3339(&cred.status.expiration_timestamp)?,
        signing_time() + TimeDelta::seconds(60)
    );
    signer.verify_at(&cred.status.token, signing_time())?;
    Ok(())
}

#[test]
fn test_exec_credential_json() -> Result<()> {
    let cred = init_signer(CLUSTER_ID, Some(900)).exec_credential_at(signing_time())?;
    let json = cred.to_json()?;

    let value: serde_json::Value = serde_json::from_str(&json)?;
    assert_eq!(value["status"]["expirationTimestamp"], "2021-01-01T00:15:00Z");
    assert_eq!(value["spec"], serde_json::json!({}));

    let parsed: ExecCredential = serde_json::from_str(&json)?;
    assert_eq!(parsed, cred);
    Ok(())
}
