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
use chrono::TimeDelta;
use pretty_assertions::assert_eq;
use tokeks_aws_eks::{decode_token, encode_token};
use tokeks_core::ErrorKind;

#[test]
fn test_verify_issued_token() -> Result<()> {
    let signer = init_signer(CLUSTER_ID, None);
    let token = signer.get_token_at(signing_time());

    let url = signer.verify_at(&token, signing_time() + TimeDelta::seconds(59))?;
    assert_eq!(url.host(), "sts.us-west-2.amazonaws.com");
    assert_eq!(url.credential_scope()?.access_key_id, ACCESS_KEY_ID);
    Ok(())
}

#[test]
fn test_verify_rejects_token_for_other_cluster() {
    let token = init_signer("other-cluster", None).get_token_at(signing_time());
    let err = init_signer(CLUSTER_ID, None)
        .verify_at(&token, signing_time())
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RequestInvalid);
}

#[test]
fn test_verify_rejects_tampered_signature() -> Result<()> {
    let signer = init_signer(CLUSTER_ID, None);
    let url = decode_token(&signer.get_token_at(signing_time()))?;
    let url = url.replace("X-Amz-Signature=2", "X-Amz-Signature=3");

    let err = signer
        .verify_at(&encode_token(&url), signing_time())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    Ok(())
}

#[test]
fn test_verify_rejects_moved_date() -> Result<()> {
    let signer = init_signer(CLUSTER_ID, None);
    let url = decode_token(&signer.get_token_at(signing_time()))?;
    let url = url.replace("X-Amz-Date=20210101T000000Z", "X-Amz-Date=20210101T000500Z");

    let err = signer
        .verify_at(&encode_token(&url), signing_time())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    Ok(())
}

#[test]
fn test_verify_rejects_expired_token() {
    let signer = init_signer(CLUSTER_ID, Some(900));
    let token = signer.get_token_at(signing_time());

    assert!(signer
        .verify_at(&token, signing_time() + TimeDelta::seconds(900))
        .is_ok());
    let err = signer
        .verify_at(&token, signing_time() + TimeDelta::seconds(901))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CredentialExpired);
}

#[test]
fn test_verify_rejects_garbage() {
    let signer = init_signer(CLUSTER_ID, None);

    for token in ["", "k8s-aws-v1.", "k8s-aws-v1.!!!", "Bearer abc"] {
        let err = signer.verify_at(token, signing_time()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RequestInvalid, "token: {token:?}");
    }
}
