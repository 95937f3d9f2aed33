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

mod exec_credential;
mod token;
mod verify;

use chrono::{TimeZone, Utc};
use tokeks_aws_eks::{Config, Credential, TokenSigner};
use tokeks_core::time::DateTime;

pub const ACCESS_KEY_ID: &str = "AKIDEXAMPLE";
pub const SECRET_ACCESS_KEY: &str = "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY";
pub const REGION: &str = "us-west-2";
pub const CLUSTER_ID: &str = "my-cluster";

/// 2021-01-01T00:00:00Z
pub fn signing_time() -> DateTime {
    Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0)
        .single()
        .expect("signing time must be valid")
}

pub fn credential() -> Credential {
    Credential::new(ACCESS_KEY_ID, SECRET_ACCESS_KEY)
}

/// Initialize test environment
pub fn init_signer(cluster_id: &str, expiry: Option<u64>) -> TokenSigner {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut cfg = Config::new(REGION, cluster_id);
    if let Some(expiry) = expiry {
        cfg = cfg.with_token_expiry_seconds(expiry);
    }
    TokenSigner::new(credential(), &cfg).expect("signer must be valid")
}
