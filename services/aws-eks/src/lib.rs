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

//! Amazon EKS bearer token issuer.
//!
//! A token is a presigned `sts:GetCallerIdentity` url, signed with AWS SigV4
//! and bound to one cluster through the signed `x-k8s-aws-id` header, then
//! wrapped as `k8s-aws-v1.<unpadded base64url>`. The cluster's authenticator
//! replays the url against STS to learn the caller's identity.
//!
//! No network request is made while issuing a token.
//!
//! ```
//! use tokeks_aws_eks::{Config, Credential, TokenSigner};
//!
//! let cred = Credential::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY");
//! let signer = TokenSigner::new(cred, &Config::new("us-west-2", "my-cluster"))?;
//!
//! let token = signer.get_token();
//! assert!(token.starts_with("k8s-aws-v1."));
//! signer.verify(&token)?;
//! # Ok::<(), tokeks_core::Error>(())
//! ```

#![warn(missing_docs)]

mod constants;
pub use constants::DEFAULT_TOKEN_EXPIRY_SECS;
pub use constants::TOKEN_PREFIX;

pub mod canonical;

mod config;
pub use config::Config;
pub use config::SigningContext;

mod credential;
pub use credential::Credential;

mod sign_request;
pub use sign_request::generate_signing_key;
pub use sign_request::RequestSigner;

mod presign;
pub use presign::presign_url;
pub use presign::CredentialScope;
pub use presign::PresignedUrl;

mod token;
pub use token::decode_token;
pub use token::encode_token;

mod exec_credential;
pub use exec_credential::ExecCredential;
pub use exec_credential::ExecCredentialSpec;
pub use exec_credential::ExecCredentialStatus;

mod signer;
pub use signer::get_token;
pub use signer::TokenSigner;
