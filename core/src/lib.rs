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

//! Core components shared by tokeks signers.
//!
//! This crate provides the building blocks every token signer needs and
//! nothing service specific:
//!
//! - [`Error`] and [`ErrorKind`]: the error type returned across the workspace
//! - [`SigningCredential`]: the trait a credential implements so signers can
//!   reject it before any signing happens
//! - [`hash`]: SHA-256, HMAC-SHA256 and base64 helpers
//! - [`time`]: UTC time capture, formatting and parsing
//! - [`utils`]: general utilities including data redaction
//!
//! ## Example
//!
//! ```
//! use tokeks_core::hash::hex_sha256;
//!
//! assert_eq!(
//!     hex_sha256(b""),
//!     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
//! );
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod api;
pub use api::SigningCredential;
mod error;
pub use error::{Error, ErrorKind, Result};
