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

//! Utility functions and types.

use std::fmt::Debug;

/// Redacts a secret for `Debug` output.
///
/// - Empty input renders as `EMPTY`.
/// - Input shorter than 12 characters is masked entirely.
/// - Longer input keeps its first and last three characters so two different
///   keys can still be told apart in logs.
///
/// Secret access keys are always masked entirely, use [`Redact::full`] for them.
pub struct Redact<'a> {
    value: &'a str,
    full: bool,
}

impl<'a> Redact<'a> {
    /// Mask every character of the input regardless of its length.
    pub fn full(value: &'a str) -> Self {
        Redact { value, full: true }
    }
}

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Redact { value, full: false }
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact::from(value.as_str())
    }
}

impl<'a> From<&'a Option<String>> for Redact<'a> {
    fn from(value: &'a Option<String>) -> Self {
        match value {
            None => Redact::from(""),
            Some(v) => Redact::from(v),
        }
    }
}

impl Debug for Redact<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let length = self.value.len();
        if length == 0 {
            f.write_str("EMPTY")
        } else if self.full || length < 12 || !self.value.is_ascii() {
            f.write_str("***")
        } else {
            f.write_str(&self.value[..3])?;
            f.write_str("***")?;
            f.write_str(&self.value[length - 3..])
        }
    }
}
