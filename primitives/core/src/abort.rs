// This file is part of Substrate.

// Copyright (C) Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: Apache-2.0

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// 	http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Unrecoverable runtime errors.
//!
//! An [`Abort`] means the input or the state disagrees with the compiled runtime. The runtime
//! call that produced it must not return any partial output; the API boundary turns it into a
//! trap.

use crate::{transaction_validity::TransactionValidityError, H256};

/// A fatal condition that terminates the current runtime call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Abort {
	/// The SCALE input handed to an entry point could not be decoded.
	#[error("Bad input data provided to {method}: {reason}")]
	BadInput { method: &'static str, reason: String },
	/// The requested runtime API does not exist.
	#[error("Unknown runtime API method `{0}`")]
	UnknownMethod(String),
	/// The header does not continue the chain known to the runtime.
	#[error("Parent hash should be valid.")]
	InvalidParentHash,
	/// An inherent was found after the first non-inherent extrinsic.
	#[error("Invalid inherent position for extrinsic at index {0}")]
	InvalidInherentPosition(u32),
	/// An extrinsic of an imported block was rejected.
	#[error("Extrinsic at index {index} is invalid: {error:?}")]
	InvalidExtrinsic { index: u32, error: TransactionValidityError },
	#[error("Number of digest items must match that calculated.")]
	DigestCountMismatch,
	#[error("Digest item must match that calculated.")]
	DigestItemMismatch,
	#[error("Storage root must match that calculated: expected {expected:?}, got {computed:?}")]
	StateRootMismatch { expected: H256, computed: H256 },
	#[error("Transaction trie root must be valid: expected {expected:?}, got {computed:?}")]
	ExtrinsicsRootMismatch { expected: H256, computed: H256 },
	/// Inherent data supplied by the block author is missing or malformed.
	#[error("Malformed inherent data: {0}")]
	MalformedInherentData(&'static str),
	/// A module hook hit a condition that makes the block invalid.
	#[error("{module} hook failed: {reason}")]
	Hook { module: &'static str, reason: &'static str },
	/// A value the runtime relies on is missing from storage or cannot be decoded.
	#[error("Corrupted state: {0}")]
	Corruption(&'static str),
	/// The host does not provide a service the call needs, e.g. a keystore.
	#[error("Host service unavailable: {0}")]
	HostServiceUnavailable(&'static str),
}

impl Abort {
	/// Shortcut for [`Abort::BadInput`] from a codec error.
	pub fn bad_input(method: &'static str, error: codec::Error) -> Self {
		Self::BadInput { method, reason: error.to_string() }
	}
}
