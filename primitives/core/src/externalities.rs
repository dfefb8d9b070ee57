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

//! The host interface.
//!
//! Every storage access, hash and signature check made by the runtime goes through an
//! [`Externalities`] handle that is passed down explicitly. Read-only code paths take
//! `&dyn Externalities`, code that writes takes `&mut dyn Externalities`.

use codec::{Decode, Encode};
use sp_core::{ecdsa, ed25519, sr25519};

use crate::H256;

pub use sp_core::crypto::KeyTypeId;

/// The version of the trie layout used to compute storage roots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Encode, Decode, scale_info::TypeInfo)]
pub enum StateVersion {
	/// Old state version, no value nodes.
	V0 = 0,
	/// New state version can use value nodes.
	#[default]
	V1 = 1,
}

impl From<StateVersion> for u8 {
	fn from(version: StateVersion) -> u8 {
		version as u8
	}
}

impl TryFrom<u8> for StateVersion {
	type Error = ();
	fn try_from(val: u8) -> Result<StateVersion, ()> {
		match val {
			0 => Ok(StateVersion::V0),
			1 => Ok(StateVersion::V1),
			_ => Err(()),
		}
	}
}

/// Error returned when closing a storage transaction that was never opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoOpenTransaction;

/// The storage, hashing and crypto capabilities the host provides to the runtime.
pub trait Externalities {
	/// Read runtime storage.
	fn storage(&self, key: &[u8]) -> Option<Vec<u8>>;

	/// Check whether the given `key` exists in storage.
	fn exists_storage(&self, key: &[u8]) -> bool {
		self.storage(key).is_some()
	}

	/// Set `key` to `value` in the storage.
	fn set_storage(&mut self, key: Vec<u8>, value: Vec<u8>);

	/// Clear the storage of the given `key` and its value.
	fn clear_storage(&mut self, key: &[u8]);

	/// Clear the storage of each key-value pair where the key starts with the given `prefix`.
	///
	/// At most `limit` keys are removed when given. Returns the number of keys removed and
	/// whether any key with the prefix is left.
	fn clear_prefix(&mut self, prefix: &[u8], limit: Option<u32>) -> (u32, bool);

	/// Compute the storage root of the current state, including all open transactions.
	fn storage_root(&mut self, version: StateVersion) -> H256;

	/// Start a new nested storage transaction.
	fn storage_start_transaction(&mut self);

	/// Discard all changes made since the matching [`Self::storage_start_transaction`].
	fn storage_rollback_transaction(&mut self) -> Result<(), NoOpenTransaction>;

	/// Merge all changes made since the matching [`Self::storage_start_transaction`] into
	/// the parent transaction.
	fn storage_commit_transaction(&mut self) -> Result<(), NoOpenTransaction>;

	fn blake2_128(&self, data: &[u8]) -> [u8; 16];

	fn blake2_256(&self, data: &[u8]) -> [u8; 32];

	fn twox_64(&self, data: &[u8]) -> [u8; 8];

	fn twox_128(&self, data: &[u8]) -> [u8; 16];

	/// Verify an ed25519 signature.
	fn ed25519_verify(&self, sig: &ed25519::Signature, msg: &[u8], public: &ed25519::Public)
		-> bool;

	/// Verify an sr25519 signature.
	fn sr25519_verify(&self, sig: &sr25519::Signature, msg: &[u8], public: &sr25519::Public)
		-> bool;

	/// Recover the compressed public key that signed the blake2-256 message hash `msg`.
	///
	/// Returns `None` when no key can be recovered from the signature.
	fn ecdsa_recover_compressed(&self, sig: &ecdsa::Signature, msg: &[u8; 32])
		-> Option<ecdsa::Public>;

	/// Generate an sr25519 key of type `id` in the keystore of the host.
	///
	/// `seed` is a secret URI; without it a random key is generated. `None` if the host has no
	/// keystore.
	fn sr25519_generate(&self, _id: KeyTypeId, _seed: Option<&str>) -> Option<sr25519::Public> {
		None
	}

	/// Generate an ed25519 key of type `id` in the keystore of the host.
	///
	/// See [`Self::sr25519_generate`].
	fn ed25519_generate(&self, _id: KeyTypeId, _seed: Option<&str>) -> Option<ed25519::Public> {
		None
	}

	/// The SCALE encoded [`RuntimeVersion`](crate::version::RuntimeVersion) of the runtime
	/// `code`, if the host can read it.
	fn read_runtime_version(&self, _code: &[u8]) -> Option<Vec<u8>> {
		None
	}

	/// The blake2-256 ordered trie root of the given items, keyed by their compact index.
	fn ordered_trie_root(&self, input: Vec<Vec<u8>>, version: StateVersion) -> H256;
}
