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

//! A minimal in-memory host for unit tests of this crate.

use std::collections::BTreeMap;

use sp_core::{ecdsa, ed25519, sr25519, Pair};

use crate::{externalities::NoOpenTransaction, Externalities, StateVersion, H256};

/// Storage kept in a map, with a snapshot per open transaction.
#[derive(Default)]
pub struct TestExt {
	storage: BTreeMap<Vec<u8>, Vec<u8>>,
	snapshots: Vec<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl Externalities for TestExt {
	fn storage(&self, key: &[u8]) -> Option<Vec<u8>> {
		self.storage.get(key).cloned()
	}

	fn set_storage(&mut self, key: Vec<u8>, value: Vec<u8>) {
		self.storage.insert(key, value);
	}

	fn clear_storage(&mut self, key: &[u8]) {
		self.storage.remove(key);
	}

	fn clear_prefix(&mut self, prefix: &[u8], limit: Option<u32>) -> (u32, bool) {
		let keys: Vec<_> =
			self.storage.keys().filter(|k| k.starts_with(prefix)).cloned().collect();
		let limit = limit.map(|l| l as usize).unwrap_or(usize::MAX);
		let mut removed = 0;
		for key in keys.iter().take(limit) {
			self.storage.remove(key);
			removed += 1;
		}
		(removed, keys.len() > limit)
	}

	fn storage_root(&mut self, _version: StateVersion) -> H256 {
		unimplemented!("storage roots are not computed by the unit test host")
	}

	fn storage_start_transaction(&mut self) {
		self.snapshots.push(self.storage.clone());
	}

	fn storage_rollback_transaction(&mut self) -> Result<(), NoOpenTransaction> {
		self.storage = self.snapshots.pop().ok_or(NoOpenTransaction)?;
		Ok(())
	}

	fn storage_commit_transaction(&mut self) -> Result<(), NoOpenTransaction> {
		self.snapshots.pop().map(|_| ()).ok_or(NoOpenTransaction)
	}

	fn blake2_128(&self, data: &[u8]) -> [u8; 16] {
		sp_crypto_hashing::blake2_128(data)
	}

	fn blake2_256(&self, data: &[u8]) -> [u8; 32] {
		sp_crypto_hashing::blake2_256(data)
	}

	fn twox_64(&self, data: &[u8]) -> [u8; 8] {
		sp_crypto_hashing::twox_64(data)
	}

	fn twox_128(&self, data: &[u8]) -> [u8; 16] {
		sp_crypto_hashing::twox_128(data)
	}

	fn ed25519_verify(
		&self,
		sig: &ed25519::Signature,
		msg: &[u8],
		public: &ed25519::Public,
	) -> bool {
		ed25519::Pair::verify(sig, msg, public)
	}

	fn sr25519_verify(
		&self,
		sig: &sr25519::Signature,
		msg: &[u8],
		public: &sr25519::Public,
	) -> bool {
		sr25519::Pair::verify(sig, msg, public)
	}

	fn ecdsa_recover_compressed(
		&self,
		sig: &ecdsa::Signature,
		msg: &[u8; 32],
	) -> Option<ecdsa::Public> {
		sig.recover_prehashed(msg)
	}

	fn ordered_trie_root(&self, _input: Vec<Vec<u8>>, _version: StateVersion) -> H256 {
		unimplemented!("trie roots are not computed by the unit test host")
	}
}
