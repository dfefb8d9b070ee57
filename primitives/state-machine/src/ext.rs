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

//! Concrete externalities implementation.

use std::collections::BTreeSet;

use sp_core::{ecdsa, ed25519, hexdisplay::HexDisplay, sr25519, Blake2Hasher, Pair};
use sp_trie::{LayoutV0, LayoutV1, TrieConfiguration};
use stf_primitives::{externalities::KeyTypeId, Externalities, StateVersion, H256};

use crate::{
	Extensions, Keystore, NoOpenTransaction, OverlayedChangeSet, Storage, StorageKey, StorageValue,
};

/// Wraps a read-only backend and the overlay into something that implements
/// [`Externalities`].
pub struct Ext<'a> {
	/// The overlayed changes to write to.
	overlay: &'a mut OverlayedChangeSet,
	/// The storage backend to read from.
	backend: &'a Storage,
	/// Trie layout used when a root is computed without an explicit version.
	state_version: StateVersion,
	/// Keystore and other host services, if any.
	extensions: Option<&'a Extensions>,
}

impl<'a> Ext<'a> {
	/// Create a new `Ext`.
	pub fn new(
		overlay: &'a mut OverlayedChangeSet,
		backend: &'a Storage,
		state_version: StateVersion,
	) -> Self {
		Self { overlay, backend, state_version, extensions: None }
	}

	/// Give the runtime access to `extensions`.
	pub fn with_extensions(mut self, extensions: &'a Extensions) -> Self {
		self.extensions = Some(extensions);
		self
	}

	fn keystore(&self) -> Option<&dyn Keystore> {
		let keystore = self.extensions.and_then(|e| e.keystore.as_deref());
		if keystore.is_none() {
			log::error!(target: "state", "No keystore associated with the current context");
		}
		keystore
	}

	/// The trie layout this host was created with.
	pub fn state_version(&self) -> StateVersion {
		self.state_version
	}

	/// All key-value pairs as seen by the current transaction, in key order.
	pub fn pairs(&self) -> Vec<(StorageKey, StorageValue)> {
		let mut merged = self.backend.clone();
		for (key, entry) in self.overlay.changes() {
			match entry.value() {
				Some(value) => merged.insert(key.clone(), value.clone()),
				None => merged.remove(key),
			};
		}
		merged.into_iter().collect()
	}
}

/// Blake2-256 root of the trie holding `input` under the given layout.
pub(crate) fn trie_root<I, A, B>(input: I, version: StateVersion) -> H256
where
	I: IntoIterator<Item = (A, B)>,
	A: AsRef<[u8]> + Ord,
	B: AsRef<[u8]>,
{
	match version {
		StateVersion::V0 => LayoutV0::<Blake2Hasher>::trie_root(input),
		StateVersion::V1 => LayoutV1::<Blake2Hasher>::trie_root(input),
	}
}

impl<'a> Externalities for Ext<'a> {
	fn storage(&self, key: &[u8]) -> Option<StorageValue> {
		let result = match self.overlay.get(key) {
			Some(entry) => entry.value().cloned(),
			None => self.backend.get(key).cloned(),
		};

		log::trace!(
			target: "state",
			"Get key={} result={:?}",
			HexDisplay::from(&key),
			result.as_ref().map(HexDisplay::from),
		);

		result
	}

	fn exists_storage(&self, key: &[u8]) -> bool {
		match self.overlay.get(key) {
			Some(entry) => entry.value().is_some(),
			None => self.backend.contains_key(key),
		}
	}

	fn set_storage(&mut self, key: StorageKey, value: StorageValue) {
		log::trace!(
			target: "state",
			"Put key={} value={}",
			HexDisplay::from(&key),
			HexDisplay::from(&value),
		);
		self.overlay.set(key, Some(value));
	}

	fn clear_storage(&mut self, key: &[u8]) {
		log::trace!(target: "state", "Clear key={}", HexDisplay::from(&key));
		self.overlay.set(key.to_vec(), None);
	}

	fn clear_prefix(&mut self, prefix: &[u8], limit: Option<u32>) -> (u32, bool) {
		let mut live = self
			.backend
			.keys()
			.filter(|k| k.starts_with(prefix))
			.cloned()
			.collect::<BTreeSet<_>>();
		for (key, entry) in self.overlay.changes().filter(|(k, _)| k.starts_with(prefix)) {
			if entry.value().is_some() {
				live.insert(key.clone());
			} else {
				live.remove(key);
			}
		}

		let limit = limit.map(|l| l as usize).unwrap_or(usize::MAX);
		let total = live.len();
		let mut removed = 0;
		for key in live.into_iter().take(limit) {
			self.overlay.set(key, None);
			removed += 1;
		}

		log::trace!(
			target: "state",
			"ClearPrefix prefix={} removed={}",
			HexDisplay::from(&prefix),
			removed,
		);

		(removed, total > limit)
	}

	fn storage_root(&mut self, version: StateVersion) -> H256 {
		let root = trie_root(self.pairs(), version);
		log::debug!(target: "state", "Root {:?} ({:?})", root, version);
		root
	}

	fn storage_start_transaction(&mut self) {
		self.overlay.start_transaction()
	}

	fn storage_rollback_transaction(&mut self) -> Result<(), NoOpenTransaction> {
		self.overlay.rollback_transaction()
	}

	fn storage_commit_transaction(&mut self) -> Result<(), NoOpenTransaction> {
		self.overlay.commit_transaction()
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

	fn sr25519_generate(&self, id: KeyTypeId, seed: Option<&str>) -> Option<sr25519::Public> {
		self.keystore()?
			.sr25519_generate_new(id, seed)
			.map_err(|e| log::error!(target: "state", "sr25519 key generation failed: {}", e))
			.ok()
	}

	fn ed25519_generate(&self, id: KeyTypeId, seed: Option<&str>) -> Option<ed25519::Public> {
		self.keystore()?
			.ed25519_generate_new(id, seed)
			.map_err(|e| log::error!(target: "state", "ed25519 key generation failed: {}", e))
			.ok()
	}

	fn read_runtime_version(&self, code: &[u8]) -> Option<Vec<u8>> {
		let reader = self.extensions.and_then(|e| e.runtime_version.as_ref())?;
		reader
			.read_runtime_version(code)
			.map_err(|e| log::debug!(target: "state", "Cannot read runtime version: {}", e))
			.ok()
	}

	fn ordered_trie_root(&self, input: Vec<Vec<u8>>, version: StateVersion) -> H256 {
		match version {
			StateVersion::V0 => LayoutV0::<Blake2Hasher>::ordered_trie_root(input),
			StateVersion::V1 => LayoutV1::<Blake2Hasher>::ordered_trie_root(input),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use hex_literal::hex;
	use pretty_assertions::assert_eq;

	fn backend() -> Storage {
		[
			(b"doe".to_vec(), b"reindeer".to_vec()),
			(b"dog".to_vec(), b"puppy".to_vec()),
			(b"dogglesworth".to_vec(), b"cat".to_vec()),
		]
		.into_iter()
		.collect()
	}

	#[test]
	fn reads_fall_through_to_the_backend() {
		let backend = backend();
		let mut overlay = OverlayedChangeSet::default();
		let mut ext = Ext::new(&mut overlay, &backend, StateVersion::V1);

		ext.set_storage(b"dog".to_vec(), b"hound".to_vec());
		ext.clear_storage(b"doe");

		assert_eq!(ext.storage(b"dog"), Some(b"hound".to_vec()));
		assert_eq!(ext.storage(b"doe"), None);
		assert!(!ext.exists_storage(b"doe"));
		assert_eq!(ext.storage(b"dogglesworth"), Some(b"cat".to_vec()));
	}

	#[test]
	fn clear_prefix_respects_limit() {
		let backend = backend();
		let mut overlay = OverlayedChangeSet::default();
		let mut ext = Ext::new(&mut overlay, &backend, StateVersion::V1);
		ext.set_storage(b"doge".to_vec(), b"wow".to_vec());

		assert_eq!(ext.clear_prefix(b"dog", Some(2)), (2, true));
		assert_eq!(ext.clear_prefix(b"dog", None), (1, false));
		assert_eq!(ext.storage(b"doe"), Some(b"reindeer".to_vec()));
		assert_eq!(ext.pairs(), vec![(b"doe".to_vec(), b"reindeer".to_vec())]);
	}

	#[test]
	fn storage_root_sees_uncommitted_changes() {
		let backend = backend();
		let mut overlay = OverlayedChangeSet::default();
		let mut ext = Ext::new(&mut overlay, &backend, StateVersion::V1);

		let before = ext.storage_root(StateVersion::V1);
		ext.storage_start_transaction();
		ext.set_storage(b"dog".to_vec(), b"hound".to_vec());
		assert_ne!(ext.storage_root(StateVersion::V1), before);
		ext.storage_rollback_transaction().unwrap();
		assert_eq!(ext.storage_root(StateVersion::V1), before);
		assert_eq!(before, trie_root(backend.clone(), StateVersion::V1));
	}

	#[test]
	fn empty_ordered_root_is_the_hash_of_the_empty_node() {
		let backend = Storage::new();
		let mut overlay = OverlayedChangeSet::default();
		let ext = Ext::new(&mut overlay, &backend, StateVersion::V1);

		assert_eq!(
			ext.ordered_trie_root(vec![], StateVersion::V1),
			H256::from(hex!("03170a2e7597b7b7e3d84c05391d139a62b157e78786d8c082f29dcf4c111314")),
		);
		assert_ne!(
			ext.ordered_trie_root(vec![vec![1]], StateVersion::V1),
			ext.ordered_trie_root(vec![vec![2]], StateVersion::V1),
		);
	}

	#[test]
	fn signatures_are_checked() {
		let backend = Storage::new();
		let mut overlay = OverlayedChangeSet::default();
		let ext = Ext::new(&mut overlay, &backend, StateVersion::V1);

		let pair = sr25519::Pair::from_string("//Alice", None).unwrap();
		let sig = pair.sign(b"hello");
		assert!(ext.sr25519_verify(&sig, b"hello", &pair.public()));
		assert!(!ext.sr25519_verify(&sig, b"bye", &pair.public()));

		let pair = ed25519::Pair::from_string("//Bob", None).unwrap();
		let sig = pair.sign(b"hello");
		assert!(ext.ed25519_verify(&sig, b"hello", &pair.public()));
	}

	struct FixedVersion;

	impl crate::ReadRuntimeVersion for FixedVersion {
		fn read_runtime_version(&self, code: &[u8]) -> Result<Vec<u8>, String> {
			match code {
				b"runtime" => Ok(vec![7]),
				_ => Err("not a runtime".into()),
			}
		}
	}

	#[test]
	fn keys_are_generated_in_the_registered_keystore() {
		let backend = Storage::new();
		let mut overlay = OverlayedChangeSet::default();
		let keystore = std::sync::Arc::new(crate::MemoryKeystore::new());
		let extensions = Extensions { keystore: Some(keystore.clone()), runtime_version: None };
		let ext = Ext::new(&mut overlay, &backend, StateVersion::V1).with_extensions(&extensions);
		let aura = KeyTypeId(*b"aura");

		let seeded = ext.sr25519_generate(aura, Some("//Alice")).unwrap();
		assert_eq!(seeded, sr25519::Pair::from_string("//Alice", None).unwrap().public());
		let random = ext.ed25519_generate(KeyTypeId(*b"gran"), None).unwrap();

		assert_eq!(keystore.sr25519_public_keys(aura), vec![seeded]);
		assert_eq!(keystore.ed25519_public_keys(KeyTypeId(*b"gran")), vec![random]);
	}

	#[test]
	fn host_services_are_optional() {
		let backend = Storage::new();
		let mut overlay = OverlayedChangeSet::default();
		let ext = Ext::new(&mut overlay, &backend, StateVersion::V1);

		assert_eq!(ext.sr25519_generate(KeyTypeId(*b"aura"), None), None);
		assert_eq!(ext.read_runtime_version(b"runtime"), None);
	}

	#[test]
	fn runtime_version_comes_from_the_reader() {
		let backend = Storage::new();
		let mut overlay = OverlayedChangeSet::default();
		let extensions = Extensions {
			keystore: None,
			runtime_version: Some(std::sync::Arc::new(FixedVersion)),
		};
		let ext = Ext::new(&mut overlay, &backend, StateVersion::V1).with_extensions(&extensions);

		assert_eq!(ext.read_runtime_version(b"runtime"), Some(vec![7]));
		assert_eq!(ext.read_runtime_version(b"garbage"), None);
	}

	#[test]
	fn ecdsa_signer_is_recovered() {
		let backend = Storage::new();
		let mut overlay = OverlayedChangeSet::default();
		let ext = Ext::new(&mut overlay, &backend, StateVersion::V1);
		let pair = ecdsa::Pair::from_seed(&[5u8; 32]);
		let hash = sp_crypto_hashing::blake2_256(b"payload");

		assert_eq!(ext.ecdsa_recover_compressed(&pair.sign(b"payload"), &hash), Some(pair.public()));
	}
}
