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

//! Test implementation for Externalities.

use std::sync::Arc;

use stf_primitives::{Externalities, StateVersion, H256};

use crate::{
	ext::trie_root, CodeExecutor, Ext, Extensions, KeystorePtr, OverlayedChangeSet,
	ReadRuntimeVersion, StateMachine, Storage, StorageKey, StorageValue,
};

/// Simple in-memory externalities for tests, genesis building and block authoring.
#[derive(Debug, Clone, Default)]
pub struct TestExternalities {
	/// The overlay changed storage.
	overlay: OverlayedChangeSet,
	/// Storage backend.
	backend: Storage,
	/// The state version to use when computing roots.
	state_version: StateVersion,
	/// Host services made available to the runtime.
	extensions: Extensions,
}

impl TestExternalities {
	/// Create a new instance of `TestExternalities` with storage.
	pub fn new(storage: Storage) -> Self {
		Self::new_with_state_version(storage, Default::default())
	}

	/// Create a new instance of `TestExternalities` with storage for a given state version.
	pub fn new_with_state_version(storage: Storage, state_version: StateVersion) -> Self {
		Self {
			overlay: Default::default(),
			backend: storage,
			state_version,
			extensions: Default::default(),
		}
	}

	/// New empty test externalities.
	pub fn new_empty() -> Self {
		Self::new(Default::default())
	}

	/// Get externalities implementation.
	pub fn ext(&mut self) -> Ext {
		Ext::new(&mut self.overlay, &self.backend, self.state_version)
			.with_extensions(&self.extensions)
	}

	/// Generate keys in `keystore` from now on.
	pub fn register_keystore(&mut self, keystore: KeystorePtr) {
		self.extensions.keystore = Some(keystore);
	}

	/// Read the version of new runtime code through `reader` from now on.
	pub fn register_runtime_version_reader(&mut self, reader: Arc<dyn ReadRuntimeVersion>) {
		self.extensions.runtime_version = Some(reader);
	}

	/// Insert key/value into backend.
	pub fn insert(&mut self, k: StorageKey, v: StorageValue) {
		self.backend.insert(k, v);
	}

	/// The committed backend.
	pub fn backend(&self) -> &Storage {
		&self.backend
	}

	/// The uncommitted overlay.
	pub fn overlayed_changes(&self) -> &OverlayedChangeSet {
		&self.overlay
	}

	/// Commit all pending changes to the underlying backend.
	///
	/// Fails when storage transactions are still open.
	pub fn commit_all(&mut self) -> Result<(), String> {
		let overlay = std::mem::take(&mut self.overlay);
		let changes = overlay.drain_committed().map_err(|overlay| {
			let depth = overlay.transaction_depth();
			self.overlay = overlay;
			format!("Cannot commit with {} open storage transactions", depth)
		})?;

		for (key, value) in changes {
			match value {
				Some(value) => self.backend.insert(key, value),
				None => self.backend.remove(&key),
			};
		}
		Ok(())
	}

	/// Return the storage root, including uncommitted changes.
	pub fn storage_root(&mut self) -> H256 {
		let version = self.state_version;
		trie_root(self.ext().pairs(), version)
	}

	/// Execute the given closure while `self` is set as the runtime's externalities.
	///
	/// Storage transactions the closure leaves open are rolled back before returning.
	pub fn execute_with<R>(&mut self, execute: impl FnOnce(&mut dyn Externalities) -> R) -> R {
		let entered = self.overlay.enter_runtime();
		let result = execute(&mut self.ext());
		if entered.is_ok() && self.overlay.exit_runtime().is_err() {
			log::error!(target: "state", "execute_with returned outside of runtime");
		}
		result
	}

	/// Run a runtime entry point through a [`StateMachine`] on top of this state.
	pub fn call<Exec: CodeExecutor>(
		&mut self,
		exec: &Exec,
		method: &str,
		call_data: &[u8],
	) -> Result<Vec<u8>, Exec::Error> {
		StateMachine::new(
			&self.backend,
			&mut self.overlay,
			exec,
			method,
			call_data,
			self.state_version,
		)
		.with_extensions(&self.extensions)
		.execute()
	}
}

impl From<Storage> for TestExternalities {
	fn from(storage: Storage) -> Self {
		Self::new(storage)
	}
}
