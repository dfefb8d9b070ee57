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

//! Nested storage transactions over a map of pending writes.
//!
//! Every key keeps a stack of versions, one per open transaction that wrote it. The set of
//! keys written inside each open transaction is tracked separately so that closing a
//! transaction only visits the keys it touched.

use std::collections::{BTreeMap, HashSet};

use smallvec::SmallVec;

pub use stf_primitives::externalities::NoOpenTransaction;

use crate::{StorageKey, StorageValue};

const PROOF_VERSIONS_NON_EMPTY: &str =
	"an entry is removed together with its last version, so a stored entry has at least one; qed";

/// `enter_runtime` was called while the runtime was already executing.
#[derive(Debug, PartialEq, Eq)]
pub struct AlreadyInRuntime;

/// `exit_runtime` was called while no runtime was executing.
#[derive(Debug, PartialEq, Eq)]
pub struct NotInRuntime;

/// Who currently drives the overlay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecutionMode {
	/// The host: every open transaction may be closed.
	#[default]
	Client,
	/// The runtime: transactions opened by the host before the call are out of reach.
	Runtime,
}

/// Pending versions of a single key. `None` marks a deletion.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OverlayedValue {
	versions: SmallVec<[Option<StorageValue>; 5]>,
}

impl OverlayedValue {
	/// The value visible to the innermost transaction, `None` if it was deleted.
	pub fn value(&self) -> Option<&StorageValue> {
		self.latest().as_ref()
	}

	fn latest(&self) -> &Option<StorageValue> {
		self.versions.last().expect(PROOF_VERSIONS_NON_EMPTY)
	}

	fn write(&mut self, value: Option<StorageValue>, new_version: bool) {
		match self.versions.last_mut() {
			Some(latest) if !new_version => *latest = value,
			_ => self.versions.push(value),
		}
	}
}

/// All pending writes of a block or call, with nested transaction support.
#[derive(Debug, Clone, Default)]
pub struct OverlayedChangeSet {
	changes: BTreeMap<StorageKey, OverlayedValue>,
	/// Keys written per open transaction, innermost last.
	written: SmallVec<[HashSet<StorageKey>; 5]>,
	/// How many of the open transactions were started by the host.
	client_depth: usize,
	mode: ExecutionMode,
}

impl OverlayedChangeSet {
	/// Whether nothing was written at all.
	pub fn is_empty(&self) -> bool {
		self.changes.is_empty()
	}

	pub fn get(&self, key: &[u8]) -> Option<&OverlayedValue> {
		self.changes.get(key)
	}

	/// Write `value` under `key`, `None` deleting it.
	pub fn set(&mut self, key: StorageKey, value: Option<StorageValue>) {
		let new_version = match self.written.last_mut() {
			Some(keys) => keys.insert(key.clone()),
			None => false,
		};
		self.changes.entry(key).or_default().write(value, new_version);
	}

	/// Every written key with its pending versions, in key order.
	pub fn changes(&self) -> impl Iterator<Item = (&StorageKey, &OverlayedValue)> {
		self.changes.iter()
	}

	/// The final value of every written key.
	///
	/// Gives the change set back when a transaction is still open.
	pub fn drain_committed(
		self,
	) -> Result<impl Iterator<Item = (StorageKey, Option<StorageValue>)>, Self> {
		if self.transaction_depth() > 0 {
			return Err(self)
		}
		Ok(self.changes.into_iter().map(|(key, mut entry)| {
			(key, entry.versions.pop().expect(PROOF_VERSIONS_NON_EMPTY))
		}))
	}

	/// Number of open transactions.
	pub fn transaction_depth(&self) -> usize {
		self.written.len()
	}

	/// Hand the overlay to the runtime. The transactions open at this point can no longer be
	/// closed until [`Self::exit_runtime`].
	pub fn enter_runtime(&mut self) -> Result<(), AlreadyInRuntime> {
		if self.mode == ExecutionMode::Runtime {
			return Err(AlreadyInRuntime)
		}
		self.mode = ExecutionMode::Runtime;
		self.client_depth = self.transaction_depth();
		Ok(())
	}

	/// Take the overlay back from the runtime, rolling back whatever it left open.
	pub fn exit_runtime(&mut self) -> Result<(), NotInRuntime> {
		if self.mode == ExecutionMode::Client {
			return Err(NotInRuntime)
		}
		self.mode = ExecutionMode::Client;

		let dangling = self.transaction_depth().saturating_sub(self.client_depth);
		if dangling > 0 {
			log::warn!(
				target: "state",
				"runtime left {} storage transactions open, rolling them back",
				dangling,
			);
		}
		for _ in 0..dangling {
			let _ = self.close_transaction(false);
		}
		Ok(())
	}

	/// Open a nested transaction. Writes outside of any transaction are final.
	pub fn start_transaction(&mut self) {
		self.written.push(HashSet::new());
	}

	/// Discard every write of the innermost transaction.
	pub fn rollback_transaction(&mut self) -> Result<(), NoOpenTransaction> {
		self.close_transaction(false)
	}

	/// Merge every write of the innermost transaction into its parent.
	pub fn commit_transaction(&mut self) -> Result<(), NoOpenTransaction> {
		self.close_transaction(true)
	}

	fn close_transaction(&mut self, commit: bool) -> Result<(), NoOpenTransaction> {
		if self.mode == ExecutionMode::Runtime && self.transaction_depth() <= self.client_depth {
			return Err(NoOpenTransaction)
		}
		let written = self.written.pop().ok_or(NoOpenTransaction)?;

		for key in written {
			let Some(entry) = self.changes.get_mut(&key) else { continue };
			let closed = entry.versions.pop().expect(PROOF_VERSIONS_NON_EMPTY);

			if commit {
				// The parent owns a version of its own only if it wrote the key too. Otherwise the
				// closed version moves down and is now tracked by the parent.
				let parent_wrote = match self.written.last_mut() {
					Some(parent) => !parent.insert(key),
					None => !entry.versions.is_empty(),
				};
				match entry.versions.last_mut() {
					Some(latest) if parent_wrote => *latest = closed,
					_ => entry.versions.push(closed),
				}
			} else if entry.versions.is_empty() {
				self.changes.remove(&key);
			}
		}

		Ok(())
	}
}
