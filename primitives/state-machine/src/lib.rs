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

//! In-memory host of the state-transition function.
//!
//! The runtime never touches a database: it reads and writes through an [`Ext`] that layers
//! an [`OverlayedChangeSet`] on top of a committed key-value backend. Runtime entry points are
//! driven by a [`StateMachine`], which protects the client's own transactions and rolls back
//! whatever the runtime leaves open.

#![warn(missing_docs)]

mod ext;
pub mod overlayed_changes;
mod testing;

use std::{collections::BTreeMap, fmt, sync::Arc};

use sp_core::hexdisplay::HexDisplay;
use stf_primitives::Externalities;

pub use ext::Ext;
pub use overlayed_changes::{
	AlreadyInRuntime, ExecutionMode, NoOpenTransaction, NotInRuntime, OverlayedChangeSet,
	OverlayedValue,
};
pub use sp_keystore::{testing::MemoryKeystore, Keystore, KeystorePtr};
pub use sp_trie::{LayoutV0, LayoutV1, TrieConfiguration};
pub use stf_primitives::StateVersion;
pub use testing::TestExternalities;

/// Storage key.
pub type StorageKey = Vec<u8>;

/// Storage value.
pub type StorageValue = Vec<u8>;

/// Committed key-value state the overlay is layered on.
pub type Storage = BTreeMap<StorageKey, StorageValue>;

pub(crate) type CallResult<E> = Result<Vec<u8>, E>;

/// Reads the version of runtime code that the host has not loaded.
pub trait ReadRuntimeVersion: Send + Sync {
	/// The SCALE encoded runtime version of `code`.
	fn read_runtime_version(&self, code: &[u8]) -> Result<Vec<u8>, String>;
}

/// Host services a runtime call may use besides storage, hashing and signature checks.
#[derive(Clone, Default)]
pub struct Extensions {
	/// Keystore that session keys are generated in.
	pub keystore: Option<KeystorePtr>,
	/// Reader of the version of new runtime code.
	pub runtime_version: Option<Arc<dyn ReadRuntimeVersion>>,
}

impl fmt::Debug for Extensions {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.debug_struct("Extensions")
			.field("keystore", &self.keystore.is_some())
			.field("runtime_version", &self.runtime_version.is_some())
			.finish()
	}
}

/// Something that can run a runtime entry point against a host.
pub trait CodeExecutor {
	/// Error returned when the call traps.
	type Error: core::fmt::Debug;

	/// Call `method` with the SCALE encoded `data`, returning the SCALE encoded output.
	fn call(&self, ext: &mut dyn Externalities, method: &str, data: &[u8])
		-> CallResult<Self::Error>;
}

/// The state machine driving a single runtime call.
pub struct StateMachine<'a, Exec> {
	backend: &'a Storage,
	exec: &'a Exec,
	method: &'a str,
	call_data: &'a [u8],
	overlay: &'a mut OverlayedChangeSet,
	state_version: StateVersion,
	extensions: Option<&'a Extensions>,
}

impl<'a, Exec: CodeExecutor> StateMachine<'a, Exec> {
	/// Creates new state machine.
	pub fn new(
		backend: &'a Storage,
		overlay: &'a mut OverlayedChangeSet,
		exec: &'a Exec,
		method: &'a str,
		call_data: &'a [u8],
		state_version: StateVersion,
	) -> Self {
		Self { backend, exec, method, call_data, overlay, state_version, extensions: None }
	}

	/// Make `extensions` available to the runtime during the call.
	pub fn with_extensions(mut self, extensions: &'a Extensions) -> Self {
		self.extensions = Some(extensions);
		self
	}

	/// Execute a call using the given state backend, overlayed changes, and call executor.
	///
	/// Transactions opened before the call are out of reach of the runtime, transactions the
	/// runtime leaves open are rolled back when it returns. A call that fails leaves no writes
	/// behind.
	///
	/// Returns the SCALE encoded result of the executed function.
	pub fn execute(&mut self) -> CallResult<Exec::Error> {
		self.overlay.start_transaction();
		let entered = self.overlay.enter_runtime();
		if entered.is_err() {
			log::error!(target: "state", "Call method={} started while already in runtime", self.method);
		}

		log::trace!(
			target: "state",
			"Call method={} input={}",
			self.method,
			HexDisplay::from(&self.call_data),
		);

		let result = {
			let mut ext = Ext::new(self.overlay, self.backend, self.state_version);
			if let Some(extensions) = self.extensions {
				ext = ext.with_extensions(extensions);
			}
			self.exec.call(&mut ext, self.method, self.call_data)
		};

		if entered.is_ok() {
			if let Err(NotInRuntime) = self.overlay.exit_runtime() {
				log::error!(target: "state", "Call method={} returned outside of runtime", self.method);
			}
		}

		let closed = match result {
			Ok(_) => self.overlay.commit_transaction(),
			Err(_) => self.overlay.rollback_transaction(),
		};
		if let Err(NoOpenTransaction) = closed {
			log::error!(target: "state", "Call method={} lost its storage transaction", self.method);
		}

		log::trace!(target: "state", "Return method={} result={:?}", self.method, result);

		result
	}
}
