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

//! Stuff to do with the runtime's storage.
//!
//! Keys follow the layout `twox_128(module) ++ twox_128(item)` for values; maps append
//! `hasher(encoded_key)` to that prefix. All access goes through the [`Externalities`] handle
//! passed in by the caller.

mod hashers;
mod types;
pub mod unhashed;

pub use hashers::{Blake2_128Concat, Identity, ReversibleStorageHasher, StorageHasher, Twox64Concat};
pub use stf_primitives::transactional::{
	get_transaction_level, is_transactional, with_storage_layer, with_transaction,
	TransactionOutcome,
};
pub use types::{OptionQuery, QueryKindTrait, StorageMap, StorageValue, ValueQuery};

use stf_primitives::Externalities;

/// An instance of a storage item in a module.
///
/// The module prefix is used to isolate the storage between modules, and the storage prefix is
/// used to isolate storages inside a module.
pub trait StorageInstance {
	/// Prefix of a module to isolate it from other modules.
	fn pallet_prefix() -> &'static str;

	/// Prefix given to a storage to isolate from other storages in the module.
	const STORAGE_PREFIX: &'static str;
}

/// Get the storage prefix for a given module and item name.
///
/// The result is `twox_128(pallet_name) ++ twox_128(storage_name)`.
pub fn storage_prefix(ext: &dyn Externalities, pallet_name: &[u8], storage_name: &[u8]) -> [u8; 32] {
	let pallet_hash = ext.twox_128(pallet_name);
	let storage_hash = ext.twox_128(storage_name);

	let mut final_key = [0u8; 32];
	final_key[..16].copy_from_slice(&pallet_hash);
	final_key[16..].copy_from_slice(&storage_hash);

	final_key
}

/// The storage prefix of the given instance.
pub fn instance_prefix<Prefix: StorageInstance>(ext: &dyn Externalities) -> [u8; 32] {
	storage_prefix(ext, Prefix::pallet_prefix().as_bytes(), Prefix::STORAGE_PREFIX.as_bytes())
}
