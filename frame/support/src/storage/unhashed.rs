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

//! Operation on unhashed runtime storage.

use codec::{Decode, Encode};
use sp_core::hexdisplay::HexDisplay;
use stf_primitives::Externalities;

use crate::LOG_TARGET;

/// Return the value of the item in storage under `key`, or `None` if there is no explicit entry.
///
/// A value that cannot be decoded is logged and treated as absent.
pub fn get<T: Decode + Sized>(ext: &dyn Externalities, key: &[u8]) -> Option<T> {
	ext.storage(key).and_then(|val| {
		Decode::decode(&mut &val[..]).map(Some).unwrap_or_else(|e| {
			log::error!(
				target: LOG_TARGET,
				"Corrupted state at `{}`: {:?}",
				HexDisplay::from(&key),
				e,
			);
			None
		})
	})
}

/// Return the value of the item in storage under `key`, or the type's default if there is no
/// explicit entry.
pub fn get_or_default<T: Decode + Sized + Default>(ext: &dyn Externalities, key: &[u8]) -> T {
	get(ext, key).unwrap_or_default()
}

/// Return the value of the item in storage under `key`, or `default_value` if there is no
/// explicit entry.
pub fn get_or<T: Decode + Sized>(ext: &dyn Externalities, key: &[u8], default_value: T) -> T {
	get(ext, key).unwrap_or(default_value)
}

/// Put `value` in storage under `key`.
pub fn put<T: Encode + ?Sized>(ext: &mut dyn Externalities, key: &[u8], value: &T) {
	value.using_encoded(|slice| ext.set_storage(key.to_vec(), slice.to_vec()));
}

/// Remove `key` from storage, returning its value if it had an explicit entry or `None`
/// otherwise.
pub fn take<T: Decode + Sized>(ext: &mut dyn Externalities, key: &[u8]) -> Option<T> {
	let r = get(&*ext, key);
	if r.is_some() {
		kill(ext, key);
	}
	r
}

/// Check to see if `key` has an explicit entry in storage.
pub fn exists(ext: &dyn Externalities, key: &[u8]) -> bool {
	ext.exists_storage(key)
}

/// Ensure `key` has no explicit entry in storage.
pub fn kill(ext: &mut dyn Externalities, key: &[u8]) {
	ext.clear_storage(key);
}

/// Remove all `storage_key` keys whose keys start with `prefix`.
///
/// At most `limit` keys are removed. Returns the number of keys removed and whether any are
/// left.
pub fn clear_prefix(ext: &mut dyn Externalities, prefix: &[u8], limit: Option<u32>) -> (u32, bool) {
	ext.clear_prefix(prefix, limit)
}

/// Get a Vec of bytes from storage.
pub fn get_raw(ext: &dyn Externalities, key: &[u8]) -> Option<Vec<u8>> {
	ext.storage(key)
}

/// Put a raw byte slice into storage.
pub fn put_raw(ext: &mut dyn Externalities, key: &[u8], value: &[u8]) {
	ext.set_storage(key.to_vec(), value.to_vec())
}
