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

//! Hash utilities for map keys.

use stf_primitives::Externalities;

/// Hasher to use to hash keys to insert to storage.
pub trait StorageHasher: 'static {
	/// Hash `x` into the suffix appended to a map prefix.
	fn hash(ext: &dyn Externalities, x: &[u8]) -> Vec<u8>;
}

/// Hasher to use to hash keys to insert to storage.
///
/// Reversible hasher store the encoded key after the hash part.
pub trait ReversibleStorageHasher: StorageHasher {
	/// Split the hash part out of the input.
	///
	/// I.e. for input `&[hash ++ key ++ some]` returns `&[key ++ some]`
	fn reverse(x: &[u8]) -> &[u8];
}

/// Store the key directly.
pub struct Identity;
impl StorageHasher for Identity {
	fn hash(_ext: &dyn Externalities, x: &[u8]) -> Vec<u8> {
		x.to_vec()
	}
}
impl ReversibleStorageHasher for Identity {
	fn reverse(x: &[u8]) -> &[u8] {
		x
	}
}

/// Hash storage keys with `concat(twox64(key), key)`
pub struct Twox64Concat;
impl StorageHasher for Twox64Concat {
	fn hash(ext: &dyn Externalities, x: &[u8]) -> Vec<u8> {
		ext.twox_64(x).iter().chain(x.iter()).cloned().collect()
	}
}
impl ReversibleStorageHasher for Twox64Concat {
	fn reverse(x: &[u8]) -> &[u8] {
		if x.len() < 8 {
			log::error!(target: crate::LOG_TARGET, "Invalid reverse: hash length too short");
			return &[]
		}
		&x[8..]
	}
}

/// Hash storage keys with `concat(blake2_128(key), key)`
#[allow(non_camel_case_types)]
pub struct Blake2_128Concat;
impl StorageHasher for Blake2_128Concat {
	fn hash(ext: &dyn Externalities, x: &[u8]) -> Vec<u8> {
		ext.blake2_128(x).iter().chain(x.iter()).cloned().collect()
	}
}
impl ReversibleStorageHasher for Blake2_128Concat {
	fn reverse(x: &[u8]) -> &[u8] {
		if x.len() < 16 {
			log::error!(target: crate::LOG_TARGET, "Invalid reverse: hash length too short");
			return &[]
		}
		&x[16..]
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use stf_state_machine::TestExternalities;

	#[test]
	fn test_twox_64_concat() {
		let mut t = TestExternalities::new_empty();
		t.execute_with(|ext| {
			let r = Twox64Concat::hash(ext, b"foo");
			assert_eq!(r.split_at(8), (&sp_crypto_hashing::twox_64(b"foo")[..], &b"foo"[..]));
			assert_eq!(Twox64Concat::reverse(&r), b"foo");
		});
	}

	#[test]
	fn test_blake2_128_concat() {
		let mut t = TestExternalities::new_empty();
		t.execute_with(|ext| {
			let r = Blake2_128Concat::hash(ext, b"foo");
			assert_eq!(r.split_at(16), (&sp_crypto_hashing::blake2_128(b"foo")[..], &b"foo"[..]));
			assert_eq!(Blake2_128Concat::reverse(&r), b"foo");
		});
	}

	#[test]
	fn reverse_of_short_input_is_empty() {
		assert!(Blake2_128Concat::reverse(&[1, 2, 3]).is_empty());
		assert_eq!(Identity::reverse(&[1, 2, 3]), &[1u8, 2, 3][..]);
	}
}
