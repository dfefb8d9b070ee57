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

//! Generic implementation of a block header.

use codec::{Decode, Encode};
use scale_info::TypeInfo;

use crate::{generic::Digest, BlockNumber, Externalities, Hash};

/// Abstraction over a block header for a substrate chain.
#[derive(Encode, Decode, PartialEq, Eq, Clone, Debug, TypeInfo, Default)]
pub struct Header {
	/// The parent hash.
	pub parent_hash: Hash,
	/// The block number.
	#[codec(compact)]
	pub number: BlockNumber,
	/// The state trie merkle root
	pub state_root: Hash,
	/// The merkle root of the extrinsics.
	pub extrinsics_root: Hash,
	/// A chain-specific digest of data useful for light clients or referencing auxiliary data.
	pub digest: Digest,
}

impl Header {
	pub fn new(
		number: BlockNumber,
		extrinsics_root: Hash,
		state_root: Hash,
		parent_hash: Hash,
		digest: Digest,
	) -> Self {
		Self { number, extrinsics_root, state_root, parent_hash, digest }
	}

	/// Convenience helper for computing the hash of the header without having
	/// to import the trait.
	pub fn hash(&self, ext: &dyn Externalities) -> Hash {
		Hash::from(ext.blake2_256(&self.encode()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use crate::{generic::DigestItem, testing::TestExt};

	#[test]
	fn number_is_compact_encoded() {
		let header = Header { number: 5, ..Default::default() };
		let encoded = header.encode();
		// parent hash, compact(5), state root, extrinsics root, empty digest
		assert_eq!(encoded.len(), 32 + 1 + 32 + 32 + 1);
		assert_eq!(encoded[32], 5 << 2);
	}

	#[test]
	fn hash_covers_the_digest() {
		let ext = TestExt::default();
		let mut header = Header::new(1, Hash::repeat_byte(1), Hash::repeat_byte(2), Hash::zero(), Default::default());
		let before = header.hash(&ext);
		header.digest.push(DigestItem::Other(vec![1]));
		assert_ne!(before, header.hash(&ext));
		assert_eq!(header.hash(&ext), Hash::from(sp_crypto_hashing::blake2_256(&header.encode())));
	}
}
