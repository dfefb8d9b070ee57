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

//! Signature of a transaction.

use codec::{Decode, Encode};
use sp_core::{ecdsa, ed25519, sr25519};

use crate::{traits::Verify, AccountId32, Externalities};

/// Signature verify that can work with any known signature types.
///
/// The signer is an `AccountId32` holding the raw public key of the scheme. ECDSA public keys
/// are 33 bytes, so an ECDSA signer is the blake2-256 hash of its compressed public key.
#[derive(Eq, PartialEq, Clone, Encode, Decode, Debug, scale_info::TypeInfo)]
pub enum MultiSignature {
	/// An Ed25519 signature.
	Ed25519(ed25519::Signature),
	/// An Sr25519 signature.
	Sr25519(sr25519::Signature),
	/// An ECDSA/SECP256k1 signature over the blake2-256 hash of the message.
	Ecdsa(ecdsa::Signature),
}

impl From<ed25519::Signature> for MultiSignature {
	fn from(x: ed25519::Signature) -> Self {
		Self::Ed25519(x)
	}
}

impl From<sr25519::Signature> for MultiSignature {
	fn from(x: sr25519::Signature) -> Self {
		Self::Sr25519(x)
	}
}

impl From<ecdsa::Signature> for MultiSignature {
	fn from(x: ecdsa::Signature) -> Self {
		Self::Ecdsa(x)
	}
}

impl Verify for MultiSignature {
	type Signer = AccountId32;

	fn verify(&self, ext: &dyn Externalities, msg: &[u8], signer: &AccountId32) -> bool {
		let raw: &[u8; 32] = signer.as_ref();
		match self {
			Self::Ed25519(sig) => ext.ed25519_verify(sig, msg, &ed25519::Public::from_raw(*raw)),
			Self::Sr25519(sig) => ext.sr25519_verify(sig, msg, &sr25519::Public::from_raw(*raw)),
			Self::Ecdsa(sig) => {
				let hash = ext.blake2_256(msg);
				match ext.ecdsa_recover_compressed(sig, &hash) {
					Some(public) => &ext.blake2_256(public.as_ref()) == raw,
					None => {
						log::debug!(target: "runtime", "Failed to recover the ECDSA signer");
						false
					},
				}
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::TestExt;
	use sp_core::Pair;

	#[test]
	fn verifies_both_schemes() {
		let ext = TestExt::default();
		let msg = b"hello world";

		let sr = sr25519::Pair::from_seed(&[1u8; 32]);
		let ed = ed25519::Pair::from_seed(&[2u8; 32]);

		let sr_signer = AccountId32::from(sr.public().0);
		let ed_signer = AccountId32::from(ed.public().0);

		assert!(MultiSignature::from(sr.sign(msg)).verify(&ext, msg, &sr_signer));
		assert!(MultiSignature::from(ed.sign(msg)).verify(&ext, msg, &ed_signer));
		assert!(!MultiSignature::from(ed.sign(msg)).verify(&ext, b"hello worle", &ed_signer));
		assert!(!MultiSignature::from(ed.sign(msg)).verify(&ext, msg, &sr_signer));
	}

	#[test]
	fn ecdsa_signer_is_the_hash_of_the_public_key() {
		let ext = TestExt::default();
		let msg = b"hello world";
		let pair = ecdsa::Pair::from_seed(&[3u8; 32]);
		let signer = AccountId32::from(sp_crypto_hashing::blake2_256(pair.public().as_ref()));

		let signature = MultiSignature::from(pair.sign(msg));
		assert!(signature.verify(&ext, msg, &signer));
		assert!(!signature.verify(&ext, b"hello worle", &signer));
		// The raw 33 byte key is not an account.
		let mut raw = [0u8; 32];
		raw.copy_from_slice(&AsRef::<[u8]>::as_ref(&pair.public())[1..]);
		assert!(!signature.verify(&ext, msg, &AccountId32::from(raw)));

		let mut broken = pair.sign(msg);
		broken.0[64] = 9;
		assert!(!MultiSignature::from(broken).verify(&ext, msg, &signer));
	}

	#[test]
	fn variant_indices_match_the_wire_format() {
		let ed = ed25519::Pair::from_seed(&[2u8; 32]);
		let encoded = MultiSignature::from(ed.sign(b"x")).encode();
		assert_eq!(encoded.len(), 65);
		assert_eq!(encoded[0], 0);

		let sr = sr25519::Pair::from_seed(&[2u8; 32]);
		assert_eq!(MultiSignature::from(sr.sign(b"x")).encode()[0], 1);

		let ecdsa = ecdsa::Pair::from_seed(&[2u8; 32]);
		let encoded = MultiSignature::from(ecdsa.sign(b"x")).encode();
		assert_eq!(encoded.len(), 66);
		assert_eq!(encoded[0], 2);
	}
}
