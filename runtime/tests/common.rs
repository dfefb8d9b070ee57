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

#![allow(dead_code)]

use codec::{Decode, Encode};
use sp_core::{ecdsa, ed25519, sr25519, Pair};
use stf_primitives::{
	generic::{Digest, DigestItem, Era},
	inherent::InherentData,
	Abort, Externalities, MultiSignature,
};
use stf_runtime::{
	AccountId, Address, Balance, BlockNumber, Header, Nonce, Runtime, RuntimeCall,
	RuntimeExecutor, RuntimeGenesisConfig, SignedExtra, SignedPayload, UncheckedExtrinsic,
	DOLLARS, SLOT_DURATION,
};
use stf_state_machine::TestExternalities;
use stf_support::traits::BuildGenesisConfig;
use stf_system::hash69;
use stf_transaction_payment::ChargeTransactionPayment;

/// Funds of every endowed account at genesis.
pub const ENDOWMENT: Balance = 1_000 * DOLLARS;

/// A key pair able to sign transactions of the runtime.
pub enum Signer {
	Sr25519(sr25519::Pair),
	Ed25519(ed25519::Pair),
	Ecdsa(ecdsa::Pair),
}

impl Signer {
	pub fn account(&self) -> AccountId {
		match self {
			Signer::Sr25519(pair) => AccountId::from(pair.public().0),
			Signer::Ed25519(pair) => AccountId::from(pair.public().0),
			Signer::Ecdsa(pair) => {
				AccountId::from(sp_crypto_hashing::blake2_256(pair.public().as_ref()))
			},
		}
	}

	pub fn sign(&self, payload: &[u8]) -> MultiSignature {
		match self {
			Signer::Sr25519(pair) => pair.sign(payload).into(),
			Signer::Ed25519(pair) => pair.sign(payload).into(),
			Signer::Ecdsa(pair) => pair.sign(payload).into(),
		}
	}
}

pub fn alice() -> Signer {
	Signer::Sr25519(sr25519::Pair::from_string("//Alice", None).expect("static values are valid"))
}

pub fn bob() -> Signer {
	Signer::Ed25519(ed25519::Pair::from_string("//Bob", None).expect("static values are valid"))
}

pub fn charlie() -> Signer {
	Signer::Sr25519(
		sr25519::Pair::from_string("//Charlie", None).expect("static values are valid"),
	)
}

pub fn dave() -> Signer {
	Signer::Ecdsa(ecdsa::Pair::from_string("//Dave", None).expect("static values are valid"))
}

pub fn aura_authority() -> sr25519::Public {
	sr25519::Pair::from_string("//Alice", None).expect("static values are valid").public()
}

pub fn grandpa_authority() -> ed25519::Public {
	ed25519::Pair::from_string("//Alice", None).expect("static values are valid").public()
}

/// State after genesis: Alice, Bob and Dave endowed, Alice the only Aura and GRANDPA authority.
pub fn new_test_ext() -> TestExternalities {
	sp_tracing::try_init_simple();

	let mut genesis = RuntimeGenesisConfig::default();
	genesis.balances.balances = vec![
		(alice().account(), ENDOWMENT),
		(bob().account(), ENDOWMENT),
		(dave().account(), ENDOWMENT),
	];
	genesis.aura.authorities = vec![aura_authority()];
	genesis.grandpa.authorities = vec![(grandpa_authority(), 1)];

	let mut t = TestExternalities::new_empty();
	t.execute_with(|ext| genesis.build(ext));
	t.commit_all().unwrap();
	t
}

pub fn extra(nonce: Nonce, tip: Balance) -> SignedExtra {
	(
		stf_system::CheckNonZeroSender::new(),
		stf_system::CheckSpecVersion::new(),
		stf_system::CheckTxVersion::new(),
		stf_system::CheckGenesis::new(),
		stf_system::CheckMortality::from(Era::Immortal),
		stf_system::CheckNonce::from(nonce),
		stf_system::CheckWeight::new(),
		ChargeTransactionPayment::from(tip),
	)
}

/// Sign `call` on behalf of `signer` against the state of `ext`.
pub fn sign(
	ext: &dyn Externalities,
	signer: &Signer,
	call: RuntimeCall,
	nonce: Nonce,
) -> UncheckedExtrinsic {
	let extra = extra(nonce, 0);
	let payload = SignedPayload::new(ext, call.clone(), extra.clone()).unwrap();
	let signature = payload.using_encoded(ext, |bytes| signer.sign(bytes));
	UncheckedExtrinsic::new_signed(call, Address::Id(signer.account()), signature, extra)
}

pub fn signed(
	t: &mut TestExternalities,
	signer: &Signer,
	call: RuntimeCall,
	nonce: Nonce,
) -> UncheckedExtrinsic {
	t.execute_with(|ext| sign(&*ext, signer, call, nonce))
}

pub fn transfer(dest: &Signer, value: Balance) -> RuntimeCall {
	RuntimeCall::Balances(stf_balances::Call::transfer {
		dest: Address::Id(dest.account()),
		value,
	})
}

pub fn set_timestamp(now: u64) -> UncheckedExtrinsic {
	UncheckedExtrinsic::new_unsigned(RuntimeCall::Timestamp(stf_timestamp::Call::set { now }))
}

pub fn timestamp_data(now: u64) -> InherentData {
	let mut data = InherentData::new();
	data.put_data(stf_timestamp::INHERENT_IDENTIFIER, &now).unwrap();
	data
}

/// Header of block `number` on top of genesis, authored in slot `number`.
pub fn header(number: BlockNumber) -> Header {
	slot_header(number, number)
}

/// Header of block `number` on top of genesis, authored in `slot`.
pub fn slot_header(number: BlockNumber, slot: u64) -> Header {
	let digest = Digest {
		logs: vec![DigestItem::PreRuntime(stf_aura::AURA_ENGINE_ID, slot.encode())],
	};
	Header::new(number, Default::default(), Default::default(), hash69(), digest)
}

/// Call the runtime API `method` and decode its output.
pub fn call<R: Decode>(
	t: &mut TestExternalities,
	method: &str,
	input: impl Encode,
) -> Result<R, Abort> {
	t.call(&RuntimeExecutor, method, &input.encode())
		.map(|out| R::decode(&mut &out[..]).expect("runtime returned a valid encoding"))
}

/// Author block #1 out of the timestamp inherent for `now` and `xts` through the runtime API, in
/// the slot `now` falls into.
pub fn author_block(
	t: &mut TestExternalities,
	now: u64,
	xts: Vec<UncheckedExtrinsic>,
) -> stf_runtime::Block {
	call::<()>(t, "Core_initialize_block", slot_header(1, now / SLOT_DURATION)).unwrap();

	let mut extrinsics: Vec<UncheckedExtrinsic> =
		call(t, "BlockBuilder_inherent_extrinsics", timestamp_data(now)).unwrap();
	extrinsics.extend(xts);

	for xt in &extrinsics {
		let applied: stf_primitives::ApplyExtrinsicResult =
			call(t, "BlockBuilder_apply_extrinsic", xt).unwrap();
		assert_eq!(applied, Ok(Ok(())));
	}

	let header: Header = call(t, "BlockBuilder_finalize_block", ()).unwrap();
	stf_runtime::Block::new(header, extrinsics)
}

pub fn events(t: &mut TestExternalities) -> Vec<stf_runtime::RuntimeEvent> {
	t.execute_with(|ext| {
		stf_system::Pallet::<Runtime>::events(&*ext).into_iter().map(|r| r.event).collect()
	})
}
