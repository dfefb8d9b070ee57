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

use super::*;
use crate as pallet_aura;

use codec::{Decode, Encode};
use core::any::TypeId;
use scale_info::TypeInfo;
use stf_primitives::{
	generic::{Digest, DigestItem},
	traits::{ConstU32, ConstU64, Dispatchable, GetDispatchInfo, IdentityLookup},
	version::RuntimeVersion,
	DispatchInfo, DispatchResultWithPostInfo, RuntimeDbWeight,
};
use stf_state_machine::TestExternalities;
use stf_support::{dispatch::UnfilteredDispatchable, traits::PalletInfo};
use stf_system::{limits, OriginFor};

pub const SLOT_DURATION: Moment = 2;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Test;

pub type System = stf_system::Pallet<Test>;
pub type Aura = pallet_aura::Pallet<Test>;

#[derive(Encode, Decode, Clone, PartialEq, Eq, Debug, TypeInfo)]
pub enum RuntimeCall {
	#[codec(index = 0)]
	System(stf_system::Call<Test>),
}

impl From<stf_system::Call<Test>> for RuntimeCall {
	fn from(call: stf_system::Call<Test>) -> Self {
		RuntimeCall::System(call)
	}
}

impl Dispatchable for RuntimeCall {
	type RuntimeOrigin = OriginFor<Test>;

	fn dispatch(
		self,
		ext: &mut dyn Externalities,
		origin: Self::RuntimeOrigin,
	) -> DispatchResultWithPostInfo {
		match self {
			RuntimeCall::System(call) => call.dispatch_bypass_filter(ext, origin),
		}
	}
}

impl GetDispatchInfo for RuntimeCall {
	fn get_dispatch_info(&self) -> DispatchInfo {
		match self {
			RuntimeCall::System(call) => call.get_dispatch_info(),
		}
	}
}

#[derive(Encode, Decode, Clone, PartialEq, Eq, Debug, TypeInfo)]
pub enum RuntimeEvent {
	#[codec(index = 0)]
	System(stf_system::Event<Test>),
}

impl From<stf_system::Event<Test>> for RuntimeEvent {
	fn from(event: stf_system::Event<Test>) -> Self {
		RuntimeEvent::System(event)
	}
}

pub struct MockPalletInfo;

impl PalletInfo for MockPalletInfo {
	fn index<P: 'static>() -> Option<usize> {
		let t = TypeId::of::<P>();
		if t == TypeId::of::<System>() {
			Some(0)
		} else if t == TypeId::of::<Aura>() {
			Some(1)
		} else {
			None
		}
	}

	fn name<P: 'static>() -> Option<&'static str> {
		match Self::index::<P>()? {
			0 => Some("System"),
			_ => Some("Aura"),
		}
	}
}

stf_support::parameter_types! {
	pub Version: RuntimeVersion = RuntimeVersion {
		spec_name: "test".into(),
		spec_version: 1,
		state_version: 1,
		..Default::default()
	};
	pub const DbWeight: RuntimeDbWeight = RuntimeDbWeight { read: 10, write: 100 };
	pub BlockWeights: limits::BlockWeights =
		limits::BlockWeights::simple_max(Weight::from_parts(1024, u64::MAX));
	pub BlockLength: limits::BlockLength = limits::BlockLength::max(1024);
}

impl stf_system::Config for Test {
	type AccountId = u64;
	type Lookup = IdentityLookup<u64>;
	type RuntimeCall = RuntimeCall;
	type RuntimeEvent = RuntimeEvent;
	type PalletInfo = MockPalletInfo;
	type BlockWeights = BlockWeights;
	type BlockLength = BlockLength;
	type DbWeight = DbWeight;
	type BlockHashCount = ConstU64<250>;
	type Version = Version;
	type AccountData = ();
	type OnNewAccount = ();
	type OnKilledAccount = ();
	type MaxConsumers = ConstU32<16>;
	type SystemWeightInfo = ();
}

impl Config for Test {
	type MaxAuthorities = ConstU32<3>;
	type SlotDuration = ConstU64<SLOT_DURATION>;
}

pub fn authority(byte: u8) -> AuthorityId {
	sr25519::Public::from_raw([byte; 32])
}

/// The digest item announcing `slot`.
pub fn slot_digest(slot: Slot) -> DigestItem {
	DigestItem::PreRuntime(AURA_ENGINE_ID, slot.encode())
}

/// Start block `number` with the given digest logs.
pub fn initialize_block(ext: &mut dyn Externalities, number: BlockNumber, logs: Vec<DigestItem>) {
	let parent_hash = System::parent_hash(&*ext);
	System::initialize(ext, number, &parent_hash, &Digest { logs });
}

pub fn new_test_ext(authorities: Vec<u8>) -> TestExternalities {
	let mut t = TestExternalities::new_empty();
	t.execute_with(|ext| {
		stf_system::GenesisConfig::<Test>::default().build(ext);
		pallet_aura::GenesisConfig::<Test> {
			authorities: authorities.into_iter().map(authority).collect(),
			_config: PhantomData,
		}
		.build(ext);
	});
	t
}
