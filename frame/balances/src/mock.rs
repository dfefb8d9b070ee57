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

//! Test utilities

use super::*;
use crate as pallet_balances;

use core::any::TypeId;
use stf_primitives::{
	traits::{ConstU128, ConstU32, ConstU64, Dispatchable, IdentityLookup},
	version::RuntimeVersion,
	RuntimeDbWeight,
};
use stf_state_machine::TestExternalities;
use stf_support::traits::PalletInfo;
use stf_system::limits;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Test;

pub type System = stf_system::Pallet<Test>;
pub type Balances = Pallet<Test>;

#[derive(Encode, Decode, Clone, PartialEq, Eq, Debug, TypeInfo)]
pub enum RuntimeCall {
	#[codec(index = 0)]
	System(stf_system::Call<Test>),
	#[codec(index = 4)]
	Balances(pallet_balances::Call<Test>),
}

impl From<stf_system::Call<Test>> for RuntimeCall {
	fn from(call: stf_system::Call<Test>) -> Self {
		RuntimeCall::System(call)
	}
}

impl From<pallet_balances::Call<Test>> for RuntimeCall {
	fn from(call: pallet_balances::Call<Test>) -> Self {
		RuntimeCall::Balances(call)
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
			RuntimeCall::Balances(call) => call.dispatch_bypass_filter(ext, origin),
		}
	}
}

impl GetDispatchInfo for RuntimeCall {
	fn get_dispatch_info(&self) -> DispatchInfo {
		match self {
			RuntimeCall::System(call) => call.get_dispatch_info(),
			RuntimeCall::Balances(call) => call.get_dispatch_info(),
		}
	}
}

#[derive(Encode, Decode, Clone, PartialEq, Eq, Debug, TypeInfo)]
pub enum RuntimeEvent {
	#[codec(index = 0)]
	System(stf_system::Event<Test>),
	#[codec(index = 4)]
	Balances(pallet_balances::Event<Test>),
}

impl From<stf_system::Event<Test>> for RuntimeEvent {
	fn from(event: stf_system::Event<Test>) -> Self {
		RuntimeEvent::System(event)
	}
}

impl From<pallet_balances::Event<Test>> for RuntimeEvent {
	fn from(event: pallet_balances::Event<Test>) -> Self {
		RuntimeEvent::Balances(event)
	}
}

pub struct MockPalletInfo;

impl PalletInfo for MockPalletInfo {
	fn index<P: 'static>() -> Option<usize> {
		let t = TypeId::of::<P>();
		if t == TypeId::of::<System>() {
			Some(0)
		} else if t == TypeId::of::<Balances>() {
			Some(4)
		} else {
			None
		}
	}

	fn name<P: 'static>() -> Option<&'static str> {
		match Self::index::<P>()? {
			0 => Some("System"),
			_ => Some("Balances"),
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
	type AccountData = AccountData;
	type OnNewAccount = ();
	type OnKilledAccount = ();
	type MaxConsumers = ConstU32<16>;
	type SystemWeightInfo = ();
}

impl Config for Test {
	type RuntimeEvent = RuntimeEvent;
	type ExistentialDeposit = ConstU128<10>;
	type AccountStore = System;
	type WeightInfo = ();
}

/// Builds the test externalities with the given endowments.
pub struct ExtBuilder {
	balances: Vec<(u64, Balance)>,
}

impl Default for ExtBuilder {
	fn default() -> Self {
		Self { balances: vec![(1, 100), (2, 200), (3, 300), (4, 400)] }
	}
}

impl ExtBuilder {
	pub fn balances(mut self, balances: Vec<(u64, Balance)>) -> Self {
		self.balances = balances;
		self
	}

	pub fn build(self) -> TestExternalities {
		let mut t = TestExternalities::new_empty();
		t.execute_with(|ext| {
			stf_system::GenesisConfig::<Test>::default().build(ext);
			pallet_balances::GenesisConfig::<Test> { balances: self.balances }.build(ext);
			System::set_block_number(ext, 1);
		});
		t.commit_all().expect("no transactions are open after building genesis; qed");
		t
	}
}

/// The balances events deposited so far, in order.
pub(crate) fn balances_events(ext: &dyn Externalities) -> Vec<pallet_balances::Event<Test>> {
	System::events(ext)
		.into_iter()
		.filter_map(|r| match r.event {
			RuntimeEvent::Balances(e) => Some(e),
			_ => None,
		})
		.collect()
}
