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
use crate as pallet_transaction_payment;

use core::any::TypeId;
use stf_primitives::{
	traits::{ConstU128, ConstU32, ConstU64, ConstU8, Dispatchable, IdentityLookup},
	version::RuntimeVersion,
	DispatchResultWithPostInfo, RuntimeDbWeight,
};
use stf_state_machine::TestExternalities;
use stf_support::{dispatch::UnfilteredDispatchable, traits::PalletInfo};
use stf_system::{limits, OriginFor};

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Test;

pub type System = stf_system::Pallet<Test>;
pub type Balances = stf_balances::Pallet<Test>;
pub type TransactionPayment = Pallet<Test>;

#[derive(Encode, Decode, Clone, PartialEq, Eq, Debug, TypeInfo)]
pub enum RuntimeCall {
	#[codec(index = 0)]
	System(stf_system::Call<Test>),
	#[codec(index = 4)]
	Balances(stf_balances::Call<Test>),
}

impl From<stf_system::Call<Test>> for RuntimeCall {
	fn from(call: stf_system::Call<Test>) -> Self {
		RuntimeCall::System(call)
	}
}

impl From<stf_balances::Call<Test>> for RuntimeCall {
	fn from(call: stf_balances::Call<Test>) -> Self {
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

pub const CALL: &RuntimeCall =
	&RuntimeCall::Balances(stf_balances::Call::transfer { dest: 2, value: 69 });

#[derive(Encode, Decode, Clone, PartialEq, Eq, Debug, TypeInfo)]
pub enum RuntimeEvent {
	#[codec(index = 0)]
	System(stf_system::Event<Test>),
	#[codec(index = 4)]
	Balances(stf_balances::Event<Test>),
	#[codec(index = 5)]
	TransactionPayment(pallet_transaction_payment::Event<Test>),
}

impl From<stf_system::Event<Test>> for RuntimeEvent {
	fn from(event: stf_system::Event<Test>) -> Self {
		RuntimeEvent::System(event)
	}
}

impl From<stf_balances::Event<Test>> for RuntimeEvent {
	fn from(event: stf_balances::Event<Test>) -> Self {
		RuntimeEvent::Balances(event)
	}
}

impl From<pallet_transaction_payment::Event<Test>> for RuntimeEvent {
	fn from(event: pallet_transaction_payment::Event<Test>) -> Self {
		RuntimeEvent::TransactionPayment(event)
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
		} else if t == TypeId::of::<TransactionPayment>() {
			Some(5)
		} else {
			None
		}
	}

	fn name<P: 'static>() -> Option<&'static str> {
		match Self::index::<P>()? {
			0 => Some("System"),
			4 => Some("Balances"),
			_ => Some("TransactionPayment"),
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
	pub BlockWeights: limits::BlockWeights = limits::BlockWeights::builder()
		.base_block(Weight::zero())
		.for_class(DispatchClass::all(), |weights| {
			weights.base_extrinsic = Weight::from_parts(100, 0);
		})
		.for_class(DispatchClass::non_mandatory(), |weights| {
			weights.max_total = Some(Weight::from_parts(1024, u64::MAX));
		})
		.build_or_panic();
	pub BlockLength: limits::BlockLength = limits::BlockLength::max(2048);
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
	type AccountData = stf_balances::AccountData;
	type OnNewAccount = ();
	type OnKilledAccount = ();
	type MaxConsumers = ConstU32<16>;
	type SystemWeightInfo = ();
}

impl stf_balances::Config for Test {
	type RuntimeEvent = RuntimeEvent;
	type ExistentialDeposit = ConstU128<1>;
	type AccountStore = System;
	type WeightInfo = ();
}

impl Config for Test {
	type RuntimeEvent = RuntimeEvent;
	type OnChargeTransaction = CurrencyAdapter<Balances>;
	type OperationalFeeMultiplier = ConstU8<5>;
	type WeightToFee = IdentityFee;
	type LengthToFee = ConstantMultiplier<ConstU128<1>>;
	type FeeMultiplierUpdate = ();
}

pub struct ExtBuilder {
	balance_factor: Balance,
	multiplier: Multiplier,
}

impl Default for ExtBuilder {
	fn default() -> Self {
		Self { balance_factor: 1, multiplier: MULTIPLIER_DEFAULT }
	}
}

impl ExtBuilder {
	pub fn balance_factor(mut self, factor: Balance) -> Self {
		self.balance_factor = factor;
		self
	}

	pub fn multiplier(mut self, multiplier: Multiplier) -> Self {
		self.multiplier = multiplier;
		self
	}

	pub fn build(self) -> TestExternalities {
		let mut t = TestExternalities::new_empty();
		let balances = if self.balance_factor > 0 {
			vec![
				(1, 10 * self.balance_factor),
				(2, 20 * self.balance_factor),
				(3, 30 * self.balance_factor),
				(4, 40 * self.balance_factor),
				(5, 50 * self.balance_factor),
				(6, 60 * self.balance_factor),
			]
		} else {
			vec![]
		};
		t.execute_with(|ext| {
			stf_system::GenesisConfig::<Test>::default().build(ext);
			stf_balances::GenesisConfig::<Test> { balances }.build(ext);
			pallet_transaction_payment::GenesisConfig::<Test> {
				multiplier: self.multiplier,
				..Default::default()
			}
			.build(ext);
			System::set_block_number(ext, 1);
		});
		t.commit_all().expect("no transactions are open after building genesis; qed");
		t
	}
}

/// The fee-paid events deposited so far, in order.
pub(crate) fn fee_paid_events(ext: &dyn Externalities) -> Vec<pallet_transaction_payment::Event<Test>> {
	System::events(ext)
		.into_iter()
		.filter_map(|r| match r.event {
			RuntimeEvent::TransactionPayment(e) => Some(e),
			_ => None,
		})
		.collect()
}
