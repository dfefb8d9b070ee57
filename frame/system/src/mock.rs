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

use crate::{self as system, *};
use core::any::TypeId;
use std::borrow::Cow;
use stf_primitives::{
	traits::{ConstU32, ConstU64, IdentityLookup},
	version::RuntimeVersion,
	Perbill,
};
use std::sync::Arc;
use stf_state_machine::{ReadRuntimeVersion, TestExternalities};

const NORMAL_DISPATCH_RATIO: Perbill = Perbill::from_percent(75);
const MAX_BLOCK_WEIGHT: Weight = Weight::from_parts(1024, u64::MAX);

/// Storage key under which [`RecordKilled`] keeps the reaped accounts.
pub const KILLED_KEY: &[u8] = b":test:killed";

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Test;

pub type System = Pallet<Test>;

#[derive(Encode, Decode, Clone, PartialEq, Eq, Debug, TypeInfo)]
pub enum RuntimeCall {
	#[codec(index = 0)]
	System(system::Call<Test>),
}

impl From<system::Call<Test>> for RuntimeCall {
	fn from(call: system::Call<Test>) -> Self {
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
	System(system::Event<Test>),
}

impl From<system::Event<Test>> for RuntimeEvent {
	fn from(event: system::Event<Test>) -> Self {
		RuntimeEvent::System(event)
	}
}

pub struct MockPalletInfo;

impl PalletInfo for MockPalletInfo {
	fn index<P: 'static>() -> Option<usize> {
		(TypeId::of::<P>() == TypeId::of::<System>()).then_some(0)
	}

	fn name<P: 'static>() -> Option<&'static str> {
		(TypeId::of::<P>() == TypeId::of::<System>()).then_some("System")
	}
}

stf_support::parameter_types! {
	pub Version: RuntimeVersion = RuntimeVersion {
		spec_name: Cow::Borrowed("test"),
		impl_name: Cow::Borrowed("system-test"),
		authoring_version: 1,
		spec_version: 1,
		impl_version: 1,
		apis: Cow::Borrowed(&[]),
		transaction_version: 1,
		state_version: 1,
	};
	pub const DbWeight: RuntimeDbWeight = RuntimeDbWeight {
		read: 10,
		write: 100,
	};
	pub RuntimeBlockWeights: limits::BlockWeights = limits::BlockWeights::builder()
		.base_block(Weight::from_parts(10, 0))
		.for_class(DispatchClass::all(), |weights| {
			weights.base_extrinsic = Weight::from_parts(5, 0);
		})
		.for_class(DispatchClass::Normal, |weights| {
			weights.max_total = Some(NORMAL_DISPATCH_RATIO * MAX_BLOCK_WEIGHT);
		})
		.for_class(DispatchClass::Operational, |weights| {
			weights.base_extrinsic = Weight::from_parts(10, 0);
			weights.max_total = Some(MAX_BLOCK_WEIGHT);
			weights.reserved = Some(
				MAX_BLOCK_WEIGHT - NORMAL_DISPATCH_RATIO * MAX_BLOCK_WEIGHT
			);
		})
		.avg_block_initialization(Perbill::from_percent(0))
		.build_or_panic();
	pub RuntimeBlockLength: limits::BlockLength =
		limits::BlockLength::max_with_normal_ratio(1024, NORMAL_DISPATCH_RATIO);
}

/// Appends every reaped account to [`KILLED_KEY`].
pub struct RecordKilled;

impl OnKilledAccount<u64> for RecordKilled {
	fn on_killed_account(ext: &mut dyn Externalities, who: &u64) {
		let mut killed: Vec<u64> = unhashed::get_or_default(&*ext, KILLED_KEY);
		killed.push(*who);
		unhashed::put(ext, KILLED_KEY, &killed);
	}
}

impl Config for Test {
	type AccountId = u64;
	type Lookup = IdentityLookup<u64>;
	type RuntimeCall = RuntimeCall;
	type RuntimeEvent = RuntimeEvent;
	type PalletInfo = MockPalletInfo;
	type BlockWeights = RuntimeBlockWeights;
	type BlockLength = RuntimeBlockLength;
	type DbWeight = DbWeight;
	type BlockHashCount = ConstU64<10>;
	type Version = Version;
	type AccountData = u32;
	type OnNewAccount = ();
	type OnKilledAccount = RecordKilled;
	type MaxConsumers = ConstU32<16>;
	type SystemWeightInfo = ();
}

pub const CALL: &<Test as Config>::RuntimeCall =
	&RuntimeCall::System(system::Call::set_heap_pages { pages: 0u64 });

/// Accounts reaped so far.
pub fn killed(ext: &dyn Externalities) -> Vec<u64> {
	unhashed::get_or_default(ext, KILLED_KEY)
}

/// Treats runtime code as the SCALE encoded version it carries.
pub struct CodeIsVersion;

impl ReadRuntimeVersion for CodeIsVersion {
	fn read_runtime_version(&self, code: &[u8]) -> Result<Vec<u8>, String> {
		Ok(code.to_vec())
	}
}

/// Runtime code understood by [`CodeIsVersion`].
pub fn code_with_version(spec_name: &'static str, spec_version: u32) -> Vec<u8> {
	RuntimeVersion { spec_name: spec_name.into(), spec_version, ..Version::get() }.encode()
}

/// Create new externalities for `System` module tests.
pub fn new_test_ext() -> TestExternalities {
	let mut ext = TestExternalities::new_empty();
	ext.register_runtime_version_reader(Arc::new(CodeIsVersion));
	ext.execute_with(|ext| {
		system::GenesisConfig::<Test>::default().build(ext);
		// Add to each test the initial weight of a block
		System::register_extra_weight_unchecked(
			ext,
			<Test as Config>::BlockWeights::get().base_block,
			DispatchClass::Mandatory,
		);
	});
	ext
}
