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

//! The node template runtime.
//!
//! Composes the modules of this workspace into the state-transition function of a chain:
//!
//! - [`RuntimeCall`] and [`RuntimeEvent`] aggregate the calls and events of the modules under
//!   their module index.
//! - [`SignedExtra`] is the signed-extension chain every signed transaction carries.
//! - [`Executive`] drives the block lifecycle over [`AllModules`].
//! - [`RuntimeGenesisConfig`] builds the genesis state, including the Aura and GRANDPA authorities.
//! - [`apis`] exposes the runtime API entry points on SCALE encoded bytes.

pub mod apis;
mod genesis;

use core::any::TypeId;
use std::borrow::Cow;

use codec::{Decode, Encode};
use scale_info::TypeInfo;
use stf_primitives::{
	generic,
	multi_address::AccountIdLookup,
	traits::{Dispatchable, GetDispatchInfo, ValidateUnsigned},
	transaction_validity::{
		TransactionSource, TransactionValidity, TransactionValidityError, UnknownTransaction,
	},
	version::RuntimeVersion,
	weights::WEIGHT_REF_TIME_PER_SECOND,
	Abort, DispatchInfo, DispatchResultWithPostInfo, Externalities, KeyTypeId, MultiAddress,
	MultiSignature, Perbill, RuntimeDbWeight, Weight,
};
use stf_support::{
	dispatch::{Callable, CallableCallFor, GetCallName, IsSubType, UnfilteredDispatchable},
	inherent::InherentModule,
	parameter_types,
	traits::{ConstU32, ConstU64, ConstU8, PalletInfo},
};
use stf_system::{limits, OriginFor};
use stf_transaction_payment::{CurrencyAdapter, IdentityFee};

pub use apis::{dispatch, RuntimeExecutor, RUNTIME_API_VERSIONS};
pub use genesis::RuntimeGenesisConfig;
pub use stf_primitives::{AccountId, Balance, BlockNumber, Hash, Moment, Nonce};

/// Log target of the runtime glue.
pub const LOG_TARGET: &str = "runtime";

/// The address format for describing accounts.
pub type Address = MultiAddress<AccountId, ()>;

/// Signature of the transactions of this chain.
pub type Signature = MultiSignature;

/// Block header type as expected by this runtime.
pub type Header = generic::Header;

/// Block type as expected by this runtime.
pub type Block = generic::Block<UncheckedExtrinsic>;

/// The signed extensions that are added to the runtime.
pub type SignedExtra = (
	// Checks that the sender is not the zero address.
	stf_system::CheckNonZeroSender<Runtime>,
	// Checks that the runtime version is correct.
	stf_system::CheckSpecVersion<Runtime>,
	// Checks that the transaction version is correct.
	stf_system::CheckTxVersion<Runtime>,
	// Checks that the genesis hash is correct.
	stf_system::CheckGenesis<Runtime>,
	// Checks that the era is valid.
	stf_system::CheckMortality<Runtime>,
	// Checks that the nonce is valid.
	stf_system::CheckNonce<Runtime>,
	// Checks that the weight is valid.
	stf_system::CheckWeight<Runtime>,
	// Ensures that the sender has enough funds to pay for the transaction
	// and deducts the fee from the sender's account.
	stf_transaction_payment::ChargeTransactionPayment<Runtime>,
);

/// Unchecked extrinsic type as expected by this runtime.
pub type UncheckedExtrinsic =
	generic::UncheckedExtrinsic<Address, RuntimeCall, Signature, SignedExtra>;

/// The payload being signed in transactions.
pub type SignedPayload = generic::SignedPayload<RuntimeCall, SignedExtra>;

/// The session keys of a validator: one key per consensus engine.
#[derive(Encode, Decode, Clone, PartialEq, Eq, Debug, TypeInfo)]
pub struct SessionKeys {
	pub aura: stf_aura::AuthorityId,
	pub grandpa: stf_grandpa::AuthorityId,
}

impl SessionKeys {
	/// Generate a set of keys in the keystore of the host and return their encoding.
	///
	/// With a `seed`, the keys are derived from it as a secret URI.
	pub fn generate(ext: &dyn Externalities, seed: Option<Vec<u8>>) -> Result<Vec<u8>, Abort> {
		let seed = seed
			.map(String::from_utf8)
			.transpose()
			.map_err(|e| Abort::BadInput {
				method: "SessionKeys_generate_session_keys",
				reason: e.to_string(),
			})?;
		let aura = ext
			.sr25519_generate(KeyTypeId(stf_aura::KEY_TYPE), seed.as_deref())
			.ok_or(Abort::HostServiceUnavailable("keystore"))?;
		let grandpa = ext
			.ed25519_generate(KeyTypeId(stf_grandpa::KEY_TYPE), seed.as_deref())
			.ok_or(Abort::HostServiceUnavailable("keystore"))?;
		log::debug!(target: LOG_TARGET, "generated session keys");
		Ok(Self { aura, grandpa }.encode())
	}

	/// The raw public keys together with their key types.
	pub fn into_raw_public_keys(self) -> Vec<(Vec<u8>, KeyTypeId)> {
		vec![
			(self.aura.0.to_vec(), KeyTypeId(stf_aura::KEY_TYPE)),
			(self.grandpa.0.to_vec(), KeyTypeId(stf_grandpa::KEY_TYPE)),
		]
	}

	/// Decode encoded session keys into their raw public keys. `None` if `encoded` is not a set of
	/// session keys.
	pub fn decode_into_raw_public_keys(mut encoded: &[u8]) -> Option<Vec<(Vec<u8>, KeyTypeId)>> {
		let keys = Self::decode(&mut encoded).ok()?;
		encoded.is_empty().then(|| keys.into_raw_public_keys())
	}
}

/// Every module of the runtime, in the order their hooks run.
pub type AllModules = (System, Timestamp, Aura, Grandpa, Balances, TransactionPayment);

/// The modules providing inherents, in the order their inherents are created.
pub type InherentModules = (InherentModule<Timestamp>,);

/// Executive: handles dispatch to the various modules.
pub type Executive = stf_executive::Executive<
	Runtime,
	UncheckedExtrinsic,
	AccountIdLookup,
	Runtime,
	AllModules,
	InherentModules,
>;

// Time is measured in milliseconds.
pub const MILLISECS_PER_BLOCK: u64 = 6000;

// NOTE: Currently it is not possible to change the slot duration after the chain has started.
//       Attempting to do so will brick block production.
pub const SLOT_DURATION: u64 = MILLISECS_PER_BLOCK;

// Time is measured in number of blocks.
pub const MINUTES: BlockNumber = 60_000 / MILLISECS_PER_BLOCK;
pub const HOURS: BlockNumber = MINUTES * 60;
pub const DAYS: BlockNumber = HOURS * 24;

pub const MILLICENTS: Balance = 1_000_000_000;
pub const CENTS: Balance = 1_000 * MILLICENTS;
pub const DOLLARS: Balance = 100 * CENTS;

/// The smallest balance an account may hold.
pub const EXISTENTIAL_DEPOSIT: Balance = DOLLARS;

/// We allow `Normal` extrinsics to fill up the block up to 75%, the rest can be used
/// by Operational extrinsics.
const NORMAL_DISPATCH_RATIO: Perbill = Perbill::from_percent(75);

/// We allow for 2 seconds of compute with a 6 second average block time, with maximum proof size.
const MAXIMUM_BLOCK_WEIGHT: Weight =
	Weight::from_parts(WEIGHT_REF_TIME_PER_SECOND.saturating_mul(2), u64::MAX);

/// This runtime version.
pub const VERSION: RuntimeVersion = RuntimeVersion {
	spec_name: Cow::Borrowed("node-template"),
	impl_name: Cow::Borrowed("node-template"),
	authoring_version: 1,
	// The version of the runtime specification. A full node will not attempt to use its native
	//   runtime in substitute for the on-chain Wasm runtime unless all of `spec_name`,
	//   `spec_version`, and `authoring_version` are the same between Wasm and native.
	// This value is set to 100 to notify Polkadot-JS App (https://polkadot.js.org/apps) to use
	//   the compatible custom types.
	spec_version: 100,
	impl_version: 1,
	apis: RUNTIME_API_VERSIONS,
	transaction_version: 1,
	state_version: 1,
};

/// The runtime.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Runtime;

pub type System = stf_system::Pallet<Runtime>;
pub type Timestamp = stf_timestamp::Pallet<Runtime>;
pub type Aura = stf_aura::Pallet<Runtime>;
pub type Grandpa = stf_grandpa::Pallet<Runtime>;
pub type Balances = stf_balances::Pallet<Runtime>;
pub type TransactionPayment = stf_transaction_payment::Pallet<Runtime>;

impl Callable<Runtime> for System {
	type RuntimeCall = stf_system::Call<Runtime>;
}

impl Callable<Runtime> for Timestamp {
	type RuntimeCall = stf_timestamp::Call<Runtime>;
}

impl Callable<Runtime> for Balances {
	type RuntimeCall = stf_balances::Call<Runtime>;
}

/// The aggregated call of the runtime, indexed by module.
#[derive(Encode, Decode, Clone, PartialEq, Eq, Debug, TypeInfo)]
pub enum RuntimeCall {
	#[codec(index = 0)]
	System(CallableCallFor<System, Runtime>),
	#[codec(index = 1)]
	Timestamp(CallableCallFor<Timestamp, Runtime>),
	#[codec(index = 4)]
	Balances(CallableCallFor<Balances, Runtime>),
}

impl RuntimeCall {
	/// The name of the module and the name of the call, e.g. `("Balances", "transfer")`.
	pub fn names(&self) -> (&'static str, &'static str) {
		match self {
			RuntimeCall::System(call) => ("System", call.get_call_name()),
			RuntimeCall::Timestamp(call) => ("Timestamp", call.get_call_name()),
			RuntimeCall::Balances(call) => ("Balances", call.get_call_name()),
		}
	}
}

impl From<CallableCallFor<System, Runtime>> for RuntimeCall {
	fn from(call: CallableCallFor<System, Runtime>) -> Self {
		RuntimeCall::System(call)
	}
}

impl From<CallableCallFor<Timestamp, Runtime>> for RuntimeCall {
	fn from(call: CallableCallFor<Timestamp, Runtime>) -> Self {
		RuntimeCall::Timestamp(call)
	}
}

impl From<CallableCallFor<Balances, Runtime>> for RuntimeCall {
	fn from(call: CallableCallFor<Balances, Runtime>) -> Self {
		RuntimeCall::Balances(call)
	}
}

impl IsSubType<CallableCallFor<System, Runtime>> for RuntimeCall {
	fn is_sub_type(&self) -> Option<&CallableCallFor<System, Runtime>> {
		match self {
			RuntimeCall::System(call) => Some(call),
			_ => None,
		}
	}
}

impl IsSubType<CallableCallFor<Timestamp, Runtime>> for RuntimeCall {
	fn is_sub_type(&self) -> Option<&CallableCallFor<Timestamp, Runtime>> {
		match self {
			RuntimeCall::Timestamp(call) => Some(call),
			_ => None,
		}
	}
}

impl IsSubType<CallableCallFor<Balances, Runtime>> for RuntimeCall {
	fn is_sub_type(&self) -> Option<&CallableCallFor<Balances, Runtime>> {
		match self {
			RuntimeCall::Balances(call) => Some(call),
			_ => None,
		}
	}
}

impl Dispatchable for RuntimeCall {
	type RuntimeOrigin = OriginFor<Runtime>;

	fn dispatch(
		self,
		ext: &mut dyn Externalities,
		origin: Self::RuntimeOrigin,
	) -> DispatchResultWithPostInfo {
		match self {
			RuntimeCall::System(call) => call.dispatch_bypass_filter(ext, origin),
			RuntimeCall::Timestamp(call) => call.dispatch_bypass_filter(ext, origin),
			RuntimeCall::Balances(call) => call.dispatch_bypass_filter(ext, origin),
		}
	}
}

impl GetDispatchInfo for RuntimeCall {
	fn get_dispatch_info(&self) -> DispatchInfo {
		match self {
			RuntimeCall::System(call) => call.get_dispatch_info(),
			RuntimeCall::Timestamp(call) => call.get_dispatch_info(),
			RuntimeCall::Balances(call) => call.get_dispatch_info(),
		}
	}
}

/// The aggregated event of the runtime, indexed by module.
#[derive(Encode, Decode, Clone, PartialEq, Eq, Debug, TypeInfo)]
pub enum RuntimeEvent {
	#[codec(index = 0)]
	System(stf_system::Event<Runtime>),
	#[codec(index = 4)]
	Balances(stf_balances::Event<Runtime>),
	#[codec(index = 5)]
	TransactionPayment(stf_transaction_payment::Event<Runtime>),
}

impl From<stf_system::Event<Runtime>> for RuntimeEvent {
	fn from(event: stf_system::Event<Runtime>) -> Self {
		RuntimeEvent::System(event)
	}
}

impl From<stf_balances::Event<Runtime>> for RuntimeEvent {
	fn from(event: stf_balances::Event<Runtime>) -> Self {
		RuntimeEvent::Balances(event)
	}
}

impl From<stf_transaction_payment::Event<Runtime>> for RuntimeEvent {
	fn from(event: stf_transaction_payment::Event<Runtime>) -> Self {
		RuntimeEvent::TransactionPayment(event)
	}
}

/// Index and name of every module of the runtime.
pub struct RuntimePalletInfo;

impl RuntimePalletInfo {
	fn lookup<P: 'static>() -> Option<(usize, &'static str)> {
		let module = TypeId::of::<P>();
		if module == TypeId::of::<System>() {
			Some((0, "System"))
		} else if module == TypeId::of::<Timestamp>() {
			Some((1, "Timestamp"))
		} else if module == TypeId::of::<Aura>() {
			Some((2, "Aura"))
		} else if module == TypeId::of::<Grandpa>() {
			Some((3, "Grandpa"))
		} else if module == TypeId::of::<Balances>() {
			Some((4, "Balances"))
		} else if module == TypeId::of::<TransactionPayment>() {
			Some((5, "TransactionPayment"))
		} else {
			None
		}
	}
}

impl PalletInfo for RuntimePalletInfo {
	fn index<P: 'static>() -> Option<usize> {
		Self::lookup::<P>().map(|(index, _)| index)
	}

	fn name<P: 'static>() -> Option<&'static str> {
		Self::lookup::<P>().map(|(_, name)| name)
	}
}

parameter_types! {
	pub const Version: RuntimeVersion = VERSION;
	pub RuntimeBlockWeights: limits::BlockWeights =
		limits::BlockWeights::with_sensible_defaults(MAXIMUM_BLOCK_WEIGHT, NORMAL_DISPATCH_RATIO);
	pub RuntimeBlockLength: limits::BlockLength =
		limits::BlockLength::max_with_normal_ratio(5 * 1024 * 1024, NORMAL_DISPATCH_RATIO);
	/// By default, Substrate uses RocksDB, so this will be the weight used throughout
	/// the runtime.
	pub const RocksDbWeight: RuntimeDbWeight = RuntimeDbWeight {
		read: 25_000 * 1_000,
		write: 100_000 * 1_000,
	};
	pub const MinimumPeriod: Moment = SLOT_DURATION / 2;
	pub const ExistentialDeposit: Balance = EXISTENTIAL_DEPOSIT;
}

impl stf_system::Config for Runtime {
	type AccountId = AccountId;
	type Lookup = AccountIdLookup;
	type RuntimeCall = RuntimeCall;
	type RuntimeEvent = RuntimeEvent;
	type PalletInfo = RuntimePalletInfo;
	type BlockWeights = RuntimeBlockWeights;
	type BlockLength = RuntimeBlockLength;
	type DbWeight = RocksDbWeight;
	type BlockHashCount = ConstU64<2400>;
	type Version = Version;
	type AccountData = stf_balances::AccountData;
	type OnNewAccount = ();
	type OnKilledAccount = ();
	type MaxConsumers = ConstU32<16>;
	type SystemWeightInfo = ();
}

impl stf_timestamp::Config for Runtime {
	type MinimumPeriod = MinimumPeriod;
	type OnTimestampSet = Aura;
	type WeightInfo = ();
}

impl stf_aura::Config for Runtime {
	type MaxAuthorities = ConstU32<32>;
	type SlotDuration = stf_aura::MinimumPeriodTimesTwo<Runtime>;
}

impl stf_grandpa::Config for Runtime {
	type MaxAuthorities = ConstU32<32>;
}

impl stf_balances::Config for Runtime {
	type RuntimeEvent = RuntimeEvent;
	type ExistentialDeposit = ExistentialDeposit;
	type AccountStore = System;
	type WeightInfo = ();
}

impl stf_transaction_payment::Config for Runtime {
	type RuntimeEvent = RuntimeEvent;
	type OnChargeTransaction = CurrencyAdapter<Balances>;
	type OperationalFeeMultiplier = ConstU8<5>;
	type WeightToFee = IdentityFee;
	type LengthToFee = IdentityFee;
	type FeeMultiplierUpdate = ();
}

impl ValidateUnsigned for Runtime {
	type Call = RuntimeCall;

	fn pre_dispatch(
		ext: &dyn Externalities,
		call: &Self::Call,
	) -> Result<(), TransactionValidityError> {
		match call {
			RuntimeCall::System(call) => System::pre_dispatch(ext, call),
			RuntimeCall::Timestamp(call) => Timestamp::pre_dispatch(ext, call),
			_ => Err(UnknownTransaction::NoUnsignedValidator.into()),
		}
	}

	fn validate_unsigned(
		ext: &dyn Externalities,
		source: TransactionSource,
		call: &Self::Call,
	) -> TransactionValidity {
		match call {
			RuntimeCall::System(call) => System::validate_unsigned(ext, source, call),
			RuntimeCall::Timestamp(call) => Timestamp::validate_unsigned(ext, source, call),
			_ => UnknownTransaction::NoUnsignedValidator.into(),
		}
	}
}
