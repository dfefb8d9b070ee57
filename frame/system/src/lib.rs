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

//! # System Module
//!
//! The System module provides low-level access to core types and cross-cutting utilities. It acts
//! as the base layer for other modules to interact with the runtime.
//!
//! ## Overview
//!
//! The System module defines the core data types used in a runtime. It also provides several
//! utility functions for other modules.
//!
//! In addition, it manages the storage items for extrinsic data, indices, event records and digest
//! items, among other things that support the execution of the current block.
//!
//! It also handles low-level tasks like depositing logs, basic set up and take down of temporary
//! storage entries, and access to previous block hashes.
//!
//! ## Interface
//!
//! ### Dispatchable Functions
//!
//! The System module provides dispatchable functions that, with the exception of `remark` and
//! `remark_with_event`, manipulate low-level state and therefore require the `Root` origin.
//!
//! ### Public Functions
//!
//! See the [`Pallet`] struct for details of publicly available functions.
//!
//! ### Signed Extensions
//!
//! The System module defines the following extensions:
//!
//!   - [`CheckWeight`]: Checks the weight and length of the block and ensure that it does not
//!     exceed the limits.
//!   - [`CheckNonce`]: Checks the nonce of the transaction. Contains a single payload of type
//!     `Nonce`.
//!   - [`CheckNonZeroSender`]: Rejects transactions signed by the all-zero account.
//!   - [`CheckSpecVersion`]: Checks that the runtime version is the same as the one used to sign
//!     the transaction.
//!   - [`CheckTxVersion`]: Checks that the transaction version is the same as the one used to
//!     sign the transaction.
//!   - [`CheckGenesis`]: Checks the provided genesis hash of the transaction. Must be a part of the
//!     signed payload of the transaction.
//!   - [`CheckMortality`]: Checks the mortality of the transaction. Contains a single payload of
//!     type `Era`.
//!
//! Look up the runtime aggregator file (e.g. `runtime/src/lib.rs`) to see the full list of signed
//! extensions included in a chain.

use core::{fmt::Debug, marker::PhantomData};

use codec::{Decode, Encode, FullCodec, MaxEncodedLen};
use scale_info::TypeInfo;
use sp_core::storage::well_known_keys;
use stf_primitives::{
	dispatch::{extract_actual_pays_fee, extract_actual_weight},
	generic,
	traits::{
		BadOrigin, Dispatchable, GetDispatchInfo, Member, StaticLookup, ValidateUnsigned, Zero,
	},
	transaction_validity::{
		InvalidTransaction, TransactionLongevity, TransactionSource, TransactionValidity,
		ValidTransaction,
	},
	version::{LastRuntimeUpgradeInfo, RuntimeVersion},
	BlockNumber, DispatchClass, DispatchError, DispatchInfo, DispatchResultWithPostInfo,
	Externalities, Hash, Nonce, Pays, PerDispatchClass, PostDispatchInfo, RawOrigin,
	RuntimeDbWeight, StateVersion, Weight,
};
use stf_support::{
	decl_error, ensure,
	dispatch::{
		dispatch_info, GetCallIndex, GetCallName, Parameter, UnfilteredDispatchable,
	},
	storage::unhashed,
	storage_prefixes,
	traits::{
		BuildGenesisConfig, Get, Hooks, OnKilledAccount, OnNewAccount, PalletInfo, StoredMap,
	},
	Blake2_128Concat, StorageMap, StorageValue, Twox64Concat, ValueQuery,
};

pub mod extensions;
pub mod limits;
pub mod weights;

#[cfg(test)]
pub(crate) mod mock;

pub use extensions::{
	check_genesis::CheckGenesis, check_mortality::CheckMortality,
	check_non_zero_sender::CheckNonZeroSender, check_nonce::CheckNonce,
	check_spec_version::CheckSpecVersion, check_tx_version::CheckTxVersion,
	check_weight::CheckWeight,
};
pub use weights::WeightInfo;

/// Log target of the system module.
pub const LOG_TARGET: &str = "runtime::system";

/// Compute the trie root of a list of extrinsics.
///
/// The merkle proof is using the same trie as runtime state with
/// `state_version` 0 or 1.
pub fn extrinsics_root<E: Encode>(
	ext: &dyn Externalities,
	extrinsics: &[E],
	state_version: StateVersion,
) -> Hash {
	extrinsics_data_root(ext, extrinsics.iter().map(Encode::encode).collect(), state_version)
}

/// Compute the trie root of a list of extrinsics.
///
/// The merkle proof is using the same trie as runtime state with
/// `state_version` 0 or 1.
pub fn extrinsics_data_root(
	ext: &dyn Externalities,
	xts: Vec<Vec<u8>>,
	state_version: StateVersion,
) -> Hash {
	ext.ordered_trie_root(xts, state_version)
}

/// An object to track the currently used extrinsic weight in a block.
pub type ConsumedWeight = PerDispatchClass<Weight>;

/// The origin of calls handled by the modules of a runtime built on this system.
pub type OriginFor<T> = RawOrigin<<T as Config>::AccountId>;

/// The source of an account reference in a call, resolved through `Config::Lookup`.
pub type AccountIdLookupOf<T> = <<T as Config>::Lookup as StaticLookup>::Source;

/// Type used to encode the number of references an account has.
pub type RefCount = u32;

/// System configuration trait. Implemented by runtime.
pub trait Config: 'static + Eq + Clone + Debug {
	/// The user account identifier type for the runtime.
	type AccountId: Parameter + Member + Ord + MaxEncodedLen;

	/// Converting trait to take a source type and convert to `AccountId`.
	///
	/// Used to define the type and conversion mechanism for referencing accounts in
	/// transactions. It's perfectly reasonable for this to be an identity conversion (with the
	/// source type being `AccountId`), but other modules (e.g. Indices module) may provide more
	/// functional/efficient alternatives.
	type Lookup: StaticLookup<Target = Self::AccountId>;

	/// The aggregated `RuntimeCall` type.
	type RuntimeCall: Parameter
		+ Dispatchable<RuntimeOrigin = OriginFor<Self>>
		+ GetDispatchInfo
		+ From<Call<Self>>;

	/// The aggregated event type of the runtime.
	type RuntimeEvent: Parameter + Member + From<Event<Self>>;

	/// Provides information about the modules of the runtime, most notably their index.
	type PalletInfo: PalletInfo;

	/// Block & extrinsics weights: base values and limits.
	type BlockWeights: Get<limits::BlockWeights>;

	/// The maximum length of a block (in bytes).
	type BlockLength: Get<limits::BlockLength>;

	/// The weight of runtime database operations the runtime can invoke.
	type DbWeight: Get<RuntimeDbWeight>;

	/// Maximum number of block number to block hash mappings to keep (oldest pruned first).
	type BlockHashCount: Get<BlockNumber>;

	/// Get the chain's current version.
	type Version: Get<RuntimeVersion>;

	/// Data to be associated with an account (other than nonce/transaction counter, which this
	/// module does regardless).
	type AccountData: Member + FullCodec + Default + TypeInfo;

	/// Handler for when a new account has just been created.
	type OnNewAccount: OnNewAccount<Self::AccountId>;

	/// A function that is invoked when an account has been determined to be dead.
	///
	/// All resources should be cleaned up associated with the given account.
	type OnKilledAccount: OnKilledAccount<Self::AccountId>;

	/// The maximum number of consumers allowed on a single account.
	type MaxConsumers: Get<RefCount>;

	/// Weight information for the extrinsics of this module.
	type SystemWeightInfo: WeightInfo;
}

/// The system module.
pub struct Pallet<T>(PhantomData<T>);

/// Contains the dispatchable functions of the system module.
#[derive(Encode, Decode, Clone, PartialEq, Eq, Debug, TypeInfo)]
#[scale_info(skip_type_params(T))]
#[allow(non_camel_case_types)]
pub enum Call<T: Config> {
	/// Make some on-chain remark.
	#[codec(index = 0)]
	remark { remark: Vec<u8> },
	/// Set the number of pages in the WebAssembly environment's heap.
	#[codec(index = 1)]
	set_heap_pages { pages: u64 },
	/// Set the new runtime code.
	#[codec(index = 2)]
	set_code { code: Vec<u8> },
	/// Set the new runtime code without doing any checks of the given `code`.
	#[codec(index = 3)]
	set_code_without_checks { code: Vec<u8> },
	/// Set some items of storage.
	#[codec(index = 4)]
	set_storage { items: Vec<KeyValue> },
	/// Kill some items from storage.
	#[codec(index = 5)]
	kill_storage { keys: Vec<Key> },
	/// Kill all storage items with a key that starts with the given prefix.
	///
	/// **NOTE:** We rely on the Root origin to provide us the number of subkeys under
	/// the prefix we are removing to accurately calculate the weight of this function.
	#[codec(index = 6)]
	kill_prefix { prefix: Key, subkeys: u32 },
	/// Make some on-chain remark and emit event.
	#[codec(index = 7)]
	remark_with_event { remark: Vec<u8> },
	/// Authorize an upgrade to a given `code_hash` for the runtime. The runtime can be supplied
	/// later.
	///
	/// This call requires Root origin.
	#[codec(index = 9)]
	authorize_upgrade { code_hash: Hash },
	/// Authorize an upgrade to a given `code_hash` for the runtime. The runtime can be supplied
	/// later.
	///
	/// WARNING: This authorizes an upgrade that will take place without any safety checks, for
	/// example that the spec name remains the same and that the version number increases. Not
	/// recommended for normal use. Use `authorize_upgrade` instead.
	///
	/// This call requires Root origin.
	#[codec(index = 10)]
	authorize_upgrade_without_checks { code_hash: Hash },
	/// Provide the preimage (runtime binary) `code` for an upgrade that has been authorized.
	///
	/// If the authorization required a version check, this call will ensure the spec name
	/// remains unchanged and that the spec version has increased.
	///
	/// Depending on the runtime's `OnSetCode` configuration, this function may directly apply
	/// the new `code` in the same block or attempt to schedule the upgrade.
	///
	/// All origins are allowed.
	#[codec(index = 11)]
	apply_authorized_upgrade { code: Vec<u8> },
	#[doc(hidden)]
	#[codec(skip)]
	__Ignore(PhantomData<T>, stf_support::Never),
}

/// A storage key.
pub type Key = Vec<u8>;

/// A storage key and its value.
pub type KeyValue = (Vec<u8>, Vec<u8>);

/// Event for the System module.
#[derive(Encode, Decode, Clone, PartialEq, Eq, Debug, TypeInfo)]
#[scale_info(skip_type_params(T))]
pub enum Event<T: Config> {
	/// An extrinsic completed successfully.
	ExtrinsicSuccess { dispatch_info: DispatchInfo },
	/// An extrinsic failed.
	ExtrinsicFailed { dispatch_error: DispatchError, dispatch_info: DispatchInfo },
	/// `:code` was updated.
	CodeUpdated,
	/// A new account was created.
	NewAccount { account: T::AccountId },
	/// An account was reaped.
	KilledAccount { account: T::AccountId },
	/// On on-chain remark happened.
	Remarked { sender: T::AccountId, hash: Hash },
	/// An upgrade was authorized.
	UpgradeAuthorized { code_hash: Hash, check_version: bool },
}

decl_error! {
	/// Error for the System module
	pub enum Error for Pallet<T: Config> {
		/// The name of specification does not match between the current runtime
		/// and the new runtime.
		InvalidSpecName,
		/// The specification version is not allowed to decrease between the current runtime
		/// and the new runtime.
		SpecVersionNeedsToIncrease,
		/// Failed to extract the runtime version from the new runtime.
		///
		/// Either calling `Core_version` or decoding `RuntimeVersion` failed.
		FailedToExtractRuntimeVersion,
		/// Suicide called when the account has non-default composite data.
		NonDefaultComposite,
		/// There is a non-zero reference count preventing the account from being purged.
		NonZeroRefCount,
		/// The origin filter prevent the call to be dispatched.
		CallFiltered,
		/// No upgrade authorized.
		NothingAuthorized,
		/// The submitted code is not authorized.
		Unauthorized,
	}
}

/// A phase of a block's execution.
#[derive(Encode, Decode, Debug, TypeInfo, MaxEncodedLen, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
	/// Applying an extrinsic.
	ApplyExtrinsic(u32),
	/// Finalizing the block.
	Finalization,
	/// Initializing the block.
	#[default]
	Initialization,
}

/// Record of an event happening.
#[derive(Encode, Decode, PartialEq, Eq, Clone, Debug, TypeInfo)]
pub struct EventRecord<E, T> {
	/// The phase of the block it happened in.
	pub phase: Phase,
	/// The event itself.
	pub event: E,
	/// The list of the topics this event has.
	pub topics: Vec<T>,
}

/// Information of an account.
#[derive(Clone, Eq, PartialEq, Default, Debug, Encode, Decode, TypeInfo, MaxEncodedLen)]
pub struct AccountInfo<Nonce, AccountData> {
	/// The number of transactions this account has sent.
	pub nonce: Nonce,
	/// The number of other modules that currently depend on this account's existence. The
	/// account cannot be reaped until this is zero.
	pub consumers: RefCount,
	/// The number of other modules that allow this account to exist. The account may not be
	/// reaped until this and `sufficients` are both zero.
	pub providers: RefCount,
	/// The number of modules that allow this account to exist for their own purposes only. The
	/// account may not be reaped until this and `providers` are both zero.
	pub sufficients: RefCount,
	/// The additional data that belongs to this account. Used to store the balance(s) in a lot of
	/// chains.
	pub data: AccountData,
}

/// Information needed when a new runtime binary is submitted and needs to be authorized before
/// replacing the current runtime.
#[derive(Decode, Encode, Default, PartialEq, Eq, MaxEncodedLen, TypeInfo, Clone, Debug)]
pub struct CodeUpgradeAuthorization {
	/// Hash of the new runtime binary.
	pub code_hash: Hash,
	/// Whether or not to carry out version checks.
	pub check_version: bool,
}

/// Some resultant status relevant to incrementing a provider/self-sufficient reference.
#[derive(Eq, PartialEq, Debug)]
pub enum IncRefStatus {
	/// Account was created.
	Created,
	/// Account already existed.
	Existed,
}

/// Some resultant status relevant to decrementing a provider/self-sufficient reference.
#[derive(Eq, PartialEq, Debug)]
pub enum DecRefStatus {
	/// Account was destroyed.
	Reaped,
	/// Account still exists.
	Exists,
}

storage_prefixes! {
	module = "System";
	pub struct AccountPrefix = "Account";
	pub struct ExtrinsicCountPrefix = "ExtrinsicCount";
	pub struct BlockWeightPrefix = "BlockWeight";
	pub struct AllExtrinsicsLenPrefix = "AllExtrinsicsLen";
	pub struct BlockHashPrefix = "BlockHash";
	pub struct ExtrinsicDataPrefix = "ExtrinsicData";
	pub struct NumberPrefix = "Number";
	pub struct ParentHashPrefix = "ParentHash";
	pub struct DigestPrefix = "Digest";
	pub struct EventsPrefix = "Events";
	pub struct EventCountPrefix = "EventCount";
	pub struct EventTopicsPrefix = "EventTopics";
	pub struct LastRuntimeUpgradePrefix = "LastRuntimeUpgrade";
	pub struct ExecutionPhasePrefix = "ExecutionPhase";
	pub struct AuthorizedUpgradePrefix = "AuthorizedUpgrade";
}

/// The full account information for a particular account ID.
#[allow(type_alias_bounds)]
pub type Account<T: Config> = StorageMap<
	AccountPrefix,
	Blake2_128Concat,
	<T as Config>::AccountId,
	AccountInfo<Nonce, <T as Config>::AccountData>,
	ValueQuery,
>;

/// Total extrinsics count for the current block.
pub type ExtrinsicCount = StorageValue<ExtrinsicCountPrefix, u32>;

/// The current weight for the block.
pub type BlockWeight = StorageValue<BlockWeightPrefix, ConsumedWeight, ValueQuery>;

/// Total length (in bytes) for all extrinsics put together, for the current block.
pub type AllExtrinsicsLen = StorageValue<AllExtrinsicsLenPrefix, u32>;

/// Map of block numbers to block hashes.
pub type BlockHash = StorageMap<BlockHashPrefix, Twox64Concat, BlockNumber, Hash, ValueQuery>;

/// Extrinsics data for the current block (maps an extrinsic's index to its data).
pub type ExtrinsicData = StorageMap<ExtrinsicDataPrefix, Twox64Concat, u32, Vec<u8>, ValueQuery>;

/// The current block number being processed. Set by `execute_block`.
pub type Number = StorageValue<NumberPrefix, BlockNumber, ValueQuery>;

/// Hash of the previous block.
pub type ParentHash = StorageValue<ParentHashPrefix, Hash, ValueQuery>;

/// Digest of the current block, also part of the block header.
pub type Digest = StorageValue<DigestPrefix, generic::Digest, ValueQuery>;

/// Events deposited for the current block.
///
/// NOTE: The item is unbound and should therefore never be read on chain.
/// It could otherwise inflate the PoV size of a block.
///
/// Events have a large in-memory size. Box the events to not go out-of-memory
/// just in case someone still reads them from within the runtime.
#[allow(type_alias_bounds)]
pub type Events<T: Config> =
	StorageValue<EventsPrefix, Vec<EventRecord<<T as Config>::RuntimeEvent, Hash>>, ValueQuery>;

/// The number of events in the `Events<T>` list.
pub type EventCount = StorageValue<EventCountPrefix, u32, ValueQuery>;

/// Mapping between a topic (represented by T::Hash) and a vector of indexes
/// of events in the `<Events<T>>` list.
///
/// All topic vectors have deterministic storage locations depending on the topic. This
/// allows light-clients to leverage the changes trie storage tracking mechanism and
/// in case of changes fetch the list of events of interest.
///
/// The value has the type `(BlockNumber, EventIndex)` because if we used only just
/// the `EventIndex` then in case if the topic has the same contents on the next block
/// no notification will be triggered thus the event might be lost.
pub type EventTopics =
	StorageMap<EventTopicsPrefix, Blake2_128Concat, Hash, Vec<(BlockNumber, u32)>, ValueQuery>;

/// Stores the `spec_version` and `spec_name` of when the last runtime upgrade happened.
pub type LastRuntimeUpgrade = StorageValue<LastRuntimeUpgradePrefix, LastRuntimeUpgradeInfo>;

/// The execution phase of the block.
pub type ExecutionPhase = StorageValue<ExecutionPhasePrefix, Phase>;

/// `Some` if a code upgrade has been authorized.
pub type AuthorizedUpgrade = StorageValue<AuthorizedUpgradePrefix, CodeUpgradeAuthorization>;

/// Genesis configuration of the system module.
pub struct GenesisConfig<T> {
	/// The runtime code to store under `:code`, if any.
	pub code: Vec<u8>,
	#[doc(hidden)]
	pub _config: PhantomData<T>,
}

impl<T> Default for GenesisConfig<T> {
	fn default() -> Self {
		Self { code: Vec::new(), _config: PhantomData }
	}
}

impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
	fn build(&self, ext: &mut dyn Externalities) {
		BlockHash::insert(ext, 0, hash69());
		ParentHash::put(ext, hash69());
		LastRuntimeUpgrade::put(ext, LastRuntimeUpgradeInfo::from(T::Version::get()));
		unhashed::put(ext, well_known_keys::EXTRINSIC_INDEX, &0u32);
		if !self.code.is_empty() {
			unhashed::put_raw(ext, well_known_keys::CODE, &self.code);
		}
	}
}

/// Hash of the genesis block's parent, a well-known placeholder.
pub fn hash69() -> Hash {
	Hash::repeat_byte(69)
}

impl<T: Config> Hooks for Pallet<T> {}

impl<T: Config> ValidateUnsigned for Pallet<T> {
	type Call = Call<T>;

	fn validate_unsigned(
		ext: &dyn Externalities,
		_source: TransactionSource,
		call: &Self::Call,
	) -> TransactionValidity {
		if let Call::apply_authorized_upgrade { code } = call {
			if let Ok(hash) = Self::validate_authorized_upgrade(ext, &code[..]) {
				return Ok(ValidTransaction {
					priority: 100,
					requires: Vec::new(),
					provides: vec![hash.as_bytes().to_vec()],
					longevity: TransactionLongevity::MAX,
					propagate: true,
				})
			}
		}
		Err(InvalidTransaction::Call.into())
	}
}

impl<T: Config> GetDispatchInfo for Call<T> {
	fn get_dispatch_info(&self) -> DispatchInfo {
		match self {
			Self::remark { remark } =>
				dispatch_info(&T::SystemWeightInfo::remark(remark.len() as u32), ()),
			Self::set_heap_pages { .. } => dispatch_info(
				&(T::SystemWeightInfo::set_heap_pages(), DispatchClass::Operational),
				(),
			),
			Self::set_code { .. } => dispatch_info(
				&(T::SystemWeightInfo::set_code(), DispatchClass::Operational),
				(),
			),
			Self::set_code_without_checks { .. } =>
				dispatch_info(&(T::BlockWeights::get().max_block, DispatchClass::Operational), ()),
			Self::set_storage { items } => dispatch_info(
				&(T::SystemWeightInfo::set_storage(items.len() as u32), DispatchClass::Operational),
				(),
			),
			Self::kill_storage { keys } => dispatch_info(
				&(T::SystemWeightInfo::kill_storage(keys.len() as u32), DispatchClass::Operational),
				(),
			),
			Self::kill_prefix { subkeys, .. } => dispatch_info(
				&(
					T::SystemWeightInfo::kill_prefix(subkeys.saturating_add(1)),
					DispatchClass::Operational,
				),
				(),
			),
			Self::remark_with_event { remark } =>
				dispatch_info(&T::SystemWeightInfo::remark_with_event(remark.len() as u32), ()),
			Self::authorize_upgrade { .. } | Self::authorize_upgrade_without_checks { .. } =>
				dispatch_info(
					&(T::SystemWeightInfo::authorize_upgrade(), DispatchClass::Operational),
					(),
				),
			Self::apply_authorized_upgrade { .. } => dispatch_info(
				&(T::SystemWeightInfo::apply_authorized_upgrade(), DispatchClass::Operational),
				(),
			),
			Self::__Ignore(_, never) => match *never {},
		}
	}
}

impl<T: Config> GetCallIndex for Call<T> {
	fn get_call_indices() -> &'static [u8] {
		&[0, 1, 2, 3, 4, 5, 6, 7, 9, 10, 11]
	}

	fn get_call_index(&self) -> u8 {
		match self {
			Self::remark { .. } => 0,
			Self::set_heap_pages { .. } => 1,
			Self::set_code { .. } => 2,
			Self::set_code_without_checks { .. } => 3,
			Self::set_storage { .. } => 4,
			Self::kill_storage { .. } => 5,
			Self::kill_prefix { .. } => 6,
			Self::remark_with_event { .. } => 7,
			Self::authorize_upgrade { .. } => 9,
			Self::authorize_upgrade_without_checks { .. } => 10,
			Self::apply_authorized_upgrade { .. } => 11,
			Self::__Ignore(_, never) => match *never {},
		}
	}
}

impl<T: Config> GetCallName for Call<T> {
	fn get_call_names() -> &'static [&'static str] {
		&[
			"remark",
			"set_heap_pages",
			"set_code",
			"set_code_without_checks",
			"set_storage",
			"kill_storage",
			"kill_prefix",
			"remark_with_event",
			"authorize_upgrade",
			"authorize_upgrade_without_checks",
			"apply_authorized_upgrade",
		]
	}

	fn get_call_name(&self) -> &'static str {
		match self {
			Self::remark { .. } => "remark",
			Self::set_heap_pages { .. } => "set_heap_pages",
			Self::set_code { .. } => "set_code",
			Self::set_code_without_checks { .. } => "set_code_without_checks",
			Self::set_storage { .. } => "set_storage",
			Self::kill_storage { .. } => "kill_storage",
			Self::kill_prefix { .. } => "kill_prefix",
			Self::remark_with_event { .. } => "remark_with_event",
			Self::authorize_upgrade { .. } => "authorize_upgrade",
			Self::authorize_upgrade_without_checks { .. } => "authorize_upgrade_without_checks",
			Self::apply_authorized_upgrade { .. } => "apply_authorized_upgrade",
			Self::__Ignore(_, never) => match *never {},
		}
	}
}

impl<T: Config> UnfilteredDispatchable for Call<T> {
	type RuntimeOrigin = OriginFor<T>;

	fn dispatch_bypass_filter(
		self,
		ext: &mut dyn Externalities,
		origin: Self::RuntimeOrigin,
	) -> DispatchResultWithPostInfo {
		match self {
			Self::remark { remark } => Pallet::<T>::remark(ext, origin, remark),
			Self::set_heap_pages { pages } => Pallet::<T>::set_heap_pages(ext, origin, pages),
			Self::set_code { code } => Pallet::<T>::set_code(ext, origin, code),
			Self::set_code_without_checks { code } =>
				Pallet::<T>::set_code_without_checks(ext, origin, code),
			Self::set_storage { items } => Pallet::<T>::set_storage(ext, origin, items),
			Self::kill_storage { keys } => Pallet::<T>::kill_storage(ext, origin, keys),
			Self::kill_prefix { prefix, subkeys } =>
				Pallet::<T>::kill_prefix(ext, origin, prefix, subkeys),
			Self::remark_with_event { remark } =>
				Pallet::<T>::remark_with_event(ext, origin, remark),
			Self::authorize_upgrade { code_hash } =>
				Pallet::<T>::authorize_upgrade(ext, origin, code_hash),
			Self::authorize_upgrade_without_checks { code_hash } =>
				Pallet::<T>::authorize_upgrade_without_checks(ext, origin, code_hash),
			Self::apply_authorized_upgrade { code } =>
				Pallet::<T>::apply_authorized_upgrade(ext, origin, code),
			Self::__Ignore(_, never) => match never {},
		}
	}
}

// Dispatchables.
impl<T: Config> Pallet<T> {
	/// Make some on-chain remark.
	///
	/// Can be executed by every `origin`.
	pub fn remark(
		_ext: &mut dyn Externalities,
		origin: OriginFor<T>,
		_remark: Vec<u8>,
	) -> DispatchResultWithPostInfo {
		let _ = ensure_signed_or_root(origin)?;
		Ok(().into())
	}

	/// Set the number of pages in the WebAssembly environment's heap.
	pub fn set_heap_pages(
		ext: &mut dyn Externalities,
		origin: OriginFor<T>,
		pages: u64,
	) -> DispatchResultWithPostInfo {
		ensure_root(origin)?;
		unhashed::put(ext, well_known_keys::HEAP_PAGES, &pages);
		Self::deposit_log(ext, generic::DigestItem::RuntimeEnvironmentUpdated);
		Ok(().into())
	}

	/// Set the new runtime code.
	pub fn set_code(
		ext: &mut dyn Externalities,
		origin: OriginFor<T>,
		code: Vec<u8>,
	) -> DispatchResultWithPostInfo {
		ensure_root(origin)?;
		Self::can_set_code(&*ext, &code)?;
		Self::update_code_in_storage(ext, &code);
		// consume the rest of the block to prevent further transactions
		Ok(Some(T::BlockWeights::get().max_block).into())
	}

	/// Set the new runtime code without doing any checks of the given `code`.
	///
	/// Note that runtime upgrades will not run if this is called with a not-increasing spec
	/// version!
	pub fn set_code_without_checks(
		ext: &mut dyn Externalities,
		origin: OriginFor<T>,
		code: Vec<u8>,
	) -> DispatchResultWithPostInfo {
		ensure_root(origin)?;
		Self::update_code_in_storage(ext, &code);
		Ok(Some(T::BlockWeights::get().max_block).into())
	}

	/// Set some items of storage.
	pub fn set_storage(
		ext: &mut dyn Externalities,
		origin: OriginFor<T>,
		items: Vec<KeyValue>,
	) -> DispatchResultWithPostInfo {
		ensure_root(origin)?;
		for (key, value) in &items {
			unhashed::put_raw(ext, key, value);
		}
		Ok(().into())
	}

	/// Kill some items from storage.
	pub fn kill_storage(
		ext: &mut dyn Externalities,
		origin: OriginFor<T>,
		keys: Vec<Key>,
	) -> DispatchResultWithPostInfo {
		ensure_root(origin)?;
		for key in &keys {
			unhashed::kill(ext, key);
		}
		Ok(().into())
	}

	/// Kill all storage items with a key that starts with the given prefix.
	pub fn kill_prefix(
		ext: &mut dyn Externalities,
		origin: OriginFor<T>,
		prefix: Key,
		subkeys: u32,
	) -> DispatchResultWithPostInfo {
		ensure_root(origin)?;
		let _ = unhashed::clear_prefix(ext, &prefix, Some(subkeys));
		Ok(().into())
	}

	/// Make some on-chain remark and emit event.
	pub fn remark_with_event(
		ext: &mut dyn Externalities,
		origin: OriginFor<T>,
		remark: Vec<u8>,
	) -> DispatchResultWithPostInfo {
		let who = ensure_signed(origin)?;
		let hash = Hash::from(ext.blake2_256(&remark[..]));
		Self::deposit_event(ext, Event::<T>::Remarked { sender: who, hash });
		Ok(().into())
	}

	/// Authorize an upgrade to a given `code_hash` for the runtime.
	pub fn authorize_upgrade(
		ext: &mut dyn Externalities,
		origin: OriginFor<T>,
		code_hash: Hash,
	) -> DispatchResultWithPostInfo {
		ensure_root(origin)?;
		Self::do_authorize_upgrade(ext, code_hash, true);
		Ok(().into())
	}

	/// Authorize an upgrade to a given `code_hash` that skips the version checks.
	pub fn authorize_upgrade_without_checks(
		ext: &mut dyn Externalities,
		origin: OriginFor<T>,
		code_hash: Hash,
	) -> DispatchResultWithPostInfo {
		ensure_root(origin)?;
		Self::do_authorize_upgrade(ext, code_hash, false);
		Ok(().into())
	}

	/// Provide the runtime binary of an authorized upgrade and apply it.
	pub fn apply_authorized_upgrade(
		ext: &mut dyn Externalities,
		_origin: OriginFor<T>,
		code: Vec<u8>,
	) -> DispatchResultWithPostInfo {
		Self::validate_authorized_upgrade(&*ext, &code)?;
		Self::update_code_in_storage(ext, &code);
		AuthorizedUpgrade::kill(ext);
		Ok(PostDispatchInfo { actual_weight: None, pays_fee: Pays::No })
	}
}

/// Ensure that the origin `o` represents a signed extrinsic (i.e. transaction).
/// Returns `Ok` with the account that signed the extrinsic or an `Err` otherwise.
pub fn ensure_signed<AccountId>(o: RawOrigin<AccountId>) -> Result<AccountId, BadOrigin> {
	match o {
		RawOrigin::Signed(t) => Ok(t),
		_ => Err(BadOrigin),
	}
}

/// Ensure that the origin `o` represents either a signed extrinsic (i.e. transaction) or a root.
/// Returns `Ok` with the account that signed the extrinsic, `None` if it was root,  or an `Err`
/// otherwise.
pub fn ensure_signed_or_root<AccountId>(
	o: RawOrigin<AccountId>,
) -> Result<Option<AccountId>, BadOrigin> {
	match o {
		RawOrigin::Root => Ok(None),
		RawOrigin::Signed(t) => Ok(Some(t)),
		_ => Err(BadOrigin),
	}
}

/// Ensure that the origin `o` represents the root. Returns `Ok` or an `Err` otherwise.
pub fn ensure_root<AccountId>(o: RawOrigin<AccountId>) -> Result<(), BadOrigin> {
	match o {
		RawOrigin::Root => Ok(()),
		_ => Err(BadOrigin),
	}
}

/// Ensure that the origin `o` represents an unsigned extrinsic. Returns `Ok` or an `Err`
/// otherwise.
pub fn ensure_none<AccountId>(o: RawOrigin<AccountId>) -> Result<(), BadOrigin> {
	match o {
		RawOrigin::None => Ok(()),
		_ => Err(BadOrigin),
	}
}

impl<T: Config> Pallet<T> {
	/// Returns the `spec_version` of the last runtime upgrade.
	///
	/// This function is useful for writing guarded runtime migrations in the runtime. A runtime
	/// migration can use the `spec_version` to ensure that it isn't applied twice.
	pub fn last_runtime_upgrade_spec_version(ext: &dyn Externalities) -> u32 {
		LastRuntimeUpgrade::get(ext).map_or(0, |l| l.spec_version.0)
	}

	/// Returns true if the given account exists.
	pub fn account_exists(ext: &dyn Externalities, who: &T::AccountId) -> bool {
		Account::<T>::contains_key(ext, who)
	}

	/// Determine whether or not it is possible to update the code.
	///
	/// Checks the given code if it is a valid runtime wasm blob by instantiating
	/// it and extracting the runtime version of it. It checks that the runtime version
	/// of the old and new runtime has the same spec name and that the spec version is increasing.
	pub fn can_set_code(ext: &dyn Externalities, code: &[u8]) -> Result<(), DispatchError> {
		let current_version = T::Version::get();
		let new_version = ext
			.read_runtime_version(code)
			.and_then(|v| RuntimeVersion::decode(&mut &v[..]).ok())
			.ok_or(Error::<T>::FailedToExtractRuntimeVersion)?;

		ensure!(new_version.spec_name == current_version.spec_name, Error::<T>::InvalidSpecName);
		ensure!(
			new_version.spec_version > current_version.spec_version,
			Error::<T>::SpecVersionNeedsToIncrease
		);
		Ok(())
	}

	/// Record an upgrade authorization for `code_hash`.
	pub fn do_authorize_upgrade(ext: &mut dyn Externalities, code_hash: Hash, check_version: bool) {
		AuthorizedUpgrade::put(ext, CodeUpgradeAuthorization { code_hash, check_version });
		Self::deposit_event(ext, Event::<T>::UpgradeAuthorized { code_hash, check_version });
	}

	/// Check that provided `code` can be upgraded to. Namely, check that its hash matches an
	/// existing authorization and that it meets the specification requirements of `can_set_code`.
	pub fn validate_authorized_upgrade(
		ext: &dyn Externalities,
		code: &[u8],
	) -> Result<Hash, DispatchError> {
		let authorization = AuthorizedUpgrade::get(ext).ok_or(Error::<T>::NothingAuthorized)?;
		let actual_hash = Hash::from(ext.blake2_256(code));
		ensure!(actual_hash == authorization.code_hash, Error::<T>::Unauthorized);
		if authorization.check_version {
			Self::can_set_code(ext, code)?;
		}
		Ok(actual_hash)
	}

	/// Write code to the storage and emit related events and digest items.
	///
	/// Note this function almost never should be used directly. It is exposed
	/// for `OnSetCode` implementations that defer actual code being written to
	/// the storage (for instance in case of parachains).
	pub fn update_code_in_storage(ext: &mut dyn Externalities, code: &[u8]) {
		unhashed::put_raw(ext, well_known_keys::CODE, code);
		Self::deposit_log(ext, generic::DigestItem::RuntimeEnvironmentUpdated);
		Self::deposit_event(ext, Event::<T>::CodeUpdated);
	}

	/// Increment the provider reference counter on an account.
	pub fn inc_providers(ext: &mut dyn Externalities, who: &T::AccountId) -> IncRefStatus {
		let mut account = Account::<T>::get(&*ext, who);
		let status = if account.providers == 0 && account.sufficients == 0 {
			// Account is being created.
			account.providers = 1;
			IncRefStatus::Created
		} else {
			account.providers = account.providers.saturating_add(1);
			IncRefStatus::Existed
		};
		Account::<T>::insert(ext, who, &account);
		if status == IncRefStatus::Created {
			Self::on_created_account(ext, who.clone());
		}
		status
	}

	/// Decrement the provider reference counter on an account.
	///
	/// This *MUST* only be done once for every time you called `inc_providers` on `who`.
	pub fn dec_providers(
		ext: &mut dyn Externalities,
		who: &T::AccountId,
	) -> Result<DecRefStatus, DispatchError> {
		let Ok(mut account) = Account::<T>::try_get(&*ext, who) else {
			log::error!(
				target: LOG_TARGET,
				"Logic error: Account already dead when reducing provider",
			);
			return Ok(DecRefStatus::Reaped)
		};

		if account.providers == 0 {
			// Logic error - cannot decrement beyond zero.
			log::error!(
				target: LOG_TARGET,
				"Logic error: Unexpected underflow in reducing provider",
			);
			account.providers = 1;
		}
		match (account.providers, account.consumers, account.sufficients) {
			(1, 0, 0) => {
				// No providers left (and no consumers) and no sufficients. Account dead.
				Account::<T>::remove(ext, who);
				Self::on_killed_account(ext, who.clone());
				Ok(DecRefStatus::Reaped)
			},
			(1, c, _) if c > 0 => {
				// Cannot remove last provider if there are consumers.
				Err(DispatchError::ConsumerRemaining)
			},
			(x, _, _) => {
				// Account will continue to exist as there is either > 1 provider or
				// > 0 sufficients.
				account.providers = x - 1;
				Account::<T>::insert(ext, who, &account);
				Ok(DecRefStatus::Exists)
			},
		}
	}

	/// Increment the self-sufficient reference counter on an account.
	pub fn inc_sufficients(ext: &mut dyn Externalities, who: &T::AccountId) -> IncRefStatus {
		let mut account = Account::<T>::get(&*ext, who);
		let status = if account.providers + account.sufficients == 0 {
			// Account is being created.
			account.sufficients = 1;
			IncRefStatus::Created
		} else {
			account.sufficients = account.sufficients.saturating_add(1);
			IncRefStatus::Existed
		};
		Account::<T>::insert(ext, who, &account);
		if status == IncRefStatus::Created {
			Self::on_created_account(ext, who.clone());
		}
		status
	}

	/// Decrement the sufficients reference counter on an account.
	///
	/// This *MUST* only be done once for every time you called `inc_sufficients` on `who`.
	pub fn dec_sufficients(ext: &mut dyn Externalities, who: &T::AccountId) -> DecRefStatus {
		let Ok(mut account) = Account::<T>::try_get(&*ext, who) else {
			log::error!(
				target: LOG_TARGET,
				"Logic error: Account already dead when reducing provider",
			);
			return DecRefStatus::Reaped
		};

		if account.sufficients == 0 {
			// Logic error - cannot decrement beyond zero.
			log::error!(
				target: LOG_TARGET,
				"Logic error: Unexpected underflow in reducing sufficients",
			);
		}
		match (account.sufficients, account.providers) {
			(0, 0) | (1, 0) => {
				Account::<T>::remove(ext, who);
				Self::on_killed_account(ext, who.clone());
				DecRefStatus::Reaped
			},
			(x, _) => {
				account.sufficients = x.saturating_sub(1);
				Account::<T>::insert(ext, who, &account);
				DecRefStatus::Exists
			},
		}
	}

	/// The number of outstanding provider references for the account `who`.
	pub fn providers(ext: &dyn Externalities, who: &T::AccountId) -> RefCount {
		Account::<T>::get(ext, who).providers
	}

	/// The number of outstanding sufficient references for the account `who`.
	pub fn sufficients(ext: &dyn Externalities, who: &T::AccountId) -> RefCount {
		Account::<T>::get(ext, who).sufficients
	}

	/// The number of outstanding provider and sufficient references for the account `who`.
	pub fn reference_count(ext: &dyn Externalities, who: &T::AccountId) -> RefCount {
		let a = Account::<T>::get(ext, who);
		a.providers + a.sufficients
	}

	/// Increment the reference counter on an account.
	///
	/// The account `who`'s `providers` must be non-zero and the current number of consumers must
	/// be less than `MaxConsumers` or this will return an error.
	pub fn inc_consumers(ext: &mut dyn Externalities, who: &T::AccountId) -> Result<(), DispatchError> {
		Account::<T>::try_mutate(ext, who, |a| {
			if a.providers > 0 {
				if a.consumers < T::MaxConsumers::get() {
					a.consumers = a.consumers.saturating_add(1);
					Ok(())
				} else {
					Err(DispatchError::TooManyConsumers)
				}
			} else {
				Err(DispatchError::NoProviders)
			}
		})
	}

	/// Decrement the reference counter on an account. This *MUST* only be done once for every time
	/// you called `inc_consumers` on `who`.
	pub fn dec_consumers(ext: &mut dyn Externalities, who: &T::AccountId) {
		Account::<T>::mutate(ext, who, |a| {
			if a.consumers > 0 {
				a.consumers -= 1;
			} else {
				log::error!(
					target: LOG_TARGET,
					"Logic error: Unexpected underflow in reducing consumer",
				);
			}
		})
	}

	/// The number of outstanding references for the account `who`.
	pub fn consumers(ext: &dyn Externalities, who: &T::AccountId) -> RefCount {
		Account::<T>::get(ext, who).consumers
	}

	/// True if the account has some outstanding consumer references.
	pub fn is_provider_in_use(ext: &dyn Externalities, who: &T::AccountId) -> bool {
		Account::<T>::get(ext, who).consumers != 0
	}

	/// True if the account has at least one provider reference and adding `amount` consumer
	/// references would not take it above the the maximum.
	pub fn can_accrue_consumers(ext: &dyn Externalities, who: &T::AccountId, amount: u32) -> bool {
		let a = Account::<T>::get(ext, who);
		match a.consumers.checked_add(amount) {
			Some(c) => a.providers > 0 && c <= T::MaxConsumers::get(),
			None => false,
		}
	}

	/// True if the account has no outstanding consumer references or more than one provider.
	pub fn can_dec_provider(ext: &dyn Externalities, who: &T::AccountId) -> bool {
		let a = Account::<T>::get(ext, who);
		a.consumers == 0 || a.providers > 1
	}

	/// Deposits an event into this block's event record.
	///
	/// NOTE: Events not registered at the genesis block and quietly omitted.
	pub fn deposit_event(ext: &mut dyn Externalities, event: impl Into<T::RuntimeEvent>) {
		Self::deposit_event_indexed(ext, &[], event.into());
	}

	/// Deposits an event into this block's event record adding this event
	/// to the corresponding topic indexes.
	///
	/// This will update storage entries that correspond to the specified topics.
	/// It is expected that light-clients could subscribe to this topics.
	///
	/// NOTE: Events not registered at the genesis block and quietly omitted.
	pub fn deposit_event_indexed(
		ext: &mut dyn Externalities,
		topics: &[Hash],
		event: T::RuntimeEvent,
	) {
		let block_number = Self::block_number(&*ext);

		// Don't populate events on genesis.
		if block_number.is_zero() {
			return
		}

		let phase = ExecutionPhase::get(&*ext).unwrap_or_default();
		let event = EventRecord { phase, event, topics: topics.to_vec() };

		// Index of the event to be added.
		let event_idx = {
			let old_event_count = EventCount::get(&*ext);
			let new_event_count = match old_event_count.checked_add(1) {
				// We've reached the maximum number of events at this block, just
				// don't do anything and leave the event_count unaltered.
				None => return,
				Some(nc) => nc,
			};
			EventCount::put(ext, new_event_count);
			old_event_count
		};

		Events::<T>::append(ext, event);

		for topic in topics {
			EventTopics::mutate(ext, topic, |indices| indices.push((block_number, event_idx)));
		}
	}

	/// Gets the index of extrinsic that is currently executing.
	pub fn extrinsic_index(ext: &dyn Externalities) -> Option<u32> {
		unhashed::get(ext, well_known_keys::EXTRINSIC_INDEX)
	}

	/// Gets extrinsics count.
	pub fn extrinsic_count(ext: &dyn Externalities) -> u32 {
		ExtrinsicCount::get(ext).unwrap_or_default()
	}

	/// Gets the total length of the extrinsics applied in this block.
	pub fn all_extrinsics_len(ext: &dyn Externalities) -> u32 {
		AllExtrinsicsLen::get(ext).unwrap_or_default()
	}

	/// Inform the system module of some additional weight that should be accounted for, in the
	/// current block.
	///
	/// NOTE: use with extra care; this function is made public only be used for certain modules
	/// that need it. A runtime that does not have dynamic calls should never need this and should
	/// stick to static weights. A typical use case for this is inner calls or smart contract calls.
	/// Furthermore, it only makes sense to use this when it is presumably  _cheap_ to provide the
	/// argument `weight`; In other words, if this function is to be used to account for some
	/// unknown, user provided call's weight, it would only make sense to use it if you are sure you
	/// can rapidly compute the weight of the inner call.
	///
	/// Even more dangerous is to note that this function does NOT take any action, if the new sum
	/// of block weight is more than the block weight limit. This is what the _unchecked_.
	///
	/// Another potential use-case could be for the `on_initialize` and `on_finalize` hooks.
	pub fn register_extra_weight_unchecked(
		ext: &mut dyn Externalities,
		weight: Weight,
		class: DispatchClass,
	) {
		BlockWeight::mutate(ext, |current_weight| {
			current_weight.accrue(weight, class);
		});
	}

	/// The weight consumed so far in the current block.
	pub fn block_weight(ext: &dyn Externalities) -> ConsumedWeight {
		BlockWeight::get(ext)
	}

	/// Start the execution of a particular block.
	pub fn initialize(
		ext: &mut dyn Externalities,
		number: BlockNumber,
		parent_hash: &Hash,
		digest: &generic::Digest,
	) {
		// populate environment
		ExecutionPhase::put(ext, Phase::Initialization);
		unhashed::put(ext, well_known_keys::EXTRINSIC_INDEX, &0u32);
		Number::put(ext, number);
		Digest::put(ext, digest);
		ParentHash::put(ext, parent_hash);
		BlockHash::insert(ext, number.saturating_sub(1), parent_hash);

		// Remove previous block data from storage
		BlockWeight::kill(ext);
	}

	/// Remove temporary "environment" entries in storage, compute the storage root and return the
	/// resulting header for this block.
	pub fn finalize(ext: &mut dyn Externalities) -> generic::Header {
		log::debug!(
			target: LOG_TARGET,
			"[{:?}] {} extrinsics, length: {} / normal weight: {:?} / op weight {:?} / mandatory \
			 weight {:?}",
			Self::block_number(&*ext),
			Self::extrinsic_count(&*ext),
			Self::all_extrinsics_len(&*ext),
			Self::block_weight(&*ext).get(DispatchClass::Normal),
			Self::block_weight(&*ext).get(DispatchClass::Operational),
			Self::block_weight(&*ext).get(DispatchClass::Mandatory),
		);
		ExecutionPhase::kill(ext);
		AllExtrinsicsLen::kill(ext);

		let number = Number::get(&*ext);
		let parent_hash = ParentHash::get(&*ext);
		let digest = Digest::get(&*ext);

		let count = ExtrinsicCount::take(ext).unwrap_or_default();
		let extrinsics = (0..count).map(|i| ExtrinsicData::take(&mut *ext, i)).collect();
		let version = T::Version::get().state_version();
		let extrinsics_root = extrinsics_data_root(&*ext, extrinsics, version);

		// move block hash pruning window by one block
		let block_hash_count = T::BlockHashCount::get();
		let to_remove = number.saturating_sub(block_hash_count).saturating_sub(1);

		// keep genesis hash
		if !to_remove.is_zero() {
			BlockHash::remove(ext, to_remove);
		}

		let storage_root = ext.storage_root(version);

		generic::Header::new(number, extrinsics_root, storage_root, parent_hash, digest)
	}

	/// Deposits a log and ensures it matches the block's log data.
	pub fn deposit_log(ext: &mut dyn Externalities, item: generic::DigestItem) {
		Digest::mutate(ext, |digest| digest.push(item));
	}

	/// The current block number being processed.
	pub fn block_number(ext: &dyn Externalities) -> BlockNumber {
		Number::get(ext)
	}

	/// Hash of the previous block.
	pub fn parent_hash(ext: &dyn Externalities) -> Hash {
		ParentHash::get(ext)
	}

	/// Digest of the current block.
	pub fn digest(ext: &dyn Externalities) -> generic::Digest {
		Digest::get(ext)
	}

	/// The hash of a known block, or the zero hash when it is unknown or pruned.
	pub fn block_hash(ext: &dyn Externalities, number: BlockNumber) -> Hash {
		BlockHash::get(ext, number)
	}

	/// The current execution phase, if a block is being executed.
	pub fn execution_phase(ext: &dyn Externalities) -> Option<Phase> {
		ExecutionPhase::get(ext)
	}

	/// Set the block number to something in particular. Can be used as an alternative to
	/// `initialize` for tests that don't need to bother with the other environment entries.
	pub fn set_block_number(ext: &mut dyn Externalities, n: BlockNumber) {
		Number::put(ext, n);
	}

	/// Sets the index of extrinsic that is currently executing.
	pub fn set_extrinsic_index(ext: &mut dyn Externalities, extrinsic_index: u32) {
		unhashed::put(ext, well_known_keys::EXTRINSIC_INDEX, &extrinsic_index)
	}

	/// Set the parent hash number to something in particular. Can be used as an alternative to
	/// `initialize` for tests that don't need to bother with the other environment entries.
	pub fn set_parent_hash(ext: &mut dyn Externalities, n: Hash) {
		ParentHash::put(ext, n);
	}

	/// Get the current events deposited by the runtime.
	///
	/// NOTE: This should only be used in tests. Reading events from the runtime can have a large
	/// impact on the PoV size of a block. Users should use alternative and well bounded storage
	/// items for any behavior like this.
	pub fn events(ext: &dyn Externalities) -> Vec<EventRecord<T::RuntimeEvent, Hash>> {
		Events::<T>::get(ext)
	}

	/// The number of events deposited in the current block.
	pub fn event_count(ext: &dyn Externalities) -> u32 {
		EventCount::get(ext)
	}

	/// The indices of the events deposited under `topic`.
	pub fn event_topics(ext: &dyn Externalities, topic: &Hash) -> Vec<(BlockNumber, u32)> {
		EventTopics::get(ext, topic)
	}

	/// Get the last event of the runtime, if any.
	pub fn read_last_event(ext: &dyn Externalities) -> Option<T::RuntimeEvent> {
		Self::events(ext).pop().map(|record| record.event)
	}

	/// Reset events.
	///
	/// This needs to be used in prior calling [`initialize`](Self::initialize) for each new block
	/// to clear events from previous block.
	pub fn reset_events(ext: &mut dyn Externalities) {
		Events::<T>::kill(ext);
		EventCount::kill(ext);
		let _ = EventTopics::clear(ext, None);
	}

	/// Return the chain's current runtime version.
	pub fn runtime_version() -> RuntimeVersion {
		T::Version::get()
	}

	/// Retrieve the account transaction counter from storage.
	pub fn account_nonce(ext: &dyn Externalities, who: &T::AccountId) -> Nonce {
		Account::<T>::get(ext, who).nonce
	}

	/// Increment a particular account's nonce by 1.
	pub fn inc_account_nonce(ext: &mut dyn Externalities, who: &T::AccountId) {
		Account::<T>::mutate(ext, who, |a| a.nonce = a.nonce.saturating_add(1));
	}

	/// Note what the extrinsic data of the current extrinsic index is.
	///
	/// This is required to be called before applying an extrinsic. The data will used
	/// in [`Self::finalize`] to calculate the correct extrinsics root.
	pub fn note_extrinsic(ext: &mut dyn Externalities, encoded_xt: Vec<u8>) {
		let index = Self::extrinsic_index(&*ext).unwrap_or_default();
		ExtrinsicData::insert(ext, index, encoded_xt);
	}

	/// To be called immediately after an extrinsic has been applied.
	///
	/// Emits an `ExtrinsicSuccess` or `ExtrinsicFailed` event depending on the outcome.
	/// The emitted event contains the post-dispatch corrected weight including
	/// the base-weight for its dispatch class.
	pub fn note_applied_extrinsic(
		ext: &mut dyn Externalities,
		r: &DispatchResultWithPostInfo,
		info: DispatchInfo,
	) {
		let weight = extract_actual_weight(r, &info)
			.saturating_add(T::BlockWeights::get().get(info.class).base_extrinsic);
		let pays_fee = extract_actual_pays_fee(r, &info);
		let dispatch_info = DispatchInfo { weight, class: info.class, pays_fee };

		let event = match r {
			Ok(_) => Event::<T>::ExtrinsicSuccess { dispatch_info },
			Err(err) => {
				log::trace!(
					target: LOG_TARGET,
					"Extrinsic failed at block({:?}): {:?}",
					Self::block_number(&*ext),
					err,
				);
				Event::<T>::ExtrinsicFailed { dispatch_error: err.error, dispatch_info }
			},
		};
		Self::deposit_event(ext, event);

		let next_extrinsic_index = Self::extrinsic_index(&*ext).unwrap_or_default() + 1u32;

		unhashed::put(ext, well_known_keys::EXTRINSIC_INDEX, &next_extrinsic_index);
		ExecutionPhase::put(ext, Phase::ApplyExtrinsic(next_extrinsic_index));
	}

	/// To be called immediately after `note_applied_extrinsic` of the last extrinsic of the block
	/// has been called.
	pub fn note_finished_extrinsics(ext: &mut dyn Externalities) {
		let extrinsic_index: u32 =
			unhashed::take(ext, well_known_keys::EXTRINSIC_INDEX).unwrap_or_default();
		ExtrinsicCount::put(ext, extrinsic_index);
		ExecutionPhase::put(ext, Phase::Finalization);
	}

	/// To be called immediately after finishing the initialization of the block
	/// (e.g., called `on_initialize` for all modules).
	pub fn note_finished_initialize(ext: &mut dyn Externalities) {
		ExecutionPhase::put(ext, Phase::ApplyExtrinsic(0))
	}

	/// An account is being created.
	fn on_created_account(ext: &mut dyn Externalities, who: T::AccountId) {
		T::OnNewAccount::on_new_account(ext, &who);
		Self::deposit_event(ext, Event::<T>::NewAccount { account: who });
	}

	/// Do anything that needs to be done after an account has been killed.
	fn on_killed_account(ext: &mut dyn Externalities, who: T::AccountId) {
		T::OnKilledAccount::on_killed_account(ext, &who);
		Self::deposit_event(ext, Event::<T>::KilledAccount { account: who });
	}
}

/// Implement StoredMap for a simple single-item, provide-when-not-default system. This works fine
/// for storing a single item which allows the account to continue existing as long as it's not
/// empty/default.
///
/// Anything more complex will need more sophisticated logic.
impl<T: Config> StoredMap<T::AccountId, T::AccountData> for Pallet<T> {
	fn get(ext: &dyn Externalities, k: &T::AccountId) -> T::AccountData {
		Account::<T>::get(ext, k).data
	}

	fn try_mutate_exists<R, E: From<DispatchError>>(
		ext: &mut dyn Externalities,
		k: &T::AccountId,
		f: impl FnOnce(&mut Option<T::AccountData>) -> Result<R, E>,
	) -> Result<R, E> {
		let account = Account::<T>::get(&*ext, k);
		let was_providing = account.data != T::AccountData::default();
		let mut some_data = if was_providing { Some(account.data) } else { None };
		let result = f(&mut some_data)?;
		let is_providing = some_data.is_some();
		if !was_providing && is_providing {
			Self::inc_providers(ext, k);
		} else if was_providing && !is_providing {
			match Self::dec_providers(ext, k)? {
				DecRefStatus::Reaped => return Ok(result),
				DecRefStatus::Exists => {
					// Update value as normal...
				},
			}
		} else if !was_providing && !is_providing {
			return Ok(result)
		}
		Account::<T>::mutate(ext, k, |a| a.data = some_data.unwrap_or_default());
		Ok(result)
	}
}
