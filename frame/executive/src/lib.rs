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

//! # Executive Module
//!
//! The Executive module acts as the orchestration layer for the runtime. It dispatches incoming
//! extrinsic calls to the respective modules in the runtime.
//!
//! ## Overview
//!
//! The executive module is not a typical module providing functionality around a specific feature.
//! It is a cross-cutting framework component for the runtime. It uses the system module and the
//! modules of the runtime to perform these tasks:
//!
//! - Check transaction validity.
//! - Initialize a block.
//! - Apply extrinsics.
//! - Execute a block.
//! - Finalize a block.
//! - Start an off-chain worker.
//!
//! It also builds and checks the inherents of a block, see [`Executive::create_inherents`],
//! [`Executive::check_inherents`] and [`Executive::ensure_inherents_are_first`].
//!
//! Every failure that makes a block unusable is returned as an [`Abort`]. Failures that only
//! concern a single transaction are returned as a
//! [`TransactionValidityError`](stf_primitives::transaction_validity::TransactionValidityError)
//! and leave the block intact.
//!
//! ## Usage
//!
//! The default Substrate-style way of using the executive is to declare a type alias that wires
//! the runtime to it:
//!
//! ```ignore
//! pub type Executive = stf_executive::Executive<
//! 	Runtime,
//! 	UncheckedExtrinsic,
//! 	AccountIdLookup,
//! 	Runtime,
//! 	AllModules,
//! 	InherentModules,
//! >;
//! ```
//!
//! ### Custom `OnRuntimeUpgrade` logic
//!
//! A runtime-level migration can be run before the `on_runtime_upgrade` hooks of the modules by
//! passing it as the last type parameter.

use core::{fmt::Debug, marker::PhantomData};

use codec::{Codec, Encode};
use sp_core::hexdisplay::HexDisplay;
use stf_primitives::{
	generic::{Block, Digest, Header},
	traits::{Applyable, Checkable, Extrinsic, GetDispatchInfo, ValidateUnsigned},
	transaction_validity::{InvalidTransaction, TransactionSource, TransactionValidity},
	version::LastRuntimeUpgradeInfo,
	Abort, ApplyExtrinsicResult, BlockNumber, DispatchClass, Externalities, Hash, Weight,
};
use stf_support::{
	inherent::{CheckInherentsResult, InherentData, InherentProviders},
	traits::{Get, Hooks, OnRuntimeUpgrade},
};
use stf_system::{BlockHash, LastRuntimeUpgrade};


/// Log target of the executive.
pub const LOG_TARGET: &str = "runtime::executive";

/// The checked form of the extrinsic `E` looked up through `L`.
pub type CheckedOf<E, L> = <E as Checkable<L>>::Checked;
/// The call carried by the extrinsic `E`.
pub type CallOf<E> = <E as Extrinsic>::Call;

/// Main entry point for certain runtime actions as e.g. `execute_block`.
///
/// Generic parameters:
/// - `System`: Something that implements `stf_system::Config`
/// - `Xt`: The extrinsic type of the blocks
/// - `Lookup`: The lookup resolving the signer addresses of `Xt`
/// - `UnsignedValidator`: The unsigned transaction validator of the runtime
/// - `AllModules`: Tuple that contains all modules including the system module. Will be used
///   to call hooks e.g. `on_initialize`.
/// - `Inherents`: The inherent providers of the runtime, in the order their inherents are
///   created.
/// - `COnRuntimeUpgrade`: Custom logic that should be called after a runtime upgrade. Modules
///   are called in the order they are declared in `AllModules`, this one is called before
///   them.
pub struct Executive<
	System,
	Xt,
	Lookup,
	UnsignedValidator,
	AllModules,
	Inherents,
	COnRuntimeUpgrade = (),
>(PhantomData<(System, Xt, Lookup, UnsignedValidator, AllModules, Inherents, COnRuntimeUpgrade)>);

impl<System, Xt, Lookup, UnsignedValidator, AllModules, Inherents, COnRuntimeUpgrade>
	Executive<System, Xt, Lookup, UnsignedValidator, AllModules, Inherents, COnRuntimeUpgrade>
where
	System: stf_system::Config,
	Xt: Checkable<Lookup> + Extrinsic + Codec + Debug,
	CheckedOf<Xt, Lookup>: Applyable + GetDispatchInfo,
	UnsignedValidator: ValidateUnsigned<Call = <CheckedOf<Xt, Lookup> as Applyable>::Call>,
	AllModules: Hooks,
	Inherents: InherentProviders<CallOf<Xt>>,
	COnRuntimeUpgrade: OnRuntimeUpgrade,
{
	/// Execute all `OnRuntimeUpgrade` of this runtime, and return the aggregate weight.
	pub fn execute_on_runtime_upgrade(ext: &mut dyn Externalities) -> Result<Weight, Abort> {
		let weight = COnRuntimeUpgrade::on_runtime_upgrade(ext)?;
		Ok(weight.saturating_add(AllModules::on_runtime_upgrade(ext)?))
	}

	/// Start the execution of a particular block.
	pub fn initialize_block(ext: &mut dyn Externalities, header: &Header) -> Result<(), Abort> {
		log::trace!(target: LOG_TARGET, "initialize_block({:?})", header.number);
		let digests = Self::extract_pre_digest(header);
		Self::initialize_block_impl(ext, header.number, &header.parent_hash, &digests)
	}

	fn extract_pre_digest(header: &Header) -> Digest {
		let mut digest = Digest::default();
		header.digest.logs().iter().for_each(|d| {
			if d.as_pre_runtime().is_some() {
				digest.push(d.clone())
			}
		});
		digest
	}

	fn initialize_block_impl(
		ext: &mut dyn Externalities,
		block_number: BlockNumber,
		parent_hash: &Hash,
		digest: &Digest,
	) -> Result<(), Abort> {
		// Reset events before apply runtime upgrade hook.
		// This is required to preserve events from runtime upgrade hook.
		// This means the format of all the event related storages must always be compatible.
		stf_system::Pallet::<System>::reset_events(ext);

		let mut weight = Weight::zero();
		if Self::runtime_upgraded(&*ext) {
			weight = weight.saturating_add(Self::execute_on_runtime_upgrade(ext)?);

			LastRuntimeUpgrade::put(ext, LastRuntimeUpgradeInfo::from(System::Version::get()));
		}
		stf_system::Pallet::<System>::initialize(ext, block_number, parent_hash, digest);
		weight = weight.saturating_add(AllModules::on_initialize(ext, block_number)?);
		weight = weight.saturating_add(System::BlockWeights::get().base_block);
		stf_system::Pallet::<System>::register_extra_weight_unchecked(
			ext,
			weight,
			DispatchClass::Mandatory,
		);

		stf_system::Pallet::<System>::note_finished_initialize(ext);
		Ok(())
	}

	/// Returns if the runtime has been upgraded, based on [`LastRuntimeUpgrade`].
	fn runtime_upgraded(ext: &dyn Externalities) -> bool {
		let last = LastRuntimeUpgrade::get(ext);
		let current = System::Version::get();

		let upgraded = last.map(|v| v.was_upgraded(&current)).unwrap_or(true);
		if upgraded {
			log::info!(
				target: LOG_TARGET,
				"runtime upgraded to {} v{}",
				current.spec_name,
				current.spec_version,
			);
		}
		upgraded
	}

	fn initial_checks(ext: &dyn Externalities, block: &Block<Xt>) -> Result<(), Abort> {
		let header = block.header();

		// Check that `parent_hash` is correct.
		let n = header.number;
		if n > 0 && BlockHash::get(ext, n - 1) != header.parent_hash {
			log::error!(target: LOG_TARGET, "parent hash of block #{} is not the known one", n);
			return Err(Abort::InvalidParentHash)
		}

		Self::ensure_inherents_are_first(block).map_err(Abort::InvalidInherentPosition)
	}

	/// Actually execute all transitions for `block`.
	pub fn execute_block(ext: &mut dyn Externalities, block: Block<Xt>) -> Result<(), Abort> {
		// any initial checks, against the state of the parent block
		Self::initial_checks(&*ext, &block)?;

		Self::initialize_block(ext, block.header())?;

		// execute extrinsics
		let (header, extrinsics) = block.deconstruct();
		Self::apply_extrinsics(ext, extrinsics)?;

		stf_system::Pallet::<System>::note_finished_extrinsics(ext);
		Self::idle_and_finalize_hook(ext, header.number)?;

		// any final checks
		Self::final_checks(ext, &header)
	}

	/// Execute given extrinsics.
	fn apply_extrinsics(ext: &mut dyn Externalities, extrinsics: Vec<Xt>) -> Result<(), Abort> {
		extrinsics.into_iter().enumerate().try_for_each(|(index, uxt)| {
			Self::apply_extrinsic(ext, uxt).map(|_| ()).map_err(|error| {
				log::error!(
					target: LOG_TARGET,
					"Invalid extrinsic #{} in block: {:?}",
					index,
					error,
				);
				Abort::InvalidExtrinsic { index: index as u32, error }
			})
		})
	}

	/// Finalize the block - it is up the caller to ensure that all header fields are valid
	/// except state-root.
	pub fn finalize_block(ext: &mut dyn Externalities) -> Result<Header, Abort> {
		stf_system::Pallet::<System>::note_finished_extrinsics(ext);
		let block_number = stf_system::Pallet::<System>::block_number(&*ext);
		Self::idle_and_finalize_hook(ext, block_number)?;

		Ok(stf_system::Pallet::<System>::finalize(ext))
	}

	/// Run the `on_idle` hook of all modules, followed by the `on_finalize` hook of all modules.
	fn idle_and_finalize_hook(
		ext: &mut dyn Externalities,
		block_number: BlockNumber,
	) -> Result<(), Abort> {
		let weight = stf_system::Pallet::<System>::block_weight(&*ext);
		let max_weight = System::BlockWeights::get().max_block;
		let remaining_weight = max_weight.saturating_sub(weight.total());

		if remaining_weight.all_gt(Weight::zero()) {
			let used_weight = AllModules::on_idle(ext, block_number, remaining_weight)?;
			stf_system::Pallet::<System>::register_extra_weight_unchecked(
				ext,
				used_weight,
				DispatchClass::Mandatory,
			);
		}

		AllModules::on_finalize(ext, block_number)
	}

	/// Apply extrinsic outside of the block execution function.
	///
	/// This doesn't attempt to validate anything regarding the block, but it builds a list of uxt
	/// hashes.
	pub fn apply_extrinsic(ext: &mut dyn Externalities, uxt: Xt) -> ApplyExtrinsicResult {
		let encoded = uxt.encode();
		let encoded_len = encoded.len();
		log::trace!(target: LOG_TARGET, "apply_extrinsic {}", HexDisplay::from(&encoded));

		// Verify that the signature is good.
		let xt = uxt.check(&*ext)?;

		// We don't need to make sure to `note_extrinsic` only after we know it's going to be
		// executed to prevent it from leaking in storage since at this point, it will either
		// execute or be rejected (and its storage changes reverted).
		stf_system::Pallet::<System>::note_extrinsic(ext, encoded);

		// AUDIT: Under no circumstances may this function panic from here onwards.

		// Decode parameters and dispatch
		let dispatch_info = xt.get_dispatch_info();
		let r = Applyable::apply::<UnsignedValidator>(xt, ext, &dispatch_info, encoded_len)?;

		// Mandatory(inherents) are not allowed to fail.
		//
		// The entire block should be discarded if an inherent fails to apply. Otherwise
		// it may open an attack vector.
		if r.is_err() && dispatch_info.class == DispatchClass::Mandatory {
			return Err(InvalidTransaction::BadMandatory.into())
		}

		stf_system::Pallet::<System>::note_applied_extrinsic(ext, &r, dispatch_info);

		Ok(r.map(|_| ()).map_err(|e| e.error))
	}

	fn final_checks(ext: &mut dyn Externalities, header: &Header) -> Result<(), Abort> {
		// remove temporaries
		let new_header = stf_system::Pallet::<System>::finalize(ext);

		// check digest
		if header.digest.logs().len() != new_header.digest.logs().len() {
			return Err(Abort::DigestCountMismatch)
		}

		let items_zip = header.digest.logs().iter().zip(new_header.digest.logs().iter());
		for (header_item, computed_item) in items_zip {
			if header_item != computed_item {
				return Err(Abort::DigestItemMismatch)
			}
		}

		// check storage root.
		if header.state_root != new_header.state_root {
			return Err(Abort::StateRootMismatch {
				expected: header.state_root,
				computed: new_header.state_root,
			})
		}

		// check transaction trie root represents the transactions.
		if header.extrinsics_root != new_header.extrinsics_root {
			return Err(Abort::ExtrinsicsRootMismatch {
				expected: header.extrinsics_root,
				computed: new_header.extrinsics_root,
			})
		}

		Ok(())
	}

	/// Check a given signed transaction for validity. This doesn't execute any
	/// side-effects; it merely checks whether the transaction would panic if it were included or
	/// not.
	///
	/// Changes made to storage should be discarded.
	pub fn validate_transaction(
		ext: &mut dyn Externalities,
		source: TransactionSource,
		uxt: Xt,
		block_hash: Hash,
	) -> TransactionValidity {
		let next_block = stf_system::Pallet::<System>::block_number(&*ext).saturating_add(1);
		stf_system::Pallet::<System>::initialize(ext, next_block, &block_hash, &Default::default());

		let encoded_len = uxt.using_encoded(|d| d.len());

		let xt = uxt.check(&*ext)?;

		let dispatch_info = xt.get_dispatch_info();

		if dispatch_info.class == DispatchClass::Mandatory {
			return Err(InvalidTransaction::MandatoryValidation.into())
		}

		xt.validate::<UnsignedValidator>(&*ext, source, &dispatch_info, encoded_len)
	}

	/// Start an offchain worker and generate extrinsics.
	pub fn offchain_worker(ext: &mut dyn Externalities, header: &Header) {
		// We need to keep events available for offchain workers,
		// hence we initialize the block manually.
		// OffchainWorker RuntimeApi should skip initialization.
		let digests = header.digest.clone();

		stf_system::Pallet::<System>::initialize(
			ext,
			header.number,
			&header.parent_hash,
			&digests,
		);

		// Frame system only inserts the parent hash into the block hashes as normally we don't know
		// the hash for the header before. However, here we are aware of the hash and we can add it
		// as well.
		let hash = header.hash(&*ext);
		BlockHash::insert(ext, header.number, hash);

		AllModules::offchain_worker(ext, header.number)
	}

	/// Create the inherents of the next block out of the given inherent data.
	///
	/// The inherents are created in the declaration order of `Inherents`. Inherent data a module
	/// cannot read aborts the call.
	pub fn create_inherents(
		ext: &dyn Externalities,
		data: &InherentData,
	) -> Result<Vec<Xt>, Abort> {
		let mut calls = Vec::new();
		Inherents::create_inherents(ext, data, &mut calls)?;

		Ok(calls
			.into_iter()
			.map(|call| {
				Xt::new(call, None).expect(
					"Runtime UncheckedExtrinsic is not Opaque, so it has to return `Some`; qed",
				)
			})
			.collect())
	}

	/// Check the inherents of `block` against the inherent data of the importing node.
	///
	/// Only the leading inherents are looked at: the walk stops at the first signed extrinsic or
	/// at the first unsigned one that no module recognizes as its inherent.
	pub fn check_inherents(
		ext: &dyn Externalities,
		block: &Block<Xt>,
		data: &InherentData,
	) -> Result<CheckInherentsResult, Abort> {
		let mut result = CheckInherentsResult::new();
		let mut inherents = Vec::new();

		for xt in block.extrinsics() {
			// Inherents are before any other extrinsics.
			// And signed extrinsics are not inherents.
			if xt.is_signed().unwrap_or(false) {
				break
			}

			// No module marked it as inherent thus it is not.
			if !Inherents::check_inherent(ext, xt.call(), data, &mut result)? {
				break
			}

			if result.fatal_error() {
				return Ok(result)
			}
			inherents.push(xt.call());
		}

		Inherents::check_required(ext, data, &inherents, &mut result);
		Ok(result)
	}

	/// Check that all the inherents of `block` come before any other extrinsic.
	///
	/// Returns the index of the first inherent found after a signed or non-inherent extrinsic.
	pub fn ensure_inherents_are_first(block: &Block<Xt>) -> Result<(), u32> {
		let mut first_signed_observed = false;

		for (i, xt) in block.extrinsics().iter().enumerate() {
			let is_signed = xt.is_signed().unwrap_or(false);

			let is_inherent = if is_signed {
				// Signed extrinsics are not inherents.
				false
			} else {
				Inherents::is_inherent(xt.call())
			};

			if !is_inherent {
				first_signed_observed = true;
			}

			if first_signed_observed && is_inherent {
				return Err(i as u32)
			}
		}

		Ok(())
	}
}
