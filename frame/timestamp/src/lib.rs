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
//! # Timestamp Module
//!
//! The Timestamp module provides functionality to get and set the on-chain time.
//!
//! ## Overview
//!
//! The Timestamp module allows the validators to set and validate a timestamp with each block.
//!
//! It uses inherents for timestamp data, which is provided by the block author and
//! validated/verified by other validators. The timestamp can be set only once per block and must be
//! set each block. There could be a constraint on how much time must pass before setting the new
//! timestamp.
//!
//! **NOTE:** The Timestamp module is the recommended way to query the on-chain time instead of
//! using an approach based on block numbers. The block number based time measurement can cause
//! issues because of cumulative calculation errors and hence should be avoided.
//!
//! ## Interface
//!
//! ### Dispatchable Functions
//!
//! * `set` - Sets the current time.
//!
//! ### Public functions
//!
//! * `get` - Gets the current time for the current block. If this function is called prior to
//!   setting the timestamp, it will return the timestamp of the previous block.
//!
//! ### Config Getters
//!
//! * `MinimumPeriod` - Gets the minimum (and advised) period between blocks for the chain.

use core::marker::PhantomData;

use codec::{Decode, Encode};
use scale_info::TypeInfo;
use stf_primitives::{
	traits::{GetDispatchInfo, ValidateUnsigned},
	transaction_validity::{
		TransactionSource, TransactionValidity, TransactionValidityError, ValidTransaction,
	},
	BlockNumber, DispatchClass, DispatchInfo, DispatchResult, DispatchResultWithPostInfo,
	Externalities, Moment, Pays, Weight,
};
use stf_support::{
	dispatch::{dispatch_info, GetCallIndex, GetCallName, UnfilteredDispatchable},
	ensure,
	inherent::{InherentData, InherentIdentifier, IsFatalError, ProvideInherent},
	storage_prefixes,
	traits::{Get, Hooks},
	Abort, StorageValue, ValueQuery,
};
use stf_system::{ensure_none, OriginFor};

pub mod weights;

#[cfg(test)]
mod mock;
#[cfg(test)]
mod tests;

pub use weights::WeightInfo;

/// Log target of the timestamp module.
pub const LOG_TARGET: &str = "runtime::timestamp";

/// The identifier for the `timstap0` inherent.
pub const INHERENT_IDENTIFIER: InherentIdentifier = *b"timstap0";

/// How far ahead of the local clock an inherent timestamp may be.
pub const MAX_TIMESTAMP_DRIFT_MILLIS: Moment = 30_000;

/// The type of the inherent.
pub type InherentType = Moment;

/// Errors that can occur while checking the timestamp inherent.
#[derive(Encode, Decode, Debug, Clone, Copy, PartialEq, Eq, TypeInfo, thiserror::Error)]
pub enum InherentError {
	/// The time since the last timestamp is lower than the minimum period.
	#[error("The time since the last timestamp is lower than the minimum period.")]
	TooEarly,
	/// The block timestamp is too far in the future.
	#[error("The timestamp of the block is too far in the future.")]
	TooFarInFuture,
}

impl IsFatalError for InherentError {
	fn is_fatal_error(&self) -> bool {
		match self {
			InherentError::TooEarly => true,
			InherentError::TooFarInFuture => true,
		}
	}
}

impl InherentError {
	/// Try to create an instance out of the given identifier and data.
	pub fn try_from(id: &InherentIdentifier, mut data: &[u8]) -> Option<Self> {
		if id == &INHERENT_IDENTIFIER {
			<InherentError as Decode>::decode(&mut data).ok()
		} else {
			None
		}
	}
}

/// A trait which is called when the timestamp is set in the runtime.
pub trait OnTimestampSet<Moment> {
	/// Called when the timestamp is set. An error fails the `set` call.
	fn on_timestamp_set(ext: &mut dyn Externalities, moment: Moment) -> DispatchResult;
}

#[impl_trait_for_tuples::impl_for_tuples(30)]
impl<Moment: Copy> OnTimestampSet<Moment> for Tuple {
	fn on_timestamp_set(ext: &mut dyn Externalities, moment: Moment) -> DispatchResult {
		for_tuples!( #( Tuple::on_timestamp_set(ext, moment)?; )* );
		Ok(())
	}
}

/// The module configuration trait.
pub trait Config: stf_system::Config {
	/// The minimum period between blocks.
	///
	/// Be aware that this is different to the *expected* period that the block production
	/// apparatus provides. Your chosen consensus system will generally work with this to
	/// determine a sensible block time. For example, in the Aura module it will be double this
	/// period on default settings.
	type MinimumPeriod: Get<Moment>;

	/// Something which can be notified (e.g. another module) when the timestamp is set.
	///
	/// This can be set to `()` if it is not needed.
	type OnTimestampSet: OnTimestampSet<Moment>;

	/// Weight information for extrinsics in this module.
	type WeightInfo: WeightInfo;
}

/// The timestamp module.
pub struct Pallet<T>(PhantomData<T>);

/// Contains the dispatchable functions of the timestamp module.
#[derive(Encode, Decode, Clone, PartialEq, Eq, Debug, TypeInfo)]
#[scale_info(skip_type_params(T))]
#[allow(non_camel_case_types)]
pub enum Call<T: Config> {
	/// Set the current time.
	#[codec(index = 0)]
	set {
		#[codec(compact)]
		now: Moment,
	},
	#[doc(hidden)]
	#[codec(skip)]
	__Ignore(PhantomData<T>, stf_support::Never),
}

storage_prefixes! {
	module = "Timestamp";
	pub struct NowPrefix = "Now";
	pub struct DidUpdatePrefix = "DidUpdate";
}

/// The current time for the current block.
pub type Now = StorageValue<NowPrefix, Moment, ValueQuery>;

/// Whether the timestamp has been updated in this block.
///
/// This value is updated to `true` upon successful submission of a timestamp by a node.
/// It is then checked at the end of each block execution in the `on_finalize` hook.
pub type DidUpdate = StorageValue<DidUpdatePrefix, bool, ValueQuery>;

impl<T: Config> GetDispatchInfo for Call<T> {
	fn get_dispatch_info(&self) -> DispatchInfo {
		match self {
			// Only the execution time is accounted, the proof size of `set` is not charged.
			Self::set { .. } => dispatch_info(
				&(
					Weight::from_parts(T::WeightInfo::set().ref_time(), 0),
					DispatchClass::Mandatory,
					Pays::Yes,
				),
				(),
			),
			Self::__Ignore(_, never) => match *never {},
		}
	}
}

impl<T: Config> GetCallIndex for Call<T> {
	fn get_call_indices() -> &'static [u8] {
		&[0]
	}

	fn get_call_index(&self) -> u8 {
		match self {
			Self::set { .. } => 0,
			Self::__Ignore(_, never) => match *never {},
		}
	}
}

impl<T: Config> GetCallName for Call<T> {
	fn get_call_names() -> &'static [&'static str] {
		&["set"]
	}

	fn get_call_name(&self) -> &'static str {
		match self {
			Self::set { .. } => "set",
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
			Self::set { now } => Pallet::<T>::set(ext, origin, now),
			Self::__Ignore(_, never) => match never {},
		}
	}
}

impl<T: Config> Hooks for Pallet<T> {
	/// Checks that the timestamp was set in this block.
	fn on_finalize(ext: &mut dyn Externalities, _n: BlockNumber) -> Result<(), Abort> {
		if !DidUpdate::take(ext) {
			log::error!(target: LOG_TARGET, "Timestamp must be updated once in the block");
			return Err(Abort::Hook {
				module: "Timestamp",
				reason: "Timestamp must be updated once in the block",
			})
		}
		Ok(())
	}
}

impl<T: Config> Pallet<T> {
	/// Set the current time.
	///
	/// This call should be invoked exactly once per block. A block in which it has not been
	/// invoked by the finalization phase is invalid.
	///
	/// The timestamp should be greater than the previous one by the amount specified by
	/// `MinimumPeriod`.
	///
	/// The dispatch origin for this call must be `None`.
	pub fn set(
		ext: &mut dyn Externalities,
		origin: OriginFor<T>,
		now: Moment,
	) -> DispatchResultWithPostInfo {
		ensure_none(origin)?;
		ensure!(!DidUpdate::exists(&*ext), "Timestamp must be updated only once in the block");
		let prev = Now::get(&*ext);
		ensure!(
			prev == 0 || now >= prev.saturating_add(T::MinimumPeriod::get()),
			"Timestamp must increment by at least <MinimumPeriod> between sequential blocks"
		);
		Now::put(ext, now);
		DidUpdate::put(ext, true);

		<T::OnTimestampSet as OnTimestampSet<_>>::on_timestamp_set(ext, now)?;

		Ok(().into())
	}

	/// Get the current time for the current block.
	///
	/// NOTE: if this function is called prior to setting the timestamp,
	/// it will return the timestamp of the previous block.
	pub fn get(ext: &dyn Externalities) -> Moment {
		Now::get(ext)
	}

	/// Set the timestamp to something in particular, bypassing the inherent. Only used for
	/// tests and genesis.
	pub fn set_timestamp(ext: &mut dyn Externalities, now: Moment) -> DispatchResult {
		Now::put(ext, now);
		<T::OnTimestampSet as OnTimestampSet<_>>::on_timestamp_set(ext, now)
	}
}

fn extract_inherent_data(data: &InherentData) -> Result<InherentType, Abort> {
	let reason = match data.get_data::<InherentType>(&INHERENT_IDENTIFIER) {
		Ok(Some(data)) => return Ok(data),
		Ok(None) => "Timestamp inherent must be provided.",
		Err(_) => "Invalid timestamp inherent data encoding.",
	};
	log::error!(target: LOG_TARGET, "{}", reason);
	Err(Abort::MalformedInherentData(reason))
}

impl<T: Config> ProvideInherent for Pallet<T> {
	type Call = Call<T>;
	type Error = InherentError;
	const INHERENT_IDENTIFIER: InherentIdentifier = INHERENT_IDENTIFIER;

	fn create_inherent(
		ext: &dyn Externalities,
		data: &InherentData,
	) -> Result<Option<Self::Call>, Abort> {
		let inherent_data = extract_inherent_data(data)?;

		let next_time = inherent_data.max(Now::get(ext).saturating_add(T::MinimumPeriod::get()));
		Ok(Some(Call::set { now: next_time }))
	}

	fn check_inherent(
		ext: &dyn Externalities,
		call: &Self::Call,
		data: &InherentData,
	) -> Result<Result<(), Self::Error>, Abort> {
		let t = match call {
			Call::set { now } => *now,
			Call::__Ignore(_, never) => match *never {},
		};

		let data = extract_inherent_data(data)?;

		Ok(if t > data.saturating_add(MAX_TIMESTAMP_DRIFT_MILLIS) {
			Err(InherentError::TooFarInFuture)
		} else if t < Now::get(ext).saturating_add(T::MinimumPeriod::get()) {
			Err(InherentError::TooEarly)
		} else {
			Ok(())
		})
	}

	fn is_inherent(call: &Self::Call) -> bool {
		matches!(call, Call::set { .. })
	}
}

impl<T: Config> ValidateUnsigned for Pallet<T> {
	type Call = Call<T>;

	fn pre_dispatch(
		_ext: &dyn Externalities,
		_call: &Self::Call,
	) -> Result<(), TransactionValidityError> {
		Ok(())
	}

	fn validate_unsigned(
		_ext: &dyn Externalities,
		_source: TransactionSource,
		_call: &Self::Call,
	) -> TransactionValidity {
		Ok(ValidTransaction::default())
	}
}
