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

//! # Aura Module
//!
//! Keeps the state the Aura block authoring engine needs in the runtime: the set of authorities
//! that take turns to author blocks and the slot of the current block.
//!
//! ## Slots
//!
//! Time is split into slots of [`Config::SlotDuration`] milliseconds. The author of a block puts
//! the slot it authored in into a `PreRuntime` digest item tagged with [`AURA_ENGINE_ID`]. When
//! the block is initialized the slot is read from the digest and stored as [`CurrentSlot`]. A
//! block whose slot does not increase, or cannot be decoded, is invalid.
//!
//! The module implements [`OnTimestampSet`] and must be hooked into the timestamp module: the
//! timestamp set by a block has to fall into the slot announced by its digest.
//!
//! The module has no dispatchable calls. The authority set is written once, at genesis.

use core::marker::PhantomData;

use codec::Decode;
use sp_core::sr25519;
use stf_primitives::{
	BlockNumber, ConsensusEngineId, DispatchError, DispatchResult, Externalities, Moment, Weight,
};
use stf_support::{
	storage_prefixes,
	traits::{BuildGenesisConfig, Get, Hooks},
	Abort, StorageValue, ValueQuery,
};
use stf_timestamp::OnTimestampSet;

#[cfg(test)]
mod mock;

/// Log target of the Aura module.
pub const LOG_TARGET: &str = "runtime::aura";

/// The engine id of Aura digest items.
pub const AURA_ENGINE_ID: ConsensusEngineId = *b"aura";

/// The key type of Aura session keys.
pub const KEY_TYPE: [u8; 4] = *b"aura";

/// Identity of an Aura authority.
pub type AuthorityId = sr25519::Public;

/// A slot number, the number of slot durations since the unix epoch.
pub type Slot = u64;

pub trait Config: stf_system::Config {
	/// The maximum number of authorities that the module can hold.
	type MaxAuthorities: Get<u32>;

	/// The duration of a slot in milliseconds.
	type SlotDuration: Get<Moment>;
}

/// A slot duration of twice the minimum period of the timestamp module.
pub struct MinimumPeriodTimesTwo<T>(PhantomData<T>);

impl<T: stf_timestamp::Config> Get<Moment> for MinimumPeriodTimesTwo<T> {
	fn get() -> Moment {
		T::MinimumPeriod::get().saturating_mul(2)
	}
}

storage_prefixes! {
	module = "Aura";
	pub struct AuthoritiesPrefix = "Authorities";
	pub struct CurrentSlotPrefix = "CurrentSlot";
}

/// The current authority set.
pub type Authorities = StorageValue<AuthoritiesPrefix, Vec<AuthorityId>, ValueQuery>;

/// The current slot of this block.
///
/// This will be set in `on_initialize`.
pub type CurrentSlot = StorageValue<CurrentSlotPrefix, Slot, ValueQuery>;

pub struct Pallet<T>(PhantomData<T>);

impl<T: Config> Hooks for Pallet<T> {
	fn on_initialize(ext: &mut dyn Externalities, _n: BlockNumber) -> Result<Weight, Abort> {
		let Some(new_slot) = Self::current_slot_from_digests(&*ext)? else {
			return Ok(T::DbWeight::get().reads(1))
		};

		let current_slot = CurrentSlot::get(&*ext);
		if current_slot >= new_slot {
			log::error!(
				target: LOG_TARGET,
				"slot {} of the block does not follow slot {}",
				new_slot,
				current_slot,
			);
			return Err(Abort::Hook { module: "Aura", reason: "Slot must increase" })
		}
		CurrentSlot::put(ext, new_slot);

		Ok(T::DbWeight::get().reads_writes(2, 1))
	}
}

impl<T: Config> Pallet<T> {
	/// The current authority set.
	pub fn authorities(ext: &dyn Externalities) -> Vec<AuthorityId> {
		Authorities::get(ext)
	}

	/// The slot of the current block.
	pub fn current_slot(ext: &dyn Externalities) -> Slot {
		CurrentSlot::get(ext)
	}

	/// Determine the Aura slot-duration based on the timestamp module configuration.
	pub fn slot_duration() -> Moment {
		T::SlotDuration::get()
	}

	/// The slot announced by the pre-runtime digest of the current block, if any.
	fn current_slot_from_digests(ext: &dyn Externalities) -> Result<Option<Slot>, Abort> {
		let digest = stf_system::Pallet::<T>::digest(ext);
		let Some(mut data) = digest.log::<[u8], _>(|item| {
			item.as_pre_runtime().filter(|(id, _)| *id == AURA_ENGINE_ID).map(|(_, data)| data)
		}) else {
			return Ok(None)
		};

		Slot::decode(&mut data).map(Some).map_err(|e| {
			log::error!(target: LOG_TARGET, "undecodable slot in pre-runtime digest: {}", e);
			Abort::Hook { module: "Aura", reason: "Invalid slot in the pre-runtime digest" }
		})
	}

	/// Initial authorities.
	///
	/// The storage will be applied immediately.
	///
	/// The authorities length must be equal or less than `T::MaxAuthorities`.
	fn initialize_authorities(ext: &mut dyn Externalities, authorities: &[AuthorityId]) {
		if authorities.is_empty() {
			return
		}

		assert!(Authorities::get(&*ext).is_empty(), "Authorities are already initialized!");
		assert!(
			authorities.len() <= T::MaxAuthorities::get() as usize,
			"Aura: `Config::MaxAuthorities` is smaller than the number of genesis authorities!",
		);
		Authorities::put(ext, authorities);
		log::debug!(target: LOG_TARGET, "initialized with {} authorities", authorities.len());
	}
}

impl<T: Config> OnTimestampSet<Moment> for Pallet<T> {
	fn on_timestamp_set(ext: &mut dyn Externalities, moment: Moment) -> DispatchResult {
		let slot_duration = Self::slot_duration();
		if slot_duration == 0 {
			return Err(DispatchError::Other("Aura slot duration cannot be zero."))
		}

		let timestamp_slot = moment / slot_duration;
		let current_slot = CurrentSlot::get(&*ext);
		if current_slot != timestamp_slot {
			log::debug!(
				target: LOG_TARGET,
				"timestamp {} is in slot {}, the block announced slot {}",
				moment,
				timestamp_slot,
				current_slot,
			);
			return Err(DispatchError::Other("Timestamp slot must match `CurrentSlot`"))
		}
		Ok(())
	}
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct GenesisConfig<T: Config> {
	pub authorities: Vec<AuthorityId>,
	pub _config: PhantomData<T>,
}

impl<T: Config> Default for GenesisConfig<T> {
	fn default() -> Self {
		Self { authorities: Vec::new(), _config: PhantomData }
	}
}

impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
	fn build(&self, ext: &mut dyn Externalities) {
		Pallet::<T>::initialize_authorities(ext, &self.authorities);
	}
}
