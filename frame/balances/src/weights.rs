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

//! Autogenerated weights for the balances module.

use core::marker::PhantomData;
use stf_primitives::{weights::constants::ROCKS_DB_WEIGHT, Weight};
use stf_support::traits::Get;

/// Weight functions needed for the balances module.
pub trait WeightInfo {
	fn transfer() -> Weight;
	fn transfer_keep_alive() -> Weight;
	fn set_balance_creating() -> Weight;
	fn set_balance_killing() -> Weight;
	fn force_transfer() -> Weight;
	fn transfer_all() -> Weight;
	fn force_unreserve() -> Weight;
}

/// Weights for the balances module using the runtime's database weights.
pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: stf_system::Config> WeightInfo for SubstrateWeight<T> {
	/// Storage: `System::Account` (r:1 w:1)
	fn transfer() -> Weight {
		Weight::from_parts(38_109_000, 3593)
			.saturating_add(T::DbWeight::get().reads(1_u64))
			.saturating_add(T::DbWeight::get().writes(1_u64))
	}
	/// Storage: `System::Account` (r:1 w:1)
	fn transfer_keep_alive() -> Weight {
		Weight::from_parts(28_791_000, 3593)
			.saturating_add(T::DbWeight::get().reads(1_u64))
			.saturating_add(T::DbWeight::get().writes(1_u64))
	}
	/// Storage: `System::Account` (r:1 w:1)
	fn set_balance_creating() -> Weight {
		Weight::from_parts(10_563_000, 3593)
			.saturating_add(T::DbWeight::get().reads(1_u64))
			.saturating_add(T::DbWeight::get().writes(1_u64))
	}
	/// Storage: `System::Account` (r:1 w:1)
	fn set_balance_killing() -> Weight {
		Weight::from_parts(15_219_000, 3593)
			.saturating_add(T::DbWeight::get().reads(1_u64))
			.saturating_add(T::DbWeight::get().writes(1_u64))
	}
	/// Storage: `System::Account` (r:2 w:2)
	fn force_transfer() -> Weight {
		Weight::from_parts(40_360_000, 6196)
			.saturating_add(T::DbWeight::get().reads(2_u64))
			.saturating_add(T::DbWeight::get().writes(2_u64))
	}
	/// Storage: `System::Account` (r:1 w:1)
	fn transfer_all() -> Weight {
		Weight::from_parts(35_121_000, 3593)
			.saturating_add(T::DbWeight::get().reads(1_u64))
			.saturating_add(T::DbWeight::get().writes(1_u64))
	}
	/// Storage: `System::Account` (r:1 w:1)
	fn force_unreserve() -> Weight {
		Weight::from_parts(17_029_000, 3593)
			.saturating_add(T::DbWeight::get().reads(1_u64))
			.saturating_add(T::DbWeight::get().writes(1_u64))
	}
}

// For backwards compatibility and tests.
impl WeightInfo for () {
	fn transfer() -> Weight {
		Weight::from_parts(38_109_000, 3593)
			.saturating_add(ROCKS_DB_WEIGHT.reads(1_u64))
			.saturating_add(ROCKS_DB_WEIGHT.writes(1_u64))
	}
	fn transfer_keep_alive() -> Weight {
		Weight::from_parts(28_791_000, 3593)
			.saturating_add(ROCKS_DB_WEIGHT.reads(1_u64))
			.saturating_add(ROCKS_DB_WEIGHT.writes(1_u64))
	}
	fn set_balance_creating() -> Weight {
		Weight::from_parts(10_563_000, 3593)
			.saturating_add(ROCKS_DB_WEIGHT.reads(1_u64))
			.saturating_add(ROCKS_DB_WEIGHT.writes(1_u64))
	}
	fn set_balance_killing() -> Weight {
		Weight::from_parts(15_219_000, 3593)
			.saturating_add(ROCKS_DB_WEIGHT.reads(1_u64))
			.saturating_add(ROCKS_DB_WEIGHT.writes(1_u64))
	}
	fn force_transfer() -> Weight {
		Weight::from_parts(40_360_000, 6196)
			.saturating_add(ROCKS_DB_WEIGHT.reads(2_u64))
			.saturating_add(ROCKS_DB_WEIGHT.writes(2_u64))
	}
	fn transfer_all() -> Weight {
		Weight::from_parts(35_121_000, 3593)
			.saturating_add(ROCKS_DB_WEIGHT.reads(1_u64))
			.saturating_add(ROCKS_DB_WEIGHT.writes(1_u64))
	}
	fn force_unreserve() -> Weight {
		Weight::from_parts(17_029_000, 3593)
			.saturating_add(ROCKS_DB_WEIGHT.reads(1_u64))
			.saturating_add(ROCKS_DB_WEIGHT.writes(1_u64))
	}
}
