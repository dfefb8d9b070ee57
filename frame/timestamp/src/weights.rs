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
//! Autogenerated weights for the timestamp module.

use core::marker::PhantomData;
use stf_primitives::{weights::constants::ROCKS_DB_WEIGHT, Weight};
use stf_support::traits::Get;

/// Weight functions needed for the timestamp module.
pub trait WeightInfo {
	fn set() -> Weight;
	fn on_finalize() -> Weight;
}

/// Weights for the timestamp module using the runtime's database weights.
pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: stf_system::Config> WeightInfo for SubstrateWeight<T> {
	/// Storage: `Timestamp::Now` (r:1 w:1)
	/// Storage: `Timestamp::DidUpdate` (r:1 w:0)
	fn set() -> Weight {
		Weight::from_parts(9_258_000, 1006)
			.saturating_add(T::DbWeight::get().reads(2_u64))
			.saturating_add(T::DbWeight::get().writes(1_u64))
	}
	fn on_finalize() -> Weight {
		Weight::from_parts(3_663_000, 0)
	}
}

// For backwards compatibility and tests.
impl WeightInfo for () {
	fn set() -> Weight {
		Weight::from_parts(9_258_000, 1006)
			.saturating_add(ROCKS_DB_WEIGHT.reads(2_u64))
			.saturating_add(ROCKS_DB_WEIGHT.writes(1_u64))
	}
	fn on_finalize() -> Weight {
		Weight::from_parts(3_663_000, 0)
	}
}
