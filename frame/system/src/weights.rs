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

//! Weights for the system module calls.

use core::marker::PhantomData;
use stf_primitives::{weights::constants::ROCKS_DB_WEIGHT, Weight};
use stf_support::traits::Get;

/// Weight functions needed for the system module.
pub trait WeightInfo {
	fn remark(b: u32) -> Weight;
	fn remark_with_event(b: u32) -> Weight;
	fn set_heap_pages() -> Weight;
	fn set_code() -> Weight;
	fn set_storage(i: u32) -> Weight;
	fn kill_storage(i: u32) -> Weight;
	fn kill_prefix(p: u32) -> Weight;
	fn authorize_upgrade() -> Weight;
	fn apply_authorized_upgrade() -> Weight;
}

/// Weights for the system module using the runtime's database weights.
pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: crate::Config> WeightInfo for SubstrateWeight<T> {
	/// The range of component `b` is `[0, 3932160]`.
	fn remark(b: u32) -> Weight {
		Weight::from_parts(2_056_000, 0)
			.saturating_add(Weight::from_parts(387, 0).saturating_mul(b.into()))
	}
	/// The range of component `b` is `[0, 3932160]`.
	fn remark_with_event(b: u32) -> Weight {
		Weight::from_parts(8_924_000, 0)
			.saturating_add(Weight::from_parts(1_568, 0).saturating_mul(b.into()))
	}
	/// Storage: `unknown` `0x3a686561707061676573` (r:0 w:1)
	fn set_heap_pages() -> Weight {
		Weight::from_parts(4_133_000, 1485)
			.saturating_add(T::DbWeight::get().writes(1_u64))
	}
	/// Storage: `unknown` `0x3a636f6465` (r:0 w:1)
	fn set_code() -> Weight {
		Weight::from_parts(90_175_322_000, 1485)
			.saturating_add(T::DbWeight::get().reads(1_u64))
			.saturating_add(T::DbWeight::get().writes(1_u64))
	}
	/// The range of component `i` is `[0, 1000]`.
	fn set_storage(i: u32) -> Weight {
		Weight::from_parts(2_178_000, 0)
			.saturating_add(Weight::from_parts(819_428, 0).saturating_mul(i.into()))
			.saturating_add(T::DbWeight::get().writes((1_u64).saturating_mul(i.into())))
	}
	/// The range of component `i` is `[0, 1000]`.
	fn kill_storage(i: u32) -> Weight {
		Weight::from_parts(2_047_000, 0)
			.saturating_add(Weight::from_parts(651_244, 0).saturating_mul(i.into()))
			.saturating_add(T::DbWeight::get().writes((1_u64).saturating_mul(i.into())))
	}
	/// The range of component `p` is `[0, 1000]`.
	fn kill_prefix(p: u32) -> Weight {
		Weight::from_parts(4_131_000, 85)
			.saturating_add(Weight::from_parts(1_243_190, 0).saturating_mul(p.into()))
			.saturating_add(T::DbWeight::get().reads((1_u64).saturating_mul(p.into())))
			.saturating_add(T::DbWeight::get().writes((1_u64).saturating_mul(p.into())))
			.saturating_add(Weight::from_parts(0, 70).saturating_mul(p.into()))
	}
	/// Storage: `System::AuthorizedUpgrade` (r:0 w:1)
	fn authorize_upgrade() -> Weight {
		Weight::from_parts(9_662_000, 0)
			.saturating_add(T::DbWeight::get().writes(1_u64))
	}
	/// Storage: `System::AuthorizedUpgrade` (r:1 w:1)
	/// Storage: `unknown` `0x3a636f6465` (r:0 w:1)
	fn apply_authorized_upgrade() -> Weight {
		Weight::from_parts(92_981_283_000, 1518)
			.saturating_add(T::DbWeight::get().reads(1_u64))
			.saturating_add(T::DbWeight::get().writes(2_u64))
	}
}

// For backwards compatibility and tests.
impl WeightInfo for () {
	fn remark(b: u32) -> Weight {
		Weight::from_parts(2_056_000, 0)
			.saturating_add(Weight::from_parts(387, 0).saturating_mul(b.into()))
	}
	fn remark_with_event(b: u32) -> Weight {
		Weight::from_parts(8_924_000, 0)
			.saturating_add(Weight::from_parts(1_568, 0).saturating_mul(b.into()))
	}
	fn set_heap_pages() -> Weight {
		Weight::from_parts(4_133_000, 1485).saturating_add(ROCKS_DB_WEIGHT.writes(1_u64))
	}
	fn set_code() -> Weight {
		Weight::from_parts(90_175_322_000, 1485)
			.saturating_add(ROCKS_DB_WEIGHT.reads(1_u64))
			.saturating_add(ROCKS_DB_WEIGHT.writes(1_u64))
	}
	fn set_storage(i: u32) -> Weight {
		Weight::from_parts(2_178_000, 0)
			.saturating_add(Weight::from_parts(819_428, 0).saturating_mul(i.into()))
			.saturating_add(ROCKS_DB_WEIGHT.writes((1_u64).saturating_mul(i.into())))
	}
	fn kill_storage(i: u32) -> Weight {
		Weight::from_parts(2_047_000, 0)
			.saturating_add(Weight::from_parts(651_244, 0).saturating_mul(i.into()))
			.saturating_add(ROCKS_DB_WEIGHT.writes((1_u64).saturating_mul(i.into())))
	}
	fn kill_prefix(p: u32) -> Weight {
		Weight::from_parts(4_131_000, 85)
			.saturating_add(Weight::from_parts(1_243_190, 0).saturating_mul(p.into()))
			.saturating_add(ROCKS_DB_WEIGHT.reads((1_u64).saturating_mul(p.into())))
			.saturating_add(ROCKS_DB_WEIGHT.writes((1_u64).saturating_mul(p.into())))
			.saturating_add(Weight::from_parts(0, 70).saturating_mul(p.into()))
	}
	fn authorize_upgrade() -> Weight {
		Weight::from_parts(9_662_000, 0).saturating_add(ROCKS_DB_WEIGHT.writes(1_u64))
	}
	fn apply_authorized_upgrade() -> Weight {
		Weight::from_parts(92_981_283_000, 1518)
			.saturating_add(ROCKS_DB_WEIGHT.reads(1_u64))
			.saturating_add(ROCKS_DB_WEIGHT.writes(2_u64))
	}
}
