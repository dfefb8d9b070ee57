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

//! Two dimensional execution weight.

use codec::{Decode, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
use sp_arithmetic::Perbill;

/// The number of reference time units in one second.
pub const WEIGHT_REF_TIME_PER_SECOND: u64 = 1_000_000_000_000;
/// The number of reference time units in one millisecond.
pub const WEIGHT_REF_TIME_PER_MILLIS: u64 = 1_000_000_000;
/// The number of reference time units in one microsecond.
pub const WEIGHT_REF_TIME_PER_MICROS: u64 = 1_000_000;
/// The number of reference time units in one nanosecond.
pub const WEIGHT_REF_TIME_PER_NANOS: u64 = 1_000;

#[derive(
	Encode, Decode, MaxEncodedLen, TypeInfo, Eq, PartialEq, Copy, Clone, Debug, Default, Hash,
)]
pub struct Weight {
	#[codec(compact)]
	/// The weight of computational time used based on some reference hardware.
	ref_time: u64,
	#[codec(compact)]
	/// The weight of storage space used by proof of validity.
	proof_size: u64,
}

impl Weight {
	/// Set the reference time part of the weight.
	pub const fn set_ref_time(mut self, c: u64) -> Self {
		self.ref_time = c;
		self
	}

	/// Set the storage size part of the weight.
	pub const fn set_proof_size(mut self, c: u64) -> Self {
		self.proof_size = c;
		self
	}

	/// Return the reference time part of the weight.
	pub const fn ref_time(&self) -> u64 {
		self.ref_time
	}

	/// Return the storage size part of the weight.
	pub const fn proof_size(&self) -> u64 {
		self.proof_size
	}

	/// Construct [`Weight`] from weight parts, namely reference time and proof size weights.
	pub const fn from_parts(ref_time: u64, proof_size: u64) -> Self {
		Self { ref_time, proof_size }
	}

	/// Construct [`Weight`] with all components set to the same value.
	pub const fn from_all(value: u64) -> Self {
		Self { ref_time: value, proof_size: value }
	}

	/// Return a [`Weight`] where all fields are zero.
	pub const fn zero() -> Self {
		Self { ref_time: 0, proof_size: 0 }
	}

	/// Return a [`Weight`] where all fields are maximum.
	pub const fn max_value() -> Self {
		Self { ref_time: u64::MAX, proof_size: u64::MAX }
	}

	/// Returns true if all components are zero.
	pub const fn is_zero(&self) -> bool {
		self.ref_time == 0 && self.proof_size == 0
	}

	/// Saturating [`Weight`] addition. Computes `self + rhs`, saturating at the numeric bounds of
	/// all fields instead of overflowing.
	pub const fn saturating_add(self, rhs: Self) -> Self {
		Self {
			ref_time: self.ref_time.saturating_add(rhs.ref_time),
			proof_size: self.proof_size.saturating_add(rhs.proof_size),
		}
	}

	/// Saturating [`Weight`] subtraction. Computes `self - rhs`, saturating at the numeric bounds
	/// of all fields instead of overflowing.
	pub const fn saturating_sub(self, rhs: Self) -> Self {
		Self {
			ref_time: self.ref_time.saturating_sub(rhs.ref_time),
			proof_size: self.proof_size.saturating_sub(rhs.proof_size),
		}
	}

	/// Saturating [`Weight`] scalar multiplication. Computes `self.field * scalar` for all fields,
	/// saturating at the numeric bounds of all fields instead of overflowing.
	pub const fn saturating_mul(self, scalar: u64) -> Self {
		Self {
			ref_time: self.ref_time.saturating_mul(scalar),
			proof_size: self.proof_size.saturating_mul(scalar),
		}
	}

	/// Increment [`Weight`] by `amount` via saturating addition.
	pub fn saturating_accrue(&mut self, amount: Self) {
		*self = self.saturating_add(amount);
	}

	/// Reduce [`Weight`] by `amount` via saturating subtraction.
	pub fn saturating_reduce(&mut self, amount: Self) {
		*self = self.saturating_sub(amount);
	}

	/// Checked [`Weight`] addition. Computes `self + rhs`, returning `None` if overflow occurred.
	pub const fn checked_add(&self, rhs: &Self) -> Option<Self> {
		let ref_time = match self.ref_time.checked_add(rhs.ref_time) {
			Some(t) => t,
			None => return None,
		};
		let proof_size = match self.proof_size.checked_add(rhs.proof_size) {
			Some(s) => s,
			None => return None,
		};
		Some(Self { ref_time, proof_size })
	}

	/// Checked [`Weight`] subtraction. Computes `self - rhs`, returning `None` if overflow
	/// occurred.
	pub const fn checked_sub(&self, rhs: &Self) -> Option<Self> {
		let ref_time = match self.ref_time.checked_sub(rhs.ref_time) {
			Some(t) => t,
			None => return None,
		};
		let proof_size = match self.proof_size.checked_sub(rhs.proof_size) {
			Some(s) => s,
			None => return None,
		};
		Some(Self { ref_time, proof_size })
	}

	/// Try to increase `self` by `amount` via checked addition.
	pub fn checked_accrue(&mut self, amount: Self) -> Option<()> {
		self.checked_add(&amount).map(|new_self| *self = new_self)
	}

	/// Get the conservative min of `self` and `other` weight.
	pub const fn min(&self, other: Self) -> Self {
		Self {
			ref_time: if self.ref_time < other.ref_time { self.ref_time } else { other.ref_time },
			proof_size: if self.proof_size < other.proof_size {
				self.proof_size
			} else {
				other.proof_size
			},
		}
	}

	/// Get the aggressive max of `self` and `other` weight.
	pub const fn max(&self, other: Self) -> Self {
		Self {
			ref_time: if self.ref_time > other.ref_time { self.ref_time } else { other.ref_time },
			proof_size: if self.proof_size > other.proof_size {
				self.proof_size
			} else {
				other.proof_size
			},
		}
	}

	/// Returns true if any of `self`'s constituent weights is strictly greater than that of the
	/// `other`'s, otherwise returns false.
	pub const fn any_gt(self, other: Self) -> bool {
		self.ref_time > other.ref_time || self.proof_size > other.proof_size
	}

	/// Returns true if all of `self`'s constituent weights is strictly greater than that of the
	/// `other`'s, otherwise returns false.
	pub const fn all_gt(self, other: Self) -> bool {
		self.ref_time > other.ref_time && self.proof_size > other.proof_size
	}

	/// Returns true if all of `self`'s constituent weights is smaller than or equal to that of
	/// the `other`'s, otherwise returns false.
	pub const fn all_lte(self, other: Self) -> bool {
		self.ref_time <= other.ref_time && self.proof_size <= other.proof_size
	}

	/// Returns true if all of `self`'s constituent weights is greater than or equal to that of
	/// the `other`'s, otherwise returns false.
	pub const fn all_gte(self, other: Self) -> bool {
		self.ref_time >= other.ref_time && self.proof_size >= other.proof_size
	}

	/// Multiply every component by a [`Perbill`], rounding down.
	pub fn mul_perbill(self, ratio: Perbill) -> Self {
		Self { ref_time: ratio * self.ref_time, proof_size: ratio * self.proof_size }
	}
}

impl core::ops::Add for Weight {
	type Output = Self;
	fn add(self, rhs: Self) -> Self {
		self.saturating_add(rhs)
	}
}

impl core::ops::Sub for Weight {
	type Output = Self;
	fn sub(self, rhs: Self) -> Self {
		self.saturating_sub(rhs)
	}
}

impl core::ops::Mul<Weight> for Perbill {
	type Output = Weight;
	fn mul(self, b: Weight) -> Weight {
		b.mul_perbill(self)
	}
}

/// The weight of database operations that the runtime can invoke.
#[derive(Clone, Copy, Eq, PartialEq, Default, Debug, Encode, Decode, TypeInfo)]
pub struct RuntimeDbWeight {
	pub read: u64,
	pub write: u64,
}

impl RuntimeDbWeight {
	pub fn reads(self, r: u64) -> Weight {
		Weight::from_parts(self.read.saturating_mul(r), 0)
	}

	pub fn writes(self, w: u64) -> Weight {
		Weight::from_parts(self.write.saturating_mul(w), 0)
	}

	pub fn reads_writes(self, r: u64, w: u64) -> Weight {
		let read_weight = self.read.saturating_mul(r);
		let write_weight = self.write.saturating_mul(w);
		Weight::from_parts(read_weight.saturating_add(write_weight), 0)
	}
}

/// Weight of a set of database operations measured on RocksDB.
pub mod constants {
	use super::{RuntimeDbWeight, Weight, WEIGHT_REF_TIME_PER_NANOS};

	/// Time to execute an empty block.
	pub const BLOCK_EXECUTION_WEIGHT: Weight =
		Weight::from_parts(WEIGHT_REF_TIME_PER_NANOS.saturating_mul(381_015), 0);

	/// Time to execute a NO-OP extrinsic, for example `System::remark`.
	pub const EXTRINSIC_BASE_WEIGHT: Weight =
		Weight::from_parts(WEIGHT_REF_TIME_PER_NANOS.saturating_mul(99_840), 0);

	/// By default, Substrate uses RocksDB, so this will be the weight used throughout
	/// the runtime.
	pub const ROCKS_DB_WEIGHT: RuntimeDbWeight = RuntimeDbWeight {
		read: 25_000 * WEIGHT_REF_TIME_PER_NANOS,
		write: 100_000 * WEIGHT_REF_TIME_PER_NANOS,
	};
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn saturating_works() {
		let w = Weight::from_parts(u64::MAX - 1, 5);
		assert_eq!(w.saturating_add(Weight::from_parts(5, 5)), Weight::from_parts(u64::MAX, 10));
		assert_eq!(w.saturating_sub(Weight::from_parts(6, 6)), Weight::from_parts(u64::MAX - 7, 0));
		assert_eq!(w.checked_add(&Weight::from_parts(5, 0)), None);
	}

	#[test]
	fn comparisons_are_per_component() {
		let a = Weight::from_parts(10, 1);
		let b = Weight::from_parts(5, 2);
		assert!(a.any_gt(b));
		assert!(!a.all_gt(b));
		assert!(!a.all_lte(b));
		assert_eq!(a.min(b), Weight::from_parts(5, 1));
		assert_eq!(a.max(b), Weight::from_parts(10, 2));
	}

	#[test]
	fn encodes_as_compact_pair() {
		assert_eq!(Weight::from_parts(1, 2).encode(), vec![4, 8]);
		assert_eq!(Weight::decode(&mut &[4u8, 8][..]).unwrap(), Weight::from_parts(1, 2));
	}
}
