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

//! Dispatch system. Contains the traits a module's call enum implements and the weight
//! annotations its calls are declared with.

use codec::{Codec, EncodeLike};
use stf_primitives::Externalities;

pub use stf_primitives::{
	dispatch::{extract_actual_pays_fee, extract_actual_weight},
	traits::{Dispatchable, GetDispatchInfo},
	DispatchClass, DispatchErrorWithPostInfo, DispatchInfo, DispatchResult,
	DispatchResultWithPostInfo, Pays, PerDispatchClass, PostDispatchInfo, RawOrigin, Weight,
};

/// A type that can be used as a parameter in a dispatchable function.
pub trait Parameter: Codec + EncodeLike + Clone + Eq + core::fmt::Debug + scale_info::TypeInfo {}
impl<T> Parameter for T where T: Codec + EncodeLike + Clone + Eq + core::fmt::Debug + scale_info::TypeInfo {}

/// Means of weighing some particular kind of data (`T`).
pub trait WeighData<T> {
	/// Weigh the data `T` given by `target`. When implementing this for a dispatchable, `T` will be
	/// a tuple of all arguments given to the function (except origin).
	fn weigh_data(&self, target: T) -> Weight;
}

/// Means of classifying a dispatchable function.
pub trait ClassifyDispatch<T> {
	/// Classify the dispatch function based on input data `target` of type `T`. When implementing
	/// this for a dispatchable, `T` will be a tuple of all arguments given to the function (except
	/// origin).
	fn classify_dispatch(&self, target: T) -> DispatchClass;
}

/// Indicates if dispatch function should pay fees or not.
///
/// If set to `Pays::No`, the block resource limits are applied, yet no fee is deducted.
pub trait PaysFee<T> {
	/// Whether the dispatch described by `target` pays fees.
	fn pays_fee(&self, _target: T) -> Pays;
}

impl<T> WeighData<T> for Weight {
	fn weigh_data(&self, _: T) -> Weight {
		*self
	}
}

impl<T> ClassifyDispatch<T> for Weight {
	fn classify_dispatch(&self, _: T) -> DispatchClass {
		DispatchClass::Normal
	}
}

impl<T> PaysFee<T> for Weight {
	fn pays_fee(&self, _: T) -> Pays {
		Pays::Yes
	}
}

impl<T> WeighData<T> for (Weight, DispatchClass, Pays) {
	fn weigh_data(&self, args: T) -> Weight {
		self.0.weigh_data(args)
	}
}

impl<T> ClassifyDispatch<T> for (Weight, DispatchClass, Pays) {
	fn classify_dispatch(&self, _: T) -> DispatchClass {
		self.1
	}
}

impl<T> PaysFee<T> for (Weight, DispatchClass, Pays) {
	fn pays_fee(&self, _: T) -> Pays {
		self.2
	}
}

impl<T> WeighData<T> for (Weight, DispatchClass) {
	fn weigh_data(&self, args: T) -> Weight {
		self.0.weigh_data(args)
	}
}

impl<T> ClassifyDispatch<T> for (Weight, DispatchClass) {
	fn classify_dispatch(&self, _: T) -> DispatchClass {
		self.1
	}
}

impl<T> PaysFee<T> for (Weight, DispatchClass) {
	fn pays_fee(&self, _: T) -> Pays {
		Pays::Yes
	}
}

impl<T> WeighData<T> for (Weight, Pays) {
	fn weigh_data(&self, args: T) -> Weight {
		self.0.weigh_data(args)
	}
}

impl<T> ClassifyDispatch<T> for (Weight, Pays) {
	fn classify_dispatch(&self, _: T) -> DispatchClass {
		DispatchClass::Normal
	}
}

impl<T> PaysFee<T> for (Weight, Pays) {
	fn pays_fee(&self, _: T) -> Pays {
		self.1
	}
}

/// Build the [`DispatchInfo`] of a call from its weight annotation and its arguments.
pub fn dispatch_info<A, T>(annotation: &A, args: T) -> DispatchInfo
where
	A: WeighData<T> + ClassifyDispatch<T> + PaysFee<T>,
	T: Copy,
{
	DispatchInfo {
		weight: annotation.weigh_data(args),
		class: annotation.classify_dispatch(args),
		pays_fee: annotation.pays_fee(args),
	}
}

/// Type that can be dispatched with an origin but without checking the origin filter.
pub trait UnfilteredDispatchable {
	/// The origin type of the runtime, (i.e. `frame_system::Config::RuntimeOrigin`).
	type RuntimeOrigin;

	/// Dispatch this call but do not check the filter in origin.
	fn dispatch_bypass_filter(
		self,
		ext: &mut dyn Externalities,
		origin: Self::RuntimeOrigin,
	) -> DispatchResultWithPostInfo;
}

/// Type that is callable.
pub trait Callable<T> {
	/// The call type of the module.
	type RuntimeCall: UnfilteredDispatchable + Codec + Clone + PartialEq + Eq;
}

/// The call type of a module as seen by the runtime `R`.
pub type CallableCallFor<A, R> = <A as Callable<R>>::RuntimeCall;

/// Something that can tell the index of the call within its module.
pub trait GetCallIndex {
	/// Return all call indices in the same order as [`GetCallName`].
	fn get_call_indices() -> &'static [u8];

	/// Return the index of this call.
	fn get_call_index(&self) -> u8;
}

/// Gets the function name of the Call.
pub trait GetCallName {
	/// Return all function names in the same order as [`GetCallIndex`].
	fn get_call_names() -> &'static [&'static str];

	/// Return the function name of the Call.
	fn get_call_name(&self) -> &'static str;
}

/// Something that can be checked to be a of sub type `T`.
///
/// This is useful for enums where each variant encapsulates a different sub type, and
/// you need access to these sub types.
///
/// For example, in FRAME, this trait is implemented for the runtime `Call` enum. Pallets use this
/// to check if a certain call is an instance of the local pallet's `Call` enum.
pub trait IsSubType<T> {
	/// Returns `Some(_)` if `self` is an instance of sub type `T`.
	fn is_sub_type(&self) -> Option<&T>;
}

/// Adds the weight actually consumed to an error returned by a dispatchable.
pub trait WithPostDispatchInfo {
	/// Call this on your modules custom errors type in order to return a custom weight on error.
	fn with_weight(self, actual_weight: Weight) -> DispatchErrorWithPostInfo;
}

impl<T> WithPostDispatchInfo for T
where
	T: Into<stf_primitives::DispatchError>,
{
	fn with_weight(self, actual_weight: Weight) -> DispatchErrorWithPostInfo {
		DispatchErrorWithPostInfo {
			post_info: PostDispatchInfo {
				actual_weight: Some(actual_weight),
				pays_fee: Default::default(),
			},
			error: self.into(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use stf_primitives::DispatchError;

	#[test]
	fn weight_annotations_default_to_normal_and_paying() {
		let w = Weight::from_parts(10, 0);
		assert_eq!(
			dispatch_info(&w, ()),
			DispatchInfo { weight: w, class: DispatchClass::Normal, pays_fee: Pays::Yes }
		);
		assert_eq!(
			dispatch_info(&(w, DispatchClass::Mandatory), ()),
			DispatchInfo { weight: w, class: DispatchClass::Mandatory, pays_fee: Pays::Yes }
		);
		assert_eq!(
			dispatch_info(&(w, Pays::No), ()),
			DispatchInfo { weight: w, class: DispatchClass::Normal, pays_fee: Pays::No }
		);
		assert_eq!(
			dispatch_info(&(w, DispatchClass::Operational, Pays::No), (&1u8,)),
			DispatchInfo { weight: w, class: DispatchClass::Operational, pays_fee: Pays::No }
		);
	}

	#[test]
	fn with_weight_keeps_the_error() {
		let err = DispatchError::BadOrigin.with_weight(Weight::from_parts(7, 0));
		assert_eq!(err.error, DispatchError::BadOrigin);
		assert_eq!(err.post_info.actual_weight, Some(Weight::from_parts(7, 0)));
		assert_eq!(err.post_info.pays_fee, Pays::Yes);
	}
}
