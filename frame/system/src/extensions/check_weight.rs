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

use crate::{limits::BlockWeights, AllExtrinsicsLen, BlockWeight, Config, ConsumedWeight, Pallet};
use codec::{Decode, Encode};
use core::marker::PhantomData;
use scale_info::TypeInfo;
use stf_primitives::{
	traits::{Get, SignedExtension},
	transaction_validity::{InvalidTransaction, TransactionValidity, TransactionValidityError},
	DispatchInfo, DispatchResult, Externalities, PostDispatchInfo, Weight,
};

/// Block resource (weight) limit check.
///
/// # Transaction Validity
///
/// This extension does not influence any fields of `TransactionValidity` in case the
/// transaction is valid.
#[derive(Encode, Decode, Clone, Eq, PartialEq, Default, TypeInfo)]
#[scale_info(skip_type_params(T))]
pub struct CheckWeight<T>(PhantomData<T>);

impl<T: Config> CheckWeight<T> {
	/// Creates new `SignedExtension` to check weight of the extrinsic.
	pub fn new() -> Self {
		Self(Default::default())
	}

	/// Checks if the current extrinsic does not exceed the maximum weight a single extrinsic
	/// with given `DispatchClass` can have.
	fn check_extrinsic_weight(info: &DispatchInfo) -> Result<(), TransactionValidityError> {
		let max = T::BlockWeights::get().get(info.class).max_extrinsic;
		match max {
			Some(max) if info.weight.any_gt(max) => {
				log::debug!(
					target: crate::LOG_TARGET,
					"Extrinsic {:?} is greater than the max extrinsic {:?}",
					info.weight,
					max,
				);

				Err(InvalidTransaction::ExhaustsResources.into())
			},
			_ => Ok(()),
		}
	}

	/// Checks if the current extrinsic can fit into the block with respect to block weight limits.
	///
	/// Upon successes, it returns the new block weight as a `Result`.
	fn check_block_weight(
		ext: &dyn Externalities,
		info: &DispatchInfo,
	) -> Result<ConsumedWeight, TransactionValidityError> {
		let maximum_weight = T::BlockWeights::get();
		let all_weight = Pallet::<T>::block_weight(ext);
		calculate_consumed_weight(&maximum_weight, all_weight, info)
	}

	/// Checks if the current extrinsic can fit into the block with respect to block length limits.
	///
	/// Upon successes, it returns the new block length as a `Result`.
	fn check_block_length(
		ext: &dyn Externalities,
		info: &DispatchInfo,
		len: usize,
	) -> Result<u32, TransactionValidityError> {
		let length_limit = T::BlockLength::get();
		let current_len = Pallet::<T>::all_extrinsics_len(ext);
		let added_len = len as u32;
		let next_len = current_len.saturating_add(added_len);
		if next_len > *length_limit.max.get(info.class) {
			log::debug!(
				target: crate::LOG_TARGET,
				"Exceeded block length limit: {} > {}",
				next_len,
				length_limit.max.get(info.class),
			);

			Err(InvalidTransaction::ExhaustsResources.into())
		} else {
			Ok(next_len)
		}
	}

	/// Do the pre-dispatch checks. This can be applied to both signed and unsigned.
	///
	/// It checks and notes the new weight and length.
	pub fn do_pre_dispatch(
		ext: &mut dyn Externalities,
		info: &DispatchInfo,
		len: usize,
	) -> Result<(), TransactionValidityError> {
		let next_len = Self::check_block_length(&*ext, info, len)?;
		let next_weight = Self::check_block_weight(&*ext, info)?;
		Self::check_extrinsic_weight(info)?;

		AllExtrinsicsLen::put(ext, next_len);
		BlockWeight::put(ext, next_weight);
		Ok(())
	}

	/// Do the validate checks. This can be applied to both signed and unsigned.
	///
	/// It only checks that the block length and the extrinsic weight are within limits.
	pub fn do_validate(
		ext: &dyn Externalities,
		info: &DispatchInfo,
		len: usize,
	) -> TransactionValidity {
		// ignore the next length. If they return `Ok`, then it is below the limit.
		let _ = Self::check_block_length(ext, info, len)?;
		// during validation we skip block limit check. Since the `validate_transaction`
		// call runs on an empty block anyway, by this we prevent `on_initialize` weight
		// consumption from causing false negatives.
		Self::check_extrinsic_weight(info)?;

		Ok(Default::default())
	}
}

/// Adds the extrinsic weight (including its class base weight) to `all_weight`, checking the
/// per-class `max_total` and, when the block limit is exceeded, the per-class `reserved` pool.
pub fn calculate_consumed_weight(
	maximum_weight: &BlockWeights,
	mut all_weight: ConsumedWeight,
	info: &DispatchInfo,
) -> Result<ConsumedWeight, TransactionValidityError> {
	let extrinsic_weight =
		info.weight.saturating_add(maximum_weight.get(info.class).base_extrinsic);
	let limit_per_class = maximum_weight.get(info.class);

	// add the weight. If class is unlimited, use saturating add instead of checked one.
	if limit_per_class.max_total.is_none() && limit_per_class.reserved.is_none() {
		all_weight.accrue(extrinsic_weight, info.class)
	} else {
		all_weight.checked_accrue(extrinsic_weight, info.class).map_err(|_| {
			log::debug!(
				target: crate::LOG_TARGET,
				"All weight checked add overflow.",
			);
			InvalidTransaction::ExhaustsResources
		})?;
	}

	let per_class = *all_weight.get(info.class);

	// Check if we don't exceed per-class allowance
	match limit_per_class.max_total {
		Some(max) if per_class.any_gt(max) => {
			log::debug!(
				target: crate::LOG_TARGET,
				"Exceeded the per-class allowance.",
			);

			return Err(InvalidTransaction::ExhaustsResources.into())
		},
		// There is no `max_total` limit (`None`),
		// or we are below the limit.
		_ => {},
	}

	// In cases total block weight is exceeded, we need to fall back
	// to `reserved` pool if there is any.
	if all_weight.total().any_gt(maximum_weight.max_block) {
		match limit_per_class.reserved {
			// We are over the limit in reserved pool.
			Some(reserved) if per_class.any_gt(reserved) => {
				log::debug!(
					target: crate::LOG_TARGET,
					"Total block weight is exceeded.",
				);

				return Err(InvalidTransaction::ExhaustsResources.into())
			},
			// There is either no limit in reserved pool (`None`),
			// or we are below the limit.
			_ => {},
		}
	}

	Ok(all_weight)
}

impl<T: Config> SignedExtension for CheckWeight<T> {
	const IDENTIFIER: &'static str = "CheckWeight";
	type AccountId = T::AccountId;
	type Call = T::RuntimeCall;
	type AdditionalSigned = ();
	type Pre = ();

	fn additional_signed(&self, _: &dyn Externalities) -> Result<(), TransactionValidityError> {
		Ok(())
	}

	fn pre_dispatch(
		self,
		ext: &mut dyn Externalities,
		_who: &Self::AccountId,
		_call: &Self::Call,
		info: &DispatchInfo,
		len: usize,
	) -> Result<(), TransactionValidityError> {
		Self::do_pre_dispatch(ext, info, len)
	}

	fn validate(
		&self,
		ext: &dyn Externalities,
		_who: &Self::AccountId,
		_call: &Self::Call,
		info: &DispatchInfo,
		len: usize,
	) -> TransactionValidity {
		Self::do_validate(ext, info, len)
	}

	fn pre_dispatch_unsigned(
		ext: &mut dyn Externalities,
		_call: &Self::Call,
		info: &DispatchInfo,
		len: usize,
	) -> Result<(), TransactionValidityError> {
		Self::do_pre_dispatch(ext, info, len)
	}

	fn validate_unsigned(
		ext: &dyn Externalities,
		_call: &Self::Call,
		info: &DispatchInfo,
		len: usize,
	) -> TransactionValidity {
		Self::do_validate(ext, info, len)
	}

	fn post_dispatch(
		ext: &mut dyn Externalities,
		_pre: Option<Self::Pre>,
		info: &DispatchInfo,
		post_info: &PostDispatchInfo,
		_len: usize,
		_result: &DispatchResult,
	) -> Result<(), TransactionValidityError> {
		let unspent = post_info.calc_unspent(info);
		if unspent.any_gt(Weight::zero()) {
			BlockWeight::mutate(ext, |current_weight| {
				current_weight.reduce(unspent, info.class);
			})
		}

		log::trace!(
			target: crate::LOG_TARGET,
			"Used block weight: {:?}",
			BlockWeight::get(&*ext),
		);

		log::trace!(
			target: crate::LOG_TARGET,
			"Used block length: {:?}",
			Pallet::<T>::all_extrinsics_len(&*ext),
		);

		Ok(())
	}
}

impl<T: Config> core::fmt::Debug for CheckWeight<T> {
	fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
		write!(f, "CheckWeight")
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::mock::{new_test_ext, System, Test, CALL};
	use stf_primitives::{DispatchClass, Pays};
	use stf_support::{assert_err, assert_ok};

	fn block_weights() -> BlockWeights {
		<Test as Config>::BlockWeights::get()
	}

	fn normal_weight_limit() -> Weight {
		block_weights().get(DispatchClass::Normal).max_total.unwrap_or_else(|| block_weights().max_block)
	}

	fn info(ref_time: u64, class: DispatchClass) -> DispatchInfo {
		DispatchInfo { weight: Weight::from_parts(ref_time, 0), class, pays_fee: Pays::Yes }
	}

	#[test]
	fn mandatory_extrinsic_doesnt_care_about_limits() {
		new_test_ext().execute_with(|ext| {
			let max = DispatchInfo {
				weight: Weight::max_value(),
				class: DispatchClass::Mandatory,
				pays_fee: Pays::No,
			};
			let len = 0_usize;

			assert_ok!(CheckWeight::<Test>::do_pre_dispatch(ext, &max, len));
			assert_eq!(System::block_weight(&*ext).total(), Weight::max_value());
			assert!(System::block_weight(&*ext).total().any_gt(block_weights().max_block));
		});
	}

	#[test]
	fn normal_extrinsic_limited_by_maximum_extrinsic_weight() {
		new_test_ext().execute_with(|ext| {
			let max_extrinsic = block_weights()
				.get(DispatchClass::Normal)
				.max_extrinsic
				.expect("mock sets a normal extrinsic limit; qed");
			let max = DispatchInfo { weight: max_extrinsic, ..Default::default() };
			let too_heavy = DispatchInfo {
				weight: max_extrinsic + Weight::from_parts(1, 0),
				..Default::default()
			};
			let len = 0_usize;

			assert_err!(
				CheckWeight::<Test>::do_validate(&*ext, &too_heavy, len),
				InvalidTransaction::ExhaustsResources
			);
			assert_err!(
				CheckWeight::<Test>::do_pre_dispatch(ext, &too_heavy, len),
				InvalidTransaction::ExhaustsResources
			);
			assert_ok!(CheckWeight::<Test>::do_validate(&*ext, &max, len));
			assert_ok!(CheckWeight::<Test>::do_pre_dispatch(ext, &max, len));
			assert_eq!(*System::block_weight(&*ext).get(DispatchClass::Normal), normal_weight_limit());
		});
	}

	#[test]
	fn normal_extrinsics_fill_up_to_the_class_limit() {
		new_test_ext().execute_with(|ext| {
			let normal = info(100, DispatchClass::Normal);
			// 100 + 5 base per extrinsic, 768 allowed for normal class
			for _ in 0..7 {
				assert_ok!(CheckWeight::<Test>::do_pre_dispatch(ext, &normal, 0));
			}
			assert_eq!(
				*System::block_weight(&*ext).get(DispatchClass::Normal),
				Weight::from_parts(735, 0)
			);
			assert_err!(
				CheckWeight::<Test>::do_pre_dispatch(ext, &normal, 0),
				InvalidTransaction::ExhaustsResources
			);
			// validation skips the block limit
			assert_ok!(CheckWeight::<Test>::do_validate(&*ext, &normal, 0));
		});
	}

	#[test]
	fn operational_extrinsic_uses_reserved_space() {
		new_test_ext().execute_with(|ext| {
			BlockWeight::mutate(ext, |w| w.set(normal_weight_limit(), DispatchClass::Normal));
			// normal class is full now
			assert_err!(
				CheckWeight::<Test>::do_pre_dispatch(ext, &info(0, DispatchClass::Normal), 0),
				InvalidTransaction::ExhaustsResources
			);

			// 768 normal + 10 mandatory + 210 operational
			assert_ok!(CheckWeight::<Test>::do_pre_dispatch(
				ext,
				&info(200, DispatchClass::Operational),
				0
			));
			// total becomes 1028 > 1024, but operational stays inside the 256 reserve
			assert_ok!(CheckWeight::<Test>::do_pre_dispatch(
				ext,
				&info(30, DispatchClass::Operational),
				0
			));
			assert_eq!(
				*System::block_weight(&*ext).get(DispatchClass::Operational),
				Weight::from_parts(250, 0)
			);
			// 250 + 10 + 10 exceeds the reserve
			assert_err!(
				CheckWeight::<Test>::do_pre_dispatch(ext, &info(10, DispatchClass::Operational), 0),
				InvalidTransaction::ExhaustsResources
			);
		});
	}

	#[test]
	fn signed_ext_check_weight_block_size_works() {
		new_test_ext().execute_with(|ext| {
			let normal = info(10, DispatchClass::Normal);
			let op = info(10, DispatchClass::Operational);
			let normal_limit = 768_usize;
			let op_limit = 1024_usize;

			let reset_check_weight = |ext: &mut dyn Externalities, i: &DispatchInfo, f: bool, s: usize| {
				AllExtrinsicsLen::put(ext, 0);
				let r = CheckWeight::<Test>::new().pre_dispatch(ext, &1, CALL, i, s);
				if f {
					assert!(r.is_err())
				} else {
					assert!(r.is_ok())
				}
			};

			reset_check_weight(ext, &normal, false, normal_limit);
			reset_check_weight(ext, &normal, true, normal_limit + 1);
			reset_check_weight(ext, &op, false, op_limit);
			reset_check_weight(ext, &op, true, op_limit + 1);

			assert_ok!(CheckWeight::<Test>::new().validate(&*ext, &1, CALL, &normal, normal_limit));
			assert_err!(
				CheckWeight::<Test>::new().validate(&*ext, &1, CALL, &normal, normal_limit + 1),
				InvalidTransaction::ExhaustsResources
			);
		})
	}

	#[test]
	fn signed_ext_check_weight_refund_works() {
		new_test_ext().execute_with(|ext| {
			let info = info(512, DispatchClass::Normal);
			let post_info =
				PostDispatchInfo { actual_weight: Some(Weight::from_parts(128, 0)), pays_fee: Pays::Yes };
			let len = 0_usize;

			BlockWeight::mutate(ext, |w| w.set(Weight::from_parts(100, 0), DispatchClass::Normal));
			let pre = CheckWeight::<Test>::new().pre_dispatch(ext, &1, CALL, &info, len).unwrap();
			assert_eq!(
				*System::block_weight(&*ext).get(DispatchClass::Normal),
				Weight::from_parts(617, 0)
			);
			assert_ok!(CheckWeight::<Test>::post_dispatch(
				ext,
				Some(pre),
				&info,
				&post_info,
				len,
				&Ok(())
			));
			assert_eq!(
				*System::block_weight(&*ext).get(DispatchClass::Normal),
				Weight::from_parts(233, 0)
			);
		})
	}

	#[test]
	fn signed_ext_check_weight_actual_weight_higher_than_max_is_capped() {
		new_test_ext().execute_with(|ext| {
			let info = info(512, DispatchClass::Normal);
			let post_info =
				PostDispatchInfo { actual_weight: Some(Weight::from_parts(700, 0)), pays_fee: Pays::Yes };
			let len = 0_usize;

			BlockWeight::mutate(ext, |w| w.set(Weight::from_parts(100, 0), DispatchClass::Normal));
			let pre = CheckWeight::<Test>::new().pre_dispatch(ext, &1, CALL, &info, len).unwrap();
			assert_ok!(CheckWeight::<Test>::post_dispatch(
				ext,
				Some(pre),
				&info,
				&post_info,
				len,
				&Ok(())
			));
			assert_eq!(
				*System::block_weight(&*ext).get(DispatchClass::Normal),
				Weight::from_parts(617, 0)
			);
		})
	}

	#[test]
	fn zero_weight_extrinsic_still_has_base_weight() {
		new_test_ext().execute_with(|ext| {
			let free = DispatchInfo { weight: Weight::zero(), ..Default::default() };
			let len = 0_usize;

			assert_ok!(CheckWeight::<Test>::do_pre_dispatch(ext, &free, len));
			assert_eq!(
				*System::block_weight(&*ext).get(DispatchClass::Normal),
				block_weights().get(DispatchClass::Normal).base_extrinsic
			);
		})
	}

	#[test]
	fn calculate_consumed_weight_checks_unlimited_classes_saturate() {
		let maximum_weight = BlockWeights::builder()
			.base_block(Weight::zero())
			.for_class(DispatchClass::non_mandatory(), |w| {
				w.base_extrinsic = Weight::zero();
				w.max_total = Some(Weight::from_parts(20, u64::MAX));
				w.reserved = Some(Weight::zero());
			})
			.for_class(DispatchClass::Mandatory, |w| {
				w.base_extrinsic = Weight::zero();
				w.reserved = None;
				w.max_total = None;
			})
			.build_or_panic();
		let all_weight = ConsumedWeight::new(|class| match class {
			DispatchClass::Normal => Weight::from_parts(10, 0),
			DispatchClass::Operational => Weight::from_parts(0, 0),
			DispatchClass::Mandatory => Weight::max_value(),
		});

		let mandatory = info(5, DispatchClass::Mandatory);
		let consumed = calculate_consumed_weight(&maximum_weight, all_weight.clone(), &mandatory)
			.expect("mandatory class is unlimited; qed");
		assert_eq!(*consumed.get(DispatchClass::Mandatory), Weight::max_value());

		let normal = info(5, DispatchClass::Normal);
		assert_err!(
			calculate_consumed_weight(&maximum_weight, all_weight, &normal),
			InvalidTransaction::ExhaustsResources
		);
	}
}
