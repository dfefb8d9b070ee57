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

//! # Transaction Payment Module
//!
//! This module provides the basic logic needed to pay the absolute minimum amount needed for a
//! transaction to be included. This includes:
//!   - _base fee_: This is the minimum amount a user pays for a transaction. It is declared
//! 	as a base _weight_ in the runtime and converted to a fee using `WeightToFee`.
//!   - _weight fee_: A fee proportional to amount of weight a transaction consumes.
//!   - _length fee_: A fee proportional to the encoded length of the transaction.
//!   - _tip_: An optional tip. Tip increases the priority of the transaction, giving it a higher
//!     chance to be included by the transaction queue.
//!
//! The base fee and adjusted weight and length fees constitute the _inclusion fee_, which is
//! the minimum fee for a transaction to be included in a block.
//!
//! The formula of final fee:
//!   ```ignore
//!   inclusion_fee = base_fee + length_fee + [targeted_fee_adjustment * weight_fee];
//!   final_fee = inclusion_fee + tip;
//!   ```
//!
//!   - `targeted_fee_adjustment`: This is a multiplier that can tune the final fee based on
//! 	the congestion of the network.
//!
//! Additionally, this module allows one to configure:
//!   - The mapping between one unit of weight to one unit of fee via [`Config::WeightToFee`].
//!   - A means of updating the fee for the next block, via defining a multiplier, based on the
//!     final state of the chain at the end of the previous block. This can be configured via
//!     [`Config::FeeMultiplierUpdate`]

use core::marker::PhantomData;

use codec::{Decode, Encode};
use scale_info::TypeInfo;
use stf_primitives::{
	traits::{Extrinsic, Get, GetDispatchInfo, SaturatedConversion, SignedExtension},
	transaction_validity::{
		TransactionPriority, TransactionValidity, TransactionValidityError, ValidTransaction,
	},
	Abort, Balance, BlockNumber, DispatchClass, DispatchInfo, DispatchResult, Externalities,
	FixedPointNumber, FixedU128, Pays, PostDispatchInfo, Weight,
};
use stf_support::{
	storage_prefixes,
	traits::{BuildGenesisConfig, Hooks},
	OptionQuery, StorageValue,
};

mod payment;
mod types;

#[cfg(test)]
mod mock;
#[cfg(test)]
mod tests;

pub use payment::*;
pub use types::{FeeDetails, InclusionFee, RuntimeDispatchInfo};

/// Log target of the transaction payment module.
pub const LOG_TARGET: &str = "runtime::transaction-payment";

/// Fee multiplier.
pub type Multiplier = FixedU128;

/// The multiplier used until the first update, and whenever none is stored.
pub const MULTIPLIER_DEFAULT: Multiplier = Multiplier::from_u32(1);

/// A means of converting a weight into a fee.
pub trait WeightToFee {
	/// Calculates the fee from the passed `weight`.
	fn weight_to_fee(weight: &Weight) -> Balance;
}

/// Implementor of [`WeightToFee`] that maps one unit of weight to one unit of fee.
pub struct IdentityFee;

impl WeightToFee for IdentityFee {
	fn weight_to_fee(weight: &Weight) -> Balance {
		weight.ref_time().saturated_into()
	}
}

/// Implementor of [`WeightToFee`] that uses a constant multiplier.
///
/// # Example
///
/// ```ignore
/// # use stf_primitives::traits::ConstU128;
/// # use stf_transaction_payment::ConstantMultiplier;
/// // Results in a multiplier of 10 for each unit of weight (or length)
/// type LengthToFee = ConstantMultiplier<ConstU128<10>>;
/// ```
pub struct ConstantMultiplier<M>(PhantomData<M>);

impl<M: Get<Balance>> WeightToFee for ConstantMultiplier<M> {
	fn weight_to_fee(weight: &Weight) -> Balance {
		Balance::saturated_from(weight.ref_time()).saturating_mul(M::get())
	}
}

/// Something that can convert the current multiplier to the next one.
pub trait MultiplierUpdate {
	/// Convert the multiplier of the finished block into the one of the next block.
	fn convert(previous: Multiplier) -> Multiplier;
}

impl MultiplierUpdate for () {
	fn convert(previous: Multiplier) -> Multiplier {
		previous
	}
}

/// A fee multiplier that is always the same.
pub struct ConstFeeMultiplier<M: Get<Multiplier>>(PhantomData<M>);

impl<M: Get<Multiplier>> MultiplierUpdate for ConstFeeMultiplier<M> {
	fn convert(_previous: Multiplier) -> Multiplier {
		M::get()
	}
}

/// The module configuration trait.
pub trait Config: stf_system::Config {
	/// The overarching event type.
	type RuntimeEvent: From<Event<Self>> + Into<<Self as stf_system::Config>::RuntimeEvent>;

	/// Handler for withdrawing, refunding and depositing the transaction fee.
	/// Transaction fees are withdrawn before the transaction is executed.
	/// After the transaction was executed the transaction weight can be
	/// adjusted, depending on the used resources by the transaction. If the
	/// transaction weight is lower than expected, parts of the transaction fee
	/// might be refunded. In the end the fees can be deposited.
	type OnChargeTransaction: OnChargeTransaction<Self>;

	/// A fee multiplier for `Operational` extrinsics to compute "virtual tip" to boost their
	/// `priority`
	///
	/// This value is multiplied by the `final_fee` to obtain a "virtual tip" that is later
	/// added to a tip component in regular `priority` calculations.
	/// It means that a `Normal` transaction can front-run a similarly-sized `Operational`
	/// extrinsic (with no tip), by including a tip value greater than the virtual tip.
	///
	/// ```rust,ignore
	/// // For `Normal`
	/// let priority = priority_calc(tip);
	///
	/// // For `Operational`
	/// let virtual_tip = (inclusion_fee + tip) * OperationalFeeMultiplier;
	/// let priority = priority_calc(tip + virtual_tip);
	/// ```
	///
	/// Note that since we use `final_fee` the multiplier applies also to the regular `tip`
	/// sent with the transaction. So, not only does the transaction get a priority bump based
	/// on the `inclusion_fee`, but we also amplify the impact of tips applied to `Operational`
	/// transactions.
	type OperationalFeeMultiplier: Get<u8>;

	/// Convert a weight value into a deductible fee based on the currency type.
	type WeightToFee: WeightToFee;

	/// Convert a length value into a deductible fee based on the currency type.
	type LengthToFee: WeightToFee;

	/// Update the multiplier of the next block, based on the previous block's weight.
	type FeeMultiplierUpdate: MultiplierUpdate;
}

/// The transaction payment module.
pub struct Pallet<T>(PhantomData<T>);

/// Events of the transaction payment module.
#[derive(Encode, Decode, Clone, PartialEq, Eq, Debug, TypeInfo)]
#[scale_info(skip_type_params(T))]
pub enum Event<T: Config> {
	/// A transaction fee `actual_fee`, of which `tip` was added to the minimum inclusion fee,
	/// has been paid by `who`.
	#[codec(index = 0)]
	TransactionFeePaid { who: T::AccountId, actual_fee: Balance, tip: Balance },
}

storage_prefixes! {
	module = "TransactionPayment";
	pub struct NextFeeMultiplierPrefix = "NextFeeMultiplier";
}

/// The fee multiplier applied to the weight fee of the next transactions.
pub type NextFeeMultiplier = StorageValue<NextFeeMultiplierPrefix, Multiplier, OptionQuery>;

/// Genesis configuration of the transaction payment module.
pub struct GenesisConfig<T: Config> {
	/// The multiplier the chain starts with.
	pub multiplier: Multiplier,
	#[doc(hidden)]
	pub _config: PhantomData<T>,
}

impl<T: Config> Default for GenesisConfig<T> {
	fn default() -> Self {
		Self { multiplier: MULTIPLIER_DEFAULT, _config: Default::default() }
	}
}

impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
	fn build(&self, ext: &mut dyn Externalities) {
		NextFeeMultiplier::put(ext, self.multiplier);
	}
}

impl<T: Config> Hooks for Pallet<T> {
	fn on_finalize(ext: &mut dyn Externalities, _n: BlockNumber) -> Result<(), Abort> {
		let next = T::FeeMultiplierUpdate::convert(Self::next_fee_multiplier(&*ext));
		NextFeeMultiplier::put(ext, next);
		Ok(())
	}
}

impl<T: Config> Pallet<T> {
	/// The multiplier applied to the weight fee of the current block.
	pub fn next_fee_multiplier(ext: &dyn Externalities) -> Multiplier {
		NextFeeMultiplier::get(ext).unwrap_or(MULTIPLIER_DEFAULT)
	}

	/// Query the data that we know about the fee of a given `call`.
	///
	/// This pallet is not and cannot be aware of the internals of a signed extension, for example
	/// a tip. It only interprets the extrinsic as some encoded value and accounts for its weight
	/// and length, the runtime's extrinsic base weight, and the current fee multiplier.
	///
	/// All dispatchables must be annotated with weight and will have some fee info. This function
	/// always returns.
	pub fn query_info<Xt: Extrinsic + GetDispatchInfo>(
		ext: &dyn Externalities,
		unchecked_extrinsic: Xt,
		len: u32,
	) -> RuntimeDispatchInfo {
		// NOTE: we can actually make it understand `ChargeTransactionPayment`, but would be some
		// hassle for sure. We have to make it aware of the index of `ChargeTransactionPayment` in
		// `Extra`. Alternatively, we could actually execute the tx's per-dispatch and record the
		// balance of the sender before and after the pipeline.. but this is way too much hassle
		// for a very very little potential gain in the future.
		let dispatch_info = <Xt as GetDispatchInfo>::get_dispatch_info(&unchecked_extrinsic);

		let partial_fee = if unchecked_extrinsic.is_signed().unwrap_or(false) {
			Self::compute_fee(ext, len, &dispatch_info, 0)
		} else {
			// Unsigned extrinsics have no partial fee.
			0
		};

		let DispatchInfo { weight, class, .. } = dispatch_info;

		RuntimeDispatchInfo { weight, class, partial_fee }
	}

	/// Query the detailed fee of a given `call`.
	pub fn query_fee_details<Xt: Extrinsic + GetDispatchInfo>(
		ext: &dyn Externalities,
		unchecked_extrinsic: Xt,
		len: u32,
	) -> FeeDetails {
		let dispatch_info = <Xt as GetDispatchInfo>::get_dispatch_info(&unchecked_extrinsic);

		let tip = 0;
		if unchecked_extrinsic.is_signed().unwrap_or(false) {
			Self::compute_fee_details(ext, len, &dispatch_info, tip)
		} else {
			// Unsigned extrinsics have no inclusion fee.
			FeeDetails { inclusion_fee: None, tip }
		}
	}

	/// Compute the final fee value for a particular transaction.
	pub fn compute_fee(
		ext: &dyn Externalities,
		len: u32,
		info: &DispatchInfo,
		tip: Balance,
	) -> Balance {
		Self::compute_fee_details(ext, len, info, tip).final_fee()
	}

	/// Compute the fee details for a particular transaction.
	pub fn compute_fee_details(
		ext: &dyn Externalities,
		len: u32,
		info: &DispatchInfo,
		tip: Balance,
	) -> FeeDetails {
		Self::compute_fee_raw(ext, len, info.weight, tip, info.pays_fee, info.class)
	}

	/// Compute the actual post dispatch fee for a particular transaction.
	///
	/// Identical to `compute_fee` with the only difference that the post dispatch corrected
	/// weight is used for the weight fee calculation.
	pub fn compute_actual_fee(
		ext: &dyn Externalities,
		len: u32,
		info: &DispatchInfo,
		post_info: &PostDispatchInfo,
		tip: Balance,
	) -> Balance {
		Self::compute_actual_fee_details(ext, len, info, post_info, tip).final_fee()
	}

	/// Compute the actual post dispatch fee details for a particular transaction.
	pub fn compute_actual_fee_details(
		ext: &dyn Externalities,
		len: u32,
		info: &DispatchInfo,
		post_info: &PostDispatchInfo,
		tip: Balance,
	) -> FeeDetails {
		Self::compute_fee_raw(
			ext,
			len,
			post_info.calc_actual_weight(info),
			tip,
			post_info.pays_fee(info),
			info.class,
		)
	}

	fn compute_fee_raw(
		ext: &dyn Externalities,
		len: u32,
		weight: Weight,
		tip: Balance,
		pays_fee: Pays,
		class: DispatchClass,
	) -> FeeDetails {
		if pays_fee == Pays::Yes {
			// the adjustable part of the fee.
			let unadjusted_weight_fee = Self::weight_to_fee(weight);
			let multiplier = Self::next_fee_multiplier(ext);
			// final adjusted weight fee.
			let adjusted_weight_fee = multiplier.saturating_mul_int(unadjusted_weight_fee);

			// length fee. this is adjusted via `LengthToFee`.
			let len_fee = Self::length_to_fee(len);

			let base_fee = Self::weight_to_fee(T::BlockWeights::get().get(class).base_extrinsic);
			FeeDetails {
				inclusion_fee: Some(InclusionFee { base_fee, len_fee, adjusted_weight_fee }),
				tip,
			}
		} else {
			FeeDetails { inclusion_fee: None, tip }
		}
	}

	/// Compute the length portion of a fee by invoking the configured `LengthToFee` impl.
	pub fn length_to_fee(length: u32) -> Balance {
		T::LengthToFee::weight_to_fee(&Weight::from_parts(length as u64, 0))
	}

	/// Compute the unadjusted portion of the weight fee by invoking the configured `WeightToFee`
	/// impl. Note that the input `weight` is capped by the maximum block weight before computation.
	pub fn weight_to_fee(weight: Weight) -> Balance {
		// cap the weight to the maximum defined in runtime, otherwise it will be the
		// `Bounded` maximum of its data type, which is not desired.
		let capped_weight = weight.min(T::BlockWeights::get().max_block);
		T::WeightToFee::weight_to_fee(&capped_weight)
	}

	fn deposit_event(ext: &mut dyn Externalities, event: Event<T>) {
		stf_system::Pallet::<T>::deposit_event(ext, <T as Config>::RuntimeEvent::from(event));
	}
}

/// Require the transactor pay for themselves and maybe include a tip to gain additional priority
/// in the queue.
///
/// # Transaction Validity
///
/// This extension sets the `priority` field of `TransactionValidity` depending on the amount
/// of tip being paid per weight unit.
///
/// Operational transactions will receive an additional priority bump, so that they are normally
/// considered before regular transactions.
#[derive(Encode, Decode, Clone, Eq, PartialEq, TypeInfo)]
#[scale_info(skip_type_params(T))]
pub struct ChargeTransactionPayment<T>(#[codec(compact)] Balance, PhantomData<T>);

impl<T: Config> ChargeTransactionPayment<T> {
	/// utility constructor. Used only in client/factory code.
	pub fn from(fee: Balance) -> Self {
		Self(fee, PhantomData)
	}

	/// Returns the tip as being chosen by the transaction sender.
	pub fn tip(&self) -> Balance {
		self.0
	}

	fn withdraw_fee(
		&self,
		ext: &mut dyn Externalities,
		who: &T::AccountId,
		call: &T::RuntimeCall,
		info: &DispatchInfo,
		len: usize,
	) -> Result<(Balance, <T::OnChargeTransaction as OnChargeTransaction<T>>::LiquidityInfo), TransactionValidityError>
	{
		let tip = self.0;
		let fee = Pallet::<T>::compute_fee(&*ext, len as u32, info, tip);

		<<T as Config>::OnChargeTransaction as OnChargeTransaction<T>>::withdraw_fee(
			ext, who, call, info, fee, tip,
		)
		.map(|i| (fee, i))
	}

	fn can_withdraw_fee(
		&self,
		ext: &dyn Externalities,
		who: &T::AccountId,
		call: &T::RuntimeCall,
		info: &DispatchInfo,
		len: usize,
	) -> Result<Balance, TransactionValidityError> {
		let tip = self.0;
		let fee = Pallet::<T>::compute_fee(ext, len as u32, info, tip);

		<<T as Config>::OnChargeTransaction as OnChargeTransaction<T>>::can_withdraw_fee(
			ext, who, call, info, fee, tip,
		)?;
		Ok(fee)
	}

	/// Get an appropriate priority for a transaction with the given `DispatchInfo`, encoded length
	/// and user-included tip.
	///
	/// The priority is based on the amount of `tip` the user is willing to pay per unit of either
	/// `weight` or `length`, depending which one is more limiting. For `Operational` extrinsics
	/// we add a "virtual tip" to the calculations.
	///
	/// The formula should simply be `tip / bounded_{weight|length}`, but since we are using
	/// integer division, we have no guarantees it's going to give results in any reasonable
	/// range (might simply end up being zero). Hence we use a scaling factor:
	/// `tip * (max_block_{weight|length} / bounded_{weight|length})`, since given current
	/// state of-the-art blockchains, number of per-block transactions is expected to be in a
	/// range reasonable enough to not saturate the `Balance` type while multiplying by the tip.
	pub fn get_priority(
		info: &DispatchInfo,
		len: usize,
		tip: Balance,
		final_fee: Balance,
	) -> TransactionPriority {
		// Calculate how many such extrinsics we could fit into an empty block and take the
		// limiting factor.
		let max_block_weight = T::BlockWeights::get().max_block.ref_time();
		let max_block_length = *T::BlockLength::get().max.get(info.class) as u64;

		// bounded_weight is used as a divisor later so we keep it non-zero.
		let bounded_weight = info.weight.ref_time().clamp(1, max_block_weight.max(1));
		let bounded_length = (len as u64).clamp(1, max_block_length.max(1));

		let max_tx_per_block_weight = max_block_weight / bounded_weight;
		let max_tx_per_block_length = max_block_length / bounded_length;
		// Given our current knowledge this value is going to be in a reasonable range - i.e.
		// less than 10^9 (2^30), so multiplying by the `tip` value is unlikely to overflow the
		// balance type. We still use saturating ops obviously, but the point is to end up with some
		// `priority` distribution instead of having all transactions saturate the priority.
		let max_tx_per_block: Balance =
			max_tx_per_block_length.min(max_tx_per_block_weight).saturated_into();
		let max_reward = |val: Balance| val.saturating_mul(max_tx_per_block);

		// To distribute no-tip transactions a little bit, we increase the tip value by one.
		// This means that given two transactions without a tip, smaller one will be preferred.
		let tip = tip.saturating_add(1);
		let scaled_tip = max_reward(tip);

		match info.class {
			DispatchClass::Normal => {
				// For normal class we simply take the `tip_per_weight`.
				scaled_tip
			},
			DispatchClass::Mandatory => {
				// Mandatory extrinsics should be prohibited (e.g. by the [`CheckWeight`]
				// extensions), but just to be safe let's return the same priority as `Normal` here.
				scaled_tip
			},
			DispatchClass::Operational => {
				// A "virtual tip" value added to an `Operational` extrinsic.
				// This value should be kept high enough to allow `Operational` extrinsics
				// to get in even during congestion period, but at the same time low
				// enough to prevent a possible spam attack by sending invalid operational
				// extrinsics which push away regular transactions from the pool.
				let fee_multiplier = Balance::from(T::OperationalFeeMultiplier::get());
				let virtual_tip = final_fee.saturating_mul(fee_multiplier);
				let scaled_virtual_tip = max_reward(virtual_tip);

				scaled_tip.saturating_add(scaled_virtual_tip)
			},
		}
		.saturated_into::<TransactionPriority>()
	}
}

impl<T: Config> core::fmt::Debug for ChargeTransactionPayment<T> {
	fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
		write!(f, "ChargeTransactionPayment<{:?}>", self.0)
	}
}

impl<T: Config> SignedExtension for ChargeTransactionPayment<T> {
	const IDENTIFIER: &'static str = "ChargeTransactionPayment";
	type AccountId = T::AccountId;
	type Call = T::RuntimeCall;
	type AdditionalSigned = ();
	type Pre = (
		// tip
		Balance,
		// who paid the fee
		Self::AccountId,
		// imbalance resulting from withdrawing the fee
		<<T as Config>::OnChargeTransaction as OnChargeTransaction<T>>::LiquidityInfo,
	);

	fn additional_signed(&self, _: &dyn Externalities) -> Result<(), TransactionValidityError> {
		Ok(())
	}

	fn validate(
		&self,
		ext: &dyn Externalities,
		who: &Self::AccountId,
		call: &Self::Call,
		info: &DispatchInfo,
		len: usize,
	) -> TransactionValidity {
		let final_fee = self.can_withdraw_fee(ext, who, call, info, len)?;
		let tip = self.0;
		Ok(ValidTransaction {
			priority: Self::get_priority(info, len, tip, final_fee),
			..Default::default()
		})
	}

	fn pre_dispatch(
		self,
		ext: &mut dyn Externalities,
		who: &Self::AccountId,
		call: &Self::Call,
		info: &DispatchInfo,
		len: usize,
	) -> Result<Self::Pre, TransactionValidityError> {
		let (_fee, imbalance) = self.withdraw_fee(ext, who, call, info, len)?;
		Ok((self.0, who.clone(), imbalance))
	}

	fn post_dispatch(
		ext: &mut dyn Externalities,
		maybe_pre: Option<Self::Pre>,
		info: &DispatchInfo,
		post_info: &PostDispatchInfo,
		len: usize,
		_result: &DispatchResult,
	) -> Result<(), TransactionValidityError> {
		if let Some((tip, who, imbalance)) = maybe_pre {
			let actual_fee = Pallet::<T>::compute_actual_fee(&*ext, len as u32, info, post_info, tip);
			T::OnChargeTransaction::correct_and_deposit_fee(
				ext, &who, info, post_info, actual_fee, tip, imbalance,
			)?;
			log::trace!(
				target: LOG_TARGET,
				"Fee {} (tip {}) paid by {:?}",
				actual_fee,
				tip,
				who,
			);
			Pallet::<T>::deposit_event(ext, Event::TransactionFeePaid { who, actual_fee, tip });
		}
		Ok(())
	}
}

