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

//! Traits and default implementation for paying transaction fees.

use crate::Config;

use core::marker::PhantomData;
use stf_primitives::{
	traits::Zero,
	transaction_validity::{InvalidTransaction, TransactionValidityError},
	Balance, DispatchInfo, Externalities, PostDispatchInfo,
};
use stf_support::traits::{Currency, ExistenceRequirement, WithdrawReasons};

/// Handle withdrawing, refunding and depositing of transaction fees.
pub trait OnChargeTransaction<T: Config> {
	/// What is kept between withdrawing the fee and correcting it.
	type LiquidityInfo: Default;

	/// Before the transaction is executed the payment of the transaction fees
	/// need to be secured.
	///
	/// Note: The `fee` already includes the `tip`.
	fn withdraw_fee(
		ext: &mut dyn Externalities,
		who: &T::AccountId,
		call: &T::RuntimeCall,
		dispatch_info: &DispatchInfo,
		fee: Balance,
		tip: Balance,
	) -> Result<Self::LiquidityInfo, TransactionValidityError>;

	/// Check if the predicted fee from the transaction origin can be withdrawn.
	///
	/// Note: The `fee` already includes the `tip`.
	fn can_withdraw_fee(
		ext: &dyn Externalities,
		who: &T::AccountId,
		call: &T::RuntimeCall,
		dispatch_info: &DispatchInfo,
		fee: Balance,
		tip: Balance,
	) -> Result<(), TransactionValidityError>;

	/// After the transaction was executed the actual fee can be calculated.
	/// This function should refund any overpaid fees.
	///
	/// Note: The `fee` already includes the `tip`.
	fn correct_and_deposit_fee(
		ext: &mut dyn Externalities,
		who: &T::AccountId,
		dispatch_info: &DispatchInfo,
		post_info: &PostDispatchInfo,
		corrected_fee: Balance,
		tip: Balance,
		already_withdrawn: Self::LiquidityInfo,
	) -> Result<(), TransactionValidityError>;
}

/// Implements the transaction payment for a module implementing the [`Currency`]
/// trait (eg. the balances module).
///
/// The withdrawn fee is burnt: it leaves the total issuance and nobody is credited with it.
pub struct CurrencyAdapter<C>(PhantomData<C>);

impl<T, C> OnChargeTransaction<T> for CurrencyAdapter<C>
where
	T: Config,
	C: Currency<<T as stf_system::Config>::AccountId>,
{
	type LiquidityInfo = Option<Balance>;

	/// Withdraw the predicted fee from the transaction origin.
	///
	/// Note: The `fee` already includes the `tip`.
	fn withdraw_fee(
		ext: &mut dyn Externalities,
		who: &T::AccountId,
		_call: &T::RuntimeCall,
		_info: &DispatchInfo,
		fee: Balance,
		_tip: Balance,
	) -> Result<Self::LiquidityInfo, TransactionValidityError> {
		if fee.is_zero() {
			return Ok(None)
		}

		match C::withdraw(
			ext,
			who,
			fee,
			WithdrawReasons::TransactionPayment,
			ExistenceRequirement::KeepAlive,
		) {
			Ok(paid) => Ok(Some(paid)),
			Err(_) => Err(InvalidTransaction::Payment.into()),
		}
	}

	/// Check if the predicted fee from the transaction origin can be withdrawn.
	///
	/// Note: The `fee` already includes the `tip`.
	fn can_withdraw_fee(
		ext: &dyn Externalities,
		who: &T::AccountId,
		_call: &T::RuntimeCall,
		_info: &DispatchInfo,
		fee: Balance,
		_tip: Balance,
	) -> Result<(), TransactionValidityError> {
		if fee.is_zero() {
			return Ok(())
		}

		let free = C::free_balance(ext, who);
		let new_free = free.checked_sub(fee).ok_or(InvalidTransaction::Payment)?;
		let total = C::total_balance(ext, who);
		let reserved = total.saturating_sub(free);
		let would_kill = new_free.saturating_add(reserved) < C::minimum_balance() &&
			total >= C::minimum_balance();
		if would_kill {
			return Err(InvalidTransaction::Payment.into())
		}

		C::ensure_can_withdraw(ext, who, fee, WithdrawReasons::TransactionPayment, new_free)
			.map_err(|_| InvalidTransaction::Payment.into())
	}

	/// Refund the part of the predicted fee that turned out to be too high.
	///
	/// Note: The `corrected_fee` already includes the `tip`.
	fn correct_and_deposit_fee(
		ext: &mut dyn Externalities,
		who: &T::AccountId,
		_dispatch_info: &DispatchInfo,
		_post_info: &PostDispatchInfo,
		corrected_fee: Balance,
		_tip: Balance,
		already_withdrawn: Self::LiquidityInfo,
	) -> Result<(), TransactionValidityError> {
		if let Some(paid) = already_withdrawn {
			// Calculate how much refund we should return
			let refund_amount = paid.saturating_sub(corrected_fee);
			// refund to the the account that paid the fees. If this fails, the
			// account might have dropped below the existential balance. In
			// that case we don't refund anything.
			let refunded =
				C::deposit_into_existing(ext, who, refund_amount).unwrap_or_else(|_| Zero::zero());
			if paid < refunded {
				return Err(InvalidTransaction::Payment.into())
			}
		}
		Ok(())
	}
}
