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

//! The currency abstraction used by the fee logic.
//!
//! There are no imbalance types: every operation settles the total issuance itself.

use stf_primitives::{Balance, DispatchError, DispatchResult, Externalities};

/// Simple boolean for whether an account needs to be kept in existence.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ExistenceRequirement {
	/// Operation must not result in the account going out of existence.
	///
	/// Note this implies that if the account never existed in the first place, then the operation
	/// may legitimately leave the account unchanged and still non-existent.
	KeepAlive,
	/// Operation may result in account going out of existence.
	AllowDeath,
}

/// Why a balance is being withdrawn.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum WithdrawReasons {
	/// In order to pay for (system) transaction costs.
	TransactionPayment,
	/// In order to transfer ownership.
	Transfer,
	/// In order to pay some other (higher-level) fees.
	Fee,
}

/// Abstraction over a fungible assets system.
pub trait Currency<AccountId> {
	/// The combined balance of `who`.
	fn total_balance(ext: &dyn Externalities, who: &AccountId) -> Balance;

	/// The 'free' balance of a given account.
	fn free_balance(ext: &dyn Externalities, who: &AccountId) -> Balance;

	/// The total amount of issuance in the system.
	fn total_issuance(ext: &dyn Externalities) -> Balance;

	/// The minimum balance any single account may have. This is equivalent to the `Balances`
	/// module's `ExistentialDeposit`.
	fn minimum_balance() -> Balance;

	/// Returns `Ok` iff the account is able to make a withdrawal of the given amount
	/// for the given reason. Basically, it's just a dry-run of `withdraw`.
	///
	/// `Err(...)` with the reason why not otherwise.
	fn ensure_can_withdraw(
		ext: &dyn Externalities,
		who: &AccountId,
		amount: Balance,
		reasons: WithdrawReasons,
		new_balance: Balance,
	) -> DispatchResult;

	/// Transfer some liquid free balance to another staker.
	///
	/// This is a very high-level function. It will ensure no imbalance in the system remains.
	fn transfer(
		ext: &mut dyn Externalities,
		source: &AccountId,
		dest: &AccountId,
		value: Balance,
		existence_requirement: ExistenceRequirement,
	) -> DispatchResult;

	/// Removes some free balance from `who` account for `reason` if possible. If `liveness` is
	/// `KeepAlive`, then no less than `ExistentialDeposit` must be left remaining.
	///
	/// The withdrawn amount is taken out of the total issuance.
	fn withdraw(
		ext: &mut dyn Externalities,
		who: &AccountId,
		value: Balance,
		reason: WithdrawReasons,
		liveness: ExistenceRequirement,
	) -> Result<Balance, DispatchError>;

	/// Adds up to `value` to the free balance of `who`. If `who` doesn't exist, nothing is done
	/// and an `Err` returned.
	///
	/// The deposited amount is added to the total issuance.
	fn deposit_into_existing(
		ext: &mut dyn Externalities,
		who: &AccountId,
		value: Balance,
	) -> Result<Balance, DispatchError>;

	/// Adds up to `value` to the free balance of `who`. If `who` doesn't exist, it is created.
	///
	/// Returns the amount actually deposited, which is zero when `value` is below the existential
	/// deposit of a new account.
	fn deposit_creating(ext: &mut dyn Externalities, who: &AccountId, value: Balance) -> Balance;
}
