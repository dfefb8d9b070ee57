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

//! # Balances Module
//!
//! The Balances module provides functionality for handling accounts and balances.
//!
//! ## Overview
//!
//! The Balances module provides functions for:
//!
//! - Getting and setting free balances.
//! - Retrieving total, reserved and unreserved balances.
//! - Transferring a balance between accounts (when not reserved).
//! - Withdrawing and depositing balances through the [`Currency`] trait, which the transaction
//!   payment module uses to charge fees.
//!
//! ### Terminology
//!
//! - **Existential Deposit:** The minimum balance required to create or keep an account open.
//!   When the total balance of an account falls below it, the account is reaped and the remaining
//!   balance is lost as dust, which is taken out of the total issuance.
//! - **Total Issuance:** The total number of units in existence in a system.
//! - **Reducible Balance:** The part of the free balance that can be moved without violating a
//!   freeze or, when asked to keep the account alive, the existential deposit.
//!
//! ## Interface
//!
//! ### Dispatchable Functions
//!
//! - `transfer` - Transfer some liquid free balance to another account.
//! - `set_balance` - Set the balances of a given account. The origin of this call must be root.
//! - `force_transfer` - Exactly as `transfer`, except the origin must be root.
//! - `transfer_keep_alive` - Same as `transfer`, but with a check that the transfer will not kill
//!   the origin account.
//! - `transfer_all` - Transfer the entire transferable balance from the caller account.
//! - `force_unreserve` - Unreserve some balance from a user by force.

use core::marker::PhantomData;

use codec::{Decode, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
use stf_primitives::{
	traits::{GetDispatchInfo, StaticLookup, Zero},
	ArithmeticError, Balance, DispatchError, DispatchInfo, DispatchResult,
	DispatchResultWithPostInfo, Externalities, Weight,
};
use stf_support::{
	decl_error,
	dispatch::{dispatch_info, GetCallIndex, GetCallName, UnfilteredDispatchable},
	ensure, storage_prefixes,
	traits::{
		BuildGenesisConfig, Currency, ExistenceRequirement, Get, Hooks, StoredMap, WithdrawReasons,
	},
	StorageValue, ValueQuery,
};
use stf_system::{ensure_root, ensure_signed, AccountIdLookupOf, OriginFor};

pub mod weights;

#[cfg(test)]
mod mock;

pub use weights::WeightInfo;

/// Log target of the balances module.
pub const LOG_TARGET: &str = "runtime::balances";

/// Simplified reasons for withdrawing balance.
#[derive(Encode, Decode, Clone, Copy, PartialEq, Eq, Debug, TypeInfo, MaxEncodedLen)]
pub enum Reasons {
	/// Paying system transaction fees.
	Fee = 0,
	/// Any reason other than paying system transaction fees.
	Misc = 1,
	/// Any reason at all.
	All = 2,
}

impl From<WithdrawReasons> for Reasons {
	fn from(r: WithdrawReasons) -> Reasons {
		match r {
			WithdrawReasons::TransactionPayment => Reasons::Fee,
			WithdrawReasons::Transfer | WithdrawReasons::Fee => Reasons::Misc,
		}
	}
}

/// All balance information for an account.
#[derive(Encode, Decode, Clone, PartialEq, Eq, Default, Debug, TypeInfo, MaxEncodedLen)]
pub struct AccountData {
	/// Non-reserved part of the balance. There may still be restrictions on this, but it is the
	/// total pool what may in principle be transferred, reserved and used for tipping.
	///
	/// This is the only balance that matters in terms of most operations on tokens. It
	/// alone is used to determine the balance when in the contract execution environment.
	pub free: Balance,
	/// Balance which is reserved and may not be used at all.
	///
	/// This can still get slashed, but gets slashed last of all.
	///
	/// This balance is a 'reserve' balance that other subsystems use in order to set aside tokens
	/// that are still 'owned' by the account holder, but which are suspendable.
	pub reserved: Balance,
	/// The amount that `free` may not drop below when withdrawing for *anything except transaction
	/// fee payment*.
	pub misc_frozen: Balance,
	/// The amount that `free` may not drop below when withdrawing specifically for transaction
	/// fee payment.
	pub fee_frozen: Balance,
}

impl AccountData {
	/// How much this account's balance can be reduced for the given `reasons`.
	pub fn usable(&self, reasons: Reasons) -> Balance {
		self.free.saturating_sub(self.frozen(reasons))
	}

	/// The amount that this account's free balance may not be reduced beyond for the given
	/// `reasons`.
	pub fn frozen(&self, reasons: Reasons) -> Balance {
		match reasons {
			Reasons::All => self.misc_frozen.max(self.fee_frozen),
			Reasons::Misc => self.misc_frozen,
			Reasons::Fee => self.fee_frozen,
		}
	}

	/// The total balance in this account including any that is reserved and ignoring any frozen.
	pub fn total(&self) -> Balance {
		self.free.saturating_add(self.reserved)
	}
}

/// The module configuration trait.
pub trait Config: stf_system::Config {
	/// The overarching event type.
	type RuntimeEvent: From<Event<Self>> + Into<<Self as stf_system::Config>::RuntimeEvent>;

	/// The minimum amount required to keep an account open. MUST BE GREATER THAN ZERO!
	///
	/// Bottom line: Do yourself a favour and make it at least one!
	type ExistentialDeposit: Get<Balance>;

	/// The means of storing the balances of an account.
	type AccountStore: StoredMap<Self::AccountId, AccountData>;

	/// Weight information for extrinsics in this module.
	type WeightInfo: WeightInfo;
}

/// The balances module.
pub struct Pallet<T>(PhantomData<T>);

/// Contains the dispatchable functions of the balances module.
#[derive(Encode, Decode, Clone, PartialEq, Eq, Debug, TypeInfo)]
#[scale_info(skip_type_params(T))]
#[allow(non_camel_case_types)]
pub enum Call<T: Config> {
	/// Transfer some liquid free balance to another account.
	#[codec(index = 0)]
	transfer {
		dest: AccountIdLookupOf<T>,
		#[codec(compact)]
		value: Balance,
	},
	/// Set the balances of a given account.
	#[codec(index = 1)]
	set_balance {
		who: AccountIdLookupOf<T>,
		#[codec(compact)]
		new_free: Balance,
		#[codec(compact)]
		new_reserved: Balance,
	},
	/// Exactly as `transfer`, except the origin must be root and the source account may be
	/// specified.
	#[codec(index = 2)]
	force_transfer {
		source: AccountIdLookupOf<T>,
		dest: AccountIdLookupOf<T>,
		#[codec(compact)]
		value: Balance,
	},
	/// Same as the `transfer` call, but with a check that the transfer will not kill the origin
	/// account.
	#[codec(index = 3)]
	transfer_keep_alive {
		dest: AccountIdLookupOf<T>,
		#[codec(compact)]
		value: Balance,
	},
	/// Transfer the entire transferable balance from the caller account.
	#[codec(index = 4)]
	transfer_all { dest: AccountIdLookupOf<T>, keep_alive: bool },
	/// Unreserve some balance from a user by force.
	#[codec(index = 5)]
	force_unreserve { who: AccountIdLookupOf<T>, amount: Balance },
	#[doc(hidden)]
	#[codec(skip)]
	__Ignore(PhantomData<T>, stf_support::Never),
}

/// Events of the balances module.
#[derive(Encode, Decode, Clone, PartialEq, Eq, Debug, TypeInfo)]
#[scale_info(skip_type_params(T))]
pub enum Event<T: Config> {
	/// An account was created with some free balance.
	#[codec(index = 0)]
	Endowed { account: T::AccountId, free_balance: Balance },
	/// An account was removed whose balance was non-zero but below ExistentialDeposit,
	/// resulting in an outright loss.
	#[codec(index = 1)]
	DustLost { account: T::AccountId, amount: Balance },
	/// Transfer succeeded.
	#[codec(index = 2)]
	Transfer { from: T::AccountId, to: T::AccountId, amount: Balance },
	/// A balance was set by root.
	#[codec(index = 3)]
	BalanceSet { who: T::AccountId, free: Balance, reserved: Balance },
	/// Some balance was unreserved (moved from reserved to free).
	#[codec(index = 5)]
	Unreserved { who: T::AccountId, amount: Balance },
	/// Some amount was deposited (e.g. for transaction fees).
	#[codec(index = 7)]
	Deposit { who: T::AccountId, amount: Balance },
	/// Some amount was withdrawn from the account (e.g. for transaction fees).
	#[codec(index = 8)]
	Withdraw { who: T::AccountId, amount: Balance },
}

decl_error! {
	/// Error for the balances module.
	pub enum Error for Pallet<T: Config> {
		/// Vesting balance too high to send value.
		VestingBalance,
		/// Account liquidity restrictions prevent withdrawal.
		LiquidityRestrictions,
		/// Balance too low to send value.
		InsufficientBalance,
		/// Value too low to create account due to existential deposit.
		ExistentialDeposit,
		/// Transfer/payment would kill account.
		KeepAlive,
		/// A vesting schedule already exists for this account.
		ExistingVestingSchedule,
		/// Beneficiary account must pre-exist.
		DeadAccount,
		/// Number of named reserves exceed MaxReserves.
		TooManyReserves,
	}
}

storage_prefixes! {
	module = "Balances";
	pub struct TotalIssuancePrefix = "TotalIssuance";
}

/// The total units issued in the system.
pub type TotalIssuance = StorageValue<TotalIssuancePrefix, Balance, ValueQuery>;

/// Genesis configuration of the balances module.
pub struct GenesisConfig<T: Config> {
	/// The accounts endowed at genesis and their free balance.
	pub balances: Vec<(T::AccountId, Balance)>,
}

impl<T: Config> Default for GenesisConfig<T> {
	fn default() -> Self {
		Self { balances: Default::default() }
	}
}

impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
	fn build(&self, ext: &mut dyn Externalities) {
		let total = self.balances.iter().fold(Zero::zero(), |acc: Balance, &(_, n)| acc + n);
		TotalIssuance::put(ext, total);

		for (_, balance) in &self.balances {
			assert!(
				*balance >= T::ExistentialDeposit::get(),
				"the balance of any account should always be at least the existential deposit.",
			)
		}

		// ensure no duplicates exist.
		let mut endowed_accounts = self.balances.iter().map(|(x, _)| x).collect::<Vec<_>>();
		endowed_accounts.sort();
		endowed_accounts.dedup();
		assert!(
			endowed_accounts.len() == self.balances.len(),
			"duplicate balances in genesis."
		);

		for (who, free) in &self.balances {
			T::AccountStore::insert(ext, who, AccountData { free: *free, ..Default::default() })
				.expect("a new account with a provider reference can always be created; qed");
		}
	}
}

impl<T: Config> Hooks for Pallet<T> {}

impl<T: Config> GetDispatchInfo for Call<T> {
	fn get_dispatch_info(&self) -> DispatchInfo {
		// Only the execution time is accounted, the proof size is not charged.
		let ref_time = |w: Weight| Weight::from_parts(w.ref_time(), 0);
		match self {
			Self::transfer { .. } => dispatch_info(&ref_time(T::WeightInfo::transfer()), ()),
			Self::set_balance { .. } => dispatch_info(
				&ref_time(
					T::WeightInfo::set_balance_creating().max(T::WeightInfo::set_balance_killing()),
				),
				(),
			),
			Self::force_transfer { .. } =>
				dispatch_info(&ref_time(T::WeightInfo::force_transfer()), ()),
			Self::transfer_keep_alive { .. } =>
				dispatch_info(&ref_time(T::WeightInfo::transfer_keep_alive()), ()),
			Self::transfer_all { .. } =>
				dispatch_info(&ref_time(T::WeightInfo::transfer_all()), ()),
			Self::force_unreserve { .. } =>
				dispatch_info(&ref_time(T::WeightInfo::force_unreserve()), ()),
			Self::__Ignore(_, never) => match *never {},
		}
	}
}

impl<T: Config> GetCallIndex for Call<T> {
	fn get_call_indices() -> &'static [u8] {
		&[0, 1, 2, 3, 4, 5]
	}

	fn get_call_index(&self) -> u8 {
		match self {
			Self::transfer { .. } => 0,
			Self::set_balance { .. } => 1,
			Self::force_transfer { .. } => 2,
			Self::transfer_keep_alive { .. } => 3,
			Self::transfer_all { .. } => 4,
			Self::force_unreserve { .. } => 5,
			Self::__Ignore(_, never) => match *never {},
		}
	}
}

impl<T: Config> GetCallName for Call<T> {
	fn get_call_names() -> &'static [&'static str] {
		&[
			"transfer",
			"set_balance",
			"force_transfer",
			"transfer_keep_alive",
			"transfer_all",
			"force_unreserve",
		]
	}

	fn get_call_name(&self) -> &'static str {
		match self {
			Self::transfer { .. } => "transfer",
			Self::set_balance { .. } => "set_balance",
			Self::force_transfer { .. } => "force_transfer",
			Self::transfer_keep_alive { .. } => "transfer_keep_alive",
			Self::transfer_all { .. } => "transfer_all",
			Self::force_unreserve { .. } => "force_unreserve",
			Self::__Ignore(_, never) => match *never {},
		}
	}
}

impl<T: Config> UnfilteredDispatchable for Call<T> {
	type RuntimeOrigin = OriginFor<T>;

	fn dispatch_bypass_filter(
		self,
		ext: &mut dyn Externalities,
		origin: Self::RuntimeOrigin,
	) -> DispatchResultWithPostInfo {
		match self {
			Self::transfer { dest, value } => Pallet::<T>::transfer(ext, origin, dest, value),
			Self::set_balance { who, new_free, new_reserved } =>
				Pallet::<T>::set_balance(ext, origin, who, new_free, new_reserved),
			Self::force_transfer { source, dest, value } =>
				Pallet::<T>::force_transfer(ext, origin, source, dest, value),
			Self::transfer_keep_alive { dest, value } =>
				Pallet::<T>::transfer_keep_alive(ext, origin, dest, value),
			Self::transfer_all { dest, keep_alive } =>
				Pallet::<T>::transfer_all(ext, origin, dest, keep_alive),
			Self::force_unreserve { who, amount } =>
				Pallet::<T>::force_unreserve(ext, origin, who, amount),
			Self::__Ignore(_, never) => match never {},
		}
	}
}

// Dispatchables.
impl<T: Config> Pallet<T> {
	/// Transfer some liquid free balance to another account.
	///
	/// `transfer` will set the `FreeBalance` of the sender and receiver.
	/// If the sender's account is below the existential deposit as a result
	/// of the transfer, the account will be reaped.
	///
	/// The dispatch origin for this call must be `Signed` by the transactor.
	pub fn transfer(
		ext: &mut dyn Externalities,
		origin: OriginFor<T>,
		dest: AccountIdLookupOf<T>,
		value: Balance,
	) -> DispatchResultWithPostInfo {
		let transactor = ensure_signed(origin)?;
		let dest = T::Lookup::lookup(&*ext, dest)?;
		Self::do_transfer(ext, &transactor, &dest, value, ExistenceRequirement::AllowDeath)?;
		Ok(().into())
	}

	/// Set the balances of a given account.
	///
	/// This will alter `FreeBalance` and `ReservedBalance` in storage. it will
	/// also alter the total issuance of the system (`TotalIssuance`) appropriately.
	/// If the new free or reserved balance is below the existential deposit,
	/// it will reset the account nonce (`frame_system::AccountNonce`).
	///
	/// The dispatch origin for this call is `root`.
	pub fn set_balance(
		ext: &mut dyn Externalities,
		origin: OriginFor<T>,
		who: AccountIdLookupOf<T>,
		new_free: Balance,
		new_reserved: Balance,
	) -> DispatchResultWithPostInfo {
		ensure_root(origin)?;
		let who = T::Lookup::lookup(&*ext, who)?;
		let existential_deposit = T::ExistentialDeposit::get();

		let wipeout = new_free.saturating_add(new_reserved) < existential_deposit;
		let new_free = if wipeout { Zero::zero() } else { new_free };
		let new_reserved = if wipeout { Zero::zero() } else { new_reserved };

		let (old_free, old_reserved) = Self::mutate_account(ext, &who, |account| {
			let old_free = account.free;
			let old_reserved = account.reserved;

			account.free = new_free;
			account.reserved = new_reserved;

			(old_free, old_reserved)
		})?;

		TotalIssuance::mutate(ext, |issued| {
			*issued = issued
				.saturating_add(new_free.saturating_sub(old_free))
				.saturating_add(new_reserved.saturating_sub(old_reserved))
				.saturating_sub(old_free.saturating_sub(new_free))
				.saturating_sub(old_reserved.saturating_sub(new_reserved));
		});

		Self::deposit_event(ext, Event::BalanceSet { who, free: new_free, reserved: new_reserved });
		Ok(().into())
	}

	/// Exactly as `transfer`, except the origin must be root and the source account may be
	/// specified.
	pub fn force_transfer(
		ext: &mut dyn Externalities,
		origin: OriginFor<T>,
		source: AccountIdLookupOf<T>,
		dest: AccountIdLookupOf<T>,
		value: Balance,
	) -> DispatchResultWithPostInfo {
		ensure_root(origin)?;
		let source = T::Lookup::lookup(&*ext, source)?;
		let dest = T::Lookup::lookup(&*ext, dest)?;
		Self::do_transfer(ext, &source, &dest, value, ExistenceRequirement::AllowDeath)?;
		Ok(().into())
	}

	/// Same as the [`transfer`](Self::transfer) call, but with a check that the transfer will
	/// not kill the origin account.
	///
	/// 99% of the time you want [`transfer`](Self::transfer) instead.
	pub fn transfer_keep_alive(
		ext: &mut dyn Externalities,
		origin: OriginFor<T>,
		dest: AccountIdLookupOf<T>,
		value: Balance,
	) -> DispatchResultWithPostInfo {
		let transactor = ensure_signed(origin)?;
		let dest = T::Lookup::lookup(&*ext, dest)?;
		Self::do_transfer(ext, &transactor, &dest, value, ExistenceRequirement::KeepAlive)?;
		Ok(().into())
	}

	/// Transfer the entire transferable balance from the caller account.
	///
	/// NOTE: This function only attempts to transfer _transferable_ balances. This means that
	/// any locked, reserved, or existential deposits (when `keep_alive` is `true`), will not be
	/// transferred by this function.
	///
	/// The dispatch origin of this call must be Signed.
	///
	/// - `dest`: The recipient of the transfer.
	/// - `keep_alive`: A boolean to determine if the `transfer_all` operation should send all
	///   of the funds the account has, causing the sender account to be killed (false), or
	///   transfer everything except at least the existential deposit, which will guarantee to
	///   keep the sender account alive (true).
	pub fn transfer_all(
		ext: &mut dyn Externalities,
		origin: OriginFor<T>,
		dest: AccountIdLookupOf<T>,
		keep_alive: bool,
	) -> DispatchResultWithPostInfo {
		let transactor = ensure_signed(origin)?;
		let reducible_balance = Self::reducible_balance(&*ext, &transactor, keep_alive);
		let dest = T::Lookup::lookup(&*ext, dest)?;
		let keep_alive = if keep_alive {
			ExistenceRequirement::KeepAlive
		} else {
			ExistenceRequirement::AllowDeath
		};
		Self::do_transfer(ext, &transactor, &dest, reducible_balance, keep_alive)?;
		Ok(().into())
	}

	/// Unreserve some balance from a user by force.
	///
	/// Can only be called by ROOT.
	pub fn force_unreserve(
		ext: &mut dyn Externalities,
		origin: OriginFor<T>,
		who: AccountIdLookupOf<T>,
		amount: Balance,
	) -> DispatchResultWithPostInfo {
		ensure_root(origin)?;
		let who = T::Lookup::lookup(&*ext, who)?;
		let _leftover = Self::unreserve(ext, &who, amount);
		Ok(().into())
	}
}

impl<T: Config> Pallet<T> {
	/// Get the free balance of an account.
	pub fn free_balance(ext: &dyn Externalities, who: &T::AccountId) -> Balance {
		Self::account(ext, who).free
	}

	/// Get the balance of an account that can be used for transfers, reservations, or any other
	/// non-locking, non-transaction-fee activity. Will be at most `free_balance`.
	pub fn usable_balance(ext: &dyn Externalities, who: &T::AccountId) -> Balance {
		Self::account(ext, who).usable(Reasons::Misc)
	}

	/// Get the balance of an account that can be used for paying transaction fees (not tipping,
	/// or any other kind of fees, though). Will be at most `free_balance`.
	pub fn usable_balance_for_fees(ext: &dyn Externalities, who: &T::AccountId) -> Balance {
		Self::account(ext, who).usable(Reasons::Fee)
	}

	/// Get the reserved balance of an account.
	pub fn reserved_balance(ext: &dyn Externalities, who: &T::AccountId) -> Balance {
		Self::account(ext, who).reserved
	}

	/// The total units issued in the system.
	pub fn total_issuance(ext: &dyn Externalities) -> Balance {
		TotalIssuance::get(ext)
	}

	/// Get both the free and reserved balances of an account.
	fn account(ext: &dyn Externalities, who: &T::AccountId) -> AccountData {
		T::AccountStore::get(ext, who)
	}

	/// The maximum amount that can be moved out of `who` without violating a freeze, and without
	/// reaping the account when `keep_alive` is set or the account has consumers.
	pub fn reducible_balance(
		ext: &dyn Externalities,
		who: &T::AccountId,
		keep_alive: bool,
	) -> Balance {
		let a = Self::account(ext, who);
		// Liquid balance is what is neither reserved nor locked/frozen.
		let liquid = a.free.saturating_sub(a.fee_frozen.max(a.misc_frozen));
		if stf_system::Pallet::<T>::can_dec_provider(ext, who) && !keep_alive {
			liquid
		} else {
			// `must_remain_to_exist` is the part of liquid balance which must remain to keep total
			// over ED.
			let must_remain_to_exist =
				T::ExistentialDeposit::get().saturating_sub(a.total().saturating_sub(liquid));
			liquid.saturating_sub(must_remain_to_exist)
		}
	}

	/// Ensure that an account with the balances of `account` can have its free balance reduced
	/// to `new_balance` for the given `reasons`.
	fn ensure_can_withdraw_from(
		account: &AccountData,
		amount: Balance,
		reasons: Reasons,
		new_balance: Balance,
	) -> DispatchResult {
		if amount.is_zero() {
			return Ok(())
		}
		ensure!(new_balance >= account.frozen(reasons), Error::<T>::LiquidityRestrictions);
		Ok(())
	}

	/// Handles any steps needed after mutating an account.
	///
	/// Returns the account to store, `None` when it has to be reaped, together with the dust that
	/// is lost by reaping it.
	fn post_mutation(new: AccountData) -> (Option<AccountData>, Option<Balance>) {
		let total = new.total();
		if total < T::ExistentialDeposit::get() {
			if total.is_zero() {
				(None, None)
			} else {
				(None, Some(total))
			}
		} else {
			(Some(new), None)
		}
	}

	/// Remove `dust` lost by reaping `who` from the total issuance.
	fn handle_dust(ext: &mut dyn Externalities, who: &T::AccountId, dust: Balance) {
		log::debug!(target: LOG_TARGET, "Account {:?} reaped, {} dust lost", who, dust);
		TotalIssuance::mutate(ext, |issued| *issued = issued.saturating_sub(dust));
		Self::deposit_event(ext, Event::DustLost { account: who.clone(), amount: dust });
	}

	/// Mutate an account to some new value, or delete it entirely with `None`. Will enforce
	/// `ExistentialDeposit` law, annulling the account as needed.
	///
	/// NOTE: Doesn't do any preparatory work for creating a new account, so should only be used
	/// when it is known that the account already exists.
	///
	/// NOTE: LOW-LEVEL: This will not attempt to maintain total issuance. It is expected that
	/// the caller will do this.
	pub fn mutate_account<R>(
		ext: &mut dyn Externalities,
		who: &T::AccountId,
		f: impl FnOnce(&mut AccountData) -> R,
	) -> Result<R, DispatchError> {
		Self::try_mutate_account(ext, who, |a, _| -> Result<R, DispatchError> { Ok(f(a)) })
	}

	/// Mutate an account to some new value, or delete it entirely with `None`. Will enforce
	/// `ExistentialDeposit` law, annulling the account as needed. This will do nothing if the
	/// result of `f` is an `Err`.
	///
	/// It returns the result from the closure. Any dust is handled through the low-level
	/// `fungible::Unbalanced` trap-door for legacy dust management.
	fn try_mutate_account<R, E: From<DispatchError>>(
		ext: &mut dyn Externalities,
		who: &T::AccountId,
		f: impl FnOnce(&mut AccountData, bool) -> Result<R, E>,
	) -> Result<R, E> {
		let (result, maybe_dust) = Self::try_mutate_account_with_dust(ext, who, f)?;
		if let Some(dust) = maybe_dust {
			Self::handle_dust(ext, who, dust);
		}
		Ok(result)
	}

	/// Mutate an account to some new value, or delete it entirely with `None`. Will enforce
	/// `ExistentialDeposit` law, annulling the account as needed. This will do nothing if the
	/// result of `f` is an `Err`.
	///
	/// It returns both the result from the closure, and the dust that was lost by reaping the
	/// account, if any. The caller is responsible for removing that dust from the total issuance.
	fn try_mutate_account_with_dust<R, E: From<DispatchError>>(
		ext: &mut dyn Externalities,
		who: &T::AccountId,
		f: impl FnOnce(&mut AccountData, bool) -> Result<R, E>,
	) -> Result<(R, Option<Balance>), E> {
		let (maybe_endowed, maybe_dust, result) =
			T::AccountStore::try_mutate_exists(ext, who, |maybe_account| {
				let is_new = maybe_account.is_none();
				let mut account = maybe_account.take().unwrap_or_default();
				f(&mut account, is_new).map(move |result| {
					let maybe_endowed = if is_new { Some(account.free) } else { None };
					let (maybe_account_after, maybe_dust) = Self::post_mutation(account);
					*maybe_account = maybe_account_after;
					(maybe_endowed, maybe_dust, result)
				})
			})?;
		if let Some(endowed) = maybe_endowed {
			Self::deposit_event(
				ext,
				Event::Endowed { account: who.clone(), free_balance: endowed },
			);
		}
		Ok((result, maybe_dust))
	}

	/// Move `value` from the free balance of `transactor` to the free balance of `dest`.
	///
	/// Both accounts are checked before either is written, so a failing transfer leaves the
	/// storage untouched.
	fn do_transfer(
		ext: &mut dyn Externalities,
		transactor: &T::AccountId,
		dest: &T::AccountId,
		value: Balance,
		existence_requirement: ExistenceRequirement,
	) -> DispatchResult {
		if value.is_zero() || transactor == dest {
			return Ok(())
		}

		let existential_deposit = T::ExistentialDeposit::get();
		let mut from_account = Self::account(&*ext, transactor);
		let mut to_account = Self::account(&*ext, dest);

		from_account.free =
			from_account.free.checked_sub(value).ok_or(Error::<T>::InsufficientBalance)?;

		// NOTE: total stake being stored in the same type means that this could never overflow
		// but better to be safe than sorry.
		to_account.free = to_account.free.checked_add(value).ok_or(ArithmeticError::Overflow)?;
		ensure!(to_account.total() >= existential_deposit, Error::<T>::ExistentialDeposit);

		Self::ensure_can_withdraw_from(&from_account, value, Reasons::All, from_account.free)?;

		// NOTE: We assume that we're not going to kill the account when the provider can't be
		// dropped.
		let allow_death = existence_requirement == ExistenceRequirement::AllowDeath &&
			stf_system::Pallet::<T>::can_dec_provider(&*ext, transactor);
		ensure!(
			allow_death || from_account.total() >= existential_deposit,
			Error::<T>::KeepAlive
		);

		let ((), from_dust) = Self::try_mutate_account_with_dust(
			ext,
			transactor,
			|account, _| -> DispatchResult {
				*account = from_account;
				Ok(())
			},
		)?;
		let ((), to_dust) =
			Self::try_mutate_account_with_dust(ext, dest, |account, _| -> DispatchResult {
				*account = to_account;
				Ok(())
			})?;

		if let Some(dust) = from_dust {
			Self::handle_dust(ext, transactor, dust);
		}
		if let Some(dust) = to_dust {
			Self::handle_dust(ext, dest, dust);
		}

		// Emit transfer event.
		Self::deposit_event(
			ext,
			Event::Transfer { from: transactor.clone(), to: dest.clone(), amount: value },
		);

		log::trace!(target: LOG_TARGET, "Transferred {} from {:?} to {:?}", value, transactor, dest);
		Ok(())
	}

	/// Move `value` from the reserved balance of `who` back to its free balance.
	///
	/// Returns the amount that could not be unreserved.
	pub fn unreserve(ext: &mut dyn Externalities, who: &T::AccountId, value: Balance) -> Balance {
		if value.is_zero() {
			return Zero::zero()
		}
		if Self::account(&*ext, who).total().is_zero() {
			return value
		}

		let actual = match Self::mutate_account(ext, who, |account| {
			let actual = account.reserved.min(value);
			account.reserved -= actual;
			// defensive only: this can never fail since total issuance which is at least
			// free+reserved fits into the same data type.
			account.free = account.free.saturating_add(actual);
			actual
		}) {
			Ok(x) => x,
			Err(_) => {
				// This should never happen since we don't alter the total amount in the account.
				// If it ever does, then we should fail gracefully though, indicating that nothing
				// could be done.
				return value
			},
		};

		Self::deposit_event(ext, Event::Unreserved { who: who.clone(), amount: actual });
		value - actual
	}

	fn deposit_event(ext: &mut dyn Externalities, event: Event<T>) {
		stf_system::Pallet::<T>::deposit_event(ext, <T as Config>::RuntimeEvent::from(event));
	}
}

impl<T: Config> Currency<T::AccountId> for Pallet<T> {
	fn total_balance(ext: &dyn Externalities, who: &T::AccountId) -> Balance {
		Self::account(ext, who).total()
	}

	fn free_balance(ext: &dyn Externalities, who: &T::AccountId) -> Balance {
		Self::account(ext, who).free
	}

	fn total_issuance(ext: &dyn Externalities) -> Balance {
		TotalIssuance::get(ext)
	}

	fn minimum_balance() -> Balance {
		T::ExistentialDeposit::get()
	}

	fn ensure_can_withdraw(
		ext: &dyn Externalities,
		who: &T::AccountId,
		amount: Balance,
		reasons: WithdrawReasons,
		new_balance: Balance,
	) -> DispatchResult {
		Self::ensure_can_withdraw_from(&Self::account(ext, who), amount, reasons.into(), new_balance)
	}

	fn transfer(
		ext: &mut dyn Externalities,
		transactor: &T::AccountId,
		dest: &T::AccountId,
		value: Balance,
		existence_requirement: ExistenceRequirement,
	) -> DispatchResult {
		Self::do_transfer(ext, transactor, dest, value, existence_requirement)
	}

	fn withdraw(
		ext: &mut dyn Externalities,
		who: &T::AccountId,
		value: Balance,
		reasons: WithdrawReasons,
		liveness: ExistenceRequirement,
	) -> Result<Balance, DispatchError> {
		if value.is_zero() {
			return Ok(Zero::zero())
		}
		let existential_deposit = T::ExistentialDeposit::get();

		Self::try_mutate_account(ext, who, |account, _| -> DispatchResult {
			let new_free_account =
				account.free.checked_sub(value).ok_or(Error::<T>::InsufficientBalance)?;

			// bail if we need to keep the account alive and this would kill it.
			let would_be_dead = new_free_account.saturating_add(account.reserved) < existential_deposit;
			let would_kill = would_be_dead && account.total() >= existential_deposit;
			ensure!(
				liveness == ExistenceRequirement::AllowDeath || !would_kill,
				Error::<T>::KeepAlive
			);

			Self::ensure_can_withdraw_from(account, value, reasons.into(), new_free_account)?;

			account.free = new_free_account;
			Ok(())
		})?;

		TotalIssuance::mutate(ext, |issued| *issued = issued.saturating_sub(value));
		Self::deposit_event(ext, Event::Withdraw { who: who.clone(), amount: value });
		Ok(value)
	}

	fn deposit_into_existing(
		ext: &mut dyn Externalities,
		who: &T::AccountId,
		value: Balance,
	) -> Result<Balance, DispatchError> {
		if value.is_zero() {
			return Ok(Zero::zero())
		}

		Self::try_mutate_account(ext, who, |account, is_new| -> DispatchResult {
			ensure!(!is_new, Error::<T>::DeadAccount);
			account.free = account.free.checked_add(value).ok_or(ArithmeticError::Overflow)?;
			Ok(())
		})?;

		TotalIssuance::mutate(ext, |issued| *issued = issued.saturating_add(value));
		Self::deposit_event(ext, Event::Deposit { who: who.clone(), amount: value });
		Ok(value)
	}

	fn deposit_creating(ext: &mut dyn Externalities, who: &T::AccountId, value: Balance) -> Balance {
		if value.is_zero() {
			return Zero::zero()
		}

		let existential_deposit = T::ExistentialDeposit::get();
		let deposited = Self::try_mutate_account(
			ext,
			who,
			|account, is_new| -> Result<Balance, DispatchError> {
				ensure!(value >= existential_deposit || !is_new, Error::<T>::ExistentialDeposit);

				// defensive only: overflow should never happen, however in case it does, then this
				// operation is a no-op.
				account.free = match account.free.checked_add(value) {
					Some(x) => x,
					None => return Ok(Zero::zero()),
				};
				Ok(value)
			},
		)
		.unwrap_or_else(|_| Zero::zero());

		if !deposited.is_zero() {
			TotalIssuance::mutate(ext, |issued| *issued = issued.saturating_add(deposited));
			Self::deposit_event(ext, Event::Deposit { who: who.clone(), amount: deposited });
		}
		deposited
	}
}
