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

//! Smaller traits used in the runtime modules which don't fit anywhere else.

use impl_trait_for_tuples::impl_for_tuples;
use stf_primitives::{DispatchError, Externalities};

/// An abstraction of a value stored within storage, but possibly as part of a larger composite
/// item.
pub trait StoredMap<K, T: Default> {
	/// Get the item, or its default if it doesn't yet exist; we make no distinction between the
	/// two.
	fn get(ext: &dyn Externalities, k: &K) -> T;

	/// Maybe mutate the item only if an `Ok` value is returned from `f`. Do nothing if an `Err` is
	/// returned. It is removed or reset to default value if it has been mutated to `None`.
	fn try_mutate_exists<R, E: From<DispatchError>>(
		ext: &mut dyn Externalities,
		k: &K,
		f: impl FnOnce(&mut Option<T>) -> Result<R, E>,
	) -> Result<R, E>;

	/// Mutate the item, removing or resetting to default value if it has been mutated to `None`.
	///
	/// This is infallible as long as the value does not get destroyed.
	fn mutate_exists<R>(
		ext: &mut dyn Externalities,
		k: &K,
		f: impl FnOnce(&mut Option<T>) -> R,
	) -> Result<R, DispatchError> {
		Self::try_mutate_exists(ext, k, |x| -> Result<R, DispatchError> { Ok(f(x)) })
	}

	/// Mutate the item.
	fn mutate<R>(
		ext: &mut dyn Externalities,
		k: &K,
		f: impl FnOnce(&mut T) -> R,
	) -> Result<R, DispatchError> {
		Self::mutate_exists(ext, k, |maybe_account| match maybe_account {
			Some(ref mut account) => f(account),
			x @ None => {
				let mut account = Default::default();
				let r = f(&mut account);
				*x = Some(account);
				r
			},
		})
	}

	/// Set the item to something new.
	fn insert(ext: &mut dyn Externalities, k: &K, t: T) -> Result<(), DispatchError> {
		Self::mutate(ext, k, |i| *i = t)
	}

	/// Remove the item or otherwise replace it with its default value; we don't care which.
	fn remove(ext: &mut dyn Externalities, k: &K) -> Result<(), DispatchError> {
		Self::mutate_exists(ext, k, |x| *x = None)
	}
}

/// Handler for when a new account has been created.
#[impl_for_tuples(30)]
pub trait OnNewAccount<AccountId> {
	/// A new account `who` has been registered.
	fn on_new_account(ext: &mut dyn Externalities, who: &AccountId);
}

/// The account with the given id was reaped.
#[impl_for_tuples(30)]
pub trait OnKilledAccount<AccountId> {
	/// The account with the given id was reaped.
	fn on_killed_account(ext: &mut dyn Externalities, who: &AccountId);
}

/// A genesis config that can build its initial storage.
pub trait BuildGenesisConfig: Default {
	/// Write the genesis storage of this config.
	fn build(&self, ext: &mut dyn Externalities);
}
