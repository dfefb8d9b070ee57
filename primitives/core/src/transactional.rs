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

//! Nested storage layers.
//!
//! The current nesting level is kept under an unhashed storage key so that it travels with
//! the externalities rather than with the process. The key is only ever written outside the
//! layer it counts, so a rollback never loses track of the level.

use codec::{Decode, Encode};

use crate::{DispatchError, Externalities, TransactionalError};

/// The key that holds the current number of active layers.
pub const TRANSACTION_LEVEL_KEY: &[u8] = b":transaction_level:";

/// The maximum number of nested layers.
pub const TRANSACTIONAL_LIMIT: u32 = 255;

/// Describes on what should happen with a storage transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionOutcome<R> {
	/// Commit the transaction.
	Commit(R),
	/// Rollback the transaction.
	Rollback(R),
}

impl<R> TransactionOutcome<R> {
	/// Convert into the inner type.
	pub fn into_inner(self) -> R {
		match self {
			Self::Commit(r) => r,
			Self::Rollback(r) => r,
		}
	}
}

/// The number of currently active layers.
pub fn get_transaction_level(ext: &dyn Externalities) -> u32 {
	ext.storage(TRANSACTION_LEVEL_KEY)
		.and_then(|raw| u32::decode(&mut &raw[..]).ok())
		.unwrap_or(0)
}

fn set_transaction_level(ext: &mut dyn Externalities, level: u32) {
	if level == 0 {
		ext.clear_storage(TRANSACTION_LEVEL_KEY);
	} else {
		ext.set_storage(TRANSACTION_LEVEL_KEY.to_vec(), level.encode());
	}
}

/// Whether the caller runs inside at least one storage layer.
pub fn is_transactional(ext: &dyn Externalities) -> bool {
	get_transaction_level(ext) > 0
}

/// Execute the supplied function in a new storage transaction.
///
/// All changes to storage performed by the supplied function are discarded if the returned
/// outcome is `TransactionOutcome::Rollback`.
///
/// Transactions can be nested up to [`TRANSACTIONAL_LIMIT`] times; beyond that the function
/// is not executed and `TransactionalError::LimitReached` is returned.
pub fn with_transaction<T, E, F>(ext: &mut dyn Externalities, f: F) -> Result<T, E>
where
	E: From<DispatchError>,
	F: FnOnce(&mut dyn Externalities) -> TransactionOutcome<Result<T, E>>,
{
	let level = get_transaction_level(ext);
	if level >= TRANSACTIONAL_LIMIT {
		return Err(DispatchError::from(TransactionalError::LimitReached).into())
	}
	set_transaction_level(ext, level + 1);

	ext.storage_start_transaction();
	let outcome = f(ext);
	let closed = match outcome {
		TransactionOutcome::Commit(_) => ext.storage_commit_transaction(),
		TransactionOutcome::Rollback(_) => ext.storage_rollback_transaction(),
	};
	set_transaction_level(ext, level);

	if closed.is_err() {
		log::error!(
			target: "runtime::storage",
			"storage layer at level {} was closed by someone else",
			level + 1,
		);
		return Err(DispatchError::from(TransactionalError::NoLayer).into())
	}

	outcome.into_inner()
}

/// Execute the supplied function, adding a new storage layer.
///
/// This is the same as [`with_transaction`], but assumes that any function returning an `Err`
/// should rollback, and any function returning `Ok` should commit.
pub fn with_storage_layer<T, E, F>(ext: &mut dyn Externalities, f: F) -> Result<T, E>
where
	E: From<DispatchError>,
	F: FnOnce(&mut dyn Externalities) -> Result<T, E>,
{
	with_transaction(ext, |ext| {
		let r = f(ext);
		if r.is_ok() {
			TransactionOutcome::Commit(r)
		} else {
			TransactionOutcome::Rollback(r)
		}
	})
}
