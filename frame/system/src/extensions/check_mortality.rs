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

use crate::{BlockHash, Config, Pallet};
use codec::{Decode, Encode};
use core::marker::PhantomData;
use stf_primitives::{
	generic::Era,
	traits::SignedExtension,
	transaction_validity::{
		InvalidTransaction, TransactionValidity, TransactionValidityError, ValidTransaction,
	},
	DispatchInfo, Externalities, Hash,
};

/// Check for transaction mortality.
///
/// The extension adds [`Era`] to every signed extrinsic. It also contributes to the signed data, by
/// including the hash of the block at [`Era::birth`].
///
/// # Transaction Validity
///
/// The extension affects `longevity` of the transaction according to the [`Era`] definition.
#[derive(Encode, Decode, Clone, Eq, PartialEq)]
pub struct CheckMortality<T>(pub Era, PhantomData<T>);

impl<T: Config> CheckMortality<T> {
	/// utility constructor. Used only in client/factory code.
	pub fn from(era: Era) -> Self {
		Self(era, PhantomData)
	}
}

impl<T: Config> core::fmt::Debug for CheckMortality<T> {
	fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
		write!(f, "CheckMortality({:?})", self.0)
	}
}

impl<T: Config> SignedExtension for CheckMortality<T> {
	const IDENTIFIER: &'static str = "CheckMortality";
	type AccountId = T::AccountId;
	type Call = T::RuntimeCall;
	type AdditionalSigned = Hash;
	type Pre = ();

	fn validate(
		&self,
		ext: &dyn Externalities,
		_who: &Self::AccountId,
		_call: &Self::Call,
		_info: &DispatchInfo,
		_len: usize,
	) -> TransactionValidity {
		let current_u64 = <Pallet<T>>::block_number(ext);
		let valid_till = self.0.death(current_u64);
		Ok(ValidTransaction {
			longevity: valid_till.saturating_sub(current_u64),
			..Default::default()
		})
	}

	fn additional_signed(&self, ext: &dyn Externalities) -> Result<Hash, TransactionValidityError> {
		let current_u64 = <Pallet<T>>::block_number(ext);
		let n = self.0.birth(current_u64);
		if !BlockHash::contains_key(ext, n) {
			Err(InvalidTransaction::AncientBirthBlock.into())
		} else {
			Ok(<Pallet<T>>::block_hash(ext, n))
		}
	}

	fn pre_dispatch(
		self,
		ext: &mut dyn Externalities,
		who: &Self::AccountId,
		call: &Self::Call,
		info: &DispatchInfo,
		len: usize,
	) -> Result<Self::Pre, TransactionValidityError> {
		self.validate(&*ext, who, call, info, len).map(|_| ())
	}
}
