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

//! Support code for the runtime.
//!
//! ## Note on Tuple Traits
//!
//! Many of the traits defined in [`traits`] have auto-implementations on tuples as well. Usually,
//! the tuple is a function of number of modules in the runtime. By default, the traits are
//! implemented for tuples of up to 30 elements, and every member is invoked in declaration order.

#![warn(missing_docs)]

#[doc(hidden)]
pub mod __private {
	pub use codec;
	pub use log;
	pub use stf_primitives::{DispatchError, Externalities, ModuleError, StateVersion};
}

#[macro_use]
mod macros;
pub mod dispatch;
#[macro_use]
pub mod error;
pub mod inherent;
pub mod storage;
pub mod traits;

pub use self::{
	dispatch::{
		Callable, GetCallIndex, GetCallName, IsSubType, Parameter, UnfilteredDispatchable,
	},
	error::Never,
	storage::{
		Blake2_128Concat, Identity, OptionQuery, StorageHasher, StorageInstance, StorageMap,
		StorageValue, Twox64Concat, ValueQuery,
	},
};
pub use stf_primitives::{
	transactional::{with_storage_layer, with_transaction, TransactionOutcome},
	Abort, DispatchError, DispatchResult, DispatchResultWithPostInfo, Weight,
};

/// The log target of storage accesses done by this crate.
pub const LOG_TARGET: &str = "runtime::storage";

/// A prelude for writing runtime modules.
pub mod pallet_prelude {
	pub use crate::{
		decl_error,
		dispatch::{
			ClassifyDispatch, DispatchClass, DispatchInfo, GetDispatchInfo, Parameter, Pays,
			PaysFee, PostDispatchInfo, WeighData,
		},
		ensure, fail,
		inherent::{InherentData, InherentIdentifier, IsFatalError, ProvideInherent},
		storage::{
			Blake2_128Concat, Identity, OptionQuery, StorageInstance, StorageMap, StorageValue,
			Twox64Concat, ValueQuery,
		},
		storage_prefixes,
		traits::{Get, Hooks, PalletInfoAccess},
		Abort, DispatchError, DispatchResult, DispatchResultWithPostInfo, Weight,
	};
	pub use codec::{Decode, Encode, MaxEncodedLen};
	pub use scale_info::TypeInfo;
	pub use stf_primitives::{
		transaction_validity::{
			InvalidTransaction, TransactionSource, TransactionValidity, TransactionValidityError,
			UnknownTransaction, ValidTransaction,
		},
		BlockNumber, Externalities,
	};
}
