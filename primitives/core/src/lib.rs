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

//! Primitive types shared by every part of the state-transition function.
//!
//! The crate is split the way a runtime consumes it:
//!
//! - [`generic`] holds the wire types: headers, blocks, eras and the extrinsic codec.
//! - [`traits`] holds the seams between the executive and the modules: checking, applying,
//!   dispatching and the signed-extension chain.
//! - [`externalities`] is the host interface every storage, hashing and crypto access goes
//!   through. Nothing in the runtime reaches for global state.
//! - [`Abort`] is the unrecoverable error that ends a whole runtime call.

pub mod abort;
pub mod dispatch;
pub mod externalities;
pub mod generic;
pub mod inherent;
pub mod multi_address;
pub mod signature;
pub mod traits;
pub mod transaction_validity;
pub mod transactional;
pub mod version;
pub mod weights;

#[cfg(test)]
mod testing;

pub use abort::Abort;
pub use dispatch::{
	ArithmeticError, DispatchClass, DispatchError, DispatchErrorWithPostInfo, DispatchInfo,
	DispatchResult, DispatchResultWithPostInfo, ModuleError, Pays, PerDispatchClass,
	PostDispatchInfo, RawOrigin, TokenError, TransactionalError,
};
pub use externalities::{Externalities, KeyTypeId, StateVersion};
pub use multi_address::MultiAddress;
pub use signature::MultiSignature;
pub use weights::{RuntimeDbWeight, Weight};

pub use sp_arithmetic::{FixedPointNumber, FixedU128, Perbill, Permill};
pub use sp_core::{crypto::AccountId32, H256};

use transaction_validity::TransactionValidityError;

/// An index to a block.
pub type BlockNumber = u64;

/// A hash of some data used by the chain.
pub type Hash = H256;

/// Some way of identifying an account on the chain.
pub type AccountId = AccountId32;

/// Index of a transaction in the chain.
pub type Nonce = u32;

/// Balance of an account.
pub type Balance = u128;

/// Milliseconds since the unix epoch.
pub type Moment = u64;

/// The outcome of a dispatched call, as seen by the block author.
pub type DispatchOutcome = Result<(), DispatchError>;

/// The result of applying of an extrinsic.
///
/// This type is typically used in the context of `BlockBuilder` to signal that the extrinsic
/// in question cannot be included.
///
/// A block containing extrinsics that have a negative inclusion outcome is invalid. A negative
/// result can only occur during the block production, where such extrinsics are detected and
/// removed from the block that is being created and the transaction pool.
///
/// Examples of reasons preventing inclusion in a block:
/// - More block weight is required to process the extrinsic than is left in the block being built.
/// - The sender doesn't have enough funds to pay the transaction inclusion fee.
/// - The extrinsic's nonce isn't correct.
pub type ApplyExtrinsicResult = Result<DispatchOutcome, TransactionValidityError>;

/// Same as `ApplyExtrinsicResult` but augmented with the post dispatch information.
pub type ApplyExtrinsicResultWithInfo =
	Result<DispatchResultWithPostInfo, TransactionValidityError>;

/// Consensus engine unique ID.
pub type ConsensusEngineId = [u8; 4];
