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

//! Runtime API entry points.
//!
//! Every entry point takes the SCALE encoded arguments of the call and returns the SCALE encoded
//! result. An input that does not decode, and any other [`Abort`], ends the call without output.
//! [`dispatch`] selects the entry point by its exported name, e.g. `Core_execute_block`.

use std::borrow::Cow;

use codec::{Decode, Encode};
use stf_primitives::{
	inherent::InherentData,
	transaction_validity::TransactionSource,
	version::{ApiId, ApisVec},
	Abort, AccountId, Externalities, Hash,
};
use stf_state_machine::CodeExecutor;

use crate::{
	Aura, Block, Executive, Grandpa, Header, SessionKeys, System, TransactionPayment,
	UncheckedExtrinsic, LOG_TARGET, VERSION,
};

/// The id of the `Core` API.
pub const CORE_API_ID: ApiId = [0xdf, 0x6a, 0xcb, 0x68, 0x99, 0x07, 0x60, 0x9b];
/// The id of the `BlockBuilder` API.
pub const BLOCK_BUILDER_API_ID: ApiId = [0x40, 0xfe, 0x3a, 0xd4, 0x01, 0xf8, 0x95, 0x9a];
/// The id of the `TaggedTransactionQueue` API.
pub const TAGGED_TRANSACTION_QUEUE_API_ID: ApiId =
	[0xd2, 0xbc, 0x98, 0x97, 0xee, 0xd0, 0x8f, 0x15];
/// The id of the `OffchainWorkerApi` API.
pub const OFFCHAIN_WORKER_API_ID: ApiId = [0xf7, 0x8b, 0x27, 0x8b, 0xe5, 0x3f, 0x45, 0x4c];
/// The id of the `AccountNonceApi` API.
pub const ACCOUNT_NONCE_API_ID: ApiId = [0xbc, 0x9d, 0x89, 0x90, 0x4f, 0x5b, 0x92, 0x3f];
/// The id of the `GrandpaApi` API.
pub const GRANDPA_API_ID: ApiId = [0xed, 0x99, 0xc5, 0xac, 0xb2, 0x5e, 0xed, 0xf5];
/// The id of the `TransactionPaymentApi` API.
pub const TRANSACTION_PAYMENT_API_ID: ApiId = [0x37, 0xc8, 0xbb, 0x13, 0x50, 0xa9, 0xa2, 0xa8];
/// The id of the `AuraApi` API.
pub const AURA_API_ID: ApiId = [0xdd, 0x71, 0x8d, 0x5c, 0xc5, 0x32, 0x62, 0xd4];
/// The id of the `SessionKeys` API.
pub const SESSION_KEYS_API_ID: ApiId = [0xab, 0x3c, 0x05, 0x72, 0x29, 0x1f, 0xeb, 0x8b];

/// The APIs implemented by this runtime, with their versions.
pub const RUNTIME_API_VERSIONS: ApisVec = Cow::Borrowed(&[
	(CORE_API_ID, 4),
	(BLOCK_BUILDER_API_ID, 6),
	(TAGGED_TRANSACTION_QUEUE_API_ID, 3),
	(OFFCHAIN_WORKER_API_ID, 2),
	(ACCOUNT_NONCE_API_ID, 1),
	(GRANDPA_API_ID, 3),
	(TRANSACTION_PAYMENT_API_ID, 3),
	(AURA_API_ID, 1),
	(SESSION_KEYS_API_ID, 1),
]);

/// The signature shared by all entry points.
pub type EntryPoint = fn(&mut dyn Externalities, &[u8]) -> Result<Vec<u8>, Abort>;

/// All entry points of the runtime by exported name.
pub const ENTRY_POINTS: &[(&str, EntryPoint)] = &[
	("Core_version", core_version),
	("Core_execute_block", core_execute_block),
	("Core_initialize_block", core_initialize_block),
	("BlockBuilder_apply_extrinsic", block_builder_apply_extrinsic),
	("BlockBuilder_finalize_block", block_builder_finalize_block),
	("BlockBuilder_inherent_extrinsics", block_builder_inherent_extrinsics),
	("BlockBuilder_check_inherents", block_builder_check_inherents),
	("TaggedTransactionQueue_validate_transaction", tagged_transaction_queue_validate_transaction),
	("OffchainWorkerApi_offchain_worker", offchain_worker_api_offchain_worker),
	("AccountNonceApi_account_nonce", account_nonce_api_account_nonce),
	("GrandpaApi_grandpa_authorities", grandpa_api_grandpa_authorities),
	("TransactionPaymentApi_query_info", transaction_payment_api_query_info),
	("TransactionPaymentApi_query_fee_details", transaction_payment_api_query_fee_details),
	("AuraApi_slot_duration", aura_api_slot_duration),
	("AuraApi_authorities", aura_api_authorities),
	("SessionKeys_generate_session_keys", session_keys_generate_session_keys),
	("SessionKeys_decode_session_keys", session_keys_decode_session_keys),
];

/// Call the entry point exported as `method`.
pub fn dispatch(ext: &mut dyn Externalities, method: &str, data: &[u8]) -> Result<Vec<u8>, Abort> {
	let (_, entry_point) = ENTRY_POINTS
		.iter()
		.find(|(name, _)| *name == method)
		.ok_or_else(|| Abort::UnknownMethod(method.into()))?;
	entry_point(ext, data)
}

/// Runs the runtime API of this runtime on behalf of a host.
#[derive(Clone, Copy, Default, Debug)]
pub struct RuntimeExecutor;

impl CodeExecutor for RuntimeExecutor {
	type Error = Abort;

	fn call(
		&self,
		ext: &mut dyn Externalities,
		method: &str,
		data: &[u8],
	) -> Result<Vec<u8>, Abort> {
		dispatch(ext, method, data).map_err(|e| {
			log::error!(target: LOG_TARGET, "{} aborted: {}", method, e);
			e
		})
	}
}

fn decode_input<T: Decode>(method: &'static str, mut data: &[u8]) -> Result<T, Abort> {
	T::decode(&mut data).map_err(|e| Abort::bad_input(method, e))
}

/// Run `f` in a storage transaction whose changes are kept only when `keep` holds for the
/// result.
fn in_storage_transaction<R>(
	ext: &mut dyn Externalities,
	f: impl FnOnce(&mut dyn Externalities) -> R,
	keep: impl FnOnce(&R) -> bool,
) -> Result<R, Abort> {
	ext.storage_start_transaction();
	let result = f(&mut *ext);
	let closed = if keep(&result) {
		ext.storage_commit_transaction()
	} else {
		ext.storage_rollback_transaction()
	};
	closed.map_err(|_| Abort::Corruption("storage transaction closed by the callee"))?;
	Ok(result)
}

/// Returns the version of the runtime.
pub fn core_version(_: &mut dyn Externalities, _: &[u8]) -> Result<Vec<u8>, Abort> {
	Ok(VERSION.encode())
}

/// Execute the given block.
pub fn core_execute_block(ext: &mut dyn Externalities, data: &[u8]) -> Result<Vec<u8>, Abort> {
	let block: Block = decode_input("Core_execute_block", data)?;
	Executive::execute_block(ext, block).map(|()| Vec::new())
}

/// Initialize a block with the given header.
pub fn core_initialize_block(ext: &mut dyn Externalities, data: &[u8]) -> Result<Vec<u8>, Abort> {
	let header: Header = decode_input("Core_initialize_block", data)?;
	Executive::initialize_block(ext, &header).map(|()| Vec::new())
}

/// Apply the given extrinsic.
///
/// Returns an inclusion outcome which specifies if this extrinsic is included in this block or
/// not. The changes of an extrinsic that is not included are reverted.
pub fn block_builder_apply_extrinsic(
	ext: &mut dyn Externalities,
	data: &[u8],
) -> Result<Vec<u8>, Abort> {
	let uxt: UncheckedExtrinsic = decode_input("BlockBuilder_apply_extrinsic", data)?;
	if log::log_enabled!(target: LOG_TARGET, log::Level::Debug) {
		let (module, call) = uxt.function.names();
		log::debug!(target: LOG_TARGET, "apply_extrinsic {}::{}", module, call);
	}

	let result =
		in_storage_transaction(ext, |ext| Executive::apply_extrinsic(ext, uxt), |r| r.is_ok())?;
	Ok(result.encode())
}

/// Finish the current block.
pub fn block_builder_finalize_block(
	ext: &mut dyn Externalities,
	_: &[u8],
) -> Result<Vec<u8>, Abort> {
	Executive::finalize_block(ext).map(|header| header.encode())
}

/// Generate inherent extrinsics. The inherent data will vary from chain to chain.
pub fn block_builder_inherent_extrinsics(
	ext: &mut dyn Externalities,
	data: &[u8],
) -> Result<Vec<u8>, Abort> {
	let data: InherentData = decode_input("BlockBuilder_inherent_extrinsics", data)?;
	Ok(Executive::create_inherents(&*ext, &data)?.encode())
}

/// Check that the inherents are valid. The inherent data will vary from chain to chain.
pub fn block_builder_check_inherents(
	ext: &mut dyn Externalities,
	data: &[u8],
) -> Result<Vec<u8>, Abort> {
	let (block, data): (Block, InherentData) =
		decode_input("BlockBuilder_check_inherents", data)?;
	Ok(Executive::check_inherents(&*ext, &block, &data)?.encode())
}

/// Validate the transaction.
///
/// This method is invoked by the transaction pool to learn details about given transaction.
/// The storage changes made while validating are always reverted.
pub fn tagged_transaction_queue_validate_transaction(
	ext: &mut dyn Externalities,
	data: &[u8],
) -> Result<Vec<u8>, Abort> {
	let (source, uxt, block_hash): (TransactionSource, UncheckedExtrinsic, Hash) =
		decode_input("TaggedTransactionQueue_validate_transaction", data)?;

	let validity = in_storage_transaction(
		ext,
		|ext| Executive::validate_transaction(ext, source, uxt, block_hash),
		|_| false,
	)?;
	Ok(validity.encode())
}

/// Starts the off-chain task for the given block header.
pub fn offchain_worker_api_offchain_worker(
	ext: &mut dyn Externalities,
	data: &[u8],
) -> Result<Vec<u8>, Abort> {
	let header: Header = decode_input("OffchainWorkerApi_offchain_worker", data)?;
	Executive::offchain_worker(ext, &header);
	Ok(Vec::new())
}

/// Get the current nonce of an account.
pub fn account_nonce_api_account_nonce(
	ext: &mut dyn Externalities,
	data: &[u8],
) -> Result<Vec<u8>, Abort> {
	let account: AccountId = decode_input("AccountNonceApi_account_nonce", data)?;
	Ok(System::account_nonce(&*ext, &account).encode())
}

/// Get the current GRANDPA authorities and weights.
pub fn grandpa_api_grandpa_authorities(
	ext: &mut dyn Externalities,
	_: &[u8],
) -> Result<Vec<u8>, Abort> {
	Ok(Grandpa::grandpa_authorities(&*ext).encode())
}

/// Query the weight, class and partial fee of an extrinsic of the given encoded length.
pub fn transaction_payment_api_query_info(
	ext: &mut dyn Externalities,
	data: &[u8],
) -> Result<Vec<u8>, Abort> {
	let (uxt, len): (UncheckedExtrinsic, u32) =
		decode_input("TransactionPaymentApi_query_info", data)?;
	Ok(TransactionPayment::query_info(&*ext, uxt, len).encode())
}

/// Query the fee details of an extrinsic of the given encoded length.
pub fn transaction_payment_api_query_fee_details(
	ext: &mut dyn Externalities,
	data: &[u8],
) -> Result<Vec<u8>, Abort> {
	let (uxt, len): (UncheckedExtrinsic, u32) =
		decode_input("TransactionPaymentApi_query_fee_details", data)?;
	Ok(TransactionPayment::query_fee_details(&*ext, uxt, len).encode())
}

/// The slot duration of Aura, in milliseconds.
pub fn aura_api_slot_duration(_: &mut dyn Externalities, _: &[u8]) -> Result<Vec<u8>, Abort> {
	Ok(Aura::slot_duration().encode())
}

/// The current Aura authorities.
pub fn aura_api_authorities(ext: &mut dyn Externalities, _: &[u8]) -> Result<Vec<u8>, Abort> {
	Ok(Aura::authorities(&*ext).encode())
}

/// Generate a set of session keys with an optional seed and return their encoding.
pub fn session_keys_generate_session_keys(
	ext: &mut dyn Externalities,
	data: &[u8],
) -> Result<Vec<u8>, Abort> {
	let seed: Option<Vec<u8>> = decode_input("SessionKeys_generate_session_keys", data)?;
	Ok(SessionKeys::generate(&*ext, seed)?.encode())
}

/// Decode the given encoded session keys into their raw public keys and key types.
pub fn session_keys_decode_session_keys(
	_: &mut dyn Externalities,
	data: &[u8],
) -> Result<Vec<u8>, Abort> {
	let encoded: Vec<u8> = decode_input("SessionKeys_decode_session_keys", data)?;
	Ok(SessionKeys::decode_into_raw_public_keys(&encoded).encode())
}
