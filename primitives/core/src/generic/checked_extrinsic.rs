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

//! Generic implementation of an extrinsic that has passed the verification
//! stage.

use crate::{
	traits::{self, Dispatchable, GetDispatchInfo, SignedExtension, ValidateUnsigned},
	transaction_validity::{TransactionSource, TransactionValidity},
	transactional::with_storage_layer,
	ApplyExtrinsicResultWithInfo, DispatchInfo, Externalities,
};

/// Definition of something that the external world might want to say; its
/// existence implies that it has been checked and is good, particularly with
/// regards to the signature.
///
/// This is typically passed into [`traits::Applyable::apply`], which should execute
/// [`CheckedExtrinsic::function`], alongside all other bits and bobs.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct CheckedExtrinsic<AccountId, Call, Extra> {
	/// Who this purports to be from and the number of extrinsics have come before
	/// from the same signer, if anyone (note this is not a signature).
	pub signed: Option<(AccountId, Extra)>,

	/// The function that should be called.
	pub function: Call,
}

impl<AccountId, Call: GetDispatchInfo, Extra> GetDispatchInfo
	for CheckedExtrinsic<AccountId, Call, Extra>
{
	fn get_dispatch_info(&self) -> DispatchInfo {
		self.function.get_dispatch_info()
	}
}

impl<AccountId, Call, Extra, RuntimeOrigin> traits::Applyable
	for CheckedExtrinsic<AccountId, Call, Extra>
where
	AccountId: Clone,
	Call: Dispatchable<RuntimeOrigin = RuntimeOrigin>,
	Extra: SignedExtension<AccountId = AccountId, Call = Call>,
	RuntimeOrigin: From<Option<AccountId>>,
{
	type Call = Call;

	fn validate<U: ValidateUnsigned<Call = Self::Call>>(
		&self,
		ext: &dyn Externalities,
		source: TransactionSource,
		info: &DispatchInfo,
		len: usize,
	) -> TransactionValidity {
		if let Some((ref id, ref extra)) = self.signed {
			extra.validate(ext, id, &self.function, info, len)
		} else {
			let valid = Extra::validate_unsigned(ext, &self.function, info, len)?;
			let unsigned_validation = U::validate_unsigned(ext, source, &self.function)?;
			Ok(valid.combine_with(unsigned_validation))
		}
	}

	fn apply<U: ValidateUnsigned<Call = Self::Call>>(
		self,
		ext: &mut dyn Externalities,
		info: &DispatchInfo,
		len: usize,
	) -> ApplyExtrinsicResultWithInfo {
		let (maybe_who, maybe_pre) = if let Some((id, extra)) = self.signed {
			let pre = extra.pre_dispatch(ext, &id, &self.function, info, len)?;
			(Some(id), Some(pre))
		} else {
			// Do any inherent checks.
			Extra::pre_dispatch_unsigned(ext, &self.function, info, len)?;
			U::pre_dispatch(&*ext, &self.function)?;
			(None, None)
		};

		let function = self.function;
		let origin = RuntimeOrigin::from(maybe_who);
		let res = with_storage_layer(ext, |ext| function.dispatch(ext, origin));

		let post_info = match res {
			Ok(info) => info,
			Err(err) => err.post_info,
		};
		Extra::post_dispatch(
			ext,
			maybe_pre,
			info,
			&post_info,
			len,
			&res.map(|_| ()).map_err(|e| e.error),
		)?;
		Ok(res)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		testing::TestExt,
		traits::Applyable,
		transaction_validity::{InvalidTransaction, TransactionValidityError, ValidTransaction},
		DispatchError, DispatchResultWithPostInfo, PostDispatchInfo, RawOrigin, Weight,
	};
	use codec::{Decode, Encode};

	#[derive(Debug, Clone, PartialEq, Eq)]
	enum Call {
		Write(u8),
		WriteThenFail(u8),
	}

	impl Dispatchable for Call {
		type RuntimeOrigin = RawOrigin<u64>;

		fn dispatch(
			self,
			ext: &mut dyn Externalities,
			origin: Self::RuntimeOrigin,
		) -> DispatchResultWithPostInfo {
			let tag = match origin {
				RawOrigin::Signed(who) => who as u8,
				_ => 0,
			};
			match self {
				Call::Write(v) => {
					ext.set_storage(b"value".to_vec(), vec![v, tag]);
					Ok(Some(Weight::from_parts(3, 0)).into())
				},
				Call::WriteThenFail(v) => {
					ext.set_storage(b"value".to_vec(), vec![v, tag]);
					Err(DispatchError::Other("boom").into())
				},
			}
		}
	}

	/// Records every hook invocation in storage under `log`.
	#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
	struct Recorder;

	fn append(ext: &mut dyn Externalities, entry: &str) {
		let mut log = ext.storage(b"log").unwrap_or_default();
		log.extend_from_slice(entry.as_bytes());
		log.push(b';');
		ext.set_storage(b"log".to_vec(), log);
	}

	impl SignedExtension for Recorder {
		const IDENTIFIER: &'static str = "Recorder";
		type AccountId = u64;
		type Call = Call;
		type AdditionalSigned = ();
		type Pre = u64;

		fn additional_signed(
			&self,
			_: &dyn Externalities,
		) -> Result<(), TransactionValidityError> {
			Ok(())
		}

		fn validate(
			&self,
			_: &dyn Externalities,
			who: &u64,
			_: &Call,
			_: &DispatchInfo,
			_: usize,
		) -> TransactionValidity {
			Ok(ValidTransaction { priority: *who, ..Default::default() })
		}

		fn pre_dispatch(
			self,
			ext: &mut dyn Externalities,
			who: &u64,
			_: &Call,
			_: &DispatchInfo,
			_: usize,
		) -> Result<u64, TransactionValidityError> {
			append(ext, "pre");
			Ok(*who)
		}

		fn validate_unsigned(
			_: &dyn Externalities,
			_: &Call,
			_: &DispatchInfo,
			_: usize,
		) -> TransactionValidity {
			Ok(ValidTransaction { priority: 1, ..Default::default() })
		}

		fn pre_dispatch_unsigned(
			ext: &mut dyn Externalities,
			_: &Call,
			_: &DispatchInfo,
			_: usize,
		) -> Result<(), TransactionValidityError> {
			append(ext, "pre_unsigned");
			Ok(())
		}

		fn post_dispatch(
			ext: &mut dyn Externalities,
			pre: Option<u64>,
			_: &DispatchInfo,
			post_info: &PostDispatchInfo,
			_: usize,
			result: &crate::DispatchResult,
		) -> Result<(), TransactionValidityError> {
			let entry = format!(
				"post({:?},{:?},{})",
				pre,
				post_info.actual_weight.map(|w| w.ref_time()),
				result.is_ok()
			);
			append(ext, &entry);
			Ok(())
		}
	}

	struct Unsigned;

	impl ValidateUnsigned for Unsigned {
		type Call = Call;

		fn validate_unsigned(
			_: &dyn Externalities,
			_: TransactionSource,
			call: &Call,
		) -> TransactionValidity {
			match call {
				Call::Write(_) => Ok(ValidTransaction { priority: 10, ..Default::default() }),
				Call::WriteThenFail(_) => InvalidTransaction::Call.into(),
			}
		}
	}

	fn info() -> DispatchInfo {
		DispatchInfo { weight: Weight::from_parts(10, 0), ..Default::default() }
	}

	#[test]
	fn signed_apply_runs_pre_and_post_dispatch() {
		let mut ext = TestExt::default();
		let xt = CheckedExtrinsic { signed: Some((7u64, Recorder)), function: Call::Write(1) };

		let res = xt.apply::<Unsigned>(&mut ext, &info(), 0).unwrap();

		assert_eq!(res.unwrap().actual_weight, Some(Weight::from_parts(3, 0)));
		assert_eq!(ext.storage(b"value"), Some(vec![1, 7]));
		assert_eq!(ext.storage(b"log"), Some(b"pre;post(Some(7),Some(3),true);".to_vec()));
	}

	#[test]
	fn failed_dispatch_is_rolled_back_but_bookkeeping_is_kept() {
		let mut ext = TestExt::default();
		let xt =
			CheckedExtrinsic { signed: Some((7u64, Recorder)), function: Call::WriteThenFail(1) };

		let res = xt.apply::<Unsigned>(&mut ext, &info(), 0).unwrap();

		assert_eq!(res.unwrap_err().error, DispatchError::Other("boom"));
		assert_eq!(ext.storage(b"value"), None);
		assert_eq!(ext.storage(b"log"), Some(b"pre;post(Some(7),None,false);".to_vec()));
	}

	#[test]
	fn unsigned_apply_consults_the_unsigned_validator() {
		let mut ext = TestExt::default();
		let ok = CheckedExtrinsic::<u64, Call, Recorder> { signed: None, function: Call::Write(2) };
		assert!(ok.apply::<Unsigned>(&mut ext, &info(), 0).unwrap().is_ok());
		assert_eq!(ext.storage(b"value"), Some(vec![2, 0]));
		assert_eq!(ext.storage(b"log"), Some(b"pre_unsigned;post(None,Some(3),true);".to_vec()));

		let bad =
			CheckedExtrinsic::<u64, Call, Recorder> { signed: None, function: Call::WriteThenFail(3) };
		assert_eq!(
			bad.apply::<Unsigned>(&mut ext, &info(), 0),
			Err(InvalidTransaction::Call.into())
		);
		assert_eq!(ext.storage(b"value"), Some(vec![2, 0]));
	}

	#[test]
	fn validate_combines_extension_and_unsigned_validity() {
		let ext = TestExt::default();

		let signed = CheckedExtrinsic { signed: Some((5u64, Recorder)), function: Call::Write(1) };
		assert_eq!(
			signed.validate::<Unsigned>(&ext, TransactionSource::External, &info(), 0).unwrap().priority,
			5
		);

		let unsigned = CheckedExtrinsic::<u64, Call, Recorder> { signed: None, function: Call::Write(1) };
		assert_eq!(
			unsigned.validate::<Unsigned>(&ext, TransactionSource::External, &info(), 0).unwrap().priority,
			11
		);
	}
}
