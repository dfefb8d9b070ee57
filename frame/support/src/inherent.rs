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

//! Inherent extrinsics: the unsigned calls a block author puts at the front of every block.
//!
//! A module offering an inherent implements [`ProvideInherent`]. The runtime lists those modules
//! as a tuple of [`InherentModule`]s and uses the [`InherentProviders`] implementation of that
//! tuple to create and check the inherents of a block in declaration order.

use std::marker::PhantomData;

use impl_trait_for_tuples::impl_for_tuples;
use stf_primitives::{Abort, Externalities};

pub use stf_primitives::inherent::{
	CheckInherentsResult, Error, InherentData, InherentIdentifier, IsFatalError, MakeFatalError,
};

use crate::dispatch::IsSubType;

const LOG_TARGET: &str = "runtime::inherent";

/// A module that provides or verifies an inherent extrinsic will implement this trait.
///
/// The module may provide an inherent, verify an inherent, or both provide and verify.
///
/// Briefly, inherent extrinsics ("inherents") are extrinsics that are added to a block by the block
/// producer. See [`stf_primitives::inherent`] for the data they are created from.
pub trait ProvideInherent {
	/// The call type of the module.
	type Call;
	/// The error returned by `check_inherent`.
	type Error: codec::Encode + IsFatalError;
	/// The inherent identifier used by this inherent.
	const INHERENT_IDENTIFIER: InherentIdentifier;

	/// Create an inherent out of the given `InherentData`.
	///
	/// NOTE: All checks necessary to ensure that the inherent is correct and that can be done in
	/// the runtime should happen in the returned `Call`.
	/// E.g. if this provides the timestamp, the call will check that the given timestamp is
	/// increasing the old timestamp by more than a minimum and it will also check that the
	/// timestamp hasn't already been set in the current block.
	///
	/// Inherent data the module needs but cannot read is an [`Abort`].
	fn create_inherent(
		ext: &dyn Externalities,
		data: &InherentData,
	) -> Result<Option<Self::Call>, Abort>;

	/// Determines whether this inherent is required in this block.
	///
	/// - `Ok(None)` indicates that this inherent is not required in this block. The default
	/// implementation returns this.
	///
	/// - `Ok(Some(e))` indicates that this inherent is required in this block. Checking the
	/// inherents of a block reports `e` if the inherent is not present.
	///
	/// - `Err(_)` indicates that this function failed and further operations should be aborted.
	fn is_inherent_required(
		_ext: &dyn Externalities,
		_data: &InherentData,
	) -> Result<Option<Self::Error>, Self::Error> {
		Ok(None)
	}

	/// Check whether the given inherent is valid. Checking the inherent is optional and can be
	/// omitted by using the default implementation.
	///
	/// When checking an inherent, the first parameter represents the inherent that is actually
	/// included in the block by its author. Whereas the second parameter represents the inherent
	/// data that the verifying node calculates.
	///
	/// This is intended to allow for checks that cannot be done within the runtime such as, e.g.,
	/// the timestamp.
	///
	/// The inner result is the verdict on the inherent. The outer error aborts the call, e.g. when
	/// the inherent data cannot be read.
	fn check_inherent(
		_ext: &dyn Externalities,
		_call: &Self::Call,
		_data: &InherentData,
	) -> Result<Result<(), Self::Error>, Abort> {
		Ok(Ok(()))
	}

	/// Return whether the call is an inherent call.
	///
	/// NOTE: Signed extrinsics are not inherents, but a signed extrinsic with the given call
	/// variant can be dispatched.
	fn is_inherent(call: &Self::Call) -> bool;
}

/// The inherent logic of every module of a runtime, seen through the runtime call type `Call`.
pub trait InherentProviders<Call> {
	/// Push the inherents created from `data` onto `inherents`.
	fn create_inherents(
		ext: &dyn Externalities,
		data: &InherentData,
		inherents: &mut Vec<Call>,
	) -> Result<(), Abort>;

	/// Whether `call` is an inherent of one of the modules.
	fn is_inherent(call: &Call) -> bool;

	/// Check `call` if it is an inherent, noting any error in `result`.
	///
	/// Returns whether `call` was recognized as an inherent. Nothing is checked once `result`
	/// holds a fatal error.
	fn check_inherent(
		ext: &dyn Externalities,
		call: &Call,
		data: &InherentData,
		result: &mut CheckInherentsResult,
	) -> Result<bool, Abort>;

	/// Note in `result` the required inherents missing from `inherents`.
	fn check_required(
		ext: &dyn Externalities,
		data: &InherentData,
		inherents: &[&Call],
		result: &mut CheckInherentsResult,
	);
}

/// Adapter that exposes the [`ProvideInherent`] implementation of the module `P` as
/// [`InherentProviders`].
pub struct InherentModule<P>(PhantomData<P>);

fn note_error<P: ProvideInherent>(result: &mut CheckInherentsResult, error: &P::Error) {
	if let Err(e) = result.put_error(P::INHERENT_IDENTIFIER, error) {
		log::error!(target: LOG_TARGET, "Failed to note inherent error: {}", e);
	}
}

impl<Call, P> InherentProviders<Call> for InherentModule<P>
where
	P: ProvideInherent,
	Call: IsSubType<P::Call> + From<P::Call>,
{
	fn create_inherents(
		ext: &dyn Externalities,
		data: &InherentData,
		inherents: &mut Vec<Call>,
	) -> Result<(), Abort> {
		if let Some(call) = P::create_inherent(ext, data)? {
			inherents.push(call.into());
		}
		Ok(())
	}

	fn is_inherent(call: &Call) -> bool {
		call.is_sub_type().map_or(false, P::is_inherent)
	}

	fn check_inherent(
		ext: &dyn Externalities,
		call: &Call,
		data: &InherentData,
		result: &mut CheckInherentsResult,
	) -> Result<bool, Abort> {
		let Some(call) = call.is_sub_type().filter(|c| P::is_inherent(*c)) else { return Ok(false) };
		if result.fatal_error() {
			return Ok(true)
		}

		if let Err(e) = P::check_inherent(ext, call, data)? {
			log::debug!(
				target: LOG_TARGET,
				"Inherent {} failed the check",
				String::from_utf8_lossy(&P::INHERENT_IDENTIFIER),
			);
			note_error::<P>(result, &e);
		}
		Ok(true)
	}

	fn check_required(
		ext: &dyn Externalities,
		data: &InherentData,
		inherents: &[&Call],
		result: &mut CheckInherentsResult,
	) {
		if result.fatal_error() {
			return
		}

		let error = match P::is_inherent_required(ext, data) {
			Ok(Some(e)) => {
				if inherents.iter().any(|call| call.is_sub_type().map_or(false, P::is_inherent)) {
					return
				}
				e
			},
			Ok(None) => return,
			Err(e) => e,
		};
		note_error::<P>(result, &error);
	}
}

#[impl_for_tuples(30)]
impl<Call> InherentProviders<Call> for Tuple {
	for_tuples!( where #( Tuple: InherentProviders<Call> )* );

	fn create_inherents(
		ext: &dyn Externalities,
		data: &InherentData,
		inherents: &mut Vec<Call>,
	) -> Result<(), Abort> {
		for_tuples!( #( Tuple::create_inherents(ext, data, inherents)?; )* );
		Ok(())
	}

	fn is_inherent(call: &Call) -> bool {
		for_tuples!( #( if Tuple::is_inherent(call) { return true } )* );
		false
	}

	fn check_inherent(
		ext: &dyn Externalities,
		call: &Call,
		data: &InherentData,
		result: &mut CheckInherentsResult,
	) -> Result<bool, Abort> {
		let mut recognized = false;
		for_tuples!( #( recognized |= Tuple::check_inherent(ext, call, data, result)?; )* );
		Ok(recognized)
	}

	fn check_required(
		ext: &dyn Externalities,
		data: &InherentData,
		inherents: &[&Call],
		result: &mut CheckInherentsResult,
	) {
		for_tuples!( #( Tuple::check_required(ext, data, inherents, result); )* );
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use codec::{Decode, Encode};
	use stf_state_machine::TestExternalities;

	#[derive(Debug, Clone, PartialEq, Eq)]
	enum CallA {
		Set(u32),
		Other,
	}

	#[derive(Debug, Clone, PartialEq, Eq)]
	enum CallB {
		Ping,
	}

	#[derive(Debug, Clone, PartialEq, Eq)]
	enum Call {
		A(CallA),
		B(CallB),
	}

	impl From<CallA> for Call {
		fn from(c: CallA) -> Self {
			Call::A(c)
		}
	}

	impl From<CallB> for Call {
		fn from(c: CallB) -> Self {
			Call::B(c)
		}
	}

	impl IsSubType<CallA> for Call {
		fn is_sub_type(&self) -> Option<&CallA> {
			match self {
				Call::A(c) => Some(c),
				_ => None,
			}
		}
	}

	impl IsSubType<CallB> for Call {
		fn is_sub_type(&self) -> Option<&CallB> {
			match self {
				Call::B(c) => Some(c),
				_ => None,
			}
		}
	}

	#[derive(Encode, Decode, Debug, PartialEq, Eq)]
	enum ErrorA {
		TooBig,
		Missing,
	}

	impl IsFatalError for ErrorA {
		fn is_fatal_error(&self) -> bool {
			matches!(self, ErrorA::Missing)
		}
	}

	struct ModuleA;
	impl ProvideInherent for ModuleA {
		type Call = CallA;
		type Error = ErrorA;
		const INHERENT_IDENTIFIER: InherentIdentifier = *b"testinha";

		fn create_inherent(
			_: &dyn Externalities,
			data: &InherentData,
		) -> Result<Option<CallA>, Abort> {
			data.get_data::<u32>(&Self::INHERENT_IDENTIFIER)
				.map(|v| v.map(CallA::Set))
				.map_err(|_| Abort::MalformedInherentData("testinha"))
		}

		fn is_inherent_required(
			_: &dyn Externalities,
			_: &InherentData,
		) -> Result<Option<ErrorA>, ErrorA> {
			Ok(Some(ErrorA::Missing))
		}

		fn check_inherent(
			_: &dyn Externalities,
			call: &CallA,
			_: &InherentData,
		) -> Result<Result<(), ErrorA>, Abort> {
			Ok(match call {
				CallA::Set(v) if *v > 10 => Err(ErrorA::TooBig),
				_ => Ok(()),
			})
		}

		fn is_inherent(call: &CallA) -> bool {
			matches!(call, CallA::Set(_))
		}
	}

	struct ModuleB;
	impl ProvideInherent for ModuleB {
		type Call = CallB;
		type Error = MakeFatalError<()>;
		const INHERENT_IDENTIFIER: InherentIdentifier = *b"testinhb";

		fn create_inherent(
			_: &dyn Externalities,
			_: &InherentData,
		) -> Result<Option<CallB>, Abort> {
			Ok(Some(CallB::Ping))
		}

		fn is_inherent(_: &CallB) -> bool {
			true
		}
	}

	type Inherents = (InherentModule<ModuleA>, InherentModule<ModuleB>);

	#[test]
	fn create_follows_declaration_order() {
		let mut t = TestExternalities::new_empty();
		let ext = t.ext();
		let mut data = InherentData::new();
		data.put_data(ModuleA::INHERENT_IDENTIFIER, &5u32).unwrap();

		let mut inherents: Vec<Call> = Vec::new();
		Inherents::create_inherents(&ext, &data, &mut inherents).unwrap();
		assert_eq!(inherents, vec![Call::A(CallA::Set(5)), Call::B(CallB::Ping)]);

		let mut inherents: Vec<Call> = Vec::new();
		Inherents::create_inherents(&ext, &InherentData::new(), &mut inherents).unwrap();
		assert_eq!(inherents, vec![Call::B(CallB::Ping)]);
	}

	#[test]
	fn unreadable_inherent_data_aborts_creation() {
		let mut t = TestExternalities::new_empty();
		let ext = t.ext();
		let mut data = InherentData::new();
		data.put_data(ModuleA::INHERENT_IDENTIFIER, &vec![1u8]).unwrap();

		let mut inherents: Vec<Call> = Vec::new();
		assert_eq!(
			Inherents::create_inherents(&ext, &data, &mut inherents),
			Err(Abort::MalformedInherentData("testinha")),
		);
		assert!(inherents.is_empty());
	}

	#[test]
	fn is_inherent_asks_the_owning_module() {
		assert!(Inherents::is_inherent(&Call::A(CallA::Set(1))));
		assert!(!Inherents::is_inherent(&Call::A(CallA::Other)));
		assert!(Inherents::is_inherent(&Call::B(CallB::Ping)));
	}

	#[test]
	fn non_fatal_errors_accumulate() {
		sp_tracing::try_init_simple();
		let mut t = TestExternalities::new_empty();
		let ext = t.ext();
		let data = InherentData::new();
		let mut result = CheckInherentsResult::new();

		let too_big = Call::A(CallA::Set(11));
		assert_eq!(Inherents::check_inherent(&ext, &too_big, &data, &mut result), Ok(true));
		let other = Call::A(CallA::Other);
		assert_eq!(Inherents::check_inherent(&ext, &other, &data, &mut result), Ok(false));
		assert!(!result.ok());
		assert!(!result.fatal_error());
		assert_eq!(result.get_error(&ModuleA::INHERENT_IDENTIFIER).unwrap(), Some(ErrorA::TooBig));
	}

	#[test]
	fn missing_required_inherent_is_reported() {
		let mut t = TestExternalities::new_empty();
		let ext = t.ext();
		let data = InherentData::new();

		let present = Call::A(CallA::Set(1));
		let mut result = CheckInherentsResult::new();
		Inherents::check_required(&ext, &data, &[&present], &mut result);
		assert!(result.ok());

		let mut result = CheckInherentsResult::new();
		<Inherents as InherentProviders<Call>>::check_required(&ext, &data, &[], &mut result);
		assert!(result.fatal_error());
		assert_eq!(result.get_error(&ModuleA::INHERENT_IDENTIFIER).unwrap(), Some(ErrorA::Missing));
	}
}
