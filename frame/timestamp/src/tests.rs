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
//! Tests for the Timestamp module.

use crate::{mock::*, *};
use pretty_assertions::assert_eq;
use stf_primitives::{DispatchError, RawOrigin};
use stf_support::{assert_err_ignore_postinfo, assert_noop, assert_ok, inherent::InherentData};

fn inherent_data(now: Moment) -> InherentData {
	let mut data = InherentData::new();
	data.put_data(INHERENT_IDENTIFIER, &now).expect("fresh inherent data; qed");
	data
}

#[test]
fn timestamp_works() {
	new_test_ext().execute_with(|ext| {
		Now::put(ext, 46);
		assert_ok!(Timestamp::set(ext, RawOrigin::None, 69));
		assert_eq!(Now::get(ext), 69);
		assert_eq!(Some(69), get_captured_moment(ext));
		assert!(DidUpdate::get(ext));
	});
}

#[test]
fn refused_timestamp_fails_the_call() {
	new_test_ext().execute_with(|ext| {
		Now::put(ext, 46);
		assert_err_ignore_postinfo!(
			Timestamp::set(ext, RawOrigin::None, REFUSED_MOMENT),
			DispatchError::Other("refused moment")
		);
		assert_eq!(get_captured_moment(ext), None);
	});
}

#[test]
fn double_timestamp_should_fail() {
	new_test_ext().execute_with(|ext| {
		assert_ok!(Timestamp::set_timestamp(ext, 42));
		assert_ok!(Timestamp::set(ext, RawOrigin::None, 69));
		assert_err_ignore_postinfo!(
			Timestamp::set(ext, RawOrigin::None, 70),
			DispatchError::Other("Timestamp must be updated only once in the block")
		);
	});
}

#[test]
fn block_period_minimum_enforced() {
	new_test_ext().execute_with(|ext| {
		Now::put(ext, 44);
		assert_noop!(
			ext,
			Timestamp::set(ext, RawOrigin::None, 46).map_err(|e| e.error),
			DispatchError::Other(
				"Timestamp must increment by at least <MinimumPeriod> between sequential blocks"
			)
		);
		assert_ok!(Timestamp::set(ext, RawOrigin::None, 49));
	});
}

#[test]
fn first_timestamp_is_not_bounded_by_the_minimum_period() {
	new_test_ext().execute_with(|ext| {
		assert_ok!(Timestamp::set(ext, RawOrigin::None, 1));
		assert_eq!(Timestamp::get(ext), 1);
	});
}

#[test]
fn set_requires_the_none_origin() {
	new_test_ext().execute_with(|ext| {
		assert_err_ignore_postinfo!(
			Timestamp::set(ext, RawOrigin::Signed(1), 10),
			DispatchError::BadOrigin
		);
		assert_err_ignore_postinfo!(Timestamp::set(ext, RawOrigin::Root, 10), DispatchError::BadOrigin);
		assert!(!DidUpdate::exists(ext));
	});
}

#[test]
fn on_finalize_requires_an_update() {
	new_test_ext().execute_with(|ext| {
		assert_eq!(
			<Timestamp as Hooks>::on_finalize(ext, 1),
			Err(Abort::Hook {
				module: "Timestamp",
				reason: "Timestamp must be updated once in the block"
			})
		);

		assert_ok!(Timestamp::set(ext, RawOrigin::None, 10));
		assert_eq!(<Timestamp as Hooks>::on_finalize(ext, 1), Ok(()));
		// The flag is cleared for the next block.
		assert!(!DidUpdate::exists(ext));
	});
}

#[test]
fn set_is_a_mandatory_inherent() {
	let call = Call::<Test>::set { now: 10 };
	let info = call.get_dispatch_info();
	assert_eq!(info.class, DispatchClass::Mandatory);
	assert_eq!(info.pays_fee, Pays::Yes);
	assert_eq!(info.weight, Weight::from_parts(9_258_000 + 2 * 25_000_000 + 100_000_000, 0));

	assert!(Timestamp::is_inherent(&call));
	assert_eq!(call.get_call_index(), 0);
	assert_eq!(call.get_call_name(), "set");
}

#[test]
fn call_encodes_the_moment_as_compact() {
	let call = RuntimeCall::Timestamp(Call::set { now: 10 });
	assert_eq!(call.encode(), vec![1, 0, 40]);
	assert_eq!(RuntimeCall::decode(&mut &[1u8, 0, 40][..]).unwrap(), call);
}

#[test]
fn create_inherent_never_goes_back_in_time() {
	new_test_ext().execute_with(|ext| {
		Now::put(ext, 100);
		assert_eq!(
			Timestamp::create_inherent(ext, &inherent_data(200)),
			Ok(Some(Call::set { now: 200 }))
		);
		// Behind the previous block: bumped to the minimum period.
		assert_eq!(
			Timestamp::create_inherent(ext, &inherent_data(50)),
			Ok(Some(Call::set { now: 105 }))
		);
	});
}

#[test]
fn create_inherent_aborts_without_readable_data() {
	sp_tracing::try_init_simple();
	new_test_ext().execute_with(|ext| {
		assert_eq!(
			Timestamp::create_inherent(ext, &InherentData::new()),
			Err(Abort::MalformedInherentData("Timestamp inherent must be provided."))
		);

		let mut malformed = InherentData::new();
		malformed.put_data(INHERENT_IDENTIFIER, &1u8).unwrap();
		assert_eq!(
			Timestamp::create_inherent(ext, &malformed),
			Err(Abort::MalformedInherentData("Invalid timestamp inherent data encoding."))
		);
	});
}

#[test]
fn check_inherent_works() {
	new_test_ext().execute_with(|ext| {
		Now::put(ext, 1_000);
		let data = inherent_data(2_000);
		let ext = &*ext;
		let check = |now: Moment| Timestamp::check_inherent(ext, &Call::set { now }, &data);

		assert_eq!(check(2_000), Ok(Ok(())));
		assert_eq!(check(2_000 + MAX_TIMESTAMP_DRIFT_MILLIS), Ok(Ok(())));
		assert_eq!(check(2_001 + MAX_TIMESTAMP_DRIFT_MILLIS), Ok(Err(InherentError::TooFarInFuture)));
		assert_eq!(check(1_004), Ok(Err(InherentError::TooEarly)));
	});
}

#[test]
fn check_inherent_aborts_without_readable_data() {
	sp_tracing::try_init_simple();
	new_test_ext().execute_with(|ext| {
		Now::put(ext, 1_000);
		assert_eq!(
			Timestamp::check_inherent(ext, &Call::set { now: 1_005 }, &InherentData::new()),
			Err(Abort::MalformedInherentData("Timestamp inherent must be provided."))
		);

		let mut malformed = InherentData::new();
		malformed.put_data(INHERENT_IDENTIFIER, &vec![1u8, 2]).unwrap();
		assert_eq!(
			Timestamp::check_inherent(ext, &Call::set { now: 1_005 }, &malformed),
			Err(Abort::MalformedInherentData("Invalid timestamp inherent data encoding."))
		);
	});
}

#[test]
fn inherent_errors_are_fatal() {
	for error in [InherentError::TooEarly, InherentError::TooFarInFuture] {
		assert!(error.is_fatal_error());
		assert_eq!(InherentError::try_from(&INHERENT_IDENTIFIER, &error.encode()), Some(error));
	}
	assert_eq!(InherentError::TooEarly.encode(), vec![0]);
	assert_eq!(InherentError::TooFarInFuture.encode(), vec![1]);
	assert_eq!(InherentError::try_from(b"babeslot", &[0]), None);
	assert_eq!(
		InherentError::TooFarInFuture.to_string(),
		"The timestamp of the block is too far in the future."
	);
}

#[test]
fn validate_unsigned_accepts_the_inherent() {
	new_test_ext().execute_with(|ext| {
		let call = Call::<Test>::set { now: 10 };
		assert_eq!(<Timestamp as ValidateUnsigned>::pre_dispatch(ext, &call), Ok(()));
		assert_eq!(
			Timestamp::validate_unsigned(ext, TransactionSource::External, &call),
			Ok(ValidTransaction::default())
		);
	});
}
