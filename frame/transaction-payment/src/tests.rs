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

use super::*;
use crate::mock::*;

use pretty_assertions::assert_eq;
use stf_primitives::{
	generic::UncheckedExtrinsic, transaction_validity::InvalidTransaction, PostDispatchInfo,
};
use stf_support::{
	assert_err, assert_ok, parameter_types,
	traits::{Currency, Hooks},
};

fn info_from_weight(w: u64) -> DispatchInfo {
	DispatchInfo { weight: Weight::from_parts(w, 0), ..Default::default() }
}

fn post_info_from_weight(w: u64) -> PostDispatchInfo {
	PostDispatchInfo { actual_weight: Some(Weight::from_parts(w, 0)), pays_fee: Default::default() }
}

fn post_info_from_pays(p: Pays) -> PostDispatchInfo {
	PostDispatchInfo { actual_weight: None, pays_fee: p }
}

fn default_post_info() -> PostDispatchInfo {
	PostDispatchInfo { actual_weight: None, pays_fee: Default::default() }
}

#[test]
fn signed_extension_transaction_payment_work() {
	sp_tracing::try_init_simple();
	ExtBuilder::default().balance_factor(100).build().execute_with(|ext| {
		let len = 10;
		let pre = ChargeTransactionPayment::<Test>::from(0)
			.pre_dispatch(ext, &1, CALL, &info_from_weight(5), len)
			.expect("account 1 can pay the fee");
		assert_eq!(Balances::free_balance(&*ext, &1), 1000 - 5 - 10 - 100);

		assert_ok!(ChargeTransactionPayment::<Test>::post_dispatch(
			ext,
			Some(pre),
			&info_from_weight(5),
			&default_post_info(),
			len,
			&Ok(())
		));
		assert_eq!(Balances::free_balance(&*ext, &1), 1000 - 5 - 10 - 100);
		assert_eq!(
			fee_paid_events(&*ext),
			vec![Event::TransactionFeePaid { who: 1, actual_fee: 115, tip: 0 }]
		);

		let pre = ChargeTransactionPayment::<Test>::from(5 /* tipped */)
			.pre_dispatch(ext, &2, CALL, &info_from_weight(100), len)
			.expect("account 2 can pay the fee");
		assert_eq!(Balances::free_balance(&*ext, &2), 2000 - 100 - 10 - 100 - 5);

		assert_ok!(ChargeTransactionPayment::<Test>::post_dispatch(
			ext,
			Some(pre),
			&info_from_weight(100),
			&post_info_from_weight(50),
			len,
			&Ok(())
		));
		assert_eq!(Balances::free_balance(&*ext, &2), 2000 - 50 - 10 - 100 - 5);
		assert_eq!(
			fee_paid_events(&*ext).last(),
			Some(&Event::TransactionFeePaid { who: 2, actual_fee: 165, tip: 5 })
		);
	});
}

#[test]
fn signed_extension_transaction_payment_multiplied_refund_works() {
	ExtBuilder::default()
		.balance_factor(100)
		.multiplier(Multiplier::saturating_from_rational(3, 2))
		.build()
		.execute_with(|ext| {
			let len = 10;
			let pre = ChargeTransactionPayment::<Test>::from(5 /* tipped */)
				.pre_dispatch(ext, &2, CALL, &info_from_weight(100), len)
				.expect("account 2 can pay the fee");
			// 5 base fee, 10 byte fee, 3/2 * 100 weight fee, 5 tip
			assert_eq!(Balances::free_balance(&*ext, &2), 2000 - 100 - 10 - 150 - 5);

			assert_ok!(ChargeTransactionPayment::<Test>::post_dispatch(
				ext,
				Some(pre),
				&info_from_weight(100),
				&post_info_from_weight(50),
				len,
				&Ok(())
			));
			// 75 (3/2 of the returned 50 units of weight) is refunded
			assert_eq!(Balances::free_balance(&*ext, &2), 2000 - 100 - 10 - 75 - 5);
		});
}

#[test]
fn signed_extension_transaction_payment_is_bounded() {
	ExtBuilder::default().balance_factor(1000).build().execute_with(|ext| {
		// maximum weight possible
		assert_ok!(ChargeTransactionPayment::<Test>::from(0).pre_dispatch(
			ext,
			&1,
			CALL,
			&info_from_weight(u64::MAX),
			10
		));
		// fee will be proportional to what is the actual maximum weight in the runtime.
		assert_eq!(
			Balances::free_balance(&*ext, &1),
			(10000 - <Test as stf_system::Config>::BlockWeights::get().max_block.ref_time()) as u128 -
				10 - 100
		);
	});
}

#[test]
fn signed_extension_allows_free_transactions() {
	ExtBuilder::default().balance_factor(0).build().execute_with(|ext| {
		// 1 ain't have a penny.
		assert_eq!(Balances::free_balance(&*ext, &1), 0);

		let len = 100;

		// This is a completely free (and thus wholly insecure/DoS-ridden) transaction.
		let operational_transaction = DispatchInfo {
			weight: Weight::from_parts(0, 0),
			class: DispatchClass::Operational,
			pays_fee: Pays::No,
		};
		assert_ok!(ChargeTransactionPayment::<Test>::from(0).validate(
			&*ext,
			&1,
			CALL,
			&operational_transaction,
			len
		));

		// like a InsecureFreeNormal
		let free_transaction = DispatchInfo {
			weight: Weight::from_parts(0, 0),
			class: DispatchClass::Normal,
			pays_fee: Pays::Yes,
		};
		assert_err!(
			ChargeTransactionPayment::<Test>::from(0).validate(
				&*ext,
				&1,
				CALL,
				&free_transaction,
				len
			),
			InvalidTransaction::Payment
		);
	});
}

#[test]
fn signed_ext_length_fee_is_not_multiplied() {
	ExtBuilder::default()
		.balance_factor(10)
		.multiplier(Multiplier::saturating_from_rational(3, 2))
		.build()
		.execute_with(|ext| {
			let len = 10;
			assert_ok!(ChargeTransactionPayment::<Test>::from(10) // tipped
				.pre_dispatch(ext, &3, CALL, &info_from_weight(3), len));
			assert_eq!(
				Balances::free_balance(&*ext, &3),
				300 // original
				- 10 // tip
				- 10 // len
				- 4 // weight, 3/2 * 3 rounded down
				- 100 // base
			);
		});
}

#[test]
fn payment_failure_leaves_the_account_untouched() {
	ExtBuilder::default().balance_factor(10).build().execute_with(|ext| {
		// 100 base + 10 length + 5 weight is more than the 100 account 1 holds.
		assert_err!(
			ChargeTransactionPayment::<Test>::from(0).validate(
				&*ext,
				&1,
				CALL,
				&info_from_weight(5),
				10
			),
			InvalidTransaction::Payment
		);
		assert_err!(
			ChargeTransactionPayment::<Test>::from(0).pre_dispatch(
				ext,
				&1,
				CALL,
				&info_from_weight(5),
				10
			),
			InvalidTransaction::Payment
		);
		assert_eq!(Balances::free_balance(&*ext, &1), 100);
	});
}

#[test]
fn fee_payment_keeps_the_payer_alive() {
	ExtBuilder::default().balance_factor(11).build().execute_with(|ext| {
		// Paying the whole balance of 110 would reap the account.
		assert_err!(
			ChargeTransactionPayment::<Test>::from(0).validate(
				&*ext,
				&1,
				CALL,
				&info_from_weight(0),
				10
			),
			InvalidTransaction::Payment
		);
		assert_err!(
			ChargeTransactionPayment::<Test>::from(0).pre_dispatch(
				ext,
				&1,
				CALL,
				&info_from_weight(0),
				10
			),
			InvalidTransaction::Payment
		);

		assert_ok!(ChargeTransactionPayment::<Test>::from(0).pre_dispatch(
			ext,
			&1,
			CALL,
			&info_from_weight(0),
			9
		));
		assert_eq!(Balances::free_balance(&*ext, &1), 1);
	});
}

#[test]
fn query_info_and_fee_details_work() {
	let call = RuntimeCall::Balances(stf_balances::Call::transfer { dest: 2, value: 69 });
	let origin = 111111;
	let extra = ChargeTransactionPayment::<Test>::from(0);
	let xt = UncheckedExtrinsic::<u64, RuntimeCall, (), ChargeTransactionPayment<Test>>::new_signed(
		call.clone(),
		origin,
		(),
		extra,
	);
	let unsigned_xt =
		UncheckedExtrinsic::<u64, RuntimeCall, (), ChargeTransactionPayment<Test>>::new_unsigned(
			call.clone(),
		);
	let len = 100;
	let info = call.get_dispatch_info();

	ExtBuilder::default()
		.multiplier(Multiplier::saturating_from_rational(3, 2))
		.build()
		.execute_with(|ext| {
			// weight fee is capped by the maximum block weight
			let weight_fee = info.weight.ref_time().min(1024) as u128;

			assert_eq!(
				TransactionPayment::query_info(&*ext, xt.clone(), len),
				RuntimeDispatchInfo {
					weight: info.weight,
					class: info.class,
					partial_fee: 100 /* base */
						+ len as u128 /* len */
						+ weight_fee * 3 / 2 /* weight */
				},
			);

			assert_eq!(
				TransactionPayment::query_info(&*ext, unsigned_xt.clone(), len),
				RuntimeDispatchInfo { weight: info.weight, class: info.class, partial_fee: 0 },
			);

			assert_eq!(
				TransactionPayment::query_fee_details(&*ext, xt, len),
				FeeDetails {
					inclusion_fee: Some(InclusionFee {
						base_fee: 100,
						len_fee: len as u128,
						adjusted_weight_fee: weight_fee * 3 / 2,
					}),
					tip: 0,
				},
			);

			assert_eq!(
				TransactionPayment::query_fee_details(&*ext, unsigned_xt, len),
				FeeDetails { inclusion_fee: None, tip: 0 },
			);
		});
}

#[test]
fn compute_fee_works_without_multiplier() {
	ExtBuilder::default().build().execute_with(|ext| {
		// Next fee multiplier is one
		assert_eq!(TransactionPayment::next_fee_multiplier(&*ext), MULTIPLIER_DEFAULT);

		// Tip only, no fees works
		let dispatch_info = DispatchInfo {
			weight: Weight::from_parts(0, 0),
			class: DispatchClass::Operational,
			pays_fee: Pays::No,
		};
		assert_eq!(TransactionPayment::compute_fee(&*ext, 0, &dispatch_info, 10), 10);
		// No tip, only base fee works
		let dispatch_info = DispatchInfo {
			weight: Weight::from_parts(0, 0),
			class: DispatchClass::Operational,
			pays_fee: Pays::Yes,
		};
		assert_eq!(TransactionPayment::compute_fee(&*ext, 0, &dispatch_info, 0), 100);
		// Tip + base fee works
		assert_eq!(TransactionPayment::compute_fee(&*ext, 0, &dispatch_info, 69), 169);
		// Len (byte fee) + base fee works
		assert_eq!(TransactionPayment::compute_fee(&*ext, 42, &dispatch_info, 0), 142);
		// Weight fee + base fee works
		let dispatch_info = DispatchInfo {
			weight: Weight::from_parts(1000, 0),
			class: DispatchClass::Operational,
			pays_fee: Pays::Yes,
		};
		assert_eq!(TransactionPayment::compute_fee(&*ext, 0, &dispatch_info, 0), 1100);
	});
}

#[test]
fn compute_fee_works_with_multiplier() {
	ExtBuilder::default()
		.multiplier(Multiplier::saturating_from_rational(3, 2))
		.build()
		.execute_with(|ext| {
			// Base fee is unaffected by multiplier
			let dispatch_info = DispatchInfo {
				weight: Weight::from_parts(0, 0),
				class: DispatchClass::Operational,
				pays_fee: Pays::Yes,
			};
			assert_eq!(TransactionPayment::compute_fee(&*ext, 0, &dispatch_info, 0), 100);

			// Everything works together :)
			let dispatch_info = DispatchInfo {
				weight: Weight::from_parts(123, 0),
				class: DispatchClass::Operational,
				pays_fee: Pays::Yes,
			};
			// 123 weight, 456 length, 100 base
			assert_eq!(
				TransactionPayment::compute_fee(&*ext, 456, &dispatch_info, 789),
				100 + (3 * 123 / 2) + 456 + 789,
			);
		});
}

#[test]
fn compute_fee_does_not_overflow() {
	ExtBuilder::default().build().execute_with(|ext| {
		// Overflow is handled
		let dispatch_info = DispatchInfo {
			weight: Weight::max_value(),
			class: DispatchClass::Operational,
			pays_fee: Pays::Yes,
		};
		assert_eq!(
			TransactionPayment::compute_fee(&*ext, u32::MAX, &dispatch_info, Balance::MAX),
			Balance::MAX
		);
	});
}

#[test]
fn actual_weight_higher_than_max_refunds_nothing() {
	ExtBuilder::default().balance_factor(10).build().execute_with(|ext| {
		let len = 10;
		let pre = ChargeTransactionPayment::<Test>::from(5 /* tipped */)
			.pre_dispatch(ext, &2, CALL, &info_from_weight(50), len)
			.expect("account 2 can pay the fee");
		assert_eq!(Balances::free_balance(&*ext, &2), 200 - 5 - 10 - 50 - 100);

		assert_ok!(ChargeTransactionPayment::<Test>::post_dispatch(
			ext,
			Some(pre),
			&info_from_weight(50),
			&post_info_from_weight(60),
			len,
			&Ok(())
		));
		assert_eq!(Balances::free_balance(&*ext, &2), 200 - 5 - 10 - 50 - 100);
	});
}

#[test]
fn zero_transfer_on_free_transaction() {
	ExtBuilder::default().balance_factor(10).build().execute_with(|ext| {
		let len = 10;
		let dispatch_info = DispatchInfo {
			weight: Weight::from_parts(100, 0),
			pays_fee: Pays::No,
			class: DispatchClass::Normal,
		};
		let user = 69;
		let pre = ChargeTransactionPayment::<Test>::from(0)
			.pre_dispatch(ext, &user, CALL, &dispatch_info, len)
			.expect("a free transaction needs no funds");
		assert_eq!(Balances::total_balance(&*ext, &user), 0);
		assert_ok!(ChargeTransactionPayment::<Test>::post_dispatch(
			ext,
			Some(pre),
			&dispatch_info,
			&default_post_info(),
			len,
			&Ok(())
		));
		assert_eq!(Balances::total_balance(&*ext, &user), 0);
		// Nothing was withdrawn, the event still reports the zero fee.
		assert_eq!(
			fee_paid_events(&*ext),
			vec![Event::TransactionFeePaid { who: user, actual_fee: 0, tip: 0 }]
		);
	});
}

#[test]
fn refund_consistent_with_actual_weight_and_pays_no() {
	ExtBuilder::default().balance_factor(100).build().execute_with(|ext| {
		let info = info_from_weight(100);
		let len = 10;
		let user = 1;
		let pre = ChargeTransactionPayment::<Test>::from(0)
			.pre_dispatch(ext, &user, CALL, &info, len)
			.expect("account 1 can pay the fee");
		assert_eq!(Balances::free_balance(&*ext, &user), 1000 - 100 - 10 - 100);

		assert_ok!(ChargeTransactionPayment::<Test>::post_dispatch(
			ext,
			Some(pre),
			&info,
			&post_info_from_pays(Pays::No),
			len,
			&Ok(())
		));
		assert_eq!(Balances::free_balance(&*ext, &user), 1000);
		assert_eq!(
			fee_paid_events(&*ext),
			vec![Event::TransactionFeePaid { who: user, actual_fee: 0, tip: 0 }]
		);
	});
}

#[test]
fn should_alter_operational_priority() {
	let tip = 5;
	let len = 10;

	ExtBuilder::default().balance_factor(100).build().execute_with(|ext| {
		let normal = DispatchInfo {
			weight: Weight::from_parts(100, 0),
			class: DispatchClass::Normal,
			pays_fee: Pays::Yes,
		};
		let priority = ChargeTransactionPayment::<Test>::from(tip)
			.validate(&*ext, &2, CALL, &normal, len)
			.expect("account 2 can pay the fee")
			.priority;

		// 10 transactions of weight 100 fit into the 1024 block
		assert_eq!(priority, 60);

		let priority = ChargeTransactionPayment::<Test>::from(2 * tip)
			.validate(&*ext, &2, CALL, &normal, len)
			.expect("account 2 can pay the fee")
			.priority;

		assert_eq!(priority, 110);
	});

	ExtBuilder::default().balance_factor(100).build().execute_with(|ext| {
		let op = DispatchInfo {
			weight: Weight::from_parts(100, 0),
			class: DispatchClass::Operational,
			pays_fee: Pays::Yes,
		};
		let final_fee = TransactionPayment::compute_fee(&*ext, len as u32, &op, tip);
		let priority = ChargeTransactionPayment::<Test>::from(tip)
			.validate(&*ext, &2, CALL, &op, len)
			.expect("account 2 can pay the fee")
			.priority;

		// the virtual tip is five times the final fee
		assert_eq!(priority, 60 + final_fee as u64 * 5 * 10);
		assert_eq!(priority, ChargeTransactionPayment::<Test>::get_priority(&op, len, tip, final_fee));
	});
}

#[test]
fn no_tip_has_some_priority() {
	let tip = 0;
	let len = 10;

	ExtBuilder::default().balance_factor(100).build().execute_with(|ext| {
		let normal = DispatchInfo {
			weight: Weight::from_parts(100, 0),
			class: DispatchClass::Normal,
			pays_fee: Pays::Yes,
		};
		let priority = ChargeTransactionPayment::<Test>::from(tip)
			.validate(&*ext, &2, CALL, &normal, len)
			.expect("account 2 can pay the fee")
			.priority;

		assert_eq!(priority, 10);
	});
}

#[test]
fn higher_tip_have_higher_priority() {
	let get_priorities = |tip: Balance| {
		let mut pri1 = 0;
		let mut pri2 = 0;
		let len = 10;
		ExtBuilder::default().balance_factor(100).build().execute_with(|ext| {
			let normal = DispatchInfo {
				weight: Weight::from_parts(100, 0),
				class: DispatchClass::Normal,
				pays_fee: Pays::Yes,
			};
			pri1 = ChargeTransactionPayment::<Test>::from(tip)
				.validate(&*ext, &2, CALL, &normal, len)
				.expect("account 2 can pay the fee")
				.priority;
		});

		ExtBuilder::default().balance_factor(100).build().execute_with(|ext| {
			let op = DispatchInfo {
				weight: Weight::from_parts(100, 0),
				class: DispatchClass::Operational,
				pays_fee: Pays::Yes,
			};
			pri2 = ChargeTransactionPayment::<Test>::from(tip)
				.validate(&*ext, &2, CALL, &op, len)
				.expect("account 2 can pay the fee")
				.priority;
		});

		(pri1, pri2)
	};

	let mut prev_priorities = get_priorities(0);

	for tip in 1..3 {
		let priorities = get_priorities(tip);
		assert!(prev_priorities.0 < priorities.0);
		assert!(prev_priorities.1 < priorities.1);
		prev_priorities = priorities;
	}
}

#[test]
fn validate_does_not_charge_the_fee() {
	ExtBuilder::default().balance_factor(100).build().execute_with(|ext| {
		assert_ok!(ChargeTransactionPayment::<Test>::from(0).validate(
			&*ext,
			&1,
			CALL,
			&info_from_weight(5),
			10
		));
		assert_eq!(Balances::free_balance(&*ext, &1), 1000);
	});
}

parameter_types! {
	pub const Two: Multiplier = Multiplier::from_u32(2);
}

#[test]
fn multiplier_is_updated_on_finalize() {
	ExtBuilder::default()
		.multiplier(Multiplier::saturating_from_rational(3, 2))
		.build()
		.execute_with(|ext| {
			assert_ok!(TransactionPayment::on_finalize(ext, 1));
			// `()` keeps the multiplier as it is.
			assert_eq!(
				TransactionPayment::next_fee_multiplier(&*ext),
				Multiplier::saturating_from_rational(3, 2)
			);
		});

	assert_eq!(<ConstFeeMultiplier<Two> as MultiplierUpdate>::convert(MULTIPLIER_DEFAULT), Two::get());
	assert_eq!(<() as MultiplierUpdate>::convert(Two::get()), Two::get());
}

#[test]
fn signed_extension_encodes_the_tip_as_compact() {
	assert_eq!(ChargeTransactionPayment::<Test>::from(5).encode(), vec![5 << 2]);
	assert_eq!(ChargeTransactionPayment::<Test>::from(5).tip(), 5);
}
