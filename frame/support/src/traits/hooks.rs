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

//! Traits for hooking tasks to events in a blockchain's lifecycle.

use impl_trait_for_tuples::impl_for_tuples;
use stf_primitives::{Abort, BlockNumber, Externalities, Weight};

/// The block lifecycle hooks of a module.
///
/// Every hook gets the host handle of the block being built. Hooks of the modules of a runtime are
/// aggregated as a tuple and called in declaration order, except for
/// [`on_idle`](Self::on_idle) which starts from a different module each block.
///
/// A hook returning an [`Abort`] makes the whole block invalid.
pub trait Hooks {
	/// Block initialization hook. This is called at the very beginning of block execution.
	///
	/// Must return the non-negotiable weight of both itself and whatever
	/// [`on_finalize`](Self::on_finalize) wishes to consume.
	fn on_initialize(_ext: &mut dyn Externalities, _n: BlockNumber) -> Result<Weight, Abort> {
		Ok(Weight::zero())
	}

	/// Block finalization hook. This is called at the very end of block execution.
	///
	/// Note that this has nothing to do with finality in the "consensus" sense.
	fn on_finalize(_ext: &mut dyn Externalities, _n: BlockNumber) -> Result<(), Abort> {
		Ok(())
	}

	/// Hook to consume a block's idle time. This will run when the block is being finalized
	/// (before [`on_finalize`](Self::on_finalize)).
	///
	/// Given that all dispatchables are already executed and noted (and the weight for
	/// [`on_finalize`](Self::on_finalize), which comes next, is also already accounted for via
	/// `on_initialize`), this hook consumes anything that is leftover.
	///
	/// Each module's `on_idle` is chosen to be the first to execute in a round-robin fashion
	/// indexed by the block number.
	///
	/// Return the weight used, the caller will use this to calculate the remaining weight and then
	/// call the next module `on_idle` hook if there is still weight left.
	fn on_idle(
		_ext: &mut dyn Externalities,
		_n: BlockNumber,
		_remaining_weight: Weight,
	) -> Result<Weight, Abort> {
		Ok(Weight::zero())
	}

	/// Hook executed when a code change (aka. a "runtime upgrade") is detected by the executive.
	///
	/// Returns the weight consumed by the migration.
	fn on_runtime_upgrade(_ext: &mut dyn Externalities) -> Result<Weight, Abort> {
		Ok(Weight::zero())
	}

	/// Implementing this function on a module allows you to perform long-running tasks that are
	/// dispatched as separate threads, and entirely independent of the main blockchain execution.
	///
	/// Nothing written to storage here is part of the chain state.
	fn offchain_worker(_ext: &mut dyn Externalities, _n: BlockNumber) {}
}

#[impl_for_tuples(30)]
impl Hooks for Tuple {
	fn on_initialize(ext: &mut dyn Externalities, n: BlockNumber) -> Result<Weight, Abort> {
		let mut weight = Weight::zero();
		for_tuples!( #( weight = weight.saturating_add(Tuple::on_initialize(&mut *ext, n)?); )* );
		Ok(weight)
	}

	fn on_finalize(ext: &mut dyn Externalities, n: BlockNumber) -> Result<(), Abort> {
		for_tuples!( #( Tuple::on_finalize(&mut *ext, n)?; )* );
		Ok(())
	}

	fn on_idle(
		ext: &mut dyn Externalities,
		n: BlockNumber,
		remaining_weight: Weight,
	) -> Result<Weight, Abort> {
		let on_idle_functions: &[fn(
			&mut dyn Externalities,
			BlockNumber,
			Weight,
		) -> Result<Weight, Abort>] = &[for_tuples!( #( Tuple::on_idle ),* )];
		let len = on_idle_functions.len();
		if len == 0 {
			return Ok(Weight::zero())
		}

		let mut weight = Weight::zero();
		let start_index = (n % len as u64) as usize;
		for on_idle_fn in on_idle_functions.iter().cycle().skip(start_index).take(len) {
			let adjusted_remaining_weight = remaining_weight.saturating_sub(weight);
			weight = weight.saturating_add(on_idle_fn(&mut *ext, n, adjusted_remaining_weight)?);
		}
		Ok(weight)
	}

	fn on_runtime_upgrade(ext: &mut dyn Externalities) -> Result<Weight, Abort> {
		let mut weight = Weight::zero();
		for_tuples!( #( weight = weight.saturating_add(Tuple::on_runtime_upgrade(&mut *ext)?); )* );
		Ok(weight)
	}

	fn offchain_worker(ext: &mut dyn Externalities, n: BlockNumber) {
		for_tuples!( #( Tuple::offchain_worker(&mut *ext, n); )* );
	}
}

/// A runtime-level migration, executed before the [`Hooks::on_runtime_upgrade`] of the modules.
pub trait OnRuntimeUpgrade {
	/// Perform the migration and return its weight.
	fn on_runtime_upgrade(_ext: &mut dyn Externalities) -> Result<Weight, Abort> {
		Ok(Weight::zero())
	}
}

#[impl_for_tuples(30)]
impl OnRuntimeUpgrade for Tuple {
	fn on_runtime_upgrade(ext: &mut dyn Externalities) -> Result<Weight, Abort> {
		let mut weight = Weight::zero();
		for_tuples!( #( weight = weight.saturating_add(Tuple::on_runtime_upgrade(&mut *ext)?); )* );
		Ok(weight)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use stf_state_machine::TestExternalities;

	fn record(ext: &mut dyn Externalities, tag: u8) {
		let mut log = ext.storage(b"log").unwrap_or_default();
		log.push(tag);
		ext.set_storage(b"log".to_vec(), log);
	}

	struct A;
	impl Hooks for A {
		fn on_initialize(ext: &mut dyn Externalities, _: BlockNumber) -> Result<Weight, Abort> {
			record(ext, 1);
			Ok(Weight::from_parts(10, 0))
		}

		fn on_idle(
			ext: &mut dyn Externalities,
			_: BlockNumber,
			remaining: Weight,
		) -> Result<Weight, Abort> {
			record(ext, 1);
			Ok(remaining.min(Weight::from_parts(5, 0)))
		}
	}

	struct B;
	impl Hooks for B {
		fn on_initialize(ext: &mut dyn Externalities, _: BlockNumber) -> Result<Weight, Abort> {
			record(ext, 2);
			Ok(Weight::from_parts(20, 0))
		}

		fn on_finalize(_: &mut dyn Externalities, _: BlockNumber) -> Result<(), Abort> {
			Err(Abort::Hook { module: "B", reason: "not set" })
		}

		fn on_idle(
			ext: &mut dyn Externalities,
			_: BlockNumber,
			remaining: Weight,
		) -> Result<Weight, Abort> {
			record(ext, 2);
			Ok(remaining.min(Weight::from_parts(8, 0)))
		}
	}

	#[test]
	fn on_initialize_sums_in_declaration_order() {
		let mut t = TestExternalities::new_empty();
		t.execute_with(|ext| {
			assert_eq!(<(A, B)>::on_initialize(ext, 1), Ok(Weight::from_parts(30, 0)));
			assert_eq!(ext.storage(b"log"), Some(vec![1, 2]));
		});
	}

	#[test]
	fn on_idle_rotates_and_shrinks_the_remaining_weight() {
		let mut t = TestExternalities::new_empty();
		t.execute_with(|ext| {
			// Block 1 starts with the second member.
			assert_eq!(
				<(A, B)>::on_idle(ext, 1, Weight::from_parts(10, 0)),
				Ok(Weight::from_parts(10, 0))
			);
			assert_eq!(ext.storage(b"log"), Some(vec![2, 1]));
			assert_eq!(<()>::on_idle(ext, 1, Weight::from_parts(10, 0)), Ok(Weight::zero()));
		});
	}

	#[test]
	fn failing_hook_aborts() {
		let mut t = TestExternalities::new_empty();
		t.execute_with(|ext| {
			assert_eq!(
				<(A, B)>::on_finalize(ext, 1),
				Err(Abort::Hook { module: "B", reason: "not set" })
			);
		});
	}
}
