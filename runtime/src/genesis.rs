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

//! Genesis configuration of the runtime.

use stf_primitives::Externalities;
use stf_support::traits::BuildGenesisConfig;

use crate::Runtime;

/// The genesis state of every module of the runtime.
#[derive(Default)]
pub struct RuntimeGenesisConfig {
	pub system: stf_system::GenesisConfig<Runtime>,
	pub aura: stf_aura::GenesisConfig<Runtime>,
	pub grandpa: stf_grandpa::GenesisConfig<Runtime>,
	pub balances: stf_balances::GenesisConfig<Runtime>,
	pub transaction_payment: stf_transaction_payment::GenesisConfig<Runtime>,
}

impl BuildGenesisConfig for RuntimeGenesisConfig {
	fn build(&self, ext: &mut dyn Externalities) {
		self.system.build(ext);
		self.aura.build(ext);
		self.grandpa.build(ext);
		self.balances.build(ext);
		self.transaction_payment.build(ext);
		log::debug!(target: crate::LOG_TARGET, "genesis storage built");
	}
}
