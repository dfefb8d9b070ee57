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

//! # GRANDPA Module
//!
//! Keeps the authority set of the GRANDPA finality gadget in runtime storage.
//!
//! The set lives under [`GRANDPA_AUTHORITIES_KEY`] rather than under a module prefix, so a node
//! can read it directly. The stored value is versioned: a leading
//! [`AUTHORITIES_VERSION`] byte followed by the SCALE encoded [`AuthorityList`].
//!
//! The module has no dispatchable calls. The initial set is provided by [`GenesisConfig`].

use core::marker::PhantomData;

use codec::{Decode, Encode};
use scale_info::TypeInfo;
use sp_core::ed25519;
use stf_primitives::{ConsensusEngineId, Externalities};
use stf_support::{
	storage::unhashed,
	traits::{BuildGenesisConfig, Get, Hooks},
};

#[cfg(test)]
mod tests;

/// Log target of the GRANDPA module.
pub const LOG_TARGET: &str = "runtime::grandpa";

/// The engine id of GRANDPA digest items.
pub const GRANDPA_ENGINE_ID: ConsensusEngineId = *b"FRNK";

/// The key type of GRANDPA session keys.
pub const KEY_TYPE: [u8; 4] = *b"gran";

/// The storage key of the current authority set.
pub const GRANDPA_AUTHORITIES_KEY: &[u8] = b":grandpa_authorities";

/// The version of the stored authority list this module understands.
pub const AUTHORITIES_VERSION: u8 = 1;

/// Identity of a GRANDPA authority.
pub type AuthorityId = ed25519::Public;

/// The weight of an authority.
pub type AuthorityWeight = u64;

/// A list of GRANDPA authorities with associated weights.
pub type AuthorityList = Vec<(AuthorityId, AuthorityWeight)>;

/// An [`AuthorityList`] together with the version of its encoding, as kept in storage.
#[derive(Encode, Decode, Clone, PartialEq, Eq, Debug, Default, TypeInfo)]
pub struct VersionedAuthorityList {
	pub version: u8,
	pub authorities: AuthorityList,
}

impl From<AuthorityList> for VersionedAuthorityList {
	fn from(authorities: AuthorityList) -> Self {
		Self { version: AUTHORITIES_VERSION, authorities }
	}
}

pub trait Config: 'static {
	/// Max authorities in use.
	type MaxAuthorities: Get<u32>;
}

pub struct Pallet<T>(PhantomData<T>);

impl<T: Config> Hooks for Pallet<T> {}

impl<T: Config> Pallet<T> {
	/// Get the current set of authorities, along with their respective weights.
	///
	/// A list stored with an unknown version is reported as an empty set.
	pub fn grandpa_authorities(ext: &dyn Externalities) -> AuthorityList {
		match unhashed::get::<VersionedAuthorityList>(ext, GRANDPA_AUTHORITIES_KEY) {
			Some(list) if list.version == AUTHORITIES_VERSION => list.authorities,
			Some(list) => {
				log::warn!(
					target: LOG_TARGET,
					"unknown Grandpa authorities version: [{}]",
					list.version,
				);
				Vec::new()
			},
			None => Vec::new(),
		}
	}

	fn set_grandpa_authorities(ext: &mut dyn Externalities, authorities: &[(AuthorityId, AuthorityWeight)]) {
		unhashed::put(ext, GRANDPA_AUTHORITIES_KEY, &(AUTHORITIES_VERSION, authorities));
	}

	fn initialize(ext: &mut dyn Externalities, authorities: &[(AuthorityId, AuthorityWeight)]) {
		if authorities.is_empty() {
			return
		}

		assert!(
			Self::grandpa_authorities(&*ext).is_empty(),
			"Authorities are already initialized!"
		);
		assert!(
			authorities.len() <= T::MaxAuthorities::get() as usize,
			"Grandpa: `Config::MaxAuthorities` is smaller than the number of genesis authorities!",
		);
		Self::set_grandpa_authorities(ext, authorities);
		log::debug!(target: LOG_TARGET, "initialized with {} authorities", authorities.len());
	}
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct GenesisConfig<T: Config> {
	pub authorities: AuthorityList,
	pub _config: PhantomData<T>,
}

impl<T: Config> Default for GenesisConfig<T> {
	fn default() -> Self {
		Self { authorities: Vec::new(), _config: PhantomData }
	}
}

impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
	fn build(&self, ext: &mut dyn Externalities) {
		Pallet::<T>::initialize(ext, &self.authorities);
	}
}
