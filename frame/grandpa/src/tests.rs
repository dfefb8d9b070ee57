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

use hex_literal::hex;
use pretty_assertions::assert_eq;
use stf_primitives::traits::ConstU32;
use stf_state_machine::TestExternalities;

pub struct Test;

impl Config for Test {
	type MaxAuthorities = ConstU32<2>;
}

type Grandpa = Pallet<Test>;

fn authority(byte: u8) -> AuthorityId {
	ed25519::Public::from_raw([byte; 32])
}

fn new_test_ext(authorities: AuthorityList) -> TestExternalities {
	let mut t = TestExternalities::new_empty();
	t.execute_with(|ext| {
		GenesisConfig::<Test> { authorities, _config: PhantomData }.build(ext)
	});
	t
}

#[test]
fn authorities_are_empty_without_genesis() {
	new_test_ext(vec![]).execute_with(|ext| {
		assert!(!unhashed::exists(ext, GRANDPA_AUTHORITIES_KEY));
		assert_eq!(Grandpa::grandpa_authorities(ext), vec![]);
		assert_eq!(Grandpa::grandpa_authorities(ext).encode(), vec![0]);
	});
}

#[test]
fn genesis_authorities_are_stored_versioned() {
	let authorities = vec![(authority(1), 1), (authority(2), 1)];
	new_test_ext(authorities.clone()).execute_with(|ext| {
		let raw = unhashed::get_raw(ext, GRANDPA_AUTHORITIES_KEY).expect("written at genesis");
		assert_eq!(raw[0], AUTHORITIES_VERSION);
		assert_eq!(&raw[1..], &authorities.encode()[..]);
		assert_eq!(Grandpa::grandpa_authorities(ext), authorities);
	});
}

#[test]
fn stored_list_layout_is_stable() {
	new_test_ext(vec![(authority(0x88), 1)]).execute_with(|ext| {
		let mut expected = vec![1, 4];
		expected.extend_from_slice(&[0x88; 32]);
		expected.extend_from_slice(&hex!("0100000000000000"));
		assert_eq!(unhashed::get_raw(ext, GRANDPA_AUTHORITIES_KEY), Some(expected));
	});
}

#[test]
fn unknown_version_yields_no_authorities() {
	sp_tracing::try_init_simple();
	new_test_ext(vec![]).execute_with(|ext| {
		let list = VersionedAuthorityList { version: 2, authorities: vec![(authority(1), 1)] };
		unhashed::put(ext, GRANDPA_AUTHORITIES_KEY, &list);
		assert_eq!(Grandpa::grandpa_authorities(ext), vec![]);

		unhashed::put(ext, GRANDPA_AUTHORITIES_KEY, &VersionedAuthorityList::from(list.authorities));
		assert_eq!(Grandpa::grandpa_authorities(ext), vec![(authority(1), 1)]);
	});
}

#[test]
fn undecodable_list_yields_no_authorities() {
	new_test_ext(vec![]).execute_with(|ext| {
		unhashed::put_raw(ext, GRANDPA_AUTHORITIES_KEY, &[1, 4, 0]);
		assert_eq!(Grandpa::grandpa_authorities(ext), vec![]);
	});
}

#[test]
#[should_panic(expected = "Authorities are already initialized!")]
fn genesis_cannot_overwrite_authorities() {
	new_test_ext(vec![(authority(1), 1)]).execute_with(|ext| {
		GenesisConfig::<Test> { authorities: vec![(authority(2), 1)], _config: PhantomData }
			.build(ext)
	});
}

#[test]
#[should_panic(expected = "`Config::MaxAuthorities` is smaller than the number of genesis authorities")]
fn genesis_respects_max_authorities() {
	new_test_ext(vec![(authority(1), 1), (authority(2), 1), (authority(3), 1)]);
}
