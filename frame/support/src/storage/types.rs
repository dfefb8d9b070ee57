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

//! Storage types to build abstraction on storage, they implements storage traits such as
//! `StorageValue` and `StorageMap` on a prefix type.

use std::marker::PhantomData;

use codec::{DecodeLength, EncodeAppend, EncodeLike, FullCodec};
use sp_core::hexdisplay::HexDisplay;
use stf_primitives::Externalities;

use super::{instance_prefix, unhashed, StorageHasher, StorageInstance};
use crate::{Never, LOG_TARGET};

/// Trait implementing how the storage optional value is converted into the queried type.
///
/// It is implemented by:
/// * `OptionQuery` which converts an optional value to an optional value, used when querying
///   storage returns an optional value.
/// * `ValueQuery` which converts an optional value to a value, used when querying storage
///   returns a value.
pub trait QueryKindTrait<Value> {
	/// Type returned on query
	type Query: 'static;

	/// Convert an optional value (i.e. some if trie contains the value or none otherwise) to the
	/// query.
	fn from_optional_value_to_query(v: Option<Value>) -> Self::Query;

	/// Convert a query to an optional value.
	fn from_query_to_optional_value(v: Self::Query) -> Option<Value>;
}

/// Implement `QueryKindTrait` with query being `Option<Value>`
pub struct OptionQuery;
impl<Value: 'static> QueryKindTrait<Value> for OptionQuery {
	type Query = Option<Value>;

	fn from_optional_value_to_query(v: Option<Value>) -> Self::Query {
		// NOTE: OptionQuery doesn't support default value.
		v
	}

	fn from_query_to_optional_value(v: Self::Query) -> Option<Value> {
		v
	}
}

/// Implement `QueryKindTrait` with query being `Value`, absent values read as the default.
pub struct ValueQuery;
impl<Value: Default + 'static> QueryKindTrait<Value> for ValueQuery {
	type Query = Value;

	fn from_optional_value_to_query(v: Option<Value>) -> Self::Query {
		v.unwrap_or_default()
	}

	fn from_query_to_optional_value(v: Self::Query) -> Option<Value> {
		Some(v)
	}
}

fn never<R>(r: Result<R, Never>) -> R {
	match r {
		Ok(r) => r,
		Err(never) => match never {},
	}
}

/// A type that allow to store a value.
///
/// Each value is stored at:
/// ```nocompile
/// Twox128(Prefix::pallet_prefix()) ++ Twox128(Prefix::STORAGE_PREFIX)
/// ```
pub struct StorageValue<Prefix, Value, QueryKind = OptionQuery>(
	PhantomData<(Prefix, Value, QueryKind)>,
);

impl<Prefix, Value, QueryKind> StorageValue<Prefix, Value, QueryKind>
where
	Prefix: StorageInstance,
	Value: FullCodec,
	QueryKind: QueryKindTrait<Value>,
{
	/// Get the storage key.
	pub fn hashed_key(ext: &dyn Externalities) -> [u8; 32] {
		instance_prefix::<Prefix>(ext)
	}

	/// Does the value (explicitly) exist in storage?
	pub fn exists(ext: &dyn Externalities) -> bool {
		unhashed::exists(ext, &Self::hashed_key(ext))
	}

	/// Load the value from the provided storage instance.
	pub fn get(ext: &dyn Externalities) -> QueryKind::Query {
		QueryKind::from_optional_value_to_query(unhashed::get(ext, &Self::hashed_key(ext)))
	}

	/// Try to get the underlying value from the provided storage instance.
	///
	/// Returns `Ok` if it exists, `Err` if not.
	pub fn try_get(ext: &dyn Externalities) -> Result<Value, ()> {
		unhashed::get(ext, &Self::hashed_key(ext)).ok_or(())
	}

	/// Store a value under this key into the provided storage instance.
	pub fn put<Arg: EncodeLike<Value>>(ext: &mut dyn Externalities, val: Arg) {
		let key = Self::hashed_key(&*ext);
		unhashed::put(ext, &key, &val)
	}

	/// Store a value under this key into the provided storage instance.
	///
	/// A `None` query (or nothing for `ValueQuery`) removes the entry.
	pub fn set(ext: &mut dyn Externalities, val: QueryKind::Query) {
		match QueryKind::from_query_to_optional_value(val) {
			Some(ref val) => Self::put(ext, val),
			None => Self::kill(ext),
		}
	}

	/// Clear the storage value.
	pub fn kill(ext: &mut dyn Externalities) {
		let key = Self::hashed_key(&*ext);
		unhashed::kill(ext, &key)
	}

	/// Take a value from storage, removing it afterwards.
	pub fn take(ext: &mut dyn Externalities) -> QueryKind::Query {
		let key = Self::hashed_key(&*ext);
		QueryKind::from_optional_value_to_query(unhashed::take(ext, &key))
	}

	/// Mutate the value
	pub fn mutate<R, F: FnOnce(&mut QueryKind::Query) -> R>(ext: &mut dyn Externalities, f: F) -> R {
		never(Self::try_mutate(ext, |v| Ok::<R, Never>(f(v))))
	}

	/// Mutate the value if closure returns `Ok`
	pub fn try_mutate<R, E, F: FnOnce(&mut QueryKind::Query) -> Result<R, E>>(
		ext: &mut dyn Externalities,
		f: F,
	) -> Result<R, E> {
		let mut val = Self::get(&*ext);

		let ret = f(&mut val);
		if ret.is_ok() {
			Self::set(ext, val);
		}
		ret
	}

	/// Append the given item to the value in the storage.
	///
	/// `Value` is required to implement [`EncodeAppend`]. A stored value that cannot be appended
	/// to is logged and replaced by a value holding just `item`.
	pub fn append<Item>(ext: &mut dyn Externalities, item: Item)
	where
		Item: codec::Encode,
		Value: EncodeAppend<Item = Item>,
	{
		let key = Self::hashed_key(&*ext);
		let existing = unhashed::get_raw(&*ext, &key).unwrap_or_default();
		let appended = Value::append_or_new(existing, std::iter::once(&item)).or_else(|e| {
			log::error!(
				target: LOG_TARGET,
				"Corrupted state at `{}`, resetting on append: {:?}",
				HexDisplay::from(&key),
				e,
			);
			Value::append_or_new(Vec::new(), std::iter::once(&item))
		});
		match appended {
			Ok(encoded) => unhashed::put_raw(ext, &key, &encoded),
			Err(e) => log::error!(target: LOG_TARGET, "Failed to append to storage: {:?}", e),
		}
	}

	/// Read the length of the storage value without decoding the entire value.
	///
	/// Returns `None` if the value is absent or its length cannot be decoded.
	pub fn decode_len(ext: &dyn Externalities) -> Option<usize>
	where
		Value: DecodeLength,
	{
		let raw = unhashed::get_raw(ext, &Self::hashed_key(ext))?;
		Value::len(&raw).ok()
	}
}

/// A type that allow to store value for given key. Allowing to insert/remove/iterate on values.
///
/// Each value is stored at:
/// ```nocompile
/// Twox128(Prefix::pallet_prefix())
/// 		++ Twox128(Prefix::STORAGE_PREFIX)
/// 		++ Hasher1(encode(key))
/// ```
pub struct StorageMap<Prefix, Hasher, Key, Value, QueryKind = OptionQuery>(
	PhantomData<(Prefix, Hasher, Key, Value, QueryKind)>,
);

impl<Prefix, Hasher, Key, Value, QueryKind> StorageMap<Prefix, Hasher, Key, Value, QueryKind>
where
	Prefix: StorageInstance,
	Hasher: StorageHasher,
	Key: FullCodec,
	Value: FullCodec,
	QueryKind: QueryKindTrait<Value>,
{
	/// The prefix shared by every key of the map.
	pub fn final_prefix(ext: &dyn Externalities) -> [u8; 32] {
		instance_prefix::<Prefix>(ext)
	}

	/// Get the storage key used to fetch a value corresponding to a specific key.
	pub fn hashed_key_for<KeyArg: EncodeLike<Key>>(ext: &dyn Externalities, key: KeyArg) -> Vec<u8> {
		let prefix = Self::final_prefix(ext);
		let key_hashed = key.using_encoded(|k| Hasher::hash(ext, k));

		let mut final_key = Vec::with_capacity(prefix.len() + key_hashed.len());
		final_key.extend_from_slice(&prefix);
		final_key.extend_from_slice(&key_hashed);
		final_key
	}

	/// Does the value (explicitly) exist in storage?
	pub fn contains_key<KeyArg: EncodeLike<Key>>(ext: &dyn Externalities, key: KeyArg) -> bool {
		unhashed::exists(ext, &Self::hashed_key_for(ext, key))
	}

	/// Load the value associated with the given key from the map.
	pub fn get<KeyArg: EncodeLike<Key>>(ext: &dyn Externalities, key: KeyArg) -> QueryKind::Query {
		QueryKind::from_optional_value_to_query(unhashed::get(ext, &Self::hashed_key_for(ext, key)))
	}

	/// Try to get the value for the given key from the map.
	///
	/// Returns `Ok` if it exists, `Err` if not.
	pub fn try_get<KeyArg: EncodeLike<Key>>(
		ext: &dyn Externalities,
		key: KeyArg,
	) -> Result<Value, ()> {
		unhashed::get(ext, &Self::hashed_key_for(ext, key)).ok_or(())
	}

	/// Store a value to be associated with the given key from the map.
	pub fn insert<KeyArg: EncodeLike<Key>, ValArg: EncodeLike<Value>>(
		ext: &mut dyn Externalities,
		key: KeyArg,
		val: ValArg,
	) {
		let key = Self::hashed_key_for(&*ext, key);
		unhashed::put(ext, &key, &val)
	}

	/// Remove the value under a key.
	pub fn remove<KeyArg: EncodeLike<Key>>(ext: &mut dyn Externalities, key: KeyArg) {
		let key = Self::hashed_key_for(&*ext, key);
		unhashed::kill(ext, &key)
	}

	/// Take the value under a key.
	pub fn take<KeyArg: EncodeLike<Key>>(
		ext: &mut dyn Externalities,
		key: KeyArg,
	) -> QueryKind::Query {
		let key = Self::hashed_key_for(&*ext, key);
		QueryKind::from_optional_value_to_query(unhashed::take(ext, &key))
	}

	/// Mutate the value under a key.
	pub fn mutate<KeyArg: EncodeLike<Key>, R, F: FnOnce(&mut QueryKind::Query) -> R>(
		ext: &mut dyn Externalities,
		key: KeyArg,
		f: F,
	) -> R {
		never(Self::try_mutate(ext, key, |v| Ok::<R, Never>(f(v))))
	}

	/// Mutate the item, only if an `Ok` value is returned.
	pub fn try_mutate<KeyArg, R, E, F>(ext: &mut dyn Externalities, key: KeyArg, f: F) -> Result<R, E>
	where
		KeyArg: EncodeLike<Key>,
		F: FnOnce(&mut QueryKind::Query) -> Result<R, E>,
	{
		let final_key = Self::hashed_key_for(&*ext, key);
		let mut val =
			QueryKind::from_optional_value_to_query(unhashed::get(&*ext, final_key.as_ref()));

		let ret = f(&mut val);
		if ret.is_ok() {
			match QueryKind::from_query_to_optional_value(val) {
				Some(ref val) => unhashed::put(ext, final_key.as_ref(), val),
				None => unhashed::kill(ext, final_key.as_ref()),
			}
		}
		ret
	}

	/// Mutate the value under a key.
	///
	/// Deletes the item if mutated to a `None`.
	pub fn mutate_exists<KeyArg: EncodeLike<Key>, R, F: FnOnce(&mut Option<Value>) -> R>(
		ext: &mut dyn Externalities,
		key: KeyArg,
		f: F,
	) -> R {
		never(Self::try_mutate_exists(ext, key, |v| Ok::<R, Never>(f(v))))
	}

	/// Mutate the item, only if an `Ok` value is returned. Deletes the item if mutated to a `None`.
	pub fn try_mutate_exists<KeyArg, R, E, F>(
		ext: &mut dyn Externalities,
		key: KeyArg,
		f: F,
	) -> Result<R, E>
	where
		KeyArg: EncodeLike<Key>,
		F: FnOnce(&mut Option<Value>) -> Result<R, E>,
	{
		let final_key = Self::hashed_key_for(&*ext, key);
		let mut val = unhashed::get(&*ext, final_key.as_ref());

		let ret = f(&mut val);
		if ret.is_ok() {
			match val {
				Some(ref val) => unhashed::put(ext, final_key.as_ref(), val),
				None => unhashed::kill(ext, final_key.as_ref()),
			}
		}
		ret
	}

	/// Remove up to `limit` entries of the map, or all of them when `limit` is `None`.
	///
	/// Returns the number of removed keys and whether some remain.
	pub fn clear(ext: &mut dyn Externalities, limit: Option<u32>) -> (u32, bool) {
		let prefix = Self::final_prefix(&*ext);
		unhashed::clear_prefix(ext, &prefix, limit)
	}
}
