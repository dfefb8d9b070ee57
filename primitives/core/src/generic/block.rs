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

//! Generic implementation of a block and associated items.

use codec::{Decode, Encode};
use scale_info::TypeInfo;

use crate::generic::Header;

/// Abstraction over a substrate block.
#[derive(PartialEq, Eq, Clone, Encode, Decode, Debug, TypeInfo)]
pub struct Block<Extrinsic> {
	/// The block header.
	pub header: Header,
	/// The accompanying extrinsics.
	pub extrinsics: Vec<Extrinsic>,
}

impl<Extrinsic> Block<Extrinsic> {
	pub fn new(header: Header, extrinsics: Vec<Extrinsic>) -> Self {
		Block { header, extrinsics }
	}

	pub fn header(&self) -> &Header {
		&self.header
	}

	pub fn extrinsics(&self) -> &[Extrinsic] {
		&self.extrinsics[..]
	}

	pub fn deconstruct(self) -> (Header, Vec<Extrinsic>) {
		(self.header, self.extrinsics)
	}
}
