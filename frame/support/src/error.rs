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

//! Module error declarations.

/// An uninhabited type, used to pad module generics that carry no data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Never {}

/// Declare the error type of a module.
///
/// The generated enum is generic over the module's config so that it can be converted into a
/// [`DispatchError::Module`](stf_primitives::DispatchError::Module) carrying the module index the
/// runtime assigned, looked up through `PalletInfo`. The error index is the declaration order.
///
/// ```ignore
/// decl_error! {
/// 	/// Error for the balances module.
/// 	pub enum Error for Pallet<T: Config> {
/// 		/// Balance too low to send value.
/// 		InsufficientBalance,
/// 	}
/// }
/// ```
#[macro_export]
macro_rules! decl_error {
	(
		$(#[$attr:meta])*
		pub enum $error:ident for $module:ident<$t:ident: $config:path> {
			$(
				$(#[doc = $doc:literal])*
				$variant:ident
			),* $(,)?
		}
	) => {
		$(#[$attr])*
		pub enum $error<$t> {
			$(
				$(#[doc = $doc])*
				$variant,
			)*
			#[doc(hidden)]
			__Ignore(core::marker::PhantomData<$t>, $crate::Never),
		}

		impl<$t> $error<$t> {
			const NAMES: &'static [&'static str] = &[ $( stringify!($variant) ),* ];

			/// The name of the variant.
			pub fn as_str(&self) -> &'static str {
				match self {
					$( Self::$variant => stringify!($variant), )*
					Self::__Ignore(_, never) => match *never {},
				}
			}

			/// The position of the variant in the declaration.
			pub fn index(&self) -> u8 {
				let name = self.as_str();
				Self::NAMES.iter().position(|n| *n == name).unwrap_or_default() as u8
			}
		}

		impl<$t> Clone for $error<$t> {
			fn clone(&self) -> Self {
				match self {
					$( Self::$variant => Self::$variant, )*
					Self::__Ignore(_, never) => match *never {},
				}
			}
		}

		impl<$t> Copy for $error<$t> {}

		impl<$t> PartialEq for $error<$t> {
			fn eq(&self, other: &Self) -> bool {
				self.index() == other.index()
			}
		}

		impl<$t> Eq for $error<$t> {}

		impl<$t> core::fmt::Debug for $error<$t> {
			fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
				f.write_str(self.as_str())
			}
		}

		impl<$t> From<$error<$t>> for &'static str {
			fn from(err: $error<$t>) -> &'static str {
				err.as_str()
			}
		}

		impl<$t: $config> From<$error<$t>> for $crate::__private::DispatchError {
			fn from(err: $error<$t>) -> Self {
				use $crate::traits::PalletInfo as _;
				match $t::PalletInfo::index::<$module<$t>>() {
					Some(index) => Self::Module($crate::__private::ModuleError {
						index: index as u8,
						error: [err.index(), 0, 0, 0],
						message: Some(err.as_str()),
					}),
					None => Self::Other(err.as_str()),
				}
			}
		}
	};
}

#[cfg(test)]
mod tests {
	use crate::traits::PalletInfo;
	use stf_primitives::{DispatchError, DispatchErrorWithPostInfo, ModuleError};

	pub trait Config: 'static {
		type PalletInfo: PalletInfo;
	}

	pub struct Pallet<T>(core::marker::PhantomData<T>);

	decl_error! {
		/// Errors of the test module.
		pub enum Error for Pallet<T: Config> {
			/// First.
			First,
			/// Second.
			Second,
		}
	}

	pub struct Indexed;
	impl PalletInfo for Indexed {
		fn index<P: 'static>() -> Option<usize> {
			Some(9)
		}
		fn name<P: 'static>() -> Option<&'static str> {
			Some("Test")
		}
	}

	struct Unknown;
	impl PalletInfo for Unknown {
		fn index<P: 'static>() -> Option<usize> {
			None
		}
		fn name<P: 'static>() -> Option<&'static str> {
			None
		}
	}

	struct Runtime;
	impl Config for Runtime {
		type PalletInfo = Indexed;
	}

	struct Orphan;
	impl Config for Orphan {
		type PalletInfo = Unknown;
	}

	#[test]
	fn errors_convert_into_module_errors() {
		assert_eq!(Error::<Runtime>::Second.index(), 1);
		assert_eq!(
			DispatchError::from(Error::<Runtime>::Second),
			DispatchError::Module(ModuleError { index: 9, error: [1, 0, 0, 0], message: None }),
		);

		let with_info: DispatchErrorWithPostInfo = Error::<Runtime>::First.into();
		assert_eq!(with_info.error, DispatchError::Module(ModuleError { index: 9, error: [0; 4], message: None }));
	}

	mod extended {
		use super::{Config, Indexed};

		pub trait ExtendedConfig: Config {}

		pub struct Pallet<T>(core::marker::PhantomData<T>);

		decl_error! {
			/// Errors of a module whose config extends another one.
			pub enum Error for Pallet<T: ExtendedConfig> {
				/// Only.
				Only,
			}
		}

		pub struct Runtime;
		impl Config for Runtime {
			type PalletInfo = Indexed;
		}
		impl ExtendedConfig for Runtime {}
	}

	#[test]
	fn module_index_comes_from_a_super_config() {
		assert_eq!(
			DispatchError::from(extended::Error::<extended::Runtime>::Only),
			DispatchError::Module(ModuleError { index: 9, error: [0; 4], message: None }),
		);
	}

	#[test]
	fn unknown_module_falls_back_to_the_name() {
		assert_eq!(DispatchError::from(Error::<Orphan>::First), DispatchError::Other("First"));
		assert_eq!(format!("{:?}", Error::<Orphan>::Second), "Second");
	}
}
