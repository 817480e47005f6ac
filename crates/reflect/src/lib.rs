//! Domain-scoped type metadata cache and compiled property accessors.
//!
//! # Purpose
//!
//! Types opt into runtime metadata by registering a [`TypeDescriptor`]
//! (by hand or with `#[derive(Reflect)]`). On top of that registry the crate
//! provides:
//!
//! - [`domain`]: per-domain discovery of registered types, memoized once per
//!   domain for the life of the process;
//! - [`filter`]: lazy "assignable to `T`" narrowing of descriptor sequences;
//! - [`scan`]: properties paired with their first marker of a given kind;
//! - [`accessor`]: getters and setters compiled once from a property
//!   descriptor and then called without any lookup;
//! - [`memo`]: the thread-safe get-or-populate map everything above is cached
//!   in.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use strata_reflect::{BindingFlags, Domain, DomainTypeCache, Module, PropertyDescriptor, TypeDescriptor};
//! use strata_reflect::accessor::{compile_getter, compile_setter};
//! use strata_reflect::scan::attributed_properties;
//!
//! #[derive(Debug)]
//! struct Column(&'static str);
//!
//! struct User {
//!     id: u64,
//! }
//!
//! let user = TypeDescriptor::builder::<User>()
//!     .property(
//!         PropertyDescriptor::builder::<User, u64>("id")
//!             .getter(|u| u.id)
//!             .setter(|u, v| u.id = v)
//!             .marker(Column("user_id"))
//!             .build(),
//!     )
//!     .build()?;
//!
//! let domain = Domain::new("app");
//! domain.load(Module::new("models").with(Arc::new(user)))?;
//!
//! let types = DomainTypeCache::new().all_types(&domain);
//! let user = types.iter().next().unwrap();
//! let columns = attributed_properties::<Column>(user, BindingFlags::default());
//!
//! let get = compile_getter::<User, u64>(&columns[0].property)?.unwrap();
//! let set = compile_setter::<User, u64>(&columns[0].property)?.unwrap();
//! let mut u = User { id: 1 };
//! set.set(&mut u, 42);
//! assert_eq!(get.get(&u), 42);
//! # Ok::<(), strata_reflect::Error>(())
//! ```
//!
//! # Features
//!
//! - `derive` (default): re-exports `#[derive(Reflect)]`.
//! - `inventory` (default): link-time registration feeding [`Domain::process`].

extern crate self as strata_reflect;

pub mod accessor;
pub mod domain;
mod error;
pub mod filter;
pub mod memo;
pub mod meta;
pub mod scan;

pub use accessor::{AccessorCache, DynGetter, DynSetter, Getter, Setter};
#[cfg(feature = "inventory")]
pub use domain::TypeRegistration;
pub use domain::{Domain, DomainId, DomainTypeCache, Module, TypeSet, all_types, all_types_of};
pub use error::{Error, Result};
pub use filter::{OfType, of_type};
pub use memo::{LookupOrDefault, MemoMap, Population};
pub use meta::{
	BindingFlags, Describe, Marker, Markers, PropertyBuilder, PropertyDescriptor, Reflect, TypeDescriptor,
	TypeDescriptorBuilder, TypeKey, Visibility,
};
pub use scan::{Attributed, attributed_properties, attributed_properties_of};
#[cfg(feature = "derive")]
pub use strata_macros::Reflect;

#[doc(hidden)]
pub mod __private {
	#[cfg(feature = "inventory")]
	pub use inventory;
}

/// Submits a link-time registration for a type implementing [`Describe`].
#[doc(hidden)]
#[cfg(feature = "inventory")]
#[macro_export]
macro_rules! __submit_type {
	($module:expr, $ty:ty) => {
		$crate::__private::inventory::submit! {
			$crate::TypeRegistration::new($module, <$ty as $crate::Describe>::describe)
		}
	};
}

#[doc(hidden)]
#[cfg(not(feature = "inventory"))]
#[macro_export]
macro_rules! __submit_type {
	($module:expr, $ty:ty) => {};
}
