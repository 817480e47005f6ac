use std::borrow::Cow;

use super::{DynGetter, DynSetter, compile_dyn_getter, compile_dyn_setter, require_declaring};
use crate::error::Result;
use crate::memo::{MemoMap, Population};
use crate::meta::{PropertyDescriptor, TypeKey};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct AccessorKey {
	declaring: TypeKey,
	name: Cow<'static, str>,
}

impl AccessorKey {
	fn of(property: &PropertyDescriptor) -> Result<Self> {
		Ok(Self {
			declaring: require_declaring(property)?,
			name: property.shared_name(),
		})
	}
}

/// Caller-owned cache of compiled erased accessors keyed by declaring type and
/// property name.
///
/// Each property is compiled at most once per cache. Absent accessors are
/// cached as `None`; compilation errors are not cached.
#[derive(Debug, Default)]
pub struct AccessorCache {
	getters: MemoMap<AccessorKey, Option<DynGetter>>,
	setters: MemoMap<AccessorKey, Option<DynSetter>>,
}

impl AccessorCache {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the cached getter of `property`, compiling it on first use.
	pub fn getter(&self, property: &PropertyDescriptor) -> Result<Option<DynGetter>> {
		let key = AccessorKey::of(property)?;
		self.getters
			.try_get_or_add(key, || compile_dyn_getter(property), Population::Locked)
	}

	/// Returns the cached setter of `property`, compiling it on first use.
	pub fn setter(&self, property: &PropertyDescriptor) -> Result<Option<DynSetter>> {
		let key = AccessorKey::of(property)?;
		self.setters
			.try_get_or_add(key, || compile_dyn_setter(property), Population::Locked)
	}

	/// Returns the number of compiled entries, absent ones included.
	pub fn len(&self) -> usize {
		self.getters.len() + self.setters.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
