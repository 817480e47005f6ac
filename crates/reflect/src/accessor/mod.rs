//! Compiles property descriptors into directly callable accessors.
//!
//! # Mental Model
//!
//! Registration already captured the accessor functions of every property.
//! Compiling resolves *which* function to call once: it checks the declaring
//! type, downcasts the registered function to the requested `D`/`V`, and hands
//! back a [`Getter`]/[`Setter`] whose call is a plain function pointer call.
//! No name lookup or type check happens per invocation.
//!
//! The erased forms ([`DynGetter`], [`DynSetter`]) accept `&dyn Any` and check
//! the instance type per call, but still skip name resolution.
//!
//! Compilation does not cache. Callers that compile repeatedly can layer an
//! [`AccessorCache`] on top.
//!
//! # Outcomes
//!
//! | Condition | Result |
//! |-----------|--------|
//! | No declaring type | `Err(Error::InvalidOperation)` |
//! | Cannot read / cannot write | `Ok(None)` |
//! | `D` or `V` differs from the descriptor | `Err(Error::TypeMismatch)` |
//! | Otherwise | `Ok(Some(accessor))` |

mod cache;

use std::any::{Any, type_name};
use std::borrow::Cow;
use std::fmt;

pub use cache::AccessorCache;

use crate::error::{Error, Result};
use crate::meta::{ErasedRead, ErasedWrite, PropertyDescriptor, ReadFn, TypeKey, WriteFn};

/// Compiled read accessor for a property of `D` holding `V`.
pub struct Getter<D, V> {
	name: Cow<'static, str>,
	read: ReadFn<D, V>,
}

impl<D, V> Getter<D, V> {
	/// Reads the property. Static properties ignore `instance`.
	#[inline]
	pub fn get(&self, instance: &D) -> V {
		self.read.call(instance)
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns the accessor as a plain closure.
	pub fn into_fn(self) -> impl Fn(&D) -> V + Copy + Send + Sync {
		let read = self.read;
		move |instance: &D| read.call(instance)
	}
}

impl<D, V> Clone for Getter<D, V> {
	fn clone(&self) -> Self {
		Self {
			name: self.name.clone(),
			read: self.read,
		}
	}
}

impl<D, V> fmt::Debug for Getter<D, V> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Getter")
			.field("name", &self.name)
			.field("declaring", &type_name::<D>())
			.field("value", &type_name::<V>())
			.finish()
	}
}

/// Compiled write accessor for a property of `D` holding `V`.
pub struct Setter<D, V> {
	name: Cow<'static, str>,
	write: WriteFn<D, V>,
}

impl<D, V> Setter<D, V> {
	/// Writes the property. Static properties ignore `instance`.
	#[inline]
	pub fn set(&self, instance: &mut D, value: V) {
		self.write.call(instance, value)
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns the accessor as a plain closure.
	pub fn into_fn(self) -> impl Fn(&mut D, V) + Copy + Send + Sync {
		let write = self.write;
		move |instance: &mut D, value: V| write.call(instance, value)
	}
}

impl<D, V> Clone for Setter<D, V> {
	fn clone(&self) -> Self {
		Self {
			name: self.name.clone(),
			write: self.write,
		}
	}
}

impl<D, V> fmt::Debug for Setter<D, V> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Setter")
			.field("name", &self.name)
			.field("declaring", &type_name::<D>())
			.field("value", &type_name::<V>())
			.finish()
	}
}

/// Type-erased compiled read accessor.
#[derive(Clone)]
pub struct DynGetter {
	name: Cow<'static, str>,
	read: ErasedRead,
}

impl DynGetter {
	/// Reads the property from `instance`.
	///
	/// Fails with [`Error::TypeMismatch`] if `instance` is not of the declaring type.
	pub fn get(&self, instance: &dyn Any) -> Result<Box<dyn Any>> {
		(self.read)(instance)
	}

	pub fn name(&self) -> &str {
		&self.name
	}
}

impl fmt::Debug for DynGetter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DynGetter").field("name", &self.name).finish_non_exhaustive()
	}
}

/// Type-erased compiled write accessor.
#[derive(Clone)]
pub struct DynSetter {
	name: Cow<'static, str>,
	write: ErasedWrite,
}

impl DynSetter {
	/// Writes `value` into `instance`.
	///
	/// Fails with [`Error::TypeMismatch`] if either the instance or the value has
	/// the wrong type; nothing is written in that case.
	pub fn set(&self, instance: &mut dyn Any, value: Box<dyn Any>) -> Result<()> {
		(self.write)(instance, value)
	}

	pub fn name(&self) -> &str {
		&self.name
	}
}

impl fmt::Debug for DynSetter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DynSetter").field("name", &self.name).finish_non_exhaustive()
	}
}

fn require_declaring(property: &PropertyDescriptor) -> Result<TypeKey> {
	property.declaring_type().ok_or_else(|| Error::InvalidOperation {
		property: property.name().to_string(),
		reason: "property has no declaring type",
	})
}

fn signature_mismatch<D: 'static, V: 'static>(property: &PropertyDescriptor) -> Error {
	let context = format!("compiled accessor for `{}`", property.name());
	if TypeKey::of::<D>() != property.receiver_type() {
		Error::TypeMismatch {
			context,
			expected: property.receiver_type().name(),
			found: type_name::<D>(),
		}
	} else {
		Error::TypeMismatch {
			context,
			expected: property.value_type().name(),
			found: type_name::<V>(),
		}
	}
}

/// Compiles the read side of `property` for instances of `D` and values of `V`.
pub fn compile_getter<D: 'static, V: 'static>(property: &PropertyDescriptor) -> Result<Option<Getter<D, V>>> {
	let declaring = require_declaring(property)?;
	let Some(slot) = property.read_slot() else {
		return Ok(None);
	};
	let read = slot
		.typed
		.downcast_ref::<ReadFn<D, V>>()
		.copied()
		.ok_or_else(|| signature_mismatch::<D, V>(property))?;
	tracing::trace!(property = property.name(), %declaring, "compiled getter");
	Ok(Some(Getter {
		name: property.shared_name(),
		read,
	}))
}

/// Compiles the write side of `property` for instances of `D` and values of `V`.
pub fn compile_setter<D: 'static, V: 'static>(property: &PropertyDescriptor) -> Result<Option<Setter<D, V>>> {
	let declaring = require_declaring(property)?;
	let Some(slot) = property.write_slot() else {
		return Ok(None);
	};
	let write = slot
		.typed
		.downcast_ref::<WriteFn<D, V>>()
		.copied()
		.ok_or_else(|| signature_mismatch::<D, V>(property))?;
	tracing::trace!(property = property.name(), %declaring, "compiled setter");
	Ok(Some(Setter {
		name: property.shared_name(),
		write,
	}))
}

/// Compiles a type-erased read accessor.
pub fn compile_dyn_getter(property: &PropertyDescriptor) -> Result<Option<DynGetter>> {
	let declaring = require_declaring(property)?;
	let Some(slot) = property.read_slot() else {
		return Ok(None);
	};
	tracing::trace!(property = property.name(), %declaring, "compiled erased getter");
	Ok(Some(DynGetter {
		name: property.shared_name(),
		read: slot.erased.clone(),
	}))
}

/// Compiles a type-erased write accessor.
pub fn compile_dyn_setter(property: &PropertyDescriptor) -> Result<Option<DynSetter>> {
	let declaring = require_declaring(property)?;
	let Some(slot) = property.write_slot() else {
		return Ok(None);
	};
	tracing::trace!(property = property.name(), %declaring, "compiled erased setter");
	Ok(Some(DynSetter {
		name: property.shared_name(),
		write: slot.erased.clone(),
	}))
}
