//! Property descriptors and their registered accessor functions.

use std::any::{Any, type_name};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use super::key::TypeKey;
use super::marker::{Marker, Markers};
use crate::error::{Error, Result};

/// Visibility of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
	#[default]
	Public,
	NonPublic,
}

bitflags::bitflags! {
	/// Selects which properties a scan considers.
	///
	/// A property is visible when both its visibility bit and its staticness
	/// bit are set.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
	pub struct BindingFlags: u8 {
		/// Public properties.
		const PUBLIC = 1 << 0;
		/// Non-public properties.
		const NON_PUBLIC = 1 << 1;
		/// Instance properties.
		const INSTANCE = 1 << 2;
		/// Static properties.
		const STATIC = 1 << 3;
		/// Public instance properties (the default scope).
		const PUBLIC_INSTANCE = Self::PUBLIC.bits() | Self::INSTANCE.bits();
	}
}

impl Default for BindingFlags {
	fn default() -> Self {
		Self::PUBLIC_INSTANCE
	}
}

impl BindingFlags {
	/// Returns true if a property with the given shape is visible in this scope.
	pub fn admits(self, visibility: Visibility, is_static: bool) -> bool {
		let vis = match visibility {
			Visibility::Public => Self::PUBLIC,
			Visibility::NonPublic => Self::NON_PUBLIC,
		};
		let kind = if is_static { Self::STATIC } else { Self::INSTANCE };
		self.contains(vis) && self.contains(kind)
	}
}

/// Registered read function.
pub(crate) enum ReadFn<D, V> {
	Instance(fn(&D) -> V),
	Static(fn() -> V),
}

impl<D, V> Clone for ReadFn<D, V> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<D, V> Copy for ReadFn<D, V> {}

impl<D, V> ReadFn<D, V> {
	#[inline]
	pub(crate) fn call(self, this: &D) -> V {
		match self {
			Self::Instance(get) => get(this),
			Self::Static(get) => get(),
		}
	}
}

/// Registered write function.
pub(crate) enum WriteFn<D, V> {
	Instance(fn(&mut D, V)),
	Static(fn(V)),
}

impl<D, V> Clone for WriteFn<D, V> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<D, V> Copy for WriteFn<D, V> {}

impl<D, V> WriteFn<D, V> {
	#[inline]
	pub(crate) fn call(self, this: &mut D, value: V) {
		match self {
			Self::Instance(set) => set(this, value),
			Self::Static(set) => set(value),
		}
	}
}

pub(crate) type ErasedRead = Arc<dyn Fn(&dyn Any) -> Result<Box<dyn Any>> + Send + Sync>;
pub(crate) type ErasedWrite = Arc<dyn Fn(&mut dyn Any, Box<dyn Any>) -> Result<()> + Send + Sync>;

/// Read side of a property: the typed function (as `ReadFn<D, V>`) and its
/// erased wrapper, both built once at registration.
#[derive(Clone)]
pub(crate) struct ReadSlot {
	pub(crate) typed: Arc<dyn Any + Send + Sync>,
	pub(crate) erased: ErasedRead,
}

#[derive(Clone)]
pub(crate) struct WriteSlot {
	pub(crate) typed: Arc<dyn Any + Send + Sync>,
	pub(crate) erased: ErasedWrite,
}

fn instance_mismatch<D: 'static>(property: &str, found: &'static str) -> Error {
	Error::TypeMismatch {
		context: format!("instance of property `{property}`"),
		expected: type_name::<D>(),
		found,
	}
}

impl ReadSlot {
	fn new<D: 'static, V: 'static>(name: &Cow<'static, str>, read: ReadFn<D, V>) -> Self {
		let name = name.clone();
		let erased: ErasedRead = Arc::new(move |instance: &dyn Any| -> Result<Box<dyn Any>> {
			let value = match read {
				ReadFn::Static(get) => get(),
				ReadFn::Instance(get) => {
					let this = instance
						.downcast_ref::<D>()
						.ok_or_else(|| instance_mismatch::<D>(&name, "a different type"))?;
					get(this)
				}
			};
			Ok(Box::new(value) as Box<dyn Any>)
		});
		Self {
			typed: Arc::new(read),
			erased,
		}
	}
}

impl WriteSlot {
	fn new<D: 'static, V: 'static>(name: &Cow<'static, str>, write: WriteFn<D, V>) -> Self {
		let name = name.clone();
		let erased: ErasedWrite = Arc::new(move |instance: &mut dyn Any, value: Box<dyn Any>| -> Result<()> {
			let value = value.downcast::<V>().map_err(|_| Error::TypeMismatch {
				context: format!("value of property `{name}`"),
				expected: type_name::<V>(),
				found: "a different type",
			})?;
			match write {
				WriteFn::Static(set) => set(*value),
				WriteFn::Instance(set) => {
					let this = instance
						.downcast_mut::<D>()
						.ok_or_else(|| instance_mismatch::<D>(&name, "a different type"))?;
					set(this, *value);
				}
			}
			Ok(())
		});
		Self {
			typed: Arc::new(write),
			erased,
		}
	}
}

/// One named, typed property of a registered type.
#[derive(Clone)]
pub struct PropertyDescriptor {
	name: Cow<'static, str>,
	declaring: Option<TypeKey>,
	receiver: TypeKey,
	value: TypeKey,
	visibility: Visibility,
	is_static: bool,
	mixed_kinds: bool,
	markers: Markers,
	read: Option<ReadSlot>,
	write: Option<WriteSlot>,
}

impl PropertyDescriptor {
	/// Starts a property named `name`, read from `D`, holding values of type `V`.
	///
	/// The built descriptor is detached: it has no declaring type until it is
	/// added to a [`TypeDescriptorBuilder`](super::TypeDescriptorBuilder).
	pub fn builder<D: 'static, V: 'static>(name: impl Into<Cow<'static, str>>) -> PropertyBuilder<D, V> {
		PropertyBuilder {
			name: name.into(),
			visibility: Visibility::Public,
			markers: Markers::default(),
			read: None,
			write: None,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub(crate) fn shared_name(&self) -> Cow<'static, str> {
		self.name.clone()
	}

	/// Returns the type this property is declared on, if attached.
	pub fn declaring_type(&self) -> Option<TypeKey> {
		self.declaring
	}

	/// Returns the type the registered accessors operate on.
	pub fn receiver_type(&self) -> TypeKey {
		self.receiver
	}

	pub fn value_type(&self) -> TypeKey {
		self.value
	}

	pub fn visibility(&self) -> Visibility {
		self.visibility
	}

	pub fn is_public(&self) -> bool {
		self.visibility == Visibility::Public
	}

	/// Returns true if the property's accessors do not need an instance.
	///
	/// A property is static when any of its accessors is static. Mixing an
	/// instance accessor with a static one is rejected by
	/// [`TypeDescriptorBuilder::build`](super::TypeDescriptorBuilder::build).
	pub fn is_static(&self) -> bool {
		self.is_static
	}

	/// Returns true if one accessor is static and the other is not.
	pub(crate) fn has_mixed_kinds(&self) -> bool {
		self.mixed_kinds
	}

	pub fn can_read(&self) -> bool {
		self.read.is_some()
	}

	pub fn can_write(&self) -> bool {
		self.write.is_some()
	}

	/// Returns the attached markers in declaration order.
	pub fn markers(&self) -> &Markers {
		&self.markers
	}

	/// Returns the first attached marker of kind `M`.
	pub fn marker<M: Marker>(&self) -> Option<Arc<M>> {
		self.markers.first::<M>()
	}

	pub(crate) fn read_slot(&self) -> Option<&ReadSlot> {
		self.read.as_ref()
	}

	pub(crate) fn write_slot(&self) -> Option<&WriteSlot> {
		self.write.as_ref()
	}

	pub(crate) fn attach(&mut self, owner: TypeKey) {
		self.declaring = Some(owner);
	}
}

impl fmt::Debug for PropertyDescriptor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PropertyDescriptor")
			.field("name", &self.name)
			.field("declaring", &self.declaring)
			.field("value", &self.value)
			.field("visibility", &self.visibility)
			.field("is_static", &self.is_static)
			.field("can_read", &self.can_read())
			.field("can_write", &self.can_write())
			.field("markers", &self.markers)
			.finish()
	}
}

/// Builder for [`PropertyDescriptor`].
pub struct PropertyBuilder<D, V> {
	name: Cow<'static, str>,
	visibility: Visibility,
	markers: Markers,
	read: Option<ReadFn<D, V>>,
	write: Option<WriteFn<D, V>>,
}

impl<D: 'static, V: 'static> PropertyBuilder<D, V> {
	/// Sets the instance read function.
	pub fn getter(mut self, get: fn(&D) -> V) -> Self {
		self.read = Some(ReadFn::Instance(get));
		self
	}

	/// Sets the instance write function.
	pub fn setter(mut self, set: fn(&mut D, V)) -> Self {
		self.write = Some(WriteFn::Instance(set));
		self
	}

	/// Sets a read function that does not need an instance.
	pub fn static_getter(mut self, get: fn() -> V) -> Self {
		self.read = Some(ReadFn::Static(get));
		self
	}

	/// Sets a write function that does not need an instance.
	pub fn static_setter(mut self, set: fn(V)) -> Self {
		self.write = Some(WriteFn::Static(set));
		self
	}

	pub fn visibility(mut self, visibility: Visibility) -> Self {
		self.visibility = visibility;
		self
	}

	pub fn non_public(self) -> Self {
		self.visibility(Visibility::NonPublic)
	}

	/// Attaches a marker after any previously attached ones.
	pub fn marker<M: Marker>(mut self, marker: M) -> Self {
		self.markers.push(marker);
		self
	}

	pub fn build(self) -> PropertyDescriptor {
		let read_static = self.read.map(|read| matches!(read, ReadFn::Static(_)));
		let write_static = self.write.map(|write| matches!(write, WriteFn::Static(_)));
		let is_static = read_static == Some(true) || write_static == Some(true);
		let mixed_kinds = matches!((read_static, write_static), (Some(r), Some(w)) if r != w);
		let read = self.read.map(|read| ReadSlot::new(&self.name, read));
		let write = self.write.map(|write| WriteSlot::new(&self.name, write));
		PropertyDescriptor {
			name: self.name,
			declaring: None,
			receiver: TypeKey::of::<D>(),
			value: TypeKey::of::<V>(),
			visibility: self.visibility,
			is_static,
			mixed_kinds,
			markers: self.markers,
			read,
			write,
		}
	}
}
