//! Type descriptors.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashSet;

use super::key::TypeKey;
use super::marker::{Marker, Markers};
use super::property::PropertyDescriptor;
use crate::error::{Error, Result};

/// Immutable metadata of one registered type.
pub struct TypeDescriptor {
	key: TypeKey,
	name: Cow<'static, str>,
	is_abstract: bool,
	assignable_to: Vec<TypeKey>,
	properties: Vec<Arc<PropertyDescriptor>>,
	markers: Markers,
}

impl TypeDescriptor {
	/// Starts a descriptor for `T`. `T` may be a trait object for abstract
	/// capability types.
	pub fn builder<T: ?Sized + 'static>() -> TypeDescriptorBuilder {
		let key = TypeKey::of::<T>();
		TypeDescriptorBuilder {
			key,
			name: Cow::Borrowed(key.name()),
			is_abstract: false,
			assignable_to: Vec::new(),
			properties: Vec::new(),
			markers: Markers::default(),
		}
	}

	pub fn key(&self) -> TypeKey {
		self.key
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn is_abstract(&self) -> bool {
		self.is_abstract
	}

	/// Returns every key this type is assignable to, excluding its own.
	pub fn assignable_to(&self) -> &[TypeKey] {
		&self.assignable_to
	}

	/// Returns true if a value of this type satisfies `target`: exact match,
	/// implemented capability, or extended base.
	pub fn is_assignable_to(&self, target: TypeKey) -> bool {
		self.key == target || self.assignable_to.contains(&target)
	}

	/// Typed form of [`Self::is_assignable_to`].
	pub fn is<T: ?Sized + 'static>(&self) -> bool {
		self.is_assignable_to(TypeKey::of::<T>())
	}

	/// Returns the declared properties in declaration order.
	pub fn properties(&self) -> &[Arc<PropertyDescriptor>] {
		&self.properties
	}

	/// Looks a property up by name.
	pub fn property(&self, name: &str) -> Option<&Arc<PropertyDescriptor>> {
		self.properties.iter().find(|p| p.name() == name)
	}

	/// Returns the type-level markers in declaration order.
	pub fn markers(&self) -> &Markers {
		&self.markers
	}

	/// Returns the first type-level marker of kind `M`.
	pub fn marker<M: Marker>(&self) -> Option<Arc<M>> {
		self.markers.first::<M>()
	}

	/// Reads a property by name.
	///
	/// Resolves the property on every call. Compile an accessor with
	/// [`crate::accessor::compile_dyn_getter`] for repeated access.
	pub fn get_value(&self, instance: &dyn Any, name: &str) -> Result<Option<Box<dyn Any>>> {
		let property = self.require_property(name)?;
		match property.read_slot() {
			Some(slot) => (slot.erased)(instance).map(Some),
			None => Ok(None),
		}
	}

	/// Writes a property by name. Returns `false` if the property is not writable.
	pub fn set_value(&self, instance: &mut dyn Any, name: &str, value: Box<dyn Any>) -> Result<bool> {
		let property = self.require_property(name)?;
		match property.write_slot() {
			Some(slot) => (slot.erased)(instance, value).map(|()| true),
			None => Ok(false),
		}
	}

	fn require_property(&self, name: &str) -> Result<&Arc<PropertyDescriptor>> {
		self.property(name)
			.ok_or_else(|| Error::invalid_argument("name", format!("`{}` has no property `{name}`", self.name)))
	}
}

impl fmt::Debug for TypeDescriptor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TypeDescriptor")
			.field("name", &self.name)
			.field("is_abstract", &self.is_abstract)
			.field("assignable_to", &self.assignable_to)
			.field("properties", &self.properties)
			.field("markers", &self.markers)
			.finish()
	}
}

/// Builder for [`TypeDescriptor`].
pub struct TypeDescriptorBuilder {
	key: TypeKey,
	name: Cow<'static, str>,
	is_abstract: bool,
	assignable_to: Vec<TypeKey>,
	properties: Vec<PropertyDescriptor>,
	markers: Markers,
}

impl TypeDescriptorBuilder {
	/// Overrides the display name (defaults to the compiler type name).
	pub fn name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
		self.name = name.into();
		self
	}

	/// Marks the type abstract: filters skip it unless asked to include abstract types.
	pub fn abstract_type(mut self) -> Self {
		self.is_abstract = true;
		self
	}

	/// Declares that the type satisfies capability `C`, usually a `dyn Trait`.
	pub fn implements<C: ?Sized + 'static>(mut self) -> Self {
		self.assignable_to.push(TypeKey::of::<C>());
		self
	}

	/// Declares `base` as a supertype. Everything `base` is assignable to is
	/// inherited.
	pub fn extends(mut self, base: &TypeDescriptor) -> Self {
		self.assignable_to.push(base.key);
		self.assignable_to.extend_from_slice(&base.assignable_to);
		self
	}

	/// Adds a property after the ones already added.
	pub fn property(mut self, property: PropertyDescriptor) -> Self {
		self.properties.push(property);
		self
	}

	pub fn properties(mut self, properties: impl IntoIterator<Item = PropertyDescriptor>) -> Self {
		self.properties.extend(properties);
		self
	}

	/// Attaches a type-level marker.
	pub fn marker<M: Marker>(mut self, marker: M) -> Self {
		self.markers.push(marker);
		self
	}

	/// Validates and attaches the properties.
	///
	/// Fails with [`Error::InvalidArgument`] on an empty or duplicate property
	/// name, on a property whose accessors operate on another type, or on a
	/// property mixing a static accessor with an instance one.
	pub fn build(self) -> Result<TypeDescriptor> {
		let mut seen = FxHashSet::default();
		for property in &self.properties {
			if property.name().is_empty() {
				return Err(Error::invalid_argument("property", format!("empty property name on `{}`", self.name)));
			}
			if property.receiver_type() != self.key {
				return Err(Error::invalid_argument(
					"property",
					format!(
						"`{}` operates on `{}` but is registered on `{}`",
						property.name(),
						property.receiver_type(),
						self.key
					),
				));
			}
			if property.has_mixed_kinds() {
				return Err(Error::invalid_argument(
					"property",
					format!("`{}` mixes a static and an instance accessor", property.name()),
				));
			}
			if !seen.insert(property.name()) {
				return Err(Error::invalid_argument(
					"property",
					format!("duplicate property `{}` on `{}`", property.name(), self.name),
				));
			}
		}
		Ok(self.finish())
	}

	/// Builds without validation. Used by generated descriptors whose
	/// properties come from distinct fields of the type itself.
	#[doc(hidden)]
	pub fn build_derived(self) -> TypeDescriptor {
		self.finish()
	}

	fn finish(self) -> TypeDescriptor {
		let key = self.key;
		let mut seen = FxHashSet::default();
		let assignable_to = self
			.assignable_to
			.into_iter()
			.filter(|k| *k != key && seen.insert(*k))
			.collect();
		let properties = self
			.properties
			.into_iter()
			.map(|mut property| {
				property.attach(key);
				Arc::new(property)
			})
			.collect();
		TypeDescriptor {
			key,
			name: self.name,
			is_abstract: self.is_abstract,
			assignable_to,
			properties,
			markers: self.markers,
		}
	}
}
