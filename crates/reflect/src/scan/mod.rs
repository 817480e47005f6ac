//! Scans a type for properties carrying a marker of a given kind.

use std::sync::Arc;

use crate::meta::{BindingFlags, Marker, PropertyDescriptor, Reflect, TypeDescriptor};

/// A property paired with the first of its markers of kind `M`.
#[derive(Debug)]
pub struct Attributed<M> {
	pub marker: Arc<M>,
	pub property: Arc<PropertyDescriptor>,
}

impl<M> Clone for Attributed<M> {
	fn clone(&self) -> Self {
		Self {
			marker: Arc::clone(&self.marker),
			property: Arc::clone(&self.property),
		}
	}
}

/// Returns the properties of `ty` visible under `scope` that carry a marker of
/// kind `M`, each paired with the first such marker.
///
/// Property order follows declaration order. Properties without a matching
/// marker are left out.
///
/// A marker matches only when its concrete type is exactly `M`. Marker kinds
/// have no inheritance: a marker that wraps or converts into `M` is not a match.
pub fn attributed_properties<M: Marker>(ty: &TypeDescriptor, scope: BindingFlags) -> Vec<Attributed<M>> {
	ty.properties()
		.iter()
		.filter(|property| scope.admits(property.visibility(), property.is_static()))
		.filter_map(|property| {
			property.marker::<M>().map(|marker| Attributed {
				marker,
				property: Arc::clone(property),
			})
		})
		.collect()
}

/// Scans the runtime type of `instance`.
pub fn attributed_properties_of<M: Marker>(instance: &dyn Reflect, scope: BindingFlags) -> Vec<Attributed<M>> {
	attributed_properties(&instance.type_descriptor(), scope)
}

#[cfg(test)]
mod tests;
