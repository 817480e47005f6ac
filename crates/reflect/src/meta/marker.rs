//! Marker values attached to properties and types.

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

/// A value decorating a property or a type. Its kind is its concrete type.
///
/// Implemented for every `'static + Send + Sync + Debug` type.
pub trait Marker: Any + Send + Sync + fmt::Debug {
	/// Returns `self` as [`Any`] for kind checks.
	fn kind_any(&self) -> &dyn Any;

	/// Converts the shared marker into a shared [`Any`] for downcasting.
	fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;

	/// Returns the name of the marker kind.
	fn kind_name(&self) -> &'static str;
}

impl<T> Marker for T
where
	T: Any + Send + Sync + fmt::Debug,
{
	fn kind_any(&self) -> &dyn Any {
		self
	}

	fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
		self
	}

	fn kind_name(&self) -> &'static str {
		type_name::<T>()
	}
}

/// Ordered list of markers. Declaration order is preserved.
#[derive(Clone, Default)]
pub struct Markers(Vec<Arc<dyn Marker>>);

impl Markers {
	/// Appends a marker.
	pub fn push<M: Marker>(&mut self, marker: M) {
		self.0.push(Arc::new(marker));
	}

	/// Appends an already shared marker.
	pub fn push_shared(&mut self, marker: Arc<dyn Marker>) {
		self.0.push(marker);
	}

	/// Returns the first marker whose concrete type is exactly `M`.
	pub fn first<M: Marker>(&self) -> Option<Arc<M>> {
		self.0.iter().find_map(|marker| {
			// Deref through the Arc: `Arc<dyn Marker>` is itself a marker.
			if !(**marker).kind_any().is::<M>() {
				return None;
			}
			Arc::clone(marker).into_any_arc().downcast::<M>().ok()
		})
	}

	/// Returns true if any marker is of kind `M`.
	pub fn contains<M: Marker>(&self) -> bool {
		self.0.iter().any(|marker| (**marker).kind_any().is::<M>())
	}

	/// Iterates markers in declaration order.
	pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Marker>> {
		self.0.iter()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl fmt::Debug for Markers {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(self.0.iter()).finish()
	}
}
