use std::any::Any;
use std::sync::Arc;

use super::ty::TypeDescriptor;

/// Types with a registered descriptor.
///
/// Usually implemented by `#[derive(Reflect)]`. Implementations must return
/// the same descriptor on every call.
pub trait Describe: 'static {
	fn describe() -> Arc<TypeDescriptor>;
}

/// Object-safe access to the descriptor of a value's runtime type.
///
/// Through `&dyn Reflect` the descriptor is the one of the concrete type behind
/// the trait object, not of the static type at the call site.
pub trait Reflect: Any + Send + Sync {
	fn type_descriptor(&self) -> Arc<TypeDescriptor>;

	fn as_any(&self) -> &dyn Any;

	fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T> Reflect for T
where
	T: Describe + Send + Sync,
{
	fn type_descriptor(&self) -> Arc<TypeDescriptor> {
		T::describe()
	}

	fn as_any(&self) -> &dyn Any {
		self
	}

	fn as_any_mut(&mut self) -> &mut dyn Any {
		self
	}
}
