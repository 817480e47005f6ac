//! Lazy assignability filter over type descriptors.

use std::sync::Arc;

use crate::meta::{TypeDescriptor, TypeKey};

/// Anything that hands out a [`TypeDescriptor`].
pub trait DescriptorRef {
	fn descriptor(&self) -> &TypeDescriptor;
}

impl DescriptorRef for &TypeDescriptor {
	fn descriptor(&self) -> &TypeDescriptor {
		self
	}
}

impl DescriptorRef for Arc<TypeDescriptor> {
	fn descriptor(&self) -> &TypeDescriptor {
		self
	}
}

impl DescriptorRef for &Arc<TypeDescriptor> {
	fn descriptor(&self) -> &TypeDescriptor {
		self
	}
}

/// Iterator returned by [`of_type`] and [`of_key`].
///
/// Evaluates the predicate as the input is pulled; nothing is collected.
/// Cloning it (when the input iterator is `Clone`) yields a fresh pass that
/// re-evaluates every item.
#[derive(Debug, Clone)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct OfType<I> {
	inner: I,
	target: TypeKey,
	include_abstract: bool,
}

impl<I> OfType<I> {
	/// Returns the key descriptors are matched against.
	pub fn target(&self) -> TypeKey {
		self.target
	}
}

impl<I> Iterator for OfType<I>
where
	I: Iterator,
	I::Item: DescriptorRef,
{
	type Item = I::Item;

	fn next(&mut self) -> Option<Self::Item> {
		let target = self.target;
		let include_abstract = self.include_abstract;
		self.inner.find(|item| {
			let desc = item.descriptor();
			(include_abstract || !desc.is_abstract()) && desc.is_assignable_to(target)
		})
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		(0, self.inner.size_hint().1)
	}
}

/// Yields the descriptors assignable to `T`, in input order.
///
/// Abstract descriptors are skipped unless `include_abstract` is set.
pub fn of_type<T, I>(types: I, include_abstract: bool) -> OfType<I::IntoIter>
where
	T: ?Sized + 'static,
	I: IntoIterator,
	I::Item: DescriptorRef,
{
	of_key(types, TypeKey::of::<T>(), include_abstract)
}

/// Runtime-keyed form of [`of_type`].
pub fn of_key<I>(types: I, target: TypeKey, include_abstract: bool) -> OfType<I::IntoIter>
where
	I: IntoIterator,
	I::Item: DescriptorRef,
{
	OfType {
		inner: types.into_iter(),
		target,
		include_abstract,
	}
}
