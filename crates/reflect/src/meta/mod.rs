//! Descriptor model: type keys, type and property descriptors, markers.
//!
//! # Mental Model
//!
//! Rust has no runtime reflection, so every type that takes part is
//! registered explicitly, either by hand through [`TypeDescriptor::builder`]
//! or by `#[derive(Reflect)]`. A registered [`TypeDescriptor`] is immutable
//! and shared as `Arc<TypeDescriptor>` for the rest of the process.
//!
//! Properties carry the accessor functions captured at registration. A
//! [`PropertyDescriptor`] built on its own is *detached*: it gets a declaring
//! type only when added to a type descriptor.
//!
//! Assignability is closed at build time. A descriptor lists every capability
//! it implements and every base it extends, including what those bases
//! extend, so a check is a slice scan with no registry lookup.

mod key;
mod marker;
mod property;
mod reflect;
mod ty;

pub use key::TypeKey;
pub use marker::{Marker, Markers};
pub(crate) use property::{ErasedRead, ErasedWrite, ReadFn, WriteFn};
pub use property::{BindingFlags, PropertyBuilder, PropertyDescriptor, Visibility};
pub use reflect::{Describe, Reflect};
pub use ty::{TypeDescriptor, TypeDescriptorBuilder};

#[cfg(test)]
pub(crate) mod test_fixtures;
