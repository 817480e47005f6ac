//! Procedural macros for strata type descriptors.
//!
//! Provides `#[derive(Reflect)]`, which builds a `TypeDescriptor` for a
//! struct and registers it with the process domain at link time.

use proc_macro::TokenStream;

/// Reflect derive macro implementation.
mod reflect;

/// Derives `strata_reflect::Describe` and registers the type.
///
/// Container attributes:
/// * `#[reflect(name = "..")]` - descriptor name, defaults to the struct name
/// * `#[reflect(module = "..")]` - registration module, defaults to `module_path!()`
/// * `#[reflect(abstract)]` - excluded from non-abstract filtering
/// * `#[reflect(implements(dyn Trait, ..))]` - capabilities the type is assignable to
/// * `#[reflect(extends(Base, ..))]` - inherit the assignability of a described base
/// * `#[reflect(marker = expr)]` - type-level marker, repeatable
///
/// Field attributes:
/// * `#[reflect(skip)]` - no property for this field
/// * `#[reflect(rename = "..")]` - property name, defaults to the field name
/// * `#[reflect(read_only)]` / `#[reflect(write_only)]` - omit the setter or getter
/// * `#[reflect(marker = expr)]` - property marker, repeatable, order preserved
///
/// Getters clone the field, so readable field types must be `Clone`.
///
/// ```ignore
/// #[derive(Reflect)]
/// #[reflect(module = "models", implements(dyn Entity))]
/// pub struct User {
///     #[reflect(marker = Column("user_id"), marker = Key)]
///     pub id: u64,
///     #[reflect(rename = "display_name")]
///     name: String,
///     #[reflect(skip)]
///     scratch: Vec<u8>,
/// }
/// ```
#[proc_macro_derive(Reflect, attributes(reflect))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
	reflect::derive_reflect(input)
}
