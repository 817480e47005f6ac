//! Reflect derive macro implementation.

use std::collections::HashMap;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::parse::Parse;
use syn::punctuated::Punctuated;
use syn::{Attribute, Data, DeriveInput, Expr, Fields, LitStr, Token, Type, Visibility, parse_macro_input};

/// Container-level `#[reflect(...)]` settings.
#[derive(Default)]
struct ContainerAttrs {
	name: Option<LitStr>,
	module: Option<LitStr>,
	is_abstract: bool,
	implements: Vec<Type>,
	extends: Vec<syn::Path>,
	markers: Vec<Expr>,
}

/// Field-level `#[reflect(...)]` settings.
#[derive(Default)]
struct FieldAttrs {
	skip: bool,
	rename: Option<LitStr>,
	read_only: bool,
	write_only: bool,
	markers: Vec<Expr>,
}

/// Entry point for the `#[derive(Reflect)]` macro.
pub fn derive_reflect(input: TokenStream) -> TokenStream {
	let input = parse_macro_input!(input as DeriveInput);
	expand(&input).unwrap_or_else(|e| e.to_compile_error()).into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
	if !input.generics.params.is_empty() {
		return Err(syn::Error::new_spanned(
			&input.generics,
			"Reflect cannot be derived for generic types",
		));
	}

	let Data::Struct(data) = &input.data else {
		return Err(syn::Error::new_spanned(
			&input.ident,
			"Reflect can only be derived for structs",
		));
	};
	let Fields::Named(fields) = &data.fields else {
		return Err(syn::Error::new_spanned(
			&data.fields,
			"Reflect requires a struct with named fields",
		));
	};

	let container = parse_container_attrs(&input.attrs)?;
	let ident = &input.ident;

	let mut seen: HashMap<String, &syn::Ident> = HashMap::new();
	let mut properties = Vec::new();
	for field in &fields.named {
		let attrs = parse_field_attrs(&field.attrs)?;
		if attrs.skip {
			continue;
		}
		let Some(field_ident) = &field.ident else {
			continue;
		};
		if attrs.read_only && attrs.write_only {
			return Err(syn::Error::new_spanned(
				field_ident,
				"a property cannot be both read_only and write_only",
			));
		}

		let name = attrs
			.rename
			.as_ref()
			.map(LitStr::value)
			.unwrap_or_else(|| field_ident.to_string());
		if name.is_empty() {
			return Err(syn::Error::new_spanned(field_ident, "property name cannot be empty"));
		}
		if let Some(previous) = seen.insert(name.clone(), field_ident) {
			return Err(syn::Error::new_spanned(
				field_ident,
				format!("property `{name}` is already declared by field `{previous}`"),
			));
		}

		let ty = &field.ty;
		let getter = (!attrs.write_only).then(|| {
			quote! { .getter(|this: &Self| ::core::clone::Clone::clone(&this.#field_ident)) }
		});
		let setter = (!attrs.read_only).then(|| {
			quote! { .setter(|this: &mut Self, value: #ty| this.#field_ident = value) }
		});
		let visibility = match field.vis {
			Visibility::Public(_) => quote! { ::strata_reflect::Visibility::Public },
			_ => quote! { ::strata_reflect::Visibility::NonPublic },
		};
		let markers = &attrs.markers;

		properties.push(quote! {
			.property(
				::strata_reflect::PropertyDescriptor::builder::<Self, #ty>(#name)
					#getter
					#setter
					.visibility(#visibility)
					#(.marker(#markers))*
					.build()
			)
		});
	}

	let name = container
		.name
		.as_ref()
		.map(LitStr::value)
		.unwrap_or_else(|| ident.to_string());
	let module = match &container.module {
		Some(module) => quote! { #module },
		None => quote! { ::core::module_path!() },
	};
	let is_abstract = container.is_abstract.then(|| quote! { .abstract_type() });
	let implements = &container.implements;
	let extends = &container.extends;
	let type_markers = &container.markers;

	Ok(quote! {
		impl ::strata_reflect::Describe for #ident {
			fn describe() -> ::std::sync::Arc<::strata_reflect::TypeDescriptor> {
				static DESCRIPTOR: ::std::sync::OnceLock<::std::sync::Arc<::strata_reflect::TypeDescriptor>> =
					::std::sync::OnceLock::new();
				::std::sync::Arc::clone(DESCRIPTOR.get_or_init(|| {
					::std::sync::Arc::new(
						::strata_reflect::TypeDescriptor::builder::<Self>()
							.name(#name)
							#is_abstract
							#(.implements::<#implements>())*
							#(.extends(&<#extends as ::strata_reflect::Describe>::describe()))*
							#(.marker(#type_markers))*
							#(#properties)*
							.build_derived()
					)
				}))
			}
		}

		::strata_reflect::__submit_type!(#module, #ident);
	})
}

fn parse_container_attrs(attrs: &[Attribute]) -> syn::Result<ContainerAttrs> {
	let mut out = ContainerAttrs::default();
	for attr in attrs.iter().filter(|a| a.path().is_ident("reflect")) {
		attr.parse_nested_meta(|meta| {
			if meta.path.is_ident("name") {
				out.name = Some(meta.value()?.parse()?);
				Ok(())
			} else if meta.path.is_ident("module") {
				out.module = Some(meta.value()?.parse()?);
				Ok(())
			} else if meta.path.is_ident("abstract") {
				out.is_abstract = true;
				Ok(())
			} else if meta.path.is_ident("implements") {
				let content;
				syn::parenthesized!(content in meta.input);
				let types: Punctuated<Type, Token![,]> = content.parse_terminated(Type::parse, Token![,])?;
				out.implements.extend(types);
				Ok(())
			} else if meta.path.is_ident("extends") {
				meta.parse_nested_meta(|base| {
					out.extends.push(base.path);
					Ok(())
				})
			} else if meta.path.is_ident("marker") {
				out.markers.push(meta.value()?.parse()?);
				Ok(())
			} else {
				Err(meta.error("unknown reflect container attribute"))
			}
		})?;
	}
	Ok(out)
}

fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
	let mut out = FieldAttrs::default();
	for attr in attrs.iter().filter(|a| a.path().is_ident("reflect")) {
		attr.parse_nested_meta(|meta| {
			if meta.path.is_ident("skip") {
				out.skip = true;
				Ok(())
			} else if meta.path.is_ident("rename") {
				out.rename = Some(meta.value()?.parse()?);
				Ok(())
			} else if meta.path.is_ident("read_only") {
				out.read_only = true;
				Ok(())
			} else if meta.path.is_ident("write_only") {
				out.write_only = true;
				Ok(())
			} else if meta.path.is_ident("marker") {
				out.markers.push(meta.value()?.parse()?);
				Ok(())
			} else {
				Err(meta.error("unknown reflect field attribute"))
			}
		})?;
	}
	Ok(out)
}
