use std::sync::Arc;

use pretty_assertions::assert_eq;

use super::{attributed_properties, attributed_properties_of};
use crate::meta::test_fixtures::{Column, M1, M2, Point, Record, Required, point_descriptor, record_descriptor};
use crate::meta::{BindingFlags, PropertyDescriptor, Reflect, TypeDescriptor};

#[test]
fn test_first_matching_marker_in_declaration_order() {
	let desc = record_descriptor();
	let found = attributed_properties::<M1>(&desc, BindingFlags::default());

	let pairs: Vec<_> = found.iter().map(|a| (*a.marker, a.property.name())).collect();
	assert_eq!(pairs, [(M1(1), "a"), (M1(3), "c")]);

	let m2 = attributed_properties::<M2>(&desc, BindingFlags::default());
	assert_eq!(m2.len(), 1);
	assert_eq!(m2[0].property.name(), "c");
}

#[test]
fn test_result_is_reiterable() {
	let desc = record_descriptor();
	let found = attributed_properties::<M1>(&desc, BindingFlags::default());
	assert_eq!(found.iter().count(), 2);
	assert_eq!(found.iter().count(), 2);
	assert!(Arc::ptr_eq(&found[0].property, &desc.properties()[0]));
}

#[test]
fn test_no_matching_marker_is_empty() {
	let desc = record_descriptor();
	assert!(attributed_properties::<Required>(&desc, BindingFlags::all()).is_empty());
}

#[test]
fn test_binding_scope_filters_visibility_and_staticness() {
	let desc = point_descriptor();
	let scan = |scope| -> Vec<String> {
		attributed_properties::<Column>(&desc, scope)
			.into_iter()
			.map(|a| a.property.name().to_string())
			.collect()
	};

	assert_eq!(scan(BindingFlags::default()), ["x", "y"]);
	assert_eq!(scan(BindingFlags::NON_PUBLIC | BindingFlags::INSTANCE), ["label"]);
	assert_eq!(scan(BindingFlags::PUBLIC | BindingFlags::STATIC), ["scale"]);
	assert_eq!(scan(BindingFlags::all()), ["x", "y", "label", "scale"]);
	assert!(scan(BindingFlags::PUBLIC).is_empty());
}

#[test]
fn test_marker_value_is_shared() {
	let desc = point_descriptor();
	let found = attributed_properties::<Column>(&desc, BindingFlags::default());
	let again = desc.property("x").unwrap().marker::<Column>().unwrap();
	assert!(Arc::ptr_eq(&found[0].marker, &again));
}

/// Instance scans go through the runtime type behind the trait object.
#[test]
fn test_instance_scan_uses_runtime_type() {
	let values: Vec<Box<dyn Reflect>> = vec![Box::new(Point::default()), Box::new(Record::default())];
	let columns: Vec<usize> = values
		.iter()
		.map(|v| attributed_properties_of::<Column>(&**v, BindingFlags::default()).len())
		.collect();
	assert_eq!(columns, [2, 0]);

	let m1 = attributed_properties_of::<M1>(&*values[1], BindingFlags::default());
	assert_eq!(m1.len(), 2);
}

/// Only markers whose concrete type is exactly `M` match; wrappers do not.
#[test]
fn test_marker_kind_is_matched_exactly() {
	#[derive(Debug)]
	struct Wrapped(M1);

	let desc = TypeDescriptor::builder::<Record>()
		.property(
			PropertyDescriptor::builder::<Record, u8>("a")
				.getter(|r| r.a)
				.marker(Wrapped(M1(9)))
				.build(),
		)
		.build()
		.unwrap();

	assert!(attributed_properties::<M1>(&desc, BindingFlags::default()).is_empty());
	let wrapped = attributed_properties::<Wrapped>(&desc, BindingFlags::default());
	assert_eq!(wrapped.len(), 1);
	assert_eq!(wrapped[0].marker.0, M1(9));
}
