#![allow(dead_code)]

use std::cell::Cell;
use std::sync::{Arc, OnceLock};

use super::{Describe, PropertyDescriptor, TypeDescriptor};

pub(crate) trait Shape {}
pub(crate) trait Named {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Column(pub &'static str);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Required;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Point {
	pub x: i32,
	pub y: i32,
	pub label: String,
}

thread_local! {
	static SCALE: Cell<i32> = const { Cell::new(1) };
}

/// `Point` with public `x`/`y`, non-public `label`, read-only `area`,
/// write-only `reset` and static `scale`.
pub(crate) fn point_descriptor() -> TypeDescriptor {
	TypeDescriptor::builder::<Point>()
		.name("Point")
		.implements::<dyn Shape>()
		.property(
			PropertyDescriptor::builder::<Point, i32>("x")
				.getter(|p| p.x)
				.setter(|p, v| p.x = v)
				.marker(Column("x"))
				.build(),
		)
		.property(
			PropertyDescriptor::builder::<Point, i32>("y")
				.getter(|p| p.y)
				.setter(|p, v| p.y = v)
				.marker(Column("y"))
				.marker(Required)
				.build(),
		)
		.property(
			PropertyDescriptor::builder::<Point, String>("label")
				.getter(|p| p.label.clone())
				.setter(|p, v| p.label = v)
				.non_public()
				.marker(Column("label"))
				.build(),
		)
		.property(PropertyDescriptor::builder::<Point, i32>("area").getter(|p| p.x * p.y).build())
		.property(
			PropertyDescriptor::builder::<Point, bool>("reset")
				.setter(|p, v| {
					if v {
						*p = Point::default();
					}
				})
				.build(),
		)
		.property(
			PropertyDescriptor::builder::<Point, i32>("scale")
				.static_getter(|| SCALE.with(Cell::get))
				.static_setter(|v| SCALE.with(|s| s.set(v)))
				.marker(Column("scale"))
				.build(),
		)
		.build()
		.expect("point descriptor is valid")
}

pub(crate) struct Abstract1;
pub(crate) struct Concrete1;
pub(crate) struct Concrete2;

/// `[Abstract1 (abstract, Shape), Concrete1 (Shape), Concrete2]`.
pub(crate) fn shape_family() -> Vec<TypeDescriptor> {
	vec![
		TypeDescriptor::builder::<Abstract1>()
			.name("Abstract1")
			.abstract_type()
			.implements::<dyn Shape>()
			.build()
			.expect("valid"),
		TypeDescriptor::builder::<Concrete1>()
			.name("Concrete1")
			.implements::<dyn Shape>()
			.build()
			.expect("valid"),
		TypeDescriptor::builder::<Concrete2>().name("Concrete2").build().expect("valid"),
	]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct M1(pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct M2;

#[derive(Debug, Default)]
pub(crate) struct Record {
	pub a: u8,
	pub b: u8,
	pub c: u8,
}

/// `Record` with properties `[a (M1(1)), b, c (M2, M1(3))]`.
pub(crate) fn record_descriptor() -> TypeDescriptor {
	TypeDescriptor::builder::<Record>()
		.name("Record")
		.property(PropertyDescriptor::builder::<Record, u8>("a").getter(|r| r.a).marker(M1(1)).build())
		.property(PropertyDescriptor::builder::<Record, u8>("b").getter(|r| r.b).build())
		.property(
			PropertyDescriptor::builder::<Record, u8>("c")
				.getter(|r| r.c)
				.marker(M2)
				.marker(M1(3))
				.build(),
		)
		.build()
		.expect("record descriptor is valid")
}

impl Describe for Point {
	fn describe() -> Arc<TypeDescriptor> {
		static DESC: OnceLock<Arc<TypeDescriptor>> = OnceLock::new();
		DESC.get_or_init(|| Arc::new(point_descriptor())).clone()
	}
}

impl Describe for Record {
	fn describe() -> Arc<TypeDescriptor> {
		static DESC: OnceLock<Arc<TypeDescriptor>> = OnceLock::new();
		DESC.get_or_init(|| Arc::new(record_descriptor())).clone()
	}
}
