//! Integration tests for `#[derive(Reflect)]`.
//!
//! These tests verify that derived descriptors carry the declared metadata,
//! land in the process domain through link-time registration, and work with
//! the filter, scanner and accessor compiler like hand-built descriptors.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use strata_reflect::accessor::{compile_dyn_getter, compile_getter, compile_setter};
use strata_reflect::{
	BindingFlags, Describe, Domain, Reflect, TypeKey, Visibility, all_types, all_types_of,
	attributed_properties_of, of_type,
};

trait Entity {}

#[derive(Debug, PartialEq, Eq)]
struct Table(&'static str);

#[derive(Debug, PartialEq, Eq)]
struct Column(&'static str);

#[derive(Debug)]
struct Key;

#[derive(Debug, Clone, Default, Reflect)]
#[reflect(module = "models", implements(dyn Entity), marker = Table("users"))]
pub struct User {
	#[reflect(marker = Column("user_id"), marker = Key)]
	pub id: u64,
	#[reflect(rename = "display_name", marker = Column("name"))]
	name: String,
	#[reflect(skip)]
	#[allow(dead_code)]
	scratch: Vec<u8>,
	#[reflect(read_only)]
	pub created: u64,
	#[reflect(write_only)]
	pub password: String,
}

#[derive(Debug, Clone, Default, Reflect)]
#[reflect(module = "models", abstract)]
pub struct Base {
	pub revision: u32,
}

#[derive(Debug, Clone, Default, Reflect)]
#[reflect(module = "models", name = "AdminUser", extends(Base), implements(dyn Entity))]
pub struct Admin {
	pub level: u8,
}

#[derive(Debug, Clone, Default, Reflect)]
struct Unscoped {
	value: i32,
}

fn names<'a>(props: impl IntoIterator<Item = &'a Arc<strata_reflect::PropertyDescriptor>>) -> Vec<String> {
	props.into_iter().map(|p| p.name().to_string()).collect()
}

#[test]
fn test_derived_descriptor_shape() {
	let user = User::describe();

	assert_eq!(user.name(), "User");
	assert_eq!(user.key(), TypeKey::of::<User>());
	assert!(!user.is_abstract());
	assert_eq!(user.marker::<Table>().as_deref(), Some(&Table("users")));
	assert_eq!(
		names(user.properties()),
		["id", "display_name", "created", "password"]
	);

	let id = user.property("id").unwrap();
	assert_eq!(id.visibility(), Visibility::Public);
	assert_eq!(id.declaring_type(), Some(TypeKey::of::<User>()));
	assert_eq!(id.value_type(), TypeKey::of::<u64>());
	assert_eq!(id.marker::<Column>().as_deref(), Some(&Column("user_id")));
	assert!(id.markers().contains::<Key>());

	let display = user.property("display_name").unwrap();
	assert_eq!(display.visibility(), Visibility::NonPublic);
	assert!(display.can_read() && display.can_write());

	let created = user.property("created").unwrap();
	assert!(created.can_read() && !created.can_write());

	let password = user.property("password").unwrap();
	assert!(!password.can_read() && password.can_write());

	assert!(user.property("scratch").is_none());
}

#[test]
fn test_describe_returns_the_same_descriptor() {
	assert!(Arc::ptr_eq(&User::describe(), &User::describe()));
}

#[test]
fn test_derived_assignability() {
	let admin = Admin::describe();

	assert_eq!(admin.name(), "AdminUser");
	assert!(Base::describe().is_abstract());
	assert!(admin.is::<Admin>());
	assert!(admin.is::<Base>());
	assert!(admin.is::<dyn Entity>());
	assert!(User::describe().is::<dyn Entity>());
	assert!(!User::describe().is::<Base>());
}

#[test]
fn test_derived_types_are_registered_with_the_process_domain() {
	let process = Domain::process();
	let modules = process.modules();

	let models = modules.iter().find(|m| m.name() == "models").unwrap();
	let registered: Vec<&str> = models.types().iter().map(|t| t.name()).collect();
	assert_eq!(registered, ["AdminUser", "Base", "User"]);

	let default_module = modules.iter().find(|m| m.name() == module_path!()).unwrap();
	assert_eq!(default_module.len(), 1);
	assert_eq!(default_module.types()[0].name(), "Unscoped");

	let types = all_types(process);
	let user = types.get(TypeKey::of::<User>()).unwrap();
	assert!(Arc::ptr_eq(user, &User::describe()));
	assert!(types.contains(TypeKey::of::<Unscoped>()));
}

#[test]
fn test_process_domain_filtering() {
	let process = Domain::process();

	let types = all_types(process);
	let mut entities: Vec<&str> = of_type::<dyn Entity, _>(types.iter(), false)
		.map(|t| t.name())
		.collect();
	entities.sort_unstable();
	assert_eq!(entities, ["AdminUser", "User"]);

	let concrete: Vec<TypeKey> = all_types_of::<Base>(process, false).map(|t| t.key()).collect();
	assert_eq!(concrete, [TypeKey::of::<Admin>()]);

	let with_abstract = all_types_of::<Base>(process, true).count();
	assert_eq!(with_abstract, 2);
}

#[test]
fn test_scan_through_runtime_type() {
	let user = User::default();
	let instance: &dyn Reflect = &user;

	let public = attributed_properties_of::<Column>(instance, BindingFlags::default());
	assert_eq!(public.len(), 1);
	assert_eq!(public[0].property.name(), "id");
	assert_eq!(*public[0].marker, Column("user_id"));

	let all = attributed_properties_of::<Column>(
		instance,
		BindingFlags::PUBLIC | BindingFlags::NON_PUBLIC | BindingFlags::INSTANCE,
	);
	let found: Vec<(&str, &str)> = all.iter().map(|a| (a.property.name(), a.marker.0)).collect();
	assert_eq!(found, [("id", "user_id"), ("display_name", "name")]);
}

#[test]
fn test_compiled_accessors_on_derived_fields() {
	let desc = User::describe();
	let mut user = User {
		name: "ada".to_string(),
		..User::default()
	};

	let id = desc.property("id").unwrap();
	let get = compile_getter::<User, u64>(id).unwrap().unwrap();
	let set = compile_setter::<User, u64>(id).unwrap().unwrap();
	set.set(&mut user, 7);
	assert_eq!(user.id, 7);
	assert_eq!(get.get(&user), 7);

	let display = compile_dyn_getter(desc.property("display_name").unwrap())
		.unwrap()
		.unwrap();
	let value = display.get(&user).unwrap();
	assert_eq!(value.downcast_ref::<String>().map(String::as_str), Some("ada"));

	let created = desc.property("created").unwrap();
	assert!(compile_setter::<User, u64>(created).unwrap().is_none());
	let password = desc.property("password").unwrap();
	assert!(compile_getter::<User, String>(password).unwrap().is_none());
	assert!(compile_getter::<User, u32>(id).is_err());
}

#[test]
fn test_reflective_access_by_name() {
	let mut user = User::default();
	let desc = user.type_descriptor();

	assert!(desc.set_value(&mut user, "password", Box::new("hunter2".to_string())).unwrap());
	assert_eq!(user.password, "hunter2");

	assert!(desc.get_value(&user, "password").unwrap().is_none());
	let created = desc.get_value(&user, "created").unwrap().unwrap();
	assert_eq!(created.downcast_ref::<u64>(), Some(&0));
	assert!(desc.get_value(&user, "scratch").is_err());
}
