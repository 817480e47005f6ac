use std::sync::Arc;

use super::Module;
use crate::meta::TypeDescriptor;

/// A link-time registration of one type into [`super::Domain::process`].
///
/// Submitted by `#[derive(Reflect)]`; can be submitted by hand with
/// `inventory::submit!`.
pub struct TypeRegistration {
	module: &'static str,
	describe: fn() -> Arc<TypeDescriptor>,
}

inventory::collect!(TypeRegistration);

impl TypeRegistration {
	/// Creates a registration of the type described by `describe` into `module`.
	pub const fn new(module: &'static str, describe: fn() -> Arc<TypeDescriptor>) -> Self {
		Self { module, describe }
	}

	pub fn module(&self) -> &'static str {
		self.module
	}

	pub fn describe(&self) -> Arc<TypeDescriptor> {
		(self.describe)()
	}
}

/// Groups every submitted registration into modules.
///
/// Link order is unspecified, so modules are sorted by name and types by name
/// within each module.
pub(super) fn collect_modules() -> Vec<Module> {
	let mut registrations: Vec<&'static TypeRegistration> = inventory::iter::<TypeRegistration>.into_iter().collect();
	registrations.sort_by_key(|r| r.module);

	let mut modules: Vec<Module> = Vec::new();
	for registration in registrations {
		let ty = registration.describe();
		match modules.last_mut() {
			Some(module) if module.name() == registration.module => module.add(ty),
			_ => modules.push(Module::new(registration.module).with(ty)),
		}
	}
	for module in &mut modules {
		module.types.sort_by(|a, b| a.name().cmp(b.name()));
	}

	tracing::debug!(
		modules = modules.len(),
		types = modules.iter().map(Module::len).sum::<usize>(),
		"collected link-time type registrations"
	);
	modules
}
