//! Domains and the per-domain type cache.
//!
//! # Mental Model
//!
//! A [`Domain`] groups loaded [`Module`]s, each a named list of registered
//! type descriptors. [`Domain::process`] is the process-wide domain: its
//! modules are assembled once from the link-time [`TypeRegistration`]s that
//! `#[derive(Reflect)]` submits.
//!
//! [`all_types`] answers "which types does this domain know" from the
//! process-wide [`DomainTypeCache`], scanning each domain at most once.
//!
//! # Limitations
//!
//! - The cache is never invalidated. Modules loaded into a domain after its
//!   first query are not seen by later queries for that domain id.
//! - Population of all domains shares one lock; see [`crate::memo`].

mod cache;
#[cfg(feature = "inventory")]
mod registration;

use std::borrow::Cow;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};

pub use cache::{DomainTypeCache, SharedTypes, TypeSet, all_types, all_types_of, scan_domain};
use parking_lot::RwLock;
#[cfg(feature = "inventory")]
pub use registration::TypeRegistration;

use crate::error::{Error, Result};
use crate::meta::{PropertyDescriptor, TypeDescriptor, TypeDescriptorBuilder};

/// Identifier of a [`Domain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DomainId(u64);

impl DomainId {
	/// Id of [`Domain::process`].
	pub const PROCESS: Self = Self(0);

	pub const fn as_u64(self) -> u64 {
		self.0
	}

	/// Takes the next id from `counter`. Never yields [`Self::PROCESS`]: once
	/// the counter is exhausted it restarts at 1.
	fn allocate(counter: &AtomicU64) -> Self {
		let previous = counter.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |id| {
			Some(id.checked_add(1).unwrap_or(1))
		});
		// The closure always returns `Some`.
		let (Ok(id) | Err(id)) = previous;
		Self(id.max(1))
	}
}

impl fmt::Display for DomainId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "domain#{}", self.0)
	}
}

/// A named group of registered type descriptors.
#[derive(Debug, Clone)]
pub struct Module {
	name: Cow<'static, str>,
	types: Vec<Arc<TypeDescriptor>>,
}

impl Module {
	pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
		Self {
			name: name.into(),
			types: Vec::new(),
		}
	}

	/// Builds `ty` with `properties` appended and adds it to the module.
	pub fn register(
		&mut self,
		ty: TypeDescriptorBuilder,
		properties: impl IntoIterator<Item = PropertyDescriptor>,
	) -> Result<Arc<TypeDescriptor>> {
		let descriptor = Arc::new(ty.properties(properties).build()?);
		self.types.push(Arc::clone(&descriptor));
		Ok(descriptor)
	}

	/// Adds an already built descriptor.
	pub fn add(&mut self, ty: Arc<TypeDescriptor>) {
		self.types.push(ty);
	}

	/// Chaining form of [`Self::add`].
	pub fn with(mut self, ty: Arc<TypeDescriptor>) -> Self {
		self.add(ty);
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn types(&self) -> &[Arc<TypeDescriptor>] {
		&self.types
	}

	pub fn len(&self) -> usize {
		self.types.len()
	}

	pub fn is_empty(&self) -> bool {
		self.types.is_empty()
	}
}

/// A logical execution context grouping loaded modules.
pub struct Domain {
	id: DomainId,
	name: Cow<'static, str>,
	modules: RwLock<Vec<Arc<Module>>>,
}

static NEXT_DOMAIN_ID: AtomicU64 = AtomicU64::new(1);

static PROCESS_DOMAIN: LazyLock<Domain> = LazyLock::new(|| {
	#[allow(unused_mut)]
	let mut domain = Domain::with_id(DomainId::PROCESS, "process");
	#[cfg(feature = "inventory")]
	domain
		.modules
		.get_mut()
		.extend(registration::collect_modules().into_iter().map(Arc::new));
	domain
});

impl Domain {
	/// Creates an empty domain with a fresh id.
	pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
		Self::with_id(DomainId::allocate(&NEXT_DOMAIN_ID), name)
	}

	fn with_id(id: DomainId, name: impl Into<Cow<'static, str>>) -> Self {
		Self {
			id,
			name: name.into(),
			modules: RwLock::new(Vec::new()),
		}
	}

	/// Returns the process-wide domain holding every link-time registration.
	pub fn process() -> &'static Domain {
		&PROCESS_DOMAIN
	}

	pub fn id(&self) -> DomainId {
		self.id
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Loads `module` into the domain.
	///
	/// Fails with [`Error::InvalidArgument`] if a module with the same name is
	/// already loaded.
	pub fn load(&self, module: Module) -> Result<Arc<Module>> {
		let mut modules = self.modules.write();
		if modules.iter().any(|m| m.name() == module.name()) {
			return Err(Error::invalid_argument(
				"module",
				format!("`{}` is already loaded in {}", module.name(), self.id),
			));
		}
		let module = Arc::new(module);
		modules.push(Arc::clone(&module));
		Ok(module)
	}

	/// Returns the loaded modules in load order.
	pub fn modules(&self) -> Vec<Arc<Module>> {
		self.modules.read().clone()
	}
}

impl fmt::Debug for Domain {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Domain")
			.field("id", &self.id)
			.field("name", &self.name)
			.field("modules", &self.modules.read().len())
			.finish()
	}
}
