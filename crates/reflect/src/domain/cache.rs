use std::sync::{Arc, LazyLock};

use indexmap::IndexMap;
use indexmap::map::Entry;
use rustc_hash::FxBuildHasher;

use super::{Domain, DomainId};
use crate::filter::{OfType, of_type};
use crate::memo::{MemoMap, Population};
use crate::meta::{TypeDescriptor, TypeKey};

/// Deduplicated set of type descriptors. Iteration follows insertion order;
/// callers should not rely on it.
#[derive(Debug, Clone, Default)]
pub struct TypeSet {
	types: IndexMap<TypeKey, Arc<TypeDescriptor>, FxBuildHasher>,
}

impl TypeSet {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds `ty` unless a descriptor with the same key is already present.
	pub fn insert(&mut self, ty: Arc<TypeDescriptor>) -> bool {
		match self.types.entry(ty.key()) {
			Entry::Occupied(_) => false,
			Entry::Vacant(slot) => {
				slot.insert(ty);
				true
			}
		}
	}

	pub fn get(&self, key: TypeKey) -> Option<&Arc<TypeDescriptor>> {
		self.types.get(&key)
	}

	pub fn contains(&self, key: TypeKey) -> bool {
		self.types.contains_key(&key)
	}

	pub fn len(&self) -> usize {
		self.types.len()
	}

	pub fn is_empty(&self) -> bool {
		self.types.is_empty()
	}

	pub fn iter(&self) -> indexmap::map::Values<'_, TypeKey, Arc<TypeDescriptor>> {
		self.types.values()
	}

	/// Lazily filters this set; see [`crate::filter::of_type`].
	pub fn of_type<T: ?Sized + 'static>(
		&self,
		include_abstract: bool,
	) -> OfType<indexmap::map::Values<'_, TypeKey, Arc<TypeDescriptor>>> {
		of_type::<T, _>(self.iter(), include_abstract)
	}

	/// Iterates a shared set by value, keeping it alive.
	pub fn shared_iter(self: Arc<Self>) -> SharedTypes {
		SharedTypes { set: self, next: 0 }
	}
}

impl FromIterator<Arc<TypeDescriptor>> for TypeSet {
	fn from_iter<I: IntoIterator<Item = Arc<TypeDescriptor>>>(iter: I) -> Self {
		let mut set = Self::new();
		for ty in iter {
			set.insert(ty);
		}
		set
	}
}

impl<'a> IntoIterator for &'a TypeSet {
	type Item = &'a Arc<TypeDescriptor>;
	type IntoIter = indexmap::map::Values<'a, TypeKey, Arc<TypeDescriptor>>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

/// Owning iterator over a shared [`TypeSet`].
#[derive(Debug, Clone)]
pub struct SharedTypes {
	set: Arc<TypeSet>,
	next: usize,
}

impl Iterator for SharedTypes {
	type Item = Arc<TypeDescriptor>;

	fn next(&mut self) -> Option<Self::Item> {
		let (_, ty) = self.set.types.get_index(self.next)?;
		self.next += 1;
		Some(Arc::clone(ty))
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		let rest = self.set.len().saturating_sub(self.next);
		(rest, Some(rest))
	}
}

impl ExactSizeIterator for SharedTypes {}

type Scanner = dyn Fn(&Domain) -> TypeSet + Send + Sync;

/// Per-domain memo of discovered types.
///
/// Each domain id is scanned at most once per cache, even under concurrent
/// queries. Results are kept for the life of the cache.
pub struct DomainTypeCache {
	sets: MemoMap<DomainId, Arc<TypeSet>>,
	scan: Box<Scanner>,
}

static PROCESS_CACHE: LazyLock<DomainTypeCache> = LazyLock::new(DomainTypeCache::new);

impl DomainTypeCache {
	/// Creates a cache that discovers types with [`scan_domain`].
	pub fn new() -> Self {
		Self::with_scanner(scan_domain)
	}

	/// Creates a cache with a custom discovery procedure.
	pub fn with_scanner(scan: impl Fn(&Domain) -> TypeSet + Send + Sync + 'static) -> Self {
		Self {
			sets: MemoMap::new(),
			scan: Box::new(scan),
		}
	}

	/// Returns the process-wide cache.
	pub fn global() -> &'static DomainTypeCache {
		&PROCESS_CACHE
	}

	/// Returns every type visible in `domain`, scanning it on first use.
	pub fn all_types(&self, domain: &Domain) -> Arc<TypeSet> {
		self.sets.get_or_add(
			domain.id(),
			|| {
				let set = (self.scan)(domain);
				tracing::debug!(
					domain = %domain.id(),
					name = domain.name(),
					modules = domain.modules().len(),
					types = set.len(),
					"scanned domain types"
				);
				Arc::new(set)
			},
			Population::Locked,
		)
	}

	/// Returns the types of `domain` assignable to `T`.
	pub fn all_types_of<T: ?Sized + 'static>(&self, domain: &Domain, include_abstract: bool) -> OfType<SharedTypes> {
		of_type::<T, _>(self.all_types(domain).shared_iter(), include_abstract)
	}

	/// Returns true if `id` has been scanned by this cache.
	pub fn is_populated(&self, id: DomainId) -> bool {
		self.sets.contains_key(&id)
	}
}

impl Default for DomainTypeCache {
	fn default() -> Self {
		Self::new()
	}
}

/// Unions the types of every module loaded in `domain`.
pub fn scan_domain(domain: &Domain) -> TypeSet {
	domain
		.modules()
		.iter()
		.flat_map(|module| module.types().iter().cloned())
		.collect()
}

/// Returns every type visible in `domain` from the process-wide cache.
pub fn all_types(domain: &Domain) -> Arc<TypeSet> {
	DomainTypeCache::global().all_types(domain)
}

/// Returns the types of `domain` assignable to `T` from the process-wide cache.
pub fn all_types_of<T: ?Sized + 'static>(domain: &Domain, include_abstract: bool) -> OfType<SharedTypes> {
	DomainTypeCache::global().all_types_of::<T>(domain, include_abstract)
}
