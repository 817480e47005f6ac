//! Memoizing map with double-checked population.
//!
//! # Mental Model
//!
//! A [`MemoMap`] publishes an immutable snapshot of its entries through an
//! [`ArcSwap`]. Readers load the snapshot and look the key up without taking
//! any lock. Population builds an extended copy of the snapshot and swaps it
//! in, so a reader never sees a half-written entry.
//!
//! # Concurrency
//!
//! - **Reads:** lock-free (atomic load of the current snapshot).
//! - **Population:** [`Population::Locked`] serializes check-compute-publish
//!   behind one mutex per map. The lock is map-wide, not per key: a producer
//!   that blocks for key `A` also blocks population of key `B` on the same map.
//!   The lock is reentrant, so a producer may populate other keys of the same
//!   map. A producer that asks for its own key recurses without end.
//!
//! # Invariants
//!
//! - Under [`Population::Locked`] a key is populated at most once; every caller
//!   observes the same stored value.
//! - A failing producer publishes nothing.

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::convert::Infallible;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::sync::Arc;

use arc_swap::ArcSwap;
use indexmap::IndexMap;
use parking_lot::ReentrantMutex;
use rustc_hash::FxHashMap;

/// How [`MemoMap::get_or_add`] guards a missing key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Population {
	/// Take the map-wide lock and re-check before running the producer. The
	/// lock is reentrant for the populating thread.
	#[default]
	Locked,
	/// Run the producer without locking. Concurrent callers may each run it and
	/// the last publication wins. Only for single-threaded callers.
	Unlocked,
}

/// Thread-safe get-or-populate map.
pub struct MemoMap<K, V> {
	entries: ArcSwap<FxHashMap<K, V>>,
	populate: ReentrantMutex<()>,
}

impl<K, V> MemoMap<K, V> {
	/// Creates an empty map.
	pub fn new() -> Self {
		Self {
			entries: ArcSwap::from_pointee(FxHashMap::default()),
			populate: ReentrantMutex::new(()),
		}
	}

	/// Returns the number of populated entries.
	pub fn len(&self) -> usize {
		self.entries.load().len()
	}

	/// Returns true if nothing has been populated yet.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Returns the currently published entries.
	pub fn snapshot(&self) -> Arc<FxHashMap<K, V>> {
		self.entries.load_full()
	}
}

impl<K, V> Default for MemoMap<K, V> {
	fn default() -> Self {
		Self::new()
	}
}

impl<K, V> fmt::Debug for MemoMap<K, V> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MemoMap").field("len", &self.len()).finish()
	}
}

impl<K, V> MemoMap<K, V>
where
	K: Hash + Eq + Clone,
	V: Clone,
{
	/// Looks up a populated value.
	pub fn get<Q>(&self, key: &Q) -> Option<V>
	where
		K: Borrow<Q>,
		Q: Hash + Eq + ?Sized,
	{
		self.entries.load().get(key).cloned()
	}

	/// Returns true if `key` has been populated.
	pub fn contains_key<Q>(&self, key: &Q) -> bool
	where
		K: Borrow<Q>,
		Q: Hash + Eq + ?Sized,
	{
		self.entries.load().contains_key(key)
	}

	/// Returns the value under `key`, or `default` when absent. Never populates.
	pub fn get_or_default<Q>(&self, key: &Q, default: V) -> V
	where
		K: Borrow<Q>,
		Q: Hash + Eq + ?Sized,
	{
		self.get(key).unwrap_or(default)
	}

	/// Returns the value under `key`, running `producer` to populate it if absent.
	///
	/// With [`Population::Locked`], `producer` runs at most once per key no matter
	/// how many threads race on it.
	pub fn get_or_add<F>(&self, key: K, producer: F, population: Population) -> V
	where
		F: FnOnce() -> V,
	{
		match self.try_get_or_add(key, || Ok::<_, Infallible>(producer()), population) {
			Ok(value) => value,
			Err(never) => match never {},
		}
	}

	/// Fallible form of [`Self::get_or_add`]. An `Err` from `producer` leaves the
	/// map untouched and is returned as is.
	pub fn try_get_or_add<F, E>(&self, key: K, producer: F, population: Population) -> Result<V, E>
	where
		F: FnOnce() -> Result<V, E>,
	{
		if let Some(value) = self.get(&key) {
			return Ok(value);
		}

		match population {
			Population::Locked => {
				let _guard = self.populate.lock();
				// Another waiter may have populated it while we were blocked.
				if let Some(value) = self.get(&key) {
					return Ok(value);
				}
				let value = producer()?;
				self.publish(key, value.clone());
				Ok(value)
			}
			Population::Unlocked => {
				let value = producer()?;
				self.publish(key, value.clone());
				Ok(value)
			}
		}
	}

	/// Stores `value` under `key`, replacing any previous value.
	pub fn insert(&self, key: K, value: V) {
		let _guard = self.populate.lock();
		self.publish(key, value);
	}

	fn publish(&self, key: K, value: V) {
		self.entries.rcu(|current| {
			let mut next = (**current).clone();
			next.insert(key.clone(), value.clone());
			next
		});
		tracing::trace!(entries = self.len(), "memo entry published");
	}
}

/// Default-valued lookup over any map-like collection.
pub trait LookupOrDefault<Q: ?Sized, V> {
	/// Returns the value under `key`, or `default` when absent.
	fn get_or_default(&self, key: &Q, default: V) -> V;
}

impl<K, V, S, Q> LookupOrDefault<Q, V> for HashMap<K, V, S>
where
	K: Borrow<Q> + Hash + Eq,
	Q: Hash + Eq + ?Sized,
	S: BuildHasher,
	V: Clone,
{
	fn get_or_default(&self, key: &Q, default: V) -> V {
		self.get(key).cloned().unwrap_or(default)
	}
}

impl<K, V, Q> LookupOrDefault<Q, V> for BTreeMap<K, V>
where
	K: Borrow<Q> + Ord,
	Q: Ord + ?Sized,
	V: Clone,
{
	fn get_or_default(&self, key: &Q, default: V) -> V {
		self.get(key).cloned().unwrap_or(default)
	}
}

impl<K, V, S, Q> LookupOrDefault<Q, V> for IndexMap<K, V, S>
where
	K: Hash + Eq,
	Q: Hash + indexmap::Equivalent<K> + ?Sized,
	S: BuildHasher,
	V: Clone,
{
	fn get_or_default(&self, key: &Q, default: V) -> V {
		self.get(key).cloned().unwrap_or(default)
	}
}

impl<K, V, Q> LookupOrDefault<Q, V> for MemoMap<K, V>
where
	K: Borrow<Q> + Hash + Eq + Clone,
	Q: Hash + Eq + ?Sized,
	V: Clone,
{
	fn get_or_default(&self, key: &Q, default: V) -> V {
		MemoMap::get_or_default(self, key, default)
	}
}

#[cfg(test)]
mod tests;
