use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, mpsc};
use std::thread;
use std::time::Duration;

use pretty_assertions::assert_eq;

use super::{LookupOrDefault, MemoMap, Population};

/// Racing threads on one key run the producer once and share one value.
#[test]
fn test_locked_population_runs_producer_once() {
	const THREADS: usize = 16;

	let map: MemoMap<&'static str, Arc<String>> = MemoMap::new();
	let calls = AtomicUsize::new(0);
	let barrier = Barrier::new(THREADS);

	let results: Vec<Arc<String>> = thread::scope(|s| {
		let handles: Vec<_> = (0..THREADS)
			.map(|_| {
				s.spawn(|| {
					barrier.wait();
					map.get_or_add(
						"k",
						|| {
							calls.fetch_add(1, Ordering::SeqCst);
							thread::yield_now();
							Arc::new("value".to_string())
						},
						Population::Locked,
					)
				})
			})
			.collect();
		handles.into_iter().map(|h| h.join().unwrap()).collect()
	});

	assert_eq!(calls.load(Ordering::SeqCst), 1);
	let first = &results[0];
	assert!(results.iter().all(|r| Arc::ptr_eq(r, first)));
	assert_eq!(map.len(), 1);
}

#[test]
fn test_present_key_skips_producer() {
	let map = MemoMap::new();
	map.insert(1u32, "one");

	let value = map.get_or_add(1, || panic!("producer must not run"), Population::Locked);
	assert_eq!(value, "one");

	let value = map.get_or_add(1, || panic!("producer must not run"), Population::Unlocked);
	assert_eq!(value, "one");
}

#[test]
fn test_distinct_keys_each_populate() {
	let map = MemoMap::new();
	let calls = AtomicUsize::new(0);
	for key in ["a", "b", "a", "c", "b"] {
		map.get_or_add(
			key,
			|| {
				calls.fetch_add(1, Ordering::SeqCst);
				key.len()
			},
			Population::Locked,
		);
	}
	assert_eq!(calls.load(Ordering::SeqCst), 3);
	assert_eq!(map.len(), 3);
}

#[test]
fn test_unlocked_population_stores_result() {
	let map = MemoMap::new();
	assert_eq!(map.get_or_add("x", || 10, Population::Unlocked), 10);
	assert!(map.contains_key("x"));
	assert_eq!(map.get("x"), Some(10));
}

#[test]
fn test_failed_producer_publishes_nothing() {
	let map: MemoMap<&'static str, u32> = MemoMap::new();

	let err = map.try_get_or_add("x", || Err("boom"), Population::Locked);
	assert_eq!(err, Err("boom"));
	assert!(map.is_empty());

	let ok = map.try_get_or_add("x", || Ok::<_, &str>(3), Population::Locked);
	assert_eq!(ok, Ok(3));
	assert_eq!(map.get("x"), Some(3));
}

#[test]
fn test_get_or_default() {
	let map: MemoMap<String, i32> = MemoMap::new();
	assert_eq!(map.get_or_default("x", 42), 42);
	assert!(map.is_empty());

	map.insert("x".to_string(), 7);
	assert_eq!(map.get_or_default("x", 42), 7);
}

#[test]
fn test_lookup_or_default_std_maps() {
	let mut hash: HashMap<String, i32> = HashMap::new();
	assert_eq!(hash.get_or_default("x", 42), 42);
	hash.insert("x".into(), 7);
	assert_eq!(hash.get_or_default("x", 42), 7);

	let mut tree: BTreeMap<u8, &str> = BTreeMap::new();
	assert_eq!(tree.get_or_default(&1u8, "none"), "none");
	tree.insert(1, "one");
	assert_eq!(tree.get_or_default(&1u8, "none"), "one");

	let mut index: indexmap::IndexMap<&str, u8> = indexmap::IndexMap::new();
	index.insert("a", 1);
	assert_eq!(index.get_or_default("a", 0), 1);
	assert_eq!(index.get_or_default("b", 0), 0);
}

#[test]
fn test_snapshot_is_stable_without_writes() {
	let map = MemoMap::new();
	map.insert(1u8, 1u8);
	let a = map.snapshot();
	let b = map.snapshot();
	assert!(Arc::ptr_eq(&a, &b));

	map.insert(2, 2);
	assert_eq!(a.len(), 1);
	assert_eq!(map.snapshot().len(), 2);
}

/// A producer may populate other keys of the same map under the locked protocol.
#[test]
fn test_nested_population_of_another_key_completes() {
	let map: Arc<MemoMap<u32, u32>> = Arc::new(MemoMap::new());
	let (tx, rx) = mpsc::channel();

	let worker = Arc::clone(&map);
	thread::spawn(move || {
		let outer = worker.get_or_add(
			1,
			|| worker.get_or_add(2, || 20, Population::Locked) + 1,
			Population::Locked,
		);
		let _ = tx.send(outer);
	});

	let outer = rx
		.recv_timeout(Duration::from_secs(5))
		.expect("nested population must not block");
	assert_eq!(outer, 21);
	assert_eq!(map.get(&1), Some(21));
	assert_eq!(map.get(&2), Some(20));
	assert_eq!(map.len(), 2);
}
