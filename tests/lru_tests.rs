use ringcache::cache::Cache;
use ringcache::metrics::GroupMetrics;
use ringcache::ByteView;

#[test]
fn eviction_by_bytes_keeps_newest_entries() {
    let max_bytes = "key1".len() + "value1".len() + "key2".len() + "value2".len();
    let cache = Cache::new(max_bytes as u64);
    let metrics = GroupMetrics::default();

    cache.insert("key1".to_string(), ByteView::from(b"value1".to_vec()), &metrics);
    cache.insert("key2".to_string(), ByteView::from(b"value2".to_vec()), &metrics);
    cache.insert("k3".to_string(), ByteView::from(b"v3".to_vec()), &metrics);

    assert!(cache.get("key1", &metrics).is_none());
    assert_eq!(cache.len(), 2);
    assert_eq!(
        cache.get("k3", &metrics).unwrap().as_str().unwrap(),
        "v3"
    );
}

#[test]
fn hits_and_misses_are_reflected_in_metrics() {
    let cache = Cache::new(1024);
    let metrics = GroupMetrics::default();

    cache.insert("k".to_string(), ByteView::new(b"v"), &metrics);
    assert!(cache.get("k", &metrics).is_some());
    assert!(cache.get("missing", &metrics).is_none());

    let snap = metrics.snapshot();
    assert_eq!(snap.local_hits, 1);
    assert_eq!(snap.local_misses, 1);
}

#[test]
fn unbounded_cache_never_evicts() {
    let cache = Cache::new(0);
    let metrics = GroupMetrics::default();
    for i in 0..500 {
        cache.insert(format!("k{i}"), ByteView::new(b"v"), &metrics);
    }
    assert_eq!(cache.len(), 500);
    assert_eq!(metrics.snapshot().evictions, 0);
}
