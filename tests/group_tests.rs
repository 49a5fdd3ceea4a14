use ringcache::error::Error;
use ringcache::{registry, GroupConfig, PeerClient, PeerPicker};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

static TRACING_INIT: Once = Once::new();

/// Installs a `tracing` subscriber once so the `debug!`/`warn!` events this
/// crate emits from `Group::get` are visible when running these tests with
/// `--nocapture`, instead of silently going nowhere.
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

struct CountingLoader {
    calls: Arc<AtomicUsize>,
    values: HashMap<&'static str, &'static str>,
}

impl CountingLoader {
    fn get(&self, key: &str) -> Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.values
            .get(key)
            .map(|v| v.as_bytes().to_vec())
            .ok_or_else(|| format!("{key} not found").into())
    }
}

#[test]
fn local_hit_avoids_the_loader() {
    init_tracing();
    let calls = Arc::new(AtomicUsize::new(0));
    let loader = CountingLoader {
        calls: calls.clone(),
        values: HashMap::from([("alice", "alice-value"), ("bob", "bob-value")]),
    };
    let config = GroupConfig::new("group-tests-local-hit", 1 << 20);
    let group = registry::new_group(config, move |key: &str| loader.get(key)).unwrap();

    for _ in 0..2 {
        let v = group.get("alice").unwrap();
        assert_eq!(v.as_str().unwrap(), "alice-value");
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let err = group.get("unknown-key").unwrap_err();
    assert!(matches!(err, Error::LoaderFailure(_)));
}

#[test]
fn empty_key_is_rejected_before_touching_the_loader() {
    let calls = Arc::new(AtomicUsize::new(0));
    let loader = CountingLoader {
        calls: calls.clone(),
        values: HashMap::new(),
    };
    let config = GroupConfig::new("group-tests-empty-key", 1024);
    let group = registry::new_group(config, move |key: &str| loader.get(key)).unwrap();

    let err = group.get("").unwrap_err();
    assert!(matches!(err, Error::InvalidInput));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

struct StubPeerClient {
    values: Mutex<HashMap<String, Vec<u8>>>,
    fetches: AtomicUsize,
}

impl PeerClient for StubPeerClient {
    fn fetch(&self, _group: &str, key: &str) -> Result<Vec<u8>, Error> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.values
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| Error::PeerFailure(format!("no such key: {key}")))
    }
}

struct AlwaysRemote {
    client: Arc<StubPeerClient>,
}

impl PeerPicker for AlwaysRemote {
    fn pick_peer(&self, _key: &str) -> Option<Arc<dyn PeerClient>> {
        Some(self.client.clone())
    }
}

#[test]
fn remote_routing_never_populates_the_local_cache_or_calls_the_loader() {
    let loader_calls = Arc::new(AtomicUsize::new(0));
    let loader_calls_clone = loader_calls.clone();
    let config = GroupConfig::new("group-tests-remote-routing", 1 << 20);
    let group = registry::new_group(config, move |key: &str| {
        loader_calls_clone.fetch_add(1, Ordering::SeqCst);
        Ok(key.as_bytes().to_vec())
    })
    .unwrap();

    let remote = Arc::new(StubPeerClient {
        values: Mutex::new(HashMap::from([("shared-key".to_string(), b"remote-value".to_vec())])),
        fetches: AtomicUsize::new(0),
    });
    group.register_peers(Arc::new(AlwaysRemote {
        client: remote.clone(),
    }));

    for _ in 0..3 {
        let v = group.get("shared-key").unwrap();
        assert_eq!(v.as_str().unwrap(), "remote-value");
    }

    assert_eq!(remote.fetches.load(Ordering::SeqCst), 3);
    assert_eq!(loader_calls.load(Ordering::SeqCst), 0);
    assert_eq!(group.metrics().local_hits, 0);
}

#[test]
#[should_panic(expected = "register_peers called more than once")]
fn registering_peers_twice_panics() {
    let config = GroupConfig::new("group-tests-double-register", 1024);
    let group = registry::new_group(config, |key: &str| Ok(key.as_bytes().to_vec())).unwrap();
    let remote = Arc::new(StubPeerClient {
        values: Mutex::new(HashMap::new()),
        fetches: AtomicUsize::new(0),
    });
    group.register_peers(Arc::new(AlwaysRemote { client: remote.clone() }));
    group.register_peers(Arc::new(AlwaysRemote { client: remote }));
}

#[test]
fn duplicate_group_name_is_rejected() {
    let config = GroupConfig::new("group-tests-duplicate", 1024);
    let _first = registry::new_group(config, |key: &str| Ok(key.as_bytes().to_vec())).unwrap();
    let second = registry::new_group(GroupConfig::new("group-tests-duplicate", 1024), |key: &str| {
        Ok(key.as_bytes().to_vec())
    });
    assert!(matches!(second, Err(Error::DuplicateGroup(_))));
}
