//! Consistent hash ring with virtual nodes.
//!
//! Each physical node occupies `replicas` synthetic points on the ring,
//! spreading its share of the keyspace across several arcs instead of one,
//! which keeps load roughly even as nodes are added or removed. Key
//! resolution walks the sorted virtual-hash array to find the first point at
//! or past the key's hash, wrapping back to the start for a circular ring.

use std::collections::HashMap;

/// Default replica count used by [`HashRing::new`] when unspecified.
pub const DEFAULT_REPLICAS: usize = 3;

/// A hash function mapping arbitrary bytes to a 32-bit ring coordinate.
pub type HashFn = Box<dyn Fn(&[u8]) -> u32 + Send + Sync>;

/// Consistent hash ring over `String` node identifiers.
pub struct HashRing {
    replicas: usize,
    hash_fn: HashFn,
    sorted_hashes: Vec<u32>,
    hash_to_node: HashMap<u32, String>,
}

impl std::fmt::Debug for HashRing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashRing")
            .field("replicas", &self.replicas)
            .field("points", &self.sorted_hashes.len())
            .finish()
    }
}

fn crc32_ieee(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

impl Default for HashRing {
    fn default() -> Self {
        Self::new(DEFAULT_REPLICAS)
    }
}

impl HashRing {
    /// Builds an empty ring with `replicas` virtual points per node and the
    /// default CRC32/IEEE hash function.
    ///
    /// `replicas` must be greater than zero.
    pub fn new(replicas: usize) -> Self {
        Self::with_hash_fn(replicas, Box::new(crc32_ieee))
    }

    /// Builds an empty ring using a custom hash function.
    pub fn with_hash_fn(replicas: usize, hash_fn: HashFn) -> Self {
        assert!(replicas > 0, "HashRing replicas must be greater than zero");
        Self {
            replicas,
            hash_fn,
            sorted_hashes: Vec::new(),
            hash_to_node: HashMap::new(),
        }
    }

    /// Adds each node in `nodes` to the ring, creating `replicas` virtual
    /// points per node.
    pub fn add<I, S>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for node in nodes {
            let node = node.into();
            for i in 0..self.replicas {
                let h = self.virtual_hash(i, &node);
                self.sorted_hashes.push(h);
                self.hash_to_node.insert(h, node.clone());
            }
        }
        self.sorted_hashes.sort_unstable();
    }

    /// Removes `node` and all of its virtual points from the ring.
    pub fn remove(&mut self, node: &str) {
        for i in 0..self.replicas {
            let h = self.virtual_hash(i, node);
            if let Ok(pos) = self.sorted_hashes.binary_search(&h) {
                self.sorted_hashes.remove(pos);
            }
            self.hash_to_node.remove(&h);
        }
    }

    /// Resolves `key` to the node owning it, or `None` if the ring is empty.
    pub fn get(&self, key: &str) -> Option<&str> {
        if self.sorted_hashes.is_empty() {
            return None;
        }
        let h = (self.hash_fn)(key.as_bytes());
        let idx = match self.sorted_hashes.binary_search(&h) {
            Ok(i) => i,
            Err(i) => i % self.sorted_hashes.len(),
        };
        let vhash = self.sorted_hashes[idx];
        self.hash_to_node.get(&vhash).map(String::as_str)
    }

    /// True if the ring has no nodes.
    pub fn is_empty(&self) -> bool {
        self.sorted_hashes.is_empty()
    }

    fn virtual_hash(&self, replica: usize, node: &str) -> u32 {
        let key = format!("{replica}{node}");
        (self.hash_fn)(key.as_bytes())
    }
}
