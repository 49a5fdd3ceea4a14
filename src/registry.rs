//! The process-wide `name -> Group` table.
//!
//! A single process may host several independently-configured namespaces;
//! this module is where they live for the lifetime of the process. There is
//! no teardown — groups, once created, are never removed.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::config::GroupConfig;
use crate::error::Error;
use crate::group::{Getter, Group};

static GROUPS: RwLock<Option<HashMap<String, Arc<Group>>>> = RwLock::new(None);

fn with_groups<R>(f: impl FnOnce(&HashMap<String, Arc<Group>>) -> R) -> R {
    let guard = GROUPS.read().unwrap();
    match guard.as_ref() {
        Some(map) => f(map),
        None => f(&HashMap::new()),
    }
}

/// Creates a new group from `config` and `getter`, registering it under
/// `config`'s name.
///
/// Fails with [`Error::DuplicateGroup`] if a group with that name already
/// exists — this library never silently replaces an existing namespace.
pub fn new_group<G>(config: GroupConfig, getter: G) -> Result<Arc<Group>, Error>
where
    G: Getter + 'static,
{
    let name = config.name.clone();
    let mut guard = GROUPS.write().unwrap();
    let map = guard.get_or_insert_with(HashMap::new);
    if map.contains_key(&name) {
        return Err(Error::DuplicateGroup(name));
    }
    let group = Arc::new(Group::new(config, Box::new(getter)));
    map.insert(name, group.clone());
    Ok(group)
}

/// Looks up an already-registered group by name.
pub fn get_group(name: &str) -> Option<Arc<Group>> {
    with_groups(|map| map.get(name).cloned())
}
