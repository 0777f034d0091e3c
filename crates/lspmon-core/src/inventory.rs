// ── Inventory resolver ──
//
// Hostname <-> address lookups used for display. The inventory is built
// once and shared read-only; it never changes while the dashboard runs.

use indexmap::IndexMap;
use std::collections::HashMap;
use std::net::IpAddr;

/// Name resolution consulted by the dashboard when rendering rows.
pub trait Resolver: Send + Sync {
    fn resolve(&self, address: IpAddr) -> Option<&str>;

    fn resolve_reverse(&self, hostname: &str) -> Vec<IpAddr>;
}

/// Immutable hostname table.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    hosts: IndexMap<String, Vec<IpAddr>>,
    by_address: HashMap<IpAddr, usize>,
}

impl Inventory {
    /// Build from hostname -> addresses pairs. When an address is listed
    /// under several hostnames the first one wins.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<IpAddr>)>,
        S: Into<String>,
    {
        let mut hosts: IndexMap<String, Vec<IpAddr>> = IndexMap::new();
        for (name, addrs) in entries {
            hosts.entry(name.into()).or_default().extend(addrs);
        }

        let mut by_address = HashMap::new();
        for (idx, addrs) in hosts.values().enumerate() {
            for addr in addrs {
                by_address.entry(*addr).or_insert(idx);
            }
        }
        Self { hosts, by_address }
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    /// Hostnames in configuration order.
    pub fn hostnames(&self) -> impl Iterator<Item = &str> {
        self.hosts.keys().map(String::as_str)
    }
}

impl Resolver for Inventory {
    fn resolve(&self, address: IpAddr) -> Option<&str> {
        let idx = *self.by_address.get(&address)?;
        self.hosts.get_index(idx).map(|(name, _)| name.as_str())
    }

    fn resolve_reverse(&self, hostname: &str) -> Vec<IpAddr> {
        self.hosts.get(hostname).cloned().unwrap_or_default()
    }
}
