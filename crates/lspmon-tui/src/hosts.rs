//! Which devices to poll, and where they live.
//!
//! Host arguments may be addresses or hostnames. Hostnames are looked up in
//! the inventory first and fall back to system DNS.

use std::io;
use std::net::IpAddr;

use lspmon_core::{Inventory, Resolver};
use regex::Regex;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("{host}: no address found")]
    Unresolved { host: String },

    #[error("{host}: lookup failed: {source}")]
    Lookup {
        host: String,
        #[source]
        source: io::Error,
    },
}

/// Pick the host names to poll.
///
/// Explicit hosts win, then inventory hosts when a limit is given, then the
/// configured device list. A limit always filters the chosen candidates.
pub fn select(
    explicit: &[String],
    limit: Option<&Regex>,
    inventory: &Inventory,
    configured: &[String],
) -> Vec<String> {
    let candidates: Vec<String> = if explicit.is_empty() {
        if limit.is_some() {
            inventory.hostnames().map(str::to_owned).collect()
        } else {
            configured.to_vec()
        }
    } else {
        explicit.to_vec()
    };

    match limit {
        Some(re) => candidates.into_iter().filter(|h| re.is_match(h)).collect(),
        None => candidates,
    }
}

/// Address for `host`: literal IP, inventory entry, then DNS.
pub async fn resolve(host: &str, inventory: &Inventory) -> Result<IpAddr, ResolveError> {
    if let Ok(addr) = host.parse::<IpAddr>() {
        return Ok(addr);
    }
    if let Some(addr) = inventory.resolve_reverse(host).first() {
        debug!(host, %addr, "resolved from inventory");
        return Ok(*addr);
    }

    let mut found = tokio::net::lookup_host((host, 0))
        .await
        .map_err(|source| ResolveError::Lookup {
            host: host.to_owned(),
            source,
        })?;
    let addr = found
        .next()
        .map(|sa| sa.ip())
        .ok_or_else(|| ResolveError::Unresolved {
            host: host.to_owned(),
        })?;
    debug!(host, %addr, "resolved via DNS");
    Ok(addr)
}

/// Resolve every host, skipping failures. Duplicate addresses are kept once.
pub async fn resolve_all(
    hosts: &[String],
    inventory: &Inventory,
) -> (Vec<IpAddr>, Vec<ResolveError>) {
    let mut addresses = Vec::with_capacity(hosts.len());
    let mut failures = Vec::new();
    for host in hosts {
        match resolve(host, inventory).await {
            Ok(addr) if addresses.contains(&addr) => {}
            Ok(addr) => addresses.push(addr),
            Err(err) => failures.push(err),
        }
    }
    (addresses, failures)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    fn inventory() -> Inventory {
        Inventory::new([
            ("pe1.core", vec![ip("10.0.0.1")]),
            ("pe2.core", vec![ip("10.0.0.2")]),
            ("p1.edge", vec![ip("10.0.1.1")]),
        ])
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn explicit_hosts_take_precedence() {
        let picked = select(&strings(&["10.9.9.9"]), None, &inventory(), &strings(&["x"]));
        assert_eq!(picked, ["10.9.9.9"]);
    }

    #[test]
    fn limit_selects_inventory_hosts() {
        let re = Regex::new(r"\.core$").unwrap();
        let picked = select(&[], Some(&re), &inventory(), &[]);
        assert_eq!(picked, ["pe1.core", "pe2.core"]);
    }

    #[test]
    fn configured_devices_are_the_fallback() {
        let picked = select(&[], None, &inventory(), &strings(&["pe1.core"]));
        assert_eq!(picked, ["pe1.core"]);
    }

    #[tokio::test]
    async fn literals_and_inventory_names_resolve_without_dns() {
        let inv = inventory();
        assert_eq!(resolve("192.0.2.7", &inv).await.unwrap(), ip("192.0.2.7"));
        assert_eq!(resolve("p1.edge", &inv).await.unwrap(), ip("10.0.1.1"));
    }

    #[tokio::test]
    async fn duplicate_addresses_collapse() {
        let hosts = strings(&["pe1.core", "10.0.0.1", "pe2.core"]);
        let (addrs, failures) = resolve_all(&hosts, &inventory()).await;
        assert_eq!(addrs, [ip("10.0.0.1"), ip("10.0.0.2")]);
        assert!(failures.is_empty());
    }
}
