//! # checkwatch-plugins
//!
//! Pre-built check plugins for common telemetry tables.
//!
//! ## Available Plugins
//!
//! - **interface_status** (`snmp` feature) - operational status of administratively up interfaces
//! - **interface_traffic** (`snmp` feature) - in/out bit rates from 32-bit octet counters
//! - **interfaces** (`snmp` feature) - ifTable, ifXTable and counters correlated into one check
//!   with status, speed changes, traffic, utilization and error rates
//! - **system_resources** (`snmp` feature) - CPU and memory usage with levels
//! - **device_setup** (`snmp` feature) - sysContact, sysName and sysLocation are configured
//! - **agent_items** (`agent` feature) - `item;value;status` agent sections with upper and lower levels
//!
//! ## Quick Start
//!
//! ```rust
//! use checkwatch_engine::{run_check, run_discovery, CheckContext, MemoryStore};
//! use checkwatch_types::{table_from, State};
//!
//! let plugin = checkwatch_plugins::find("interface_status").unwrap();
//! let tables = vec![table_from(&[&["eth0", "6", "1000000000", "1", "1"]])];
//!
//! let services = run_discovery(plugin.as_ref(), &tables);
//! assert_eq!(services[0].item.as_deref(), Some("eth0"));
//!
//! let mut store = MemoryStore::new();
//! let mut ctx = CheckContext::new(0.0, &mut store);
//! let params = plugin.default_parameters();
//! let result = run_check(plugin.as_ref(), Some("eth0"), &params, &tables, &mut ctx);
//! assert_eq!(result.state, State::Ok);
//! ```

use checkwatch_engine::CheckPlugin;
use checkwatch_types::{Record, Section};

#[cfg(feature = "snmp")]
mod ifmib;

#[cfg(feature = "snmp")]
pub mod device_setup;
#[cfg(feature = "snmp")]
pub mod interface_status;
#[cfg(feature = "snmp")]
pub mod interface_traffic;
#[cfg(feature = "snmp")]
pub mod interfaces;
#[cfg(feature = "snmp")]
pub mod system_resources;

#[cfg(feature = "agent")]
pub mod agent_items;

/// Every plugin compiled into this build, in name order.
pub fn all() -> Vec<Box<dyn CheckPlugin>> {
    let mut plugins: Vec<Box<dyn CheckPlugin>> = Vec::new();

    #[cfg(feature = "agent")]
    plugins.push(Box::new(agent_items::AgentItems));

    #[cfg(feature = "snmp")]
    {
        plugins.push(Box::new(device_setup::DeviceSetup));
        plugins.push(Box::new(interface_status::InterfaceStatus));
        plugins.push(Box::new(interface_traffic::InterfaceTraffic));
        plugins.push(Box::new(interfaces::Interfaces));
        plugins.push(Box::new(system_resources::SystemResources));
    }

    plugins
}

/// Look a plugin up by name.
pub fn find(name: &str) -> Option<Box<dyn CheckPlugin>> {
    all().into_iter().find(|p| p.name() == name)
}

/// The record of the checked entity: the keyed item, or the scalar record
/// for itemless checks.
pub(crate) fn entity<'s>(section: &'s Section, item: Option<&str>) -> Option<&'s Record> {
    match item {
        Some(item) => section.get(item),
        None => section.scalar_record(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique_and_sorted() {
        let names: Vec<String> = all().iter().map(|p| p.name().to_string()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(names, sorted);
    }

    #[test]
    fn unknown_plugin_is_none() {
        assert!(find("no_such_plugin").is_none());
    }
}
