//! Shared IF-MIB conventions.

use checkwatch_types::State;

/// ifType values of physical interfaces: ethernetCsmacd, iso88023Csmacd,
/// fastEther, gigabitEthernet, l2vlan and l3ipvlan.
pub const PHYSICAL_TYPES: [i64; 6] = [6, 62, 69, 117, 135, 136];

/// `ifAdminStatus` / `ifOperStatus` value for "up".
pub const UP: i64 = 1;

/// State and name of an `ifOperStatus` value.
pub fn oper_status(code: i64) -> (State, &'static str) {
    match code {
        1 => (State::Ok, "up"),
        2 => (State::Crit, "down"),
        3 => (State::Warn, "testing"),
        4 => (State::Unknown, "unknown"),
        5 => (State::Warn, "dormant"),
        6 => (State::Crit, "notPresent"),
        7 => (State::Crit, "lowerLayerDown"),
        _ => (State::Unknown, "invalid"),
    }
}
