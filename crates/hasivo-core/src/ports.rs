//! Port layout of the telemetry arrays.
//!
//! The device reports per-port values as parallel arrays with no port ids.
//! Index 0 is the highest-numbered port, index `N - 1` is port 1. Ports 1
//! and 2 are uplinks without PoE; every other port is PoE-capable.

use serde::{Deserialize, Serialize};

/// Reboot opcode for the port at raw array index `i`.
pub const PORT_REBOOT_OPCODES: [i64; 10] = [3, 19, 35, 51, 67, 83, 99, 115, 131, 147];

/// Lowest physical port number that supplies PoE.
pub const LOWEST_POE_PORT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortKind {
    PoE,
    Uplink,
}

impl PortKind {
    pub fn classify(port_number: usize) -> Self {
        if port_number >= LOWEST_POE_PORT {
            Self::PoE
        } else {
            Self::Uplink
        }
    }
}

/// Physical port number for raw index `index` out of `port_count` entries.
pub fn port_number_for_index(index: usize, port_count: usize) -> usize {
    port_count - index
}

/// Reboot opcode for raw index `index`, or 0 when the table has no entry.
pub fn reboot_opcode_for_index(index: usize) -> i64 {
    PORT_REBOOT_OPCODES.get(index).copied().unwrap_or(0)
}

/// Index into the `pw` array holding the power draw for raw index `index`.
///
/// The power array is assumed aligned with the PoE ports from index 0, so
/// the raw index is reused unchanged. This holds for the 10-port model with
/// two uplinks and has not been confirmed on other variants.
pub fn power_slot_for_index(index: usize) -> usize {
    index
}

/// Physical port number targeted by a known reboot opcode on a
/// `port_count`-port device.
pub fn port_for_opcode(opcode: i64, port_count: usize) -> Option<usize> {
    PORT_REBOOT_OPCODES
        .iter()
        .position(|&op| op == opcode)
        .filter(|&i| i < port_count)
        .map(|i| port_number_for_index(i, port_count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverse_index_mapping() {
        assert_eq!(port_number_for_index(0, 10), 10);
        assert_eq!(port_number_for_index(9, 10), 1);
        assert_eq!(port_number_for_index(0, 4), 4);
    }

    #[test]
    fn classification_boundary() {
        assert_eq!(PortKind::classify(1), PortKind::Uplink);
        assert_eq!(PortKind::classify(2), PortKind::Uplink);
        assert_eq!(PortKind::classify(3), PortKind::PoE);
        assert_eq!(PortKind::classify(10), PortKind::PoE);
    }

    #[test]
    fn opcode_table_lookup() {
        assert_eq!(reboot_opcode_for_index(0), 3);
        assert_eq!(reboot_opcode_for_index(9), 147);
        assert_eq!(reboot_opcode_for_index(10), 0);
    }

    #[test]
    fn opcode_resolves_to_port() {
        assert_eq!(port_for_opcode(3, 10), Some(10));
        assert_eq!(port_for_opcode(147, 10), Some(1));
        assert_eq!(port_for_opcode(148, 10), None);
        assert_eq!(port_for_opcode(147, 8), None);
    }

    #[test]
    fn power_slot_reuses_raw_index() {
        assert_eq!(power_slot_for_index(0), 0);
        assert_eq!(power_slot_for_index(7), 7);
    }
}
