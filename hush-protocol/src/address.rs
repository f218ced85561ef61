//! Bus addresses of the nodes sharing the serial line

/// Node identifier carried in the DST and SRC header bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Address {
    /// The decision node (this firmware)
    Master,
    /// Heart rate sensor node
    Heartbeat,
    /// Crying level sensor node
    Crying,
    /// Vibration motor actuator node
    Motor,
}

// Wire format values
const ADDR_MASTER: u8 = 0;
const ADDR_HEARTBEAT: u8 = 1;
const ADDR_CRYING: u8 = 2;
const ADDR_MOTOR: u8 = 3;

impl Address {
    /// Parse an address from its wire format byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            ADDR_MASTER => Some(Address::Master),
            ADDR_HEARTBEAT => Some(Address::Heartbeat),
            ADDR_CRYING => Some(Address::Crying),
            ADDR_MOTOR => Some(Address::Motor),
            _ => None,
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            Address::Master => ADDR_MASTER,
            Address::Heartbeat => ADDR_HEARTBEAT,
            Address::Crying => ADDR_CRYING,
            Address::Motor => ADDR_MOTOR,
        }
    }

    /// Short upper-case name used in log lines
    pub fn name(self) -> &'static str {
        match self {
            Address::Master => "MASTER",
            Address::Heartbeat => "HEARTBEAT",
            Address::Crying => "CRYING",
            Address::Motor => "MOTOR",
        }
    }
}

impl core::fmt::Display for Address {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_roundtrip() {
        for addr in [
            Address::Master,
            Address::Heartbeat,
            Address::Crying,
            Address::Motor,
        ] {
            assert_eq!(Address::from_byte(addr.to_byte()), Some(addr));
        }
    }

    #[test]
    fn test_wire_values() {
        assert_eq!(Address::Master.to_byte(), 0);
        assert_eq!(Address::Heartbeat.to_byte(), 1);
        assert_eq!(Address::Crying.to_byte(), 2);
        assert_eq!(Address::Motor.to_byte(), 3);
    }

    #[test]
    fn test_unknown_address() {
        assert!(Address::from_byte(4).is_none());
        assert!(Address::from_byte(0xFF).is_none());
    }
}
