//! Vitals samples and the stale-value cache

/// One reading of both sensors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Vitals {
    /// Heart rate in beats per minute
    pub bpm: u8,
    /// Crying level in percent (0-100)
    pub cry: u8,
}

impl Vitals {
    pub const fn new(bpm: u8, cry: u8) -> Self {
        Self { bpm, cry }
    }
}

/// Signal used to judge whether the last move helped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Regime {
    /// Heart rate trend
    #[default]
    Heartbeat,
    /// Crying level trend
    Crying,
}

impl Regime {
    pub fn label(self) -> &'static str {
        match self {
            Regime::Heartbeat => "HB driven",
            Regime::Crying => "CRY driven",
        }
    }
}

/// Last good value of each sensor
///
/// A failed poll (`None`) leaves the previous value in place. Values start
/// at zero, which doubles as "no reading yet".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VitalsCache {
    current: Vitals,
}

impl VitalsCache {
    pub const fn new() -> Self {
        Self {
            current: Vitals::new(0, 0),
        }
    }

    /// Record a heart rate poll; returns whether it produced a value
    pub fn update_bpm(&mut self, sample: Option<u8>) -> bool {
        match sample {
            Some(bpm) => {
                self.current.bpm = bpm;
                true
            }
            None => false,
        }
    }

    /// Record a crying poll; returns whether it produced a value
    pub fn update_cry(&mut self, sample: Option<u8>) -> bool {
        match sample {
            Some(cry) => {
                self.current.cry = cry;
                true
            }
            None => false,
        }
    }

    /// Overwrite the crying level regardless of polls
    pub fn force_cry(&mut self, cry: u8) {
        self.current.cry = cry;
    }

    pub fn current(&self) -> Vitals {
        self.current
    }

    /// Whether either value is non-zero
    pub fn has_reading(&self) -> bool {
        self.current.bpm != 0 || self.current.cry != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_poll_keeps_last_value() {
        let mut cache = VitalsCache::new();
        assert!(cache.update_bpm(Some(120)));
        assert!(!cache.update_bpm(None));
        assert_eq!(cache.current().bpm, 120);
    }

    #[test]
    fn test_has_reading() {
        let mut cache = VitalsCache::new();
        assert!(!cache.has_reading());
        cache.update_cry(Some(0));
        assert!(!cache.has_reading());
        cache.update_cry(Some(30));
        assert!(cache.has_reading());
    }
}
