//! SPI_STATUS byte
//!
//! The first byte of every reply. Like the data that follows it, it reflects
//! the chip's state when the *previous* datagram was processed.

/// Parsed SPI_STATUS flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiStatus {
    /// Byte exactly as received
    pub raw: u8,
    /// GSTAT.reset: chip was reset since GSTAT was last cleared
    pub reset_flag: bool,
    /// GSTAT.drv_err: driver shut down (overtemperature or short)
    pub driver_error: bool,
    /// stallGuard2 threshold reached
    pub sg2: bool,
    /// Motor at standstill
    pub standstill: bool,
    /// Ramp generator reached VMAX
    pub velocity_reached: bool,
    /// Ramp generator reached XTARGET
    pub position_reached: bool,
    /// Left reference switch active
    pub status_stop_l: bool,
    /// Right reference switch active
    pub status_stop_r: bool,
}

impl SpiStatus {
    /// Parse from the raw status byte
    pub fn from_byte(raw: u8) -> Self {
        Self {
            raw,
            reset_flag: raw & (1 << 0) != 0,
            driver_error: raw & (1 << 1) != 0,
            sg2: raw & (1 << 2) != 0,
            standstill: raw & (1 << 3) != 0,
            velocity_reached: raw & (1 << 4) != 0,
            position_reached: raw & (1 << 5) != 0,
            status_stop_l: raw & (1 << 6) != 0,
            status_stop_r: raw & (1 << 7) != 0,
        }
    }

    /// Check if any fault condition is present
    pub fn has_fault(&self) -> bool {
        self.driver_error
    }

    /// Check if either reference switch is active
    pub fn at_stop_switch(&self) -> bool {
        self.status_stop_l || self.status_stop_r
    }
}

impl From<u8> for SpiStatus {
    fn from(raw: u8) -> Self {
        Self::from_byte(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_status() {
        let status = SpiStatus::from_byte(0);
        assert_eq!(status, SpiStatus::default());
        assert!(!status.has_fault());
        assert!(!status.at_stop_switch());
    }

    #[test]
    fn test_status_bits() {
        assert!(SpiStatus::from_byte(1 << 1).driver_error);
        assert!(SpiStatus::from_byte(1 << 1).has_fault());
        assert!(SpiStatus::from_byte(1 << 2).sg2);
        assert!(SpiStatus::from_byte(1 << 4).velocity_reached);
        assert!(SpiStatus::from_byte(1 << 5).position_reached);
        assert!(SpiStatus::from_byte(1 << 6).at_stop_switch());
        assert!(SpiStatus::from_byte(1 << 7).status_stop_r);
    }

    #[test]
    fn test_raw_is_preserved() {
        let status = SpiStatus::from(0xA5);
        assert_eq!(status.raw, 0xA5);
        assert!(status.reset_flag);
        assert!(status.sg2);
        assert!(status.position_reached);
        assert!(status.status_stop_r);
        assert!(!status.driver_error);
    }
}
