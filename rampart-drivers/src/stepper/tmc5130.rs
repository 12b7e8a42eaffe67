//! TMC5130 stepper controller (SPI mode)
//!
//! The TMC5130 combines a stepper driver with a ramp generator: the host
//! loads a motion profile and a target, and the chip plans and runs the move
//! on its own.
//!
//! # SPI Protocol
//!
//! 40-bit datagrams at up to 4 MHz, SPI mode 3. See [`super::bus`] for the
//! pipelined read sequence.
//!
//! # Features Used
//!
//! - Ramp generator: position and velocity modes with a six-point profile
//! - StealthChop: quiet voltage-PWM chopper mode (GCONF.en_pwm_mode)
//! - Sense range selection: CHOPCONF.vsense picked from the requested current
//!
//! # Stale data
//!
//! [`Tmc5130::jog`] and the single-bit toggles read a register and write a
//! value derived from it in a second transaction. If the motor moves, or
//! something else writes the register in between, the write is based on old
//! data. Hold an external lock around the call if that matters.

use rampart_core::config::DriverConfig;
use rampart_core::current::{CurrentLimitSpec, CurrentSettings};
use rampart_core::motion::{MotionProfile, RampMode};
use rampart_hal::SpiTransport;
use rampart_protocol::reg::{self, chopconf, gconf};
use rampart_protocol::SpiStatus;

use super::bus::{RegisterBus, Tmc5130Result};

/// CHOPCONF for basic operation: TOFF=5, HSTRT=5, HEND=3, TBL=2, vsense=1
pub const BASIC_CHOPCONF: i32 = 0x0003_01D5;

/// PWMCONF for basic stealthChop operation: PWM_AMPL=200, PWM_GRAD=1, autoscale
pub const BASIC_PWMCONF: i32 = 0x0005_01C8;

/// TMC5130 driver
///
/// Owns the transport and the motion profile shadow. All operations are
/// blocking and take `&mut self`; one instance per chip-select line.
pub struct Tmc5130<T> {
    bus: RegisterBus<T>,
    profile: MotionProfile,
}

impl<T: SpiTransport> Tmc5130<T> {
    /// Create a driver with the default motion profile
    pub fn new(transport: T) -> Self {
        Self::with_profile(transport, MotionProfile::default())
    }

    /// Create a driver with a custom motion profile shadow
    pub fn with_profile(transport: T, profile: MotionProfile) -> Self {
        Self {
            bus: RegisterBus::new(transport),
            profile,
        }
    }

    /// Bring the chip up
    ///
    /// Runs transport setup, pushes the motion profile shadow and writes the
    /// basic chopper configuration.
    pub fn begin(&mut self) -> Tmc5130Result<(), T> {
        self.bus.setup()?;
        self.update_motion_profile()?;
        self.basic_motor_config()?;
        #[cfg(feature = "defmt")]
        defmt::debug!("tmc5130 initialized, vmax={}", self.profile.vmax);
        Ok(())
    }

    /// Apply a full driver configuration
    ///
    /// Replaces the profile shadow and pushes it, then applies current
    /// limits (if any), stealthChop and direction. SPI settings belong to the
    /// transport and are not touched here.
    pub fn apply_config(&mut self, config: &DriverConfig) -> Tmc5130Result<(), T> {
        self.profile = config.motion;
        self.update_motion_profile()?;
        if let Some(current) = &config.current {
            self.set_current_limits(current)?;
        }
        self.enable_stealth_chop(config.stealth_chop)?;
        self.reverse_direction(config.reverse_direction)?;
        Ok(())
    }

    /// Write a raw register word
    pub fn write_register(&mut self, addr: u8, value: i32) -> Tmc5130Result<(), T> {
        self.bus.write_register(addr, value)
    }

    /// Read a raw register word and the status byte
    pub fn read_register(&mut self, addr: u8) -> Tmc5130Result<(SpiStatus, i32), T> {
        self.bus.read_register(addr)
    }

    /// Switch the ramp generator mode
    ///
    /// The chip's current state is not checked first.
    pub fn set_ramp_mode(&mut self, mode: RampMode) -> Tmc5130Result<(), T> {
        self.bus.write_register(reg::RAMPMODE, mode.register_value())
    }

    /// Move `steps` microsteps relative to the actual position
    ///
    /// The target wraps around like the chip's 32-bit position counter.
    /// Returns the new target.
    pub fn jog(&mut self, steps: i32) -> Tmc5130Result<i32, T> {
        let (_, actual) = self.bus.read_register(reg::XACTUAL)?;
        let target = actual.wrapping_add(steps);
        self.bus.write_register(reg::XTARGET, target)?;
        Ok(target)
    }

    /// Move to an absolute position (position mode)
    pub fn move_to(&mut self, position: i32) -> Tmc5130Result<(), T> {
        self.bus.write_register(reg::XTARGET, position)
    }

    /// Set VMAX in the shadow and on the chip
    ///
    /// Position mode: speed cap for moves. Velocity modes: the target speed.
    pub fn set_velocity(&mut self, velocity: u32) -> Tmc5130Result<(), T> {
        self.profile.vmax = velocity;
        self.bus.write_register(reg::VMAX, velocity as i32)
    }

    /// Enable or disable stealthChop
    ///
    /// Only switch at standstill.
    pub fn enable_stealth_chop(&mut self, enabled: bool) -> Tmc5130Result<(), T> {
        self.bus
            .modify_bit(reg::GCONF, gconf::EN_PWM_MODE, enabled)
            .map(|_| ())
    }

    /// Invert the motor direction
    ///
    /// Meant to fix wiring after installation, not to reverse a running move.
    pub fn reverse_direction(&mut self, enabled: bool) -> Tmc5130Result<(), T> {
        self.bus.modify_bit(reg::GCONF, gconf::SHAFT, enabled).map(|_| ())
    }

    /// Overwrite the actual position counter (homing, restart)
    pub fn set_position(&mut self, position: i32) -> Tmc5130Result<(), T> {
        self.bus.write_register(reg::XACTUAL, position)
    }

    /// Actual position of the ramp generator
    pub fn position(&mut self) -> Tmc5130Result<i32, T> {
        self.bus.read_register(reg::XACTUAL).map(|(_, position)| position)
    }

    /// Actual encoder position
    pub fn encoder_position(&mut self) -> Tmc5130Result<i32, T> {
        self.bus.read_register(reg::X_ENC).map(|(_, position)| position)
    }

    /// Overwrite the encoder position counter
    pub fn set_encoder_position(&mut self, position: i32) -> Tmc5130Result<(), T> {
        self.bus.write_register(reg::X_ENC, position)
    }

    /// Check if the motor is stopped (VACTUAL exactly zero)
    pub fn is_stopped(&mut self) -> Tmc5130Result<bool, T> {
        self.bus
            .read_register(reg::VACTUAL)
            .map(|(_, velocity)| velocity == 0)
    }

    /// Program hold/run current limits
    ///
    /// Writes IHOLD_IRUN, then sets CHOPCONF.vsense to match the selected
    /// sense range. Returns the settings that were written.
    pub fn set_current_limits(
        &mut self,
        spec: &CurrentLimitSpec,
    ) -> Tmc5130Result<CurrentSettings, T> {
        let settings = spec.settings();
        self.bus
            .write_register(reg::IHOLD_IRUN, settings.ihold_irun())?;
        self.bus
            .modify_bit(reg::CHOPCONF, chopconf::VSENSE, settings.sense_range.vsense())?;
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "tmc5130 current: ihold={} irun={} range={}",
            settings.ihold,
            settings.irun,
            settings.sense_range
        );
        Ok(settings)
    }

    /// Push the motion profile shadow to the chip
    ///
    /// Writes A1, V1, AMAX, VMAX, DMAX, D1, VSTOP in that order.
    pub fn update_motion_profile(&mut self) -> Tmc5130Result<(), T> {
        for (addr, value) in self.profile.register_writes() {
            self.bus.write_register(addr, value)?;
        }
        Ok(())
    }

    /// Write default chopper and stealthChop PWM settings
    pub fn basic_motor_config(&mut self) -> Tmc5130Result<(), T> {
        self.bus.write_register(reg::CHOPCONF, BASIC_CHOPCONF)?;
        self.bus.write_register(reg::PWMCONF, BASIC_PWMCONF)
    }

    /// Get the motion profile shadow
    pub fn profile(&self) -> &MotionProfile {
        &self.profile
    }

    /// Edit the motion profile shadow
    ///
    /// Changes reach the chip only on [`Tmc5130::update_motion_profile`].
    pub fn profile_mut(&mut self) -> &mut MotionProfile {
        &mut self.profile
    }

    /// Status byte of the most recent successful read
    pub fn last_status(&self) -> Option<SpiStatus> {
        self.bus.last_status()
    }

    /// Get the transport
    pub fn transport(&self) -> &T {
        self.bus.transport()
    }

    /// Give back the transport
    pub fn release(self) -> T {
        self.bus.release()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stepper::bus::Tmc5130Error;
    use crate::stepper::testing::{BusFault, SimulatedChip};
    use rampart_core::current::SenseRange;

    fn driver() -> Tmc5130<SimulatedChip> {
        Tmc5130::new(SimulatedChip::default())
    }

    #[test]
    fn test_begin_sequence() {
        let mut tmc = driver();
        tmc.begin().unwrap();

        let chip = tmc.release();
        assert_eq!(chip.setup_calls, 1);
        assert_eq!(
            chip.writes.as_slice(),
            &[
                (reg::A1, 35_000),
                (reg::V1, 20_000),
                (reg::AMAX, 10_000),
                (reg::VMAX, 200_000),
                (reg::DMAX, 15_000),
                (reg::D1, 50_000),
                (reg::VSTOP, 10),
                (reg::CHOPCONF, BASIC_CHOPCONF),
                (reg::PWMCONF, BASIC_PWMCONF),
            ]
        );
    }

    #[test]
    fn test_stealth_chop_toggle() {
        let mut tmc = driver();
        tmc.write_register(reg::GCONF, 0x0000_0101).unwrap();

        tmc.enable_stealth_chop(true).unwrap();
        let once = tmc.transport().register(reg::GCONF);
        assert_eq!(once, 0x0000_0105);

        tmc.enable_stealth_chop(true).unwrap();
        assert_eq!(tmc.transport().register(reg::GCONF), once);

        tmc.enable_stealth_chop(false).unwrap();
        assert_eq!(tmc.transport().register(reg::GCONF), once & !(1 << 2));
    }

    #[test]
    fn test_reverse_direction_touches_shaft_only() {
        let mut tmc = driver();
        tmc.write_register(reg::GCONF, 0x0000_0004).unwrap();

        tmc.reverse_direction(true).unwrap();
        assert_eq!(tmc.transport().register(reg::GCONF), 0x0000_0014);

        tmc.reverse_direction(false).unwrap();
        assert_eq!(tmc.transport().register(reg::GCONF), 0x0000_0004);
    }

    #[test]
    fn test_jog_is_relative_to_actual() {
        let mut chip = SimulatedChip::default();
        chip.set_register(reg::XACTUAL, 1_000);
        let mut tmc = Tmc5130::new(chip);

        assert_eq!(tmc.jog(-250).unwrap(), 750);
        assert_eq!(tmc.transport().register(reg::XTARGET), 750);
        // XACTUAL is left alone, the ramp generator moves it
        assert_eq!(tmc.transport().register(reg::XACTUAL), 1_000);
    }

    #[test]
    fn test_jog_wraps_like_position_counter() {
        let mut chip = SimulatedChip::default();
        chip.set_register(reg::XACTUAL, i32::MAX);
        let mut tmc = Tmc5130::new(chip);

        assert_eq!(tmc.jog(1).unwrap(), i32::MIN);
    }

    #[test]
    fn test_jog_read_failure_skips_write() {
        let mut chip = SimulatedChip::default();
        chip.fail_at = Some(1);
        let mut tmc = Tmc5130::new(chip);

        assert_eq!(tmc.jog(100), Err(Tmc5130Error::Transport(BusFault)));
        assert!(tmc.transport().writes.is_empty());
    }

    #[test]
    fn test_move_to_writes_target() {
        let mut tmc = driver();
        tmc.move_to(-51_200).unwrap();
        assert_eq!(tmc.release().writes.as_slice(), &[(reg::XTARGET, -51_200)]);
    }

    #[test]
    fn test_set_ramp_mode() {
        let mut tmc = driver();
        for mode in [
            RampMode::Position,
            RampMode::VelocityPositive,
            RampMode::VelocityNegative,
            RampMode::Hold,
        ] {
            tmc.set_ramp_mode(mode).unwrap();
            assert_eq!(
                tmc.transport().register(reg::RAMPMODE),
                mode.register_value()
            );
        }
    }

    #[test]
    fn test_set_velocity_updates_shadow() {
        let mut tmc = driver();
        tmc.set_velocity(12_345).unwrap();

        assert_eq!(tmc.profile().vmax, 12_345);
        assert_eq!(tmc.transport().register(reg::VMAX), 12_345);
    }

    #[test]
    fn test_profile_shadow_is_not_synced_eagerly() {
        let mut tmc = driver();
        tmc.update_motion_profile().unwrap();

        tmc.profile_mut().amax = 500;
        tmc.profile_mut().vstop = 5;
        assert_eq!(tmc.transport().register(reg::AMAX), 10_000);
        assert_eq!(tmc.transport().register(reg::VSTOP), 10);

        tmc.update_motion_profile().unwrap();
        assert_eq!(tmc.transport().register(reg::AMAX), 500);
        assert_eq!(tmc.transport().register(reg::VSTOP), 5);
    }

    #[test]
    fn test_is_stopped() {
        let mut tmc = driver();
        assert!(tmc.is_stopped().unwrap());

        let mut chip = SimulatedChip::default();
        chip.set_register(reg::VACTUAL, 1);
        assert!(!Tmc5130::new(chip).is_stopped().unwrap());

        let mut chip = SimulatedChip::default();
        chip.set_register(reg::VACTUAL, -1);
        assert!(!Tmc5130::new(chip).is_stopped().unwrap());
    }

    #[test]
    fn test_position_accessors() {
        let mut tmc = driver();
        tmc.set_position(-42).unwrap();
        assert_eq!(tmc.position().unwrap(), -42);

        tmc.set_encoder_position(9_000).unwrap();
        assert_eq!(tmc.encoder_position().unwrap(), 9_000);
        assert_eq!(tmc.transport().register(reg::X_ENC), 9_000);
    }

    #[test]
    fn test_current_limits_low_range() {
        let mut tmc = driver();
        tmc.write_register(reg::CHOPCONF, 0x0001_01D5).unwrap();

        let settings = tmc
            .set_current_limits(&CurrentLimitSpec::new(0.75, 0.75))
            .unwrap();

        assert_eq!(settings.sense_range, SenseRange::Low);
        assert_eq!(tmc.transport().register(reg::IHOLD_IRUN), 0x0007_1F1F);
        // vsense set, everything else preserved
        assert_eq!(tmc.transport().register(reg::CHOPCONF), 0x0003_01D5);
    }

    #[test]
    fn test_current_limits_high_range() {
        let mut tmc = driver();
        tmc.basic_motor_config().unwrap();

        let settings = tmc
            .set_current_limits(&CurrentLimitSpec::new(0.5, 1.0))
            .unwrap();

        assert_eq!(settings.sense_range, SenseRange::High);
        assert_eq!(tmc.transport().register(reg::IHOLD_IRUN), 0x0007_170B);
        assert_eq!(tmc.transport().register(reg::CHOPCONF), 0x0001_01D5);
    }

    #[test]
    fn test_current_limits_write_order() {
        let mut tmc = driver();
        tmc.set_current_limits(&CurrentLimitSpec::new(0.2, 0.4))
            .unwrap();

        let chip = tmc.release();
        let addrs: heapless::Vec<u8, 4> = chip.writes.iter().map(|(addr, _)| *addr).collect();
        assert_eq!(addrs.as_slice(), &[reg::IHOLD_IRUN, reg::CHOPCONF]);
    }

    #[test]
    fn test_apply_config() {
        let mut tmc = driver();
        let config = DriverConfig {
            motion: MotionProfile {
                vmax: 100_000,
                ..MotionProfile::default()
            },
            current: Some(CurrentLimitSpec::new(0.3, 0.6)),
            stealth_chop: true,
            reverse_direction: true,
            ..DriverConfig::default()
        };

        tmc.apply_config(&config).unwrap();

        assert_eq!(tmc.profile().vmax, 100_000);
        let chip = tmc.release();
        assert_eq!(chip.register(reg::VMAX), 100_000);
        assert_eq!(chip.register(reg::GCONF), 0x0000_0014);
        assert_ne!(chip.register(reg::IHOLD_IRUN), 0);
    }

    #[test]
    fn test_last_status_tracks_reads() {
        let mut chip = SimulatedChip::default();
        chip.status = 0x08;
        let mut tmc = Tmc5130::new(chip);
        assert_eq!(tmc.last_status(), None);

        tmc.position().unwrap();
        assert!(tmc.last_status().unwrap().standstill);
    }
}
