//! TMC5130 register addresses
//!
//! Addresses follow the TMC5130 datasheet register map and must not change.

/// General configuration
pub const GCONF: u8 = 0x00;
/// UART slave configuration / SPI status select
pub const SLAVECONF: u8 = 0x03;
/// Position comparison register
pub const X_COMPARE: u8 = 0x05;
/// Hold/run current settings
pub const IHOLD_IRUN: u8 = 0x10;
/// Delay before power down at standstill
pub const TPOWERDOWN: u8 = 0x11;
/// Upper velocity for stealthChop
pub const TPWMTHRS: u8 = 0x13;
/// Lower velocity for coolStep/stallGuard
pub const TCOOLTHRS: u8 = 0x14;
/// Velocity threshold for high-speed mode
pub const THIGH: u8 = 0x15;
/// Ramp generator mode
pub const RAMPMODE: u8 = 0x20;
/// Actual motor position
pub const XACTUAL: u8 = 0x21;
/// Actual motor velocity (read only)
pub const VACTUAL: u8 = 0x22;
/// Start velocity
pub const VSTART: u8 = 0x23;
/// First acceleration between VSTART and V1
pub const A1: u8 = 0x24;
/// First acceleration/deceleration phase threshold velocity
pub const V1: u8 = 0x25;
/// Second acceleration between V1 and VMAX
pub const AMAX: u8 = 0x26;
/// Motion ramp target velocity
pub const VMAX: u8 = 0x27;
/// Deceleration between VMAX and V1
pub const DMAX: u8 = 0x28;
/// Deceleration between V1 and VSTOP
pub const D1: u8 = 0x2A;
/// Motor stop velocity
pub const VSTOP: u8 = 0x2B;
/// Waiting time after ramping down to zero velocity
pub const TZEROWAIT: u8 = 0x2C;
/// Target position for ramp mode
pub const XTARGET: u8 = 0x2D;
/// Velocity threshold for dcStep
pub const VDCMIN: u8 = 0x33;
/// Reference switch and stallGuard2 event configuration
pub const SW_MODE: u8 = 0x34;
/// Ramp generator latch position
pub const XLATCH: u8 = 0x36;
/// Encoder configuration
pub const ENCMODE: u8 = 0x38;
/// Actual encoder position
pub const X_ENC: u8 = 0x39;
/// Encoder accumulation constant
pub const ENC_CONST: u8 = 0x3A;
/// Encoder N event detected
pub const ENC_STATUS: u8 = 0x3B;
/// Encoder latch position
pub const ENC_LATCH: u8 = 0x3C;
/// Microstep table entries 0-31
pub const MS_LUT_0: u8 = 0x60;
/// Microstep table entries 32-63
pub const MS_LUT_1: u8 = 0x61;
/// Microstep table entries 64-95
pub const MS_LUT_2: u8 = 0x62;
/// Microstep table entries 96-127
pub const MS_LUT_3: u8 = 0x63;
/// Microstep table entries 128-159
pub const MS_LUT_4: u8 = 0x64;
/// Microstep table entries 160-191
pub const MS_LUT_5: u8 = 0x65;
/// Microstep table entries 192-223
pub const MS_LUT_6: u8 = 0x66;
/// Microstep table entries 224-255
pub const MS_LUT_7: u8 = 0x67;
/// Microstep table segmentation
pub const MS_LUTSEL: u8 = 0x68;
/// Microstep table start values
pub const MS_LUTSTART: u8 = 0x69;
/// Chopper configuration
pub const CHOPCONF: u8 = 0x6C;
/// coolStep configuration
pub const COOLCONF: u8 = 0x6D;
/// dcStep configuration
pub const DCCTRL: u8 = 0x6E;
/// stealthChop PWM configuration
pub const PWMCONF: u8 = 0x70;
/// Encoder mode control
pub const ENCM_CTRL: u8 = 0x72;

/// GCONF bit positions
pub mod gconf {
    /// stealthChop voltage PWM mode enable
    pub const EN_PWM_MODE: u8 = 2;
    /// Invert motor direction
    pub const SHAFT: u8 = 4;
}

/// CHOPCONF bit positions
pub mod chopconf {
    /// Sense resistor voltage range: 1 = 0.18 V (high sensitivity), 0 = 0.32 V
    pub const VSENSE: u8 = 17;
}

/// IHOLD_IRUN field layout
pub mod ihold_irun {
    /// Standstill current scale, bits 0-4
    pub const IHOLD_SHIFT: u32 = 0;
    /// Motor run current scale, bits 8-12
    pub const IRUN_SHIFT: u32 = 8;
    /// Power down delay, bits 16-19
    pub const IHOLDDELAY_SHIFT: u32 = 16;
    /// Width mask of IHOLD and IRUN
    pub const CURRENT_MASK: u32 = 0x1F;
    /// Width mask of IHOLDDELAY
    pub const DELAY_MASK: u32 = 0x0F;
}
