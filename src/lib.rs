//! Driver for the Analog Devices AD56x4 family of quad channel 12/14/16bit DACs
//!
//! Supported parts are the AD5624, AD5664 and the internal reference variants
//! AD5624R, AD5644R and AD5664R. All of them share one write-only SPI protocol:
//! every command is a 24 bit frame made of a command, a channel address and a
//! 16 bit data word.
//!
//! The driver holds no chip state. A single [`Ad56x4`] can talk to any number
//! of chips, the chip select of the target chip is passed on every call.
//!
//! ```
//! # use embedded_hal_mock::eh1::spi::{Mock as MockSpi, Transaction as SpiTransaction};
//! # use embedded_hal_mock::eh1::pin::{Mock as MockPin, State, Transaction as PinTransaction};
//! # let bus = MockSpi::new(&[
//! #     SpiTransaction::write_vec(vec![0b0001_1001, 0x80, 0x00]),
//! #     SpiTransaction::flush(),
//! # ]);
//! # let mut sync = MockPin::new(&[
//! #     PinTransaction::set(State::Low),
//! #     PinTransaction::set(State::High),
//! # ]);
//! use ad56x4::{Ad56x4, BusTransport, Channel, SetMode};
//!
//! let mut dac = Ad56x4::new(BusTransport::new(bus));
//! dac.set_channel(&mut sync, SetMode::InputAndDac, Channel::B, 0x8000)
//!     .unwrap();
//! # dac.destroy().release().done();
//! # sync.done();
//! ```

#![deny(unsafe_code, missing_docs)]
#![no_std]

use bitfield_struct::bitfield;

mod ad56x4;
pub mod asynch;
pub mod frame;
mod model;
pub mod transport;

pub use crate::ad56x4::Ad56x4;
pub use crate::asynch::Ad56x4Async;
pub use crate::frame::Frame;
pub use crate::model::{Model, Resolution};
pub use crate::transport::{AsyncTransport, BusError, BusTransport, DeviceTransport, Transport};

/// SPI mode required by the chip: clock idle low, data sampled on the falling edge
pub const MODE: embedded_hal::spi::Mode = embedded_hal::spi::MODE_1;

/// Highest SCLK frequency the chip is rated for
pub const MAX_FREQUENCY_HZ: u32 = 50_000_000;

/// Number of bytes in one command frame
pub const FRAME_LEN: usize = 3;

/// Errors for this crate
#[derive(Debug)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Error<E> {
    /// Transport communication error
    Spi(E),
    /// Invalid argument, nothing was sent to the chip
    InvalidArgument,
}

/// The eight commands understood by the chip
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Command {
    /// Write to the input register of a channel
    WriteInput,
    /// Copy the input register of a channel to its DAC register
    UpdateDac,
    /// Write to the input register of a channel, then update all DAC registers
    WriteInputUpdateAll,
    /// Write to the input and DAC register of a channel
    WriteUpdateChannel,
    /// Apply a power mode to a set of channels
    PowerUpDown,
    /// Reset the registers, optionally the whole device
    Reset,
    /// Select which channels update their output on an input register write
    SetLdac,
    /// Turn the internal reference on or off
    ReferenceOnOff,
}

impl From<Command> for u8 {
    fn from(cmd: Command) -> Self {
        match cmd {
            Command::WriteInput => 0b000,
            Command::UpdateDac => 0b001,
            Command::WriteInputUpdateAll => 0b010,
            Command::WriteUpdateChannel => 0b011,
            Command::PowerUpDown => 0b100,
            Command::Reset => 0b101,
            Command::SetLdac => 0b110,
            Command::ReferenceOnOff => 0b111,
        }
    }
}

impl Command {
    /// Decode a command from its 3 bit code, higher bits are ignored
    pub fn from_code(code: u8) -> Self {
        match code & 0b111 {
            0b000 => Self::WriteInput,
            0b001 => Self::UpdateDac,
            0b010 => Self::WriteInputUpdateAll,
            0b011 => Self::WriteUpdateChannel,
            0b100 => Self::PowerUpDown,
            0b101 => Self::Reset,
            0b110 => Self::SetLdac,
            _ => Self::ReferenceOnOff,
        }
    }
}

/// How a value is written to a channel
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum SetMode {
    /// Only write the input register, the output is unchanged until updated
    Input,
    /// Write the input register and update the output of the channel
    InputAndDac,
    /// Write the input register and update the outputs of all channels
    InputAndDacAll,
}

impl From<SetMode> for Command {
    fn from(mode: SetMode) -> Self {
        match mode {
            SetMode::Input => Command::WriteInput,
            SetMode::InputAndDac => Command::WriteUpdateChannel,
            SetMode::InputAndDacAll => Command::WriteInputUpdateAll,
        }
    }
}

impl TryFrom<Command> for SetMode {
    type Error = Command;

    fn try_from(cmd: Command) -> Result<Self, Self::Error> {
        match cmd {
            Command::WriteInput => Ok(SetMode::Input),
            Command::WriteUpdateChannel => Ok(SetMode::InputAndDac),
            Command::WriteInputUpdateAll => Ok(SetMode::InputAndDacAll),
            other => Err(other),
        }
    }
}

/// Dac Channel
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Channel {
    /// DAC Channel A
    A,
    /// DAC Channel B
    B,
    /// DAC Channel C
    C,
    /// DAC Channel D
    D,
    /// All DAC Channels
    All,
}

impl Channel {
    /// The four single channels in the D, C, B, A order used by array arguments
    pub const DCBA: [Channel; 4] = [Channel::D, Channel::C, Channel::B, Channel::A];

    /// Decode a channel from its 3 bit address, `None` for reserved addresses
    pub fn from_code(code: u8) -> Option<Self> {
        match code & 0b111 {
            0b000 => Some(Self::A),
            0b001 => Some(Self::B),
            0b010 => Some(Self::C),
            0b011 => Some(Self::D),
            0b111 => Some(Self::All),
            _ => None,
        }
    }
}

impl From<Channel> for u8 {
    fn from(chan: Channel) -> Self {
        match chan {
            Channel::A => 0b000,
            Channel::B => 0b001,
            Channel::C => 0b010,
            Channel::D => 0b011,
            Channel::All => 0b111,
        }
    }
}

/// Output state of a channel
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum PowerMode {
    /// Normal operation
    Normal,
    /// Powered down, output connected to ground through 1kΩ
    PowerDown1k,
    /// Powered down, output connected to ground through 100kΩ
    PowerDown100k,
    /// Powered down, output in tri-state
    Tristate,
}

impl PowerMode {
    /// Decode a power mode from its 2 bit code, higher bits are ignored
    pub fn from_code(code: u8) -> Self {
        match code & 0b11 {
            0b00 => Self::Normal,
            0b01 => Self::PowerDown1k,
            0b10 => Self::PowerDown100k,
            _ => Self::Tristate,
        }
    }
}

impl From<PowerMode> for u8 {
    fn from(mode: PowerMode) -> Self {
        match mode {
            PowerMode::Normal => 0b00,
            PowerMode::PowerDown1k => 0b01,
            PowerMode::PowerDown100k => 0b10,
            PowerMode::Tristate => 0b11,
        }
    }
}

/// Selection of channels for the power and input mode commands.
///
/// Bit 3 to 0 correspond to channel D to A. Array and argument lists are
/// always given in D, C, B, A order.
#[bitfield(u8)]
pub struct ChannelMask {
    /// Channel A selected
    pub a: bool,
    /// Channel B selected
    pub b: bool,
    /// Channel C selected
    pub c: bool,
    /// Channel D selected
    pub d: bool,
    #[bits(4)]
    _reserved: u8,
}

impl ChannelMask {
    /// Build a mask from one flag per channel, in D, C, B, A order
    pub fn from_dcba(d: bool, c: bool, b: bool, a: bool) -> Self {
        Self::new().with_d(d).with_c(c).with_b(b).with_a(a)
    }

    /// Mask with every channel selected
    pub fn all() -> Self {
        Self::from_dcba(true, true, true, true)
    }

    /// Mask selecting a single channel, or all of them for [`Channel::All`]
    pub fn only(chan: Channel) -> Self {
        match chan {
            Channel::A => Self::new().with_a(true),
            Channel::B => Self::new().with_b(true),
            Channel::C => Self::new().with_c(true),
            Channel::D => Self::new().with_d(true),
            Channel::All => Self::all(),
        }
    }

    /// The 4 bit field as sent in the data word
    pub fn bits(&self) -> u8 {
        u8::from(*self) & 0x0f
    }
}

// the reserved upper nibble is never sent
impl PartialEq for ChannelMask {
    fn eq(&self, other: &Self) -> bool {
        self.bits() == other.bits()
    }
}

impl Eq for ChannelMask {}

impl From<[bool; 4]> for ChannelMask {
    fn from(dcba: [bool; 4]) -> Self {
        let [d, c, b, a] = dcba;
        Self::from_dcba(d, c, b, a)
    }
}

impl From<Channel> for ChannelMask {
    fn from(chan: Channel) -> Self {
        Self::only(chan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_bit_order_is_dcba() {
        assert_eq!(ChannelMask::from([true, false, true, false]).bits(), 0b1010);
        assert_eq!(ChannelMask::from([false; 4]).bits(), 0);
        assert_eq!(ChannelMask::from([true; 4]).bits(), 0b1111);
        assert_eq!(ChannelMask::from_dcba(false, false, false, true).bits(), 0b0001);
        assert_eq!(ChannelMask::from_dcba(true, false, false, false).bits(), 0b1000);
    }

    #[test]
    fn mask_from_channel() {
        assert_eq!(ChannelMask::from(Channel::A).bits(), 0b0001);
        assert_eq!(ChannelMask::from(Channel::C).bits(), 0b0100);
        assert_eq!(ChannelMask::from(Channel::All), ChannelMask::all());
    }

    #[test]
    fn mask_equality_ignores_reserved_bits() {
        assert_eq!(ChannelMask::from(0xffu8), ChannelMask::all());
        assert_eq!(ChannelMask::from(0xa5u8), ChannelMask::from_dcba(false, true, false, true));
        assert_ne!(ChannelMask::from(0xf0u8), ChannelMask::all());
    }

    #[test]
    fn wire_codes() {
        let codes: [u8; 5] = [Channel::A, Channel::B, Channel::C, Channel::D, Channel::All]
            .map(u8::from);
        assert_eq!(codes, [0, 1, 2, 3, 7]);
        assert_eq!(Channel::from_code(0b100), None);
        assert_eq!(u8::from(Command::from(SetMode::InputAndDac)), 0b011);
        assert_eq!(u8::from(Command::from(SetMode::InputAndDacAll)), 0b010);
        assert_eq!(u8::from(PowerMode::PowerDown100k), 0b10);
        for code in 0..8 {
            assert_eq!(u8::from(Command::from_code(code)), code);
        }
    }

    #[test]
    fn only_value_commands_are_set_modes() {
        assert_eq!(SetMode::try_from(Command::WriteInput), Ok(SetMode::Input));
        assert_eq!(SetMode::try_from(Command::UpdateDac), Err(Command::UpdateDac));
        assert_eq!(SetMode::try_from(Command::Reset), Err(Command::Reset));
    }
}
