//! Wire encoding of the 24 bit command frame
//!
//! ```text
//! Byte 0:  [ x  x  C2 C1 C0 A2 A1 A0 ]
//! Byte 1:  [ D15 ... D8 ]
//! Byte 2:  [ D7  ... D0 ]
//! ```
//!
//! The builders in this module are shared by the blocking and the async
//! driver, they only compute frames and never touch the bus.
use bitfield_struct::bitfield;

use crate::{Channel, ChannelMask, Command, PowerMode, SetMode, FRAME_LEN};

#[bitfield(u8)]
struct CommandByte {
    #[bits(3)]
    addr: u8,

    #[bits(3)]
    cmd: u8,

    #[bits(2)]
    _dont_care: u8,
}

/// Data word of the power up/down command
#[bitfield(u16)]
struct PowerData {
    #[bits(4)]
    channels: u8,

    #[bits(2)]
    mode: u8,

    #[bits(10)]
    _unused: u16,
}

/// One command as sent to the chip
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Frame {
    command: Command,
    address: u8,
    data: u16,
}

impl Frame {
    /// Frame addressing a channel
    pub fn new(command: Command, chan: Channel, data: u16) -> Self {
        Self {
            command,
            address: u8::from(chan),
            data,
        }
    }

    /// Frame for a command that does not use the address bits, they are sent as 0
    pub fn control(command: Command, data: u16) -> Self {
        Self {
            command,
            address: 0,
            data,
        }
    }

    /// The command of this frame
    pub fn command(&self) -> Command {
        self.command
    }

    /// The raw 3 bit address field
    pub fn address(&self) -> u8 {
        self.address
    }

    /// The addressed channel, `None` if the address is reserved
    pub fn channel(&self) -> Option<Channel> {
        Channel::from_code(self.address)
    }

    /// The 16 bit data word
    pub fn data(&self) -> u16 {
        self.data
    }

    /// Serialize into the 3 bytes shifted out MSB first
    pub fn to_bytes(&self) -> [u8; FRAME_LEN] {
        [
            CommandByte::new()
                .with_addr(self.address & 0b111)
                .with_cmd(u8::from(self.command))
                .into(),
            (self.data >> 8) as u8,
            self.data as u8,
        ]
    }
}

impl From<Frame> for [u8; FRAME_LEN] {
    fn from(frame: Frame) -> Self {
        frame.to_bytes()
    }
}

impl From<[u8; FRAME_LEN]> for Frame {
    fn from(bytes: [u8; FRAME_LEN]) -> Self {
        let head = CommandByte::from(bytes[0]);
        Self {
            command: Command::from_code(head.cmd()),
            address: head.addr(),
            data: u16::from_be_bytes([bytes[1], bytes[2]]),
        }
    }
}

/// Write a value to one or all channels
pub fn write(mode: SetMode, chan: Channel, value: u16) -> Frame {
    Frame::new(Command::from(mode), chan, value)
}

/// Write one value per channel, given and emitted in D, C, B, A order
pub fn write_quad(mode: SetMode, values: [u16; 4]) -> [Frame; 4] {
    let mut frames = [Frame::control(Command::from(mode), 0); 4];
    for (frame, (chan, value)) in frames.iter_mut().zip(Channel::DCBA.into_iter().zip(values)) {
        *frame = write(mode, chan, value);
    }
    frames
}

/// Copy the input register of a channel to its output
pub fn update(chan: Channel) -> Frame {
    Frame::new(Command::UpdateDac, chan, 0)
}

/// Apply one power mode to the selected channels
pub fn power(mode: PowerMode, mask: ChannelMask) -> Frame {
    let data = PowerData::new()
        .with_mode(u8::from(mode))
        .with_channels(mask.bits());
    Frame::control(Command::PowerUpDown, data.into())
}

/// One power frame per channel, modes given and emitted in D, C, B, A order.
///
/// A single frame can only carry one mode, so each frame selects just its own
/// channel.
pub fn power_quad(modes: [PowerMode; 4]) -> [Frame; 4] {
    let mut frames = [Frame::control(Command::PowerUpDown, 0); 4];
    for (frame, (chan, mode)) in frames.iter_mut().zip(Channel::DCBA.into_iter().zip(modes)) {
        *frame = power(mode, ChannelMask::only(chan));
    }
    frames
}

/// Reset the input and DAC registers, with `full` also power, reference and
/// LDAC settings
pub fn reset(full: bool) -> Frame {
    Frame::control(Command::Reset, u16::from(full))
}

/// Select the channels whose output follows their input register
pub fn input_mode(mask: ChannelMask) -> Frame {
    Frame::control(Command::SetLdac, u16::from(mask.bits()))
}

/// Turn the internal reference on or off
pub fn reference(on: bool) -> Frame {
    Frame::control(Command::ReferenceOnOff, u16::from(on))
}
