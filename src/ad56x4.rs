//! Blocking driver
use crate::frame::{self, Frame};
use crate::transport::Transport;
use crate::{Channel, ChannelMask, Command, Error, PowerMode, SetMode, MODE};

/// AD56x4 DAC driver.
///
/// The driver is stateless: the chip select of the target chip is passed to
/// every method, so one instance can drive all chips reachable through its
/// transport. Each method returns only after all of its frames were sent, and
/// the `&mut self` borrow keeps other operations off the transport until then.
pub struct Ad56x4<T> {
    transport: T,
}

impl<T> Ad56x4<T>
where
    T: Transport,
{
    /// Create a driver on top of a transport
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Destroy the driver, return the wrapped transport
    pub fn destroy(self) -> T {
        self.transport
    }

    /// Write a 16 bit value to one or all channels.
    ///
    /// The 12 and 14 bit parts ignore the lowest 4 or 2 bits of `value`, see
    /// [`crate::Resolution::left_align`]. `mode` is a [`SetMode`], or a
    /// [`Command`] which has to be one of the three value writing commands.
    /// Any other command is rejected with [`Error::InvalidArgument`] and
    /// nothing is sent.
    /// ```
    /// # use ad56x4::*;
    /// # fn demo<T: Transport>(dac: &mut Ad56x4<T>, sync: &mut T::ChipSelect) -> Result<(), Error<T::Error>> {
    /// dac.set_channel(sync, SetMode::Input, Channel::B, 0x1234)?;
    /// dac.update_channel(sync, Channel::B)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn set_channel(
        &mut self,
        cs: &mut T::ChipSelect,
        mode: impl Into<Command>,
        chan: Channel,
        value: u16,
    ) -> Result<(), Error<T::Error>> {
        let mode = set_mode(mode.into())?;
        self.transmit(cs, frame::write(mode, chan, value))
    }

    /// Write one value per channel, `values` in D, C, B, A order.
    ///
    /// Sends four frames starting with channel D.
    pub fn set_channels(
        &mut self,
        cs: &mut T::ChipSelect,
        mode: impl Into<Command>,
        values: [u16; 4],
    ) -> Result<(), Error<T::Error>> {
        let mode = set_mode(mode.into())?;
        for f in frame::write_quad(mode, values) {
            self.transmit(cs, f)?;
        }
        Ok(())
    }

    /// [`Self::set_channels`] with one argument per channel
    pub fn set_channels_dcba(
        &mut self,
        cs: &mut T::ChipSelect,
        mode: impl Into<Command>,
        d: u16,
        c: u16,
        b: u16,
        a: u16,
    ) -> Result<(), Error<T::Error>> {
        self.set_channels(cs, mode, [d, c, b, a])
    }

    /// Load the DAC register of one or all channels from the input register
    pub fn update_channel(
        &mut self,
        cs: &mut T::ChipSelect,
        chan: Channel,
    ) -> Result<(), Error<T::Error>> {
        self.transmit(cs, frame::update(chan))
    }

    /// Apply a power mode to the selected channels, the others are untouched.
    ///
    /// `channels` is a [`ChannelMask`], a `[bool; 4]` in D, C, B, A order or a
    /// [`Channel`].
    pub fn power_up_down(
        &mut self,
        cs: &mut T::ChipSelect,
        mode: PowerMode,
        channels: impl Into<ChannelMask>,
    ) -> Result<(), Error<T::Error>> {
        self.transmit(cs, frame::power(mode, channels.into()))
    }

    /// [`Self::power_up_down`] with one flag per channel
    pub fn power_up_down_dcba(
        &mut self,
        cs: &mut T::ChipSelect,
        mode: PowerMode,
        d: bool,
        c: bool,
        b: bool,
        a: bool,
    ) -> Result<(), Error<T::Error>> {
        self.power_up_down(cs, mode, ChannelMask::from_dcba(d, c, b, a))
    }

    /// Give every channel its own power mode, `modes` in D, C, B, A order.
    ///
    /// The chip takes one mode per command, so this sends four frames.
    pub fn power_up_down_each(
        &mut self,
        cs: &mut T::ChipSelect,
        modes: [PowerMode; 4],
    ) -> Result<(), Error<T::Error>> {
        for f in frame::power_quad(modes) {
            self.transmit(cs, f)?;
        }
        Ok(())
    }

    /// Reset the input and DAC registers to zero.
    ///
    /// A full reset also powers up all channels in normal mode, switches to
    /// the external reference and clears the LDAC register.
    pub fn reset(&mut self, cs: &mut T::ChipSelect, full: bool) -> Result<(), Error<T::Error>> {
        self.transmit(cs, frame::reset(full))
    }

    /// Select the channels whose output is updated as soon as their input
    /// register is written. Unselected channels wait for an update.
    pub fn set_input_mode(
        &mut self,
        cs: &mut T::ChipSelect,
        channels: impl Into<ChannelMask>,
    ) -> Result<(), Error<T::Error>> {
        self.transmit(cs, frame::input_mode(channels.into()))
    }

    /// [`Self::set_input_mode`] with one flag per channel
    pub fn set_input_mode_dcba(
        &mut self,
        cs: &mut T::ChipSelect,
        d: bool,
        c: bool,
        b: bool,
        a: bool,
    ) -> Result<(), Error<T::Error>> {
        self.set_input_mode(cs, ChannelMask::from_dcba(d, c, b, a))
    }

    /// Switch between the internal and the external reference.
    ///
    /// Only the R variants have an internal reference, the others ignore this.
    pub fn use_internal_reference(
        &mut self,
        cs: &mut T::ChipSelect,
        on: bool,
    ) -> Result<(), Error<T::Error>> {
        self.transmit(cs, frame::reference(on))
    }

    /// Send a prebuilt frame
    pub fn write_frame(&mut self, cs: &mut T::ChipSelect, frame: Frame) -> Result<(), Error<T::Error>> {
        self.transmit(cs, frame)
    }

    fn transmit(&mut self, cs: &mut T::ChipSelect, frame: Frame) -> Result<(), Error<T::Error>> {
        #[cfg(feature = "defmt-03")]
        defmt::trace!("AD56x4 {}", frame);
        self.transport.configure(MODE).map_err(Error::Spi)?;
        self.transport
            .write_frame(cs, &frame.to_bytes())
            .map_err(Error::Spi)
    }
}

pub(crate) fn set_mode<E>(cmd: Command) -> Result<SetMode, Error<E>> {
    SetMode::try_from(cmd).map_err(|_cmd| {
        #[cfg(feature = "defmt-03")]
        defmt::warn!("AD56x4 {} is not a set mode, nothing sent", _cmd);
        Error::InvalidArgument
    })
}
