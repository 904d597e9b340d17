//! Async driver
//!
//! Same operations and frames as [`crate::Ad56x4`], over an
//! [`AsyncTransport`] built on `embedded-hal-async`.
use crate::ad56x4::set_mode;
use crate::frame::{self, Frame};
use crate::transport::AsyncTransport;
use crate::{Channel, ChannelMask, Command, Error, PowerMode, MODE};

/// Async AD56x4 DAC driver
pub struct Ad56x4Async<T> {
    transport: T,
}

impl<T> Ad56x4Async<T>
where
    T: AsyncTransport,
{
    /// Create a driver on top of an async transport
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Destroy the driver, return the wrapped transport
    pub fn destroy(self) -> T {
        self.transport
    }

    /// See [`crate::Ad56x4::set_channel`]
    pub async fn set_channel(
        &mut self,
        cs: &mut T::ChipSelect,
        mode: impl Into<Command>,
        chan: Channel,
        value: u16,
    ) -> Result<(), Error<T::Error>> {
        let mode = set_mode(mode.into())?;
        self.transmit(cs, frame::write(mode, chan, value)).await
    }

    /// See [`crate::Ad56x4::set_channels`]
    pub async fn set_channels(
        &mut self,
        cs: &mut T::ChipSelect,
        mode: impl Into<Command>,
        values: [u16; 4],
    ) -> Result<(), Error<T::Error>> {
        let mode = set_mode(mode.into())?;
        for f in frame::write_quad(mode, values) {
            self.transmit(cs, f).await?;
        }
        Ok(())
    }

    /// See [`crate::Ad56x4::set_channels_dcba`]
    pub async fn set_channels_dcba(
        &mut self,
        cs: &mut T::ChipSelect,
        mode: impl Into<Command>,
        d: u16,
        c: u16,
        b: u16,
        a: u16,
    ) -> Result<(), Error<T::Error>> {
        self.set_channels(cs, mode, [d, c, b, a]).await
    }

    /// See [`crate::Ad56x4::update_channel`]
    pub async fn update_channel(
        &mut self,
        cs: &mut T::ChipSelect,
        chan: Channel,
    ) -> Result<(), Error<T::Error>> {
        self.transmit(cs, frame::update(chan)).await
    }

    /// See [`crate::Ad56x4::power_up_down`]
    pub async fn power_up_down(
        &mut self,
        cs: &mut T::ChipSelect,
        mode: PowerMode,
        channels: impl Into<ChannelMask>,
    ) -> Result<(), Error<T::Error>> {
        self.transmit(cs, frame::power(mode, channels.into())).await
    }

    /// See [`crate::Ad56x4::power_up_down_dcba`]
    pub async fn power_up_down_dcba(
        &mut self,
        cs: &mut T::ChipSelect,
        mode: PowerMode,
        d: bool,
        c: bool,
        b: bool,
        a: bool,
    ) -> Result<(), Error<T::Error>> {
        self.power_up_down(cs, mode, ChannelMask::from_dcba(d, c, b, a))
            .await
    }

    /// See [`crate::Ad56x4::power_up_down_each`]
    pub async fn power_up_down_each(
        &mut self,
        cs: &mut T::ChipSelect,
        modes: [PowerMode; 4],
    ) -> Result<(), Error<T::Error>> {
        for f in frame::power_quad(modes) {
            self.transmit(cs, f).await?;
        }
        Ok(())
    }

    /// See [`crate::Ad56x4::reset`]
    pub async fn reset(&mut self, cs: &mut T::ChipSelect, full: bool) -> Result<(), Error<T::Error>> {
        self.transmit(cs, frame::reset(full)).await
    }

    /// See [`crate::Ad56x4::set_input_mode`]
    pub async fn set_input_mode(
        &mut self,
        cs: &mut T::ChipSelect,
        channels: impl Into<ChannelMask>,
    ) -> Result<(), Error<T::Error>> {
        self.transmit(cs, frame::input_mode(channels.into())).await
    }

    /// See [`crate::Ad56x4::set_input_mode_dcba`]
    pub async fn set_input_mode_dcba(
        &mut self,
        cs: &mut T::ChipSelect,
        d: bool,
        c: bool,
        b: bool,
        a: bool,
    ) -> Result<(), Error<T::Error>> {
        self.set_input_mode(cs, ChannelMask::from_dcba(d, c, b, a))
            .await
    }

    /// See [`crate::Ad56x4::use_internal_reference`]
    pub async fn use_internal_reference(
        &mut self,
        cs: &mut T::ChipSelect,
        on: bool,
    ) -> Result<(), Error<T::Error>> {
        self.transmit(cs, frame::reference(on)).await
    }

    /// See [`crate::Ad56x4::write_frame`]
    pub async fn write_frame(
        &mut self,
        cs: &mut T::ChipSelect,
        frame: Frame,
    ) -> Result<(), Error<T::Error>> {
        self.transmit(cs, frame).await
    }

    async fn transmit(&mut self, cs: &mut T::ChipSelect, frame: Frame) -> Result<(), Error<T::Error>> {
        #[cfg(feature = "defmt-03")]
        defmt::trace!("AD56x4 {}", frame);
        self.transport.configure(MODE).await.map_err(Error::Spi)?;
        self.transport
            .write_frame(cs, &frame.to_bytes())
            .await
            .map_err(Error::Spi)
    }
}
