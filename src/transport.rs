//! Bus access used by the drivers
//!
//! A transport shifts out one 3 byte frame to one chip. The chip is named by
//! a [`Transport::ChipSelect`] handle on every call, which lets one driver
//! serve several chips. Two transports are provided:
//!
//! - [`BusTransport`] owns an [`SpiBus`] and toggles the SYNC line given as an
//!   [`OutputPin`].
//! - [`DeviceTransport`] owns nothing, the chip select handle is an
//!   [`SpiDevice`], for example an `embedded-hal-bus` device sharing its bus
//!   with other chips.
use core::fmt::Debug;
use core::marker::PhantomData;

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::{Mode, SpiBus, SpiDevice};

use crate::FRAME_LEN;

/// Errors of a [`BusTransport`]
#[derive(Debug)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum BusError<S, P> {
    /// SPI bus error
    Spi(S),
    /// SYNC pin error
    Pin(P),
}

/// Blocking frame transport
pub trait Transport {
    /// Handle selecting one chip
    type ChipSelect: ?Sized;
    /// Transport error
    type Error: Debug;

    /// Apply the SPI mode before a frame is sent.
    ///
    /// embedded-hal buses are configured when they are created, so the
    /// default does nothing. Transports over a reconfigurable bus override it.
    fn configure(&mut self, mode: Mode) -> Result<(), Self::Error> {
        let _ = mode;
        Ok(())
    }

    /// Select the chip, shift out `frame` MSB first and deselect the chip
    fn write_frame(
        &mut self,
        cs: &mut Self::ChipSelect,
        frame: &[u8; FRAME_LEN],
    ) -> Result<(), Self::Error>;
}

/// Async frame transport, same contract as [`Transport`]
#[allow(async_fn_in_trait)]
pub trait AsyncTransport {
    /// Handle selecting one chip
    type ChipSelect: ?Sized;
    /// Transport error
    type Error: Debug;

    /// Apply the SPI mode before a frame is sent, does nothing by default
    async fn configure(&mut self, mode: Mode) -> Result<(), Self::Error> {
        let _ = mode;
        Ok(())
    }

    /// Select the chip, shift out `frame` MSB first and deselect the chip
    async fn write_frame(
        &mut self,
        cs: &mut Self::ChipSelect,
        frame: &[u8; FRAME_LEN],
    ) -> Result<(), Self::Error>;
}

/// Transport over an exclusively owned SPI bus with a SYNC pin per chip
pub struct BusTransport<BUS, CS> {
    bus: BUS,
    _cs: PhantomData<fn(CS)>,
}

impl<BUS, CS> BusTransport<BUS, CS> {
    /// Wrap a bus. It must already be set to [`crate::MODE`]
    pub fn new(bus: BUS) -> Self {
        Self {
            bus,
            _cs: PhantomData,
        }
    }

    /// Give back the wrapped bus
    pub fn release(self) -> BUS {
        self.bus
    }
}

impl<BUS, CS> Transport for BusTransport<BUS, CS>
where
    BUS: SpiBus,
    CS: OutputPin,
{
    type ChipSelect = CS;
    type Error = BusError<BUS::Error, CS::Error>;

    fn write_frame(&mut self, cs: &mut CS, frame: &[u8; FRAME_LEN]) -> Result<(), Self::Error> {
        cs.set_low().map_err(BusError::Pin)?;
        // SYNC has to go high again even when the write failed
        let written = self
            .bus
            .write(frame)
            .and_then(|_| self.bus.flush())
            .map_err(BusError::Spi);
        let released = cs.set_high().map_err(BusError::Pin);
        written.and(released)
    }
}

impl<BUS, CS> AsyncTransport for BusTransport<BUS, CS>
where
    BUS: embedded_hal_async::spi::SpiBus,
    CS: OutputPin,
{
    type ChipSelect = CS;
    type Error = BusError<BUS::Error, CS::Error>;

    async fn write_frame(
        &mut self,
        cs: &mut CS,
        frame: &[u8; FRAME_LEN],
    ) -> Result<(), Self::Error> {
        cs.set_low().map_err(BusError::Pin)?;
        let mut written = self.bus.write(frame).await;
        if written.is_ok() {
            written = self.bus.flush().await;
        }
        let released = cs.set_high().map_err(BusError::Pin);
        written.map_err(BusError::Spi).and(released)
    }
}

/// Transport where every chip is its own [`SpiDevice`]
pub struct DeviceTransport<D> {
    _dev: PhantomData<fn(D)>,
}

impl<D> DeviceTransport<D> {
    /// Create the transport
    pub fn new() -> Self {
        Self { _dev: PhantomData }
    }
}

impl<D> Default for DeviceTransport<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Transport for DeviceTransport<D>
where
    D: SpiDevice,
{
    type ChipSelect = D;
    type Error = D::Error;

    fn write_frame(&mut self, cs: &mut D, frame: &[u8; FRAME_LEN]) -> Result<(), Self::Error> {
        // one transaction per frame, the device frames it with its chip select
        cs.write(frame)
    }
}

impl<D> AsyncTransport for DeviceTransport<D>
where
    D: embedded_hal_async::spi::SpiDevice,
{
    type ChipSelect = D;
    type Error = D::Error;

    async fn write_frame(&mut self, cs: &mut D, frame: &[u8; FRAME_LEN]) -> Result<(), Self::Error> {
        cs.write(frame).await
    }
}
