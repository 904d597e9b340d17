use ad56x4::{
    Ad56x4Async, AsyncTransport, BusError, BusTransport, Channel, Command, DeviceTransport, Error,
    Frame, PowerMode, SetMode, FRAME_LEN,
};
use embassy_futures::block_on;
use embedded_hal::spi::{ErrorKind, ErrorType, Operation};
use embedded_hal_async::spi::{SpiBus, SpiDevice};
use embedded_hal_mock::eh1::pin::{Mock as MockPin, State, Transaction as PinTransaction};

#[derive(Default)]
struct Recorder {
    sent: Vec<(&'static str, Frame)>,
}

impl AsyncTransport for Recorder {
    type ChipSelect = &'static str;
    type Error = core::convert::Infallible;

    async fn write_frame(
        &mut self,
        cs: &mut &'static str,
        frame: &[u8; FRAME_LEN],
    ) -> Result<(), Self::Error> {
        self.sent.push((*cs, Frame::from(*frame)));
        Ok(())
    }
}

#[test]
fn buffer_then_commit() {
    let mut dac = Ad56x4Async::new(Recorder::default());
    let mut sync = "dac0";
    block_on(async {
        dac.set_channel(&mut sync, SetMode::Input, Channel::B, 0x1234)
            .await
            .unwrap();
        dac.update_channel(&mut sync, Channel::B).await.unwrap();
    });
    assert_eq!(
        dac.destroy().sent,
        vec![
            ("dac0", Frame::new(Command::WriteInput, Channel::B, 0x1234)),
            ("dac0", Frame::new(Command::UpdateDac, Channel::B, 0x0000)),
        ]
    );
}

#[test]
fn multi_frame_operations() {
    let mut dac = Ad56x4Async::new(Recorder::default());
    let mut sync = "dac1";
    block_on(async {
        dac.set_channels_dcba(&mut sync, SetMode::InputAndDac, 4, 3, 2, 1)
            .await
            .unwrap();
        dac.power_up_down_each(
            &mut sync,
            [
                PowerMode::Tristate,
                PowerMode::Normal,
                PowerMode::Normal,
                PowerMode::PowerDown1k,
            ],
        )
        .await
        .unwrap();
    });
    let bytes: Vec<[u8; 3]> = dac
        .destroy()
        .sent
        .iter()
        .map(|(_, f)| f.to_bytes())
        .collect();
    assert_eq!(
        bytes,
        vec![
            [0b0001_1011, 0, 4],
            [0b0001_1010, 0, 3],
            [0b0001_1001, 0, 2],
            [0b0001_1000, 0, 1],
            [0b0010_0000, 0, 0b0011_1000],
            [0b0010_0000, 0, 0b0000_0100],
            [0b0010_0000, 0, 0b0000_0010],
            [0b0010_0000, 0, 0b0001_0001],
        ]
    );
}

#[test]
fn control_commands() {
    let mut dac = Ad56x4Async::new(Recorder::default());
    let mut sync = "dac2";
    block_on(async {
        dac.reset(&mut sync, true).await.unwrap();
        dac.set_input_mode_dcba(&mut sync, false, true, false, false)
            .await
            .unwrap();
        dac.power_up_down_dcba(&mut sync, PowerMode::PowerDown100k, false, false, true, true)
            .await
            .unwrap();
        dac.use_internal_reference(&mut sync, true).await.unwrap();
    });
    let bytes: Vec<[u8; 3]> = dac
        .destroy()
        .sent
        .iter()
        .map(|(_, f)| f.to_bytes())
        .collect();
    assert_eq!(
        bytes,
        vec![
            [0b0010_1000, 0, 1],
            [0b0011_0000, 0, 0b0100],
            [0b0010_0000, 0, 0b0010_0011],
            [0b0011_1000, 0, 1],
        ]
    );
}

#[test]
fn invalid_mode_sends_nothing() {
    let mut dac = Ad56x4Async::new(Recorder::default());
    let mut sync = "dac3";
    let result = block_on(dac.set_channels(&mut sync, Command::Reset, [1, 2, 3, 4]));
    assert!(matches!(result, Err(Error::InvalidArgument)));
    assert!(dac.destroy().sent.is_empty());
}

/// Async bus that keeps what was written, or fails every write
#[derive(Default)]
struct Bus {
    written: Vec<Vec<u8>>,
    flushes: usize,
    broken: bool,
}

impl ErrorType for Bus {
    type Error = ErrorKind;
}

impl SpiBus for Bus {
    async fn read(&mut self, _words: &mut [u8]) -> Result<(), ErrorKind> {
        Err(ErrorKind::Other)
    }
    async fn write(&mut self, words: &[u8]) -> Result<(), ErrorKind> {
        if self.broken {
            return Err(ErrorKind::Other);
        }
        self.written.push(words.to_vec());
        Ok(())
    }
    async fn transfer(&mut self, _read: &mut [u8], _write: &[u8]) -> Result<(), ErrorKind> {
        Err(ErrorKind::Other)
    }
    async fn transfer_in_place(&mut self, _words: &mut [u8]) -> Result<(), ErrorKind> {
        Err(ErrorKind::Other)
    }
    async fn flush(&mut self) -> Result<(), ErrorKind> {
        self.flushes += 1;
        Ok(())
    }
}

/// Async device that keeps the writes of each transaction
#[derive(Default)]
struct Device {
    transactions: Vec<Vec<Vec<u8>>>,
}

impl ErrorType for Device {
    type Error = ErrorKind;
}

impl SpiDevice for Device {
    async fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), ErrorKind> {
        let mut writes = Vec::new();
        for op in operations.iter() {
            match op {
                Operation::Write(words) => writes.push(words.to_vec()),
                _ => return Err(ErrorKind::Other),
            }
        }
        self.transactions.push(writes);
        Ok(())
    }
}

fn framed(count: usize) -> Vec<PinTransaction> {
    let mut pin = Vec::new();
    for _ in 0..count {
        pin.push(PinTransaction::set(State::Low));
        pin.push(PinTransaction::set(State::High));
    }
    pin
}

#[test]
fn bus_transport_frames() {
    let mut sync = MockPin::new(&framed(2));
    let mut dac = Ad56x4Async::new(BusTransport::new(Bus::default()));
    block_on(async {
        dac.set_channel(&mut sync, SetMode::Input, Channel::C, 0xBEEF)
            .await
            .unwrap();
        dac.update_channel(&mut sync, Channel::All).await.unwrap();
    });
    let bus = dac.destroy().release();
    assert_eq!(
        bus.written,
        vec![vec![0b0000_0010, 0xBE, 0xEF], vec![0b0000_1111, 0, 0]]
    );
    assert_eq!(bus.flushes, 2);
    sync.done();
}

#[test]
fn bus_transport_releases_sync_on_error() {
    let mut sync = MockPin::new(&framed(1));
    let mut dac = Ad56x4Async::new(BusTransport::new(Bus {
        broken: true,
        ..Default::default()
    }));
    let result = block_on(dac.set_channels(&mut sync, SetMode::Input, [1, 2, 3, 4]));
    assert!(matches!(
        result,
        Err(Error::Spi(BusError::Spi(ErrorKind::Other)))
    ));
    let bus = dac.destroy().release();
    assert!(bus.written.is_empty());
    assert_eq!(bus.flushes, 0);
    sync.done();
}

#[test]
fn device_transport_one_transaction_per_frame() {
    let mut chip = Device::default();
    let mut dac = Ad56x4Async::new(DeviceTransport::new());
    block_on(async {
        dac.power_up_down_each(&mut chip, [PowerMode::Normal; 4])
            .await
            .unwrap();
        dac.reset(&mut chip, false).await.unwrap();
    });
    assert_eq!(
        chip.transactions,
        vec![
            vec![vec![0b0010_0000, 0, 0b1000]],
            vec![vec![0b0010_0000, 0, 0b0100]],
            vec![vec![0b0010_0000, 0, 0b0010]],
            vec![vec![0b0010_0000, 0, 0b0001]],
            vec![vec![0b0010_1000, 0, 0]],
        ]
    );
}
