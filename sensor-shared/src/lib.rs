#![cfg_attr(not(test), no_std)]

//! Types shared between sensor front ends (hardware or simulated) and the
//! code that drives them.

pub mod retry;

pub use retry::Retry;

use num_enum::IntoPrimitive;

/// One photodetector sample pair from the sensor FIFO.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawSample {
    pub red: u32,
    pub ir: u32,
}

/// Failure modes of a single bus transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadError {
    BusWrite,
    BusRead,
}

/// Anything that can hand the pipeline one sample per tick.
pub trait SampleSource {
    fn read_fifo(&mut self) -> Result<RawSample, ReadError>;
}

/// MAX30102 register addresses touched by bring-up and sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive)]
#[repr(u8)]
pub enum Reg {
    IntStatus1 = 0x00,
    IntEnable1 = 0x01,
    FifoWritePtr = 0x04,
    FifoReadPtr = 0x06,
    FifoData = 0x07,
    FifoConfig = 0x08,
    ModeConfig = 0x09,
    Spo2Config = 0x0a,
    Led1PulseAmp = 0x0c,
    Led2PulseAmp = 0x0d,
    RevisionId = 0xfe,
    PartId = 0xff,
}

/// Bring-up register writes: SpO2 mode, 100Hz/18-bit ADC, both LEDs on,
/// FIFO cleared.
pub const INIT_SEQUENCE: [(Reg, u8); 5] = [
    (Reg::ModeConfig, 0x03),
    (Reg::Spo2Config, 0x27),
    (Reg::Led1PulseAmp, 0x24),
    (Reg::Led2PulseAmp, 0x24),
    (Reg::FifoConfig, 0x00),
];

/// Raw 6-byte FIFO frame: 3 red bytes then 3 infrared bytes, big endian,
/// 18 significant bits per channel.
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct FifoFrame {
    pub red: [u8; 3],
    pub ir: [u8; 3],
}

const ADC_MASK: u32 = (1 << 18) - 1;

fn channel(bytes: [u8; 3]) -> u32 {
    let raw = (bytes[0] as u32) << 16 | (bytes[1] as u32) << 8 | bytes[2] as u32;
    raw & ADC_MASK
}

impl FifoFrame {
    pub fn parse(&self) -> RawSample {
        RawSample {
            red: channel(self.red),
            ir: channel(self.ir),
        }
    }
}
