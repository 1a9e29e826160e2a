use crate::hw_def::MEASUREMENT_LEN;
use crate::logging::warn;
use crate::types::Error;

use crc::{Algorithm, Crc};

/// CRC-8 used by the HTU21D: x^8 + x^5 + x^4 + 1, MSB first, zero init, no final XOR.
///
/// This is the datasheet's 0x13100 divisor applied to a 16-bit word, expressed byte-wise.
const CRC_8_HTU21D: Algorithm<u8> = Algorithm {
    width: 8,
    poly: 0x31,
    init: 0x00,
    refin: false,
    refout: false,
    xorout: 0x00,
    check: 0xa2,
    residue: 0x00,
};

const CRC: Crc<u8> = Crc::<u8>::new(&CRC_8_HTU21D);

/// Checksum of a 16-bit measurement code as the device computes it
pub fn crc8(word: u16) -> u8 {
    CRC.checksum(&word.to_be_bytes())
}

/// Validate a `[MSB, LSB, CRC]` response and assemble the raw code
pub(crate) fn decode_measurement<E>(buf: &[u8; MEASUREMENT_LEN]) -> Result<u16, Error<E>> {
    let raw = u16::from_be_bytes([buf[0], buf[1]]);
    let expected = crc8(raw);
    let received = buf[2];
    if expected != received {
        warn!("htu21d: crc mismatch: raw={:#x}, received={:#x}, expected={:#x}", raw, received, expected);
        return Err(Error::CrcMismatch { expected, received });
    }
    Ok(raw)
}
