//! SFDP (Serial Flash Discoverable Parameters) support
//!
//! Reads and validates the JESD216 header and the parameter headers that
//! follow it. Parsing of the parameter tables themselves is left to the
//! caller; [`density_bytes`] covers the one field most callers need.

mod types;

pub use types::*;

use crate::error::{Error, Result};
use crate::flash::SerialFlash;
use crate::transport::SpiTransport;
use maybe_async::maybe_async;

/// Read the SFDP header and verify signature and major revision
#[maybe_async]
pub async fn read_header<T: SpiTransport>(flash: &mut SerialFlash<T>) -> Result<SfdpHeader> {
    let mut buf = [0u8; HEADER_LEN];
    flash.read_sfdp(0x00, &mut buf).await?;

    log::debug!("SFDP header bytes: {:02X?}", buf);

    let header = SfdpHeader::parse(&buf);

    if !header.is_valid() {
        log::debug!("SFDP signature invalid (expected 'SFDP')");
        return Err(Error::SfdpInvalid);
    }

    if header.revision.major != 1 {
        log::debug!("SFDP major version {} not supported", header.revision.major);
        return Err(Error::SfdpInvalid);
    }

    log::debug!(
        "SFDP header valid: revision {}, {} parameter header(s)",
        header.revision,
        header.num_param_headers()
    );

    Ok(header)
}

/// Read the parameter header with the given index
#[maybe_async]
pub async fn read_parameter_header<T: SpiTransport>(
    flash: &mut SerialFlash<T>,
    index: usize,
) -> Result<ParameterHeader> {
    let mut buf = [0u8; HEADER_LEN];
    flash
        .read_sfdp(ParameterHeader::address(index), &mut buf)
        .await?;
    Ok(ParameterHeader::parse(&buf))
}

/// Read the flash density from the Basic Flash Parameter Table
#[maybe_async]
pub async fn read_density<T: SpiTransport>(
    flash: &mut SerialFlash<T>,
    basic: &ParameterHeader,
) -> Result<u64> {
    let mut buf = [0u8; 4];
    flash.read_sfdp(basic.table_pointer + 4, &mut buf).await?;
    Ok(density_bytes(u32::from_le_bytes(buf)))
}

#[cfg(all(test, feature = "is_sync"))]
mod tests {
    use super::*;
    use crate::flash::{Line, Pins};
    use crate::transport::mock::MockTransport;

    fn flash(responses: &[u8]) -> SerialFlash<MockTransport> {
        let cs = Line::new(0, 0);
        SerialFlash::new(MockTransport::with_responses(responses), Pins::new(cs, cs, cs))
    }

    #[test]
    fn test_read_header() {
        let mut dev = flash(&[b'S', b'F', b'D', b'P', 0x00, 0x01, 0x00, 0xFF]);
        let header = read_header(&mut dev).unwrap();
        assert_eq!(header.num_param_headers(), 1);
        assert_eq!(
            dev.transport().transactions()[0],
            [0x5A, 0x00, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn test_read_header_rejects_bad_signature() {
        let mut dev = flash(&[0xFF; 8]);
        assert_eq!(read_header(&mut dev).unwrap_err(), Error::SfdpInvalid);

        let mut dev = flash(&[b'S', b'F', b'D', b'P', 0x00, 0x02, 0x00, 0xFF]);
        assert_eq!(read_header(&mut dev).unwrap_err(), Error::SfdpInvalid);
    }

    #[test]
    fn test_read_parameter_header_and_density() {
        let mut dev = flash(&[
            0x00, 0x06, 0x01, 0x10, 0x30, 0x00, 0x00, 0xFF, // parameter header 0
            0xFF, 0xFF, 0xFF, 0x07, // BFPT DWORD 2: 128 Mbit
        ]);
        let ph = read_parameter_header(&mut dev, 0).unwrap();
        assert!(ph.is_basic());
        assert_eq!(read_density(&mut dev, &ph).unwrap(), 16 * 1024 * 1024);

        let txs = dev.transport().transactions();
        assert_eq!(txs[0], [0x5A, 0x00, 0x00, 0x08, 0x00]);
        assert_eq!(txs[1], [0x5A, 0x00, 0x00, 0x34, 0x00]);
    }
}
