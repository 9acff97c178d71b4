//! CRC-32 checksum used for per-entry integrity verification.
//!
//! ZIP readers validate entry data against CRC-32/ISO-HDLC (reflected polynomial
//! `0xEDB88320`, initial value and final xor `0xFFFFFFFF`). The lookup table is built
//! once for the process lifetime and is read-only afterwards, so concurrent archive
//! generations can share it freely.

use crc::{Crc, Digest, CRC_32_ISO_HDLC};

/// Process-wide CRC-32 instance with its 256-entry lookup table.
pub static ZIP_CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// Start a streaming checksum for one entry's data.
///
/// The running value is carried inverted between updates; `finalize` de-inverts it.
/// Feeding the same bytes in any chunking yields the same final value.
pub fn digest() -> Digest<'static, u32> {
    ZIP_CRC32.digest()
}

/// One-shot checksum over a complete buffer.
pub fn crc32(bytes: &[u8]) -> u32 {
    ZIP_CRC32.checksum(bytes)
}
