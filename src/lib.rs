//! This library handles creating and reading **ZIP** archives built for streaming delivery.
//!
//! # Streaming ZIP Archive Format Documentation
//!
//! This crate writes the classic (non-ZIP64) ZIP format in its streaming variant: entry
//! sizes and checksums are not known when an entry's header is emitted, so every local
//! file header sets general purpose flag bit 3 and is followed, after the entry data,
//! by a data descriptor carrying the real values. Nothing is ever seeked or rewritten,
//! which makes the output suitable for forward-only sinks such as an HTTP response body.
//! Entry data is always stored uncompressed (method 0).
//!
//! ## File Structure
//!
//! A streamed ZIP file consists of, per entry, a local file header, the entry data and
//! a data descriptor; after the last entry comes the central directory and the end of
//! central directory record.
//!
//! ### Local File Header
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | Signature              | 4 bytes: 0x04034B50 ("PK\x03\x04")                      |
//! | 0x0004         | Version needed         | 2 bytes: Fixed value 20 (2.0, supports flag bit 3)      |
//! | 0x0006         | Flags                  | 2 bytes: Bit 3 set, sizes deferred to data descriptor   |
//! | 0x0008         | Compression method     | 2 bytes: Fixed value 0 (stored)                         |
//! | 0x000A         | Modification time      | 2 bytes: MS-DOS packed time, 2-second resolution        |
//! | 0x000C         | Modification date      | 2 bytes: MS-DOS packed date, years offset from 1980     |
//! | 0x000E         | CRC-32                 | 4 bytes: Zero, real value in the data descriptor        |
//! | 0x0012         | Compressed size        | 4 bytes: Zero, real value in the data descriptor        |
//! | 0x0016         | Uncompressed size      | 4 bytes: Zero, real value in the data descriptor        |
//! | 0x001A         | Name length            | 2 bytes: Length of the file name in bytes               |
//! | 0x001C         | Extra field length     | 2 bytes: Fixed value 0                                  |
//! | 0x001E         | File name              | Variable: UTF-8 encoded name, not null terminated       |
//!
//! ### Data Descriptor
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | Signature              | 4 bytes: 0x08074B50 ("PK\x07\x08")                      |
//! | 0x0004         | CRC-32                 | 4 bytes: CRC-32 (ISO-HDLC) of the entry data            |
//! | 0x0008         | Compressed size        | 4 bytes: Equal to the uncompressed size (stored)        |
//! | 0x000C         | Uncompressed size      | 4 bytes: Total entry data length                        |
//!
//! ### Central Directory File Header
//!
//! One per entry, in the order the entries were written.
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | Signature              | 4 bytes: 0x02014B50 ("PK\x01\x02")                      |
//! | 0x0004         | Version made by        | 2 bytes: Fixed value 20                                 |
//! | 0x0006         | Version needed         | 2 bytes: Fixed value 20                                 |
//! | 0x0008         | Flags                  | 2 bytes: Bit 3 set, matching the local header           |
//! | 0x000A         | Compression method     | 2 bytes: Fixed value 0 (stored)                         |
//! | 0x000C         | Modification time      | 2 bytes: Same packed time as the local header           |
//! | 0x000E         | Modification date      | 2 bytes: Same packed date as the local header           |
//! | 0x0010         | CRC-32                 | 4 bytes: Final CRC-32 of the entry data                 |
//! | 0x0014         | Compressed size        | 4 bytes: Final size of the entry data                   |
//! | 0x0018         | Uncompressed size      | 4 bytes: Final size of the entry data                   |
//! | 0x001C         | Name length            | 2 bytes: Length of the file name in bytes               |
//! | 0x001E         | Extra field length     | 2 bytes: Fixed value 0                                  |
//! | 0x0020         | Comment length         | 2 bytes: Fixed value 0                                  |
//! | 0x0022         | Disk number start      | 2 bytes: Fixed value 0 (no multi-volume support)        |
//! | 0x0024         | Internal attributes    | 2 bytes: Fixed value 0                                  |
//! | 0x0026         | External attributes    | 4 bytes: Fixed value 0 (no permission modeling)         |
//! | 0x002A         | Local header offset    | 4 bytes: Offset of this entry's local file header       |
//! | 0x002E         | File name              | Variable: UTF-8 encoded name                            |
//!
//! ### End of Central Directory Record
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | Signature              | 4 bytes: 0x06054B50 ("PK\x05\x06")                      |
//! | 0x0004         | Disk number            | 2 bytes: Fixed value 0                                  |
//! | 0x0006         | Directory start disk   | 2 bytes: Fixed value 0                                  |
//! | 0x0008         | Entries on this disk   | 2 bytes: Number of entries                              |
//! | 0x000A         | Entries total          | 2 bytes: Number of entries                              |
//! | 0x000C         | Directory size         | 4 bytes: Byte length of the central directory           |
//! | 0x0010         | Directory offset       | 4 bytes: Offset where the central directory starts      |
//! | 0x0014         | Comment length         | 2 bytes: Fixed value 0                                  |
//!
//! ## Additional Information
//!
//! - **File Extension**: `.zip`
//! - **Endianness**: Little-endian for all multi-byte integers
//! - **Limits**: Classic 32-bit ZIP only; offsets and sizes above `u32::MAX` or more
//!   than `u16::MAX` entries abort archive generation with an error
//!

pub mod checksum;
pub mod error;
pub mod read;
pub mod timestamp;
pub mod types;
pub mod write;

pub use read::ZipArchive;
pub use timestamp::DosDateTime;
pub use types::CompressionMethod;
pub use write::{write_archive, ZipEntrySource, ZipStreamWriter};
