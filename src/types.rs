//! Base types for the structure of a streamed ZIP file.

use crate::timestamp::DosDateTime;
use binrw::{BinRead, BinWrite};

/// The minimum format revision that understands deferred sizes (flag bit 3).
pub const VERSION_STREAMING: u16 = 20;

/// General purpose flag bit 3: sizes and checksum follow the data in a data descriptor.
pub const FLAG_DATA_DESCRIPTOR: u16 = 1 << 3;

/// Identifies the storage format used for an entry's data
///
/// This library only ever produces uncompressed entries, so the only supported method
/// is [`CompressionMethod::Stored`].
#[derive(BinRead, BinWrite, Debug, Copy, Clone, Default, PartialEq, Eq)]
#[brw(repr = u16)]
pub enum CompressionMethod {
    /// Stores the data as it is
    #[default]
    Stored = 0,
}

/// ZIP local file header
///
/// Written before each entry's data, while the entry's size and checksum are still
/// unknown. [`FLAG_DATA_DESCRIPTOR`] is set and the checksum and size fields are zero;
/// the real values follow the data in a [`DataDescriptor`]. The file name bytes follow
/// the fixed fields directly and are not part of this struct.
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq)]
#[brw(magic = b"PK\x03\x04", little)]
pub struct LocalFileHeader {
    /// The minimum format revision needed to extract this entry
    pub version_needed: u16,

    /// General purpose bit flags
    pub flags: u16,

    /// The storage method used for this entry's data
    pub compression: CompressionMethod,

    /// When the entry was last modified
    pub modified: DosDateTime,

    /// CRC-32 of the entry data, zero while deferred
    pub crc32: u32,

    /// Size of the entry data as stored, zero while deferred
    pub compressed_size: u32,

    /// Size of the entry data when extracted, zero while deferred
    pub uncompressed_size: u32,

    /// Length of the file name in bytes
    pub name_length: u16,

    /// Length of the extra field, always zero
    pub extra_length: u16,
}

impl Default for LocalFileHeader {
    fn default() -> Self {
        Self {
            version_needed: VERSION_STREAMING,
            flags: FLAG_DATA_DESCRIPTOR,
            compression: Default::default(),
            modified: Default::default(),
            crc32: Default::default(),
            compressed_size: Default::default(),
            uncompressed_size: Default::default(),
            name_length: Default::default(),
            extra_length: Default::default(),
        }
    }
}

/// ZIP data descriptor
///
/// Follows an entry's data and carries the checksum and sizes that were unknown when
/// the [`LocalFileHeader`] was written. Both size fields are equal since entries are
/// always stored uncompressed.
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(magic = b"PK\x07\x08", little)]
pub struct DataDescriptor {
    /// CRC-32 of the entry data
    pub crc32: u32,

    /// Size of the entry data as stored
    pub compressed_size: u32,

    /// Size of the entry data when extracted
    pub uncompressed_size: u32,
}

/// ZIP central directory file header
///
/// One per entry, emitted after the last entry's data in entry order. Disk and
/// attribute fields are zero; this library does not model file permissions or
/// multi-volume archives. The file name bytes follow the fixed fields directly.
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq)]
#[brw(magic = b"PK\x01\x02", little)]
pub struct CentralDirectoryHeader {
    /// The format revision this entry was created with
    pub version_made_by: u16,

    /// The minimum format revision needed to extract this entry
    pub version_needed: u16,

    /// General purpose bit flags, matching the local file header
    pub flags: u16,

    /// The storage method used for this entry's data
    pub compression: CompressionMethod,

    /// When the entry was last modified
    pub modified: DosDateTime,

    /// Final CRC-32 of the entry data
    pub crc32: u32,

    /// Final size of the entry data as stored
    pub compressed_size: u32,

    /// Final size of the entry data when extracted
    pub uncompressed_size: u32,

    /// Length of the file name in bytes
    pub name_length: u16,

    /// Length of the extra field, always zero
    pub extra_length: u16,

    /// Length of the entry comment, always zero
    pub comment_length: u16,

    /// Disk the entry starts on, always zero
    pub disk_number_start: u16,

    /// Internal file attributes, always zero
    pub internal_attributes: u16,

    /// External file attributes, always zero
    pub external_attributes: u32,

    /// Offset of this entry's local file header from the start of the file
    pub header_offset: u32,
}

impl Default for CentralDirectoryHeader {
    fn default() -> Self {
        Self {
            version_made_by: VERSION_STREAMING,
            version_needed: VERSION_STREAMING,
            flags: FLAG_DATA_DESCRIPTOR,
            compression: Default::default(),
            modified: Default::default(),
            crc32: Default::default(),
            compressed_size: Default::default(),
            uncompressed_size: Default::default(),
            name_length: Default::default(),
            extra_length: Default::default(),
            comment_length: Default::default(),
            disk_number_start: Default::default(),
            internal_attributes: Default::default(),
            external_attributes: Default::default(),
            header_offset: Default::default(),
        }
    }
}

/// ZIP end of central directory record
///
/// The fixed final structure of the archive. Locates the central directory and gives
/// the entry count, which is stored twice per the format's multi-volume convention.
/// No archive comment is emitted.
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(magic = b"PK\x05\x06", little)]
pub struct EndOfCentralDirectory {
    /// The number of this disk, always zero
    pub disk_number: u16,

    /// The disk the central directory starts on, always zero
    pub directory_disk: u16,

    /// The number of entries in the central directory on this disk
    pub entries_on_disk: u16,

    /// The total number of entries in the central directory
    pub entries_total: u16,

    /// The byte length of the central directory
    pub directory_size: u32,

    /// The offset of the central directory from the start of the file
    pub directory_offset: u32,

    /// The length of the archive comment, always zero
    pub comment_length: u16,
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use binrw::BinRead;
    use binrw::BinWrite;
    use pretty_assertions::assert_eq;

    use crate::error::Result;
    use crate::timestamp::DosDateTime;
    use crate::types::CentralDirectoryHeader;
    use crate::types::DataDescriptor;
    use crate::types::EndOfCentralDirectory;
    use crate::types::LocalFileHeader;

    #[test]
    fn write_deferred_local_header() -> Result<()> {
        #[rustfmt::skip]
        let expected: Vec<u8> = vec![
            0x50, 0x4B, 0x03, 0x04,
            0x14, 0x00,
            0x08, 0x00,
            0x00, 0x00,
            0x83, 0x18,
            0x22, 0x58,
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x09, 0x00,
            0x00, 0x00,
        ];

        let header = LocalFileHeader {
            modified: DosDateTime::from_civil(2024, 1, 2, 3, 4, 6),
            name_length: 9,
            ..Default::default()
        };

        let mut actual = Vec::new();
        header.write(&mut Cursor::new(&mut actual))?;

        assert_eq!(actual, expected);

        Ok(())
    }

    #[test]
    fn read_deferred_local_header() -> Result<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            0x50, 0x4B, 0x03, 0x04,
            0x14, 0x00,
            0x08, 0x00,
            0x00, 0x00,
            0x83, 0x18,
            0x22, 0x58,
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x09, 0x00,
            0x00, 0x00,
        ]);

        let expected = LocalFileHeader {
            modified: DosDateTime::from_civil(2024, 1, 2, 3, 4, 6),
            name_length: 9,
            ..Default::default()
        };

        assert_eq!(LocalFileHeader::read(&mut input)?, expected);

        Ok(())
    }

    #[test]
    fn read_invalid_local_header_magic() {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            0x50, 0x4B, 0x04, 0x03,
            0x14, 0x00,
            0x08, 0x00,
            0x00, 0x00,
            0x83, 0x18,
            0x22, 0x58,
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x09, 0x00,
            0x00, 0x00,
        ]);

        assert!(LocalFileHeader::read(&mut input).is_err());
    }

    #[test]
    fn write_data_descriptor() -> Result<()> {
        #[rustfmt::skip]
        let expected: Vec<u8> = vec![
            0x50, 0x4B, 0x07, 0x08,
            0x86, 0xA6, 0x10, 0x36,
            0x05, 0x00, 0x00, 0x00,
            0x05, 0x00, 0x00, 0x00,
        ];

        let descriptor = DataDescriptor {
            crc32: 0x3610A686,
            compressed_size: 5,
            uncompressed_size: 5,
        };

        let mut actual = Vec::new();
        descriptor.write(&mut Cursor::new(&mut actual))?;

        assert_eq!(actual, expected);

        Ok(())
    }

    #[test]
    fn read_data_descriptor() -> Result<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            0x50, 0x4B, 0x07, 0x08,
            0x86, 0xA6, 0x10, 0x36,
            0x05, 0x00, 0x00, 0x00,
            0x05, 0x00, 0x00, 0x00,
        ]);

        let expected = DataDescriptor {
            crc32: 0x3610A686,
            compressed_size: 5,
            uncompressed_size: 5,
        };

        assert_eq!(DataDescriptor::read(&mut input)?, expected);

        Ok(())
    }

    #[test]
    fn write_central_directory_header() -> Result<()> {
        #[rustfmt::skip]
        let expected: Vec<u8> = vec![
            0x50, 0x4B, 0x01, 0x02,
            0x14, 0x00,
            0x14, 0x00,
            0x08, 0x00,
            0x00, 0x00,
            0x83, 0x18,
            0x22, 0x58,
            0x86, 0xA6, 0x10, 0x36,
            0x05, 0x00, 0x00, 0x00,
            0x05, 0x00, 0x00, 0x00,
            0x05, 0x00,
            0x00, 0x00,
            0x00, 0x00,
            0x00, 0x00,
            0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x38, 0x00, 0x00, 0x00,
        ];

        let header = CentralDirectoryHeader {
            modified: DosDateTime::from_civil(2024, 1, 2, 3, 4, 6),
            crc32: 0x3610A686,
            compressed_size: 5,
            uncompressed_size: 5,
            name_length: 5,
            header_offset: 56,
            ..Default::default()
        };

        let mut actual = Vec::new();
        header.write(&mut Cursor::new(&mut actual))?;

        assert_eq!(actual, expected);

        Ok(())
    }

    #[test]
    fn read_central_directory_header() -> Result<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            0x50, 0x4B, 0x01, 0x02,
            0x14, 0x00,
            0x14, 0x00,
            0x08, 0x00,
            0x00, 0x00,
            0x83, 0x18,
            0x22, 0x58,
            0x86, 0xA6, 0x10, 0x36,
            0x05, 0x00, 0x00, 0x00,
            0x05, 0x00, 0x00, 0x00,
            0x05, 0x00,
            0x00, 0x00,
            0x00, 0x00,
            0x00, 0x00,
            0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x38, 0x00, 0x00, 0x00,
        ]);

        let expected = CentralDirectoryHeader {
            modified: DosDateTime::from_civil(2024, 1, 2, 3, 4, 6),
            crc32: 0x3610A686,
            compressed_size: 5,
            uncompressed_size: 5,
            name_length: 5,
            header_offset: 56,
            ..Default::default()
        };

        assert_eq!(CentralDirectoryHeader::read(&mut input)?, expected);

        Ok(())
    }

    #[test]
    fn write_end_of_central_directory() -> Result<()> {
        #[rustfmt::skip]
        let expected: Vec<u8> = vec![
            0x50, 0x4B, 0x05, 0x06,
            0x00, 0x00,
            0x00, 0x00,
            0x02, 0x00,
            0x02, 0x00,
            0x66, 0x00, 0x00, 0x00,
            0x70, 0x00, 0x00, 0x00,
            0x00, 0x00,
        ];

        let record = EndOfCentralDirectory {
            entries_on_disk: 2,
            entries_total: 2,
            directory_size: 102,
            directory_offset: 112,
            ..Default::default()
        };

        let mut actual = Vec::new();
        record.write(&mut Cursor::new(&mut actual))?;

        assert_eq!(actual, expected);

        Ok(())
    }

    #[test]
    fn read_end_of_central_directory() -> Result<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            0x50, 0x4B, 0x05, 0x06,
            0x00, 0x00,
            0x00, 0x00,
            0x02, 0x00,
            0x02, 0x00,
            0x66, 0x00, 0x00, 0x00,
            0x70, 0x00, 0x00, 0x00,
            0x00, 0x00,
        ]);

        let expected = EndOfCentralDirectory {
            entries_on_disk: 2,
            entries_total: 2,
            directory_size: 102,
            directory_offset: 112,
            ..Default::default()
        };

        assert_eq!(EndOfCentralDirectory::read(&mut input)?, expected);

        Ok(())
    }
}
