//! MS-DOS timestamp packing for ZIP headers.

use binrw::{BinRead, BinWrite};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A modification timestamp packed into the MS-DOS 16-bit time and date fields
///
/// This is the only timestamp representation the classic ZIP format carries. Resolution
/// is two seconds (odd seconds truncate down) and the date field counts years from 1980,
/// the format's epoch. Both fields are stored little-endian, time first, matching their
/// order inside ZIP headers.
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct DosDateTime {
    /// Packed time: `(hour << 11) | (minute << 5) | (second / 2)`
    pub time: u16,

    /// Packed date: `((year - 1980) << 9) | (month << 5) | day`
    pub date: u16,
}

impl DosDateTime {
    /// Pack a civil date and time.
    ///
    /// Years below 1980 clamp to 1980 and years above 2107 clamp to 2107 rather than
    /// erroring, so an otherwise valid archive is never aborted by an implausible
    /// timestamp. Seconds truncate to the format's 2-second resolution.
    pub fn from_civil(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        let year = year.clamp(1980, 2107);

        Self {
            time: (u16::from(hour) << 11) | (u16::from(minute) << 5) | u16::from(second / 2),
            date: ((year - 1980) << 9) | (u16::from(month) << 5) | u16::from(day),
        }
    }

    /// Capture the current wall-clock moment, in UTC.
    ///
    /// A clock before the Unix epoch packs as the 1980 epoch.
    pub fn now() -> Self {
        let elapsed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO);

        Self::from_unix_seconds(elapsed.as_secs())
    }

    pub(crate) fn from_unix_seconds(secs: u64) -> Self {
        let (year, month, day) = civil_from_days((secs / 86400) as i64);
        let time_of_day = secs % 86400;

        Self::from_civil(
            year.clamp(0, u16::MAX as i64) as u16,
            month,
            day,
            (time_of_day / 3600) as u8,
            ((time_of_day % 3600) / 60) as u8,
            (time_of_day % 60) as u8,
        )
    }
}

/// Convert days since 1970-01-01 into a proleptic Gregorian civil date.
fn civil_from_days(days: i64) -> (i64, u8, u8) {
    let z = days + 719468;
    let era = z.div_euclid(146097);
    let doe = z.rem_euclid(146097);
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);

    (year, month as u8, day as u8)
}
