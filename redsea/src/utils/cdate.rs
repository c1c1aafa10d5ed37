//! CDate timestamp conversion
//!
//! TempleOS packs time into 64 bits: the upper half counts days since
//! 0000-03-01 (proleptic), the lower half is the fraction of the day scaled
//! so that one second is 49710 units.

/// Seconds between the CDate epoch and the Unix epoch (719527 days)
pub const UNIX_EPOCH_OFFSET: i64 = 62_167_132_800;

/// Seconds per day
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Fraction units per second in the lower 32 bits
pub const UNITS_PER_SECOND: u64 = 49_710;

/// Convert a CDate to Unix seconds
pub fn to_unix(cdate: u64) -> i64 {
    let days = (cdate >> 32) as i64;
    let fraction = cdate & 0xFFFF_FFFF;
    days * SECONDS_PER_DAY + (fraction / UNITS_PER_SECOND) as i64 - UNIX_EPOCH_OFFSET
}

/// Convert Unix seconds to a CDate
///
/// Times before the CDate epoch clamp to zero.
pub fn from_unix(unix: i64) -> u64 {
    let since_epoch = unix.saturating_add(UNIX_EPOCH_OFFSET).max(0);
    let days = (since_epoch / SECONDS_PER_DAY) as u64;
    let seconds_of_day = (since_epoch % SECONDS_PER_DAY) as u64;
    (days << 32) | (seconds_of_day * UNITS_PER_SECOND)
}
