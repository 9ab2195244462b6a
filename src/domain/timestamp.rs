//! Binary timestamp encoding used by `date_val` and `datetime_val`.
//!
//! Layout (big-endian):
//! - byte 0: version, 1 or 2
//! - bytes 1..9: seconds since 0001-01-01T00:00:00Z (i64)
//! - bytes 9..13: nanoseconds (i32)
//! - bytes 13..15: UTC offset in minutes (i16), -1 means UTC
//! - byte 15 (version 2 only): extra offset seconds (i8)

use chrono::{DateTime, FixedOffset, Offset, Utc};

use crate::domain::DomainError;

const VERSION_V1: u8 = 1;
const VERSION_V2: u8 = 2;
const LEN_V1: usize = 15;
const LEN_V2: usize = 16;

/// Seconds between 0001-01-01 and the unix epoch.
const UNIX_TO_INTERNAL: i64 = 62_135_596_800;

/// Offset marker for a UTC location.
const UTC_MINUTES: i16 = -1;

/// 0001-01-01T00:00:00Z, returned for absent or undecodable timestamps.
pub fn zero() -> DateTime<FixedOffset> {
    DateTime::from_timestamp(-UNIX_TO_INTERNAL, 0)
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
        .with_timezone(&Utc.fix())
}

pub fn is_zero(ts: &DateTime<FixedOffset>) -> bool {
    *ts == zero()
}

pub fn decode(buf: &[u8]) -> Result<DateTime<FixedOffset>, DomainError> {
    let (&version, rest) = buf
        .split_first()
        .ok_or_else(|| DomainError::Timestamp("no data".into()))?;
    let want = match version {
        VERSION_V1 => LEN_V1,
        VERSION_V2 => LEN_V2,
        other => {
            return Err(DomainError::Timestamp(format!(
                "unsupported version {other}"
            )))
        }
    };
    if buf.len() != want {
        return Err(DomainError::Timestamp(format!(
            "invalid length {} for version {version}",
            buf.len()
        )));
    }

    let sec = i64::from_be_bytes(take::<8>(&rest[0..8]));
    let nsec = i32::from_be_bytes(take::<4>(&rest[8..12]));
    let offset_min = i16::from_be_bytes(take::<2>(&rest[12..14]));

    let mut offset = i32::from(offset_min) * 60;
    if version == VERSION_V2 {
        offset += i32::from(rest[14] as i8);
    }
    if offset == i32::from(UTC_MINUTES) * 60 {
        offset = 0;
    }

    let nsec = u32::try_from(nsec)
        .map_err(|_| DomainError::Timestamp(format!("negative nanoseconds {nsec}")))?;
    let utc = sec
        .checked_sub(UNIX_TO_INTERNAL)
        .and_then(|unix| DateTime::from_timestamp(unix, nsec))
        .ok_or_else(|| DomainError::Timestamp(format!("seconds out of range: {sec}")))?;
    let zone = FixedOffset::east_opt(offset)
        .ok_or_else(|| DomainError::Timestamp(format!("offset out of range: {offset}s")))?;

    Ok(utc.with_timezone(&zone))
}

/// Inverse of [`decode`]. A zero offset is written as UTC.
pub fn encode(ts: &DateTime<FixedOffset>) -> Vec<u8> {
    let offset = ts.offset().local_minus_utc();
    let (version, offset_min, offset_sec) = if offset == 0 {
        (VERSION_V1, UTC_MINUTES, 0i8)
    } else if offset % 60 != 0 {
        (VERSION_V2, (offset / 60) as i16, (offset % 60) as i8)
    } else {
        (VERSION_V1, (offset / 60) as i16, 0i8)
    };

    let sec = ts.timestamp() + UNIX_TO_INTERNAL;
    let nsec = ts.timestamp_subsec_nanos() as i32;

    let mut buf = Vec::with_capacity(LEN_V2);
    buf.push(version);
    buf.extend_from_slice(&sec.to_be_bytes());
    buf.extend_from_slice(&nsec.to_be_bytes());
    buf.extend_from_slice(&offset_min.to_be_bytes());
    if version == VERSION_V2 {
        buf.push(offset_sec as u8);
    }
    buf
}

fn take<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    out
}
