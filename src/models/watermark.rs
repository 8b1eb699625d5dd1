//! Per-device sync watermark.

use crate::errors::AppError;
use crate::utils::time::{self, Timestamp};
use std::fmt;
use std::str::FromStr;

/// Threshold sent by a client: "everything strictly newer than this".
///
/// Compared in wire ticks (1e-4 s) so a watermark echoed back from a
/// `latest` response never re-selects the record it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Watermark {
    ticks: i64,
}

impl Watermark {
    /// Watermark admitting every record of a device.
    pub const ZERO: Watermark = Watermark { ticks: 0 };

    pub fn ticks(&self) -> i64 {
        self.ticks
    }

    /// `0.0` means "send everything"; otherwise strictly-newer-than.
    pub fn admits(&self, time: &Timestamp) -> bool {
        *self == Self::ZERO || time.ticks() > self.ticks()
    }
}

impl FromStr for Watermark {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let instant = time::decode(s)?;
        Ok(Self {
            ticks: time::ticks(&instant),
        })
    }
}

impl fmt::Display for Watermark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&time::format_ticks(self.ticks))
    }
}
