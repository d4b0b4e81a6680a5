//! Time-of-day buckets.
//!
//! Hours are grouped into five calendar buckets that the peak-time detector
//! and the schedule advisor compare against each other.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Calendar bucket for an hour of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeBucket {
    /// 05:00-10:59
    Morning,
    /// 11:00-15:59
    Afternoon,
    /// 16:00-20:59
    Evening,
    /// 21:00-01:59, wrapping past midnight
    Night,
    /// 02:00-04:59
    LateNight,
}

impl TimeBucket {
    /// Canonical ordering, also used to break accuracy ties.
    pub const ALL: [TimeBucket; 5] = [
        TimeBucket::Morning,
        TimeBucket::Afternoon,
        TimeBucket::Evening,
        TimeBucket::Night,
        TimeBucket::LateNight,
    ];

    /// Classify an hour of the day. Hours past 23 wrap modulo 24.
    pub fn from_hour(hour: u32) -> Self {
        let hour = hour % 24;
        if (5..11).contains(&hour) {
            TimeBucket::Morning
        } else if (11..16).contains(&hour) {
            TimeBucket::Afternoon
        } else if (16..21).contains(&hour) {
            TimeBucket::Evening
        } else if hour >= 21 || hour < 2 {
            TimeBucket::Night
        } else {
            TimeBucket::LateNight
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            TimeBucket::Morning => "Morning",
            TimeBucket::Afternoon => "Afternoon",
            TimeBucket::Evening => "Evening",
            TimeBucket::Night => "Night",
            TimeBucket::LateNight => "Late Night",
        }
    }

    /// Position in [`TimeBucket::ALL`].
    pub fn index(&self) -> usize {
        match self {
            TimeBucket::Morning => 0,
            TimeBucket::Afternoon => 1,
            TimeBucket::Evening => 2,
            TimeBucket::Night => 3,
            TimeBucket::LateNight => 4,
        }
    }
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "morning" => Ok(TimeBucket::Morning),
            "afternoon" => Ok(TimeBucket::Afternoon),
            "evening" => Ok(TimeBucket::Evening),
            "night" => Ok(TimeBucket::Night),
            "latenight" => Ok(TimeBucket::LateNight),
            _ => Err(format!("unknown time bucket: '{s}'")),
        }
    }
}
