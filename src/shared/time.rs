use std::fmt::Display;

use serde::{Serialize, Serializer};

/// A GTFS service time, stored as seconds since the start of the service day.
/// Values past 24:00:00 are valid and mark trips that run over midnight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time(u32);

impl From<u32> for Time {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hms_string())
    }
}

impl Serialize for Time {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hms_string())
    }
}

impl Time {
    pub const fn from_seconds(secs: u32) -> Self {
        Self(secs)
    }

    pub const fn as_seconds(&self) -> u32 {
        self.0
    }

    pub fn to_hms_string(&self) -> String {
        let h = self.0 / 3600;
        let m = (self.0 % 3600) / 60;
        let s = self.0 % 60;
        format!("{:02}:{:02}:{:02}", h, m, s)
    }

    pub fn from_hms(time: &str) -> Option<Self> {
        const HOUR_TO_SEC: u32 = 60 * 60;
        const MINUTE_TO_SEC: u32 = 60;
        let mut split = time.trim().split(':');
        let hours: u32 = split.next()?.parse().ok()?;
        let hours = hours.checked_mul(HOUR_TO_SEC)?;
        let minutes: u32 = split.next()?.parse().ok()?;
        if minutes >= 60 {
            return None;
        }
        let minutes = minutes * MINUTE_TO_SEC;
        let seconds: u32 = split.next()?.parse().ok()?;
        if seconds >= 60 || split.next().is_some() {
            return None;
        }
        hours.checked_add(minutes + seconds).map(Self)
    }
}

#[test]
fn parse_unparse_1() {
    let time = "00:00:00";
    let stime = Time::from_hms(time).unwrap();
    assert_eq!(time, stime.to_hms_string())
}

#[test]
fn parse_unparse_2() {
    let time = "12:30:30";
    let stime = Time::from_hms(time).unwrap();
    assert_eq!(time, stime.to_hms_string())
}

#[test]
fn parse_unparse_overnight() {
    let time = "25:10:00";
    let stime = Time::from_hms(time).unwrap();
    assert_eq!(stime.as_seconds(), 25 * 3600 + 600);
    assert_eq!(time, stime.to_hms_string())
}

#[test]
fn parse_unpadded() {
    assert_eq!(Time::from_hms("9:05:00"), Time::from_hms("09:05:00"));
}

#[test]
fn invalid_time_test_1() {
    assert!(Time::from_hms("00:00:0a").is_none())
}

#[test]
fn invalid_time_test_2() {
    assert!(Time::from_hms("00:00").is_none())
}

#[test]
fn invalid_time_test_3() {
    assert!(Time::from_hms("00:61:00").is_none())
}
