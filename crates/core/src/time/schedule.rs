use anyhow::Context;
use chrono::{DateTime, Duration, FixedOffset, Local, NaiveTime, TimeZone, Utc};

/// Days searched ahead before giving up on finding a valid local time.
const MAX_LOOKAHEAD_DAYS: u32 = 3;

/// The clock a [`DailySchedule`] is read against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleZone {
    /// Server-local time, re-evaluated on every lookup so DST changes are followed.
    Local,
    Fixed(FixedOffset),
}

impl std::fmt::Display for ScheduleZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScheduleZone::Local => f.write_str("local"),
            ScheduleZone::Fixed(offset) => write!(f, "UTC{offset}"),
        }
    }
}

/// A wall-clock time of day, fired once per day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySchedule {
    hour: u32,
    minute: u32,
    zone: ScheduleZone,
}

impl DailySchedule {
    pub fn new(hour: u32, minute: u32, zone: ScheduleZone) -> anyhow::Result<Self> {
        anyhow::ensure!(hour < 24, "schedule hour must be 0..=23 (got {hour})");
        anyhow::ensure!(minute < 60, "schedule minute must be 0..=59 (got {minute})");
        Ok(Self { hour, minute, zone })
    }

    /// The first firing strictly after `now`.
    pub fn next_run_after(&self, now: DateTime<Utc>) -> anyhow::Result<DateTime<Utc>> {
        let time = NaiveTime::from_hms_opt(self.hour, self.minute, 0)
            .context("invalid schedule time")?;
        match self.zone {
            ScheduleZone::Local => next_occurrence(&Local, time, now),
            ScheduleZone::Fixed(offset) => next_occurrence(&offset, time, now),
        }
    }
}

impl std::fmt::Display for DailySchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02} ({})", self.hour, self.minute, self.zone)
    }
}

/// Next instant after `now` at which the clock of `tz` reads `time`.
///
/// A time repeated by a DST fold fires at its first occurrence. A time skipped by a DST gap
/// fires one hour later on the same day.
fn next_occurrence<Tz: TimeZone>(
    tz: &Tz,
    time: NaiveTime,
    now: DateTime<Utc>,
) -> anyhow::Result<DateTime<Utc>> {
    let mut date = now.with_timezone(tz).date_naive();

    for _ in 0..=MAX_LOOKAHEAD_DAYS {
        let candidate = date.and_time(time);
        let resolved = tz.from_local_datetime(&candidate);
        let resolved = match resolved.earliest() {
            Some(dt) => Some(dt),
            None => tz
                .from_local_datetime(&(candidate + Duration::hours(1)))
                .earliest(),
        };

        if let Some(dt) = resolved.map(|dt| dt.with_timezone(&Utc)) {
            if dt > now {
                return Ok(dt);
            }
        }

        date = date.succ_opt().context("schedule date overflow")?;
    }

    anyhow::bail!("no valid local time for {time} within {MAX_LOOKAHEAD_DAYS} days of {now}")
}
