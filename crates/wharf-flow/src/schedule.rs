//! Schedule model and recurring-cadence computations.
//!
//! A [`Schedule`] describes when a destination's transfers fire: a frequency
//! plus an anchor day/hour/minute, all in UTC. This module computes the next
//! run instant, renders the user-facing description, produces the cron
//! expression the external scheduler consumes, and derives the replication
//! plan for an execution.
//!
//! Every computation takes the reference instant as an argument. Nothing in
//! this module reads the ambient clock, so callers and tests control time.

use chrono::{DateTime, Datelike, Duration, NaiveDateTime, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Weekday names indexed by the schedule's `day` field (0 = Sunday).
const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Sentinel shown when a destination carries a schedule this crate cannot
/// interpret. Callers treat this string, not an error value, as the failure
/// signal.
pub const INVALID_SCHEDULE_TEXT: &str = "Destination has an invalid schedule";

/// Recurring cadence of a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Frequency {
    /// Once per hour, at a fixed minute past the hour.
    #[serde(rename = "HOURLY")]
    Hourly,
    /// Every six hours (00/06/12/18 UTC), at a fixed minute past the hour.
    #[serde(rename = "SIXHOURLY")]
    SixHourly,
    /// Once per day at a fixed UTC hour and minute.
    #[serde(rename = "DAILY")]
    Daily,
    /// Once per week on a fixed UTC weekday, hour, and minute.
    #[serde(rename = "WEEKLY")]
    Weekly,
    /// A frequency value this crate version does not recognize.
    ///
    /// Absorbed during deserialization so the display layer can surface
    /// [`INVALID_SCHEDULE_TEXT`] instead of a decode failure. Computations
    /// other than [`Schedule::describe`] reject it with
    /// [`Error::InvalidSchedule`].
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl Frequency {
    /// Maps a wire value onto the cadence set, absorbing anything
    /// unrecognized into [`Frequency::Unknown`].
    #[must_use]
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "HOURLY" => Self::Hourly,
            "SIXHOURLY" => Self::SixHourly,
            "DAILY" => Self::Daily,
            "WEEKLY" => Self::Weekly,
            _ => Self::Unknown,
        }
    }
}

impl<'de> Deserialize<'de> for Frequency {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_wire(&raw))
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hourly => write!(f, "HOURLY"),
            Self::SixHourly => write!(f, "SIXHOURLY"),
            Self::Daily => write!(f, "DAILY"),
            Self::Weekly => write!(f, "WEEKLY"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// How an execution replicates data into the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReplicationMode {
    /// Transfer only the window since the previous run.
    #[default]
    Incremental,
    /// Reload everything, ignoring the schedule window.
    FullRefresh,
}

/// The window an execution should replicate, derived from the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReplicationPlan {
    /// Reload everything.
    FullRefresh,
    /// Transfer records within `[start, end)`.
    Incremental {
        /// Window start, one cadence period (plus slack) before `end`.
        start: DateTime<Utc>,
        /// Window end: the reference instant snapped to the scheduled
        /// hour and minute.
        end: DateTime<Utc>,
    },
}

/// A recurring-cadence specification for a destination.
///
/// `day`, `hour`, and `minute` are optional on the wire; absent values
/// default to 0. `day` is meaningful only for weekly schedules and is
/// tolerated (ignored) elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Recurring cadence.
    pub frequency: Frequency,
    /// UTC weekday, 0 = Sunday. Weekly schedules only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
    /// UTC hour of day, 0-23. Daily and weekly schedules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour: Option<u32>,
    /// Minute past the hour, 0-59.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minute: Option<u32>,
    /// Replication mode; absent means incremental.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<ReplicationMode>,
}

impl Schedule {
    /// Creates an hourly schedule firing at `minute` past every hour.
    #[must_use]
    pub fn hourly(minute: u32) -> Self {
        Self {
            frequency: Frequency::Hourly,
            day: None,
            hour: None,
            minute: Some(minute),
            mode: None,
        }
    }

    /// Creates a six-hourly schedule firing at `minute` past the block hour.
    #[must_use]
    pub fn six_hourly(minute: u32) -> Self {
        Self {
            frequency: Frequency::SixHourly,
            day: None,
            hour: None,
            minute: Some(minute),
            mode: None,
        }
    }

    /// Creates a daily schedule firing at `hour:minute` UTC.
    #[must_use]
    pub fn daily(hour: u32, minute: u32) -> Self {
        Self {
            frequency: Frequency::Daily,
            day: None,
            hour: Some(hour),
            minute: Some(minute),
            mode: None,
        }
    }

    /// Creates a weekly schedule firing on `day` (0 = Sunday) at
    /// `hour:minute` UTC.
    #[must_use]
    pub fn weekly(day: u32, hour: u32, minute: u32) -> Self {
        Self {
            frequency: Frequency::Weekly,
            day: Some(day),
            hour: Some(hour),
            minute: Some(minute),
            mode: None,
        }
    }

    /// Validates field ranges and cross-field requirements.
    ///
    /// The computation methods tolerate missing optional fields by
    /// defaulting to 0; this is the strict check applied where destination
    /// configuration enters the system.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidSchedule`] describing the first violated constraint.
    pub fn validate(&self) -> Result<()> {
        if self.frequency == Frequency::Unknown {
            return Err(Error::invalid_schedule("unrecognized frequency"));
        }
        if self.frequency == Frequency::Weekly && self.day.is_none() {
            return Err(Error::invalid_schedule(
                "the day field is required when frequency is WEEKLY",
            ));
        }
        if let Some(day) = self.day {
            if day > 6 {
                return Err(Error::invalid_schedule(format!(
                    "day must be 0-6, got {day}"
                )));
            }
        }
        if let Some(hour) = self.hour {
            if hour > 23 {
                return Err(Error::invalid_schedule(format!(
                    "hour must be 0-23, got {hour}"
                )));
            }
        }
        if let Some(minute) = self.minute {
            if minute > 59 {
                return Err(Error::invalid_schedule(format!(
                    "minute must be 0-59, got {minute}"
                )));
            }
        }
        Ok(())
    }

    /// Computes the next instant this schedule fires after `now`.
    ///
    /// The candidate anchors to the configured hour/minute (daily, weekly),
    /// the current hour (hourly), or the current six-hour block
    /// (six-hourly), with seconds zeroed; one cadence step is applied
    /// unconditionally, and a second when `now` has already reached the
    /// candidate. Weekly schedules then re-anchor the date onto the
    /// configured weekday.
    ///
    /// The result is strictly after `now` and, for weekly schedules, lands
    /// on the configured weekday.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidSchedule`] when the frequency is unrecognized or the
    /// configured hour/minute is out of range.
    pub fn next_run(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        let day = self.day.unwrap_or(0);
        let hour = self.hour.unwrap_or(0);
        let minute = self.minute.unwrap_or(0);

        let (anchor_hour, step) = match self.frequency {
            Frequency::Daily => (hour, Duration::days(1)),
            Frequency::Weekly => (hour, Duration::days(7)),
            Frequency::Hourly => (now.hour(), Duration::hours(1)),
            Frequency::SixHourly => (now.hour() - now.hour() % 6, Duration::hours(6)),
            Frequency::Unknown => {
                return Err(Error::invalid_schedule(
                    "cannot compute the next run of an unrecognized frequency",
                ))
            }
        };

        let mut next = schedule_instant(now, 0, anchor_hour, minute)?;
        next += step;
        if now >= next {
            next += step;
        }

        if self.frequency == Frequency::Weekly {
            // Re-anchor onto the configured weekday; only the hour and
            // minute survive from the cadence stepping above.
            let days_until = i64::from((day + 7 - now.weekday().num_days_from_sunday()) % 7);
            next = schedule_instant(now, days_until, hour, minute)?;
            if next <= now {
                next += Duration::days(7);
            }
        }

        Ok(next)
    }

    /// Renders the user-facing description of this schedule.
    ///
    /// Clock times are the next run's hour and minute converted to `tz`, so
    /// a daylight-saving change at the next run date is reflected. An
    /// unrecognized frequency yields [`INVALID_SCHEDULE_TEXT`]; this method
    /// never fails.
    #[must_use]
    pub fn describe(&self, now: DateTime<Utc>, tz: Tz) -> String {
        let minute = self.minute.unwrap_or(0);

        match self.frequency {
            Frequency::Hourly => {
                if minute == 0 {
                    "Runs hourly on the hour".to_string()
                } else {
                    format!("Runs hourly at :{minute} past the hour")
                }
            }
            Frequency::SixHourly => {
                format!("Runs every 6 hours at :{minute:02} past the hour")
            }
            Frequency::Daily => match self.display_time(now, 1, tz) {
                Some(at) => format!("Runs daily at {at}"),
                None => INVALID_SCHEDULE_TEXT.to_string(),
            },
            Frequency::Weekly => {
                let day = self.day.unwrap_or(0) % 7;
                let days_until =
                    i64::from((day + 7 - now.weekday().num_days_from_sunday()) % 7);
                match self.display_time(now, days_until, tz) {
                    Some(at) => {
                        format!("Runs weekly on {} at {at}", WEEKDAY_NAMES[day as usize])
                    }
                    None => INVALID_SCHEDULE_TEXT.to_string(),
                }
            }
            Frequency::Unknown => INVALID_SCHEDULE_TEXT.to_string(),
        }
    }

    /// Renders the five-field cron expression the external scheduler
    /// consumes.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidSchedule`] when the frequency is unrecognized or a
    /// weekly schedule is missing its day.
    pub fn to_cron(&self) -> Result<String> {
        let minute = self.minute.unwrap_or(0);
        let hour = self.hour.unwrap_or(0);

        match self.frequency {
            Frequency::Weekly => {
                let day = self.day.ok_or_else(|| {
                    Error::invalid_schedule("the day field is required for weekly schedules")
                })?;
                Ok(format!("{minute} {hour} * * {day}"))
            }
            Frequency::Daily => Ok(format!("{minute} {hour} * * *")),
            // Block hours 0,6,12,18.
            Frequency::SixHourly => Ok(format!("{minute} */6 * * *")),
            Frequency::Hourly => Ok(format!("{minute} * * * *")),
            Frequency::Unknown => Err(Error::invalid_schedule("unrecognized frequency")),
        }
    }

    /// Derives the replication plan for an execution happening at `now`.
    ///
    /// Full-refresh schedules reload everything. Incremental schedules get
    /// a window ending at `now` snapped to the scheduled hour/minute and
    /// starting one cadence period (plus slack for late starts) earlier.
    /// An execution drifting past the cadence tolerance is logged, since it
    /// usually means the scheduler fired late or the schedule changed
    /// between trigger and execution.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidSchedule`] when the frequency is unrecognized.
    pub fn replication_plan(&self, now: DateTime<Utc>) -> Result<ReplicationPlan> {
        let (window, tolerance) = match self.frequency {
            Frequency::Weekly => (
                Duration::days(7) + Duration::hours(12),
                Duration::hours(3),
            ),
            Frequency::Daily => (Duration::days(1) + Duration::hours(3), Duration::hours(3)),
            Frequency::SixHourly => (
                Duration::hours(6) + Duration::minutes(30),
                Duration::hours(1),
            ),
            Frequency::Hourly => (
                Duration::hours(1) + Duration::minutes(15),
                Duration::minutes(15),
            ),
            Frequency::Unknown => {
                return Err(Error::invalid_schedule("unrecognized frequency"))
            }
        };

        if self.mode == Some(ReplicationMode::FullRefresh) {
            // Drift validation is pointless when reloading everything.
            return Ok(ReplicationPlan::FullRefresh);
        }

        let end = schedule_instant(now, 0, self.hour.unwrap_or(0), self.minute.unwrap_or(0))?;

        if self.frequency == Frequency::Weekly {
            let weekday = now.weekday().num_days_from_sunday();
            let scheduled_day = self.day.unwrap_or(0);
            if scheduled_day != weekday {
                tracing::warn!(
                    scheduled_day,
                    weekday,
                    "weekly execution day does not match the scheduled day"
                );
            }
        }

        let drift = (end - now).abs();
        if drift >= tolerance {
            tracing::warn!(
                frequency = %self.frequency,
                drift_minutes = drift.num_minutes(),
                "execution time is off schedule"
            );
        }

        Ok(ReplicationPlan::Incremental {
            start: end - window,
            end,
        })
    }

    /// Next-run clock time rendered in `tz` as `h:mm AM/PM`.
    fn display_time(&self, now: DateTime<Utc>, days_ahead: i64, tz: Tz) -> Option<String> {
        let hour = self.hour.unwrap_or(0) % 24;
        let minute = self.minute.unwrap_or(0) % 60;
        let naive = (now.date_naive() + Duration::days(days_ahead)).and_hms_opt(hour, minute, 0)?;
        Some(naive.and_utc().with_timezone(&tz).format("%-I:%M %p").to_string())
    }
}

/// Builds the UTC instant `days_ahead` days after `now`'s date at
/// `hour:minute`, seconds zeroed.
fn schedule_instant(
    now: DateTime<Utc>,
    days_ahead: i64,
    hour: u32,
    minute: u32,
) -> Result<DateTime<Utc>> {
    let date = now.date_naive() + Duration::days(days_ahead);
    let naive: Option<NaiveDateTime> = date.and_hms_opt(hour, minute, 0);
    naive.map(|n| n.and_utc()).ok_or_else(|| {
        Error::invalid_schedule(format!("hour/minute out of range: {hour}:{minute:02}"))
    })
}
