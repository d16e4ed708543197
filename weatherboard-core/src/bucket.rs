use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use tracing::{debug, warn};

use crate::{
    aggregate::DailyAggregate,
    error::CoreResult,
    observation::{HourlyObservation, Snapshot},
    time_fmt,
    units::UnitSystem,
};

/// Points in a single-day view: 8 steps of 3 hours.
pub const DAILY_POINTS: usize = 8;

/// First [`DAILY_POINTS`] elements, or all of them if there are fewer.
pub fn daily_slice<T>(points: &[T]) -> &[T] {
    &points[..points.len().min(DAILY_POINTS)]
}

/// How the tracked calendar day moves when a bucket closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayAdvance {
    /// Add one to the tracked day-of-month and close only when a point's day
    /// is strictly greater. Loses every bucket after a month boundary.
    #[default]
    Increment,
    /// Take the new point's day and close whenever the day changes.
    Reread,
}

/// What happens to the points after the last day change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrailingBucket {
    #[default]
    Drop,
    Flush,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BucketPolicy {
    pub day_advance: DayAdvance,
    pub trailing: TrailingBucket,
}

impl BucketPolicy {
    /// Only complete days, day tracked by increment.
    pub const fn reference() -> Self {
        Self {
            day_advance: DayAdvance::Increment,
            trailing: TrailingBucket::Drop,
        }
    }

    /// Correct across month boundaries and keeps the partial last day.
    pub const fn corrected() -> Self {
        Self {
            day_advance: DayAdvance::Reread,
            trailing: TrailingBucket::Flush,
        }
    }
}

/// Splits a time-ordered forecast list into calendar-day buckets.
#[derive(Debug, Clone)]
pub struct ForecastBucketizer<Tz: TimeZone = Local> {
    policy: BucketPolicy,
    tz: Tz,
}

impl ForecastBucketizer<Local> {
    pub fn new(policy: BucketPolicy) -> Self {
        Self { policy, tz: Local }
    }
}

impl<Tz: TimeZone> ForecastBucketizer<Tz> {
    pub fn with_timezone(policy: BucketPolicy, tz: Tz) -> Self {
        Self { policy, tz }
    }

    pub fn policy(&self) -> BucketPolicy {
        self.policy
    }

    /// Index ranges of each bucket in `points`.
    pub fn split<T: Snapshot>(&self, points: &[T]) -> CoreResult<Vec<Range<usize>>> {
        let mut ranges = Vec::new();
        let mut tracked: Option<u32> = None;
        let mut start = 0;

        for (i, point) in points.iter().enumerate() {
            let day = time_fmt::calendar_day_in(point.timestamp(), &self.tz)?;

            let Some(current) = tracked else {
                tracked = Some(day);
                continue;
            };

            let closes = match self.policy.day_advance {
                DayAdvance::Increment => current < day,
                DayAdvance::Reread => current != day,
            };

            if closes {
                ranges.push(start..i);
                tracked = Some(match self.policy.day_advance {
                    DayAdvance::Increment => current + 1,
                    DayAdvance::Reread => day,
                });
                start = i;
            }
        }

        if start < points.len() {
            match self.policy.trailing {
                TrailingBucket::Flush => ranges.push(start..points.len()),
                TrailingBucket::Drop if ranges.is_empty() => {
                    warn!(points = points.len(), "no day boundary found, forecast yields no buckets");
                }
                TrailingBucket::Drop => {
                    debug!(dropped = points.len() - start, "dropping trailing partial day");
                }
            }
        }

        debug!(buckets = ranges.len(), policy = ?self.policy, "bucketized forecast");
        Ok(ranges)
    }

    pub fn bucketize(
        &self,
        points: &[HourlyObservation],
        units: UnitSystem,
    ) -> CoreResult<Vec<DailyAggregate>> {
        let ranges = self.split(points)?;

        Ok(ranges
            .into_iter()
            .map(|r| DailyAggregate::new(points[r].to_vec(), units))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::fixtures::point_json;
    use chrono::Utc;

    const STEP: i64 = 3 * 3600;
    // 2024-03-15T00:00:00Z
    const MID_MONTH: i64 = 1_710_460_800;
    // 2024-01-30T00:00:00Z
    const END_OF_JANUARY: i64 = 1_706_572_800;

    fn series(start: i64, count: usize) -> Vec<HourlyObservation> {
        (0..count)
            .map(|i| {
                let dt = start + i as i64 * STEP;
                HourlyObservation::from_value(
                    point_json(dt, 5.0, 9.0, 60, 2.0, 0.0, "clear sky", "01d"),
                    UnitSystem::Metric,
                )
                .unwrap()
            })
            .collect()
    }

    fn lengths(ranges: &[Range<usize>]) -> Vec<usize> {
        ranges.iter().map(|r| r.len()).collect()
    }

    #[test]
    fn reference_drops_the_last_day() {
        let points = series(MID_MONTH, 24);
        let ranges = ForecastBucketizer::with_timezone(BucketPolicy::reference(), Utc)
            .split(&points)
            .unwrap();

        assert_eq!(ranges, vec![0..8, 8..16]);
    }

    #[test]
    fn corrected_flushes_the_last_day() {
        let points = series(MID_MONTH, 24);
        let ranges = ForecastBucketizer::with_timezone(BucketPolicy::corrected(), Utc)
            .split(&points)
            .unwrap();

        assert_eq!(lengths(&ranges), vec![8, 8, 8]);
    }

    #[test]
    fn provider_window_starting_mid_day() {
        // 12:00 on the 15th through 09:00 on the 20th, like a real 40-step response.
        let points = series(MID_MONTH + 4 * STEP, 40);

        let reference = ForecastBucketizer::with_timezone(BucketPolicy::reference(), Utc)
            .split(&points)
            .unwrap();
        assert_eq!(lengths(&reference), vec![4, 8, 8, 8, 8]);

        let corrected = ForecastBucketizer::with_timezone(BucketPolicy::corrected(), Utc)
            .split(&points)
            .unwrap();
        assert_eq!(lengths(&corrected), vec![4, 8, 8, 8, 8, 4]);
    }

    #[test]
    fn reference_stalls_at_month_boundary() {
        let points = series(END_OF_JANUARY, 32);
        let ranges = ForecastBucketizer::with_timezone(BucketPolicy::reference(), Utc)
            .split(&points)
            .unwrap();

        // 30th closes when the 31st starts; day 1 is never "greater" than 31.
        assert_eq!(ranges, vec![0..8]);
    }

    #[test]
    fn reread_handles_month_boundary() {
        let points = series(END_OF_JANUARY, 32);
        let policy = BucketPolicy {
            day_advance: DayAdvance::Reread,
            trailing: TrailingBucket::Drop,
        };
        let ranges = ForecastBucketizer::with_timezone(policy, Utc)
            .split(&points)
            .unwrap();

        assert_eq!(ranges, vec![0..8, 8..16, 16..24]);
    }

    #[test]
    fn bucketize_builds_aggregates() {
        let points = series(MID_MONTH, 24);
        let days = ForecastBucketizer::with_timezone(BucketPolicy::corrected(), Utc)
            .bucketize(&points, UnitSystem::Metric)
            .unwrap();

        assert_eq!(days.len(), 3);
        assert!(days.iter().all(|d| d.points().len() == 8));
        assert_eq!(days[1].timestamp(), Some(MID_MONTH + 8 * STEP));
    }

    #[test]
    fn empty_and_single_day_inputs() {
        let bucketizer = ForecastBucketizer::with_timezone(BucketPolicy::reference(), Utc);
        assert!(bucketizer.split::<HourlyObservation>(&[]).unwrap().is_empty());
        assert!(bucketizer.split(&series(MID_MONTH, 8)).unwrap().is_empty());

        let flushing = ForecastBucketizer::with_timezone(BucketPolicy::corrected(), Utc);
        assert_eq!(flushing.split(&series(MID_MONTH, 8)).unwrap(), vec![0..8]);
    }

    #[test]
    fn daily_slice_takes_at_most_eight() {
        let long: Vec<u32> = (0..40).collect();
        assert_eq!(daily_slice(&long), &long[..8]);

        let short = [1, 2, 3];
        assert_eq!(daily_slice(&short).len(), 3);
        assert!(daily_slice::<u8>(&[]).is_empty());
    }
}
