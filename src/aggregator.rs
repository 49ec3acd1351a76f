//! Hour-of-day rating-delta aggregation.
//!
//! For every tracked time class the aggregator remembers the player's last
//! known rating. The first game of a class only seeds that rating; each later
//! game adds `rating - last_rating` to the bucket of the local hour the game
//! ended in. The running rating makes the result order dependent: games must be
//! fed oldest first. Months arrive in archive order and games within a month in
//! server order, which is not re-sorted here; out-of-order input silently
//! attributes deltas to the wrong games.

use std::time::Instant;

use tracing::{info, trace, warn};

use crate::error::Result;
use crate::model::Game;
use crate::tz::{hour_of_day, Zone};

pub const HOURS: usize = 24;

/// Cumulative rating delta and game count per local hour.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HourlyBuckets {
    pub delta_sum: [i64; HOURS],
    pub count: [u32; HOURS],
}

impl HourlyBuckets {
    fn add(&mut self, hour: usize, delta: i64) {
        self.delta_sum[hour] += delta;
        self.count[hour] += 1;
    }

    /// `delta_sum / count` per hour, 0 where no game was counted.
    pub fn averages(&self) -> [f64; HOURS] {
        let mut avg = [0.0; HOURS];
        for (h, slot) in avg.iter_mut().enumerate() {
            if self.count[h] > 0 {
                *slot = self.delta_sum[h] as f64 / f64::from(self.count[h]);
            }
        }
        avg
    }

    pub fn total_games(&self) -> u64 {
        self.count.iter().map(|&c| u64::from(c)).sum()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    UntrackedClass,
    UserNotInGame,
    TimestampOutOfRange,
}

/// What happened to one game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Skipped(SkipReason),
    /// First game of its class; rating recorded, nothing counted.
    Seeded,
    Counted { hour: u32, delta: i64 },
}

#[derive(Debug, Default)]
struct ClassState {
    last_rating: Option<i32>,
    buckets: HourlyBuckets,
}

pub struct Aggregator {
    user: String,
    zone: Zone,
    classes: Vec<(String, ClassState)>,
    games_seen: u64,
}

impl Aggregator {
    pub fn new(user: &str, time_classes: &[String], zone: Zone) -> Self {
        let mut classes: Vec<(String, ClassState)> = Vec::with_capacity(time_classes.len());
        for tc in time_classes {
            if !classes.iter().any(|(name, _)| name == tc) {
                classes.push((tc.clone(), ClassState::default()));
            }
        }
        Self { user: user.to_string(), zone, classes, games_seen: 0 }
    }

    pub fn push_game(&mut self, game: &Game) -> Outcome {
        self.games_seen += 1;

        let Some(state) = self
            .classes
            .iter_mut()
            .find(|(name, _)| *name == game.time_class)
            .map(|(_, state)| state)
        else {
            return Outcome::Skipped(SkipReason::UntrackedClass);
        };

        let Some(rating) = game.rating_for(&self.user) else {
            trace!("aggregate: {} not in game ending at {}", self.user, game.end_time);
            return Outcome::Skipped(SkipReason::UserNotInGame);
        };

        let Some(hour) = hour_of_day(game.end_time, &self.zone) else {
            warn!("aggregate: end_time {} out of range, game skipped", game.end_time);
            return Outcome::Skipped(SkipReason::TimestampOutOfRange);
        };

        let outcome = match state.last_rating {
            None => {
                trace!("aggregate: {} seeded at {}", game.time_class, rating);
                Outcome::Seeded
            }
            Some(last) => {
                let delta = i64::from(rating) - i64::from(last);
                state.buckets.add(hour as usize, delta);
                Outcome::Counted { hour, delta }
            }
        };
        state.last_rating = Some(rating);
        outcome
    }

    pub fn push_month(&mut self, games: &[Game]) {
        for game in games {
            self.push_game(game);
        }
    }

    pub fn last_rating(&self, time_class: &str) -> Option<i32> {
        self.state(time_class).and_then(|s| s.last_rating)
    }

    pub fn buckets(&self, time_class: &str) -> Option<&HourlyBuckets> {
        self.state(time_class).map(|s| &s.buckets)
    }

    fn state(&self, time_class: &str) -> Option<&ClassState> {
        self.classes
            .iter()
            .find(|(name, _)| name == time_class)
            .map(|(_, s)| s)
    }

    pub fn games_seen(&self) -> u64 {
        self.games_seen
    }

    pub fn finish(self) -> PerfTable {
        PerfTable {
            rows: self
                .classes
                .into_iter()
                .map(|(name, state)| (name, state.buckets.averages()))
                .collect(),
        }
    }
}

/// Average rating delta per local hour, per time class, in class order.
#[derive(Clone, Debug, PartialEq)]
pub struct PerfTable {
    rows: Vec<(String, [f64; HOURS])>,
}

impl PerfTable {
    pub fn from_rows(rows: Vec<(String, [f64; HOURS])>) -> Self {
        Self { rows }
    }

    pub fn get(&self, time_class: &str) -> Option<&[f64; HOURS]> {
        self.rows
            .iter()
            .find(|(name, _)| name == time_class)
            .map(|(_, avg)| avg)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64; HOURS])> {
        self.rows.iter().map(|(name, avg)| (name.as_str(), avg))
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|(name, _)| name.as_str())
    }
}

/// Drain `batches` (one month of games per item, oldest month first) into a
/// [`PerfTable`]. Any batch error aborts the aggregation.
pub fn aggregate<I>(batches: I, user: &str, time_classes: &[String], zone: Zone) -> Result<PerfTable>
where
    I: IntoIterator<Item = Result<Vec<Game>>>,
{
    let t0 = Instant::now();
    let mut agg = Aggregator::new(user, time_classes, zone);
    let mut months = 0usize;

    for batch in batches {
        let games = batch?;
        agg.push_month(&games);
        months += 1;
    }

    info!(
        "aggregate: done in {:.3}s; months={} games={} tz={}",
        t0.elapsed().as_secs_f64(),
        months,
        agg.games_seen(),
        zone
    );
    Ok(agg.finish())
}
