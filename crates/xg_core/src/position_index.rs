//! # Position Index
//!
//! Time queries over a sorted stream of position samples.
//!
//! Samples that share an exact timestamp form a *frame*. Because the stream
//! is sorted, every frame and every inclusive time range is a contiguous run
//! of the input, so queries hand back sub-slices instead of copies.

use crate::error::{FeatureError, Result};
use crate::models::{Match, PositionSample};

/// Validated view over a time-ordered sample stream.
#[derive(Debug, Clone, Copy)]
pub struct PositionIndex<'a> {
    samples: &'a [PositionSample],
}

impl<'a> PositionIndex<'a> {
    /// Checks the ascending-time precondition once, up front.
    pub fn new(samples: &'a [PositionSample]) -> Result<Self> {
        if let Some(i) = samples.windows(2).position(|w| !(w[0].time <= w[1].time)) {
            return Err(FeatureError::PreconditionViolation(format!(
                "position samples out of order at index {}",
                i + 1
            )));
        }
        Ok(Self { samples })
    }

    /// Positions of a match are validated when the match is built.
    pub fn of_match(m: &'a Match) -> Self {
        Self { samples: m.positions() }
    }

    pub fn samples(&self) -> &'a [PositionSample] {
        self.samples
    }

    pub fn frame_at(&self, t: f64) -> &'a [PositionSample] {
        frame_at(self.samples, t)
    }

    pub fn range_select(&self, start: f64, end: f64) -> Result<&'a [PositionSample]> {
        range_select(self.samples, start, end)
    }

    /// Like [`frame_at`], but an empty result is an error.
    pub fn require_frame(&self, t: f64) -> Result<&'a [PositionSample]> {
        let frame = self.frame_at(t);
        if frame.is_empty() {
            return Err(FeatureError::MissingFrameData(format!("no frame at or before t={}", t)));
        }
        Ok(frame)
    }
}

/// Latest complete frame whose timestamp is `<= t`.
///
/// Single forward scan. A frame only becomes the answer once a later frame
/// (or the end of input) closes it; the first frame past `t` is never
/// committed. Empty when `t` precedes every sample.
pub fn frame_at(positions: &[PositionSample], t: f64) -> &[PositionSample] {
    let mut frame_start = 0;
    let mut frame_time: Option<f64> = None;

    for (i, pos) in positions.iter().enumerate() {
        if pos.time > t {
            return frame_time.map_or(&positions[..0], |_| &positions[frame_start..i]);
        }
        if frame_time != Some(pos.time) {
            frame_start = i;
            frame_time = Some(pos.time);
        }
    }

    match frame_time {
        Some(_) => &positions[frame_start..],
        None => &positions[..0],
    }
}

/// Every sample with `start <= time <= end`.
///
/// `start > end` (or a NaN bound) is a caller bug and fails immediately.
pub fn range_select(positions: &[PositionSample], start: f64, end: f64) -> Result<&[PositionSample]> {
    if !(start <= end) {
        return Err(FeatureError::PreconditionViolation(format!(
            "range start {} must not be after end {}",
            start, end
        )));
    }
    let lo = positions.partition_point(|p| p.time < start);
    let hi = positions.partition_point(|p| p.time <= end);
    Ok(&positions[lo..hi.max(lo)])
}

/// The sample for `player_id`, if present in `frame`.
pub fn find_player(frame: &[PositionSample], player_id: u32) -> Option<&PositionSample> {
    frame.iter().find(|p| p.player_id() == Some(player_id))
}

/// The ball sample, if present in `frame`.
pub fn find_ball(frame: &[PositionSample]) -> Option<&PositionSample> {
    frame.iter().find(|p| p.is_ball())
}

/// Pairs a player's samples with the ball's, frame by frame.
///
/// Both tracks must cover the same frames in the same order; a ragged window
/// would silently pair samples from different instants, so it is rejected.
/// If either track is absent the result is empty.
pub fn pair_with_ball(
    window: &[PositionSample],
    player_id: u32,
) -> Result<Vec<(PositionSample, PositionSample)>> {
    let player: Vec<&PositionSample> =
        window.iter().filter(|p| p.player_id() == Some(player_id)).collect();
    let ball: Vec<&PositionSample> = window.iter().filter(|p| p.is_ball()).collect();

    if player.is_empty() || ball.is_empty() {
        return Ok(Vec::new());
    }
    if player.len() != ball.len() {
        return Err(FeatureError::PreconditionViolation(format!(
            "player {} has {} samples but ball has {} in the same window",
            player_id,
            player.len(),
            ball.len()
        )));
    }

    player
        .into_iter()
        .zip(ball)
        .map(|(p, b)| {
            if p.time == b.time {
                Ok((*p, *b))
            } else {
                Err(FeatureError::PreconditionViolation(format!(
                    "player {} sample at t={} paired with ball sample at t={}",
                    player_id, p.time, b.time
                )))
            }
        })
        .collect()
}
