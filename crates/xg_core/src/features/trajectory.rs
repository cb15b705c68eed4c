//! Shot trajectory projection.
//!
//! Contact is inferred from the kicker and ball tracks just before the kick:
//! the latest frame where they were close enough to touch is taken as the
//! moment of contact, and the kicker→ball line is extended to the goal line.

use crate::error::Result;
use crate::geometry::{distance, point_on_line, slope};
use crate::goal::opposing_goal;
use crate::models::{Kick, Point, PositionSample, Stadium, Team};
use crate::position_index::pair_with_ball;

/// Kicker–ball distance at which contact is assumed.
pub const CONTACT_DISTANCE: f64 = 30.0;

/// Kicker and ball at the inferred contact frame, and where the line through
/// them crosses the goal line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotProjection {
    pub kicker: PositionSample,
    pub ball: PositionSample,
    pub intersect: Point,
}

/// Projects the shot in `window` (samples leading up to the kick).
///
/// Prefers the most recent frame with the ball within [`CONTACT_DISTANCE`]
/// of the kicker; otherwise the frame with the smallest distance, the most
/// recent one on ties. `None` when the window has no kicker or no ball track.
pub fn shot_intersection(
    kick: &Kick,
    stadium: &Stadium,
    window: &[PositionSample],
) -> Result<Option<ShotProjection>> {
    let goal_mid = opposing_goal(stadium, kick.from_team)?.mid;
    let pairs = pair_with_ball(window, kick.from_id)?;

    let gap = |(k, b): &(PositionSample, PositionSample)| distance(k.x, k.y, b.x, b.y);

    let contact = pairs.iter().rev().find(|&pair| gap(pair) <= CONTACT_DISTANCE).or_else(|| {
        pairs.iter().rev().fold(None, |best: Option<&(PositionSample, PositionSample)>, pair| {
            match best {
                Some(b) if gap(b) <= gap(pair) => Some(b),
                _ => Some(pair),
            }
        })
    });

    Ok(contact.map(|&(kicker, ball)| {
        let origin = kicker.point();
        let m = slope(kicker.x, kicker.y, ball.x, ball.y);
        let y = point_on_line(&origin, m, goal_mid.x);
        ShotProjection { kicker, ball, intersect: Point::new(goal_mid.x, y) }
    }))
}

/// 1 when the projected crossing lies strictly between the posts, else 0.
///
/// Exactly on a post also yields 0; post hits are not given partial credit.
pub fn shot_on_goal(intersect: &Point, stadium: &Stadium, team: Team) -> Result<u8> {
    let goal = opposing_goal(stadium, team)?;
    let between = intersect.y > goal.post_low_y() && intersect.y < goal.post_high_y();
    Ok(u8::from(between))
}
