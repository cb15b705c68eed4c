//! Defender occupancy of the scoring path.
//!
//! Two regions between the kicker and the goal mouth are tested:
//! - the *lane*, an axis-aligned rectangle from the kicker's x to the goal
//!   line, bounded in y by the posts;
//! - the *cone*, the triangle spanned by the kicker and both posts.

use crate::error::Result;
use crate::geometry::{point_on_line, slope};
use crate::goal::{attack_direction, opposing_goal};
use crate::models::{GoalGeometry, Kick, Match, PositionSample, Stadium};
use crate::position_index::{find_player, frame_at};
use tracing::trace;

/// Number of defenders inside a region and whether there is any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Occupancy {
    pub count: u32,
    pub any: bool,
}

impl Occupancy {
    fn from_count(count: u32) -> Self {
        Self { count, any: count > 0 }
    }
}

/// Opponents inside the shooting lane at the kick's timestamp.
///
/// Empty occupancy when the kicker is not in that frame.
pub fn lane_occupancy(m: &Match, stadium: &Stadium, kick: &Kick) -> Result<Occupancy> {
    let goal = opposing_goal(stadium, kick.from_team)?;
    let direction = attack_direction(stadium, kick.from_team)?;
    let frame = frame_at(m.positions(), kick.time);

    let Some(kicker) = find_player(frame, kick.from_id) else {
        trace!(time = kick.time, player = kick.from_id, "kicker missing from lane frame");
        return Ok(Occupancy::default());
    };

    let goal_x = goal.line_x();
    let (x_min, x_max) = if direction > 0.0 { (kicker.x, goal_x) } else { (goal_x, kicker.x) };
    let (y_min, y_max) = (goal.post_low_y(), goal.post_high_y());

    let count = defenders(frame, kicker)
        .filter(|s| s.x >= x_min && s.x <= x_max && s.y >= y_min && s.y <= y_max)
        .count();
    Ok(Occupancy::from_count(count as u32))
}

/// Opponents inside the shot cone, `time_offset` seconds before contact.
///
/// Empty occupancy when the kicker is not in that frame.
pub fn cone_occupancy(
    m: &Match,
    stadium: &Stadium,
    kick: &Kick,
    time_offset: f64,
) -> Result<Occupancy> {
    let goal = opposing_goal(stadium, kick.from_team)?;
    let frame = frame_at(m.positions(), kick.time - time_offset);

    let Some(kicker) = find_player(frame, kick.from_id) else {
        trace!(time = kick.time - time_offset, player = kick.from_id, "kicker missing from cone frame");
        return Ok(Occupancy::default());
    };

    let count = defenders(frame, kicker).filter(|s| in_cone(kicker, goal, s)).count();
    Ok(Occupancy::from_count(count as u32))
}

/// Whether `sample` lies in the triangle kicker → low post → high post.
fn in_cone(kicker: &PositionSample, goal: &GoalGeometry, sample: &PositionSample) -> bool {
    let goal_x = goal.line_x();
    if sample.x < kicker.x.min(goal_x) || sample.x > kicker.x.max(goal_x) {
        return false;
    }

    let apex = kicker.point();
    let low = goal.low_post();
    let high = goal.high_post();
    let y_a = point_on_line(&apex, slope(apex.x, apex.y, low.x, low.y), sample.x);
    let y_b = point_on_line(&apex, slope(apex.x, apex.y, high.x, high.y), sample.x);

    sample.y >= y_a.min(y_b) && sample.y <= y_a.max(y_b)
}

/// Opposing players in the frame, excluding ball and kicker.
fn defenders<'a>(
    frame: &'a [PositionSample],
    kicker: &'a PositionSample,
) -> impl Iterator<Item = &'a PositionSample> + 'a {
    let team = kicker.team();
    let id = kicker.player_id();
    frame
        .iter()
        .filter(move |s| s.player_id() != id && team.is_some_and(|t| s.is_opponent_of(t)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::fixtures::{kick, match_with};
    use crate::goal::fixtures::futsal;
    use crate::models::Team;

    // Red attacks the blue goal at x=370, posts at y=±64.

    #[test]
    fn test_lane_counts_opponents_between_kicker_and_goal() {
        let m = match_with(vec![
            PositionSample::ball(5.0, 205.0, 0.0),
            PositionSample::player(5.0, 200.0, 0.0, 1, Team::Red),
            PositionSample::player(5.0, 300.0, 10.0, 3, Team::Blue), // in lane
            PositionSample::player(5.0, 300.0, 100.0, 4, Team::Blue), // wide of the posts
            PositionSample::player(5.0, 100.0, 0.0, 5, Team::Blue), // behind kicker
            PositionSample::player(5.0, 250.0, 0.0, 2, Team::Red), // teammate
        ]);
        let occ = lane_occupancy(&m, &futsal(), &kick(5.0, 200.0, 0.0)).unwrap();
        assert_eq!(occ, Occupancy { count: 1, any: true });
    }

    #[test]
    fn test_lane_direction_for_blue() {
        let m = match_with(vec![
            PositionSample::player(5.0, -200.0, 0.0, 3, Team::Blue),
            PositionSample::player(5.0, -300.0, 0.0, 1, Team::Red), // in blue's lane
            PositionSample::player(5.0, -100.0, 0.0, 2, Team::Red), // behind
        ]);
        let mut k = kick(5.0, -200.0, 0.0);
        k.from_id = 3;
        k.from_team = Team::Blue;
        let occ = lane_occupancy(&m, &futsal(), &k).unwrap();
        assert_eq!(occ.count, 1);
    }

    #[test]
    fn test_lane_missing_kicker() {
        let m = match_with(vec![PositionSample::player(5.0, 300.0, 0.0, 3, Team::Blue)]);
        let occ = lane_occupancy(&m, &futsal(), &kick(5.0, 200.0, 0.0)).unwrap();
        assert_eq!(occ, Occupancy { count: 0, any: false });
    }

    #[test]
    fn test_cone_uses_offset_frame() {
        let m = match_with(vec![
            // Pre-kick frame: defender squarely in the cone.
            PositionSample::player(4.8, 200.0, 0.0, 1, Team::Red),
            PositionSample::player(4.8, 300.0, 0.0, 3, Team::Blue),
            // Contact frame: defender has moved away.
            PositionSample::player(5.0, 200.0, 0.0, 1, Team::Red),
            PositionSample::player(5.0, 300.0, 150.0, 3, Team::Blue),
        ]);
        let k = kick(5.0, 200.0, 0.0);
        assert_eq!(cone_occupancy(&m, &futsal(), &k, 0.1).unwrap().count, 1);
        assert_eq!(cone_occupancy(&m, &futsal(), &k, 0.0).unwrap().count, 0);
    }

    #[test]
    fn test_cone_narrows_toward_kicker() {
        let m = match_with(vec![
            PositionSample::player(5.0, 200.0, 0.0, 1, Team::Red),
            // Halfway to goal the cone spans y in [-32, 32].
            PositionSample::player(5.0, 285.0, 30.0, 3, Team::Blue),
            PositionSample::player(5.0, 285.0, 40.0, 4, Team::Blue),
        ]);
        let occ = cone_occupancy(&m, &futsal(), &kick(5.0, 200.0, 0.0), 0.0).unwrap();
        assert_eq!(occ, Occupancy { count: 1, any: true });
    }

    #[test]
    fn test_cone_missing_kicker() {
        let m = match_with(vec![PositionSample::player(5.0, 300.0, 0.0, 3, Team::Blue)]);
        let occ = cone_occupancy(&m, &futsal(), &kick(5.0, 200.0, 0.0), 0.1).unwrap();
        assert!(!occ.any);
    }
}
