//! Ball and player speed over short trailing windows.

use crate::geometry::distance;
use crate::models::{Kick, Match, PositionSample};
use crate::position_index::{find_ball, frame_at};
use tracing::trace;

/// Kicks this early in a match carry unstable samples and report no speed.
const EARLIEST_SPEED_TIME: f64 = 1.0;

/// Ball speed between the frame `time_offset` before the kick and the kick
/// frame.
///
/// Elapsed time is taken from the frames actually sampled, not from
/// `time_offset`. Zero when the kick is too early, when either frame lacks
/// the ball, or when both lookups land on the same frame.
pub fn ball_speed(m: &Match, kick: &Kick, time_offset: f64) -> f64 {
    if kick.time <= EARLIEST_SPEED_TIME {
        return 0.0;
    }

    let before = find_ball(frame_at(m.positions(), kick.time - time_offset));
    let after = find_ball(frame_at(m.positions(), kick.time));
    let (Some(before), Some(after)) = (before, after) else {
        trace!(time = kick.time, "ball missing around kick; speed defaults to 0");
        return 0.0;
    };

    speed_between(before, after)
}

/// Speed of the named player between their first and last sample in
/// `positions`. Zero when fewer than two samples exist.
///
/// Names are not unique; the first player with this name is measured. Use
/// [`speed_of_player`] when the id is known.
pub fn player_speed(m: &Match, player_name: &str, positions: &[PositionSample]) -> f64 {
    m.player_by_name(player_name).map_or(0.0, |player| speed_of_player(player.id, positions))
}

/// Speed of player `player_id` between their first and last sample in
/// `positions`. Zero when fewer than two samples exist.
pub fn speed_of_player(player_id: u32, positions: &[PositionSample]) -> f64 {
    let mut track = positions.iter().filter(|p| p.player_id() == Some(player_id));
    let Some(first) = track.next() else {
        return 0.0;
    };
    match track.last() {
        Some(last) => speed_between(first, last),
        None => 0.0,
    }
}

fn speed_between(from: &PositionSample, to: &PositionSample) -> f64 {
    let elapsed = to.time - from.time;
    if elapsed <= 0.0 {
        return 0.0;
    }
    distance(from.x, from.y, to.x, to.y) / elapsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::fixtures::{kick, match_with};
    use crate::models::Team;
    use crate::position_index::range_select;

    #[test]
    fn test_ball_speed_uses_sampled_elapsed_time() {
        let m = match_with(vec![
            PositionSample::ball(4.0, 0.0, 0.0),
            PositionSample::ball(4.5, 30.0, 40.0),
            PositionSample::ball(6.0, 60.0, 80.0),
        ]);
        // 6.0 - 1.2 = 4.8 falls in the t=4.5 frame, so 1.5s elapsed.
        let speed = ball_speed(&m, &kick(6.0, 0.0, 0.0), 1.2);
        assert!((speed - 50.0 / 1.5).abs() < 1e-9, "speed was {}", speed);
    }

    #[test]
    fn test_ball_speed_early_kick_is_zero() {
        let m = match_with(vec![PositionSample::ball(0.0, 0.0, 0.0), PositionSample::ball(1.0, 50.0, 0.0)]);
        assert_eq!(ball_speed(&m, &kick(1.0, 0.0, 0.0), 1.0), 0.0);
    }

    #[test]
    fn test_ball_speed_missing_ball_is_zero() {
        let m = match_with(vec![
            PositionSample::player(2.0, 0.0, 0.0, 1, Team::Red),
            PositionSample::ball(3.0, 50.0, 0.0),
        ]);
        assert_eq!(ball_speed(&m, &kick(3.0, 0.0, 0.0), 1.0), 0.0);
    }

    #[test]
    fn test_ball_speed_same_frame_is_zero() {
        let m = match_with(vec![PositionSample::ball(2.0, 0.0, 0.0)]);
        assert_eq!(ball_speed(&m, &kick(3.0, 0.0, 0.0), 0.5), 0.0);
    }

    #[test]
    fn test_player_speed_first_to_last() {
        let m = match_with(vec![
            PositionSample::player(2.0, 0.0, 0.0, 1, Team::Red),
            PositionSample::player(2.5, 10.0, 0.0, 1, Team::Red),
            PositionSample::player(3.0, 30.0, 40.0, 1, Team::Red),
            PositionSample::player(3.0, 99.0, 99.0, 3, Team::Blue),
        ]);
        let window = range_select(m.positions(), 2.0, 3.0).unwrap();
        assert_eq!(player_speed(&m, "Kicker", window), 50.0);
    }

    #[test]
    fn test_player_speed_needs_two_samples() {
        let m = match_with(vec![PositionSample::player(2.0, 0.0, 0.0, 1, Team::Red)]);
        assert_eq!(player_speed(&m, "Kicker", m.positions()), 0.0);
        assert_eq!(player_speed(&m, "Nobody", m.positions()), 0.0);
    }

    #[test]
    fn test_speed_of_player_uses_id_not_name() {
        let m = match_with(vec![
            PositionSample::player(2.0, 0.0, 0.0, 1, Team::Red),
            PositionSample::player(2.0, 0.0, 0.0, 2, Team::Red),
            PositionSample::player(3.0, 0.0, 0.0, 1, Team::Red),
            PositionSample::player(3.0, 30.0, 0.0, 2, Team::Red),
        ]);
        assert_eq!(speed_of_player(2, m.positions()), 30.0);
        assert_eq!(speed_of_player(1, m.positions()), 0.0);
        assert_eq!(speed_of_player(9, m.positions()), 0.0);
    }
}
