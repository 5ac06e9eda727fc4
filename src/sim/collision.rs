//! Racer vs hurdle collision
//!
//! No "high enough" check: any box overlap is a hit, so clearing a hurdle
//! means the whole jump arc must miss it.

use super::racer::Racer;
use super::track::{Hurdle, HurdleRegistry};
use crate::consts::COLLISION_Z_MARGIN;

/// First hurdle whose box overlaps the racer, if any
pub fn find_collision<'a, R: Racer + ?Sized>(
    racer: &R,
    hurdles: &'a HurdleRegistry,
) -> Option<&'a Hurdle> {
    let body = racer.body();
    let racer_box = body.bounds();
    let racer_z = body.position.z;

    hurdles
        .iter()
        // Cheap reject before the full box test
        .filter(|h| (racer_z - h.z).abs() <= COLLISION_Z_MARGIN)
        .find(|h| racer_box.intersects(&h.bounds()))
}

/// Test the racer against every nearby hurdle and apply the penalty on a hit.
///
/// At most one penalty per call. Finished racers never collide.
pub fn check_collisions<R: Racer + ?Sized>(racer: &mut R, hurdles: &HurdleRegistry) -> bool {
    if racer.is_finished() {
        return false;
    }
    let Some(hurdle) = find_collision(racer, hurdles) else {
        return false;
    };
    log::debug!(
        "{:?} hit hurdle at z={:.1} (racer z={:.2}, y={:.2})",
        racer.id(),
        hurdle.z,
        racer.body().position.z,
        racer.body().position.y
    );
    racer.apply_collision_penalty();
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::player::Player;
    use crate::sim::track::Track;

    fn player_at(track: &Track, z: f32) -> Player {
        let mut player = Player::new(track.player_lane());
        player.body.position.z = z;
        player.body.horizontal_speed = 6.0;
        player.sprint_energy = 3.0;
        player.body.driven = true;
        player
    }

    #[test]
    fn test_grounded_racer_hits_hurdle() {
        let track = Track::default();
        let mut player = player_at(&track, -19.9);

        assert!(check_collisions(&mut player, &track.hurdles));
        assert_eq!(player.body.horizontal_speed, 0.0);
        assert_eq!(player.sprint_energy, 0.0);
        assert!(!player.body.driven);
    }

    #[test]
    fn test_far_hurdle_rejected() {
        let track = Track::default();
        let mut player = player_at(&track, -10.0);
        assert!(!check_collisions(&mut player, &track.hurdles));
        assert_eq!(player.body.horizontal_speed, 6.0);
    }

    #[test]
    fn test_high_jump_clears_box() {
        let track = Track::default();
        let mut player = player_at(&track, -20.0);
        player.body.jump(JUMP_FORCE);
        // Near the apex the feet are above the hurdle top
        player.body.position.y = player.body.base_ground_y + 1.2;
        assert!(!check_collisions(&mut player, &track.hurdles));
    }

    #[test]
    fn test_low_jump_still_collides() {
        let track = Track::default();
        let mut player = player_at(&track, -20.0);
        player.body.jump(JUMP_FORCE);
        player.body.position.y = player.body.base_ground_y + 0.3;
        assert!(check_collisions(&mut player, &track.hurdles));
    }

    #[test]
    fn test_neighbouring_lane_hurdle_ignored() {
        let track = Track::default();
        // Hurdles exist in every lane; only the racer's own lane may overlap
        let player = player_at(&track, -20.0);
        let hit = find_collision(&player, &track.hurdles).unwrap();
        assert_eq!(hit.lane_x, track.player_lane());
    }

    #[test]
    fn test_past_all_hurdles_never_recollides() {
        let track = Track::default();
        let mut player = player_at(&track, -90.0);
        player.apply_collision_penalty();
        for _ in 0..10 {
            assert!(!check_collisions(&mut player, &track.hurdles));
        }
    }

    #[test]
    fn test_finished_racer_ignored() {
        let track = Track::default();
        let mut player = player_at(&track, -20.0);
        player.body.finish(10.0);
        assert!(!check_collisions(&mut player, &track.hurdles));
    }
}
