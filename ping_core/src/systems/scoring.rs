use crate::{Ball, Config, Events, GameMap, RespawnState, Score, Side};
use hecs::World;

/// Check if a ball left the arena. The last ball in play is parked frozen at
/// the centre and the respawn delay starts; extra balls are despawned.
pub fn check_scoring(
    world: &mut World,
    map: &GameMap,
    score: &mut Score,
    events: &mut Events,
    respawn_state: &mut RespawnState,
    config: &Config,
) {
    let mut exited = Vec::new();
    for (entity, ball) in world.query::<&Ball>().iter() {
        let scorer = if ball.pos.x < 0.0 {
            Some(Side::Right)
        } else if ball.pos.x > map.width {
            Some(Side::Left)
        } else {
            None
        };
        if let Some(scorer) = scorer {
            exited.push((entity, scorer));
        }
    }
    if exited.is_empty() {
        return;
    }
    // Deterministic order regardless of archetype layout
    exited.sort_by_key(|(e, _)| e.id());

    let mut remaining = world.query::<&Ball>().iter().count();
    for (entity, scorer) in exited {
        score.increment(scorer);
        events.scored = Some(scorer);
        tracing::debug!(?scorer, left = score.left, right = score.right, "Point scored");

        if remaining > 1 {
            match world.despawn(entity) {
                Ok(()) => remaining -= 1,
                Err(err) => tracing::debug!(?entity, %err, "Exited ball already despawned"),
            }
        } else if let Ok(mut ball) = world.get::<&mut Ball>(entity) {
            ball.reset(map.ball_spawn());
            respawn_state.start_delay(config.respawn_delay);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_ball;
    use glam::Vec2;

    fn setup_world() -> (hecs::World, Config, GameMap, Score, Events, RespawnState) {
        let config = Config::new();
        let map = GameMap::new(&config);
        (
            hecs::World::new(),
            config,
            map,
            Score::new(),
            Events::new(),
            RespawnState::new(),
        )
    }

    #[test]
    fn test_right_player_scores_when_ball_exits_left() {
        let (mut world, config, map, mut score, mut events, mut respawn) = setup_world();
        create_ball(&mut world, Vec2::new(-0.1, 300.0), Vec2::new(-300.0, 0.0));

        check_scoring(&mut world, &map, &mut score, &mut events, &mut respawn, &config);

        assert_eq!(score.right, 1, "Right player should score");
        assert_eq!(score.left, 0, "Left player should not score");
        assert_eq!(events.scored, Some(Side::Right));
    }

    #[test]
    fn test_ball_resets_frozen_after_scoring() {
        let (mut world, config, map, mut score, mut events, mut respawn) = setup_world();
        let ball = create_ball(&mut world, Vec2::new(map.width + 1.0, 300.0), Vec2::new(300.0, 0.0));

        check_scoring(&mut world, &map, &mut score, &mut events, &mut respawn, &config);

        let ball = *world.get::<&Ball>(ball).unwrap();
        assert_eq!(score.left, 1);
        assert!(ball.frozen, "Ball waits at centre");
        assert_eq!(ball.pos, map.ball_spawn());
        assert!(!respawn.can_respawn(), "Respawn delay started");
    }

    #[test]
    fn test_extra_ball_is_despawned() {
        let (mut world, config, map, mut score, mut events, mut respawn) = setup_world();
        create_ball(&mut world, Vec2::new(-5.0, 300.0), Vec2::new(-300.0, 0.0));
        create_ball(&mut world, Vec2::new(400.0, 300.0), Vec2::new(300.0, 0.0));

        check_scoring(&mut world, &map, &mut score, &mut events, &mut respawn, &config);

        assert_eq!(world.query::<&Ball>().iter().count(), 1);
        assert_eq!(score.right, 1);
        assert!(respawn.can_respawn(), "Play continues with the other ball");
    }

    #[test]
    fn test_all_balls_exit_same_frame_keeps_one() {
        let (mut world, config, map, mut score, mut events, mut respawn) = setup_world();
        create_ball(&mut world, Vec2::new(-5.0, 300.0), Vec2::new(-300.0, 0.0));
        create_ball(&mut world, Vec2::new(map.width + 5.0, 200.0), Vec2::new(300.0, 0.0));

        check_scoring(&mut world, &map, &mut score, &mut events, &mut respawn, &config);

        assert_eq!((score.left, score.right), (1, 1), "Both exits are scored");
        let balls: Vec<Ball> = world.query::<&Ball>().iter().map(|(_, b)| *b).collect();
        assert_eq!(balls.len(), 1, "The last ball is kept for the respawn");
        assert!(balls[0].frozen);
        assert_eq!(balls[0].pos, map.ball_spawn());
        assert!(!respawn.can_respawn(), "Respawn delay started");
    }

    #[test]
    fn test_no_scoring_when_ball_in_bounds() {
        let (mut world, config, map, mut score, mut events, mut respawn) = setup_world();
        create_ball(&mut world, Vec2::new(400.0, 300.0), Vec2::new(300.0, 100.0));

        check_scoring(&mut world, &map, &mut score, &mut events, &mut respawn, &config);

        assert_eq!(score, Score::new());
        assert!(events.scored.is_none());
    }
}
