pub mod components;
pub mod config;
pub mod map;
pub mod params;
pub mod resources;
pub mod systems;

pub use components::*;
pub use config::*;
pub use map::*;
pub use params::*;
pub use resources::*;

use hecs::World;
use systems::*;

/// Run the deterministic Ping simulation
#[allow(clippy::too_many_arguments)]
pub fn step(
    world: &mut World,
    time: &mut Time,
    map: &GameMap,
    config: &Config,
    score: &mut Score,
    events: &mut Events,
    input_queue: &mut InputQueue,
    rng: &mut GameRng,
    respawn_state: &mut RespawnState,
) {
    // Clamp dt to prevent large jumps
    let clamped_dt = time.dt.min(Params::MAX_DT);

    // Events accumulate over all micro-steps of this frame
    events.clear();

    // 1. Ingest inputs (apply to paddle intents)
    ingest_inputs(world, input_queue);

    // Fixed micro-steps for stable physics
    let mut remaining_dt = clamped_dt;
    while remaining_dt > 0.0 {
        let step_dt = remaining_dt.min(Params::FIXED_DT);
        remaining_dt -= step_dt;

        let step_time = Time {
            dt: step_dt,
            now: time.now + (clamped_dt - remaining_dt),
        };

        // 2. Move paddles toward their intents
        move_paddles(world, &step_time, config);

        // 3. Move balls
        move_balls(world, &step_time);

        // 4. Portals, then walls, obstacles and paddles
        teleport_balls(world, map, events);
        check_collisions(world, map, config, events);

        // 5. Check scoring (ball exited arena)
        check_scoring(world, map, score, events, respawn_state, config);

        // 6. Serve frozen balls once the delay has passed
        respawn_tick(world, &step_time, respawn_state, events, rng, config);
    }

    // Update time
    time.now += clamped_dt;
}

/// Helper to create a paddle entity
pub fn create_paddle(world: &mut World, side: Side, y: f32) -> hecs::Entity {
    world.spawn((Paddle::new(side, y), PaddleIntent::new()))
}

/// Helper to create a ball entity
pub fn create_ball(world: &mut World, pos: glam::Vec2, vel: glam::Vec2) -> hecs::Entity {
    world.spawn((Ball::new(pos, vel),))
}
