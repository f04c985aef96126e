use ping_ai::*;
use ping_core::{Config, GameMap, Side};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const DT: f32 = 1.0 / 60.0;
const MAX_Y: f32 = 510.0;
const CENTER_Y: f32 = 255.0;

fn layout(side: Side) -> ArenaLayout {
    let config = Config::new();
    ArenaLayout::from_map(&GameMap::new(&config), &config, side)
}

fn portal_layout(side: Side) -> ArenaLayout {
    let config = Config::new();
    ArenaLayout::from_map(&GameMap::portal_test_map(&config), &config, side)
}

fn frame(ball: BallState, paddle_y: f32, now: f32) -> FrameInput<'static> {
    FrameInput {
        ball,
        balls: &[],
        paddle_y,
        max_step: 8.0,
        ball_frozen: false,
        score_self: 0,
        score_opp: 0,
        dt: DT,
        now,
    }
}

fn random_value(rng: &mut StdRng, lo: f32, hi: f32) -> f32 {
    match rng.gen_range(0..20) {
        0 => f32::NAN,
        1 => f32::INFINITY,
        2 => f32::NEG_INFINITY,
        _ => rng.gen_range(lo..hi),
    }
}

#[test]
fn test_output_always_in_bounds() {
    let mut inputs = StdRng::seed_from_u64(2024);
    for side in [Side::Left, Side::Right] {
        let mut ai = PaddleAi::new(portal_layout(side), 3);
        let mut paddle_y = CENTER_Y;
        for i in 0..5_000 {
            let balls: Vec<BallState> = (0..inputs.gen_range(0..4))
                .map(|_| {
                    BallState::new(
                        random_value(&mut inputs, -100.0, 900.0),
                        random_value(&mut inputs, -100.0, 700.0),
                        random_value(&mut inputs, -1200.0, 1200.0),
                        random_value(&mut inputs, -1200.0, 1200.0),
                    )
                })
                .collect();
            let ball = balls
                .first()
                .copied()
                .unwrap_or_else(|| BallState::centered(800.0, 600.0));
            let input = FrameInput {
                ball,
                balls: &balls,
                paddle_y,
                max_step: random_value(&mut inputs, 0.0, 20.0),
                ball_frozen: inputs.gen_bool(0.05),
                score_self: inputs.gen_range(0..6),
                score_opp: inputs.gen_range(0..6),
                dt: random_value(&mut inputs, 0.0, 0.05),
                now: i as f32 * DT,
            };
            let y = ai.move_paddle(&input);
            assert!(
                y.is_finite() && (0.0..=MAX_Y).contains(&y),
                "Frame {i}: output {y} out of bounds for {input:?}"
            );
            // Occasionally feed a garbage paddle position back in
            paddle_y = if inputs.gen_bool(0.02) { f32::NAN } else { y };
        }
    }
}

#[test]
fn test_score_event_then_centered_ball_gives_exact_center() {
    let mut ai = PaddleAi::new(layout(Side::Right), 11);
    let rally = BallState::new(500.0, 520.0, 420.0, 150.0);
    let mut y = CENTER_Y;
    for i in 0..45 {
        y = ai.move_paddle(&frame(rally, y, i as f32 * DT));
    }
    assert!(y > CENTER_Y, "Paddle followed the low ball: {y}");

    ai.on_score_event(Side::Left);
    let snapshot = ai.debug_snapshot();
    assert_eq!(snapshot.cache_entries, 0);
    assert_eq!(snapshot.last_intercept, None);
    assert_eq!(snapshot.adopted_target, None);
    assert_eq!(snapshot.momentum, 0.0);

    let parked = BallState::new(400.0, 300.0, 0.5, -0.5);
    let y = ai.move_paddle(&frame(parked, CENTER_Y - 1.0, 1.0));
    assert_eq!(y, CENTER_Y);
}

#[test]
fn test_score_event_glide_lands_exactly_on_center() {
    let mut ai = PaddleAi::new(layout(Side::Right), 12);
    ai.on_score_event(Side::Left);

    let safety = &ai.config().safety;
    let step = 8.0_f32.min(safety.reset_speed * DT);
    let start = 100.0;
    let frames_needed = ((CENTER_Y - start) / step).ceil() as usize;

    let parked = BallState::new(400.0, 300.0, 0.5, -0.5);
    let mut y = start;
    let mut landed_at = None;
    for i in 0..frames_needed + 10 {
        y = ai.move_paddle(&frame(parked, y, i as f32 * DT));
        if y == CENTER_Y {
            landed_at.get_or_insert(i + 1);
        } else {
            assert!(landed_at.is_none(), "Left centre after landing: {y}");
        }
    }
    let frames = landed_at.expect("glide should end exactly on centre");
    assert!(frames <= frames_needed, "Took {frames} frames, expected at most {frames_needed}");
}

#[test]
fn test_score_event_glides_back_from_far_away() {
    let mut ai = PaddleAi::new(layout(Side::Left), 11);
    ai.on_score_event(Side::Right);

    let parked = BallState::new(400.0, 300.0, 0.0, 0.0);
    let mut y = MAX_Y;
    for i in 0..120 {
        let next = ai.move_paddle(&frame(parked, y, i as f32 * DT));
        assert!(next <= y, "Glide should be monotonic: {y} -> {next}");
        y = next;
    }
    assert_eq!(y, CENTER_Y);
    assert_eq!(ai.state(), SupervisorState::RespawnHold);
}

#[test]
fn test_stuck_paddle_recovers_through_emergency() {
    let mut ai = PaddleAi::new(layout(Side::Right), 5);
    let ball = BallState::new(200.0, 80.0, 300.0, 60.0);
    let stuck_y = 40.0;

    let mut now = 0.0;
    while now < 4.0 {
        ai.move_paddle(&frame(ball, stuck_y, now));
        now += DT;
    }
    assert_eq!(ai.state(), SupervisorState::Emergency);
    assert_eq!(ai.debug_snapshot().last_intercept, None, "Emergency clears tracking");

    let mut y = stuck_y;
    loop {
        let next = ai.move_paddle(&frame(ball, y, now));
        now += DT;
        if ai.state() != SupervisorState::Emergency {
            break;
        }
        assert!(next >= y, "Emergency glide must head for centre: {y} -> {next}");
        assert!(next <= CENTER_Y);
        y = next;
        assert!(now < 10.0, "Emergency never resolved");
    }
    assert_eq!(y, CENTER_Y);
    assert_eq!(ai.state(), SupervisorState::Normal);
}

#[test]
fn test_paddle_parked_at_reached_target_stays_normal() {
    let mut ai = PaddleAi::new(layout(Side::Right), 21);
    // Far enough out that no spike is planned; every intercept clamps to
    // the bottom of the paddle range
    let ball = BallState::new(300.0, 590.0, 300.0, 0.0);

    let mut y = CENTER_Y;
    let mut parked_since = None;
    let mut now = 0.0;
    while now < 8.0 {
        let next = ai.move_paddle(&frame(ball, y, now));
        assert_ne!(ai.state(), SupervisorState::Emergency, "Parked paddle flagged stuck at {now}");
        if next == MAX_Y && y == MAX_Y {
            parked_since.get_or_insert(now);
        }
        y = next;
        now += DT;
    }
    let since = parked_since.expect("paddle should reach the bottom target");
    assert!(now - since > 5.0, "Paddle only parked for {}s", now - since);
    assert_eq!(ai.state(), SupervisorState::Normal);
}

fn exact_ai(side: Side) -> PaddleAi {
    let mut config = AiConfig::default();
    config.prediction.accuracy = 1.0;
    config.offense.enabled = false;
    PaddleAi::with_config(layout(side), config, 13).expect("valid config")
}

/// Feed `ball` until a target has been adopted; returns the paddle Y and time
fn settle(ai: &mut PaddleAi, ball: BallState, mut y: f32, mut now: f32) -> (f32, f32) {
    while ai.debug_snapshot().adopted_target.is_none() {
        assert!(now < 1.0, "No target adopted");
        y = ai.move_paddle(&frame(ball, y, now));
        now += DT;
    }
    (y, now)
}

#[test]
fn test_close_incoming_ball_skips_reaction_delay() {
    let mut ai = exact_ai(Side::Right);
    let high = BallState::new(700.0, 150.0, 300.0, 0.0);
    let low = BallState::new(700.0, 330.0, 300.0, 0.0);

    let y = ai.move_paddle(&frame(high, CENTER_Y, 0.0));
    assert_eq!(ai.debug_snapshot().adopted_target, Some(105.0), "First target adopted at once");

    ai.move_paddle(&frame(low, y, DT));
    assert_eq!(
        ai.debug_snapshot().adopted_target,
        Some(285.0),
        "Large jump adopted on the same frame"
    );
}

#[test]
fn test_distant_ball_waits_out_reaction_delay() {
    let mut ai = exact_ai(Side::Right);
    let human = ai.config().human.clone();
    let high = BallState::new(300.0, 150.0, 300.0, 0.0);
    let low = BallState::new(300.0, 330.0, 300.0, 0.0);

    let (mut y, switched_at) = settle(&mut ai, high, CENTER_Y, 0.0);
    assert_eq!(ai.debug_snapshot().adopted_target, Some(105.0));

    let earliest = human.reaction_time - human.reaction_variance;
    let latest = human.reaction_time + human.reaction_variance;
    let mut now = switched_at;
    let mut adopted_at = None;
    while now - switched_at < latest + 0.1 {
        y = ai.move_paddle(&frame(low, y, now));
        match ai.debug_snapshot().adopted_target {
            Some(target) if target == 105.0 => {}
            Some(target) if target == 285.0 => {
                adopted_at.get_or_insert(now - switched_at);
            }
            other => panic!("Unexpected target {other:?}"),
        }
        now += DT;
    }

    let delay = adopted_at.expect("new target adopted once the delay expires");
    assert!(
        delay >= earliest - 1e-4 && delay <= latest + DT + 1e-4,
        "Adopted after {delay}s"
    );
}

#[test]
fn test_frozen_ball_holds_center() {
    let mut ai = PaddleAi::new(layout(Side::Right), 5);
    let parked = BallState::centered(800.0, 600.0);
    let mut y = 20.0;
    for i in 0..120 {
        let input = FrameInput {
            ball_frozen: true,
            ..frame(parked, y, i as f32 * DT)
        };
        y = ai.move_paddle(&input);
    }
    assert_eq!(y, CENTER_Y);
    assert_eq!(ai.state(), SupervisorState::RespawnHold);

    // Serve releases the hold
    let served = BallState::new(400.0, 300.0, 360.0, 90.0);
    ai.move_paddle(&frame(served, y, 2.0));
    assert_eq!(ai.state(), SupervisorState::Normal);
}

#[test]
fn test_seeded_runs_are_identical() {
    let run = |seed: u64| -> Vec<f32> {
        let mut ai = PaddleAi::new(portal_layout(Side::Right), seed);
        let mut y = CENTER_Y;
        let mut ball = BallState::new(100.0, 150.0, 380.0, 210.0);
        let mut out = Vec::new();
        for i in 0..600 {
            let now = i as f32 * DT;
            ball.pos += ball.vel * DT;
            if ball.pos.y < 0.0 || ball.pos.y > 600.0 {
                ball.vel.y = -ball.vel.y;
            }
            if ball.pos.x < 0.0 || ball.pos.x > 770.0 {
                ball.vel.x = -ball.vel.x;
            }
            let input = FrameInput {
                score_self: (i / 200) as u8,
                ..frame(ball, y, now)
            };
            y = ai.move_paddle(&input);
            out.push(y);
        }
        out
    };

    assert_eq!(run(42), run(42));
}

#[test]
fn test_most_threatening_ball_is_tracked() {
    let mut ai = PaddleAi::new(layout(Side::Right), 8);
    let receding = BallState::new(450.0, 520.0, -300.0, 0.0);
    let incoming = BallState::new(600.0, 90.0, 450.0, 0.0);
    let balls = [receding, incoming];

    let mut y = CENTER_Y;
    for i in 0..60 {
        let input = FrameInput {
            balls: &balls,
            ..frame(receding, y, i as f32 * DT)
        };
        y = ai.move_paddle(&input);
    }
    assert!(y < CENTER_Y - 100.0, "Paddle should rise to meet the incoming ball: {y}");
}

#[test]
fn test_difficulty_presets_build() {
    for difficulty in [
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::Expert,
    ] {
        let ai = PaddleAi::with_config(layout(Side::Left), AiConfig::for_difficulty(difficulty), 1);
        assert!(ai.is_ok(), "{difficulty:?} should build");
    }
}
