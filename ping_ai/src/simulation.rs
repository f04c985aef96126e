//! Headless local match: a `ping_core` world with AI-driven paddles.

use glam::Vec2;
use hecs::World;
use ping_core::{
    create_ball, create_paddle, step, Ball, Config, Events, GameMap, GameRng, InputQueue, Paddle,
    Params, RespawnState, Score, Side, Time,
};

use crate::{ArenaLayout, BallState, FrameInput, PaddleAi};

/// Outcome of one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub winner: Option<Side>,
    pub scored: Option<Side>,
    pub ball_hit_paddle: bool,
    pub paddle_left_y: f32,
    pub paddle_right_y: f32,
}

pub struct LocalMatch {
    pub world: World,
    pub time: Time,
    pub map: GameMap,
    pub config: Config,
    pub score: Score,
    pub events: Events,
    pub input_queue: InputQueue,
    pub rng: GameRng,
    pub respawn_state: RespawnState,
    left_ai: Option<PaddleAi>,
    right_ai: Option<PaddleAi>,
}

impl LocalMatch {
    /// Match on `map` with no AI attached; add AIs with `with_ai`
    pub fn new(map: GameMap, seed: u64) -> Self {
        let config = Config::new();
        let mut world = World::new();
        let mut rng = GameRng::new(seed);

        for side in [Side::Left, Side::Right] {
            create_paddle(&mut world, side, map.paddle_spawn(side, &config).y);
        }

        let mut ball = Ball::new(map.ball_spawn(), Vec2::ZERO);
        ball.serve(config.ball_speed_initial, &mut rng);
        create_ball(&mut world, ball.pos, ball.vel);

        Self {
            world,
            time: Time::new(Params::FIXED_DT, 0.0),
            map,
            config,
            score: Score::new(),
            events: Events::new(),
            input_queue: InputQueue::new(),
            rng,
            respawn_state: RespawnState::new(),
            left_ai: None,
            right_ai: None,
        }
    }

    /// Attach a default-tuned AI to `side`
    pub fn with_ai(self, side: Side, seed: u64) -> Self {
        let layout = self.layout(side);
        self.with_paddle_ai(PaddleAi::new(layout, seed))
    }

    pub fn with_paddle_ai(mut self, ai: PaddleAi) -> Self {
        match ai.side() {
            Side::Left => self.left_ai = Some(ai),
            Side::Right => self.right_ai = Some(ai),
        }
        self
    }

    pub fn layout(&self, side: Side) -> ArenaLayout {
        ArenaLayout::from_map(&self.map, &self.config, side)
    }

    pub fn ai(&self, side: Side) -> Option<&PaddleAi> {
        match side {
            Side::Left => self.left_ai.as_ref(),
            Side::Right => self.right_ai.as_ref(),
        }
    }

    pub fn paddle_y(&self, side: Side) -> f32 {
        self.world
            .query::<&Paddle>()
            .iter()
            .find(|(_e, paddle)| paddle.side == side)
            .map(|(_e, paddle)| paddle.y)
            .unwrap_or_else(|| self.config.paddle_center_y())
    }

    pub fn balls(&self) -> Vec<(BallState, bool)> {
        self.world
            .query::<&Ball>()
            .iter()
            .map(|(_e, ball)| (BallState::from(ball), ball.frozen))
            .collect()
    }

    /// Advance one fixed frame. `manual` sets paddle Ys for sides without AI.
    pub fn step(&mut self, manual: &[(Side, f32)]) -> FrameReport {
        let dt = Params::FIXED_DT;
        let balls = self.balls();
        let states: Vec<BallState> = balls.iter().map(|(ball, _)| *ball).collect();
        let (primary, frozen) = balls
            .first()
            .copied()
            .unwrap_or((BallState::centered(self.map.width, self.map.height), true));

        for (side, y) in manual {
            self.input_queue.push_input(*side, *y);
        }

        for side in [Side::Left, Side::Right] {
            let paddle_y = self.paddle_y(side);
            let (score_self, score_opp) = self.score.for_side(side);
            let max_step = self.config.max_paddle_step(dt);
            let now = self.time.now;
            let ai = match side {
                Side::Left => self.left_ai.as_mut(),
                Side::Right => self.right_ai.as_mut(),
            };
            if let Some(ai) = ai {
                let y = ai.move_paddle(&FrameInput {
                    ball: primary,
                    balls: &states,
                    paddle_y,
                    max_step,
                    ball_frozen: frozen,
                    score_self,
                    score_opp,
                    dt,
                    now,
                });
                self.input_queue.push_input(side, y);
            }
        }

        self.time.dt = dt;
        step(
            &mut self.world,
            &mut self.time,
            &self.map,
            &self.config,
            &mut self.score,
            &mut self.events,
            &mut self.input_queue,
            &mut self.rng,
            &mut self.respawn_state,
        );

        if let Some(scorer) = self.events.scored {
            for ai in [self.left_ai.as_mut(), self.right_ai.as_mut()].into_iter().flatten() {
                ai.on_score_event(scorer);
            }
        }

        FrameReport {
            winner: self.score.has_winner(self.config.win_score),
            scored: self.events.scored,
            ball_hit_paddle: self.events.ball_hit_paddle,
            paddle_left_y: self.paddle_y(Side::Left),
            paddle_right_y: self.paddle_y(Side::Right),
        }
    }
}
