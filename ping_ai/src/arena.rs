//! The AI's read-only view of the arena and its portal topology.

use glam::Vec2;
use ping_core::{Aabb, Config, GameMap, PortalPair, Side};

/// Geometry the AI is bound to for one level
#[derive(Debug, Clone, PartialEq)]
pub struct ArenaLayout {
    pub width: f32,
    pub height: f32,
    pub paddle_height: f32,
    pub paddle_speed: f32,
    /// X of the paddle's ball-facing plane
    pub paddle_x: f32,
    /// Balls bounce when their edge, not their centre, meets a wall
    pub ball_radius: f32,
    pub side: Side,
    pub portals: Vec<PortalPair>,
    pub obstacles: Vec<Aabb>,
}

impl ArenaLayout {
    /// Capture the layout for the paddle on `side`
    pub fn from_map(map: &GameMap, config: &Config, side: Side) -> Self {
        Self {
            width: map.width,
            height: map.height,
            paddle_height: config.paddle_height,
            paddle_speed: config.paddle_speed,
            paddle_x: config.paddle_x(side),
            ball_radius: config.ball_radius,
            side,
            portals: map.portals.clone(),
            obstacles: map.obstacles.clone(),
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Highest valid top-edge Y for the paddle
    pub fn max_paddle_y(&self) -> f32 {
        (self.height - self.paddle_height).max(0.0)
    }

    /// Top-edge Y that centres the paddle
    pub fn paddle_center_y(&self) -> f32 {
        self.max_paddle_y() / 2.0
    }

    /// Distance from each wall at which a ball centre reflects
    pub fn wall_inset(&self) -> f32 {
        if self.ball_radius.is_finite() {
            self.ball_radius.clamp(0.0, self.height.max(0.0) / 2.0)
        } else {
            0.0
        }
    }

    /// Lowest and highest Y a ball centre can reach
    pub fn ball_y_range(&self) -> (f32, f32) {
        let inset = self.wall_inset();
        (inset, (self.height - inset).max(inset))
    }

    pub fn clamp_paddle_y(&self, y: f32) -> f32 {
        y.clamp(0.0, self.max_paddle_y())
    }

    /// Clamp a paddle-centre Y so the whole paddle stays in the arena
    pub fn clamp_center(&self, y: f32) -> f32 {
        let half = (self.paddle_height / 2.0).min(self.height / 2.0);
        y.clamp(half, self.height - half)
    }

    /// X of the side wall the paddle does not defend
    pub fn far_wall_x(&self) -> f32 {
        match self.side {
            Side::Left => self.width,
            Side::Right => 0.0,
        }
    }

    /// Distance from `x` to the paddle plane as a fraction of arena width
    pub fn normalized_distance(&self, x: f32) -> f32 {
        if self.width <= 0.0 {
            return 0.0;
        }
        ((self.paddle_x - x).abs() / self.width).clamp(0.0, 1.0)
    }

    /// True once a ball is past the paddle plane by more than `margin`
    pub fn is_behind_paddle(&self, x: f32, margin: f32) -> bool {
        (x - self.paddle_x) * self.side.approach_sign() > margin
    }
}

/// One directed portal jump
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortalLink {
    pub source: Aabb,
    pub target: Aabb,
}

/// A portal hit along a trajectory
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortalHit {
    pub link: usize,
    pub time: f32,
    pub pos: Vec2,
}

/// Directed portal links, rebuilt wholesale from the layout
#[derive(Debug, Clone, Default)]
pub struct PortalMap {
    links: Vec<PortalLink>,
}

impl PortalMap {
    pub fn build(portals: &[PortalPair]) -> Self {
        let links = portals
            .iter()
            .flat_map(|pair| pair.links())
            .map(|(source, target)| PortalLink { source, target })
            .collect();
        Self { links }
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn links(&self) -> &[PortalLink] {
        &self.links
    }

    /// Earliest portal entered by a straight path within `t_max`
    pub fn first_hit(&self, origin: Vec2, vel: Vec2, t_max: f32) -> Option<PortalHit> {
        self.links
            .iter()
            .enumerate()
            .filter_map(|(link, portal)| {
                portal.source.ray_entry(origin, vel, t_max).map(|time| PortalHit {
                    link,
                    time,
                    pos: origin + vel * time,
                })
            })
            .min_by(|a, b| a.time.total_cmp(&b.time))
    }

    /// Where a ball entering `link` at `pos` reappears
    pub fn exit_point(&self, link: usize, pos: Vec2, vel: Vec2) -> Option<Vec2> {
        self.links
            .get(link)
            .map(|portal| portal.source.remap_through(&portal.target, pos, vel))
    }

    /// True if `point` lies at (or within `slack` of) any portal exit
    pub fn is_near_exit(&self, point: Vec2, slack: f32) -> bool {
        self.links.iter().any(|portal| {
            let grown = Aabb::new(
                portal.target.min - Vec2::splat(slack),
                portal.target.max + Vec2::splat(slack),
            );
            grown.contains(point)
        })
    }
}
