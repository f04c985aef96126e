use glam::Vec2;

use crate::{Config, Side};

/// How far outside an exit rect a teleported ball is placed
pub const PORTAL_EXIT_CLEARANCE: f32 = 1.0;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Check if circle intersects AABB
    pub fn intersects_circle(&self, center: Vec2, radius: f32) -> bool {
        let closest = Vec2::new(
            center.x.clamp(self.min.x, self.max.x),
            center.y.clamp(self.min.y, self.max.y),
        );
        (center - closest).length_squared() <= radius * radius
    }

    /// Time at which a point moving from `origin` with velocity `vel` enters
    /// the box, if that happens within `[0, t_max]`. Returns 0 when the
    /// origin is already inside.
    pub fn ray_entry(&self, origin: Vec2, vel: Vec2, t_max: f32) -> Option<f32> {
        let mut t_enter = 0.0_f32;
        let mut t_exit = t_max;

        for (o, d, lo, hi) in [
            (origin.x, vel.x, self.min.x, self.max.x),
            (origin.y, vel.y, self.min.y, self.max.y),
        ] {
            if d.abs() <= f32::EPSILON {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let (mut t1, mut t2) = ((lo - o) / d, (hi - o) / d);
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }
            t_enter = t_enter.max(t1);
            t_exit = t_exit.min(t2);
            if t_enter > t_exit {
                return None;
            }
        }

        Some(t_enter)
    }

    /// True when the box is taller than it is wide
    pub fn is_vertical(&self) -> bool {
        let size = self.size();
        size.y >= size.x
    }

    /// Fractional position of `point` along the long axis, in `[0, 1]`
    pub fn long_axis_fraction(&self, point: Vec2) -> f32 {
        let size = self.size();
        let (offset, extent) = if self.is_vertical() {
            (point.y - self.min.y, size.y)
        } else {
            (point.x - self.min.x, size.x)
        };
        if extent <= f32::EPSILON {
            return 0.5;
        }
        (offset / extent).clamp(0.0, 1.0)
    }

    /// Map a point entering this box onto `target`, keeping its relative
    /// offset along the long axis. The result sits just outside `target` on
    /// the side the velocity points to, so the ball does not re-enter it.
    pub fn remap_through(&self, target: &Aabb, point: Vec2, vel: Vec2) -> Vec2 {
        let t = self.long_axis_fraction(point);
        let size = target.size();
        if target.is_vertical() {
            let x = if vel.x >= 0.0 {
                target.max.x + PORTAL_EXIT_CLEARANCE
            } else {
                target.min.x - PORTAL_EXIT_CLEARANCE
            };
            Vec2::new(x, target.min.y + t * size.y)
        } else {
            let y = if vel.y >= 0.0 {
                target.max.y + PORTAL_EXIT_CLEARANCE
            } else {
                target.min.y - PORTAL_EXIT_CLEARANCE
            };
            Vec2::new(target.min.x + t * size.x, y)
        }
    }
}

/// Two linked portal mouths. One-way pairs only carry balls from `a` to `b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortalPair {
    pub a: Aabb,
    pub b: Aabb,
    pub bidirectional: bool,
}

impl PortalPair {
    pub fn new(a: Aabb, b: Aabb, bidirectional: bool) -> Self {
        Self {
            a,
            b,
            bidirectional,
        }
    }

    /// Directed (source, target) links this pair provides
    pub fn links(&self) -> impl Iterator<Item = (Aabb, Aabb)> {
        let reverse = self.bidirectional.then_some((self.b, self.a));
        std::iter::once((self.a, self.b)).chain(reverse)
    }
}

/// Arena layout: bounds, obstacles and portals
#[derive(Debug, Clone)]
pub struct GameMap {
    pub width: f32,
    pub height: f32,
    pub obstacles: Vec<Aabb>,
    pub portals: Vec<PortalPair>,
}

impl GameMap {
    /// Empty arena sized from the config
    pub fn new(config: &Config) -> Self {
        Self {
            width: config.arena_width,
            height: config.arena_height,
            obstacles: Vec::new(),
            portals: Vec::new(),
        }
    }

    pub fn with_obstacle(mut self, obstacle: Aabb) -> Self {
        self.obstacles.push(obstacle);
        self
    }

    pub fn with_portal(mut self, portal: PortalPair) -> Self {
        self.portals.push(portal);
        self
    }

    pub fn ball_spawn(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Spawn point for a paddle: face X and a centred top edge
    pub fn paddle_spawn(&self, side: Side, config: &Config) -> Vec2 {
        Vec2::new(config.paddle_x(side), config.paddle_center_y())
    }

    /// Portal link whose source contains `point`, if any
    pub fn portal_at(&self, point: Vec2) -> Option<(Aabb, Aabb)> {
        self.portals
            .iter()
            .flat_map(|p| p.links())
            .find(|(source, _)| source.contains(point))
    }

    /// A small arena with a mirrored pair of portals and a centre post
    pub fn portal_test_map(config: &Config) -> Self {
        let w = config.arena_width;
        let h = config.arena_height;
        Self::new(config)
            .with_obstacle(Aabb::from_center_size(
                Vec2::new(w / 2.0, h * 0.15),
                Vec2::new(20.0, 40.0),
            ))
            .with_portal(PortalPair::new(
                Aabb::from_center_size(Vec2::new(w * 0.35, h * 0.75), Vec2::new(12.0, 80.0)),
                Aabb::from_center_size(Vec2::new(w * 0.65, h * 0.25), Vec2::new(12.0, 80.0)),
                true,
            ))
    }
}
