//! In-memory static geometry answering probe rays.

use bevy::log::trace;
use bevy::math::Vec2;

use super::{EnvironmentQuery, Hit, PlatformId, ProbeDirection, ProbeRay, SurfaceCategory};

/// Collision shape of a static surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Axis-aligned box.
    Rect { center: Vec2, half_extents: Vec2 },
    /// Convex polygon, either winding. Used for slopes and ramps.
    Polygon(Vec<Vec2>),
}

impl Shape {
    pub fn rect(center: Vec2, size: Vec2) -> Self {
        Shape::Rect {
            center,
            half_extents: size / 2.0,
        }
    }

    /// Right-angled ramp whose sloped face rises from `low` to `high`, filled down to the lower
    /// of the two heights.
    pub fn ramp(low: Vec2, high: Vec2) -> Self {
        let foot = Vec2::new(high.x, low.y);
        Shape::Polygon(vec![low, foot, high])
    }

    /// Strict interior test; points on the boundary are outside.
    pub fn contains(&self, point: Vec2) -> bool {
        match self {
            Shape::Rect {
                center,
                half_extents,
            } => {
                let local = (point - *center).abs();
                local.x < half_extents.x && local.y < half_extents.y
            }
            Shape::Polygon(points) => {
                let mut sign = 0.0_f32;
                for (a, b) in edges(points) {
                    let side = (b - a).perp_dot(point - a);
                    if side == 0.0 || side * sign < 0.0 {
                        return false;
                    }
                    sign = side;
                }
                points.len() >= 3
            }
        }
    }

    /// Distance along `direction` from `origin` to the shape's boundary, if it is crossed.
    pub fn ray_distance(&self, origin: Vec2, direction: ProbeDirection) -> Option<f32> {
        if self.contains(origin) {
            return Some(0.0);
        }
        match self {
            Shape::Rect {
                center,
                half_extents,
            } => {
                let min = *center - *half_extents;
                let max = *center + *half_extents;
                let within_x = origin.x >= min.x && origin.x <= max.x;
                let within_y = origin.y >= min.y && origin.y <= max.y;
                match direction {
                    ProbeDirection::Down if within_x && origin.y >= max.y => Some(origin.y - max.y),
                    ProbeDirection::Up if within_x && origin.y <= min.y => Some(min.y - origin.y),
                    ProbeDirection::Left if within_y && origin.x >= max.x => Some(origin.x - max.x),
                    ProbeDirection::Right if within_y && origin.x <= min.x => Some(min.x - origin.x),
                    _ => None,
                }
            }
            Shape::Polygon(points) => {
                let dir = direction.vector();
                edges(points)
                    .filter_map(|(a, b)| ray_segment(origin, dir, a, b))
                    .min_by(f32::total_cmp)
            }
        }
    }
}

fn edges(points: &[Vec2]) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
    points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| (*a, *b))
}

/// Parametric distance along a unit ray to segment `a..b`. Parallel segments never hit.
fn ray_segment(origin: Vec2, dir: Vec2, a: Vec2, b: Vec2) -> Option<f32> {
    let edge = b - a;
    let denom = dir.perp_dot(edge);
    if denom.abs() <= f32::EPSILON {
        return None;
    }
    let rel = a - origin;
    let t = rel.perp_dot(edge) / denom;
    let s = rel.perp_dot(dir) / denom;
    (t >= 0.0 && (0.0..=1.0).contains(&s)).then_some(t)
}

#[derive(Debug, Clone, PartialEq)]
pub struct StaticSurface {
    pub id: PlatformId,
    pub category: SurfaceCategory,
    pub shape: Shape,
}

/// A list of static surfaces, probed by brute force.
#[derive(Debug, Clone, Default)]
pub struct StaticWorld {
    surfaces: Vec<StaticSurface>,
    next_id: u64,
}

impl StaticWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a surface and return the id probes will report for it.
    pub fn add(&mut self, category: SurfaceCategory, shape: Shape) -> PlatformId {
        let id = PlatformId(self.next_id);
        self.next_id += 1;
        self.surfaces.push(StaticSurface {
            id,
            category,
            shape,
        });
        id
    }

    pub fn with(mut self, category: SurfaceCategory, shape: Shape) -> Self {
        self.add(category, shape);
        self
    }

    pub fn surfaces(&self) -> &[StaticSurface] {
        &self.surfaces
    }

    pub fn surface(&self, id: PlatformId) -> Option<&StaticSurface> {
        self.surfaces.iter().find(|surface| surface.id == id)
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}

impl EnvironmentQuery for StaticWorld {
    fn probe(&self, ray: &ProbeRay, exclude: &[PlatformId]) -> Option<Hit> {
        let mut nearest: Option<Hit> = None;

        for surface in &self.surfaces {
            if !ray.mask.contains(surface.category)
                || !surface.category.blocks(ray.direction)
                || exclude.contains(&surface.id)
            {
                continue;
            }
            let Some(distance) = surface.shape.ray_distance(ray.origin, ray.direction) else {
                continue;
            };
            if distance > ray.length {
                continue;
            }
            // Strict comparison keeps the earliest-added surface on ties.
            if nearest.is_none_or(|hit| distance < hit.distance) {
                nearest = Some(Hit {
                    point: ray.at(distance),
                    distance,
                    category: surface.category,
                    platform: surface.id,
                });
            }
        }

        if let Some(hit) = &nearest {
            trace!(
                "probe {:?} from {} hit {:?} ({:?}) at {}",
                ray.direction, ray.origin, hit.platform, hit.category, hit.point
            );
        }
        nearest
    }
}
