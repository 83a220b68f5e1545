//! Environment domain: collision categories, probe rays, and the query contract.
//!
//! The controller never sees geometry directly. It casts axis-aligned probe rays through an
//! [`EnvironmentQuery`] and reacts to the nearest [`Hit`]. Two implementations live in this
//! crate: [`StaticWorld`] (in-memory shapes, used by tests and replays) and the avian2d-backed
//! query in the movement plugin.

mod world;

#[cfg(test)]
mod tests;

pub use world::{Shape, StaticSurface, StaticWorld};

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

/// What kind of surface a probe struck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurfaceCategory {
    /// Blocks probes from every direction.
    Solid,
    /// Blocks horizontal probes only.
    Wall,
    /// Blocks downward probes only, i.e. it is solid when approached from above.
    OneWay,
}

impl SurfaceCategory {
    pub const ALL: [SurfaceCategory; 3] = [
        SurfaceCategory::Solid,
        SurfaceCategory::Wall,
        SurfaceCategory::OneWay,
    ];

    /// Whether a surface of this category can stop a ray travelling in `direction`.
    pub fn blocks(self, direction: ProbeDirection) -> bool {
        match self {
            SurfaceCategory::Solid => true,
            SurfaceCategory::Wall => direction.is_horizontal(),
            SurfaceCategory::OneWay => direction == ProbeDirection::Down,
        }
    }

    const fn bit(self) -> u8 {
        match self {
            SurfaceCategory::Solid => 1 << 0,
            SurfaceCategory::Wall => 1 << 1,
            SurfaceCategory::OneWay => 1 << 2,
        }
    }
}

/// Set of surface categories a probe is allowed to hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CategoryMask(u8);

impl CategoryMask {
    pub const NONE: Self = Self(0);
    pub const SOLID: Self = Self(SurfaceCategory::Solid.bit());
    pub const WALL: Self = Self(SurfaceCategory::Wall.bit());
    pub const ONE_WAY: Self = Self(SurfaceCategory::OneWay.bit());

    /// Horizontal probes: walls and full blocks.
    pub const HORIZONTAL: Self = Self(Self::WALL.0 | Self::SOLID.0);

    /// Ground probes: one-way platforms and full blocks.
    pub const GROUND: Self = Self(Self::ONE_WAY.0 | Self::SOLID.0);

    /// Ceiling probes never stop on one-way platforms.
    pub const CEILING: Self = Self::SOLID;

    #[inline]
    pub fn contains(self, category: SurfaceCategory) -> bool {
        self.0 & category.bit() != 0
    }

    #[inline]
    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn categories(self) -> impl Iterator<Item = SurfaceCategory> {
        SurfaceCategory::ALL
            .into_iter()
            .filter(move |category| self.contains(*category))
    }
}

impl std::ops::BitOr for CategoryMask {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl From<SurfaceCategory> for CategoryMask {
    fn from(category: SurfaceCategory) -> Self {
        Self(category.bit())
    }
}

/// Axis-aligned probe direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProbeDirection {
    Left,
    Right,
    Up,
    Down,
}

impl ProbeDirection {
    /// Unit vector for this direction.
    pub fn vector(self) -> Vec2 {
        match self {
            ProbeDirection::Left => Vec2::NEG_X,
            ProbeDirection::Right => Vec2::X,
            ProbeDirection::Up => Vec2::Y,
            ProbeDirection::Down => Vec2::NEG_Y,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, ProbeDirection::Left | ProbeDirection::Right)
    }

    /// Horizontal direction matching the sign of `axis`, if any.
    pub fn from_axis(axis: f32) -> Option<Self> {
        if axis < 0.0 {
            Some(ProbeDirection::Left)
        } else if axis > 0.0 {
            Some(ProbeDirection::Right)
        } else {
            None
        }
    }
}

/// Opaque identity of a piece of static geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlatformId(pub u64);

/// A single ray cast against static geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbeRay {
    pub origin: Vec2,
    pub direction: ProbeDirection,
    pub length: f32,
    pub mask: CategoryMask,
}

impl ProbeRay {
    pub fn new(origin: Vec2, direction: ProbeDirection, length: f32, mask: CategoryMask) -> Self {
        Self {
            origin,
            direction,
            length,
            mask,
        }
    }

    /// Point at `distance` along the ray.
    pub fn at(&self, distance: f32) -> Vec2 {
        self.origin + self.direction.vector() * distance
    }

    pub fn end(&self) -> Vec2 {
        self.at(self.length)
    }
}

/// Nearest intersection of a probe with static geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    pub point: Vec2,
    pub distance: f32,
    pub category: SurfaceCategory,
    pub platform: PlatformId,
}

impl Hit {
    /// Degenerate geometry can produce NaN or infinite contacts; those are treated as misses.
    pub fn is_finite(&self) -> bool {
        self.point.is_finite() && self.distance.is_finite()
    }
}

/// Ray query against static geometry.
///
/// Implementations must return the nearest surface along the ray whose category is in the
/// ray's mask, whose category [blocks](SurfaceCategory::blocks) the ray's direction, and whose
/// id is not in `exclude`. A ray that starts inside a shape reports a hit at its origin.
pub trait EnvironmentQuery {
    fn probe(&self, ray: &ProbeRay, exclude: &[PlatformId]) -> Option<Hit>;
}

impl<T: EnvironmentQuery + ?Sized> EnvironmentQuery for &T {
    fn probe(&self, ray: &ProbeRay, exclude: &[PlatformId]) -> Option<Hit> {
        (**self).probe(ray, exclude)
    }
}
