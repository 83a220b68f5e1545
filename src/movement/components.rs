//! Movement domain: components and physics layers for the platformer.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::environment::{CategoryMask, SurfaceCategory};

use super::{MovementState, TickReport};

/// Physics layers for collision filtering
#[derive(PhysicsLayer, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GameLayer {
    #[default]
    Default,
    /// Blocks from every direction
    Solid,
    /// Blocks horizontal movement only
    Wall,
    /// Lands from above, passable from below and the sides
    OneWay,
    /// Player character
    Player,
}

impl GameLayer {
    /// Layers a probe with `mask` may hit.
    pub fn mask_for(mask: CategoryMask) -> LayerMask {
        LayerMask(
            mask.categories()
                .map(|category| GameLayer::from(category).to_bits())
                .fold(0, |bits, layer| bits | layer),
        )
    }
}

impl From<SurfaceCategory> for GameLayer {
    fn from(category: SurfaceCategory) -> Self {
        match category {
            SurfaceCategory::Solid => GameLayer::Solid,
            SurfaceCategory::Wall => GameLayer::Wall,
            SurfaceCategory::OneWay => GameLayer::OneWay,
        }
    }
}

#[derive(Component, Debug)]
pub struct Player;

/// Static geometry the controller probes against.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Surface {
    pub category: SurfaceCategory,
}

/// Controller state owned by a character entity.
#[derive(Component, Debug, Clone, Default)]
pub struct PlatformerBody(pub MovementState);

/// Report from the most recent fixed tick; feeds debug drawing.
#[derive(Component, Debug, Clone, Default)]
pub struct LastTick(pub TickReport);
