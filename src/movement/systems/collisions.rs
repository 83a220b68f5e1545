//! Movement domain: ray probes against avian colliders.

use avian2d::prelude::*;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::environment::{EnvironmentQuery, Hit, PlatformId, ProbeDirection, ProbeRay};
use crate::movement::{GameLayer, Surface};

/// Answers controller probes from the physics world.
///
/// Every collider tagged with [`Surface`] takes part; platform ids are entity bits.
#[derive(SystemParam)]
pub struct AvianEnvironment<'w, 's> {
    spatial_query: SpatialQuery<'w, 's>,
    surfaces: Query<'w, 's, &'static Surface>,
}

fn direction(direction: ProbeDirection) -> Dir2 {
    match direction {
        ProbeDirection::Left => Dir2::NEG_X,
        ProbeDirection::Right => Dir2::X,
        ProbeDirection::Up => Dir2::Y,
        ProbeDirection::Down => Dir2::NEG_Y,
    }
}

impl EnvironmentQuery for AvianEnvironment<'_, '_> {
    fn probe(&self, ray: &ProbeRay, exclude: &[PlatformId]) -> Option<Hit> {
        let filter = SpatialQueryFilter::from_mask(GameLayer::mask_for(ray.mask));

        let hit = self.spatial_query.cast_ray_predicate(
            ray.origin,
            direction(ray.direction),
            ray.length,
            true,
            &filter,
            &|entity| {
                !exclude.contains(&PlatformId(entity.to_bits()))
                    && self.surfaces.get(entity).is_ok_and(|surface| {
                        ray.mask.contains(surface.category)
                            && surface.category.blocks(ray.direction)
                    })
            },
        )?;

        let surface = self.surfaces.get(hit.entity).ok()?;
        trace!(
            "avian probe {:?} hit {:?} at {}",
            ray.direction, hit.entity, hit.distance
        );
        Some(Hit {
            point: ray.at(hit.distance),
            distance: hit.distance,
            category: surface.category,
            platform: PlatformId(hit.entity.to_bits()),
        })
    }
}
