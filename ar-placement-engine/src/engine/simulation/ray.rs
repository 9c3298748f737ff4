use bevy::prelude::*;

/// Distance along `ray` to the horizontal plane at `plane_y`, if it is hit
/// in front of the origin.
pub fn ray_plane_distance(ray: &Ray3d, plane_y: f32) -> Option<f32> {
    if ray.direction.y.abs() < 0.001 {
        return None;
    }
    let t = (plane_y - ray.origin.y) / ray.direction.y;
    (t > 0.0).then_some(t)
}

/// Every horizontal surface the ray crosses, nearest first.
pub fn surface_hits(ray: &Ray3d, surfaces: &[f32]) -> Vec<(f32, Vec3)> {
    let mut hits: Vec<(f32, Vec3)> = surfaces
        .iter()
        .filter_map(|&y| ray_plane_distance(ray, y).map(|t| (t, ray.get_point(t))))
        .collect();
    hits.sort_by(|a, b| a.0.total_cmp(&b.0));
    hits
}

/// Ray from `origin` along `direction`, `None` for a degenerate direction.
pub fn ray_from(origin: Vec3, direction: Vec3) -> Option<Ray3d> {
    let direction = Dir3::new(direction).ok()?;
    Some(Ray3d::new(origin, direction))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downward_ray_hits_floor() {
        let ray = ray_from(Vec3::new(0.0, 1.6, 0.0), Vec3::new(0.0, -1.0, -1.0)).unwrap();
        let hits = surface_hits(&ray, &[0.0]);
        assert_eq!(hits.len(), 1);
        assert!((hits[0].1 - Vec3::new(0.0, 0.0, -1.6)).length() < 1e-4);
    }

    #[test]
    fn parallel_and_backward_rays_miss() {
        let level = ray_from(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Z).unwrap();
        assert!(surface_hits(&level, &[0.0]).is_empty());

        let upward = ray_from(Vec3::new(0.0, 1.0, 0.0), Vec3::Y).unwrap();
        assert!(surface_hits(&upward, &[0.0]).is_empty());
    }

    #[test]
    fn hits_are_sorted_nearest_first() {
        let ray = ray_from(Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, -1.0, -0.5)).unwrap();
        let hits = surface_hits(&ray, &[0.0, 0.8]);
        assert_eq!(hits.len(), 2);
        assert!(hits[0].0 < hits[1].0);
        assert!((hits[0].1.y - 0.8).abs() < 1e-5);
    }
}
