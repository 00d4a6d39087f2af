use crate::config::chunksys::{ChunkSysConfig, VerticalRange};
use crate::world::chunk_coord::ChunkCoord;
use glam::Vec3;
use std::collections::HashMap;

/// Level-of-detail step for a chunk at `distance` chunks from the observer.
/// A step of `k` meshes every `k`-th cell.
pub fn lod_for_distance(distance: f32) -> u32 {
    if distance < 5.0 {
        1
    } else if distance < 10.0 {
        2
    } else if distance < 20.0 {
        4
    } else {
        8
    }
}

/// The set of chunk coordinates kept loaded around an observer.
#[derive(Debug, Clone, Copy)]
pub struct StreamingWindow {
    pub render_distance: i32,
    pub vertical: VerticalRange,
}

impl StreamingWindow {
    pub fn new(render_distance: i32, vertical: VerticalRange) -> Self {
        Self {
            render_distance,
            vertical,
        }
    }

    pub fn from_config(config: &ChunkSysConfig) -> Self {
        Self::new(config.render_distance, config.vertical)
    }

    /// Every coordinate in the window mapped to its LOD step. Detail only
    /// depends on horizontal distance, so every layer under the observer
    /// meshes at full detail.
    pub fn retain_set(&self, observer: Vec3) -> HashMap<ChunkCoord, u32> {
        let center = ChunkCoord::from_world_pos(observer);
        let r = self.render_distance;
        let layers = self.vertical.layers(center.y());
        let mut set = HashMap::new();

        for y in layers {
            for x in (center.x() - r)..=(center.x() + r) {
                for z in (center.z() - r)..=(center.z() + r) {
                    let coord = ChunkCoord::new(x, y, z);
                    set.insert(coord, lod_for_distance(coord.horizontal_distance(&center)));
                }
            }
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lod_thresholds() {
        assert_eq!(lod_for_distance(0.0), 1);
        assert_eq!(lod_for_distance(4.99), 1);
        assert_eq!(lod_for_distance(5.0), 2);
        assert_eq!(lod_for_distance(9.9), 2);
        assert_eq!(lod_for_distance(10.0), 4);
        assert_eq!(lod_for_distance(19.9), 4);
        assert_eq!(lod_for_distance(20.0), 8);
    }

    #[test]
    fn test_band_window_size() {
        let window = StreamingWindow::new(2, VerticalRange::Band { min_y: 0, max_y: 0 });
        assert_eq!(window.retain_set(Vec3::ZERO).len(), 25);

        let window = StreamingWindow::new(2, VerticalRange::Band { min_y: -1, max_y: 2 });
        let set = window.retain_set(Vec3::new(0.0, 500.0, 0.0));
        assert_eq!(set.len(), 25 * 4);
        assert!(set.keys().all(|c| (-1..=2).contains(&c.y())));
    }

    #[test]
    fn test_radius_window_follows_observer() {
        let window = StreamingWindow::new(1, VerticalRange::Radius(1));
        let set = window.retain_set(Vec3::new(40.0, 40.0, -40.0));
        assert_eq!(set.len(), 27);
        assert!(set.contains_key(&ChunkCoord::new(2, 2, -3)));
        assert_eq!(set[&ChunkCoord::new(2, 2, -3)], 1);
    }

    #[test]
    fn test_high_observer_keeps_full_detail_below() {
        let window = StreamingWindow::new(1, VerticalRange::Band { min_y: 0, max_y: 0 });
        let set = window.retain_set(Vec3::new(8.0, 200.0, 8.0));
        assert_eq!(set[&ChunkCoord::new(0, 0, 0)], 1);
        assert!(set.values().all(|lod| *lod == 1));
    }

    #[test]
    fn test_far_chunks_get_coarser_lod() {
        let window = StreamingWindow::new(12, VerticalRange::Band { min_y: 0, max_y: 0 });
        let set = window.retain_set(Vec3::ZERO);
        assert_eq!(set[&ChunkCoord::new(0, 0, 0)], 1);
        assert_eq!(set[&ChunkCoord::new(6, 0, 0)], 2);
        assert_eq!(set[&ChunkCoord::new(12, 0, 12)], 4);
    }
}
