//! Nearest-neighbour lookup over a container's direct children.
//!
//! A linear scan is enough: the container never holds more than the pool's
//! capacity of landed droplets.
use glam::Vec3;
use ordered_float::OrderedFloat;

/// What the search needs to know about a container child.
pub trait SearchCandidate {
    /// World-space position used for the distance test.
    fn position(&self) -> Vec3;
    /// `false` for decorative children (sounds, emitters) that can never be
    /// merge targets.
    fn is_physical(&self) -> bool;
    /// Fixed objects are skipped.
    fn is_anchored(&self) -> bool;
}

impl SearchCandidate for crate::droplet::Droplet {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn is_physical(&self) -> bool {
        true
    }

    fn is_anchored(&self) -> bool {
        self.anchored
    }
}

/// Returns the key of the closest qualifying child within `radius` of
/// `origin_position`.
///
/// A child qualifies when it is physical, is not `origin` itself, is not
/// anchored and lies within `radius` by straight-line distance. On exact
/// distance ties the first child in scan order wins.
///
/// # Examples
/// ```
/// use droplets::search::{find_nearest, SearchCandidate};
/// use glam::Vec3;
///
/// struct Blob(Vec3);
/// impl SearchCandidate for Blob {
///     fn position(&self) -> Vec3 { self.0 }
///     fn is_physical(&self) -> bool { true }
///     fn is_anchored(&self) -> bool { false }
/// }
///
/// let children = [(1, Blob(Vec3::X)), (2, Blob(Vec3::X * 0.5))];
/// let nearest = find_nearest(0, Vec3::ZERO, 2.0, children.iter().map(|(k, b)| (*k, b)));
/// assert_eq!(nearest, Some(2));
/// ```
pub fn find_nearest<'a, K, C, I>(origin: K, origin_position: Vec3, radius: f32, children: I) -> Option<K>
where
    K: PartialEq + Copy,
    C: SearchCandidate + 'a,
    I: IntoIterator<Item = (K, &'a C)>,
{
    children
        .into_iter()
        .filter(|(key, child)| *key != origin && child.is_physical() && !child.is_anchored())
        .map(|(key, child)| (key, child.position().distance(origin_position)))
        .filter(|(_, distance)| *distance <= radius)
        // `min_by_key` keeps the first minimum it sees.
        .min_by_key(|(_, distance)| OrderedFloat(*distance))
        .map(|(key, _)| key)
}
