use crate::math::Vec3;

/// Canonical support directions shared by every k-DOP size, in slot order:
/// the three axes, six face diagonals, then three space diagonals.
///
/// A `KDop<N>` uses the first `N / 2` entries.
pub const KDOP_DIRECTIONS: [[i8; 3]; 12] = [
    [1, 0, 0],
    [0, 1, 0],
    [0, 0, 1],
    [1, 1, 0],
    [1, 0, 1],
    [0, 1, 1],
    [1, -1, 0],
    [1, 0, -1],
    [0, 1, -1],
    [1, 1, -1],
    [1, -1, 1],
    [-1, 1, 1],
];

/// Discrete-orientation polytope with `N / 2` pairs of supporting planes.
///
/// `dist[i]` is the lower support and `dist[i + N / 2]` the upper support
/// along direction `i`, measured as `direction · p` with the unnormalized
/// direction from [`KDOP_DIRECTIONS`]. Only `N ∈ {16, 18, 24}` is accepted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KDop<const N: usize> {
    pub dist: [f64; N],
}

pub type Kdop16 = KDop<16>;
pub type Kdop18 = KDop<18>;
pub type Kdop24 = KDop<24>;

impl<const N: usize> KDop<N> {
    const SIZE_CHECK: () = assert!(N == 16 || N == 18 || N == 24, "k-DOP size must be 16, 18 or 24");

    /// Number of direction pairs.
    pub const D: usize = N / 2;

    /// Every lower support at `-f64::MAX`, every upper support at `f64::MAX`.
    pub fn maximal() -> Self {
        let () = Self::SIZE_CHECK;
        let mut dist = [f64::MAX; N];
        for lower in dist.iter_mut().take(Self::D) {
            *lower = -f64::MAX;
        }
        Self { dist }
    }

    pub fn from_point(p: &Vec3) -> Self {
        let () = Self::SIZE_CHECK;
        let mut dist = [0.0; N];
        for i in 0..Self::D {
            let s = Self::direction(i).dot(p);
            dist[i] = s;
            dist[i + Self::D] = s;
        }
        Self { dist }
    }

    /// Unnormalized direction of slot `i` (`i < N / 2`).
    pub fn direction(i: usize) -> Vec3 {
        let [x, y, z] = KDOP_DIRECTIONS[i];
        Vec3::new(f64::from(x), f64::from(y), f64::from(z))
    }

    pub fn lower(&self, i: usize) -> f64 {
        self.dist[i]
    }

    pub fn upper(&self, i: usize) -> f64 {
        self.dist[i + Self::D]
    }

    pub fn expand_to_include(&mut self, p: &Vec3) {
        for i in 0..Self::D {
            let s = Self::direction(i).dot(p);
            self.dist[i] = self.dist[i].min(s);
            self.dist[i + Self::D] = self.dist[i + Self::D].max(s);
        }
    }

    pub fn contains_point(&self, p: &Vec3) -> bool {
        (0..Self::D).all(|i| {
            let s = Self::direction(i).dot(p);
            s >= self.lower(i) && s <= self.upper(i)
        })
    }

    pub fn overlaps(&self, other: &Self) -> bool {
        (0..Self::D).all(|i| self.lower(i) <= other.upper(i) && other.lower(i) <= self.upper(i))
    }

    /// Number of supports that are tighter than the maximal sentinel.
    pub fn bounded_supports(&self) -> usize {
        self.dist.iter().filter(|d| d.abs() != f64::MAX).count()
    }
}

impl<const N: usize> Default for KDop<N> {
    fn default() -> Self {
        Self::maximal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maximal_layout() {
        let kdop = Kdop18::maximal();
        assert_eq!(Kdop18::D, 9);
        assert!((0..9).all(|i| kdop.lower(i) == -f64::MAX && kdop.upper(i) == f64::MAX));
        assert_eq!(kdop.bounded_supports(), 0);
    }

    #[test]
    fn test_expand_and_contains() {
        let mut kdop = Kdop24::from_point(&Vec3::zeros());
        kdop.expand_to_include(&Vec3::new(1.0, 1.0, 1.0));
        assert!(kdop.contains_point(&Vec3::new(0.5, 0.5, 0.5)));
        // Inside the AABB of the two points but outside the (1,-1,0) slab.
        assert!(!kdop.contains_point(&Vec3::new(1.0, 0.0, 0.0)));
        assert_eq!(kdop.upper(9), 1.0);
    }

    #[test]
    fn test_overlaps() {
        let a = Kdop16::from_point(&Vec3::zeros());
        let mut b = Kdop16::from_point(&Vec3::new(2.0, 0.0, 0.0));
        assert!(!a.overlaps(&b));
        b.expand_to_include(&Vec3::new(-1.0, 0.0, 0.0));
        assert!(a.overlaps(&b));
    }
}
