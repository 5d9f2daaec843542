use serde::*;

/// Compact board coordinate, packed into a u16 for cheap hashing and
/// serialization.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Location {
    packed: u16,
}

impl Location {
    pub fn from_xy(x: u8, y: u8) -> Self {
        Location {
            packed: ((x as u16) << 8) | y as u16,
        }
    }

    #[inline]
    pub fn x(self) -> u8 {
        ((self.packed >> 8) & 0xFF) as u8
    }

    #[inline]
    pub fn y(self) -> u8 {
        (self.packed & 0xFF) as u8
    }

    #[inline]
    pub fn packed_repr(self) -> u16 {
        self.packed
    }

    #[inline]
    pub fn from_packed(packed: u16) -> Self {
        Location { packed }
    }

    /// Offset by a signed delta, returning `None` when the result leaves
    /// the board square. Arena-diamond membership is a separate check.
    pub fn offset(self, dx: i8, dy: i8) -> Option<Location> {
        let nx = self.x() as i16 + dx as i16;
        let ny = self.y() as i16 + dy as i16;
        if (0..crate::constants::BOARD_SIZE as i16).contains(&nx)
            && (0..crate::constants::BOARD_SIZE as i16).contains(&ny)
        {
            Some(Location::from_xy(nx as u8, ny as u8))
        } else {
            None
        }
    }

    /// Chebyshev distance.
    pub fn distance_to(self, other: Self) -> u8 {
        let dx = (self.x() as i16 - other.x() as i16).abs();
        let dy = (self.y() as i16 - other.y() as i16).abs();
        dx.max(dy) as u8
    }

    /// Euclidean distance, used for turret range and spread heuristics.
    pub fn euclidean_distance(self, other: Self) -> f32 {
        let dx = self.x() as f32 - other.x() as f32;
        let dy = self.y() as f32 - other.y() as f32;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Serialize for Location {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.packed_repr().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Location {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        u16::deserialize(deserializer).map(Location::from_packed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_roundtrip() {
        let loc = Location::from_xy(27, 13);
        assert_eq!(loc.x(), 27);
        assert_eq!(loc.y(), 13);
        assert_eq!(Location::from_packed(loc.packed_repr()), loc);
    }

    #[test]
    fn offset_clamps_to_board() {
        let loc = Location::from_xy(0, 0);
        assert_eq!(loc.offset(-1, 0), None);
        assert_eq!(loc.offset(1, 1), Some(Location::from_xy(1, 1)));
        assert_eq!(Location::from_xy(27, 27).offset(0, 1), None);
    }

    #[test]
    fn distances() {
        let a = Location::from_xy(3, 4);
        let b = Location::from_xy(6, 8);
        assert_eq!(a.distance_to(b), 4);
        assert!((a.euclidean_distance(b) - 5.0).abs() < 1e-6);
    }
}
