//! Axis-aligned volume math for claims
//!
//! All coordinates are integer block positions and every interval is closed:
//! a cuboid from x=0 to x=10 covers eleven blocks, and two cuboids that share
//! a boundary block intersect.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// An integer block position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BlockVector {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockVector {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    fn component_min(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y), self.z.min(other.z))
    }

    fn component_max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y), self.z.max(other.z))
    }
}

impl fmt::Display for BlockVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.x, self.y, self.z)
    }
}

impl std::str::FromStr for BlockVector {
    type Err = DomainError;

    /// Parses `x,y,z` with optional whitespace around each component.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(DomainError::parse(format!(
                "Expected x,y,z but got '{}'",
                s
            )));
        }
        let mut coords = [0i32; 3];
        for (slot, part) in coords.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| DomainError::parse(format!("Not a block coordinate: '{}'", part)))?;
        }
        Ok(Self::new(coords[0], coords[1], coords[2]))
    }
}

/// A normalized axis-aligned box. `min <= max` on every axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "CuboidParts", into = "CuboidParts")]
pub struct Cuboid {
    min: BlockVector,
    max: BlockVector,
}

#[derive(Serialize, Deserialize)]
struct CuboidParts {
    min: BlockVector,
    max: BlockVector,
}

impl From<CuboidParts> for Cuboid {
    fn from(parts: CuboidParts) -> Self {
        Cuboid::normalize(parts.min, parts.max)
    }
}

impl From<Cuboid> for CuboidParts {
    fn from(c: Cuboid) -> Self {
        CuboidParts {
            min: c.min,
            max: c.max,
        }
    }
}

impl Cuboid {
    /// Build a cuboid from any two opposite corners.
    pub fn normalize(a: BlockVector, b: BlockVector) -> Self {
        Self {
            min: a.component_min(b),
            max: a.component_max(b),
        }
    }

    #[inline]
    pub fn min(&self) -> BlockVector {
        self.min
    }

    #[inline]
    pub fn max(&self) -> BlockVector {
        self.max
    }

    /// Replace the vertical extent with `[floor, ceiling]`, leaving X and Z untouched.
    pub fn expand_vertical(&self, floor: i32, ceiling: i32) -> Self {
        let (low, high) = if floor <= ceiling {
            (floor, ceiling)
        } else {
            (ceiling, floor)
        };
        Self {
            min: BlockVector::new(self.min.x, low, self.min.z),
            max: BlockVector::new(self.max.x, high, self.max.z),
        }
    }

    /// Grow every bound outward by `distance`. Proximity checks only; never persisted.
    pub fn expand_border(&self, distance: i32) -> Self {
        let d = distance.max(0);
        Self {
            min: BlockVector::new(
                self.min.x.saturating_sub(d),
                self.min.y.saturating_sub(d),
                self.min.z.saturating_sub(d),
            ),
            max: BlockVector::new(
                self.max.x.saturating_add(d),
                self.max.y.saturating_add(d),
                self.max.z.saturating_add(d),
            ),
        }
    }

    /// Horizontal footprint in blocks (X extent times Z extent). Height is ignored.
    pub fn area(&self) -> i64 {
        let width = i64::from(self.max.x) - i64::from(self.min.x) + 1;
        let depth = i64::from(self.max.z) - i64::from(self.min.z) + 1;
        width * depth
    }

    /// Closed-interval overlap on all three axes.
    pub fn intersects(&self, other: &Cuboid) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
            && self.min.z <= other.max.z
            && other.min.z <= self.max.z
    }

    pub fn contains(&self, point: BlockVector) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }
}

impl fmt::Display for Cuboid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) ({})", self.min, self.max)
    }
}

/// Shape of a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RegionShape {
    Cuboid { bounds: Cuboid },
    /// Covers the whole world; never spatially indexed.
    Global,
}

impl RegionShape {
    pub fn cuboid(bounds: Cuboid) -> Self {
        RegionShape::Cuboid { bounds }
    }

    pub fn bounds(&self) -> Option<&Cuboid> {
        match self {
            RegionShape::Cuboid { bounds } => Some(bounds),
            RegionShape::Global => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            RegionShape::Cuboid { .. } => "cuboid",
            RegionShape::Global => "global",
        }
    }

    pub fn contains(&self, point: BlockVector) -> bool {
        match self {
            RegionShape::Cuboid { bounds } => bounds.contains(point),
            RegionShape::Global => true,
        }
    }
}
