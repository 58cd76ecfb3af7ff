//! Axis and tiling direction types.

use serde::{Deserialize, Serialize};

/// The three axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Component index into an `IVec3` / `[T; 3]`.
    pub fn index(&self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Get the unit vector for this axis.
    pub fn unit(&self) -> glam::IVec3 {
        match self {
            Axis::X => glam::IVec3::X,
            Axis::Y => glam::IVec3::Y,
            Axis::Z => glam::IVec3::Z,
        }
    }

    /// Parse from string (case-insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "x" => Some(Axis::X),
            "y" => Some(Axis::Y),
            "z" => Some(Axis::Z),
            _ => None,
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

/// Direction in which successive tiled copies are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GenerateDirection {
    #[serde(rename = "+x")]
    PosX,
    #[serde(rename = "-x")]
    NegX,
    #[serde(rename = "+y")]
    PosY,
    #[serde(rename = "-y")]
    NegY,
    #[serde(rename = "+z")]
    PosZ,
    #[serde(rename = "-z")]
    NegZ,
}

impl GenerateDirection {
    /// All six directions in order.
    pub const ALL: [GenerateDirection; 6] = [
        GenerateDirection::PosX,
        GenerateDirection::NegX,
        GenerateDirection::PosY,
        GenerateDirection::NegY,
        GenerateDirection::PosZ,
        GenerateDirection::NegZ,
    ];

    /// Get the axis this direction is on.
    pub fn axis(&self) -> Axis {
        match self {
            GenerateDirection::PosX | GenerateDirection::NegX => Axis::X,
            GenerateDirection::PosY | GenerateDirection::NegY => Axis::Y,
            GenerateDirection::PosZ | GenerateDirection::NegZ => Axis::Z,
        }
    }

    /// +1 or -1.
    pub fn sign(&self) -> i32 {
        match self {
            GenerateDirection::PosX | GenerateDirection::PosY | GenerateDirection::PosZ => 1,
            GenerateDirection::NegX | GenerateDirection::NegY | GenerateDirection::NegZ => -1,
        }
    }

    /// Axis used for the second dimension of a tile grid.
    /// Horizontal directions pair with the other horizontal axis,
    /// vertical stacking pairs with X.
    pub fn secondary_axis(&self) -> Axis {
        match self.axis() {
            Axis::X => Axis::Z,
            Axis::Y | Axis::Z => Axis::X,
        }
    }

    /// Parse from string, accepting `+x`, `x`, `-x` and so on.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "+x" | "x" => Some(GenerateDirection::PosX),
            "-x" => Some(GenerateDirection::NegX),
            "+y" | "y" => Some(GenerateDirection::PosY),
            "-y" => Some(GenerateDirection::NegY),
            "+z" | "z" => Some(GenerateDirection::PosZ),
            "-z" => Some(GenerateDirection::NegZ),
            _ => None,
        }
    }
}

impl std::fmt::Display for GenerateDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.sign() > 0 { '+' } else { '-' };
        write!(f, "{}{}", sign, self.axis())
    }
}
