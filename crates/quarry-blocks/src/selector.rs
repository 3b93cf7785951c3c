use std::fmt;
use std::str::FromStr;

use crate::error::BlockError;
use crate::face::Face;

/// Which faces of a model a texture assignment applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FaceSelector {
    All,
    /// The four faces that are not top or bottom.
    Sides,
    X,
    Y,
    Z,
    Face(Face),
}

impl FaceSelector {
    /// Face-table indices covered by the selector. Models with fewer faces
    /// skip indices past their end.
    pub fn indices(self) -> &'static [usize] {
        match self {
            FaceSelector::All => &[0, 1, 2, 3, 4, 5],
            FaceSelector::Sides => &[0, 1, 4, 5],
            FaceSelector::X => &[0, 1],
            FaceSelector::Y => &[2, 3],
            FaceSelector::Z => &[4, 5],
            FaceSelector::Face(f) => match f {
                Face::PosX => &[0],
                Face::NegX => &[1],
                Face::PosY => &[2],
                Face::NegY => &[3],
                Face::PosZ => &[4],
                Face::NegZ => &[5],
            },
        }
    }

    /// Broad selectors are applied before narrow ones so that an explicit
    /// face always wins.
    pub fn specificity(self) -> u8 {
        match self {
            FaceSelector::All => 0,
            FaceSelector::Sides => 1,
            FaceSelector::X | FaceSelector::Y | FaceSelector::Z => 2,
            FaceSelector::Face(_) => 3,
        }
    }
}

impl FromStr for FaceSelector {
    type Err = BlockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "all" => FaceSelector::All,
            "sides" => FaceSelector::Sides,
            "x" => FaceSelector::X,
            "y" => FaceSelector::Y,
            "z" => FaceSelector::Z,
            other => FaceSelector::Face(
                Face::from_name(other)
                    .ok_or_else(|| BlockError::UnknownFaceSelector(other.to_string()))?,
            ),
        })
    }
}

impl fmt::Display for FaceSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaceSelector::All => f.write_str("all"),
            FaceSelector::Sides => f.write_str("sides"),
            FaceSelector::X => f.write_str("x"),
            FaceSelector::Y => f.write_str("y"),
            FaceSelector::Z => f.write_str("z"),
            FaceSelector::Face(face) => f.write_str(face.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_tags() {
        assert_eq!("all".parse::<FaceSelector>().unwrap(), FaceSelector::All);
        assert_eq!("sides".parse::<FaceSelector>().unwrap(), FaceSelector::Sides);
        assert_eq!(
            "bottom".parse::<FaceSelector>().unwrap(),
            FaceSelector::Face(Face::NegY)
        );
        assert_eq!(FaceSelector::Sides.indices(), &[0, 1, 4, 5]);
        assert_eq!(FaceSelector::Face(Face::PosZ).indices(), &[4]);
    }

    #[test]
    fn rejects_unknown_tags() {
        let err = "sideways".parse::<FaceSelector>().unwrap_err();
        assert!(matches!(err, BlockError::UnknownFaceSelector(ref s) if s == "sideways"));
    }

    #[test]
    fn display_parses_back() {
        for tag in ["all", "sides", "x", "y", "z", "right", "left", "top", "bottom", "front", "back"] {
            let sel: FaceSelector = tag.parse().unwrap();
            assert_eq!(sel.to_string(), tag);
        }
    }
}
