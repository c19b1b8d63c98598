//! The 18 quarter turns of the cube.
//!
//! Every move is a right-handed rotation of `direction * 90°` about the
//! positive `axis`, applied to the layer at lattice coordinate `slice`. The
//! stored facelet permutations are what you get by carrying out that rotation
//! on every sticker of the layer; [`derive_facelet_permutation`] recomputes
//! them from the face layout.

use std::{fmt::Display, str::FromStr};

use glam::{IVec3, Vec3};
use thiserror::Error;

use crate::{
    facelets::{FACELET_COUNT, facelet_at, facelet_spot},
    geometry::STEP,
    permutation::Permutation,
};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseMoveError {
    #[error("Unknown move `{0}`, expected one of R± L± M± U± D± E± F± B± S±")]
    UnknownMove(String),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Self; 3] = [Axis::X, Axis::Y, Axis::Z];

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }

    /// The component of `v` along this axis.
    #[must_use]
    pub fn component(self, v: Vec3) -> f32 {
        v[self.index()]
    }

    #[must_use]
    pub fn lattice_component(self, v: IVec3) -> i32 {
        v[self.index()]
    }

    #[must_use]
    pub fn name(self) -> char {
        match self {
            Axis::X => 'x',
            Axis::Y => 'y',
            Axis::Z => 'z',
        }
    }
}

impl Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Rotate a lattice vector by `direction` quarter turns about `axis`.
#[must_use]
pub fn quarter_turn(v: IVec3, axis: Axis, direction: i8) -> IVec3 {
    let IVec3 { x, y, z } = v;
    match (axis, direction.signum()) {
        (_, 0) => v,
        (Axis::X, 1) => IVec3::new(x, -z, y),
        (Axis::X, _) => IVec3::new(x, z, -y),
        (Axis::Y, 1) => IVec3::new(z, y, -x),
        (Axis::Y, _) => IVec3::new(-z, y, x),
        (Axis::Z, 1) => IVec3::new(-y, x, z),
        (Axis::Z, _) => IVec3::new(y, -x, z),
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Move {
    RPlus,
    RMinus,
    LPlus,
    LMinus,
    MPlus,
    MMinus,
    UPlus,
    UMinus,
    DPlus,
    DMinus,
    EPlus,
    EMinus,
    FPlus,
    FMinus,
    BPlus,
    BMinus,
    SPlus,
    SMinus,
}

/// The static definition of a move.
#[derive(Debug)]
pub struct MoveDef {
    pub name: &'static str,
    pub axis: Axis,
    /// Lattice coordinate of the turning layer along `axis`.
    pub slice: i8,
    pub direction: i8,
    pub transformation: &'static str,
    pub facelet_permutation: Permutation<FACELET_COUNT>,
}

impl Move {
    pub const ALL: [Self; 18] = {
        use Move::*;
        let v = [
            RPlus, RMinus, LPlus, LMinus, MPlus, MMinus, UPlus, UMinus, DPlus, DMinus, EPlus,
            EMinus, FPlus, FMinus, BPlus, BMinus, SPlus, SMinus,
        ];

        let mut i = 0;
        while i < v.len() {
            assert!(i == v[i] as usize);
            i += 1;
        }

        v
    };

    #[must_use]
    pub fn def(self) -> &'static MoveDef {
        &CATALOG[self as usize]
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        self.def().name
    }

    #[must_use]
    pub fn axis(self) -> Axis {
        self.def().axis
    }

    #[must_use]
    pub fn direction(self) -> i8 {
        self.def().direction
    }

    /// World coordinate of the turning layer along the move's axis.
    #[must_use]
    pub fn slice_coordinate(self) -> f32 {
        f32::from(self.def().slice) * STEP
    }

    #[must_use]
    pub fn facelet_permutation(self) -> &'static Permutation<FACELET_COUNT> {
        &self.def().facelet_permutation
    }

    /// The move turning the same layer the other way.
    #[must_use]
    pub fn inverse(self) -> Move {
        // Moves are laid out in (+, -) pairs
        Move::ALL[self as usize ^ 1]
    }

    /// `CW` or `CCW`, as labelled in the HUD.
    #[must_use]
    pub fn direction_label(self) -> &'static str {
        if self.direction() < 0 { "CW" } else { "CCW" }
    }

    pub fn moves_on_axis(axis: Axis) -> impl Iterator<Item = Move> {
        Move::ALL.into_iter().filter(move |mv| mv.axis() == axis)
    }

    /// Parse a whitespace separated sequence of move codes.
    ///
    /// # Errors
    ///
    /// On the first code that is not one of the 18 moves.
    pub fn parse_sequence(sequence: &str) -> Result<Vec<Move>, ParseMoveError> {
        sequence.split_whitespace().map(str::parse).collect()
    }
}

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Move::ALL
            .into_iter()
            .find(|mv| mv.name() == s)
            .ok_or_else(|| ParseMoveError::UnknownMove(s.to_owned()))
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Compute the facelet permutation of a quarter turn from the face layout.
///
/// Returns `None` if some sticker of the layer does not land on a facelet
/// slot, which only happens for a `slice` outside `-1..=1`.
#[must_use]
pub fn derive_facelet_permutation(
    axis: Axis,
    slice: i8,
    direction: i8,
) -> Option<Permutation<FACELET_COUNT>> {
    let mut mapping = [0; FACELET_COUNT];

    for (facelet, source) in mapping.iter_mut().enumerate() {
        let spot = facelet_spot(facelet);

        if axis.lattice_component(spot.lattice) != i32::from(slice) {
            *source = facelet;
            continue;
        }

        // The new occupant comes from wherever the inverse turn sends us
        *source = facelet_at(
            quarter_turn(spot.lattice, axis, -direction),
            quarter_turn(spot.normal, axis, -direction),
        )?;
    }

    Permutation::from_mapping(mapping).ok()
}

#[rustfmt::skip]
static CATALOG: [MoveDef; 18] = [
    MoveDef {
        name: "R+",
        axis: Axis::X,
        slice: 1,
        direction: 1,
        transformation: "(x, y, z) → (x, -z, y)",
        facelet_permutation: Permutation::from_table([
            2, 5, 8, 1, 4, 7, 0, 3, 6, //
            9, 10, 11, 12, 13, 14, 15, 16, 17, //
            18, 19, 51, 21, 22, 48, 24, 25, 45, //
            27, 28, 38, 30, 31, 41, 33, 34, 44, //
            36, 37, 20, 39, 40, 23, 42, 43, 26, //
            35, 46, 47, 32, 49, 50, 29, 52, 53, //
        ]),
    },
    MoveDef {
        name: "R-",
        axis: Axis::X,
        slice: 1,
        direction: -1,
        transformation: "(x, y, z) → (x, z, -y)",
        facelet_permutation: Permutation::from_table([
            6, 3, 0, 7, 4, 1, 8, 5, 2, //
            9, 10, 11, 12, 13, 14, 15, 16, 17, //
            18, 19, 38, 21, 22, 41, 24, 25, 44, //
            27, 28, 51, 30, 31, 48, 33, 34, 45, //
            36, 37, 29, 39, 40, 32, 42, 43, 35, //
            26, 46, 47, 23, 49, 50, 20, 52, 53, //
        ]),
    },
    MoveDef {
        name: "L+",
        axis: Axis::X,
        slice: -1,
        direction: 1,
        transformation: "(x, y, z) → (x, -z, y)",
        facelet_permutation: Permutation::from_table([
            0, 1, 2, 3, 4, 5, 6, 7, 8, //
            15, 12, 9, 16, 13, 10, 17, 14, 11, //
            53, 19, 20, 50, 22, 23, 47, 25, 26, //
            36, 28, 29, 39, 31, 32, 42, 34, 35, //
            18, 37, 38, 21, 40, 41, 24, 43, 44, //
            45, 46, 33, 48, 49, 30, 51, 52, 27, //
        ]),
    },
    MoveDef {
        name: "L-",
        axis: Axis::X,
        slice: -1,
        direction: -1,
        transformation: "(x, y, z) → (x, z, -y)",
        facelet_permutation: Permutation::from_table([
            0, 1, 2, 3, 4, 5, 6, 7, 8, //
            11, 14, 17, 10, 13, 16, 9, 12, 15, //
            36, 19, 20, 39, 22, 23, 42, 25, 26, //
            53, 28, 29, 50, 31, 32, 47, 34, 35, //
            27, 37, 38, 30, 40, 41, 33, 43, 44, //
            45, 46, 24, 48, 49, 21, 51, 52, 18, //
        ]),
    },
    MoveDef {
        name: "M+",
        axis: Axis::X,
        slice: 0,
        direction: 1,
        transformation: "(x, y, z) → (x, -z, y)",
        facelet_permutation: Permutation::from_table([
            0, 1, 2, 3, 4, 5, 6, 7, 8, //
            9, 10, 11, 12, 13, 14, 15, 16, 17, //
            18, 52, 20, 21, 49, 23, 24, 46, 26, //
            27, 37, 29, 30, 40, 32, 33, 43, 35, //
            36, 19, 38, 39, 22, 41, 42, 25, 44, //
            45, 34, 47, 48, 31, 50, 51, 28, 53, //
        ]),
    },
    MoveDef {
        name: "M-",
        axis: Axis::X,
        slice: 0,
        direction: -1,
        transformation: "(x, y, z) → (x, z, -y)",
        facelet_permutation: Permutation::from_table([
            0, 1, 2, 3, 4, 5, 6, 7, 8, //
            9, 10, 11, 12, 13, 14, 15, 16, 17, //
            18, 37, 20, 21, 40, 23, 24, 43, 26, //
            27, 52, 29, 30, 49, 32, 33, 46, 35, //
            36, 28, 38, 39, 31, 41, 42, 34, 44, //
            45, 25, 47, 48, 22, 50, 51, 19, 53, //
        ]),
    },
    MoveDef {
        name: "U+",
        axis: Axis::Y,
        slice: 1,
        direction: -1,
        transformation: "(x, y, z) → (-z, y, x)",
        facelet_permutation: Permutation::from_table([
            45, 46, 47, 3, 4, 5, 6, 7, 8, //
            36, 37, 38, 12, 13, 14, 15, 16, 17, //
            24, 21, 18, 25, 22, 19, 26, 23, 20, //
            27, 28, 29, 30, 31, 32, 33, 34, 35, //
            0, 1, 2, 39, 40, 41, 42, 43, 44, //
            9, 10, 11, 48, 49, 50, 51, 52, 53, //
        ]),
    },
    MoveDef {
        name: "U-",
        axis: Axis::Y,
        slice: 1,
        direction: 1,
        transformation: "(x, y, z) → (z, y, -x)",
        facelet_permutation: Permutation::from_table([
            36, 37, 38, 3, 4, 5, 6, 7, 8, //
            45, 46, 47, 12, 13, 14, 15, 16, 17, //
            20, 23, 26, 19, 22, 25, 18, 21, 24, //
            27, 28, 29, 30, 31, 32, 33, 34, 35, //
            9, 10, 11, 39, 40, 41, 42, 43, 44, //
            0, 1, 2, 48, 49, 50, 51, 52, 53, //
        ]),
    },
    MoveDef {
        name: "D+",
        axis: Axis::Y,
        slice: -1,
        direction: -1,
        transformation: "(x, y, z) → (-z, y, x)",
        facelet_permutation: Permutation::from_table([
            0, 1, 2, 3, 4, 5, 51, 52, 53, //
            9, 10, 11, 12, 13, 14, 42, 43, 44, //
            18, 19, 20, 21, 22, 23, 24, 25, 26, //
            29, 32, 35, 28, 31, 34, 27, 30, 33, //
            36, 37, 38, 39, 40, 41, 6, 7, 8, //
            45, 46, 47, 48, 49, 50, 15, 16, 17, //
        ]),
    },
    MoveDef {
        name: "D-",
        axis: Axis::Y,
        slice: -1,
        direction: 1,
        transformation: "(x, y, z) → (z, y, -x)",
        facelet_permutation: Permutation::from_table([
            0, 1, 2, 3, 4, 5, 42, 43, 44, //
            9, 10, 11, 12, 13, 14, 51, 52, 53, //
            18, 19, 20, 21, 22, 23, 24, 25, 26, //
            33, 30, 27, 34, 31, 28, 35, 32, 29, //
            36, 37, 38, 39, 40, 41, 15, 16, 17, //
            45, 46, 47, 48, 49, 50, 6, 7, 8, //
        ]),
    },
    MoveDef {
        name: "E+",
        axis: Axis::Y,
        slice: 0,
        direction: -1,
        transformation: "(x, y, z) → (-z, y, x)",
        facelet_permutation: Permutation::from_table([
            0, 1, 2, 48, 49, 50, 6, 7, 8, //
            9, 10, 11, 39, 40, 41, 15, 16, 17, //
            18, 19, 20, 21, 22, 23, 24, 25, 26, //
            27, 28, 29, 30, 31, 32, 33, 34, 35, //
            36, 37, 38, 3, 4, 5, 42, 43, 44, //
            45, 46, 47, 12, 13, 14, 51, 52, 53, //
        ]),
    },
    MoveDef {
        name: "E-",
        axis: Axis::Y,
        slice: 0,
        direction: 1,
        transformation: "(x, y, z) → (z, y, -x)",
        facelet_permutation: Permutation::from_table([
            0, 1, 2, 39, 40, 41, 6, 7, 8, //
            9, 10, 11, 48, 49, 50, 15, 16, 17, //
            18, 19, 20, 21, 22, 23, 24, 25, 26, //
            27, 28, 29, 30, 31, 32, 33, 34, 35, //
            36, 37, 38, 12, 13, 14, 42, 43, 44, //
            45, 46, 47, 3, 4, 5, 51, 52, 53, //
        ]),
    },
    MoveDef {
        name: "F+",
        axis: Axis::Z,
        slice: 1,
        direction: -1,
        transformation: "(x, y, z) → (y, -x, z)",
        facelet_permutation: Permutation::from_table([
            24, 1, 2, 25, 4, 5, 26, 7, 8, //
            9, 10, 27, 12, 13, 28, 15, 16, 29, //
            18, 19, 20, 21, 22, 23, 17, 14, 11, //
            6, 3, 0, 30, 31, 32, 33, 34, 35, //
            42, 39, 36, 43, 40, 37, 44, 41, 38, //
            45, 46, 47, 48, 49, 50, 51, 52, 53, //
        ]),
    },
    MoveDef {
        name: "F-",
        axis: Axis::Z,
        slice: 1,
        direction: 1,
        transformation: "(x, y, z) → (-y, x, z)",
        facelet_permutation: Permutation::from_table([
            29, 1, 2, 28, 4, 5, 27, 7, 8, //
            9, 10, 26, 12, 13, 25, 15, 16, 24, //
            18, 19, 20, 21, 22, 23, 0, 3, 6, //
            11, 14, 17, 30, 31, 32, 33, 34, 35, //
            38, 41, 44, 37, 40, 43, 36, 39, 42, //
            45, 46, 47, 48, 49, 50, 51, 52, 53, //
        ]),
    },
    MoveDef {
        name: "B+",
        axis: Axis::Z,
        slice: -1,
        direction: -1,
        transformation: "(x, y, z) → (y, -x, z)",
        facelet_permutation: Permutation::from_table([
            0, 1, 18, 3, 4, 19, 6, 7, 20, //
            33, 10, 11, 34, 13, 14, 35, 16, 17, //
            15, 12, 9, 21, 22, 23, 24, 25, 26, //
            27, 28, 29, 30, 31, 32, 8, 5, 2, //
            36, 37, 38, 39, 40, 41, 42, 43, 44, //
            47, 50, 53, 46, 49, 52, 45, 48, 51, //
        ]),
    },
    MoveDef {
        name: "B-",
        axis: Axis::Z,
        slice: -1,
        direction: 1,
        transformation: "(x, y, z) → (-y, x, z)",
        facelet_permutation: Permutation::from_table([
            0, 1, 35, 3, 4, 34, 6, 7, 33, //
            20, 10, 11, 19, 13, 14, 18, 16, 17, //
            2, 5, 8, 21, 22, 23, 24, 25, 26, //
            27, 28, 29, 30, 31, 32, 9, 12, 15, //
            36, 37, 38, 39, 40, 41, 42, 43, 44, //
            51, 48, 45, 52, 49, 46, 53, 50, 47, //
        ]),
    },
    MoveDef {
        name: "S+",
        axis: Axis::Z,
        slice: 0,
        direction: -1,
        transformation: "(x, y, z) → (y, -x, z)",
        facelet_permutation: Permutation::from_table([
            0, 21, 2, 3, 22, 5, 6, 23, 8, //
            9, 30, 11, 12, 31, 14, 15, 32, 17, //
            18, 19, 20, 16, 13, 10, 24, 25, 26, //
            27, 28, 29, 7, 4, 1, 33, 34, 35, //
            36, 37, 38, 39, 40, 41, 42, 43, 44, //
            45, 46, 47, 48, 49, 50, 51, 52, 53, //
        ]),
    },
    MoveDef {
        name: "S-",
        axis: Axis::Z,
        slice: 0,
        direction: 1,
        transformation: "(x, y, z) → (-y, x, z)",
        facelet_permutation: Permutation::from_table([
            0, 32, 2, 3, 31, 5, 6, 30, 8, //
            9, 23, 11, 12, 22, 14, 15, 21, 17, //
            18, 19, 20, 1, 4, 7, 24, 25, 26, //
            27, 28, 29, 10, 13, 16, 33, 34, 35, //
            36, 37, 38, 39, 40, 41, 42, 43, 44, //
            45, 46, 47, 48, 49, 50, 51, 52, 53, //
        ]),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_match_geometry() {
        for mv in Move::ALL {
            let def = mv.def();
            let derived = derive_facelet_permutation(def.axis, def.slice, def.direction).unwrap();
            assert_eq!(&derived, mv.facelet_permutation(), "{mv}");
        }
    }

    #[test]
    fn tables_are_bijections() {
        for mv in Move::ALL {
            assert!(
                Permutation::from_mapping(*mv.facelet_permutation().mapping()).is_ok(),
                "{mv}"
            );
        }
    }

    #[test]
    fn quarter_turn_order_four() {
        for mv in Move::ALL {
            let perm = mv.facelet_permutation();
            assert_eq!(perm.order(), 4, "{mv}");

            let mut state = Permutation::identity();
            for _ in 0..4 {
                state.compose_into(perm);
            }
            assert!(state.is_identity(), "{mv}");
        }
    }

    #[test]
    fn inverses_pair_up() {
        for mv in Move::ALL {
            assert_ne!(mv.inverse(), mv);
            assert_eq!(mv.inverse().inverse(), mv);
            assert_eq!(mv.inverse().axis(), mv.axis());
            assert_eq!(mv.inverse().def().slice, mv.def().slice);
            assert_eq!(mv.inverse().direction(), -mv.direction());

            let state = Permutation::identity()
                .composed(mv.facelet_permutation())
                .composed(mv.inverse().facelet_permutation());
            assert!(state.is_identity(), "{mv}");
            assert_eq!(
                &mv.facelet_permutation().inverse(),
                mv.inverse().facelet_permutation()
            );
        }
    }

    #[test]
    fn moved_sticker_counts() {
        for mv in Move::ALL {
            let moved = mv.facelet_permutation().cycles().iter().flatten().count();
            // Face turns move 20 stickers, slice turns move 12
            let expected = if mv.def().slice == 0 { 12 } else { 20 };
            assert_eq!(moved, expected, "{mv}");
        }
    }

    #[test]
    fn parse_round_trip() {
        for mv in Move::ALL {
            assert_eq!(mv.name().parse::<Move>(), Ok(mv));
            assert_eq!(mv.to_string(), mv.name());
        }
        assert_eq!(
            "R2".parse::<Move>(),
            Err(ParseMoveError::UnknownMove("R2".to_owned()))
        );
        assert!("r+".parse::<Move>().is_err());
        assert!("".parse::<Move>().is_err());
    }

    #[test]
    fn parse_sequences() {
        assert_eq!(
            Move::parse_sequence("R+  U-\nS+"),
            Ok(vec![Move::RPlus, Move::UMinus, Move::SPlus])
        );
        assert_eq!(
            Move::parse_sequence("R+ X+ U-"),
            Err(ParseMoveError::UnknownMove("X+".to_owned()))
        );
    }

    #[test]
    fn six_moves_per_axis() {
        for axis in Axis::ALL {
            assert_eq!(Move::moves_on_axis(axis).count(), 6);
        }
    }

    #[test]
    fn transformation_strings_agree_with_quarter_turn() {
        for mv in Move::ALL {
            let image = quarter_turn(IVec3::new(1, 2, 3), mv.axis(), mv.direction());
            let expected = image
                .to_array()
                .map(|v| match v {
                    1 => "x",
                    -1 => "-x",
                    2 => "y",
                    -2 => "-y",
                    3 => "z",
                    _ => "-z",
                })
                .join(", ");
            assert_eq!(
                mv.def().transformation,
                format!("(x, y, z) → ({expected})"),
                "{mv}"
            );
        }
    }

    #[test]
    fn r_plus_turns_the_right_face() {
        let perm = Move::RPlus.facelet_permutation();
        assert_eq!(&perm.mapping()[0..9], &[2, 5, 8, 1, 4, 7, 0, 3, 6]);
        // The left face is untouched
        assert!((9..18).all(|i| perm.mapping()[i] == i));
    }
}
