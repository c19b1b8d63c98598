//! Fixed sticker slots and their place on the cube.
//!
//! Faces come in the order R, L, U, D, F, B and face `f` owns facelet slots
//! `9f..9f + 9`, numbered row major as seen from outside the face.

use std::sync::LazyLock;

use glam::IVec3;

use crate::geometry::slot_of_lattice;

pub const FACELET_COUNT: usize = 54;

/// The cubie slot that carries each facelet slot in the solved cube.
#[rustfmt::skip]
pub const FACELET_CUBIE_SLOT: [usize; FACELET_COUNT] = [
    25, 24, 23, 22, 21, 20, 19, 18, 17, //
    6, 7, 8, 3, 4, 5, 0, 1, 2, //
    6, 14, 23, 7, 15, 24, 8, 16, 25, //
    2, 11, 19, 1, 10, 18, 0, 9, 17, //
    8, 16, 25, 5, 13, 22, 2, 11, 19, //
    23, 14, 6, 20, 12, 3, 17, 9, 0, //
];

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Face {
    R,
    L,
    U,
    D,
    F,
    B,
}

impl Face {
    pub const ALL: [Self; 6] = {
        use Face::*;
        let v = [R, L, U, D, F, B];

        let mut i = 0;
        while i < v.len() {
            assert!(i == v[i] as usize);
            i += 1;
        }

        v
    };

    /// Outward normal.
    #[must_use]
    pub fn normal(self) -> IVec3 {
        match self {
            Face::R => IVec3::X,
            Face::L => IVec3::NEG_X,
            Face::U => IVec3::Y,
            Face::D => IVec3::NEG_Y,
            Face::F => IVec3::Z,
            Face::B => IVec3::NEG_Z,
        }
    }

    /// Column direction when looking at the face from outside.
    #[must_use]
    pub fn right(self) -> IVec3 {
        match self {
            Face::R => IVec3::NEG_Z,
            Face::L => IVec3::Z,
            Face::U | Face::D | Face::F => IVec3::X,
            Face::B => IVec3::NEG_X,
        }
    }

    /// Row direction when looking at the face from outside.
    #[must_use]
    pub fn down(self) -> IVec3 {
        match self {
            Face::U => IVec3::Z,
            Face::D => IVec3::NEG_Z,
            Face::R | Face::L | Face::F | Face::B => IVec3::NEG_Y,
        }
    }

    /// The sticker colour of the face in the solved cube.
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Face::R => "Red",
            Face::L => "Orange",
            Face::U => "White",
            Face::D => "Yellow",
            Face::F => "Blue",
            Face::B => "Green",
        }
    }

    #[must_use]
    pub fn of_facelet(facelet: usize) -> Face {
        Face::ALL[facelet / 9]
    }
}

/// Where a facelet slot sits: the lattice point of the cubie carrying it and
/// the outward normal of the sticker.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct FaceletSpot {
    pub lattice: IVec3,
    pub normal: IVec3,
}

static FACELET_SPOTS: LazyLock<[FaceletSpot; FACELET_COUNT]> = LazyLock::new(|| {
    std::array::from_fn(|facelet| {
        let face = Face::of_facelet(facelet);
        let row = (facelet % 9 / 3) as i32;
        let col = (facelet % 3) as i32;

        FaceletSpot {
            lattice: face.normal() + (col - 1) * face.right() + (row - 1) * face.down(),
            normal: face.normal(),
        }
    })
});

#[must_use]
pub fn facelet_spot(facelet: usize) -> FaceletSpot {
    FACELET_SPOTS[facelet]
}

/// Find the facelet slot at `lattice` facing `normal`, if there is one.
#[must_use]
pub fn facelet_at(lattice: IVec3, normal: IVec3) -> Option<usize> {
    FACELET_SPOTS
        .iter()
        .position(|spot| spot.lattice == lattice && spot.normal == normal)
}

/// Rebuild [`FACELET_CUBIE_SLOT`] from the face layout.
#[must_use]
pub fn derive_facelet_cubie_slots() -> [Option<usize>; FACELET_COUNT] {
    std::array::from_fn(|facelet| slot_of_lattice(facelet_spot(facelet).lattice))
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;
    use crate::geometry::{CUBIE_COUNT, home_lattice};

    #[test]
    fn static_table_matches_layout() {
        let derived = derive_facelet_cubie_slots();
        for facelet in 0..FACELET_COUNT {
            assert_eq!(derived[facelet], Some(FACELET_CUBIE_SLOT[facelet]));
        }
    }

    #[test]
    fn spots_are_unique_and_on_the_surface() {
        let spots = (0..FACELET_COUNT).map(facelet_spot).collect_vec();
        assert!(spots.iter().all_unique());

        for spot in &spots {
            // The sticker faces outward from its cubie
            assert_eq!(spot.lattice.dot(spot.normal), 1);
        }
    }

    #[test]
    fn piece_sticker_counts() {
        let counts = FACELET_CUBIE_SLOT.iter().counts();
        for slot in 0..CUBIE_COUNT {
            let lattice = home_lattice(slot);
            let nonzero = lattice.to_array().iter().filter(|v| **v != 0).count();
            assert_eq!(counts[&slot], nonzero);
        }
    }

    #[test]
    fn face_centres() {
        for face in Face::ALL {
            let centre = face as usize * 9 + 4;
            assert_eq!(facelet_spot(centre).lattice, face.normal());
            assert_eq!(facelet_at(face.normal(), face.normal()), Some(centre));
            assert_eq!(Face::of_facelet(centre), face);
        }
    }

    #[test]
    fn face_frames_are_right_handed_from_outside() {
        // right x down points into the cube when seen from outside
        for face in Face::ALL {
            assert_eq!(face.right().cross(face.down()), -face.normal());
        }
    }
}
