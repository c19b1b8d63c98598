//! Rebuild the sticker layout from cubie geometry alone and compare it with the
//! facelet permutation.

use glam::{IVec3, Vec3};
use thiserror::Error;

use crate::{
    facelets::{FACELET_COUNT, FACELET_CUBIE_SLOT, facelet_spot},
    geometry::{CUBIE_COUNT, Cubie, STEP, slot_of_lattice},
    permutation::Permutation,
};

/// Positions further than this from a lattice point are not considered settled.
const LATTICE_TOLERANCE: f32 = 1e-3;

#[derive(Error, Debug, PartialEq)]
pub enum ReconcileError {
    #[error("Cubie {cubie} at {position} is not on a lattice slot")]
    OffLattice { cubie: usize, position: Vec3 },
    #[error("Cubies {first} and {second} both occupy slot {slot}")]
    DuplicateSlot {
        slot: usize,
        first: usize,
        second: usize,
    },
    #[error(
        "Facelet slot {facelet} holds sticker {sticker} of cubie {expected}, but cubie {found} is there"
    )]
    SlotMismatch {
        facelet: usize,
        sticker: usize,
        expected: usize,
        found: usize,
    },
    #[error("Sticker {sticker} in facelet slot {facelet} points the wrong way, {normal} instead of {expected}")]
    OrientationMismatch {
        facelet: usize,
        sticker: usize,
        normal: IVec3,
        expected: IVec3,
    },
}

/// Where every cubie is, derived from positions only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// For each cubie, the slot it currently occupies.
    pub cubie_slots: [usize; CUBIE_COUNT],
    /// For each slot, the cubie occupying it.
    pub slot_cubies: [usize; CUBIE_COUNT],
    /// For each facelet slot, the cubie carrying the sticker shown there.
    pub facelet_cubies: [usize; FACELET_COUNT],
}

/// Snap every cubie to its lattice slot and derive the slot and facelet views.
///
/// # Errors
///
/// If a cubie is off the lattice or two cubies share a slot.
pub fn reconcile(cubies: &[Cubie; CUBIE_COUNT]) -> Result<Reconciliation, ReconcileError> {
    let mut cubie_slots = [0; CUBIE_COUNT];
    let mut slot_cubies = [None; CUBIE_COUNT];

    for (cubie, slot_out) in cubies.iter().zip(cubie_slots.iter_mut()) {
        let off_lattice = || ReconcileError::OffLattice {
            cubie: cubie.slot_id(),
            position: cubie.position(),
        };

        let lattice = cubie.lattice();
        if !cubie
            .position()
            .abs_diff_eq(lattice.as_vec3() * STEP, LATTICE_TOLERANCE)
        {
            return Err(off_lattice());
        }

        let slot = slot_of_lattice(lattice).ok_or_else(off_lattice)?;

        if let Some(first) = slot_cubies[slot] {
            return Err(ReconcileError::DuplicateSlot {
                slot,
                first,
                second: cubie.slot_id(),
            });
        }

        slot_cubies[slot] = Some(cubie.slot_id());
        *slot_out = slot;
    }

    // 26 cubies in 26 distinct slots fill every slot
    let slot_cubies = slot_cubies.map(|cubie| cubie.unwrap_or_default());
    let facelet_cubies = FACELET_CUBIE_SLOT.map(|slot| slot_cubies[slot]);

    Ok(Reconciliation {
        cubie_slots,
        slot_cubies,
        facelet_cubies,
    })
}

impl Reconciliation {
    /// Check that every sticker is shown on the cubie it was printed on.
    ///
    /// # Errors
    ///
    /// On the first facelet slot where the two views disagree.
    pub fn check_facelets(
        &self,
        facelets: &Permutation<FACELET_COUNT>,
    ) -> Result<(), ReconcileError> {
        for (facelet, (&sticker, &found)) in facelets
            .mapping()
            .iter()
            .zip(&self.facelet_cubies)
            .enumerate()
        {
            let expected = FACELET_CUBIE_SLOT[sticker];
            if expected != found {
                return Err(ReconcileError::SlotMismatch {
                    facelet,
                    sticker,
                    expected,
                    found,
                });
            }
        }

        Ok(())
    }
}

/// Check that every cubie's orientation turns each of its stickers to face the
/// way its facelet slot faces.
///
/// # Errors
///
/// On the first sticker that points the wrong way.
pub fn check_orientations(
    cubies: &[Cubie; CUBIE_COUNT],
    facelets: &Permutation<FACELET_COUNT>,
) -> Result<(), ReconcileError> {
    for (facelet, &sticker) in facelets.mapping().iter().enumerate() {
        let cubie = &cubies[FACELET_CUBIE_SLOT[sticker]];
        let normal = (cubie.orientation() * facelet_spot(sticker).normal.as_vec3())
            .round()
            .as_ivec3();
        let expected = facelet_spot(facelet).normal;

        if normal != expected {
            return Err(ReconcileError::OrientationMismatch {
                facelet,
                sticker,
                normal,
                expected,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use glam::Quat;

    use super::*;
    use crate::geometry::home_cubies;

    #[test]
    fn solved_cube_reconciles() {
        let cubies = home_cubies();
        let rec = reconcile(&cubies).unwrap();
        let identity: [usize; CUBIE_COUNT] = std::array::from_fn(|i| i);
        assert_eq!(rec.cubie_slots, identity);
        assert_eq!(rec.slot_cubies, identity);
        assert_eq!(rec.facelet_cubies, FACELET_CUBIE_SLOT);

        let facelets = Permutation::identity();
        assert_eq!(rec.check_facelets(&facelets), Ok(()));
        assert_eq!(check_orientations(&cubies, &facelets), Ok(()));
    }

    #[test]
    fn swapped_stickers_are_caught() {
        let rec = reconcile(&home_cubies()).unwrap();
        let mut mapping: [usize; FACELET_COUNT] = std::array::from_fn(|i| i);
        // Slots 0 and 9 sit on different corners
        mapping.swap(0, 9);
        let facelets = Permutation::from_mapping(mapping).unwrap();

        assert_eq!(
            rec.check_facelets(&facelets),
            Err(ReconcileError::SlotMismatch {
                facelet: 0,
                sticker: 9,
                expected: FACELET_CUBIE_SLOT[9],
                found: FACELET_CUBIE_SLOT[0],
            })
        );
    }

    #[test]
    fn twisted_cubie_is_caught() {
        let mut cubies = home_cubies();
        let corner = FACELET_CUBIE_SLOT[0];
        cubies[corner] = twisted(cubies[corner]);

        // Positions are untouched, so the slot views still agree
        let rec = reconcile(&cubies).unwrap();
        assert_eq!(rec.check_facelets(&Permutation::identity()), Ok(()));

        assert!(matches!(
            check_orientations(&cubies, &Permutation::identity()),
            Err(ReconcileError::OrientationMismatch { .. })
        ));
    }

    #[test]
    fn colliding_cubies_are_caught() {
        let mut cubies = home_cubies();
        cubies[1] = moved_to(cubies[1], cubies[0].position());

        assert_eq!(
            reconcile(&cubies),
            Err(ReconcileError::DuplicateSlot {
                slot: 0,
                first: 0,
                second: 1
            })
        );
    }

    #[test]
    fn off_lattice_is_caught() {
        let mut cubies = home_cubies();
        cubies[3] = moved_to(cubies[3], Vec3::new(0.5, 0., 0.));
        assert!(matches!(
            reconcile(&cubies),
            Err(ReconcileError::OffLattice { cubie: 3, .. })
        ));

        cubies[3] = moved_to(cubies[3], Vec3::ZERO);
        assert!(matches!(
            reconcile(&cubies),
            Err(ReconcileError::OffLattice { cubie: 3, .. })
        ));
    }

    fn twisted(cubie: Cubie) -> Cubie {
        // A third of a turn about the corner's diagonal keeps it in place
        Cubie {
            orientation: Quat::from_axis_angle(Vec3::ONE.normalize(), 4. * FRAC_PI_2 / 3.),
            ..cubie
        }
    }

    fn moved_to(cubie: Cubie, position: Vec3) -> Cubie {
        Cubie { position, ..cubie }
    }
}
