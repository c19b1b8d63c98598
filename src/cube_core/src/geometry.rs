//! Cubie positions and orientations, and rotating a layer of them.

use std::{f32::consts::FRAC_PI_2, fmt::Display};

use glam::{IVec3, Mat3, Quat, Vec3};

use crate::{catalog::Axis, slice::Slice};

pub const CUBIE_COUNT: usize = 26;
pub const CUBIE_WIDTH: f32 = 1.0;
pub const CUBIE_SPACING: f32 = 0.05;
/// Distance between neighbouring lattice points.
pub const STEP: f32 = CUBIE_WIDTH + CUBIE_SPACING;

/// One of the 26 visible pieces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cubie {
    pub(crate) slot_id: usize,
    pub(crate) position: Vec3,
    pub(crate) orientation: Quat,
}

impl Cubie {
    /// The cubie built for `slot_id`, sitting at home with no rotation.
    #[must_use]
    pub fn at_home(slot_id: usize) -> Cubie {
        Cubie {
            slot_id,
            position: home_lattice(slot_id).as_vec3() * STEP,
            orientation: Quat::IDENTITY,
        }
    }

    /// The slot this cubie was built for. Never changes.
    #[must_use]
    pub fn slot_id(&self) -> usize {
        self.slot_id
    }

    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[must_use]
    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    /// The nearest lattice point to the cubie's position.
    #[must_use]
    pub fn lattice(&self) -> IVec3 {
        (self.position / STEP).round().as_ivec3()
    }
}

impl Display for Cubie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Vec3 { x, y, z } = self.position;
        let [qx, qy, qz, qw] = self.orientation.to_array();
        write!(
            f,
            "Cubie {:>2} at ({x:.3}, {y:.3}, {z:.3}) rotated ({qx:.3}, {qy:.3}, {qz:.3}, {qw:.3})",
            self.slot_id
        )
    }
}

/// All 26 cubies in their solved placement, indexed by slot.
#[must_use]
pub fn home_cubies() -> [Cubie; CUBIE_COUNT] {
    std::array::from_fn(Cubie::at_home)
}

/// The lattice point of `slot`. Slots count through `x`, then `y`, then `z`
/// from -1 to 1, skipping the centre.
#[must_use]
pub fn home_lattice(slot: usize) -> IVec3 {
    let k = (if slot < 13 { slot } else { slot + 1 }) as i32;
    IVec3::new(k / 9 - 1, k / 3 % 3 - 1, k % 3 - 1)
}

/// Inverse of [`home_lattice`]. `None` for the centre or anything off the
/// 3x3x3 lattice.
#[must_use]
pub fn slot_of_lattice(lattice: IVec3) -> Option<usize> {
    if lattice.abs().max_element() > 1 || lattice == IVec3::ZERO {
        return None;
    }

    let k = ((lattice.x + 1) * 9 + (lattice.y + 1) * 3 + (lattice.z + 1)) as usize;
    Some(if k < 13 { k } else { k - 1 })
}

/// Snap each component to the nearest multiple of [`STEP`].
#[must_use]
pub fn snap_position(position: Vec3) -> Vec3 {
    // Adding zero turns -0.0 into 0.0
    (position / STEP).round() * STEP + Vec3::ZERO
}

/// Snap to the nearest rotation by multiples of 90° about the axes.
///
/// The rotation matrix is rounded entry by entry, giving a signed permutation
/// matrix. Equal matrices always produce bit-identical quaternions, so a move
/// followed by its inverse restores the orientation exactly.
#[must_use]
pub fn snap_orientation(orientation: Quat) -> Quat {
    Quat::from_mat3(&rounded_rotation(orientation))
}

fn rounded_rotation(orientation: Quat) -> Mat3 {
    let m = Mat3::from_quat(orientation.normalize());
    Mat3::from_cols(
        m.x_axis.round() + Vec3::ZERO,
        m.y_axis.round() + Vec3::ZERO,
        m.z_axis.round() + Vec3::ZERO,
    )
}

/// Whether the cubie sits exactly on a lattice point with an exact
/// 90°-multiple orientation.
#[must_use]
pub fn is_settled(cubie: &Cubie) -> bool {
    cubie.position == snap_position(cubie.position)
        && cubie.orientation == snap_orientation(cubie.orientation)
        && slot_of_lattice(cubie.lattice()).is_some()
}

/// A quarter turn of one layer, remembering where its cubies started so the
/// turn can be replayed at any fraction.
#[derive(Debug, Clone)]
pub struct SliceRotation {
    axis: Axis,
    angle: f32,
    centre: Vec3,
    members: Vec<usize>,
    start: Vec<(Vec3, Quat)>,
}

impl SliceRotation {
    #[must_use]
    pub fn new(cubies: &[Cubie; CUBIE_COUNT], slice: &Slice, axis: Axis, direction: i8) -> Self {
        let members = slice.members().to_vec();
        let start = members
            .iter()
            .map(|&i| (cubies[i].position, cubies[i].orientation))
            .collect();
        SliceRotation {
            axis,
            angle: f32::from(direction) * FRAC_PI_2,
            centre: slice.centre(),
            members,
            start,
        }
    }

    #[must_use]
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Place the layer's cubies `t` of the way through the turn, measured from
    /// where they were when the turn began.
    pub fn apply(&self, cubies: &mut [Cubie; CUBIE_COUNT], t: f32) {
        let turn = Quat::from_axis_angle(self.axis.unit(), self.angle * t.clamp(0., 1.));

        for (&i, &(position, orientation)) in self.members.iter().zip(&self.start) {
            let cubie = &mut cubies[i];
            cubie.position = turn * (position - self.centre) + self.centre;
            cubie.orientation = turn * orientation;
        }
    }

    /// Complete the turn and snap the layer back onto the lattice.
    pub fn settle(&self, cubies: &mut [Cubie; CUBIE_COUNT]) {
        self.apply(cubies, 1.);

        for &i in &self.members {
            let cubie = &mut cubies[i];
            cubie.position = snap_position(cubie.position);
            cubie.orientation = snap_orientation(cubie.orientation);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lattice_slot_round_trip() {
        for slot in 0..CUBIE_COUNT {
            let lattice = home_lattice(slot);
            assert_ne!(lattice, IVec3::ZERO);
            assert_eq!(slot_of_lattice(lattice), Some(slot));
        }
        assert_eq!(slot_of_lattice(IVec3::ZERO), None);
        assert_eq!(slot_of_lattice(IVec3::new(2, 0, 0)), None);
    }

    #[test]
    fn construction_order() {
        assert_eq!(home_lattice(0), IVec3::new(-1, -1, -1));
        assert_eq!(home_lattice(1), IVec3::new(-1, -1, 0));
        assert_eq!(home_lattice(12), IVec3::new(0, 0, -1));
        assert_eq!(home_lattice(13), IVec3::new(0, 0, 1));
        assert_eq!(home_lattice(25), IVec3::new(1, 1, 1));
    }

    #[test]
    fn home_cubies_are_settled() {
        for (slot, cubie) in home_cubies().iter().enumerate() {
            assert_eq!(cubie.slot_id(), slot);
            assert_eq!(cubie.lattice(), home_lattice(slot));
            assert!(is_settled(cubie));
        }
    }

    #[test]
    fn snapping_removes_noise() {
        let noisy = Vec3::new(STEP + 0.003, -0.002, -STEP - 0.01);
        assert_eq!(snap_position(noisy), Vec3::new(STEP, 0., -STEP));

        let almost = Quat::from_axis_angle(Vec3::Y, FRAC_PI_2 + 0.01);
        let exact = Quat::from_mat3(&Mat3::from_cols(
            Vec3::new(0., 0., -1.),
            Vec3::Y,
            Vec3::new(1., 0., 0.),
        ));
        assert_eq!(snap_orientation(almost), exact);
        assert_eq!(snap_orientation(Quat::IDENTITY), Quat::IDENTITY);
    }

    #[test]
    fn cubie_display() {
        let cubie = Cubie::at_home(25);
        assert_eq!(
            cubie.to_string(),
            "Cubie 25 at (1.050, 1.050, 1.050) rotated (0.000, 0.000, 0.000, 1.000)"
        );
    }

    #[test]
    fn snapping_is_idempotent() {
        let q = Quat::from_axis_angle(Vec3::X, FRAC_PI_2)
            * Quat::from_axis_angle(Vec3::Z, -FRAC_PI_2);
        let once = snap_orientation(q);
        assert_eq!(snap_orientation(once), once);
    }
}
