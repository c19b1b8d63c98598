use glam::Vec3;
use itertools::Itertools;
use log::trace;
use thiserror::Error;

use crate::{
    catalog::Axis,
    geometry::{CUBIE_COUNT, Cubie},
};

/// How far a cubie may sit from a layer's coordinate and still belong to it.
pub const SLICE_TOLERANCE: f32 = 0.1;

/// Cubies in an outer layer. The middle layers lack the hidden centre and
/// hold one fewer.
pub const OUTER_LAYER_SIZE: usize = 9;
pub const MIDDLE_LAYER_SIZE: usize = 8;

#[derive(Error, Debug, PartialEq)]
pub enum SliceError {
    #[error("Expected {expected} cubies at {axis} = {coordinate}, found {found}")]
    Cardinality {
        axis: Axis,
        coordinate: f32,
        expected: usize,
        found: usize,
    },
}

/// The cubies of one layer and the point the layer turns about.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    members: Vec<usize>,
    centre: Vec3,
}

impl Slice {
    /// Indices into the cubie array, in ascending order.
    #[must_use]
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    #[must_use]
    pub fn centre(&self) -> Vec3 {
        self.centre
    }
}

/// How many cubies the layer at `coordinate` holds on a consistent cube.
#[must_use]
pub fn expected_layer_size(coordinate: f32) -> usize {
    if coordinate.abs() <= SLICE_TOLERANCE {
        MIDDLE_LAYER_SIZE
    } else {
        OUTER_LAYER_SIZE
    }
}

/// Find the layer of cubies at `coordinate` along `axis`.
///
/// # Errors
///
/// If the layer does not hold nine cubies, or eight for a middle layer.
pub fn select_slice(
    cubies: &[Cubie; CUBIE_COUNT],
    axis: Axis,
    coordinate: f32,
) -> Result<Slice, SliceError> {
    let members = cubies
        .iter()
        .positions(|cubie| {
            (axis.component(cubie.position()) - coordinate).abs() <= SLICE_TOLERANCE
        })
        .collect_vec();

    let expected = expected_layer_size(coordinate);
    if members.len() != expected {
        return Err(SliceError::Cardinality {
            axis,
            coordinate,
            expected,
            found: members.len(),
        });
    }

    let sum: Vec3 = members.iter().map(|&i| cubies[i].position()).sum();
    let mut centre = sum / members.len() as f32;
    centre[axis.index()] = coordinate;

    trace!("Selected {axis} = {coordinate}: {members:?} about {centre}");

    Ok(Slice { members, centre })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{STEP, home_cubies};

    #[test]
    fn outer_layers_hold_nine_middle_layers_eight() {
        let cubies = home_cubies();
        for axis in Axis::ALL {
            for layer in [-1., 0., 1.] {
                let slice = select_slice(&cubies, axis, layer * STEP).unwrap();
                let expected = if layer == 0. { 8 } else { 9 };
                assert_eq!(slice.members().len(), expected, "{axis} = {layer}");
                for &i in slice.members() {
                    assert!((axis.component(cubies[i].position()) - layer * STEP).abs() < 1e-6);
                }
            }
        }
    }

    #[test]
    fn centre_lies_on_the_axis() {
        let cubies = home_cubies();
        let slice = select_slice(&cubies, Axis::Y, STEP).unwrap();
        assert!(slice.centre().abs_diff_eq(Vec3::new(0., STEP, 0.), 1e-6));

        // The middle layer has no cubie at its centre
        let slice = select_slice(&cubies, Axis::Z, 0.).unwrap();
        assert_eq!(slice.members().len(), MIDDLE_LAYER_SIZE);
        assert!(slice.centre().abs_diff_eq(Vec3::ZERO, 1e-6));
        assert_eq!(slice.centre().z, 0.);
    }

    #[test]
    fn tolerates_noise() {
        let cubies = home_cubies();
        assert!(select_slice(&cubies, Axis::X, STEP + 0.05).is_ok());
        assert!(select_slice(&cubies, Axis::X, 0.05).is_ok());
    }

    #[test]
    fn wrong_count_is_an_error() {
        let cubies = home_cubies();
        assert_eq!(
            select_slice(&cubies, Axis::X, 2. * STEP),
            Err(SliceError::Cardinality {
                axis: Axis::X,
                coordinate: 2. * STEP,
                expected: 9,
                found: 0
            })
        );
        assert!(matches!(
            select_slice(&cubies, Axis::X, STEP / 2.),
            Err(SliceError::Cardinality { found: 0, .. })
        ));
    }

    #[test]
    fn middle_layer_with_an_intruder_is_an_error() {
        let mut cubies = home_cubies();
        // Drop a corner into the middle layer
        cubies[0].position.x = 0.;
        assert_eq!(
            select_slice(&cubies, Axis::X, 0.),
            Err(SliceError::Cardinality {
                axis: Axis::X,
                coordinate: 0.,
                expected: 8,
                found: 9
            })
        );
    }
}
