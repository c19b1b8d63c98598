/// Quadratic ease in and out over `0..=1`.
#[must_use]
pub fn ease_in_out_quad(t: f32) -> f32 {
    let t = t.clamp(0., 1.);
    if t < 0.5 {
        2. * t * t
    } else {
        let u = 2. - 2. * t;
        1. - u * u / 2.
    }
}
