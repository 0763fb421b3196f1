use nalgebra::Vector2;

/// Flat-earth gravitational acceleration used by the game, m/s^2.
pub const G_EARTH: f64 = 9.81;

/// Uniform gravity on a body of the given mass (y up).
pub fn gravity_force(mass: f64, g: f64) -> Vector2<f64> {
    Vector2::new(0.0, -mass * g)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_points_down() {
        let f = gravity_force(0.046, G_EARTH);
        assert_eq!(f.x, 0.0);
        assert!((f.y + 0.046 * 9.81).abs() < 1e-12);
    }
}
