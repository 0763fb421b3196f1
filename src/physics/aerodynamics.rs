use nalgebra::Vector2;

/// Sea-level air density, kg/m^3.
pub const AIR_DENSITY_SEA_LEVEL: f64 = 1.225;

/// Quadratic drag against the air mass (inertial frame, opposing the
/// velocity relative to the wind).
///
/// Cd and reference area are the airframe's own; a deployed parachute does
/// not change them.
pub fn drag_force(
    vel: &Vector2<f64>,
    wind: &Vector2<f64>,
    cd: f64,
    area: f64,
    air_density: f64,
) -> Vector2<f64> {
    let relative = vel - wind;
    let speed = relative.norm();
    if speed == 0.0 {
        return Vector2::zeros();
    }

    let q_dyn = 0.5 * air_density * speed * speed;
    let drag_mag = q_dyn * cd * area;
    -(relative / speed) * drag_mag
}
