use nalgebra::Vector2;

use crate::config::SimConfig;
use crate::dynamics::state::{FlightPhase, RocketState};
use crate::physics::{drag_force, gravity_force, thrust_force, wind_perturbation};
use crate::vehicle::{Airframe, EngineProfile};

// ---------------------------------------------------------------------------
// Per-flight constants seen by the force model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct ForceContext<'a> {
    pub engine: &'a EngineProfile,
    pub airframe: &'a Airframe,
    pub config: &'a SimConfig,
    pub wind: Vector2<f64>,
}

/// Net force on the rocket: thrust + drag + gravity + wind drift.
pub fn net_force(state: &RocketState, ctx: &ForceContext<'_>) -> Vector2<f64> {
    let thrust = thrust_force(state.time, ctx.engine);
    let drag = drag_force(
        &state.vel,
        &ctx.wind,
        ctx.airframe.cd,
        ctx.airframe.area(),
        ctx.config.air_density,
    );
    let gravity = gravity_force(state.mass, ctx.config.gravity);
    let drift = wind_perturbation(state.phase, &ctx.wind, &ctx.config.wind_drift);

    thrust + drag + gravity + drift
}

// ---------------------------------------------------------------------------
// Explicit Euler step
// ---------------------------------------------------------------------------

/// Advance `state` by `dt`.
///
/// Velocity is updated first and the new velocity moves the position
/// (semi-implicit Euler). During ascent the propellant burns off linearly
/// over the motor's burn time. Phase bookkeeping and landing are the
/// caller's job. `state.mass` must already be positive.
pub fn euler_step(state: &RocketState, ctx: &ForceContext<'_>, dt: f64) -> RocketState {
    let accel = net_force(state, ctx) / state.mass;

    let mut next = state.clone();
    next.vel += accel * dt;
    next.pos += next.vel * dt;
    next.time += dt;

    if state.phase == FlightPhase::Ascent {
        next.mass = ctx
            .airframe
            .mass_at(next.time, ctx.engine.burn_time)
            .max(state.dry_mass);
    }

    next
}
