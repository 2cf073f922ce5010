//! # Evodrive - Evolving Self-Driving Cars
//!
//! Cars drive up a straight multi-lane road through fixed traffic. Each car
//! perceives its surroundings with distance rays and is steered by a small
//! feedforward network. The best network of a session can be saved and is
//! handed, unchanged and as mutated copies, to the next session's population.
//!
//! ## Features
//!
//! - Polygon collision and segment ray casting
//! - Binary-step feedforward networks evolved by elitist mutation
//! - Simple car physics with acceleration, friction and steering
//! - Persisted winner network as a versioned JSON record
//! - Real-time visualization with macroquad
//!
//! ## Core Modules
//!
//! - [`simulation::car`] - Car physics, damage, and the control loop
//! - [`simulation::sensor`] - Ray-casting perception
//! - [`simulation::brain`] - Neural network implementation
//! - [`simulation::session`] - Tick loop and cross-session evolution
//! - [`simulation::storage`] - Saving and loading the winning network

/// Core simulation logic and data structures.
pub mod simulation {
    /// Neural network that maps sensor readings to controls.
    pub mod brain;
    /// Car state, physics, and collision.
    pub mod car;
    /// Control flags and control variants.
    pub mod controls;
    /// Segment intersection, polygon collision, and interpolation.
    pub mod geometric_utils;
    /// Simulation parameters.
    pub mod params;
    /// Road geometry and borders.
    pub mod road;
    /// Ray-casting sensor.
    pub mod sensor;
    /// Session controller driving the tick loop.
    pub mod session;
    /// Persistence of the winning network.
    pub mod storage;
}
