use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::brain::CONTROL_OUTPUTS;
use super::controls::ControlType;

/// Where a traffic car starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrafficSpawn {
    /// Lane index, 0 = left-most.
    pub lane: usize,
    /// Starting y (negative is further up the road).
    pub y: f32,
}

/// Simulation parameters that control a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Horizontal centre of the road.
    pub road_center: f32,
    /// Total road width.
    pub road_width: f32,
    /// Number of lanes.
    pub lane_count: usize,
    /// Number of cars in the evolving population.
    pub population_size: usize,
    /// Driver of population cars (`Ai` or `Human`).
    pub control_type: ControlType,
    /// Lane the population spawns in.
    pub spawn_lane: usize,
    /// y the population spawns at.
    pub spawn_y: f32,
    /// Body width of every car.
    pub car_width: f32,
    /// Body length of every car.
    pub car_height: f32,
    /// Speed limit of population cars.
    pub car_max_velocity: f32,
    /// Speed limit of traffic cars.
    pub traffic_max_velocity: f32,
    /// Fixed traffic layout.
    pub traffic: Vec<TrafficSpawn>,
    /// Rays per sensor; also the network input width.
    pub ray_count: usize,
    /// Length of each sensor ray.
    pub ray_length: f32,
    /// Total sensor fan angle in radians.
    pub ray_spread: f32,
    /// Hidden layer widths between sensor inputs and the 4 control outputs.
    pub hidden_layers: Vec<usize>,
    /// Mutation strength applied to every non-parent car at bootstrap.
    pub mutation_amount: f32,
    /// Directory holding persisted networks.
    pub storage_dir: PathBuf,
    /// Slot name of the persisted best network.
    pub storage_slot: String,
}

impl Default for Params {
    fn default() -> Self {
        let traffic = [
            (2, -100.0),
            (0, -300.0),
            (3, -300.0),
            (4, -500.0),
            (1, -500.0),
            (1, -700.0),
            (2, -700.0),
            (4, -700.0),
            (0, -900.0),
            (1, -900.0),
            (2, -900.0),
            (4, -900.0),
        ]
        .into_iter()
        .map(|(lane, y)| TrafficSpawn { lane, y })
        .collect();

        Self {
            road_center: 175.0,
            road_width: 280.0,
            lane_count: 5,
            population_size: 100,
            control_type: ControlType::Ai,
            spawn_lane: 2,
            spawn_y: 100.0,
            car_width: 30.0,
            car_height: 50.0,
            car_max_velocity: 3.0,
            traffic_max_velocity: 2.0,
            traffic,
            ray_count: 5,
            ray_length: 150.0,
            ray_spread: std::f32::consts::FRAC_PI_2,
            hidden_layers: vec![6],
            mutation_amount: 0.2,
            storage_dir: PathBuf::from("."),
            storage_slot: "best_brain".to_string(),
        }
    }
}

impl Params {
    /// Network layer widths: ray count, hidden layers, then the control outputs.
    pub fn layer_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(self.hidden_layers.len() + 2);
        sizes.push(self.ray_count);
        sizes.extend(&self.hidden_layers);
        sizes.push(CONTROL_OUTPUTS);
        sizes
    }

    /// Saves the parameters to a JSON file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Loads parameters from a JSON file; missing fields take their defaults.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let json = std::fs::read_to_string(path)?;
        let params = serde_json::from_str(&json)?;
        Ok(params)
    }
}
