//! Ray-casting sensor that lets a car perceive borders and traffic.
//!
//! The sensor casts a symmetric fan of fixed-length rays around the car's
//! heading and keeps, per ray, the closest intersection with any obstacle.

use geo::{Coord, Line};
use ndarray::Array1;

use super::car::Car;
use super::geometric_utils::{Touch, edges, lerp, segment_intersection};

/// A fan of distance rays owned by one car.
#[derive(Debug, Clone)]
pub struct Sensor {
    /// Number of rays in the fan.
    pub ray_count: usize,
    /// Length of every ray in world units.
    pub ray_length: f32,
    /// Total angle covered by the fan in radians.
    pub ray_spread: f32,
    /// Ray segments from the car's position outward, left-most first.
    pub rays: Vec<Line<f32>>,
    /// Closest hit per ray, `None` when the ray is clear.
    pub readings: Vec<Option<Touch>>,
}

impl Sensor {
    /// Creates a sensor with clear readings and no rays cast yet.
    ///
    /// # Arguments
    ///
    /// * `ray_count` - Number of rays
    /// * `ray_length` - Length of each ray
    /// * `ray_spread` - Total fan angle in radians
    pub fn new(ray_count: usize, ray_length: f32, ray_spread: f32) -> Self {
        Self {
            ray_count,
            ray_length,
            ray_spread,
            rays: Vec::with_capacity(ray_count),
            readings: vec![None; ray_count],
        }
    }

    /// Rebuilds the ray segments for the given pose.
    ///
    /// Ray `i` points at `heading + lerp(spread/2, -spread/2, i/(n-1))`, so the
    /// first ray sits on the left of the fan. A single ray points straight ahead.
    pub fn cast_rays(&mut self, origin: Coord<f32>, heading: f32) {
        self.rays.clear();
        for i in 0..self.ray_count {
            let t = if self.ray_count == 1 {
                0.5
            } else {
                i as f32 / (self.ray_count - 1) as f32
            };
            let angle = lerp(self.ray_spread / 2.0, -self.ray_spread / 2.0, t) + heading;
            let end = Coord {
                x: origin.x - angle.sin() * self.ray_length,
                y: origin.y - angle.cos() * self.ray_length,
            };
            self.rays.push(Line::new(origin, end));
        }
    }

    /// Recasts the rays and records the closest hit for each of them.
    ///
    /// # Arguments
    ///
    /// * `origin` - Current car position
    /// * `heading` - Current car heading in radians
    /// * `borders` - Road border segments
    /// * `traffic` - Cars whose bodies block the rays
    pub fn update(
        &mut self,
        origin: Coord<f32>,
        heading: f32,
        borders: &[Line<f32>],
        traffic: &[Car],
    ) {
        self.cast_rays(origin, heading);
        self.readings = self
            .rays
            .iter()
            .map(|ray| closest_touch(ray, borders, traffic))
            .collect();
    }

    /// Converts readings into network inputs.
    ///
    /// A hit at offset `o` becomes `1 - o` (closer is larger); a clear ray is `0`.
    pub fn inputs(&self) -> Array1<f32> {
        self.readings
            .iter()
            .map(|reading| reading.map_or(0.0, |touch| 1.0 - touch.offset))
            .collect()
    }
}

fn closest_touch(ray: &Line<f32>, borders: &[Line<f32>], traffic: &[Car]) -> Option<Touch> {
    let border_hits = borders
        .iter()
        .filter_map(|border| segment_intersection(ray, border));

    let traffic_hits = traffic.iter().flat_map(move |car| {
        edges(car.polygon()).filter_map(move |edge| segment_intersection(ray, &edge))
    });

    border_hits
        .chain(traffic_hits)
        .min_by(|a, b| a.offset.total_cmp(&b.offset))
}
