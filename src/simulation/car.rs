//! Car physics, collision, and the per-tick perception-actuation loop.
//!
//! A car is either alive (integrating physics every tick) or damaged. Damage
//! is terminal: the pose and body freeze, while the sensor keeps running.

use geo::{Coord, Line};

use super::brain::{CONTROL_OUTPUTS, Network, ShapeError};
use super::controls::{ControlType, Controls};
use super::geometric_utils::{polygon_touches_segment, polygons_intersect};
use super::sensor::Sensor;

/// Velocity gained per tick while `forward` (or lost while `reverse`) is held.
pub const ACCELERATION: f32 = 0.2;
/// Velocity lost to friction per tick; must stay below [`ACCELERATION`].
pub const FRICTION: f32 = 0.05;
/// Heading change per tick while steering, in radians.
pub const TURN_RATE: f32 = 0.03;

/// The actuation strategy of a car, carrying the network for autonomous cars.
#[derive(Debug, Clone)]
pub enum Driver {
    /// Driven by the input snapshot passed to [`Car::update`].
    Human,
    /// Driven by a network fed with sensor readings.
    Ai(Network),
    /// Always accelerating, never steering.
    Dummy,
}

/// A car on the road.
#[derive(Debug, Clone)]
pub struct Car {
    /// Centre x in world coordinates.
    pub x: f32,
    /// Centre y in world coordinates (decreasing `y` is forward progress).
    pub y: f32,
    /// Body width.
    pub width: f32,
    /// Body length.
    pub height: f32,
    /// Signed speed along the heading.
    pub velocity: f32,
    /// Velocity change per tick under throttle.
    pub acceleration: f32,
    /// Speed limit in both directions.
    pub max_velocity: f32,
    /// Velocity lost per tick to friction.
    pub friction: f32,
    /// Heading in radians; 0 points up the road, positive turns left.
    pub angle: f32,
    /// Actuation flags consumed by the next physics step.
    pub controls: Controls,
    damaged: bool,
    sensor: Option<Sensor>,
    polygon: [Coord<f32>; 4],
    driver: Driver,
}

impl Car {
    /// Creates a car at rest facing up the road.
    ///
    /// # Arguments
    ///
    /// * `x`, `y` - Centre position
    /// * `width`, `height` - Body size
    /// * `max_velocity` - Speed limit
    /// * `driver` - Actuation strategy
    /// * `sensor` - Optional sensor; its rays are cast from the start pose
    ///
    /// # Errors
    ///
    /// An autonomous driver with a sensor must take one input per ray and
    /// produce one output per control; otherwise a [`ShapeError`] is returned.
    pub fn new(
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        max_velocity: f32,
        driver: Driver,
        sensor: Option<Sensor>,
    ) -> Result<Self, ShapeError> {
        if let (Driver::Ai(brain), Some(sensor)) = (&driver, &sensor) {
            brain.validate(sensor.ray_count, CONTROL_OUTPUTS)?;
        }
        Ok(Self::build(x, y, width, height, max_velocity, driver, sensor))
    }

    /// Creates a traffic car without a sensor.
    pub fn dummy(x: f32, y: f32, width: f32, height: f32, max_velocity: f32) -> Self {
        Self::build(x, y, width, height, max_velocity, Driver::Dummy, None)
    }

    fn build(
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        max_velocity: f32,
        driver: Driver,
        sensor: Option<Sensor>,
    ) -> Self {
        let controls = match driver {
            Driver::Dummy => Controls::always_forward(),
            Driver::Human | Driver::Ai(_) => Controls::default(),
        };

        let mut car = Self {
            x,
            y,
            width,
            height,
            velocity: 0.0,
            acceleration: ACCELERATION,
            max_velocity,
            friction: FRICTION,
            angle: 0.0,
            controls,
            sensor,
            damaged: false,
            polygon: [Coord { x: 0.0, y: 0.0 }; 4],
            driver,
        };
        car.polygon = car.create_polygon();
        let origin = car.position();
        if let Some(sensor) = &mut car.sensor {
            sensor.cast_rays(origin, car.angle);
        }
        car
    }

    /// Current centre position.
    pub fn position(&self) -> Coord<f32> {
        Coord {
            x: self.x,
            y: self.y,
        }
    }

    /// Body corners: front-left, front-right, rear-right, rear-left.
    pub fn polygon(&self) -> &[Coord<f32>; 4] {
        &self.polygon
    }

    /// The ray-casting sensor, if the car has one.
    pub fn sensor(&self) -> Option<&Sensor> {
        self.sensor.as_ref()
    }

    /// Whether the car has collided. Never resets.
    pub fn is_damaged(&self) -> bool {
        self.damaged
    }

    /// The control variant of this car.
    pub fn control_type(&self) -> ControlType {
        match self.driver {
            Driver::Human => ControlType::Human,
            Driver::Ai(_) => ControlType::Ai,
            Driver::Dummy => ControlType::Dummy,
        }
    }

    /// The network driving this car, if it is autonomous.
    pub fn brain(&self) -> Option<&Network> {
        match &self.driver {
            Driver::Ai(brain) => Some(brain),
            Driver::Human | Driver::Dummy => None,
        }
    }

    /// Mutates the driving network in place; the layer widths are kept.
    ///
    /// Returns `false` when the car has no network.
    pub fn mutate_brain(&mut self, amount: f32) -> bool {
        match &mut self.driver {
            Driver::Ai(brain) => {
                brain.mutate(amount);
                true
            }
            Driver::Human | Driver::Dummy => false,
        }
    }

    /// Advances the car by one tick.
    ///
    /// While alive: integrate physics, rebuild the body, and test it against
    /// `borders` and `traffic`. Then, alive or not, refresh the sensor and, for
    /// autonomous cars, let the network set the controls for the next tick.
    ///
    /// # Arguments
    ///
    /// * `borders` - Road border segments
    /// * `traffic` - Cars this car can hit and see
    /// * `input` - Key snapshot; only read by human-driven cars
    pub fn update(&mut self, borders: &[Line<f32>], traffic: &[Car], input: Controls) {
        if let Driver::Human = self.driver {
            self.controls = input;
        }

        if !self.damaged {
            self.integrate();
            self.polygon = self.create_polygon();
            self.damaged = self.assess_damage(borders, traffic);
        }

        let origin = self.position();
        if let Some(sensor) = &mut self.sensor {
            sensor.update(origin, self.angle, borders, traffic);

            if let Driver::Ai(brain) = &self.driver {
                let outputs = brain.evaluate(&sensor.inputs());
                self.controls
                    .apply_outputs(outputs.as_slice().unwrap_or_default());
            }
        }
    }

    fn assess_damage(&self, borders: &[Line<f32>], traffic: &[Car]) -> bool {
        borders
            .iter()
            .any(|border| polygon_touches_segment(&self.polygon, border))
            || traffic
                .iter()
                .any(|other| polygons_intersect(&self.polygon, other.polygon()))
    }

    fn integrate(&mut self) {
        if self.controls.forward {
            self.velocity += self.acceleration;
        }
        if self.controls.reverse {
            self.velocity -= self.acceleration;
        }

        self.velocity = self.velocity.clamp(-self.max_velocity, self.max_velocity);

        if self.velocity > 0.0 {
            self.velocity -= self.friction;
        } else if self.velocity < 0.0 {
            self.velocity += self.friction;
        }
        if self.velocity.abs() < self.friction {
            self.velocity = 0.0;
        }

        if self.velocity != 0.0 {
            // reversing swings the rear the way a steering wheel would
            let sign = self.velocity.signum();
            if self.controls.left {
                self.angle += TURN_RATE * sign;
            }
            if self.controls.right {
                self.angle -= TURN_RATE * sign;
            }
        }

        // y grows downward, so forward motion subtracts the projections
        self.x -= self.angle.sin() * self.velocity;
        self.y -= self.angle.cos() * self.velocity;
    }

    fn create_polygon(&self) -> [Coord<f32>; 4] {
        let rad = self.width.hypot(self.height) / 2.0;
        let alpha = self.width.atan2(self.height);
        let corner = |theta: f32| Coord {
            x: self.x - rad * theta.sin(),
            y: self.y - rad * theta.cos(),
        };

        [
            corner(self.angle + alpha),
            corner(self.angle - alpha),
            corner(std::f32::consts::PI + self.angle + alpha),
            corner(std::f32::consts::PI + self.angle - alpha),
        ]
    }
}
