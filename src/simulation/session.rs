//! Session controller: runs the tick loop and propagates the winning network.
//!
//! A session owns the road, the fixed traffic, and the evolving population.
//! At bootstrap the persisted winner (if any) is copied unchanged into the
//! first car and as mutated copies into every other car; without a winner all
//! cars start from random networks.

use tracing::{debug, info, warn};

use super::brain::{CONTROL_OUTPUTS, Network};
use super::car::{Car, Driver};
use super::controls::{ControlType, Controls};
use super::params::Params;
use super::road::Road;
use super::sensor::Sensor;
use super::storage::{NetworkStore, StoreError};

/// All state of one simulation session.
pub struct Session {
    /// Parameters the session was built from.
    pub params: Params,
    /// The road; fixed for the session.
    pub road: Road,
    /// Traffic cars; their count and spawn points are fixed.
    pub traffic: Vec<Car>,
    /// The evolving population.
    pub cars: Vec<Car>,
    /// Number of times the population has been (re)built.
    pub generation: u32,
    /// Ticks run since the last bootstrap.
    pub time: u64,
    best: usize,
    store: Box<dyn NetworkStore>,
}

impl Session {
    /// Builds road, traffic, and population, seeding the population from `store`.
    pub fn new(params: Params, store: Box<dyn NetworkStore>) -> Self {
        let road = Road::new(params.road_center, params.road_width, params.lane_count);

        let mut session = Self {
            params,
            road,
            traffic: Vec::new(),
            cars: Vec::new(),
            generation: 0,
            time: 0,
            best: 0,
            store,
        };
        session.bootstrap();
        session
    }

    /// Advances the whole session by one tick.
    ///
    /// Traffic moves first (seeing only the borders), then every population car
    /// moves against the borders and the already-updated traffic, then the
    /// fittest car is recomputed.
    ///
    /// # Arguments
    ///
    /// * `input` - Key snapshot for human-driven cars
    pub fn tick(&mut self, input: Controls) {
        let borders = self.road.borders();

        for car in &mut self.traffic {
            car.update(borders, &[], Controls::default());
        }

        for car in &mut self.cars {
            car.update(borders, &self.traffic, input);
        }

        self.best = fittest(&self.cars);
        self.time += 1;
    }

    /// Index of the car furthest up the road.
    pub fn best_index(&self) -> usize {
        self.best
    }

    /// The car furthest up the road, if the population is not empty.
    pub fn best_car(&self) -> Option<&Car> {
        self.cars.get(self.best)
    }

    /// Number of population cars that have not crashed.
    pub fn alive_count(&self) -> usize {
        self.cars.iter().filter(|car| !car.is_damaged()).count()
    }

    /// Read access to the backing store.
    pub fn store(&self) -> &dyn NetworkStore {
        self.store.as_ref()
    }

    /// Persists the fittest car's network, overwriting any previous one.
    ///
    /// # Returns
    ///
    /// `Ok(false)` when the fittest car has no network to save.
    pub fn save_best(&mut self) -> Result<bool, StoreError> {
        let Some(brain) = self.cars.get(self.best).and_then(Car::brain) else {
            return Ok(false);
        };
        self.store.save(brain)?;
        info!(
            car = self.best,
            generation = self.generation,
            "saved best network"
        );
        Ok(true)
    }

    /// Removes the persisted network.
    pub fn discard_saved(&mut self) -> Result<(), StoreError> {
        self.store.discard()?;
        info!("discarded saved network");
        Ok(())
    }

    /// Rebuilds traffic and population from the store, starting a new generation.
    pub fn restart(&mut self) {
        self.bootstrap();
        info!(generation = self.generation, "session restarted");
    }

    fn bootstrap(&mut self) {
        let parent = self.load_parent();
        let params = &self.params;

        self.traffic = params
            .traffic
            .iter()
            .map(|spawn| {
                Car::dummy(
                    self.road.lane_center(spawn.lane),
                    spawn.y,
                    params.car_width,
                    params.car_height,
                    params.traffic_max_velocity,
                )
            })
            .collect();

        let population = match params.control_type {
            ControlType::Human => 1,
            ControlType::Ai | ControlType::Dummy => params.population_size,
        };
        let layer_sizes = params.layer_sizes();
        let x = self.road.lane_center(params.spawn_lane);

        self.cars = (0..population)
            .map(|i| {
                let sensor = || Sensor::new(params.ray_count, params.ray_length, params.ray_spread);
                let (driver, sensor) = match params.control_type {
                    ControlType::Human => (Driver::Human, Some(sensor())),
                    ControlType::Dummy => (Driver::Dummy, None),
                    ControlType::Ai => {
                        let brain = match &parent {
                            Some(parent) if i == 0 => parent.clone(),
                            Some(parent) => {
                                let mut child = parent.clone();
                                child.mutate(params.mutation_amount);
                                child
                            }
                            None => Network::new(&layer_sizes),
                        };
                        (Driver::Ai(brain), Some(sensor()))
                    }
                };
                Car::new(
                    x,
                    params.spawn_y,
                    params.car_width,
                    params.car_height,
                    params.car_max_velocity,
                    driver,
                    sensor,
                )
            })
            .filter_map(|car| {
                car.map_err(|e| warn!(error = %e, "network does not fit the sensor, car skipped"))
                    .ok()
            })
            .collect();

        self.best = 0;
        self.time = 0;
        self.generation += 1;

        debug!(
            generation = self.generation,
            cars = self.cars.len(),
            traffic = self.traffic.len(),
            seeded = parent.is_some(),
            "population built"
        );
    }

    fn load_parent(&mut self) -> Option<Network> {
        if self.params.control_type != ControlType::Ai {
            return None;
        }

        match self.store.load() {
            Ok(Some(network)) => match network.validate(self.params.ray_count, CONTROL_OUTPUTS) {
                Ok(()) => Some(network),
                Err(e) => {
                    warn!(error = %e, "saved network does not fit this configuration, discarding");
                    if let Err(e) = self.store.discard() {
                        warn!(error = %e, "failed to discard incompatible network");
                    }
                    None
                }
            },
            Ok(None) => {
                debug!("no saved network, starting from random networks");
                None
            }
            Err(e) => {
                warn!(error = %e, "failed to load saved network, starting from random networks");
                None
            }
        }
    }
}

/// Index of the car with the smallest `y`; ties go to the lowest index.
///
/// Returns 0 for an empty slice.
pub fn fittest(cars: &[Car]) -> usize {
    let mut best = 0;
    for (i, car) in cars.iter().enumerate().skip(1) {
        if car.y < cars[best].y {
            best = i;
        }
    }
    best
}
