#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use evodrive::simulation::car::Car;
use evodrive::simulation::road::Road;
use evodrive::simulation::sensor::Sensor;
use geo::Coord;

const SPREAD: f32 = std::f32::consts::FRAC_PI_2;

fn origin() -> Coord<f32> {
    Coord { x: 100.0, y: 0.0 }
}

// road from x = 0 to x = 200
fn create_test_road() -> Road {
    Road::new(100.0, 200.0, 3)
}

#[test]
fn test_new_sensor_has_clear_readings() {
    let sensor = Sensor::new(5, 150.0, SPREAD);
    assert_eq!(sensor.readings.len(), 5);
    assert!(sensor.readings.iter().all(Option::is_none));
    assert_eq!(sensor.inputs().to_vec(), vec![0.0_f32; 5]);
}

#[test]
fn test_rays_fan_out_left_to_right() {
    let mut sensor = Sensor::new(5, 150.0, SPREAD);
    sensor.cast_rays(Coord { x: 0.0, y: 0.0 }, 0.0);

    assert_eq!(sensor.rays.len(), 5);

    // middle ray points straight up the road
    let middle = sensor.rays[2].end;
    assert!(middle.x.abs() < 1e-4);
    assert!((middle.y + 150.0).abs() < 1e-4);

    // first ray leans left, last ray leans right, both at 45 degrees
    let half = 150.0 * std::f32::consts::FRAC_1_SQRT_2;
    assert!((sensor.rays[0].end.x + half).abs() < 1e-3);
    assert!((sensor.rays[4].end.x - half).abs() < 1e-3);
    assert!((sensor.rays[0].end.y + half).abs() < 1e-3);

    for ray in &sensor.rays {
        assert_eq!(ray.start, Coord { x: 0.0, y: 0.0 });
    }
}

#[test]
fn test_single_ray_points_ahead() {
    let mut sensor = Sensor::new(1, 100.0, SPREAD);
    sensor.cast_rays(Coord { x: 0.0, y: 0.0 }, 0.0);

    assert_eq!(sensor.rays.len(), 1);
    assert!(sensor.rays[0].end.x.abs() < 1e-4);
    assert!((sensor.rays[0].end.y + 100.0).abs() < 1e-4);
}

#[test]
fn test_rays_follow_heading() {
    let mut sensor = Sensor::new(3, 100.0, SPREAD);
    sensor.cast_rays(Coord { x: 0.0, y: 0.0 }, std::f32::consts::FRAC_PI_2);

    // heading pi/2 is a quarter turn to the left
    let middle = sensor.rays[1].end;
    assert!((middle.x + 100.0).abs() < 1e-3);
    assert!(middle.y.abs() < 1e-3);
}

#[test]
fn test_outer_rays_see_borders() {
    let road = create_test_road();
    let mut sensor = Sensor::new(5, 150.0, SPREAD);

    sensor.update(origin(), 0.0, road.borders(), &[]);

    assert_eq!(sensor.readings.len(), 5);

    // 100 units to each border along a 45 degree ray of length 150
    let expected = 100.0 / (150.0 * std::f32::consts::FRAC_1_SQRT_2);
    let left = sensor.readings[0].expect("left ray hits the left border");
    let right = sensor.readings[4].expect("right ray hits the right border");
    assert!((left.offset - expected).abs() < 1e-3);
    assert!((right.offset - expected).abs() < 1e-3);
    assert!(left.point.x.abs() < 1e-3);
    assert!((right.point.x - 200.0).abs() < 1e-3);

    for reading in &sensor.readings[1..4] {
        assert!(reading.is_none());
    }
}

#[test]
fn test_closest_hit_wins() {
    let road = create_test_road();
    let mut sensor = Sensor::new(5, 150.0, SPREAD);

    // body spans y = -125..-75, so the middle ray enters at y = -75 and leaves at y = -125
    let traffic = vec![Car::dummy(100.0, -100.0, 30.0, 50.0, 2.0)];
    sensor.update(origin(), 0.0, road.borders(), &traffic);

    let middle = sensor.readings[2].expect("middle ray hits the traffic car");
    assert!((middle.offset - 0.5).abs() < 1e-4);
    assert!((middle.point.y + 75.0).abs() < 1e-3);

    let inputs = sensor.inputs();
    assert!((inputs[2] - 0.5).abs() < 1e-4);
}

#[test]
fn test_traffic_behind_border_is_hidden() {
    let road = create_test_road();
    let mut sensor = Sensor::new(5, 150.0, SPREAD);

    // past the left border, where the left-most ray ends
    let traffic = vec![Car::dummy(-20.0, -100.0, 30.0, 50.0, 2.0)];
    sensor.update(origin(), 0.0, road.borders(), &traffic);

    let expected = 100.0 / (150.0 * std::f32::consts::FRAC_1_SQRT_2);
    let left = sensor.readings[0].expect("left ray hits the border first");
    assert!((left.offset - expected).abs() < 1e-3);
}

#[test]
fn test_inputs_invert_offsets() {
    let road = create_test_road();
    let mut sensor = Sensor::new(5, 150.0, SPREAD);
    sensor.update(origin(), 0.0, road.borders(), &[]);

    let inputs = sensor.inputs();
    assert_eq!(inputs.len(), 5);
    for (input, reading) in inputs.iter().zip(&sensor.readings) {
        match reading {
            Some(touch) => assert!((input - (1.0 - touch.offset)).abs() < 1e-6),
            None => assert_eq!(*input, 0.0),
        }
    }
}

#[test]
fn test_update_is_pure() {
    let road = create_test_road();
    let traffic = vec![
        Car::dummy(60.0, -80.0, 30.0, 50.0, 2.0),
        Car::dummy(150.0, -60.0, 30.0, 50.0, 2.0),
    ];

    let mut a = Sensor::new(7, 150.0, SPREAD);
    let mut b = Sensor::new(7, 150.0, SPREAD);
    a.update(origin(), 0.2, road.borders(), &traffic);
    b.update(origin(), 0.2, road.borders(), &traffic);
    a.update(origin(), 0.2, road.borders(), &traffic);

    assert_eq!(a.readings, b.readings);
}

#[test]
fn test_readings_stay_in_range_for_many_poses() {
    let road = create_test_road();
    let traffic = vec![
        Car::dummy(50.0, -100.0, 30.0, 50.0, 2.0),
        Car::dummy(150.0, -40.0, 30.0, 50.0, 2.0),
        Car::dummy(100.0, 60.0, 30.0, 50.0, 2.0),
    ];
    let mut sensor = Sensor::new(9, 150.0, SPREAD);

    for step in 0..100 {
        let x = 20.0 + (step as f32 * 7.3) % 160.0;
        let y = -150.0 + (step as f32 * 11.1) % 300.0;
        let heading = step as f32 * 0.37;

        sensor.update(Coord { x, y }, heading, road.borders(), &traffic);

        assert_eq!(sensor.readings.len(), 9);
        assert_eq!(sensor.rays.len(), 9);
        for touch in sensor.readings.iter().flatten() {
            assert!((0.0..=1.0).contains(&touch.offset));
        }
    }
}
