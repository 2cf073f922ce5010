use evodrive::simulation::car::Car;
use evodrive::simulation::road::Road;
use evodrive::simulation::session::Session;
use geo::Coord;
use macroquad::prelude::*;

/// Share of the screen height above the followed car.
const CAMERA_ANCHOR: f32 = 0.7;
/// Length of one dash plus one gap on lane dividers.
const DASH_PERIOD: f32 = 40.0;

trait ToScreen {
    type Output;
    fn to_screen(&self, camera_y: f32) -> Self::Output;
}

impl ToScreen for Coord<f32> {
    type Output = Vec2;
    fn to_screen(&self, camera_y: f32) -> Vec2 {
        vec2(self.x, self.y - camera_y + screen_height() * CAMERA_ANCHOR)
    }
}

impl ToScreen for f32 {
    type Output = f32;
    fn to_screen(&self, camera_y: f32) -> f32 {
        self - camera_y + screen_height() * CAMERA_ANCHOR
    }
}

pub fn draw_session(session: &Session) {
    let camera_y = session.best_car().map_or(0.0, |car| car.y);

    draw_road(&session.road, camera_y);

    for car in &session.traffic {
        draw_car(car, YELLOW, camera_y);
    }

    let translucent = Color::new(BLUE.r, BLUE.g, BLUE.b, 0.2);
    for car in &session.cars {
        draw_car(car, translucent, camera_y);
    }

    if let Some(best) = session.best_car() {
        draw_car(best, BLUE, camera_y);
        draw_sensor(best, camera_y);
    }
}

pub fn draw_hud(session: &Session) {
    let lines = [
        format!("Generation {}", session.generation),
        format!("Tick {}", session.time),
        format!("Alive {}/{}", session.alive_count(), session.cars.len()),
        "S save  D discard  R restart".to_string(),
    ];
    for (i, line) in lines.iter().enumerate() {
        draw_text(line, 10.0, 20.0 + i as f32 * 18.0, 18.0, BLACK);
    }
}

fn draw_road(road: &Road, camera_y: f32) {
    let height = screen_height();
    let world_top = camera_y - height * CAMERA_ANCHOR;
    let world_bottom = world_top + height;

    draw_rectangle(road.left, 0.0, road.width, height, LIGHTGRAY);

    for x in road.lane_dividers() {
        let mut y = (world_top / DASH_PERIOD).floor() * DASH_PERIOD;
        while y < world_bottom {
            draw_line(
                x,
                y.to_screen(camera_y),
                x,
                (y + DASH_PERIOD / 2.0).to_screen(camera_y),
                5.0,
                WHITE,
            );
            y += DASH_PERIOD;
        }
    }

    // borders run a million units each way, clip them to the visible stretch
    for border in road.borders() {
        let top = border.start.y.max(world_top).to_screen(camera_y);
        let bottom = border.end.y.min(world_bottom).to_screen(camera_y);
        draw_line(border.start.x, top, border.end.x, bottom, 5.0, WHITE);
    }
}

fn draw_car(car: &Car, color: Color, camera_y: f32) {
    let color = if car.is_damaged() { GRAY } else { color };
    let corners = car.polygon().map(|corner| corner.to_screen(camera_y));

    draw_triangle(corners[0], corners[1], corners[2], color);
    draw_triangle(corners[0], corners[2], corners[3], color);
}

fn draw_sensor(car: &Car, camera_y: f32) {
    let Some(sensor) = car.sensor() else {
        return;
    };

    for (ray, reading) in sensor.rays.iter().zip(&sensor.readings) {
        let start = ray.start.to_screen(camera_y);
        let tip = ray.end.to_screen(camera_y);
        let hit = reading.map_or(tip, |touch| touch.point.to_screen(camera_y));

        draw_line(start.x, start.y, hit.x, hit.y, 2.0, YELLOW);
        draw_line(hit.x, hit.y, tip.x, tip.y, 2.0, BLACK);
    }
}
