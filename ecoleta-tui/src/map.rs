use ecoleta_core::model::Coordinate;
use ratatui::layout::Rect;

pub(crate) const MAX_ZOOM: u8 = 18;

/// Visible part of the world map.
///
/// Zoom follows web map tiles: at zoom `z` the view spans `360 / 2^z` degrees
/// of longitude and half of that in latitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct MapView {
    pub center: Coordinate,
    pub zoom: u8,
    /// Set once the user panned or zoomed, so a late position fix does not
    /// yank the view away.
    pub touched: bool,
}

impl MapView {
    /// Whole world, used until the position is known.
    pub(crate) fn world() -> Self {
        Self {
            center: Coordinate::new(0.0, 0.0),
            zoom: 0,
            touched: false,
        }
    }

    pub(crate) fn focus_on(&mut self, center: Coordinate, zoom: u8) {
        self.center = center;
        self.zoom = zoom.min(MAX_ZOOM);
    }

    pub(crate) fn longitude_span(&self) -> f64 {
        360.0 / f64::from(1_u32 << self.zoom)
    }

    pub(crate) fn latitude_span(&self) -> f64 {
        self.longitude_span() / 2.0
    }

    /// `[min, max]` longitude and latitude bounds for the canvas.
    pub(crate) fn bounds(&self) -> ([f64; 2], [f64; 2]) {
        let half_lng = self.longitude_span() / 2.0;
        let half_lat = self.latitude_span() / 2.0;
        (
            [self.center.longitude - half_lng, self.center.longitude + half_lng],
            [self.center.latitude - half_lat, self.center.latitude + half_lat],
        )
    }

    /// Move the view by eighths of its size.
    pub(crate) fn pan(&mut self, east_steps: i8, north_steps: i8) {
        let longitude =
            self.center.longitude + f64::from(east_steps) * self.longitude_span() / 8.0;
        let latitude = self.center.latitude + f64::from(north_steps) * self.latitude_span() / 8.0;
        self.center = Coordinate::new(latitude.clamp(-90.0, 90.0), wrap_longitude(longitude));
        self.touched = true;
    }

    pub(crate) fn zoom_in(&mut self) {
        self.zoom = (self.zoom + 1).min(MAX_ZOOM);
        self.touched = true;
    }

    pub(crate) fn zoom_out(&mut self) {
        self.zoom = self.zoom.saturating_sub(1);
        self.touched = true;
    }

    /// Coordinate under the terminal cell `(column, row)` of a canvas drawn in `area`.
    pub(crate) fn coordinate_at(&self, area: Rect, column: u16, row: u16) -> Option<Coordinate> {
        if area.width == 0
            || area.height == 0
            || column < area.x
            || row < area.y
            || column >= area.right()
            || row >= area.bottom()
        {
            return None;
        }

        let ([west, east], [south, north]) = self.bounds();
        let x_ratio = (f64::from(column - area.x) + 0.5) / f64::from(area.width);
        let y_ratio = (f64::from(row - area.y) + 0.5) / f64::from(area.height);

        let longitude = west + x_ratio * (east - west);
        let latitude = north - y_ratio * (north - south);
        Some(Coordinate::new(
            latitude.clamp(-90.0, 90.0),
            wrap_longitude(longitude),
        ))
    }
}

fn wrap_longitude(longitude: f64) -> f64 {
    if (-180.0..=180.0).contains(&longitude) {
        longitude
    } else {
        (longitude + 180.0).rem_euclid(360.0) - 180.0
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn close(left: f64, right: f64) -> bool {
        (left - right).abs() < 1e-9
    }

    #[test]
    fn zoom_halves_the_span() {
        let mut view = MapView::world();
        assert!(close(view.longitude_span(), 360.0), "zoom 0 shows the whole world");
        view.zoom_in();
        assert!(close(view.longitude_span(), 180.0), "zoom 1 shows half");
        view.zoom_out();
        view.zoom_out();
        assert_eq!(view.zoom, 0);
    }

    #[test]
    fn zoom_is_capped() {
        let mut view = MapView::world();
        view.focus_on(Coordinate::new(-23.5, -46.6), 40);
        assert_eq!(view.zoom, MAX_ZOOM);
        view.zoom_in();
        assert_eq!(view.zoom, MAX_ZOOM);
    }

    #[test]
    fn center_cell_maps_to_view_center() {
        let mut view = MapView::world();
        view.focus_on(Coordinate::new(-23.5, -46.6), 6);
        // odd sizes so one cell sits exactly in the middle
        let area = Rect::new(10, 5, 41, 21);

        let point = view.coordinate_at(area, 30, 15).expect("inside canvas");
        assert!(close(point.latitude, -23.5), "latitude {}", point.latitude);
        assert!(close(point.longitude, -46.6), "longitude {}", point.longitude);
    }

    #[test]
    fn top_left_cell_is_north_west() {
        let view = MapView::world();
        let area = Rect::new(0, 0, 36, 18);

        let point = view.coordinate_at(area, 0, 0).expect("inside canvas");
        assert!(point.latitude > 80.0, "north edge, got {}", point.latitude);
        assert!(point.longitude < -170.0, "west edge, got {}", point.longitude);
    }

    #[test]
    fn clicks_outside_canvas_are_ignored() {
        let view = MapView::world();
        let area = Rect::new(10, 10, 20, 10);
        assert_eq!(view.coordinate_at(area, 9, 12), None);
        assert_eq!(view.coordinate_at(area, 30, 12), None);
        assert_eq!(view.coordinate_at(area, 12, 20), None);
    }

    #[test]
    fn panning_wraps_around_the_antimeridian() {
        let mut view = MapView::world();
        view.focus_on(Coordinate::new(0.0, 179.0), 3);
        view.pan(1, 0);
        assert!(view.center.longitude < 0.0, "wrapped to the west");
        assert!(view.touched, "panning marks the view as user controlled");
    }

    #[test]
    fn panning_stops_at_the_poles() {
        let mut view = MapView::world();
        for _ in 0..20 {
            view.pan(0, 4);
        }
        assert!(close(view.center.latitude, 90.0), "clamped at the pole");
    }
}
