use log::{debug, error};
use serde::Serialize;

use super::bounds::BoundingBox;
use super::surface::MapSurface;
use crate::tracker::{Route, RouteObserver};

/// Street-level zoom used to center on a lone point.
pub const STREET_ZOOM: u8 = 15;
pub const FIT_PADDING_PX: [u32; 2] = [50, 50];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ViewportAction {
    Center {
        latitude: f64,
        longitude: f64,
        zoom: u8,
    },
    FitBounds {
        bounds: BoundingBox,
        padding_px: [u32; 2],
    },
}

/// Keeps the map framed on the route. Holds no state between refits.
pub struct ViewportFitter<S> {
    surface: S,
    zoom: u8,
    padding_px: [u32; 2],
}

impl<S: MapSurface> ViewportFitter<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            zoom: STREET_ZOOM,
            padding_px: FIT_PADDING_PX,
        }
    }

    pub fn with_zoom(mut self, zoom: u8) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn with_padding(mut self, padding_px: [u32; 2]) -> Self {
        self.padding_px = padding_px;
        self
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Viewport change for `route`, or `None` to keep the current framing.
    pub fn plan(&self, route: &Route) -> Option<ViewportAction> {
        match route.points() {
            [] => None,
            [only] => Some(ViewportAction::Center {
                latitude: only.latitude,
                longitude: only.longitude,
                zoom: self.zoom,
            }),
            points => BoundingBox::from_points(points).map(|bounds| ViewportAction::FitBounds {
                bounds,
                padding_px: self.padding_px,
            }),
        }
    }

    /// Redraws the path and reframes the map.
    pub fn refit(&mut self, route: &Route) -> std::io::Result<()> {
        self.surface.draw_path(&route.positions())?;

        match self.plan(route) {
            None => Ok(()),
            Some(ViewportAction::Center {
                latitude,
                longitude,
                zoom,
            }) => self.surface.set_view((latitude, longitude), zoom),
            Some(ViewportAction::FitBounds { bounds, padding_px }) => {
                self.surface.fit_bounds(&bounds, padding_px)
            }
        }
    }
}

impl<S: MapSurface> RouteObserver for ViewportFitter<S> {
    fn route_changed(&mut self, route: &Route) {
        debug!("Refitting viewport on {} points", route.len());
        if let Err(e) = self.refit(route) {
            error!("Failed to update map surface: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::TrackPoint;
    use std::io;

    #[derive(Debug, Clone, PartialEq)]
    enum Drawn {
        Path(usize),
        View((f64, f64), u8),
        Fit(BoundingBox, [u32; 2]),
    }

    #[derive(Default)]
    struct Recorder(Vec<Drawn>);

    impl MapSurface for Recorder {
        fn draw_path(&mut self, path: &[(f64, f64)]) -> io::Result<()> {
            self.0.push(Drawn::Path(path.len()));
            Ok(())
        }

        fn set_view(&mut self, center: (f64, f64), zoom: u8) -> io::Result<()> {
            self.0.push(Drawn::View(center, zoom));
            Ok(())
        }

        fn fit_bounds(&mut self, bounds: &BoundingBox, padding_px: [u32; 2]) -> io::Result<()> {
            self.0.push(Drawn::Fit(*bounds, padding_px));
            Ok(())
        }
    }

    struct Broken;

    impl MapSurface for Broken {
        fn draw_path(&mut self, _: &[(f64, f64)]) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn set_view(&mut self, _: (f64, f64), _: u8) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn fit_bounds(&mut self, _: &BoundingBox, _: [u32; 2]) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    fn route(points: &[(f64, f64)]) -> Route {
        points
            .iter()
            .enumerate()
            .map(|(i, (lat, lng))| TrackPoint::new(*lat, *lng, i as i64))
            .collect()
    }

    #[test]
    fn empty_route_keeps_framing() {
        let mut fitter = ViewportFitter::new(Recorder::default());
        assert_eq!(fitter.plan(&Route::new()), None);

        fitter.route_changed(&Route::new());
        assert_eq!(fitter.surface().0, vec![Drawn::Path(0)]);
    }

    #[test]
    fn single_point_is_centered_at_street_zoom() {
        let fitter = ViewportFitter::new(Recorder::default());
        assert_eq!(
            fitter.plan(&route(&[(48.85, 2.35)])),
            Some(ViewportAction::Center {
                latitude: 48.85,
                longitude: 2.35,
                zoom: 15,
            })
        );
    }

    #[test]
    fn several_points_fit_padded_bounds() {
        let mut fitter = ViewportFitter::new(Recorder::default());
        let route = route(&[(10.0, 20.0), (10.0, 21.0)]);
        fitter.route_changed(&route);

        let bounds = BoundingBox {
            min_lat: 10.0,
            max_lat: 10.0,
            min_lng: 20.0,
            max_lng: 21.0,
        };
        assert_eq!(
            fitter.surface().0,
            vec![Drawn::Path(2), Drawn::Fit(bounds, [50, 50])]
        );
    }

    #[test]
    fn same_route_gives_same_plan() {
        let fitter = ViewportFitter::new(Recorder::default());
        let route = route(&[(1.0, 1.0), (-3.0, 7.5), (2.0, -4.0)]);

        let first = fitter.plan(&route);
        assert_eq!(first, fitter.plan(&route));
        assert_eq!(
            first,
            Some(ViewportAction::FitBounds {
                bounds: BoundingBox {
                    min_lat: -3.0,
                    max_lat: 2.0,
                    min_lng: -4.0,
                    max_lng: 7.5,
                },
                padding_px: FIT_PADDING_PX,
            })
        );
    }

    #[test]
    fn configured_zoom_and_padding_are_used() {
        let fitter = ViewportFitter::new(Recorder::default())
            .with_zoom(12)
            .with_padding([10, 20]);

        assert!(matches!(
            fitter.plan(&route(&[(0.0, 0.0)])),
            Some(ViewportAction::Center { zoom: 12, .. })
        ));
        assert!(matches!(
            fitter.plan(&route(&[(0.0, 0.0), (1.0, 1.0)])),
            Some(ViewportAction::FitBounds {
                padding_px: [10, 20],
                ..
            })
        ));
    }

    #[test]
    fn surface_failure_is_not_fatal() {
        let mut fitter = ViewportFitter::new(Broken);
        fitter.route_changed(&route(&[(0.0, 0.0)]));
        assert!(fitter.refit(&route(&[(0.0, 0.0)])).is_err());
    }
}
