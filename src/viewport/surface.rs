use serde::Serialize;
use std::io::{self, Write};

use super::bounds::BoundingBox;

/// Map widget the route is drawn on.
pub trait MapSurface {
    fn draw_path(&mut self, path: &[(f64, f64)]) -> io::Result<()>;
    fn set_view(&mut self, center: (f64, f64), zoom: u8) -> io::Result<()>;
    fn fit_bounds(&mut self, bounds: &BoundingBox, padding_px: [u32; 2]) -> io::Result<()>;
}

#[derive(Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
enum MapCommand<'a> {
    DrawPath {
        path: &'a [(f64, f64)],
    },
    SetView {
        center: (f64, f64),
        zoom: u8,
    },
    FitBounds {
        /// South-west and north-east corners.
        bounds: [(f64, f64); 2],
        padding_px: [u32; 2],
    },
}

/// Writes each map command as one JSON object per line.
pub struct JsonLinesSurface<W> {
    out: W,
}

impl<W: Write> JsonLinesSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, command: &MapCommand<'_>) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, command)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}

impl<W: Write> MapSurface for JsonLinesSurface<W> {
    fn draw_path(&mut self, path: &[(f64, f64)]) -> io::Result<()> {
        self.write(&MapCommand::DrawPath { path })
    }

    fn set_view(&mut self, center: (f64, f64), zoom: u8) -> io::Result<()> {
        self.write(&MapCommand::SetView { center, zoom })
    }

    fn fit_bounds(&mut self, bounds: &BoundingBox, padding_px: [u32; 2]) -> io::Result<()> {
        self.write(&MapCommand::FitBounds {
            bounds: [bounds.south_west(), bounds.north_east()],
            padding_px,
        })
    }
}
