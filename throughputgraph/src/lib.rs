// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use plotters::prelude::*;

use std::error::Error;
use std::path::Path;

pub use plotters::prelude::RGBColor;

macro_rules! hexcolour {
    ($colour:literal) => {
        RGBColor(
            (($colour & 0xFF0000) >> 16) as u8,
            (($colour & 0x00FF00) >> 8) as u8,
            ($colour & 0x0000FF) as u8,
        )
    };
}

/// Series colours, matching the classic single letter plot colours.
pub mod palette {
    use super::RGBColor;

    pub const BLUE: RGBColor = hexcolour!(0x0000FF);
    pub const GREEN: RGBColor = hexcolour!(0x008000);
    pub const RED: RGBColor = hexcolour!(0xFF0000);
    pub const PURPLE: RGBColor = hexcolour!(0x800080);
    pub const GRID: RGBColor = hexcolour!(0x808080);
}

/// Where the legend box sits inside the plotting area.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Legend {
    UpperLeft,
    MiddleLeft,
    LowerLeft,
    UpperRight,
    MiddleRight,
    LowerRight,
}

impl From<Legend> for SeriesLabelPosition {
    fn from(legend: Legend) -> Self {
        match legend {
            Legend::UpperLeft => SeriesLabelPosition::UpperLeft,
            Legend::MiddleLeft => SeriesLabelPosition::MiddleLeft,
            Legend::LowerLeft => SeriesLabelPosition::LowerLeft,
            Legend::UpperRight => SeriesLabelPosition::UpperRight,
            Legend::MiddleRight => SeriesLabelPosition::MiddleRight,
            Legend::LowerRight => SeriesLabelPosition::LowerRight,
        }
    }
}

/// A labelled line, one point per thread count.
#[derive(Clone, Debug)]
pub struct Series {
    label: String,
    colour: RGBColor,
    points: Vec<(u32, f64)>,
}

impl Series {
    /// Pairs samples with thread counts in order. Extra values on either
    /// side are dropped.
    pub fn new(
        label: impl Into<String>,
        colour: RGBColor,
        threads: &[u32],
        samples: &[f64],
    ) -> Self {
        Self {
            label: label.into(),
            colour,
            points: threads
                .iter()
                .copied()
                .zip(samples.iter().copied())
                .collect(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn points(&self) -> &[(u32, f64)] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points that can be placed on the y axis. Infinite and NaN samples
    /// are left out.
    fn plottable(&self) -> impl Iterator<Item = (u32, f64)> + Clone + '_ {
        self.points.iter().copied().filter(|(_, y)| y.is_finite())
    }
}

pub struct LineChart {
    caption: String,
    x_desc: String,
    y_desc: String,
    size: (u32, u32),
    legend: Legend,
    series: Vec<Series>,
}

impl Default for LineChart {
    fn default() -> Self {
        Self::new()
    }
}

impl LineChart {
    pub fn new() -> Self {
        Self {
            caption: String::new(),
            x_desc: "Threads".to_owned(),
            y_desc: String::new(),
            size: (1080, 720),
            legend: Legend::UpperLeft,
            series: Vec::new(),
        }
    }

    pub fn caption(&mut self, caption: impl AsRef<str>) -> &mut Self {
        self.caption = caption.as_ref().to_owned();
        self
    }

    pub fn x_desc(&mut self, x_desc: impl AsRef<str>) -> &mut Self {
        self.x_desc = x_desc.as_ref().to_owned();
        self
    }

    pub fn y_desc(&mut self, y_desc: impl AsRef<str>) -> &mut Self {
        self.y_desc = y_desc.as_ref().to_owned();
        self
    }

    pub fn size(&mut self, size: (u32, u32)) -> &mut Self {
        self.size = size;
        self
    }

    pub fn legend(&mut self, position: Legend) -> &mut Self {
        self.legend = position;
        self
    }

    pub fn series(&mut self, series: Series) -> &mut Self {
        self.series.push(series);
        self
    }

    pub fn all_series(&self) -> &[Series] {
        &self.series
    }

    /// Upper bound of the y axis: 10% headroom over the largest sample.
    fn y_max(&self) -> f64 {
        let max = self
            .series
            .iter()
            .flat_map(|s| s.plottable().map(|(_, y)| y))
            .fold(0.0f64, f64::max);
        (max * 1.1).max(1.0)
    }

    fn x_max(&self) -> u32 {
        self.series
            .iter()
            .flat_map(|s| s.points.iter().map(|&(x, _)| x))
            .max()
            .unwrap_or(1)
    }

    /// Draw every series into an SVG file.
    pub fn render(&self, filename: impl AsRef<Path>) -> Result<(), Box<dyn Error>> {
        let root = SVGBackend::new(filename.as_ref(), self.size).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&self.caption, ("sans-serif", 40))
            .margin(20)
            .set_label_area_size(LabelAreaPosition::Left, 100)
            .set_label_area_size(LabelAreaPosition::Bottom, 60)
            .build_cartesian_2d(0u32..self.x_max() + 1, 0.0..self.y_max())?;

        chart
            .configure_mesh()
            .x_desc(&self.x_desc)
            .y_desc(&self.y_desc)
            .x_label_style(("sans-serif", 20))
            .y_label_style(("sans-serif", 20))
            .bold_line_style(palette::GRID.mix(0.4))
            .light_line_style(palette::GRID.mix(0.1))
            .draw()?;

        for series in &self.series {
            let colour = series.colour;
            chart
                .draw_series(
                    LineSeries::new(series.plottable(), colour.stroke_width(2))
                        .point_size(4),
                )?
                .label(series.label.as_str())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], colour.stroke_width(2))
                });
        }

        chart
            .configure_series_labels()
            .position(self.legend.into())
            .background_style(WHITE.filled())
            .border_style(BLACK)
            .draw()?;

        root.present()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THREADS: [u32; 4] = [1, 2, 4, 8];

    #[test]
    fn series_pairs_threads_with_samples() {
        let series = Series::new(
            "8B block size",
            palette::BLUE,
            &THREADS,
            &[1.5, 2.5, 3.5, 4.5],
        );
        assert_eq!(series.label(), "8B block size");
        assert_eq!(series.points(), &[(1, 1.5), (2, 2.5), (4, 3.5), (8, 4.5)]);

        let short = Series::new("short", palette::RED, &THREADS, &[7.0, 9.0]);
        assert_eq!(short.points(), &[(1, 7.0), (2, 9.0)]);

        let empty = Series::new("empty", palette::RED, &THREADS, &[]);
        assert!(empty.is_empty());
    }

    #[test]
    fn axis_bounds() {
        let mut chart = LineChart::new();
        assert_eq!(chart.x_max(), 1);
        assert_eq!(chart.y_max(), 1.0);

        chart
            .series(Series::new("a", palette::BLUE, &THREADS, &[10.0, 20.0]))
            .series(Series::new("b", palette::GREEN, &THREADS, &[5.0, 5.0, 5.0, 50.0]));
        assert_eq!(chart.x_max(), 8);
        assert!((chart.y_max() - 55.0).abs() < 1e-9);
    }

    #[test]
    fn non_finite_samples_are_not_plotted() {
        let mut chart = LineChart::new();
        chart.series(Series::new(
            "8B block size",
            palette::BLUE,
            &THREADS,
            &[f64::INFINITY, 10.0, f64::NAN, 20.0],
        ));
        assert!((chart.y_max() - 22.0).abs() < 1e-9);

        let path = std::env::temp_dir()
            .join(format!("throughputgraph-inf-{}.svg", std::process::id()));
        chart.render(&path).unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert!(svg.contains("8B block size"));
    }

    #[test]
    fn render_svg() {
        let path = std::env::temp_dir()
            .join(format!("throughputgraph-{}.svg", std::process::id()));

        let mut chart = LineChart::new();
        chart
            .caption("render test")
            .y_desc("MB/s")
            .legend(Legend::MiddleLeft)
            .series(Series::new(
                "8B block size",
                palette::BLUE,
                &THREADS,
                &[1.0, 2.0, 3.0, 4.0],
            ))
            .series(Series::new(
                "8KB block size",
                palette::PURPLE,
                &THREADS,
                &[4.0, 3.0],
            ));
        chart.render(&path).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert!(svg.contains("<svg"));
        assert!(svg.contains("8KB block size"));
    }
}
