//! Trajectory point sinks
//!
//! The driver streams samples through the [`PointSink`] trait and stays
//! agnostic to what happens on the other side: buffering for later
//! analysis, or direct density accumulation for rendering pipelines.

use glam::DVec2;

/// Receives trajectory samples in emission order. Returning `false` means
/// the sink can take no more points; the driver then stops the run with a
/// `SinkFull` termination.
pub trait PointSink {
    fn accept(&mut self, point: DVec2) -> bool;
}

/// A capacity-bounded sample buffer. Capacity is fixed at construction;
/// the driver never grows it.
#[derive(Debug, Clone, Default)]
pub struct SampleBuffer {
    points: Vec<DVec2>,
    capacity: usize,
}

impl SampleBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Forget buffered points, keeping the capacity. For reuse across runs.
    pub fn clear(&mut self) {
        self.points.clear();
    }
}

impl PointSink for SampleBuffer {
    fn accept(&mut self, point: DVec2) -> bool {
        if self.points.len() >= self.capacity {
            return false;
        }
        self.points.push(point);
        true
    }
}

/// Accumulates anti-aliased line coverage between consecutive samples into
/// a counts grid over a bounding box. Never refuses points.
#[derive(Debug, Clone)]
pub struct DensityGrid {
    nx: usize,
    ny: usize,
    counts: Vec<f64>,
    min: DVec2,
    max: DVec2,
    last: Option<DVec2>,
}

impl DensityGrid {
    /// `ppi` is pixels per world unit over the box `min..max`.
    pub fn new(ppi: f64, min: DVec2, max: DVec2) -> Self {
        let nx = (ppi * (max.x - min.x)) as usize;
        let ny = (ppi * (max.y - min.y)) as usize;
        Self {
            nx,
            ny,
            counts: vec![0.0; nx * ny],
            min,
            max,
            last: None,
        }
    }

    pub fn width(&self) -> usize {
        self.nx
    }

    pub fn height(&self) -> usize {
        self.ny
    }

    /// Row-major counts, `width * height` entries.
    pub fn counts(&self) -> &[f64] {
        &self.counts
    }

    /// Total accumulated intensity.
    pub fn total(&self) -> f64 {
        self.counts.iter().sum()
    }

    /// Start a fresh trajectory: the next accepted point begins a new
    /// polyline instead of connecting to the previous trajectory's end.
    pub fn break_path(&mut self) {
        self.last = None;
    }

    fn to_grid(&self, p: DVec2) -> DVec2 {
        DVec2::new(
            self.nx as f64 * (p.x - self.min.x) / (self.max.x - self.min.x),
            self.ny as f64 * (p.y - self.min.y) / (self.max.y - self.min.y),
        )
    }

    fn deposit(&mut self, x: i64, y: i64, intensity: f64) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.nx || y >= self.ny {
            return;
        }
        self.counts[x + y * self.nx] += intensity;
    }

    /// Xiaolin Wu's anti-aliased line, splitting coverage between the two
    /// pixels straddling the ideal line.
    pub fn plot_line(&mut self, p0: DVec2, p1: DVec2) {
        let g0 = self.to_grid(p0);
        let g1 = self.to_grid(p1);

        let steep = (g1.y - g0.y).abs() > (g1.x - g0.x).abs();
        let (mut x0, mut y0, mut x1, mut y1) = if steep {
            (g0.y, g0.x, g1.y, g1.x)
        } else {
            (g0.x, g0.y, g1.x, g1.y)
        };
        if x0 > x1 {
            std::mem::swap(&mut x0, &mut x1);
            std::mem::swap(&mut y0, &mut y1);
        }

        let dx = x1 - x0;
        let dy = y1 - y0;
        let gradient = if dx == 0.0 { 1.0 } else { dy / dx };

        let fpart = |v: f64| v - v.floor();
        let rfpart = |v: f64| 1.0 - fpart(v);

        // first endpoint
        let xend = x0.round();
        let yend = y0 + gradient * (xend - x0);
        let xgap = rfpart(x0 + 0.5);
        let xpxl1 = xend as i64;
        let ypxl1 = yend.floor() as i64;
        if steep {
            self.deposit(ypxl1, xpxl1, rfpart(yend) * xgap);
            self.deposit(ypxl1 + 1, xpxl1, fpart(yend) * xgap);
        } else {
            self.deposit(xpxl1, ypxl1, rfpart(yend) * xgap);
            self.deposit(xpxl1, ypxl1 + 1, fpart(yend) * xgap);
        }
        let mut intery = yend + gradient;

        // second endpoint
        let xend = x1.round();
        let yend = y1 + gradient * (xend - x1);
        let xgap = fpart(x1 + 0.5);
        let xpxl2 = xend as i64;
        let ypxl2 = yend.floor() as i64;
        if steep {
            self.deposit(ypxl2, xpxl2, rfpart(yend) * xgap);
            self.deposit(ypxl2 + 1, xpxl2, fpart(yend) * xgap);
        } else {
            self.deposit(xpxl2, ypxl2, rfpart(yend) * xgap);
            self.deposit(xpxl2, ypxl2 + 1, fpart(yend) * xgap);
        }

        for x in (xpxl1 + 1)..xpxl2 {
            if steep {
                self.deposit(intery.floor() as i64, x, rfpart(intery));
                self.deposit(intery.floor() as i64 + 1, x, fpart(intery));
            } else {
                self.deposit(x, intery.floor() as i64, rfpart(intery));
                self.deposit(x, intery.floor() as i64 + 1, fpart(intery));
            }
            intery += gradient;
        }
    }
}

impl PointSink for DensityGrid {
    fn accept(&mut self, point: DVec2) -> bool {
        if let Some(last) = self.last {
            self.plot_line(last, point);
        }
        self.last = Some(point);
        true
    }
}

/// Several density channels over the same bounding box, one active at a
/// time. Two-tone boards route each whole trajectory into a channel chosen
/// after the run (bounce parity), so [`select`](Self::select) wraps on the
/// channel count and takes raw counters.
#[derive(Debug, Clone)]
pub struct ChannelGrid {
    channels: Vec<DensityGrid>,
    active: usize,
}

impl ChannelGrid {
    /// `channels` independent planes, each `ppi` pixels per world unit over
    /// the box `min..max`. Zero channels is promoted to one.
    pub fn new(channels: usize, ppi: f64, min: DVec2, max: DVec2) -> Self {
        Self {
            channels: vec![DensityGrid::new(ppi, min, max); channels.max(1)],
            active: 0,
        }
    }

    pub fn channels(&self) -> usize {
        self.channels.len()
    }

    pub fn width(&self) -> usize {
        self.channels[0].width()
    }

    pub fn height(&self) -> usize {
        self.channels[0].height()
    }

    /// Route subsequent points into this channel, wrapping on the channel
    /// count so a bounce counter can be passed as-is.
    pub fn select(&mut self, channel: u64) {
        self.active = (channel % self.channels.len() as u64) as usize;
    }

    pub fn channel(&self, index: usize) -> &DensityGrid {
        &self.channels[index]
    }

    /// Start a fresh trajectory on every channel.
    pub fn break_path(&mut self) {
        for channel in &mut self.channels {
            channel.break_path();
        }
    }
}

impl PointSink for ChannelGrid {
    fn accept(&mut self, point: DVec2) -> bool {
        self.channels[self.active].accept(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_fills_to_capacity_then_refuses() {
        let mut buffer = SampleBuffer::with_capacity(2);
        assert!(buffer.accept(DVec2::new(0.0, 0.0)));
        assert!(buffer.accept(DVec2::new(1.0, 1.0)));
        assert!(!buffer.accept(DVec2::new(2.0, 2.0)));
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.points()[1], DVec2::new(1.0, 1.0));
    }

    #[test]
    fn buffer_clear_retains_capacity() {
        let mut buffer = SampleBuffer::with_capacity(1);
        assert!(buffer.accept(DVec2::ZERO));
        buffer.clear();
        assert!(buffer.is_empty());
        assert!(buffer.accept(DVec2::ZERO));
    }

    #[test]
    fn density_accumulates_along_a_segment() {
        let mut grid = DensityGrid::new(10.0, DVec2::ZERO, DVec2::new(10.0, 10.0));
        assert!(grid.accept(DVec2::new(1.0, 5.0)));
        assert!(grid.accept(DVec2::new(9.0, 5.0)));
        // a horizontal line 80 pixels long deposits on the order of its
        // length in total coverage
        let total = grid.total();
        assert!(total > 40.0, "total = {total}");
    }

    #[test]
    fn density_first_point_draws_nothing() {
        let mut grid = DensityGrid::new(10.0, DVec2::ZERO, DVec2::new(10.0, 10.0));
        assert!(grid.accept(DVec2::new(5.0, 5.0)));
        assert!(grid.total().abs() < 1e-12);
    }

    #[test]
    fn out_of_bounds_segments_are_clipped() {
        let mut grid = DensityGrid::new(10.0, DVec2::ZERO, DVec2::new(1.0, 1.0));
        grid.accept(DVec2::new(-5.0, -5.0));
        grid.accept(DVec2::new(-1.0, -1.0));
        assert!(grid.total().abs() < 1e-12);
    }

    #[test]
    fn channels_accumulate_independently() {
        let mut grid = ChannelGrid::new(2, 10.0, DVec2::ZERO, DVec2::new(10.0, 10.0));
        grid.select(0);
        grid.accept(DVec2::new(1.0, 2.0));
        grid.accept(DVec2::new(5.0, 2.0));
        grid.select(1);
        grid.break_path();
        grid.accept(DVec2::new(1.0, 7.0));
        grid.accept(DVec2::new(3.0, 7.0));
        let (a, b) = (grid.channel(0).total(), grid.channel(1).total());
        assert!(a > 0.0 && b > 0.0);
        // the first segment is twice as long as the second
        assert!(a > b, "a = {a}, b = {b}");
    }

    #[test]
    fn channel_selection_wraps_on_count() {
        let mut grid = ChannelGrid::new(2, 10.0, DVec2::ZERO, DVec2::new(10.0, 10.0));
        // an odd bounce count lands in channel 1
        grid.select(7);
        grid.accept(DVec2::new(1.0, 1.0));
        grid.accept(DVec2::new(2.0, 1.0));
        assert!(grid.channel(0).total().abs() < 1e-12);
        assert!(grid.channel(1).total() > 0.0);
    }

    #[test]
    fn break_path_separates_trajectories() {
        let mut grid = DensityGrid::new(10.0, DVec2::ZERO, DVec2::new(10.0, 10.0));
        grid.accept(DVec2::new(1.0, 1.0));
        grid.accept(DVec2::new(2.0, 1.0));
        let after_first = grid.total();
        grid.break_path();
        grid.accept(DVec2::new(8.0, 8.0));
        // no segment drawn from (2,1) to (8,8)
        assert!((grid.total() - after_first).abs() < 1e-12);
    }
}
