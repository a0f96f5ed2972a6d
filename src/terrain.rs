use rand::Rng;

pub(crate) mod defaults {
    pub const SEGMENT_COUNT: usize = 20;
    pub const PAD_SEGMENTS: usize = 3;
    // vertical band of the world the surface may occupy (y grows downward)
    pub const BAND_TOP: f64 = 0.55;
    pub const BAND_BOTTOM: f64 = 0.92;
    // samples stay in the upper fraction of the band, pads in the lower
    pub const SAMPLE_SPAN: f64 = 0.88;
    pub const PAD_DEPTH_MIN: f64 = 0.7;
    pub const PAD_DEPTH_SPAN: f64 = 0.2;
    pub const EDGE_RISE: f64 = 20.;
    pub const EDGE_DROP: f64 = 30.;
}

/// Where to put the landing pad along the map.
#[derive(Clone, Copy, Debug, Default)]
pub enum PadPlacement {
    /// Pad centered as close as possible to this world x.
    CenterX(f64),
    /// Pad center drawn from a fractional range of the map width.
    Fraction { min: f64, max: f64 },
    /// Pad center drawn from the middle third of the map.
    #[default]
    MiddleThird,
}

#[derive(Clone, Copy, Debug)]
pub struct TerrainOptions {
    segment_count: usize,
    pad_segments: usize,
    placement: PadPlacement,
}

impl Default for TerrainOptions {
    fn default() -> Self {
        Self {
            segment_count: defaults::SEGMENT_COUNT,
            pad_segments: defaults::PAD_SEGMENTS,
            placement: PadPlacement::default(),
        }
    }
}

impl TerrainOptions {
    pub fn with_segment_count(self, segment_count: usize) -> Self {
        Self {
            segment_count: segment_count.max(3),
            ..self
        }
    }

    pub fn with_pad_segments(self, pad_segments: usize) -> Self {
        Self {
            pad_segments,
            ..self
        }
    }

    pub fn with_placement(self, placement: PadPlacement) -> Self {
        Self { placement, ..self }
    }

    pub fn segment_count(&self) -> usize {
        self.segment_count
    }

    pub fn pad_segments(&self) -> usize {
        self.pad_segments
    }

    pub fn placement(&self) -> PadPlacement {
        self.placement
    }
}

/// The flat stretch of surface that counts as a valid landing target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pad {
    pub x1: f64,
    pub x2: f64,
    pub y: f64,
}

impl Pad {
    pub fn center_x(&self) -> f64 {
        (self.x1 + self.x2) / 2.
    }

    pub fn half_width(&self) -> f64 {
        (self.x2 - self.x1) / 2.
    }

    pub fn contains_x(&self, x: f64) -> bool {
        self.x1 <= x && x <= self.x2
    }
}

#[derive(Clone, Copy, Debug)]
struct Segment {
    y0: f64,
    slope: f64,
}

/// Piecewise-linear heightfield with an embedded flat pad. Generated once
/// per episode, queried read-only afterwards.
#[derive(Clone, Debug)]
pub struct Terrain {
    width: f64,
    spacing: f64,
    ys: Vec<f64>,
    segments: Vec<Segment>,
    pad: Pad,
}

impl Terrain {
    pub fn generate(width: f64, height: f64, options: TerrainOptions, rng: &mut impl Rng) -> Self {
        let n = options.segment_count;
        let spacing = width / n as f64;

        let band_top = height * defaults::BAND_TOP;
        let band = height * defaults::BAND_BOTTOM - band_top;

        let mut ys: Vec<f64> = (0..=n)
            .map(|_| band_top + rng.gen::<f64>() * defaults::SAMPLE_SPAN * band)
            .collect();

        // pad span in segment units, always leaving a sloped segment on each side
        let pad_segments = options.pad_segments.clamp(1, n - 2);
        let center = match options.placement {
            PadPlacement::CenterX(x) => (x.clamp(0., width) / spacing).round() as usize,
            PadPlacement::Fraction { min, max } => {
                let lo = min.clamp(0., 1.);
                let hi = max.clamp(0., 1.).max(lo);
                (rng.gen_range(lo..=hi) * n as f64).round() as usize
            }
            PadPlacement::MiddleThird => {
                (rng.gen_range(1. / 3.0..2. / 3.0) * n as f64).round() as usize
            }
        };
        let start = center
            .saturating_sub(pad_segments / 2)
            .clamp(1, n - pad_segments - 1);
        let end = start + pad_segments;

        let pad_y = band_top
            + (defaults::PAD_DEPTH_MIN + rng.gen::<f64>() * defaults::PAD_DEPTH_SPAN) * band;
        for y in &mut ys[start..=end] {
            *y = pad_y;
        }
        // keep the slopes next to the pad within a climbable band
        ys[start - 1] = ys[start - 1].clamp(pad_y - defaults::EDGE_RISE, pad_y + defaults::EDGE_DROP);
        ys[end + 1] = ys[end + 1].clamp(pad_y - defaults::EDGE_RISE, pad_y + defaults::EDGE_DROP);

        let segments = ys
            .windows(2)
            .map(|w| Segment {
                y0: w[0],
                slope: (w[1] - w[0]) / spacing,
            })
            .collect();

        Self {
            width,
            spacing,
            ys,
            segments,
            pad: Pad {
                x1: start as f64 * spacing,
                x2: end as f64 * spacing,
                y: pad_y,
            },
        }
    }

    /// Surface y at world x. x is clamped into the map, so the query is
    /// total; interpolation is linear within the containing segment.
    pub fn height_at(&self, x: f64) -> f64 {
        let x = x.clamp(0., self.width);
        let i = ((x / self.spacing) as usize).min(self.segments.len() - 1);
        let segment = &self.segments[i];
        segment.y0 + segment.slope * (x - i as f64 * self.spacing)
    }

    pub fn pad(&self) -> &Pad {
        &self.pad
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn iter_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.ys
            .iter()
            .enumerate()
            .map(|(i, &y)| (i as f64 * self.spacing, y))
    }
}
