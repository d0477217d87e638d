/// Deformable ground.
///
/// The ground is a single closed polygon: the top edge runs left to right
/// along the surface, then the outline drops to the bottom of the world and
/// returns along it. Craters are cut by replacing a span of top-edge points
/// with a short V-shaped run of new points, so an edit costs
/// `O(steepness)` point churn instead of a full heightmap rebuild.

use rand::Rng;

use crate::config::{TerrainTuning, WorldTuning};
use crate::entities::Point;
use crate::render::{Canvas, Color, RenderError};

#[derive(Clone, Debug)]
pub struct Terrain {
    points: Vec<Point>,
    ground_y: f32,
    steepness: usize,
    surface_tolerance: f32,
}

impl Terrain {
    /// Flat profile: eleven surface points spaced `width / 10` apart,
    /// followed by the corners of the base.
    pub fn new(world: &WorldTuning, tuning: &TerrainTuning) -> Self {
        let width = world.width.max(1.0) as i32;
        let ground_y = world.height - tuning.asl;
        let step = (width / 10).max(1) as usize;

        let mut points: Vec<Point> = (0..=width)
            .step_by(step)
            .map(|x| Point::new(x as f32, ground_y))
            .collect();
        let (w, h) = (width as f32, world.height);
        points.extend([
            Point::new(w, ground_y),
            Point::new(w, h),
            Point::new(w, h),
            Point::new(0.0, h),
            Point::new(0.0, h),
        ]);

        Self {
            points,
            ground_y,
            steepness: tuning.steepness,
            surface_tolerance: tuning.surface_tolerance,
        }
    }

    /// Build from an explicit outline.
    pub fn from_points(points: Vec<Point>, ground_y: f32, tuning: &TerrainTuning) -> Self {
        Self {
            points,
            ground_y,
            steepness: tuning.steepness,
            surface_tolerance: tuning.surface_tolerance,
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The undisturbed surface line.
    pub fn ground_y(&self) -> f32 {
        self.ground_y
    }

    /// Cut a crater centred on `(x, y)`.
    ///
    /// Returns `false` and leaves the outline untouched when the impact is
    /// above the surface line. Removal is best-effort: a span that no longer
    /// fits the outline is clamped or skipped, never an error.
    pub fn destroy(&mut self, x: f32, y: f32, radius: i32, rng: &mut impl Rng) -> bool {
        if y < self.ground_y - self.surface_tolerance {
            return false;
        }
        let r = pick_radius(radius, rng) as f32;
        let (Some(left), Some(right)) = (self.nearest_index(x - r), self.nearest_index(x + r))
        else {
            return false;
        };
        let removed = self.remove_span(left, right);

        let depth = r + rng.gen_range(1..=3) as f32 - 10.0;
        let crater = crater_points(x, y, r, depth, self.steepness, rng);
        let at = left.min(self.points.len());
        self.points.splice(at..at, crater);

        tracing::debug!(x, y, radius = r, depth, removed, points = self.points.len(), "terrain crater");
        true
    }

    /// Index of the point whose x is closest to `target`; ties keep the first.
    fn nearest_index(&self, target: f32) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (i, p) in self.points.iter().enumerate() {
            let d = (p.x - target).abs();
            match best {
                Some((_, bd)) if d >= bd => {}
                _ => best = Some((i, d)),
            }
        }
        best.map(|(i, _)| i)
    }

    /// Remove `first..=last`, clamped to the outline. Returns how many went.
    fn remove_span(&mut self, first: usize, last: usize) -> usize {
        if first > last || first >= self.points.len() {
            return 0;
        }
        let end = (last + 1).min(self.points.len());
        self.points.drain(first..end).count()
    }

    /// Even-odd test against the outline.
    pub fn contains(&self, p: Point) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let (a, b) = (self.points[i], self.points[j]);
            if (a.y > p.y) != (b.y > p.y) {
                let cross_x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if p.x < cross_x {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    pub fn draw(&self, canvas: &mut impl Canvas) -> Result<(), RenderError> {
        canvas.fill_polygon(&self.points, Color::Grey)
    }
}

/// Actual radius in `[radius - 10, radius)`, never below 1.
fn pick_radius(radius: i32, rng: &mut impl Rng) -> i32 {
    if radius <= 1 {
        return radius.max(0);
    }
    rng.gen_range((radius - 10).max(1)..radius)
}

/// `steepness` points from the left rim, down to the floor at
/// `(x, y + depth)`, and back up to the right rim. Slope points drop
/// quadratically toward the floor and each rim gets a 3–5 px jitter.
fn crater_points(
    x: f32,
    y: f32,
    r: f32,
    depth: f32,
    steepness: usize,
    rng: &mut impl Rng,
) -> Vec<Point> {
    let half = steepness / 2;
    (0..steepness)
        .map(|k| {
            if k == half {
                return Point::new(x, y + depth);
            }
            let (side, rank) = if k < half {
                (-1.0, k)
            } else {
                (1.0, steepness - 1 - k)
            };
            let frac = rank as f32 / half as f32;
            let jitter = rng.gen_range(3..=5) as f32;
            Point::new(
                x + side * (r + jitter) * (1.0 - frac),
                y + depth * frac * frac,
            )
        })
        .collect()
}
