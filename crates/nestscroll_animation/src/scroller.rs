//! Vertical over-scroller
//!
//! Computes scroll positions over time for two kinds of animation:
//!
//! - **Fling**: a spline-shaped deceleration seeded by a release velocity.
//!   Distance and duration follow a friction model scaled by screen density,
//!   so a given finger speed travels the same physical distance on every
//!   device.
//! - **Spring-back**: a cubic ease from an out-of-range position back to the
//!   nearest bound.
//!
//! The scroller never reads a clock. Callers pass the host's frame time in
//! milliseconds, which keeps every animation deterministic under test.

use std::sync::OnceLock;

/// Standard gravity, m/s²
const GRAVITY_EARTH: f64 = 9.80665;
const INCHES_PER_METER: f64 = 39.37;
/// Tuning factor applied on top of the physical model
const PHYSICAL_COEF_TUNING: f64 = 0.84;
/// Dots per inch at density 1.0
const BASELINE_DPI: f64 = 160.0;

const INFLEXION: f64 = 0.35;
const START_TENSION: f64 = 0.5;
const END_TENSION: f64 = 1.0;
const P1: f64 = START_TENSION * INFLEXION;
const P2: f64 = 1.0 - END_TENSION * (1.0 - INFLEXION);

const NB_SAMPLES: usize = 100;

/// Constant deceleration used by spring-back, px/s²
const SPRING_BACK_GRAVITY: f64 = 2000.0;

/// Default fling friction
pub const DEFAULT_SCROLL_FRICTION: f64 = 0.015;

fn deceleration_rate() -> f64 {
    0.78f64.ln() / 0.9f64.ln()
}

/// Normalized spline positions sampled at `NB_SAMPLES + 1` evenly spaced times
fn spline_positions() -> &'static [f64; NB_SAMPLES + 1] {
    static TABLE: OnceLock<[f64; NB_SAMPLES + 1]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = [0.0; NB_SAMPLES + 1];
        let mut x_min = 0.0f64;
        for (i, slot) in table.iter_mut().take(NB_SAMPLES).enumerate() {
            let alpha = i as f64 / NB_SAMPLES as f64;
            let mut x_max = 1.0f64;
            // Bisect for the curve parameter whose time coordinate is `alpha`
            let (x, coef) = loop {
                let x = x_min + (x_max - x_min) / 2.0;
                let coef = 3.0 * x * (1.0 - x);
                let tx = coef * ((1.0 - x) * P1 + x * P2) + x * x * x;
                if (tx - alpha).abs() < 1e-5 {
                    break (x, coef);
                }
                if tx > alpha {
                    x_max = x;
                } else {
                    x_min = x;
                }
            };
            *slot = coef * ((1.0 - x) * START_TENSION + x) + x * x * x;
        }
        table[NB_SAMPLES] = 1.0;
        table
    })
}

/// Which curve the scroller is following
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollerMode {
    #[default]
    Spline,
    SpringBack,
}

/// Vertical fling / spring-back animator
#[derive(Debug, Clone)]
pub struct OverScroller {
    mode: ScrollerMode,
    finished: bool,
    start: i32,
    final_y: i32,
    curr: i32,
    /// Initial velocity of the current animation, px/s
    velocity: f64,
    /// Most recently computed velocity, px/s
    curr_velocity: f64,
    start_time: u64,
    /// Duration in milliseconds
    duration: u64,
    spline_distance: i32,
    /// Spring-back travel distance
    over: i32,
    friction: f64,
    physical_coeff: f64,
}

impl Default for OverScroller {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl OverScroller {
    /// Create a scroller for a screen with the given density
    /// (pixels per density-independent pixel)
    pub fn new(density: f64) -> Self {
        let ppi = density * BASELINE_DPI;
        Self {
            mode: ScrollerMode::Spline,
            finished: true,
            start: 0,
            final_y: 0,
            curr: 0,
            velocity: 0.0,
            curr_velocity: 0.0,
            start_time: 0,
            duration: 0,
            spline_distance: 0,
            over: 0,
            friction: DEFAULT_SCROLL_FRICTION,
            physical_coeff: GRAVITY_EARTH * INCHES_PER_METER * ppi * PHYSICAL_COEF_TUNING,
        }
    }

    /// Set the friction applied to flings
    pub fn set_friction(&mut self, friction: f64) {
        self.friction = friction;
    }

    pub fn mode(&self) -> ScrollerMode {
        self.mode
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Position computed by the last [`compute_scroll_offset`](Self::compute_scroll_offset)
    pub fn curr_y(&self) -> i32 {
        self.curr
    }

    /// Where the current animation will end
    pub fn final_y(&self) -> i32 {
        self.final_y
    }

    pub fn start_y(&self) -> i32 {
        self.start
    }

    /// Duration of the current animation in milliseconds
    pub fn duration(&self) -> u64 {
        self.duration
    }

    /// Magnitude of the most recently computed velocity, px/s
    pub fn curr_velocity(&self) -> f64 {
        self.curr_velocity.abs()
    }

    fn spline_deceleration(&self, velocity: f64) -> f64 {
        (INFLEXION * velocity.abs() / (self.friction * self.physical_coeff)).ln()
    }

    /// Total distance a fling at `velocity` travels before stopping
    pub fn spline_fling_distance(&self, velocity: f64) -> f64 {
        if velocity == 0.0 {
            return 0.0;
        }
        let l = self.spline_deceleration(velocity);
        let decel = deceleration_rate();
        self.friction * self.physical_coeff * (decel / (decel - 1.0) * l).exp()
    }

    /// Duration in milliseconds of a fling at `velocity`
    pub fn spline_fling_duration(&self, velocity: f64) -> u64 {
        if velocity == 0.0 {
            return 0;
        }
        let l = self.spline_deceleration(velocity);
        (1000.0 * (l / (deceleration_rate() - 1.0)).exp()) as u64
    }

    /// Start a fling from `start` at `velocity` px/s.
    ///
    /// The target is unbounded; callers clamp positions when applying them.
    pub fn fling(&mut self, start: i32, velocity: f64, now_ms: u64) {
        self.mode = ScrollerMode::Spline;
        self.finished = false;
        self.velocity = velocity;
        self.curr_velocity = velocity;
        self.start = start;
        self.curr = start;
        self.start_time = now_ms;
        self.duration = self.spline_fling_duration(velocity);

        let distance = self.spline_fling_distance(velocity);
        self.spline_distance = if velocity < 0.0 {
            -(distance as i32)
        } else {
            distance as i32
        };
        self.final_y = start.saturating_add(self.spline_distance);

        tracing::debug!(
            "fling start={} velocity={:.1} distance={} duration={}ms",
            start,
            velocity,
            self.spline_distance,
            self.duration
        );
    }

    /// Stop any animation and, if `start` is outside `[min, max]`, begin a
    /// spring back to the nearest bound.
    ///
    /// Returns true if a spring-back animation was started.
    pub fn spring_back(&mut self, start: i32, min: i32, max: i32, now_ms: u64) -> bool {
        self.finished = true;
        self.start = start;
        self.final_y = start;
        self.curr = start;
        self.velocity = 0.0;
        self.start_time = now_ms;
        self.duration = 0;

        if start < min {
            self.start_spring_back(start, min);
        } else if start > max {
            self.start_spring_back(start, max);
        }

        !self.finished
    }

    fn start_spring_back(&mut self, start: i32, end: i32) {
        self.mode = ScrollerMode::SpringBack;
        self.finished = false;
        self.start = start;
        self.curr = start;
        self.final_y = end;

        let delta = (start - end) as f64;
        let deceleration = if delta > 0.0 {
            -SPRING_BACK_GRAVITY
        } else {
            SPRING_BACK_GRAVITY
        };
        self.velocity = -delta;
        self.over = (start - end).abs();
        self.duration = (1000.0 * (-2.0 * delta / deceleration).sqrt()) as u64;

        tracing::debug!(
            "spring back {} -> {} over {}ms",
            start,
            end,
            self.duration
        );
    }

    /// Advance to `now_ms`. Returns true while the animation has not yet
    /// reported its final position.
    pub fn compute_scroll_offset(&mut self, now_ms: u64) -> bool {
        if self.finished {
            return false;
        }

        let elapsed = now_ms.saturating_sub(self.start_time);
        if elapsed == 0 {
            if self.duration == 0 {
                self.finish();
            }
        } else if elapsed > self.duration {
            self.finish();
        } else {
            self.update(elapsed);
        }
        true
    }

    fn update(&mut self, elapsed: u64) {
        let distance = match self.mode {
            ScrollerMode::Spline => {
                let t = elapsed as f64 / self.duration as f64;
                let index = (NB_SAMPLES as f64 * t) as usize;
                let mut distance_coef = 1.0;
                let mut velocity_coef = 0.0;
                if index < NB_SAMPLES {
                    let table = spline_positions();
                    let t_inf = index as f64 / NB_SAMPLES as f64;
                    let t_sup = (index + 1) as f64 / NB_SAMPLES as f64;
                    let d_inf = table[index];
                    let d_sup = table[index + 1];
                    velocity_coef = (d_sup - d_inf) / (t_sup - t_inf);
                    distance_coef = d_inf + (t - t_inf) * velocity_coef;
                }

                self.curr_velocity =
                    velocity_coef * self.spline_distance as f64 / self.duration as f64 * 1000.0;
                distance_coef * self.spline_distance as f64
            }
            ScrollerMode::SpringBack => {
                let t = elapsed as f64 / self.duration as f64;
                let t2 = t * t;
                let sign = if self.velocity < 0.0 { -1.0 } else { 1.0 };
                let over = self.over as f64;
                self.curr_velocity = sign * over * 6.0 * (-t + t2);
                sign * over * (3.0 * t2 - 2.0 * t * t2)
            }
        };

        self.curr = self.start.saturating_add(distance.round() as i32);
    }

    fn finish(&mut self) {
        self.curr = self.final_y;
        self.finished = true;
    }

    /// Stop the animation. The internal position jumps to the final value;
    /// nothing is applied to any host.
    pub fn abort(&mut self) {
        self.finish();
    }
}
