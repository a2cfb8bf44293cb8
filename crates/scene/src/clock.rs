/// Fixed simulation timestep: 60 updates per second.
pub const TIMESTEP: f64 = 1.0 / 60.0;

/// Cap on wall-clock catch-up per frame. Prevents the spiral of death after
/// a long stall: at most 0.1 s of simulation is replayed in one advance.
pub const MAX_CATCH_UP: f64 = 0.1;

/// Fixed-timestep clock with an accumulator.
///
/// Wall time is fed in each frame; whole 1/60 s steps are drained from the
/// accumulator. While paused, steps still drain (so no backlog builds up)
/// but simulation time does not advance.
#[derive(Debug, Clone)]
pub struct SimulationClock {
    accumulator: f64,
    time: f64,
    paused: bool,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationClock {
    pub fn new() -> Self {
        Self {
            accumulator: 0.0,
            time: 0.0,
            paused: false,
        }
    }

    /// Simulation time in seconds.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn toggle_paused(&mut self) {
        self.paused = !self.paused;
    }

    /// Feed `elapsed` wall-clock seconds into the accumulator and drain
    /// whole fixed steps. Returns the number of steps taken.
    pub fn advance(&mut self, elapsed: f64) -> u32 {
        self.accumulator += elapsed.min(MAX_CATCH_UP);
        let mut steps = 0;
        while self.accumulator >= TIMESTEP {
            if !self.paused {
                self.time += TIMESTEP;
            }
            self.accumulator -= TIMESTEP;
            steps += 1;
        }
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_match_elapsed_time() {
        let mut clock = SimulationClock::new();
        let steps = clock.advance(TIMESTEP * 3.0 + 1e-9);
        assert_eq!(steps, 3);
        assert!((clock.time() - TIMESTEP * 3.0).abs() < 1e-9);
    }

    #[test]
    fn sub_step_elapsed_takes_no_step() {
        let mut clock = SimulationClock::new();
        assert_eq!(clock.advance(TIMESTEP * 0.5), 0);
        assert_eq!(clock.time(), 0.0);
        // Remainder carries over into the next frame.
        assert_eq!(clock.advance(TIMESTEP * 0.6), 1);
    }

    #[test]
    fn catch_up_is_capped() {
        let mut clock = SimulationClock::new();
        let steps = clock.advance(10.0);
        let max_steps = (MAX_CATCH_UP / TIMESTEP).floor() as u32;
        assert!(steps <= max_steps);
    }

    #[test]
    fn paused_drains_without_advancing_time() {
        let mut clock = SimulationClock::new();
        clock.set_paused(true);
        let steps = clock.advance(TIMESTEP * 4.0 + 1e-9);
        assert_eq!(steps, 4);
        assert_eq!(clock.time(), 0.0);

        clock.toggle_paused();
        assert!(!clock.is_paused());
        clock.advance(TIMESTEP + 1e-9);
        assert!(clock.time() > 0.0);
    }
}
