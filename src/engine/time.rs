use std::time::Instant;

/// Longest frame delta the simulation will integrate. A stalled tab or a
/// debugger pause otherwise shows up as one enormous step.
pub const MAX_FRAME_DT: f32 = 0.05;

pub struct FrameTimer {
    last: Instant,
    pub dt: f32,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            dt: 0.0,
        }
    }

    pub fn tick(&mut self) {
        let now = Instant::now();
        self.dt = now.duration_since(self.last).as_secs_f32().min(MAX_FRAME_DT);
        self.last = now;
    }
}
