use quill_engine::input::Key;

/// Fixed phase increment per frame.
pub const FIXED_STEP: f32 = 1.0 / 60.0;

/// How the animation phase advances each frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum AnimationStep {
    /// Constant increment per frame, independent of wall time. Speed follows
    /// the display refresh rate.
    Fixed(f32),
    /// Advance by the measured frame time.
    Elapsed,
}

impl AnimationStep {
    /// Phase increment for a frame that took `dt` seconds.
    pub fn increment(self, dt: f32) -> f32 {
        match self {
            AnimationStep::Fixed(step) => step,
            AnimationStep::Elapsed => dt,
        }
    }
}

impl Default for AnimationStep {
    fn default() -> Self {
        AnimationStep::Fixed(FIXED_STEP)
    }
}

#[derive(Debug, Clone)]
pub struct DemoConfig {
    /// Held down, stops the loop.
    pub exit_key: Key,
    pub animation: AnimationStep,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            exit_key: Key::Escape,
            animation: AnimationStep::default(),
        }
    }
}

impl DemoConfig {
    /// Reads overrides from the environment.
    ///
    /// `QUILL_ANIMATION=elapsed` switches to wall-clock animation.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(v) = std::env::var("QUILL_ANIMATION") {
            config.animation = parse_animation(&v).unwrap_or_else(|| {
                log::warn!("QUILL_ANIMATION={v:?} not recognized; using fixed step");
                AnimationStep::default()
            });
        }
        config
    }
}

fn parse_animation(value: &str) -> Option<AnimationStep> {
    match value.trim().to_ascii_lowercase().as_str() {
        "fixed" => Some(AnimationStep::default()),
        "elapsed" => Some(AnimationStep::Elapsed),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_step_ignores_frame_time() {
        let step = AnimationStep::default();
        assert_eq!(step.increment(0.5), FIXED_STEP);
        assert_eq!(step.increment(0.001), FIXED_STEP);
    }

    #[test]
    fn elapsed_step_follows_frame_time() {
        assert_eq!(AnimationStep::Elapsed.increment(0.02), 0.02);
    }

    #[test]
    fn animation_names_parse() {
        assert_eq!(parse_animation("Elapsed"), Some(AnimationStep::Elapsed));
        assert_eq!(parse_animation(" fixed "), Some(AnimationStep::Fixed(FIXED_STEP)));
        assert_eq!(parse_animation("wobbly"), None);
    }

    #[test]
    fn escape_exits_by_default() {
        assert_eq!(DemoConfig::default().exit_key, Key::Escape);
    }
}
