//! Animation targets and timing profiles.

use crate::model::space::{SpaceId, TodoId};
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Visual element an animation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationTarget {
    /// Application root.
    App,
    /// Persistence on/off switch knob.
    PersistenceToggle,
    /// Card of one space.
    Space(SpaceId),
    /// Every space card.
    AllSpaces,
    /// Row of one todo.
    Todo(TodoId),
    /// Every todo row inside one space.
    TodosIn(SpaceId),
    /// Most recently appended todo row inside one space.
    LastTodoIn(SpaceId),
}

impl AnimationTarget {
    /// Element selector understood by document-based sequencers.
    pub fn selector(&self) -> String {
        match self {
            Self::App => "#app".to_string(),
            Self::PersistenceToggle => "#localStorageToggle".to_string(),
            Self::Space(id) => format!("#space-{id}"),
            Self::AllSpaces => ".space".to_string(),
            Self::Todo(id) => format!("#todo-{id}"),
            Self::TodosIn(id) => format!("#space-{id} li"),
            Self::LastTodoIn(id) => format!("#space-{id} li:last-child"),
        }
    }
}

impl Display for AnimationTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.selector())
    }
}

/// Easing curve family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Power2In,
    Power2Out,
    Power2InOut,
    Power3In,
    Power3Out,
}

impl Easing {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Power2In => "power2.in",
            Self::Power2Out => "power2.out",
            Self::Power2InOut => "power2.inOut",
            Self::Power3In => "power3.in",
            Self::Power3Out => "power3.out",
        }
    }
}

/// Whether the animated properties are the start or the end state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Animate from the given values to the element's natural state.
    From,
    /// Animate from the natural state to the given values.
    To,
}

/// Timing and property deltas of one transition.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationProfile {
    pub direction: Direction,
    pub duration: Duration,
    pub easing: Easing,
    pub opacity: Option<f32>,
    /// Horizontal offset in pixels.
    pub x: Option<f32>,
    /// Vertical offset in pixels.
    pub y: Option<f32>,
    pub scale: Option<f32>,
    /// Delay between consecutive elements of a multi-element target.
    pub stagger: Option<Duration>,
    /// Play forward then backward this many extra times.
    pub yoyo_repeat: u32,
}

impl AnimationProfile {
    fn new(direction: Direction, duration_ms: u64, easing: Easing) -> Self {
        Self {
            direction,
            duration: Duration::from_millis(duration_ms),
            easing,
            opacity: None,
            x: None,
            y: None,
            scale: None,
            stagger: None,
            yoyo_repeat: 0,
        }
    }

    fn staggered(mut self, stagger_ms: u64) -> Self {
        self.stagger = Some(Duration::from_millis(stagger_ms));
        self
    }

    /// Initial fade-in of the application root.
    pub fn app_fade_in() -> Self {
        Self {
            opacity: Some(1.0),
            ..Self::new(Direction::To, 1000, Easing::Power2Out)
        }
    }

    /// Entrance of a newly added space card.
    pub fn space_entrance() -> Self {
        Self {
            opacity: Some(0.0),
            y: Some(30.0),
            ..Self::new(Direction::From, 600, Easing::Power3Out)
        }
    }

    /// Entrance of restored space cards at startup.
    pub fn spaces_batch_entrance() -> Self {
        Self::space_entrance().staggered(150)
    }

    /// Entrance of a newly added todo row.
    pub fn todo_entrance() -> Self {
        Self {
            opacity: Some(0.0),
            x: Some(-20.0),
            ..Self::new(Direction::From, 400, Easing::Power2Out)
        }
    }

    /// Short scale pulse played when a todo is toggled.
    pub fn todo_pulse() -> Self {
        Self {
            scale: Some(1.05),
            yoyo_repeat: 1,
            ..Self::new(Direction::To, 200, Easing::Power2InOut)
        }
    }

    /// Slide of the persistence switch knob.
    pub fn persistence_switch(enabled: bool) -> Self {
        Self {
            x: Some(if enabled { 20.0 } else { 0.0 }),
            ..Self::new(Direction::To, 300, Easing::Power2InOut)
        }
    }

    /// Exit of one todo row.
    pub fn todo_exit() -> Self {
        Self {
            opacity: Some(0.0),
            x: Some(20.0),
            ..Self::new(Direction::To, 400, Easing::Power2In)
        }
    }

    /// Exit of every todo row in one space.
    pub fn todos_clear_exit() -> Self {
        Self::todo_exit().staggered(100)
    }

    /// Exit of one space card.
    pub fn space_exit() -> Self {
        Self {
            opacity: Some(0.0),
            y: Some(-30.0),
            ..Self::new(Direction::To, 600, Easing::Power3In)
        }
    }

    /// Exit of every space card.
    pub fn spaces_clear_exit() -> Self {
        Self::space_exit().staggered(100)
    }

    /// Upper bound of wall time for `element_count` elements, including
    /// stagger and yoyo repetitions.
    pub fn total_duration(&self, element_count: usize) -> Duration {
        let passes = 1 + self.yoyo_repeat;
        let single = self.duration * passes;
        match (self.stagger, element_count) {
            (Some(stagger), count) if count > 1 => {
                let extra = u32::try_from(count - 1).unwrap_or(u32::MAX);
                single + stagger.saturating_mul(extra)
            }
            _ => single,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AnimationProfile, AnimationTarget, Direction, Easing};
    use std::time::Duration;
    use uuid::Uuid;

    #[test]
    fn selectors_follow_document_ids() {
        let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").expect("valid uuid");
        assert_eq!(
            AnimationTarget::Space(id).selector(),
            "#space-11111111-2222-4333-8444-555555555555"
        );
        assert_eq!(
            AnimationTarget::TodosIn(id).selector(),
            "#space-11111111-2222-4333-8444-555555555555 li"
        );
        assert_eq!(AnimationTarget::AllSpaces.to_string(), ".space");
    }

    #[test]
    fn exits_animate_towards_transparent() {
        for profile in [
            AnimationProfile::todo_exit(),
            AnimationProfile::space_exit(),
            AnimationProfile::spaces_clear_exit(),
        ] {
            assert_eq!(profile.direction, Direction::To);
            assert_eq!(profile.opacity, Some(0.0));
        }
    }

    #[test]
    fn total_duration_accounts_for_stagger_and_yoyo() {
        let clear = AnimationProfile::todos_clear_exit();
        assert_eq!(clear.total_duration(1), Duration::from_millis(400));
        assert_eq!(clear.total_duration(3), Duration::from_millis(600));

        let pulse = AnimationProfile::todo_pulse();
        assert_eq!(pulse.total_duration(1), Duration::from_millis(400));
    }

    #[test]
    fn easing_names_use_dotted_curve_notation() {
        assert_eq!(AnimationProfile::todo_exit().easing.as_str(), "power2.in");
        assert_eq!(Easing::Power2InOut.as_str(), "power2.inOut");
        assert_eq!(AnimationProfile::space_exit().easing.as_str(), "power3.in");
    }
}
