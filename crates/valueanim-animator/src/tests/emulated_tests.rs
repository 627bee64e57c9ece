use std::cell::RefCell;
use std::rc::Rc;

use valueanim_testing::TestRuntime;

use crate::prelude::*;
use crate::{AnimatorDefaults, AnimatorError, RunState};

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Start,
    Update(f32),
    End,
    Cancel,
    Repeat,
}

#[derive(Default)]
struct Recorder {
    events: RefCell<Vec<Event>>,
}

impl Recorder {
    fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    fn count(&self, wanted: &Event) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|event| std::mem::discriminant(*event) == std::mem::discriminant(wanted))
            .count()
    }

    fn lifecycle(&self) -> Vec<Event> {
        self.events
            .borrow()
            .iter()
            .filter(|event| !matches!(event, Event::Update(_)))
            .cloned()
            .collect()
    }
}

impl AnimatorListener for Recorder {
    fn on_animation_start(&self, _animator: &dyn ValueAnimator) {
        self.events.borrow_mut().push(Event::Start);
    }

    fn on_animation_end(&self, _animator: &dyn ValueAnimator) {
        self.events.borrow_mut().push(Event::End);
    }

    fn on_animation_cancel(&self, _animator: &dyn ValueAnimator) {
        self.events.borrow_mut().push(Event::Cancel);
    }

    fn on_animation_repeat(&self, _animator: &dyn ValueAnimator) {
        self.events.borrow_mut().push(Event::Repeat);
    }
}

impl AnimatorUpdateListener for Recorder {
    fn on_animation_update(&self, animator: &dyn ValueAnimator) {
        self.events
            .borrow_mut()
            .push(Event::Update(animator.animated_fraction()));
    }
}

fn observed(animator: &EmulatedAnimator) -> Rc<Recorder> {
    let recorder = Rc::new(Recorder::default());
    animator.attach_listener(&recorder);
    animator.attach_update_listener(&recorder);
    recorder
}

fn linear_animator(harness: &TestRuntime, duration_millis: u64) -> EmulatedAnimator {
    let animator = EmulatedAnimator::new(harness.handle());
    animator.set_interpolator(Rc::new(Easing::Linear));
    animator
        .set_duration(duration_millis)
        .expect("positive duration");
    animator
}

#[test]
fn runs_between_start_and_natural_completion() {
    let harness = TestRuntime::new();
    let animator = linear_animator(&harness, 100);
    let recorder = observed(&animator);

    assert!(!animator.is_running());
    animator.start();
    assert!(animator.is_running());

    harness.advance_by(95);
    assert!(animator.is_running());

    harness.advance_by(5);
    assert!(!animator.is_running());
    assert_eq!(animator.run_state(), RunState::Ended { iterations: 1 });

    let events = recorder.events();
    assert_eq!(events.first(), Some(&Event::Start));
    assert_eq!(recorder.count(&Event::Update(0.0)), 10);
    assert_eq!(
        &events[events.len() - 2..],
        &[Event::Update(1.0), Event::End],
        "the last update precedes the end notification"
    );
    assert!(!harness.runtime().has_pending_callbacks());
}

#[test]
fn updates_report_monotonic_progress() {
    let harness = TestRuntime::new();
    let animator = linear_animator(&harness, 100);
    let recorder = observed(&animator);

    animator.start();
    harness.advance_by(100);

    let fractions: Vec<f32> = recorder
        .events()
        .into_iter()
        .filter_map(|event| match event {
            Event::Update(fraction) => Some(fraction),
            _ => None,
        })
        .collect();
    assert!(fractions.windows(2).all(|pair| pair[0] <= pair[1]));
    assert!((fractions[2] - 0.3).abs() < 1e-6);
}

#[test]
fn start_while_running_changes_nothing() {
    let harness = TestRuntime::new();
    let animator = linear_animator(&harness, 100);
    let recorder = observed(&animator);

    animator.start();
    harness.advance_by(30);
    let before = animator.run_state();

    animator.start();

    assert_eq!(animator.run_state(), before);
    assert_eq!(
        before,
        RunState::Running {
            start_millis: 0,
            current_iteration: 1
        }
    );
    assert_eq!(recorder.count(&Event::Start), 1);

    harness.advance_by(70);
    assert_eq!(recorder.count(&Event::End), 1);
}

#[test]
fn end_forces_fraction_to_one_whatever_the_curve() {
    let harness = TestRuntime::new();
    let animator = EmulatedAnimator::new(harness.handle());
    animator.set_interpolator(Rc::new(|input: f32| input * 0.5));
    animator.set_int_values(0, 40);
    let recorder = observed(&animator);

    animator.start();
    harness.advance_by(50);
    animator.end();

    assert_eq!(animator.animated_fraction(), 1.0);
    assert_eq!(animator.animated_int_value(), 40);
    assert!(!animator.is_running());
    assert!(!animator.has_pending_tick());
    let events = recorder.events();
    assert_eq!(
        &events[events.len() - 2..],
        &[Event::Update(1.0), Event::End]
    );

    let settled = recorder.events().len();
    harness.advance_by(1_000);
    assert_eq!(recorder.events().len(), settled);
}

#[test]
fn end_when_idle_does_nothing() {
    let harness = TestRuntime::new();
    let animator = linear_animator(&harness, 100);
    let recorder = observed(&animator);

    animator.end();

    assert!(recorder.events().is_empty());
    assert_eq!(animator.animated_fraction(), 0.0);
    assert_eq!(animator.run_state(), RunState::Idle);
}

#[test]
fn cancel_never_notifies_end() {
    let harness = TestRuntime::new();
    let animator = linear_animator(&harness, 100);
    let recorder = observed(&animator);

    animator.start();
    harness.advance_by(30);
    animator.cancel();

    assert!(!animator.is_running());
    assert!(!harness.runtime().has_pending_callbacks());
    assert!((animator.animated_fraction() - 0.3).abs() < 1e-6);

    harness.advance_by(1_000);
    assert_eq!(recorder.count(&Event::End), 0);
    assert_eq!(recorder.count(&Event::Update(0.0)), 3);
    assert_eq!(
        recorder.lifecycle(),
        vec![Event::Start, Event::Cancel]
    );
}

#[test]
fn cancel_right_after_start_records_no_update() {
    let harness = TestRuntime::new();
    let animator = linear_animator(&harness, 100);
    let recorder = observed(&animator);

    animator.start();
    animator.cancel();
    harness.advance_by(500);

    assert!(!animator.is_running());
    assert_eq!(recorder.events(), vec![Event::Start, Event::Cancel]);
    assert_eq!(animator.run_state(), RunState::Idle);
}

#[test]
fn cancel_when_idle_is_safe() {
    let harness = TestRuntime::new();
    let animator = linear_animator(&harness, 100);
    let recorder = observed(&animator);

    animator.cancel();
    animator.cancel();

    assert!(!animator.is_running());
    assert_eq!(recorder.count(&Event::End), 0);
}

#[test]
fn finite_repeat_notifies_each_restart() {
    let harness = TestRuntime::new();
    let animator = linear_animator(&harness, 100);
    animator.set_repeat_count(RepeatCount::Finite(2));
    let recorder = observed(&animator);

    animator.start();
    harness.advance_by(250);
    assert!(animator.is_running());
    assert_eq!(animator.current_iteration(), 3);

    harness.advance_by(1_000);

    assert!(!animator.is_running());
    assert_eq!(recorder.count(&Event::Repeat), 2);
    assert_eq!(recorder.count(&Event::End), 1);
    assert_eq!(recorder.count(&Event::Update(0.0)), 30);
    assert_eq!(animator.current_iteration(), 3);
    assert_eq!(
        recorder.lifecycle(),
        vec![Event::Start, Event::Repeat, Event::Repeat, Event::End]
    );
}

#[test]
fn infinite_repeat_only_stops_when_told() {
    let harness = TestRuntime::new();
    let animator = linear_animator(&harness, 100);
    animator.set_repeat_count(RepeatCount::Infinite);
    let recorder = observed(&animator);

    animator.start();
    harness.advance_by(10_000);

    assert!(animator.is_running());
    assert_eq!(recorder.count(&Event::End), 0);
    assert_eq!(recorder.count(&Event::Repeat), 100);

    animator.end();
    assert!(!animator.is_running());
    assert_eq!(recorder.count(&Event::End), 1);
}

#[test]
fn reverse_mode_does_not_repeat() {
    let harness = TestRuntime::new();
    let animator = linear_animator(&harness, 100);
    animator.set_repeat_count(RepeatCount::Finite(3));
    animator.set_repeat_mode(RepeatMode::Reverse);
    let recorder = observed(&animator);

    animator.start();
    harness.advance_by(1_000);

    assert_eq!(recorder.count(&Event::Repeat), 0);
    assert_eq!(recorder.lifecycle(), vec![Event::Start, Event::End]);
    assert_eq!(animator.repeat_mode(), RepeatMode::Reverse);
    assert_eq!(animator.repeat_count(), RepeatCount::Finite(3));
}

#[test]
fn default_curve_runs_to_the_end_of_the_range() {
    let harness = TestRuntime::new();
    let animator = EmulatedAnimator::new(harness.handle());
    animator.set_duration(100).expect("positive duration");
    animator.set_int_values(0, 100);
    let recorder = observed(&animator);

    animator.start();
    harness.advance_by(50);
    assert!((animator.animated_fraction() - 0.5).abs() < 1e-5);

    harness.advance_by(50);
    assert!(!animator.is_running());
    assert!((animator.animated_fraction() - 1.0).abs() < 1e-5);
    assert_eq!(animator.animated_int_value(), 100);
    assert_eq!(recorder.count(&Event::End), 1);

    animator.start();
    harness.advance_by(30);
    animator.end();
    assert_eq!(animator.animated_fraction(), 1.0);
    assert_eq!(animator.animated_int_value(), 100);
    assert_eq!(recorder.count(&Event::Start), 2);
    assert_eq!(recorder.count(&Event::End), 2);
}

#[test]
fn default_duration_is_two_hundred_millis() {
    let harness = TestRuntime::new();
    let animator = EmulatedAnimator::new(harness.handle());
    assert_eq!(animator.duration(), 200);

    animator.start();
    harness.advance_by(199);
    assert!(animator.is_running());
    harness.advance_by(1);
    assert!(!animator.is_running());
}

#[test]
fn zero_duration_is_rejected() {
    let harness = TestRuntime::new();
    let animator = linear_animator(&harness, 100);

    assert_eq!(
        animator.set_duration(0),
        Err(AnimatorError::InvalidDuration(0))
    );
    assert_eq!(animator.duration(), 100);
    assert!(EmulatedAnimator::with_defaults(
        harness.handle(),
        AnimatorDefaults::default().with_duration(0)
    )
    .is_err());
}

#[test]
fn natural_completion_keeps_the_overshooting_fraction() {
    let harness = TestRuntime::new();
    let animator = linear_animator(&harness, 95);
    let recorder = observed(&animator);

    animator.start();
    harness.advance_by(100);

    assert!(!animator.is_running());
    assert_eq!(recorder.count(&Event::End), 1);
    assert!((animator.animated_fraction() - 100.0 / 95.0).abs() < 1e-5);
}

#[test]
fn int_values_round_half_up() {
    let harness = TestRuntime::new();
    let defaults = AnimatorDefaults::default()
        .with_tick_delay(5)
        .with_interpolator(Easing::Linear);
    let animator =
        EmulatedAnimator::with_defaults(harness.handle(), defaults).expect("valid defaults");
    animator.set_duration(100).expect("positive duration");
    animator.set_int_values(0, 10);

    animator.start();
    harness.advance_by(25);

    assert!((animator.animated_fraction() - 0.25).abs() < 1e-6);
    assert_eq!(animator.animated_int_value(), 3);
    assert!((animator.animated_float_value() - 2.5).abs() < 1e-6);
}

#[test]
fn float_values_blend_linearly() {
    let harness = TestRuntime::new();
    let animator = linear_animator(&harness, 100);
    animator.set_float_values(0.0, 10.0);

    animator.start();
    harness.advance_by(30);

    assert!((animator.animated_float_value() - 3.0).abs() < 1e-5);
    assert_eq!(
        animator.value_range(),
        ValueRange::Float { from: 0.0, to: 10.0 }
    );
}

#[test]
fn update_listener_may_cancel_mid_tick() {
    let harness = TestRuntime::new();
    let animator = linear_animator(&harness, 100);
    let recorder = Rc::new(Recorder::default());
    animator.attach_listener(&recorder);
    let canceller = Rc::new(|animator: &dyn ValueAnimator| {
        if animator.animated_fraction() >= 0.5 {
            animator.cancel();
        }
    });
    animator.attach_update_listener(&canceller);

    animator.start();
    harness.advance_by(1_000);

    assert!(!animator.is_running());
    assert!((animator.animated_fraction() - 0.5).abs() < 1e-6);
    assert_eq!(recorder.lifecycle(), vec![Event::Start, Event::Cancel]);
}

#[test]
fn ending_from_the_start_listener_schedules_nothing() {
    struct EndOnStart;

    impl AnimatorListener for EndOnStart {
        fn on_animation_start(&self, animator: &dyn ValueAnimator) {
            animator.end();
        }
    }

    let harness = TestRuntime::new();
    let animator = linear_animator(&harness, 100);
    let listener = Rc::new(EndOnStart);
    animator.attach_listener(&listener);

    animator.start();

    assert!(!animator.is_running());
    assert_eq!(animator.animated_fraction(), 1.0);
    assert!(!harness.runtime().has_pending_callbacks());
}

#[test]
fn dropped_listeners_are_skipped() {
    let harness = TestRuntime::new();
    let animator = linear_animator(&harness, 100);
    let recorder = observed(&animator);
    drop(recorder);

    animator.start();
    harness.advance_by(100);

    assert!(!animator.is_running());
}

#[test]
fn replaced_listener_sees_only_later_events() {
    let harness = TestRuntime::new();
    let animator = linear_animator(&harness, 100);
    let first = observed(&animator);

    animator.start();
    harness.advance_by(50);
    let second = observed(&animator);
    harness.advance_by(50);

    assert_eq!(first.lifecycle(), vec![Event::Start]);
    assert_eq!(second.lifecycle(), vec![Event::End]);
    assert_eq!(second.count(&Event::Update(0.0)), 5);
}

#[test]
fn animator_is_reusable_across_runs() {
    let harness = TestRuntime::new();
    let animator = linear_animator(&harness, 100);
    animator.set_repeat_count(RepeatCount::Finite(1));
    let recorder = observed(&animator);

    animator.start();
    harness.advance_by(200);
    assert_eq!(animator.run_state(), RunState::Ended { iterations: 2 });

    animator.set_repeat_count(RepeatCount::NONE);
    animator.set_duration(50).expect("positive duration");
    animator.start();
    assert_eq!(
        animator.run_state(),
        RunState::Running {
            start_millis: 200,
            current_iteration: 1
        }
    );
    harness.advance_by(50);

    assert_eq!(animator.run_state(), RunState::Ended { iterations: 1 });
    assert_eq!(recorder.count(&Event::Start), 2);
    assert_eq!(recorder.count(&Event::End), 2);
}

#[test]
fn dropping_the_animator_removes_its_tick() {
    let harness = TestRuntime::new();
    let animator = linear_animator(&harness, 100);

    animator.start();
    assert!(animator.has_pending_tick());
    drop(animator);

    assert!(!harness.runtime().has_pending_callbacks());
}
