use std::process::ExitCode;
use std::rc::Rc;

use valueanim_animator::prelude::*;
use valueanim_runtime_std::StdRuntime;

const DEFAULT_DURATION_MILLIS: u64 = 500;

struct Printer;

impl AnimatorListener for Printer {
    fn on_animation_start(&self, _animator: &dyn ValueAnimator) {
        println!("start");
    }

    fn on_animation_end(&self, animator: &dyn ValueAnimator) {
        println!("end at {}", animator.animated_int_value());
    }

    fn on_animation_cancel(&self, _animator: &dyn ValueAnimator) {
        println!("cancel");
    }

    fn on_animation_repeat(&self, _animator: &dyn ValueAnimator) {
        println!("repeat");
    }
}

impl AnimatorUpdateListener for Printer {
    fn on_animation_update(&self, animator: &dyn ValueAnimator) {
        let value = animator.animated_int_value().clamp(0, 100) as usize;
        println!(
            "{:>5.3} {:>3} |{}",
            animator.animated_fraction(),
            value,
            "#".repeat(value / 2)
        );
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let duration = args
        .next()
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(DEFAULT_DURATION_MILLIS);
    let repeats: u32 = args.next().and_then(|arg| arg.parse().ok()).unwrap_or(0);

    println!("=== Value animator demo ===");
    println!("Animating 0..100 over {duration}ms, {repeats} repeat(s)");
    println!();

    let runtime = StdRuntime::new();
    let animator = AnimatorCompat::new(&EmulationOnly, runtime.runtime_handle());
    if let Err(err) = animator.set_duration(duration) {
        log::error!("invalid configuration: {err}");
        return ExitCode::FAILURE;
    }
    animator.set_int_values(0, 100);
    animator.set_repeat_count(RepeatCount::Finite(repeats));

    let printer = Rc::new(Printer);
    animator.attach_listener(&printer);
    animator.attach_update_listener(&printer);

    animator.start();
    let ticks = runtime.run_until_idle();
    log::info!("done after {ticks} ticks");
    ExitCode::SUCCESS
}
