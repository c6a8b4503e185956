//! Simulate the loop with a fake clock to check the tick rates.

use spritewin::{
    timing::{Scheduler, Tick},
    Config,
};

/// Run the scheduler like the loop does, sleeping until the next wakeup.
///
/// Returns the amount of update and draw ticks.
fn simulate(scheduler: &mut Scheduler, until: u64) -> (u32, u32) {
    let (mut updates, mut draws) = (0, 0);
    let mut now = 0;

    while now < until {
        let Tick { update, draw } = scheduler.poll(now);
        updates += u32::from(update);
        draws += u32::from(draw);

        // Advance a single millisecond when there's no sleeping
        now = scheduler
            .next_wakeup(now)
            .filter(|wakeup| *wakeup > now)
            .unwrap_or(now + 1);
    }

    (updates, draws)
}

#[test]
fn independent_rates_over_a_second() {
    let mut scheduler = Scheduler::new(16, 10);

    let (updates, draws) = simulate(&mut scheduler, 1000);
    assert_eq!(updates, 100);
    // 0, 16, 32, .., 992
    assert_eq!(draws, 63);
}

#[test]
fn continuous_draw_with_slow_update() {
    let mut scheduler = Scheduler::new(0, 100);

    let (updates, draws) = simulate(&mut scheduler, 1000);
    assert_eq!(updates, 10);
    assert_eq!(draws, 1000);
}

#[test]
fn continuous_has_no_wakeup() {
    let scheduler = Scheduler::new(0, 0);

    assert!(scheduler.is_continuous());
    assert_eq!(scheduler.next_wakeup(1234), None);
    assert_eq!(scheduler.sleep_duration(1234), None);
}

#[test]
fn config_rates_drive_scheduler() {
    let config = Config::from_toml_str(
        r#"
        title = "Timing"
        draw_rate = 20
        update_rate = 50
        "#,
    )
    .unwrap();

    let mut scheduler = Scheduler::new(config.draw_rate, config.update_rate);
    assert_eq!(simulate(&mut scheduler, 200), (4, 10));
}
