use super::*;
use crate::observer::FnObserver;
use crate::recipe::StepSpec;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

fn salad() -> Recipe {
    Recipe::new(
        "Salad",
        vec![
            StepSpec::cut("chop", 10),
            StepSpec::mechanical("mix", 10).with_speed(2),
        ],
    )
}

#[tokio::test(start_paused = true)]
async fn run_recipe_prepares_and_runs() {
    let controller = Controller::default();
    controller.power_on();

    assert!(controller.run_recipe(salad()).await.unwrap());
    assert_eq!(controller.state(), ApplianceState::Done);
    assert_eq!(controller.status().recipe_progress, 100);
}

#[tokio::test(start_paused = true)]
async fn run_recipe_surfaces_guard_errors() {
    let controller = Controller::default();
    assert_eq!(
        controller.run_recipe(salad()).await,
        Err(ApplianceError::PoweredOff)
    );
}

#[tokio::test(start_paused = true)]
async fn spawned_recipe_can_be_cancelled() {
    let controller = Controller::default();
    controller.power_on();
    let mut rx = controller.subscribe();

    let handle = controller.spawn_recipe(salad()).unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(controller.appliance().is_busy());
    controller.cancel().unwrap();

    assert!(!handle.await.unwrap().unwrap());
    assert_eq!(controller.state(), ApplianceState::Idle);

    let mut last_event = None;
    while let Ok(n) = rx.try_recv() {
        if let Notification::Event(message) = n {
            last_event = Some(message);
        }
    }
    assert_eq!(last_event.as_deref(), Some("Recipe cancelled"));
}

#[tokio::test(start_paused = true)]
async fn observers_registered_through_controller_receive_notifications() {
    let controller = Controller::default();
    let count = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&count);
    let id = controller.add_observer(Arc::new(FnObserver::new(move |_: &Notification| {
        counter.fetch_add(1, Ordering::SeqCst);
    })));

    controller.power_on();
    assert_eq!(count.load(Ordering::SeqCst), 2);

    assert!(controller.remove_observer(id));
    controller.power_off().unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[test]
fn pause_and_resume_pass_through_errors() {
    let controller = Controller::default();
    assert!(matches!(
        controller.pause(),
        Err(ApplianceError::InvalidOperation(_))
    ));
    assert!(matches!(
        controller.resume(),
        Err(ApplianceError::InvalidOperation(_))
    ));
    controller.emergency_stop();
    assert_eq!(controller.state(), ApplianceState::Idle);
    assert!(controller.prepare(salad()).unwrap());
}
