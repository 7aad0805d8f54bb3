use std::sync::{Arc, Mutex};
use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use pyramid_scene::data::{default_sections, SectionMapping, Sections};
use pyramid_scene::pyramid::{
    advance_pyramid, invoke_section_callback, PyramidState, PyramidTuning, SectionCallback,
    SectionChanged,
};

const FRAME: Duration = Duration::from_millis(16);

fn headless_app(debounce: Duration, calls: Arc<Mutex<Vec<SectionChanged>>>) -> App {
    let tuning = PyramidTuning {
        hover_debounce: debounce,
        ..PyramidTuning::default()
    };
    let sections = Sections::from_descriptors(default_sections(), SectionMapping::TopDown)
        .expect("default sections are valid");

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(FRAME))
        .insert_resource(PyramidState::new(tuning))
        .insert_resource(sections)
        .insert_resource(SectionCallback(Box::new(move |change| {
            calls.lock().unwrap().push(change);
        })))
        .add_event::<SectionChanged>()
        .add_systems(Update, (advance_pyramid, invoke_section_callback).chain());
    app
}

fn point_at(app: &mut App, block: Option<usize>) {
    let now = app.world().resource::<Time>().elapsed();
    app.world_mut()
        .resource_mut::<PyramidState>()
        .pointer_at(block, now);
}

fn frames(app: &mut App, block: Option<usize>, count: usize) {
    for _ in 0..count {
        point_at(app, block);
        app.update();
    }
}

#[test]
fn mounting_does_not_notify() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let mut app = headless_app(Duration::ZERO, calls.clone());

    frames(&mut app, None, 10);

    assert!(calls.lock().unwrap().is_empty());
}

#[test]
fn enter_and_leave_notify_exactly_twice() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let mut app = headless_app(Duration::ZERO, calls.clone());

    frames(&mut app, None, 3);
    frames(&mut app, Some(1), 20);
    frames(&mut app, None, 20);

    let calls = calls.lock().unwrap();
    assert_eq!(
        *calls,
        [
            SectionChanged {
                block: Some(1),
                section: Some(2),
            },
            SectionChanged {
                block: None,
                section: None,
            },
        ]
    );
}

#[test]
fn blocks_up_to_the_hovered_one_lift_and_tilt() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let mut app = headless_app(Duration::ZERO, calls);

    frames(&mut app, Some(2), 120);

    let state = app.world().resource::<PyramidState>();
    assert_eq!(state.hovered(), Some(2));
    for index in 0..=2 {
        assert!(state.block(index).lift > 0.99);
        assert!(state.block(index).tilt > 0.99);
    }
    assert!(state.block(3).lift < 1e-3);
    assert!(state.block(3).tilt < 1e-3);
    assert!(state.rotation() > 0.0);
}

#[test]
fn debounced_entry_notifies_once_it_matures() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let mut app = headless_app(Duration::from_millis(100), calls.clone());

    frames(&mut app, None, 2);
    frames(&mut app, Some(3), 2);
    assert!(calls.lock().unwrap().is_empty());

    frames(&mut app, Some(3), 10);
    assert_eq!(
        *calls.lock().unwrap(),
        [SectionChanged {
            block: Some(3),
            section: Some(0),
        }]
    );
}

#[test]
fn leaving_before_the_debounce_matures_never_notifies() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let mut app = headless_app(Duration::from_millis(100), calls.clone());

    frames(&mut app, None, 2);
    frames(&mut app, Some(0), 3);
    frames(&mut app, None, 20);

    assert!(calls.lock().unwrap().is_empty());
}
