//! Tilt engine tests.

mod common;

use gacha_sdk::parallax::{
    InputCapabilities, InputMode, ListenerId, SensorHub, Tilt, TiltSample, TiltSubscription,
};
use gacha_sdk::views::CardViewer;
use gacha_sdk::Rarity;

#[test]
fn orientation_requires_touch() {
    let both = InputCapabilities { orientation: true, touch: true };
    let no_touch = InputCapabilities { orientation: true, touch: false };
    let none = InputCapabilities::default();
    assert_eq!(InputMode::select(both), InputMode::Orientation);
    assert_eq!(InputMode::select(no_touch), InputMode::Pointer);
    assert_eq!(InputMode::select(none), InputMode::Pointer);
}

#[test]
fn orientation_is_clamped() {
    let samples = [
        (90.0, -180.0),
        (-1000.0, 1000.0),
        (44.0, -44.0),
        (f64::INFINITY, f64::NEG_INFINITY),
    ];
    for (gamma, beta) in samples {
        let t = Tilt::from_sample(
            TiltSample::Orientation { gamma: Some(gamma), beta: Some(beta) },
            40.0,
        )
        .unwrap();
        assert!(t.x.abs() <= 45.0 && t.y.abs() <= 45.0, "{:?}", t);
    }
    let t = Tilt::from_sample(TiltSample::Orientation { gamma: Some(90.0), beta: Some(-180.0) }, 40.0)
        .unwrap();
    assert_eq!(t, Tilt { x: 45.0, y: -45.0 });
}

#[test]
fn orientation_with_missing_axis_is_ignored() {
    assert!(Tilt::from_sample(TiltSample::Orientation { gamma: None, beta: Some(3.0) }, 40.0).is_none());
}

#[test]
fn nan_reading_becomes_flat() {
    let t = Tilt::new(f64::NAN, 10.0);
    assert_eq!(t.x, 0.0);
    assert_eq!(t.y, 10.0);
}

#[test]
fn pointer_maps_viewport_onto_span() {
    let center = TiltSample::Pointer { x: 500.0, y: 400.0, width: 1000.0, height: 800.0 };
    assert_eq!(Tilt::from_sample(center, 40.0).unwrap(), Tilt::FLAT);

    let corner = TiltSample::Pointer { x: 1000.0, y: 0.0, width: 1000.0, height: 800.0 };
    assert_eq!(Tilt::from_sample(corner, 40.0).unwrap(), Tilt { x: 20.0, y: -20.0 });
    assert_eq!(Tilt::from_sample(corner, 60.0).unwrap(), Tilt { x: 30.0, y: -30.0 });
}

#[test]
fn pointer_outside_viewport_is_still_clamped() {
    let far = TiltSample::Pointer { x: 1.0e6, y: -1.0e6, width: 100.0, height: 100.0 };
    assert_eq!(Tilt::from_sample(far, 60.0).unwrap(), Tilt { x: 45.0, y: -45.0 });
    let degenerate = TiltSample::Pointer { x: 1.0, y: 1.0, width: 0.0, height: 100.0 };
    assert!(Tilt::from_sample(degenerate, 60.0).is_none());
}

#[test]
fn transform_and_shine_mapping() {
    let t = Tilt::new(10.0, -5.0);
    assert_eq!(t.transform(), "perspective(1000px) rotateY(10deg) rotateX(5deg)");

    let shine = t.shine();
    assert_eq!(shine.angle, 145.0);
    assert_eq!(shine.pos_x, 70.0);
    assert_eq!(shine.pos_y, 40.0);
    assert_eq!(shine.background_position(), "70% 40%");
    assert!(shine.background().starts_with("linear-gradient(145deg"));
}

// ---------------------------------------------------------------------------
// Subscriptions
// ---------------------------------------------------------------------------

#[derive(Default)]
struct FakeHub {
    caps: InputCapabilities,
    next: u64,
    active: Vec<(ListenerId, InputMode)>,
}

impl SensorHub for FakeHub {
    fn capabilities(&self) -> InputCapabilities {
        self.caps
    }

    fn subscribe(&mut self, mode: InputMode) -> ListenerId {
        self.next += 1;
        let id = ListenerId(self.next);
        self.active.push((id, mode));
        id
    }

    fn unsubscribe(&mut self, id: ListenerId) {
        self.active.retain(|(l, _)| *l != id);
    }
}

#[test]
fn subscription_is_released_on_drop() {
    let mut hub = FakeHub::default();
    {
        let sub = TiltSubscription::acquire(&mut hub, 60.0);
        assert_eq!(sub.mode(), InputMode::Pointer);
    }
    assert!(hub.active.is_empty());
}

#[test]
fn explicit_release_unsubscribes_once() {
    let mut hub = FakeHub {
        caps: InputCapabilities { orientation: true, touch: true },
        ..Default::default()
    };
    let sub = TiltSubscription::acquire(&mut hub, 60.0);
    assert_eq!(sub.mode(), InputMode::Orientation);
    sub.release();
    assert!(hub.active.is_empty());
    assert_eq!(hub.next, 1);
}

#[test]
fn subscription_ignores_samples_from_other_source() {
    let mut hub = FakeHub {
        caps: InputCapabilities { orientation: true, touch: true },
        ..Default::default()
    };
    let mut sub = TiltSubscription::acquire(&mut hub, 60.0);
    let pointer = TiltSample::Pointer { x: 0.0, y: 0.0, width: 10.0, height: 10.0 };
    assert_eq!(sub.sample(pointer), Tilt::FLAT);
    let t = sub.sample(TiltSample::Orientation { gamma: Some(12.0), beta: Some(-3.0) });
    assert_eq!(t, Tilt { x: 12.0, y: -3.0 });
    assert_eq!(sub.tilt(), t);
}

#[test]
fn card_viewer_uses_wide_pointer_span_and_unsubscribes() {
    let card = common::sample_card("c9", Rarity::UR);
    let mut hub = FakeHub::default();
    {
        let mut viewer = CardViewer::open(&card, &mut hub);
        let corner = TiltSample::Pointer { x: 1000.0, y: 0.0, width: 1000.0, height: 800.0 };
        assert_eq!(viewer.sample(corner), Tilt { x: 30.0, y: -30.0 });

        let view = viewer.view();
        assert!(view.sparkles);
        assert_eq!(view.transform, "perspective(1000px) rotateY(30deg) rotateX(30deg)");
        assert_eq!(view.shine.angle, 165.0);
        viewer.close();
    }
    assert!(hub.active.is_empty());
    assert_eq!(hub.next, 1);
}
