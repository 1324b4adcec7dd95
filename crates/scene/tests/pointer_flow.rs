//! End-to-end pointer sequences against the default scene, in window pixels.

use glam::DVec2;
use portfolio3d_scene::{PointerEvent, Rgb, Scene, SceneAction, SceneConfig};

const VIEWPORT: (u32, u32) = (800, 600);
const CENTRE: DVec2 = DVec2::new(400.0, 300.0);
const EMPTY_SKY: DVec2 = DVec2::new(400.0, 5.0);

fn scene() -> Scene {
    let config = SceneConfig {
        seed: Some(5),
        ..SceneConfig::default()
    };
    Scene::from_config(config, VIEWPORT)
}

fn open_urls(actions: &[SceneAction]) -> Vec<&str> {
    actions
        .iter()
        .filter_map(|action| match action {
            SceneAction::OpenUrl { url, .. } => Some(url.as_str()),
            _ => None,
        })
        .collect()
}

#[test]
fn click_on_front_plane_opens_its_link() {
    let mut scene = scene();
    scene.handle_pointer(PointerEvent::Moved(CENTRE));
    scene.handle_pointer(PointerEvent::Pressed(CENTRE));
    let actions = scene.handle_pointer(PointerEvent::Released(CENTRE));

    assert_eq!(open_urls(&actions), vec!["https://kuochunghsuan.com/"]);
}

#[test]
fn click_on_empty_space_does_nothing() {
    let mut scene = scene();
    scene.handle_pointer(PointerEvent::Pressed(EMPTY_SKY));
    let actions = scene.handle_pointer(PointerEvent::Released(EMPTY_SKY));
    assert!(actions.is_empty());
}

#[test]
fn hover_tints_and_resets() {
    let mut scene = scene();
    let highlight = scene.config().interaction.highlight_color;

    scene.handle_pointer(PointerEvent::Moved(CENTRE));
    assert_eq!(scene.hovered(), Some(0));
    assert_eq!(scene.planes()[0].tint, highlight);

    scene.handle_pointer(PointerEvent::Moved(EMPTY_SKY));
    assert_eq!(scene.hovered(), None);
    assert!(scene.planes().iter().all(|plane| plane.tint == Rgb::WHITE));
}

#[test]
fn dragging_rotates_and_swallows_the_click() {
    let mut scene = scene();
    let before = scene.planes()[0].transform.rotation;

    scene.handle_pointer(PointerEvent::Pressed(CENTRE));
    scene.handle_pointer(PointerEvent::Moved(CENTRE + DVec2::new(30.0, 0.0)));
    let actions = scene.handle_pointer(PointerEvent::Released(CENTRE + DVec2::new(30.0, 0.0)));

    let after = scene.planes()[0].transform.rotation;
    assert!((after.y - before.y - 0.3).abs() < 1e-5);
    assert!(open_urls(&actions).is_empty());
}

#[test]
fn held_plane_is_frozen_while_others_float() {
    let mut scene = scene();
    scene.handle_pointer(PointerEvent::Pressed(CENTRE));

    let held_before = scene.planes()[0].transform;
    let free_before = scene.planes()[1].transform;
    for _ in 0..30 {
        scene.update(1.0 / 60.0);
    }

    assert_eq!(scene.planes()[0].transform, held_before);
    assert_ne!(scene.planes()[1].transform.position.y, free_before.position.y);

    scene.handle_pointer(PointerEvent::Released(CENTRE));
    scene.update(1.0 / 60.0);
    assert_ne!(scene.planes()[0].transform, held_before);
}

#[test]
fn animation_keeps_planes_near_their_rest_height() {
    let mut scene = scene();
    for _ in 0..600 {
        scene.update(1.0 / 60.0);
    }
    for (plane, config) in scene.planes().iter().zip(&scene.config().planes) {
        let offset = plane.transform.position.y - config.position[1];
        assert!(offset.abs() <= 0.1 + 1e-6);
        assert!(plane.transform.rotation.z.abs() <= 0.05 + 1e-6);
    }
}

#[test]
fn resized_window_still_picks_through_the_centre() {
    let mut scene = scene();
    scene.resize(1920, 1080);
    let hit = scene.pick_at(DVec2::new(960.0, 540.0)).expect("hit");
    assert_eq!(hit.index, 0);
}

/// Pixel position of a plane's centre for the scene's camera.
fn screen_position(scene: &Scene, index: usize) -> DVec2 {
    let (width, height) = scene.viewport();
    let world = scene.planes()[index].transform.position;
    let ndc = scene.camera().view_projection_matrix().project_point3(world);
    DVec2::new(
        (ndc.x as f64 + 1.0) * 0.5 * width as f64,
        (1.0 - ndc.y as f64) * 0.5 * height as f64,
    )
}

#[test]
fn hover_moves_straight_between_planes() {
    let mut scene = scene();
    let highlight = scene.config().interaction.highlight_color;
    let side = screen_position(&scene, 1);
    assert_eq!(scene.pick_at(side).map(|hit| hit.index), Some(1));

    let actions = scene.handle_pointer(PointerEvent::Moved(CENTRE));
    assert_eq!(actions, vec![SceneAction::HoverChanged(Some(0))]);

    let actions = scene.handle_pointer(PointerEvent::Moved(side));
    assert_eq!(actions, vec![SceneAction::HoverChanged(Some(1))]);
    assert_eq!(scene.hovered(), Some(1));
    assert_eq!(scene.planes()[1].tint, highlight);
    for (index, plane) in scene.planes().iter().enumerate() {
        if index != 1 {
            assert_eq!(plane.tint, Rgb::WHITE, "plane {index} still tinted");
        }
    }
}

#[test]
fn slow_drag_still_opens_the_link() {
    let mut scene = scene();
    scene.handle_pointer(PointerEvent::Pressed(CENTRE));
    let mut pos = CENTRE;
    for _ in 0..20 {
        pos += DVec2::new(1.0, 0.0);
        scene.handle_pointer(PointerEvent::Moved(pos));
    }
    let actions = scene.handle_pointer(PointerEvent::Released(pos));

    assert_eq!(open_urls(&actions), vec!["https://kuochunghsuan.com/"]);
}

#[test]
fn press_on_sky_then_release_on_dragged_plane_opens_it() {
    let mut scene = scene();
    let far = CENTRE + DVec2::new(30.0, 0.0);
    scene.handle_pointer(PointerEvent::Pressed(CENTRE));
    scene.handle_pointer(PointerEvent::Moved(far));
    scene.handle_pointer(PointerEvent::Released(far));
    assert!(scene.planes()[0].state.is_dragging);

    scene.handle_pointer(PointerEvent::Pressed(EMPTY_SKY));
    let actions = scene.handle_pointer(PointerEvent::Released(CENTRE));
    assert_eq!(open_urls(&actions), vec!["https://kuochunghsuan.com/"]);
}
