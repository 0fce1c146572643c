//! Integration tests for lathe_scene
//!
//! Hierarchy edits, change notification and camera picking rays working
//! together.

use approx::assert_abs_diff_eq;
use lathe_math::{Plane, Transform, Vec3};
use lathe_scene::*;

#[test]
fn test_remove_and_restore_keeps_sibling_order() {
    let mut scene = Scene::new();
    let root = scene.root();
    let a = scene.add_node(SceneNode::new("a"), root).unwrap();
    let b = scene.add_node(SceneNode::new("b"), root).unwrap();
    let c = scene.add_node(SceneNode::new("c"), root).unwrap();
    let leaf = scene.add_node(SceneNode::new("leaf"), b).unwrap();

    let subtree = scene.remove_node(b).unwrap();
    assert_eq!(subtree.len(), 2);
    assert_eq!(scene.children(root), &[a, c]);
    assert!(!scene.contains(leaf));

    scene.restore_subtree(subtree).unwrap();
    assert_eq!(scene.children(root), &[a, b, c]);
    assert_eq!(scene.parent(leaf), Some(b));
}

#[test]
fn test_global_transforms_follow_parents() {
    let mut scene = Scene::new();
    let root = scene.root();
    let parent = scene
        .add_node(SceneNode::new("parent").with_position(Vec3::new(1.0, 0.0, 0.0)), root)
        .unwrap();
    let child = scene
        .add_node(SceneNode::new("child").with_position(Vec3::new(0.0, 2.0, 0.0)), parent)
        .unwrap();
    assert_eq!(scene.global_position(child), Some(Vec3::new(1.0, 2.0, 0.0)));

    scene
        .set_local_transform(parent, Transform::from_position(Vec3::new(5.0, 0.0, 0.0)))
        .unwrap();
    let moved = scene.global_position(child).unwrap();
    assert_abs_diff_eq!(moved.x, 5.0);
    assert_abs_diff_eq!(moved.y, 2.0);

    assert!(matches!(
        scene.set_parent(parent, Some(child)),
        Err(SceneError::Cycle { .. })
    ));
}

#[test]
fn test_subscribers_see_edits_in_order() {
    let mut scene = Scene::new();
    let events = scene.subscribe();
    let root = scene.root();

    let node = scene.add_node(SceneNode::new("cube"), root).unwrap();
    scene.set_position(node, Vec3::ONE).unwrap();
    scene.set_parent(node, None).unwrap();

    let seen: Vec<SceneEvent> = events.try_iter().collect();
    assert_eq!(
        seen,
        vec![
            SceneEvent::NodeAdded(node),
            SceneEvent::TransformChanged(node),
            SceneEvent::NodeReparented { node, parent: None },
        ]
    );
}

#[test]
fn test_selection_pruned_after_detach() {
    let mut scene = Scene::new();
    let root = scene.root();
    let kept = scene.add_node(SceneNode::new("kept").with_selectable(true), root).unwrap();
    let gone = scene.add_node(SceneNode::new("gone").with_selectable(true), root).unwrap();
    let handle = scene.add_node(SceneNode::new_tool_handle("handle"), root).unwrap();

    let mut selection = Selection::new();
    selection.select_all(&scene);
    assert!(!selection.is_selected(handle));
    assert_eq!(selection.count(), 2);

    scene.set_parent(gone, None).unwrap();
    selection.prune(&scene);
    assert_eq!(selection.all_selected(), vec![kept]);
}

#[test]
fn test_top_down_ray_hits_drag_plane() {
    let camera = FixedCamera::top_down(10.0);
    let ray = camera.get_ray(3.0, -2.0);
    let hit = Plane::new(Vec3::Y, 0.0).intersection_point(&ray).unwrap();
    assert_abs_diff_eq!(hit.x, 3.0);
    assert_abs_diff_eq!(hit.y, 0.0);
    assert_abs_diff_eq!(hit.z, -2.0);

    // Parallel to the ray: no hit
    assert!(Plane::new(Vec3::X, 0.0).intersects_ray(&ray).is_none());
}
