//! Scene Graph and Rig Binding Tests
//!
//! Tests for:
//! - World-matrix refresh through parent chains
//! - Transform dirty checking
//! - Instantiating scene nodes from a BoneHierarchy
//! - Rig binding by name, pose application, and rest-pose restore
//! - The full per-tick pipeline: refresh → animate → palette

use std::sync::Arc;

use glam::{Affine3A, Quat, Vec3};
use rustc_hash::FxHashMap;

use marrow::animation::{
    AnimationClip, Animator, BoneTracks, ClipRegistry, InterpolationMode, KeyframeTrack, Rig,
};
use marrow::scene::SceneGraph;
use marrow::skeleton::{BoneHierarchy, BonePose};

const EPSILON: f32 = 1e-4;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn approx_vec3(a: Vec3, b: Vec3) -> bool {
    approx(a.x, b.x) && approx(a.y, b.y) && approx(a.z, b.z)
}

// ============================================================================
// SceneGraph
// ============================================================================

#[test]
fn world_transforms_compose_down_the_chain() {
    let mut scene = SceneGraph::new();
    let root = scene.add_root("root");
    let child = scene.add_child(root, "child");

    scene.get_node_mut(root).unwrap().transform.position = Vec3::new(1.0, 0.0, 0.0);
    scene.get_node_mut(child).unwrap().transform.position = Vec3::new(0.0, 2.0, 0.0);
    scene.update_world_transforms();

    let world = *scene.get_node(child).unwrap().transform.world_matrix();
    assert!(approx_vec3(
        world.translation.into(),
        Vec3::new(1.0, 2.0, 0.0)
    ));
}

#[test]
fn transform_dirty_check_skips_clean_recompute() {
    let mut scene = SceneGraph::new();
    let root = scene.add_root("root");

    let node = scene.get_node_mut(root).unwrap();
    node.transform.position = Vec3::X;
    assert!(node.transform.update_local_matrix(), "First update recomputes");
    assert!(
        !node.transform.update_local_matrix(),
        "Unchanged TRS must not recompute"
    );

    node.transform.position = Vec3::Y;
    assert!(node.transform.update_local_matrix());
}

#[test]
fn find_by_name_searches_subtree() {
    let mut scene = SceneGraph::new();
    let root = scene.add_root("root");
    let arm = scene.add_child(root, "arm");
    let hand = scene.add_child(arm, "hand");
    let other_root = scene.add_root("elsewhere");

    assert_eq!(scene.find_by_name(root, "hand"), Some(hand));
    assert_eq!(scene.find_by_name(root, "elsewhere"), None);
    assert_eq!(scene.find_by_name(other_root, "hand"), None);
}

#[test]
fn instantiate_hierarchy_mirrors_topology_and_bind_pose() {
    let mut hierarchy = BoneHierarchy::with_root("Hip", Affine3A::IDENTITY);
    let root = hierarchy.root();
    let spine = hierarchy
        .add_child(
            root,
            "Spine",
            Affine3A::from_translation(Vec3::new(0.0, 1.0, 0.0)),
        )
        .unwrap();
    hierarchy
        .add_child(
            spine,
            "Head",
            Affine3A::from_translation(Vec3::new(0.0, 0.5, 0.0)),
        )
        .unwrap();

    let mut scene = SceneGraph::new();
    let scene_root = scene.instantiate_hierarchy(&hierarchy);
    scene.update_world_transforms();

    assert_eq!(scene.get_node(scene_root).unwrap().name, "Hip");
    let head = scene.find_by_name(scene_root, "Head").expect("Head spawned");
    let world = *scene.get_node(head).unwrap().transform.world_matrix();
    assert!(
        approx_vec3(world.translation.into(), Vec3::new(0.0, 1.5, 0.0)),
        "Bind chain must compose: got {:?}",
        world.translation
    );
}

// ============================================================================
// BoneHierarchy construction
// ============================================================================

#[test]
fn hierarchy_arena_order_is_parents_first() {
    let mut hierarchy = BoneHierarchy::with_root("Hip", Affine3A::IDENTITY);
    let root = hierarchy.root();
    let spine = hierarchy.add_child(root, "Spine", Affine3A::IDENTITY).unwrap();
    let head = hierarchy.add_child(spine, "Head", Affine3A::IDENTITY).unwrap();

    assert_eq!(root.index(), 0);
    assert!(spine.index() > root.index());
    assert!(head.index() > spine.index());

    for node in hierarchy.nodes() {
        if let Some(parent) = node.parent {
            assert!(
                parent.index() < hierarchy.find(&node.name).unwrap().index(),
                "Parent '{}' must precede its child",
                hierarchy.node(parent).name
            );
        }
    }
}

#[test]
fn hierarchy_find_resolves_names() {
    let mut hierarchy = BoneHierarchy::with_root("Hip", Affine3A::IDENTITY);
    let root = hierarchy.root();
    let spine = hierarchy.add_child(root, "Spine", Affine3A::IDENTITY).unwrap();

    assert_eq!(hierarchy.find("Hip"), Some(root));
    assert_eq!(hierarchy.find("Spine"), Some(spine));
    assert_eq!(hierarchy.find("Tail"), None);
    assert_eq!(hierarchy.len(), 2);
}

#[test]
fn hierarchy_rejects_duplicate_names() {
    let mut hierarchy = BoneHierarchy::with_root("Hip", Affine3A::IDENTITY);
    let root = hierarchy.root();
    let result = hierarchy.add_child(root, "Hip", Affine3A::IDENTITY);
    assert!(matches!(
        result,
        Err(marrow::errors::MarrowError::InvalidArgument(_))
    ));
}

// ============================================================================
// Rig binding
// ============================================================================

fn simple_hierarchy() -> BoneHierarchy {
    let mut hierarchy = BoneHierarchy::with_root("Hip", Affine3A::IDENTITY);
    let root = hierarchy.root();
    hierarchy
        .add_child(
            root,
            "Spine",
            Affine3A::from_translation(Vec3::new(0.0, 1.0, 0.0)),
        )
        .unwrap();
    hierarchy
}

#[test]
fn rig_binds_by_name() {
    let hierarchy = simple_hierarchy();
    let mut scene = SceneGraph::new();
    let root = scene.instantiate_hierarchy(&hierarchy);

    let rig = Rig::bind(&scene, root, &hierarchy);
    assert_eq!(rig.len(), 2);
    assert!(rig.find("Hip").is_some());
    assert!(rig.find("Spine").is_some());
    assert!(rig.find("Tail").is_none());
}

#[test]
fn rig_skips_bones_missing_from_scene() {
    let hierarchy = simple_hierarchy();

    // Scene only has the Hip; Spine stays unbound, binding is not an error.
    let mut scene = SceneGraph::new();
    let root = scene.add_root("Hip");

    let rig = Rig::bind(&scene, root, &hierarchy);
    assert_eq!(rig.len(), 1);
    assert!(rig.find("Spine").is_none());
}

#[test]
fn rig_captures_rest_pose_at_bind_time() {
    let hierarchy = simple_hierarchy();
    let mut scene = SceneGraph::new();
    let root = scene.instantiate_hierarchy(&hierarchy);

    let rig = Rig::bind(&scene, root, &hierarchy);
    let spine = rig.find("Spine").unwrap();
    assert!(approx_vec3(
        spine.rest_pose.position,
        Vec3::new(0.0, 1.0, 0.0)
    ));
}

#[test]
fn rig_restore_resets_local_pose() {
    let hierarchy = simple_hierarchy();
    let mut scene = SceneGraph::new();
    let root = scene.instantiate_hierarchy(&hierarchy);
    let rig = Rig::bind(&scene, root, &hierarchy);

    // Game code scribbles over the local pose.
    let spine = scene.find_by_name(root, "Spine").unwrap();
    scene.get_node_mut(spine).unwrap().transform.position = Vec3::new(9.0, 9.0, 9.0);

    rig.restore_rest_pose(&mut scene);
    let pose = scene.get_node(spine).unwrap().transform.pose();
    assert!(
        approx_vec3(pose.position, Vec3::new(0.0, 1.0, 0.0)),
        "Restore must bring back the bind-time pose, got {:?}",
        pose.position
    );
}

#[test]
fn rig_apply_writes_world_pose() {
    let hierarchy = simple_hierarchy();
    let mut scene = SceneGraph::new();
    let root = scene.instantiate_hierarchy(&hierarchy);
    let rig = Rig::bind(&scene, root, &hierarchy);

    let mut pose = marrow::skeleton::Pose::new();
    pose.set(
        "Hip",
        BonePose::new(Vec3::new(5.0, 0.0, 0.0), Quat::IDENTITY, Vec3::ONE),
    );
    rig.apply(&mut scene, &pose);

    let hip = scene.find_by_name(root, "Hip").unwrap();
    let world = *scene.get_node(hip).unwrap().transform.world_matrix();
    assert!(approx_vec3(
        world.translation.into(),
        Vec3::new(5.0, 0.0, 0.0)
    ));
}

// ============================================================================
// Full tick pipeline
// ============================================================================

#[test]
fn animator_update_drives_scene_bones() {
    // Clip: Hip slides from origin to (1,0,0) over 1 second.
    let mut tracks = FxHashMap::default();
    tracks.insert(
        "Hip".to_string(),
        BoneTracks::new(
            KeyframeTrack::new(
                vec![0.0, 30.0],
                vec![Vec3::ZERO, Vec3::X],
                InterpolationMode::Linear,
            ),
            KeyframeTrack::constant(Quat::IDENTITY),
            KeyframeTrack::constant(Vec3::ONE),
        ),
    );
    let registry = Arc::new(ClipRegistry::new());
    registry.insert(AnimationClip::new("Walk", 30.0, 30.0, tracks).unwrap());

    let hierarchy = Arc::new(simple_hierarchy());
    let mut scene = SceneGraph::new();
    let root = scene.instantiate_hierarchy(&hierarchy);
    let rig = Rig::bind(&scene, root, &hierarchy);

    let mut animator = Animator::new(registry, Arc::clone(&hierarchy));
    animator.play("Walk", 0.0).unwrap();

    // One simulation tick: refresh, then animate.
    scene.update_world_transforms();
    animator.update(0.5, &mut scene, &rig).unwrap();

    let hip = scene.find_by_name(root, "Hip").unwrap();
    let hip_world = *scene.get_node(hip).unwrap().transform.world_matrix();
    assert!(
        approx_vec3(hip_world.translation.into(), Vec3::new(0.5, 0.0, 0.0)),
        "Hip world must follow the sampled pose, got {:?}",
        hip_world.translation
    );

    // The untracked Spine rides on the animated Hip in world space.
    let spine = scene.find_by_name(root, "Spine").unwrap();
    let spine_world = *scene.get_node(spine).unwrap().transform.world_matrix();
    assert!(
        approx_vec3(spine_world.translation.into(), Vec3::new(0.5, 1.0, 0.0)),
        "Spine world must compose through the hierarchy, got {:?}",
        spine_world.translation
    );
}
