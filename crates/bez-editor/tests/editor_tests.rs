use approx::assert_relative_eq;
use bez_core::traits::Validate;
use bez_core::{CurveError, EntityHandle};
use bez_editor::{
    CurveEditor, EditorConfig, Instancer, LoopState, MarkerKind, RecordingInstancer,
    RecordingPolyline,
};
use bez_geometry::{cubic_point, Curve};
use bez_math::{dvec3, Point3};
use std::collections::BTreeSet;
use std::ops::Range;

type Editor = CurveEditor<RecordingInstancer, RecordingPolyline>;

const RES: usize = 10;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn editor() -> Editor {
    init_logging();
    CurveEditor::new(
        EditorConfig::with_resolution(RES),
        RecordingInstancer::new(),
        RecordingPolyline::new(),
    )
    .unwrap()
}

fn editor_with(points: &[(f64, f64)]) -> (Editor, Vec<EntityHandle>) {
    let mut ed = editor();
    let handles = points
        .iter()
        .map(|&(x, y)| ed.add_anchor(dvec3(x, y, 0.0)).unwrap())
        .collect();
    (ed, handles)
}

fn assert_point(actual: Point3, expected: Point3) {
    assert!(
        (actual - expected).length() < 1e-10,
        "expected {:?}, got {:?}",
        expected,
        actual
    );
}

fn indices(range: Range<usize>) -> BTreeSet<usize> {
    range.collect()
}

fn control_marker(ed: &Editor, index: usize) -> EntityHandle {
    ed.control(index).unwrap().marker
}

#[test]
fn test_two_anchor_scenario() {
    let (ed, _) = editor_with(&[(0.0, 0.0), (4.0, 0.0)]);

    let controls = ed.control_points();
    assert_eq!(controls.len(), 2);
    assert_point(controls[0], dvec3(4.0 / 3.0, 1.0, 0.0));
    assert_point(controls[1], dvec3(8.0 / 3.0, 1.0, 0.0));

    let line = ed.polyline();
    assert_eq!(line.len(), 10);
    assert_eq!(line[0], dvec3(0.0, 0.0, 0.0));
    let expected = cubic_point(
        0.9,
        dvec3(0.0, 0.0, 0.0),
        controls[0],
        controls[1],
        dvec3(4.0, 0.0, 0.0),
    );
    assert_point(line[9], expected);
    assert!((line[9] - dvec3(4.0, 0.0, 0.0)).length() > 1e-3);

    // The sink mirrors the owned polyline.
    assert_eq!(ed.sink().points, line);
    ed.validate().unwrap();
}

#[test]
fn test_polyline_length_open_and_closed() {
    let points = [(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (-2.0, 2.0), (-3.0, 0.0)];
    for n in 2..=points.len() {
        let (mut ed, _) = editor_with(&points[..n]);
        assert_eq!(ed.polyline().len(), (n - 1) * RES);
        ed.validate().unwrap();

        ed.close_loop().unwrap();
        assert_eq!(ed.polyline().len(), n * RES);
        assert_eq!(ed.sink().points.len(), n * RES);
        ed.validate().unwrap();
    }
}

#[test]
fn test_added_segments_are_smooth() {
    let (ed, _) = editor_with(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
    assert_eq!(ed.smooth_joints(), vec![true, true]);

    let controls = ed.control_points();
    assert_point(controls[2], dvec3(16.0 / 3.0, -1.0, 0.0));
    assert_point(controls[3], dvec3(3.0, 8.0 / 3.0, 0.0));
}

#[test]
fn test_segments_join_at_anchors() {
    let (ed, _) = editor_with(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0)]);
    let line = ed.polyline();
    assert_point(line[RES], dvec3(4.0, 0.0, 0.0));
}

#[test]
fn test_drag_middle_anchor_recomputes_both_segments() {
    let (mut ed, handles) = editor_with(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0)]);
    ed.sink_mut().clear_touched();

    ed.drag_update(handles[1], dvec3(6.0, 0.0, 0.0)).unwrap();

    let controls = ed.control_points();
    assert_point(controls[0], dvec3(2.0, 1.5, 0.0));
    assert_point(controls[1], dvec3(4.0, 1.5, 0.0));
    assert_point(controls[2], dvec3(8.0, -1.5, 0.0));
    assert_point(controls[3], dvec3(11.0 / 3.0, 13.0 / 6.0, 0.0));

    assert_eq!(ed.sink().touched, indices(0..2 * RES));
    assert_eq!(ed.sink().writes, 2 * RES);
    assert_point(ed.polyline()[RES], dvec3(6.0, 0.0, 0.0));

    // Control markers follow the recomputed handles.
    for i in 0..4 {
        assert_eq!(ed.instancer().position(control_marker(&ed, i)), Some(controls[i]));
    }
    ed.validate().unwrap();
}

#[test]
fn test_drag_interior_anchor_leaves_far_segment_untouched() {
    let (mut ed, handles) = editor_with(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
    let far_block: Vec<_> = ed.polyline()[2 * RES..].to_vec();
    let far_controls = ed.control_points()[4..].to_vec();
    ed.sink_mut().clear_touched();

    ed.drag_update(handles[1], dvec3(6.0, 0.0, 0.0)).unwrap();

    assert_eq!(ed.sink().touched, indices(0..2 * RES));
    assert_eq!(&ed.polyline()[2 * RES..], far_block.as_slice());
    assert_eq!(ed.control_points()[4..], far_controls[..]);
}

#[test]
fn test_drag_last_anchor_redraws_one_block() {
    let (mut ed, handles) = editor_with(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0)]);
    ed.sink_mut().clear_touched();

    ed.drag_update(handles[2], dvec3(5.0, 5.0, 0.0)).unwrap();

    assert_eq!(ed.sink().touched, indices(RES..2 * RES));
    assert_eq!(ed.anchor(2).unwrap().position, dvec3(5.0, 5.0, 0.0));
    // Incoming handle still mirrors the previous segment's trailing handle.
    assert_eq!(ed.smooth_joints(), vec![true]);
}

#[test]
fn test_drag_first_anchor_recomputes_following_segments() {
    let (mut ed, handles) = editor_with(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
    ed.sink_mut().clear_touched();

    ed.drag_update(handles[0], dvec3(0.0, -2.0, 0.0)).unwrap();

    assert_eq!(ed.sink().touched, indices(0..2 * RES));
    assert_eq!(ed.polyline()[0], dvec3(0.0, -2.0, 0.0));
    assert!(ed.smooth_joints()[0]);
}

#[test]
fn test_drag_projects_onto_plane() {
    let (mut ed, handles) = editor_with(&[(0.0, 0.0), (4.0, 0.0)]);
    ed.drag_update(handles[1], dvec3(5.0, 1.0, 3.0)).unwrap();
    assert_eq!(ed.anchor(1).unwrap().position, dvec3(5.0, 1.0, 0.0));
    assert_eq!(ed.instancer().position(handles[1]), Some(dvec3(5.0, 1.0, 0.0)));
    ed.validate().unwrap();
}

#[test]
fn test_drag_interior_control_mirrors_partner() {
    let (mut ed, _) = editor_with(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);

    // Odd index 1 trails into anchor 1; its partner is index 2.
    ed.sink_mut().clear_touched();
    let dragged = dvec3(3.0, 2.0, 0.0);
    ed.drag_update(control_marker(&ed, 1), dragged).unwrap();

    let controls = ed.control_points();
    let pivot = ed.anchor(1).unwrap().position;
    assert_point((controls[1] + controls[2]) * 0.5, pivot);
    assert_point(controls[2], dvec3(5.0, -2.0, 0.0));
    assert_eq!(
        ed.instancer().position(control_marker(&ed, 2)),
        Some(controls[2])
    );
    assert_eq!(ed.sink().touched, indices(0..2 * RES));

    // Even index 4 leads out of anchor 2; its partner is index 3.
    ed.sink_mut().clear_touched();
    ed.drag_update(control_marker(&ed, 4), dvec3(5.0, 5.0, 0.0)).unwrap();

    let controls = ed.control_points();
    let pivot = ed.anchor(2).unwrap().position;
    assert_point((controls[3] + controls[4]) * 0.5, pivot);
    assert_eq!(ed.sink().touched, indices(RES..3 * RES));

    assert_eq!(ed.smooth_joints(), vec![true, true]);
    ed.validate().unwrap();
}

#[test]
fn test_drag_outer_controls_redraw_own_segment_only() {
    let (mut ed, _) = editor_with(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0)]);
    let before = ed.control_points();

    ed.sink_mut().clear_touched();
    ed.drag_update(control_marker(&ed, 0), dvec3(1.0, 3.0, 0.0)).unwrap();
    assert_eq!(ed.sink().touched, indices(0..RES));
    let after = ed.control_points();
    assert_eq!(after[0], dvec3(1.0, 3.0, 0.0));
    assert_eq!(after[1..], before[1..]);

    ed.sink_mut().clear_touched();
    ed.drag_update(control_marker(&ed, 3), dvec3(2.0, 5.0, 0.0)).unwrap();
    assert_eq!(ed.sink().touched, indices(RES..2 * RES));
    assert_eq!(ed.control_points()[..3], after[..3]);
}

#[test]
fn test_single_segment_controls_have_no_partner() {
    let (mut ed, _) = editor_with(&[(0.0, 0.0), (4.0, 0.0)]);
    ed.sink_mut().clear_touched();
    ed.drag_update(control_marker(&ed, 1), dvec3(3.0, -1.0, 0.0)).unwrap();
    assert_eq!(ed.sink().touched, indices(0..RES));
    assert_point(ed.control_points()[0], dvec3(4.0 / 3.0, 1.0, 0.0));
}

#[test]
fn test_delete_first_anchor() {
    let (mut ed, handles) = editor_with(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0)]);
    ed.delete_anchor(handles[0]).unwrap();

    assert_eq!(ed.anchor_count(), 2);
    assert_eq!(ed.control_count(), 2);
    assert_eq!(ed.control_points().len(), 2);
    assert_eq!(ed.polyline().len(), RES);
    assert_eq!(ed.polyline()[0], dvec3(4.0, 0.0, 0.0));

    let inst = ed.instancer();
    assert!(inst.is_balanced());
    assert_eq!(inst.live_count(), 4);
    assert_eq!(inst.spawned - inst.destroyed, 4);
    assert!(!inst.is_live(handles[0]));
    ed.validate().unwrap();
}

#[test]
fn test_delete_interior_anchor_reseeds_neighbours() {
    let (mut ed, handles) = editor_with(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
    ed.delete_anchor(handles[1]).unwrap();

    assert_eq!(ed.anchor_count(), 3);
    assert_eq!(ed.control_count(), 4);
    assert_eq!(ed.polyline().len(), 2 * RES);

    // The new first segment (0,0) -> (4,4) gets the first-segment seed.
    let controls = ed.control_points();
    assert_point(controls[0], dvec3(1.0 / 3.0, 7.0 / 3.0, 0.0));
    // And the segment after it mirrors across anchor 1 again.
    assert_eq!(ed.smooth_joints(), vec![true]);

    assert!(ed.instancer().is_balanced());
    assert_eq!(ed.instancer().live_count(), 3 + 4);
    ed.validate().unwrap();
}

#[test]
fn test_delete_last_anchor() {
    let (mut ed, handles) = editor_with(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0)]);
    let kept = ed.control_points()[..2].to_vec();
    ed.delete_anchor(handles[2]).unwrap();

    assert_eq!(ed.anchor_count(), 2);
    assert_eq!(ed.control_points(), kept);
    assert_eq!(ed.polyline().len(), RES);
    ed.validate().unwrap();
}

#[test]
fn test_delete_down_to_empty() {
    let (mut ed, handles) = editor_with(&[(0.0, 0.0), (4.0, 0.0)]);
    ed.delete_anchor(handles[1]).unwrap();
    assert_eq!(ed.control_count(), 0);
    assert!(ed.polyline().is_empty());
    assert!(ed.sink().points.is_empty());

    ed.delete_anchor(handles[0]).unwrap();
    assert_eq!(ed.anchor_count(), 0);
    assert_eq!(ed.instancer().live_count(), 0);
    assert!(ed.instancer().is_balanced());
    ed.validate().unwrap();
}

#[test]
fn test_delete_rejects_non_anchor_and_stale_handles() {
    let (mut ed, handles) = editor_with(&[(0.0, 0.0), (4.0, 0.0)]);

    let err = ed.delete_anchor(control_marker(&ed, 0)).unwrap_err();
    assert!(matches!(err, CurveError::InvalidReference(_)));

    let err = ed.delete_anchor(EntityHandle::new()).unwrap_err();
    assert!(matches!(err, CurveError::NotFound(_)));

    ed.delete_anchor(handles[0]).unwrap();
    let err = ed.delete_anchor(handles[0]).unwrap_err();
    assert!(err.is_invalid_reference());

    assert_eq!(ed.anchor_count(), 1);
    ed.validate().unwrap();
}

#[test]
fn test_drag_stale_handle_is_not_found() {
    let (mut ed, _) = editor_with(&[(0.0, 0.0), (4.0, 0.0)]);
    let before = ed.polyline().to_vec();
    let err = ed.drag_update(EntityHandle::new(), dvec3(1.0, 1.0, 0.0)).unwrap_err();
    assert!(matches!(err, CurveError::NotFound(_)));
    assert_eq!(ed.polyline(), before.as_slice());
}

#[test]
fn test_add_then_delete_restores_counts() {
    let (mut ed, _) = editor_with(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0)]);
    let (anchors, controls, len) = (ed.anchor_count(), ed.control_count(), ed.polyline().len());
    let live = ed.instancer().live_count();

    let added = ed.add_anchor(dvec3(-1.0, 6.0, 0.0)).unwrap();
    ed.delete_anchor(added).unwrap();

    assert_eq!(ed.anchor_count(), anchors);
    assert_eq!(ed.control_count(), controls);
    assert_eq!(ed.polyline().len(), len);
    assert_eq!(ed.instancer().live_count(), live);
    ed.validate().unwrap();
}

#[test]
fn test_toggle_closed_round_trip() {
    let (mut ed, _) = editor_with(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0)]);
    let before_line = ed.polyline().to_vec();
    let controls = ed.control_count();

    ed.close_loop().unwrap();
    assert_eq!(ed.loop_state(), LoopState::Closed);
    assert_eq!(ed.polyline().len(), 3 * RES);
    assert_eq!(ed.instancer().live_of_kind(MarkerKind::ClosingControl), 2);
    assert_eq!(ed.control_count(), controls);
    ed.validate().unwrap();

    ed.open_loop().unwrap();
    assert_eq!(ed.loop_state(), LoopState::Open);
    assert_eq!(ed.polyline(), before_line.as_slice());
    assert_eq!(ed.sink().points, before_line);
    assert_eq!(ed.control_count(), controls);
    assert_eq!(ed.instancer().live_of_kind(MarkerKind::ClosingControl), 0);
    assert!(ed.instancer().is_balanced());
    ed.validate().unwrap();
}

#[test]
fn test_closed_curve_rejects_edits() {
    let (mut ed, handles) = editor_with(&[(0.0, 0.0), (4.0, 0.0)]);
    ed.close_loop().unwrap();

    assert!(matches!(
        ed.add_anchor(dvec3(1.0, 1.0, 0.0)),
        Err(CurveError::Precondition(_))
    ));
    assert!(matches!(ed.delete_anchor(handles[0]), Err(CurveError::Precondition(_))));
    assert!(matches!(
        ed.drag_update(handles[1], dvec3(1.0, 1.0, 0.0)),
        Err(CurveError::Precondition(_))
    ));
    assert_eq!(ed.anchor_count(), 2);
    ed.validate().unwrap();
}

#[test]
fn test_closed_two_anchor_curve() {
    let (mut ed, _) = editor_with(&[(0.0, 0.0), (4.0, 0.0)]);
    ed.close_loop().unwrap();

    let curve = ed.closing_curve().unwrap();
    // Handles mirror (8/3, 1) through (4, 0) and (4/3, 1) through the origin.
    assert_point(curve.p1, dvec3(16.0 / 3.0, -1.0, 0.0));
    assert_point(curve.p2, dvec3(-4.0 / 3.0, -1.0, 0.0));

    let [m1, m2] = ed.closing_markers().unwrap();
    assert_eq!(ed.instancer().position(m1), Some(curve.p1));
    assert_eq!(ed.instancer().position(m2), Some(curve.p2));

    let line = ed.polyline();
    assert_point(line[RES], dvec3(4.0, 0.0, 0.0));
    let mid = curve.point_at(0.5);
    assert_relative_eq!(line[RES + 5].x, mid.x, epsilon = 1e-10);
    assert_relative_eq!(line[RES + 5].y, mid.y, epsilon = 1e-10);
}
