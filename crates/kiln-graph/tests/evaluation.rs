// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
//! Lazy-recompute protocol: regeneration counts, dirty propagation and output
//! transparency, observed through the counting doubles.

use kiln_dry_tests::{init_test_tracing, output_node, scalar, sum_node, value_node, GraphFixture};
use kiln_dry_tests::{SumOperator, ValueGenerator};
use kiln_graph::{GraphError, InputBounds, NodeKind};

// ── 1. Generator -> Operator -> Output walk-through ─────────────────────

#[test]
fn chain_regenerates_once_per_change() {
    init_test_tracing();
    let fx = GraphFixture::new();
    let (g, g_calls) = value_node(fx.ctx(), 5);
    let (op, op_calls) = sum_node(fx.ctx(), InputBounds::new(1, 2).expect("bounds"));
    let out = output_node(fx.ctx());
    op.add_input(&g).expect("attach generator");
    out.add_input(&op).expect("attach operator");

    // First request builds everything.
    let mut updated = false;
    let data = out.get_updated_data(&mut updated).expect("data");
    assert!(updated);
    assert_eq!(g_calls.take(), 1);
    assert_eq!(op_calls.take(), 1);
    assert_eq!(scalar(&data), Some(5));
    assert!(!data.is_dirty());

    // Nothing changed: nothing regenerates.
    let mut updated = false;
    let again = out.get_updated_data(&mut updated).expect("data");
    assert!(!updated);
    assert_eq!(g_calls.take(), 0);
    assert_eq!(op_calls.take(), 0);
    assert_eq!(again, data);

    // Invalidate the leaf directly.
    g.data().expect("generator data").invalidate();
    let mut updated = false;
    let third = out.get_updated_data(&mut updated).expect("data");
    assert!(updated);
    assert_eq!(g_calls.take(), 1);
    assert_eq!(op_calls.take(), 1);
    assert_eq!(third, data);
}

// ── 2. Dirty propagation through a two-input operator ───────────────────

#[test]
fn one_dirty_input_regenerates_operator_once() {
    let fx = GraphFixture::new();
    let (a, a_calls) = value_node(fx.ctx(), 1);
    let (b, b_calls) = value_node(fx.ctx(), 2);
    let (op, op_calls) = sum_node(fx.ctx(), InputBounds::one_to(2));
    op.add_input(&a).expect("attach a");
    op.add_input(&b).expect("attach b");
    assert_eq!(op.updated_data().as_ref().and_then(scalar), Some(3));
    op_calls.take();
    a_calls.take();
    b_calls.take();

    a.invalidate_data();
    let mut updated = false;
    op.get_updated_data(&mut updated).expect("data");
    assert!(updated);
    assert_eq!(op_calls.get(), 1);
    assert_eq!(a_calls.get(), 1);
    assert_eq!(b_calls.get(), 0);
}

#[test]
fn shared_generator_is_regenerated_once_per_pass() {
    let fx = GraphFixture::new();
    let (g, g_calls) = value_node(fx.ctx(), 4);
    let (left, _) = sum_node(fx.ctx(), InputBounds::exactly(1));
    let (right, _) = sum_node(fx.ctx(), InputBounds::exactly(1));
    let (root, root_calls) = sum_node(fx.ctx(), InputBounds::exactly(2));
    left.add_input(&g).expect("left");
    right.add_input(&g).expect("right");
    root.add_input(&left).expect("root left");
    root.add_input(&right).expect("root right");

    assert_eq!(root.updated_data().as_ref().and_then(scalar), Some(8));
    assert_eq!(g_calls.take(), 1);
    assert_eq!(root_calls.take(), 1);

    g.invalidate_data();
    assert_eq!(root.updated_data().as_ref().and_then(scalar), Some(8));
    assert_eq!(g_calls.get(), 1);
    assert_eq!(root_calls.get(), 1);
}

// ── 3. update() walks every input ───────────────────────────────────────

#[test]
fn update_reports_dirty_inputs_without_regenerating() {
    let fx = GraphFixture::new();
    let (a, a_calls) = value_node(fx.ctx(), 1);
    let (b, _) = value_node(fx.ctx(), 2);
    let (op, op_calls) = sum_node(fx.ctx(), InputBounds::one_to(2));
    let out = output_node(fx.ctx());
    op.add_input(&a).expect("a");
    op.add_input(&b).expect("b");
    out.add_input(&op).expect("op");
    out.updated_data().expect("data");
    assert!(!out.update());

    // Change the second input's parameter; the first input reports clean,
    // the walk must still reach the second.
    b.with_logic_mut(|v: &mut ValueGenerator| v.set_value(10))
        .expect("value logic");
    assert!(out.update());
    assert!(op.is_data_dirty());
    assert_eq!(a_calls.take(), 1);
    assert_eq!(op_calls.take(), 1);

    assert_eq!(out.updated_data().as_ref().and_then(scalar), Some(11));
    assert_eq!(a_calls.get(), 0);
    assert_eq!(op_calls.get(), 1);
    assert!(!out.update());
}

#[test]
fn operator_parameter_change_is_picked_up() {
    let fx = GraphFixture::new();
    let (g, g_calls) = value_node(fx.ctx(), 3);
    let (op, _) = sum_node(fx.ctx(), InputBounds::exactly(1));
    op.add_input(&g).expect("g");
    op.updated_data().expect("data");

    op.with_logic_mut(|s: &mut SumOperator| s.set_bias(100))
        .expect("sum logic");
    assert!(op.update());
    assert_eq!(op.updated_data().as_ref().and_then(scalar), Some(103));
    assert_eq!(g_calls.get(), 1);
}

#[test]
fn parameter_edit_before_first_request_needs_no_invalidation() {
    let fx = GraphFixture::new();
    let (g, g_calls) = value_node(fx.ctx(), 1);
    g.with_logic_mut(|v: &mut ValueGenerator| v.set_value(2))
        .expect("value logic");
    assert!(g.update());
    assert_eq!(g.updated_data().as_ref().and_then(scalar), Some(2));
    assert_eq!(g_calls.get(), 1);
}

// ── 4. Output transparency ──────────────────────────────────────────────

#[test]
fn output_returns_its_input_data_handle() {
    let fx = GraphFixture::new();
    let (op, _) = sum_node(fx.ctx(), InputBounds::one_to(1));
    let (g, _) = value_node(fx.ctx(), 9);
    let out = output_node(fx.ctx());
    op.add_input(&g).expect("g");
    out.add_input(&op).expect("op");

    let via_output = out.updated_data().expect("output data");
    let direct = op.updated_data().expect("operator data");
    assert_eq!(via_output, direct);
    assert_eq!(out.kind(), NodeKind::Output);
    assert!(!out.is_data_allocated());
    assert!(out.data().is_none());
}

#[test]
fn output_update_forwards_input_state() {
    let fx = GraphFixture::new();
    let (g, _) = value_node(fx.ctx(), 1);
    let out = output_node(fx.ctx());
    out.add_input(&g).expect("g");
    assert!(out.update());
    out.updated_data().expect("data");
    assert!(!out.update());
}

// ── 5. Boundary: third input on a max=2 operator ────────────────────────

#[test]
fn third_input_is_rejected_without_side_effects() {
    let fx = GraphFixture::new();
    let (op, _) = sum_node(fx.ctx(), InputBounds::new(1, 2).expect("bounds"));
    let (a, _) = value_node(fx.ctx(), 1);
    let (b, _) = value_node(fx.ctx(), 2);
    let (c, _) = value_node(fx.ctx(), 3);
    op.add_input(&a).expect("a");
    op.add_input(&b).expect("b");
    op.updated_data().expect("data");

    let err = op.add_input(&c).expect_err("third input");
    assert_eq!(
        err,
        GraphError::OperatorInputLimit {
            class: "SumOperator",
            max: 2
        }
    );
    assert_eq!(op.num_inputs(), 2);
    assert_eq!(op.inputs(), vec![a, b]);
    assert!(!op.is_data_dirty());
    assert_eq!(c.ref_count(), 1);
}

// ── 6. Regeneration flags the GPU copy ──────────────────────────────────

#[test]
fn backend_sees_regenerations_through_gpu_flag() {
    let fx = GraphFixture::new();
    let (g, _) = value_node(fx.ctx(), 1);
    let out = output_node(fx.ctx());
    out.add_input(&g).expect("g");

    let data = out.updated_data().expect("data");
    assert!(data.is_gpu_data_dirty());
    data.set_gpu_data(Some(Box::new("uploaded")));
    data.validate_gpu_data();

    out.updated_data().expect("data");
    assert!(!data.is_gpu_data_dirty());

    g.with_logic_mut(|v: &mut ValueGenerator| v.set_value(2))
        .expect("value logic");
    out.update();
    out.updated_data().expect("data");
    assert!(data.is_gpu_data_dirty());
    assert_eq!(data.gpu_data::<&str>().map(|s| *s), Some("uploaded"));
}
