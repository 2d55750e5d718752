// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
//! Reference counting, destruction order and topology edits, observed
//! through the tracking allocators of [`GraphFixture`].

use kiln_dry_tests::{output_node, scalar, sum_node, value_node, GraphFixture, SumOperator};
use kiln_graph::{GraphError, InputBounds};

#[test]
fn node_dies_after_last_of_n_handles() {
    let fx = GraphFixture::new();
    let (g, _) = value_node(fx.ctx(), 0);
    let weak = g.downgrade();
    let handles: Vec<_> = (0..6).map(|_| g.clone()).collect();
    assert_eq!(g.ref_count(), 7);
    drop(g);

    for (released, handle) in handles.into_iter().enumerate() {
        assert!(!weak.is_released(), "destroyed after {released} releases");
        assert_eq!(fx.live_nodes(), 1);
        drop(handle);
    }
    assert!(weak.is_released());
    assert_eq!(fx.live_nodes(), 0);
    assert_eq!(fx.nodes.releases(), 1);
}

#[test]
fn shared_input_survives_first_consumer() {
    let fx = GraphFixture::new();
    let (g, _) = value_node(fx.ctx(), 2);
    let (left, _) = sum_node(fx.ctx(), InputBounds::exactly(1));
    let (right, _) = sum_node(fx.ctx(), InputBounds::exactly(1));
    left.add_input(&g).expect("left");
    right.add_input(&g).expect("right");
    let weak_g = g.downgrade();
    drop(g);

    drop(left);
    assert!(!weak_g.is_released());
    assert_eq!(right.updated_data().as_ref().and_then(scalar), Some(2));

    drop(right);
    assert!(weak_g.is_released());
    assert_eq!(fx.live_nodes(), 0);
    assert_eq!(fx.live_data(), 0);
}

#[test]
fn dropping_root_releases_whole_chain() {
    let fx = GraphFixture::new();
    let out = output_node(fx.ctx());
    {
        let (g, _) = value_node(fx.ctx(), 1);
        let (op, _) = sum_node(fx.ctx(), InputBounds::one_to(2));
        op.add_input(&g).expect("g");
        out.add_input(&op).expect("op");
    }
    out.updated_data().expect("data");
    assert_eq!(fx.live_nodes(), 3);
    assert_eq!(fx.live_data(), 2);
    assert!(fx.data.live_bytes() > 0);

    drop(out);
    assert_eq!(fx.live_nodes(), 0);
    assert_eq!(fx.live_data(), 0);
    assert_eq!(fx.nodes.live_bytes(), 0);
    assert_eq!(fx.data.live_bytes(), 0);
}

#[test]
fn returned_data_outlives_its_node() {
    let fx = GraphFixture::new();
    let (g, _) = value_node(fx.ctx(), 8);
    let data = g.updated_data().expect("data");
    drop(g);
    assert_eq!(fx.live_nodes(), 0);
    assert_eq!(fx.live_data(), 1);
    assert_eq!(scalar(&data), Some(8));
    drop(data);
    assert_eq!(fx.live_data(), 0);
}

#[test]
fn remove_all_inputs_runs_hook_last_first() {
    let fx = GraphFixture::new();
    let (op, _) = sum_node(fx.ctx(), InputBounds::one_to(3));
    for v in 0..3 {
        let (g, _) = value_node(fx.ctx(), v);
        op.add_input(&g).expect("input");
    }
    assert_eq!(op.remove_all_inputs(), 3);
    assert_eq!(
        op.with_logic(SumOperator::removals),
        Some(vec![2, 1, 0])
    );
    assert_eq!(fx.live_nodes(), 1);
}

#[test]
fn remove_input_keeps_order_and_invalidates() {
    let fx = GraphFixture::new();
    let (op, op_calls) = sum_node(fx.ctx(), InputBounds::one_to(4));
    let inputs: Vec<_> = (1..=4).map(|v| value_node(fx.ctx(), v).0).collect();
    for input in &inputs {
        op.add_input(input).expect("input");
    }
    assert_eq!(op.updated_data().as_ref().and_then(scalar), Some(10));

    assert_eq!(op.remove_input(&inputs[1]), Ok(1));
    assert_eq!(
        op.inputs(),
        vec![inputs[0].clone(), inputs[2].clone(), inputs[3].clone()]
    );
    assert!(op.is_data_dirty());
    assert_eq!(op.updated_data().as_ref().and_then(scalar), Some(8));
    assert_eq!(op_calls.get(), 2);
    assert_eq!(op.with_logic(SumOperator::removals), Some(vec![1]));
}

#[test]
fn removing_unknown_input_changes_nothing() {
    let fx = GraphFixture::new();
    let (op, _) = sum_node(fx.ctx(), InputBounds::one_to(2));
    let (a, _) = value_node(fx.ctx(), 1);
    let (stranger, _) = value_node(fx.ctx(), 2);
    op.add_input(&a).expect("a");
    op.updated_data().expect("data");

    assert_eq!(
        op.remove_input(&stranger),
        Err(GraphError::InputNotFound {
            class: "SumOperator"
        })
    );
    assert_eq!(op.num_inputs(), 1);
    assert!(!op.is_data_dirty());
}

#[test]
fn release_data_and_propagate_reclaims_memory() {
    let fx = GraphFixture::new();
    let (g, g_calls) = value_node(fx.ctx(), 3);
    let (op, op_calls) = sum_node(fx.ctx(), InputBounds::exactly(1));
    let out = output_node(fx.ctx());
    op.add_input(&g).expect("g");
    out.add_input(&op).expect("op");
    out.updated_data().expect("data");
    assert_eq!(fx.live_data(), 2);

    out.release_data_and_propagate();
    assert_eq!(fx.live_data(), 0);
    assert_eq!(fx.live_nodes(), 3);
    assert_eq!(out.num_inputs(), 1);
    assert_eq!(op.num_inputs(), 1);

    let mut updated = false;
    let data = out.get_updated_data(&mut updated).expect("data");
    assert!(updated);
    assert_eq!(scalar(&data), Some(3));
    assert_eq!(g_calls.get(), 2);
    assert_eq!(op_calls.get(), 2);
}

#[test]
fn released_data_handle_held_elsewhere_stays_alive() {
    let fx = GraphFixture::new();
    let (g, _) = value_node(fx.ctx(), 3);
    let held = g.updated_data().expect("data");
    g.release_data_and_propagate();
    assert_eq!(fx.live_data(), 1);

    let fresh = g.updated_data().expect("data");
    assert_ne!(fresh, held);
    assert_eq!(fx.live_data(), 2);
}
