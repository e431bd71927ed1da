use massif_trace::parser::{parse, ParseError};
use massif_trace::trace::Trace;
use pretty_assertions::assert_eq;

fn parse_str(input: &str, allocators: &[&str]) -> Result<Trace, ParseError> {
    let allocators: Vec<String> = allocators.iter().map(|s| s.to_string()).collect();
    parse(input.as_bytes(), &allocators)
}

fn header() -> String {
    "desc: --time-unit=i\ncmd: ./app --flag\ntime_unit: i\n".to_string()
}

fn snapshot_block(number: u32, time: u64, heap: u64, tree_kind: &str) -> String {
    format!(
        "#-----------\nsnapshot={number}\n#-----------\ntime={time}\nmem_heap_B={heap}\nmem_heap_extra_B=8\nmem_stacks_B=0\nheap_tree={tree_kind}\n"
    )
}

#[test]
fn round_trip_minimal_trace() {
    let input = format!(
        "{}{}n2:100 root\n n0:60 0x1: a (a.cpp:1)\n n0:40 0x2: b (b.cpp:2)\n",
        header(),
        snapshot_block(0, 1000, 100, "detailed")
    );
    let trace = parse_str(&input, &[]).expect("well-formed trace");

    assert_eq!(trace.description(), "--time-unit=i");
    assert_eq!(trace.command(), "./app --flag");
    assert_eq!(trace.time_unit(), "i");
    assert_eq!(trace.snapshots().len(), 1);

    let snapshot = &trace.snapshots()[0];
    assert_eq!(snapshot.number, 0);
    assert_eq!(snapshot.time, 1000.0);
    assert_eq!(snapshot.mem_heap, 100);
    assert_eq!(snapshot.mem_heap_extra, 8);
    assert_eq!(snapshot.mem_stacks, 0);

    let tree = snapshot.heap_tree.as_ref().expect("detailed snapshot");
    assert_eq!(tree.len(), 3);
    let root = tree.node(tree.root());
    assert_eq!(root.label(), "root");
    assert_eq!(root.children().len(), 2);
}

#[test]
fn snapshot_order_follows_file_order() {
    let input = format!(
        "{}{}{}{}",
        header(),
        snapshot_block(7, 100, 10, "empty"),
        snapshot_block(3, 200, 20, "empty"),
        snapshot_block(11, 300, 30, "empty")
    );
    let trace = parse_str(&input, &[]).expect("well-formed trace");

    let numbers: Vec<u32> = trace.snapshots().iter().map(|s| s.number).collect();
    assert_eq!(numbers, vec![7, 3, 11]);
}

#[test]
fn truncated_tree_yields_partial_subtree() {
    // the root declares 3 children but the dump stops after the first
    let input = format!(
        "{}{}n3:100 root\n n0:30 0x1: a (a.cpp:1)\n",
        header(),
        snapshot_block(0, 0, 100, "detailed")
    );
    let trace = parse_str(&input, &[]).expect("truncation is not an error");

    let tree = trace.snapshots()[0].heap_tree.as_ref().expect("partial tree kept");
    assert_eq!(tree.node(tree.root()).children().len(), 1);
}

#[test]
fn truncation_before_tree_root_is_tolerated() {
    let input = format!("{}{}", header(), snapshot_block(0, 0, 100, "detailed"));
    let trace = parse_str(&input, &[]).expect("truncation is not an error");
    assert!(trace.snapshots()[0].heap_tree.is_none());
}

#[test]
fn empty_entries_consume_child_slots() {
    let input = format!(
        "{}{}n3:100 root\n n0:60 0x1: a (a.cpp:1)\n n0:0 ignored\n n0:40 0x2: b (b.cpp:2)\n",
        header(),
        snapshot_block(0, 0, 100, "detailed")
    );
    let trace = parse_str(&input, &[]).expect("well-formed trace");

    let tree = trace.snapshots()[0].heap_tree.as_ref().expect("tree present");
    assert!(tree.node(tree.root()).children().len() <= 2);
}

#[test]
fn peak_prefers_max_heap_among_tree_bearing_snapshots() {
    let input = format!(
        "{}{}{}n0:500 root b\n{}n0:300 root c\n",
        header(),
        snapshot_block(0, 100, 100, "empty"),
        snapshot_block(1, 200, 500, "detailed"),
        snapshot_block(2, 300, 300, "detailed")
    );
    let trace = parse_str(&input, &[]).expect("well-formed trace");

    assert_eq!(trace.peak_index(), Some(1));
    assert_eq!(trace.peak().expect("peak selected").mem_heap, 500);
}

#[test]
fn explicit_peak_marker_wins_over_larger_heap() {
    let input = format!(
        "{}{}{}n0:500 root b\n{}n0:300 root c\n",
        header(),
        snapshot_block(0, 100, 100, "empty"),
        snapshot_block(1, 200, 500, "detailed"),
        snapshot_block(2, 300, 300, "peak")
    );
    let trace = parse_str(&input, &[]).expect("well-formed trace");

    assert_eq!(trace.peak_index(), Some(2));
    assert_eq!(trace.peak().expect("peak selected").mem_heap, 300);
}

#[test]
fn peak_falls_back_to_any_snapshot_without_trees() {
    let input = format!(
        "{}{}{}",
        header(),
        snapshot_block(0, 100, 10, "empty"),
        snapshot_block(1, 200, 90, "empty")
    );
    let trace = parse_str(&input, &[]).expect("well-formed trace");
    assert_eq!(trace.peak_index(), Some(1));
}

#[test]
fn trace_without_snapshots_has_no_peak() {
    let trace = parse_str(&header(), &[]).expect("headers alone are a valid trace");
    assert!(trace.snapshots().is_empty());
    assert!(trace.peak().is_none());
}

#[test]
fn below_threshold_buckets_merge_deterministically() {
    let input = format!(
        "{}{}n3:100 root\n n0:10 in 5 places, all below threshold\n n1:50 0x1: pool_alloc (p.c:1)\n  n0:50 0x2: caller (m.c:2)\n n0:20 in 3 places, all below threshold\n",
        header(),
        snapshot_block(0, 0, 100, "detailed")
    );
    let trace = parse_str(&input, &["pool_alloc"]).expect("well-formed trace");

    let tree = trace.snapshots()[0].heap_tree.as_ref().expect("tree present");
    let children: Vec<(String, u64)> = tree
        .node(tree.root())
        .children()
        .iter()
        .map(|&id| (tree.node(id).label().to_string(), tree.node(id).cost()))
        .collect();

    assert_eq!(
        children,
        vec![
            ("0x2: caller (m.c:2)".to_string(), 50),
            ("in 8 places, all below threshold".to_string(), 30),
        ]
    );
}

#[test]
fn missing_time_unit_reports_offending_line() {
    let input = "desc: d\ncmd: c\n#-----------\n";
    let err = parse_str(input, &[]).expect_err("time_unit is required");

    assert_eq!(err.line(), Some(2));
    assert_eq!(err.line_text(), Some("#-----------"));
    assert!(matches!(err, ParseError::BadRecord { .. }));
}

#[test]
fn non_numeric_time_is_a_numeric_error() {
    let input = format!(
        "{}#-----------\nsnapshot=0\n#-----------\ntime=abc\n",
        header()
    );
    let err = parse_str(&input, &[]).expect_err("strict numeric parsing");

    assert!(matches!(err, ParseError::BadNumber { line: 6, .. }));
    assert_eq!(err.line_text(), Some("time=abc"));
}

#[test]
fn non_numeric_snapshot_number_is_fatal() {
    let input = format!("{}#-----------\nsnapshot=x\n#-----------\n", header());
    let err = parse_str(&input, &[]).expect_err("strict numeric parsing");
    assert!(matches!(err, ParseError::BadNumber { line: 4, .. }));
}

#[test]
fn unknown_tree_kind_is_fatal() {
    let input = format!(
        "{}#-----------\nsnapshot=0\n#-----------\ntime=0\nmem_heap_B=1\nmem_heap_extra_B=0\nmem_stacks_B=0\nheap_tree=bogus\n",
        header()
    );
    let err = parse_str(&input, &[]).expect_err("unknown tree kind");
    assert_eq!(err.line_text(), Some("heap_tree=bogus"));
}

#[test]
fn eof_after_opening_separator_is_fatal() {
    // the snapshot header is a three-line unit; stopping after the first
    // separator is a missing required section, not a clean end of trace
    let input = format!("{}#-----------\n", header());
    let err = parse_str(&input, &[]).expect_err("header triple incomplete");
    assert!(matches!(err, ParseError::UnexpectedEof { line: 4 }));
}

#[test]
fn eof_after_snapshot_number_is_fatal() {
    let input = format!("{}#-----------\nsnapshot=0\n", header());
    let err = parse_str(&input, &[]).expect_err("closing separator missing");
    assert!(matches!(err, ParseError::UnexpectedEof { line: 5 }));
}

#[test]
fn eof_inside_scalar_fields_is_fatal() {
    let input = format!("{}#-----------\nsnapshot=0\n#-----------\ntime=5\n", header());
    let err = parse_str(&input, &[]).expect_err("missing required fields");
    assert!(matches!(err, ParseError::UnexpectedEof { line: 7 }));
}

#[test]
fn empty_input_is_fatal() {
    let err = parse_str("", &[]).expect_err("missing required sections");
    assert!(matches!(err, ParseError::UnexpectedEof { line: 0 }));
}
