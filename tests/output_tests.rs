use massif_trace::output::{read_profile, to_profile, write_profile, AllocationSite};
use massif_trace::parser::parse;
use massif_trace::utils::config::SCHEMA_VERSION;

fn sample_input() -> &'static str {
    "desc: (none)\ncmd: ./app\ntime_unit: i\n#-----------\nsnapshot=0\n#-----------\ntime=10\nmem_heap_B=640\nmem_heap_extra_B=16\nmem_stacks_B=0\nheap_tree=peak\nn0:640 root\n"
}

#[test]
fn test_to_profile_fields() {
    let trace = parse(sample_input().as_bytes(), &[]).expect("valid trace");
    let sites = vec![AllocationSite {
        path: "root".to_string(),
        bytes: 640,
        percentage: 100.0,
    }];

    let profile = to_profile(&trace, sites);

    assert_eq!(profile.version, SCHEMA_VERSION);
    assert_eq!(profile.description, "(none)");
    assert_eq!(profile.command, "./app");
    assert_eq!(profile.time_unit, "i");
    assert_eq!(profile.snapshot_count, 1);
    let peak = profile.peak.expect("peak present");
    assert_eq!(peak.snapshot, 0);
    assert_eq!(peak.mem_heap, 640);
    assert_eq!(profile.hot_sites.len(), 1);
    assert!(!profile.generated_at.is_empty());
}

#[test]
fn test_profile_round_trip_through_file() {
    let trace = parse(sample_input().as_bytes(), &[]).expect("valid trace");
    let profile = to_profile(&trace, Vec::new());

    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("profile.json");
    write_profile(&profile, &path).expect("write succeeds");

    let loaded = read_profile(&path).expect("read succeeds");
    assert_eq!(loaded.version, profile.version);
    assert_eq!(loaded.command, profile.command);
    assert_eq!(loaded.snapshot_count, 1);
    assert_eq!(loaded.peak.expect("peak present").mem_heap, 640);
}

#[test]
fn test_profile_without_peak_omits_field() {
    let trace = parse("desc: d\ncmd: c\ntime_unit: i\n".as_bytes(), &[]).expect("valid trace");
    let profile = to_profile(&trace, Vec::new());
    assert!(profile.peak.is_none());

    let json = serde_json::to_string(&profile).expect("serializes");
    assert!(!json.contains("\"peak\""));
}

#[test]
fn test_write_creates_parent_directories() {
    let trace = parse(sample_input().as_bytes(), &[]).expect("valid trace");
    let profile = to_profile(&trace, Vec::new());

    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("nested/out/profile.json");
    write_profile(&profile, &path).expect("write succeeds");
    assert!(path.is_file());
}
