use ciraig::{Circuit, GateId, GateKind, literal};
use rstest::rstest;

const DIAMOND: &str = "aag 5 2 0 1 3\n2\n4\n10\n6 2 4\n8 6 2\n10 6 9\n";
const HALF_ADDER: &str = "aag 7 2 0 2 4\n2\n4\n13\n6\n6 2 4\n8 2 5\n10 3 4\n12 9 11\n\
                          i0 a\ni1 b\no0 sum\no1 carry\nc\nhalf adder\n";
const FLOATING: &str = "aag 3 1 0 1 1\n2\n6\n6 2 5\n";
const CONSTANTS: &str = "aag 3 1 0 3 1\n2\n1\n0\n6\n6 0 3\n";
const SHARED: &str = "aag 4 2 0 3 2\n4\n2\n8\n9\n6\n6 4 2\n8 7 3\n";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn read(src: &str) -> Circuit {
    Circuit::read_circuit(src.as_bytes()).unwrap()
}

/// Kind, id and signed fanins of each gate of the canonical order.
fn listing(cir: &Circuit) -> Vec<(GateKind, GateId, Vec<(GateId, bool)>)> {
    cir.get_dfs_list()
        .iter()
        .map(|&id| {
            let gate = cir.get_gate(id).unwrap();
            let fanins = gate.get_fanins().iter().map(|pin| pin.into()).collect();
            (gate.get_kind(), id, fanins)
        })
        .collect()
}

#[rstest]
#[case(DIAMOND)]
#[case(HALF_ADDER)]
#[case(FLOATING)]
#[case(CONSTANTS)]
#[case(SHARED)]
fn roundtrip_test(#[case] src: &str) {
    init_tracing();
    let cir = read(src);
    let written = cir.to_aag_string().unwrap();
    let again = read(&written);

    assert_eq!(listing(&again), listing(&cir));
    assert_eq!(again.get_header(), cir.get_header());
    assert_eq!(again.get_comments(), cir.get_comments());
    // Writing is a fixed point once the file is canonical.
    assert_eq!(again.to_aag_string().unwrap(), written);
}

#[test]
fn dead_logic_roundtrip_test() {
    init_tracing();
    // 4 = 1 & !2 and 5 = 4 & 3 are not read by the output.
    let src = "aag 5 2 0 1 3\n2\n4\n6\n6 2 4\n8 2 5\n10 8 6\n";
    let cir = read(src);
    assert_eq!(cir.get_ands(), &[3, 4, 5]);
    assert!(cir.report_floating().contains("Gates defined but not used  : 5\n"));

    let again = read(&cir.to_aag_string().unwrap());
    assert_eq!(again.get_header().a, 1);
    assert_eq!(again.get_ands(), &[3]);
    assert!(again.get_gate(4).is_none() && again.get_gate(5).is_none());
    assert_eq!(listing(&again), listing(&cir));
}

#[rstest]
#[case(DIAMOND)]
#[case(HALF_ADDER)]
#[case(FLOATING)]
#[case(CONSTANTS)]
#[case(SHARED)]
fn id_partition_test(#[case] src: &str) {
    let cir = read(src);
    let header = cir.get_header();
    let m = header.m as GateId;

    assert!(cir.get_gate(0).unwrap().is_const0());
    for id in 1..=m {
        if let Some(gate) = cir.get_gate(id) {
            assert!(matches!(
                gate.get_kind(),
                GateKind::PrimaryInput | GateKind::And | GateKind::Undefined
            ));
            assert_eq!(gate.get_id(), id);
        }
    }
    let expected: Vec<GateId> = (m + 1..=m + header.o as GateId).collect();
    assert_eq!(cir.get_outputs(), expected.as_slice());
    assert_eq!(cir.get_table_size(), m + header.o as usize + 1);
}

#[rstest]
#[case(DIAMOND)]
#[case(HALF_ADDER)]
#[case(SHARED)]
fn fanout_mirror_test(#[case] src: &str) {
    let cir = read(src);
    for gate in cir.gates() {
        for pin in gate.get_fanins() {
            let fanin = cir.get_gate(pin.get_gate_id()).unwrap();
            assert!(fanin.get_fanouts().contains(&gate.get_id()));
        }
        for &fanout in gate.get_fanouts() {
            let consumer = cir.get_gate(fanout).unwrap();
            assert!(consumer.fanin_phase_of(gate.get_id()).is_some());
        }
        assert!(gate.get_fanouts().is_sorted());
    }
}

#[test]
fn literal_codec_test() {
    for lit in 0..64u64 {
        let (id, inverted) = literal::decode(lit);
        assert_eq!(literal::encode(id, inverted), lit);
    }
}

#[test]
fn cone_depth_zero_test() {
    let cir = read(HALF_ADDER);
    for gate in cir.gates() {
        let id = gate.get_id();
        for report in [cir.report_fanin(id, 0).unwrap(), cir.report_fanout(id, 0).unwrap()] {
            assert_eq!(report.lines().count(), 1);
            assert!(report.trim_start_matches('!').starts_with(gate.get_kind().type_str()));
        }
    }
}

#[test]
fn read_file_test() {
    init_tracing();
    let path = std::env::temp_dir().join(format!("ciraig-roundtrip-{}.aag", std::process::id()));
    std::fs::write(&path, HALF_ADDER).unwrap();
    let cir = Circuit::read_file(&path);
    std::fs::remove_file(&path).unwrap();

    let cir = cir.unwrap();
    assert_eq!(cir.get_gate(1).unwrap().get_symbol(), Some("a"));
    assert_eq!(cir.get_comments(), &["c", "half adder"]);
    assert_eq!(cir.report_pos(), "POs of the circuit: 8 9\n");
}
