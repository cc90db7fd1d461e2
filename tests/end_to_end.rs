use cellsim_tables::sequences::{compact, reconstruct, Alphabet};
use cellsim_tables::translation::{HalfLives, MonomerRecord};
use cellsim_tables::units::registry::{count, gram_per_mole, minute};
use cellsim_tables::{
    ColumnData, ColumnValue, DataError, ParameterArchive, Quantity, RowSelector, TranslationConfig,
    TranslationData, TranslationInputs, Unit, UnitTable, UnitTag,
};
use nalgebra::DMatrix;
use std::collections::HashMap;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn monomer_table() -> UnitTable {
    UnitTable::new(
        vec![
            ("id".to_string(), ColumnData::text(["A", "B", "C"])),
            ("length".to_string(), ColumnData::Int(vec![3, 1, 2])),
            ("mass".to_string(), ColumnData::Float(vec![1.0, 2.0, 3.0])),
        ],
        HashMap::from([
            ("id".to_string(), UnitTag::Unitless),
            ("length".to_string(), UnitTag::Unit(count())),
            ("mass".to_string(), UnitTag::Unit(gram_per_mole())),
        ]),
    )
    .unwrap()
}

#[test]
fn mass_column_converts_to_kg_per_mol() {
    init_logging();
    let table = monomer_table();
    let mass = table.quantity("mass").unwrap();
    let kg_per_mol = Unit::parse("kg/mol").unwrap();
    let values = mass.values_in(&kg_per_mol).unwrap();
    for (got, want) in values.iter().zip([0.001, 0.002, 0.003]) {
        assert!((got - want).abs() < 1e-15);
    }
}

#[test]
fn unit_checked_writes() {
    init_logging();
    let mut table = monomer_table();

    let err = table.set_column("mass", ColumnData::Float(vec![4.0, 5.0, 6.0])).unwrap_err();
    assert!(matches!(err, DataError::UnitMismatch(_)));

    let new_mass = Quantity::new(ColumnData::Float(vec![4.0, 5.0, 6.0]), gram_per_mole()).unwrap();
    table.set_column("mass", new_mass.clone()).unwrap();
    assert_eq!(table.quantity("mass").unwrap(), new_mass);

    table.set_column("id", ColumnData::text(["X", "Y", "Z"])).unwrap();
    match table.column("id").unwrap() {
        ColumnValue::Array(ColumnData::Text(ids)) => assert_eq!(ids, vec!["X", "Y", "Z"]),
        other => panic!("expected text array, got {:?}", other),
    }

    let tail = table.subset(&RowSelector::Range(1..3)).unwrap();
    assert_eq!(tail.len(), 2);
    assert_eq!(tail.unit_of("length").unwrap(), &UnitTag::Unit(count()));
}

#[test]
fn codec_round_trip() {
    init_logging();
    let padded = DMatrix::from_row_slice(2, 4, &[1i64, 2, 9, 9, 3, 9, 9, 9]);
    let compacted = compact(&padded, 9);
    assert_eq!(compacted.rows, vec![vec![1, 2], vec![3]]);
    assert_eq!(compacted.shape, (2, 4));
    assert_eq!(reconstruct(&compacted.rows, compacted.shape, 9).unwrap(), padded);
}

fn monomer(id: &str, sequence: &str) -> MonomerRecord {
    MonomerRecord {
        id: id.into(),
        compartment: "c".into(),
        cistron_id: format!("{}_RNA", id),
        gene_id: format!("{}_GENE", id),
        sequence: sequence.into(),
        mw: &gram_per_mole() * (sequence.len() as f64 * 110.0),
        cleaves_initial_methionine: false,
    }
}

fn translation_inputs() -> TranslationInputs {
    let alphabet = Alphabet::amino_acids();
    let aa_mws = (0..alphabet.len()).map(|i| 100.0 + i as f64).collect();
    TranslationInputs {
        monomers: vec![monomer("RPSA", "MAKV"), monomer("GLTA", "MVVVAK")],
        half_lives: HalfLives {
            n_end_rule: HashMap::from([('M', &minute() * 600.0)]),
            ..HalfLives::default()
        },
        translation_efficiency: HashMap::from([
            ("RPSA_GENE".to_string(), 3.0),
            ("GLTA_GENE".to_string(), 1.0),
        ]),
        ribosomal_protein_ids: vec!["RPSA[c]".into()],
        alphabet,
        amino_acid_mws: Quantity::new(ColumnData::Float(aa_mws), gram_per_mole()).unwrap(),
        water_mw: &gram_per_mole() * 18.015,
        footprint_sizes: HashMap::from([("active_ribosome".to_string(), 24)]),
    }
}

#[test]
fn translation_data_survives_archive() {
    init_logging();
    let config = TranslationConfig::default();
    let data = TranslationData::build(&translation_inputs(), &config).unwrap();
    assert_eq!(data.translation_sequences.shape(), (2, 6 + 44 + 1));

    let dir = std::env::temp_dir().join(format!("cellsim-e2e-{}", uuid::Uuid::new_v4()));
    let mut archive = ParameterArchive::open(&dir).unwrap();
    archive.save(&data, "translation parameters").unwrap();

    let restored: TranslationData = ParameterArchive::open(&dir).unwrap().load_latest().unwrap();
    assert_eq!(restored, data);
    assert_eq!(restored.translation_sequences.padded(), data.translation_sequences.padded());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_footprint_is_an_error() {
    init_logging();
    let mut inputs = translation_inputs();
    inputs.footprint_sizes.clear();
    let err = TranslationData::build(&inputs, &TranslationConfig::default()).unwrap_err();
    assert!(matches!(err, DataError::Lookup(_)));
}
