//! End-to-end scenario tests covering the documented S1–S10 walkthroughs:
//! build, parse, ASCII compaction counting, rectangular/square shape
//! selection, format validation, duplicate-DI rejection, and encoding.

use dmc::{DataIdentifier, Error, FieldValue, Facade, Settings};

fn di(s: &str) -> DataIdentifier {
    DataIdentifier::parse(s).expect("valid data identifier")
}

#[test]
fn s1_build_message_with_message_envelope_only() {
    let facade = Facade::with_ansi_mh10(Settings {
        use_format_envelope: false,
        ..Settings::default()
    })
    .unwrap();

    let fields = vec![
        (di("S"), FieldValue::from("123456")),
        (di("V"), FieldValue::from("123H48999")),
    ];
    let out = facade.build_message(&fields).unwrap();
    assert_eq!(out, "[)>\u{1E}S123456\u{1D}V123H48999\u{04}");
}

#[test]
fn s2_parse_four_fields_with_default_format() {
    let facade = Facade::with_ansi_mh10(Settings::default()).unwrap();
    let text = "[)>\u{1E}S123456\u{1D}V123H48999\u{1D}18D202312011155\u{1D}15D24121990\u{04}";

    let parsed = facade.parse(text).unwrap();
    assert_eq!(parsed.value.len(), 1);
    let (_, fields) = &parsed.value[0];
    assert_eq!(fields.len(), 4);
    assert!(fields.iter().all(|f| f.valid));
    let dis: Vec<&str> = fields.iter().map(|f| f.di.as_str()).collect();
    assert_eq!(dis, ["S", "V", "18D", "15D"]);
}

#[test]
fn s3_even_digit_run_compacts_to_four() {
    let facade = Facade::with_ansi_mh10(Settings::default()).unwrap();
    assert_eq!(facade.count_ascii_characters("S123456"), 4);
}

#[test]
fn s4_odd_digit_run_compacts_to_four() {
    let facade = Facade::with_ansi_mh10(Settings::default()).unwrap();
    assert_eq!(facade.count_ascii_characters("S12345"), 4);
}

#[test]
fn s5_rectangular_nine_codewords_selects_12x26() {
    let (shape, warning) = dmc::rectangular::select_shape(dmc::rectangular::RECTANGULAR_SHAPES, 9).unwrap();
    assert_eq!((shape.rows, shape.cols), (12, 26));
    assert!(warning.is_none());
}

#[test]
fn s6_rectangular_fiftyfive_codewords_selects_20x48_with_warning() {
    let (shape, warning) = dmc::rectangular::select_shape(dmc::rectangular::RECTANGULAR_SHAPES, 55).unwrap();
    assert_eq!((shape.rows, shape.cols), (20, 48));
    assert!(matches!(warning, Some(dmc::Diagnostic::DmreWarning { .. })));
}

#[test]
fn s7_format_matches() {
    let facade = Facade::with_ansi_mh10(Settings::default()).unwrap();
    let parsed = facade
        .parse("[)>\u{1E}27D20170615\u{04}")
        .unwrap();
    assert!(parsed.value[0].1[0].valid);
}

#[test]
fn s8_too_short_format_fails_in_strict_mode() {
    let facade = Facade::with_ansi_mh10(Settings {
        app_strict: true,
        ..Settings::default()
    })
    .unwrap();
    let result = facade.parse("[)>\u{1E}27D2017061\u{04}");
    assert!(matches!(result, Err(Error::FormatMismatch { .. })));
}

#[test]
fn s9_duplicate_data_identifier_is_rejected_before_encoding() {
    let facade = Facade::with_ansi_mh10(Settings::default()).unwrap();
    let fields = vec![(di("S"), FieldValue::from("1")), (di("S"), FieldValue::from("2"))];
    assert!(matches!(
        facade.build_message(&fields),
        Err(Error::DuplicateDataIdentifier { .. })
    ));
    // and generate() must fail the same way, never reaching the encoder.
    assert!(matches!(
        facade.generate(&fields),
        Err(Error::DuplicateDataIdentifier { .. })
    ));
}

#[test]
fn s10_quiet_zone_two_leaves_first_and_last_two_rows_and_columns_light() {
    let facade = Facade::with_ansi_mh10(Settings {
        use_format_envelope: false,
        number_quiet_zone_modules: 2,
        ..Settings::default()
    })
    .unwrap();

    let fields = vec![
        (di("S"), FieldValue::from("123456")),
        (di("V"), FieldValue::from("123H48999")),
    ];
    let outcome = facade.generate(&fields).unwrap();
    let bitmap = &outcome.value;

    for margin_row in [0, 1, bitmap.rows - 1, bitmap.rows - 2] {
        assert!(
            (0..bitmap.cols).all(|c| !bitmap.get(margin_row, c)),
            "row {margin_row} should be all-light quiet zone"
        );
    }
    for margin_col in [0, 1, bitmap.cols - 1, bitmap.cols - 2] {
        assert!(
            (0..bitmap.rows).all(|r| !bitmap.get(r, margin_col)),
            "column {margin_col} should be all-light quiet zone"
        );
    }
}

#[test]
fn full_round_trip_build_generate_parse() {
    let facade = Facade::with_ansi_mh10(Settings::default()).unwrap();
    let fields = vec![
        (di("S"), FieldValue::from("123456")),
        (di("V"), FieldValue::from("123H48999")),
    ];

    let message = facade.build_message(&fields).unwrap();
    let outcome = facade.generate(&fields).unwrap();
    assert!(outcome.value.rows > 0 && outcome.value.cols > 0);

    let parsed = facade.parse(&message).unwrap();
    let (_, parsed_fields) = &parsed.value[0];
    assert_eq!(parsed_fields.len(), 2);
    assert_eq!(parsed_fields[0].di.as_str(), "S");
    assert_eq!(parsed_fields[1].di.as_str(), "V");
}
