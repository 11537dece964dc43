//! Demonstrates building, encoding, and parsing a Data Matrix identifier
//! message end to end using the [`dmc`] façade.

use dmc::{DataIdentifier, FieldValue, Facade, Settings};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    basic_example()
}

fn basic_example() -> Result<(), Box<dyn std::error::Error>> {
    let facade = Facade::with_ansi_mh10(Settings::default())?;

    let fields = vec![
        (DataIdentifier::parse("S").ok_or("bad DI")?, FieldValue::from("123456")),
        (DataIdentifier::parse("V").ok_or("bad DI")?, FieldValue::from("123H48999")),
    ];

    let message = facade.build_message(&fields)?;
    println!("Built message: {message:?}");
    println!("ASCII-compacted codewords: {}", facade.count_ascii_characters(&message));

    let outcome = facade.generate(&fields)?;
    println!("Symbol size: {}x{}", outcome.value.rows, outcome.value.cols);
    for diagnostic in &outcome.diagnostics {
        println!("warning: {diagnostic}");
    }
    print!("{}", outcome.value.to_ascii_art());

    let parsed = facade.parse(&message)?;
    for (format, validated_fields) in &parsed.value {
        println!("format {format}:");
        for field in validated_fields {
            println!("  {} = {:?} (valid: {})", field.di, field.raw, field.valid);
        }
    }

    Ok(())
}
