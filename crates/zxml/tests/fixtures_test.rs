use std::fs;
use zxml::{from_file, from_str};

#[test]
fn test_valid_fixtures() -> Result<(), Box<dyn std::error::Error>> {
    let valid_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/valid");
    for entry in fs::read_dir(valid_dir)? {
        let path = entry?.path();
        if let Err(err) = from_file(&path) {
            return Err(std::io::Error::other(format!(
                "Failed to parse valid file {path:?}: {err}"
            ))
            .into());
        }
    }
    Ok(())
}

#[test]
fn test_invalid_fixtures() -> Result<(), Box<dyn std::error::Error>> {
    let invalid_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/invalid");
    for entry in fs::read_dir(invalid_dir)? {
        let path = entry?.path();
        match from_file(&path) {
            Ok(_) => {
                return Err(std::io::Error::other(format!(
                    "Should fail to parse invalid file: {path:?}"
                ))
                .into());
            }
            Err(err) if !err.is_syntax() => {
                return Err(std::io::Error::other(format!(
                    "Expected a syntax error for {path:?}, got {err}"
                ))
                .into());
            }
            Err(_) => {}
        }
    }
    Ok(())
}

#[test]
fn test_valid_fixtures_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let valid_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/valid");
    for entry in fs::read_dir(valid_dir)? {
        let path = entry?.path();
        let doc = from_file(&path)?;
        let reparsed = from_str(&doc.to_string())?;
        if reparsed != doc {
            return Err(std::io::Error::other(format!(
                "Round trip changed the tree of {path:?}"
            ))
            .into());
        }
    }
    Ok(())
}

#[test]
fn test_fixture_contents() -> Result<(), Box<dyn std::error::Error>> {
    let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/valid");

    let doc = from_file(format!("{dir}/escapes.xml"))?;
    let root = doc.root();
    assert_eq!(root.child("line", 0)?.attribute("text")?, "say \"hi\"");
    assert_eq!(root.child("path", 0)?.attribute("value")?, "c:\\data\\scene.xml");
    assert_eq!(root.child("formula", 0)?.value(), "1 < 2 > 0");

    let doc = from_file(format!("{dir}/mixed_text.xml"))?;
    assert_eq!(
        doc.root().value(),
        "first part\n    \n    second part / with ? and = signs"
    );

    let doc = from_file(format!("{dir}/nested.xml"))?;
    let textures = doc.root().find_by_name("texture", true);
    assert_eq!(textures.len(), 2);
    assert_eq!(doc.root().child("light", 0)?.attribute("range")?, "10");

    let doc = from_file(format!("{dir}/unicode.xml"))?;
    assert_eq!(doc.root().name(), "текст");
    assert_eq!(doc.root().value(), "Привет, мир");
    Ok(())
}
