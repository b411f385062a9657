//! Integration tests for JSON Lines, JSON and request rendering.

use std::fs;
use std::io::BufWriter;

use docunit::model::{DocUnit, DocUnitRequest, DocUnitTextRequest, Region};
use docunit::render::{
    build_request, build_text_request, parse_jsonl, to_json, to_jsonl, write_jsonl, JsonFormat,
};
use docunit::{Docunit, Document};

fn units() -> Vec<DocUnit> {
    vec![
        DocUnit::text("LAYOUT_TITLE", "Fattura n. 42")
            .on_page(1)
            .with_region(Region::Header)
            .from_block("title", Some(99.0))
            .with_origin("fattura.pdf"),
        DocUnit::table(vec![
            vec![Some("Descrizione".into()), Some("Importo".into())],
            vec![Some("Consulenza".into()), None],
        ])
        .on_page(1)
        .with_region(Region::Body)
        .from_block("tab", None)
        .with_origin("fattura.pdf"),
    ]
}

#[test]
fn test_jsonl_shape() {
    let jsonl = to_jsonl(&units());
    let lines: Vec<&str> = jsonl.lines().collect();
    assert_eq!(lines.len(), 2);

    let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(first["type"], "TEXT");
    assert_eq!(first["subtype"], "LAYOUT_TITLE");
    assert_eq!(first["blockId"], "title");
    assert_eq!(first["region"], "HEADER");
    assert!(first.get("rows").is_none());
    assert!(first.get("bbox").is_none());

    let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
    assert_eq!(second["type"], "TABLE");
    assert_eq!(second["rows"][1][1], serde_json::Value::Null);
    assert!(second.get("text").is_none());
    assert!(second.get("confidence").is_none());
}

#[test]
fn test_write_jsonl_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("units.jsonl");
    let file = fs::File::create(&path).unwrap();
    write_jsonl(&units(), BufWriter::new(file)).unwrap();

    let written = fs::read_to_string(&path).unwrap();
    assert_eq!(written, to_jsonl(&units()));
    assert_eq!(parse_jsonl(&written).unwrap(), units());
}

#[test]
fn test_document_json() {
    let doc = Document::new(units());
    let pretty = to_json(&doc, JsonFormat::Pretty).unwrap();
    let value: serde_json::Value = serde_json::from_str(&pretty).unwrap();
    assert_eq!(value["metadata"]["text_units"], 1);
    assert_eq!(value["metadata"]["table_units"], 1);
    assert_eq!(value["units"].as_array().unwrap().len(), 2);

    let compact = to_json(&doc, JsonFormat::Compact).unwrap();
    assert!(compact.len() < pretty.len());
}

#[test]
fn test_request_bodies() {
    let fields = ["iban", "totale"];
    let request = build_request(&units(), &fields, Some("Importi in EUR"));
    let json = serde_json::to_string(&request).unwrap();
    let back: DocUnitRequest = serde_json::from_str(&json).unwrap();
    assert_eq!(back, request);
    assert_eq!(back.notes.as_deref(), Some("Importi in EUR"));

    let text_request = build_text_request(&units(), &fields, None);
    let back: DocUnitTextRequest =
        serde_json::from_str(&serde_json::to_string(&text_request).unwrap()).unwrap();
    assert_eq!(parse_jsonl(&back.records).unwrap(), units());
    assert_eq!(back.fields, vec!["iban", "totale"]);
}

#[test]
fn test_builder_outputs() {
    let json = r#"[{"Blocks": [{"Id": "l", "BlockType": "LINE", "Text": "Pagina uno"}]},
                   {"Blocks": [{"Id": "l", "BlockType": "LINE", "Text": "Pagina due"}]}]"#;
    let result = Docunit::new().with_origin("doc.pdf").normalize_str(json).unwrap();

    let request = result.text_request(&["oggetto"], Some("note"));
    assert_eq!(request.records.lines().count(), 2);

    let mut buf = Vec::new();
    result.write_jsonl(&mut buf).unwrap();
    assert_eq!(String::from_utf8(buf).unwrap(), result.to_jsonl());

    let doc_json = result.to_json(JsonFormat::Compact).unwrap();
    assert!(doc_json.contains(r#""origins":["doc.pdf"]"#));
}
