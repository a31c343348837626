//! REDCap API behavior against a local mock server.

use std::net::TcpListener;

use httpmock::Method::POST;
use httpmock::MockServer;
use lake_model::{FileEncoding, LakeLayout, RedcapConfig};
use lake_redcap::{ExportOptions, LEGACY_ENCODING, RedcapClient, RedcapError};

const TOKEN: &str = "0123456789ABCDEF0123456789ABCDEF";

fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

fn client_for(server: &MockServer) -> RedcapClient {
    let config = RedcapConfig::new(server.url("/api/"), TOKEN).unwrap();
    RedcapClient::new(config).unwrap()
}

#[test]
fn resolve_fields_filters_non_data_types() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/")
            .header("content-type", "application/x-www-form-urlencoded")
            .body_contains(format!("token={TOKEN}"))
            .body_contains("content=metadata")
            .body_contains("format=json")
            .body_contains("returnFormat=json");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"[{"field_name":"record_id","field_type":"text"},{"field_name":"notes","field_type":"descriptive"}]"#);
    });

    let client = client_for(&server);
    assert_eq!(client.resolve_fields(&[], false).unwrap(), vec!["record_id"]);
    assert_eq!(
        client.resolve_fields(&[], true).unwrap(),
        vec!["record_id", "notes"]
    );
    mock.assert_hits(2);
}

#[test]
fn resolve_fields_sends_indexed_forms() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/")
            .body_contains("forms%5B0%5D=demographics")
            .body_contains("forms%5B1%5D=vitals");
        then.status(200).body(r#"[{"field_name":"a"},{"field_name":"b"},{"field_name":"a"}]"#);
    });

    let forms = vec!["demographics".to_string(), "vitals".to_string()];
    let fields = client_for(&server).resolve_fields(&forms, false).unwrap();
    assert_eq!(fields, vec!["a", "b"]);
    mock.assert();
}

#[test]
fn resolve_fields_empty_result_is_not_an_error() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/");
        then.status(200)
            .body(r#"[{"field_name":"sig","field_type":"signature"}]"#);
    });

    let fields = client_for(&server).resolve_fields(&[], false).unwrap();
    assert!(fields.is_empty());
}

#[test]
fn metadata_error_carries_status_and_body() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/api/");
        then.status(500).body("Invalid token");
    });

    let err = client_for(&server).resolve_fields(&[], false).unwrap_err();
    assert!(matches!(err, RedcapError::MetadataRequest { status: 500, .. }));
    let message = err.to_string();
    assert!(message.contains("500"));
    assert!(message.contains("Invalid token"));
    // Single attempt, no retry.
    mock.assert_hits(1);
}

#[test]
fn metadata_non_array_is_parse_error() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/");
        then.status(200).body(r#"{"error":"You do not have permissions"}"#);
    });

    let err = client_for(&server).resolve_fields(&[], false).unwrap_err();
    assert!(matches!(err, RedcapError::MetadataParse { .. }));
}

#[test]
fn export_raw_writes_body_verbatim() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }
    let server = MockServer::start();
    let payload: &[u8] = b"record,field_name,value\n1,city,Z\xfcrich\n";
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/")
            .body_contains("content=record")
            .body_contains("action=export")
            .body_contains("format=csv")
            .body_contains("type=eav")
            .body_contains("fields=record_id%2Ccity")
            .body_contains("forms=")
            .body_contains("csvDelimiter=%2C")
            .body_contains("returnFormat=json");
        then.status(200).body(payload);
    });

    let lake = tempfile::tempdir().unwrap();
    let layout = LakeLayout::new(lake.path().join("nested/lake")).unwrap();
    let options = ExportOptions::default()
        .with_fields(vec!["record_id".to_string(), "city".to_string()]);

    let exported = client_for(&server).export_records(&layout, &options).unwrap();
    mock.assert();

    assert!(exported.path.is_absolute());
    assert_eq!(exported.encoding, FileEncoding::Raw);
    assert_eq!(exported.path.parent().unwrap(), layout.ingests_dir());
    let name = exported.path.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("redcap_records_"));
    assert!(name.ends_with(".csv"));
    assert_eq!(std::fs::read(&exported.path).unwrap(), payload);
    assert_eq!(exported.origin_query.fields, "record_id,city");
}

#[test]
fn export_decode_writes_utf8() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }
    let server = MockServer::start();
    let payload: &[u8] = b"record,field_name,value\n1,name,Jos\xe9 M\xfcller\n";
    server.mock(|when, then| {
        when.method(POST).path("/api/").body_contains("content=record");
        then.status(200).body(payload);
    });

    let lake = tempfile::tempdir().unwrap();
    let layout = LakeLayout::new(lake.path()).unwrap();
    let options = ExportOptions::default()
        .with_fields(vec!["record_id".to_string()])
        .with_decode(true);

    let exported = client_for(&server).export_records(&layout, &options).unwrap();
    assert_eq!(exported.encoding, FileEncoding::Decoded);

    let written = std::fs::read(&exported.path).unwrap();
    let text = String::from_utf8(written).expect("valid UTF-8");
    assert!(text.contains("José Müller"));

    let (reencoded, _, had_errors) = LEGACY_ENCODING.encode(&text);
    assert!(!had_errors);
    assert_eq!(reencoded.as_ref(), payload);
}

#[test]
fn export_without_fields_resolves_metadata_first() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }
    let server = MockServer::start();
    let metadata = server.mock(|when, then| {
        when.method(POST)
            .path("/api/")
            .body_contains("content=metadata")
            .body_contains("forms%5B0%5D=labs");
        then.status(200).body(
            r#"[{"field_name":"record_id","field_type":"text"},{"field_name":"hb","field_type":"text"},{"field_name":"scan","field_type":"file"}]"#,
        );
    });
    let export = server.mock(|when, then| {
        when.method(POST)
            .path("/api/")
            .body_contains("content=record")
            .body_contains("fields=record_id%2Chb&")
            .body_contains("forms=labs");
        then.status(200).body("record,field_name,value\n");
    });

    let lake = tempfile::tempdir().unwrap();
    let layout = LakeLayout::new(lake.path()).unwrap();
    let options = ExportOptions::default().with_forms(vec!["labs".to_string()]);
    let path = client_for(&server).export(&layout, &options).unwrap();

    metadata.assert();
    export.assert();
    assert!(path.exists());
}

#[test]
fn export_error_carries_status_and_body_and_writes_nothing() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/api/").body_contains("content=record");
        then.status(500).body("Invalid token");
    });

    let lake = tempfile::tempdir().unwrap();
    let layout = LakeLayout::new(lake.path()).unwrap();
    let options = ExportOptions::default().with_fields(vec!["record_id".to_string()]);
    let err = client_for(&server).export(&layout, &options).unwrap_err();

    assert!(matches!(err, RedcapError::ExportRequest { status: 500, .. }));
    assert!(err.to_string().contains("500"));
    assert!(err.to_string().contains("Invalid token"));
    assert!(!layout.ingests_dir().exists());
    mock.assert_hits(1);
}

#[test]
fn repeated_exports_get_distinct_files() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/");
        then.status(200).body("record,field_name,value\n");
    });

    let lake = tempfile::tempdir().unwrap();
    let layout = LakeLayout::new(lake.path()).unwrap();
    let options = ExportOptions::default().with_fields(vec!["record_id".to_string()]);
    let client = client_for(&server);

    let first = client.export(&layout, &options).unwrap();
    let second = client.export(&layout, &options).unwrap();
    assert_ne!(first, second);
    assert_eq!(std::fs::read_dir(layout.ingests_dir()).unwrap().count(), 2);
}
