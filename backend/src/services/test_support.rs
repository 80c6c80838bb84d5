//! Fixtures for HTTP tests: an in-memory store and multipart bodies.

use crate::config::ImportLimits;
use crate::db::{RoundStore, SqliteStore};
use actix_web::web;
use std::sync::Arc;

pub const BOUNDARY: &str = "----discbag-test-boundary";

pub struct TestStore {
    pub sqlite: Arc<SqliteStore>,
    pub data: web::Data<dyn RoundStore>,
}

pub fn memory_store() -> TestStore {
    let sqlite = Arc::new(SqliteStore::open_in_memory().unwrap());
    let shared: Arc<dyn RoundStore> = sqlite.clone();
    TestStore {
        sqlite,
        data: web::Data::from(shared),
    }
}

pub fn limits(max_upload_bytes: usize) -> web::Data<ImportLimits> {
    web::Data::new(ImportLimits { max_upload_bytes })
}

/// One multipart part: field name, optional file name, content.
pub struct Part<'a> {
    pub name: &'a str,
    pub filename: Option<&'a str>,
    pub content: &'a str,
}

pub fn text_part<'a>(name: &'a str, content: &'a str) -> Part<'a> {
    Part {
        name,
        filename: None,
        content,
    }
}

pub fn file_part<'a>(filename: &'a str, content: &'a str) -> Part<'a> {
    Part {
        name: "file",
        filename: Some(filename),
        content,
    }
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = String::new();
    for part in parts {
        body.push_str(&format!("--{}\r\n", BOUNDARY));
        match part.filename {
            Some(filename) => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: text/csv\r\n\r\n",
                part.name, filename
            )),
            None => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                part.name
            )),
        }
        body.push_str(part.content);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{}--\r\n", BOUNDARY));
    body.into_bytes()
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}
