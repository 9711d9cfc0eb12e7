//! JSON output formats.

use serde::Serialize;

#[derive(Serialize)]
pub struct SignJson<'a> {
    pub status: &'a str,
    pub command: &'a str,
    pub input: String,
    pub output: String,
    pub digest_sri: String,
    pub signature_algorithm: &'a str,
    pub embedded_public_key: bool,
}

#[derive(Serialize)]
pub struct VerifyJson<'a> {
    pub status: &'a str,
    pub command: &'a str,
    pub input: String,
    pub verified: bool,
    pub digest_sri: String,
}

#[derive(Serialize)]
pub struct ExtractJson<'a> {
    pub status: &'a str,
    pub command: &'a str,
    pub input: String,
    pub output: String,
    pub payload_bytes: usize,
    pub verified: bool,
}

#[derive(Serialize)]
pub struct ErrorJson<'a> {
    pub status: &'a str,
    pub error: String,
    pub causes: Vec<String>,
}
