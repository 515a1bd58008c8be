use std::io::Read;

use anyhow::{Context, Result, bail};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use nsbridge_auth::{ConnectorConfig, ConnectorService, normalize_pem};
use serde_json::{Value, json};

use crate::cli::NormalizePemArgs;
use crate::output::print_json;

pub fn normalize(args: &NormalizePemArgs) -> Result<()> {
    let mut raw = String::new();
    std::io::stdin()
        .read_to_string(&mut raw)
        .context("Failed to read key from stdin")?;
    if raw.trim().is_empty() {
        bail!("No key material on stdin");
    }

    print!("{}", normalize_pem(&raw, args.label.trim()).as_str());
    Ok(())
}

/// Prints the header and claims of a freshly signed assertion. The signature
/// is left out.
pub fn assertion(config: ConnectorConfig) -> Result<()> {
    let service = ConnectorService::new(config)?;
    let signed = service.client_assertion()?;

    let mut segments = signed.as_str().split('.');
    let header = decode_segment(segments.next(), "header")?;
    let claims = decode_segment(segments.next(), "claims")?;

    print_json(&json!({ "header": header, "claims": claims }));
    Ok(())
}

fn decode_segment(segment: Option<&str>, name: &str) -> Result<Value> {
    let segment = segment.with_context(|| format!("Assertion has no {name} segment"))?;
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .with_context(|| format!("Assertion {name} is not base64url"))?;
    serde_json::from_slice(&bytes).with_context(|| format!("Assertion {name} is not JSON"))
}
