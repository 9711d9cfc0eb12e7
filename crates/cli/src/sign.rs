//! Sign command: wrap an image into a signed envelope file.

use anyhow::{Context, Result};
use console::style;
use img_sign_core::{DigestAlgorithm, encode_sri};
use img_sign_rsa::SignOptions;
use indicatif::{ProgressBar, ProgressStyle};
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::json::SignJson;
use crate::util::format_bytes;

fn default_envelope_output_path(input: &Path) -> Result<PathBuf> {
    let mut p = input.to_path_buf();
    let name = p
        .file_name()
        .context("Input path must include a file name (cannot derive default output path)")?;
    let mut name: OsString = name.to_os_string();
    name.push(".envelope");
    p.set_file_name(name);
    Ok(p)
}

pub fn sign_envelope(
    input: PathBuf,
    key: PathBuf,
    password: Option<String>,
    output: Option<PathBuf>,
    digest_algorithm: String,
    no_embed_public_key: bool,
    json: bool,
) -> Result<()> {
    eprintln!("{}", style("==> Signing image").cyan().bold());

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.enable_steady_tick(Duration::from_millis(80));

    spinner.set_message(format!("Reading image {}", style(input.display()).cyan()));
    let mut payload = Vec::new();
    let mut file = BufReader::new(
        File::open(&input).with_context(|| format!("Failed to open image: {}", input.display()))?,
    );
    file.read_to_end(&mut payload)?;
    spinner.finish_with_message(format!(
        "[OK] Read image ({})",
        style(format_bytes(payload.len())).cyan()
    ));

    let key_bytes = std::fs::read(&key)
        .with_context(|| format!("Failed to read private key: {}", key.display()))?;

    let digest_alg = DigestAlgorithm::from_name(&digest_algorithm)?;
    let options = SignOptions {
        digest_algorithm: digest_alg,
        embed_public_key: !no_embed_public_key,
    };

    let output_path = match output {
        Some(p) => p,
        None => default_envelope_output_path(&input)?,
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(format!(
        "Signing and writing envelope to {}",
        style(output_path.display()).cyan()
    ));

    let block = img_sign_rsa::sign_image(
        &payload,
        &key_bytes,
        password.as_deref(),
        &output_path,
        &options,
    )
    .with_context(|| format!("Failed to sign {}", input.display()))?;

    spinner.finish_and_clear();

    let digest_sri = encode_sri(digest_alg, &block.digest);

    eprintln!(
        "\n{} {}",
        style("[SUCCESS]").green().bold(),
        style("Signed successfully").cyan()
    );
    eprintln!("    Digest: {}", style(&digest_sri).cyan());
    eprintln!("    Envelope: {}", style(output_path.display()).cyan());

    if json {
        let payload = SignJson {
            status: "ok",
            command: "sign",
            input: input.display().to_string(),
            output: output_path.display().to_string(),
            digest_sri,
            signature_algorithm: "rsa-pkcs1v15",
            embedded_public_key: !no_embed_public_key,
        };
        println!("{}", serde_json::to_string(&payload)?);
    } else {
        println!("{}", output_path.display());
    }

    Ok(())
}
