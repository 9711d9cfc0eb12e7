//! Verify and extract commands.

use anyhow::{Context, Result, bail};
use console::style;
use img_sign_core::{DigestAlgorithm, Envelope, encode_sri};
use img_sign_rsa::{PublicKeyMaterial, verify_envelope};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::json::{ExtractJson, VerifyJson};
use crate::util::format_bytes;

pub fn verify_envelope_file(input: PathBuf, cert: PathBuf, json: bool) -> Result<()> {
    eprintln!("{}", style("==> Verifying envelope").cyan().bold());

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(format!(
        "Reading envelope {}",
        style(input.display()).cyan()
    ));

    let envelope = Envelope::load(&input)
        .with_context(|| format!("Failed to load envelope: {}", input.display()))?;

    spinner.finish_with_message(format!(
        "[OK] Read envelope ({})",
        style(format_bytes(envelope.container().as_bytes().len())).cyan()
    ));

    let cert_bytes = fs::read(&cert)
        .with_context(|| format!("Failed to read public key: {}", cert.display()))?;
    let key = PublicKeyMaterial::load(&cert_bytes)?;

    let digest_sri = DigestAlgorithm::try_from(envelope.signature().digest_alg)
        .map(|alg| encode_sri(alg, &envelope.signature().digest))
        .unwrap_or_default();

    let verified = verify_envelope(&envelope, &key)?;

    if !verified {
        eprintln!(
            "\n{} {}",
            style("[TAMPERED]").red().bold(),
            style("Envelope signature does not check out").red()
        );
        bail!("signature verification failed for {}", input.display());
    }

    eprintln!(
        "\n{} {}",
        style("[VALID]").green().bold(),
        style("Envelope integrity intact").green()
    );
    eprintln!("    Digest: {}", style(&digest_sri).cyan());

    if json {
        let payload = VerifyJson {
            status: "ok",
            command: "verify",
            input: input.display().to_string(),
            verified: true,
            digest_sri,
        };
        println!("{}", serde_json::to_string(&payload)?);
    } else {
        // Only print "OK" when stdout is piped (for pipeline composition)
        use std::io::IsTerminal;
        if !std::io::stdout().is_terminal() {
            println!("OK");
        }
    }

    Ok(())
}

pub fn extract_image(
    input: PathBuf,
    output: PathBuf,
    verify_with: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    eprintln!("{}", style("==> Extracting image").cyan().bold());

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(format!(
        "Reading envelope {}",
        style(input.display()).cyan()
    ));

    let verified = verify_with.is_some();
    let payload = match verify_with {
        Some(cert) => {
            let cert_bytes = fs::read(&cert)
                .with_context(|| format!("Failed to read public key: {}", cert.display()))?;
            img_sign_rsa::verify_and_extract(&input, &cert_bytes)
                .with_context(|| format!("Failed to extract {}", input.display()))?
        }
        None => {
            eprintln!(
                "    {} {}",
                style("Warning:").yellow().bold(),
                style("extracting without signature verification").dim()
            );
            img_sign_rsa::get_image(&input)
                .with_context(|| format!("Failed to extract {}", input.display()))?
        }
    };

    spinner.finish_with_message(format!(
        "[OK] Extracted image ({})",
        style(format_bytes(payload.len())).cyan()
    ));

    fs::write(&output, &payload)
        .with_context(|| format!("Failed to write image: {}", output.display()))?;

    eprintln!(
        "\n{} {}",
        style("[SUCCESS]").green().bold(),
        style("Image recreated").cyan()
    );

    if json {
        let payload = ExtractJson {
            status: "ok",
            command: "extract",
            input: input.display().to_string(),
            output: output.display().to_string(),
            payload_bytes: payload.len(),
            verified,
        };
        println!("{}", serde_json::to_string(&payload)?);
    } else {
        println!("{}", output.display());
    }

    Ok(())
}
