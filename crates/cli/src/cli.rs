use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "img-sign",
    about = "Sign images as self-contained, verifiable envelope documents",
    long_about = "Wrap an image into a structured envelope, sign it with an RSA private key, \
and later verify the envelope or recover the original image with the public key."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output machine-readable JSON to stdout
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign an image into an envelope file
    Sign {
        /// Path to the image to sign
        input: PathBuf,

        /// Path to the private key (PKCS#8 or PKCS#1, PEM or DER)
        #[arg(short, long)]
        key: PathBuf,

        /// Password for an encrypted PKCS#8 private key
        #[arg(short, long)]
        password: Option<String>,

        /// Output path for the envelope (default: <input>.envelope)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Digest algorithm
        #[arg(long, default_value = "sha512")]
        digest_algorithm: String,

        /// Do not embed the signer's public key in the signature block
        #[arg(long)]
        no_embed_public_key: bool,
    },

    /// Verify a signed envelope file
    Verify {
        /// Path to the envelope file
        input: PathBuf,

        /// Path to the public key (SPKI or PKCS#1, PEM or DER)
        #[arg(short, long)]
        cert: PathBuf,
    },

    /// Extract the image from an envelope file
    Extract {
        /// Path to the envelope file
        input: PathBuf,

        /// Output path for the recovered image
        #[arg(short, long)]
        output: PathBuf,

        /// Verify against this public key first and fail if the signature
        /// does not check out; without it the payload is extracted unchecked
        #[arg(long, value_name = "CERT")]
        verify_with: Option<PathBuf>,
    },
}
