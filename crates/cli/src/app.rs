use crate::cli::{Cli, Commands};
use crate::json::ErrorJson;
use anyhow::Result;
use console::style;

pub fn run(cli: Cli) -> Result<()> {
    let json = cli.json;

    let result = match cli.command {
        Commands::Sign {
            input,
            key,
            password,
            output,
            digest_algorithm,
            no_embed_public_key,
        } => crate::sign::sign_envelope(
            input,
            key,
            password,
            output,
            digest_algorithm,
            no_embed_public_key,
            json,
        ),

        Commands::Verify { input, cert } => crate::commands::verify_envelope_file(input, cert, json),

        Commands::Extract {
            input,
            output,
            verify_with,
        } => crate::commands::extract_image(input, output, verify_with, json),
    };

    if let Err(e) = &result {
        if json {
            let causes: Vec<String> = e.chain().skip(1).map(|c| c.to_string()).collect();
            let payload = ErrorJson {
                status: "error",
                error: e.to_string(),
                causes,
            };
            println!("{}", serde_json::to_string(&payload)?);
        } else {
            eprintln!("\n{} {}", style("[ERROR]").red().bold(), style(&e).red());

            for (i, cause) in e.chain().skip(1).enumerate() {
                if i == 0 {
                    eprintln!("\n    Caused by:");
                }
                eprintln!("      - {}", style(cause).red());
            }
            eprintln!();
        }
    }

    result
}
