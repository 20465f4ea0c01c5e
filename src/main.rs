use std::{
    fs::OpenOptions,
    io::{BufRead, BufReader, Write},
    path::PathBuf,
};

use anyhow::Result;
use clap::Parser;
use env_logger::{Builder, Target};
use site_edit_mcp::{config::Config, session::Session, types::McpMessage};

const INSTRUCTIONS: &str = "Edit the pages of a static site and publish them with git. Use list_documents and open_document to pick a page, set_text and set_link to change it, preview_changes to review, and publish to commit and push. Images are managed with list_assets, add_asset, remove_asset and preview_asset.";

fn main() -> Result<()> {
    if let Ok(log_location) = std::env::var("LOG_LOCATION") {
        let path = PathBuf::from(&*shellexpand::tilde(&log_location));
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Builder::from_default_env()
            .target(Target::Pipe(Box::new(
                OpenOptions::new().create(true).append(true).open(path)?,
            )))
            .init();
    }

    let config = Config::parse().expand_home();
    let mut session = Session::open(config)?;

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let mut reader = BufReader::new(stdin);
    let mut line = String::new();

    loop {
        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break, // EOF
            Ok(_) => {
                log::trace!("<- {line}");
                if let Ok(McpMessage::Request(request)) = serde_json::from_str(&line) {
                    let response = request.execute(&mut session, Some(INSTRUCTIONS));
                    let response_str = serde_json::to_string(&response)?;
                    log::trace!("-> {response_str}");
                    stdout.write_all(response_str.as_bytes())?;
                    stdout.write_all(b"\n")?;
                    stdout.flush()?;
                }
            }
            Err(e) => {
                log::error!("Error reading line: {e}");
                break;
            }
        }
    }

    Ok(())
}
