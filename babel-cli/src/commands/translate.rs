//! Translation, transcription and the language list.

use babel_api::{AudioUpload, TranslationRequest};
use colored::Colorize;
use std::io::Read;
use std::path::Path;

use crate::context::Context;
use crate::error::{CliError, CliResult};
use crate::output::{heading, info, spinner};

/// Join the words given on the command line, or read stdin for `-` or no
/// words at all.
fn input_text(words: Vec<String>) -> CliResult<String> {
    if words.is_empty() || words == ["-"] {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text.trim_end().to_string());
    }
    Ok(words.join(" "))
}

pub async fn translate(ctx: &Context, words: Vec<String>, from: String, to: String) -> CliResult<()> {
    let text = input_text(words)?;
    if text.trim().is_empty() {
        return Err(CliError::InvalidArgument("nothing to translate".to_string()));
    }

    let pb = spinner(&format!("Translating {} -> {}...", from, to));
    let result = ctx
        .client
        .translate(&TranslationRequest::new(text, from, to))
        .await;
    pb.finish_and_clear();

    println!("{}", result?);
    Ok(())
}

pub async fn transcribe(ctx: &Context, file: &Path) -> CliResult<()> {
    let upload = AudioUpload::from_path(file).await?;

    let pb = spinner(&format!("Transcribing {}...", upload.file_name()));
    let result = ctx.client.transcribe(upload).await;
    pb.finish_and_clear();

    let transcription = result?;
    println!("{}", transcription.text);
    info(&transcription.confidence_label());
    Ok(())
}

pub async fn languages(ctx: &Context, destination: bool) -> CliResult<()> {
    let catalog = ctx.client.fetch_languages().await?;

    if destination {
        heading("Destination languages");
        for language in catalog.destination() {
            println!("  {}", language.label());
        }
    } else {
        heading("Source languages");
        for language in catalog.source() {
            println!("  {}", language.label());
        }
    }

    info(&format!("{} languages", catalog.len().to_string().cyan()));
    Ok(())
}
