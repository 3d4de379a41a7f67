//! assemblyai-cli: submit, inspect and wait for transcripts from the command line.
//!
//! Usage:
//!   assemblyai-cli transcribe <url-or-path> [--interval <ms>] [--timeout <ms>]
//!   assemblyai-cli submit <url-or-path>
//!   assemblyai-cli get <id>
//!   assemblyai-cli wait <id> [--interval <ms>] [--timeout <ms>]
//!   assemblyai-cli subtitles <id> [srt|vtt]
//!   assemblyai-cli delete <id>
//!   assemblyai-cli lemur <id> <prompt>

use anyhow::{bail, Context};
use assemblyai::lemur::{LemurBaseParams, LemurTaskParams};
use assemblyai::polling::{PollingOptions, DEFAULT_INTERVAL_MS, NO_TIMEOUT};
use assemblyai::transcripts::{SubtitleFormat, Transcript, TranscriptParams};
use assemblyai::{AssemblyAiClient, CancellationToken};
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    match args[1].as_str() {
        "version" | "--version" | "-V" => {
            println!("assemblyai-cli {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        "help" | "--help" | "-h" => {
            print_usage();
            return Ok(());
        }
        _ => {}
    }

    let client = AssemblyAiClient::from_env().context("failed to build client")?;
    let rest = &args[2..];

    match args[1].as_str() {
        "transcribe" => {
            let source = positional(rest, 0, "audio URL or path")?;
            let params = TranscriptParams::new(resolve_audio(&client, source).await?);
            let options = polling_options(rest)?;
            let submitted = client.transcripts().submit(&params).await?;
            eprintln!("submitted {}", submitted.id);
            let transcript = wait_with_ctrl_c(&client, &submitted.id, &options).await?;
            print_transcript(&transcript)?;
        }
        "submit" => {
            let source = positional(rest, 0, "audio URL or path")?;
            let params = TranscriptParams::new(resolve_audio(&client, source).await?);
            let transcript = client.transcripts().submit(&params).await?;
            println!("{}", transcript.id);
        }
        "get" => {
            let id = positional(rest, 0, "transcript id")?;
            print_transcript(&client.transcripts().get(id).await?)?;
        }
        "wait" => {
            let id = positional(rest, 0, "transcript id")?;
            let options = polling_options(rest)?;
            let transcript = wait_with_ctrl_c(&client, id, &options).await?;
            print_transcript(&transcript)?;
        }
        "subtitles" => {
            let id = positional(rest, 0, "transcript id")?;
            let format: SubtitleFormat = rest.get(1).map(String::as_str).unwrap_or("srt").parse()?;
            print!("{}", client.transcripts().get_subtitles(id, format, None).await?);
        }
        "delete" => {
            let id = positional(rest, 0, "transcript id")?;
            client.transcripts().delete(id).await?;
            eprintln!("deleted {id}");
        }
        "lemur" => {
            let id = positional(rest, 0, "transcript id")?;
            let prompt = positionals(rest)[1..]
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            if prompt.trim().is_empty() {
                bail!("missing prompt");
            }
            let response = client
                .lemur()
                .task(&LemurTaskParams {
                    prompt,
                    base: LemurBaseParams::for_transcripts([id.as_str()]),
                })
                .await?;
            println!("{}", response.response);
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }

    Ok(())
}

fn print_usage() {
    println!(
        r#"assemblyai-cli: AssemblyAI transcription from the command line

USAGE:
    assemblyai-cli <COMMAND> [OPTIONS]

COMMANDS:
    transcribe <url-or-path>    Submit audio and wait for the transcript
    submit <url-or-path>        Submit audio and print the transcript id
    get <id>                    Print a transcript as JSON
    wait <id>                   Wait until a transcript is completed or failed
    subtitles <id> [srt|vtt]    Export captions
    delete <id>                 Delete a transcript
    lemur <id> <prompt>         Run a LeMUR task over a transcript
    version                     Show version information
    help                        Show this help message

OPTIONS (transcribe, wait):
    --interval <ms>             Delay between polls (default {DEFAULT_INTERVAL_MS})
    --timeout <ms>              Give up after this long (default {NO_TIMEOUT}, no timeout)

ENVIRONMENT:
    ASSEMBLYAI_API_KEY          API key (required)
    ASSEMBLYAI_BASE_URL         REST base URL
    RUST_LOG                    Log filter, e.g. assemblyai=debug"#
    );
}

/// Flags that take a value; the value is not a positional argument.
const VALUE_FLAGS: &[&str] = &["--interval", "--timeout"];

fn positionals(args: &[String]) -> Vec<&String> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if VALUE_FLAGS.contains(&arg.as_str()) {
            iter.next();
        } else if !arg.starts_with("--") {
            out.push(arg);
        }
    }
    out
}

fn positional<'a>(args: &'a [String], index: usize, what: &str) -> anyhow::Result<&'a String> {
    positionals(args)
        .get(index)
        .copied()
        .with_context(|| format!("missing {what}"))
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn polling_options(args: &[String]) -> anyhow::Result<PollingOptions> {
    let interval = match flag_value(args, "--interval") {
        Some(v) => v.parse::<u64>().context("--interval must be milliseconds")?,
        None => DEFAULT_INTERVAL_MS,
    };
    let timeout = match flag_value(args, "--timeout") {
        Some(v) => v.parse::<i64>().context("--timeout must be milliseconds")?,
        None => NO_TIMEOUT,
    };
    Ok(PollingOptions::from_millis(interval, timeout)?)
}

/// Local files are uploaded first; anything else is passed through as a URL.
async fn resolve_audio(client: &AssemblyAiClient, source: &str) -> anyhow::Result<String> {
    let path = Path::new(source);
    if path.exists() {
        let uploaded = client
            .files()
            .upload_file(path)
            .await
            .with_context(|| format!("failed to upload {source}"))?;
        return Ok(uploaded.upload_url);
    }
    Ok(source.to_string())
}

async fn wait_with_ctrl_c(
    client: &AssemblyAiClient,
    id: &str,
    options: &PollingOptions,
) -> anyhow::Result<Transcript> {
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_signal.cancel();
        }
    });
    Ok(client
        .transcripts()
        .wait_until_ready(id, options, Some(&cancel))
        .await?)
}

fn print_transcript(transcript: &Transcript) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(transcript)?);
    if transcript.is_error() {
        bail!(
            "transcript {} failed: {}",
            transcript.id,
            transcript.error.as_deref().unwrap_or("unknown error")
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn flag_values_are_not_positionals() {
        let rest = args(&["--timeout", "5000", "t1", "--interval", "250"]);
        assert_eq!(positional(&rest, 0, "transcript id").unwrap(), "t1");
        assert!(positional(&rest, 1, "extra").is_err());
        let options = polling_options(&rest).unwrap();
        assert_eq!(options.interval(), std::time::Duration::from_millis(250));
        assert_eq!(options.timeout(), Some(std::time::Duration::from_millis(5000)));
    }

    #[test]
    fn lemur_prompt_skips_flags() {
        let rest = args(&["t1", "Summarize", "--interval", "10", "briefly"]);
        assert_eq!(positionals(&rest)[1..].len(), 2);
    }
}
