use std::io::Write as _;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use streampulse::acquire::gemini::GeminiClient;
use streampulse::models::media::FormatKind;
use streampulse::models::settings::AppSettings;
use streampulse::storage::history::HistoryStore;
use streampulse::{Controller, DownloadOutcome, SubmitOutcome};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let mut settings = AppSettings::default();
    settings.acquire.api_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();
    if settings.acquire.api_key.is_empty() {
        anyhow::bail!("GEMINI_API_KEY is not set");
    }

    let history = HistoryStore::open(
        settings.history.store_path.clone(),
        settings.history.limit,
    );
    for entry in history.entries() {
        println!("recent: {} ({})", entry.title, entry.quality);
    }

    let source = Arc::new(GeminiClient::new(&settings.acquire));
    let mut controller = Controller::new(source, history, &settings);

    loop {
        let Some(line) = prompt("url> ")? else { break };

        match controller.submit(&line).await {
            SubmitOutcome::Resolved => {}
            SubmitOutcome::Rejected | SubmitOutcome::Failed => {
                if let Some(err) = &controller.state().error {
                    eprintln!("{err}");
                }
                continue;
            }
            SubmitOutcome::Ignored | SubmitOutcome::Busy => continue,
        }

        let Some(descriptor) = controller.state().result.clone() else {
            continue;
        };
        println!(
            "{} [{}] {}",
            descriptor.title, descriptor.platform, descriptor.duration
        );
        for source in &controller.state().sources {
            println!("  source: {} ({})", source.title, source.uri);
        }
        let listing: Vec<_> = descriptor
            .formats_of(FormatKind::Video)
            .chain(descriptor.formats_of(FormatKind::Audio))
            .collect();
        for (i, format) in listing.iter().enumerate() {
            let tag = match format.kind {
                FormatKind::Video => "video",
                FormatKind::Audio => "audio",
            };
            println!(
                "  [{}] {} {} .{} ({})",
                i + 1,
                format.quality,
                tag,
                format.extension,
                format.size
            );
        }

        let Some(choice) = prompt("format #> ")? else { break };
        let Ok(index) = choice.trim().parse::<usize>() else {
            continue;
        };
        let Some(variant) = index.checked_sub(1).and_then(|i| listing.get(i)) else {
            continue;
        };

        let (tx, mut rx) = mpsc::channel::<f64>(32);
        let printer = tokio::spawn(async move {
            while let Some(percent) = rx.recv().await {
                print!("\r{percent:>3.0}%");
                let _ = std::io::stdout().flush();
            }
            println!();
        });

        let outcome = controller
            .start_download(&variant.slot_key(), CancellationToken::new(), tx)
            .await?;
        let _ = printer.await;
        match outcome {
            DownloadOutcome::Completed { save, .. } => println!("saved {}", save.filename),
            DownloadOutcome::Cancelled => println!("cancelled"),
            DownloadOutcome::NotStarted => {}
        }
    }

    Ok(())
}

fn prompt(label: &str) -> Result<Option<String>> {
    print!("{label}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    if std::io::stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}
