mod offline;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use audio_codec::{decode_audio, WAV_MIME_TYPE};
use audio_output::{default_backend, AudioPlayer, PlaybackEnd};
use clap::{Parser, Subcommand};
use downloads::DownloadSink;
use galileo_config::{load_studio_settings, StudioSettings};
use galileo_core::{AppMode, Signal, Sink};
use presentation::{parse_slides, SlideTimeline};
use speech_studio::{MusicChoice, PlaybackTarget, RenderRequest, SpeechStudio};
use tokio::io::AsyncReadExt;

use crate::offline::OfflineService;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Studio config file (otherwise $GALILEO_CONFIG, then configs/studio.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Turn a base64 speech payload into a WAV, optionally over a music bed.
    Render {
        /// File holding the base64 PCM payload, or `-` for stdin.
        #[arg(long)]
        speech: PathBuf,

        #[arg(long)]
        voice: Option<String>,

        /// Music track id from the catalog.
        #[arg(long)]
        music: Option<String>,

        /// Music-bed gain (defaults to the configured gain).
        #[arg(long, requires = "music")]
        gain: Option<f32>,

        /// Play the result and wait for it to finish.
        #[arg(long)]
        play: bool,

        /// Directory the WAV is written to (defaults to the configured output dir).
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List the music catalog.
    Catalog,
    /// List the speech voices.
    Voices,
    /// Show how a slide script splits over a narration of the given length.
    Timing {
        /// JSON array of slides (sectionTitle, script, imagePrompt).
        #[arg(long)]
        slides: PathBuf,

        /// Narration length in seconds.
        #[arg(long)]
        duration: f64,
    },
    /// List the studio tools.
    Modes,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Args::parse()).await {
        eprintln!("[galileo-studio] error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let settings = load_studio_settings(args.config.as_deref())?;

    match args.command {
        Command::Render {
            speech,
            voice,
            music,
            gain,
            play,
            out,
        } => {
            let music = match music {
                Some(id) => MusicChoice::Track {
                    id,
                    gain: gain.unwrap_or(settings.default_gain),
                },
                None => MusicChoice::None,
            };
            let out = out.unwrap_or_else(|| settings.output_dir.clone());
            render(&settings, &speech, voice.as_deref(), music, play, &out).await
        }
        Command::Catalog => {
            for track in &settings.music {
                println!("{:<20} {:<24} {}", track.id(), track.name(), track.source());
            }
            Ok(())
        }
        Command::Voices => {
            for voice in &settings.voices {
                let marker = if voice == &settings.default_voice { " (default)" } else { "" };
                println!("{voice}{marker}");
            }
            Ok(())
        }
        Command::Timing { slides, duration } => {
            let json = tokio::fs::read_to_string(&slides)
                .await
                .with_context(|| format!("Failed to read {}", slides.display()))?;
            let slides = parse_slides(&json)?;
            let scripts: Vec<&str> = slides.iter().map(|s| s.script.as_str()).collect();
            let timeline = SlideTimeline::new(&scripts, duration)?;
            for (slide, timing) in slides.iter().zip(timeline.timings()) {
                println!(
                    "{:>2}  {:>8.2}s  {:>8.2}s  {}",
                    timing.index + 1,
                    timing.start_secs,
                    timing.duration_secs,
                    slide.section_title
                );
            }
            Ok(())
        }
        Command::Modes => {
            for mode in AppMode::ALL {
                let audio = if mode.produces_audio() { "audio" } else { "text" };
                println!("{:<16} {:<18} {}", mode.id(), mode.label(), audio);
            }
            Ok(())
        }
    }
}

async fn render(
    settings: &StudioSettings,
    speech: &Path,
    voice: Option<&str>,
    music: MusicChoice,
    play: bool,
    out: &Path,
) -> anyhow::Result<()> {
    let payload = read_payload(speech).await?;
    let speech = decode_audio(payload.trim()).context("Speech payload is not valid base64 PCM")?;

    let studio = SpeechStudio::from_settings(settings, Arc::new(OfflineService));
    let voice = studio.resolve_voice(voice)?;
    let request = RenderRequest {
        speech,
        voice,
        music,
    };

    let (outcome, finished) = if play {
        let mut player = AudioPlayer::new(default_backend()?);
        let (done_tx, done_rx) = tokio::sync::oneshot::channel();
        let on_complete = Box::new(move |end: PlaybackEnd| {
            let _ = done_tx.send(end);
        });
        let outcome = studio
            .render(
                request,
                Some(PlaybackTarget {
                    player: &mut player,
                    on_complete,
                }),
            )
            .await?;
        let end = done_rx.await.ok();
        drop(player);
        (outcome, end)
    } else {
        (studio.render(request, None).await?, None)
    };

    if let Some(reason) = &outcome.fallback {
        log::warn!("Music skipped: {}", reason);
    }
    if let Some(end) = finished {
        log::info!("Playback ended: {:?}", end);
    }

    let downloads = studio.downloads();
    let download = downloads
        .get(outcome.download)
        .context("Rendered download was revoked")?;
    let sink = DownloadSink::new(downloads.clone()).with_output_dir(out);
    let saved = sink
        .consume(Signal::File {
            name: download.filename.clone(),
            mime_type: WAV_MIME_TYPE.to_string(),
            bytes: download.blob.as_bytes().to_vec(),
        })
        .await?;

    match saved {
        Some(Signal::Text(path)) => println!("{path}"),
        _ => println!("{}", outcome.filename),
    }
    println!(
        "{:.2}s, {} bytes{}",
        outcome.buffer.duration_secs(),
        outcome.wav_len,
        outcome
            .mixed_with
            .as_deref()
            .map(|id| format!(", music: {id}"))
            .unwrap_or_default()
    );
    Ok(())
}

async fn read_payload(path: &Path) -> anyhow::Result<String> {
    let mut payload = String::new();
    if path == Path::new("-") {
        tokio::io::stdin()
            .read_to_string(&mut payload)
            .await
            .context("Failed to read speech payload from stdin")?;
    } else {
        payload = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
    }
    Ok(payload)
}
