use anyhow::{Context, Result, anyhow};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::media::{self, AudioExtractor, VideoInfo};
use crate::providers::libretranslate::LibreTranslateClient;
use crate::quality;
use crate::reflow::{self, ReflowOptions};
use crate::segment::Segment;
use crate::subtitle_renderer::{RenderedOutputs, SubtitleRenderer};
use crate::transcribe::{Transcriber, WhisperCliTranscriber};
use crate::translation::{CoordinatorOptions, RetryPolicy, TranslationCoordinator};

// @module: Application controller for the video translation pipeline

/// Options for a single pipeline run, derived from CLI flags
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Stop after transcription; no translation pass
    pub no_translate: bool,

    /// Skip bilingual and clean prose outputs
    pub no_bilingual: bool,

    /// Reprocess even when outputs are already up to date
    pub force_overwrite: bool,

    /// Output directory; defaults to `<stem>_output` next to the video
    pub output_dir: Option<PathBuf>,
}

/// Everything the pipeline knows about one processed video, dumped as JSON
#[derive(Debug, Serialize)]
struct PipelineDump<'a> {
    video_info: &'a VideoInfo,
    detected_language: &'a str,
    segments: &'a [Segment],
}

/// Main application controller for video translation
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Run the workflow in folder mode, processing all video files in a
    /// directory. Files whose outputs are already current are skipped. A
    /// failure on any file aborts the remaining ones.
    pub async fn run_folder(&self, input_dir: PathBuf, options: RunOptions) -> Result<()> {
        let start_time = std::time::Instant::now();

        if !input_dir.exists() {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let video_files = FileManager::find_video_files(&input_dir)?;
        if video_files.is_empty() {
            return Err(anyhow!(
                "No video files found in directory: {:?}",
                input_dir
            ));
        }

        let multi_progress = MultiProgress::new();
        let folder_pb = multi_progress.add(ProgressBar::new(video_files.len() as u64));
        folder_pb.set_style(Self::progress_style("files"));
        folder_pb.set_message("Processing files");

        let mut processed_count = 0;
        let mut skip_count = 0;

        for video_file in video_files.iter() {
            let file_name = video_file
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());

            folder_pb.set_message(format!("Processing: {}", file_name));

            match self
                .process_video(video_file, &options, &multi_progress)
                .await?
            {
                Some(_) => processed_count += 1,
                None => skip_count += 1,
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder processing complete");

        info!(
            "Folder processing completed: {} processed, {} skipped - Duration: {}",
            processed_count,
            skip_count,
            media::format_duration(start_time.elapsed().as_secs_f64())
        );

        Ok(())
    }

    /// Run the full pipeline for a single video file
    pub async fn run(&self, input_file: PathBuf, options: RunOptions) -> Result<()> {
        let multi_progress = MultiProgress::new();
        match self
            .process_video(&input_file, &options, &multi_progress)
            .await?
        {
            Some(outputs) => {
                for (format, path) in &outputs {
                    info!("  {}: {}", format, path.display());
                }
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Process one video end to end. Returns None when the file was skipped
    /// because its outputs are already current.
    async fn process_video(
        &self,
        video_path: &Path,
        options: &RunOptions,
        multi_progress: &MultiProgress,
    ) -> Result<Option<RenderedOutputs>> {
        let start_time = std::time::Instant::now();

        if !video_path.exists() {
            return Err(anyhow!("Input file does not exist: {:?}", video_path));
        }

        let stem = video_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .ok_or_else(|| anyhow!("Cannot determine file stem for {:?}", video_path))?;

        let output_dir = match &options.output_dir {
            Some(dir) => dir.clone(),
            None => video_path
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join(format!("{}_output", stem)),
        };
        FileManager::ensure_dir(&output_dir)?;

        // Resume check against the primary translated SRT
        let final_base = self.final_base_name(&stem, options.no_translate);
        let final_srt = output_dir.join(format!("{}.srt", final_base));
        if self.config.resume_processing
            && !options.force_overwrite
            && FileManager::output_is_current(&final_srt, video_path)
        {
            warn!(
                "Skipping {}, outputs are up to date (use -f to force overwrite)",
                video_path.display()
            );
            return Ok(None);
        }

        let video_info = media::probe_video_info(video_path).await?;
        info!(
            "Processing {} ({}, {}, {:.1} MB)",
            video_info.filename,
            video_info.duration_formatted,
            video_info.resolution,
            video_info.size_mb
        );

        // Extract audio to a WAV next to the outputs
        let audio_path = output_dir.join(format!("{}.wav", stem));
        let extractor =
            AudioExtractor::new(self.config.audio.sample_rate, self.config.audio.timeout_secs);
        extractor.extract(video_path, &audio_path).await?;

        // Transcribe
        let forced_language = if self.config.source_language == "auto" {
            None
        } else {
            Some(self.config.source_language.clone())
        };
        let transcriber = WhisperCliTranscriber::new(
            &self.config.whisper.binary,
            &self.config.whisper.model,
            forced_language,
            self.config.whisper.timeout_secs,
        );
        let transcription = transcriber.transcribe(&audio_path).await;

        if !self.config.audio.keep_audio {
            FileManager::cleanup_temp_files(&[audio_path.clone()]);
        }

        let transcription = transcription?;
        let detected_language = transcription.language.clone();
        if let Ok(name) = language_utils::get_language_name(&detected_language) {
            info!("Detected language: {} ({})", name, detected_language);
        }

        // Reflow for readability before anything downstream sees the segments
        let segments = if self.config.reflow.enabled {
            reflow::reflow(&transcription.segments, &self.reflow_options())
        } else {
            transcription.segments
        };

        // Flag low-confidence segments for human review
        let flagged =
            quality::flag_low_confidence(&segments, self.config.quality.low_confidence_threshold);
        if !flagged.is_empty() {
            let review_path = output_dir.join(format!("{}_review.txt", stem));
            warn!(
                "{} low-confidence segments flagged, review list: {}",
                flagged.len(),
                review_path.display()
            );
            quality::write_review_list(&flagged, &review_path)?;
        }

        let renderer = SubtitleRenderer::new(
            self.config.subtitle.max_chars_per_line,
            self.config.subtitle.sentences_per_paragraph,
        );

        // Always render the untranslated transcription
        let original_base = output_dir.join(format!("{}_original", stem));
        renderer.render_all(&segments, &original_base, false)?;

        let (final_segments, outputs) = if options.no_translate {
            let base = output_dir.join(format!("{}_transcribed", stem));
            let outputs = renderer.render_all(&segments, &base, false)?;
            (segments, outputs)
        } else {
            let translated = self
                .translate_segments_with_progress(&segments, multi_progress)
                .await?;

            // Translated sentence lengths differ from the source; reflow once
            // more so over-long translated segments get split
            let translated = if self.config.reflow.enabled {
                reflow::reflow(&translated, &self.reflow_options())
            } else {
                translated
            };

            let include_bilingual = self.config.subtitle.bilingual && !options.no_bilingual;
            let base = output_dir.join(format!("{}_{}", stem, self.config.target_language));
            let outputs = renderer.render_all(&translated, &base, include_bilingual)?;
            (translated, outputs)
        };

        // Dump everything the pipeline produced for downstream tooling
        let dump_path = output_dir.join(format!("{}_segments.json", stem));
        FileManager::save_json(
            &dump_path,
            &PipelineDump {
                video_info: &video_info,
                detected_language: &detected_language,
                segments: &final_segments,
            },
        )?;

        info!(
            "Completed {} in {}",
            video_info.filename,
            media::format_duration(start_time.elapsed().as_secs_f64())
        );

        Ok(Some(outputs))
    }

    /// Translate segments through the coordinator with a progress bar
    async fn translate_segments_with_progress(
        &self,
        segments: &[Segment],
        multi_progress: &MultiProgress,
    ) -> Result<Vec<Segment>> {
        let translation = &self.config.translation;

        let clients: Vec<LibreTranslateClient> = (0..translation.concurrent_requests)
            .map(|_| {
                LibreTranslateClient::new(
                    &translation.endpoint,
                    translation.api_key.clone(),
                    translation.timeout_secs,
                )
            })
            .collect::<Result<_, _>>()
            .context("Failed to create translation clients")?;

        let coordinator = TranslationCoordinator::new(
            clients,
            &self.config.source_language,
            &self.config.target_language,
            CoordinatorOptions {
                retry: RetryPolicy {
                    max_attempts: translation.retry_count,
                    base_delay_ms: translation.retry_base_delay_ms,
                    max_delay_ms: translation.max_retry_delay_ms,
                },
                chunk_pause_ms: translation.chunk_pause_ms,
                cache_enabled: translation.cache_enabled,
            },
        )?;

        let progress_bar = multi_progress.add(ProgressBar::new(segments.len() as u64));
        progress_bar.set_style(Self::progress_style("segments"));
        progress_bar.set_message("Translating");

        let pb = progress_bar.clone();
        let translated = coordinator
            .translate_segments_with_progress(segments, move |completed, _total| {
                pb.set_position(completed as u64);
            })
            .await;

        progress_bar.finish_and_clear();

        let (hits, misses, _) = coordinator.cache().stats();
        if hits > 0 {
            info!("Translation cache: {} hits, {} misses", hits, misses);
        }

        Ok(translated)
    }

    fn reflow_options(&self) -> ReflowOptions {
        ReflowOptions {
            min_duration: self.config.reflow.min_duration,
            max_duration: self.config.reflow.max_duration,
        }
    }

    /// Base name of the primary output used for the resume check
    fn final_base_name(&self, stem: &str, no_translate: bool) -> String {
        if no_translate {
            format!("{}_transcribed", stem)
        } else {
            format!("{}_{}", stem, self.config.target_language)
        }
    }

    fn progress_style(unit: &str) -> ProgressStyle {
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {} ({{percent}}%) {{msg}} {{eta}}",
                unit
            ))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░")
    }
}
