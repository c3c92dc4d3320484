//! Runs a playback session against the simulated clock

use anyhow::anyhow;
use podcastr_playback::{Episode, PlayerSession, SimulatedOutput, SurfaceEvent};

/// How to start and how long to run
#[derive(Debug, Clone, Copy)]
pub struct PlayOptions {
    pub start: usize,
    pub single: bool,
    /// Simulated seconds per tick
    pub step: u64,
    pub max_ticks: usize,
}

/// Start playback of `episodes` as the options describe
pub fn start(
    session: &mut PlayerSession<SimulatedOutput>,
    episodes: Vec<Episode>,
    options: &PlayOptions,
) -> anyhow::Result<()> {
    if options.single {
        let len = episodes.len();
        let episode = episodes
            .into_iter()
            .nth(options.start)
            .ok_or_else(|| anyhow!("No episode at index {} ({} in catalog)", options.start, len))?;
        session.store_mut().play_single(episode);
    } else {
        session.store_mut().play_list(episodes, options.start)?;
    }

    session.tick();
    report(session);
    Ok(())
}

/// Advance the clock until playback stops or the tick budget runs out
///
/// Returns the number of ticks run.
pub fn drive(session: &mut PlayerSession<SimulatedOutput>, options: &PlayOptions) -> usize {
    let mut ticks = 0;
    while ticks < options.max_ticks && session.store().is_playing() {
        session.output_mut().advance(options.step);
        session.tick();
        report(session);
        ticks += 1;
    }

    if session.store().current_episode().is_none() {
        tracing::info!("Queue finished after {} ticks", ticks);
    } else if !session.store().is_playing() {
        tracing::info!("Playback paused after {} ticks", ticks);
    } else {
        tracing::info!("Tick budget of {} spent", options.max_ticks);
    }
    ticks
}

fn report(session: &mut PlayerSession<SimulatedOutput>) {
    for event in session.drain_events() {
        match event {
            SurfaceEvent::EpisodeLoaded { index } => match session.store().queue().get(index) {
                Some(episode) => tracing::info!(
                    "Now playing #{}: {} [{}]",
                    index,
                    episode.title,
                    format_duration(episode.duration)
                ),
                None => tracing::info!("Now playing #{}", index),
            },
            SurfaceEvent::PositionChanged { seconds } => {
                tracing::debug!("Position {}", format_duration(seconds));
            }
            SurfaceEvent::Completed { outcome } => {
                tracing::info!("Episode finished: {:?}", outcome);
            }
            SurfaceEvent::Error { message } => {
                tracing::warn!("Output error: {}", message);
            }
        }
    }
}

/// Format seconds as `HH:MM:SS`
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let seconds = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
