//! Long-running commands: zone lookups and the refreshing board.

use std::io::Write;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::MissedTickBehavior;

use super::{emit, AppState, CommandOutput, OutputFormat, ViewArgs};
use crate::config::Config;
use crate::errors::AppError;
use crate::search::{DebouncedLookup, OfflineGeocoder, ZoneLookup};
use crate::storage::Persistence;

/// One-shot lookup of `query`.
pub async fn zones(config: &Config, query: &str) -> CommandOutput {
    let lookup = ZoneLookup::new(OfflineGeocoder, config.lookup_limit);
    CommandOutput::Zones(lookup.lookup(query).await)
}

/// Interactive lookup: every input line is a new query.
///
/// Lines typed faster than the debounce interval supersede each other, so
/// only the last query of a burst is resolved. Returns once input is closed
/// and the final query has been answered.
pub async fn pick<R, W>(
    config: &Config,
    input: R,
    out: &mut W,
    format: OutputFormat,
) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lookup = DebouncedLookup::new(
        ZoneLookup::new(OfflineGeocoder, config.lookup_limit),
        config.lookup_debounce,
    );
    let mut results = lookup.subscribe();
    let mut lines = input.lines();
    let mut last_issued = 0;
    let mut input_open = true;

    loop {
        tokio::select! {
            line = lines.next_line(), if input_open => match line? {
                Some(line) => last_issued = lookup.submit(line),
                None => {
                    input_open = false;
                    if last_issued == 0 || results.borrow().sequence >= last_issued {
                        break;
                    }
                }
            },
            changed = results.changed() => {
                if changed.is_err() {
                    break;
                }
                let published = results.borrow_and_update().clone();
                emit(out, format, &CommandOutput::Zones(published.result))?;
                if !input_open && published.sequence >= last_issued {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Re-render the board every refresh interval until interrupted, or after
/// `max_ticks` renders when given.
pub async fn watch<P, W>(
    state: &AppState<P>,
    args: &ViewArgs,
    out: &mut W,
    format: OutputFormat,
    max_ticks: Option<usize>,
) -> Result<(), AppError>
where
    P: Persistence,
    W: Write,
{
    let period = state.config.refresh_interval.max(Duration::from_secs(1));
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut rendered = 0;

    // One listener for the whole loop
    let interrupted = tokio::signal::ctrl_c();
    tokio::pin!(interrupted);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                emit(out, format, &CommandOutput::Board(state.board(args)))?;
                rendered += 1;
                if max_ticks.is_some_and(|max| rendered >= max) {
                    break;
                }
            }
            _ = &mut interrupted => {
                tracing::debug!("Interrupted after {} renders", rendered);
                break;
            }
        }
    }

    Ok(())
}
