use std::str::FromStr;

use anyhow::Result;
use once_cell::sync::OnceCell;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Default,
    Compact,
    Json,
    Pretty,
}

type ReloadFn = Box<dyn Fn(&str) -> Result<()> + Send + Sync>;

static RELOAD_HANDLE: OnceCell<ReloadFn> = OnceCell::new();

/// Installs the global subscriber on first call, reloads the level filter on
/// subsequent calls.
pub fn init(level: &str, mode: Mode) -> Result<()> {
    let reload = RELOAD_HANDLE.get_or_try_init(|| -> Result<ReloadFn> {
        let env_filter = EnvFilter::from_str(level)?;

        let filter = tracing_subscriber::fmt()
            .with_line_number(true)
            .with_file(true)
            .with_env_filter(env_filter);

        let reload_fn: ReloadFn = match mode {
            Mode::Default => {
                let builder = filter.with_filter_reloading();
                let handle = builder.reload_handle();
                builder.finish().try_init()?;
                Box::new(move |level| {
                    handle.reload(EnvFilter::from_str(level)?)?;
                    Ok(())
                })
            }
            Mode::Compact => {
                let builder = filter.compact().with_filter_reloading();
                let handle = builder.reload_handle();
                builder.finish().try_init()?;
                Box::new(move |level| {
                    handle.reload(EnvFilter::from_str(level)?)?;
                    Ok(())
                })
            }
            Mode::Json => {
                let builder = filter.json().with_filter_reloading();
                let handle = builder.reload_handle();
                builder.finish().try_init()?;
                Box::new(move |level| {
                    handle.reload(EnvFilter::from_str(level)?)?;
                    Ok(())
                })
            }
            Mode::Pretty => {
                let builder = filter.pretty().with_filter_reloading();
                let handle = builder.reload_handle();
                builder.finish().try_init()?;
                Box::new(move |level| {
                    handle.reload(EnvFilter::from_str(level)?)?;
                    Ok(())
                })
            }
        };

        Ok(reload_fn)
    })?;

    reload(level)?;

    Ok(())
}
