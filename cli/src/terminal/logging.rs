use colored::{Color, Colorize};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::fmt::{FmtContext, FormatEvent};
use tracing_subscriber::registry::LookupSpan;

const DEFAULT_LEVEL: &str = "info";

/// Marker, colour and weight for one level.
struct LevelStyle {
    marker: &'static str,
    color: Color,
    bold: bool,
}

fn level_style(level: &Level) -> LevelStyle {
    let (marker, color, bold) = match *level {
        Level::ERROR => ("[-]", Color::Red, true),
        Level::WARN => ("[*]", Color::Yellow, true),
        Level::INFO => ("[+]", Color::Green, true),
        Level::DEBUG => ("[?]", Color::Blue, false),
        Level::TRACE => ("[ ]", Color::BrightBlack, false),
    };
    LevelStyle { marker, color, bold }
}

/// One line per event: level marker, the emitting module below info, then
/// the event's fields.
pub struct ArpmonFormatter;

impl<S, N> FormatEvent<S, N> for ArpmonFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let level = event.metadata().level();
        let style = level_style(level);

        let marker = style.marker.color(style.color);
        let marker = if style.bold { marker.bold() } else { marker };
        write!(writer, "{marker} ")?;

        if matches!(*level, Level::DEBUG | Level::TRACE) {
            write!(writer, "{} ", event.metadata().target().dimmed())?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Builds the filter from `--log-level` / `RUST_LOG` directives. Directives
/// that do not parse fall back to `info`.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    EnvFilter::try_new(directives.unwrap_or(DEFAULT_LEVEL))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}

pub fn init_logging(directives: Option<&str>) {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(directives))
        .event_format(ArpmonFormatter)
        .init();
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
