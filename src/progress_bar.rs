pub use crate::traits::Progress;

/// Progress indicator for the event generation loop
///
/// Shows an interactive bar when standard error is an attended
/// terminal and a log-friendly bar otherwise. At verbosity levels
/// other than the default `info` no bar is shown at all, so that
/// diagnostics are not garbled.
pub struct ProgressBar {
    bar: Bar,
}

enum Bar {
    Interactive(indicatif::ProgressBar),
    Log(logbar::ProgressBar),
    Hidden,
}

impl ProgressBar {
    /// A new progress bar with the given maximum progress and message
    pub fn new(len: u64, message: &str) -> Self {
        if log::max_level().to_level() != Some(log::Level::Info) {
            return Self { bar: Bar::Hidden };
        }
        let bar = if console::Term::stderr().features().is_attended() {
            Bar::Interactive(interactive_bar(len, message))
        } else {
            eprintln!("{message}");
            let style = logbar::Style::new().indicator('█');
            Bar::Log(logbar::ProgressBar::with_style(len as usize, style))
        };
        // temporarily disable logging to not overwrite the bar
        log::set_max_level(log::LevelFilter::Off);
        Self { bar }
    }
}

fn interactive_bar(len: u64, message: &str) -> indicatif::ProgressBar {
    let bar = indicatif::ProgressBar::new(len);
    bar.set_style(
        indicatif::ProgressStyle::default_bar()
            .template("{bar:60.cyan/cyan} {msg} {pos}/{len} [{elapsed}]")
            .unwrap(),
    );
    bar.set_message(message.to_owned());
    bar
}

impl Progress for ProgressBar {
    fn inc(&self, i: u64) {
        match &self.bar {
            Bar::Interactive(bar) => bar.inc(i),
            Bar::Log(bar) => bar.inc(i as usize),
            Bar::Hidden => {}
        }
    }

    fn finish(&self) {
        match &self.bar {
            Bar::Interactive(bar) => bar.finish(),
            Bar::Log(bar) => bar.finish(),
            // no bar, logging was never disabled
            Bar::Hidden => return,
        }
        // restore logging
        log::set_max_level(log::LevelFilter::Info);
    }
}
