// Imports
use indicatif::{MultiProgress, ProgressBar};

pub fn greenify(s: &str) -> String {
    console::style(s).green().to_string()
}

pub fn simple_spinner<S: ToString>(
    start_message: Option<S>,
    steady_tick_ms: Option<u64>,
    multi: Option<&MultiProgress>,
) -> ProgressBar {
    #[cfg(feature = "progress")]
    {
        let style = match indicatif::ProgressStyle::default_spinner()
            .tick_chars("⊶⊷✔")
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
        {
            Ok(style) => style,
            Err(e) => {
                tracing::warn!("invalid spinner template, {e}");
                indicatif::ProgressStyle::default_spinner()
            }
        };
        let mut spinner = indicatif::ProgressBar::new_spinner().with_style(style);
        if let Some(ms) = steady_tick_ms {
            spinner.enable_steady_tick(std::time::Duration::from_millis(ms));
        }
        if let Some(msg) = start_message {
            spinner.set_message(msg.to_string());
        }
        if let Some(multi) = multi {
            spinner = multi.add(spinner);
            multi.set_move_cursor(true);
        }
        spinner
    }

    #[cfg(not(feature = "progress"))]
    {
        let _ = (start_message, steady_tick_ms, multi);
        ProgressBar::hidden()
    }
}

/// Picks a colour for a correlation coefficient, in line with the heatmap's diverging map
pub fn colorizer_from_coefficient<T>(coef: f64) -> fn(console::StyledObject<T>) -> console::StyledObject<T> {
    match coef {
        -1.0..-0.5 => console::StyledObject::<T>::blue,
        -0.5..0.5 => console::StyledObject::<T>::dim,
        0.5..=1.0 => console::StyledObject::<T>::red,
        _ => {
            tracing::warn!("got unexpected correlation coefficient of {coef}");
            console::StyledObject::<T>::bold
        }
    }
}
