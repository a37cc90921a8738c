use super::model::SeriesRecord;

/// Build the whole console screen as one string: ornamented title, one row
/// per visible series, the currently-watched block and the transient
/// message. The caller decides which collection the rows come from and how
/// wide the terminal is.
pub(crate) fn render_screen(
    title: &str,
    message: Option<&str>,
    watching: Option<&SeriesRecord>,
    rows: &[&SeriesRecord],
    width: u16,
) -> String {
    let mut screen = String::new();

    screen.push_str(&ornament(title, '=', width));
    screen.push('\n');

    let widest_name = rows
        .iter()
        .map(|series| series.name().as_str().chars().count())
        .max()
        .unwrap_or(0);
    const PADDING: usize = 5;

    for series in rows {
        let name = series.name().as_str();
        screen.push_str(" * ");
        screen.push_str(name);
        push_spaces(&mut screen, widest_name - name.chars().count() + PADDING);
        screen.push_str("On episode ");
        screen.push_str(&current_episode_label(series));
        screen.push_str(" / ");
        screen.push_str(&total_episodes_label(series));
        push_spaces(&mut screen, PADDING);
        if series.stream().is_some() {
            screen.push_str(" [Stream]");
        }
        screen.push('\n');
    }

    if let Some(watched) = watching {
        screen.push('\n');
        screen.push_str(&ornament(watched.name().as_str(), '=', width));
        screen.push('\n');
        screen.push_str(&ornament(&progress_sentence(watched), ' ', width));
        screen.push_str("\n\n");
        if let Some(stream) = watched.stream() {
            screen.push_str(&ornament(&format!("Stream located at {stream}"), ' ', width));
        }
    }

    if let Some(message) = message {
        screen.push('\n');
        screen.push_str(message);
        screen.push('\n');
    }

    screen
}

fn current_episode_label(series: &SeriesRecord) -> String {
    if series.episodes() > 0 && series.watched() == series.episodes() {
        "All".to_string()
    } else {
        (series.watched() + 1).to_string()
    }
}

fn total_episodes_label(series: &SeriesRecord) -> String {
    if series.episodes() < 1 {
        "?".to_string()
    } else {
        series.episodes().to_string()
    }
}

fn progress_sentence(watched: &SeriesRecord) -> String {
    if watched.episodes() > 0 && watched.episodes() == watched.watched() {
        format!("All {} episodes have been watched.", watched.episodes())
    } else if watched.episodes() > 0 {
        format!(
            "Currently on episode {} out of {}.",
            watched.watched() + 1,
            watched.episodes()
        )
    } else {
        format!("Currently on episode {}.", watched.watched() + 1)
    }
}

/// Center `text` in a `width`-wide line between runs of `ornament`. Falls
/// back to the bare text when the line is too narrow.
fn ornament(text: &str, ornament: char, width: u16) -> String {
    let text_width = text.chars().count();
    let width = width as usize;
    if width <= text_width + 2 {
        return text.to_string();
    }
    let side = (width - text_width - 2) / 2;
    let mut line = String::new();
    for _ in 0..side {
        line.push(ornament);
    }
    line.push(' ');
    line.push_str(text);
    line.push(' ');
    for _ in 0..side {
        line.push(ornament);
    }
    line
}

fn push_spaces(screen: &mut String, count: usize) {
    for _ in 0..count {
        screen.push(' ');
    }
}
