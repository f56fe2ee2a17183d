//! Line-driven rendition of the weather screen.
//!
//! Each stdin line is one user action; the view is re-rendered whenever it
//! changes, whether from input or from a completed request.

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;
use weather_core::{ScreenController, View};

const HELP: &str = "\
/        open or close the search box
<text>   set the search box text (looked up after a short pause)
<n>      pick the n-th search result
r        reload the forecast
q        quit";

#[derive(Debug, PartialEq, Eq)]
enum Input {
    ToggleSearch,
    Select(usize),
    Refresh,
    Quit,
    Text(String),
}

fn parse_input(line: &str) -> Input {
    match line.trim() {
        "/" => Input::ToggleSearch,
        "r" => Input::Refresh,
        "q" | ":q" => Input::Quit,
        trimmed => match trimmed.parse::<usize>() {
            Ok(n) if n > 0 => Input::Select(n),
            _ => Input::Text(line.to_string()),
        },
    }
}

enum Step {
    Line(std::io::Result<Option<String>>),
    Completed,
}

pub async fn run(mut screen: ScreenController) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut shown: Option<View> = None;

    println!("{HELP}\n");
    screen.mount();

    loop {
        let view = screen.view();
        if shown.as_ref() != Some(&view) {
            println!("{view}");
            shown = Some(view);
        }

        let step = tokio::select! {
            line = lines.next_line() => Step::Line(line),
            _ = screen.process_next() => Step::Completed,
        };

        let line = match step {
            Step::Completed => continue,
            Step::Line(line) => line.context("Failed to read from stdin")?,
        };
        let Some(line) = line else { break };

        let input = parse_input(&line);
        debug!(?input, "browse input");

        match input {
            Input::Quit => break,
            Input::ToggleSearch => screen.toggle_search(),
            Input::Refresh => screen.refresh(),
            Input::Select(n) => {
                if !screen.select_result(n - 1) {
                    println!("No search result #{n}.");
                }
            }
            Input::Text(text) => screen.update_search_text(text),
        }
    }

    screen.flush_writes().await;
    screen.unmount();
    Ok(())
}
