use anyhow::{anyhow, Context, Result};
use std::io::{BufRead, Write};
use typeahead_core::{Command, Engine};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunStats {
    pub commands: usize,
    pub queries: usize,
    pub rejected: usize,
}

/// Execute a command script against `engine`, writing one line per query.
///
/// With `header` set, the first line holds the number of commands that follow
/// and reading stops after that many; otherwise every line up to EOF is a command.
pub fn run_script<R: BufRead, W: Write>(engine: &mut Engine, input: R, mut output: W, header: bool) -> Result<RunStats> {
    let mut lines = input.lines();
    let limit = if header {
        let first = lines.next().ok_or_else(|| anyhow!("missing command count"))??;
        let n: usize = first.trim().parse().with_context(|| format!("invalid command count {first:?}"))?;
        Some(n)
    } else {
        None
    };

    let mut stats = RunStats::default();
    for (lineno, line) in lines.enumerate() {
        if limit.is_some_and(|n| stats.commands >= n) {
            break;
        }
        let line = line?;
        stats.commands += 1;
        let command = match line.parse::<Command>() {
            Ok(c) => c,
            Err(err) => {
                tracing::warn!(line = lineno + 1 + header as usize, %err, "skipping malformed command");
                stats.rejected += 1;
                continue;
            }
        };
        if let Some(ids) = engine.execute(command) {
            stats.queries += 1;
            writeln!(output, "{}", ids.join(" "))?;
        }
    }

    if let Some(n) = limit {
        if stats.commands < n {
            tracing::warn!(expected = n, read = stats.commands, "input ended before the announced command count");
        }
    }
    output.flush()?;
    Ok(stats)
}
