//! The interactive loop.
//!
//! Input arrives as [`Lines`] from a reader thread. Both waiting for a line
//! and running a command are raced against a shutdown future (Ctrl-C in the
//! binary), so a slow collaborator call never delays shutdown. Output goes
//! to any [`Write`].

use std::future::Future;
use std::io::{self, Write};

use jimbruz_core::session::TIMESTAMP_FORMAT;
use tracing::debug;

use crate::command::{Command, HELP};
use crate::companion::Companion;
use crate::input::Lines;

/// Whether the loop should keep going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line.
    Continue,
    /// Leave the loop.
    Quit,
}

/// Run the loop until `quit`, end of input, or `shutdown` resolves.
///
/// # Errors
///
/// Returns an I/O error if reading input or writing output fails.
pub async fn run<W, S>(
    companion: &mut Companion,
    input: &mut Lines,
    out: &mut W,
    shutdown: S,
) -> io::Result<()>
where
    W: Write,
    S: Future<Output = ()>,
{
    let name = companion.pet().name().to_string();
    let species = companion.pet().species().to_string();
    writeln!(out, "Welcome. You have summoned {name}, the introverted {species}.")?;
    writeln!(out, "Type 'help' to see commands.\n")?;

    tokio::pin!(shutdown);

    loop {
        write!(out, ">> ")?;
        out.flush()?;

        let line = tokio::select! {
            line = input.next_line() => line?,
            () = &mut shutdown => None,
        };

        let Some(line) = line else {
            break;
        };

        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(out, "{e}")?;
                continue;
            }
        };

        let flow = tokio::select! {
            flow = dispatch(companion, command, out) => Some(flow?),
            () = &mut shutdown => None,
        };

        match flow {
            Some(Flow::Continue) => {}
            Some(Flow::Quit) => return out.flush(),
            None => break,
        }
    }

    debug!("Input ended or shutdown requested");
    writeln!(out, "\nGoodbye.")?;
    out.flush()
}

/// Execute one command and print its output.
///
/// # Errors
///
/// Returns an I/O error if writing output fails.
pub async fn dispatch<W: Write>(
    companion: &mut Companion,
    command: Command,
    out: &mut W,
) -> io::Result<Flow> {
    let name = companion.pet().name().to_string();

    match command {
        Command::Feed => {
            writeln!(out, "You offer a bowl of frozen lichens to {name}...")?;
            writeln!(out, "{}", companion.feed())?;
        }
        Command::Play => {
            writeln!(out, "You attempt to play with {name}...")?;
            writeln!(out, "{}", companion.play())?;
        }
        Command::Sleep => writeln!(out, "{}", companion.sleep())?,
        Command::Status => writeln!(out, "{}", companion.status())?,
        Command::Remember(note) => writeln!(out, "{}", companion.remember(&note))?,
        Command::Memories => {
            let memories = companion.memories();
            if memories.is_empty() {
                writeln!(out, "No memories yet.")?;
            }
            for entry in memories {
                match entry.local_time() {
                    Some(t) => writeln!(out, "- {}: {}", t.format(TIMESTAMP_FORMAT), entry.note)?,
                    None => writeln!(out, "- {}: {}", entry.time, entry.note)?,
                }
            }
        }
        Command::Ask(prompt) => {
            writeln!(out, "{name} thinks...")?;
            out.flush()?;
            let answer = companion.ask(&prompt).await;
            writeln!(out, "{name}: {}", answer.text)?;
        }
        Command::Help => writeln!(out, "{HELP}")?,
        Command::Quit => {
            writeln!(out, "{name} fades away into the snow. Goodbye.")?;
            return Ok(Flow::Quit);
        }
    }

    Ok(Flow::Continue)
}
