use crate::agent::{AgentError, AgentInvoker, RunConfig};
use crate::types::ChatMessage;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info};

/// Lines that end the session, compared case-insensitively.
pub const EXIT_WORDS: [&str; 3] = ["exit", "quit", "q"];

const PROMPT: &str = "You: ";

#[derive(Debug, Error)]
pub enum ReplError {
    #[error("console I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Agent(#[from] AgentError),
    #[error("input stream closed before an exit command")]
    InputClosed,
    #[error("agent returned no messages")]
    EmptyResponse,
}

pub fn is_exit_word(line: &str) -> bool {
    let lowered = line.to_lowercase();
    EXIT_WORDS.contains(&lowered.as_str())
}

/// Interactive loop: prompt, read a line, hand it to the agent, print the reply.
///
/// Agent failures are not caught here; they end the loop and reach the caller.
pub async fn run<A, R, W>(
    agent: &A,
    config: &RunConfig,
    mut input: R,
    mut output: W,
) -> Result<(), ReplError>
where
    A: AgentInvoker + ?Sized,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    info!(thread_id = %config.thread_id, "Entering interactive loop");
    let mut buffer = String::new();

    loop {
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;

        buffer.clear();
        if input.read_line(&mut buffer).await? == 0 {
            debug!("Console input reached end of stream");
            return Err(ReplError::InputClosed);
        }
        let line = strip_line_ending(&buffer);

        if is_exit_word(line) {
            output.write_all(b"Exiting...\n").await?;
            output.flush().await?;
            info!("Exit command received");
            return Ok(());
        }

        debug!(chars = line.len(), "Dispatching user input to agent");
        let state = agent
            .invoke(vec![ChatMessage::user(line)], config)
            .await
            .inspect_err(|err| error!(%err, "Agent invocation failed"))?;
        let reply = state.last_message().ok_or(ReplError::EmptyResponse)?;

        output
            .write_all(format!("Bot: {}\n", reply.content).as_bytes())
            .await?;
        output.flush().await?;
    }
}

fn strip_line_ending(line: &str) -> &str {
    line.strip_suffix("\r\n")
        .or_else(|| line.strip_suffix('\n'))
        .unwrap_or(line)
}
