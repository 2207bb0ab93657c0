#![forbid(unsafe_code)]

use super::framing::{self, TransportMode};
use crate::McpServer;
use std::io::{self, BufRead, BufReader, Write};
use tracing::{debug, info};

pub(crate) fn run_stdio(server: &mut McpServer) -> io::Result<()> {
    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin.lock());
    let mut stdout = io::stdout().lock();
    serve(server, &mut reader, &mut stdout)
}

/// Handles messages until the reader is exhausted, one at a time.
pub(crate) fn serve<R: BufRead, W: Write>(
    server: &mut McpServer,
    reader: &mut R,
    writer: &mut W,
) -> io::Result<()> {
    // Fixed by the first non-empty line so framing never interleaves.
    let mut mode: Option<TransportMode> = None;

    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }
        let current = match mode {
            Some(current) => current,
            None => match framing::detect_mode(&line) {
                Some(detected) => {
                    debug!(?detected, "transport mode detected");
                    mode = Some(detected);
                    detected
                }
                None => continue,
            },
        };

        let body = match current {
            TransportMode::NewlineJson => line.trim().as_bytes().to_vec(),
            TransportMode::ContentLength => {
                match framing::read_content_length_frame(reader, line)? {
                    Some(body) => body,
                    None => break,
                }
            }
        };

        let response = match framing::parse_request(&body) {
            Ok(request) => {
                let notification = request.is_notification();
                let response = server.handle(request);
                if notification { None } else { response }
            }
            Err(error) => Some(error),
        };
        if let Some(response) = response {
            framing::write_frame(writer, current, &response)?;
        }
    }

    info!("stdin closed, shutting down");
    Ok(())
}
