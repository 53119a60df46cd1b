use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::{
    commands::CommandHandler,
    directory::Directory,
    input::{read_and_parse_resp, CommandReadError},
};

/// Serves one client until it disconnects.
///
/// Requests on a connection are answered in order. Errors are reported to the
/// client as RESP errors and do not close the connection; only I/O failures
/// and the peer hanging up do.
pub async fn handle_client_connection<S>(mut stream: S, client_address: String, directory: Directory)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut buffer = BytesMut::with_capacity(1024);

    tracing::debug!(client = %client_address, "client connected");

    loop {
        let parsed_input = match read_and_parse_resp(&mut stream, &mut buffer).await {
            Ok(values) => values,
            Err(CommandReadError::ConnectionClosed) => break,
            Err(e @ CommandReadError::IoError(_)) => {
                tracing::error!(client = %client_address, error = %e, "failed to read from client");
                break;
            }
            Err(e) => {
                // the buffered bytes cannot be resynchronised
                buffer.clear();

                if let Err(e) = stream.write_all(e.as_string().as_bytes()).await {
                    tracing::error!(client = %client_address, error = %e, "failed to write to client");
                    break;
                }
                continue;
            }
        };

        for input in parsed_input {
            let response = match CommandHandler::new(input) {
                Ok(handler) => match handler.handle(&directory).await {
                    Ok(response) => response,
                    Err(e) => {
                        tracing::debug!(client = %client_address, command = %handler.name, error = %e, "command failed");
                        e.as_string()
                    }
                },
                Err(e) => e.as_string(),
            };

            if let Err(e) = stream.write_all(response.as_bytes()).await {
                tracing::error!(client = %client_address, error = %e, "failed to write to client");
                return;
            }
        }
    }

    tracing::debug!(client = %client_address, "client disconnected");
}
