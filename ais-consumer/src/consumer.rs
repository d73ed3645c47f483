use async_channel::Sender;
use futures::StreamExt;
use snafu::ResultExt;
use tokio::io::AsyncRead;
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};
use tracing::{Level, event, instrument};
use vessel_core::{DataMessage, StreamEvent, VesselRecord};

use crate::{
    error::{ChannelClosedSnafu, ParseSnafu, Result, StreamClosedSnafu},
    models::{MessageType, VESSEL_UPDATE, VesselUpdateMessage},
};

/// Upper bound on a single stream line, anything longer is treated as
/// corrupt framing.
const MAX_MESSAGE_LENGTH: usize = 4096;

pub struct Consumer {
    commit_interval: std::time::Duration,
}

impl Consumer {
    pub fn new(commit_interval: std::time::Duration) -> Consumer {
        Consumer { commit_interval }
    }

    /// Reads newline-delimited messages from `source` until it ends,
    /// committing a batch of validated records every `commit_interval`.
    pub async fn run(
        &self,
        source: impl AsyncRead + Unpin,
        sender: Sender<StreamEvent>,
    ) -> Result<()> {
        let codec = LinesCodec::new_with_max_length(MAX_MESSAGE_LENGTH);
        let mut framed_read = FramedRead::new(source, codec);

        // This vector is never deallocated and will match the size of the
        // highest amount of messages received during a commit interval.
        let mut buffer = Vec::new();

        let mut interval = tokio::time::interval(self.commit_interval);

        loop {
            tokio::select! {
                message = framed_read.next() => {
                    match message {
                        Some(message) => buffer.push(message),
                        None => {
                            // Flush what arrived since the last tick so a
                            // disconnect does not lose validated records.
                            if !buffer.is_empty() {
                                process_messages(buffer.drain(..), &sender).await?;
                            }
                            return StreamClosedSnafu.fail();
                        }
                    }
                }
                _ = interval.tick() => {
                    if !buffer.is_empty() {
                        process_messages(buffer.drain(..), &sender).await?;
                    }
                }
            }
        }
    }
}

#[instrument(skip(messages, sender), fields(app.num_messages))]
async fn process_messages<T>(messages: T, sender: &Sender<StreamEvent>) -> Result<()>
where
    T: IntoIterator<Item = std::result::Result<String, LinesCodecError>>,
{
    let mut data_message = DataMessage::default();
    let mut num_messages = 0;
    for message in messages {
        num_messages += 1;
        match message {
            Err(e) => event!(Level::ERROR, "failed to consume stream message: {e:?}"),
            Ok(message) => match parse_message(&message) {
                Err(e) => event!(Level::ERROR, "{e:?}"),
                Ok(None) => {}
                Ok(Some(vessel)) => data_message.vessels.push(vessel),
            },
        }
    }

    // Can only fail if the channel is closed.
    sender
        .send(StreamEvent::Batch(data_message))
        .await
        .map_err(|_| ChannelClosedSnafu.build())?;

    tracing::Span::current().record("app.num_messages", num_messages);

    Ok(())
}

fn parse_message(message: &str) -> Result<Option<VesselRecord>> {
    let message_type: MessageType = serde_json::from_str(message).context(ParseSnafu)?;

    if message_type.message_type != VESSEL_UPDATE {
        event!(
            Level::WARN,
            "ignoring unrecognized stream message type: '{}'",
            message_type.message_type,
        );
        return Ok(None);
    }

    let message: VesselUpdateMessage = serde_json::from_str(message).context(ParseSnafu)?;

    Ok(message.data.into())
}
