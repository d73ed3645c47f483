use std::time::Duration;

use ais_consumer::consumer::Consumer;
use futures::TryStreamExt;
use tokio_stream::wrappers::ReceiverStream;
use vessel_core::{StreamEvent, VesselRecord};

pub struct TestHelper {
    pub source: StreamSource,
    pub receiver: async_channel::Receiver<StreamEvent>,
}

pub struct StreamSource {
    out: tokio::sync::mpsc::Sender<Result<String, std::io::Error>>,
}

/// Spawns a consumer reading from an in-memory line source, mirroring how
/// the real one reads the feed's streaming body.
pub fn spawn_consumer() -> TestHelper {
    let (line_sender, line_receiver) = tokio::sync::mpsc::channel(100);

    let receiver_stream = ReceiverStream::new(line_receiver);
    let compat =
        tokio_util::compat::FuturesAsyncReadCompatExt::compat(receiver_stream.into_async_read());

    let (sender, receiver) = async_channel::bounded(100);

    let consumer = Consumer::new(Duration::from_millis(5));
    tokio::spawn(async move {
        let _ = consumer.run(compat, sender).await;
    });

    TestHelper {
        source: StreamSource { out: line_sender },
        receiver,
    }
}

impl StreamSource {
    pub async fn send_line(&self, line: &str) {
        let mut line = line.to_string();
        line.push('\n');
        self.out.send(Ok(line)).await.unwrap();
    }

    pub async fn close(self) {
        drop(self.out);
    }
}

impl TestHelper {
    /// Collects forwarded vessel records until `count` have arrived.
    pub async fn recv_vessels(&self, count: usize) -> Vec<VesselRecord> {
        let mut vessels = Vec::new();
        while vessels.len() < count {
            match self.receiver.recv().await.unwrap() {
                StreamEvent::Batch(batch) => vessels.extend(batch.vessels),
                StreamEvent::Connected => {}
            }
        }
        vessels
    }
}
