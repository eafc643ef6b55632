use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError, bounded};
use tracing::{debug, info, warn};

use crate::controllers::render::errors::SessionError;
use crate::controllers::render::ports::transport::RenderTransport;
use crate::controllers::render::session::event_stream::NextPayload;
use crate::controllers::render::settings::SessionSettings;
use crate::core::actions::cancellation::CancelFlag;
use crate::core::actions::decode_frame::decode_frame;
use crate::core::actions::encode_request::RequestDescriptor;
use crate::core::data::stream_frame::{PixelBatch, StreamFrame};

/// Longest the worker waits on a silent body before rechecking cancellation.
const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CloseReason {
    Terminated,
    Failed,
    Superseded,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SessionState {
    Opening,
    Streaming,
    Closed(CloseReason),
}

#[derive(Debug)]
pub enum SessionEvent {
    Batch(PixelBatch),
    Closed(CloseReason),
}

enum WorkerMessage {
    Connected,
    Batch(PixelBatch),
    Terminated,
    Failed(SessionError),
}

/// One streaming connection to the render engine.
///
/// The connection is read and decoded on a dedicated worker thread; decoded
/// batches reach the owner through a bounded channel, in arrival order.
/// Closing drops the receiving end, so nothing the worker reads afterwards
/// can be delivered, and the worker releases the body within
/// `CANCEL_POLL_INTERVAL` even if the engine has gone quiet.
pub struct StreamSession {
    id: u64,
    descriptor: RequestDescriptor,
    state: SessionState,
    receiver: Option<Receiver<WorkerMessage>>,
    cancel: CancelFlag,
    dropped_frames: Arc<AtomicU64>,
    idle_timeout: Option<Duration>,
    last_activity: Instant,
}

impl StreamSession {
    pub fn open<T>(
        id: u64,
        transport: Arc<T>,
        descriptor: RequestDescriptor,
        settings: &SessionSettings,
    ) -> Result<Self, SessionError>
    where
        T: RenderTransport + ?Sized + 'static,
    {
        let (sender, receiver) = bounded(settings.frame_queue_depth.max(1));
        let cancel = CancelFlag::new();
        let dropped_frames = Arc::new(AtomicU64::new(0));

        let worker = Worker {
            id,
            transport,
            descriptor: descriptor.clone(),
            sender,
            cancel: cancel.clone(),
            dropped_frames: Arc::clone(&dropped_frames),
        };

        thread::Builder::new()
            .name(format!("render-session-{id}"))
            .spawn(move || worker.run())?;

        info!(session_id = id, descriptor = %descriptor, "session opening");

        Ok(Self {
            id,
            descriptor,
            state: SessionState::Opening,
            receiver: Some(receiver),
            cancel,
            dropped_frames,
            idle_timeout: settings.idle_timeout,
            last_activity: Instant::now(),
        })
    }

    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn descriptor(&self) -> &RequestDescriptor {
        &self.descriptor
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        !matches!(self.state, SessionState::Closed(_))
    }

    /// Frames the worker could not decode and skipped.
    #[must_use]
    pub fn dropped_frames(&self) -> u64 {
        self.dropped_frames.load(Ordering::Relaxed)
    }

    /// Waits for the next batch or for the session to close.
    ///
    /// A transport failure or idle timeout closes the session and is returned
    /// as an error once; afterwards the session reports `Closed(Failed)`.
    pub fn next_event(&mut self) -> Result<SessionEvent, SessionError> {
        loop {
            let Some(receiver) = self.receiver.as_ref() else {
                return Ok(SessionEvent::Closed(self.close_reason()));
            };

            let message = match self.idle_timeout {
                Some(timeout) => match receiver.recv_timeout(timeout) {
                    Ok(message) => message,
                    Err(RecvTimeoutError::Timeout) => return Err(self.idle_out(timeout)),
                    Err(RecvTimeoutError::Disconnected) => {
                        WorkerMessage::Failed(SessionError::WorkerDisconnected)
                    }
                },
                None => receiver
                    .recv()
                    .unwrap_or(WorkerMessage::Failed(SessionError::WorkerDisconnected)),
            };

            if let Some(event) = self.handle(message)? {
                return Ok(event);
            }
        }
    }

    /// Non-blocking variant of [`next_event`](Self::next_event); `Ok(None)`
    /// means nothing is queued yet.
    pub fn try_next_event(&mut self) -> Result<Option<SessionEvent>, SessionError> {
        loop {
            let Some(receiver) = self.receiver.as_ref() else {
                return Ok(Some(SessionEvent::Closed(self.close_reason())));
            };

            let message = match receiver.try_recv() {
                Ok(message) => message,
                Err(TryRecvError::Empty) => {
                    return match self.idle_timeout {
                        Some(timeout) if self.last_activity.elapsed() >= timeout => {
                            Err(self.idle_out(timeout))
                        }
                        _ => Ok(None),
                    };
                }
                Err(TryRecvError::Disconnected) => {
                    WorkerMessage::Failed(SessionError::WorkerDisconnected)
                }
            };

            if let Some(event) = self.handle(message)? {
                return Ok(Some(event));
            }
        }
    }

    /// Stops delivery. Closing an already closed session does nothing.
    pub fn close(&mut self) {
        if self.is_open() {
            self.shut_down(CloseReason::Superseded);
        }
    }

    fn handle(&mut self, message: WorkerMessage) -> Result<Option<SessionEvent>, SessionError> {
        self.last_activity = Instant::now();

        match message {
            WorkerMessage::Connected => {
                self.state = SessionState::Streaming;
                debug!(session_id = self.id, "session streaming");
                Ok(None)
            }
            WorkerMessage::Batch(batch) => {
                self.state = SessionState::Streaming;
                Ok(Some(SessionEvent::Batch(batch)))
            }
            WorkerMessage::Terminated => {
                self.shut_down(CloseReason::Terminated);
                Ok(Some(SessionEvent::Closed(CloseReason::Terminated)))
            }
            WorkerMessage::Failed(err) => {
                warn!(session_id = self.id, error = %err, "session failed");
                self.shut_down(CloseReason::Failed);
                Err(err)
            }
        }
    }

    fn idle_out(&mut self, timeout: Duration) -> SessionError {
        warn!(session_id = self.id, ?timeout, "session idle, closing");
        self.shut_down(CloseReason::Failed);
        SessionError::IdleTimeout(timeout)
    }

    fn shut_down(&mut self, reason: CloseReason) {
        self.cancel.cancel();
        self.receiver = None;
        self.state = SessionState::Closed(reason);

        info!(
            session_id = self.id,
            ?reason,
            dropped = self.dropped_frames(),
            "session closed"
        );
    }

    fn close_reason(&self) -> CloseReason {
        match self.state {
            SessionState::Closed(reason) => reason,
            _ => CloseReason::Superseded,
        }
    }
}

impl Drop for StreamSession {
    fn drop(&mut self) {
        self.close();
    }
}

struct Worker<T: RenderTransport + ?Sized> {
    id: u64,
    transport: Arc<T>,
    descriptor: RequestDescriptor,
    sender: Sender<WorkerMessage>,
    cancel: CancelFlag,
    dropped_frames: Arc<AtomicU64>,
}

impl<T: RenderTransport + ?Sized> Worker<T> {
    fn run(self) {
        let mut payloads = match self.transport.open_stream(&self.descriptor) {
            Ok(payloads) => payloads,
            Err(err) => {
                self.forward(WorkerMessage::Failed(err));
                return;
            }
        };

        if !self.forward(WorkerMessage::Connected) {
            return;
        }

        while !self.cancel.is_cancelled() {
            let payload = match payloads.next_payload(CANCEL_POLL_INTERVAL) {
                Ok(NextPayload::Payload(payload)) => payload,
                Ok(NextPayload::Pending) => continue,
                Ok(NextPayload::Ended) => {
                    self.forward(WorkerMessage::Failed(SessionError::UnexpectedEndOfStream));
                    return;
                }
                Err(err) => {
                    self.forward(WorkerMessage::Failed(err));
                    return;
                }
            };

            match decode_frame(&payload) {
                Ok(StreamFrame::Terminate) => {
                    self.forward(WorkerMessage::Terminated);
                    return;
                }
                Ok(StreamFrame::Batch(batch)) => {
                    if !self.forward(WorkerMessage::Batch(batch)) {
                        break;
                    }
                }
                Err(err) => {
                    self.dropped_frames.fetch_add(1, Ordering::Relaxed);
                    warn!(session_id = self.id, error = %err, "dropping malformed frame");
                }
            }
        }

        debug!(session_id = self.id, "session worker stopping");
    }

    /// Hands a message to the owner; false once the session is gone.
    fn forward(&self, message: WorkerMessage) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }

        self.sender.send(message).is_ok()
    }
}
