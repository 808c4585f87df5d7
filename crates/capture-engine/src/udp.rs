//! UDP landmark stream.
//!
//! An external hand tracker (for example a MediaPipe sidecar) sends one JSON
//! datagram per processed frame:
//!
//! ```json
//! {"t": 1.25, "width": 640, "height": 480, "normalized": true,
//!  "hands": [{"side": "Right", "score": 0.93, "landmarks": [[0.5, 0.4], ...]}]}
//! ```
//!
//! `normalized` landmarks are in `[0, 1]` and get scaled by the frame size.
//! Hands scoring below the detection threshold are dropped.

use std::io::ErrorKind;
use std::net::{SocketAddr, UdpSocket};
use std::time::{Duration, Instant};

use handmouse_common::clock::SessionClock;
use handmouse_common::error::{HandmouseError, HandmouseResult};
use handmouse_hand_model::{HandObservation, HandSide, Point};
use serde::Deserialize;

use crate::camera::{Frame, FrameRead, FrameSource};
use crate::detector::{DetectorSettings, HandDetector};

const MAX_DATAGRAM: usize = 16 * 1024;

#[derive(Debug, Deserialize)]
struct LandmarkPacket {
    #[serde(default)]
    t: Option<f64>,
    width: u32,
    height: u32,
    #[serde(default)]
    normalized: bool,
    #[serde(default)]
    hands: Vec<PacketHand>,
}

#[derive(Debug, Deserialize)]
struct PacketHand {
    side: HandSide,
    #[serde(default = "full_score")]
    score: f64,
    landmarks: Vec<Point>,
}

fn full_score() -> f64 {
    1.0
}

/// A decoded landmark datagram.
#[derive(Debug, Clone)]
pub struct ParsedPacket {
    /// Sender timestamp, if provided.
    pub t: Option<f64>,
    pub width: u32,
    pub height: u32,
    /// Hands in frame pixel coordinates, filtered and truncated.
    pub hands: Vec<HandObservation>,
}

/// Decode one datagram.
pub fn parse_packet(payload: &[u8], settings: &DetectorSettings) -> HandmouseResult<ParsedPacket> {
    let packet: LandmarkPacket = serde_json::from_slice(payload)?;
    let (sx, sy) = if packet.normalized {
        (packet.width as f64, packet.height as f64)
    } else {
        (1.0, 1.0)
    };

    let mut hands = Vec::with_capacity(packet.hands.len());
    for hand in packet.hands {
        if hand.score < settings.min_detection_confidence {
            tracing::trace!(score = hand.score, "Dropping low-confidence hand");
            continue;
        }
        if hands.len() == settings.max_hands {
            break;
        }
        hands.push(HandObservation::new(hand.side, &hand.landmarks)?.scaled(sx, sy));
    }

    Ok(ParsedPacket {
        t: packet.t,
        width: packet.width,
        height: packet.height,
        hands,
    })
}

fn bind(addr: SocketAddr) -> HandmouseResult<UdpSocket> {
    UdpSocket::bind(addr).map_err(|e| {
        HandmouseError::detector(format!("Failed to bind landmark stream on {addr}: {e}"))
    })
}

/// Frame source where every datagram is one frame.
///
/// Used when the external tracker owns the camera. Frames are stamped with
/// the local session clock; sender timestamps are only logged.
pub struct UdpLandmarkSource {
    socket: Option<UdpSocket>,
    settings: DetectorSettings,
    clock: SessionClock,
    seq: u64,
    buf: Vec<u8>,
}

impl UdpLandmarkSource {
    pub fn bind(
        addr: SocketAddr,
        read_timeout: Duration,
        settings: DetectorSettings,
    ) -> HandmouseResult<Self> {
        let socket = bind(addr)?;
        socket.set_read_timeout(Some(read_timeout))?;
        tracing::info!(%addr, "Landmark stream listening");
        Ok(Self {
            socket: Some(socket),
            settings,
            clock: SessionClock::start(),
            seq: 0,
            buf: vec![0u8; MAX_DATAGRAM],
        })
    }

    /// Address the socket is bound to.
    pub fn local_addr(&self) -> HandmouseResult<SocketAddr> {
        match &self.socket {
            Some(socket) => Ok(socket.local_addr()?),
            None => Err(HandmouseError::detector("landmark stream released")),
        }
    }
}

impl FrameSource for UdpLandmarkSource {
    fn name(&self) -> &str {
        "udp-landmarks"
    }

    fn read(&mut self) -> HandmouseResult<FrameRead> {
        let Some(socket) = self.socket.as_ref() else {
            return Ok(FrameRead::Exhausted);
        };

        let len = match socket.recv(&mut self.buf) {
            Ok(len) => len,
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                return Ok(FrameRead::Missed);
            }
            Err(e) => return Err(e.into()),
        };

        match parse_packet(&self.buf[..len], &self.settings) {
            Ok(packet) => {
                let seq = self.seq;
                self.seq += 1;
                tracing::trace!(seq, sender_t = ?packet.t, hands = packet.hands.len(), "Landmark packet");
                Ok(FrameRead::Frame(Frame::with_landmarks(
                    seq,
                    self.clock.elapsed_secs(),
                    packet.width,
                    packet.height,
                    packet.hands,
                )))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Malformed landmark packet");
                Ok(FrameRead::Missed)
            }
        }
    }

    fn release(&mut self) {
        if self.socket.take().is_some() {
            tracing::info!("Landmark stream closed");
        }
    }

    fn is_released(&self) -> bool {
        self.socket.is_none()
    }
}

/// Detector that pairs locally captured frames with the newest datagram
/// from an external tracker watching the same camera.
///
/// The tracker sees the raw camera image. When the local frames are
/// mirrored, enable [`mirrored`](Self::mirrored) so the landmarks and
/// handedness match what is on screen.
pub struct UdpLandmarkDetector {
    socket: UdpSocket,
    settings: DetectorSettings,
    latest: Option<(Instant, ParsedPacket)>,
    max_age: Duration,
    mirror: bool,
    buf: Vec<u8>,
}

impl UdpLandmarkDetector {
    pub fn bind(
        addr: SocketAddr,
        max_age: Duration,
        settings: DetectorSettings,
    ) -> HandmouseResult<Self> {
        let socket = bind(addr)?;
        socket.set_nonblocking(true)?;
        tracing::info!(%addr, "Landmark detector listening");
        Ok(Self {
            socket,
            settings,
            latest: None,
            max_age,
            mirror: false,
            buf: vec![0u8; MAX_DATAGRAM],
        })
    }

    /// Reflect landmarks horizontally to match a flipped frame.
    pub fn mirrored(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    /// Address the socket is bound to.
    pub fn local_addr(&self) -> HandmouseResult<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Read every pending datagram, keeping only the newest valid one.
    fn drain(&mut self) -> HandmouseResult<()> {
        loop {
            match self.socket.recv(&mut self.buf) {
                Ok(len) => match parse_packet(&self.buf[..len], &self.settings) {
                    Ok(packet) => self.latest = Some((Instant::now(), packet)),
                    Err(e) => tracing::warn!(error = %e, "Malformed landmark packet"),
                },
                Err(e) if e.kind() == ErrorKind::WouldBlock => return Ok(()),
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl HandDetector for UdpLandmarkDetector {
    fn name(&self) -> &str {
        "udp-sidecar"
    }

    fn detect(&mut self, frame: &Frame) -> HandmouseResult<Vec<HandObservation>> {
        self.drain()?;
        let Some((received, packet)) = &self.latest else {
            return Ok(Vec::new());
        };
        if received.elapsed() > self.max_age {
            return Ok(Vec::new());
        }
        // Rescale if the tracker processed a different resolution.
        let sx = frame.width as f64 / packet.width.max(1) as f64;
        let sy = frame.height as f64 / packet.height.max(1) as f64;
        let width = frame.width as f64;
        let mirror = self.mirror;
        Ok(packet
            .hands
            .iter()
            .map(|h| {
                let hand = h.scaled(sx, sy);
                if mirror {
                    hand.mirrored(width)
                } else {
                    hand
                }
            })
            .collect())
    }
}
